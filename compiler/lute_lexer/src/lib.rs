//! Lexer for Lute using logos with string interning.
//!
//! Tokenizing happens in two steps: a logos-derived [`RawToken`] pass
//! over the source, then conversion into the interned
//! [`lute_ir::TokenKind`] the parser consumes. String literals are
//! cooked (escape sequences decoded) during the raw pass.

use logos::Logos;
use lute_ir::{Span, StringInterner, Token, TokenKind, TokenList};

/// What went wrong while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, Default, thiserror::Error)]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedChar,
    #[error("integer literal out of range")]
    IntOutOfRange,
    #[error("malformed float literal")]
    BadFloat,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unknown escape sequence in string literal")]
    BadEscape,
}

/// A lex error with its source location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

fn parse_int(lex: &mut logos::Lexer<'_, RawToken>) -> Result<i64, LexErrorKind> {
    lex.slice()
        .parse::<i64>()
        .map_err(|_| LexErrorKind::IntOutOfRange)
}

fn parse_float(lex: &mut logos::Lexer<'_, RawToken>) -> Result<f64, LexErrorKind> {
    lex.slice()
        .parse::<f64>()
        .map_err(|_| LexErrorKind::BadFloat)
}

/// Decode the escapes in a quoted string slice (quotes included).
fn cook_string(slice: &str) -> Result<String, LexErrorKind> {
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            _ => return Err(LexErrorKind::BadEscape),
        }
    }
    Ok(out)
}

fn cook_terminated(lex: &mut logos::Lexer<'_, RawToken>) -> Result<String, LexErrorKind> {
    cook_string(lex.slice())
}

fn unterminated(_lex: &mut logos::Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedString)
}

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(error = LexErrorKind)]
enum RawToken {
    #[token("int")]
    KwInt,
    #[token("float")]
    KwFloat,
    #[token("string")]
    KwString,
    #[token("bool")]
    KwBool,
    #[token("nothing")]
    KwNothing,
    #[token("function")]
    Function,
    #[token("struct")]
    Struct,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("print")]
    Print,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("=")]
    Eq,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token("->")]
    Arrow,

    #[regex(r"[0-9]+", parse_int)]
    Int(i64),
    // The dot needs digits on both sides, so `1..5` lexes as
    // Int DotDot Int rather than two malformed floats.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    Float(f64),
    #[regex(r#""([^"\\\n]|\\.)*""#, cook_terminated)]
    Str(String),
    #[regex(r#""([^"\\\n]|\\.)*"#, unterminated)]
    UnterminatedStr,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Ident(String),
}

fn convert(raw: RawToken, interner: &StringInterner) -> TokenKind {
    match raw {
        RawToken::KwInt => TokenKind::KwInt,
        RawToken::KwFloat => TokenKind::KwFloat,
        RawToken::KwString => TokenKind::KwString,
        RawToken::KwBool => TokenKind::KwBool,
        RawToken::KwNothing => TokenKind::KwNothing,
        RawToken::Function => TokenKind::Function,
        RawToken::Struct => TokenKind::Struct,
        RawToken::Return => TokenKind::Return,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::For => TokenKind::For,
        RawToken::In => TokenKind::In,
        RawToken::Print => TokenKind::Print,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Bang => TokenKind::Bang,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::BangEq => TokenKind::BangEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Eq => TokenKind::Eq,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semi => TokenKind::Semi,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::DotDot => TokenKind::DotDot,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Int(n) => TokenKind::Int(n),
        RawToken::Float(x) => TokenKind::Float(x),
        RawToken::Str(s) => TokenKind::Str(interner.intern(&s)),
        RawToken::Ident(s) => TokenKind::Ident(interner.intern(&s)),
        // The callback always errors, so this arm is unreachable from
        // a successful raw token.
        RawToken::UnterminatedStr => TokenKind::Eof,
    }
}

/// Tokenize a source buffer.
///
/// Accumulates every lexical error rather than stopping at the first,
/// so the driver can report them all at once.
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, Vec<LexError>> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for (result, range) in RawToken::lexer(source).spanned() {
        let span = Span::from_range(range);
        match result {
            Ok(raw) => tokens.push(Token::new(convert(raw, interner), span)),
            Err(kind) => errors.push(LexError { kind, span }),
        }
    }

    if errors.is_empty() {
        Ok(TokenList::new(tokens))
    } else {
        Err(errors)
    }
}
