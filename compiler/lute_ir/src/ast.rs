//! Arena-allocated syntax tree.
//!
//! All child links are `u32` index newtypes into a [`Module`] arena
//! rather than boxes. Node identity (the arena id) is what the scope
//! resolver keys its depth table on, so ids must never be reused
//! within one module.
//!
//! Sequences (argument lists, statement bodies) are stored as ranges
//! into dedicated side tables, keeping node variants `Copy`.

use std::fmt;

use crate::{Name, Span, Spanned};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

macro_rules! arena_range {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                $name { start, len }
            }

            #[inline]
            pub const fn is_empty(self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(self) -> usize {
                self.len as usize
            }

            #[inline]
            fn as_range(self) -> std::ops::Range<usize> {
                let start = self.start as usize;
                start..start + self.len as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!(stringify!($name), "({}..{})"),
                    self.start,
                    self.start + self.len
                )
            }
        }
    };
}

arena_id!(
    /// Index of an expression node in a [`Module`].
    ExprId
);
arena_id!(
    /// Index of a statement node in a [`Module`].
    StmtId
);
arena_id!(
    /// Index of a parsed type annotation in a [`Module`].
    TypeExprId
);

arena_range!(
    /// Range into the expression-list side table.
    ExprRange
);
arena_range!(
    /// Range into the statement-list side table.
    StmtRange
);
arena_range!(
    /// Range into the parameter side table.
    ParamRange
);
arena_range!(
    /// Range into the struct-field-definition side table.
    FieldRange
);
arena_range!(
    /// Range into the struct-literal-initializer side table.
    FieldInitRange
);
arena_range!(
    /// Range into the type-annotation-list side table.
    TypeExprRange
);

/// Binary operators.
///
/// `Sub` and `NotEq` exist only so the parser's desugaring obligation
/// is visible in the type: `a - b` parses as `a + (-b)` and `a != b`
/// as `!(a == b)`, so neither variant reaches the evaluator from a
/// correct parse.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    /// Operator glyph for error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// Expression node.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// Expression variants.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// Integer literal: `42`
    Int(i64),
    /// Float literal: `2.5`
    Float(f64),
    /// String literal (cooked and interned)
    Str(Name),
    /// Boolean literal: `true`, `false`
    Bool(bool),
    /// The null literal: `nothing`
    Nothing,
    /// Variable reference. The resolver keys its depth table on this
    /// node's `ExprId`; assignment targets are `Ident` nodes too.
    Ident(Name),
    /// Unary operation: `-a`, `!a`
    Unary { op: UnaryOp, operand: ExprId },
    /// Binary operation: `a + b`
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// Function application: `f(a, b)`. Binds arguments (curried);
    /// invokes the body once no unbound parameters remain.
    Call { callee: ExprId, args: ExprRange },
    /// Index access: `a[i]`
    Index { receiver: ExprId, index: ExprId },
    /// Field access: `p.x`
    Field { receiver: ExprId, field: Name },
    /// Array literal: `[a, b, c]`
    ArrayLit(ExprRange),
    /// Range constructor: `[a..b]`, half-open over ints.
    Range { start: ExprId, end: ExprId },
    /// Tuple literal: `(a, b)`, two or more elements.
    TupleLit(ExprRange),
    /// Struct literal: `Point { x: 1, y: 2 }`
    StructLit { name: Name, fields: FieldInitRange },
}

/// Statement node.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// Statement variants.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// Expression statement: `e;`
    Expr(ExprId),
    /// Variable declaration: `int x;` / `int x = e;`
    ///
    /// Without an initializer the slot takes the type's default value.
    Declare {
        ty: TypeExprId,
        name: Name,
        init: Option<ExprId>,
    },
    /// Assignment: `lvalue = e;` where the target parses as a name,
    /// index expression, or field access.
    Assign { target: ExprId, value: ExprId },
    /// Function declaration. The name binds in the enclosing scope;
    /// parameters and body share one inner scope.
    Function {
        name: Name,
        params: ParamRange,
        ret: TypeExprId,
        body: StmtRange,
    },
    /// Struct type declaration.
    StructDecl { name: Name, fields: FieldRange },
    /// Conditional. An `else if` chain parses as an `else` body
    /// containing a single nested `If`.
    If {
        cond: ExprId,
        then_body: StmtRange,
        else_body: Option<StmtRange>,
    },
    /// While loop.
    While { cond: ExprId, body: StmtRange },
    /// For-in loop over an array; `binding` is declared in a fresh
    /// frame each iteration.
    For {
        binding: Name,
        iter: ExprId,
        body: StmtRange,
    },
    /// Return from the current function: `return;` / `return e;`
    Return(Option<ExprId>),
    Break,
    Continue,
    /// `print(e);`
    Print(ExprId),
    /// Bare block: `{ ... }`
    Block(StmtRange),
}

/// Function parameter: declared type + name.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: TypeExprId,
    pub span: Span,
}

/// Struct field declaration: declared type + name.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FieldDef {
    pub name: Name,
    pub ty: TypeExprId,
    pub span: Span,
}

/// Struct literal initializer: `name: value`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FieldInit {
    pub name: Name,
    pub value: ExprId,
    pub span: Span,
}

/// Parsed type annotation.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        TypeExpr { kind, span }
    }
}

/// Type annotation variants. Lowered to `lute_types::Type` by the
/// evaluator; `Named` stays symbolic until structural comparison.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum TypeExprKind {
    Int,
    Float,
    Str,
    Bool,
    Nothing,
    /// `T[]`
    Array(TypeExprId),
    /// `(T, U, ...)`, two or more elements.
    Tuple(TypeExprRange),
    /// `function(T, ...) -> R`
    Function {
        params: TypeExprRange,
        ret: TypeExprId,
    },
    /// Bare identifier: a struct (or otherwise named) type.
    Named(Name),
}

/// One parsed source unit: arena storage plus the top-level statement
/// list. The REPL produces one module per input line.
#[derive(Debug, Default)]
pub struct Module {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    type_exprs: Vec<TypeExpr>,

    // Side tables for sequences. Children are allocated before their
    // parent, so child ids are contiguous here even though the node
    // arenas interleave.
    expr_lists: Vec<ExprId>,
    stmt_lists: Vec<StmtId>,
    type_expr_lists: Vec<TypeExprId>,
    params: Vec<Param>,
    field_defs: Vec<FieldDef>,
    field_inits: Vec<FieldInit>,

    top_level: StmtRange,
}

impl Module {
    pub fn new() -> Self {
        Module::default()
    }

    // Allocation (used by the parser)

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(u32::try_from(self.exprs.len()).unwrap_or(u32::MAX));
        self.exprs.push(expr);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(u32::try_from(self.stmts.len()).unwrap_or(u32::MAX));
        self.stmts.push(stmt);
        id
    }

    pub fn alloc_type_expr(&mut self, ty: TypeExpr) -> TypeExprId {
        let id = TypeExprId::new(u32::try_from(self.type_exprs.len()).unwrap_or(u32::MAX));
        self.type_exprs.push(ty);
        id
    }

    pub fn alloc_expr_list(&mut self, items: Vec<ExprId>) -> ExprRange {
        let start = u32::try_from(self.expr_lists.len()).unwrap_or(u32::MAX);
        let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
        self.expr_lists.extend(items);
        ExprRange::new(start, len)
    }

    pub fn alloc_stmt_list(&mut self, items: Vec<StmtId>) -> StmtRange {
        let start = u32::try_from(self.stmt_lists.len()).unwrap_or(u32::MAX);
        let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
        self.stmt_lists.extend(items);
        StmtRange::new(start, len)
    }

    pub fn alloc_type_expr_list(&mut self, items: Vec<TypeExprId>) -> TypeExprRange {
        let start = u32::try_from(self.type_expr_lists.len()).unwrap_or(u32::MAX);
        let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
        self.type_expr_lists.extend(items);
        TypeExprRange::new(start, len)
    }

    pub fn alloc_params(&mut self, items: Vec<Param>) -> ParamRange {
        let start = u32::try_from(self.params.len()).unwrap_or(u32::MAX);
        let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
        self.params.extend(items);
        ParamRange::new(start, len)
    }

    pub fn alloc_field_defs(&mut self, items: Vec<FieldDef>) -> FieldRange {
        let start = u32::try_from(self.field_defs.len()).unwrap_or(u32::MAX);
        let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
        self.field_defs.extend(items);
        FieldRange::new(start, len)
    }

    pub fn alloc_field_inits(&mut self, items: Vec<FieldInit>) -> FieldInitRange {
        let start = u32::try_from(self.field_inits.len()).unwrap_or(u32::MAX);
        let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
        self.field_inits.extend(items);
        FieldInitRange::new(start, len)
    }

    pub fn set_top_level(&mut self, range: StmtRange) {
        self.top_level = range;
    }

    // Access (used by every later phase)

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn type_expr(&self, id: TypeExprId) -> &TypeExpr {
        &self.type_exprs[id.index()]
    }

    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.as_range()]
    }

    #[inline]
    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.as_range()]
    }

    #[inline]
    pub fn type_expr_list(&self, range: TypeExprRange) -> &[TypeExprId] {
        &self.type_expr_lists[range.as_range()]
    }

    #[inline]
    pub fn param_list(&self, range: ParamRange) -> &[Param] {
        &self.params[range.as_range()]
    }

    #[inline]
    pub fn field_def_list(&self, range: FieldRange) -> &[FieldDef] {
        &self.field_defs[range.as_range()]
    }

    #[inline]
    pub fn field_init_list(&self, range: FieldInitRange) -> &[FieldInit] {
        &self.field_inits[range.as_range()]
    }

    #[inline]
    pub fn top_level(&self) -> StmtRange {
        self.top_level
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn alloc_and_read_back() {
        let mut m = Module::new();
        let a = m.alloc_expr(Expr::new(ExprKind::Int(1), Span::new(0, 1)));
        let b = m.alloc_expr(Expr::new(ExprKind::Int(2), Span::new(2, 3)));
        assert_ne!(a, b);
        assert_eq!(m.expr(a).kind, ExprKind::Int(1));
        assert_eq!(m.expr(b).kind, ExprKind::Int(2));
    }

    #[test]
    fn expr_lists_are_contiguous() {
        let mut m = Module::new();
        let a = m.alloc_expr(Expr::new(ExprKind::Int(1), Span::DUMMY));
        let b = m.alloc_expr(Expr::new(ExprKind::Int(2), Span::DUMMY));
        let range = m.alloc_expr_list(vec![a, b]);
        assert_eq!(m.expr_list(range), &[a, b]);
        let other = m.alloc_expr_list(vec![b]);
        assert_eq!(m.expr_list(other), &[b]);
        assert_eq!(m.expr_list(range), &[a, b]);
    }

    #[test]
    fn empty_range_reads_empty_slice() {
        let m = Module::new();
        assert_eq!(m.stmt_list(StmtRange::EMPTY), &[] as &[StmtId]);
    }
}
