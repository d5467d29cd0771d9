//! Lute CLI library: the command implementations behind the `lute`
//! binary.

pub mod commands;
pub mod repl;

use lute_diagnostic::Diagnostic;
use lute_ir::{Module, SharedInterner};
use lute_resolve::Resolution;

/// Run source text through lex → parse → resolve.
///
/// Lex and parse failures are fatal and come back as diagnostics.
/// Resolver findings are part of the successful result; resolution
/// never fails fatally, and the driver decides how loudly to report
/// them.
pub fn compile(
    source: &str,
    interner: &SharedInterner,
) -> Result<(Module, Resolution), Vec<Diagnostic>> {
    let tokens = lute_lexer::lex(source, interner).map_err(|errors| {
        errors
            .into_iter()
            .map(|e| Diagnostic::error(e.kind.to_string()).with_span(e.span))
            .collect::<Vec<_>>()
    })?;

    let module = lute_parse::parse(&tokens, interner).map_err(|e| vec![e.into_diagnostic()])?;
    let resolution = lute_resolve::resolve(&module, interner);
    Ok((module, resolution))
}

/// Print a batch of diagnostics against the source that produced
/// them.
pub fn report(diagnostics: &[Diagnostic], source: &str) {
    for diag in diagnostics {
        eprint!("{}", lute_diagnostic::render(diag, source));
    }
}
