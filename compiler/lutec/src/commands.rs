//! File-driven commands: `run`, `lex`, `parse`, `resolve`.

use std::process::ExitCode;

use lute_eval::{Evaluator, Program};
use lute_ir::SharedInterner;

use crate::{compile, report};

fn read_source(path: &str) -> Result<String, ExitCode> {
    std::fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read `{path}`: {e}");
        ExitCode::FAILURE
    })
}

/// `lute run <file>`: full pipeline, then execute.
pub fn run_file(path: &str) -> ExitCode {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let interner = SharedInterner::new();
    let (module, resolution) = match compile(&source, &interner) {
        Ok(output) => output,
        Err(diagnostics) => {
            report(&diagnostics, &source);
            return ExitCode::FAILURE;
        }
    };

    // Resolver findings do not stop execution, but the user sees
    // them before any output.
    report(&resolution.diagnostics, &source);

    let program = Program::new(module, resolution);
    let mut evaluator = Evaluator::new(interner);
    let (_, errors) = evaluator.evaluate(&program);

    if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        for error in errors {
            eprint!(
                "{}",
                lute_diagnostic::render(&error.into_diagnostic(), &source)
            );
        }
        ExitCode::FAILURE
    }
}

/// `lute lex <file>`: dump the token stream.
pub fn lex_file(path: &str) -> ExitCode {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let interner = SharedInterner::new();
    match lute_lexer::lex(&source, &interner) {
        Ok(tokens) => {
            for token in tokens.iter() {
                println!("{:?} @ {:?}", token.kind, token.span);
            }
            ExitCode::SUCCESS
        }
        Err(errors) => {
            for error in errors {
                let diag = lute_diagnostic::Diagnostic::error(error.kind.to_string())
                    .with_span(error.span);
                eprint!("{}", lute_diagnostic::render(&diag, &source));
            }
            ExitCode::FAILURE
        }
    }
}

/// `lute parse <file>`: dump the statement tree (debug form).
pub fn parse_file(path: &str) -> ExitCode {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let interner = SharedInterner::new();
    match compile(&source, &interner) {
        Ok((module, _)) => {
            for &stmt in module.stmt_list(module.top_level()) {
                println!("{:#?}", module.stmt(stmt));
            }
            ExitCode::SUCCESS
        }
        Err(diagnostics) => {
            report(&diagnostics, &source);
            ExitCode::FAILURE
        }
    }
}

/// `lute resolve <file>`: dump the depth table.
pub fn resolve_file(path: &str) -> ExitCode {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let interner = SharedInterner::new();
    match compile(&source, &interner) {
        Ok((module, resolution)) => {
            report(&resolution.diagnostics, &source);
            let mut entries: Vec<_> = resolution.depths.iter().collect();
            entries.sort_by_key(|(id, _)| **id);
            for (id, depth) in entries {
                let expr = module.expr(*id);
                println!("{:?} @ {:?} -> depth {depth}", expr.kind, expr.span);
            }
            ExitCode::SUCCESS
        }
        Err(diagnostics) => {
            report(&diagnostics, &source);
            ExitCode::FAILURE
        }
    }
}
