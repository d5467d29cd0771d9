//! Interactive read-eval-print loop.
//!
//! One evaluator lives for the whole session, so declarations, struct
//! types, and function values persist across lines. Errors print and
//! the loop resumes at the next line.

use std::io::{BufRead, Write};
use std::process::ExitCode;

use lute_eval::{Evaluator, Program, Value};
use lute_ir::SharedInterner;

use crate::{compile, report};

const PROMPT: &str = "lute> ";

/// `lute repl`: evaluate stdin line by line until `:quit` or EOF.
pub fn run() -> ExitCode {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let interner = SharedInterner::new();
    let mut evaluator = Evaluator::new(interner.clone());

    println!("Lute interactive session. :env dumps scopes, :quit exits.");
    loop {
        print!("{PROMPT}");
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        match line.trim() {
            "" => continue,
            ":quit" => break,
            ":env" => {
                print!("{}", evaluator.format_environment());
                continue;
            }
            _ => {}
        }

        eval_line(&line, &interner, &mut evaluator);
    }
    ExitCode::SUCCESS
}

fn eval_line(source: &str, interner: &SharedInterner, evaluator: &mut Evaluator) {
    let (module, resolution) = match compile(source, interner) {
        Ok(output) => output,
        Err(diagnostics) => {
            report(&diagnostics, source);
            return;
        }
    };
    report(&resolution.diagnostics, source);

    let program = Program::new(module, resolution);
    let (value, errors) = evaluator.evaluate(&program);

    if errors.is_empty() {
        // Echo the result unless the line was pure statement noise.
        if !matches!(value, Value::Nothing) {
            println!("{}", evaluator.render_value(&value));
        }
    } else {
        for error in errors {
            eprint!(
                "{}",
                lute_diagnostic::render(&error.into_diagnostic(), source)
            );
        }
    }
}
