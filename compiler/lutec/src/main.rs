//! Lute interpreter CLI.

use std::process::ExitCode;

use lutec::{commands, repl};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    match args[1].as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: lute run <file.lute>");
                return ExitCode::FAILURE;
            }
            commands::run_file(&args[2])
        }
        "repl" => repl::run(),
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: lute lex <file.lute>");
                return ExitCode::FAILURE;
            }
            commands::lex_file(&args[2])
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: lute parse <file.lute>");
                return ExitCode::FAILURE;
            }
            commands::parse_file(&args[2])
        }
        "resolve" => {
            if args.len() < 3 {
                eprintln!("Usage: lute resolve <file.lute>");
                return ExitCode::FAILURE;
            }
            commands::resolve_file(&args[2])
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        other => {
            eprintln!("error: unknown command `{other}`");
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Lute - a small expression-oriented scripting language");
    eprintln!();
    eprintln!("Usage: lute <command> [arguments]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <file.lute>      Execute a source file");
    eprintln!("  repl                 Start an interactive session");
    eprintln!("  lex <file.lute>      Dump the token stream");
    eprintln!("  parse <file.lute>    Dump the syntax tree");
    eprintln!("  resolve <file.lute>  Dump the scope depth table");
    eprintln!("  help                 Show this message");
    eprintln!();
    eprintln!("Set RUST_LOG=debug for pipeline tracing.");
}
