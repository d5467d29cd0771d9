//! End-to-end evaluator tests.
//!
//! These drive real source text through lex → parse → resolve →
//! evaluate, with a buffer print handler so output is assertable.

#![expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]

mod types_tests;

use std::rc::Rc;

use lute_ir::SharedInterner;

use crate::{BufferPrintHandler, EvalError, Evaluator, Program, Value};

/// A pipeline session: one evaluator fed any number of source units,
/// the way the REPL uses it.
pub(crate) struct Session {
    interner: SharedInterner,
    evaluator: Evaluator,
    buffer: BufferPrintHandler,
}

impl Session {
    pub(crate) fn new() -> Self {
        let interner = SharedInterner::new();
        let buffer = BufferPrintHandler::new();
        let evaluator =
            Evaluator::with_print_handler(interner.clone(), Rc::new(buffer.clone()));
        Session {
            interner,
            evaluator,
            buffer,
        }
    }

    pub(crate) fn run(&mut self, source: &str) -> (Value, Vec<EvalError>) {
        let tokens = lute_lexer::lex(source, &self.interner).unwrap();
        let module = lute_parse::parse(&tokens, &self.interner).unwrap();
        let resolution = lute_resolve::resolve(&module, &self.interner);
        assert!(
            resolution.diagnostics.is_empty(),
            "unexpected resolver findings: {:?}",
            resolution.diagnostics
        );
        let program = Program::new(module, resolution);
        self.evaluator.evaluate(&program)
    }

    pub(crate) fn output(&self) -> Vec<String> {
        self.buffer.lines()
    }

    pub(crate) fn dump(&self) -> String {
        self.evaluator.format_environment()
    }
}

/// Evaluate one source unit, expecting success; returns the final
/// value and everything printed.
pub(crate) fn eval_source(source: &str) -> (Value, Vec<String>) {
    let mut session = Session::new();
    let (value, errors) = session.run(source);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    (value, session.output())
}

/// Evaluate one source unit, returning just the final value.
pub(crate) fn eval_ok(source: &str) -> Value {
    eval_source(source).0
}

/// Evaluate one source unit, expecting exactly one error.
pub(crate) fn eval_err(source: &str) -> EvalError {
    let mut session = Session::new();
    let (_, mut errors) = session.run(source);
    assert_eq!(errors.len(), 1, "expected one error for {source:?}");
    errors.remove(0)
}

mod pipeline {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn last_statement_value_is_the_result() {
        assert_eq!(eval_ok("1 + 1; 2 + 2;"), Value::Int(4));
    }

    #[test]
    fn empty_program_yields_nothing() {
        assert_eq!(eval_ok(""), Value::Nothing);
    }

    #[test]
    fn print_goes_through_the_handler() {
        let (_, output) = eval_source("print(1 + 2); print(\"hi\");");
        assert_eq!(output, vec!["3", "hi"]);
    }

    #[test]
    fn evaluating_twice_fresh_is_identical() {
        let source = "\
            int total = 0;\n\
            for (n in [1..5]) { total = total + n; }\n\
            print(total);\n\
            total;";
        let (first_value, first_output) = eval_source(source);
        let (second_value, second_output) = eval_source(source);
        assert_eq!(first_value, second_value);
        assert_eq!(first_output, second_output);
        assert_eq!(first_value, Value::Int(10));
    }

    #[test]
    fn errors_abort_at_the_first_failing_statement() {
        let mut session = Session::new();
        let (_, errors) = session.run("print(1); 1 / 0; print(2);");
        assert_eq!(errors.len(), 1);
        // The failing statement aborted everything after it.
        assert_eq!(session.output(), vec!["1"]);
    }

    #[test]
    fn session_state_persists_across_runs() {
        let mut session = Session::new();
        session.run("int counter = 10;");
        session.run("counter = counter + 5;");
        let (value, errors) = session.run("counter;");
        assert!(errors.is_empty());
        assert_eq!(value, Value::Int(15));
    }

    #[test]
    fn functions_survive_their_source_line() {
        let mut session = Session::new();
        session.run("function triple(int n) -> int { return n * 3; }");
        let (value, errors) = session.run("triple(7);");
        assert!(errors.is_empty());
        assert_eq!(value, Value::Int(21));
    }

    #[test]
    fn environment_dump_has_three_columns() {
        let mut session = Session::new();
        session.run("int answer = 42; string who = \"deep thought\";");
        let dump = session.dump();
        assert!(dump.contains("type"), "missing header: {dump}");
        assert!(dump.contains("global"));
        assert!(dump.contains("answer"));
        assert!(dump.contains("42"));
        assert!(dump.contains("deep thought"));
        // Fixed-width columns: the type column pads to a shared width.
        let answer_line = dump
            .lines()
            .find(|line| line.contains("answer"))
            .unwrap();
        let who_line = dump.lines().find(|line| line.contains("who")).unwrap();
        assert_eq!(
            answer_line.find("answer"),
            who_line.find("who"),
            "name column must align:\n{dump}"
        );
    }
}
