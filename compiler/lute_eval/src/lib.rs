//! Lute Eval: runtime core of the Lute interpreter.
//!
//! Everything that happens after parsing and resolution lives here:
//!
//! - `Value`: the closed set of runtime value variants, three of
//!   which (`Return`/`Break`/`Continue`) double as control signals
//! - `Environment`: chained variable scopes as a frame arena
//! - `FunctionValue`: curried functions with persistent copy-on-bind
//! - `evaluate_binary`/`evaluate_unary`: operator dispatch
//! - `Evaluator`: the per-run context that executes programs
//!
//! Evaluation is single-threaded, strictly synchronous, and
//! depth-first recursive; there is no concurrency, suspension, or
//! error recovery anywhere in this crate.

mod environment;
pub mod errors;
mod evaluator;
mod function;
mod operators;
mod print_handler;
mod shared;
mod value;

#[cfg(test)]
mod tests;

pub use environment::{EnvError, Environment, FrameId, Slot};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use evaluator::{Evaluator, Program};
pub use function::{FunctionBody, FunctionValue, ParamSpec};
pub use operators::{evaluate_binary, evaluate_unary, value_eq};
pub use print_handler::{BufferPrintHandler, PrintHandler, StdoutPrintHandler};
pub use shared::Shared;
pub use value::{ArrayValue, StructValue, Value};
