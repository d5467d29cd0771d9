//! Evaluation errors.
//!
//! Every runtime failure is an [`EvalError`]: a typed kind plus an
//! optional source span. Factory functions are the construction API;
//! call sites never spell out the enum. All kinds are fatal to the
//! current evaluation; there is no catch construct in the language,
//! so the first error propagates unchanged to the driver.

use std::fmt;

use lute_diagnostic::Diagnostic;
use lute_ir::Span;

use crate::Value;

/// Result of evaluating an expression or executing a statement.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Scope
    DuplicateBinding {
        name: String,
    },
    UndefinedVariable {
        name: String,
    },

    // Types
    TypeMismatch {
        expected: String,
        found: String,
    },
    BindingTypeMismatch {
        param: String,
        expected: String,
        found: String,
    },
    ReturnTypeMismatch {
        expected: String,
        found: String,
    },
    ElementTypeMismatch {
        expected: String,
        found: String,
    },

    // Operators
    InvalidOperand {
        op: String,
        lhs: String,
        rhs: Option<String>,
    },
    ConditionNotBool {
        found: String,
    },

    // Arithmetic
    DivisionByZero,

    // Indexing and fields
    IndexOutOfRange {
        index: i64,
        len: usize,
    },
    NotIndexable {
        found: String,
    },
    NoSuchField {
        field: String,
        ty: String,
    },
    MissingField {
        field: String,
        ty: String,
    },
    InvalidAssignTarget {
        what: String,
    },

    // Functions
    ArityExceeded {
        supplied: usize,
        remaining: usize,
    },
    UninitializedCall {
        name: String,
    },
    NotCallable {
        found: String,
    },

    // Loops and types
    NotIterable {
        found: String,
    },
    UnknownType {
        name: String,
    },

    /// A code path the parser should have made unreachable.
    Internal {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalErrorKind::DuplicateBinding { name } => {
                write!(f, "`{name}` is already declared in this scope")
            }
            EvalErrorKind::UndefinedVariable { name } => {
                write!(f, "variable `{name}` is not defined")
            }
            EvalErrorKind::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {expected}, found {found}")
            }
            EvalErrorKind::BindingTypeMismatch {
                param,
                expected,
                found,
            } => write!(
                f,
                "cannot bind parameter `{param}`: expected {expected}, found {found}"
            ),
            EvalErrorKind::ReturnTypeMismatch { expected, found } => {
                write!(f, "return type mismatch: expected {expected}, found {found}")
            }
            EvalErrorKind::ElementTypeMismatch { expected, found } => write!(
                f,
                "array element type mismatch: expected {expected}, found {found}"
            ),
            EvalErrorKind::InvalidOperand {
                op,
                lhs,
                rhs: Some(rhs),
            } => write!(f, "operator `{op}` is not defined for {lhs} and {rhs}"),
            EvalErrorKind::InvalidOperand { op, lhs, rhs: None } => {
                write!(f, "operator `{op}` is not defined for {lhs}")
            }
            EvalErrorKind::ConditionNotBool { found } => {
                write!(f, "condition must be bool, found {found}")
            }
            EvalErrorKind::DivisionByZero => write!(f, "division by zero"),
            EvalErrorKind::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            EvalErrorKind::NotIndexable { found } => {
                write!(f, "{found} cannot be indexed")
            }
            EvalErrorKind::NoSuchField { field, ty } => {
                write!(f, "{ty} has no field `{field}`")
            }
            EvalErrorKind::MissingField { field, ty } => {
                write!(f, "missing field `{field}` in literal of {ty}")
            }
            EvalErrorKind::InvalidAssignTarget { what } => {
                write!(f, "cannot assign to {what}")
            }
            EvalErrorKind::ArityExceeded {
                supplied,
                remaining,
            } => write!(
                f,
                "too many arguments: {supplied} supplied, {remaining} parameter(s) unbound"
            ),
            EvalErrorKind::UninitializedCall { name } => {
                write!(f, "function `{name}` has no body and cannot be called")
            }
            EvalErrorKind::NotCallable { found } => {
                write!(f, "{found} is not callable")
            }
            EvalErrorKind::NotIterable { found } => {
                write!(f, "for loop requires an array, found {found}")
            }
            EvalErrorKind::UnknownType { name } => {
                write!(f, "unknown type `{name}`")
            }
            EvalErrorKind::Internal { message } => {
                write!(f, "internal error: {message}")
            }
        }
    }
}

/// A runtime error with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Option<Span>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind, span: None }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach a span only if none is set; inner errors keep their
    /// more precise location.
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        let diag = Diagnostic::error(self.kind.to_string());
        match self.span {
            Some(span) => diag.with_span(span),
            None => diag,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for EvalError {}

// Factory constructors

pub fn duplicate_binding(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::DuplicateBinding {
        name: name.to_owned(),
    })
}

pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UndefinedVariable {
        name: name.to_owned(),
    })
}

pub fn type_mismatch(expected: String, found: String) -> EvalError {
    EvalError::new(EvalErrorKind::TypeMismatch { expected, found })
}

pub fn binding_type_mismatch(param: &str, expected: String, found: String) -> EvalError {
    EvalError::new(EvalErrorKind::BindingTypeMismatch {
        param: param.to_owned(),
        expected,
        found,
    })
}

pub fn return_type_mismatch(expected: String, found: String) -> EvalError {
    EvalError::new(EvalErrorKind::ReturnTypeMismatch { expected, found })
}

pub fn element_type_mismatch(expected: String, found: String) -> EvalError {
    EvalError::new(EvalErrorKind::ElementTypeMismatch { expected, found })
}

pub fn invalid_operand(op: &str, lhs: String, rhs: String) -> EvalError {
    EvalError::new(EvalErrorKind::InvalidOperand {
        op: op.to_owned(),
        lhs,
        rhs: Some(rhs),
    })
}

pub fn invalid_unary_operand(op: &str, operand: String) -> EvalError {
    EvalError::new(EvalErrorKind::InvalidOperand {
        op: op.to_owned(),
        lhs: operand,
        rhs: None,
    })
}

pub fn condition_not_bool(found: String) -> EvalError {
    EvalError::new(EvalErrorKind::ConditionNotBool { found })
}

pub fn division_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::DivisionByZero)
}

pub fn index_out_of_range(index: i64, len: usize) -> EvalError {
    EvalError::new(EvalErrorKind::IndexOutOfRange { index, len })
}

pub fn not_indexable(found: String) -> EvalError {
    EvalError::new(EvalErrorKind::NotIndexable { found })
}

pub fn no_such_field(field: &str, ty: String) -> EvalError {
    EvalError::new(EvalErrorKind::NoSuchField {
        field: field.to_owned(),
        ty,
    })
}

pub fn missing_field(field: &str, ty: String) -> EvalError {
    EvalError::new(EvalErrorKind::MissingField {
        field: field.to_owned(),
        ty,
    })
}

pub fn invalid_assign_target(what: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::InvalidAssignTarget { what: what.into() })
}

pub fn arity_exceeded(supplied: usize, remaining: usize) -> EvalError {
    EvalError::new(EvalErrorKind::ArityExceeded {
        supplied,
        remaining,
    })
}

pub fn uninitialized_call(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UninitializedCall {
        name: name.to_owned(),
    })
}

pub fn not_callable(found: String) -> EvalError {
    EvalError::new(EvalErrorKind::NotCallable { found })
}

pub fn not_iterable(found: String) -> EvalError {
    EvalError::new(EvalErrorKind::NotIterable { found })
}

pub fn unknown_type(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UnknownType {
        name: name.to_owned(),
    })
}

pub fn internal(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Internal {
        message: message.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_names_both_operand_types() {
        let err = invalid_operand("+", "int".to_owned(), "string".to_owned());
        assert_eq!(err.to_string(), "operator `+` is not defined for int and string");
    }

    #[test]
    fn or_span_keeps_inner_location() {
        let inner = division_by_zero().with_span(Span::new(5, 6));
        let kept = inner.clone().or_span(Span::new(0, 10));
        assert_eq!(kept.span, Some(Span::new(5, 6)));
        let fresh = division_by_zero().or_span(Span::new(0, 10));
        assert_eq!(fresh.span, Some(Span::new(0, 10)));
    }
}
