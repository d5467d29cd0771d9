//! Runtime values.
//!
//! A closed, tagged set of variants with exhaustive matching at every
//! consumption site. Three variants are control signals rather than
//! data: `Return`, `Break`, and `Continue` ride the normal statement
//! result channel and short-circuit statement sequences.
//!
//! Arrays and structs are the only shared-mutable values; both go
//! through [`Shared`] cells so aliases observe mutation. Everything
//! else is immutable (strings and tuples clone by reference count).

use std::rc::Rc;

use lute_ir::{Name, StringInterner};
use lute_types::Type;

use crate::errors::{element_type_mismatch, index_out_of_range, EvalError};
use crate::function::FunctionValue;
use crate::shared::Shared;

/// A Lute runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Bool(bool),
    Array(ArrayValue),
    Tuple(Rc<[Value]>),
    Struct(StructValue),
    Function(FunctionValue),
    /// The null value; the only nullable value.
    Nothing,
    /// Control signal: a `return` travelling up to its function.
    Return(Box<Value>),
    /// Control signal: `break` travelling up to its loop.
    Break,
    /// Control signal: `continue` travelling up to its loop.
    Continue,
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(items.into())
    }

    /// The value's type descriptor. A `Return` signal reports the
    /// wrapped value's type, which is what the return-type check
    /// compares against the declared return type.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Str(_) => Type::Str,
            Value::Bool(_) => Type::Bool,
            Value::Array(arr) => Type::Array(Box::new(arr.elem_type().clone())),
            Value::Tuple(items) => Type::Tuple(items.iter().map(Value::type_of).collect()),
            Value::Struct(s) => Type::Named(s.name),
            Value::Function(f) => f.type_of(),
            Value::Nothing => Type::Nothing,
            Value::Return(inner) => inner.type_of(),
            Value::Break => Type::BreakSignal,
            Value::Continue => Type::ContinueSignal,
        }
    }

    /// True for the variants that double as control signals.
    pub fn is_signal(&self) -> bool {
        matches!(self, Value::Return(_) | Value::Break | Value::Continue)
    }

    /// Only `Nothing` is nullable.
    pub fn is_nullable(&self) -> bool {
        matches!(self, Value::Nothing)
    }

    /// The null value for nullable values; `None` otherwise.
    pub fn null_value(&self) -> Option<Value> {
        self.is_nullable().then_some(Value::Nothing)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Human-readable type name for error messages.
    pub fn describe_type(&self, interner: &StringInterner) -> String {
        self.type_of().describe(interner)
    }

    /// Display string. Needs the interner because struct and function
    /// names are interned.
    pub fn render(&self, interner: &StringInterner) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Float(x) => x.to_string(),
            Value::Str(s) => s.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(arr) => {
                let items = arr.items.borrow();
                let rendered: Vec<_> = items.iter().map(|v| v.render(interner)).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Tuple(items) => {
                let rendered: Vec<_> = items.iter().map(|v| v.render(interner)).collect();
                format!("({})", rendered.join(", "))
            }
            Value::Struct(s) => {
                let fields = s.fields.borrow();
                let rendered: Vec<_> = fields
                    .iter()
                    .map(|(name, v)| {
                        format!("{}: {}", interner.lookup(*name), v.render(interner))
                    })
                    .collect();
                format!("{} {{ {} }}", interner.lookup(s.name), rendered.join(", "))
            }
            Value::Function(f) => f.render(interner),
            Value::Nothing => "nothing".to_owned(),
            Value::Return(inner) => format!("<return {}>", inner.render(interner)),
            Value::Break => "<break>".to_owned(),
            Value::Continue => "<continue>".to_owned(),
        }
    }
}

/// Structural equality for tests and assertions.
///
/// This is stricter than the language's `==` operator: no numeric
/// coercion across variants, and function values compare by identity
/// of their bodies. The operator semantics live in `operators.rs`.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => *a.items.borrow() == *b.items.borrow(),
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => {
                a.name == b.name && *a.fields.borrow() == *b.fields.borrow()
            }
            (Value::Function(a), Value::Function(b)) => a.same_definition(b),
            (Value::Nothing, Value::Nothing) => true,
            (Value::Return(a), Value::Return(b)) => a == b,
            (Value::Break, Value::Break) => true,
            (Value::Continue, Value::Continue) => true,
            _ => false,
        }
    }
}

/// An array: shared mutable element list plus the declared element
/// type. The element type is enforced at mutation, not just at
/// construction.
#[derive(Clone, Debug)]
pub struct ArrayValue {
    elem: Rc<Type>,
    items: Shared<Vec<Value>>,
}

impl ArrayValue {
    pub fn new(elem: Type, items: Vec<Value>) -> Self {
        ArrayValue {
            elem: Rc::new(elem),
            items: Shared::new(items),
        }
    }

    pub fn elem_type(&self) -> &Type {
        &self.elem
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Clone of the current elements, used by `for` loops to iterate
    /// over a snapshot.
    pub fn snapshot(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    pub fn get(&self, index: i64) -> Result<Value, EvalError> {
        let items = self.items.borrow();
        usize::try_from(index)
            .ok()
            .and_then(|i| items.get(i))
            .cloned()
            .ok_or_else(|| index_out_of_range(index, items.len()))
    }

    /// Replace one element, enforcing bounds and the declared element
    /// type.
    pub fn set(
        &self,
        index: i64,
        value: Value,
        table: &lute_types::TypeTable,
        interner: &StringInterner,
    ) -> Result<(), EvalError> {
        if !lute_types::type_eq(&self.elem, &value.type_of(), table) {
            return Err(element_type_mismatch(
                self.elem.describe(interner),
                value.describe_type(interner),
            ));
        }
        let mut items = self.items.borrow_mut();
        let len = items.len();
        match usize::try_from(index).ok().and_then(|i| items.get_mut(i)) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(index_out_of_range(index, len)),
        }
    }
}

/// A struct instance: type name plus shared mutable fields in
/// declaration order.
#[derive(Clone, Debug)]
pub struct StructValue {
    pub name: Name,
    fields: Shared<Vec<(Name, Value)>>,
}

impl StructValue {
    pub fn new(name: Name, fields: Vec<(Name, Value)>) -> Self {
        StructValue {
            name,
            fields: Shared::new(fields),
        }
    }

    pub fn get_field(&self, field: Name) -> Option<Value> {
        self.fields
            .borrow()
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, v)| v.clone())
    }

    pub fn set_field(&self, field: Name, value: Value) -> bool {
        let mut fields = self.fields.borrow_mut();
        match fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Fields in declaration order (cloned snapshot).
    pub fn fields(&self) -> Vec<(Name, Value)> {
        self.fields.borrow().clone()
    }
}
