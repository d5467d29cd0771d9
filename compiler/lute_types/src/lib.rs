//! Structural type model for Lute.
//!
//! Types are compared by shape, not by declaration site. The only
//! nominal ingredient is the struct name, which participates in struct
//! equality alongside the field set. `Named` types are symbolic
//! references resolved through a [`TypeTable`] at comparison time; an
//! unresolved `Named` compares equal to nothing, itself included.

use std::fmt;

use lute_ir::{Name, StringInterner};
use rustc_hash::FxHashMap;

/// A Lute type descriptor.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Type {
    Int,
    Float,
    Str,
    Bool,
    /// The type of the `nothing` value. The one nullable type.
    Nothing,
    /// Internal type of the `break` control signal.
    BreakSignal,
    /// Internal type of the `continue` control signal.
    ContinueSignal,
    /// Homogeneous array with a declared element type.
    Array(Box<Type>),
    /// Ordered composite of two or more element types.
    Tuple(Vec<Type>),
    /// Operation type: ordered parameter types plus a return type.
    Function { params: Vec<Type>, ret: Box<Type> },
    /// Struct type: name plus field name/type pairs in declaration
    /// order. Field order does not matter for equality.
    Struct {
        name: Name,
        fields: Vec<(Name, Type)>,
    },
    /// Forward reference to a type registered (or not yet registered)
    /// in a [`TypeTable`].
    Named(Name),
}

impl Type {
    /// Shorthand for an array of `elem`.
    pub fn array(elem: Type) -> Type {
        Type::Array(Box::new(elem))
    }

    /// Shorthand for a function type.
    pub fn function(params: Vec<Type>, ret: Type) -> Type {
        Type::Function {
            params,
            ret: Box::new(ret),
        }
    }

    /// True for the control-signal types, which never appear in
    /// declarations or bindings.
    pub fn is_signal(&self) -> bool {
        matches!(self, Type::BreakSignal | Type::ContinueSignal)
    }

    /// Render for error messages and the environment dump.
    pub fn describe(&self, interner: &StringInterner) -> String {
        match self {
            Type::Int => "int".to_owned(),
            Type::Float => "float".to_owned(),
            Type::Str => "string".to_owned(),
            Type::Bool => "bool".to_owned(),
            Type::Nothing => "nothing".to_owned(),
            Type::BreakSignal => "<break>".to_owned(),
            Type::ContinueSignal => "<continue>".to_owned(),
            Type::Array(elem) => format!("{}[]", elem.describe(interner)),
            Type::Tuple(elems) => {
                let inner: Vec<_> = elems.iter().map(|t| t.describe(interner)).collect();
                format!("({})", inner.join(", "))
            }
            Type::Function { params, ret } => {
                let inner: Vec<_> = params.iter().map(|t| t.describe(interner)).collect();
                format!("function({}) -> {}", inner.join(", "), ret.describe(interner))
            }
            Type::Struct { name, .. } | Type::Named(name) => interner.lookup(*name).to_owned(),
        }
    }
}

/// Registry of named types, populated from struct declarations.
#[derive(Default, Debug)]
pub struct TypeTable {
    entries: FxHashMap<Name, Type>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable::default()
    }

    /// Register a named type. Later registrations win, which is what
    /// the REPL wants when a struct is re-declared.
    pub fn insert(&mut self, name: Name, ty: Type) {
        self.entries.insert(name, ty);
    }

    pub fn get(&self, name: Name) -> Option<&Type> {
        self.entries.get(&name)
    }

    /// Chase `Named` links until a concrete type or a dead end.
    ///
    /// The hop limit bounds pathological `Named` cycles; real programs
    /// resolve in one hop.
    pub fn resolve<'a>(&'a self, ty: &'a Type) -> Option<&'a Type> {
        let mut current = ty;
        for _ in 0..32 {
            match current {
                Type::Named(name) => current = self.entries.get(name)?,
                concrete => return Some(concrete),
            }
        }
        None
    }
}

/// Structural type equality.
///
/// Variant tags must match and substructure must be recursively equal.
/// Function equality additionally requires equal parameter-list
/// length (implied by elementwise comparison). `Named` operands are
/// resolved first; if either side fails to resolve the answer is
/// `false` regardless of the other side.
pub fn type_eq(a: &Type, b: &Type, table: &TypeTable) -> bool {
    let (Some(a), Some(b)) = (table.resolve(a), table.resolve(b)) else {
        return false;
    };

    match (a, b) {
        (Type::Int, Type::Int)
        | (Type::Float, Type::Float)
        | (Type::Str, Type::Str)
        | (Type::Bool, Type::Bool)
        | (Type::Nothing, Type::Nothing)
        | (Type::BreakSignal, Type::BreakSignal)
        | (Type::ContinueSignal, Type::ContinueSignal) => true,

        (Type::Array(ea), Type::Array(eb)) => type_eq(ea, eb, table),

        (Type::Tuple(xs), Type::Tuple(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(x, y)| type_eq(x, y, table))
        }

        (
            Type::Function {
                params: pa,
                ret: ra,
            },
            Type::Function {
                params: pb,
                ret: rb,
            },
        ) => {
            pa.len() == pb.len()
                && pa
                    .iter()
                    .zip(pb.iter())
                    .all(|(x, y)| type_eq(x, y, table))
                && type_eq(ra, rb, table)
        }

        (
            Type::Struct {
                name: na,
                fields: fa,
            },
            Type::Struct {
                name: nb,
                fields: fb,
            },
        ) => {
            if na != nb || fa.len() != fb.len() {
                return false;
            }
            // Exact field-set equality: every field of one side must
            // exist on the other with a structurally equal type.
            fa.iter().all(|(name, ta)| {
                fb.iter()
                    .find(|(other, _)| other == name)
                    .is_some_and(|(_, tb)| type_eq(ta, tb, table))
            })
        }

        _ => false,
    }
}

impl fmt::Display for Type {
    /// Interner-free rendering; struct and named types show a
    /// placeholder. Use [`Type::describe`] where an interner is
    /// available.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Str => write!(f, "string"),
            Type::Bool => write!(f, "bool"),
            Type::Nothing => write!(f, "nothing"),
            Type::BreakSignal => write!(f, "<break>"),
            Type::ContinueSignal => write!(f, "<continue>"),
            Type::Array(elem) => write!(f, "{elem}[]"),
            Type::Tuple(elems) => {
                write!(f, "(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, ")")
            }
            Type::Function { params, ret } => {
                write!(f, "function(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")
            }
            Type::Struct { .. } => write!(f, "<struct>"),
            Type::Named(_) => write!(f, "<named>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> TypeTable {
        TypeTable::new()
    }

    #[test]
    fn equality_is_reflexive_and_symmetric() {
        let t = table();
        let samples = [
            Type::Int,
            Type::Float,
            Type::array(Type::Int),
            Type::Tuple(vec![Type::Int, Type::Str]),
            Type::function(vec![Type::Int, Type::Int], Type::Bool),
        ];
        for a in &samples {
            assert!(type_eq(a, a, &t), "{a} should equal itself");
            for b in &samples {
                assert_eq!(type_eq(a, b, &t), type_eq(b, a, &t));
            }
        }
    }

    #[test]
    fn array_equality_recurses_on_element() {
        let t = table();
        assert!(type_eq(
            &Type::array(Type::Int),
            &Type::array(Type::Int),
            &t
        ));
        assert!(!type_eq(
            &Type::array(Type::Int),
            &Type::array(Type::Float),
            &t
        ));
    }

    #[test]
    fn function_arity_is_part_of_equality() {
        let t = table();
        let two = Type::function(vec![Type::Int, Type::Int], Type::Bool);
        let one = Type::function(vec![Type::Int], Type::Bool);
        assert!(!type_eq(&two, &one, &t));
        assert!(type_eq(
            &two,
            &Type::function(vec![Type::Int, Type::Int], Type::Bool),
            &t
        ));
    }

    #[test]
    fn tuple_equality_is_ordered() {
        let t = table();
        let a = Type::Tuple(vec![Type::Int, Type::Str]);
        let b = Type::Tuple(vec![Type::Str, Type::Int]);
        assert!(!type_eq(&a, &b, &t));
    }

    #[test]
    fn struct_equality_requires_name_and_fields() {
        let t = table();
        let x = Name::from_raw(1);
        let y = Name::from_raw(2);
        let point = Name::from_raw(3);
        let other = Name::from_raw(4);

        let a = Type::Struct {
            name: point,
            fields: vec![(x, Type::Int), (y, Type::Int)],
        };
        // Field order must not matter.
        let b = Type::Struct {
            name: point,
            fields: vec![(y, Type::Int), (x, Type::Int)],
        };
        let renamed = Type::Struct {
            name: other,
            fields: vec![(x, Type::Int), (y, Type::Int)],
        };
        let retyped = Type::Struct {
            name: point,
            fields: vec![(x, Type::Int), (y, Type::Float)],
        };

        assert!(type_eq(&a, &b, &t));
        assert!(!type_eq(&a, &renamed, &t));
        assert!(!type_eq(&a, &retyped, &t));
    }

    #[test]
    fn named_resolves_through_table() {
        let mut t = table();
        let point = Name::from_raw(1);
        let x = Name::from_raw(2);
        let concrete = Type::Struct {
            name: point,
            fields: vec![(x, Type::Int)],
        };
        t.insert(point, concrete.clone());

        assert!(type_eq(&Type::Named(point), &concrete, &t));
        assert!(type_eq(&Type::Named(point), &Type::Named(point), &t));
    }

    #[test]
    fn unresolved_named_equals_nothing_not_even_itself() {
        let t = table();
        let ghost = Name::from_raw(9);
        assert!(!type_eq(&Type::Named(ghost), &Type::Named(ghost), &t));
        assert!(!type_eq(&Type::Named(ghost), &Type::Int, &t));
    }

    #[test]
    fn int_and_float_stay_distinct() {
        let t = table();
        assert!(!type_eq(&Type::Int, &Type::Float, &t));
    }

    #[test]
    fn describe_renders_shapes() {
        let interner = StringInterner::new();
        assert_eq!(Type::array(Type::Int).describe(&interner), "int[]");
        assert_eq!(
            Type::function(vec![Type::Int], Type::Float).describe(&interner),
            "function(int) -> float"
        );
        assert_eq!(
            Type::Tuple(vec![Type::Int, Type::Str]).describe(&interner),
            "(int, string)"
        );
    }
}
