//! Function values with persistent curried binding.
//!
//! A function value carries its full ordered parameter list plus the
//! values bound so far; arguments always bind left to right, so the
//! bound values are a prefix of the parameter list. `bind` never
//! mutates; it returns a fresh value with an extended prefix, which
//! is what makes reusing a partially-applied function safe:
//!
//! ```text
//! add1 = add(1);      // add is untouched
//! add1(2);            // 3
//! add1(10);           // 11, same add1 again
//! ```

use std::rc::Rc;

use lute_ir::{Name, StmtRange, StringInterner};
use lute_types::{type_eq, Type, TypeTable};

use crate::environment::FrameId;
use crate::errors::{arity_exceeded, binding_type_mismatch, EvalError};
use crate::evaluator::Program;
use crate::value::Value;

/// A declared parameter: name plus required type.
#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub name: Name,
    pub ty: Type,
}

/// Where a function's statements live: the program that declared it.
/// Kept by reference count so function values survive the module they
/// were parsed from (the REPL re-parses every line).
#[derive(Clone)]
pub struct FunctionBody {
    pub program: Rc<Program>,
    pub stmts: StmtRange,
}

impl std::fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FunctionBody({:?})", self.stmts)
    }
}

/// A function value.
///
/// `name` is absent for functions known only by type (a declaration
/// like `function(int) -> int f;` creates an anonymous, bodyless
/// value). A bodyless function is callable only after a later
/// assignment fills the slot with a real function.
#[derive(Clone, Debug)]
pub struct FunctionValue {
    pub name: Option<Name>,
    params: Rc<[ParamSpec]>,
    /// Values for the leading `bound.len()` parameters.
    bound: Vec<Value>,
    ret: Rc<Type>,
    pub body: Option<FunctionBody>,
    /// The defining (closure) frame; call frames chain to it.
    pub env: Option<FrameId>,
}

impl FunctionValue {
    /// An uninitialized function of the given signature (no body, no
    /// closure frame). Used for typed declarations without an
    /// initializer.
    pub fn uninitialized(params: Vec<ParamSpec>, ret: Type) -> Self {
        FunctionValue {
            name: None,
            params: params.into(),
            bound: Vec::new(),
            ret: Rc::new(ret),
            body: None,
            env: None,
        }
    }

    /// A declared function with a body and a defining frame.
    pub fn declared(
        name: Name,
        params: Vec<ParamSpec>,
        ret: Type,
        body: FunctionBody,
        env: FrameId,
    ) -> Self {
        FunctionValue {
            name: Some(name),
            params: params.into(),
            bound: Vec::new(),
            ret: Rc::new(ret),
            body: Some(body),
            env: Some(env),
        }
    }

    /// Remaining unbound parameter count. A function is callable only
    /// at arity 0.
    pub fn arity(&self) -> usize {
        self.params.len() - self.bound.len()
    }

    /// The parameters still awaiting a value.
    pub fn unbound(&self) -> &[ParamSpec] {
        &self.params[self.bound.len()..]
    }

    /// Parameter/value pairs for everything bound so far.
    pub fn bound_params(&self) -> impl Iterator<Item = (&ParamSpec, &Value)> {
        self.params.iter().zip(self.bound.iter())
    }

    pub fn ret_type(&self) -> &Type {
        &self.ret
    }

    /// The function's operation type: unbound parameter types plus
    /// the return type. Partial application narrows the type.
    pub fn type_of(&self) -> Type {
        Type::Function {
            params: self.unbound().iter().map(|p| p.ty.clone()).collect(),
            ret: Box::new((*self.ret).clone()),
        }
    }

    /// Bind arguments left to right, producing a new function value.
    ///
    /// Fails if more arguments are supplied than parameters remain
    /// unbound, or on the first argument whose type does not match its
    /// parameter's declared type.
    pub fn bind(
        &self,
        args: &[Value],
        table: &TypeTable,
        interner: &StringInterner,
    ) -> Result<FunctionValue, EvalError> {
        if args.len() > self.arity() {
            return Err(arity_exceeded(args.len(), self.arity()));
        }

        for (param, arg) in self.unbound().iter().zip(args.iter()) {
            if !type_eq(&param.ty, &arg.type_of(), table) {
                return Err(binding_type_mismatch(
                    interner.lookup(param.name),
                    param.ty.describe(interner),
                    arg.describe_type(interner),
                ));
            }
        }

        let mut bound = self.bound.clone();
        bound.extend(args.iter().cloned());
        Ok(FunctionValue {
            name: self.name,
            params: Rc::clone(&self.params),
            bound,
            ret: Rc::clone(&self.ret),
            body: self.body.clone(),
            env: self.env,
        })
    }

    /// Whether two values share one declaration (same parameter list
    /// allocation and same body). Used by the strict `PartialEq` on
    /// `Value`; the language's `==` never reports functions equal.
    pub fn same_definition(&self, other: &FunctionValue) -> bool {
        Rc::ptr_eq(&self.params, &other.params)
            && match (&self.body, &other.body) {
                (Some(a), Some(b)) => Rc::ptr_eq(&a.program, &b.program) && a.stmts == b.stmts,
                (None, None) => true,
                _ => false,
            }
    }

    pub fn render(&self, interner: &StringInterner) -> String {
        let sig = self.type_of().describe(interner);
        match self.name {
            Some(name) => format!("<fn {}: {}>", interner.lookup(name), sig),
            None => format!("<fn: {sig}>"),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_int_params(interner: &StringInterner) -> Vec<ParamSpec> {
        vec![
            ParamSpec {
                name: interner.intern("x"),
                ty: Type::Int,
            },
            ParamSpec {
                name: interner.intern("y"),
                ty: Type::Int,
            },
        ]
    }

    #[test]
    fn binding_is_persistent() {
        let interner = StringInterner::new();
        let table = TypeTable::new();
        let f = FunctionValue::uninitialized(two_int_params(&interner), Type::Int);

        let g = f.bind(&[Value::Int(1)], &table, &interner).unwrap();
        assert_eq!(f.arity(), 2, "binding must not mutate the original");
        assert_eq!(g.arity(), 1);

        let h = g.bind(&[Value::Int(2)], &table, &interner).unwrap();
        assert_eq!(g.arity(), 1, "partial application stays reusable");
        assert_eq!(h.arity(), 0);
    }

    #[test]
    fn batch_bind_equals_sequential_binds() {
        let interner = StringInterner::new();
        let table = TypeTable::new();
        let f = FunctionValue::uninitialized(two_int_params(&interner), Type::Int);

        let batch = f
            .bind(&[Value::Int(1), Value::Int(2)], &table, &interner)
            .unwrap();
        let seq = f
            .bind(&[Value::Int(1)], &table, &interner)
            .unwrap()
            .bind(&[Value::Int(2)], &table, &interner)
            .unwrap();

        assert_eq!(batch.arity(), 0);
        assert_eq!(seq.arity(), 0);
        let batch_vals: Vec<_> = batch.bound_params().map(|(_, v)| v.clone()).collect();
        let seq_vals: Vec<_> = seq.bound_params().map(|(_, v)| v.clone()).collect();
        assert_eq!(batch_vals, seq_vals);
    }

    #[test]
    fn over_application_is_an_arity_error() {
        let interner = StringInterner::new();
        let table = TypeTable::new();
        let f = FunctionValue::uninitialized(two_int_params(&interner), Type::Int);
        let err = f
            .bind(
                &[Value::Int(1), Value::Int(2), Value::Int(3)],
                &table,
                &interner,
            )
            .unwrap_err();
        assert!(err.to_string().contains("too many arguments"));
    }

    #[test]
    fn binding_type_checks_each_argument() {
        let interner = StringInterner::new();
        let table = TypeTable::new();
        let f = FunctionValue::uninitialized(two_int_params(&interner), Type::Int);
        let err = f
            .bind(&[Value::string("no")], &table, &interner)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot bind parameter `x`: expected int, found string"
        );
    }

    #[test]
    fn partial_application_narrows_the_type() {
        let interner = StringInterner::new();
        let table = TypeTable::new();
        let f = FunctionValue::uninitialized(two_int_params(&interner), Type::Int);
        assert_eq!(
            f.type_of(),
            Type::function(vec![Type::Int, Type::Int], Type::Int)
        );
        let g = f.bind(&[Value::Int(1)], &table, &interner).unwrap();
        assert_eq!(g.type_of(), Type::function(vec![Type::Int], Type::Int));
    }
}
