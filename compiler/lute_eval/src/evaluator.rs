//! Tree-walking evaluator.
//!
//! One [`Evaluator`] exists per run; the REPL keeps a single one alive
//! across input lines so the global frame and registered struct types
//! persist. Each parsed line becomes a [`Program`] (module + depth
//! table), shared by reference count because function values keep
//! their declaring program alive past the line that produced it.
//!
//! Statement execution returns a [`Value`]; the `Return`, `Break`, and
//! `Continue` variants double as control signals. A statement sequence
//! stops at the first signal without executing the rest; loops absorb
//! `Break` (yielding nothing) and `Continue`, and forward `Return` to
//! the enclosing call. Errors are never recovered: the first one
//! aborts the whole evaluation and reaches the driver unchanged.

use std::rc::Rc;

use lute_ir::{
    BinaryOp, ExprId, ExprKind, Module, Name, SharedInterner, Span, StmtId, StmtKind, StmtRange,
    TypeExprId, TypeExprKind,
};
use lute_resolve::Resolution;
use lute_types::{type_eq, Type, TypeTable};

use crate::environment::{EnvError, Environment};
use crate::errors::{
    condition_not_bool, duplicate_binding, index_out_of_range, internal, invalid_assign_target,
    invalid_operand, invalid_unary_operand, missing_field, no_such_field, not_callable,
    not_indexable, not_iterable, return_type_mismatch, type_mismatch, undefined_variable,
    uninitialized_call, unknown_type, EvalError, EvalResult,
};
use crate::function::{FunctionBody, FunctionValue, ParamSpec};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::print_handler::{PrintHandler, StdoutPrintHandler};
use crate::value::{ArrayValue, StructValue, Value};

/// A resolved, executable source unit: the syntax tree plus its depth
/// table.
pub struct Program {
    pub module: Module,
    pub resolution: Resolution,
}

impl Program {
    pub fn new(module: Module, resolution: Resolution) -> Rc<Program> {
        Rc::new(Program { module, resolution })
    }
}

/// Evaluation context: environment arena, named-type table, interner,
/// and the print sink. No process-wide state; construct one per run.
pub struct Evaluator {
    interner: SharedInterner,
    env: Environment,
    types: TypeTable,
    printer: Rc<dyn PrintHandler>,
}

impl Evaluator {
    pub fn new(interner: SharedInterner) -> Self {
        Evaluator::with_print_handler(interner, Rc::new(StdoutPrintHandler))
    }

    pub fn with_print_handler(interner: SharedInterner, printer: Rc<dyn PrintHandler>) -> Self {
        Evaluator {
            interner,
            env: Environment::new(),
            types: TypeTable::new(),
            printer,
        }
    }

    /// Execute a program's top-level statements.
    ///
    /// Returns the last statement's value and any error. The first
    /// runtime error stops execution; a control signal reaching the
    /// top level ends the program (a stray `return`'s value becomes
    /// the result, `break`/`continue` yield nothing).
    pub fn evaluate(&mut self, program: &Rc<Program>) -> (Value, Vec<EvalError>) {
        let top = program.module.top_level();
        tracing::debug!(statements = top.len(), "evaluating program");

        let mut last = Value::Nothing;
        for &stmt in program.module.stmt_list(top) {
            match self.exec_stmt(program, stmt) {
                Ok(Value::Return(inner)) => {
                    last = *inner;
                    break;
                }
                Ok(Value::Break | Value::Continue) => {
                    last = Value::Nothing;
                    break;
                }
                Ok(value) => last = value,
                Err(error) => return (Value::Nothing, vec![error]),
            }
        }
        (last, Vec::new())
    }

    /// Interner handle shared with the lexer that feeds this
    /// evaluator.
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Render one value the way the REPL displays results.
    pub fn render_value(&self, value: &Value) -> String {
        value.render(&self.interner)
    }

    // Statements

    fn exec_range(&mut self, p: &Rc<Program>, range: StmtRange) -> EvalResult {
        let mut last = Value::Nothing;
        for &stmt in p.module.stmt_list(range) {
            let value = self.exec_stmt(p, stmt)?;
            if value.is_signal() {
                // Later statements in this sequence never run.
                return Ok(value);
            }
            last = value;
        }
        Ok(last)
    }

    fn exec_stmt(&mut self, p: &Rc<Program>, id: StmtId) -> EvalResult {
        let stmt = *p.module.stmt(id);
        let span = stmt.span;

        match stmt.kind {
            StmtKind::Expr(expr) => self.eval_expr(p, expr),

            StmtKind::Print(expr) => {
                let value = self.eval_expr(p, expr)?;
                self.printer.print(&value.render(&self.interner));
                Ok(Value::Nothing)
            }

            StmtKind::Declare { ty, name, init } => {
                let declared = self.lower_type(&p.module, ty);
                let value = match init {
                    Some(init) => self.eval_expr(p, init)?,
                    None => self.default_value(&declared, span)?,
                };
                let value = self.adopt_empty_array(&declared, value);
                if !type_eq(&declared, &value.type_of(), &self.types) {
                    return Err(type_mismatch(
                        declared.describe(&self.interner),
                        value.describe_type(&self.interner),
                    )
                    .with_span(span));
                }
                self.env
                    .declare(name, declared, value)
                    .map_err(|e| self.env_error(e, span))?;
                Ok(Value::Nothing)
            }

            StmtKind::Assign { target, value } => {
                let value = self.eval_expr(p, value)?;
                self.assign_target(p, target, value)?;
                Ok(Value::Nothing)
            }

            StmtKind::Function {
                name,
                params,
                ret,
                body,
            } => {
                let specs: Vec<ParamSpec> = p
                    .module
                    .param_list(params)
                    .iter()
                    .map(|param| ParamSpec {
                        name: param.name,
                        ty: self.lower_type(&p.module, param.ty),
                    })
                    .collect();
                let ret_ty = self.lower_type(&p.module, ret);
                let func = FunctionValue::declared(
                    name,
                    specs,
                    ret_ty,
                    FunctionBody {
                        program: Rc::clone(p),
                        stmts: body,
                    },
                    self.env.current(),
                );
                let ty = func.type_of();
                self.env
                    .declare(name, ty, Value::Function(func))
                    .map_err(|e| self.env_error(e, span))?;
                Ok(Value::Nothing)
            }

            StmtKind::StructDecl { name, fields } => {
                let fields: Vec<(Name, Type)> = p
                    .module
                    .field_def_list(fields)
                    .iter()
                    .map(|f| (f.name, self.lower_type(&p.module, f.ty)))
                    .collect();
                self.types.insert(name, Type::Struct { name, fields });
                Ok(Value::Nothing)
            }

            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                let chosen = if self.eval_condition(p, cond)? {
                    Some(then_body)
                } else {
                    else_body
                };
                match chosen {
                    Some(range) => self.exec_in_child_frame(p, range),
                    None => Ok(Value::Nothing),
                }
            }

            StmtKind::While { cond, body } => {
                while self.eval_condition(p, cond)? {
                    match self.exec_in_child_frame(p, body)? {
                        Value::Break => return Ok(Value::Nothing),
                        Value::Continue => {}
                        ret @ Value::Return(_) => return Ok(ret),
                        _ => {}
                    }
                }
                Ok(Value::Nothing)
            }

            StmtKind::For {
                binding,
                iter,
                body,
            } => {
                let iter_span = p.module.expr(iter).span;
                let iter_val = self.eval_expr(p, iter)?;
                let arr = match iter_val {
                    Value::Array(arr) => arr,
                    other => {
                        return Err(not_iterable(other.describe_type(&self.interner))
                            .with_span(iter_span));
                    }
                };
                let elem_ty = arr.elem_type().clone();

                // Iterate over a snapshot: mutating the array inside
                // the body does not change the iteration.
                for item in arr.snapshot() {
                    let parent = self.env.current();
                    self.env.push_frame(parent);
                    let result = self
                        .env
                        .declare(binding, elem_ty.clone(), item)
                        .map_err(|e| self.env_error(e, span))
                        .and_then(|()| self.exec_range(p, body));
                    self.env.pop_frame();

                    match result? {
                        Value::Break => return Ok(Value::Nothing),
                        Value::Continue => {}
                        ret @ Value::Return(_) => return Ok(ret),
                        _ => {}
                    }
                }
                Ok(Value::Nothing)
            }

            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(p, expr)?,
                    None => Value::Nothing,
                };
                Ok(Value::Return(Box::new(value)))
            }

            StmtKind::Break => Ok(Value::Break),
            StmtKind::Continue => Ok(Value::Continue),

            StmtKind::Block(body) => self.exec_in_child_frame(p, body),
        }
    }

    /// Run a statement range in a fresh frame chained to the current
    /// one, unwinding the frame even on error.
    fn exec_in_child_frame(&mut self, p: &Rc<Program>, range: StmtRange) -> EvalResult {
        let parent = self.env.current();
        self.env.push_frame(parent);
        let result = self.exec_range(p, range);
        self.env.pop_frame();
        result
    }

    fn eval_condition(&mut self, p: &Rc<Program>, cond: ExprId) -> Result<bool, EvalError> {
        let span = p.module.expr(cond).span;
        let value = self.eval_expr(p, cond)?;
        value
            .as_bool()
            .ok_or_else(|| condition_not_bool(value.describe_type(&self.interner)).with_span(span))
    }

    // Expressions

    fn eval_expr(&mut self, p: &Rc<Program>, id: ExprId) -> EvalResult {
        let expr = *p.module.expr(id);
        let span = expr.span;

        match expr.kind {
            ExprKind::Int(n) => Ok(Value::Int(n)),
            ExprKind::Float(x) => Ok(Value::Float(x)),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Str(name) => Ok(Value::string(self.interner.lookup(name))),
            ExprKind::Nothing => Ok(Value::Nothing),

            ExprKind::Ident(name) => {
                let result = match p.resolution.depth_of(id) {
                    Some(depth) => self.env.get(name, depth),
                    // Unresolved: the global frame is the last resort.
                    None => self.env.get_global(name),
                };
                result.map_err(|e| self.env_error(e, span))
            }

            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(p, operand)?;
                evaluate_unary(op, value, &self.interner).map_err(|e| e.or_span(span))
            }

            ExprKind::Binary { op, left, right } => match op {
                BinaryOp::And | BinaryOp::Or => self.eval_short_circuit(p, op, left, right, span),
                _ => {
                    let lhs = self.eval_expr(p, left)?;
                    let rhs = self.eval_expr(p, right)?;
                    evaluate_binary(op, lhs, rhs, &self.interner).map_err(|e| e.or_span(span))
                }
            },

            ExprKind::Call { callee, args } => {
                let callee_val = self.eval_expr(p, callee)?;
                let func = match callee_val {
                    Value::Function(func) => func,
                    other => {
                        return Err(
                            not_callable(other.describe_type(&self.interner)).with_span(span)
                        );
                    }
                };
                let mut arg_vals = Vec::with_capacity(args.len());
                for &arg in p.module.expr_list(args) {
                    arg_vals.push(self.eval_expr(p, arg)?);
                }
                let bound = func
                    .bind(&arg_vals, &self.types, &self.interner)
                    .map_err(|e| e.or_span(span))?;
                if bound.arity() == 0 {
                    self.call_function(&bound, span)
                } else {
                    // Partial application: the result is the narrowed
                    // function value, reusable any number of times.
                    Ok(Value::Function(bound))
                }
            }

            ExprKind::Index { receiver, index } => {
                let recv = self.eval_expr(p, receiver)?;
                let idx = self.eval_expr(p, index)?;
                let Some(i) = idx.as_int() else {
                    return Err(invalid_operand(
                        "[]",
                        recv.describe_type(&self.interner),
                        idx.describe_type(&self.interner),
                    )
                    .with_span(span));
                };
                match &recv {
                    Value::Array(arr) => arr.get(i).map_err(|e| e.or_span(span)),
                    Value::Tuple(items) => usize::try_from(i)
                        .ok()
                        .and_then(|ix| items.get(ix))
                        .cloned()
                        .ok_or_else(|| index_out_of_range(i, items.len()).with_span(span)),
                    other => {
                        Err(not_indexable(other.describe_type(&self.interner)).with_span(span))
                    }
                }
            }

            ExprKind::Field { receiver, field } => {
                let recv = self.eval_expr(p, receiver)?;
                match &recv {
                    Value::Struct(s) => s.get_field(field).ok_or_else(|| {
                        no_such_field(
                            self.interner.lookup(field),
                            recv.describe_type(&self.interner),
                        )
                        .with_span(span)
                    }),
                    other => Err(no_such_field(
                        self.interner.lookup(field),
                        other.describe_type(&self.interner),
                    )
                    .with_span(span)),
                }
            }

            ExprKind::ArrayLit(elems) => {
                let ids = p.module.expr_list(elems);
                let mut values = Vec::with_capacity(ids.len());
                for &elem in ids {
                    values.push(self.eval_expr(p, elem)?);
                }
                // Homogeneity: the first element fixes the type. An
                // empty literal is `nothing[]` until a declaration or
                // assignment adopts a concrete element type.
                let elem_ty = values.first().map_or(Type::Nothing, Value::type_of);
                for value in values.iter().skip(1) {
                    if !type_eq(&elem_ty, &value.type_of(), &self.types) {
                        return Err(crate::errors::element_type_mismatch(
                            elem_ty.describe(&self.interner),
                            value.describe_type(&self.interner),
                        )
                        .with_span(span));
                    }
                }
                Ok(Value::Array(ArrayValue::new(elem_ty, values)))
            }

            ExprKind::Range { start, end } => {
                let start_val = self.eval_expr(p, start)?;
                let end_val = self.eval_expr(p, end)?;
                let (Some(a), Some(b)) = (start_val.as_int(), end_val.as_int()) else {
                    return Err(invalid_operand(
                        "..",
                        start_val.describe_type(&self.interner),
                        end_val.describe_type(&self.interner),
                    )
                    .with_span(span));
                };
                let items: Vec<Value> = (a..b).map(Value::Int).collect();
                Ok(Value::Array(ArrayValue::new(Type::Int, items)))
            }

            ExprKind::TupleLit(elems) => {
                let ids = p.module.expr_list(elems);
                let mut values = Vec::with_capacity(ids.len());
                for &elem in ids {
                    values.push(self.eval_expr(p, elem)?);
                }
                Ok(Value::tuple(values))
            }

            ExprKind::StructLit { name, fields } => self.eval_struct_literal(p, name, fields, span),
        }
    }

    fn eval_short_circuit(
        &mut self,
        p: &Rc<Program>,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        span: Span,
    ) -> EvalResult {
        let lhs = self.eval_expr(p, left)?;
        let Some(l) = lhs.as_bool() else {
            return Err(
                invalid_unary_operand(op.symbol(), lhs.describe_type(&self.interner))
                    .with_span(span),
            );
        };

        // The right operand is not evaluated when the left alone
        // decides the result.
        match op {
            BinaryOp::And if !l => return Ok(Value::Bool(false)),
            BinaryOp::Or if l => return Ok(Value::Bool(true)),
            _ => {}
        }

        let rhs = self.eval_expr(p, right)?;
        let Some(r) = rhs.as_bool() else {
            return Err(
                invalid_unary_operand(op.symbol(), rhs.describe_type(&self.interner))
                    .with_span(span),
            );
        };
        Ok(Value::Bool(r))
    }

    fn eval_struct_literal(
        &mut self,
        p: &Rc<Program>,
        name: Name,
        fields: lute_ir::FieldInitRange,
        span: Span,
    ) -> EvalResult {
        let ty_name = self.interner.lookup(name);
        let declared = match self.types.get(name) {
            Some(Type::Struct { fields, .. }) => fields.clone(),
            _ => return Err(unknown_type(ty_name).with_span(span)),
        };

        // Initializers evaluate in source order, independent of the
        // declared field order.
        let inits = p.module.field_init_list(fields);
        let mut given: Vec<(Name, Value)> = Vec::with_capacity(inits.len());
        for init in inits {
            let value = self.eval_expr(p, init.value)?;
            given.push((init.name, value));
        }

        for (i, (field_name, _)) in given.iter().enumerate() {
            if given[..i].iter().any(|(seen, _)| seen == field_name) {
                return Err(
                    duplicate_binding(self.interner.lookup(*field_name)).with_span(span)
                );
            }
            if !declared.iter().any(|(n, _)| n == field_name) {
                return Err(no_such_field(
                    self.interner.lookup(*field_name),
                    ty_name.to_owned(),
                )
                .with_span(span));
            }
        }

        let mut assembled = Vec::with_capacity(declared.len());
        for (field_name, field_ty) in &declared {
            let Some((_, value)) = given.iter().find(|(n, _)| n == field_name) else {
                return Err(
                    missing_field(self.interner.lookup(*field_name), ty_name.to_owned())
                        .with_span(span),
                );
            };
            let value = self.adopt_empty_array(field_ty, value.clone());
            if !type_eq(field_ty, &value.type_of(), &self.types) {
                return Err(type_mismatch(
                    field_ty.describe(&self.interner),
                    value.describe_type(&self.interner),
                )
                .with_span(span));
            }
            assembled.push((*field_name, value));
        }

        Ok(Value::Struct(StructValue::new(name, assembled)))
    }

    // Function calls

    /// Invoke a fully-bound function: fresh frame chained to the
    /// captured defining frame, bound parameters declared into it,
    /// body run as a block, result checked against the declared
    /// return type.
    fn call_function(&mut self, func: &FunctionValue, span: Span) -> EvalResult {
        let display_name = func
            .name
            .map_or("<anonymous>", |name| self.interner.lookup(name));

        let (Some(body), Some(closure)) = (func.body.clone(), func.env) else {
            return Err(uninitialized_call(display_name).with_span(span));
        };

        tracing::trace!(function = display_name, "calling");

        self.env.push_frame(closure);
        let mut result = Ok(Value::Nothing);
        for (param, value) in func.bound_params() {
            if let Err(e) = self
                .env
                .declare(param.name, param.ty.clone(), value.clone())
            {
                result = Err(self.env_error(e, span));
                break;
            }
        }
        if result.is_ok() {
            result = self.exec_range(&body.program, body.stmts);
        }
        self.env.pop_frame();

        let ret = func.ret_type();
        match result? {
            Value::Return(inner) => {
                if type_eq(&inner.type_of(), ret, &self.types) {
                    Ok(*inner)
                } else {
                    Err(return_type_mismatch(
                        ret.describe(&self.interner),
                        inner.describe_type(&self.interner),
                    )
                    .with_span(span))
                }
            }
            // A loop signal escaping the body can never satisfy the
            // declared return type.
            signal @ (Value::Break | Value::Continue) => Err(return_type_mismatch(
                ret.describe(&self.interner),
                signal.describe_type(&self.interner),
            )
            .with_span(span)),
            // Falling off the end is an implicit `return nothing`.
            _ => {
                if type_eq(&Type::Nothing, ret, &self.types) {
                    Ok(Value::Nothing)
                } else {
                    Err(return_type_mismatch(
                        ret.describe(&self.interner),
                        "nothing".to_owned(),
                    )
                    .with_span(span))
                }
            }
        }
    }

    // Assignment

    fn assign_target(&mut self, p: &Rc<Program>, target: ExprId, value: Value) -> Result<(), EvalError> {
        let expr = *p.module.expr(target);
        let span = expr.span;

        match expr.kind {
            ExprKind::Ident(name) => {
                let depth = p.resolution.depth_of(target);
                let slot_ty = match depth {
                    Some(d) => self.env.slot_type(name, d),
                    None => self.env.slot_type_global(name),
                };
                let value = match slot_ty {
                    Some(ty) => self.adopt_empty_array(&ty, value),
                    None => value,
                };
                let result = match depth {
                    Some(d) => self.env.set(name, value, d, &self.types),
                    None => self.env.set_global(name, value, &self.types),
                };
                result.map_err(|e| self.env_error(e, span))
            }

            ExprKind::Index { receiver, index } => {
                let recv = self.eval_expr(p, receiver)?;
                let idx = self.eval_expr(p, index)?;
                let Some(i) = idx.as_int() else {
                    return Err(invalid_operand(
                        "[]",
                        recv.describe_type(&self.interner),
                        idx.describe_type(&self.interner),
                    )
                    .with_span(span));
                };
                match &recv {
                    Value::Array(arr) => {
                        let value = self.adopt_empty_array(arr.elem_type(), value);
                        arr.set(i, value, &self.types, &self.interner)
                            .map_err(|e| e.or_span(span))
                    }
                    Value::Tuple(_) => Err(invalid_assign_target("tuple elements").with_span(span)),
                    other => {
                        Err(not_indexable(other.describe_type(&self.interner)).with_span(span))
                    }
                }
            }

            ExprKind::Field { receiver, field } => {
                let recv = self.eval_expr(p, receiver)?;
                let Value::Struct(s) = &recv else {
                    return Err(no_such_field(
                        self.interner.lookup(field),
                        recv.describe_type(&self.interner),
                    )
                    .with_span(span));
                };

                // The declared field type comes from the registered
                // struct type; the current value's type is the
                // fallback if the declaration is gone (REPL re-decl).
                let declared_ty = match self.types.resolve(&Type::Named(s.name)) {
                    Some(Type::Struct { fields, .. }) => fields
                        .iter()
                        .find(|(n, _)| *n == field)
                        .map(|(_, ty)| ty.clone()),
                    _ => None,
                };
                let expected = match declared_ty {
                    Some(ty) => ty,
                    None => match s.get_field(field) {
                        Some(current) => current.type_of(),
                        None => {
                            return Err(no_such_field(
                                self.interner.lookup(field),
                                recv.describe_type(&self.interner),
                            )
                            .with_span(span));
                        }
                    },
                };

                let value = self.adopt_empty_array(&expected, value);
                if !type_eq(&expected, &value.type_of(), &self.types) {
                    return Err(type_mismatch(
                        expected.describe(&self.interner),
                        value.describe_type(&self.interner),
                    )
                    .with_span(span));
                }
                if s.set_field(field, value) {
                    Ok(())
                } else {
                    Err(no_such_field(
                        self.interner.lookup(field),
                        recv.describe_type(&self.interner),
                    )
                    .with_span(span))
                }
            }

            _ => Err(invalid_assign_target("this expression").with_span(span)),
        }
    }

    // Types and defaults

    /// Lower a parsed type annotation to a type descriptor. `Named`
    /// stays symbolic; it resolves through the type table when
    /// compared.
    fn lower_type(&self, module: &Module, id: TypeExprId) -> Type {
        match module.type_expr(id).kind {
            TypeExprKind::Int => Type::Int,
            TypeExprKind::Float => Type::Float,
            TypeExprKind::Str => Type::Str,
            TypeExprKind::Bool => Type::Bool,
            TypeExprKind::Nothing => Type::Nothing,
            TypeExprKind::Array(elem) => Type::array(self.lower_type(module, elem)),
            TypeExprKind::Tuple(elems) => Type::Tuple(
                module
                    .type_expr_list(elems)
                    .iter()
                    .map(|&e| self.lower_type(module, e))
                    .collect(),
            ),
            TypeExprKind::Function { params, ret } => Type::function(
                module
                    .type_expr_list(params)
                    .iter()
                    .map(|&t| self.lower_type(module, t))
                    .collect(),
                self.lower_type(module, ret),
            ),
            TypeExprKind::Named(name) => Type::Named(name),
        }
    }

    /// The default value a declaration without an initializer gets.
    fn default_value(&self, ty: &Type, span: Span) -> EvalResult {
        match ty {
            Type::Int => Ok(Value::Int(0)),
            Type::Float => Ok(Value::Float(0.0)),
            Type::Str => Ok(Value::string("")),
            Type::Bool => Ok(Value::Bool(false)),
            Type::Nothing => Ok(Value::Nothing),
            Type::Array(elem) => Ok(Value::Array(ArrayValue::new((**elem).clone(), Vec::new()))),
            Type::Tuple(elems) => {
                let mut values = Vec::with_capacity(elems.len());
                for elem in elems {
                    values.push(self.default_value(elem, span)?);
                }
                Ok(Value::tuple(values))
            }
            Type::Function { params, ret } => {
                // Known only by type: anonymous, bodyless, callable
                // only after a later assignment provides a body.
                let specs = params
                    .iter()
                    .map(|ty| ParamSpec {
                        name: Name::EMPTY,
                        ty: ty.clone(),
                    })
                    .collect();
                Ok(Value::Function(FunctionValue::uninitialized(
                    specs,
                    (**ret).clone(),
                )))
            }
            Type::Struct { name, fields } => {
                let mut values = Vec::with_capacity(fields.len());
                for (field_name, field_ty) in fields {
                    values.push((*field_name, self.default_value(field_ty, span)?));
                }
                Ok(Value::Struct(StructValue::new(*name, values)))
            }
            Type::Named(name) => match self.types.resolve(ty) {
                Some(resolved) => {
                    let resolved = resolved.clone();
                    self.default_value(&resolved, span)
                }
                None => Err(unknown_type(self.interner.lookup(*name)).with_span(span)),
            },
            Type::BreakSignal | Type::ContinueSignal => {
                Err(internal("signal types cannot be declared").with_span(span))
            }
        }
    }

    /// An empty array literal has element type `nothing`; a
    /// declaration, assignment, or field whose declared type is an
    /// array adopts its element type for it.
    fn adopt_empty_array(&self, declared: &Type, value: Value) -> Value {
        if let Value::Array(arr) = &value {
            if arr.is_empty() && matches!(arr.elem_type(), Type::Nothing) {
                if let Some(Type::Array(elem)) = self.types.resolve(declared) {
                    return Value::Array(ArrayValue::new((**elem).clone(), Vec::new()));
                }
            }
        }
        value
    }

    fn env_error(&self, error: EnvError, span: Span) -> EvalError {
        match error {
            EnvError::DuplicateBinding(name) => {
                duplicate_binding(self.interner.lookup(name)).with_span(span)
            }
            EnvError::UndefinedVariable(name) => {
                undefined_variable(self.interner.lookup(name)).with_span(span)
            }
            EnvError::TypeMismatch { expected, found } => type_mismatch(
                expected.describe(&self.interner),
                found.describe(&self.interner),
            )
            .with_span(span),
            EnvError::BadDepth { requested } => internal(format!(
                "resolved depth {requested} walked past the global frame"
            ))
            .with_span(span),
        }
    }

    // Debug dump

    /// Fixed-width (type, name, value) table of all active scopes,
    /// innermost first. Interactive inspection only.
    pub fn format_environment(&self) -> String {
        use std::fmt::Write as _;

        let mut frames: Vec<Vec<(String, String, String)>> = Vec::new();
        for frame in self.env.chain() {
            let mut rows: Vec<(String, String, String)> = self
                .env
                .bindings(frame)
                .map(|(name, slot)| {
                    (
                        slot.ty.describe(&self.interner),
                        self.interner.lookup(name).to_owned(),
                        slot.value.render(&self.interner),
                    )
                })
                .collect();
            rows.sort_by(|a, b| a.1.cmp(&b.1));
            frames.push(rows);
        }

        let all_rows = frames.iter().flatten();
        let ty_width = all_rows
            .clone()
            .map(|(ty, _, _)| ty.len())
            .max()
            .unwrap_or(0)
            .max("type".len());
        let name_width = all_rows
            .map(|(_, name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max("name".len());

        let mut out = String::new();
        let _ = writeln!(out, "{:<ty_width$}  {:<name_width$}  value", "type", "name");
        for (depth, rows) in frames.iter().enumerate() {
            let label = if depth + 1 == frames.len() {
                "global".to_owned()
            } else {
                format!("scope {depth}")
            };
            let _ = writeln!(out, "--- {label}");
            for (ty, name, value) in rows {
                let _ = writeln!(out, "{ty:<ty_width$}  {name:<name_width$}  {value}");
            }
        }
        out
    }
}
