//! Static scope resolution.
//!
//! A single pre-execution pass over the syntax tree that computes, for
//! every variable reference, how many lexical scopes separate the
//! reference from its binding. The evaluator then walks exactly that
//! many parent links instead of searching frames by name.
//!
//! The pass never fails: findings (duplicate declarations) accumulate
//! as diagnostics and resolution continues, so the driver can report
//! several at once. A reference found in no tracked scope is simply
//! absent from the table, which the evaluator reads as "look in the
//! global frame".

use lute_diagnostic::Diagnostic;
use lute_ir::{
    ExprId, ExprKind, Module, Name, StmtId, StmtKind, StmtRange, StringInterner,
};
use rustc_hash::FxHashMap;

/// Result of resolving one module.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Lexical depth per reference node (0 = innermost scope at the
    /// reference point). Absence means "resolve in the global frame".
    pub depths: FxHashMap<ExprId, usize>,
    /// Accumulated findings; none of them aborts resolution.
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    /// Depth recorded for a reference node, if any.
    pub fn depth_of(&self, id: ExprId) -> Option<usize> {
        self.depths.get(&id).copied()
    }
}

/// Binding state within one static scope.
///
/// Declaration is two-phase so a later extension can detect a
/// variable's initializer reading the variable itself; currently both
/// phases always complete back to back.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum BindState {
    Declared,
    Defined,
}

struct Resolver<'a> {
    module: &'a Module,
    interner: &'a StringInterner,
    /// Innermost scope last. The global frame is intentionally not a
    /// scope here: unresolved names fall through to it at runtime.
    scopes: Vec<FxHashMap<Name, BindState>>,
    resolution: Resolution,
}

impl<'a> Resolver<'a> {
    fn new(module: &'a Module, interner: &'a StringInterner) -> Self {
        Resolver {
            module,
            interner,
            scopes: Vec::new(),
            resolution: Resolution::default(),
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: Name, stmt: StmtId) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        if scope.contains_key(&name) {
            let text = self.interner.lookup(name);
            self.resolution.diagnostics.push(
                Diagnostic::error(format!("`{text}` is already declared in this scope"))
                    .with_span(self.module.stmt(stmt).span),
            );
        }
        scope.insert(name, BindState::Declared);
    }

    fn define(&mut self, name: Name) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, BindState::Defined);
        }
    }

    /// Bottom-up scan of the scope stack; the first scope containing
    /// the name fixes the depth.
    fn resolve_reference(&mut self, id: ExprId, name: Name) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name) {
                self.resolution.depths.insert(id, depth);
                return;
            }
        }
        // Left unresolved: global fallback at evaluation time.
        tracing::trace!(
            name = self.interner.lookup(name),
            "reference left for the global frame"
        );
    }

    fn resolve_stmt_range(&mut self, range: StmtRange) {
        for &stmt in self.module.stmt_list(range) {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, id: StmtId) {
        match self.module.stmt(id).kind {
            StmtKind::Expr(expr) | StmtKind::Print(expr) => self.resolve_expr(expr),

            StmtKind::Declare { name, init, .. } => {
                self.declare(name, id);
                if let Some(init) = init {
                    self.resolve_expr(init);
                }
                self.define(name);
            }

            StmtKind::Assign { target, value } => {
                self.resolve_expr(value);
                self.resolve_expr(target);
            }

            StmtKind::Function {
                name, params, body, ..
            } => {
                // The function's own name binds in the enclosing
                // scope, so recursion resolves without special cases.
                self.declare(name, id);
                self.define(name);

                self.begin_scope();
                for param in self.module.param_list(params) {
                    let Some(scope) = self.scopes.last_mut() else {
                        continue;
                    };
                    scope.insert(param.name, BindState::Defined);
                }
                self.resolve_stmt_range(body);
                self.end_scope();
            }

            StmtKind::StructDecl { .. } => {
                // Types live in their own namespace; nothing to do.
            }

            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.resolve_expr(cond);
                self.begin_scope();
                self.resolve_stmt_range(then_body);
                self.end_scope();
                if let Some(else_body) = else_body {
                    self.begin_scope();
                    self.resolve_stmt_range(else_body);
                    self.end_scope();
                }
            }

            StmtKind::While { cond, body } => {
                self.resolve_expr(cond);
                self.begin_scope();
                self.resolve_stmt_range(body);
                self.end_scope();
            }

            StmtKind::For {
                binding,
                iter,
                body,
            } => {
                self.resolve_expr(iter);
                self.begin_scope();
                if let Some(scope) = self.scopes.last_mut() {
                    scope.insert(binding, BindState::Defined);
                }
                self.resolve_stmt_range(body);
                self.end_scope();
            }

            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }

            StmtKind::Break | StmtKind::Continue => {}

            StmtKind::Block(body) => {
                self.begin_scope();
                self.resolve_stmt_range(body);
                self.end_scope();
            }
        }
    }

    fn resolve_expr(&mut self, id: ExprId) {
        match self.module.expr(id).kind {
            ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::Str(_)
            | ExprKind::Bool(_)
            | ExprKind::Nothing => {}

            ExprKind::Ident(name) => self.resolve_reference(id, name),

            ExprKind::Unary { operand, .. } => self.resolve_expr(operand),

            ExprKind::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            ExprKind::Call { callee, args } => {
                self.resolve_expr(callee);
                for &arg in self.module.expr_list(args) {
                    self.resolve_expr(arg);
                }
            }

            ExprKind::Index { receiver, index } => {
                self.resolve_expr(receiver);
                self.resolve_expr(index);
            }

            ExprKind::Field { receiver, .. } => self.resolve_expr(receiver),

            ExprKind::ArrayLit(elems) | ExprKind::TupleLit(elems) => {
                for &elem in self.module.expr_list(elems) {
                    self.resolve_expr(elem);
                }
            }

            ExprKind::Range { start, end } => {
                self.resolve_expr(start);
                self.resolve_expr(end);
            }

            ExprKind::StructLit { fields, .. } => {
                for init in self.module.field_init_list(fields) {
                    self.resolve_expr(init.value);
                }
            }
        }
    }
}

/// Resolve a module, producing the depth table and any findings.
///
/// Pure over its inputs and never fails fatally; the returned table is
/// usable even when diagnostics are present.
pub fn resolve(module: &Module, interner: &StringInterner) -> Resolution {
    let mut resolver = Resolver::new(module, interner);
    resolver.resolve_stmt_range(module.top_level());
    tracing::debug!(
        references = resolver.resolution.depths.len(),
        findings = resolver.resolution.diagnostics.len(),
        "resolution finished"
    );
    resolver.resolution
}
