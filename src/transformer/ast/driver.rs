//! Suite traversal: `this` context to closures
//!
//! Starts from every `describe`/`suite`/`context` call at the top level of
//! the module and walks the suite hierarchy depth-first. Each suite gets a
//! context record; setup hooks hoist the properties they assign into it,
//! tests resolve their reads against it and its ancestors, and once a
//! suite's body is done its hoisted properties become `let` declarations at
//! the top of the suite callback.

use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{VisitMut, VisitMutWith};
use tracing::{debug, trace};

use crate::models::{ContextId, ContextTree, TransformStats};
use crate::transformer::ast::classifier::{classify, creates_suite, CallRole};
use crate::transformer::ast::function_shape::{arrowify_callback, inject_declarations, let_declaration};
use crate::transformer::ast::members::{handle_context_members, handle_context_property_usage, MemberOutcome};
use crate::transformer::ast::scope::ScopeAnalyzer;

/// Rewrites Mocha `this` context usage into closures over hoisted variables
pub struct ContextToClosure {
    stats: TransformStats,
}

impl ContextToClosure {
    pub fn new() -> Self {
        Self {
            stats: TransformStats::default(),
        }
    }

    pub fn stats(&self) -> &TransformStats {
        &self.stats
    }

    pub fn into_stats(self) -> TransformStats {
        self.stats
    }

    /// Rewrite every top-level suite in `module`
    pub fn run(&mut self, module: &mut Module) {
        let mut scope = ScopeAnalyzer::for_module(module);
        let mut finder = TopLevelSuites {
            driver: self,
            scope: &mut scope,
        };
        module.visit_mut_with(&mut finder);
    }

    /// Process one suite-like call. Every function literal argument gets its
    /// own context: its direct calls are handled first, then the variables
    /// they hoisted are declared at the top of that same function. Only the
    /// trailing callback changes shape.
    fn handle_context(
        &mut self,
        call: &mut CallExpr,
        tree: &mut ContextTree,
        parent: Option<ContextId>,
        scope: &mut ScopeAnalyzer,
    ) {
        for arg in call.args.iter_mut() {
            if arg.spread.is_some() || !is_function_literal(&arg.expr) {
                continue;
            }
            let context = match parent {
                Some(parent) => tree.add_child(parent),
                None => tree.new_root(),
            };

            scope.enter_function(&arg.expr);
            let mut direct_calls = DirectCalls {
                driver: &mut *self,
                tree: &mut *tree,
                context,
                scope: &mut *scope,
            };
            visit_callback_body(&mut arg.expr, &mut direct_calls);
            scope.exit_scope();

            let names: Vec<String> = tree
                .properties(context)
                .iter()
                .map(|property| property.name.clone())
                .collect();
            if !names.is_empty() {
                debug!(variables = ?names, "declaring hoisted variables in suite");
            }
            let declarations = names.iter().map(|name| let_declaration(name)).collect();
            inject_declarations(&mut arg.expr, declarations);
            self.stats.hoisted.extend(names);
        }

        self.convert_callback(call);
    }

    /// `before`/`beforeEach`/`setup`: hoist context writes into `context`
    fn handle_context_setter(
        &mut self,
        call: &mut CallExpr,
        tree: &mut ContextTree,
        context: ContextId,
        scope: &mut ScopeAnalyzer,
    ) {
        if let Some(callback) = trailing_callback(call) {
            let outcome = handle_context_members(tree, context, scope, callback);
            self.record(outcome);
        }
        self.convert_callback(call);
    }

    /// `it`/`test`/`after`/`afterEach`/`teardown`: resolve context reads
    fn handle_context_user(
        &mut self,
        call: &mut CallExpr,
        tree: &ContextTree,
        context: ContextId,
        scope: &mut ScopeAnalyzer,
    ) {
        if let Some(callback) = trailing_callback(call) {
            let outcome = handle_context_property_usage(tree, context, scope, callback);
            self.record(outcome);
        }
        self.convert_callback(call);
    }

    fn convert_callback(&mut self, call: &mut CallExpr) {
        if arrowify_callback(&mut call.args) {
            self.stats.callbacks_converted += 1;
        }
    }

    fn record(&mut self, outcome: MemberOutcome) {
        self.stats.renamed_locals.extend(outcome.renamed_locals);
        self.stats.unresolved_reads.extend(outcome.unresolved);
    }
}

impl Default for ContextToClosure {
    fn default() -> Self {
        Self::new()
    }
}

fn is_function_literal(expr: &Expr) -> bool {
    matches!(expr, Expr::Fn(_) | Expr::Arrow(_))
}

/// The trailing argument when it is a function or arrow literal
fn trailing_callback(call: &mut CallExpr) -> Option<&mut Expr> {
    let last = call.args.last_mut()?;
    if last.spread.is_some() || !is_function_literal(&last.expr) {
        return None;
    }
    Some(&mut *last.expr)
}

/// Visit the parameters and body of a function literal, not the literal
/// itself, so visitors that stop at function boundaries still see its
/// contents
fn visit_callback_body<V: VisitMut>(callback: &mut Expr, visitor: &mut V) {
    match callback {
        Expr::Fn(fn_expr) => {
            fn_expr.function.params.visit_mut_with(visitor);
            fn_expr.function.body.visit_mut_with(visitor);
        }
        Expr::Arrow(arrow) => {
            arrow.params.visit_mut_with(visitor);
            arrow.body.visit_mut_with(visitor);
        }
        _ => {}
    }
}

/// Finds suite calls outside of any function
struct TopLevelSuites<'a> {
    driver: &'a mut ContextToClosure,
    scope: &'a mut ScopeAnalyzer,
}

impl VisitMut for TopLevelSuites<'_> {
    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        if creates_suite(call) {
            trace!("rewriting top-level suite");
            let mut tree = ContextTree::new();
            self.driver.handle_context(call, &mut tree, None, self.scope);
            self.driver.stats.suites += 1;
        }
        call.visit_mut_children_with(self);
    }

    fn visit_mut_function(&mut self, _: &mut Function) {}

    fn visit_mut_arrow_expr(&mut self, _: &mut ArrowExpr) {}

    fn visit_mut_class(&mut self, _: &mut Class) {}

    fn visit_mut_getter_prop(&mut self, _: &mut GetterProp) {}

    fn visit_mut_setter_prop(&mut self, _: &mut SetterProp) {}
}

/// Dispatches the calls whose innermost enclosing function is one suite
/// callback, in source order
struct DirectCalls<'a> {
    driver: &'a mut ContextToClosure,
    tree: &'a mut ContextTree,
    context: ContextId,
    scope: &'a mut ScopeAnalyzer,
}

impl VisitMut for DirectCalls<'_> {
    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        match classify(call) {
            CallRole::InstallsSetup => {
                self.driver
                    .handle_context_setter(call, self.tree, self.context, self.scope)
            }
            CallRole::UsesContext => {
                self.driver
                    .handle_context_user(call, self.tree, self.context, self.scope)
            }
            CallRole::CreatesSuite | CallRole::Ordinary => {
                self.driver
                    .handle_context(call, self.tree, Some(self.context), self.scope)
            }
        }
        call.visit_mut_children_with(self);
    }

    fn visit_mut_function(&mut self, _: &mut Function) {}

    fn visit_mut_arrow_expr(&mut self, _: &mut ArrowExpr) {}

    fn visit_mut_class(&mut self, _: &mut Class) {}

    fn visit_mut_getter_prop(&mut self, _: &mut GetterProp) {}

    fn visit_mut_setter_prop(&mut self, _: &mut SetterProp) {}
}
