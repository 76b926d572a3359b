//! `this.<prop>` rewriting inside hook and test callbacks
//!
//! Setup callbacks (`before`, `beforeEach`, `setup`) introduce hoisted
//! variables for the properties they assign; test and teardown callbacks
//! only resolve properties some enclosing setup already hoisted.
//!
//! Only accesses whose innermost enclosing function is the callback itself
//! are touched. A nested `function`, arrow, class or accessor has its own
//! scope and is left alone.

use std::collections::{HashMap, HashSet};

use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{Visit, VisitMut, VisitMutWith, VisitWith};
use tracing::debug;

use crate::models::{ContextId, ContextTree, PropertyDescriptor};
use crate::transformer::ast::function_shape::ident;
use crate::transformer::ast::scope::{Binding, ScopeAnalyzer};

/// Appended to a name that would otherwise clash with an existing binding
pub const FROM_SETUP_SUFFIX: &str = "_fromSetup";

pub fn from_setup(name: &str) -> String {
    format!("{name}{FROM_SETUP_SUFFIX}")
}

/// What happened to one callback's context accesses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberOutcome {
    pub replaced: usize,
    pub renamed_locals: Vec<String>,
    pub unresolved: Vec<String>,
}

/// Rewrite the context writes of a setup callback.
///
/// Each distinct property resolves to the name an enclosing suite already
/// hoisted, or else to a new hoisted variable recorded on `context`: the
/// plain property name, or `<name>_fromSetup` when an enclosing scope
/// already binds the plain name. A local binding of the callback that has
/// the hoisted variable's name is renamed to `<name>_fromSetup`.
pub fn handle_context_members(
    tree: &mut ContextTree,
    context: ContextId,
    scope: &mut ScopeAnalyzer,
    callback: &mut Expr,
) -> MemberOutcome {
    scope.enter_function(callback);

    let mut resolved = HashMap::new();
    for property in collect_context_accesses(callback) {
        let existing = tree
            .property_in_scope(context, &property)
            .map(|descriptor| descriptor.name.clone());
        let name = match existing {
            Some(name) => name,
            None => {
                let name = match scope.lookup(&property) {
                    Binding::Enclosing => from_setup(&property),
                    Binding::Current | Binding::Unbound => property.clone(),
                };
                tree.add_property(context, PropertyDescriptor::new(property.clone(), name.clone()));
                name
            }
        };
        debug!(property = %property, variable = %name, "hoisting context property");
        resolved.insert(property, name);
    }

    let outcome = apply_resolution(scope, callback, resolved, Vec::new());
    scope.exit_scope();
    outcome
}

/// Rewrite the context reads of a test or teardown callback. Properties no
/// enclosing suite hoisted are left as `this.<prop>`.
///
/// Reads resolve by name only: a suite callback between the hoisting suite
/// and the test that declares its own binding of the same name captures the
/// rewritten read.
pub fn handle_context_property_usage(
    tree: &ContextTree,
    context: ContextId,
    scope: &mut ScopeAnalyzer,
    callback: &mut Expr,
) -> MemberOutcome {
    scope.enter_function(callback);

    let mut resolved = HashMap::new();
    let mut unresolved = Vec::new();
    for property in collect_context_accesses(callback) {
        match tree.property_in_scope(context, &property) {
            Some(descriptor) => {
                resolved.insert(property, descriptor.name.clone());
            }
            None => {
                debug!(property = %property, "no setup hoists this context property, leaving it");
                unresolved.push(property);
            }
        }
    }

    let outcome = apply_resolution(scope, callback, resolved, unresolved);
    scope.exit_scope();
    outcome
}

fn apply_resolution(
    scope: &ScopeAnalyzer,
    callback: &mut Expr,
    resolved: HashMap<String, String>,
    unresolved: Vec<String>,
) -> MemberOutcome {
    let mut renamed_locals = Vec::new();
    for (property, name) in &resolved {
        if property == name && scope.lookup(name) == Binding::Current {
            let renamed = from_setup(name);
            debug!(local = %name, renamed = %renamed, "renaming local that clashes with hoisted variable");
            rename_local(callback, name, &renamed);
            renamed_locals.push(renamed);
        }
    }
    renamed_locals.sort();

    let replaced = replace_context_accesses(callback, &resolved);

    MemberOutcome {
        replaced,
        renamed_locals,
        unresolved,
    }
}

/// Property names accessed as `this.<name>` directly inside `callback`, in
/// source order, without duplicates
pub fn collect_context_accesses(callback: &Expr) -> Vec<String> {
    let mut collector = AccessCollector::default();
    match callback {
        Expr::Fn(fn_expr) => {
            fn_expr.function.params.visit_with(&mut collector);
            fn_expr.function.body.visit_with(&mut collector);
        }
        Expr::Arrow(arrow) => {
            arrow.params.visit_with(&mut collector);
            arrow.body.visit_with(&mut collector);
        }
        _ => {}
    }
    collector.names
}

/// Replace `this.<name>` with the resolved variable for every name in
/// `resolved`; returns the number of accesses replaced
pub fn replace_context_accesses(callback: &mut Expr, resolved: &HashMap<String, String>) -> usize {
    if resolved.is_empty() {
        return 0;
    }
    let mut replacer = AccessReplacer {
        resolved,
        replaced: 0,
    };
    match callback {
        Expr::Fn(fn_expr) => {
            fn_expr.function.params.visit_mut_with(&mut replacer);
            fn_expr.function.body.visit_mut_with(&mut replacer);
        }
        Expr::Arrow(arrow) => {
            arrow.params.visit_mut_with(&mut replacer);
            arrow.body.visit_mut_with(&mut replacer);
        }
        _ => {}
    }
    replacer.replaced
}

/// Rename every identifier `from` inside `callback` to `to`. Property keys
/// are left alone; shorthand properties keep their key.
pub fn rename_local(callback: &mut Expr, from: &str, to: &str) -> usize {
    let mut renamer = LocalRenamer {
        from,
        to,
        renamed: 0,
    };
    callback.visit_mut_with(&mut renamer);
    renamer.renamed
}

fn context_property(member: &MemberExpr) -> Option<&str> {
    if !matches!(&*member.obj, Expr::This(_)) {
        return None;
    }
    match &member.prop {
        MemberProp::Ident(prop) => Some(prop.sym.as_ref()),
        _ => None,
    }
}

#[derive(Default)]
struct AccessCollector {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl Visit for AccessCollector {
    fn visit_member_expr(&mut self, node: &MemberExpr) {
        if let Some(name) = context_property(node) {
            if self.seen.insert(name.to_string()) {
                self.names.push(name.to_string());
            }
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}

    fn visit_class(&mut self, _: &Class) {}

    fn visit_getter_prop(&mut self, _: &GetterProp) {}

    fn visit_setter_prop(&mut self, _: &SetterProp) {}
}

struct AccessReplacer<'a> {
    resolved: &'a HashMap<String, String>,
    replaced: usize,
}

impl AccessReplacer<'_> {
    fn resolve(&self, member: &MemberExpr) -> Option<Ident> {
        let property = context_property(member)?;
        self.resolved.get(property).map(|name| ident(name))
    }
}

impl VisitMut for AccessReplacer<'_> {
    fn visit_mut_expr(&mut self, node: &mut Expr) {
        if let Expr::Member(member) = node {
            if let Some(replacement) = self.resolve(member) {
                *node = Expr::Ident(replacement);
                self.replaced += 1;
                return;
            }
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_simple_assign_target(&mut self, node: &mut SimpleAssignTarget) {
        if let SimpleAssignTarget::Member(member) = node {
            if let Some(replacement) = self.resolve(member) {
                *node = SimpleAssignTarget::Ident(BindingIdent {
                    id: replacement,
                    type_ann: None,
                });
                self.replaced += 1;
                return;
            }
        }
        node.visit_mut_children_with(self);
    }

    // `[this.a, this.b] = pair` puts the members in pattern position
    fn visit_mut_pat(&mut self, node: &mut Pat) {
        node.visit_mut_children_with(self);
        if let Pat::Expr(expr) = node {
            if let Expr::Ident(id) = &**expr {
                *node = Pat::Ident(BindingIdent {
                    id: id.clone(),
                    type_ann: None,
                });
            }
        }
    }

    fn visit_mut_function(&mut self, _: &mut Function) {}

    fn visit_mut_arrow_expr(&mut self, _: &mut ArrowExpr) {}

    fn visit_mut_class(&mut self, _: &mut Class) {}

    fn visit_mut_getter_prop(&mut self, _: &mut GetterProp) {}

    fn visit_mut_setter_prop(&mut self, _: &mut SetterProp) {}
}

struct LocalRenamer<'a> {
    from: &'a str,
    to: &'a str,
    renamed: usize,
}

impl VisitMut for LocalRenamer<'_> {
    fn visit_mut_ident(&mut self, node: &mut Ident) {
        if &*node.sym == self.from {
            node.sym = self.to.into();
            self.renamed += 1;
        }
    }

    fn visit_mut_prop(&mut self, node: &mut Prop) {
        if let Prop::Shorthand(id) = node {
            if &*id.sym == self.from {
                let mut value = id.clone();
                value.sym = self.to.into();
                *node = Prop::KeyValue(KeyValueProp {
                    key: PropName::Ident(IdentName::new(id.sym.clone(), id.span)),
                    value: Box::new(Expr::Ident(value)),
                });
                self.renamed += 1;
                return;
            }
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_object_pat_prop(&mut self, node: &mut ObjectPatProp) {
        if let ObjectPatProp::Assign(assign) = node {
            if &*assign.key.id.sym == self.from {
                let key = PropName::Ident(IdentName::new(assign.key.id.sym.clone(), assign.key.id.span));
                let mut binding = assign.key.clone();
                binding.id.sym = self.to.into();

                let mut default = assign.value.take();
                default.visit_mut_with(self);

                let value = match default {
                    Some(right) => Pat::Assign(AssignPat {
                        span: DUMMY_SP,
                        left: Box::new(Pat::Ident(binding)),
                        right,
                    }),
                    None => Pat::Ident(binding),
                };
                *node = ObjectPatProp::KeyValue(KeyValuePatProp {
                    key,
                    value: Box::new(value),
                });
                self.renamed += 1;
                return;
            }
        }
        node.visit_mut_children_with(self);
    }
}
