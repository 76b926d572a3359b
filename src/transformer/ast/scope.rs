//! Lexical binding analysis
//!
//! Tracks which names are declared at each function level the rewriter
//! descends through, so a hoisted variable can be checked against the
//! bindings already visible where it is introduced.
//!
//! Scopes follow function boundaries only. A `let` inside a nested block
//! counts as a binding of the enclosing function, which is the coarser (and
//! safer) answer for collision checks.

use std::collections::HashSet;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{Visit, VisitWith};

/// Scope analyzer for tracking variable bindings
pub struct ScopeAnalyzer {
    scopes: Vec<Scope>,
    current_scope: usize,
}

#[derive(Debug, Clone)]
struct Scope {
    parent: Option<usize>,
    kind: ScopeKind,
    bindings: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Function,
}

/// Where a name is bound, seen from the current scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Declared in the current scope itself
    Current,
    /// Declared in an enclosing scope
    Enclosing,
    Unbound,
}

impl ScopeAnalyzer {
    /// Create a new scope analyzer starting with an empty program scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                parent: None,
                kind: ScopeKind::Program,
                bindings: HashSet::new(),
            }],
            current_scope: 0,
        }
    }

    /// Create an analyzer whose program scope holds the module's top-level bindings
    pub fn for_module(module: &Module) -> Self {
        let mut analyzer = Self::new();
        let mut collector = BindingCollector::default();
        module.visit_with(&mut collector);
        analyzer.declare_all(collector.names);
        analyzer
    }

    /// Enter a new scope
    pub fn enter_scope(&mut self, kind: ScopeKind) {
        let parent = self.current_scope;
        self.scopes.push(Scope {
            parent: Some(parent),
            kind,
            bindings: HashSet::new(),
        });
        self.current_scope = self.scopes.len() - 1;
    }

    /// Enter the scope of a function literal, declaring its parameters and
    /// every name its body binds
    pub fn enter_function(&mut self, function: &Expr) {
        self.enter_scope(ScopeKind::Function);
        self.declare_all(function_bindings(function));
    }

    /// Exit the current scope
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current_scope].parent {
            self.current_scope = parent;
        }
    }

    /// Declare a variable in the current scope
    pub fn declare(&mut self, name: &str) {
        self.scopes[self.current_scope]
            .bindings
            .insert(name.to_string());
    }

    pub fn declare_all(&mut self, names: impl IntoIterator<Item = String>) {
        self.scopes[self.current_scope].bindings.extend(names);
    }

    /// Resolve `name` from the current scope outward
    pub fn lookup(&self, name: &str) -> Binding {
        if self.scopes[self.current_scope].bindings.contains(name) {
            return Binding::Current;
        }

        let mut scope_id = self.scopes[self.current_scope].parent;
        while let Some(id) = scope_id {
            if self.scopes[id].bindings.contains(name) {
                return Binding::Enclosing;
            }
            scope_id = self.scopes[id].parent;
        }
        Binding::Unbound
    }

    /// Get the current scope kind
    pub fn current_scope_kind(&self) -> ScopeKind {
        self.scopes[self.current_scope].kind
    }
}

impl Default for ScopeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Names bound by a function or arrow expression: its own name, its
/// parameters, and declarations in its body outside nested functions.
/// Any other expression binds nothing.
pub fn function_bindings(function: &Expr) -> HashSet<String> {
    let mut collector = BindingCollector::default();
    match function {
        Expr::Fn(fn_expr) => {
            if let Some(ident) = &fn_expr.ident {
                collector.names.insert(ident.sym.to_string());
            }
            for param in &fn_expr.function.params {
                pat_names(&param.pat, &mut collector.names);
            }
            if let Some(body) = &fn_expr.function.body {
                body.visit_with(&mut collector);
            }
        }
        Expr::Arrow(arrow) => {
            for param in &arrow.params {
                pat_names(param, &mut collector.names);
            }
            arrow.body.visit_with(&mut collector);
        }
        _ => {}
    }
    collector.names
}

/// Collect the identifiers a binding pattern introduces
pub fn pat_names(pat: &Pat, names: &mut HashSet<String>) {
    match pat {
        Pat::Ident(binding) => {
            names.insert(binding.id.sym.to_string());
        }
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                pat_names(elem, names);
            }
        }
        Pat::Rest(rest) => pat_names(&rest.arg, names),
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => pat_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => {
                        names.insert(assign.key.id.sym.to_string());
                    }
                    ObjectPatProp::Rest(rest) => pat_names(&rest.arg, names),
                }
            }
        }
        Pat::Assign(assign) => pat_names(&assign.left, names),
        Pat::Expr(_) | Pat::Invalid(_) => {}
    }
}

/// Gathers declarations of one scope level without entering nested functions
#[derive(Default)]
struct BindingCollector {
    names: HashSet<String>,
}

impl Visit for BindingCollector {
    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        pat_names(&node.name, &mut self.names);
        node.init.visit_with(self);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.names.insert(node.ident.sym.to_string());
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.names.insert(node.ident.sym.to_string());
    }

    fn visit_import_specifier(&mut self, node: &ImportSpecifier) {
        let local = match node {
            ImportSpecifier::Named(named) => &named.local,
            ImportSpecifier::Default(default) => &default.local,
            ImportSpecifier::Namespace(namespace) => &namespace.local,
        };
        self.names.insert(local.sym.to_string());
    }

    // Block scoped, but counted for the function like any other block binding
    fn visit_catch_clause(&mut self, node: &CatchClause) {
        if let Some(param) = &node.param {
            pat_names(param, &mut self.names);
        }
        node.body.visit_with(self);
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}

    fn visit_class(&mut self, _: &Class) {}

    fn visit_getter_prop(&mut self, _: &GetterProp) {}

    fn visit_setter_prop(&mut self, _: &SetterProp) {}
}
