//! Call classification by callee name
//!
//! Mocha's BDD and TDD interfaces register suites, hooks and tests through
//! plain global functions. Only calls whose callee is a bare identifier are
//! considered; `describe.only(...)` and friends are ordinary calls.

use swc_core::ecma::ast::*;

/// The role a call plays in the suite hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallRole {
    /// `suite`, `describe`, `context`
    CreatesSuite,
    /// `setup`, `before`, `beforeEach`
    InstallsSetup,
    /// `test`, `it`, `teardown`, `after`, `afterEach`
    UsesContext,
    Ordinary,
}

pub fn classify(call: &CallExpr) -> CallRole {
    match callee_name(call) {
        Some(name) => classify_name(name),
        None => CallRole::Ordinary,
    }
}

pub fn classify_name(name: &str) -> CallRole {
    match name {
        "suite" | "describe" | "context" => CallRole::CreatesSuite,
        "setup" | "before" | "beforeEach" => CallRole::InstallsSetup,
        "test" | "it" | "teardown" | "after" | "afterEach" => CallRole::UsesContext,
        _ => CallRole::Ordinary,
    }
}

pub fn creates_suite(call: &CallExpr) -> bool {
    classify(call) == CallRole::CreatesSuite
}

fn callee_name(call: &CallExpr) -> Option<&str> {
    if let Callee::Expr(callee) = &call.callee {
        if let Expr::Ident(ident) = &**callee {
            return Some(ident.sym.as_ref());
        }
    }
    None
}
