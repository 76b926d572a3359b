//! Callback shape normalization
//!
//! Converts `function` callbacks into arrow functions and injects hoisted
//! `let` declarations into a callback body after any declarations the
//! author already wrote.

use swc_core::common::{SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{Visit, VisitWith};

/// Build a plain identifier
pub fn ident(name: &str) -> Ident {
    Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
}

/// `let <name>;`
pub fn let_declaration(name: &str) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind: VarDeclKind::Let,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: Pat::Ident(BindingIdent {
                id: ident(name),
                type_ann: None,
            }),
            init: None,
            definite: false,
        }],
    })))
}

/// Place `declarations` after the leading run of variable declarations in
/// `body` and before every other statement
pub fn splice_declarations(body: Vec<Stmt>, declarations: Vec<Stmt>) -> Vec<Stmt> {
    if declarations.is_empty() {
        return body;
    }

    let leading = body
        .iter()
        .take_while(|stmt| matches!(stmt, Stmt::Decl(Decl::Var(_))))
        .count();

    let mut body = body;
    let rest = body.split_off(leading);
    body.extend(declarations);
    body.extend(rest);
    body
}

/// Inject declarations into a function or arrow callback. An expression
/// bodied arrow gets a block body that returns the original expression.
/// Returns false when `callback` is not a function literal.
pub fn inject_declarations(callback: &mut Expr, declarations: Vec<Stmt>) -> bool {
    match callback {
        Expr::Fn(fn_expr) => {
            if let Some(body) = &mut fn_expr.function.body {
                let stmts = std::mem::take(&mut body.stmts);
                body.stmts = splice_declarations(stmts, declarations);
                true
            } else {
                false
            }
        }
        Expr::Arrow(arrow) => {
            match &mut *arrow.body {
                BlockStmtOrExpr::BlockStmt(block) => {
                    let stmts = std::mem::take(&mut block.stmts);
                    block.stmts = splice_declarations(stmts, declarations);
                }
                BlockStmtOrExpr::Expr(expr) => {
                    if declarations.is_empty() {
                        return true;
                    }
                    let mut stmts = declarations;
                    stmts.push(Stmt::Return(ReturnStmt {
                        span: DUMMY_SP,
                        arg: Some(expr.clone()),
                    }));
                    *arrow.body = BlockStmtOrExpr::BlockStmt(BlockStmt {
                        span: DUMMY_SP,
                        ctxt: SyntaxContext::empty(),
                        stmts,
                    });
                }
            }
            true
        }
        _ => false,
    }
}

/// Convert an anonymous `function` expression into an arrow function with
/// the same parameters, body and async marker.
///
/// Anything else is returned untouched: arrows, identifiers, named function
/// expressions (their name may be used for recursion), generators (arrows
/// cannot yield), and functions that still read `this` or `arguments`,
/// since an arrow would capture those from the enclosing scope instead.
pub fn arrowify(expr: Expr) -> Expr {
    let fn_expr = match expr {
        Expr::Fn(fn_expr)
            if fn_expr.ident.is_none()
                && fn_expr.function.body.is_some()
                && !fn_expr.function.is_generator =>
        {
            fn_expr
        }
        Expr::Paren(paren) if matches!(&*paren.expr, Expr::Fn(_)) => {
            let inner = arrowify(*paren.expr);
            return Expr::Paren(ParenExpr {
                span: paren.span,
                expr: Box::new(inner),
            });
        }
        other => return other,
    };

    if uses_dynamic_receiver(&fn_expr.function) {
        return Expr::Fn(fn_expr);
    }

    let function = *fn_expr.function;
    let body = function.body.unwrap_or_else(|| BlockStmt {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        stmts: vec![],
    });

    Expr::Arrow(ArrowExpr {
        span: function.span,
        ctxt: function.ctxt,
        params: function.params.into_iter().map(|param| param.pat).collect(),
        body: Box::new(BlockStmtOrExpr::BlockStmt(body)),
        is_async: function.is_async,
        is_generator: false,
        type_params: function.type_params,
        return_type: function.return_type,
    })
}

/// Arrowify the trailing argument of a call, leaving the others untouched.
/// Returns true when the callback changed shape.
pub fn arrowify_callback(args: &mut [ExprOrSpread]) -> bool {
    let Some(last) = args.last_mut() else {
        return false;
    };
    if last.spread.is_some() {
        return false;
    }

    let was_arrow = matches!(&*last.expr, Expr::Arrow(_));
    let callback = std::mem::replace(&mut *last.expr, Expr::Invalid(Invalid { span: DUMMY_SP }));
    *last.expr = arrowify(callback);

    !was_arrow && is_arrow(&last.expr)
}

fn is_arrow(expr: &Expr) -> bool {
    match expr {
        Expr::Arrow(_) => true,
        Expr::Paren(paren) => is_arrow(&paren.expr),
        _ => false,
    }
}

/// True when `function` reads its own `this` or `arguments`, looking
/// through nested arrows (which share them) but not nested functions
pub fn uses_dynamic_receiver(function: &Function) -> bool {
    let mut finder = ReceiverFinder::default();
    function.params.visit_with(&mut finder);
    function.body.visit_with(&mut finder);
    finder.found
}

#[derive(Default)]
struct ReceiverFinder {
    found: bool,
}

impl Visit for ReceiverFinder {
    fn visit_this_expr(&mut self, _: &ThisExpr) {
        self.found = true;
    }

    fn visit_ident(&mut self, node: &Ident) {
        if &*node.sym == "arguments" {
            self.found = true;
        }
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_class(&mut self, _: &Class) {}

    fn visit_getter_prop(&mut self, _: &GetterProp) {}

    fn visit_setter_prop(&mut self, _: &SetterProp) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::ast::{AstParser, CodeGenerator};
    use std::path::Path;

    fn parse_stmts(code: &str) -> Vec<Stmt> {
        let module = AstParser::new().parse(code, Path::new("test.js")).unwrap();
        module
            .body
            .into_iter()
            .map(|item| match item {
                ModuleItem::Stmt(stmt) => stmt,
                other => panic!("Expected a statement, got {:?}", other),
            })
            .collect()
    }

    fn parse_expr(code: &str) -> Expr {
        match parse_stmts(code).into_iter().next() {
            Some(Stmt::Expr(stmt)) => match *stmt.expr {
                Expr::Paren(paren) => *paren.expr,
                expr => expr,
            },
            other => panic!("Expected an expression, got {:?}", other),
        }
    }

    fn print_stmts(stmts: Vec<Stmt>) -> String {
        let module = Module {
            span: DUMMY_SP,
            body: stmts.into_iter().map(ModuleItem::Stmt).collect(),
            shebang: None,
        };
        CodeGenerator::new().generate(&module).unwrap()
    }

    fn print_expr(expr: Expr) -> String {
        print_stmts(vec![Stmt::Expr(ExprStmt {
            span: DUMMY_SP,
            expr: Box::new(expr),
        })])
    }

    #[test]
    fn test_splice_after_leading_declarations() {
        let body = parse_stmts("const a = 1; var b = 2; run(); let c = 3;");
        let spliced = splice_declarations(body, vec![let_declaration("x"), let_declaration("y")]);

        let kinds: Vec<String> = spliced
            .iter()
            .map(|stmt| match stmt {
                Stmt::Decl(Decl::Var(var)) => match &var.decls[0].name {
                    Pat::Ident(binding) => binding.id.sym.to_string(),
                    _ => "?".to_string(),
                },
                Stmt::Expr(_) => "expr".to_string(),
                _ => "other".to_string(),
            })
            .collect();

        assert_eq!(kinds, vec!["a", "b", "x", "y", "expr", "c"]);
    }

    #[test]
    fn test_splice_into_body_without_declarations() {
        let body = parse_stmts("run();");
        let spliced = splice_declarations(body, vec![let_declaration("x")]);
        let printed = print_stmts(spliced);

        assert!(printed.find("let x").unwrap() < printed.find("run()").unwrap());
    }

    #[test]
    fn test_arrowify_anonymous_function() {
        let expr = parse_expr("(async function(done) { await go(done); })");
        let printed = print_expr(arrowify(expr));

        assert!(printed.contains("async"));
        assert!(printed.contains("=>"));
        assert!(!printed.contains("function"));
    }

    #[test]
    fn test_arrowify_skips_generators() {
        match arrowify(parse_expr("(function*() { yield 1; })")) {
            Expr::Fn(fn_expr) => assert!(fn_expr.function.is_generator),
            other => panic!("Expected a generator function, got {:?}", other),
        }

        let mut call = match parse_expr("it('yields', function*() { yield 1; })") {
            Expr::Call(call) => call,
            other => panic!("Expected a call, got {:?}", other),
        };
        assert!(!arrowify_callback(&mut call.args));
        assert!(print_expr(Expr::Call(call)).contains("function*"));
    }

    #[test]
    fn test_arrowify_skips_named_and_non_functions() {
        assert!(matches!(arrowify(parse_expr("(function named() {})")), Expr::Fn(_)));
        assert!(matches!(arrowify(parse_expr("callback")), Expr::Ident(_)));
        assert!(matches!(arrowify(parse_expr("(() => 1)")), Expr::Arrow(_)));
    }

    #[test]
    fn test_arrowify_keeps_functions_using_this() {
        assert!(matches!(
            arrowify(parse_expr("(function() { this.timeout(100); })")),
            Expr::Fn(_)
        ));
        assert!(matches!(
            arrowify(parse_expr("(function() { return arguments.length; })")),
            Expr::Fn(_)
        ));
        assert!(matches!(
            arrowify(parse_expr("(function() { return () => this.x; })")),
            Expr::Fn(_)
        ));
        assert!(matches!(
            arrowify(parse_expr("(function() { return function() { return this; }; })")),
            Expr::Arrow(_)
        ));
    }

    #[test]
    fn test_arrowify_callback_only_touches_last_argument() {
        let mut call = match parse_expr("it('works', function() {}, function() {})") {
            Expr::Call(call) => call,
            other => panic!("Expected a call, got {:?}", other),
        };

        assert!(arrowify_callback(&mut call.args));
        assert!(matches!(&*call.args[0].expr, Expr::Lit(_)));
        assert!(matches!(&*call.args[1].expr, Expr::Fn(_)));
        assert!(matches!(&*call.args[2].expr, Expr::Arrow(_)));

        assert!(!arrowify_callback(&mut call.args));
        assert!(!arrowify_callback(&mut []));
    }

    #[test]
    fn test_inject_into_expression_arrow() {
        let mut expr = parse_expr("(() => before(setup))");
        assert!(inject_declarations(&mut expr, vec![let_declaration("x")]));

        let printed = print_expr(expr);
        assert!(printed.contains("let x;"));
        assert!(printed.contains("return before(setup)"));
    }

    #[test]
    fn test_inject_rejects_non_functions() {
        let mut expr = parse_expr("callback");
        assert!(!inject_declarations(&mut expr, vec![let_declaration("x")]));
    }
}
