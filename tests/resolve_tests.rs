//! Name-resolution integration tests: binding, redeclaration, the
//! prototype/definition decision table, and diagnostic wording.

use bminor::arena::Arena;
use bminor::arena_ctx::AstContext;
use bminor::ast::{Decl, Expr, ExprKind, ParamList, Stmt, StmtKind, Symbol, SymbolKind, Type};
use bminor::compile::resolve_source;
use bminor::context::Context;
use bminor::{Interner, Lexer, Parser};

fn lines(source: &str) -> (Vec<String>, u32) {
    let output = resolve_source(source).expect("source should parse");
    (output.lines(), output.resolver_errors)
}

#[test]
fn single_declaration_resolves_cleanly() {
    let (diagnostics, errors) = lines("x: integer = 5;");
    assert_eq!(errors, 0);
    assert!(diagnostics.is_empty());
}

#[test]
fn redeclaration_in_same_scope_is_an_error() {
    let (diagnostics, errors) = lines("x: integer = 5; x: integer = 6;");
    assert_eq!(errors, 1);
    assert_eq!(
        diagnostics[0],
        "resolver error: Redeclaring an Identifier 'x' in the same scope"
    );
}

#[test]
fn shadowing_an_outer_scope_is_legal() {
    let source = "x: integer = 5;\nmain: function void () = { x: integer = 6; print x; }";
    let (_, errors) = lines(source);
    assert_eq!(errors, 0);
}

#[test]
fn undefined_identifier_is_an_error() {
    let (diagnostics, errors) = lines("x: integer = 5;\nmain: function void () = { y = 3; }");
    assert_eq!(errors, 1);
    assert_eq!(diagnostics[0], "resolver error: Identifier 'y' is not defined");
}

#[test]
fn initializer_cannot_reference_the_name_it_declares() {
    let (_, errors) = lines("x: integer = x;");
    assert_eq!(errors, 1);
}

#[test]
fn reusing_a_function_name_for_a_variable_is_an_error() {
    let source = "f: function void () = { }\nf: integer = 5;";
    let (diagnostics, errors) = lines(source);
    assert_eq!(errors, 1);
    assert_eq!(
        diagnostics[0],
        "resolver error: Reusing Identifier 'f' for function name"
    );
}

#[test]
fn reusing_a_variable_name_for_a_function_is_an_error() {
    let source = "f: integer = 5;\nf: function void () = { }";
    let (diagnostics, errors) = lines(source);
    assert_eq!(errors, 1);
    assert!(diagnostics[0].contains("Reusing Identifier 'f'"));
}

#[test]
fn prototype_then_definition_is_accepted() {
    let source =
        "f: function integer (a: integer);\nf: function integer (a: integer) = { return a; }";
    let (diagnostics, errors) = lines(source);
    assert_eq!(errors, 0);
    assert!(diagnostics.is_empty());
}

#[test]
fn second_definition_is_an_error() {
    let source = "f: function void () = { }\nf: function void () = { }";
    let (diagnostics, errors) = lines(source);
    assert_eq!(errors, 1);
    assert_eq!(diagnostics[0], "resolver error: Redefinition of function 'f'");
}

#[test]
fn repeated_prototype_is_a_warning_not_an_error() {
    let source = "f: function void ();\nf: function void ();";
    let (diagnostics, errors) = lines(source);
    assert_eq!(errors, 0);
    assert_eq!(
        diagnostics[0],
        "Resolver Warning: Prototype 'f' already defined"
    );
}

#[test]
fn prototype_after_definition_is_a_warning() {
    let source = "f: function void () = { }\nf: function void ();";
    let (diagnostics, errors) = lines(source);
    assert_eq!(errors, 0);
    assert!(diagnostics[0].starts_with("Resolver Warning: Prototype 'f'"));
}

#[test]
fn prototype_mismatch_is_reported() {
    let source = "f: function integer (a: integer);\nf: function integer (a: string) = { return 0; }";
    let (diagnostics, errors) = lines(source);
    assert_eq!(errors, 1);
    assert!(diagnostics[0].contains("does not match its prototype"));
}

#[test]
fn return_type_mismatch_against_prototype_is_reported() {
    let source = "f: function integer ();\nf: function string () = { return \"x\"; }";
    let (_, errors) = lines(source);
    assert_eq!(errors, 1);
}

#[test]
fn duplicate_parameter_names_are_rejected() {
    let source = "f: function void (a: integer, a: boolean) = { }";
    let (diagnostics, errors) = lines(source);
    assert_eq!(errors, 1);
    assert_eq!(
        diagnostics[0],
        "resolver error: Duplicate parameter name 'a' in function declaration"
    );
}

#[test]
fn declaration_as_single_line_if_body_is_rejected() {
    let source = "main: function void () = { if (true) x: integer = 5; }";
    let (diagnostics, errors) = lines(source);
    assert_eq!(errors, 1);
    assert!(diagnostics[0].contains("single-line 'if' body"));
}

#[test]
fn declaration_as_single_line_for_body_is_rejected() {
    let source = "main: function void () = { for (;;) x: integer = 5; }";
    let (_, errors) = lines(source);
    assert_eq!(errors, 1);
}

#[test]
fn declaration_in_braced_body_is_legal() {
    let source = "main: function void () = { if (true) { x: integer = 5; } }";
    let (_, errors) = lines(source);
    assert_eq!(errors, 0);
}

#[test]
fn sibling_scopes_may_reuse_names() {
    let source = "main: function void () = { { x: integer = 1; } { x: integer = 2; } }";
    let (_, errors) = lines(source);
    assert_eq!(errors, 0);
}

#[test]
fn parameters_are_visible_in_the_body() {
    let source = "f: function integer (a: integer, b: integer) = { return a+b; }";
    let (_, errors) = lines(source);
    assert_eq!(errors, 0);
}

/// P2: a resolved identifier's symbol carries the identifier's own name
/// and the binding site's kind.
#[test]
fn resolved_identifier_points_to_its_binding() {
    let source = "x: integer = 5;\nmain: function void () = { print x; }";

    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let tokens = Lexer::new(source, &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    let root = parser.parse_program().unwrap().unwrap();

    let mut context = Context::new();
    bminor::resolve::resolve(ctx, &interner, &mut context, Some(root));
    assert_eq!(context.resolver_errors, 0);

    let main = root.next.get().unwrap();
    let StmtKind::Block { body: Some(stmt) } = &main.body.unwrap().kind else {
        panic!("expected a block body");
    };
    let StmtKind::Print { args: Some(args) } = &stmt.kind else {
        panic!("expected a print statement");
    };
    let ExprKind::Args { arg, .. } = &args.kind else {
        panic!("expected an argument chain");
    };
    let symbol = arg.symbol.get().expect("identifier should be resolved");
    assert_eq!(interner.resolve(symbol.name), "x");
    assert_eq!(symbol.kind, SymbolKind::Global);
    assert_eq!(symbol.which.get(), 0);

    // The binding declaration shares the same symbol record.
    assert!(std::ptr::eq(root.symbol.get().unwrap(), symbol));
}

/// P5: deep-copying an AST and resolving the copy produces the same
/// diagnostic counts as resolving the original.
#[test]
fn deep_copy_resolves_identically() {
    let source = "x: integer = 5;\nx: integer = 6;\nmain: function void () = { y = x; }";

    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let tokens = Lexer::new(source, &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    let root = parser.parse_program().unwrap().unwrap();
    let copy = root.copy_in(ctx);

    let mut original_ctx = Context::new();
    bminor::resolve::resolve(ctx, &interner, &mut original_ctx, Some(root));
    let mut copy_ctx = Context::new();
    bminor::resolve::resolve(ctx, &interner, &mut copy_ctx, Some(copy));

    assert_eq!(original_ctx.resolver_errors, copy_ctx.resolver_errors);
    assert_eq!(original_ctx.diagnostics.len(), copy_ctx.diagnostics.len());
}
