use super::*;
use crate::arena::Arena;
use crate::ast::{Expr, ExprKind, Symbol, Type, TypeKind};
use crate::intern::Interner;
use crate::lexer::Lexer;

/// Renders an expression tree as an s-expression for shape assertions.
fn shape(e: &Expr<'_>, interner: &Interner) -> String {
    match &e.kind {
        ExprKind::Binary { op, left, right } => format!(
            "({} {} {})",
            op.token(),
            shape(left, interner),
            shape(right, interner)
        ),
        ExprKind::Unary { op, operand } => {
            format!("({} {})", op.token(), shape(operand, interner))
        }
        ExprKind::Group(inner) => format!("(group {})", shape(inner, interner)),
        ExprKind::Call { callee, args } => match args {
            Some(args) => format!(
                "(call {} {})",
                shape(callee, interner),
                shape(args, interner)
            ),
            None => format!("(call {})", shape(callee, interner)),
        },
        ExprKind::Args { arg, next } => match next {
            Some(next) => format!("{} {}", shape(arg, interner), shape(next, interner)),
            None => shape(arg, interner),
        },
        ExprKind::Index { array, index } => format!(
            "(index {} {})",
            shape(array, interner),
            shape(index, interner)
        ),
        ExprKind::Braces { items } => match items {
            Some(items) => format!("(braces {})", shape(items, interner)),
            None => "(braces)".to_string(),
        },
        ExprKind::IntegerLit(v) => v.to_string(),
        ExprKind::HexLit(v) => format!("hex:{}", v),
        ExprKind::BinaryLit(v) => format!("bin:{}", v),
        ExprKind::DoubleLit(v) => format!("{:?}", v),
        ExprKind::ScientificLit(v) => format!("{:e}", v),
        ExprKind::CharLit(c) => format!("char:{}", c),
        ExprKind::StringLit(n) => format!("str:{}", interner.resolve(*n)),
        ExprKind::BooleanLit(b) => b.to_string(),
        ExprKind::Ident(n) => interner.resolve(*n).to_string(),
    }
}

/// Parses a standalone expression and returns its shape.
fn expr_shape(source: &str) -> String {
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
    let expr = parser.parse_expr().expect("expression should parse");
    shape(expr, &interner)
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(expr_shape("a+b*c"), "(+ a (* b c))");
    assert_eq!(expr_shape("a*b+c"), "(+ (* a b) c)");
}

#[test]
fn parentheses_produce_group_nodes() {
    assert_eq!(expr_shape("(a+b)*c"), "(* (group (+ a b)) c)");
}

#[test]
fn assignment_and_exponent_associate_right() {
    assert_eq!(expr_shape("a = b = c"), "(= a (= b c))");
    assert_eq!(expr_shape("a^b^c"), "(^ a (^ b c))");
}

#[test]
fn subtraction_associates_left() {
    assert_eq!(expr_shape("a-b-c"), "(- (- a b) c)");
}

#[test]
fn unary_binds_tighter_than_exponent() {
    assert_eq!(expr_shape("-x^2"), "(^ (- x) 2)");
}

#[test]
fn double_negation_nests() {
    assert_eq!(expr_shape("!!a"), "(! (! a))");
}

#[test]
fn postfix_operators_apply_to_primaries() {
    assert_eq!(expr_shape("a[i]++"), "(++ (index a i))");
    assert_eq!(expr_shape("x--"), "(-- x)");
}

#[test]
fn calls_carry_argument_chains() {
    assert_eq!(expr_shape("f(1, 2, 3)"), "(call f 1 2 3)");
    assert_eq!(expr_shape("f()"), "(call f)");
}

#[test]
fn logical_operators_rank_below_comparison() {
    assert_eq!(expr_shape("a<b && c>d"), "(&& (< a b) (> c d))");
    assert_eq!(expr_shape("a || b && c"), "(|| a (&& b c))");
}

#[test]
fn radix_literals_keep_their_tags() {
    assert_eq!(expr_shape("0x10+0b101"), "(+ hex:16 bin:5)");
}

#[test]
fn declaration_carries_name_type_and_value() {
    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let tokens = Lexer::new("x: integer = 5;", &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    let root = parser.parse_program().unwrap().unwrap();

    assert_eq!(interner.resolve(root.name), "x");
    assert_eq!(root.ty.get().kind, TypeKind::Integer);
    assert!(matches!(
        root.value.unwrap().kind,
        ExprKind::IntegerLit(5)
    ));
    assert!(root.body.is_none());
    assert!(root.next.get().is_none());
}

#[test]
fn prototype_and_definition_differ_by_body() {
    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let source = "f: function integer (a: integer);\nf: function integer (a: integer) = { return a; }";
    let tokens = Lexer::new(source, &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    let proto = parser.parse_program().unwrap().unwrap();
    let def = proto.next.get().unwrap();

    assert!(proto.body.is_none());
    let body = def.body.unwrap();
    assert!(matches!(body.kind, StmtKind::Block { body: Some(_) }));

    let fn_ty = def.ty.get();
    assert_eq!(fn_ty.kind, TypeKind::Function);
    assert_eq!(fn_ty.subtype.get().unwrap().kind, TypeKind::Integer);
    let param = fn_ty.params.unwrap();
    assert_eq!(interner.resolve(param.name), "a");
    assert!(param.next.is_none());
}

#[test]
fn empty_function_body_is_still_a_definition() {
    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let tokens = Lexer::new("main: function void () = { }", &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    let root = parser.parse_program().unwrap().unwrap();

    let body = root.body.unwrap();
    assert!(matches!(body.kind, StmtKind::Block { body: None }));
}

#[test]
fn array_types_nest_with_lengths() {
    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let tokens = Lexer::new("a: array [5] array [] integer;", &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    let root = parser.parse_program().unwrap().unwrap();

    let outer = root.ty.get();
    assert_eq!(outer.kind, TypeKind::Array);
    assert!(matches!(
        outer.length.get().unwrap().kind,
        ExprKind::IntegerLit(5)
    ));
    let inner = outer.subtype.get().unwrap();
    assert_eq!(inner.kind, TypeKind::Array);
    assert!(inner.length.get().is_none());
    assert_eq!(inner.subtype.get().unwrap().kind, TypeKind::Integer);
}

#[test]
fn statements_chain_through_next() {
    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let source = "main: function void () = { x: integer = 1; x = 2; return; }";
    let tokens = Lexer::new(source, &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    let root = parser.parse_program().unwrap().unwrap();

    let StmtKind::Block { body: Some(first) } = &root.body.unwrap().kind else {
        panic!("expected a block body");
    };
    assert!(matches!(first.kind, StmtKind::Decl(_)));
    let second = first.next.get().unwrap();
    assert!(matches!(second.kind, StmtKind::Expr(_)));
    let third = second.next.get().unwrap();
    assert!(matches!(third.kind, StmtKind::Return { value: None }));
    assert!(third.next.get().is_none());
}

#[test]
fn missing_semicolon_is_a_parse_error() {
    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let tokens = Lexer::new("x: integer = 5", &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    assert!(parser.parse_program().is_err());
}
