use std::cell::Cell;

use crate::arena::Arena;
use crate::ast::{
    BinaryOp, Decl, Expr, ExprKind, ParamList, Stmt, StmtKind, Symbol, SymbolKind, Type, TypeKind,
    UnaryOp,
};
use crate::intern::Name;

/// Bundle of the arenas every AST node family is allocated from.
///
/// Passed by value; all passes that create nodes (parser, resolver,
/// typechecker) hold one, so symbols and inferred types live exactly as
/// long as the tree that references them.
#[derive(Clone, Copy)]
pub struct AstContext<'a> {
    pub decls: &'a Arena<Decl<'a>>,
    pub stmts: &'a Arena<Stmt<'a>>,
    pub exprs: &'a Arena<Expr<'a>>,
    pub types: &'a Arena<Type<'a>>,
    pub params: &'a Arena<ParamList<'a>>,
    pub symbols: &'a Arena<Symbol<'a>>,
}

impl<'a> AstContext<'a> {
    pub fn new(
        decls: &'a Arena<Decl<'a>>,
        stmts: &'a Arena<Stmt<'a>>,
        exprs: &'a Arena<Expr<'a>>,
        types: &'a Arena<Type<'a>>,
        params: &'a Arena<ParamList<'a>>,
        symbols: &'a Arena<Symbol<'a>>,
    ) -> Self {
        AstContext {
            decls,
            stmts,
            exprs,
            types,
            params,
            symbols,
        }
    }

    pub fn alloc_decl(&self, decl: Decl<'a>) -> &'a Decl<'a> {
        self.decls.alloc(decl)
    }

    pub fn alloc_stmt(&self, stmt: Stmt<'a>) -> &'a Stmt<'a> {
        self.stmts.alloc(stmt)
    }

    pub fn alloc_expr(&self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.exprs.alloc(expr)
    }

    pub fn alloc_type(&self, ty: Type<'a>) -> &'a Type<'a> {
        self.types.alloc(ty)
    }

    pub fn alloc_param(&self, param: ParamList<'a>) -> &'a ParamList<'a> {
        self.params.alloc(param)
    }

    pub fn alloc_symbol(&self, symbol: Symbol<'a>) -> &'a Symbol<'a> {
        self.symbols.alloc(symbol)
    }

    #[inline(always)]
    pub fn expr(&self, kind: ExprKind<'a>) -> &'a Expr<'a> {
        self.exprs.alloc(Expr::new(kind))
    }

    #[inline(always)]
    pub fn binary(&self, op: BinaryOp, left: &'a Expr<'a>, right: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(ExprKind::Binary { op, left, right })
    }

    #[inline(always)]
    pub fn unary(&self, op: UnaryOp, operand: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(ExprKind::Unary { op, operand })
    }

    #[inline(always)]
    pub fn group(&self, inner: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(ExprKind::Group(inner))
    }

    #[inline(always)]
    pub fn ident(&self, name: Name) -> &'a Expr<'a> {
        self.expr(ExprKind::Ident(name))
    }

    #[inline(always)]
    pub fn integer_lit(&self, value: i64) -> &'a Expr<'a> {
        self.expr(ExprKind::IntegerLit(value))
    }

    #[inline(always)]
    pub fn stmt(&self, kind: StmtKind<'a>) -> &'a Stmt<'a> {
        self.stmts.alloc(Stmt::new(kind))
    }

    #[inline(always)]
    pub fn ty(&self, kind: TypeKind) -> &'a Type<'a> {
        self.types.alloc(Type::new(kind))
    }

    #[inline(always)]
    pub fn array_type(
        &self,
        kind: TypeKind,
        length: Option<&'a Expr<'a>>,
        subtype: &'a Type<'a>,
    ) -> &'a Type<'a> {
        self.types.alloc(Type {
            kind,
            subtype: Cell::new(Some(subtype)),
            params: None,
            length: Cell::new(length),
            symbol: Cell::new(None),
        })
    }

    #[inline(always)]
    pub fn function_type(
        &self,
        returns: &'a Type<'a>,
        params: Option<&'a ParamList<'a>>,
    ) -> &'a Type<'a> {
        self.types.alloc(Type {
            kind: TypeKind::Function,
            subtype: Cell::new(Some(returns)),
            params,
            length: Cell::new(None),
            symbol: Cell::new(None),
        })
    }

    pub fn symbol(&self, kind: SymbolKind, ty: &'a Type<'a>, name: Name) -> &'a Symbol<'a> {
        self.symbols.alloc(Symbol::new(kind, ty, name))
    }
}
