//! Name resolution: walks the declaration chain, creates symbols at
//! binding sites, attaches them to every use, and reconciles function
//! prototypes against definitions.

use crate::arena_ctx::AstContext;
use crate::ast::{Decl, ExprKind, ParamList, Stmt, StmtKind, Symbol, SymbolKind, TypeKind};
use crate::ast::Expr;
use crate::context::{Context, Phase};
use crate::display::DisplayWith;
use crate::intern::Interner;
use crate::scope::ScopeStack;

pub struct Resolver<'a, 'ctx> {
    ctx: AstContext<'a>,
    interner: &'ctx Interner,
    diags: &'ctx mut Context,
    scopes: ScopeStack<'a>,
}

/// Resolves a whole translation unit.
pub fn resolve<'a>(
    ctx: AstContext<'a>,
    interner: &Interner,
    diags: &mut Context,
    root: Option<&'a Decl<'a>>,
) {
    let mut resolver = Resolver {
        ctx,
        interner,
        diags,
        scopes: ScopeStack::new(),
    };
    resolver.scopes.enter();
    let mut current = root;
    while let Some(decl) = current {
        resolver.resolve_decl(decl);
        current = decl.next.get();
    }
    resolver.scopes.exit();
}

impl<'a, 'ctx> Resolver<'a, 'ctx> {
    fn resolve_decl(&mut self, d: &Decl<'a>) {
        let kind = if self.scopes.level() <= 1 {
            SymbolKind::Global
        } else {
            SymbolKind::Local
        };
        let symbol = self.ctx.symbol(kind, d.ty.get(), d.name);

        // The initializer is resolved against the environment *before*
        // the new name is bound, so `x: integer = x;` is undefined.
        if let Some(value) = d.value {
            self.resolve_expr(value);
        }

        let existing = self.scopes.lookup_current(d.name);
        if d.ty.get().kind == TypeKind::Function {
            symbol.prototype.set(d.body.is_none());
            self.resolve_function(d, symbol, existing);
        } else {
            self.resolve_variable(d, symbol, existing);
        }
    }

    fn resolve_variable(
        &mut self,
        d: &Decl<'a>,
        symbol: &'a Symbol<'a>,
        existing: Option<&'a Symbol<'a>>,
    ) {
        match existing {
            Some(prev) => {
                let name = self.interner.resolve(d.name);
                if prev.ty.get().kind == TypeKind::Function {
                    self.diags.error(
                        Phase::Resolver,
                        format!("Reusing Identifier '{}' for function name", name),
                    );
                } else {
                    self.diags.error(
                        Phase::Resolver,
                        format!("Redeclaring an Identifier '{}' in the same scope", name),
                    );
                }
                // The declaration falls back to the symbol that won.
                d.symbol.set(Some(prev));
            }
            None => {
                self.scopes.bind(d.name, symbol);
                d.symbol.set(Some(symbol));
                // Hand the symbol to a brace initializer so the type
                // checker can consult the intended array type.
                if matches!(
                    d.ty.get().kind,
                    TypeKind::Array | TypeKind::Carray | TypeKind::Auto
                ) {
                    if let Some(value) = d.value {
                        if matches!(value.kind, ExprKind::Braces { .. }) {
                            value.symbol.set(Some(symbol));
                        }
                    }
                }
            }
        }
    }

    fn resolve_function(
        &mut self,
        d: &Decl<'a>,
        symbol: &'a Symbol<'a>,
        existing: Option<&'a Symbol<'a>>,
    ) {
        match existing {
            None => {
                self.scopes.bind(d.name, symbol);
                d.symbol.set(Some(symbol));
            }
            Some(prev) if prev.ty.get().kind != TypeKind::Function => {
                let name = self.interner.resolve(d.name);
                self.diags.error(
                    Phase::Resolver,
                    format!("Reusing Identifier '{}' for function name", name),
                );
                d.symbol.set(Some(prev));
            }
            Some(prev) => {
                let name = self.interner.resolve(d.name).to_string();
                match (prev.prototype.get(), d.body.is_some()) {
                    (true, true) => {
                        // Prototype followed by its definition.
                        prev.prototype.set(false);
                    }
                    (false, true) => {
                        self.diags.error(
                            Phase::Resolver,
                            format!("Redefinition of function '{}'", name),
                        );
                    }
                    (_, false) => {
                        self.diags.warning(
                            Phase::Resolver,
                            format!("Prototype '{}' already defined", name),
                        );
                    }
                }
                d.symbol.set(Some(prev));
                self.check_prototype_consistency(d, prev, &name);
            }
        }
        if let Some(body) = d.body {
            self.resolve_function_body(d, body);
        }
    }

    /// Compares a repeated function declaration against the symbol bound
    /// for the name: return subtypes and parameter types must agree.
    fn check_prototype_consistency(&mut self, d: &Decl<'a>, prev: &'a Symbol<'a>, name: &str) {
        let new_ty = d.ty.get();
        let prev_ty = prev.ty.get();
        let returns_match = match (new_ty.subtype.get(), prev_ty.subtype.get()) {
            (Some(a), Some(b)) => a.equals(b),
            (None, None) => true,
            _ => false,
        };
        let params_match = ParamList::types_equal(new_ty.params, prev_ty.params);
        if !returns_match || !params_match {
            let message = format!(
                "Function '{}' does not match its prototype. Expected ( {} ), but got ( {} )",
                name,
                prev_ty.with(self.interner),
                new_ty.with(self.interner)
            );
            self.diags.error(Phase::Resolver, message);
        }
    }

    /// Opens the parameter scope and the body scope, resolves both, and
    /// records the frame counts the code generator will need.
    fn resolve_function_body(&mut self, d: &Decl<'a>, body: &Stmt<'a>) {
        self.scopes.enter();
        self.resolve_params(d.ty.get().params);
        d.param_count.set(self.scopes.counter());

        self.scopes.enter();
        body.func_sym.set(d.symbol.get());
        if let StmtKind::Block { body: Some(inner) } = &body.kind {
            inner.func_sym.set(body.func_sym.get());
            self.resolve_stmt_chain(inner);
        }
        d.locals.set(self.scopes.counter());
        self.scopes.exit();
        self.scopes.exit();
    }

    fn resolve_params(&mut self, params: Option<&'a ParamList<'a>>) {
        let mut current = params;
        while let Some(param) = current {
            if self.scopes.lookup_current(param.name).is_some() {
                let name = self.interner.resolve(param.name);
                self.diags.error(
                    Phase::Resolver,
                    format!("Duplicate parameter name '{}' in function declaration", name),
                );
            } else {
                let symbol = self.ctx.symbol(SymbolKind::Param, param.ty, param.name);
                self.scopes.bind(param.name, symbol);
                param.symbol.set(Some(symbol));
            }
            current = param.next;
        }
    }

    fn resolve_stmt_chain(&mut self, first: &Stmt<'a>) {
        let mut current = Some(first);
        while let Some(stmt) = current {
            if let Some(next) = stmt.next.get() {
                next.func_sym.set(stmt.func_sym.get());
            }
            self.resolve_stmt(stmt);
            current = stmt.next.get();
        }
    }

    /// A declaration as the unbraced body of `if`/`else`/`for` would bind
    /// a name no one can ever reference; reject it, then resolve it anyway
    /// to surface further diagnostics.
    fn check_single_line_decl(&mut self, body: &Stmt<'a>, keyword: &str) {
        if let StmtKind::Decl(d) = &body.kind {
            let name = self.interner.resolve(d.name);
            self.diags.error(
                Phase::Resolver,
                format!(
                    "Declaring an Identifier '{}' in a single-line '{}' body",
                    name, keyword
                ),
            );
        }
    }

    fn resolve_stmt(&mut self, s: &Stmt<'a>) {
        match &s.kind {
            StmtKind::Decl(d) => self.resolve_decl(d),
            StmtKind::Expr(e) => self.resolve_expr(e),
            StmtKind::IfElse {
                cond,
                body,
                else_body,
            } => {
                self.resolve_expr(cond);
                body.func_sym.set(s.func_sym.get());
                self.check_single_line_decl(body, "if");
                self.resolve_stmt(body);
                if let Some(els) = else_body {
                    els.func_sym.set(s.func_sym.get());
                    self.check_single_line_decl(els, "else");
                    self.resolve_stmt(els);
                }
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.resolve_expr(init);
                }
                if let Some(cond) = cond {
                    self.resolve_expr(cond);
                }
                if let Some(update) = update {
                    self.resolve_expr(update);
                }
                body.func_sym.set(s.func_sym.get());
                self.check_single_line_decl(body, "for");
                self.resolve_stmt(body);
            }
            StmtKind::Print { args } => {
                if let Some(args) = args {
                    self.resolve_expr(args);
                }
            }
            StmtKind::Return { value } => {
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
            StmtKind::Block { body } => {
                self.scopes.enter();
                if let Some(inner) = body {
                    inner.func_sym.set(s.func_sym.get());
                    self.resolve_stmt_chain(inner);
                }
                self.scopes.exit();
            }
        }
    }

    fn resolve_expr(&mut self, e: &Expr<'a>) {
        match &e.kind {
            ExprKind::Ident(name) => match self.scopes.lookup(*name) {
                Some(symbol) => e.symbol.set(Some(symbol)),
                None => {
                    let text = self.interner.resolve(*name);
                    self.diags.error(
                        Phase::Resolver,
                        format!("Identifier '{}' is not defined", text),
                    );
                }
            },
            ExprKind::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            ExprKind::Unary { operand, .. } => self.resolve_expr(operand),
            ExprKind::Group(inner) => self.resolve_expr(inner),
            ExprKind::Call { callee, args } => {
                self.resolve_expr(callee);
                if let Some(args) = args {
                    self.resolve_expr(args);
                }
            }
            ExprKind::Args { arg, next } => {
                self.resolve_expr(arg);
                if let Some(next) = next {
                    self.resolve_expr(next);
                }
            }
            ExprKind::Index { array, index } => {
                self.resolve_expr(array);
                self.resolve_expr(index);
            }
            ExprKind::Braces { items } => {
                if let Some(items) = items {
                    self.resolve_expr(items);
                }
            }
            ExprKind::IntegerLit(_)
            | ExprKind::HexLit(_)
            | ExprKind::BinaryLit(_)
            | ExprKind::DoubleLit(_)
            | ExprKind::ScientificLit(_)
            | ExprKind::CharLit(_)
            | ExprKind::StringLit(_)
            | ExprKind::BooleanLit(_) => {}
        }
    }
}
