//! Bottom-up type checking of expressions within a preorder walk of
//! statements and declarations. Failures record a diagnostic and fall
//! back to a recovery type so one compilation surfaces many errors.
//!
//! `auto` inference lives here: declaration initializers, assignments,
//! array element slots and function return types all replace their `auto`
//! placeholders in place, updating the declaration and its symbol
//! together.

use crate::arena_ctx::AstContext;
use crate::ast::{
    BinaryOp, Decl, Expr, ExprKind, ParamList, Stmt, StmtKind, Symbol, SymbolKind, Type, TypeKind,
    UnaryOp,
};
use crate::context::{Context, Phase};
use crate::display::DisplayWith;
use crate::intern::{Interner, Name};

pub struct Typechecker<'a, 'ctx> {
    ctx: AstContext<'a>,
    interner: &'ctx Interner,
    diags: &'ctx mut Context,
}

/// Type-checks a whole translation unit.
pub fn typecheck<'a>(
    ctx: AstContext<'a>,
    interner: &Interner,
    diags: &mut Context,
    root: Option<&'a Decl<'a>>,
) {
    let mut checker = Typechecker {
        ctx,
        interner,
        diags,
    };
    let mut current = root;
    while let Some(decl) = current {
        checker.check_decl(decl);
        current = decl.next.get();
    }
}

impl<'a, 'ctx> Typechecker<'a, 'ctx> {
    fn shown(&self, ty: &Type<'a>) -> String {
        format!("{}", ty.with(self.interner))
    }

    fn params_shown(&self, params: Option<&'a ParamList<'a>>) -> String {
        match params {
            Some(params) => format!("{}", params.with(self.interner)),
            None => String::new(),
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn check_decl(&mut self, d: &Decl<'a>) {
        if d.ty.get().kind == TypeKind::Function {
            self.check_function_decl(d);
            return;
        }

        let name = self.interner.resolve(d.name).to_string();
        let value_ty = d.value.map(|v| self.check_expr(v));
        let declared = d.ty.get();

        if declared.kind == TypeKind::Auto {
            match value_ty {
                None => {
                    let message = format!(
                        "Declaration of '{}' with type ( auto ) requires an initializer",
                        name
                    );
                    self.diags.error(Phase::Typechecker, message);
                }
                Some(vt) if matches!(vt.kind, TypeKind::Void | TypeKind::Auto) => {
                    let message = format!(
                        "Cannot infer type of '{}' from ( {} ) initializer",
                        name,
                        self.shown(vt)
                    );
                    self.diags.error(Phase::Typechecker, message);
                }
                Some(vt) => {
                    let installed = vt.copy_in(self.ctx);
                    d.ty.set(installed);
                    if let Some(sym) = d.symbol.get() {
                        sym.ty.set(installed);
                    }
                    let message =
                        format!("'{}' type set to ( {} )", name, self.shown(installed));
                    self.diags.resolved(Phase::Typechecker, message);
                }
            }
        } else if let Some(vt) = value_ty {
            if declared.kind != vt.kind {
                let message = format!(
                    "Initializer type mismatch for '{}'. Expected ( {} ), but got ( {} ).",
                    name,
                    self.shown(declared),
                    self.shown(vt)
                );
                self.diags.error(Phase::Typechecker, message);
            }
        }

        if let (Some(sym), Some(value)) = (d.symbol.get(), d.value) {
            if sym.kind == SymbolKind::Global && !value.is_constant() {
                let message = format!(
                    "Global variable '{}' must be initialized with a constant value, got ({})",
                    name,
                    value.with(self.interner)
                );
                self.diags.error(Phase::Typechecker, message);
            }
            if sym.kind != SymbolKind::Global
                && declared.kind.is_array()
                && matches!(value.kind, ExprKind::Braces { .. })
            {
                let message = format!("Local array '{}' cannot use a brace initializer", name);
                self.diags.error(Phase::Typechecker, message);
            }
        }

        self.check_array_lengths(d, &name);
    }

    /// Walks the type chain of an array declaration checking each length:
    /// globals need a positive integer literal, locals any integer
    /// expression.
    fn check_array_lengths(&mut self, d: &Decl<'a>, name: &str) {
        let is_global = d
            .symbol
            .get()
            .map(|s| s.kind == SymbolKind::Global)
            .unwrap_or(false);
        let mut current = Some(d.ty.get());
        while let Some(ty) = current {
            if !ty.kind.is_array() {
                break;
            }
            if let Some(len) = ty.length.get() {
                if is_global {
                    match len.kind {
                        ExprKind::IntegerLit(n) if n > 0 => {}
                        ExprKind::IntegerLit(_) => {
                            let message =
                                format!("Array '{}' length must be greater than 0", name);
                            self.diags.error(Phase::Typechecker, message);
                        }
                        _ => {
                            let message = format!(
                                "Array '{}' length must be an integer literal at global scope, got ({})",
                                name,
                                len.with(self.interner)
                            );
                            self.diags.error(Phase::Typechecker, message);
                        }
                    }
                } else {
                    let lt = self.check_expr(len);
                    if lt.kind != TypeKind::Integer {
                        let message = format!(
                            "Array '{}' length must be of type integer, but got ( {} )",
                            name,
                            self.shown(lt)
                        );
                        self.diags.error(Phase::Typechecker, message);
                    }
                }
            }
            current = ty.subtype.get();
        }
    }

    fn check_function_decl(&mut self, d: &Decl<'a>) {
        let name = self.interner.resolve(d.name).to_string();
        let ftype = d.ty.get();
        let sym = d.symbol.get();

        // A prior definition or return statement may have refined an auto
        // return type on the symbol; copy it back into this declaration.
        self.pull_refined_return(d);

        if let Some(ret) = ftype.subtype.get() {
            if ret.kind == TypeKind::Function {
                let message = format!("Function '{}' cannot return a function", name);
                self.diags.error(Phase::Typechecker, message);
            } else if ret.kind.is_array() {
                let message = format!("Function '{}' cannot return an array", name);
                self.diags.error(Phase::Typechecker, message);
            }
        }

        let mut param = ftype.params;
        while let Some(p) = param {
            if matches!(
                p.ty.kind,
                TypeKind::Void | TypeKind::Auto | TypeKind::Function
            ) {
                let message = format!(
                    "Parameter '{}' of function '{}' cannot have type ( {} )",
                    self.interner.resolve(p.name),
                    name,
                    self.shown(p.ty)
                );
                self.diags.error(Phase::Typechecker, message);
            }
            param = p.next;
        }

        if let Some(body) = d.body {
            let returns = self.check_stmt(body);
            let sym_ret = sym.and_then(|s| s.ty.get().subtype.get());
            if !returns {
                match sym_ret {
                    Some(ret) if ret.kind == TypeKind::Auto => {
                        // No return statement anywhere: the function is void.
                        let void_ty = self.ctx.ty(TypeKind::Void);
                        if let Some(s) = sym {
                            s.ty.get().subtype.set(Some(void_ty));
                        }
                        let message =
                            format!("Function '{}' return type set to ( void )", name);
                        self.diags.resolved(Phase::Typechecker, message);
                    }
                    Some(ret) if ret.kind != TypeKind::Void => {
                        let message = format!(
                            "Function '{}' may not return a value on every path",
                            name
                        );
                        self.diags.warning(Phase::Typechecker, message);
                    }
                    _ => {}
                }
            }
            self.pull_refined_return(d);
        }
    }

    fn pull_refined_return(&mut self, d: &Decl<'a>) {
        let ftype = d.ty.get();
        let Some(sym) = d.symbol.get() else { return };
        if sym.ty.get().kind != TypeKind::Function {
            return;
        }
        if let (Some(decl_ret), Some(sym_ret)) =
            (ftype.subtype.get(), sym.ty.get().subtype.get())
        {
            if decl_ret.kind == TypeKind::Auto && sym_ret.kind != TypeKind::Auto {
                ftype.subtype.set(Some(sym_ret));
            }
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Returns whether the statement definitely reaches a `return` on
    /// every control path.
    fn check_stmt(&mut self, s: &Stmt<'a>) -> bool {
        match &s.kind {
            StmtKind::Decl(d) => {
                self.check_decl(d);
                false
            }
            StmtKind::Expr(e) => {
                self.check_expr(e);
                false
            }
            StmtKind::IfElse {
                cond,
                body,
                else_body,
            } => {
                let ct = self.check_expr(cond);
                if ct.kind != TypeKind::Boolean {
                    let message = format!(
                        "Condition in 'if' statement must be of type boolean, but got {}.",
                        ct.kind
                    );
                    self.diags.error(Phase::Typechecker, message);
                }
                let body_returns = self.check_stmt(body);
                match else_body {
                    Some(els) => {
                        let else_returns = self.check_stmt(els);
                        body_returns && else_returns
                    }
                    None => false,
                }
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.check_expr(init);
                }
                if let Some(cond) = cond {
                    let ct = self.check_expr(cond);
                    if ct.kind != TypeKind::Boolean {
                        let message = format!(
                            "Condition in 'for' statement must be of type boolean, but got {}.",
                            ct.kind
                        );
                        self.diags.error(Phase::Typechecker, message);
                    }
                }
                if let Some(update) = update {
                    self.check_expr(update);
                }
                self.check_stmt(body)
            }
            StmtKind::Print { args } => {
                let mut current = *args;
                while let Some(node) = current {
                    let ExprKind::Args { arg, next } = &node.kind else {
                        break;
                    };
                    let at = self.check_expr(arg);
                    if !at.kind.is_printable() {
                        let message = format!(
                            "Cannot print expression ({}) of type ( {} )",
                            arg.with(self.interner),
                            self.shown(at)
                        );
                        self.diags.error(Phase::Typechecker, message);
                    }
                    current = *next;
                }
                false
            }
            StmtKind::Return { value } => {
                self.check_return(s, *value);
                true
            }
            StmtKind::Block { body } => {
                let mut returns = false;
                let mut current = *body;
                while let Some(stmt) = current {
                    returns |= self.check_stmt(stmt);
                    current = stmt.next.get();
                }
                returns
            }
        }
    }

    /// Reconciles a `return` against the enclosing function's return
    /// type, installing it when the return type is still `auto`.
    fn check_return(&mut self, s: &Stmt<'a>, value: Option<&'a Expr<'a>>) {
        let value_ty = match value {
            Some(v) => self.check_expr(v),
            None => self.ctx.ty(TypeKind::Void),
        };
        let Some(fsym) = s.func_sym.get() else { return };
        let fn_ty = fsym.ty.get();
        if fn_ty.kind != TypeKind::Function {
            return;
        }
        let name = self.interner.resolve(fsym.name).to_string();
        match fn_ty.subtype.get() {
            Some(ret) if ret.kind == TypeKind::Auto => {
                if value_ty.kind == TypeKind::Auto {
                    let message = format!("Cannot infer return type of function '{}'", name);
                    self.diags.error(Phase::Typechecker, message);
                } else {
                    let installed = value_ty.copy_in(self.ctx);
                    fn_ty.subtype.set(Some(installed));
                    let message = format!(
                        "Function '{}' return type set to ( {} )",
                        name,
                        self.shown(installed)
                    );
                    self.diags.resolved(Phase::Typechecker, message);
                }
            }
            Some(ret) => {
                if ret.kind != value_ty.kind {
                    let message = format!(
                        "Return type mismatch. Expected ( {} ), but got ( {} ).",
                        self.shown(ret),
                        self.shown(value_ty)
                    );
                    self.diags.error(Phase::Typechecker, message);
                }
            }
            None => {}
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Computes the expression's result type, stamps it onto the node for
    /// the code generator, and returns it.
    fn check_expr(&mut self, e: &Expr<'a>) -> &'a Type<'a> {
        let ty = self.check_expr_inner(e);
        e.ty.set(Some(ty));
        ty
    }

    fn check_expr_inner(&mut self, e: &Expr<'a>) -> &'a Type<'a> {
        match &e.kind {
            ExprKind::Binary { op, left, right } => match op {
                BinaryOp::Assign => self.check_assign(e, left, right),
                BinaryOp::Or | BinaryOp::And => self.check_logical(e, *op, left, right),
                BinaryOp::Eq | BinaryOp::NotEq => self.check_equality(e, *op, left, right),
                BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                    self.check_comparison(e, *op, left, right)
                }
                BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Rem
                | BinaryOp::Expo => self.check_arithmetic(e, *op, left, right),
            },
            ExprKind::Unary { op, operand } => match op {
                UnaryOp::Negate | UnaryOp::Increment | UnaryOp::Decrement => {
                    let ot = self.check_expr(operand);
                    if !ot.kind.is_numeric() {
                        let message = format!(
                            "Operator '{}' requires an integer or double operand, but got ( {} ) in ({})",
                            op.token(),
                            self.shown(ot),
                            e.with(self.interner)
                        );
                        self.diags.error(Phase::Typechecker, message);
                        return self.ctx.ty(TypeKind::Integer);
                    }
                    self.ctx.ty(ot.kind)
                }
                UnaryOp::Not => {
                    let ot = self.check_expr(operand);
                    if ot.kind != TypeKind::Boolean {
                        let message = format!(
                            "Operator '!' requires a boolean operand, but got ( {} ) in ({})",
                            self.shown(ot),
                            e.with(self.interner)
                        );
                        self.diags.error(Phase::Typechecker, message);
                    }
                    self.ctx.ty(TypeKind::Boolean)
                }
                UnaryOp::Length => {
                    let ot = self.check_expr(operand);
                    if ot.kind != TypeKind::Array {
                        let message = format!(
                            "Operator '#' requires an array operand, but got ( {} ) in ({})",
                            self.shown(ot),
                            e.with(self.interner)
                        );
                        self.diags.error(Phase::Typechecker, message);
                    }
                    self.ctx.ty(TypeKind::Integer)
                }
            },
            ExprKind::Group(inner) => self.check_expr(inner),
            ExprKind::Call { callee, args } => self.check_call(callee, *args),
            ExprKind::Args { arg, .. } => self.check_expr(arg),
            ExprKind::Index { array, index } => {
                let at = self.check_expr(array);
                let it = self.check_expr(index);
                if !at.kind.is_array() {
                    let message = format!(
                        "Indexing non-array expression ({}) of type ( {} )",
                        array.with(self.interner),
                        self.shown(at)
                    );
                    self.diags.error(Phase::Typechecker, message);
                    return self.ctx.ty(TypeKind::Integer);
                }
                if it.kind != TypeKind::Integer {
                    let message = format!(
                        "Array index must be of type integer, but got ( {} ) in ({})",
                        self.shown(it),
                        e.with(self.interner)
                    );
                    self.diags.error(Phase::Typechecker, message);
                }
                match at.subtype.get() {
                    Some(elem) => elem.copy_in(self.ctx),
                    None => self.ctx.ty(TypeKind::Integer),
                }
            }
            ExprKind::Braces { .. } => match e.symbol.get() {
                None => self.infer_brace_type(e),
                Some(sym) => {
                    let declared = sym.ty.get();
                    if declared.kind == TypeKind::Auto {
                        let inferred = self.infer_brace_type(e);
                        self.check_brace_against(e, inferred, sym.name);
                        inferred
                    } else {
                        self.check_brace_against(e, declared, sym.name);
                        declared.copy_in(self.ctx)
                    }
                }
            },
            ExprKind::IntegerLit(_) | ExprKind::HexLit(_) | ExprKind::BinaryLit(_) => {
                self.ctx.ty(TypeKind::Integer)
            }
            ExprKind::DoubleLit(_) | ExprKind::ScientificLit(_) => self.ctx.ty(TypeKind::Double),
            ExprKind::CharLit(_) => self.ctx.ty(TypeKind::Character),
            ExprKind::StringLit(_) => self.ctx.ty(TypeKind::String),
            ExprKind::BooleanLit(_) => self.ctx.ty(TypeKind::Boolean),
            ExprKind::Ident(_) => match e.symbol.get() {
                Some(sym) => {
                    let ty = sym.ty.get().copy_in(self.ctx);
                    ty.symbol.set(Some(sym));
                    ty
                }
                // The resolver already reported the undefined name.
                None => self.ctx.ty(TypeKind::Integer),
            },
        }
    }

    fn check_arithmetic(
        &mut self,
        e: &Expr<'a>,
        op: BinaryOp,
        left: &Expr<'a>,
        right: &Expr<'a>,
    ) -> &'a Type<'a> {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        let ok = if op == BinaryOp::Rem {
            lt.kind == TypeKind::Integer && rt.kind == TypeKind::Integer
        } else {
            lt.kind == rt.kind && lt.kind.is_numeric()
        };
        if !ok {
            let requirement = if op == BinaryOp::Rem {
                "integer operands"
            } else {
                "matching integer or double operands"
            };
            let message = format!(
                "Operator '{}' requires {}, but got ( {} ) and ( {} ) in ({})",
                op.token(),
                requirement,
                self.shown(lt),
                self.shown(rt),
                e.with(self.interner)
            );
            self.diags.error(Phase::Typechecker, message);
            return self.ctx.ty(TypeKind::Integer);
        }
        self.ctx.ty(lt.kind)
    }

    fn check_logical(
        &mut self,
        e: &Expr<'a>,
        op: BinaryOp,
        left: &Expr<'a>,
        right: &Expr<'a>,
    ) -> &'a Type<'a> {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        if lt.kind != TypeKind::Boolean || rt.kind != TypeKind::Boolean {
            let message = format!(
                "Operator '{}' requires boolean operands, but got ( {} ) and ( {} ) in ({})",
                op.token(),
                self.shown(lt),
                self.shown(rt),
                e.with(self.interner)
            );
            self.diags.error(Phase::Typechecker, message);
        }
        self.ctx.ty(TypeKind::Boolean)
    }

    fn check_equality(
        &mut self,
        e: &Expr<'a>,
        op: BinaryOp,
        left: &Expr<'a>,
        right: &Expr<'a>,
    ) -> &'a Type<'a> {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        if lt.kind != rt.kind {
            let message = format!(
                "Operator '{}' requires matching types, but got ( {} ) and ( {} ) in ({})",
                op.token(),
                self.shown(lt),
                self.shown(rt),
                e.with(self.interner)
            );
            self.diags.error(Phase::Typechecker, message);
        } else if lt.kind.forbids_equality() {
            let message = format!(
                "Operator '{}' cannot compare values of type ( {} ) in ({})",
                op.token(),
                self.shown(lt),
                e.with(self.interner)
            );
            self.diags.error(Phase::Typechecker, message);
        }
        self.ctx.ty(TypeKind::Boolean)
    }

    fn check_comparison(
        &mut self,
        e: &Expr<'a>,
        op: BinaryOp,
        left: &Expr<'a>,
        right: &Expr<'a>,
    ) -> &'a Type<'a> {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        if !(lt.kind == rt.kind && lt.kind.is_numeric()) {
            let message = format!(
                "Operator '{}' requires matching integer or double operands, but got ( {} ) and ( {} ) in ({})",
                op.token(),
                self.shown(lt),
                self.shown(rt),
                e.with(self.interner)
            );
            self.diags.error(Phase::Typechecker, message);
        }
        self.ctx.ty(TypeKind::Boolean)
    }

    fn check_assign(
        &mut self,
        e: &Expr<'a>,
        left: &Expr<'a>,
        right: &Expr<'a>,
    ) -> &'a Type<'a> {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);

        if !matches!(
            left.unwrap_groups().kind,
            ExprKind::Ident(_) | ExprKind::Index { .. }
        ) {
            let message = format!(
                "Cannot assign to expression ({})",
                left.with(self.interner)
            );
            self.diags.error(Phase::Typechecker, message);
            return rt;
        }

        if lt.kind == TypeKind::Auto && rt.kind == TypeKind::Auto {
            let message = format!(
                "Cannot infer type of ({}) from an auto expression",
                left.with(self.interner)
            );
            self.diags.error(Phase::Typechecker, message);
            return self.ctx.ty(TypeKind::Integer);
        }

        if lt.kind == TypeKind::Auto {
            let installed = rt.copy_in(self.ctx);
            if let Some(sym) = lt.symbol.get() {
                sym.ty.set(installed);
                let message = format!(
                    "'{}' type set to ( {} )",
                    self.interner.resolve(sym.name),
                    self.shown(installed)
                );
                self.diags.resolved(Phase::Typechecker, message);
            }
            return installed;
        }

        // Arrays whose element type is still auto take their base kind
        // from a matching array on the right.
        if lt.kind.is_array() && rt.kind.is_array() && lt.base_type().kind == TypeKind::Auto {
            if let Some(sym) = lt.symbol.get() {
                self.resolve_auto_element(sym, rt);
            }
            return rt;
        }

        if lt.kind != rt.kind {
            let message = format!(
                "Cannot assign ( {} ) to ( {} ) in ({})",
                self.shown(rt),
                self.shown(lt),
                e.with(self.interner)
            );
            self.diags.error(Phase::Typechecker, message);
            return lt;
        }
        rt
    }

    /// Replaces the innermost element slot of the symbol's array type:
    /// the walk stops at the last subtype whose own subtype is non-null
    /// and replaces that slot with the right-hand side's base type.
    fn resolve_auto_element(&mut self, sym: &'a Symbol<'a>, rt: &'a Type<'a>) {
        let mut t = sym.ty.get();
        while let Some(sub) = t.subtype.get() {
            if sub.subtype.get().is_some() {
                t = sub;
            } else {
                break;
            }
        }
        let base = rt.base_type().copy_in(self.ctx);
        t.subtype.set(Some(base));
        let message = format!(
            "'{}' element type set to ( {} )",
            self.interner.resolve(sym.name),
            self.shown(base)
        );
        self.diags.resolved(Phase::Typechecker, message);
    }

    fn check_call(&mut self, callee: &Expr<'a>, args: Option<&'a Expr<'a>>) -> &'a Type<'a> {
        let ct = self.check_expr(callee);
        let callee_name = format!("{}", callee.with(self.interner));

        if ct.kind != TypeKind::Function {
            let message = format!(
                "Calling non-function ({}) of type ( {} )",
                callee_name,
                self.shown(ct)
            );
            self.diags.error(Phase::Typechecker, message);
            self.check_remaining_args(args);
            return self.ctx.ty(TypeKind::Void);
        }

        let result = match ct.subtype.get() {
            Some(ret) => ret.copy_in(self.ctx),
            None => self.ctx.ty(TypeKind::Void),
        };

        if ct.params.is_none() && args.is_some() {
            let message = format!("Function '{}' takes no arguments", callee_name);
            self.diags.error(Phase::Typechecker, message);
            self.check_remaining_args(args);
            return result;
        }

        let mut param = ct.params;
        let mut arg_node = args;
        let mut index = 1;
        loop {
            match (param, arg_node) {
                (Some(p), Some(node)) => {
                    let ExprKind::Args { arg, next } = &node.kind else {
                        break;
                    };
                    let at = self.check_expr(arg);
                    if !p.ty.equals(at) {
                        let message = format!(
                            "Argument {} of call to '{}' has type ( {} ), but expected ( {} ) from parameters ( {} )",
                            index,
                            callee_name,
                            self.shown(at),
                            self.shown(p.ty),
                            self.params_shown(ct.params)
                        );
                        self.diags.error(Phase::Typechecker, message);
                    }
                    param = p.next;
                    arg_node = *next;
                    index += 1;
                }
                (Some(_), None) => {
                    let message = format!(
                        "Too few arguments in call to '{}'. Expected parameters: ( {} )",
                        callee_name,
                        self.params_shown(ct.params)
                    );
                    self.diags.error(Phase::Typechecker, message);
                    break;
                }
                (None, Some(_)) => {
                    let message = format!(
                        "Too many arguments in call to '{}'. Expected parameters: ( {} )",
                        callee_name,
                        self.params_shown(ct.params)
                    );
                    self.diags.error(Phase::Typechecker, message);
                    self.check_remaining_args(arg_node);
                    break;
                }
                (None, None) => break,
            }
        }
        result
    }

    /// Type-checks leftover arguments so their own errors still surface.
    fn check_remaining_args(&mut self, args: Option<&'a Expr<'a>>) {
        let mut current = args;
        while let Some(node) = current {
            let ExprKind::Args { arg, next } = &node.kind else {
                break;
            };
            self.check_expr(arg);
            current = *next;
        }
    }

    // ------------------------------------------------------------------
    // Brace initializers
    // ------------------------------------------------------------------

    /// Infers an array type from a brace initializer's structure: the
    /// first concrete element supplies the leaf kind, counted entries
    /// supply the length at each level.
    fn infer_brace_type(&mut self, e: &Expr<'a>) -> &'a Type<'a> {
        let items = match &e.kind {
            ExprKind::Braces { items } => *items,
            _ => return self.ctx.ty(TypeKind::Integer),
        };
        let mut count: i64 = 0;
        let mut element: Option<&'a Type<'a>> = None;
        let mut current = items;
        while let Some(node) = current {
            let ExprKind::Args { arg, next } = &node.kind else {
                break;
            };
            if matches!(arg.kind, ExprKind::Braces { .. }) {
                let sub = self.infer_brace_type(arg);
                if element.is_none() {
                    element = Some(sub);
                }
            } else {
                let at = self.check_expr(arg);
                if element.is_none() && !matches!(at.kind, TypeKind::Auto | TypeKind::Void) {
                    element = Some(at);
                }
            }
            count += 1;
            current = *next;
        }
        let element = match element {
            Some(found) => found.copy_in(self.ctx),
            None => self.ctx.ty(TypeKind::Auto),
        };
        self.ctx
            .array_type(TypeKind::Array, Some(self.ctx.integer_lit(count)), element)
    }

    /// Checks a brace initializer against the array type it initializes,
    /// enforcing per-level lengths and element kinds. An omitted length
    /// is filled in with the counted size.
    fn check_brace_against(&mut self, e: &Expr<'a>, expected: &'a Type<'a>, name: Name) {
        let name_str = self.interner.resolve(name).to_string();
        if !expected.kind.is_array() {
            let message = format!(
                "Unexpected brace initializer for '{}' of type ( {} )",
                name_str,
                self.shown(expected)
            );
            self.diags.error(Phase::Typechecker, message);
            return;
        }
        let element = expected.subtype.get();
        let element_is_array = element.map(|t| t.kind.is_array()).unwrap_or(false);

        let items = match &e.kind {
            ExprKind::Braces { items } => *items,
            _ => return,
        };
        let mut count: i64 = 0;
        let mut index = 1;
        let mut current = items;
        while let Some(node) = current {
            let ExprKind::Args { arg, next } = &node.kind else {
                break;
            };
            if element_is_array {
                if matches!(arg.kind, ExprKind::Braces { .. }) {
                    if let Some(element) = element {
                        self.check_brace_against(arg, element, name);
                    }
                } else {
                    let message = format!(
                        "Array '{}' initializer missing nested braces for ( {} )",
                        name_str,
                        self.shown(element.unwrap())
                    );
                    self.diags.error(Phase::Typechecker, message);
                }
            } else if matches!(arg.kind, ExprKind::Braces { .. }) {
                let message = format!(
                    "Array '{}' initializer has unexpected nested braces",
                    name_str
                );
                self.diags.error(Phase::Typechecker, message);
            } else if !arg.is_literal() {
                let message = format!(
                    "Array '{}' initializer must be a constant value, got ({})",
                    name_str,
                    arg.with(self.interner)
                );
                self.diags.error(Phase::Typechecker, message);
                self.check_expr(arg);
            } else {
                let at = self.check_expr(arg);
                if let Some(element) = element {
                    if at.kind != element.kind {
                        let message = format!(
                            "Element {} of array '{}' has type ( {} ), but expected ( {} )",
                            index,
                            name_str,
                            self.shown(at),
                            self.shown(element)
                        );
                        self.diags.error(Phase::Typechecker, message);
                    }
                }
            }
            count += 1;
            index += 1;
            current = *next;
        }

        match expected.length.get() {
            Some(len) => {
                if let ExprKind::IntegerLit(n) = len.kind {
                    if count < n {
                        let message = format!(
                            "Array '{}' has too few elements. Expected {}, but got {}",
                            name_str, n, count
                        );
                        self.diags.error(Phase::Typechecker, message);
                    } else if count > n {
                        let message = format!(
                            "Array '{}' has too many elements. Expected {}, but got {}",
                            name_str, n, count
                        );
                        self.diags.error(Phase::Typechecker, message);
                    }
                }
            }
            None => {
                expected.length.set(Some(self.ctx.integer_lit(count)));
                let message = format!("Array '{}' set to length {}", name_str, count);
                self.diags.resolved(Phase::Typechecker, message);
            }
        }
    }
}
