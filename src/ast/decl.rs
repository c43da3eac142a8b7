use std::cell::Cell;
use std::fmt;

use crate::arena_ctx::AstContext;
use crate::ast::expr::Expr;
use crate::ast::stmt::{write_indent, Stmt, StmtKind};
use crate::ast::symbol::Symbol;
use crate::ast::types::Type;
use crate::display::DisplayWith;
use crate::intern::{Interner, Name};

/// A top-level or local declaration: a name, its type, an optional
/// initializer, and for functions an optional body.
///
/// After resolution `symbol` is attached, and for function definitions
/// `param_count`/`locals` record the frame slots the code generator needs.
pub struct Decl<'a> {
    pub name: Name,
    pub ty: Cell<&'a Type<'a>>,
    pub value: Option<&'a Expr<'a>>,
    pub body: Option<&'a Stmt<'a>>,
    pub symbol: Cell<Option<&'a Symbol<'a>>>,
    pub param_count: Cell<i32>,
    pub locals: Cell<i32>,
    pub next: Cell<Option<&'a Decl<'a>>>,
}

impl<'a> Decl<'a> {
    pub fn new(
        name: Name,
        ty: &'a Type<'a>,
        value: Option<&'a Expr<'a>>,
        body: Option<&'a Stmt<'a>>,
    ) -> Self {
        Decl {
            name,
            ty: Cell::new(ty),
            value,
            body,
            symbol: Cell::new(None),
            param_count: Cell::new(0),
            locals: Cell::new(0),
            next: Cell::new(None),
        }
    }

    pub fn copy_in(&self, ctx: AstContext<'a>) -> &'a Decl<'a> {
        let copy = ctx.alloc_decl(Decl {
            name: self.name,
            ty: Cell::new(self.ty.get().copy_in(ctx)),
            value: self.value.map(|v| v.copy_in(ctx)),
            body: self.body.map(|b| b.copy_in(ctx)),
            symbol: Cell::new(self.symbol.get().map(|s| s.copy_in(ctx))),
            param_count: Cell::new(self.param_count.get()),
            locals: Cell::new(self.locals.get()),
            next: Cell::new(None),
        });
        if let Some(next) = self.next.get() {
            copy.next.set(Some(next.copy_in(ctx)));
        }
        copy
    }

    pub fn write<W: fmt::Write>(
        &self,
        interner: &Interner,
        out: &mut W,
        indent: usize,
    ) -> fmt::Result {
        write_indent(out, indent)?;
        write!(
            out,
            "{}: {}",
            interner.resolve(self.name),
            self.ty.get().with(interner)
        )?;
        if let Some(body) = self.body {
            // A function body is always a single block statement.
            out.write_str(" = {\n")?;
            if let StmtKind::Block { body: Some(inner) } = &body.kind {
                Stmt::write_chain(inner, interner, out, indent + 1)?;
            }
            write_indent(out, indent)?;
            out.write_str("}\n")
        } else if let Some(value) = self.value {
            writeln!(out, " = {};", value.with(interner))
        } else {
            out.write_str(";\n")
        }
    }

    pub fn write_chain<W: fmt::Write>(
        first: &Decl<'a>,
        interner: &Interner,
        out: &mut W,
        indent: usize,
    ) -> fmt::Result {
        let mut current = Some(first);
        while let Some(decl) = current {
            decl.write(interner, out, indent)?;
            current = decl.next.get();
        }
        Ok(())
    }
}
