use std::cell::Cell;
use std::fmt;

use crate::arena_ctx::AstContext;
use crate::ast::decl::Decl;
use crate::ast::expr::Expr;
use crate::ast::symbol::Symbol;
use crate::display::DisplayWith;
use crate::intern::Interner;

pub fn write_indent<W: fmt::Write>(out: &mut W, indent: usize) -> fmt::Result {
    for _ in 0..indent * 4 {
        out.write_char(' ')?;
    }
    Ok(())
}

/// A statement. Statements chain through `next`; `func_sym` points back at
/// the enclosing function's symbol so `return` can consult the expected
/// return type.
pub struct Stmt<'a> {
    pub kind: StmtKind<'a>,
    pub func_sym: Cell<Option<&'a Symbol<'a>>>,
    pub next: Cell<Option<&'a Stmt<'a>>>,
}

pub enum StmtKind<'a> {
    Decl(&'a Decl<'a>),
    Expr(&'a Expr<'a>),
    IfElse {
        cond: &'a Expr<'a>,
        body: &'a Stmt<'a>,
        else_body: Option<&'a Stmt<'a>>,
    },
    For {
        init: Option<&'a Expr<'a>>,
        cond: Option<&'a Expr<'a>>,
        update: Option<&'a Expr<'a>>,
        body: &'a Stmt<'a>,
    },
    Print {
        args: Option<&'a Expr<'a>>,
    },
    Return {
        value: Option<&'a Expr<'a>>,
    },
    Block {
        body: Option<&'a Stmt<'a>>,
    },
}

impl<'a> Stmt<'a> {
    pub fn new(kind: StmtKind<'a>) -> Self {
        Stmt {
            kind,
            func_sym: Cell::new(None),
            next: Cell::new(None),
        }
    }

    pub fn copy_in(&self, ctx: AstContext<'a>) -> &'a Stmt<'a> {
        let kind = match &self.kind {
            StmtKind::Decl(d) => StmtKind::Decl(d.copy_in(ctx)),
            StmtKind::Expr(e) => StmtKind::Expr(e.copy_in(ctx)),
            StmtKind::IfElse {
                cond,
                body,
                else_body,
            } => StmtKind::IfElse {
                cond: cond.copy_in(ctx),
                body: body.copy_in(ctx),
                else_body: else_body.map(|e| e.copy_in(ctx)),
            },
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => StmtKind::For {
                init: init.map(|e| e.copy_in(ctx)),
                cond: cond.map(|e| e.copy_in(ctx)),
                update: update.map(|e| e.copy_in(ctx)),
                body: body.copy_in(ctx),
            },
            StmtKind::Print { args } => StmtKind::Print {
                args: args.map(|a| a.copy_in(ctx)),
            },
            StmtKind::Return { value } => StmtKind::Return {
                value: value.map(|v| v.copy_in(ctx)),
            },
            StmtKind::Block { body } => StmtKind::Block {
                body: body.map(|b| b.copy_in(ctx)),
            },
        };
        let copy = ctx.alloc_stmt(Stmt {
            kind,
            func_sym: Cell::new(self.func_sym.get().map(|s| s.copy_in(ctx))),
            next: Cell::new(None),
        });
        if let Some(next) = self.next.get() {
            copy.next.set(Some(next.copy_in(ctx)));
        }
        copy
    }

    /// Writes this statement, ending with a newline.
    pub fn write<W: fmt::Write>(
        &self,
        interner: &Interner,
        out: &mut W,
        indent: usize,
    ) -> fmt::Result {
        match &self.kind {
            StmtKind::Decl(d) => d.write(interner, out, indent),
            StmtKind::Expr(e) => {
                write_indent(out, indent)?;
                writeln!(out, "{};", e.with(interner))
            }
            StmtKind::IfElse {
                cond,
                body,
                else_body,
            } => {
                write_indent(out, indent)?;
                write!(out, "if ({})", cond.with(interner))?;
                let block = Self::write_body(body, interner, out, indent)?;
                match else_body {
                    Some(els) => {
                        if block {
                            out.write_str(" else")?;
                        } else {
                            write_indent(out, indent)?;
                            out.write_str("else")?;
                        }
                        let else_block = Self::write_body(els, interner, out, indent)?;
                        if else_block {
                            out.write_char('\n')?;
                        }
                    }
                    None => {
                        if block {
                            out.write_char('\n')?;
                        }
                    }
                }
                Ok(())
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                write_indent(out, indent)?;
                out.write_str("for (")?;
                if let Some(init) = init {
                    write!(out, "{}", init.with(interner))?;
                }
                out.write_char(';')?;
                if let Some(cond) = cond {
                    write!(out, "{}", cond.with(interner))?;
                }
                out.write_char(';')?;
                if let Some(update) = update {
                    write!(out, "{}", update.with(interner))?;
                }
                out.write_char(')')?;
                let block = Self::write_body(body, interner, out, indent)?;
                if block {
                    out.write_char('\n')?;
                }
                Ok(())
            }
            StmtKind::Print { args } => {
                write_indent(out, indent)?;
                match args {
                    Some(args) => writeln!(out, "print {};", args.with(interner)),
                    None => writeln!(out, "print;"),
                }
            }
            StmtKind::Return { value } => {
                write_indent(out, indent)?;
                match value {
                    Some(value) => writeln!(out, "return {};", value.with(interner)),
                    None => writeln!(out, "return;"),
                }
            }
            StmtKind::Block { body } => {
                write_indent(out, indent)?;
                out.write_str("{\n")?;
                if let Some(body) = body {
                    Self::write_chain(body, interner, out, indent + 1)?;
                }
                write_indent(out, indent)?;
                out.write_str("}\n")
            }
        }
    }

    /// Writes the body of an `if`, `else` or `for`. Block bodies print
    /// inline (` { ... }`) and the caller finishes the line; single
    /// statements go on their own indented line. Returns whether the body
    /// was a block.
    fn write_body<W: fmt::Write>(
        body: &Stmt<'a>,
        interner: &Interner,
        out: &mut W,
        indent: usize,
    ) -> Result<bool, fmt::Error> {
        if let StmtKind::Block { body: inner } = &body.kind {
            out.write_str(" {\n")?;
            if let Some(inner) = inner {
                Self::write_chain(inner, interner, out, indent + 1)?;
            }
            write_indent(out, indent)?;
            out.write_char('}')?;
            Ok(true)
        } else {
            out.write_char('\n')?;
            body.write(interner, out, indent + 1)?;
            Ok(false)
        }
    }

    pub fn write_chain<W: fmt::Write>(
        first: &Stmt<'a>,
        interner: &Interner,
        out: &mut W,
        indent: usize,
    ) -> fmt::Result {
        let mut current = Some(first);
        while let Some(stmt) = current {
            stmt.write(interner, out, indent)?;
            current = stmt.next.get();
        }
        Ok(())
    }
}
