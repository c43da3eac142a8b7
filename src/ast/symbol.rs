use std::cell::Cell;
use std::fmt;

use crate::arena_ctx::AstContext;
use crate::ast::types::Type;
use crate::intern::Name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Local,
    Param,
    Global,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SymbolKind::Local => "local",
            SymbolKind::Param => "param",
            SymbolKind::Global => "global",
        };
        write!(f, "{}", text)
    }
}

/// Semantic record for one bound name, created by the resolver and shared
/// by the binding declaration and every use site.
///
/// `ty` is a cell because `auto` inference rewrites it; `which` is the
/// positional index within the symbol's scope; `prototype` tracks whether
/// a function name has so far only been forward-declared.
pub struct Symbol<'a> {
    pub kind: SymbolKind,
    pub ty: Cell<&'a Type<'a>>,
    pub name: Name,
    pub which: Cell<i32>,
    pub prototype: Cell<bool>,
}

impl<'a> Symbol<'a> {
    pub fn new(kind: SymbolKind, ty: &'a Type<'a>, name: Name) -> Self {
        Symbol {
            kind,
            ty: Cell::new(ty),
            name,
            which: Cell::new(0),
            prototype: Cell::new(false),
        }
    }

    pub fn copy_in(&self, ctx: AstContext<'a>) -> &'a Symbol<'a> {
        let copy = Symbol {
            kind: self.kind,
            ty: Cell::new(self.ty.get().copy_in(ctx)),
            name: self.name,
            which: Cell::new(self.which.get()),
            prototype: Cell::new(self.prototype.get()),
        };
        ctx.alloc_symbol(copy)
    }
}
