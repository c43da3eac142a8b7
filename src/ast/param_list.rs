use std::cell::Cell;
use std::fmt;

use crate::arena_ctx::AstContext;
use crate::ast::symbol::Symbol;
use crate::ast::types::Type;
use crate::display::DisplayWith;
use crate::intern::{Interner, Name};

/// One entry in a function's parameter list.
pub struct ParamList<'a> {
    pub name: Name,
    pub ty: &'a Type<'a>,
    pub symbol: Cell<Option<&'a Symbol<'a>>>,
    pub next: Option<&'a ParamList<'a>>,
}

impl<'a> ParamList<'a> {
    pub fn new(name: Name, ty: &'a Type<'a>, next: Option<&'a ParamList<'a>>) -> Self {
        ParamList {
            name,
            ty,
            symbol: Cell::new(None),
            next,
        }
    }

    pub fn iter(&'a self) -> ParamIter<'a> {
        ParamIter {
            current: Some(self),
        }
    }

    pub fn len(&'a self) -> usize {
        self.iter().count()
    }

    /// Pairwise type equality, ignoring parameter names.
    pub fn types_equal(a: Option<&ParamList<'a>>, b: Option<&ParamList<'a>>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a.ty.equals(b.ty) && Self::types_equal(a.next, b.next),
            _ => false,
        }
    }

    pub fn copy_in(&self, ctx: AstContext<'a>) -> &'a ParamList<'a> {
        let next = self.next.map(|n| n.copy_in(ctx));
        ctx.alloc_param(ParamList {
            name: self.name,
            ty: self.ty.copy_in(ctx),
            symbol: Cell::new(None),
            next,
        })
    }
}

pub struct ParamIter<'a> {
    current: Option<&'a ParamList<'a>>,
}

impl<'a> Iterator for ParamIter<'a> {
    type Item = &'a ParamList<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let param = self.current?;
        self.current = param.next;
        Some(param)
    }
}

impl DisplayWith for ParamList<'_> {
    fn fmt_with(&self, interner: &Interner, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", interner.resolve(self.name))?;
        self.ty.fmt_with(interner, f)?;
        if let Some(next) = self.next {
            write!(f, ", ")?;
            next.fmt_with(interner, f)?;
        }
        Ok(())
    }
}
