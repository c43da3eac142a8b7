use std::cell::Cell;
use std::fmt;

use crate::arena_ctx::AstContext;
use crate::ast::expr::Expr;
use crate::ast::param_list::ParamList;
use crate::ast::symbol::Symbol;
use crate::display::DisplayWith;
use crate::intern::Interner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    Boolean,
    Character,
    Integer,
    Double,
    String,
    Array,
    Carray,
    Auto,
    Function,
}

impl TypeKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, TypeKind::Integer | TypeKind::Double)
    }

    pub fn is_array(self) -> bool {
        matches!(self, TypeKind::Array | TypeKind::Carray)
    }

    /// Kinds the equality operators refuse to compare.
    pub fn forbids_equality(self) -> bool {
        matches!(
            self,
            TypeKind::Void
                | TypeKind::Function
                | TypeKind::Array
                | TypeKind::Carray
                | TypeKind::Auto
        )
    }

    /// Kinds the `print` statement can emit.
    pub fn is_printable(self) -> bool {
        matches!(
            self,
            TypeKind::Integer
                | TypeKind::Double
                | TypeKind::Boolean
                | TypeKind::Character
                | TypeKind::String
        )
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TypeKind::Void => "void",
            TypeKind::Boolean => "boolean",
            TypeKind::Character => "char",
            TypeKind::Integer => "integer",
            TypeKind::Double => "double",
            TypeKind::String => "string",
            TypeKind::Array => "array",
            TypeKind::Carray => "carray",
            TypeKind::Auto => "auto",
            TypeKind::Function => "function",
        };
        write!(f, "{}", text)
    }
}

/// A data type. Arrays carry an element subtype and an optional length
/// expression; functions carry a return subtype and a parameter list.
///
/// `subtype` and `length` are cells because the type checker refines them
/// in place: `auto` element slots get concrete types, omitted array lengths
/// get the counted size of their initializer.
pub struct Type<'a> {
    pub kind: TypeKind,
    pub subtype: Cell<Option<&'a Type<'a>>>,
    pub params: Option<&'a ParamList<'a>>,
    pub length: Cell<Option<&'a Expr<'a>>>,
    /// Symbol stamped onto fresh copies handed out by the type checker,
    /// so enclosing rules can find the variable a type came from.
    pub symbol: Cell<Option<&'a Symbol<'a>>>,
}

impl<'a> Type<'a> {
    pub fn new(kind: TypeKind) -> Self {
        Type {
            kind,
            subtype: Cell::new(None),
            params: None,
            length: Cell::new(None),
            symbol: Cell::new(None),
        }
    }

    /// Element type of the innermost array level, or the type itself.
    pub fn base_type(&'a self) -> &'a Type<'a> {
        let mut t = self;
        while let Some(sub) = t.subtype.get() {
            t = sub;
        }
        t
    }

    /// Structural equality: kinds, element types, return types and
    /// parameter types. Array lengths and parameter names do not count.
    pub fn equals(&self, other: &Type<'a>) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match self.kind {
            TypeKind::Array | TypeKind::Carray => {
                match (self.subtype.get(), other.subtype.get()) {
                    (Some(a), Some(b)) => a.equals(b),
                    (None, None) => true,
                    _ => false,
                }
            }
            TypeKind::Function => {
                let returns_match = match (self.subtype.get(), other.subtype.get()) {
                    (Some(a), Some(b)) => a.equals(b),
                    (None, None) => true,
                    _ => false,
                };
                returns_match && ParamList::types_equal(self.params, other.params)
            }
            _ => true,
        }
    }

    pub fn copy_in(&self, ctx: AstContext<'a>) -> &'a Type<'a> {
        let subtype = self.subtype.get().map(|s| s.copy_in(ctx));
        let params = self.params.map(|p| p.copy_in(ctx));
        let length = self.length.get().map(|e| e.copy_in(ctx));
        ctx.alloc_type(Type {
            kind: self.kind,
            subtype: Cell::new(subtype),
            params,
            length: Cell::new(length),
            symbol: Cell::new(None),
        })
    }
}

impl DisplayWith for Type<'_> {
    fn fmt_with(&self, interner: &Interner, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TypeKind::Array | TypeKind::Carray => {
                // Prints as `array [len] subtype`, with empty brackets
                // when the length is still unknown.
                write!(f, "{} [", self.kind)?;
                if let Some(length) = self.length.get() {
                    length.fmt_with(interner, f)?;
                }
                write!(f, "] ")?;
                match self.subtype.get() {
                    Some(sub) => sub.fmt_with(interner, f),
                    None => Ok(()),
                }
            }
            TypeKind::Function => {
                write!(f, "function ")?;
                if let Some(returns) = self.subtype.get() {
                    returns.fmt_with(interner, f)?;
                }
                write!(f, " (")?;
                if let Some(params) = self.params {
                    params.fmt_with(interner, f)?;
                }
                write!(f, ")")
            }
            kind => write!(f, "{}", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::ast::{Decl, Expr, ParamList, Stmt, Symbol};
    use crate::arena_ctx::AstContext;
    use crate::intern::Interner;

    #[test]
    fn equality_is_structural() {
        let decls: Arena<Decl> = Arena::new();
        let stmts: Arena<Stmt> = Arena::new();
        let exprs: Arena<Expr> = Arena::new();
        let types: Arena<Type> = Arena::new();
        let params: Arena<ParamList> = Arena::new();
        let symbols: Arena<Symbol> = Arena::new();
        let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);

        let int = ctx.ty(TypeKind::Integer);
        let boolean = ctx.ty(TypeKind::Boolean);
        assert!(int.equals(ctx.ty(TypeKind::Integer)));
        assert!(!int.equals(boolean));

        let ints = ctx.array_type(TypeKind::Array, Some(ctx.integer_lit(3)), int);
        let more_ints = ctx.array_type(TypeKind::Array, Some(ctx.integer_lit(7)), int);
        let bools = ctx.array_type(TypeKind::Array, None, boolean);
        // Lengths do not participate in type equality.
        assert!(ints.equals(more_ints));
        assert!(!ints.equals(bools));

        let c_ints = ctx.array_type(TypeKind::Carray, Some(ctx.integer_lit(3)), int);
        assert!(!ints.equals(c_ints));
    }

    #[test]
    fn function_equality_ignores_parameter_names() {
        let decls: Arena<Decl> = Arena::new();
        let stmts: Arena<Stmt> = Arena::new();
        let exprs: Arena<Expr> = Arena::new();
        let types: Arena<Type> = Arena::new();
        let params: Arena<ParamList> = Arena::new();
        let symbols: Arena<Symbol> = Arena::new();
        let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
        let mut interner = Interner::new();

        let int = ctx.ty(TypeKind::Integer);
        let a = ctx.alloc_param(ParamList::new(interner.intern("a"), int, None));
        let b = ctx.alloc_param(ParamList::new(interner.intern("b"), int, None));
        let f = ctx.function_type(int, Some(a));
        let g = ctx.function_type(int, Some(b));
        assert!(f.equals(g));

        let h = ctx.function_type(ctx.ty(TypeKind::Void), Some(a));
        assert!(!f.equals(h));
    }

    #[test]
    fn types_print_in_surface_syntax() {
        let decls: Arena<Decl> = Arena::new();
        let stmts: Arena<Stmt> = Arena::new();
        let exprs: Arena<Expr> = Arena::new();
        let types: Arena<Type> = Arena::new();
        let params: Arena<ParamList> = Arena::new();
        let symbols: Arena<Symbol> = Arena::new();
        let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
        let mut interner = Interner::new();

        let int = ctx.ty(TypeKind::Integer);
        let arr = ctx.array_type(TypeKind::Array, Some(ctx.integer_lit(4)), int);
        assert_eq!(format!("{}", arr.with(&interner)), "array [4] integer");

        let open = ctx.array_type(TypeKind::Carray, None, int);
        assert_eq!(format!("{}", open.with(&interner)), "carray [] integer");

        let param = ctx.alloc_param(ParamList::new(interner.intern("n"), int, None));
        let f = ctx.function_type(int, Some(param));
        assert_eq!(
            format!("{}", f.with(&interner)),
            "function integer (n: integer)"
        );
    }

    #[test]
    fn copy_preserves_structure() {
        let decls: Arena<Decl> = Arena::new();
        let stmts: Arena<Stmt> = Arena::new();
        let exprs: Arena<Expr> = Arena::new();
        let types: Arena<Type> = Arena::new();
        let params: Arena<ParamList> = Arena::new();
        let symbols: Arena<Symbol> = Arena::new();
        let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);

        let int = ctx.ty(TypeKind::Integer);
        let arr = ctx.array_type(TypeKind::Array, Some(ctx.integer_lit(2)), int);
        let copy = arr.copy_in(ctx);
        assert!(arr.equals(copy));
        assert!(!std::ptr::eq(arr, copy));
    }
}
