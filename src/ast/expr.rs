use std::cell::Cell;
use std::fmt;

use crate::arena_ctx::AstContext;
use crate::ast::symbol::Symbol;
use crate::ast::types::Type;
use crate::display::DisplayWith;
use crate::encoder;
use crate::intern::{Interner, Name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Assign,
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Expo,
}

impl BinaryOp {
    /// Printing precedence: assignment lowest, exponentiation highest of
    /// the binary operators. Postfix, calls and primaries sit at 10.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Assign => 0,
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq => 3,
            BinaryOp::Add | BinaryOp::Sub => 4,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 5,
            BinaryOp::Expo => 6,
        }
    }

    pub fn is_right_assoc(self) -> bool {
        matches!(self, BinaryOp::Assign | BinaryOp::Expo)
    }

    pub fn token(self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Expo => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
    Length,
    Increment,
    Decrement,
}

impl UnaryOp {
    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOp::Increment | UnaryOp::Decrement)
    }

    pub fn precedence(self) -> u8 {
        if self.is_postfix() {
            8
        } else {
            7
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
            UnaryOp::Length => "#",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
        }
    }
}

/// An expression node. `symbol` is attached by the resolver (identifiers
/// and brace initializers), `ty` by the type checker so the code generator
/// can pick runtime entry points without re-deriving types.
pub struct Expr<'a> {
    pub kind: ExprKind<'a>,
    pub symbol: Cell<Option<&'a Symbol<'a>>>,
    pub ty: Cell<Option<&'a Type<'a>>>,
}

pub enum ExprKind<'a> {
    Binary {
        op: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Unary {
        op: UnaryOp,
        operand: &'a Expr<'a>,
    },
    Group(&'a Expr<'a>),
    Call {
        callee: &'a Expr<'a>,
        args: Option<&'a Expr<'a>>,
    },
    /// Right-leaning cons cell of an argument list.
    Args {
        arg: &'a Expr<'a>,
        next: Option<&'a Expr<'a>>,
    },
    Index {
        array: &'a Expr<'a>,
        index: &'a Expr<'a>,
    },
    /// Brace initializer; `items` is an `Args` chain.
    Braces {
        items: Option<&'a Expr<'a>>,
    },
    IntegerLit(i64),
    HexLit(i64),
    BinaryLit(i64),
    DoubleLit(f64),
    ScientificLit(f64),
    CharLit(u8),
    StringLit(Name),
    BooleanLit(bool),
    Ident(Name),
}

impl<'a> Expr<'a> {
    pub fn new(kind: ExprKind<'a>) -> Self {
        Expr {
            kind,
            symbol: Cell::new(None),
            ty: Cell::new(None),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::IntegerLit(_)
                | ExprKind::HexLit(_)
                | ExprKind::BinaryLit(_)
                | ExprKind::DoubleLit(_)
                | ExprKind::ScientificLit(_)
                | ExprKind::CharLit(_)
                | ExprKind::StringLit(_)
                | ExprKind::BooleanLit(_)
        )
    }

    /// Compile-time constants legal as global initializers: literals,
    /// brace initializers, and a negated literal.
    pub fn is_constant(&self) -> bool {
        match &self.kind {
            ExprKind::Braces { .. } => true,
            ExprKind::Unary {
                op: UnaryOp::Negate,
                operand,
            } => operand.is_literal(),
            _ => self.is_literal(),
        }
    }

    /// Strips grouping nodes; chained groups collapse.
    pub fn unwrap_groups(&self) -> &Expr<'a> {
        let mut e = self;
        while let ExprKind::Group(inner) = &e.kind {
            e = inner;
        }
        e
    }

    /// Printing precedence of this node; grouping is transparent.
    pub fn precedence(&self) -> u8 {
        match &self.kind {
            ExprKind::Binary { op, .. } => op.precedence(),
            ExprKind::Unary { op, .. } => op.precedence(),
            ExprKind::Group(inner) => inner.precedence(),
            _ => 10,
        }
    }

    pub fn copy_in(&self, ctx: AstContext<'a>) -> &'a Expr<'a> {
        let kind = match &self.kind {
            ExprKind::Binary { op, left, right } => ExprKind::Binary {
                op: *op,
                left: left.copy_in(ctx),
                right: right.copy_in(ctx),
            },
            ExprKind::Unary { op, operand } => ExprKind::Unary {
                op: *op,
                operand: operand.copy_in(ctx),
            },
            ExprKind::Group(inner) => ExprKind::Group(inner.copy_in(ctx)),
            ExprKind::Call { callee, args } => ExprKind::Call {
                callee: callee.copy_in(ctx),
                args: args.map(|a| a.copy_in(ctx)),
            },
            ExprKind::Args { arg, next } => ExprKind::Args {
                arg: arg.copy_in(ctx),
                next: next.map(|n| n.copy_in(ctx)),
            },
            ExprKind::Index { array, index } => ExprKind::Index {
                array: array.copy_in(ctx),
                index: index.copy_in(ctx),
            },
            ExprKind::Braces { items } => ExprKind::Braces {
                items: items.map(|i| i.copy_in(ctx)),
            },
            ExprKind::IntegerLit(v) => ExprKind::IntegerLit(*v),
            ExprKind::HexLit(v) => ExprKind::HexLit(*v),
            ExprKind::BinaryLit(v) => ExprKind::BinaryLit(*v),
            ExprKind::DoubleLit(v) => ExprKind::DoubleLit(*v),
            ExprKind::ScientificLit(v) => ExprKind::ScientificLit(*v),
            ExprKind::CharLit(v) => ExprKind::CharLit(*v),
            ExprKind::StringLit(n) => ExprKind::StringLit(*n),
            ExprKind::BooleanLit(v) => ExprKind::BooleanLit(*v),
            ExprKind::Ident(n) => ExprKind::Ident(*n),
        };
        ctx.alloc_expr(Expr {
            kind,
            symbol: Cell::new(self.symbol.get().map(|s| s.copy_in(ctx))),
            ty: Cell::new(self.ty.get().map(|t| t.copy_in(ctx))),
        })
    }

    /// Prints `child` in the syntactic position of a parent with precedence
    /// `parent_prec`, inserting parentheses only where reparsing would
    /// otherwise change the tree.
    fn fmt_child(
        child: &Expr<'a>,
        parent_prec: u8,
        parens_at_equal: bool,
        interner: &Interner,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let child = child.unwrap_groups();
        let prec = child.precedence();
        if prec < parent_prec || (prec == parent_prec && parens_at_equal) {
            write!(f, "(")?;
            child.fmt_with(interner, f)?;
            write!(f, ")")
        } else {
            child.fmt_with(interner, f)
        }
    }
}

impl DisplayWith for Expr<'_> {
    fn fmt_with(&self, interner: &Interner, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.unwrap_groups();
        match &e.kind {
            ExprKind::Binary { op, left, right } => {
                let prec = op.precedence();
                let right_assoc = op.is_right_assoc();
                Expr::fmt_child(left, prec, right_assoc, interner, f)?;
                write!(f, "{}", op.token())?;
                Expr::fmt_child(right, prec, !right_assoc, interner, f)
            }
            ExprKind::Unary { op, operand } if op.is_postfix() => {
                Expr::fmt_child(operand, op.precedence(), false, interner, f)?;
                write!(f, "{}", op.token())
            }
            ExprKind::Unary { op, operand } => {
                write!(f, "{}", op.token())?;
                // Nested prefix operators keep their parentheses so that
                // -(-x) cannot rescan as a decrement; !! is the exception.
                let inner_is_not = matches!(
                    operand.unwrap_groups().kind,
                    ExprKind::Unary {
                        op: UnaryOp::Not,
                        ..
                    }
                );
                let skip_parens = *op == UnaryOp::Not && inner_is_not;
                Expr::fmt_child(operand, op.precedence(), !skip_parens, interner, f)
            }
            ExprKind::Group(_) => unreachable!("groups are unwrapped above"),
            ExprKind::Call { callee, args } => {
                Expr::fmt_child(callee, 10, false, interner, f)?;
                write!(f, "(")?;
                if let Some(args) = args {
                    args.fmt_with(interner, f)?;
                }
                write!(f, ")")
            }
            ExprKind::Args { arg, next } => {
                arg.fmt_with(interner, f)?;
                if let Some(next) = next {
                    write!(f, ", ")?;
                    next.fmt_with(interner, f)?;
                }
                Ok(())
            }
            ExprKind::Index { array, index } => {
                Expr::fmt_child(array, 10, false, interner, f)?;
                write!(f, "[")?;
                index.fmt_with(interner, f)?;
                write!(f, "]")
            }
            ExprKind::Braces { items } => {
                write!(f, "{{")?;
                if let Some(items) = items {
                    items.fmt_with(interner, f)?;
                }
                write!(f, "}}")
            }
            ExprKind::IntegerLit(v) => write!(f, "{}", v),
            ExprKind::HexLit(v) => write!(f, "0x{:x}", v),
            ExprKind::BinaryLit(v) => write!(f, "0b{:b}", v),
            ExprKind::DoubleLit(v) => write!(f, "{:?}", v),
            ExprKind::ScientificLit(v) => write!(f, "{:e}", v),
            ExprKind::CharLit(c) => write!(f, "{}", encoder::char_encode(*c)),
            ExprKind::StringLit(n) => {
                write!(f, "{}", encoder::string_encode(interner.resolve(*n)))
            }
            ExprKind::BooleanLit(v) => write!(f, "{}", if *v { "true" } else { "false" }),
            ExprKind::Ident(n) => write!(f, "{}", interner.resolve(*n)),
        }
    }
}
