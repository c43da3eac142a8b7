pub mod decl;
pub mod expr;
pub mod param_list;
pub mod stmt;
pub mod symbol;
pub mod types;

pub use decl::Decl;
pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use param_list::ParamList;
pub use stmt::{Stmt, StmtKind};
pub use symbol::{Symbol, SymbolKind};
pub use types::{Type, TypeKind};
