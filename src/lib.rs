//! Compiler for B-minor, a small statically typed imperative language.
//!
//! The pipeline runs scan → parse → resolve → typecheck → codegen over a
//! single source file. The AST lives in bump arenas (`arena`,
//! `arena_ctx`); the resolver attaches symbols through a lexical scope
//! stack (`scope`), the type checker infers `auto` placeholders in place,
//! and the code generator emits x86-64 text assembly against a small
//! runtime library.

pub mod arena;
pub mod arena_ctx;
pub mod ast;
pub mod cli;
pub mod codegen;
pub mod compile;
pub mod context;
pub mod display;
pub mod encoder;
pub mod error;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod resolve;
pub mod scope;
pub mod token;
pub mod typecheck;

pub use arena::Arena;
pub use arena_ctx::AstContext;
pub use compile::{CompileError, PhaseOutput};
pub use context::{Context, Diagnostic, Phase, Severity};
pub use display::{DisplayWith, WithInterner};
pub use error::{ParseError, ParseErrorKind};
pub use intern::{Interner, Name};
pub use lexer::Lexer;
pub use parser::Parser;
pub use scope::ScopeStack;
pub use token::{Span, Token, TokenType};
