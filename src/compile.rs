//! The compilation pipeline. Phases chain cumulatively the way the
//! command-line tool exposes them: `--typecheck` implies resolve implies
//! parse; each adds its own pass after its predecessor and gates the next
//! on its diagnostic counter.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::arena::Arena;
use crate::arena_ctx::AstContext;
use crate::ast::{Decl, Expr, ParamList, Stmt, Symbol, Type};
use crate::codegen;
use crate::context::{Context, Diagnostic, Severity};
use crate::encoder;
use crate::intern::Interner;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::resolve;
use crate::token::TokenType;
use crate::typecheck;

/// Errors that stop a phase outright. Diagnostic-counter failures carry
/// the count so the front-end can report it.
#[derive(Debug)]
pub enum CompileError {
    Io(String),
    Encode(String),
    Scan(u32),
    Parse(String),
    Resolve(u32),
    Typecheck(u32),
    Codegen(u32),
    Usage(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Io(message) => write!(f, "{}", message),
            CompileError::Encode(message) => write!(f, "{}", message),
            CompileError::Scan(n) => write!(f, "scanning failed with {} invalid token(s)", n),
            CompileError::Parse(message) => write!(f, "{}", message),
            CompileError::Resolve(n) => {
                write!(f, "name resolution failed with {} error(s)", n)
            }
            CompileError::Typecheck(n) => {
                write!(f, "type checking failed with {} error(s)", n)
            }
            CompileError::Codegen(n) => {
                write!(f, "code generation failed with {} error(s)", n)
            }
            CompileError::Usage(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CompileError {}

/// What the semantic phases produced for one source text.
pub struct PhaseOutput {
    pub diagnostics: Vec<Diagnostic>,
    pub resolver_errors: u32,
    pub typechecker_errors: u32,
    pub codegen_errors: u32,
    pub assembly: Option<String>,
}

impl PhaseOutput {
    fn from_context(context: Context, assembly: Option<String>) -> Self {
        PhaseOutput {
            resolver_errors: context.resolver_errors,
            typechecker_errors: context.typechecker_errors,
            codegen_errors: context.codegen_errors,
            diagnostics: context.diagnostics,
            assembly,
        }
    }

    /// All diagnostic lines, in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.to_string()).collect()
    }
}

/// Routes diagnostics the way the original tool did: errors and warnings
/// to stderr, "resolved" notes to stdout.
pub fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        match diagnostic.severity {
            Severity::Resolved => println!("{}", diagnostic),
            _ => eprintln!("{}", diagnostic),
        }
    }
}

// ----------------------------------------------------------------------
// Source-level phases
// ----------------------------------------------------------------------

/// Tokenizes the source and renders the `--scan` listing. Returns the
/// listing lines and the number of invalid tokens.
pub fn scan_source(source: &str) -> (Vec<String>, u32) {
    let mut interner = Interner::new();
    let tokens = Lexer::new(source, &mut interner).tokenize();
    let mut lines = Vec::new();
    let mut errors = 0;
    for token in &tokens {
        match token.kind {
            TokenType::Eof => {}
            TokenType::Error(name) => {
                errors += 1;
                lines.push(format!("scan error: {} is not valid", interner.resolve(name)));
            }
            kind if kind.carries_text() => {
                lines.push(format!(
                    "token: {:<32}  text: {}",
                    kind.name(),
                    &source[token.span.start..token.span.end]
                ));
            }
            kind => lines.push(format!("token: {}", kind.name())),
        }
    }
    (lines, errors)
}

/// Checks that the source parses.
pub fn parse_source(source: &str) -> Result<(), CompileError> {
    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let tokens = Lexer::new(source, &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    parser
        .parse_program()
        .map_err(|e| CompileError::Parse(e.display_with_source(source)))?;
    Ok(())
}

/// Parses and pretty-prints the program.
pub fn print_source(source: &str) -> Result<String, CompileError> {
    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let tokens = Lexer::new(source, &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    let root = parser
        .parse_program()
        .map_err(|e| CompileError::Parse(e.display_with_source(source)))?;

    let mut out = String::new();
    if let Some(root) = root {
        Decl::write_chain(root, &interner, &mut out, 0)
            .expect("writing to a string cannot fail");
    }
    Ok(out)
}

/// Parses and resolves the program.
pub fn resolve_source(source: &str) -> Result<PhaseOutput, CompileError> {
    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let tokens = Lexer::new(source, &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    let root = parser
        .parse_program()
        .map_err(|e| CompileError::Parse(e.display_with_source(source)))?;

    let mut context = Context::new();
    resolve::resolve(ctx, &interner, &mut context, root);
    Ok(PhaseOutput::from_context(context, None))
}

/// Parses, resolves, and type-checks the program. Type checking is
/// skipped when resolution recorded errors.
pub fn typecheck_source(source: &str) -> Result<PhaseOutput, CompileError> {
    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let tokens = Lexer::new(source, &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    let root = parser
        .parse_program()
        .map_err(|e| CompileError::Parse(e.display_with_source(source)))?;

    let mut context = Context::new();
    resolve::resolve(ctx, &interner, &mut context, root);
    if context.resolver_errors == 0 {
        typecheck::typecheck(ctx, &interner, &mut context, root);
    }
    Ok(PhaseOutput::from_context(context, None))
}

/// Runs the whole pipeline. Assembly is produced only when resolution and
/// type checking are clean.
pub fn codegen_source(source: &str) -> Result<PhaseOutput, CompileError> {
    let decls: Arena<Decl> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();
    let params: Arena<ParamList> = Arena::new();
    let symbols: Arena<Symbol> = Arena::new();
    let ctx = AstContext::new(&decls, &stmts, &exprs, &types, &params, &symbols);
    let mut interner = Interner::new();
    let tokens = Lexer::new(source, &mut interner).tokenize();
    let mut parser = Parser::new(tokens, ctx);
    let root = parser
        .parse_program()
        .map_err(|e| CompileError::Parse(e.display_with_source(source)))?;

    let mut context = Context::new();
    resolve::resolve(ctx, &interner, &mut context, root);
    if context.resolver_errors == 0 {
        typecheck::typecheck(ctx, &interner, &mut context, root);
    }
    let assembly = if context.resolver_errors == 0 && context.typechecker_errors == 0 {
        Some(codegen::generate(&interner, &mut context, root))
    } else {
        None
    };
    Ok(PhaseOutput::from_context(context, assembly))
}

// ----------------------------------------------------------------------
// File-level phases, as the CLI drives them
// ----------------------------------------------------------------------

fn read_source(path: &Path) -> Result<String, CompileError> {
    fs::read_to_string(path).map_err(|e| CompileError::Io(format!("{} {}", e, path.display())))
}

/// `--encode`: reads one string literal, decodes it, re-encodes it.
pub fn encode_file(path: &Path) -> Result<(), CompileError> {
    let source = read_source(path)?;
    let line = source
        .lines()
        .next()
        .ok_or_else(|| CompileError::Encode("Read error or empty file".to_string()))?;
    let decoded = encoder::string_decode(line.trim_end())
        .map_err(|e| CompileError::Encode(e.to_string()))?;
    println!("decoded string: {}", decoded);
    println!("encoded string from decoded: {}", encoder::string_encode(&decoded));
    Ok(())
}

pub fn scan_file(path: &Path) -> Result<(), CompileError> {
    let source = read_source(path)?;
    let (lines, errors) = scan_source(&source);
    for line in lines {
        println!("{}", line);
    }
    if errors > 0 {
        Err(CompileError::Scan(errors))
    } else {
        Ok(())
    }
}

pub fn parse_file(path: &Path) -> Result<(), CompileError> {
    let source = read_source(path)?;
    parse_source(&source)?;
    println!("Parse Successful");
    Ok(())
}

pub fn print_file(path: &Path) -> Result<(), CompileError> {
    let source = read_source(path)?;
    let text = print_source(&source)?;
    print!("{}", text);
    Ok(())
}

pub fn resolve_file(path: &Path) -> Result<(), CompileError> {
    let source = read_source(path)?;
    let output = resolve_source(&source)?;
    report_diagnostics(&output.diagnostics);
    if output.resolver_errors > 0 {
        return Err(CompileError::Resolve(output.resolver_errors));
    }
    Ok(())
}

pub fn typecheck_file(path: &Path) -> Result<(), CompileError> {
    let source = read_source(path)?;
    let output = typecheck_source(&source)?;
    report_diagnostics(&output.diagnostics);
    if output.resolver_errors > 0 {
        return Err(CompileError::Resolve(output.resolver_errors));
    }
    if output.typechecker_errors > 0 {
        return Err(CompileError::Typecheck(output.typechecker_errors));
    }
    Ok(())
}

pub fn codegen_file(path: &Path, output_path: &Path) -> Result<(), CompileError> {
    let source = read_source(path)?;
    let output = codegen_source(&source)?;
    report_diagnostics(&output.diagnostics);
    if output.resolver_errors > 0 {
        return Err(CompileError::Resolve(output.resolver_errors));
    }
    if output.typechecker_errors > 0 {
        return Err(CompileError::Typecheck(output.typechecker_errors));
    }
    if output.codegen_errors > 0 {
        return Err(CompileError::Codegen(output.codegen_errors));
    }
    let assembly = output.assembly.unwrap_or_default();
    fs::write(output_path, assembly)
        .map_err(|e| CompileError::Io(format!("{} {}", e, output_path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_lists_tokens_with_text() {
        let (lines, errors) = scan_source("x: integer = 5;");
        assert_eq!(errors, 0);
        assert!(lines[0].starts_with("token: IDENTIFIER"));
        assert!(lines[0].ends_with("text: x"));
        assert!(lines.iter().any(|l| l.starts_with("token: INTEGER")));
    }

    #[test]
    fn scan_reports_invalid_tokens() {
        let (lines, errors) = scan_source("x = @;");
        assert_eq!(errors, 1);
        assert!(lines.iter().any(|l| l == "scan error: @ is not valid"));
    }

    #[test]
    fn parse_accepts_a_declaration() {
        assert!(parse_source("x: integer = 5;").is_ok());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            parse_source("x: integer = ;"),
            Err(CompileError::Parse(_))
        ));
    }

    #[test]
    fn typecheck_runs_after_clean_resolve() {
        let output = typecheck_source("x: integer = 5;").unwrap();
        assert_eq!(output.resolver_errors, 0);
        assert_eq!(output.typechecker_errors, 0);
    }

    #[test]
    fn typecheck_is_skipped_when_resolve_fails() {
        let output = typecheck_source("x: integer = y;").unwrap();
        assert_eq!(output.resolver_errors, 1);
        assert_eq!(output.typechecker_errors, 0);
    }
}
