//! Command-line front-end: `bminor <phase> <input> [output]`, where the
//! phase is exactly one of --encode, --scan, --parse, --print, --resolve,
//! --typecheck, --codegen.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::compile::{self, CompileError};

#[derive(Parser)]
#[command(name = "bminor")]
#[command(about = "Compiler for the B-minor language", long_about = None)]
#[command(version)]
#[command(group(
    ArgGroup::new("phase")
        .required(true)
        .args(["encode", "scan", "parse", "print", "resolve", "typecheck", "codegen"])
))]
pub struct Cli {
    /// Decode and re-encode a string literal
    #[arg(long)]
    pub encode: bool,

    /// Print the token stream
    #[arg(long)]
    pub scan: bool,

    /// Check that the input parses
    #[arg(long)]
    pub parse: bool,

    /// Parse and pretty-print the program
    #[arg(long)]
    pub print: bool,

    /// Parse and resolve names
    #[arg(long)]
    pub resolve: bool,

    /// Parse, resolve, and type-check
    #[arg(long)]
    pub typecheck: bool,

    /// Compile to x86-64 assembly
    #[arg(long)]
    pub codegen: bool,

    /// Input source file
    pub input: PathBuf,

    /// Output assembly path (required by --codegen)
    pub output: Option<PathBuf>,
}

/// Entry point for the CLI.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.encode {
        compile::encode_file(&cli.input)?;
    } else if cli.scan {
        compile::scan_file(&cli.input)?;
    } else if cli.parse {
        compile::parse_file(&cli.input)?;
    } else if cli.print {
        compile::print_file(&cli.input)?;
    } else if cli.resolve {
        compile::resolve_file(&cli.input)?;
    } else if cli.typecheck {
        compile::typecheck_file(&cli.input)?;
    } else if cli.codegen {
        let output = cli.output.as_deref().ok_or_else(|| {
            CompileError::Usage("--codegen requires an output assembly path".to_string())
        })?;
        compile::codegen_file(&cli.input, output)?;
    }
    Ok(())
}
