use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Resolver,
    Typechecker,
    Codegen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    /// Informational note that an `auto` or omitted length was filled in.
    Resolved,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub phase: Phase,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match (self.phase, self.severity) {
            (Phase::Resolver, Severity::Error) => "resolver error: ",
            (Phase::Resolver, Severity::Warning) => "Resolver Warning: ",
            (Phase::Resolver, Severity::Resolved) => "resolver resolved: ",
            (Phase::Typechecker, Severity::Error) => "typechecker error: ",
            (Phase::Typechecker, Severity::Warning) => "typechecker warning: ",
            (Phase::Typechecker, Severity::Resolved) => "typechecker resolved: ",
            (Phase::Codegen, Severity::Error) => "codegen error: ",
            (Phase::Codegen, Severity::Warning) => "codegen warning: ",
            (Phase::Codegen, Severity::Resolved) => "codegen resolved: ",
        };
        write!(f, "{}{}", prefix, self.message)
    }
}

/// Per-compilation diagnostic context: error counters the front-end gates
/// phases on, section flags for the code generator, and the collected
/// diagnostic lines.
#[derive(Default)]
pub struct Context {
    pub resolver_errors: u32,
    pub typechecker_errors: u32,
    pub codegen_errors: u32,
    pub data_flag: bool,
    pub text_flag: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, phase: Phase, message: String) {
        match phase {
            Phase::Resolver => self.resolver_errors += 1,
            Phase::Typechecker => self.typechecker_errors += 1,
            Phase::Codegen => self.codegen_errors += 1,
        }
        self.diagnostics.push(Diagnostic {
            phase,
            severity: Severity::Error,
            message,
        });
    }

    pub fn warning(&mut self, phase: Phase, message: String) {
        self.diagnostics.push(Diagnostic {
            phase,
            severity: Severity::Warning,
            message,
        });
    }

    pub fn resolved(&mut self, phase: Phase, message: String) {
        self.diagnostics.push(Diagnostic {
            phase,
            severity: Severity::Resolved,
            message,
        });
    }

    pub fn errors_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Resolver => self.resolver_errors,
            Phase::Typechecker => self.typechecker_errors,
            Phase::Codegen => self.codegen_errors,
        }
    }

    /// Routes collected diagnostics the way the original tool did:
    /// errors and warnings to stderr, "resolved" notes to stdout.
    pub fn report(&self) {
        for diagnostic in &self.diagnostics {
            match diagnostic.severity {
                Severity::Resolved => println!("{}", diagnostic),
                _ => eprintln!("{}", diagnostic),
            }
        }
    }

    /// Clears all counters, flags and messages for a fresh compilation.
    pub fn reset(&mut self) {
        *self = Context::new();
    }
}
