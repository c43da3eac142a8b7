use std::fmt;

use crate::token::{Span, TokenType};

#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ParseErrorKind {
    UnexpectedToken {
        expected: &'static str,
        found: TokenType,
    },
    ExpectedType {
        found: TokenType,
    },
    ExpectedExpression {
        found: TokenType,
    },
    /// The scanner produced an error token for this span.
    InvalidToken,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {}", expected, found.name())
            }
            ParseErrorKind::ExpectedType { found } => {
                write!(f, "expected a type, found {}", found.name())
            }
            ParseErrorKind::ExpectedExpression { found } => {
                write!(f, "expected an expression, found {}", found.name())
            }
            ParseErrorKind::InvalidToken => write!(f, "invalid token"),
        }
    }
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Renders the error with the offending source line and a caret
    /// underline.
    pub fn display_with_source(&self, source: &str) -> String {
        let (line_num, line_start, line_content) = self.find_context(source);
        let col = self.span.start.saturating_sub(line_start);
        let len = (self.span.end - self.span.start).max(1);
        let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));

        format!(
            "parse error: {}\n\n{:4} | {}\n     | {}",
            self.kind, line_num, line_content, underline
        )
    }

    fn find_context<'a>(&self, source: &'a str) -> (usize, usize, &'a str) {
        let mut line_num = 1;
        let mut line_start = 0;

        for (i, c) in source.char_indices() {
            if i >= self.span.start {
                break;
            }
            if c == '\n' {
                line_num += 1;
                line_start = i + 1;
            }
        }

        let line_end = source[line_start..]
            .find('\n')
            .map(|off| line_start + off)
            .unwrap_or(source.len());

        (line_num, line_start, &source[line_start..line_end])
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: {}", self.kind)
    }
}

impl std::error::Error for ParseError {}
