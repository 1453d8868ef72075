//! Error types and reporting

use crate::ast::{Position, Span};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CompileError>;

/// Compile error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("Lexer error at {position}: {message}")]
    Lexer {
        message: String,
        span: Span,
        position: Position,
    },

    #[error("Parser error at {position}: {message}")]
    Parser {
        message: String,
        /// What the parser would have accepted here (empty for malformed input
        /// that was otherwise in the right place)
        expected: Vec<String>,
        /// Description of the offending token
        found: String,
        span: Span,
        position: Position,
    },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span, position: Position) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
            position,
        }
    }

    /// A required token was missing
    pub fn unexpected(
        expected: Vec<String>,
        found: impl Into<String>,
        span: Span,
        position: Position,
    ) -> Self {
        let found = found.into();
        let message = format!("expected {}, found {found}", format_expected(&expected));
        Self::Parser {
            message,
            expected,
            found,
            span,
            position,
        }
    }

    /// The token was where it belongs but is itself invalid
    pub fn parser(
        message: impl Into<String>,
        found: impl Into<String>,
        span: Span,
        position: Position,
    ) -> Self {
        Self::Parser {
            message: message.into(),
            expected: Vec::new(),
            found: found.into(),
            span,
            position,
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. } | Self::Parser { span, .. } => Some(*span),
            Self::Io { .. } => None,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Lexer { position, .. } | Self::Parser { position, .. } => Some(*position),
            Self::Io { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexer { message, .. } => message,
            Self::Parser { message, .. } => message,
            Self::Io { message } => message,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lexer { .. } => "Lexer",
            Self::Parser { .. } => "Parser",
            Self::Io { .. } => "IO",
        }
    }
}

impl From<std::io::Error> for CompileError {
    fn from(e: std::io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

fn format_expected(expected: &[String]) -> String {
    match expected {
        [] => "something else".to_string(),
        [one] => one.clone(),
        many => format!("one of {}", many.join(", ")),
    }
}

/// Every error collected while parsing one unit in error-sequence mode
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} syntax error(s), first: {}", .errors.len(), first_message(.errors))]
pub struct Diagnostics {
    pub errors: Vec<CompileError>,
}

fn first_message(errors: &[CompileError]) -> String {
    errors.first().map(ToString::to_string).unwrap_or_default()
}

impl Diagnostics {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompileError> {
        self.errors.iter()
    }
}

impl From<CompileError> for Diagnostics {
    fn from(error: CompileError) -> Self {
        Self { errors: vec![error] }
    }
}

/// Report error with ariadne on stderr
pub fn report_error(filename: &str, source: &str, error: &CompileError) -> std::io::Result<()> {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = error.kind();

    if let Some(span) = error.span() {
        let range = span.start..span.end;
        Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((filename, range))
                    .with_message(error.message())
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename, Source::from(source)))
    } else {
        Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind} error: {}", error.message()))
            .finish()
            .eprint((filename, Source::from(source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(offset: usize) -> Position {
        Position {
            offset,
            line: 1,
            column: offset + 1,
        }
    }

    #[test]
    fn test_unexpected_single_expectation() {
        let err = CompileError::unexpected(vec!["`;`".to_string()], "`}`", Span::new(4, 5), pos(4));
        assert_eq!(err.message(), "expected `;`, found `}`");
        assert_eq!(err.to_string(), "Parser error at 1:5: expected `;`, found `}`");
    }

    #[test]
    fn test_unexpected_many_expectations() {
        let expected = vec!["`,`".to_string(), "`)`".to_string()];
        let err = CompileError::unexpected(expected, "end of input", Span::point(9), pos(9));
        assert_eq!(err.message(), "expected one of `,`, `)`, found end of input");
    }

    #[test]
    fn test_span_and_position_accessors() {
        let err = CompileError::lexer("unexpected character: '#'", Span::new(2, 3), pos(2));
        assert_eq!(err.span(), Some(Span::new(2, 3)));
        assert_eq!(err.position().map(|p| p.column), Some(3));
        assert_eq!(err.kind(), "Lexer");
    }

    #[test]
    fn test_io_error_has_no_span() {
        let err = CompileError::io_error("missing file");
        assert!(err.span().is_none());
        assert!(err.position().is_none());
        assert_eq!(err.to_string(), "IO error: missing file");
    }

    #[test]
    fn test_diagnostics_display_counts_errors() {
        let found = "integer literal 99999999999999999999";
        let first = CompileError::parser("malformed literal", found, Span::new(0, 20), pos(0));
        let diags = Diagnostics {
            errors: vec![first.clone(), first],
        };
        assert_eq!(diags.len(), 2);
        assert!(diags.to_string().starts_with("2 syntax error(s), first: Parser error at 1:1"));
    }
}
