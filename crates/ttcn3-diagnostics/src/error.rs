//! Diagnostic and error types

use crate::{ErrorCode, SourceLocation, Span, TTCN0500, TTCN0501};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - the checked entity is not a legal instance
    Error,
    /// Warning - accepted, but probably not what was meant
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message attached to a source span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Source span the message is reported on
    pub span: Option<Span>,
    /// Related information
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            span: None,
            related: Vec::new(),
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            span: None,
            related: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Add related information
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render the diagnostic against its source text as `line:col: severity[code]: message`
    pub fn render(&self, source: &str) -> String {
        let location = self
            .span
            .map(|span| SourceLocation::from_span(span, source).to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        let head = format!("{}[{}]", self.severity, self.code);

        #[cfg(feature = "colored")]
        let head = {
            use colored::Colorize;
            match self.severity {
                Severity::Error => head.red().bold().to_string(),
                Severity::Warning => head.yellow().bold().to_string(),
            }
        };

        format!("{location}: {head}: {}", self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(span) = &self.span {
            write!(f, " at {}", span)?;
        }
        Ok(())
    }
}

/// Related diagnostic information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedInfo {
    /// Span of related code
    pub span: Option<Span>,
    /// Message explaining the relationship
    pub message: String,
}

impl RelatedInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            span: None,
            message: message.into(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

/// Error type for the fallible parts of the library
#[derive(Debug, Clone, Error)]
pub enum Ttcn3Error {
    /// A semantic error surfaced from a diagnostic collection
    #[error("{code}: {message}")]
    Semantic {
        code: ErrorCode,
        message: String,
        span: Option<Span>,
    },

    /// Invalid checker configuration
    #[error("{code}: invalid configuration: {message}")]
    Configuration { code: ErrorCode, message: String },

    /// Misuse of the library (for example an id from another arena)
    #[error("{code}: {message}")]
    Internal { code: ErrorCode, message: String },

    /// Multiple errors collected
    #[error("Multiple errors: {}", .0.len())]
    Multiple(Vec<Ttcn3Error>),
}

impl Ttcn3Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            code: TTCN0501,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: TTCN0500,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Semantic { code, .. } => *code,
            Self::Configuration { code, .. } => *code,
            Self::Internal { code, .. } => *code,
            Self::Multiple(errors) => errors.first().map(|e| e.code()).unwrap_or(TTCN0500),
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Semantic { code, message, span } => {
                let diag = Diagnostic::error(*code, message.clone());
                match span {
                    Some(span) => diag.with_span(*span),
                    None => diag,
                }
            }
            Self::Configuration { code, message } | Self::Internal { code, message } => {
                Diagnostic::error(*code, message.clone())
            }
            Self::Multiple(errors) => match errors.first() {
                Some(first) => first.to_diagnostic(),
                None => Diagnostic::error(TTCN0500, "Unknown error"),
            },
        }
    }
}

impl From<&Diagnostic> for Ttcn3Error {
    fn from(diag: &Diagnostic) -> Self {
        Self::Semantic {
            code: diag.code,
            message: diag.message.clone(),
            span: diag.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TTCN0100, TTCN0302};

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(TTCN0100, "type `Foo' is not defined")
            .with_span(Span::new(4, 7));

        assert!(diag.to_string().contains("TTCN0100"));
        assert!(diag.to_string().contains("4..7"));
    }

    #[cfg(not(feature = "colored"))]
    #[test]
    fn test_diagnostic_render() {
        let source = "template integer t := (10 .. 5);";
        let diag = Diagnostic::error(TTCN0302, "lower boundary is higher than upper boundary")
            .with_span(Span::new(22, 31));
        assert_eq!(
            diag.render(source),
            "1:23: error[TTCN0302]: lower boundary is higher than upper boundary"
        );
    }

    #[test]
    fn test_error_roundtrip_through_diagnostic() {
        let diag =
            Diagnostic::error(TTCN0100, "type `Foo' is not defined").with_span(Span::new(1, 2));
        let err = Ttcn3Error::from(&diag);
        assert_eq!(err.code(), TTCN0100);
        assert_eq!(err.to_diagnostic(), diag);
    }
}
