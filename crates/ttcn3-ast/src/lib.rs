//! TTCN-3 syntax-side definitions consumed by the semantic checker
//!
//! The parser is an external collaborator; this crate holds what it hands
//! over: identifiers, value and template literals, subreference paths, the
//! arena ids that values and templates record as their governor, and the
//! compilation timestamp every check call is driven by.

mod ids;
mod subreference;
mod template;
mod timestamp;
mod value;

pub use ids::*;
pub use subreference::*;
pub use template::*;
pub use timestamp::*;
pub use value::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use ttcn3_diagnostics::Span;

/// An identifier with its source span
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    /// The identifier text
    pub name: String,
    /// Where the identifier appears
    pub span: Span,
}

impl Identifier {
    /// Create an identifier without a meaningful span
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            span: Span::default(),
        }
    }

    pub fn at(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Identifiers recovered from broken source come through empty
    pub fn is_usable(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Identifier {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
