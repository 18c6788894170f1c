//! TTCN-3 diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the
//! semantic checker: error codes, source spans, diagnostics and the
//! collector the checker appends to while it walks the type graph.

mod collection;
mod error;
mod error_code;
mod span;

pub use collection::*;
pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for fallible library operations
pub type Result<T> = std::result::Result<T, Ttcn3Error>;
