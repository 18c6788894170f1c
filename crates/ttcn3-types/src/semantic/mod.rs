//! Semantic checking of types, values and templates
//!
//! [`TypeChecker`] is the entry point; its methods are spread over the
//! modules below by concern.

mod checker;
mod compatibility;
mod fields;
mod resolver;
mod scope;
mod signatures;
mod templates;
mod values;

pub use checker::TypeChecker;
pub use fields::FieldAccess;
pub use scope::*;
