//! TTCN-3 type checking
//!
//! This crate holds the semantic core of a TTCN-3 front end:
//! - the type node graph, stored in a [`TypeArena`] and addressed by id
//! - alias and cycle resolution through a [`ReferenceChain`]
//! - the compatibility rules between type kinds
//! - value and template checking against a governing type
//! - field access paths, aggregate field maps and signature exception sets
//!
//! All checks are driven by a [`CompilationTimestamp`](ttcn3_ast::CompilationTimestamp):
//! work done for the current pass is never repeated, and errors are
//! collected as diagnostics rather than returned.

mod arena;
mod chain;
mod coding;
mod config;
mod exceptions;
mod field_map;
mod options;
pub mod semantic;
mod subtype;
mod type_system;

pub use arena::*;
pub use chain::*;
pub use coding::*;
pub use config::*;
pub use exceptions::*;
pub use field_map::*;
pub use options::*;
pub use semantic::*;
pub use subtype::*;
pub use type_system::*;
