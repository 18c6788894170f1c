//! Signature exception lists

use indexmap::IndexMap;
use ttcn3_ast::{CompilationTimestamp, TypeId};
use ttcn3_diagnostics::Span;

/// One declared exception type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionEntry {
    pub ty: TypeId,
    pub span: Span,
}

/// The `exception (...)` clause of a signature.
///
/// Keeps every declaration in order, duplicates included; the by-name map
/// holds the first declaration of each name only.
#[derive(Debug, Clone, Default)]
pub struct ExceptionSet {
    entries: Vec<ExceptionEntry>,
    by_name: IndexMap<String, usize>,
    last_checked: Option<CompilationTimestamp>,
}

impl ExceptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, ty: TypeId, span: Span) {
        self.entries.push(ExceptionEntry { ty, span });
        self.last_checked = None;
    }

    pub fn with(mut self, ty: TypeId) -> Self {
        self.add(ty, Span::default());
        self
    }

    pub fn entries(&self) -> &[ExceptionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Names of the unique exception types, in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub(crate) fn first_with_name(&self, name: &str) -> Option<&ExceptionEntry> {
        self.by_name.get(name).map(|&position| &self.entries[position])
    }

    pub(crate) fn clear_names(&mut self) {
        self.by_name.clear();
    }

    pub(crate) fn insert_name(&mut self, name: String, position: usize) {
        self.by_name.insert(name, position);
    }

    pub fn last_checked(&self) -> Option<CompilationTimestamp> {
        self.last_checked
    }

    pub(crate) fn set_last_checked(&mut self, timestamp: CompilationTimestamp) {
        self.last_checked = Some(timestamp);
    }
}
