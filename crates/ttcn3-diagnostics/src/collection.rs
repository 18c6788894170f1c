//! Diagnostic collection
//!
//! The checker never fails on ordinary semantic errors; it appends to a
//! collection and keeps going. This is that collection.

use crate::{Diagnostic, ErrorCode, RelatedInfo, Result, Span, Ttcn3Error};
use std::collections::HashSet;

/// Accumulated diagnostics of one or more checking passes
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
    /// (span, message) pairs already reported through `report_error_first_occurrence`
    reported_once: HashSet<(Span, String)>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report an error at a source span
    pub fn report_error(&mut self, span: Span, code: ErrorCode, message: impl Into<String>) {
        self.add(Diagnostic::error(code, message).with_span(span));
    }

    /// Report an error unless the same message was already reported at the same span
    pub fn report_error_first_occurrence(
        &mut self,
        span: Span,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        let message = message.into();
        if self.reported_once.insert((span, message.clone())) {
            self.add(Diagnostic::error(code, message).with_span(span));
        }
    }

    /// Report an error that points back at an earlier location
    pub fn report_error_with_related(
        &mut self,
        span: Span,
        code: ErrorCode,
        message: impl Into<String>,
        related: RelatedInfo,
    ) {
        self.add(Diagnostic::error(code, message).with_span(span).with_related(related));
    }

    pub fn report_warning(&mut self, span: Span, code: ErrorCode, message: impl Into<String>) {
        self.add(Diagnostic::warning(code, message).with_span(span));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Messages in report order, mostly useful for assertions
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    /// Whether any diagnostic message contains `needle`
    pub fn contains_message(&self, needle: &str) -> bool {
        self.diagnostics.iter().any(|d| d.message.contains(needle))
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.reported_once.clear();
    }

    /// Sort diagnostics by position, keeping report order for equal positions.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by_key(|d| d.span.map(|s| s.start).unwrap_or(0));
    }

    /// Fold the errors of the collection into a `Result`
    pub fn into_result(self) -> Result<()> {
        let mut errors: Vec<Ttcn3Error> = self
            .diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(Ttcn3Error::from)
            .collect();
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Ttcn3Error::Multiple(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TTCN0100, TTCN0309, TTCN0400};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_occurrence_is_deduplicated() {
        let mut diags = DiagnosticCollection::new();
        diags.report_error_first_occurrence(Span::new(0, 3), TTCN0100, "type `A' is not defined");
        diags.report_error_first_occurrence(Span::new(0, 3), TTCN0100, "type `A' is not defined");
        diags.report_error_first_occurrence(Span::new(9, 12), TTCN0100, "type `A' is not defined");
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let mut diags = DiagnosticCollection::new();
        diags.report_warning(Span::new(0, 1), TTCN0309, "pattern is not validated");
        assert!(!diags.has_errors());
        assert!(diags.clone().into_result().is_ok());

        diags.report_error(Span::new(2, 3), TTCN0100, "type `A' is not defined");
        assert_eq!(diags.error_count(), 1);
        let err = diags.into_result().unwrap_err();
        assert_eq!(err.code(), TTCN0100);
    }

    #[test]
    fn test_related_info_is_attached() {
        let mut diags = DiagnosticCollection::new();
        diags.report_error_with_related(
            Span::new(20, 21),
            TTCN0400,
            "Duplicate field name `x' was declared here again",
            RelatedInfo::new("first declared here").with_span(Span::new(10, 11)),
        );
        let diag = &diags.diagnostics()[0];
        assert_eq!(diag.related.len(), 1);
        assert_eq!(diag.related[0].span, Some(Span::new(10, 11)));
    }

    #[test]
    fn test_sort_by_position() {
        let mut diags = DiagnosticCollection::new();
        diags.report_error(Span::new(10, 11), TTCN0100, "second");
        diags.report_error(Span::new(1, 2), TTCN0100, "first");
        diags.sort();
        assert_eq!(diags.messages(), vec!["first", "second"]);
    }
}
