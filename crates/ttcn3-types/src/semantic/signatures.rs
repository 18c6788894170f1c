//! Signature and testcase checks

use std::mem;
use ttcn3_ast::{CompilationTimestamp, TypeId};
use ttcn3_diagnostics::{RelatedInfo, TTCN0106, TTCN0109, TTCN0401};

use super::checker::Shape;
use super::TypeChecker;
use crate::{ExceptionSet, TypeKind};

impl TypeChecker {
    pub(crate) fn check_signature(&mut self, ty: TypeId, timestamp: CompilationTimestamp) {
        let TypeKind::Signature(signature) = &self.arena[ty].kind else {
            return;
        };
        let types: Vec<TypeId> = signature
            .parameters
            .iter()
            .map(|p| p.ty)
            .chain(signature.return_type)
            .collect();
        for member in types {
            self.check(member, timestamp);
        }
        self.check_exceptions(ty, timestamp);
    }

    /// Validate the exception list of a signature and rebuild its name map
    pub fn check_exceptions(&mut self, signature: TypeId, timestamp: CompilationTimestamp) {
        let mut exceptions = match &mut self.arena[signature].kind {
            TypeKind::Signature(s) => mem::take(&mut s.exceptions),
            _ => return,
        };
        self.check_exception_set(&mut exceptions, timestamp);
        if let TypeKind::Signature(s) = &mut self.arena[signature].kind {
            s.exceptions = exceptions;
        }
    }

    fn check_exception_set(
        &mut self,
        exceptions: &mut ExceptionSet,
        timestamp: CompilationTimestamp,
    ) {
        if CompilationTimestamp::is_current(exceptions.last_checked(), timestamp) {
            return;
        }
        exceptions.set_last_checked(timestamp);
        exceptions.clear_names();

        let entries = exceptions.entries().to_vec();
        for (position, entry) in entries.into_iter().enumerate() {
            self.check(entry.ty, timestamp);
            let last = self.type_refd_last(entry.ty, timestamp);
            if self.is_erroneous(entry.ty) || self.is_erroneous(last) {
                continue;
            }
            let span = if entry.span.is_empty() {
                self.arena[entry.ty].span
            } else {
                entry.span
            };
            let name = self.type_name(last);
            if matches!(
                self.shape(last),
                Shape::Default | Shape::Testcase | Shape::Signature
            ) {
                let message = format!(
                    "{} type `{name}' cannot be on the exception list of a signature",
                    self.arena[last].kind.type_name()
                );
                self.diagnostics.report_error(span, TTCN0109, message);
                continue;
            }
            match exceptions.first_with_name(&name).copied() {
                Some(first) => {
                    let first_span = if first.span.is_empty() {
                        self.arena[first.ty].span
                    } else {
                        first.span
                    };
                    self.diagnostics.report_error(
                        first_span,
                        TTCN0401,
                        format!("Duplicate exception type `{name}' was first given here"),
                    );
                    self.diagnostics.report_error_with_related(
                        span,
                        TTCN0401,
                        format!("Duplicate exception type `{name}' was given here again"),
                        RelatedInfo::new("first given here").with_span(first_span),
                    );
                }
                None => exceptions.insert_name(name, position),
            }
        }
    }

    /// Whether `signature` declares `ty` as an exception. Erroneous types
    /// are always declared.
    pub fn has_exception(
        &mut self,
        signature: TypeId,
        ty: TypeId,
        timestamp: CompilationTimestamp,
    ) -> bool {
        self.check(signature, timestamp);
        self.check(ty, timestamp);
        let last = self.type_refd_last(ty, timestamp);
        if self.is_erroneous(ty) || self.is_erroneous(last) {
            return true;
        }
        let name = self.type_name(last);
        match &self.arena[signature].kind {
            TypeKind::Signature(s) => s.exceptions.contains_name(&name),
            _ => false,
        }
    }

    /// How many declared exceptions of `signature` a raised value of type
    /// `raised` is compatible with; 1 for an erroneous type
    pub fn count_compatible(
        &mut self,
        signature: TypeId,
        raised: TypeId,
        timestamp: CompilationTimestamp,
    ) -> usize {
        self.check(signature, timestamp);
        self.check(raised, timestamp);
        let last = self.type_refd_last(raised, timestamp);
        if self.is_erroneous(raised) || self.is_erroneous(last) {
            return 1;
        }
        let declared: Vec<TypeId> = match &self.arena[signature].kind {
            TypeKind::Signature(s) => s.exceptions.entries().iter().map(|e| e.ty).collect(),
            _ => return 0,
        };
        declared
            .into_iter()
            .filter(|&exception| self.is_compatible(exception, raised, timestamp))
            .count()
    }

    pub(crate) fn check_testcase(&mut self, ty: TypeId, timestamp: CompilationTimestamp) {
        let TypeKind::Testcase(testcase) = &self.arena[ty].kind else {
            return;
        };
        let parameters: Vec<TypeId> = testcase.parameters.iter().map(|p| p.ty).collect();
        let clauses = [(testcase.runs_on, "runs on"), (testcase.system, "system")];
        for parameter in parameters {
            self.check(parameter, timestamp);
        }
        for (component, clause) in clauses {
            if let Some(component) = component {
                self.check_component_clause(component, clause, timestamp);
            }
        }
    }

    fn check_component_clause(
        &mut self,
        ty: TypeId,
        clause: &str,
        timestamp: CompilationTimestamp,
    ) {
        self.check(ty, timestamp);
        let last = self.type_refd_last(ty, timestamp);
        if self.is_erroneous(ty) || self.is_erroneous(last) {
            return;
        }
        if self.shape(last) != Shape::Component {
            let span = self.arena[ty].span;
            self.diagnostics.report_error(
                span,
                TTCN0106,
                format!("reference to a component type was expected in the `{clause}' clause"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::ModuleScope;
    use crate::{SignatureType, TestcaseType, TypeNode, TypeReference};
    use pretty_assertions::assert_eq;
    use ttcn3_diagnostics::Span;

    fn t() -> CompilationTimestamp {
        CompilationTimestamp::new(1)
    }

    fn signature(checker: &mut TypeChecker, exceptions: ExceptionSet) -> TypeId {
        checker.add_type(TypeNode::new(
            "Sig",
            TypeKind::Signature(SignatureType {
                exceptions,
                ..SignatureType::default()
            }),
        ))
    }

    #[test]
    fn test_duplicate_exceptions_are_reported_as_a_pair() {
        let mut checker = TypeChecker::new();
        let m = checker.add_scope(ModuleScope::new("M"));
        let code = checker.define_type(m, TypeNode::new("Code", TypeKind::Integer));
        let alias = checker.define_type(
            m,
            TypeNode::new("CodeAlias", TypeKind::Referenced(TypeReference::new("Code"))),
        );
        let mut exceptions = ExceptionSet::new();
        exceptions.add(code, Span::new(10, 14));
        exceptions.add(alias, Span::new(16, 25));
        let sig = signature(&mut checker, exceptions);

        checker.check(sig, t());
        assert_eq!(
            checker.diagnostics().messages(),
            vec![
                "Duplicate exception type `Code' was first given here",
                "Duplicate exception type `Code' was given here again",
            ]
        );
        let TypeKind::Signature(s) = &checker.node(sig).kind else {
            panic!("signature expected");
        };
        assert_eq!(
            checker.diagnostics().diagnostics()[1].related[0].span,
            Some(Span::new(10, 14))
        );
        assert_eq!(s.exceptions.len(), 2);
        assert_eq!(s.exceptions.names().collect::<Vec<_>>(), vec!["Code"]);
    }

    #[test]
    fn test_default_cannot_be_an_exception() {
        let mut checker = TypeChecker::new();
        let default = checker.add_type(TypeNode::anonymous(TypeKind::Default));
        let sig = signature(&mut checker, ExceptionSet::new().with(default));
        checker.check(sig, t());
        assert_eq!(
            checker.diagnostics().messages(),
            vec!["default type `default' cannot be on the exception list of a signature"]
        );
    }

    #[test]
    fn test_has_exception_and_count_compatible() {
        let mut checker = TypeChecker::new();
        let int = checker.add_type(TypeNode::new("Int", TypeKind::Integer));
        let text = checker.add_type(TypeNode::new("Text", TypeKind::CharString));
        let other_int = checker.add_type(TypeNode::new("OtherInt", TypeKind::Integer));
        let sig = signature(&mut checker, ExceptionSet::new().with(int).with(text));

        assert!(checker.has_exception(sig, int, t()));
        assert!(!checker.has_exception(sig, other_int, t()));
        assert_eq!(checker.count_compatible(sig, other_int, t()), 1);
        assert_eq!(checker.count_compatible(sig, text, t()), 1);

        let float = checker.add_type(TypeNode::anonymous(TypeKind::Float));
        assert_eq!(checker.count_compatible(sig, float, t()), 0);
    }

    #[test]
    fn test_erroneous_raised_type_fails_open() {
        let mut checker = TypeChecker::new();
        let m = checker.add_scope(ModuleScope::new("M"));
        let int = checker.add_type(TypeNode::new("Int", TypeKind::Integer));
        let broken = checker.define_type(
            m,
            TypeNode::new("Broken", TypeKind::Referenced(TypeReference::new("Missing"))),
        );
        let sig = signature(&mut checker, ExceptionSet::new().with(int));
        assert!(checker.has_exception(sig, broken, t()));
        assert_eq!(checker.count_compatible(sig, broken, t()), 1);
    }

    #[test]
    fn test_runs_on_must_name_a_component() {
        let mut checker = TypeChecker::new();
        let component = checker.add_type(TypeNode::new("Ptc", TypeKind::Component));
        let int = checker.add_type(TypeNode::new("Int", TypeKind::Integer));
        let testcase = checker.add_type(TypeNode::new(
            "tc",
            TypeKind::Testcase(TestcaseType {
                parameters: Vec::new(),
                runs_on: Some(component),
                system: Some(int),
            }),
        ));
        checker.check(testcase, t());
        assert_eq!(
            checker.diagnostics().messages(),
            vec!["reference to a component type was expected in the `system' clause"]
        );
    }
}
