//! Type compatibility
//!
//! `is_compatible(expected, other)` decides whether a value of type `other`
//! may stand where `expected` is required. The relation is read from the
//! expected side: call sites always pass the statically expected type first.

use log::trace;
use ttcn3_ast::{CompilationTimestamp, TypeId};

use super::TypeChecker;
use crate::TypeKind;

impl TypeChecker {
    /// Whether `other` is compatible with `expected`.
    ///
    /// Both types are checked first. An erroneous type on either side is
    /// compatible with everything, so one bad declaration does not cascade.
    pub fn is_compatible(
        &mut self,
        expected: TypeId,
        other: TypeId,
        timestamp: CompilationTimestamp,
    ) -> bool {
        self.check(expected, timestamp);
        self.check(other, timestamp);
        let other_last = self.type_refd_last(other, timestamp);
        if self.is_erroneous(expected)
            || self.is_erroneous(other)
            || self.is_erroneous(other_last)
        {
            trace!("{expected} / {other}: erroneous side, compatible");
            return true;
        }

        let expected_last = match self.arena[expected].kind {
            TypeKind::Referenced(_) => {
                let last = self.type_refd_last(expected, timestamp);
                if self.is_erroneous(last) {
                    return true;
                }
                last
            }
            _ => expected,
        };

        let other_kind = &self.arena[other_last].kind;
        match &self.arena[expected_last].kind {
            TypeKind::Integer
            | TypeKind::Float
            | TypeKind::BitString
            | TypeKind::CharString
            | TypeKind::Asn1(_) => {
                let family = self.arena[expected_last].kind.family();
                family.is_some() && family == other_kind.family()
            }
            TypeKind::Default => matches!(other_kind, TypeKind::Default),
            TypeKind::Address => false,
            TypeKind::Testcase(_)
            | TypeKind::Component
            | TypeKind::Signature(_)
            | TypeKind::Aggregate(_) => expected_last == other_last,
            // only reachable for a failed resolution, which is erroneous
            TypeKind::Referenced(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::ModuleScope;
    use crate::{Asn1Kind, TypeNode, TypeReference};
    use rstest::rstest;

    fn pair(expected: TypeKind, other: TypeKind) -> bool {
        let mut checker = TypeChecker::new();
        let a = checker.add_type(TypeNode::anonymous(expected));
        let b = checker.add_type(TypeNode::anonymous(other));
        checker.is_compatible(a, b, CompilationTimestamp::new(1))
    }

    #[rstest]
    #[case(TypeKind::Integer, TypeKind::Integer, true)]
    #[case(TypeKind::Integer, TypeKind::Asn1(Asn1Kind::Integer), true)]
    #[case(TypeKind::Integer, TypeKind::Float, false)]
    #[case(TypeKind::Float, TypeKind::Float, true)]
    #[case(TypeKind::Float, TypeKind::Integer, false)]
    #[case(TypeKind::BitString, TypeKind::Asn1(Asn1Kind::BitString), true)]
    #[case(TypeKind::BitString, TypeKind::CharString, false)]
    #[case(TypeKind::CharString, TypeKind::Asn1(Asn1Kind::GeneralizedTime), true)]
    #[case(TypeKind::Asn1(Asn1Kind::Ia5String), TypeKind::CharString, true)]
    #[case(TypeKind::Default, TypeKind::Default, true)]
    #[case(TypeKind::Default, TypeKind::Integer, false)]
    #[case(TypeKind::Component, TypeKind::Component, false)]
    fn test_families(
        #[case] expected: TypeKind,
        #[case] other: TypeKind,
        #[case] compatible: bool,
    ) {
        assert_eq!(pair(expected, other), compatible);
    }

    #[test]
    fn test_alias_on_both_sides() {
        let mut checker = TypeChecker::new();
        let m = checker.add_scope(ModuleScope::new("M"));
        let int = checker.define_type(m, TypeNode::new("Int", TypeKind::Integer));
        let alias = checker.define_type(
            m,
            TypeNode::new("Count", TypeKind::Referenced(TypeReference::new("Int"))),
        );
        let t = CompilationTimestamp::new(1);
        assert!(checker.is_compatible(alias, int, t));
        assert!(checker.is_compatible(int, alias, t));
    }

    #[test]
    fn test_address_is_never_compatible() {
        let mut checker = TypeChecker::new();
        let m = checker.add_scope(ModuleScope::new("M"));
        let int = checker.define_type(m, TypeNode::new("Int", TypeKind::Integer));
        checker.scope_mut(m).set_address_type(int);
        let address = checker.define_type(m, TypeNode::new("address", TypeKind::Address));
        let t = CompilationTimestamp::new(1);
        assert!(!checker.is_compatible(address, int, t));
        assert!(!checker.is_compatible(address, address, t));
        assert!(checker.is_compatible(int, address, t));
    }
}
