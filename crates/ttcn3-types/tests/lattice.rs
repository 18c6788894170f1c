//! Type graph tests: memoization, alias cycles and the compatibility lattice
//!
//! - Idempotence of `check` within a pass
//! - Re-checking in a later pass
//! - Termination and reporting on alias cycles of any length
//! - Symmetry of the charstring family
//! - Fail-open behaviour of erroneous types

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use ttcn3_ast::CompilationTimestamp;
use ttcn3_types::*;

fn alias(name: &str, target: &str) -> TypeNode {
    TypeNode::new(name, TypeKind::Referenced(TypeReference::new(target)))
}

// === Memoization ===

#[test]
fn test_check_is_idempotent_within_a_pass() {
    let mut checker = TypeChecker::new();
    let m = checker.add_scope(ModuleScope::new("M"));
    let a = checker.define_type(m, alias("A", "B"));
    checker.define_type(m, alias("B", "A"));
    let c = checker.define_type(m, alias("C", "Missing"));

    let t = CompilationTimestamp::new(1);
    checker.check(a, t);
    checker.check(c, t);
    let first = checker.diagnostics().len();

    checker.check(a, t);
    checker.check(c, t);
    assert_eq!(checker.diagnostics().len(), first);
    assert_eq!(first, 2);
}

#[test]
fn test_later_pass_checks_again() {
    let mut checker = TypeChecker::new();
    let m = checker.add_scope(ModuleScope::new("M"));
    let int = checker.define_type(m, TypeNode::new("Int", TypeKind::Integer));
    let count = checker.define_type(m, alias("Count", "Int"));

    let first = CompilationTimestamp::new(1);
    checker.check(count, first);
    assert_eq!(checker.node(count).last_checked(), Some(first));

    // an older timestamp is still covered by the newer check
    checker.check(count, CompilationTimestamp::new(0));
    assert_eq!(checker.node(count).last_checked(), Some(first));

    let second = first.next();
    checker.check(count, second);
    assert_eq!(checker.node(count).last_checked(), Some(second));
    assert_eq!(checker.node(int).last_checked(), Some(second));
    assert!(checker.diagnostics().is_empty());
}

#[test]
fn test_fixed_declaration_is_not_erroneous_in_next_pass() {
    let mut checker = TypeChecker::new();
    let m = checker.add_scope(ModuleScope::new("M"));
    let count = checker.define_type(m, alias("Count", "Int"));

    let first = CompilationTimestamp::new(1);
    checker.check(count, first);
    assert!(checker.is_erroneous(count));
    checker.take_diagnostics();

    checker.define_type(m, TypeNode::new("Int", TypeKind::Integer));
    checker.check(count, first.next());
    assert!(!checker.is_erroneous(count));
    assert!(checker.diagnostics().is_empty());
}

// === Cycles ===

#[test]
fn test_long_alias_cycle_terminates() {
    const LEN: usize = 200;
    let mut checker = TypeChecker::new();
    let m = checker.add_scope(ModuleScope::new("M"));
    let ids: Vec<_> = (0..LEN)
        .map(|i| checker.define_type(m, alias(&format!("T{i}"), &format!("T{}", (i + 1) % LEN))))
        .collect();

    let t = CompilationTimestamp::new(1);
    let last = checker.type_refd_last(ids[0], t);
    assert_eq!(last, ids[0]);
    assert!(ids.iter().all(|&id| checker.is_erroneous(id)));
    assert_eq!(checker.diagnostics().len(), 1);
    assert!(checker
        .diagnostics()
        .contains_message("circular type reference: T0 -> T1 -> T2"));
}

#[test]
fn test_long_alias_chain_resolves() {
    let mut checker = TypeChecker::new();
    let m = checker.add_scope(ModuleScope::new("M"));
    let int = checker.define_type(m, TypeNode::new("T500", TypeKind::Integer));
    let ids: Vec<_> = (0..500)
        .map(|i| checker.define_type(m, alias(&format!("T{i}"), &format!("T{}", i + 1))))
        .collect();

    let t = CompilationTimestamp::new(1);
    assert_eq!(checker.type_refd_last(ids[0], t), int);
    assert!(checker.is_compatible(ids[0], int, t));
    assert!(checker.diagnostics().is_empty());
}

#[test]
fn test_chain_entering_a_cycle_is_erroneous() {
    let mut checker = TypeChecker::new();
    let m = checker.add_scope(ModuleScope::new("M"));
    let entry = checker.define_type(m, alias("Entry", "A"));
    checker.define_type(m, alias("A", "B"));
    checker.define_type(m, alias("B", "A"));

    checker.check(entry, CompilationTimestamp::new(1));
    assert!(checker.is_erroneous(entry));
    assert_eq!(
        checker.diagnostics().messages(),
        vec!["circular type reference: A -> B -> A"]
    );
}

// === Compatibility ===

const CHAR_FAMILY: [TypeKind; 7] = [
    TypeKind::CharString,
    TypeKind::Asn1(Asn1Kind::NumericString),
    TypeKind::Asn1(Asn1Kind::PrintableString),
    TypeKind::Asn1(Asn1Kind::Ia5String),
    TypeKind::Asn1(Asn1Kind::VisibleString),
    TypeKind::Asn1(Asn1Kind::UtcTime),
    TypeKind::Asn1(Asn1Kind::GeneralizedTime),
];

fn scalar_kind(index: usize) -> TypeKind {
    match index % 8 {
        0 => TypeKind::Integer,
        1 => TypeKind::Float,
        2 => TypeKind::BitString,
        3 => TypeKind::CharString,
        4 => TypeKind::Asn1(Asn1Kind::Integer),
        5 => TypeKind::Asn1(Asn1Kind::Ia5String),
        6 => TypeKind::Default,
        _ => TypeKind::Component,
    }
}

proptest! {
    #[test]
    fn charstring_family_is_symmetric(a in 0..CHAR_FAMILY.len(), b in 0..CHAR_FAMILY.len()) {
        let mut checker = TypeChecker::new();
        let x = checker.add_type(TypeNode::anonymous(CHAR_FAMILY[a].clone()));
        let y = checker.add_type(TypeNode::anonymous(CHAR_FAMILY[b].clone()));
        let t = CompilationTimestamp::new(1);
        prop_assert!(checker.is_compatible(x, y, t));
        prop_assert!(checker.is_compatible(y, x, t));
    }

    #[test]
    fn erroneous_types_are_compatible_with_everything(kind in 0usize..8) {
        let mut checker = TypeChecker::new();
        let m = checker.add_scope(ModuleScope::new("M"));
        let broken = checker.define_type(m, alias("Broken", "Missing"));
        let other = checker.add_type(TypeNode::anonymous(scalar_kind(kind)));
        let t = CompilationTimestamp::new(1);
        prop_assert!(checker.is_compatible(broken, other, t));
        prop_assert!(checker.is_compatible(other, broken, t));
    }

    #[test]
    fn compatibility_of_scalars_follows_family(a in 0usize..6, b in 0usize..6) {
        let mut checker = TypeChecker::new();
        let (ka, kb) = (scalar_kind(a), scalar_kind(b));
        let same = ka.family() == kb.family();
        let x = checker.add_type(TypeNode::anonymous(ka));
        let y = checker.add_type(TypeNode::anonymous(kb));
        prop_assert_eq!(checker.is_compatible(x, y, CompilationTimestamp::new(1)), same);
    }
}

#[test]
fn test_aggregates_need_identity() {
    let mut checker = TypeChecker::new();
    let int = checker.add_type(TypeNode::anonymous(TypeKind::Integer));
    let record = |name: &str| {
        TypeNode::new(
            name,
            TypeKind::Aggregate(AggregateType::new(
                AggregateKind::Record,
                FieldMap::from_fields([Field::new("n", int)]),
            )),
        )
    };
    let a = checker.add_type(record("A"));
    let b = checker.add_type(record("B"));
    let t = CompilationTimestamp::new(1);
    assert!(checker.is_compatible(a, a, t));
    assert!(!checker.is_compatible(a, b, t));
}

// === Field maps ===

#[test]
fn test_duplicate_fields_report_one_pair() {
    let mut checker = TypeChecker::new();
    let int = checker.add_type(TypeNode::anonymous(TypeKind::Integer));
    let fields = FieldMap::from_fields([
        Field::new(ttcn3_ast::Identifier::at("x", ttcn3_diagnostics::Span::new(10, 11)), int),
        Field::new(ttcn3_ast::Identifier::at("y", ttcn3_diagnostics::Span::new(20, 21)), int),
        Field::new(ttcn3_ast::Identifier::at("x", ttcn3_diagnostics::Span::new(30, 31)), int),
    ]);
    let record = checker.add_type(TypeNode::new(
        "R",
        TypeKind::Aggregate(AggregateType::new(AggregateKind::Record, fields)),
    ));

    checker.check(record, CompilationTimestamp::new(1));
    assert_eq!(
        checker.diagnostics().messages(),
        vec![
            "Duplicate field name `x' was first declared here",
            "Duplicate field name `x' was declared here again",
        ]
    );
    let TypeKind::Aggregate(aggregate) = &checker.node(record).kind else {
        panic!("aggregate expected");
    };
    assert_eq!(aggregate.fields.len(), 3);
    assert_eq!(aggregate.fields.index().map(|index| index.len()), Some(2));
}

#[test]
fn test_open_type_duplicates_are_silent() {
    let mut checker = TypeChecker::new();
    let int = checker.add_type(TypeNode::anonymous(TypeKind::Integer));
    let open = checker.add_type(TypeNode::new(
        "Open",
        TypeKind::Aggregate(AggregateType::new(
            AggregateKind::OpenType,
            FieldMap::from_fields([Field::new("x", int), Field::new("x", int)]),
        )),
    ));
    checker.check(open, CompilationTimestamp::new(1));
    assert!(checker.diagnostics().is_empty());
}

#[test]
fn test_signature_cannot_be_a_field_type() {
    let mut checker = TypeChecker::new();
    let sig = checker.add_type(TypeNode::new("Sig", TypeKind::Signature(SignatureType::default())));
    let record = checker.add_type(TypeNode::new(
        "R",
        TypeKind::Aggregate(AggregateType::new(
            AggregateKind::Record,
            FieldMap::from_fields([Field::new("s", sig)]),
        )),
    ));
    checker.check(record, CompilationTimestamp::new(1));
    assert_eq!(
        checker.diagnostics().messages(),
        vec!["signature type `Sig' cannot be the type of field `s'"]
    );
}

// === Attributes and subtypes ===

#[test]
fn test_codings_are_validated_once_per_pass() {
    let mut checker = TypeChecker::new();
    let int = checker.add_type(TypeNode::new("Int", TypeKind::Integer).with_coding(Coding::Per));
    let first = CompilationTimestamp::new(1);
    checker.check(int, first);
    checker.check(int, first);
    let pass1 = checker.take_diagnostics();
    assert_eq!(pass1.messages(), vec!["type `Int' cannot be encoded with PER"]);

    checker.check(int, first.next());
    assert_eq!(
        checker.diagnostics().messages(),
        vec!["type `Int' cannot be encoded with PER"]
    );
}

#[test]
fn test_subtype_must_fit_the_resolved_kind() {
    let mut checker = TypeChecker::new();
    let m = checker.add_scope(ModuleScope::new("M"));
    checker.define_type(m, TypeNode::new("Text", TypeKind::CharString));
    let bad = checker.define_type(
        m,
        alias("Small", "Text").with_subtype(SubtypeRestriction::integer_range(Some(0), Some(9))),
    );
    checker.check(bad, CompilationTimestamp::new(1));
    assert!(checker.is_erroneous(bad));
    assert_eq!(
        checker.diagnostics().messages(),
        vec!["subtype restriction (0 .. 9) cannot be applied to type `Text'"]
    );
}
