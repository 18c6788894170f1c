//! TTCN-3 type nodes
//!
//! A type node is a closed sum over the type kinds the checker knows, plus
//! the per-node checking state (erroneous flag, last-checked timestamp,
//! registered usages). Nodes live in a [`TypeArena`]
//! and refer to each other by [`TypeId`] only.
//!
//! [`TypeArena`]: crate::TypeArena

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use ttcn3_ast::{CompilationTimestamp, Identifier, ScopeId, TypeId};
use ttcn3_diagnostics::Span;

use crate::{Coding, ExceptionSet, FieldMap, SubtypeRestriction};

/// A node of the type graph
#[derive(Debug, Clone)]
pub struct TypeNode {
    /// Display name; empty for anonymous types
    pub name: String,
    pub kind: TypeKind,
    pub span: Span,
    /// Module scope the node was declared in
    pub scope: Option<ScopeId>,
    /// The type this node is a field of
    pub parent: Option<TypeId>,
    pub subtype: Option<SubtypeRestriction>,
    /// Declared encodings, validated through the coding oracle in every pass
    pub codings: SmallVec<[Coding; 2]>,
    pub(crate) erroneous: bool,
    pub(crate) last_checked: Option<CompilationTimestamp>,
    pub(crate) usages: IndexSet<Span>,
}

impl TypeNode {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            span: Span::default(),
            scope: None,
            parent: None,
            subtype: None,
            codings: SmallVec::new(),
            erroneous: false,
            last_checked: None,
            usages: IndexSet::new(),
        }
    }

    /// An anonymous node of the given kind
    pub fn anonymous(kind: TypeKind) -> Self {
        Self::new("", kind)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn in_scope(mut self, scope: ScopeId) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_subtype(mut self, subtype: SubtypeRestriction) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn with_coding(mut self, coding: Coding) -> Self {
        self.codings.push(coding);
        self
    }

    pub fn is_erroneous(&self) -> bool {
        self.erroneous
    }

    pub fn last_checked(&self) -> Option<CompilationTimestamp> {
        self.last_checked
    }

    /// Source locations of the values and templates governed by this type
    pub fn usages(&self) -> impl Iterator<Item = &Span> {
        self.usages.iter()
    }

    /// The name used in diagnostics: the declared name, or the kind name
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.kind.type_name()
        } else {
            &self.name
        }
    }
}

/// The type kinds
#[derive(Debug, Clone)]
pub enum TypeKind {
    Integer,
    Float,
    BitString,
    CharString,
    /// ASN.1 siblings of the TTCN-3 scalar kinds
    Asn1(Asn1Kind),
    /// Alias of the module's designated address type
    Address,
    Default,
    Component,
    Testcase(TestcaseType),
    Signature(SignatureType),
    /// Record, set, union or open type
    Aggregate(AggregateType),
    /// Named alias resolved through the node's scope
    Referenced(TypeReference),
}

impl TypeKind {
    /// Name of the kind as written in source
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::BitString => "bitstring",
            Self::CharString => "charstring",
            Self::Asn1(kind) => kind.type_name(),
            Self::Address => "address",
            Self::Default => "default",
            Self::Component => "component",
            Self::Testcase(_) => "testcase",
            Self::Signature(_) => "signature",
            Self::Aggregate(aggregate) => aggregate.kind.type_name(),
            Self::Referenced(_) => "referenced type",
        }
    }

    /// Kinds that own no representation and forward to a resolved target
    pub fn is_referencing(&self) -> bool {
        matches!(self, Self::Address | Self::Referenced(_))
    }

    /// The compatibility family of scalar kinds
    pub fn family(&self) -> Option<TypeFamily> {
        match self {
            Self::Integer | Self::Asn1(Asn1Kind::Integer) => Some(TypeFamily::Integer),
            Self::Float => Some(TypeFamily::Float),
            Self::BitString | Self::Asn1(Asn1Kind::BitString) => Some(TypeFamily::BitString),
            Self::CharString | Self::Asn1(_) => Some(TypeFamily::CharString),
            _ => None,
        }
    }

    /// Bit and character strings: indexable, length-restrictable
    pub fn is_string(&self) -> bool {
        matches!(
            self.family(),
            Some(TypeFamily::BitString | TypeFamily::CharString)
        )
    }
}

/// Scalar compatibility families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Integer,
    Float,
    BitString,
    CharString,
}

/// ASN.1 kinds taking part in the TTCN-3 compatibility rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asn1Kind {
    /// Arbitrary-precision `INTEGER`
    Integer,
    /// `BIT STRING` (type A)
    BitString,
    NumericString,
    PrintableString,
    Ia5String,
    VisibleString,
    UtcTime,
    GeneralizedTime,
}

impl Asn1Kind {
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::BitString => "BIT STRING",
            Self::NumericString => "NumericString",
            Self::PrintableString => "PrintableString",
            Self::Ia5String => "IA5String",
            Self::VisibleString => "VisibleString",
            Self::UtcTime => "UTCTime",
            Self::GeneralizedTime => "GeneralizedTime",
        }
    }

    /// Whether `c` belongs to the alphabet of the string kind
    pub fn permits_char(self, c: char) -> bool {
        match self {
            Self::NumericString => c.is_ascii_digit() || c == ' ',
            Self::PrintableString => {
                c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c)
            }
            Self::VisibleString => c.is_ascii_graphic() || c == ' ',
            Self::Ia5String | Self::UtcTime | Self::GeneralizedTime => c.is_ascii(),
            Self::Integer | Self::BitString => true,
        }
    }
}

/// A formal parameter of a testcase or signature
#[derive(Debug, Clone)]
pub struct FormalParameter {
    pub name: Identifier,
    pub ty: TypeId,
}

impl FormalParameter {
    pub fn new(name: impl Into<Identifier>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TestcaseType {
    pub parameters: Vec<FormalParameter>,
    /// `runs on` clause
    pub runs_on: Option<TypeId>,
    /// `system` clause
    pub system: Option<TypeId>,
}

#[derive(Debug, Clone, Default)]
pub struct SignatureType {
    pub parameters: Vec<FormalParameter>,
    pub return_type: Option<TypeId>,
    pub exceptions: ExceptionSet,
}

impl SignatureType {
    pub fn parameter(&self, name: &str) -> Option<&FormalParameter> {
        self.parameters.iter().find(|p| p.name.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct AggregateType {
    pub kind: AggregateKind,
    pub fields: FieldMap,
}

impl AggregateType {
    pub fn new(kind: AggregateKind, fields: FieldMap) -> Self {
        Self { kind, fields }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateKind {
    Record,
    Set,
    Union,
    /// Extensible ASN.1 open type; duplicate alternatives are allowed
    OpenType,
}

impl AggregateKind {
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Set => "set",
            Self::Union => "union",
            Self::OpenType => "open type",
        }
    }

    pub fn is_open(self) -> bool {
        self == Self::OpenType
    }

    /// Exactly one field is present in a value
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Union | Self::OpenType)
    }
}

/// The written reference of a [`TypeKind::Referenced`] node
#[derive(Debug, Clone)]
pub struct TypeReference {
    pub name: Identifier,
}

impl TypeReference {
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self { name: name.into() }
    }
}

/// Character encodings accepted by decode-match templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharCoding {
    Unknown,
    Ascii,
    Utf8,
    Utf16,
    Utf16Be,
    Utf16Le,
    Utf32,
    Utf32Be,
    Utf32Le,
}

impl CharCoding {
    /// Parse an encoding format string such as `"UTF-16BE"`
    pub fn from_name(name: &str) -> Option<Self> {
        let coding = match name {
            "ASCII" => Self::Ascii,
            "UTF-8" => Self::Utf8,
            "UTF-16" => Self::Utf16,
            "UTF-16BE" => Self::Utf16Be,
            "UTF-16LE" => Self::Utf16Le,
            "UTF-32" => Self::Utf32,
            "UTF-32BE" => Self::Utf32Be,
            "UTF-32LE" => Self::Utf32Le,
            _ => return None,
        };
        Some(coding)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "<unknown>",
            Self::Ascii => "ASCII",
            Self::Utf8 => "UTF-8",
            Self::Utf16 => "UTF-16",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf32 => "UTF-32",
            Self::Utf32Be => "UTF-32BE",
            Self::Utf32Le => "UTF-32LE",
        }
    }
}

impl fmt::Display for CharCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TypeKind::Integer, Some(TypeFamily::Integer))]
    #[case(TypeKind::Asn1(Asn1Kind::Integer), Some(TypeFamily::Integer))]
    #[case(TypeKind::Asn1(Asn1Kind::BitString), Some(TypeFamily::BitString))]
    #[case(TypeKind::Asn1(Asn1Kind::UtcTime), Some(TypeFamily::CharString))]
    #[case(TypeKind::Float, Some(TypeFamily::Float))]
    #[case(TypeKind::Default, None)]
    fn test_family(#[case] kind: TypeKind, #[case] family: Option<TypeFamily>) {
        assert_eq!(kind.family(), family);
    }

    #[test]
    fn test_display_name_falls_back_to_kind() {
        assert_eq!(TypeNode::anonymous(TypeKind::CharString).display_name(), "charstring");
        assert_eq!(TypeNode::new("MyInt", TypeKind::Integer).display_name(), "MyInt");
    }

    #[rstest]
    #[case("UTF-8", Some(CharCoding::Utf8))]
    #[case("UTF-16LE", Some(CharCoding::Utf16Le))]
    #[case("utf-8", None)]
    #[case("EBCDIC", None)]
    fn test_char_coding_from_name(#[case] name: &str, #[case] expected: Option<CharCoding>) {
        assert_eq!(CharCoding::from_name(name), expected);
    }

    #[test]
    fn test_numeric_string_alphabet() {
        assert!(Asn1Kind::NumericString.permits_char('7'));
        assert!(Asn1Kind::NumericString.permits_char(' '));
        assert!(!Asn1Kind::NumericString.permits_char('a'));
    }
}
