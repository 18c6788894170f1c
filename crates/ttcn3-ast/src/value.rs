//! Value literals and expressions
//!
//! A `Value` is what the parser produced for a literal or expression, plus
//! the bookkeeping the checker writes back into it: the governing type, the
//! erroneous flag and the timestamp of the last check. Literal coercion
//! rewrites `kind` in place (e.g. char symbols become a charstring).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use ttcn3_diagnostics::Span;

use crate::{CompilationTimestamp, Identifier, Subreference, TypeId};

/// A value literal or expression together with its checking state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub kind: ValueKind,
    pub span: Span,
    governor: Option<TypeId>,
    erroneous: bool,
    last_checked: Option<CompilationTimestamp>,
}

impl Value {
    pub fn new(kind: ValueKind, span: Span) -> Self {
        Self {
            kind,
            span,
            governor: None,
            erroneous: false,
            last_checked: None,
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::new(ValueKind::Integer(value), Span::default())
    }

    pub fn real(value: f64) -> Self {
        Self::new(ValueKind::Real(value), Span::default())
    }

    pub fn charstring(value: impl Into<String>) -> Self {
        Self::new(ValueKind::Charstring(value.into()), Span::default())
    }

    pub fn bitstring(value: impl Into<String>) -> Self {
        Self::new(ValueKind::Bitstring(value.into()), Span::default())
    }

    pub fn omit() -> Self {
        Self::new(ValueKind::Omit, Span::default())
    }

    pub fn null() -> Self {
        Self::new(ValueKind::Null, Span::default())
    }

    /// A reference to a named definition, without subreferences
    pub fn reference(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self::new(ValueKind::Reference(Reference::new(name)), Span::default())
    }

    pub fn plus_infinity() -> Self {
        Self::real(f64::INFINITY)
    }

    pub fn minus_infinity() -> Self {
        Self::real(f64::NEG_INFINITY)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn governor(&self) -> Option<TypeId> {
        self.governor
    }

    pub fn set_governor(&mut self, governor: TypeId) {
        self.governor = Some(governor);
    }

    pub fn is_erroneous(&self) -> bool {
        self.erroneous
    }

    pub fn set_erroneous(&mut self, erroneous: bool) {
        self.erroneous = erroneous;
    }

    pub fn last_checked(&self) -> Option<CompilationTimestamp> {
        self.last_checked
    }

    pub fn set_last_checked(&mut self, timestamp: CompilationTimestamp) {
        self.last_checked = Some(timestamp);
    }

    /// Whether the value was already checked in the pass `timestamp`
    pub fn is_checked_at(&self, timestamp: CompilationTimestamp) -> bool {
        CompilationTimestamp::is_current(self.last_checked, timestamp)
    }
}

/// The literal or expression forms a value can take
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueKind {
    Integer(i64),
    /// Real literal; `±infinity` and `not_a_number` are the special sentinels
    Real(f64),
    Bitstring(String),
    Charstring(String),
    /// Character symbol list, e.g. `{ "ab", { 0, 0, 0, 65 } }`
    CharSymbols(Vec<CharSymbol>),
    UniversalCharstring(String),
    /// ASN.1 `{ ... }` block whose meaning depends on the governing type
    UndefinedBlock(Vec<BlockComponent>),
    /// Named field values, e.g. `{ x := 1, y := 2 }`
    Sequence(Vec<NamedValue>),
    Omit,
    Null,
    /// `refers(testcase_name)`
    Refers(Identifier),
    Reference(Reference),
    /// Lower-case identifier the parser could not classify
    UndefinedLowerIdentifier(Identifier),
    /// Operator expressions are validated where they are built
    Expression(Expression),
    Macro(MacroKind),
}

impl ValueKind {
    /// Human-readable description of the literal form
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer value",
            Self::Real(_) => "float value",
            Self::Bitstring(_) => "bitstring value",
            Self::Charstring(_) => "charstring value",
            Self::CharSymbols(_) => "character symbol list",
            Self::UniversalCharstring(_) => "universal charstring value",
            Self::UndefinedBlock(_) => "block",
            Self::Sequence(_) => "record value",
            Self::Omit => "omit value",
            Self::Null => "null value",
            Self::Refers(_) => "testcase reference",
            Self::Reference(_) => "reference",
            Self::UndefinedLowerIdentifier(_) => "identifier",
            Self::Expression(_) => "expression",
            Self::Macro(_) => "macro",
        }
    }

    /// Expressions and macros count as already validated
    pub fn is_pre_validated(&self) -> bool {
        matches!(self, Self::Expression(_) | Self::Macro(_))
    }

    pub fn is_plus_infinity(&self) -> bool {
        matches!(self, Self::Real(r) if *r == f64::INFINITY)
    }

    pub fn is_minus_infinity(&self) -> bool {
        matches!(self, Self::Real(r) if *r == f64::NEG_INFINITY)
    }

    pub fn is_not_a_number(&self) -> bool {
        matches!(self, Self::Real(r) if r.is_nan())
    }
}

/// One element of a character symbol list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharSymbol {
    Text(String),
    Quadruple { group: u8, plane: u8, row: u8, cell: u8 },
}

impl CharSymbol {
    /// The code point a quadruple denotes
    pub fn code_point(&self) -> Option<u32> {
        match self {
            Self::Text(_) => None,
            Self::Quadruple {
                group,
                plane,
                row,
                cell,
            } => Some(
                (u32::from(*group) << 24)
                    | (u32::from(*plane) << 16)
                    | (u32::from(*row) << 8)
                    | u32::from(*cell),
            ),
        }
    }
}

/// One component of an ASN.1 block, optionally named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockComponent {
    pub name: Option<Identifier>,
    pub value: Value,
}

impl BlockComponent {
    pub fn unnamed(value: Value) -> Self {
        Self { name: None, value }
    }

    pub fn named(name: impl Into<Identifier>, value: Value) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }
}

/// A `name := value` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: Identifier,
    pub value: Value,
}

impl NamedValue {
    pub fn new(name: impl Into<Identifier>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A reference to a definition, followed by a subreference path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub name: Identifier,
    pub subreferences: SmallVec<[Subreference; 2]>,
}

impl Reference {
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self {
            name: name.into(),
            subreferences: SmallVec::new(),
        }
    }

    pub fn with_subreference(mut self, subreference: Subreference) -> Self {
        self.subreferences.push(subreference);
        self
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for sub in &self.subreferences {
            write!(f, "{}", sub)?;
        }
        Ok(())
    }
}

/// An operator expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub operator: String,
    pub operands: Vec<Value>,
}

/// Compile-time macros such as `%moduleId`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacroKind {
    ModuleId,
    FileName,
    LineNumber,
    DefinitionId,
    TestcaseId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinity_sentinels() {
        assert!(Value::plus_infinity().kind.is_plus_infinity());
        assert!(Value::minus_infinity().kind.is_minus_infinity());
        assert!(!Value::real(1.0).kind.is_plus_infinity());
        assert!(ValueKind::Real(f64::NAN).is_not_a_number());
    }

    #[test]
    fn test_quadruple_code_point() {
        let a = CharSymbol::Quadruple {
            group: 0,
            plane: 0,
            row: 0,
            cell: 65,
        };
        assert_eq!(a.code_point(), Some(65));
        let euro = CharSymbol::Quadruple {
            group: 0,
            plane: 0,
            row: 0x20,
            cell: 0xAC,
        };
        assert_eq!(euro.code_point(), Some(0x20AC));
    }

    #[test]
    fn test_reference_from_owned_name() {
        let name = format!("c{}", 1);
        let ValueKind::Reference(reference) = Value::reference(name).kind else {
            panic!("reference expected");
        };
        assert_eq!(reference.name.as_str(), "c1");
        assert!(reference.subreferences.is_empty());
    }

    #[test]
    fn test_reference_display() {
        let reference = Reference::new("s")
            .with_subreference(Subreference::field("f"))
            .with_subreference(Subreference::index(Value::integer(0)));
        assert_eq!(reference.to_string(), "s.f[0]");
    }
}
