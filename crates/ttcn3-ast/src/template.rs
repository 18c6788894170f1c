//! Templates: matching mechanisms checked against a governing type

use serde::{Deserialize, Serialize};
use ttcn3_diagnostics::Span;

use crate::{Identifier, TypeId, Value};

/// A template together with its checking state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub kind: TemplateKind,
    pub length_restriction: Option<LengthRestriction>,
    pub if_present: bool,
    pub span: Span,
    governor: Option<TypeId>,
    erroneous: bool,
}

impl Template {
    pub fn new(kind: TemplateKind, span: Span) -> Self {
        Self {
            kind,
            length_restriction: None,
            if_present: false,
            span,
            governor: None,
            erroneous: false,
        }
    }

    pub fn specific(value: Value) -> Self {
        let span = value.span;
        Self::new(TemplateKind::SpecificValue(value), span)
    }

    pub fn any_value() -> Self {
        Self::new(TemplateKind::AnyValue, Span::default())
    }

    pub fn any_or_omit() -> Self {
        Self::new(TemplateKind::AnyOrOmit, Span::default())
    }

    pub fn omit() -> Self {
        Self::new(TemplateKind::Omit, Span::default())
    }

    pub fn value_list(templates: Vec<Template>) -> Self {
        Self::new(TemplateKind::ValueList(templates), Span::default())
    }

    /// `(min .. max)`; a missing boundary stands for infinity
    pub fn range(min: Option<Value>, max: Option<Value>) -> Self {
        Self::new(
            TemplateKind::ValueRange(ValueRange::new(min, max)),
            Span::default(),
        )
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_length(mut self, restriction: LengthRestriction) -> Self {
        self.length_restriction = Some(restriction);
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
}

/// Matching mechanisms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateKind {
    SpecificValue(Value),
    Omit,
    /// `?`
    AnyValue,
    /// `*`
    AnyOrOmit,
    ValueList(Vec<Template>),
    /// `complement(...)`
    ComplementedList(Vec<Template>),
    ValueRange(ValueRange),
    /// `'01?*'B`
    BitPattern(String),
    /// `pattern "..."`
    CharPattern(String),
    UniversalCharPattern(String),
    /// `decmatch [format] target`
    DecodeMatch(DecodeMatch),
    /// `{ field := template, ... }`
    NamedTemplateList(Vec<NamedTemplate>),
}

impl TemplateKind {
    /// Human-readable name used in "cannot be used for type" messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::SpecificValue(_) => "specific value",
            Self::Omit => "omit value",
            Self::AnyValue => "any value",
            Self::AnyOrOmit => "any or omit",
            Self::ValueList(_) => "value list match",
            Self::ComplementedList(_) => "complemented list match",
            Self::ValueRange(_) => "value range match",
            Self::BitPattern(_) => "bitstring pattern",
            Self::CharPattern(_) => "character string pattern",
            Self::UniversalCharPattern(_) => "universal charstring pattern",
            Self::DecodeMatch(_) => "decoded content match",
            Self::NamedTemplateList(_) => "named template list",
        }
    }
}

/// Boundaries of a value range template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: Option<Value>,
    pub max: Option<Value>,
    pub min_exclusive: bool,
    pub max_exclusive: bool,
}

impl ValueRange {
    pub fn new(min: Option<Value>, max: Option<Value>) -> Self {
        Self {
            min,
            max,
            min_exclusive: false,
            max_exclusive: false,
        }
    }

    pub fn exclusive_min(mut self) -> Self {
        self.min_exclusive = true;
        self
    }

    pub fn exclusive_max(mut self) -> Self {
        self.max_exclusive = true;
        self
    }
}

/// `length(n)` or `length(lower .. upper)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LengthRestriction {
    Single { length: Value, span: Span },
    /// `upper == None` is `infinity`
    Range {
        lower: Value,
        upper: Option<Value>,
        span: Span,
    },
}

impl LengthRestriction {
    pub fn single(length: Value) -> Self {
        let span = length.span;
        Self::Single { length, span }
    }

    pub fn range(lower: Value, upper: Option<Value>) -> Self {
        let span = lower.span;
        Self::Range { lower, upper, span }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Single { span, .. } | Self::Range { span, .. } => *span,
        }
    }
}

/// `decmatch` template: the matched string must decode into a value of
/// `target_type` matching `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeMatch {
    /// Optional encoding format string, e.g. `"UTF-8"`
    pub encoding: Option<Value>,
    pub target_type: TypeId,
    pub target: Box<Template>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTemplate {
    pub name: Identifier,
    pub template: Template,
}

impl NamedTemplate {
    pub fn new(name: impl Into<Identifier>, template: Template) -> Self {
        Self {
            name: name.into(),
            template,
        }
    }
}
