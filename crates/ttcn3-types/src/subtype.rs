//! Subtype restrictions
//!
//! Value ranges, length limits and permitted alphabets attached to a type
//! declaration, e.g. `type integer Small (0 .. 9)` or
//! `type charstring Code length(3)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use ttcn3_ast::ValueKind;
use ttcn3_diagnostics::Span;

use crate::TypeFamily;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubtypeConstraint {
    /// `(min .. max)`; `None` is infinity
    IntegerRange { min: Option<i64>, max: Option<i64> },
    FloatRange { min: f64, max: f64 },
    /// `length(min .. max)`; `max == None` is infinity
    Length { min: usize, max: Option<usize> },
    /// `("a" .. "z")`
    Alphabet { from: char, to: char },
}

impl SubtypeConstraint {
    /// Whether the constraint can restrict a type of this family
    pub fn applies_to(&self, family: Option<TypeFamily>) -> bool {
        match self {
            Self::IntegerRange { .. } => family == Some(TypeFamily::Integer),
            Self::FloatRange { .. } => family == Some(TypeFamily::Float),
            Self::Length { .. } => matches!(
                family,
                Some(TypeFamily::BitString | TypeFamily::CharString)
            ),
            Self::Alphabet { .. } => family == Some(TypeFamily::CharString),
        }
    }

    /// `None` when the constraint says nothing about this kind of literal
    fn permits(&self, value: &ValueKind) -> Option<bool> {
        match (self, value) {
            (Self::IntegerRange { min, max }, ValueKind::Integer(v)) => Some(
                min.is_none_or(|min| *v >= min) && max.is_none_or(|max| *v <= max),
            ),
            (Self::FloatRange { min, max }, ValueKind::Real(v)) => Some(*v >= *min && *v <= *max),
            (Self::Length { min, max }, ValueKind::Charstring(s)) => {
                Some(within_length(s.chars().count(), *min, *max))
            }
            (Self::Length { min, max }, ValueKind::Bitstring(s)) => {
                Some(within_length(s.len(), *min, *max))
            }
            (Self::Alphabet { from, to }, ValueKind::Charstring(s)) => {
                Some(s.chars().all(|c| (*from..=*to).contains(&c)))
            }
            _ => None,
        }
    }
}

fn within_length(len: usize, min: usize, max: Option<usize>) -> bool {
    len >= min && max.is_none_or(|max| len <= max)
}

impl fmt::Display for SubtypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntegerRange { min, max } => {
                let min = min.map_or("-infinity".to_string(), |v| v.to_string());
                let max = max.map_or("infinity".to_string(), |v| v.to_string());
                write!(f, "({min} .. {max})")
            }
            Self::FloatRange { min, max } => write!(f, "({min:?} .. {max:?})"),
            Self::Length { min, max: Some(max) } if min == max => write!(f, "length({min})"),
            Self::Length { min, max } => match max {
                Some(max) => write!(f, "length({min} .. {max})"),
                None => write!(f, "length({min} .. infinity)"),
            },
            Self::Alphabet { from, to } => write!(f, "(\"{from}\" .. \"{to}\")"),
        }
    }
}

/// A literal outside the restriction
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{value} is not a valid value for subtype {constraint}")]
pub struct SubtypeViolation {
    pub value: String,
    pub constraint: SubtypeConstraint,
}

/// The constraints attached to one type declaration; all must hold
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubtypeRestriction {
    constraints: Vec<SubtypeConstraint>,
    pub span: Span,
}

impl SubtypeRestriction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, constraint: SubtypeConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn integer_range(min: Option<i64>, max: Option<i64>) -> Self {
        Self::new().with(SubtypeConstraint::IntegerRange { min, max })
    }

    pub fn length(min: usize, max: Option<usize>) -> Self {
        Self::new().with(SubtypeConstraint::Length { min, max })
    }

    pub fn constraints(&self) -> &[SubtypeConstraint] {
        &self.constraints
    }

    /// Check a coerced literal against every constraint that talks about it
    pub fn check_value(&self, value: &ValueKind) -> Result<(), SubtypeViolation> {
        match self
            .constraints
            .iter()
            .find(|c| c.permits(value) == Some(false))
        {
            Some(constraint) => Err(SubtypeViolation {
                value: literal_text(value),
                constraint: constraint.clone(),
            }),
            None => Ok(()),
        }
    }

    /// The `(min, max)` length limit, if the restriction has one
    pub fn length_restriction(&self) -> Option<(usize, Option<usize>)> {
        self.constraints.iter().find_map(|c| match c {
            SubtypeConstraint::Length { min, max } => Some((*min, *max)),
            _ => None,
        })
    }
}

/// Source-like rendering of a literal for diagnostics
pub(crate) fn literal_text(value: &ValueKind) -> String {
    match value {
        ValueKind::Integer(v) => v.to_string(),
        ValueKind::Real(v) if v.is_infinite() && v.is_sign_positive() => "infinity".to_string(),
        ValueKind::Real(v) if v.is_infinite() => "-infinity".to_string(),
        ValueKind::Real(v) if v.is_nan() => "not_a_number".to_string(),
        ValueKind::Real(v) => format!("{v:?}"),
        ValueKind::Charstring(s) => format!("\"{s}\""),
        ValueKind::Bitstring(s) => format!("'{s}'B"),
        other => other.kind_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ValueKind::Integer(0), true)]
    #[case(ValueKind::Integer(9), true)]
    #[case(ValueKind::Integer(10), false)]
    #[case(ValueKind::Integer(-1), false)]
    #[case(ValueKind::Charstring("not an integer".into()), true)]
    fn test_integer_range(#[case] value: ValueKind, #[case] ok: bool) {
        let restriction = SubtypeRestriction::integer_range(Some(0), Some(9));
        assert_eq!(restriction.check_value(&value).is_ok(), ok);
    }

    #[test]
    fn test_violation_message() {
        let restriction = SubtypeRestriction::length(3, Some(3));
        let err = restriction
            .check_value(&ValueKind::Charstring("ab".into()))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"ab\" is not a valid value for subtype length(3)");
        assert_eq!(restriction.length_restriction(), Some((3, Some(3))));
    }

    #[test]
    fn test_applicability() {
        let length = SubtypeConstraint::Length { min: 1, max: None };
        assert!(length.applies_to(Some(TypeFamily::BitString)));
        assert!(!length.applies_to(Some(TypeFamily::Integer)));
        assert!(!length.applies_to(None));
    }
}
