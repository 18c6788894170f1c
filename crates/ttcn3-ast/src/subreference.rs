//! Subreferences: the `.field`, `[index]` and `name(args)` steps of a reference path

use serde::{Deserialize, Serialize};
use std::fmt;
use ttcn3_diagnostics::Span;

use crate::{Identifier, Value, ValueKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Subreference {
    /// `.name`
    Field(Identifier),
    /// `[index]`
    ArrayIndex { index: Box<Value>, span: Span },
    /// `name(arguments)`
    Parameterized {
        name: Identifier,
        arguments: Vec<Value>,
    },
}

impl Subreference {
    pub fn field(name: impl Into<Identifier>) -> Self {
        Self::Field(name.into())
    }

    pub fn index(index: Value) -> Self {
        let span = index.span;
        Self::ArrayIndex {
            index: Box::new(index),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Field(id) => id.span,
            Self::ArrayIndex { span, .. } => *span,
            Self::Parameterized { name, .. } => name.span,
        }
    }

    /// The identifier of a field or parameterized step
    pub fn identifier(&self) -> Option<&Identifier> {
        match self {
            Self::Field(id) | Self::Parameterized { name: id, .. } => Some(id),
            Self::ArrayIndex { .. } => None,
        }
    }
}

impl fmt::Display for Subreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(id) => write!(f, ".{}", id),
            Self::ArrayIndex { index, .. } => match &index.kind {
                ValueKind::Integer(i) => write!(f, "[{}]", i),
                ValueKind::Reference(r) => write!(f, "[{}]", r),
                _ => write!(f, "[...]"),
            },
            Self::Parameterized { name, arguments } => {
                write!(f, ".{}(", name)?;
                for (i, _) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "...")?;
                }
                write!(f, ")")
            }
        }
    }
}
