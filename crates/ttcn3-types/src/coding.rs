//! Encoding attributes and the "can this type use coding X" oracle

use serde::{Deserialize, Serialize};
use std::fmt;
use ttcn3_ast::TypeId;

use crate::{TypeArena, TypeKind};

/// An `encode` attribute declared on a type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coding {
    Ber,
    Per,
    Oer,
    Xer,
    Raw,
    Text,
    Json,
    /// A user-defined encoding handled by external functions
    Custom(String),
}

impl Coding {
    pub fn from_name(name: &str) -> Self {
        match name {
            "BER" => Self::Ber,
            "PER" => Self::Per,
            "OER" => Self::Oer,
            "XER" => Self::Xer,
            "RAW" => Self::Raw,
            "TEXT" => Self::Text,
            "JSON" => Self::Json,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Coding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ber => f.write_str("BER"),
            Self::Per => f.write_str("PER"),
            Self::Oer => f.write_str("OER"),
            Self::Xer => f.write_str("XER"),
            Self::Raw => f.write_str("RAW"),
            Self::Text => f.write_str("TEXT"),
            Self::Json => f.write_str("JSON"),
            Self::Custom(name) => write!(f, "`{name}'"),
        }
    }
}

/// Decides whether a type may carry a given encoding
pub trait CodingOracle: fmt::Debug {
    fn can_encode(&self, arena: &TypeArena, ty: TypeId, coding: &Coding) -> bool;
}

/// Capability tables keyed by type kind
#[derive(Debug, Clone, Copy, Default)]
pub struct KindCodingOracle;

impl CodingOracle for KindCodingOracle {
    fn can_encode(&self, arena: &TypeArena, ty: TypeId, coding: &Coding) -> bool {
        let Some(node) = arena.get(ty) else {
            return false;
        };
        match &node.kind {
            TypeKind::Integer
            | TypeKind::Float
            | TypeKind::BitString
            | TypeKind::CharString
            | TypeKind::Aggregate(_) => !matches!(coding, Coding::Per | Coding::Oer),
            TypeKind::Asn1(_) => !matches!(coding, Coding::Raw | Coding::Text),
            TypeKind::Default | TypeKind::Testcase(_) | TypeKind::Signature(_) => false,
            TypeKind::Component => false,
            // judged at the resolved target
            TypeKind::Address | TypeKind::Referenced(_) => true,
        }
    }
}
