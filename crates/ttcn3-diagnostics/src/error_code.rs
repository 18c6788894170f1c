//! TTCN-3 semantic error codes following a structured numbering system
//!
//! Error code ranges:
//! - TTCN0100-TTCN0199: Structural errors (type identity, aliases, subreferences)
//! - TTCN0200-TTCN0299: Value errors (literal kind, coercion, subtype)
//! - TTCN0300-TTCN0399: Template errors (matching mechanism, boundaries, length)
//! - TTCN0400-TTCN0499: Uniqueness errors (duplicate fields and exceptions)
//! - TTCN0500-TTCN0599: Internal and configuration errors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Structural errors are fatal to the node they are reported on
    pub const fn is_structural_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    pub const fn is_value_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    pub const fn is_template_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Uniqueness errors are always emitted as a first/repeat pair
    pub const fn is_uniqueness_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    pub const fn is_internal_error(&self) -> bool {
        self.0 >= 500 && self.0 < 600
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TTCN{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Structural errors (0100-0199)
    map.insert(100, ErrorInfo::new("Undefined type")
        .with_help("Check that the referenced type is defined in the module"));
    map.insert(101, ErrorInfo::new("Circular type reference"));
    map.insert(102, ErrorInfo::new("Invalid subreference"));
    map.insert(103, ErrorInfo::new("Invalid string element index")
        .with_help("A string element index must be the last subreference"));
    map.insert(104, ErrorInfo::new("Reference to non-existent field"));
    map.insert(105, ErrorInfo::new("Type cannot be indexed"));
    map.insert(106, ErrorInfo::new("Component type expected"));
    map.insert(107, ErrorInfo::new("Subtype restriction not applicable"));
    map.insert(108, ErrorInfo::new("Coding not supported by type"));
    map.insert(109, ErrorInfo::new("Type cannot be embedded"));
    map.insert(110, ErrorInfo::new("Type mismatch"));
    map.insert(111, ErrorInfo::new("Invalid array index"));

    // Value errors (0200-0299)
    map.insert(200, ErrorInfo::new("Value kind mismatch"));
    map.insert(201, ErrorInfo::new("Omit not allowed"));
    map.insert(202, ErrorInfo::new("Undefined value reference"));
    map.insert(203, ErrorInfo::new("Circular value reference"));
    map.insert(204, ErrorInfo::new("Invalid real value structure")
        .with_help("A real value block needs mantissa, base (2 or 10) and exponent"));
    map.insert(205, ErrorInfo::new("Subtype violation"));
    map.insert(206, ErrorInfo::new("Reference to a constant expected"));
    map.insert(207, ErrorInfo::new("Single string element expected"));
    map.insert(208, ErrorInfo::new("Invalid character in string value"));
    map.insert(209, ErrorInfo::new("Missing field in value"));
    map.insert(210, ErrorInfo::new("Duplicate field in value"));
    map.insert(211, ErrorInfo::new("Field out of order"));
    map.insert(212, ErrorInfo::new("Invalid union value"));
    map.insert(213, ErrorInfo::new("Type cannot have values"));
    map.insert(214, ErrorInfo::new("Index overflow"));

    // Template errors (0300-0399)
    map.insert(300, ErrorInfo::new("Template kind not allowed"));
    map.insert(301, ErrorInfo::new("Length restriction not allowed"));
    map.insert(302, ErrorInfo::new("Invalid boundary ordering"));
    map.insert(303, ErrorInfo::new("Invalid infinite boundary"));
    map.insert(304, ErrorInfo::new("Invalid boundary value"));
    map.insert(305, ErrorInfo::new("Invalid length restriction"));
    map.insert(306, ErrorInfo::new("Invalid bitstring pattern"));
    map.insert(307, ErrorInfo::new("Invalid encoding format"));
    map.insert(308, ErrorInfo::new("Type cannot be decoded"));
    map.insert(309, ErrorInfo::new("Pattern not validated"));

    // Uniqueness errors (0400-0499)
    map.insert(400, ErrorInfo::new("Duplicate field name"));
    map.insert(401, ErrorInfo::new("Duplicate exception type"));

    // Internal errors (0500-0599)
    map.insert(500, ErrorInfo::new("Internal error"));
    map.insert(501, ErrorInfo::new("Configuration error"));

    map
});

// Structural errors
pub const TTCN0100: ErrorCode = ErrorCode::new(100);
pub const TTCN0101: ErrorCode = ErrorCode::new(101);
pub const TTCN0102: ErrorCode = ErrorCode::new(102);
pub const TTCN0103: ErrorCode = ErrorCode::new(103);
pub const TTCN0104: ErrorCode = ErrorCode::new(104);
pub const TTCN0105: ErrorCode = ErrorCode::new(105);
pub const TTCN0106: ErrorCode = ErrorCode::new(106);
pub const TTCN0107: ErrorCode = ErrorCode::new(107);
pub const TTCN0108: ErrorCode = ErrorCode::new(108);
pub const TTCN0109: ErrorCode = ErrorCode::new(109);
pub const TTCN0110: ErrorCode = ErrorCode::new(110);
pub const TTCN0111: ErrorCode = ErrorCode::new(111);

// Value errors
pub const TTCN0200: ErrorCode = ErrorCode::new(200);
pub const TTCN0201: ErrorCode = ErrorCode::new(201);
pub const TTCN0202: ErrorCode = ErrorCode::new(202);
pub const TTCN0203: ErrorCode = ErrorCode::new(203);
pub const TTCN0204: ErrorCode = ErrorCode::new(204);
pub const TTCN0205: ErrorCode = ErrorCode::new(205);
pub const TTCN0206: ErrorCode = ErrorCode::new(206);
pub const TTCN0207: ErrorCode = ErrorCode::new(207);
pub const TTCN0208: ErrorCode = ErrorCode::new(208);
pub const TTCN0209: ErrorCode = ErrorCode::new(209);
pub const TTCN0210: ErrorCode = ErrorCode::new(210);
pub const TTCN0211: ErrorCode = ErrorCode::new(211);
pub const TTCN0212: ErrorCode = ErrorCode::new(212);
pub const TTCN0213: ErrorCode = ErrorCode::new(213);
pub const TTCN0214: ErrorCode = ErrorCode::new(214);

// Template errors
pub const TTCN0300: ErrorCode = ErrorCode::new(300);
pub const TTCN0301: ErrorCode = ErrorCode::new(301);
pub const TTCN0302: ErrorCode = ErrorCode::new(302);
pub const TTCN0303: ErrorCode = ErrorCode::new(303);
pub const TTCN0304: ErrorCode = ErrorCode::new(304);
pub const TTCN0305: ErrorCode = ErrorCode::new(305);
pub const TTCN0306: ErrorCode = ErrorCode::new(306);
pub const TTCN0307: ErrorCode = ErrorCode::new(307);
pub const TTCN0308: ErrorCode = ErrorCode::new(308);
pub const TTCN0309: ErrorCode = ErrorCode::new(309);

// Uniqueness errors
pub const TTCN0400: ErrorCode = ErrorCode::new(400);
pub const TTCN0401: ErrorCode = ErrorCode::new(401);

// Internal errors
pub const TTCN0500: ErrorCode = ErrorCode::new(500);
pub const TTCN0501: ErrorCode = ErrorCode::new(501);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(TTCN0100.to_string(), "TTCN0100");
        assert_eq!(TTCN0302.to_string(), "TTCN0302");
    }

    #[test]
    fn test_error_categories() {
        assert!(TTCN0101.is_structural_error());
        assert!(!TTCN0101.is_value_error());

        assert!(TTCN0200.is_value_error());
        assert!(TTCN0300.is_template_error());
        assert!(TTCN0400.is_uniqueness_error());
        assert!(TTCN0500.is_internal_error());
    }

    #[test]
    fn test_error_info() {
        assert_eq!(TTCN0400.info().description, "Duplicate field name");
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
        assert!(TTCN0204.info().help.is_some());
    }
}
