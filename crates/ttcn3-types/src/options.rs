//! Per-call checking options

use serde::{Deserialize, Serialize};

/// What kind of value a context expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExpectedValue {
    /// Known at compile time; module parameters allowed
    Static,
    /// Anything, including variables
    #[default]
    Dynamic,
    /// Constants only
    Constant,
    /// The value is part of a template
    Template,
}

/// Options of one value check. Built with the `with_*` methods, each of
/// which returns a modified copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueCheckOptions {
    pub expected_value: ExpectedValue,
    /// Fields may be left out (modified templates, partial initializers)
    pub incomplete_allowed: bool,
    pub omit_allowed: bool,
    /// Check the literal against the type's subtype restriction
    pub sub_check: bool,
    /// Missing optional fields are implicitly `omit`
    pub implicit_omit: bool,
    /// The value stands for one element of a string
    pub str_elem: bool,
}

impl ValueCheckOptions {
    pub const fn new(expected_value: ExpectedValue) -> Self {
        Self {
            expected_value,
            incomplete_allowed: false,
            omit_allowed: false,
            sub_check: true,
            implicit_omit: false,
            str_elem: false,
        }
    }

    pub const fn with_expected_value(mut self, expected_value: ExpectedValue) -> Self {
        self.expected_value = expected_value;
        self
    }

    pub const fn with_incomplete_allowed(mut self, allowed: bool) -> Self {
        self.incomplete_allowed = allowed;
        self
    }

    pub const fn with_omit_allowed(mut self, allowed: bool) -> Self {
        self.omit_allowed = allowed;
        self
    }

    pub const fn with_sub_check(mut self, sub_check: bool) -> Self {
        self.sub_check = sub_check;
        self
    }

    pub const fn with_implicit_omit(mut self, implicit_omit: bool) -> Self {
        self.implicit_omit = implicit_omit;
        self
    }

    pub const fn with_str_elem(mut self, str_elem: bool) -> Self {
        self.str_elem = str_elem;
        self
    }
}

impl Default for ValueCheckOptions {
    fn default() -> Self {
        Self::new(ExpectedValue::Dynamic)
    }
}

/// Options of one template check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateCheckOptions {
    /// The template modifies another one, so fields may be missing
    pub is_modified: bool,
    pub implicit_omit: bool,
    pub omit_allowed: bool,
    pub sub_check: bool,
}

impl TemplateCheckOptions {
    pub const fn new() -> Self {
        Self {
            is_modified: false,
            implicit_omit: false,
            omit_allowed: false,
            sub_check: true,
        }
    }

    pub const fn with_modified(mut self, is_modified: bool) -> Self {
        self.is_modified = is_modified;
        self
    }

    pub const fn with_implicit_omit(mut self, implicit_omit: bool) -> Self {
        self.implicit_omit = implicit_omit;
        self
    }

    pub const fn with_omit_allowed(mut self, allowed: bool) -> Self {
        self.omit_allowed = allowed;
        self
    }

    pub const fn with_sub_check(mut self, sub_check: bool) -> Self {
        self.sub_check = sub_check;
        self
    }

    /// Options for the specific value inside a template
    pub const fn value_options(self) -> ValueCheckOptions {
        ValueCheckOptions::new(ExpectedValue::Template)
            .with_incomplete_allowed(self.is_modified)
            .with_omit_allowed(self.omit_allowed)
            .with_sub_check(self.sub_check)
            .with_implicit_omit(self.implicit_omit)
    }
}

impl Default for TemplateCheckOptions {
    fn default() -> Self {
        Self::new()
    }
}
