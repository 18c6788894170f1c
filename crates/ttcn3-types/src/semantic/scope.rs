//! Module scopes
//!
//! A module scope holds the type and value assignments of one module and
//! names the module's designated address type. Type nodes point at their
//! scope by `ScopeId`; referenced types and value references are resolved
//! by name through it.

use indexmap::IndexMap;
use std::fmt;
use ttcn3_ast::{Identifier, ScopeId, TypeId, Value};

/// What kind of definition a value assignment is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentKind {
    Constant,
    ModuleParameter,
    Variable,
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::ModuleParameter => write!(f, "module parameter"),
            Self::Variable => write!(f, "variable"),
        }
    }
}

/// `const T name := value` and friends
#[derive(Debug, Clone)]
pub struct ValueAssignment {
    pub name: Identifier,
    pub kind: AssignmentKind,
    /// Declared type; `None` when the declaration could not be resolved
    pub governor: Option<TypeId>,
    pub value: Value,
}

impl ValueAssignment {
    pub fn constant(name: impl Into<Identifier>, governor: TypeId, value: Value) -> Self {
        Self {
            name: name.into(),
            kind: AssignmentKind::Constant,
            governor: Some(governor),
            value,
        }
    }

    pub fn with_kind(mut self, kind: AssignmentKind) -> Self {
        self.kind = kind;
        self
    }
}

/// The assignment whose value is being checked, for self-reference tracking
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssignmentRef {
    pub scope: ScopeId,
    pub name: String,
}

impl AssignmentRef {
    pub fn new(scope: ScopeId, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }
}

/// The definitions of one module
#[derive(Debug, Clone, Default)]
pub struct ModuleScope {
    name: String,
    types: IndexMap<String, TypeId>,
    values: IndexMap<String, ValueAssignment>,
    address_type: Option<TypeId>,
}

impl ModuleScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Define a type assignment; a later definition with the same name wins
    pub fn define_type(&mut self, name: impl Into<String>, ty: TypeId) {
        self.types.insert(name.into(), ty);
    }

    pub fn lookup_type(&self, name: &str) -> Option<TypeId> {
        self.types.get(name).copied()
    }

    pub fn types(&self) -> impl Iterator<Item = (&str, TypeId)> {
        self.types.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Define a value assignment and return its position in the scope
    pub fn define_value(&mut self, assignment: ValueAssignment) -> usize {
        let (position, _) = self
            .values
            .insert_full(assignment.name.name.clone(), assignment);
        position
    }

    pub fn lookup_value(&self, name: &str) -> Option<(usize, &ValueAssignment)> {
        self.values
            .get_full(name)
            .map(|(position, _, assignment)| (position, assignment))
    }

    pub fn value_at(&self, position: usize) -> Option<&ValueAssignment> {
        self.values.get_index(position).map(|(_, assignment)| assignment)
    }

    pub fn value_at_mut(&mut self, position: usize) -> Option<&mut ValueAssignment> {
        self.values
            .get_index_mut(position)
            .map(|(_, assignment)| assignment)
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn set_address_type(&mut self, ty: TypeId) {
        self.address_type = Some(ty);
    }

    /// The module's designated address type
    pub fn address_type(&self) -> Option<TypeId> {
        self.address_type
    }
}
