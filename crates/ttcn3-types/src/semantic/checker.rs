//! The checking engine
//!
//! `TypeChecker` owns the type arena, the module scopes and the diagnostic
//! collection. Every entry point takes the compilation timestamp of the
//! current pass; a node stamped with a timestamp that is not older than the
//! current one is not checked again.

use log::{error, trace};
use std::mem;
use ttcn3_ast::{CompilationTimestamp, ScopeId, TypeId};
use ttcn3_diagnostics::{
    DiagnosticCollection, Span, TTCN0107, TTCN0108, TTCN0109, TTCN0203, TTCN0500,
};

use super::scope::{AssignmentKind, AssignmentRef, ModuleScope};
use crate::{
    AggregateKind, Asn1Kind, CheckerConfig, CodingOracle, ExpectedValue, Field, KindCodingOracle,
    TypeArena, TypeFamily, TypeKind, TypeNode, ValueCheckOptions,
};

/// How a resolved type node takes part in value and template checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Integer,
    Float,
    BitString,
    /// `Some` for the ASN.1 restricted-alphabet and time string kinds
    CharString(Option<Asn1Kind>),
    Default,
    Testcase,
    Component,
    Signature,
    Aggregate(AggregateKind),
    Referencing,
}

#[derive(Debug)]
pub struct TypeChecker {
    pub(crate) arena: TypeArena,
    pub(crate) scopes: Vec<ModuleScope>,
    pub(crate) diagnostics: DiagnosticCollection,
    pub(crate) coding: Box<dyn CodingOracle>,
    pub(crate) config: CheckerConfig,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::with_config(CheckerConfig::default())
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        Self {
            arena: TypeArena::new(),
            scopes: Vec::new(),
            diagnostics: DiagnosticCollection::new(),
            coding: Box::new(KindCodingOracle),
            config,
        }
    }

    /// Replace the coding oracle consulted for `encode` attributes
    pub fn with_coding_oracle(mut self, oracle: Box<dyn CodingOracle>) -> Self {
        self.coding = oracle;
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut TypeArena {
        &mut self.arena
    }

    pub fn node(&self, ty: TypeId) -> &TypeNode {
        &self.arena[ty]
    }

    pub fn node_mut(&mut self, ty: TypeId) -> &mut TypeNode {
        &mut self.arena[ty]
    }

    /// Add an anonymous or not-yet-named node
    pub fn add_type(&mut self, node: TypeNode) -> TypeId {
        self.arena.alloc(node)
    }

    pub fn add_scope(&mut self, scope: ModuleScope) -> ScopeId {
        self.scopes.push(scope);
        ScopeId::new((self.scopes.len() - 1) as u32)
    }

    /// Add a node to `scope` and make it visible there under its name
    pub fn define_type(&mut self, scope: ScopeId, node: TypeNode) -> TypeId {
        let name = node.name.clone();
        let ty = self.arena.alloc(node.in_scope(scope));
        self.scopes[scope.index()].define_type(name, ty);
        ty
    }

    pub fn scope(&self, scope: ScopeId) -> &ModuleScope {
        &self.scopes[scope.index()]
    }

    pub fn scope_mut(&mut self, scope: ScopeId) -> &mut ModuleScope {
        &mut self.scopes[scope.index()]
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Hand over the collected diagnostics and start a fresh collection
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        mem::take(&mut self.diagnostics)
    }

    pub fn is_erroneous(&self, ty: TypeId) -> bool {
        self.arena[ty].erroneous
    }

    /// Erroneous, and the flag was set during the pass `timestamp`
    pub(crate) fn is_erroneous_at(&self, ty: TypeId, timestamp: CompilationTimestamp) -> bool {
        let node = &self.arena[ty];
        node.erroneous && CompilationTimestamp::is_current(node.last_checked, timestamp)
    }

    pub(crate) fn mark_erroneous(&mut self, ty: TypeId) {
        self.arena[ty].erroneous = true;
    }

    pub(crate) fn type_name(&self, ty: TypeId) -> String {
        self.arena[ty].display_name().to_string()
    }

    pub(crate) fn shape(&self, ty: TypeId) -> Shape {
        match &self.arena[ty].kind {
            TypeKind::Integer | TypeKind::Asn1(Asn1Kind::Integer) => Shape::Integer,
            TypeKind::Float => Shape::Float,
            TypeKind::BitString | TypeKind::Asn1(Asn1Kind::BitString) => Shape::BitString,
            TypeKind::CharString => Shape::CharString(None),
            TypeKind::Asn1(kind) => Shape::CharString(Some(*kind)),
            TypeKind::Default => Shape::Default,
            TypeKind::Testcase(_) => Shape::Testcase,
            TypeKind::Component => Shape::Component,
            TypeKind::Signature(_) => Shape::Signature,
            TypeKind::Aggregate(aggregate) => Shape::Aggregate(aggregate.kind),
            TypeKind::Address | TypeKind::Referenced(_) => Shape::Referencing,
        }
    }

    /// Remember that a value or template at `span` is governed by `ty`
    pub fn register_usage(&mut self, ty: TypeId, span: Span) {
        self.arena[ty].usages.insert(span);
    }

    /// Report a node that needs a module scope but has none
    pub(crate) fn report_detached(&mut self, ty: TypeId, what: &str) {
        let name = self.type_name(ty);
        error!("{ty} `{name}' has no module scope to resolve {what} in");
        let span = self.arena[ty].span;
        self.diagnostics.report_error_first_occurrence(
            span,
            TTCN0500,
            format!("internal error: type `{name}' is not attached to a module scope"),
        );
        self.mark_erroneous(ty);
    }

    /// Check a type node in the pass `timestamp`.
    ///
    /// A no-op when the node was already checked in this pass. Otherwise
    /// the node is stamped first, so that re-entrant calls through the type
    /// graph return immediately.
    pub fn check(&mut self, ty: TypeId, timestamp: CompilationTimestamp) {
        let node = &mut self.arena[ty];
        if CompilationTimestamp::is_current(node.last_checked, timestamp) {
            trace!("{ty} already checked at {timestamp}");
            return;
        }
        trace!("checking {ty} `{}' at {timestamp}", node.display_name());
        node.last_checked = Some(timestamp);
        node.erroneous = false;

        self.check_attributes(ty);

        match self.shape(ty) {
            Shape::Referencing => {
                let target = self.type_refd_last(ty, timestamp);
                if target != ty {
                    self.check(target, timestamp);
                    let erroneous = self.arena[target].erroneous;
                    self.arena[ty].erroneous = erroneous;
                }
            }
            Shape::Testcase => self.check_testcase(ty, timestamp),
            Shape::Signature => self.check_signature(ty, timestamp),
            Shape::Aggregate(_) => self.check_fields(ty, timestamp),
            Shape::Integer
            | Shape::Float
            | Shape::BitString
            | Shape::CharString(_)
            | Shape::Default
            | Shape::Component => {}
        }

        self.check_subtype(ty, timestamp);
    }

    fn check_attributes(&mut self, ty: TypeId) {
        let node = &self.arena[ty];
        let codings = node.codings.clone();
        let span = node.span;
        for coding in codings {
            if !self.coding.can_encode(&self.arena, ty, &coding) {
                let name = self.type_name(ty);
                self.diagnostics.report_error(
                    span,
                    TTCN0108,
                    format!("type `{name}' cannot be encoded with {coding}"),
                );
            }
        }
    }

    fn check_subtype(&mut self, ty: TypeId, timestamp: CompilationTimestamp) {
        let Some(subtype) = self.arena[ty].subtype.clone() else {
            return;
        };
        let last = self.type_refd_last(ty, timestamp);
        if self.arena[last].erroneous {
            return;
        }
        let family: Option<TypeFamily> = self.arena[last].kind.family();
        if let Some(constraint) = subtype
            .constraints()
            .iter()
            .find(|constraint| !constraint.applies_to(family))
        {
            let span = if subtype.span.is_empty() {
                self.arena[ty].span
            } else {
                subtype.span
            };
            let message = format!(
                "subtype restriction {constraint} cannot be applied to type `{}'",
                self.type_name(last)
            );
            self.diagnostics.report_error(span, TTCN0107, message);
            self.mark_erroneous(ty);
        }
    }

    /// Check the field map of an aggregate: unique names, then every field type
    pub fn check_fields(&mut self, ty: TypeId, timestamp: CompilationTimestamp) {
        match &mut self.arena[ty].kind {
            TypeKind::Aggregate(aggregate) => {
                if CompilationTimestamp::is_current(aggregate.fields.last_checked(), timestamp) {
                    return;
                }
                aggregate.fields.set_last_checked(timestamp);
            }
            _ => return,
        }
        self.ensure_unique(ty, timestamp);

        for field in self.aggregate_fields(ty) {
            self.check(field.ty, timestamp);
            let last = self.type_refd_last(field.ty, timestamp);
            if self.arena[last].erroneous {
                continue;
            }
            if matches!(self.shape(last), Shape::Signature | Shape::Testcase) {
                let message = format!(
                    "{} type `{}' cannot be the type of field `{}'",
                    self.arena[last].kind.type_name(),
                    self.type_name(last),
                    field.name
                );
                self.diagnostics.report_error(field.span(), TTCN0109, message);
            }
        }
    }

    /// Rebuild the field name index of an aggregate unless it is current
    pub fn ensure_unique(&mut self, ty: TypeId, timestamp: CompilationTimestamp) {
        let Self {
            arena, diagnostics, ..
        } = self;
        if let TypeKind::Aggregate(aggregate) = &mut arena[ty].kind {
            let open = aggregate.kind.is_open();
            aggregate.fields.ensure_unique(timestamp, open, diagnostics);
        }
    }

    /// A snapshot of the fields of an aggregate; empty for other kinds
    pub(crate) fn aggregate_fields(&self, ty: TypeId) -> Vec<Field> {
        match &self.arena[ty].kind {
            TypeKind::Aggregate(aggregate) => aggregate.fields.fields().to_vec(),
            _ => Vec::new(),
        }
    }

    /// Check every type assignment of a module, then every value assignment
    /// against its declared type
    pub fn check_module(&mut self, scope: ScopeId, timestamp: CompilationTimestamp) {
        let types: Vec<TypeId> = self.scopes[scope.index()].types().map(|(_, ty)| ty).collect();
        for ty in types {
            self.check(ty, timestamp);
        }

        for position in 0..self.scopes[scope.index()].value_count() {
            let Some(assignment) = self.scopes[scope.index()].value_at(position) else {
                continue;
            };
            let Some(governor) = assignment.governor else {
                continue;
            };
            let kind = assignment.kind;
            let name = assignment.name.clone();
            let mut value = assignment.value.clone();

            let expected = match kind {
                AssignmentKind::Constant => ExpectedValue::Constant,
                AssignmentKind::ModuleParameter => ExpectedValue::Static,
                AssignmentKind::Variable => ExpectedValue::Dynamic,
            };
            let lhs = AssignmentRef::new(scope, name.name.clone());
            let self_reference = self.check_this_value(
                governor,
                &mut value,
                ValueCheckOptions::new(expected),
                Some(&lhs),
                timestamp,
            );
            if self_reference && kind != AssignmentKind::Variable && !value.is_erroneous() {
                self.diagnostics.report_error(
                    value.span,
                    TTCN0203,
                    format!("the value of {kind} `{name}' refers to itself"),
                );
            }
            if let Some(assignment) = self.scopes[scope.index()].value_at_mut(position) {
                assignment.value = value;
            }
        }
    }
}
