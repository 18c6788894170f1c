//! Alias resolution
//!
//! `Address` and `Referenced` nodes own no representation; they forward to
//! the node their scope names. Resolution walks these forwards through a
//! [`ReferenceChain`] so that circular aliases terminate with a diagnostic.

use log::debug;
use smallvec::SmallVec;
use ttcn3_ast::{CompilationTimestamp, TypeId};
use ttcn3_diagnostics::{TTCN0100, TTCN0101};

use super::TypeChecker;
use crate::{ReferenceChain, TypeKind};

impl TypeChecker {
    /// Follow one forwarding step of a referencing node.
    ///
    /// Non-referencing nodes resolve to themselves. When the node is already
    /// on the chain the cycle is reported, every node of the cycle is marked
    /// erroneous and the node itself is returned; a failed lookup also marks
    /// the node erroneous and returns it.
    pub fn resolve_once(
        &mut self,
        ty: TypeId,
        chain: &mut ReferenceChain<TypeId>,
        _timestamp: CompilationTimestamp,
    ) -> TypeId {
        if !self.arena[ty].kind.is_referencing() {
            return ty;
        }
        if !chain.add(ty) {
            self.report_cycle(ty, chain);
            return ty;
        }
        match self.referenced_target(ty) {
            // names itself: the chain already holds it, so this closes `A -> A`
            Some(target) if target == ty => {
                self.report_cycle(ty, chain);
                ty
            }
            Some(target) => target,
            None => {
                self.mark_erroneous(ty);
                ty
            }
        }
    }

    fn report_cycle(&mut self, ty: TypeId, chain: &ReferenceChain<TypeId>) {
        let cycle = chain.render_cycle(ty, |id| self.arena[id].display_name().to_string());
        debug!("circular type reference: {cycle}");
        let span = self.arena[ty].span;
        self.diagnostics.report_error_first_occurrence(
            span,
            TTCN0101,
            format!("circular type reference: {cycle}"),
        );
        let members: SmallVec<[TypeId; 8]> = chain.cycle_from(ty).copied().collect();
        for member in members {
            self.mark_erroneous(member);
        }
    }

    /// Repeat `resolve_once` until a non-referencing node, a node found
    /// erroneous in this pass, or a failed step. When the walk ends on an
    /// erroneous node, every node visited on the way is marked erroneous too.
    pub fn resolve_fully(
        &mut self,
        ty: TypeId,
        chain: &mut ReferenceChain<TypeId>,
        timestamp: CompilationTimestamp,
    ) -> TypeId {
        let mut path: SmallVec<[TypeId; 8]> = SmallVec::new();
        let mut current = ty;
        while self.arena[current].kind.is_referencing() && !self.is_erroneous_at(current, timestamp)
        {
            path.push(current);
            let next = self.resolve_once(current, chain, timestamp);
            if next == current {
                break;
            }
            current = next;
        }
        if self.arena[current].erroneous {
            for visited in path {
                self.mark_erroneous(visited);
            }
        }
        current
    }

    /// The final target of `ty`, resolved with a fresh chain
    pub fn type_refd_last(&mut self, ty: TypeId, timestamp: CompilationTimestamp) -> TypeId {
        let mut chain = ReferenceChain::new();
        self.resolve_fully(ty, &mut chain, timestamp)
    }

    /// The node a referencing node names, reporting failed lookups
    fn referenced_target(&mut self, ty: TypeId) -> Option<TypeId> {
        let Some(scope_id) = self.arena[ty].scope else {
            self.report_detached(ty, "its reference");
            return None;
        };
        let Some(scope) = self.scopes.get(scope_id.index()) else {
            self.report_detached(ty, "its reference");
            return None;
        };
        let node = &self.arena[ty];
        match &node.kind {
            TypeKind::Address => {
                let target = scope.address_type();
                if target.is_none() {
                    debug!("module `{}' has no address type", scope.name());
                    self.diagnostics.report_error_first_occurrence(
                        node.span,
                        TTCN0100,
                        format!("type `address' is not defined in module `{}'", scope.name()),
                    );
                }
                target
            }
            TypeKind::Referenced(reference) => {
                let target = scope.lookup_type(&reference.name.name);
                if target.is_none() {
                    debug!("unresolved type reference `{}'", reference.name);
                    self.diagnostics.report_error_first_occurrence(
                        reference.name.span,
                        TTCN0100,
                        format!("type `{}' is not defined", reference.name),
                    );
                }
                target
            }
            _ => Some(ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::ModuleScope;
    use crate::{TypeNode, TypeReference};
    use pretty_assertions::assert_eq;

    fn alias(name: &str, target: &str) -> TypeNode {
        TypeNode::new(name, TypeKind::Referenced(TypeReference::new(target)))
    }

    #[test]
    fn test_alias_chain_resolves_to_representation() {
        let mut checker = TypeChecker::new();
        let m = checker.add_scope(ModuleScope::new("M"));
        let int = checker.define_type(m, TypeNode::new("Int", TypeKind::Integer));
        let a = checker.define_type(m, alias("A", "B"));
        checker.define_type(m, alias("B", "Int"));

        let t = CompilationTimestamp::new(1);
        assert_eq!(checker.type_refd_last(a, t), int);
        assert!(checker.diagnostics().is_empty());
    }

    #[test]
    fn test_cycle_is_reported_once_and_marks_members() {
        let mut checker = TypeChecker::new();
        let m = checker.add_scope(ModuleScope::new("M"));
        let a = checker.define_type(m, alias("A", "B"));
        let b = checker.define_type(m, alias("B", "A"));

        let t = CompilationTimestamp::new(1);
        let mut chain = ReferenceChain::new();
        assert_eq!(checker.resolve_fully(a, &mut chain, t), a);
        assert!(checker.is_erroneous(a));
        assert!(checker.is_erroneous(b));
        assert_eq!(checker.diagnostics().messages(), vec!["circular type reference: A -> B -> A"]);
    }

    #[test]
    fn test_alias_naming_itself_is_a_cycle() {
        let mut checker = TypeChecker::new();
        let m = checker.add_scope(ModuleScope::new("M"));
        let int = checker.add_type(TypeNode::new("Int", TypeKind::Integer));
        let a = checker.define_type(m, alias("A", "A"));

        let t = CompilationTimestamp::new(1);
        checker.check(a, t);
        assert!(checker.is_erroneous(a));
        assert_eq!(checker.diagnostics().messages(), vec!["circular type reference: A -> A"]);
        assert!(checker.is_compatible(int, a, t));
        assert!(checker.is_compatible(a, int, t));
    }

    #[test]
    fn test_address_designating_itself_is_a_cycle() {
        let mut checker = TypeChecker::new();
        let m = checker.add_scope(ModuleScope::new("M"));
        let address = checker.define_type(m, TypeNode::new("address", TypeKind::Address));
        checker.scope_mut(m).set_address_type(address);

        checker.check(address, CompilationTimestamp::new(1));
        assert!(checker.is_erroneous(address));
        assert_eq!(
            checker.diagnostics().messages(),
            vec!["circular type reference: address -> address"]
        );
    }

    #[test]
    fn test_resolve_once_on_representation_is_identity() {
        let mut checker = TypeChecker::new();
        let int = checker.add_type(TypeNode::anonymous(TypeKind::Integer));
        let mut chain = ReferenceChain::new();
        assert_eq!(checker.resolve_once(int, &mut chain, CompilationTimestamp::new(1)), int);
        assert!(chain.is_empty());
    }

    #[test]
    fn test_detached_reference_is_internal_error() {
        let mut checker = TypeChecker::new();
        let detached = checker.add_type(alias("Lost", "Int"));
        checker.type_refd_last(detached, CompilationTimestamp::new(1));
        assert!(checker.is_erroneous(detached));
        assert!(checker.diagnostics().contains_message("not attached to a module scope"));
    }
}
