//! Type arena
//!
//! Owns every type node. Edges between nodes are `TypeId` indices, so shared
//! and cyclic type graphs need no reference counting.

use std::ops::{Index, IndexMut};
use ttcn3_ast::TypeId;
use ttcn3_diagnostics::{Result, Ttcn3Error};

use crate::{TypeKind, TypeNode};

#[derive(Debug, Clone, Default)]
pub struct TypeArena {
    nodes: Vec<TypeNode>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a node into the arena.
    ///
    /// Field types and formal parameter types that have no parent yet get
    /// the new node as their parent.
    pub fn alloc(&mut self, node: TypeNode) -> TypeId {
        let id = TypeId::new(self.nodes.len() as u32);
        let children: Vec<TypeId> = match &node.kind {
            TypeKind::Aggregate(aggregate) => aggregate.fields.iter().map(|f| f.ty).collect(),
            TypeKind::Signature(signature) => signature.parameters.iter().map(|p| p.ty).collect(),
            TypeKind::Testcase(testcase) => testcase.parameters.iter().map(|p| p.ty).collect(),
            _ => Vec::new(),
        };
        self.nodes.push(node);
        for child in children {
            if let Some(child) = self.nodes.get_mut(child.index()) {
                if child.parent.is_none() && child.name.is_empty() {
                    child.parent = Some(id);
                }
            }
        }
        if let TypeKind::Aggregate(aggregate) = &mut self.nodes[id.index()].kind {
            aggregate.fields.set_owner(id);
        }
        id
    }

    /// Look up a node, failing for ids minted by another arena
    pub fn try_get(&self, id: TypeId) -> Result<&TypeNode> {
        self.nodes
            .get(id.index())
            .ok_or_else(|| Ttcn3Error::internal(format!("{id} is not part of this arena")))
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut TypeNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TypeId> {
        (0..self.nodes.len() as u32).map(TypeId::new)
    }
}

impl Index<TypeId> for TypeArena {
    type Output = TypeNode;

    fn index(&self, id: TypeId) -> &TypeNode {
        &self.nodes[id.index()]
    }
}

impl IndexMut<TypeId> for TypeArena {
    fn index_mut(&mut self, id: TypeId) -> &mut TypeNode {
        &mut self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AggregateKind, AggregateType, Field, FieldMap};

    #[test]
    fn test_alloc_links_anonymous_field_types() {
        let mut arena = TypeArena::new();
        let inner = arena.alloc(TypeNode::anonymous(TypeKind::Integer));
        let named = arena.alloc(TypeNode::new("Shared", TypeKind::Integer));
        let mut fields = FieldMap::new();
        fields.add(Field::new("a", inner));
        fields.add(Field::new("b", named));
        let record = arena.alloc(TypeNode::new(
            "R",
            TypeKind::Aggregate(AggregateType::new(AggregateKind::Record, fields)),
        ));

        assert_eq!(arena[inner].parent, Some(record));
        assert_eq!(arena[named].parent, None);
        match &arena[record].kind {
            TypeKind::Aggregate(aggregate) => assert_eq!(aggregate.fields.owner(), Some(record)),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_try_get_foreign_id() {
        let arena = TypeArena::new();
        let err = arena.try_get(TypeId::new(3)).unwrap_err();
        assert!(err.to_string().contains("type#3"));
    }
}
