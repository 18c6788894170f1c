//! Reference chains
//!
//! A reference chain is the visited set of one resolution walk. It is an
//! ordered set so that a detected cycle can be rendered in walk order.
//! Chains are created per top-level resolution call and dropped with it;
//! nested callers that reuse a chain bracket their part with `mark` /
//! `previous_state`.

use indexmap::IndexSet;
use smallvec::SmallVec;
use std::fmt::Display;
use std::hash::Hash;

/// Ordered visited set used to detect circular references
#[derive(Debug, Clone)]
pub struct ReferenceChain<T: Copy + Eq + Hash> {
    members: IndexSet<T>,
    marks: SmallVec<[usize; 4]>,
}

impl<T: Copy + Eq + Hash> Default for ReferenceChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Hash> ReferenceChain<T> {
    pub fn new() -> Self {
        Self {
            members: IndexSet::new(),
            marks: SmallVec::new(),
        }
    }

    /// Add `id` to the chain. Returns `false` if it is already a member,
    /// i.e. the walk has come back to a node it visited before.
    pub fn add(&mut self, id: T) -> bool {
        self.members.insert(id)
    }

    pub fn contains(&self, id: T) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Remember the current length so a nested walk can be undone
    pub fn mark(&mut self) {
        self.marks.push(self.members.len());
    }

    /// Drop every member added since the last `mark`
    pub fn previous_state(&mut self) {
        if let Some(len) = self.marks.pop() {
            self.members.truncate(len);
        }
    }

    /// Members from the first occurrence of `id` to the end of the chain
    pub fn cycle_from(&self, id: T) -> impl Iterator<Item = &T> {
        let start = self.members.get_index_of(&id).unwrap_or(self.members.len());
        self.members.iter().skip(start)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.members.iter()
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.marks.clear();
    }

    /// Render the cycle closed by `id` as `A -> B -> A`
    pub fn render_cycle<D: Display>(&self, id: T, name: impl Fn(T) -> D) -> String {
        let mut rendered: Vec<String> = self
            .cycle_from(id)
            .map(|member| name(*member).to_string())
            .collect();
        rendered.push(name(id).to_string());
        rendered.join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_detects_revisit() {
        let mut chain = ReferenceChain::new();
        assert!(chain.add(1));
        assert!(chain.add(2));
        assert!(!chain.add(1));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_mark_and_previous_state() {
        let mut chain = ReferenceChain::new();
        chain.add('a');
        chain.mark();
        chain.add('b');
        chain.add('c');
        chain.previous_state();
        assert!(chain.contains('a'));
        assert!(!chain.contains('b'));
        assert!(chain.add('b'));
    }

    #[test]
    fn test_render_cycle_starts_at_reentry() {
        let mut chain = ReferenceChain::new();
        for id in ["X", "A", "B"] {
            chain.add(id);
        }
        assert_eq!(chain.render_cycle("A", |s| s), "A -> B -> A");
    }
}
