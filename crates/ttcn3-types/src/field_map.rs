//! Aggregate field maps
//!
//! The ordered field list of a record, set, union or open type. The name
//! index is rebuilt lazily by `ensure_unique` and is only trusted while its
//! uniqueness timestamp is current.

use indexmap::IndexMap;
use log::debug;
use ttcn3_ast::{CompilationTimestamp, Identifier, TypeId};
use ttcn3_diagnostics::{DiagnosticCollection, RelatedInfo, Span, TTCN0400};

/// One field of an aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Identifier,
    pub ty: TypeId,
    pub optional: bool,
}

impl Field {
    pub fn new(name: impl Into<Identifier>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn span(&self) -> Span {
        self.name.span
    }

    /// Position of the declaration in the source
    pub fn source_offset(&self) -> usize {
        self.name.span.start
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    fields: Vec<Field>,
    /// Name to position of the first field with that name
    index: Option<IndexMap<String, usize>>,
    /// Positions of repeated names
    duplicates: Vec<usize>,
    owner: Option<TypeId>,
    last_unique_check: Option<CompilationTimestamp>,
    last_checked: Option<CompilationTimestamp>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        let mut map = Self::new();
        for field in fields {
            map.add(field);
        }
        map
    }

    /// Append a field. Fields without a usable identifier are dropped.
    pub fn add(&mut self, field: Field) {
        if !field.name.is_usable() {
            return;
        }
        self.fields.push(field);
        self.invalidate();
    }

    /// Merge fields into the list by source offset, keeping source order.
    ///
    /// Used when a damaged region is re-parsed and its fields are handed
    /// back separately from the rest of the declaration.
    pub fn add_ordered(&mut self, fields: impl IntoIterator<Item = Field>) {
        for field in fields {
            if !field.name.is_usable() {
                continue;
            }
            let offset = field.source_offset();
            let position = self
                .fields
                .partition_point(|existing| existing.source_offset() <= offset);
            self.fields.insert(position, field);
        }
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.index = None;
        self.duplicates.clear();
        self.last_unique_check = None;
        self.last_checked = None;
    }

    /// Rebuild the name index unless it is current.
    ///
    /// Every repeated name is reported with a first/repeat pair, except in
    /// open types, which may repeat alternatives.
    pub fn ensure_unique(
        &mut self,
        timestamp: CompilationTimestamp,
        open: bool,
        diagnostics: &mut DiagnosticCollection,
    ) {
        if CompilationTimestamp::is_current(self.last_unique_check, timestamp) {
            return;
        }
        self.last_unique_check = Some(timestamp);

        let mut index = IndexMap::with_capacity(self.fields.len());
        self.duplicates.clear();
        for (position, field) in self.fields.iter().enumerate() {
            match index.get(&field.name.name) {
                None => {
                    index.insert(field.name.name.clone(), position);
                }
                Some(&first) => {
                    self.duplicates.push(position);
                    if open {
                        continue;
                    }
                    debug!("duplicate field `{}' in {:?}", field.name, self.owner);
                    let first: &Field = &self.fields[first];
                    diagnostics.report_error(
                        first.span(),
                        TTCN0400,
                        format!("Duplicate field name `{}' was first declared here", first.name),
                    );
                    diagnostics.report_error_with_related(
                        field.span(),
                        TTCN0400,
                        format!("Duplicate field name `{}' was declared here again", field.name),
                        RelatedInfo::new("first declared here").with_span(first.span()),
                    );
                }
            }
        }
        self.index = Some(index);
    }

    /// Find a field by name.
    ///
    /// Uses the name index when it has been built, and otherwise the first
    /// field with that name in declaration order.
    pub fn lookup(&self, name: &str) -> Option<&Field> {
        match &self.index {
            Some(index) => index.get(name).map(|&position| &self.fields[position]),
            None => self.fields.iter().find(|f| f.name.name == name),
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        match &self.index {
            Some(index) => index.get(name).copied(),
            None => self.fields.iter().position(|f| f.name.name == name),
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// The name index as of the last `ensure_unique`
    pub fn index(&self) -> Option<&IndexMap<String, usize>> {
        self.index.as_ref()
    }

    pub fn duplicates(&self) -> impl Iterator<Item = &Field> {
        self.duplicates.iter().map(|&position| &self.fields[position])
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn get(&self, position: usize) -> Option<&Field> {
        self.fields.get(position)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn owner(&self) -> Option<TypeId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: TypeId) {
        self.owner = Some(owner);
    }

    pub fn last_checked(&self) -> Option<CompilationTimestamp> {
        self.last_checked
    }

    pub(crate) fn set_last_checked(&mut self, timestamp: CompilationTimestamp) {
        self.last_checked = Some(timestamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(name: &str, offset: usize, ty: u32) -> Field {
        Field::new(Identifier::at(name, Span::new(offset, offset + name.len())), TypeId::new(ty))
    }

    #[test]
    fn test_duplicates_reported_in_pairs() {
        let mut map =
            FieldMap::from_fields([field("x", 0, 0), field("y", 10, 0), field("x", 20, 1)]);
        let mut diagnostics = DiagnosticCollection::new();
        map.ensure_unique(CompilationTimestamp::new(1), false, &mut diagnostics);

        assert_eq!(
            diagnostics.messages(),
            vec![
                "Duplicate field name `x' was first declared here",
                "Duplicate field name `x' was declared here again",
            ]
        );
        assert_eq!(diagnostics.diagnostics()[1].related[0].span, Some(Span::new(0, 1)));
        let index = map.index().unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("x"), Some(&0));
        assert_eq!(index.get("y"), Some(&1));
        assert_eq!(map.duplicates().count(), 1);
    }

    #[test]
    fn test_open_type_allows_duplicates() {
        let mut map = FieldMap::from_fields([field("a", 0, 0), field("a", 5, 1)]);
        let mut diagnostics = DiagnosticCollection::new();
        map.ensure_unique(CompilationTimestamp::new(1), true, &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert_eq!(map.lookup("a").map(|f| f.ty), Some(TypeId::new(0)));
    }

    #[test]
    fn test_ensure_unique_is_memoized() {
        let mut map = FieldMap::from_fields([field("x", 0, 0), field("x", 5, 0)]);
        let mut diagnostics = DiagnosticCollection::new();
        let t = CompilationTimestamp::new(4);
        map.ensure_unique(t, false, &mut diagnostics);
        map.ensure_unique(t, false, &mut diagnostics);
        assert_eq!(diagnostics.len(), 2);

        map.add(field("z", 9, 0));
        assert!(map.index().is_none());
        map.ensure_unique(t, false, &mut diagnostics);
        assert_eq!(diagnostics.len(), 4);
    }

    #[test]
    fn test_add_ordered_merges_by_offset() {
        let mut map = FieldMap::from_fields([field("a", 0, 0), field("d", 30, 0)]);
        map.add_ordered([field("c", 20, 0), field("b", 10, 0)]);
        let names: Vec<&str> = map.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_unusable_identifiers_are_dropped() {
        let mut map = FieldMap::new();
        map.add(Field::new("", TypeId::new(0)));
        assert!(map.is_empty());
    }
}
