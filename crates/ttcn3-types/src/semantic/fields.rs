//! Field and subreference resolution
//!
//! Given the type of a referenced definition and the subreference path
//! written after it (`.field`, `[index]`), find the type the whole path
//! denotes.

use indexmap::IndexMap;
use ttcn3_ast::{CompilationTimestamp, Identifier, Subreference, TypeId, ValueKind};
use ttcn3_diagnostics::{
    Span, TTCN0102, TTCN0103, TTCN0104, TTCN0105, TTCN0111, TTCN0209, TTCN0210, TTCN0211, TTCN0212,
};

use super::checker::Shape;
use super::TypeChecker;
use crate::{AggregateKind, ExpectedValue, Field, TypeKind};

/// The outcome of resolving a subreference path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAccess {
    pub ty: TypeId,
    /// The path ends in an index selecting one element of a string
    pub string_element: bool,
}

impl TypeChecker {
    /// Resolve `path[index..]` starting at `ty`.
    ///
    /// Returns `None` when the path is invalid (the error is reported) or
    /// runs through an erroneous type.
    pub fn field_type(
        &mut self,
        ty: TypeId,
        path: &[Subreference],
        index: usize,
        expected: ExpectedValue,
        timestamp: CompilationTimestamp,
    ) -> Option<FieldAccess> {
        let Some(subreference) = path.get(index) else {
            return Some(FieldAccess {
                ty,
                string_element: false,
            });
        };
        self.check(ty, timestamp);
        if self.is_erroneous(ty) {
            return None;
        }

        match self.shape(ty) {
            Shape::Referencing => {
                let target = self.type_refd_last(ty, timestamp);
                if target == ty || self.is_erroneous(target) {
                    return None;
                }
                // address values are always dynamic
                let expected = match (&self.arena[ty].kind, expected) {
                    (TypeKind::Address, ExpectedValue::Template) => ExpectedValue::Dynamic,
                    _ => expected,
                };
                self.field_type(target, path, index, expected, timestamp)
            }
            Shape::BitString | Shape::CharString(_) => match subreference {
                Subreference::ArrayIndex { index: element, span } => {
                    if let ValueKind::Integer(n) = element.kind {
                        if n < 0 {
                            self.diagnostics.report_error(
                                *span,
                                TTCN0111,
                                format!(
                                    "a non-negative integer value was expected as string index instead of {n}"
                                ),
                            );
                            return None;
                        }
                    }
                    if index + 1 < path.len() {
                        self.diagnostics.report_error(
                            path[index + 1].span(),
                            TTCN0103,
                            "invalid string element index: a string element cannot be followed by further subreferences",
                        );
                        return None;
                    }
                    Some(FieldAccess {
                        ty,
                        string_element: true,
                    })
                }
                _ => self.no_such_field(ty, subreference),
            },
            Shape::Aggregate(_) => match subreference {
                Subreference::Field(name) => {
                    let field = match &self.arena[ty].kind {
                        TypeKind::Aggregate(aggregate) => {
                            aggregate.fields.lookup(&name.name).map(|f| f.ty)
                        }
                        _ => None,
                    };
                    match field {
                        Some(field) => self.field_type(field, path, index + 1, expected, timestamp),
                        None => {
                            let message = format!(
                                "reference to non-existent field `{name}' in type `{}'",
                                self.type_name(ty)
                            );
                            self.diagnostics.report_error(name.span, TTCN0104, message);
                            None
                        }
                    }
                }
                Subreference::ArrayIndex { span, .. } => self.cannot_be_indexed(ty, *span),
                Subreference::Parameterized { .. } => self.no_such_field(ty, subreference),
            },
            Shape::Signature => match subreference {
                Subreference::Field(name) => {
                    let parameter = match &self.arena[ty].kind {
                        TypeKind::Signature(signature) => {
                            signature.parameter(&name.name).map(|p| p.ty)
                        }
                        _ => None,
                    };
                    match parameter {
                        Some(parameter) => {
                            self.field_type(parameter, path, index + 1, expected, timestamp)
                        }
                        None => self.no_such_field(ty, subreference),
                    }
                }
                Subreference::ArrayIndex { span, .. } => self.cannot_be_indexed(ty, *span),
                Subreference::Parameterized { .. } => self.no_such_field(ty, subreference),
            },
            Shape::Integer
            | Shape::Float
            | Shape::Default
            | Shape::Testcase
            | Shape::Component => match subreference {
                Subreference::ArrayIndex { span, .. } => self.cannot_be_indexed(ty, *span),
                _ => self.no_such_field(ty, subreference),
            },
        }
    }

    fn no_such_field(&mut self, ty: TypeId, subreference: &Subreference) -> Option<FieldAccess> {
        let name = subreference
            .identifier()
            .map(|id| id.name.as_str())
            .unwrap_or_default();
        let message = format!(
            "invalid subreference `{name}': no such field on type `{}'",
            self.type_name(ty)
        );
        self.diagnostics
            .report_error(subreference.span(), TTCN0102, message);
        None
    }

    fn cannot_be_indexed(&mut self, ty: TypeId, span: Span) -> Option<FieldAccess> {
        let message = format!("type `{}' cannot be indexed", self.type_name(ty));
        self.diagnostics.report_error(span, TTCN0105, message);
        None
    }

    /// Match the names of an aggregate value or template against the fields
    /// of `ty`. Returns, per name, the position of the matching field, or
    /// `None` for a name that is unknown or repeated. The flag is set when
    /// any error was reported.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn match_fields(
        &mut self,
        ty: TypeId,
        kind: AggregateKind,
        fields: &[Field],
        names: &[&Identifier],
        what: &str,
        span: Span,
        missing_allowed: bool,
        implicit_omit: bool,
    ) -> (Vec<Option<usize>>, bool) {
        let type_name = self.type_name(ty);
        let kind_name = kind.type_name();
        let mut erroneous = false;
        let mut matched = Vec::with_capacity(names.len());

        if kind.is_choice() && names.len() != 1 {
            self.diagnostics.report_error(
                span,
                TTCN0212,
                format!("{kind_name} {what} must have exactly one selected field"),
            );
            erroneous = true;
        }

        let mut seen: IndexMap<&str, usize> = IndexMap::new();
        let mut last: Option<(usize, &str)> = None;
        for name in names {
            let Some(position) = fields.iter().position(|f| f.name.name == name.name) else {
                self.diagnostics.report_error(
                    name.span,
                    TTCN0104,
                    format!(
                        "reference to non-existent field `{name}' in {kind_name} {what} for type `{type_name}'"
                    ),
                );
                erroneous = true;
                matched.push(None);
                continue;
            };
            if seen.contains_key(name.name.as_str()) {
                self.diagnostics.report_error(
                    name.span,
                    TTCN0210,
                    format!("duplicate {kind_name} field `{name}'"),
                );
                erroneous = true;
                matched.push(None);
                continue;
            }
            if kind == AggregateKind::Record {
                if let Some((last_position, last_name)) = last {
                    if position < last_position {
                        self.diagnostics.report_error(
                            name.span,
                            TTCN0211,
                            format!(
                                "field `{name}' cannot appear after field `{last_name}' in record {what}"
                            ),
                        );
                        erroneous = true;
                    }
                }
                last = Some((position, name.name.as_str()));
            }
            seen.insert(name.name.as_str(), position);
            matched.push(Some(position));
        }

        if !kind.is_choice() && !missing_allowed {
            for field in fields {
                if seen.contains_key(field.name.name.as_str())
                    || (field.optional && implicit_omit)
                {
                    continue;
                }
                self.diagnostics.report_error(
                    span,
                    TTCN0209,
                    format!("field `{}' is missing from {kind_name} {what}", field.name),
                );
                erroneous = true;
            }
        }
        (matched, erroneous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::ModuleScope;
    use crate::{AggregateType, FieldMap, TypeNode, TypeReference};
    use ttcn3_ast::Value;

    fn t() -> CompilationTimestamp {
        CompilationTimestamp::new(1)
    }

    #[test]
    fn test_string_element_access() {
        let mut checker = TypeChecker::new();
        let s = checker.add_type(TypeNode::anonymous(TypeKind::CharString));
        let path = [Subreference::index(Value::integer(0))];
        let access = checker.field_type(s, &path, 0, ExpectedValue::Dynamic, t());
        assert_eq!(
            access,
            Some(FieldAccess {
                ty: s,
                string_element: true
            })
        );
        assert!(checker.diagnostics().is_empty());
    }

    #[test]
    fn test_string_element_cannot_be_subreferenced() {
        let mut checker = TypeChecker::new();
        let s = checker.add_type(TypeNode::anonymous(TypeKind::CharString));
        let path = [Subreference::index(Value::integer(0)), Subreference::field("f")];
        assert_eq!(checker.field_type(s, &path, 0, ExpectedValue::Dynamic, t()), None);
        assert!(checker.diagnostics().contains_message("invalid string element index"));
    }

    #[test]
    fn test_field_of_scalar() {
        let mut checker = TypeChecker::new();
        let k = checker.add_type(TypeNode::new("K", TypeKind::CharString));
        let path = [Subreference::field("f")];
        assert_eq!(checker.field_type(k, &path, 0, ExpectedValue::Dynamic, t()), None);
        assert_eq!(
            checker.diagnostics().messages(),
            vec!["invalid subreference `f': no such field on type `K'"]
        );
    }

    #[test]
    fn test_nested_record_fields_through_alias() {
        let mut checker = TypeChecker::new();
        let m = checker.add_scope(ModuleScope::new("M"));
        let int = checker.add_type(TypeNode::anonymous(TypeKind::Integer));
        let inner = checker.define_type(
            m,
            TypeNode::new(
                "Inner",
                TypeKind::Aggregate(AggregateType::new(
                    AggregateKind::Record,
                    FieldMap::from_fields([Field::new("n", int)]),
                )),
            ),
        );
        let alias = checker.define_type(
            m,
            TypeNode::new("InnerAlias", TypeKind::Referenced(TypeReference::new("Inner"))),
        );
        let outer = checker.add_type(TypeNode::new(
            "Outer",
            TypeKind::Aggregate(AggregateType::new(
                AggregateKind::Record,
                FieldMap::from_fields([Field::new("inner", alias)]),
            )),
        ));

        let path = [Subreference::field("inner"), Subreference::field("n")];
        let access = checker.field_type(outer, &path, 0, ExpectedValue::Template, t());
        assert_eq!(access.map(|a| a.ty), Some(int));
        assert!(!checker.is_erroneous(inner));

        let bad = [Subreference::field("missing")];
        assert_eq!(checker.field_type(outer, &bad, 0, ExpectedValue::Dynamic, t()), None);
        assert!(checker
            .diagnostics()
            .contains_message("reference to non-existent field `missing' in type `Outer'"));
    }

    #[test]
    fn test_integer_cannot_be_indexed() {
        let mut checker = TypeChecker::new();
        let int = checker.add_type(TypeNode::anonymous(TypeKind::Integer));
        let path = [Subreference::index(Value::integer(1))];
        assert_eq!(checker.field_type(int, &path, 0, ExpectedValue::Dynamic, t()), None);
        assert_eq!(checker.diagnostics().messages(), vec!["type `integer' cannot be indexed"]);
    }
}
