//! Value checking
//!
//! A value is checked against its governing type in a fixed order:
//! self-reference detection, resolution of references to their last
//! value, the `omit` and resolved-reference short-circuits, the kind
//! specific literal check (which may rewrite the literal into the form the
//! type expects), the subtype check and finally the timestamp stamp.

use log::{debug, error, trace};
use ttcn3_ast::{
    BlockComponent, CharSymbol, CompilationTimestamp, Identifier, Reference, ScopeId,
    Subreference, TypeId, Value, ValueKind,
};
use ttcn3_diagnostics::{
    Span, TTCN0110, TTCN0200, TTCN0201, TTCN0202, TTCN0203, TTCN0204, TTCN0205, TTCN0206,
    TTCN0207, TTCN0208, TTCN0213, TTCN0214, TTCN0500,
};

use super::checker::Shape;
use super::scope::{AssignmentKind, AssignmentRef};
use super::TypeChecker;
use crate::{AggregateKind, Asn1Kind, ExpectedValue, ReferenceChain, ValueCheckOptions};

/// Where following the references of a value ended
#[derive(Debug)]
pub(crate) enum RefdLast {
    /// The value is a literal itself
    Literal,
    /// The value names another definition. `value` is `None` when the
    /// referenced part cannot be folded (an omitted field, an index that is
    /// not a literal).
    Resolved {
        value: Option<Value>,
        governor: Option<TypeId>,
    },
    /// The error was reported
    Failed,
}

enum Selected {
    Value(Value),
    Opaque,
    Failed,
}

impl TypeChecker {
    /// Check `value` against `ty` in the pass `timestamp`.
    ///
    /// `last_assignment` is the definition whose value is being checked;
    /// the result tells whether the value refers back to it.
    pub fn check_this_value(
        &mut self,
        ty: TypeId,
        value: &mut Value,
        options: ValueCheckOptions,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
    ) -> bool {
        if value.is_checked_at(timestamp) && value.governor() == Some(ty) {
            trace!("value at {} already checked at {timestamp}", value.span);
            return last_assignment.is_some_and(|lhs| refers_to(&value.kind, &lhs.name));
        }
        value.set_governor(ty);
        self.check_value_against(ty, value, options, last_assignment, timestamp)
    }

    fn check_value_against(
        &mut self,
        ty: TypeId,
        value: &mut Value,
        options: ValueCheckOptions,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
    ) -> bool {
        self.check(ty, timestamp);
        let mut self_reference =
            last_assignment.is_some_and(|lhs| refers_to(&value.kind, &lhs.name));

        if self.is_erroneous(ty) {
            value.set_last_checked(timestamp);
            return self_reference;
        }

        let shape = self.shape(ty);
        if shape == Shape::Referencing {
            let target = self.type_refd_last(ty, timestamp);
            if target != ty && !self.is_erroneous(target) {
                self_reference |=
                    self.check_value_against(target, value, options, last_assignment, timestamp);
                if options.sub_check && !value.is_erroneous() {
                    let literal = value.kind.clone();
                    self.check_value_subtype(ty, &literal, value.span);
                }
            }
            value.set_last_checked(timestamp);
            return self_reference;
        }

        let scope = last_assignment
            .map(|lhs| lhs.scope)
            .or(self.arena[ty].scope);
        match self.value_refd_last(value, scope, options.expected_value, timestamp) {
            RefdLast::Failed => value.set_erroneous(true),
            RefdLast::Resolved {
                governor: Some(governor),
                ..
            } => {
                if !self.is_compatible(ty, governor, timestamp) {
                    let message = format!(
                        "type mismatch: a value of type `{}' was expected instead of `{}'",
                        self.type_name(ty),
                        self.type_name(governor)
                    );
                    self.diagnostics.report_error(value.span, TTCN0110, message);
                    value.set_erroneous(true);
                }
            }
            RefdLast::Resolved {
                value: Some(mut resolved),
                governor: None,
            } => {
                resolved.span = value.span;
                self_reference |= self.check_literal(
                    ty,
                    shape,
                    &mut resolved,
                    options,
                    last_assignment,
                    timestamp,
                );
                if resolved.is_erroneous() {
                    value.set_erroneous(true);
                } else if options.sub_check {
                    self.check_value_subtype(ty, &resolved.kind, value.span);
                }
            }
            RefdLast::Resolved { value: None, .. } => {}
            RefdLast::Literal if matches!(value.kind, ValueKind::Omit) => {
                if !options.omit_allowed {
                    self.diagnostics.report_error(
                        value.span,
                        TTCN0201,
                        "`omit' value is not allowed in this context",
                    );
                    value.set_erroneous(true);
                }
            }
            RefdLast::Literal => {
                self_reference |=
                    self.check_literal(ty, shape, value, options, last_assignment, timestamp);
                if options.sub_check && !value.is_erroneous() {
                    let literal = value.kind.clone();
                    self.check_value_subtype(ty, &literal, value.span);
                }
            }
        }

        value.set_last_checked(timestamp);
        self_reference
    }

    fn check_value_subtype(&mut self, ty: TypeId, literal: &ValueKind, span: Span) {
        if !self.config.check_subtypes {
            return;
        }
        let result = match &self.arena[ty].subtype {
            Some(subtype) => subtype.check_value(literal),
            None => Ok(()),
        };
        if let Err(violation) = result {
            self.diagnostics
                .report_error(span, TTCN0205, violation.to_string());
        }
    }

    /// Follow the reference a value is made of to the value it names.
    ///
    /// Value assignments are walked through a reference chain keyed by
    /// `(scope, position)`. The governor is the declared type of the first
    /// assignment, narrowed by the subreference path.
    pub(crate) fn value_refd_last(
        &mut self,
        value: &Value,
        scope: Option<ScopeId>,
        expected: ExpectedValue,
        timestamp: CompilationTimestamp,
    ) -> RefdLast {
        let mut reference = match &value.kind {
            ValueKind::Reference(reference) => reference.clone(),
            ValueKind::UndefinedLowerIdentifier(id) => Reference::new(id.clone()),
            _ => return RefdLast::Literal,
        };
        let Some(scope) = scope.filter(|scope| scope.index() < self.scopes.len()) else {
            error!("value reference `{reference}' has no module scope to resolve in");
            self.diagnostics.report_error(
                value.span,
                TTCN0500,
                format!(
                    "internal error: reference `{reference}' cannot be resolved outside a module scope"
                ),
            );
            return RefdLast::Failed;
        };

        let mut chain = ReferenceChain::new();
        let mut governor = None;
        loop {
            let found = self.scopes[scope.index()]
                .lookup_value(&reference.name.name)
                .map(|(position, a)| (position, a.kind, a.governor, a.value.clone()));
            let Some((position, kind, declared, target)) = found else {
                debug!("unresolved value reference `{}'", reference.name);
                self.diagnostics.report_error_first_occurrence(
                    reference.name.span,
                    TTCN0202,
                    format!("there is no definition with name `{}'", reference.name),
                );
                return RefdLast::Failed;
            };
            if !chain.add((scope, position)) {
                let cycle = chain.render_cycle((scope, position), |(s, p)| {
                    self.scopes[s.index()]
                        .value_at(p)
                        .map(|a| a.name.name.clone())
                        .unwrap_or_default()
                });
                debug!("circular value reference: {cycle}");
                self.diagnostics.report_error_first_occurrence(
                    value.span,
                    TTCN0203,
                    format!("circular value reference: {cycle}"),
                );
                return RefdLast::Failed;
            }

            if chain.len() == 1 {
                if let Some(required) = required_kind(expected, kind) {
                    self.diagnostics.report_error(
                        reference.name.span,
                        TTCN0206,
                        format!(
                            "reference to {required} was expected instead of {kind} `{}'",
                            reference.name
                        ),
                    );
                    return RefdLast::Failed;
                }
                if let Some(declared) = declared {
                    let access = self.field_type(
                        declared,
                        &reference.subreferences,
                        0,
                        expected,
                        timestamp,
                    );
                    match access {
                        Some(access) => governor = Some(access.ty),
                        None => return RefdLast::Failed,
                    }
                }
            }

            match self.select_subreferences(target, &reference.subreferences) {
                Selected::Value(next) => match &next.kind {
                    ValueKind::Reference(next_reference) => reference = next_reference.clone(),
                    ValueKind::UndefinedLowerIdentifier(id) => {
                        reference = Reference::new(id.clone())
                    }
                    _ => {
                        return RefdLast::Resolved {
                            value: Some(next),
                            governor,
                        };
                    }
                },
                Selected::Opaque => {
                    return RefdLast::Resolved {
                        value: None,
                        governor,
                    };
                }
                Selected::Failed => return RefdLast::Failed,
            }
        }
    }

    /// Apply a subreference path to a referenced value
    fn select_subreferences(&mut self, value: Value, path: &[Subreference]) -> Selected {
        let mut current = value;
        for subreference in path {
            let span = current.span;
            current = match (subreference, current.kind) {
                (Subreference::Field(name), ValueKind::Sequence(fields)) => {
                    match fields.into_iter().find(|f| f.name.name == name.name) {
                        Some(field) => field.value,
                        None => return Selected::Opaque,
                    }
                }
                (Subreference::ArrayIndex { index, span: at }, ValueKind::Charstring(s)) => {
                    let ValueKind::Integer(i) = index.kind else {
                        return Selected::Opaque;
                    };
                    match self.string_element(&s, i, *at, "charstring") {
                        Some(c) => Value::new(ValueKind::Charstring(c), span),
                        None => return Selected::Failed,
                    }
                }
                (Subreference::ArrayIndex { index, span: at }, ValueKind::Bitstring(s)) => {
                    let ValueKind::Integer(i) = index.kind else {
                        return Selected::Opaque;
                    };
                    match self.string_element(&s, i, *at, "bitstring") {
                        Some(b) => Value::new(ValueKind::Bitstring(b), span),
                        None => return Selected::Failed,
                    }
                }
                _ => return Selected::Opaque,
            };
        }
        Selected::Value(current)
    }

    fn string_element(&mut self, s: &str, index: i64, span: Span, what: &str) -> Option<String> {
        let element = usize::try_from(index)
            .ok()
            .and_then(|i| s.chars().nth(i));
        if element.is_none() {
            self.diagnostics.report_error(
                span,
                TTCN0214,
                format!(
                    "index overflow in a {what} value: the index is {index}, but the string has only {} elements",
                    s.chars().count()
                ),
            );
        }
        element.map(String::from)
    }

    /// Follow plain references to the literal they name, without reporting.
    /// Used where a literal is needed after the value itself was checked.
    pub(crate) fn peek_refd_last(
        &self,
        value: &Value,
        scope: Option<ScopeId>,
    ) -> Option<ValueKind> {
        let mut name = match &value.kind {
            ValueKind::Reference(r) if r.subreferences.is_empty() => r.name.name.clone(),
            ValueKind::UndefinedLowerIdentifier(id) => id.name.clone(),
            ValueKind::Reference(_) => return None,
            literal => return Some(literal.clone()),
        };
        let scope = self.scopes.get(scope?.index())?;
        let mut visited = ReferenceChain::new();
        loop {
            let (position, assignment) = scope.lookup_value(&name)?;
            if !visited.add(position) {
                return None;
            }
            name = match &assignment.value.kind {
                ValueKind::Reference(r) if r.subreferences.is_empty() => r.name.name.clone(),
                ValueKind::UndefinedLowerIdentifier(id) => id.name.clone(),
                ValueKind::Reference(_) => return None,
                literal => return Some(literal.clone()),
            };
        }
    }

    fn value_kind_mismatch(&mut self, value: &mut Value, expected: &str) {
        self.diagnostics
            .report_error(value.span, TTCN0200, format!("{expected} was expected"));
        value.set_erroneous(true);
    }

    /// Kind specific literal check, with coercion into the expected form
    fn check_literal(
        &mut self,
        ty: TypeId,
        shape: Shape,
        value: &mut Value,
        options: ValueCheckOptions,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
    ) -> bool {
        if value.kind.is_pre_validated() {
            return false;
        }
        match shape {
            Shape::Integer => {
                if !matches!(value.kind, ValueKind::Integer(_)) {
                    self.value_kind_mismatch(value, "integer value");
                }
            }
            Shape::Float => self.check_float_literal(ty, value, last_assignment),
            Shape::BitString => {
                if matches!(value.kind, ValueKind::Bitstring(_)) {
                    self.check_string_element(value, options, "bitstring");
                } else {
                    self.value_kind_mismatch(value, "bitstring value");
                }
            }
            Shape::CharString(asn1) => self.check_charstring_literal(value, options, asn1),
            Shape::Default => {
                if !matches!(value.kind, ValueKind::Null) {
                    self.value_kind_mismatch(value, "default value");
                }
            }
            Shape::Testcase => {
                if !matches!(value.kind, ValueKind::Refers(_) | ValueKind::Null) {
                    self.value_kind_mismatch(value, "reference to a testcase");
                }
            }
            Shape::Component => {
                if !matches!(value.kind, ValueKind::Null) {
                    self.value_kind_mismatch(value, "component reference value");
                }
            }
            Shape::Signature => {
                let message = format!("signature type `{}' cannot have values", self.type_name(ty));
                self.diagnostics.report_error(value.span, TTCN0213, message);
                value.set_erroneous(true);
            }
            Shape::Aggregate(kind) => {
                if matches!(value.kind, ValueKind::Sequence(_)) {
                    return self.check_aggregate_value(
                        ty,
                        kind,
                        value,
                        options,
                        last_assignment,
                        timestamp,
                    );
                }
                self.value_kind_mismatch(value, &format!("{} value", kind.type_name()));
            }
            Shape::Referencing => {}
        }
        false
    }

    fn check_float_literal(
        &mut self,
        ty: TypeId,
        value: &mut Value,
        last_assignment: Option<&AssignmentRef>,
    ) {
        let scope = last_assignment
            .map(|lhs| lhs.scope)
            .or(self.arena[ty].scope);
        let components: Vec<(Option<&Identifier>, &Value)> = match &value.kind {
            ValueKind::Real(_) => return,
            ValueKind::Integer(n) => {
                let n = *n;
                debug!("promoting integer literal {n} to float");
                value.kind = ValueKind::Real(n as f64);
                return;
            }
            ValueKind::UndefinedBlock(components) => components
                .iter()
                .map(|c| (c.name.as_ref(), &c.value))
                .collect(),
            ValueKind::Sequence(fields) => {
                fields.iter().map(|f| (Some(&f.name), &f.value)).collect()
            }
            _ => {
                self.value_kind_mismatch(value, "float value");
                return;
            }
        };
        match self.real_from_components(&components, value.span, scope) {
            Ok(Some(real)) => {
                debug!("collapsing real structure to {real}");
                value.kind = ValueKind::Real(real);
            }
            Ok(None) => {}
            Err(()) => value.set_erroneous(true),
        }
    }

    /// Fold a `{ mantissa, base, exponent }` structure into a real
    fn real_from_components(
        &mut self,
        components: &[(Option<&Identifier>, &Value)],
        span: Span,
        scope: Option<ScopeId>,
    ) -> Result<Option<f64>, ()> {
        const PARTS: [&str; 3] = ["mantissa", "base", "exponent"];
        if components.len() != PARTS.len() {
            self.diagnostics.report_error(
                span,
                TTCN0204,
                "invalid real value: components `mantissa', `base' and `exponent' were expected",
            );
            return Err(());
        }
        let mut numbers = [0i64; 3];
        for (i, (name, value)) in components.iter().enumerate() {
            match name {
                Some(name) if name.name == PARTS[i] => {}
                Some(name) => {
                    self.diagnostics.report_error(
                        name.span,
                        TTCN0204,
                        format!(
                            "invalid real value: component `{}' was expected instead of `{name}'",
                            PARTS[i]
                        ),
                    );
                    return Err(());
                }
                None => {
                    self.diagnostics.report_error(
                        value.span,
                        TTCN0204,
                        format!("invalid real value: component `{}' must be named", PARTS[i]),
                    );
                    return Err(());
                }
            }
            match self.peek_refd_last(value, scope) {
                Some(ValueKind::Integer(n)) => numbers[i] = n,
                Some(_) => {
                    self.diagnostics.report_error(
                        value.span,
                        TTCN0204,
                        format!(
                            "invalid real value: component `{}' must be an integer value",
                            PARTS[i]
                        ),
                    );
                    return Err(());
                }
                None => return Ok(None),
            }
        }
        let [mantissa, base, exponent] = numbers;
        if base != 2 && base != 10 {
            self.diagnostics.report_error(
                components[1].1.span,
                TTCN0204,
                format!("invalid real value: the base must be 2 or 10 instead of {base}"),
            );
            return Err(());
        }
        let Ok(exponent) = i32::try_from(exponent) else {
            self.diagnostics.report_error(
                components[2].1.span,
                TTCN0204,
                format!("invalid real value: exponent {exponent} is out of range"),
            );
            return Err(());
        };
        Ok(Some(mantissa as f64 * (base as f64).powi(exponent)))
    }

    fn check_charstring_literal(
        &mut self,
        value: &mut Value,
        options: ValueCheckOptions,
        asn1: Option<Asn1Kind>,
    ) {
        let coerced = match &value.kind {
            ValueKind::Charstring(_) => None,
            ValueKind::CharSymbols(symbols) => Some(symbols_to_charstring(symbols)),
            ValueKind::UniversalCharstring(s) => Some(downgrade_universal(s)),
            ValueKind::UndefinedBlock(components) => {
                Some(block_to_symbols(components).and_then(|s| symbols_to_charstring(&s)))
            }
            _ => {
                let expected = match asn1 {
                    Some(kind) => format!("{} value", kind.type_name()),
                    None => "charstring value".to_string(),
                };
                self.value_kind_mismatch(value, &expected);
                return;
            }
        };
        match coerced {
            Some(Ok(s)) => {
                debug!("coercing {} to charstring", value.kind.kind_name());
                value.kind = ValueKind::Charstring(s);
            }
            Some(Err(message)) => {
                self.diagnostics.report_error(value.span, TTCN0208, message);
                value.set_erroneous(true);
                return;
            }
            None => {}
        }

        if let (Some(kind), ValueKind::Charstring(s)) = (asn1, &value.kind) {
            if let Some(c) = s.chars().find(|c| !kind.permits_char(*c)) {
                let message =
                    format!("character `{c}' is not allowed in a {} value", kind.type_name());
                self.diagnostics.report_error(value.span, TTCN0208, message);
                value.set_erroneous(true);
                return;
            }
        }
        self.check_string_element(value, options, "charstring");
    }

    fn check_string_element(&mut self, value: &mut Value, options: ValueCheckOptions, what: &str) {
        if !options.str_elem {
            return;
        }
        let len = match &value.kind {
            ValueKind::Charstring(s) => s.chars().count(),
            ValueKind::Bitstring(s) => s.len(),
            _ => return,
        };
        if len != 1 {
            self.diagnostics.report_error(
                value.span,
                TTCN0207,
                format!(
                    "a {what} value containing a single element was expected instead of {len} elements"
                ),
            );
            value.set_erroneous(true);
        }
    }

    fn check_aggregate_value(
        &mut self,
        ty: TypeId,
        kind: AggregateKind,
        value: &mut Value,
        options: ValueCheckOptions,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
    ) -> bool {
        self.ensure_unique(ty, timestamp);
        let fields = self.aggregate_fields(ty);
        let span = value.span;
        let ValueKind::Sequence(components) = &mut value.kind else {
            return false;
        };
        let names: Vec<Identifier> = components.iter().map(|c| c.name.clone()).collect();
        let names: Vec<&Identifier> = names.iter().collect();
        let (matched, erroneous) = self.match_fields(
            ty,
            kind,
            &fields,
            &names,
            "value",
            span,
            options.incomplete_allowed,
            options.implicit_omit,
        );

        let mut self_reference = false;
        for (component, position) in components.iter_mut().zip(matched) {
            let Some(position) = position else {
                continue;
            };
            let field = &fields[position];
            let field_options = options
                .with_omit_allowed(field.optional && !kind.is_choice())
                .with_str_elem(false);
            self_reference |= self.check_this_value(
                field.ty,
                &mut component.value,
                field_options,
                last_assignment,
                timestamp,
            );
        }
        if erroneous {
            value.set_erroneous(true);
        }
        self_reference
    }
}

/// What a context requires instead of an assignment of kind `kind`, if
/// the assignment is not acceptable there
fn required_kind(expected: ExpectedValue, kind: AssignmentKind) -> Option<&'static str> {
    match (expected, kind) {
        (ExpectedValue::Constant, AssignmentKind::Constant) => None,
        (ExpectedValue::Constant, _) => Some("a constant"),
        (ExpectedValue::Static, AssignmentKind::Variable) => Some("a static value"),
        _ => None,
    }
}

/// Whether a value syntactically refers to the definition named `name`
fn refers_to(kind: &ValueKind, name: &str) -> bool {
    match kind {
        ValueKind::Reference(reference) => {
            reference.name.name == name
                || reference.subreferences.iter().any(|sub| match sub {
                    Subreference::ArrayIndex { index, .. } => refers_to(&index.kind, name),
                    Subreference::Parameterized { arguments, .. } => {
                        arguments.iter().any(|a| refers_to(&a.kind, name))
                    }
                    Subreference::Field(_) => false,
                })
        }
        ValueKind::UndefinedLowerIdentifier(id) => id.name == name,
        ValueKind::Sequence(fields) => fields.iter().any(|f| refers_to(&f.value.kind, name)),
        ValueKind::UndefinedBlock(components) => {
            components.iter().any(|c| refers_to(&c.value.kind, name))
        }
        ValueKind::Expression(expression) => {
            expression.operands.iter().any(|o| refers_to(&o.kind, name))
        }
        _ => false,
    }
}

fn symbols_to_charstring(symbols: &[CharSymbol]) -> Result<String, String> {
    let mut out = String::new();
    for symbol in symbols {
        match symbol {
            CharSymbol::Text(text) => {
                if let Some(c) = text.chars().find(|c| !c.is_ascii()) {
                    return Err(not_a_charstring_char(u32::from(c)));
                }
                out.push_str(text);
            }
            CharSymbol::Quadruple { .. } => match symbol.code_point() {
                Some(cp) if cp < 128 => out.push(char::from(cp as u8)),
                Some(cp) => return Err(not_a_charstring_char(cp)),
                None => {}
            },
        }
    }
    Ok(out)
}

fn downgrade_universal(s: &str) -> Result<String, String> {
    match s.chars().find(|c| !c.is_ascii()) {
        Some(c) => Err(not_a_charstring_char(u32::from(c))),
        None => Ok(s.to_string()),
    }
}

fn not_a_charstring_char(code_point: u32) -> String {
    format!("character with code point U+{code_point:04X} cannot be used in a charstring value")
}

/// Read an undefined block as a character symbol list: strings and
/// `{ group, plane, row, cell }` quadruples
fn block_to_symbols(components: &[BlockComponent]) -> Result<Vec<CharSymbol>, String> {
    components
        .iter()
        .map(|component| match &component.value.kind {
            ValueKind::Charstring(text) if component.name.is_none() => {
                Ok(CharSymbol::Text(text.clone()))
            }
            ValueKind::UndefinedBlock(parts) if component.name.is_none() && parts.len() == 4 => {
                let mut quadruple = [0u8; 4];
                for (slot, part) in quadruple.iter_mut().zip(parts) {
                    match part.value.kind {
                        ValueKind::Integer(n) if part.name.is_none() => {
                            *slot = u8::try_from(n).map_err(|_| {
                                "invalid quadruple: components must be integers between 0 and 255".to_string()
                            })?;
                        }
                        _ => {
                            return Err(
                                "invalid quadruple: components must be integers between 0 and 255"
                                    .to_string(),
                            );
                        }
                    }
                }
                let [group, plane, row, cell] = quadruple;
                Ok(CharSymbol::Quadruple {
                    group,
                    plane,
                    row,
                    cell,
                })
            }
            _ => Err(
                "invalid charstring value: block components must be strings or quadruples"
                    .to_string(),
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_symbols_to_charstring() {
        let symbols = vec![
            CharSymbol::Text("ab".into()),
            CharSymbol::Quadruple {
                group: 0,
                plane: 0,
                row: 0,
                cell: 67,
            },
        ];
        assert_eq!(symbols_to_charstring(&symbols), Ok("abC".to_string()));

        let euro = vec![CharSymbol::Quadruple {
            group: 0,
            plane: 0,
            row: 0x20,
            cell: 0xAC,
        }];
        assert_eq!(
            symbols_to_charstring(&euro),
            Err("character with code point U+20AC cannot be used in a charstring value".to_string())
        );
    }

    #[test]
    fn test_block_to_symbols() {
        let quadruple = Value::new(
            ValueKind::UndefinedBlock(
                [0, 0, 0, 65]
                    .into_iter()
                    .map(|n| BlockComponent::unnamed(Value::integer(n)))
                    .collect(),
            ),
            Span::default(),
        );
        let block = vec![
            BlockComponent::unnamed(Value::charstring("x")),
            BlockComponent::unnamed(quadruple),
        ];
        let symbols = block_to_symbols(&block).unwrap();
        assert_eq!(symbols_to_charstring(&symbols), Ok("xA".to_string()));

        let bad = vec![BlockComponent::unnamed(Value::integer(3))];
        assert!(block_to_symbols(&bad).is_err());
    }

    #[test]
    fn test_refers_to_looks_through_structure() {
        let value = ValueKind::Sequence(vec![ttcn3_ast::NamedValue::new(
            "f",
            Value::reference("c"),
        )]);
        assert!(refers_to(&value, "c"));
        assert!(!refers_to(&value, "d"));
        assert!(!refers_to(&ValueKind::Integer(1), "c"));
    }
}
