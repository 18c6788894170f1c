//! Template checking
//!
//! The generic layer handles what every kind shares: governor and usage
//! bookkeeping, specific values, value lists, `omit`, `?` and `*`. Ranges,
//! patterns, decode-match and named template lists go to the per-kind
//! checks. Length restrictions are validated once, after the kind check.

use log::trace;
use std::fmt;
use ttcn3_ast::{
    CompilationTimestamp, DecodeMatch, LengthRestriction, NamedTemplate, ScopeId, Template,
    TemplateKind, TypeId, Value, ValueKind, ValueRange,
};
use ttcn3_diagnostics::{
    Span, TTCN0104, TTCN0201, TTCN0209, TTCN0210, TTCN0300, TTCN0301, TTCN0302, TTCN0303,
    TTCN0304, TTCN0305, TTCN0306, TTCN0307, TTCN0308, TTCN0309,
};

use super::checker::Shape;
use super::scope::AssignmentRef;
use super::TypeChecker;
use crate::{
    AggregateKind, CharCoding, ExpectedValue, FormalParameter, TemplateCheckOptions, TypeKind,
    ValueCheckOptions,
};

#[derive(Debug, Default)]
struct Outcome {
    self_reference: bool,
    erroneous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Lower,
    Upper,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lower => f.write_str("lower"),
            Self::Upper => f.write_str("upper"),
        }
    }
}

/// A range boundary after resolution
#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound<T> {
    Finite(T),
    MinusInfinity,
    PlusInfinity,
    /// Legal, but not a literal the checker can compare
    Unknown,
    /// An error was reported
    Invalid,
}

impl<T> Bound<T> {
    fn is_infinite(&self) -> bool {
        matches!(self, Self::MinusInfinity | Self::PlusInfinity)
    }
}

fn render_length(lower: usize, upper: Option<usize>) -> String {
    match upper {
        Some(upper) if upper == lower => format!("length({lower})"),
        Some(upper) => format!("length({lower} .. {upper})"),
        None => format!("length({lower} .. infinity)"),
    }
}

impl TypeChecker {
    /// Check `template` against `ty` in the pass `timestamp`.
    ///
    /// The governor is set and the usage registered before anything else,
    /// also when the template turns out to be invalid. Returns whether the
    /// template refers back to `last_assignment`.
    pub fn check_this_template(
        &mut self,
        ty: TypeId,
        template: &mut Template,
        options: TemplateCheckOptions,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
    ) -> bool {
        self.check(ty, timestamp);
        self.register_usage(ty, template.span);
        template.set_governor(ty);
        if self.is_erroneous(ty) {
            trace!("template at {} governed by erroneous {ty}", template.span);
            return false;
        }

        let shape = self.shape(ty);
        if shape == Shape::Referencing {
            let target = self.type_refd_last(ty, timestamp);
            if target == ty || self.is_erroneous(target) {
                return false;
            }
            let self_reference =
                self.check_this_template(target, template, options, last_assignment, timestamp);
            template.set_governor(ty);
            if !template.is_erroneous() {
                let scope = self.value_scope(ty, last_assignment);
                self.check_length_within_subtype(ty, template, scope);
            }
            return self_reference;
        }

        let scope = self.value_scope(ty, last_assignment);
        let span = template.span;
        let kind_name = template.kind.kind_name();
        let mut outcome = Outcome::default();
        match &mut template.kind {
            TemplateKind::SpecificValue(value) => {
                outcome.self_reference = self.check_this_value(
                    ty,
                    value,
                    options.value_options(),
                    last_assignment,
                    timestamp,
                );
            }
            _ if matches!(shape, Shape::Default | Shape::Testcase) => {
                self.reject_template(ty, kind_name, span, &mut outcome);
            }
            TemplateKind::Omit => {
                if !options.omit_allowed {
                    self.diagnostics.report_error(
                        span,
                        TTCN0201,
                        "`omit' value is not allowed in this context",
                    );
                    outcome.erroneous = true;
                }
            }
            TemplateKind::AnyValue | TemplateKind::AnyOrOmit => {}
            TemplateKind::ValueList(templates) | TemplateKind::ComplementedList(templates) => {
                for item in templates.iter_mut() {
                    outcome.self_reference |=
                        self.check_this_template(ty, item, options, last_assignment, timestamp);
                }
            }
            TemplateKind::ValueRange(range) => match shape {
                Shape::Integer => {
                    self.check_integer_range(
                        ty,
                        range,
                        span,
                        scope,
                        last_assignment,
                        timestamp,
                        &mut outcome,
                    )
                }
                Shape::Float => {
                    self.check_float_range(
                        ty,
                        range,
                        span,
                        scope,
                        last_assignment,
                        timestamp,
                        &mut outcome,
                    )
                }
                Shape::CharString(_) => {
                    self.check_char_range(
                        ty,
                        range,
                        span,
                        scope,
                        last_assignment,
                        timestamp,
                        &mut outcome,
                    )
                }
                _ => self.reject_template(ty, kind_name, span, &mut outcome),
            },
            TemplateKind::BitPattern(pattern) => match shape {
                Shape::BitString => {
                    if let Some(c) = pattern.chars().find(|c| !matches!(c, '0' | '1' | '?' | '*')) {
                        self.diagnostics.report_error(
                            span,
                            TTCN0306,
                            format!("invalid character `{c}' in bitstring pattern"),
                        );
                        outcome.erroneous = true;
                    }
                }
                _ => self.reject_template(ty, kind_name, span, &mut outcome),
            },
            TemplateKind::CharPattern(_) | TemplateKind::UniversalCharPattern(_) => match shape {
                Shape::CharString(_) => {
                    if self.config.warn_unvalidated_patterns {
                        self.diagnostics.report_warning(
                            span,
                            TTCN0309,
                            format!("{kind_name} is accepted without validation"),
                        );
                    }
                }
                _ => self.reject_template(ty, kind_name, span, &mut outcome),
            },
            TemplateKind::DecodeMatch(decode) => match shape {
                Shape::BitString | Shape::CharString(_) => self.check_decode_match(
                    decode,
                    scope,
                    last_assignment,
                    timestamp,
                    &mut outcome,
                ),
                _ => self.reject_template(ty, kind_name, span, &mut outcome),
            },
            TemplateKind::NamedTemplateList(templates) => match shape {
                Shape::Aggregate(kind) => self.check_aggregate_template(
                    ty,
                    kind,
                    templates,
                    span,
                    options,
                    last_assignment,
                    timestamp,
                    &mut outcome,
                ),
                Shape::Signature => self.check_signature_template(
                    ty,
                    templates,
                    span,
                    options,
                    last_assignment,
                    timestamp,
                    &mut outcome,
                ),
                _ => self.reject_template(ty, kind_name, span, &mut outcome),
            },
        }

        if outcome.erroneous {
            template.set_erroneous(true);
        }
        self.check_length_restriction(ty, shape, template, scope);
        outcome.self_reference
    }

    fn value_scope(&self, ty: TypeId, last_assignment: Option<&AssignmentRef>) -> Option<ScopeId> {
        last_assignment
            .map(|lhs| lhs.scope)
            .or(self.arena[ty].scope)
    }

    fn reject_template(&mut self, ty: TypeId, kind_name: &str, span: Span, outcome: &mut Outcome) {
        let message = format!("{kind_name} cannot be used for type `{}'", self.type_name(ty));
        self.diagnostics.report_error(span, TTCN0300, message);
        outcome.erroneous = true;
    }

    fn boundary_options() -> ValueCheckOptions {
        ValueCheckOptions::new(ExpectedValue::Template).with_sub_check(false)
    }

    /// `omit` is never a boundary
    fn reject_omitted_bound(&mut self, value: &Value, side: Side) -> bool {
        if matches!(value.kind, ValueKind::Omit) {
            self.diagnostics.report_error(
                value.span,
                TTCN0304,
                format!("`omit' value is not allowed as {side} boundary"),
            );
            return true;
        }
        false
    }

    /// Infinities are legal except `+infinity` below and `-infinity` above
    fn infinite_bound<T>(
        &mut self,
        value: &Value,
        side: Side,
        scope: Option<ScopeId>,
    ) -> Option<Bound<T>> {
        let literal = self.peek_refd_last(value, scope)?;
        let (bound, illegal_side, text) = if literal.is_plus_infinity() {
            (Bound::PlusInfinity, Side::Lower, "+infinity")
        } else if literal.is_minus_infinity() {
            (Bound::MinusInfinity, Side::Upper, "-infinity")
        } else {
            return None;
        };
        if side == illegal_side {
            self.diagnostics.report_error(
                value.span,
                TTCN0303,
                format!("{side} boundary cannot be {text}"),
            );
            return Some(Bound::Invalid);
        }
        Some(bound)
    }

    #[allow(clippy::too_many_arguments)]
    fn integer_bound(
        &mut self,
        ty: TypeId,
        value: Option<&mut Value>,
        side: Side,
        scope: Option<ScopeId>,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
        outcome: &mut Outcome,
    ) -> Bound<i64> {
        let Some(value) = value else {
            return match side {
                Side::Lower => Bound::MinusInfinity,
                Side::Upper => Bound::PlusInfinity,
            };
        };
        if self.reject_omitted_bound(value, side) {
            return Bound::Invalid;
        }
        if let Some(bound) = self.infinite_bound(value, side, scope) {
            return bound;
        }
        outcome.self_reference |= self.check_this_value(
            ty,
            value,
            Self::boundary_options(),
            last_assignment,
            timestamp,
        );
        if value.is_erroneous() {
            return Bound::Invalid;
        }
        match self.peek_refd_last(value, scope) {
            Some(ValueKind::Integer(n)) => Bound::Finite(n),
            _ => Bound::Unknown,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn float_bound(
        &mut self,
        ty: TypeId,
        value: Option<&mut Value>,
        side: Side,
        scope: Option<ScopeId>,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
        outcome: &mut Outcome,
    ) -> Bound<f64> {
        let Some(value) = value else {
            return match side {
                Side::Lower => Bound::MinusInfinity,
                Side::Upper => Bound::PlusInfinity,
            };
        };
        if self.reject_omitted_bound(value, side) {
            return Bound::Invalid;
        }
        if let Some(bound) = self.infinite_bound(value, side, scope) {
            return bound;
        }
        outcome.self_reference |= self.check_this_value(
            ty,
            value,
            Self::boundary_options(),
            last_assignment,
            timestamp,
        );
        if value.is_erroneous() {
            return Bound::Invalid;
        }
        match self.peek_refd_last(value, scope) {
            Some(ValueKind::Real(r)) if r.is_nan() => {
                self.diagnostics.report_error(
                    value.span,
                    TTCN0304,
                    format!("not_a_number cannot be used as {side} boundary"),
                );
                Bound::Invalid
            }
            Some(ValueKind::Real(r)) => Bound::Finite(r),
            Some(ValueKind::Integer(n)) => Bound::Finite(n as f64),
            _ => Bound::Unknown,
        }
    }

    fn report_bound_order(&mut self, span: Span, outcome: &mut Outcome) {
        self.diagnostics.report_error(
            span,
            TTCN0302,
            "lower boundary is higher than upper boundary",
        );
        outcome.erroneous = true;
    }

    #[allow(clippy::too_many_arguments)]
    fn check_integer_range(
        &mut self,
        ty: TypeId,
        range: &mut ValueRange,
        span: Span,
        scope: Option<ScopeId>,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
        outcome: &mut Outcome,
    ) {
        let lower = self.integer_bound(
            ty,
            range.min.as_mut(),
            Side::Lower,
            scope,
            last_assignment,
            timestamp,
            outcome,
        );
        let upper = self.integer_bound(
            ty,
            range.max.as_mut(),
            Side::Upper,
            scope,
            last_assignment,
            timestamp,
            outcome,
        );

        for (bound, excluded, side) in [
            (&lower, range.min_exclusive, Side::Lower),
            (&upper, range.max_exclusive, Side::Upper),
        ] {
            if excluded && bound.is_infinite() {
                self.diagnostics.report_error(
                    span,
                    TTCN0303,
                    format!("{side} boundary of an integer range cannot be an excluded infinity"),
                );
                outcome.erroneous = true;
            }
        }

        match (lower, upper) {
            (Bound::Finite(a), Bound::Finite(b)) if a > b => self.report_bound_order(span, outcome),
            (Bound::Invalid, _) | (_, Bound::Invalid) => outcome.erroneous = true,
            _ => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn check_float_range(
        &mut self,
        ty: TypeId,
        range: &mut ValueRange,
        span: Span,
        scope: Option<ScopeId>,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
        outcome: &mut Outcome,
    ) {
        let lower = self.float_bound(
            ty,
            range.min.as_mut(),
            Side::Lower,
            scope,
            last_assignment,
            timestamp,
            outcome,
        );
        let upper = self.float_bound(
            ty,
            range.max.as_mut(),
            Side::Upper,
            scope,
            last_assignment,
            timestamp,
            outcome,
        );
        match (lower, upper) {
            (Bound::Finite(a), Bound::Finite(b)) if a > b => self.report_bound_order(span, outcome),
            (Bound::Invalid, _) | (_, Bound::Invalid) => outcome.erroneous = true,
            _ => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn check_char_range(
        &mut self,
        ty: TypeId,
        range: &mut ValueRange,
        span: Span,
        scope: Option<ScopeId>,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
        outcome: &mut Outcome,
    ) {
        let mut bounds = [Bound::Unknown, Bound::Unknown];
        for (slot, (value, side)) in bounds.iter_mut().zip([
            (range.min.as_mut(), Side::Lower),
            (range.max.as_mut(), Side::Upper),
        ]) {
            let Some(value) = value else {
                self.diagnostics.report_error(
                    span,
                    TTCN0304,
                    format!("{side} boundary of a charstring range cannot be infinity"),
                );
                *slot = Bound::Invalid;
                continue;
            };
            if self.reject_omitted_bound(value, side) {
                *slot = Bound::Invalid;
                continue;
            }
            outcome.self_reference |= self.check_this_value(
                ty,
                value,
                Self::boundary_options(),
                last_assignment,
                timestamp,
            );
            if value.is_erroneous() {
                *slot = Bound::Invalid;
                continue;
            }
            if let Some(ValueKind::Charstring(s)) = self.peek_refd_last(value, scope) {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => *slot = Bound::Finite(c),
                    _ => {
                        self.diagnostics.report_error(
                            value.span,
                            TTCN0304,
                            format!(
                                "{side} boundary of a charstring range must be a single character instead of {} characters",
                                s.chars().count()
                            ),
                        );
                        *slot = Bound::Invalid;
                    }
                }
            }
        }

        match bounds {
            [Bound::Finite(a), Bound::Finite(b)] if a > b => self.report_bound_order(span, outcome),
            [Bound::Invalid, _] | [_, Bound::Invalid] => outcome.erroneous = true,
            _ => {}
        }
    }

    fn check_decode_match(
        &mut self,
        decode: &mut DecodeMatch,
        scope: Option<ScopeId>,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
        outcome: &mut Outcome,
    ) {
        if let Some(encoding) = &decode.encoding {
            match self.peek_refd_last(encoding, scope) {
                Some(ValueKind::Charstring(name)) => {
                    if CharCoding::from_name(&name).is_none() {
                        self.diagnostics.report_error(
                            encoding.span,
                            TTCN0307,
                            format!("`{name}' is not a valid encoding format"),
                        );
                        outcome.erroneous = true;
                    }
                }
                Some(_) => {
                    self.diagnostics.report_error(
                        encoding.span,
                        TTCN0307,
                        "the encoding format must be a charstring value",
                    );
                    outcome.erroneous = true;
                }
                None => {}
            }
        }

        let target = decode.target_type;
        self.check(target, timestamp);
        if !self.is_erroneous(target) {
            let last = self.type_refd_last(target, timestamp);
            let decodable = self.arena[target]
                .codings
                .iter()
                .chain(self.arena[last].codings.iter())
                .any(|coding| self.coding.can_encode(&self.arena, last, coding));
            if !decodable {
                let message = format!(
                    "type `{}' cannot be decoded: it has no usable encoding attribute",
                    self.type_name(target)
                );
                self.diagnostics
                    .report_error(self.arena[target].span, TTCN0308, message);
                outcome.erroneous = true;
            }
        }

        outcome.self_reference |= self.check_this_template(
            target,
            &mut decode.target,
            TemplateCheckOptions::new(),
            last_assignment,
            timestamp,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn check_aggregate_template(
        &mut self,
        ty: TypeId,
        kind: AggregateKind,
        templates: &mut [NamedTemplate],
        span: Span,
        options: TemplateCheckOptions,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
        outcome: &mut Outcome,
    ) {
        self.ensure_unique(ty, timestamp);
        let fields = self.aggregate_fields(ty);
        let names: Vec<_> = templates.iter().map(|t| t.name.clone()).collect();
        let names: Vec<_> = names.iter().collect();
        let (matched, erroneous) = self.match_fields(
            ty,
            kind,
            &fields,
            &names,
            "template",
            span,
            options.is_modified,
            options.implicit_omit,
        );
        outcome.erroneous |= erroneous;

        for (named, position) in templates.iter_mut().zip(matched) {
            let Some(position) = position else {
                continue;
            };
            let field = &fields[position];
            let field_options = options.with_omit_allowed(field.optional && !kind.is_choice());
            outcome.self_reference |= self.check_this_template(
                field.ty,
                &mut named.template,
                field_options,
                last_assignment,
                timestamp,
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn check_signature_template(
        &mut self,
        ty: TypeId,
        templates: &mut [NamedTemplate],
        span: Span,
        options: TemplateCheckOptions,
        last_assignment: Option<&AssignmentRef>,
        timestamp: CompilationTimestamp,
        outcome: &mut Outcome,
    ) {
        let parameters: Vec<FormalParameter> = match &self.arena[ty].kind {
            TypeKind::Signature(signature) => signature.parameters.clone(),
            _ => return,
        };
        let name = self.type_name(ty);
        let mut seen = vec![false; parameters.len()];

        for named in templates.iter_mut() {
            let Some(position) = parameters
                .iter()
                .position(|p| p.name.name == named.name.name)
            else {
                self.diagnostics.report_error(
                    named.name.span,
                    TTCN0104,
                    format!(
                        "reference to non-existent parameter `{}' in signature template for `{name}'",
                        named.name
                    ),
                );
                outcome.erroneous = true;
                continue;
            };
            if seen[position] {
                self.diagnostics.report_error(
                    named.name.span,
                    TTCN0210,
                    format!("duplicate signature parameter `{}'", named.name),
                );
                outcome.erroneous = true;
                continue;
            }
            seen[position] = true;
            outcome.self_reference |= self.check_this_template(
                parameters[position].ty,
                &mut named.template,
                options.with_omit_allowed(false),
                last_assignment,
                timestamp,
            );
        }

        if !options.is_modified {
            for (parameter, _) in parameters.iter().zip(&seen).filter(|(_, seen)| !**seen) {
                self.diagnostics.report_error(
                    span,
                    TTCN0209,
                    format!("parameter `{}' is missing from signature template", parameter.name),
                );
                outcome.erroneous = true;
            }
        }
    }

    /// The literal bounds of a length restriction, when both fold
    fn length_bounds(
        &self,
        restriction: &LengthRestriction,
        scope: Option<ScopeId>,
    ) -> Option<(usize, Option<usize>)> {
        let fold = |value: &Value| match self.peek_refd_last(value, scope) {
            Some(ValueKind::Integer(n)) => usize::try_from(n).ok(),
            _ => None,
        };
        match restriction {
            LengthRestriction::Single { length, .. } => fold(length).map(|n| (n, Some(n))),
            LengthRestriction::Range { lower, upper, .. } => {
                let lower = fold(lower)?;
                match upper {
                    Some(upper) => fold(upper).map(|upper| (lower, Some(upper))),
                    None => Some((lower, None)),
                }
            }
        }
    }

    fn check_length_restriction(
        &mut self,
        ty: TypeId,
        shape: Shape,
        template: &mut Template,
        scope: Option<ScopeId>,
    ) {
        let Some(restriction) = &template.length_restriction else {
            return;
        };
        let span = restriction.span();
        if !matches!(shape, Shape::BitString | Shape::CharString(_)) {
            let message = format!(
                "length restriction cannot be used in a template of type `{}'",
                self.type_name(ty)
            );
            self.diagnostics.report_error(span, TTCN0301, message);
            template.set_erroneous(true);
            return;
        }

        let values: Vec<&Value> = match restriction {
            LengthRestriction::Single { length, .. } => vec![length],
            LengthRestriction::Range { lower, upper, .. } => {
                std::iter::once(lower).chain(upper.as_ref()).collect()
            }
        };
        let mut invalid = false;
        for value in values {
            let message = match self.peek_refd_last(value, scope) {
                Some(ValueKind::Integer(n)) if n < 0 => format!(
                    "the boundary of a length restriction must be a non-negative integer instead of {n}"
                ),
                Some(ValueKind::Integer(_)) | None => continue,
                Some(other) => format!(
                    "the boundary of a length restriction must be an integer value instead of {}",
                    other.kind_name()
                ),
            };
            self.diagnostics.report_error(value.span, TTCN0305, message);
            invalid = true;
        }
        if invalid {
            template.set_erroneous(true);
            return;
        }

        if let Some((lower, Some(upper))) = self.length_bounds(restriction, scope) {
            if upper < lower {
                self.diagnostics.report_error(
                    span,
                    TTCN0305,
                    format!(
                        "the upper boundary of a length restriction ({upper}) is smaller than the lower boundary ({lower})"
                    ),
                );
                template.set_erroneous(true);
                return;
            }
        }
        self.check_length_within_subtype(ty, template, scope);
    }

    /// The template length must lie inside the length restriction of `ty`
    fn check_length_within_subtype(
        &mut self,
        ty: TypeId,
        template: &mut Template,
        scope: Option<ScopeId>,
    ) {
        let Some(restriction) = &template.length_restriction else {
            return;
        };
        let Some((min, max)) = self.arena[ty]
            .subtype
            .as_ref()
            .and_then(|subtype| subtype.length_restriction())
        else {
            return;
        };
        let Some((lower, upper)) = self.length_bounds(restriction, scope) else {
            return;
        };
        let within = lower >= min
            && match (upper, max) {
                (_, None) => true,
                (Some(upper), Some(max)) => upper <= max,
                (None, Some(_)) => false,
            };
        if !within {
            let message = format!(
                "length restriction {} is outside the length restriction {} of type `{}'",
                render_length(lower, upper),
                render_length(min, max),
                self.type_name(ty)
            );
            self.diagnostics
                .report_error(restriction.span(), TTCN0305, message);
            template.set_erroneous(true);
        }
    }
}
