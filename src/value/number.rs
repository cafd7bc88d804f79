//! Dimensional numeric values (spec §3, §4.3).
//!
//! `SassNumber` unifies the source's three historical shapes — Unitless,
//! SingleUnit, Complex — into one struct whose [`Units`] multiset degrades
//! naturally to each (per spec §9's design note); `has_complex_units` and
//! friends just inspect the multiset's shape rather than matching on a
//! subtype. Arithmetic follows the teacher's plain-`f64`-wrapper style
//! (`saolof-grass/src/value/number/mod.rs`), generalized from its single
//! per-number `Unit` to the numerator/denominator lists this spec's unit
//! algebra requires.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use codemap::Span;

use crate::error::SassResult;
use crate::fuzzy;
use crate::unit::{Unit, Units};

/// The pair of numbers an unevaluated `a / b` division leaves on its
/// result, kept only so a later re-serialization can recover the
/// original slash notation (spec §3, "as-slash pair"; glossary
/// "As-slash").
#[derive(Debug, Clone, PartialEq)]
pub struct AsSlash {
    pub numerator: Arc<SassNumber>,
    pub denominator: Arc<SassNumber>,
}

/// A dimensional Sass number: an `f64` value plus the numerator/
/// denominator unit multiset from [`crate::unit::Units`], and an optional
/// as-slash memory.
#[derive(Debug, Clone)]
pub struct SassNumber {
    value: f64,
    units: Units,
    as_slash: Option<AsSlash>,
}

impl SassNumber {
    pub fn unitless(value: f64) -> Self {
        Self {
            value,
            units: Units::unitless(),
            as_slash: None,
        }
    }

    pub fn single(value: f64, unit: Unit) -> Self {
        Self {
            value,
            units: Units::single(unit),
            as_slash: None,
        }
    }

    /// The general constructor (spec §3, §4.3): simplifies `numerators`
    /// against `denominators` (cancelling convertible pairs, scaling
    /// `value` accordingly) and stores whatever unit shape remains.
    pub fn with_units(value: f64, numerators: Vec<Unit>, denominators: Vec<Unit>) -> Self {
        let (value, units) = Units::simplify(value, numerators, denominators);
        Self {
            value,
            units,
            as_slash: None,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn units(&self) -> &Units {
        &self.units
    }

    pub fn as_slash(&self) -> Option<&AsSlash> {
        self.as_slash.as_ref()
    }

    // ---- predicates ----

    pub fn is_int(&self) -> bool {
        fuzzy::fuzzy_is_int(self.value)
    }

    pub fn has_units(&self) -> bool {
        !self.units.is_unitless()
    }

    pub fn has_complex_units(&self) -> bool {
        self.units.is_complex()
    }

    pub fn has_unit(&self, unit: &Unit) -> bool {
        self.units.has_unit(unit)
    }

    pub fn compatible_with_unit(&self, unit: &Unit) -> bool {
        self.units.is_comparable_to(&Units::single(unit.clone()))
    }

    /// Same unit-list arity AND [`Units::is_comparable_to`].
    pub fn has_compatible_units(&self, other: &SassNumber) -> bool {
        self.units.numerators().len() == other.units.numerators().len()
            && self.units.denominators().len() == other.units.denominators().len()
            && self.units.is_comparable_to(&other.units)
    }

    pub fn has_possibly_compatible_units(&self, other: &SassNumber) -> bool {
        self.units.has_possibly_compatible_units(&other.units)
    }

    // ---- assertions ----

    pub fn assert_int(&self, span: Span) -> SassResult<i64> {
        fuzzy::fuzzy_as_int(self.value)
            .ok_or_else(|| (format!("{} is not an integer.", self.inspect()), span).into())
    }

    pub fn assert_int_named(&self, name: &'static str, span: Span) -> SassResult<i64> {
        fuzzy::fuzzy_as_int(self.value)
            .ok_or_else(|| (format!("{} is not an integer.", self.inspect()), name, span).into())
    }

    pub fn assert_unit(&self, unit: &Unit, span: Span) -> SassResult<()> {
        if self.has_unit(unit) && self.units.is_single_unit() {
            Ok(())
        } else {
            Err((
                format!("Expected {} to have unit \"{}\".", self.inspect(), unit),
                span,
            )
                .into())
        }
    }

    pub fn assert_no_units(&self, span: Span) -> SassResult<()> {
        if self.units.is_unitless() {
            Ok(())
        } else {
            Err((
                format!("Expected {} to have no units.", self.inspect()),
                span,
            )
                .into())
        }
    }

    pub fn value_in_range(&self, min: f64, max: f64, span: Span) -> SassResult<f64> {
        fuzzy::fuzzy_check_range(self.value, min, max).ok_or_else(|| {
            (
                format!(
                    "{} must be between {} and {}.",
                    self.inspect(),
                    min,
                    max
                ),
                span,
            )
                .into()
        })
    }

    // ---- conversion ----

    /// The shared routine every `convert*`/`coerce*` entry point funnels
    /// through (spec §4.3): identical unit lists are a no-op; under
    /// `coerce`, either side being unit-free is also a no-op; otherwise
    /// numerators then denominators are matched and scaled pairwise, and
    /// any unmatched remainder raises "Incompatible units".
    fn convert_factor(
        &self,
        target: &Units,
        coerce: bool,
        span: Span,
    ) -> SassResult<f64> {
        if self.units == *target {
            return Ok(1.0);
        }
        if coerce && (self.units.is_unitless() || target.is_unitless()) {
            return Ok(1.0);
        }
        self.units.conversion_factor_to(target).ok_or_else(|| {
            (
                format!(
                    "Incompatible units {} and {}.",
                    self.units, target
                ),
                span,
            )
                .into()
        })
    }

    pub fn convert_value_to(
        &self,
        numerators: Vec<Unit>,
        denominators: Vec<Unit>,
        span: Span,
    ) -> SassResult<f64> {
        let (_, target) = Units::simplify(1.0, numerators, denominators);
        let factor = self.convert_factor(&target, false, span)?;
        Ok(self.value * factor)
    }

    pub fn coerce_value_to(
        &self,
        numerators: Vec<Unit>,
        denominators: Vec<Unit>,
        span: Span,
    ) -> SassResult<f64> {
        let (_, target) = Units::simplify(1.0, numerators, denominators);
        let factor = self.convert_factor(&target, true, span)?;
        Ok(self.value * factor)
    }

    pub fn convert_value_to_match(&self, other: &SassNumber, span: Span) -> SassResult<f64> {
        let factor = self.convert_factor(&other.units, false, span)?;
        Ok(self.value * factor)
    }

    pub fn coerce_value_to_match(&self, other: &SassNumber, span: Span) -> SassResult<f64> {
        let factor = self.convert_factor(&other.units, true, span)?;
        Ok(self.value * factor)
    }

    pub fn convert_to(
        &self,
        numerators: Vec<Unit>,
        denominators: Vec<Unit>,
        span: Span,
    ) -> SassResult<SassNumber> {
        let value = self.convert_value_to(numerators.clone(), denominators.clone(), span)?;
        Ok(SassNumber::with_units(value, numerators, denominators))
    }

    pub fn coerce_to(
        &self,
        numerators: Vec<Unit>,
        denominators: Vec<Unit>,
        span: Span,
    ) -> SassResult<SassNumber> {
        let value = self.coerce_value_to(numerators.clone(), denominators.clone(), span)?;
        Ok(SassNumber::with_units(value, numerators, denominators))
    }

    // ---- arithmetic ----

    /// `a op b`: coerce `b` into `a`'s units, operate on raw doubles,
    /// rewrap with `a`'s unit list.
    fn binary_same_units(
        &self,
        other: &SassNumber,
        span: Span,
        op: impl Fn(f64, f64) -> f64,
    ) -> SassResult<SassNumber> {
        let rhs = other.coerce_value_to_match(self, span)?;
        Ok(SassNumber {
            value: op(self.value, rhs),
            units: self.units.clone(),
            as_slash: None,
        })
    }

    pub fn plus(&self, other: &SassNumber, span: Span) -> SassResult<SassNumber> {
        self.binary_same_units(other, span, |a, b| a + b)
    }

    pub fn minus(&self, other: &SassNumber, span: Span) -> SassResult<SassNumber> {
        self.binary_same_units(other, span, |a, b| a - b)
    }

    /// Composes unit lists (no coercion first) and simplifies pairwise.
    pub fn times(&self, other: &SassNumber) -> SassNumber {
        let (numer, denom) = self.units.clone().compose_raw(other.units.clone());
        SassNumber::with_units(self.value * other.value, numer, denom)
    }

    /// Inverts `other`'s unit list before composing.
    pub fn divided_by(&self, other: &SassNumber) -> SassNumber {
        let (numer, denom) = self
            .units
            .clone()
            .compose_raw(other.units.clone().invert());
        SassNumber::with_units(self.value / other.value, numer, denom)
    }

    /// Sass's modulo, not the host's — see [`fuzzy::modulo_like_sass`].
    pub fn modulo(&self, other: &SassNumber, span: Span) -> SassResult<SassNumber> {
        let rhs = other.coerce_value_to_match(self, span)?;
        Ok(SassNumber {
            value: fuzzy::modulo_like_sass(self.value, rhs),
            units: self.units.clone(),
            as_slash: None,
        })
    }

    pub fn unary_plus(&self) -> SassNumber {
        self.clone()
    }

    pub fn unary_minus(&self) -> SassNumber {
        SassNumber {
            value: -self.value,
            units: self.units.clone(),
            as_slash: None,
        }
    }

    // ---- relational ----

    pub fn greater_than(&self, other: &SassNumber, span: Span) -> SassResult<bool> {
        let rhs = other.coerce_value_to_match(self, span)?;
        Ok(fuzzy::fuzzy_greater_than(self.value, rhs))
    }

    pub fn greater_than_or_equals(&self, other: &SassNumber, span: Span) -> SassResult<bool> {
        let rhs = other.coerce_value_to_match(self, span)?;
        Ok(fuzzy::fuzzy_greater_than_or_equals(self.value, rhs))
    }

    pub fn less_than(&self, other: &SassNumber, span: Span) -> SassResult<bool> {
        let rhs = other.coerce_value_to_match(self, span)?;
        Ok(fuzzy::fuzzy_less_than(self.value, rhs))
    }

    pub fn less_than_or_equals(&self, other: &SassNumber, span: Span) -> SassResult<bool> {
        let rhs = other.coerce_value_to_match(self, span)?;
        Ok(fuzzy::fuzzy_less_than_or_equals(self.value, rhs))
    }

    /// Whether `other` is comparable to `self` at all, catching the
    /// "Incompatible units" exception [`SassNumber::greater_than`] would
    /// raise (spec §7: `is_comparable_to` is the one in-core recovery
    /// point for a `ScriptException`).
    pub fn is_comparable_to(&self, other: &SassNumber, span: Span) -> bool {
        self.greater_than(other, span).is_ok()
    }

    // ---- slash ----

    pub fn with_slash(&self, numerator: SassNumber, denominator: SassNumber) -> SassNumber {
        SassNumber {
            as_slash: Some(AsSlash {
                numerator: Arc::new(numerator),
                denominator: Arc::new(denominator),
            }),
            ..self.clone()
        }
    }

    pub fn without_slash(&self) -> SassNumber {
        if self.as_slash.is_none() {
            self.clone()
        } else {
            SassNumber {
                as_slash: None,
                ..self.clone()
            }
        }
    }

    // ---- canonical quantity (equality/hash) ----

    fn canonical_quantity(&self) -> f64 {
        self.value * self.units.canonical_multiplier()
    }

    pub fn inspect(&self) -> String {
        self.to_css_string(false)
    }

    /// Renders the numeric literal and its unit list; `is_compressed`
    /// trims the leading `0` of a fractional value below 1, matching the
    /// teacher's `Number::to_string` convention.
    pub fn to_css_string(&self, is_compressed: bool) -> String {
        let mut buffer = format_number(self.value, is_compressed);
        if let Some(unit) = self.units.single_unit() {
            buffer.push_str(unit.as_str());
        } else if !self.units.is_unitless() {
            buffer.push_str(&self.units.to_string());
        }
        buffer
    }
}

fn format_number(value: f64, is_compressed: bool) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() {
            "-Infinity".to_owned()
        } else {
            "Infinity".to_owned()
        };
    }

    let mut buffer = String::with_capacity(8);
    if value.is_sign_negative() && value != 0.0 {
        buffer.push('-');
    }

    let abs = value.abs();
    let rendered = format!("{:.10}", abs);
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');

    if is_compressed && abs < 1.0 && trimmed.starts_with('0') {
        buffer.push_str(&trimmed[1..]);
    } else {
        buffer.push_str(trimmed);
    }

    if buffer.is_empty() || buffer == "-" {
        return "0".to_owned();
    }
    buffer
}

impl PartialEq for SassNumber {
    /// Canonicalized unit signatures must match and canonical quantities
    /// must be fuzzy-equal (spec §3).
    fn eq(&self, other: &Self) -> bool {
        self.units.is_comparable_to(&other.units)
            && fuzzy::fuzzy_equals(self.canonical_quantity(), other.canonical_quantity())
    }
}

impl Eq for SassNumber {}

impl Hash for SassNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        fuzzy::fuzzy_hash_code(self.canonical_quantity()).hash(state);
    }
}

impl fmt::Display for SassNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemap::CodeMap;

    fn span() -> Span {
        let mut map = CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn plus_coerces_units_scenario_1() {
        let a = SassNumber::single(1.0, Unit::Cm);
        let b = SassNumber::single(1.0, Unit::Mm);
        let result = a.plus(&b, span()).unwrap();
        assert_eq!(result, SassNumber::single(1.1, Unit::Cm));
    }

    /// Regression: with operands other than `1.0`, coercing the wrong
    /// side (or inverting the conversion factor) is no longer masked by
    /// the two bugs cancelling each other out.
    #[test]
    fn plus_coerces_rhs_into_lhs_units_with_nontrivial_operands() {
        let a = SassNumber::single(2.0, Unit::Cm);
        let b = SassNumber::single(3.0, Unit::Mm);
        let result = a.plus(&b, span()).unwrap();
        assert_eq!(result, SassNumber::single(2.3, Unit::Cm));
    }

    #[test]
    fn in_to_cm_conversion_factor_is_not_inverted() {
        let n = SassNumber::with_units(1.0, vec![Unit::In], vec![]);
        let in_cm = n.convert_value_to(vec![Unit::Cm], vec![], span()).unwrap();
        assert!(fuzzy::fuzzy_equals(in_cm, 2.54));
    }

    #[test]
    fn times_composes_units_scenario_2() {
        let a = SassNumber::single(2.0, Unit::Px);
        let b = SassNumber::single(3.0, Unit::S);
        let result = a.times(&b);
        assert!(result.has_complex_units());
        assert_eq!(result.value(), 6.0);
    }

    #[test]
    fn divided_by_cancels_units_scenario_3() {
        let a = SassNumber::single(2.0, Unit::Px);
        let b = SassNumber::single(4.0, Unit::Px);
        let result = a.divided_by(&b);
        assert_eq!(result, SassNumber::unitless(0.5));
        assert!(!result.has_units());
    }

    #[test]
    fn unit_round_trip_property() {
        let n = SassNumber::with_units(5.0, vec![Unit::In], vec![]);
        let back = n
            .convert_value_to(vec![Unit::In], vec![], span())
            .unwrap();
        assert!(fuzzy::fuzzy_equals(back, 5.0));
    }

    #[test]
    fn incompatible_units_raise() {
        let a = SassNumber::single(1.0, Unit::Px);
        let b = SassNumber::single(1.0, Unit::S);
        assert!(a.plus(&b, span()).is_err());
    }

    #[test]
    fn comparable_check_recovers_from_exception() {
        let a = SassNumber::single(1.0, Unit::Px);
        let b = SassNumber::single(1.0, Unit::S);
        assert!(!a.is_comparable_to(&b, span()));
    }

    #[test]
    fn as_slash_does_not_affect_equality() {
        let plain = SassNumber::unitless(0.5);
        let slashed = plain.with_slash(SassNumber::unitless(1.0), SassNumber::unitless(2.0));
        assert_eq!(plain, slashed);
        assert!(slashed.as_slash().is_some());
        assert!(slashed.without_slash().as_slash().is_none());
    }
}
