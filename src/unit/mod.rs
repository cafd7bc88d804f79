//! Static tables of convertible physical units and the numerator/
//! denominator multiset a [`crate::value::SassNumber`] carries (spec §4.2).
//!
//! Units are partitioned into five groups of mutually convertible tokens —
//! length, angle, time, frequency, resolution — plus `%` and any unknown
//! custom unit, neither of which converts to anything but itself. The
//! conversion table is built once behind a `once_cell::sync::Lazy`, the
//! same pattern the teacher uses for its `UNIT_CONVERSION_TABLE`
//! (`saolof-grass/src/value/number/mod.rs`), generalized here from a single
//! per-number unit to the numerator/denominator lists spec §3 requires.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

/// A single unit token: one of the five convertible physical groups, the
/// `%` token (never convertible to anything else), or an unrecognized
/// custom unit (e.g. `1q` from a user-defined `@function`), which is only
/// ever convertible with itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Unit {
    // length
    In,
    Cm,
    Pc,
    Mm,
    Q,
    Pt,
    Px,
    // angle
    Deg,
    Grad,
    Rad,
    Turn,
    // time
    S,
    Ms,
    // frequency
    Hz,
    Khz,
    // resolution
    Dpi,
    Dpcm,
    Dppx,
    Percent,
    Unknown(Box<str>),
}

impl Unit {
    pub fn new(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "in" => Unit::In,
            "cm" => Unit::Cm,
            "pc" => Unit::Pc,
            "mm" => Unit::Mm,
            "q" => Unit::Q,
            "pt" => Unit::Pt,
            "px" => Unit::Px,
            "deg" => Unit::Deg,
            "grad" => Unit::Grad,
            "rad" => Unit::Rad,
            "turn" => Unit::Turn,
            "s" => Unit::S,
            "ms" => Unit::Ms,
            "hz" => Unit::Hz,
            "khz" => Unit::Khz,
            "dpi" => Unit::Dpi,
            "dpcm" => Unit::Dpcm,
            "dppx" => Unit::Dppx,
            "%" => Unit::Percent,
            _ => Unit::Unknown(name.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Unit::In => "in",
            Unit::Cm => "cm",
            Unit::Pc => "pc",
            Unit::Mm => "mm",
            Unit::Q => "q",
            Unit::Pt => "pt",
            Unit::Px => "px",
            Unit::Deg => "deg",
            Unit::Grad => "grad",
            Unit::Rad => "rad",
            Unit::Turn => "turn",
            Unit::S => "s",
            Unit::Ms => "ms",
            Unit::Hz => "hz",
            Unit::Khz => "khz",
            Unit::Dpi => "dpi",
            Unit::Dpcm => "dpcm",
            Unit::Dppx => "dppx",
            Unit::Percent => "%",
            Unit::Unknown(s) => s,
        }
    }

    fn group(&self) -> Option<UnitGroup> {
        match self {
            Unit::In | Unit::Cm | Unit::Pc | Unit::Mm | Unit::Q | Unit::Pt | Unit::Px => {
                Some(UnitGroup::Length)
            }
            Unit::Deg | Unit::Grad | Unit::Rad | Unit::Turn => Some(UnitGroup::Angle),
            Unit::S | Unit::Ms => Some(UnitGroup::Time),
            Unit::Hz | Unit::Khz => Some(UnitGroup::Frequency),
            Unit::Dpi | Unit::Dpcm | Unit::Dppx => Some(UnitGroup::Resolution),
            Unit::Percent | Unit::Unknown(_) => None,
        }
    }

    /// How many of `self` make up one canonical unit of its group. `None`
    /// for `%` and unknown units, which have no conversion group.
    fn canonical_multiplier(&self) -> Option<f64> {
        // Canonical units: px, deg, s, Hz, dppx.
        let v = match self {
            Unit::Px => 1.0,
            Unit::In => 96.0,
            Unit::Cm => 96.0 / 2.54,
            Unit::Mm => 9.6 / 2.54,
            Unit::Q => 2.4 / 2.54,
            Unit::Pt => 96.0 / 72.0,
            Unit::Pc => 16.0,

            Unit::Deg => 1.0,
            Unit::Grad => 0.9,
            Unit::Rad => 180.0 / std::f64::consts::PI,
            Unit::Turn => 360.0,

            Unit::S => 1.0,
            Unit::Ms => 0.001,

            Unit::Hz => 1.0,
            Unit::Khz => 1000.0,

            Unit::Dppx => 1.0,
            Unit::Dpi => 1.0 / 96.0,
            Unit::Dpcm => 2.54 / 96.0,

            Unit::Percent | Unit::Unknown(_) => return None,
        };
        Some(v)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitGroup {
    Length,
    Angle,
    Time,
    Frequency,
    Resolution,
}

impl UnitGroup {
    fn name(self) -> &'static str {
        match self {
            UnitGroup::Length => "length",
            UnitGroup::Angle => "angle",
            UnitGroup::Time => "time",
            UnitGroup::Frequency => "frequency",
            UnitGroup::Resolution => "resolution",
        }
    }
}

static ALL_KNOWN_UNITS: &[Unit] = &[
    Unit::In,
    Unit::Cm,
    Unit::Pc,
    Unit::Mm,
    Unit::Q,
    Unit::Pt,
    Unit::Px,
    Unit::Deg,
    Unit::Grad,
    Unit::Rad,
    Unit::Turn,
    Unit::S,
    Unit::Ms,
    Unit::Hz,
    Unit::Khz,
    Unit::Dpi,
    Unit::Dpcm,
    Unit::Dppx,
];

/// `conversions[(to, from)] = factor` such that `1·from = factor·to`,
/// i.e. multiplying a value expressed in `from` units by this factor
/// re-expresses it in `to` units. Built once, lazily, from each unit's
/// [`Unit::canonical_multiplier`] — see [`UnitTable::conversion_factor`].
static CONVERSION_TABLE: Lazy<HashMap<(Unit, Unit), f64>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for to in ALL_KNOWN_UNITS {
        let to_mult = to.canonical_multiplier().expect("known unit");
        for from in ALL_KNOWN_UNITS {
            if to.group() != from.group() {
                continue;
            }
            let from_mult = from.canonical_multiplier().expect("known unit");
            table.insert((to.clone(), from.clone()), from_mult / to_mult);
        }
    }
    table
});

/// Static lookups over the unit conversion table (spec §4.2).
pub struct UnitTable;

impl UnitTable {
    /// The factor `f` such that a value in `from` units, multiplied by
    /// `f`, is the equivalent value in `to` units. Always `Some(1.0)` when
    /// `to == from`, even for `%`/unknown units; otherwise `None` unless
    /// both units belong to the same convertible group.
    pub fn conversion_factor(to: &Unit, from: &Unit) -> Option<f64> {
        if to == from {
            return Some(1.0);
        }
        CONVERSION_TABLE.get(&(to.clone(), from.clone())).copied()
    }

    /// The factor from `unit` to the canonical member of its group. `1.0`
    /// for unknown units (and `%`), per spec §4.2.
    pub fn canonical_multiplier_for(unit: &Unit) -> f64 {
        unit.canonical_multiplier().unwrap_or(1.0)
    }

    /// The name of the physical-unit group `unit` belongs to, for
    /// diagnostics (e.g. "Incompatible units px and s, both are..." style
    /// messages some hosts want). `None` for `%`/unknown units.
    pub fn units_by_type(unit: &Unit) -> Option<&'static str> {
        unit.group().map(UnitGroup::name)
    }
}

/// The numerator/denominator multiset of unit tokens a [`SassNumber`]
/// carries (spec §3). Four shapes fall naturally out of the contents:
/// unitless (both empty), single-unit (one numerator, no denominator),
/// complex (anything else).
///
/// [`SassNumber`]: crate::value::SassNumber
#[derive(Debug, Clone, Default)]
pub struct Units {
    numer: Vec<Unit>,
    denom: Vec<Unit>,
}

impl PartialEq for Units {
    fn eq(&self, other: &Self) -> bool {
        multiset_eq(&self.numer, &other.numer) && multiset_eq(&self.denom, &other.denom)
    }
}
impl Eq for Units {}

fn multiset_eq(a: &[Unit], b: &[Unit]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    'outer: for x in a {
        for (i, y) in b.iter().enumerate() {
            if !used[i] && x == y {
                used[i] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

impl Units {
    pub fn unitless() -> Self {
        Self {
            numer: Vec::new(),
            denom: Vec::new(),
        }
    }

    pub fn single(unit: Unit) -> Self {
        Self {
            numer: vec![unit],
            denom: Vec::new(),
        }
    }

    /// Construct from raw numerator/denominator lists, performing the
    /// cancellation pass spec §3 requires: each denominator unit is
    /// removed if a convertible numerator exists, scaling `value` by the
    /// conversion factor between them. Returns the (possibly adjusted)
    /// value alongside the simplified unit lists.
    pub fn simplify(value: f64, numer: Vec<Unit>, denom: Vec<Unit>) -> (f64, Self) {
        let mut value = value;
        let mut numer = numer;
        let mut denom_remaining = Vec::with_capacity(denom.len());

        'outer: for d in denom {
            for i in 0..numer.len() {
                if let Some(factor) = UnitTable::conversion_factor(&numer[i], &d) {
                    value *= factor;
                    numer.remove(i);
                    continue 'outer;
                }
            }
            denom_remaining.push(d);
        }

        (
            value,
            Self {
                numer,
                denom: denom_remaining,
            },
        )
    }

    pub fn numerators(&self) -> &[Unit] {
        &self.numer
    }

    pub fn denominators(&self) -> &[Unit] {
        &self.denom
    }

    pub fn is_unitless(&self) -> bool {
        self.numer.is_empty() && self.denom.is_empty()
    }

    pub fn is_single_unit(&self) -> bool {
        self.numer.len() == 1 && self.denom.is_empty()
    }

    pub fn is_complex(&self) -> bool {
        !self.is_unitless() && !self.is_single_unit()
    }

    pub fn single_unit(&self) -> Option<&Unit> {
        if self.is_single_unit() {
            self.numer.first()
        } else {
            None
        }
    }

    pub fn has_unit(&self, unit: &Unit) -> bool {
        self.numer.contains(unit) || self.denom.contains(unit)
    }

    /// Invert numerator and denominator — used by division, which
    /// operates by composing `a` with the inverse of `b`.
    pub fn invert(self) -> Self {
        Self {
            numer: self.denom,
            denom: self.numer,
        }
    }

    /// Numerator/denominator composition of `self` and `other`, without
    /// cancellation — callers that want cancellation should route the
    /// combined lists back through [`Units::simplify`].
    pub fn compose_raw(self, other: Self) -> (Vec<Unit>, Vec<Unit>) {
        let mut numer = self.numer;
        numer.extend(other.numer);
        let mut denom = self.denom;
        denom.extend(other.denom);
        (numer, denom)
    }

    /// `true` if `self` and `other` have the same arity (numerator and
    /// denominator counts) and every unit in `self` has a match in
    /// `other` under [`UnitTable::conversion_factor`] (spec §4.3,
    /// `has_compatible_units`/`is_comparable_to`).
    pub fn is_comparable_to(&self, other: &Self) -> bool {
        if self.numer.len() != other.numer.len() || self.denom.len() != other.denom.len() {
            return false;
        }
        multiset_comparable(&self.numer, &other.numer)
            && multiset_comparable(&self.denom, &other.denom)
    }

    /// Per spec, "unknown units on either side are possibly-compatible
    /// with everything" — a looser check than [`Units::is_comparable_to`]
    /// used by `has_possibly_compatible_units`.
    pub fn has_possibly_compatible_units(&self, other: &Self) -> bool {
        if self.numer.iter().any(is_unknown) || other.numer.iter().any(is_unknown) {
            return true;
        }
        if self.denom.iter().any(is_unknown) || other.denom.iter().any(is_unknown) {
            return true;
        }
        self.is_comparable_to(other)
    }

    /// The canonical quantity multiplier for this unit list: the product
    /// of canonical multipliers of the numerator units divided by that of
    /// the denominator units (spec §3 equality/hash rule).
    pub fn canonical_multiplier(&self) -> f64 {
        let numer: f64 = self
            .numer
            .iter()
            .map(UnitTable::canonical_multiplier_for)
            .product();
        let denom: f64 = self
            .denom
            .iter()
            .map(UnitTable::canonical_multiplier_for)
            .product();
        numer / denom
    }

    /// The per-unit conversion factor needed to re-express a value with
    /// this unit list using `target`'s units instead: multiplying a value
    /// in `self`'s units by the result converts it into `target`'s units.
    /// `None` if the lists aren't comparable.
    pub fn conversion_factor_to(&self, target: &Self) -> Option<f64> {
        if !self.is_comparable_to(target) {
            return None;
        }
        Some(self.canonical_multiplier() / target.canonical_multiplier())
    }
}

fn is_unknown(u: &Unit) -> bool {
    matches!(u, Unit::Unknown(_))
}

fn multiset_comparable(a: &[Unit], b: &[Unit]) -> bool {
    let mut used = vec![false; b.len()];
    'outer: for x in a {
        for (i, y) in b.iter().enumerate() {
            if used[i] {
                continue;
            }
            if UnitTable::conversion_factor(x, y).is_some() {
                used[i] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.numer.is_empty() && self.denom.is_empty() {
            return Ok(());
        }
        if self.numer.is_empty() {
            write!(f, "1")?;
        } else {
            for (i, u) in self.numer.iter().enumerate() {
                if i > 0 {
                    f.write_str("*")?;
                }
                write!(f, "{}", u)?;
            }
        }
        if !self.denom.is_empty() {
            write!(f, "/")?;
            for (i, u) in self.denom.iter().enumerate() {
                if i > 0 {
                    f.write_str("*")?;
                }
                write!(f, "{}", u)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_unit_always_converts() {
        assert_eq!(
            UnitTable::conversion_factor(&Unit::Unknown("foo".into()), &Unit::Unknown("foo".into())),
            Some(1.0)
        );
    }

    #[test]
    fn cm_mm_conversion() {
        let factor = UnitTable::conversion_factor(&Unit::Cm, &Unit::Mm).unwrap();
        assert!((factor - 0.1).abs() < 1e-9);
    }

    #[test]
    fn incompatible_groups_dont_convert() {
        assert_eq!(UnitTable::conversion_factor(&Unit::Px, &Unit::S), None);
    }

    #[test]
    fn simplify_cancels_matching_units() {
        let (value, units) =
            Units::simplify(2.0, vec![Unit::Px], vec![Unit::Px]);
        assert_eq!(value, 2.0);
        assert!(units.is_unitless());
    }

    #[test]
    fn simplify_cancels_with_conversion() {
        // 1 in the numerator cancels 1 cm in the denominator by
        // expressing the cm in terms of inches.
        let (value, units) = Units::simplify(1.0, vec![Unit::In], vec![Unit::Cm]);
        assert!(units.is_unitless());
        assert!((value - 96.0 / (96.0 / 2.54)).abs() < 1e-9);
    }

    #[test]
    fn complex_units_survive_composition() {
        let (numer, denom) = Units::single(Unit::Px).compose_raw(Units::single(Unit::S));
        let (_, units) = Units::simplify(6.0, numer, denom);
        assert!(units.is_complex());
        assert_eq!(units.numerators().len(), 2);
    }

    #[test]
    fn possibly_compatible_with_unknown() {
        let px = Units::single(Unit::Px);
        let foo = Units::single(Unit::Unknown("foo".into()));
        assert!(px.has_possibly_compatible_units(&foo));
    }
}
