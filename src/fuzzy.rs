//! Tolerant float comparison, rounding, and Sass's modulo sign rules
//! (spec §4.1). Pure, fails never.
//!
//! Sass numbers are compared and hashed "fuzzily": two doubles that differ
//! by less than `EPSILON` after rounding to [`PRECISION`] decimal places
//! are considered equal. This papers over floating point noise introduced
//! by unit conversion and repeated arithmetic.

/// Decimal places of precision fuzzy comparisons are sensitive to.
pub const PRECISION: i32 = 10;

fn epsilon() -> f64 {
    10.0_f64.powi(-PRECISION - 1)
}

fn inverse_epsilon() -> f64 {
    10.0_f64.powi(PRECISION + 1)
}

/// `|a - b|` is negligible at [`PRECISION`] decimal places.
pub fn fuzzy_equals(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }

    if !a.is_finite() || !b.is_finite() {
        return false;
    }

    (a - b).abs() <= epsilon()
        && (a * inverse_epsilon()).round() == (b * inverse_epsilon()).round()
}

pub fn fuzzy_less_than(a: f64, b: f64) -> bool {
    if fuzzy_equals(a, b) {
        return false;
    }
    a < b
}

pub fn fuzzy_less_than_or_equals(a: f64, b: f64) -> bool {
    fuzzy_equals(a, b) || a < b
}

pub fn fuzzy_greater_than(a: f64, b: f64) -> bool {
    if fuzzy_equals(a, b) {
        return false;
    }
    a > b
}

pub fn fuzzy_greater_than_or_equals(a: f64, b: f64) -> bool {
    fuzzy_equals(a, b) || a > b
}

/// Whether `n` is within fuzzy tolerance of an integer.
pub fn fuzzy_is_int(n: f64) -> bool {
    if !n.is_finite() {
        return false;
    }
    fuzzy_equals(n, n.round())
}

/// `n` as an `i64`, iff [`fuzzy_is_int`] holds for it.
pub fn fuzzy_as_int(n: f64) -> Option<i64> {
    if fuzzy_is_int(n) {
        Some(n.round() as i64)
    } else {
        None
    }
}

/// Half-away-from-zero rounding, after snapping `n` to the nearest
/// representable value within fuzzy tolerance (so `2.9999999999996`
/// rounds to `3`, not `2`).
pub fn fuzzy_round(n: f64) -> f64 {
    if !n.is_finite() {
        return n;
    }

    let rounded = n.round();
    if fuzzy_equals(n, rounded) {
        return rounded;
    }

    // round-half-away-from-zero
    if n >= 0.0 {
        (n + 0.5).floor()
    } else {
        (n - 0.5).ceil()
    }
}

/// Returns `n` snapped to `min` or `max` if it's fuzzy-equal to either
/// endpoint, `n` unchanged if strictly within `(min, max)`, or `None` if it
/// falls outside the range entirely.
pub fn fuzzy_check_range(n: f64, min: f64, max: f64) -> Option<f64> {
    if fuzzy_equals(n, min) {
        return Some(min);
    }
    if fuzzy_equals(n, max) {
        return Some(max);
    }
    if n > min && n < max {
        return Some(n);
    }
    None
}

/// Quantizes `n` to [`PRECISION`] decimal places before hashing, so that
/// fuzzy-equal values hash identically. Used by [`crate::value::Number`]
/// and anywhere else a `Value` containing a number participates in a
/// hash-based collection.
pub fn fuzzy_hash_code(n: f64) -> u64 {
    if !n.is_finite() {
        return n.to_bits();
    }
    let quantized = (n * inverse_epsilon()).round();
    quantized.to_bits()
}

/// Sass's modulo, not the host language's: `b == 0` yields `NaN`; when the
/// signs of `a` and `b` disagree and `b` is finite, the host remainder is
/// adjusted back into `b`'s sign; an infinite `b` always yields `a`
/// unchanged.
pub fn modulo_like_sass(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return f64::NAN;
    }

    // Rust's `%` is IEEE remainder: sign follows the dividend `a`.
    let result = a % b;

    if b.is_infinite() {
        return result;
    }

    if result == 0.0 {
        return if b.is_sign_negative() { -0.0 } else { 0.0 };
    }

    if result.is_sign_negative() != b.is_sign_negative() {
        result + b
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equals_within_tolerance() {
        assert!(fuzzy_equals(1.0, 1.0 + 1e-12));
        assert!(!fuzzy_equals(1.0, 1.1));
    }

    #[test]
    fn int_detection() {
        assert_eq!(fuzzy_as_int(3.0000000000003), Some(3));
        assert_eq!(fuzzy_as_int(3.1), None);
    }

    #[test]
    fn round_half_away_from_zero() {
        assert_eq!(fuzzy_round(0.5), 1.0);
        assert_eq!(fuzzy_round(-0.5), -1.0);
        assert_eq!(fuzzy_round(2.5), 3.0);
    }

    #[test]
    fn range_check() {
        assert_eq!(fuzzy_check_range(0.0, 0.0, 100.0), Some(0.0));
        assert_eq!(fuzzy_check_range(100.0000000001, 0.0, 100.0), Some(100.0));
        assert_eq!(fuzzy_check_range(150.0, 0.0, 100.0), None);
    }

    #[test]
    fn modulo_sass_semantics() {
        assert!(modulo_like_sass(5.0, 0.0).is_nan());
        assert_eq!(modulo_like_sass(5.0, f64::INFINITY), 5.0);
        assert_eq!(modulo_like_sass(-5.0, f64::INFINITY), -5.0);
        assert_eq!(modulo_like_sass(-1.0, 3.0), 2.0);
        assert_eq!(modulo_like_sass(1.0, -3.0), -2.0);
    }

    #[test]
    fn hash_matches_for_fuzzy_equal_values() {
        assert_eq!(fuzzy_hash_code(1.0), fuzzy_hash_code(1.0 + 1e-12));
    }
}
