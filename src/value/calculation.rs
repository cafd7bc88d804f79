//! The `calc()`/`min()`/`max()`/`clamp()`/trig/`round()` sub-language
//! (spec §3, §4.9).
//!
//! Every factory here is grounded in `visitor.rs::visit_calculation_expr`
//! and `visit_calculation_value` (`saolof-grass/src/parse/visitor.rs`):
//! arguments are first run through *argument simplification* (unwrap a
//! bare `calc()`, reject quoted strings, reject anything that isn't a
//! number/string/calculation), then a name-specific *value
//! simplification* either reduces to a `Number` or falls back to
//! building a wrapped `Calculation` tree — mirroring the teacher's
//! `unsimplified` fallback path used `if in_supports_declaration`.

use std::fmt;
use std::sync::Arc;

use codemap::Span;

use crate::error::{ArgumentError, SassResult};
use crate::fuzzy;
use crate::unit::Unit;
use crate::warning::{DeprecationKind, WarningSink};

use super::number::SassNumber;
use super::string::SassString;
use super::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl CalcOp {
    fn symbol(self) -> &'static str {
        match self {
            CalcOp::Add => "+",
            CalcOp::Sub => "-",
            CalcOp::Mul => "*",
            CalcOp::Div => "/",
        }
    }
}

/// One leaf or internal node of a calculation tree (spec §3).
#[derive(Debug, Clone)]
pub enum CalcNode {
    Number(SassNumber),
    /// An unquoted string leaf, e.g. the contents of a `var()` call.
    String(String),
    /// A leaf produced by `#{...}` interpolation inside a calculation.
    Interpolation(String),
    Calculation(Arc<Calculation>),
    Operation(CalcOp, Box<CalcNode>, Box<CalcNode>),
}

impl CalcNode {
    pub fn as_number(&self) -> Option<&SassNumber> {
        match self {
            CalcNode::Number(n) => Some(n),
            _ => None,
        }
    }

    fn is_var_string(&self) -> bool {
        matches!(self, CalcNode::String(s) if SassString::new(s.clone(), false).is_var())
    }
}

impl fmt::Display for CalcNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcNode::Number(n) => write!(f, "{}", n),
            CalcNode::String(s) | CalcNode::Interpolation(s) => f.write_str(s),
            CalcNode::Calculation(c) => write!(f, "{}", c),
            CalcNode::Operation(op, l, r) => write!(f, "({} {} {})", l, op.symbol(), r),
        }
    }
}

/// `(name, arguments)` — spec §3. Constructed only through the factories
/// below.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    name: Arc<str>,
    arguments: Arc<Vec<CalcNode>>,
}

impl PartialEq for CalcNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CalcNode::Number(a), CalcNode::Number(b)) => a == b,
            (CalcNode::String(a), CalcNode::String(b)) => a == b,
            (CalcNode::Interpolation(a), CalcNode::Interpolation(b)) => a == b,
            (CalcNode::Calculation(a), CalcNode::Calculation(b)) => a == b,
            (CalcNode::Operation(oa, la, ra), CalcNode::Operation(ob, lb, rb)) => {
                oa == ob && la == lb && ra == rb
            }
            _ => false,
        }
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

impl Calculation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[CalcNode] {
        &self.arguments
    }

    fn wrap(name: &'static str, arguments: Vec<CalcNode>) -> Self {
        Self {
            name: name.into(),
            arguments: Arc::new(arguments),
        }
    }
}

// ---- argument simplification ----

/// Rewrites an evaluator-supplied `Value` into a `CalcNode` (spec §4.9):
/// numbers, unquoted strings, interpolation, and other calculations pass
/// through (a bare `calc(x)` unwraps to `x`); quoted strings and every
/// other variant raise.
pub fn simplify_argument(value: Value, span: Span) -> SassResult<CalcNode> {
    match value {
        Value::Number(n) => Ok(CalcNode::Number(n)),
        Value::String(s) => {
            if s.has_quotes() {
                Err(("Quoted string can't be used in a calculation.".to_owned(), span).into())
            } else {
                Ok(CalcNode::String(s.text().to_owned()))
            }
        }
        Value::Calculation(c) => {
            if &*c.name == "calc" && c.arguments.len() == 1 {
                Ok(c.arguments[0].clone())
            } else {
                Ok(CalcNode::Calculation(Arc::new((*c).clone())))
            }
        }
        other => Err((
            format!("Value {} can't be used in a calculation.", other),
            span,
        )
            .into()),
    }
}

/// Unit pre-flight (spec §4.9): rejects Number nodes with "complex"
/// units (more than one numerator, or any denominator) and rejects any
/// pair of Number nodes with definitely-incompatible units. Called right
/// before a factory falls back to wrapping instead of reducing
/// numerically.
fn unit_preflight(nodes: &[CalcNode], span: Span) -> SassResult<()> {
    let numbers: Vec<&SassNumber> = nodes.iter().filter_map(CalcNode::as_number).collect();

    for n in &numbers {
        if n.has_complex_units() {
            return Err((
                format!("Number {} isn't compatible with CSS calculations.", n.inspect()),
                span,
            )
                .into());
        }
    }

    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            let a = numbers[i];
            let b = numbers[j];
            if a.has_units() && b.has_units() && !a.has_possibly_compatible_units(b) {
                return Err((
                    format!(
                        "{} and {} are incompatible.",
                        a.inspect(),
                        b.inspect()
                    ),
                    span,
                )
                    .into());
            }
        }
    }

    Ok(())
}

fn all_numbers(nodes: &[CalcNode]) -> Option<Vec<&SassNumber>> {
    nodes.iter().map(CalcNode::as_number).collect()
}

impl Calculation {
    /// `calc(arg)`: a Number or Calculation simplified argument returns
    /// directly; anything else wraps as a one-argument `calc`.
    pub fn calc(arg: Value, span: Span) -> SassResult<Value> {
        let node = simplify_argument(arg, span)?;
        match node {
            CalcNode::Number(n) => Ok(Value::Number(n)),
            CalcNode::Calculation(c) => Ok(Value::Calculation(c)),
            other => {
                unit_preflight(std::slice::from_ref(&other), span)?;
                Ok(Value::Calculation(Arc::new(Calculation::wrap("calc", vec![other]))))
            }
        }
    }

    fn variadic_reduce(
        name: &'static str,
        args: Vec<Value>,
        span: Span,
        reduce: impl Fn(&[&SassNumber]) -> SassResult<f64>,
    ) -> SassResult<Value> {
        if args.is_empty() {
            ArgumentError::new(format!("{}() requires at least one argument.", name)).raise();
        }
        let nodes: Vec<CalcNode> = args
            .into_iter()
            .map(|a| simplify_argument(a, span))
            .collect::<SassResult<_>>()?;

        if let Some(numbers) = all_numbers(&nodes) {
            let first_units = numbers[0].units().clone();
            if numbers
                .iter()
                .all(|n| n.has_compatible_units(numbers[0]))
            {
                let value = reduce(&numbers)?;
                return Ok(Value::Number(SassNumber::with_units(
                    value,
                    first_units.numerators().to_vec(),
                    first_units.denominators().to_vec(),
                )));
            }
        }

        unit_preflight(&nodes, span)?;
        Ok(Value::Calculation(Arc::new(Calculation::wrap(name, nodes))))
    }

    pub fn min(args: Vec<Value>, span: Span) -> SassResult<Value> {
        Self::variadic_reduce("min", args, span, |numbers| {
            let mut best = numbers[0].value();
            for n in &numbers[1..] {
                let v = n.coerce_value_to_match(numbers[0], span)?;
                if v < best {
                    best = v;
                }
            }
            Ok(best)
        })
    }

    pub fn max(args: Vec<Value>, span: Span) -> SassResult<Value> {
        Self::variadic_reduce("max", args, span, |numbers| {
            let mut best = numbers[0].value();
            for n in &numbers[1..] {
                let v = n.coerce_value_to_match(numbers[0], span)?;
                if v > best {
                    best = v;
                }
            }
            Ok(best)
        })
    }

    pub fn hypot(args: Vec<Value>, span: Span) -> SassResult<Value> {
        for a in &args {
            if let Value::Number(n) = a {
                if n.has_unit(&Unit::Percent) {
                    return Err(("hypot() doesn't support %.".to_owned(), span).into());
                }
            }
        }
        Self::variadic_reduce("hypot", args, span, |numbers| {
            let mut sum_of_squares = 0.0;
            for n in numbers {
                let v = n.coerce_value_to_match(numbers[0], span)?;
                sum_of_squares += v * v;
            }
            Ok(sum_of_squares.sqrt())
        })
    }

    fn unary_trig(
        name: &'static str,
        arg: Value,
        span: Span,
        requires_unitless: bool,
        apply: impl Fn(f64) -> f64,
    ) -> SassResult<Value> {
        let node = simplify_argument(arg, span)?;
        if let CalcNode::Number(n) = &node {
            let no_percent = !n.has_unit(&Unit::Percent);
            let eligible = if requires_unitless {
                !n.has_units()
            } else {
                no_percent
            };
            if eligible {
                return Ok(Value::Number(SassNumber::unitless(apply(n.value()))));
            }
        }
        unit_preflight(std::slice::from_ref(&node), span)?;
        Ok(Value::Calculation(Arc::new(Calculation::wrap(name, vec![node]))))
    }

    pub fn sqrt(arg: Value, span: Span) -> SassResult<Value> {
        Self::unary_trig("sqrt", arg, span, true, f64::sqrt)
    }

    pub fn sin(arg: Value, span: Span) -> SassResult<Value> {
        Self::unary_trig("sin", arg, span, false, |v| v.to_radians().sin())
    }

    pub fn cos(arg: Value, span: Span) -> SassResult<Value> {
        Self::unary_trig("cos", arg, span, false, |v| v.to_radians().cos())
    }

    pub fn tan(arg: Value, span: Span) -> SassResult<Value> {
        Self::unary_trig("tan", arg, span, false, |v| v.to_radians().tan())
    }

    pub fn atan(arg: Value, span: Span) -> SassResult<Value> {
        Self::unary_trig("atan", arg, span, true, |v| v.atan().to_degrees())
    }

    pub fn asin(arg: Value, span: Span) -> SassResult<Value> {
        Self::unary_trig("asin", arg, span, true, |v| v.asin().to_degrees())
    }

    pub fn acos(arg: Value, span: Span) -> SassResult<Value> {
        Self::unary_trig("acos", arg, span, true, |v| v.acos().to_degrees())
    }

    pub fn exp(arg: Value, span: Span) -> SassResult<Value> {
        Self::unary_trig("exp", arg, span, true, f64::exp)
    }

    /// Identical to the other unary functions, plus a deprecation
    /// warning when passed a `%` Number (spec §4.9).
    pub fn abs(arg: Value, span: Span, warnings: &dyn WarningSink) -> SassResult<Value> {
        if let Value::Number(n) = &arg {
            if n.has_unit(&Unit::Percent) {
                warnings.emit(
                    "Passing percentage units to the global abs() function is deprecated.",
                    DeprecationKind::AbsPercent,
                );
            }
        }
        Self::unary_trig("abs", arg, span, false, f64::abs)
    }

    /// `sign(arg)`: `±1` (preserving units) for finite non-zero Numbers;
    /// the argument unchanged for `NaN` or zero; wraps otherwise.
    pub fn sign(arg: Value, span: Span) -> SassResult<Value> {
        let node = simplify_argument(arg, span)?;
        if let CalcNode::Number(n) = &node {
            let v = n.value();
            if v.is_nan() || v == 0.0 {
                return Ok(Value::Number(n.clone()));
            }
            if v.is_finite() {
                let sign = if v.is_sign_negative() { -1.0 } else { 1.0 };
                return Ok(Value::Number(SassNumber::with_units(
                    sign,
                    n.units().numerators().to_vec(),
                    n.units().denominators().to_vec(),
                )));
            }
        }
        unit_preflight(std::slice::from_ref(&node), span)?;
        Ok(Value::Calculation(Arc::new(Calculation::wrap("sign", vec![node]))))
    }

    /// `clamp(min, value?, max?)`: 3 args required unless one is a
    /// `var()` string, in which case any count is allowed.
    pub fn clamp(args: Vec<Value>, span: Span) -> SassResult<Value> {
        let nodes: Vec<CalcNode> = args
            .into_iter()
            .map(|a| simplify_argument(a, span))
            .collect::<SassResult<_>>()?;

        if nodes.len() != 3 && !nodes.iter().any(CalcNode::is_var_string) {
            ArgumentError::new("clamp() requires exactly 3 arguments, unless a var() is present.")
                .raise();
        }

        if nodes.len() == 3 {
            if let (CalcNode::Number(min), CalcNode::Number(value), CalcNode::Number(max)) =
                (&nodes[0], &nodes[1], &nodes[2])
            {
                if min.has_possibly_compatible_units(value) && min.has_possibly_compatible_units(max) {
                    let value_in_min_units = value.coerce_value_to_match(min, span)?;
                    let max_in_min_units = max.coerce_value_to_match(min, span)?;
                    if value_in_min_units <= min.value() {
                        return Ok(Value::Number(min.clone()));
                    }
                    if value_in_min_units >= max_in_min_units {
                        return Ok(Value::Number(max.clone()));
                    }
                    return Ok(Value::Number(value.clone()));
                }
            }
        }

        unit_preflight(&nodes, span)?;
        Ok(Value::Calculation(Arc::new(Calculation::wrap("clamp", nodes))))
    }

    /// `pow(base, exponent?)`: 2 args required unless a `var()` is
    /// present; both must be unitless to evaluate directly.
    pub fn pow(args: Vec<Value>, span: Span) -> SassResult<Value> {
        let nodes: Vec<CalcNode> = args
            .into_iter()
            .map(|a| simplify_argument(a, span))
            .collect::<SassResult<_>>()?;

        if nodes.len() != 2 && !nodes.iter().any(CalcNode::is_var_string) {
            ArgumentError::new("pow() requires exactly 2 arguments, unless a var() is present.")
                .raise();
        }

        if nodes.len() == 2 {
            if let (CalcNode::Number(base), CalcNode::Number(exp)) = (&nodes[0], &nodes[1]) {
                if !base.has_units() && !exp.has_units() {
                    return Ok(Value::Number(SassNumber::unitless(
                        base.value().powf(exp.value()),
                    )));
                }
            }
        }

        unit_preflight(&nodes, span)?;
        Ok(Value::Calculation(Arc::new(Calculation::wrap("pow", nodes))))
    }

    /// `log(number, base?)`: evaluates directly only if `number` is
    /// unitless and `base` is absent or unitless.
    pub fn log(args: Vec<Value>, span: Span) -> SassResult<Value> {
        if args.is_empty() || args.len() > 2 {
            ArgumentError::new("log() requires 1 or 2 arguments.").raise();
        }
        let nodes: Vec<CalcNode> = args
            .into_iter()
            .map(|a| simplify_argument(a, span))
            .collect::<SassResult<_>>()?;

        if let CalcNode::Number(number) = &nodes[0] {
            if !number.has_units() {
                match nodes.get(1) {
                    None => return Ok(Value::Number(SassNumber::unitless(number.value().ln()))),
                    Some(CalcNode::Number(base)) if !base.has_units() => {
                        return Ok(Value::Number(SassNumber::unitless(
                            number.value().log(base.value()),
                        )));
                    }
                    _ => {}
                }
            }
        }

        unit_preflight(&nodes, span)?;
        Ok(Value::Calculation(Arc::new(Calculation::wrap("log", nodes))))
    }

    /// `atan2(y, x?)`: evaluates only when both are Numbers with
    /// compatible, non-percent units.
    pub fn atan2(args: Vec<Value>, span: Span) -> SassResult<Value> {
        if args.len() != 2 {
            ArgumentError::new("atan2() requires exactly 2 arguments.").raise();
        }
        let nodes: Vec<CalcNode> = args
            .into_iter()
            .map(|a| simplify_argument(a, span))
            .collect::<SassResult<_>>()?;

        if let (CalcNode::Number(y), CalcNode::Number(x)) = (&nodes[0], &nodes[1]) {
            if !y.has_unit(&Unit::Percent)
                && !x.has_unit(&Unit::Percent)
                && y.has_possibly_compatible_units(x)
            {
                let x_in_y_units = x.coerce_value_to_match(y, span)?;
                return Ok(Value::Number(SassNumber::unitless(
                    y.value().atan2(x_in_y_units).to_degrees(),
                )));
            }
        }

        unit_preflight(&nodes, span)?;
        Ok(Value::Calculation(Arc::new(Calculation::wrap("atan2", nodes))))
    }

    fn rem_or_mod(
        name: &'static str,
        args: Vec<Value>,
        span: Span,
        is_mod: bool,
    ) -> SassResult<Value> {
        if args.len() != 2 {
            ArgumentError::new(format!("{}() requires exactly 2 arguments.", name)).raise();
        }
        let nodes: Vec<CalcNode> = args
            .into_iter()
            .map(|a| simplify_argument(a, span))
            .collect::<SassResult<_>>()?;

        if let (CalcNode::Number(dividend), CalcNode::Number(modulus)) = (&nodes[0], &nodes[1]) {
            if dividend.has_compatible_units(modulus) {
                let modulus_in_dividend_units = modulus.coerce_value_to_match(dividend, span)?;
                let modulo_result =
                    fuzzy::modulo_like_sass(dividend.value(), modulus_in_dividend_units);

                let value = if is_mod {
                    modulo_result
                } else {
                    // rem: host-style remainder, adjusted back when signs
                    // differ and the modulus is finite.
                    let host_rem = dividend.value() % modulus_in_dividend_units;
                    if host_rem.is_sign_negative() != modulus_in_dividend_units.is_sign_negative()
                        && modulus_in_dividend_units.is_finite()
                        && host_rem != 0.0
                    {
                        host_rem - modulus_in_dividend_units
                    } else if host_rem == 0.0 {
                        if modulus_in_dividend_units.is_sign_negative() {
                            -0.0
                        } else {
                            0.0
                        }
                    } else {
                        host_rem
                    }
                };

                return Ok(Value::Number(SassNumber::with_units(
                    value,
                    dividend.units().numerators().to_vec(),
                    dividend.units().denominators().to_vec(),
                )));
            }
        }

        unit_preflight(&nodes, span)?;
        Ok(Value::Calculation(Arc::new(Calculation::wrap(name, nodes))))
    }

    pub fn rem(args: Vec<Value>, span: Span) -> SassResult<Value> {
        Self::rem_or_mod("rem", args, span, false)
    }

    pub fn modulo(args: Vec<Value>, span: Span) -> SassResult<Value> {
        Self::rem_or_mod("mod", args, span, true)
    }

    /// `round(strategy_or_number, number_or_step?, step?)` — polymorphic
    /// across 1/2/3-argument forms (spec §4.9).
    pub fn round(args: Vec<Value>, span: Span) -> SassResult<Value> {
        let (strategy, number, step): (&'static str, Value, Option<Value>) = match args.len() {
            1 => ("nearest", args.into_iter().next().unwrap(), None),
            2 => {
                let mut it = args.into_iter();
                let first = it.next().unwrap();
                let second = it.next().unwrap();
                if let Value::String(s) = &first {
                    if !s.has_quotes() && matches!(s.text(), "nearest" | "up" | "down" | "to-zero")
                    {
                        let strategy = match s.text() {
                            "nearest" => "nearest",
                            "up" => "up",
                            "down" => "down",
                            _ => "to-zero",
                        };
                        return Self::round_impl(strategy, second, None, span);
                    }
                }
                ("nearest", first, Some(second))
            }
            3 => {
                let mut it = args.into_iter();
                let strategy_value = it.next().unwrap();
                let number = it.next().unwrap();
                let step = it.next().unwrap();
                let strategy = match &strategy_value {
                    Value::String(s) if !s.has_quotes() => match s.text() {
                        "nearest" => "nearest",
                        "up" => "up",
                        "down" => "down",
                        "to-zero" => "to-zero",
                        other => {
                            return Err((
                                format!("\"{}\" is not a valid rounding strategy.", other),
                                span,
                            )
                                .into())
                        }
                    },
                    _ => return Err(("Rounding strategy must be an unquoted string.".to_owned(), span).into()),
                };
                (strategy, number, Some(step))
            }
            _ => {
                ArgumentError::new("round() requires 1, 2, or 3 arguments.").raise();
            }
        };

        Self::round_impl(strategy, number, step, span)
    }

    fn round_impl(
        strategy: &'static str,
        number: Value,
        step: Option<Value>,
        span: Span,
    ) -> SassResult<Value> {
        let number_node = simplify_argument(number, span)?;
        let step_node = match step {
            Some(v) => Some(simplify_argument(v, span)?),
            None => None,
        };

        if let CalcNode::Number(n) = &number_node {
            let step_number = match &step_node {
                Some(CalcNode::Number(s)) => Some(s),
                Some(_) => None,
                None => None,
            };

            if step_node.is_none() {
                return Ok(Value::Number(SassNumber::with_units(
                    round_with_strategy(strategy, n.value()),
                    n.units().numerators().to_vec(),
                    n.units().denominators().to_vec(),
                )));
            }

            if let Some(step_n) = step_number {
                if n.has_compatible_units(step_n) {
                    let step_value = step_n.coerce_value_to_match(n, span)?;

                    let rounded = if step_value == 0.0 {
                        f64::NAN
                    } else if n.value().is_infinite() || step_value.is_infinite() {
                        if n.value().is_infinite() && step_value.is_infinite() {
                            f64::NAN
                        } else if step_value.is_infinite() {
                            round_with_strategy(strategy, 0.0)
                        } else {
                            n.value()
                        }
                    } else if n.value().is_nan() || step_value.is_nan() {
                        f64::NAN
                    } else {
                        round_with_strategy(strategy, n.value() / step_value) * step_value
                    };

                    return Ok(Value::Number(SassNumber::with_units(
                        rounded,
                        n.units().numerators().to_vec(),
                        n.units().denominators().to_vec(),
                    )));
                }
            }
        }

        let mut nodes = vec![number_node];
        if let Some(s) = step_node {
            nodes.push(s);
        }
        unit_preflight(&nodes, span)?;
        Ok(Value::Calculation(Arc::new(Calculation::wrap("round", nodes))))
    }

    /// Binary `+ - * /` constructor used when building a calculation
    /// tree node-by-node (spec §4.9).
    pub fn operate(op: CalcOp, left: Value, right: Value, span: Span) -> SassResult<Value> {
        let left = simplify_argument(left, span)?;
        let right = simplify_argument(right, span)?;

        if let (CalcNode::Number(l), CalcNode::Number(r)) = (&left, &right) {
            match op {
                CalcOp::Add | CalcOp::Sub if l.has_possibly_compatible_units(r) => {
                    let rhs = r.coerce_value_to_match(l, span)?;
                    let value = if op == CalcOp::Add { l.value() + rhs } else { l.value() - rhs };
                    return Ok(Value::Number(SassNumber::with_units(
                        value,
                        l.units().numerators().to_vec(),
                        l.units().denominators().to_vec(),
                    )));
                }
                CalcOp::Mul => return Ok(Value::Number(l.times(r))),
                CalcOp::Div => return Ok(Value::Number(l.divided_by(r))),
                _ => {}
            }
        }

        // Normalize `+(-n)` into `-n` when the right side is a negative
        // Number, per the teacher's calculation-operand discipline.
        let (op, right) = if op == CalcOp::Add {
            if let CalcNode::Number(n) = &right {
                if n.value() < 0.0 {
                    (CalcOp::Sub, CalcNode::Number(n.unary_minus()))
                } else {
                    (op, right)
                }
            } else {
                (op, right)
            }
        } else {
            (op, right)
        };

        unit_preflight(&[left.clone(), right.clone()], span)?;
        Ok(Value::Calculation(Arc::new(Calculation {
            name: "calc".into(),
            arguments: Arc::new(vec![CalcNode::Operation(op, Box::new(left), Box::new(right))]),
        })))
    }
}

fn round_with_strategy(strategy: &str, v: f64) -> f64 {
    match strategy {
        "up" => {
            if v.is_sign_negative() {
                v.floor()
            } else {
                v.ceil()
            }
        }
        "down" => {
            if v.is_sign_negative() {
                v.ceil()
            } else {
                v.floor()
            }
        }
        "to-zero" => v.trunc(),
        _ => fuzzy::fuzzy_round(v),
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
    fn min_with_mixed_units_wraps_scenario_4() {
        let result = Calculation::min(
            vec![
                Value::Number(SassNumber::unitless(3.0)),
                Value::Number(SassNumber::unitless(7.0)),
                Value::Number(SassNumber::single(1.0, Unit::Px)),
            ],
            span(),
        )
        .unwrap();
        assert!(matches!(result, Value::Calculation(_)));
    }

    #[test]
    fn min_with_all_unitless_reduces_scenario_4() {
        let result = Calculation::min(
            vec![
                Value::Number(SassNumber::unitless(3.0)),
                Value::Number(SassNumber::unitless(7.0)),
                Value::Number(SassNumber::unitless(1.0)),
            ],
            span(),
        )
        .unwrap();
        assert_eq!(result, Value::Number(SassNumber::unitless(1.0)));
    }

    #[test]
    fn round_nearest_with_step_scenario_5() {
        let result = Calculation::round(
            vec![
                Value::String(SassString::new("nearest", false)),
                Value::Number(SassNumber::single(13.0, Unit::Px)),
                Value::Number(SassNumber::single(5.0, Unit::Px)),
            ],
            span(),
        )
        .unwrap();
        assert_eq!(result, Value::Number(SassNumber::single(15.0, Unit::Px)));
    }

    #[test]
    fn round_nearest_zero_step_is_nan() {
        let result = Calculation::round(
            vec![
                Value::Number(SassNumber::single(13.0, Unit::Px)),
                Value::Number(SassNumber::single(0.0, Unit::Px)),
            ],
            span(),
        )
        .unwrap();
        match result {
            Value::Number(n) => assert!(n.value().is_nan()),
            _ => panic!("expected Number"),
        }
    }

    #[test]
    fn quoted_string_cannot_be_used_in_calculation() {
        let err = simplify_argument(Value::String(SassString::new("x", true)), span());
        assert!(err.is_err());
    }

    #[test]
    fn nested_calc_unwraps_single_argument() {
        let inner = Calculation::calc(Value::Number(SassNumber::unitless(1.0)), span()).unwrap();
        // calc() of a Number reduces directly, so re-wrapping it is a no-op.
        let outer = Calculation::calc(inner, span()).unwrap();
        assert_eq!(outer, Value::Number(SassNumber::unitless(1.0)));
    }

    #[test]
    fn operate_add_reduces_numbers() {
        let result = Calculation::operate(
            CalcOp::Add,
            Value::Number(SassNumber::unitless(1.0)),
            Value::Number(SassNumber::unitless(2.0)),
            span(),
        )
        .unwrap();
        assert_eq!(result, Value::Number(SassNumber::unitless(3.0)));
    }

    #[test]
    fn simplification_is_idempotent() {
        let first = Calculation::min(
            vec![
                Value::Number(SassNumber::single(3.0, Unit::Px)),
                Value::Number(SassNumber::single(7.0, Unit::Px)),
            ],
            span(),
        )
        .unwrap();
        if let Value::Calculation(c) = &first {
            let args: Vec<Value> = c
                .arguments()
                .iter()
                .map(|n| match n {
                    CalcNode::Number(num) => Value::Number(num.clone()),
                    _ => panic!("expected numbers"),
                })
                .collect();
            let second = Calculation::min(args, span()).unwrap();
            assert_eq!(first, second);
        } else {
            panic!("expected wrapped calculation");
        }
    }
}
