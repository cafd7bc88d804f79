//! The `Value` facade (spec §3, §4.10) — the closed, deeply-immutable
//! sum of every SassScript value kind, and the default operator
//! behaviors each variant inherits unless it overrides them.
//!
//! Spec §9's design note translates the source's class hierarchy plus
//! visitor pattern into a tagged sum (this enum) plus a visitor trait
//! (`crate::visitor::Visitor`); operator-overload methods like `plus`
//! become plain functions here rather than living on a superclass.

pub mod arg_list;
pub mod calculation;
pub mod color;
pub mod function;
pub mod list;
pub mod map;
pub mod number;
pub mod string;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use codemap::Span;

use crate::error::SassResult;
use crate::visitor::Visitor;

pub use arg_list::ArgList;
pub use calculation::{CalcNode, CalcOp, Calculation};
pub use color::Color;
pub use function::{Callable, CompileContext, SassFunction, SassMixin};
pub use list::{ListSeparator, SassList};
pub use map::SassMap;
pub use number::SassNumber;
pub use string::SassString;

/// The closed variant set from spec §3: Number, Color, String, List,
/// Map, ArgumentList, Boolean, Null, Function, Mixin, Calculation.
#[derive(Debug, Clone)]
pub enum Value {
    Number(SassNumber),
    Color(Color),
    String(SassString),
    List(SassList),
    Map(SassMap),
    ArgumentList(ArgList),
    Boolean(bool),
    Null,
    Function(SassFunction),
    Mixin(SassMixin),
    Calculation(Arc<Calculation>),
}

impl Value {
    // ---- universal queries ----

    /// Only `false` and `null` are falsy; everything else is truthy
    /// (spec §4.7).
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    /// `null` is blank; an unquoted empty string is blank; everything
    /// else is not (spec §3, §4.7).
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_blank(),
            _ => false,
        }
    }

    /// The list-view contract every Value provides by default (spec
    /// §4.6): scalars act as a length-1 undecided, bracket-free list;
    /// maps act as a comma list of 2-element space lists.
    pub fn as_list(&self) -> SassList {
        match self {
            Value::List(l) => l.clone(),
            Value::ArgumentList(a) => a.as_list().clone(),
            Value::Map(m) => m.as_list(),
            Value::Null => SassList::new(vec![], ListSeparator::Undecided, false),
            other => SassList::new(vec![other.clone()], ListSeparator::Undecided, false),
        }
    }

    pub fn separator(&self) -> ListSeparator {
        self.as_list().separator()
    }

    pub fn has_brackets(&self) -> bool {
        self.as_list().has_brackets()
    }

    /// `self` unless `Null`, matching the source's `realNull` (used by
    /// code paths that want to collapse `Null`-typed results but keep
    /// every other variant, including falsy ones, intact).
    pub fn real_null(&self) -> &Value {
        self
    }

    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Value::Number(n) => visitor.visit_number(n),
            Value::Color(c) => visitor.visit_color(c),
            Value::String(s) => visitor.visit_string(s),
            Value::List(l) => visitor.visit_list(l),
            Value::Map(m) => visitor.visit_map(m),
            Value::ArgumentList(a) => visitor.visit_argument_list(a),
            Value::Boolean(b) => visitor.visit_boolean(*b),
            Value::Null => visitor.visit_null(),
            Value::Function(f) => visitor.visit_function(f),
            Value::Mixin(m) => visitor.visit_mixin(m),
            Value::Calculation(c) => visitor.visit_calculation(c),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Color(_) => "color",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::ArgumentList(_) => "argument list",
            Value::Boolean(_) => "bool",
            Value::Null => "null",
            Value::Function(_) => "function",
            Value::Mixin(_) => "mixin",
            Value::Calculation(_) => "calculation",
        }
    }

    // ---- assertions ----

    pub fn assert_number(&self, span: Span) -> SassResult<&SassNumber> {
        match self {
            Value::Number(n) => Ok(n),
            other => Err((format!("{} is not a number.", other.inspect()), span).into()),
        }
    }

    pub fn assert_color(&self, span: Span) -> SassResult<&Color> {
        match self {
            Value::Color(c) => Ok(c),
            other => Err((format!("{} is not a color.", other.inspect()), span).into()),
        }
    }

    pub fn assert_string(&self, span: Span) -> SassResult<&SassString> {
        match self {
            Value::String(s) => Ok(s),
            other => Err((format!("{} is not a string.", other.inspect()), span).into()),
        }
    }

    pub fn assert_map(&self, span: Span) -> SassResult<&SassMap> {
        match self {
            Value::Map(m) => Ok(m),
            other => Err((format!("{} is not a map.", other.inspect()), span).into()),
        }
    }

    pub fn assert_function(&self, span: Span) -> SassResult<&SassFunction> {
        match self {
            Value::Function(f) => Ok(f),
            other => Err((format!("{} is not a function.", other.inspect()), span).into()),
        }
    }

    pub fn assert_mixin(&self, span: Span) -> SassResult<&SassMixin> {
        match self {
            Value::Mixin(m) => Ok(m),
            other => Err((format!("{} is not a mixin.", other.inspect()), span).into()),
        }
    }

    pub fn assert_calculation(&self, span: Span) -> SassResult<&Arc<Calculation>> {
        match self {
            Value::Calculation(c) => Ok(c),
            other => Err((format!("{} is not a calculation.", other.inspect()), span).into()),
        }
    }

    // ---- operators ----

    pub fn plus(&self, other: &Value, span: Span) -> SassResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.plus(b, span)?)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(a.plus(b.text()))),
            (Value::String(a), other) => Ok(Value::String(a.plus(&other.to_css_string(false)))),
            (Value::Color(_), _) | (_, Value::Color(_)) if !matches!(other, Value::String(_)) => {
                self.undefined_operation("+", other, span)
            }
            _ => Ok(Value::String(SassString::new(
                format!("{}{}", self.to_css_string(false), other.to_css_string(false)),
                false,
            ))),
        }
    }

    pub fn minus(&self, other: &Value, span: Span) -> SassResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.minus(b, span)?)),
            (Value::Color(_), _) | (_, Value::Color(_)) => self.undefined_operation("-", other, span),
            _ => Ok(Value::String(SassString::new(
                format!("{}-{}", self.to_css_string(false), other.to_css_string(false)),
                false,
            ))),
        }
    }

    pub fn times(&self, other: &Value, span: Span) -> SassResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.times(b))),
            _ => self.undefined_operation("*", other, span),
        }
    }

    pub fn divided_by(&self, other: &Value, span: Span) -> SassResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.divided_by(b))),
            (Value::Color(_), _) | (_, Value::Color(_)) => self.undefined_operation("/", other, span),
            _ => Ok(Value::String(SassString::new(
                format!("{}/{}", self.to_css_string(false), other.to_css_string(false)),
                false,
            ))),
        }
    }

    /// No default (spec §4.10): raises unless a variant overrides it.
    pub fn modulo(&self, other: &Value, span: Span) -> SassResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.modulo(b, span)?)),
            _ => self.undefined_operation("%", other, span),
        }
    }

    pub fn unary_plus(&self, _span: Span) -> SassResult<Value> {
        match self {
            Value::Number(n) => Ok(Value::Number(n.unary_plus())),
            other => Ok(Value::String(SassString::new(
                format!("+{}", other.to_css_string(false)),
                false,
            ))),
        }
    }

    pub fn unary_minus(&self, span: Span) -> SassResult<Value> {
        match self {
            Value::Number(n) => Ok(Value::Number(n.unary_minus())),
            other => Ok(Value::String(SassString::new(
                format!("-{}", other.to_css_string(false)),
                false,
            ))),
        }
    }

    pub fn unary_not(&self) -> Value {
        Value::Boolean(!self.is_truthy())
    }

    pub fn and(&self, other: &Value) -> Value {
        if self.is_truthy() {
            other.clone()
        } else {
            self.clone()
        }
    }

    pub fn or(&self, other: &Value) -> Value {
        if self.is_truthy() {
            self.clone()
        } else {
            other.clone()
        }
    }

    pub fn greater_than(&self, other: &Value, span: Span) -> SassResult<bool> {
        self.assert_number(span)?
            .greater_than(other.assert_number(span)?, span)
    }

    pub fn greater_than_or_equals(&self, other: &Value, span: Span) -> SassResult<bool> {
        self.assert_number(span)?
            .greater_than_or_equals(other.assert_number(span)?, span)
    }

    pub fn less_than(&self, other: &Value, span: Span) -> SassResult<bool> {
        self.assert_number(span)?
            .less_than(other.assert_number(span)?, span)
    }

    pub fn less_than_or_equals(&self, other: &Value, span: Span) -> SassResult<bool> {
        self.assert_number(span)?
            .less_than_or_equals(other.assert_number(span)?, span)
    }

    fn undefined_operation(&self, op: &str, other: &Value, span: Span) -> SassResult<Value> {
        Err((
            format!(
                "Undefined operation \"{} {} {}\".",
                self.inspect(),
                op,
                other.inspect()
            ),
            span,
        )
            .into())
    }

    /// `without_slash`/`with_slash` are total, structural, shallow
    /// operations on any Value (spec's supplemental behavior, grounded
    /// in `visitor.rs::without_slash` matching broadly on `Value`): a
    /// no-op for every non-Number variant.
    pub fn without_slash(&self) -> Value {
        match self {
            Value::Number(n) => Value::Number(n.without_slash()),
            other => other.clone(),
        }
    }

    pub fn inspect(&self) -> String {
        self.to_css_string(true)
    }

    /// Renders this value for CSS output (`inspect = false`) or for
    /// diagnostic/debug display (`inspect = true`), per spec §4.10.
    pub fn to_css_string(&self, inspect: bool) -> String {
        match self {
            Value::Number(n) => n.to_css_string(false),
            Value::Color(c) => c.to_css_string(),
            Value::String(s) => {
                if inspect {
                    format!("\"{}\"", s.text().replace('"', "\\\""))
                } else {
                    s.to_css_string()
                }
            }
            Value::List(l) => l.to_string(),
            Value::Map(m) => m.to_string(),
            Value::ArgumentList(a) => a.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_owned(),
            Value::Function(f) => f.name().to_owned(),
            Value::Mixin(m) => m.name().to_owned(),
            Value::Calculation(c) => c.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Color(a), Value::Color(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Mixin(a), Value::Mixin(b)) => a == b,
            (Value::Calculation(a), Value::Calculation(b)) => a == b,
            // Lists, maps, and argument lists all share the list-view
            // equality contract, including "empty list equals empty
            // map" (spec §3).
            (Value::List(_), _) | (_, Value::List(_))
            | (Value::Map(_), _) | (_, Value::Map(_))
            | (Value::ArgumentList(_), _) | (_, Value::ArgumentList(_)) => {
                self.as_list() == other.as_list()
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(&list_like_discriminant(self)).hash(state);
        match self {
            Value::Number(n) => n.hash(state),
            Value::Color(c) => c.hash(state),
            Value::String(s) => s.hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Null => {}
            Value::Function(f) => f.hash(state),
            Value::Mixin(m) => m.hash(state),
            Value::Calculation(c) => {
                c.name().hash(state);
                c.arguments().len().hash(state);
                for arg in c.arguments() {
                    if let Some(n) = arg.as_number() {
                        n.hash(state);
                    }
                }
            }
            Value::List(_) | Value::Map(_) | Value::ArgumentList(_) => {
                self.as_list().hash(state);
            }
        }
    }
}

/// A stable discriminant for list-like variants so their hashes don't
/// depend on which container type produced the same list view (needed
/// because "empty list equals empty map" must also mean "hashes
/// identically").
fn list_like_discriminant(value: &Value) -> ListDiscriminant {
    match value {
        Value::List(_) | Value::Map(_) | Value::ArgumentList(_) => ListDiscriminant::ListLike,
        _ => ListDiscriminant::Scalar,
    }
}

#[derive(Debug)]
enum ListDiscriminant {
    ListLike,
    Scalar,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::Unit;
    use codemap::CodeMap;

    fn span() -> Span {
        let mut map = CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn only_false_and_null_are_falsy() {
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Number(SassNumber::unitless(0.0)).is_truthy());
    }

    #[test]
    fn empty_list_equals_empty_map() {
        let list = Value::List(SassList::new(vec![], ListSeparator::Undecided, false));
        let map = Value::Map(SassMap::new(indexmap::IndexMap::new()));
        assert_eq!(list, map);
    }

    #[test]
    fn scalar_has_length_one_list_view() {
        let n = Value::Number(SassNumber::unitless(5.0));
        assert_eq!(n.as_list().len(), 1);
        assert_eq!(n.as_list().separator(), ListSeparator::Undecided);
    }

    #[test]
    fn equality_is_reflexive_symmetric_transitive() {
        let a = Value::Number(SassNumber::single(1.0, Unit::Px));
        let b = Value::Number(SassNumber::single(1.0, Unit::Px));
        let c = Value::Number(SassNumber::single(1.0, Unit::Px));
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(b, c);
        assert_eq!(a, c);
    }

    #[test]
    fn string_plus_concatenates_css_string() {
        let a = Value::String(SassString::new("foo", true));
        let b = Value::Number(SassNumber::unitless(1.0));
        let result = a.plus(&b, span()).unwrap();
        assert_eq!(result, Value::String(SassString::new("foo1", true)));
    }

    #[test]
    fn modulo_has_no_default_and_raises() {
        let a = Value::Boolean(true);
        let b = Value::Boolean(false);
        assert!(a.modulo(&b, span()).is_err());
    }

    #[test]
    fn color_minus_non_color_raises_undefined_operation() {
        let color = Value::Color(Color::rgb(1, 2, 3, 1.0));
        let number = Value::Number(SassNumber::unitless(1.0));
        assert!(color.minus(&number, span()).is_err());
    }

    #[test]
    fn without_slash_is_a_noop_for_non_numbers() {
        let s = Value::String(SassString::new("foo", true));
        assert_eq!(s.without_slash(), s);
    }
}
