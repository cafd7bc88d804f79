//! The SassScript value system: the in-memory representation of every
//! value that flows through a Sass evaluator, together with the algebra
//! defined over those values — dimensional numbers and their unit
//! conversion, RGB/HSL colors, Unicode-aware strings, ordered
//! lists/maps/argument lists, callable handles, and the `calc()`
//! sub-language.
//!
//! This crate is deliberately narrow: it has no parser, no evaluator, no
//! byte-for-byte CSS emitter, and no file I/O. An embedding evaluator
//! constructs values through the constructors in [`value`], composes
//! them through [`value::Value`]'s operator methods, and reaches into
//! variant-specific behavior through [`visitor::Visitor`].

pub mod error;
pub mod fuzzy;
pub mod unit;
pub mod value;
pub mod visitor;
pub mod warning;

pub use error::{ArgumentError, SassError, SassResult};
pub use value::Value;
