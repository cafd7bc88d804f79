//! The two error kinds a SassScript value operation can produce (spec §7).
//!
//! [`SassError`] is the user-visible `ScriptException`: every assertion,
//! unit mismatch, out-of-range index, or disallowed operator combination
//! raises one of these. It carries a message and the [`codemap::Span`] the
//! evaluator associates with the offending expression, mirroring the
//! `(message, span).into()` idiom used throughout the teacher crate.
//!
//! [`ArgumentError`] is a programmer error — API misuse such as calling a
//! variadic calculation constructor with zero arguments. It is fatal and
//! is expressed as a panic rather than a `Result`, since callers are not
//! expected to recover from it.

use std::fmt;

use codemap::Span;

/// A user-visible Sass error: `"$name: message"` when `name` is set, else
/// just `message`.
#[derive(Debug, Clone)]
pub struct SassError {
    message: String,
    span: Span,
    name: Option<&'static str>,
}

impl SassError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            name: None,
        }
    }

    /// Tag this error with the name of the argument that caused it, so it
    /// renders as `"$name: message"` per spec §7.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn argument_name(&self) -> Option<&'static str> {
        self.name
    }
}

impl fmt::Display for SassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "${}: {}", name, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for SassError {}

impl From<(String, Span)> for Box<SassError> {
    fn from((message, span): (String, Span)) -> Self {
        Box::new(SassError::new(message, span))
    }
}

impl From<(&str, Span)> for Box<SassError> {
    fn from((message, span): (&str, Span)) -> Self {
        Box::new(SassError::new(message.to_owned(), span))
    }
}

impl From<(String, &'static str, Span)> for Box<SassError> {
    fn from((message, name, span): (String, &'static str, Span)) -> Self {
        Box::new(SassError::new(message, span).with_name(name))
    }
}

/// The result type returned by every fallible operation in this crate.
pub type SassResult<T> = Result<T, Box<SassError>>;

/// A programmer error: calling a constructor outside its declared
/// contract (e.g. `Calculation::min` with zero arguments). Unlike
/// [`SassError`] this is never meant to be caught by a Sass `@error`/`@catch`
/// boundary — it indicates the host embedding is misusing the API.
#[derive(Debug, Clone)]
pub struct ArgumentError {
    message: String,
}

impl ArgumentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Panics with this error's message. Call sites that violate a
    /// constructor's documented precondition should use this rather than
    /// attempt to recover.
    pub fn raise(&self) -> ! {
        panic!("ArgumentError: {}", self.message)
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgumentError: {}", self.message)
    }
}

impl std::error::Error for ArgumentError {}
