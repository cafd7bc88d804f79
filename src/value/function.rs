//! Function and mixin handles (spec §3, §4.8).
//!
//! A `Callable` is opaque to this crate — the host embedding owns its
//! contents (an AST node, a closure over a `Scope`, whatever the
//! evaluator uses) and only ever asks us to compare or hash it by
//! identity, the same "compile-context token" pattern the teacher's
//! `UserDefinedCallable`/`CallableContentBlock` types carry via `Arc`
//! pointer identity (`saolof-grass/src/parse/visitor.rs`).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use codemap::Span;

use crate::error::SassResult;

/// An opaque, identity-compared handle the host attaches to `Function`
/// and `Mixin` values. The core never inspects its contents.
#[derive(Clone)]
pub struct Callable(Arc<dyn std::any::Any + Send + Sync>);

impl Callable {
    pub fn new<T: std::any::Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: std::any::Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    fn ptr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr() == other.ptr()
    }
}

impl Eq for Callable {}

impl Hash for Callable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr().hash(state);
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({:p})", self.ptr())
    }
}

/// An opaque per-compilation token, so a `Function`/`Mixin` captured
/// during one compilation can be rejected if invoked during another
/// (spec §3, §9 "Compile context").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompileContext(pub u64);

macro_rules! callable_handle {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            handle: Callable,
            name: Arc<str>,
            compile_context: Option<CompileContext>,
        }

        impl $name {
            pub fn new(name: impl Into<Arc<str>>, handle: Callable) -> Self {
                Self {
                    handle,
                    name: name.into(),
                    compile_context: None,
                }
            }

            pub fn with_compile_context(
                name: impl Into<Arc<str>>,
                handle: Callable,
                compile_context: CompileContext,
            ) -> Self {
                Self {
                    handle,
                    name: name.into(),
                    compile_context: Some(compile_context),
                }
            }

            pub fn name(&self) -> &str {
                &self.name
            }

            pub fn handle(&self) -> &Callable {
                &self.handle
            }

            /// Returns `self` if this callable has no recorded compile
            /// context or it matches `current`; otherwise raises.
            pub fn assert_compile_context(
                &self,
                current: CompileContext,
                span: Span,
            ) -> SassResult<&Self> {
                match self.compile_context {
                    Some(token) if token != current => Err((
                        format!("{} does not belong to current compilation.", $kind),
                        span,
                    )
                        .into()),
                    _ => Ok(self),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.handle == other.handle
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.handle.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name)
            }
        }
    };
}

callable_handle!(SassFunction, "Function");
callable_handle!(SassMixin, "Mixin");

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
    fn equality_is_handle_identity() {
        let handle = Callable::new(42_i32);
        let a = SassFunction::new("foo", handle.clone());
        let b = SassFunction::new("foo", handle);
        assert_eq!(a, b);

        let other = SassFunction::new("foo", Callable::new(42_i32));
        assert_ne!(a, other);
    }

    #[test]
    fn mismatched_compile_context_raises() {
        let handle = Callable::new(1_i32);
        let f = SassFunction::with_compile_context("foo", handle, CompileContext(1));
        assert!(f.assert_compile_context(CompileContext(2), span()).is_err());
        assert!(f.assert_compile_context(CompileContext(1), span()).is_ok());
    }

    #[test]
    fn no_compile_context_always_matches() {
        let f = SassFunction::new("foo", Callable::new(1_i32));
        assert!(f.assert_compile_context(CompileContext(999), span()).is_ok());
    }
}
