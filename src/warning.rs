//! The single observable side channel in this crate (spec §5, §6):
//! deprecation notices raised from deep inside value construction, with
//! nowhere else to go since this layer has no logger of its own.
//!
//! The teacher carries no `log`/`tracing` dependency anywhere in the
//! retrieved sources — its only comparable seam is
//! `Visitor::emit_warning(message, span)`, invoked from the handful of
//! deprecation sites the language defines. This is that seam's
//! evaluator-independent shape: a trait object the host installs, called
//! only from [`crate::value::Calculation::abs`].

/// Which deprecated behavior triggered a warning, so a host can filter
/// or silence specific ones (mirrors the teacher's per-site deprecation
/// identifiers without requiring a string comparison).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeprecationKind {
    /// Passing a `%` number to the global `abs()` function.
    AbsPercent,
}

/// Installed by the host to receive deprecation notices. Must be a
/// best-effort, non-blocking call (spec §5).
pub trait WarningSink {
    fn emit(&self, message: &str, kind: DeprecationKind);
}

/// A sink that discards every warning, for callers that don't care.
pub struct NullWarningSink;

impl WarningSink for NullWarningSink {
    fn emit(&self, _message: &str, _kind: DeprecationKind) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingSink {
        messages: RefCell<Vec<(String, DeprecationKind)>>,
    }

    impl WarningSink for RecordingSink {
        fn emit(&self, message: &str, kind: DeprecationKind) {
            self.messages.borrow_mut().push((message.to_owned(), kind));
        }
    }

    #[test]
    fn null_sink_accepts_without_panicking() {
        NullWarningSink.emit("whatever", DeprecationKind::AbsPercent);
    }

    #[test]
    fn recording_sink_captures_message_and_kind() {
        let sink = RecordingSink {
            messages: RefCell::new(Vec::new()),
        };
        sink.emit("abs of percentage is deprecated", DeprecationKind::AbsPercent);
        let messages = sink.messages.borrow();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].1, DeprecationKind::AbsPercent);
    }
}
