//! Observable per-session call state.

use std::sync::Mutex;
use uuid::Uuid;

/// Snapshot of the session's lifecycle state.
///
/// Invariants: `idle` is false for the whole interval between call start and
/// that call's terminal event, and true otherwise; `text` is reset to empty
/// at the start of every call before any bytes are appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallState {
    /// Accumulated response text, republished after every chunk in
    /// streaming mode.
    pub text: String,
    /// False while a call is in flight.
    pub idle: bool,
    /// Error text of the last failed call, if any.
    pub error: Option<String>,
    /// Correlation id captured from the gateway's response header.
    pub call_id: String,
}

impl Default for CallState {
    fn default() -> Self {
        Self {
            text: String::new(),
            idle: true,
            error: None,
            call_id: String::new(),
        }
    }
}

/// Shared cell holding the session state plus the current-call marker.
///
/// Each call gets an opaque id at start. Writers pass their id back in and
/// are ignored once superseded by a newer call, so an overlapping call cannot
/// clobber the state its successor owns (last-writer-ignored-if-superseded).
#[derive(Debug, Default)]
pub struct CallStateCell {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    state: CallState,
    current: Uuid,
}

impl CallStateCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CallState {
        self.lock().state.clone()
    }

    /// Reset the state for a fresh call and install it as current.
    ///
    /// This is the observable "call started" signal: text cleared, idle
    /// lowered, previous error and correlation id discarded.
    pub fn begin_call(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut inner = self.lock();
        inner.current = id;
        inner.state = CallState {
            idle: false,
            ..CallState::default()
        };
        id
    }

    /// Record the correlation id reported by the gateway.
    pub(crate) fn set_call_id(&self, call: Uuid, correlation_id: &str) {
        let mut inner = self.lock();
        if inner.current == call {
            inner.state.call_id = correlation_id.to_string();
        }
    }

    /// Publish the accumulated text. Returns false if the call was superseded.
    pub(crate) fn publish_text(&self, call: Uuid, text: &str) -> bool {
        let mut inner = self.lock();
        if inner.current != call {
            return false;
        }
        inner.state.text = text.to_string();
        true
    }

    /// Finalize a call: restore idle, optionally set the final text and the
    /// error field. Returns false if the call was superseded, in which case
    /// nothing is written.
    pub(crate) fn finish(
        &self,
        call: Uuid,
        final_text: Option<&str>,
        error: Option<&str>,
    ) -> bool {
        let mut inner = self.lock();
        if inner.current != call {
            return false;
        }
        if let Some(text) = final_text {
            inner.state.text = text.to_string();
        }
        inner.state.error = error.map(str::to_string);
        inner.state.idle = true;
        true
    }

    /// Optimistically restore idle without touching text or error.
    ///
    /// Used by `stop()`; the read loop performs its own finalization later.
    pub(crate) fn force_idle(&self) {
        self.lock().state.idle = true;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_call_resets_state() {
        let cell = CallStateCell::new();
        let call = cell.begin_call();
        cell.publish_text(call, "partial");
        cell.finish(call, Some("done"), Some("boom"));

        let next = cell.begin_call();
        let state = cell.snapshot();
        assert_eq!(state.text, "");
        assert!(!state.idle);
        assert_eq!(state.error, None);
        assert_eq!(state.call_id, "");
        assert_ne!(call, next);
    }

    #[test]
    fn superseded_writer_is_ignored() {
        let cell = CallStateCell::new();
        let old = cell.begin_call();
        let _new = cell.begin_call();

        assert!(!cell.publish_text(old, "stale"));
        assert!(!cell.finish(old, Some("stale"), None));

        let state = cell.snapshot();
        assert_eq!(state.text, "");
        assert!(!state.idle, "newer call is still in flight");
    }
}
