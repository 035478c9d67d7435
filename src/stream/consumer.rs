//! Read-loop state machine over one response body.
//!
//! States: `Reading` (initial), then exactly one of `Completed`, `Aborted`
//! or `Errored`. No transition leaves a terminal state, and finalization
//! runs exactly once per call.

use crate::client::options::{CompletionCallback, ErrorCallback};
use crate::client::{CallStateCell, CancelReceiver};
use crate::stream::decode::Utf8StreamDecoder;
use crate::BoxStream;
use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;
use uuid::Uuid;

/// In-band literal marking the remainder of the stream as a server-reported
/// error rather than generated content. Matched against the accumulated text
/// as a whole, not against individual chunks.
pub const ERROR_SENTINEL: &str = "Error:";

/// Terminal state of one read loop.
#[derive(Debug)]
enum Terminal {
    Completed,
    Aborted,
    Errored(String),
}

/// Drives decode/accumulate/publish/terminate for one response body.
///
/// One instance per call. The consumer writes to the shared [`CallStateCell`]
/// only while its call id is still the current one; a superseded consumer
/// finishes silently without publishing or firing callbacks.
pub struct StreamConsumer {
    state: Arc<CallStateCell>,
    call: Uuid,
    cancel: CancelReceiver,
    streaming: bool,
    on_complete: Option<CompletionCallback>,
    on_error: Option<ErrorCallback>,
}

impl StreamConsumer {
    pub fn new(
        state: Arc<CallStateCell>,
        call: Uuid,
        cancel: CancelReceiver,
        streaming: bool,
    ) -> Self {
        Self {
            state,
            call,
            cancel,
            streaming,
            on_complete: None,
            on_error: None,
        }
    }

    pub fn on_complete(mut self, callback: CompletionCallback) -> Self {
        self.on_complete = Some(callback);
        self
    }

    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Run the loop to a terminal state and return the accumulated text.
    ///
    /// Transition priority on each iteration: cancellation, then chunk
    /// decode + sentinel check, then publish. The sentinel check wins over
    /// end-of-stream when both are true on the final chunk.
    pub async fn run(mut self, mut body: BoxStream<'static, Bytes>) -> String {
        let mut decoder = Utf8StreamDecoder::new();
        let mut text = String::new();

        let terminal = loop {
            if self.cancel.is_cancelled() {
                break Terminal::Aborted;
            }

            let chunk = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break Terminal::Aborted,
                chunk = body.next() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => {
                    text.push_str(&decoder.decode(&bytes));
                    if let Some(message) = sentinel_message(&text) {
                        break Terminal::Errored(message);
                    }
                    if self.streaming {
                        self.state.publish_text(self.call, &text);
                    }
                }
                Some(Err(e)) => {
                    // A transport error surfaced by our own cancellation is
                    // an abort, not a failure.
                    if self.cancel.is_cancelled() {
                        break Terminal::Aborted;
                    }
                    break Terminal::Errored(e.to_string());
                }
                None => {
                    text.push_str(&decoder.flush());
                    if let Some(message) = sentinel_message(&text) {
                        break Terminal::Errored(message);
                    }
                    break Terminal::Completed;
                }
            }
        };

        // Dropping the body releases the connection; on abort and error
        // paths this is what cancels the underlying transfer.
        drop(body);
        self.finalize(terminal, text)
    }

    fn finalize(self, terminal: Terminal, text: String) -> String {
        // On completion the final text is always published. On abort and
        // error, streaming mode has already published everything that may be
        // shown (in particular, nothing at or past the sentinel), so only
        // non-streaming mode still needs its accumulated text written out to
        // keep the state in step with the returned value.
        let final_text = match &terminal {
            Terminal::Completed => Some(text.as_str()),
            Terminal::Aborted | Terminal::Errored(_) if !self.streaming => Some(text.as_str()),
            Terminal::Aborted | Terminal::Errored(_) => None,
        };
        let still_current = match &terminal {
            Terminal::Errored(message) => self.state.finish(self.call, final_text, Some(message)),
            Terminal::Completed | Terminal::Aborted => {
                self.state.finish(self.call, final_text, None)
            }
        };

        if !still_current {
            tracing::debug!(call = %self.call, "superseded call finished silently");
            return text;
        }

        match &terminal {
            Terminal::Completed => {
                tracing::debug!(call = %self.call, chars = text.len(), "stream completed");
            }
            Terminal::Aborted => {
                tracing::debug!(call = %self.call, "stream aborted by caller");
            }
            Terminal::Errored(message) => {
                tracing::warn!(call = %self.call, error = %message, "stream errored");
                if let Some(callback) = self.on_error {
                    callback(message);
                }
            }
        }

        if let Some(callback) = self.on_complete {
            callback(&text);
        }
        text
    }
}

/// Extract the server error message if the accumulated text starts with the
/// sentinel. The remainder is stripped of leading formatting.
fn sentinel_message(text: &str) -> Option<String> {
    text.strip_prefix(ERROR_SENTINEL)
        .map(|rest| rest.trim_start().to_string())
}
