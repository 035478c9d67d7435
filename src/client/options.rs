//! Per-call options with documented defaults.

use crate::client::cancel::CancelHandle;
use crate::types::{DataItem, Message};

/// Invoked exactly once per call with the final accumulated text, in every
/// terminal state including error and abort.
pub type CompletionCallback = Box<dyn FnOnce(&str) + Send + 'static>;

/// Invoked at most once per call with the error text.
pub type ErrorCallback = Box<dyn FnOnce(&str) + Send + 'static>;

/// Per-invocation parameter bundle, constructed fresh for each call.
///
/// The prompt is the only value without a default; everything else falls back
/// to: empty history and data, streaming on, caching allowed, server-side
/// routing, no conversation id, a fresh cancellation handle, no callbacks.
pub struct SendOptions {
    pub prompt: String,
    pub messages: Vec<Message>,
    pub data: Vec<DataItem>,
    /// Republish partial text after every chunk when true; when false the
    /// call is awaited and only the final text is returned.
    pub stream: bool,
    pub allow_caching: bool,
    /// Explicit target service; `None` lets the server load-balance.
    pub service: Option<String>,
    pub conversation: Option<String>,
    /// Cancellation handle; a fresh one is created when absent.
    pub cancel: Option<CancelHandle>,
    pub on_complete: Option<CompletionCallback>,
    pub on_error: Option<ErrorCallback>,
}

impl SendOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            messages: Vec::new(),
            data: Vec::new(),
            stream: true,
            allow_caching: true,
            service: None,
            conversation: None,
            cancel: None,
            on_complete: None,
            on_error: None,
        }
    }

    /// Set the conversation history.
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Set auxiliary key/value data items.
    pub fn data(mut self, data: Vec<DataItem>) -> Self {
        self.data = data;
        self
    }

    /// Enable or disable incremental republishing (default: enabled).
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Allow or forbid server-side caching (default: allowed).
    pub fn allow_caching(mut self, allow: bool) -> Self {
        self.allow_caching = allow;
        self
    }

    /// Target a specific service instead of server-side load balancing.
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Attach the call to a conversation.
    pub fn conversation(mut self, conversation: impl Into<String>) -> Self {
        self.conversation = Some(conversation.into());
        self
    }

    /// Supply an external cancellation handle.
    pub fn cancel(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    /// Callback fired exactly once with the final accumulated text.
    pub fn on_complete(mut self, callback: impl FnOnce(&str) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Callback fired at most once with the error text.
    pub fn on_error(mut self, callback: impl FnOnce(&str) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}

impl std::fmt::Debug for SendOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendOptions")
            .field("prompt", &self.prompt)
            .field("messages", &self.messages.len())
            .field("data", &self.data.len())
            .field("stream", &self.stream)
            .field("allow_caching", &self.allow_caching)
            .field("service", &self.service)
            .field("conversation", &self.conversation)
            .field("has_cancel", &self.cancel.is_some())
            .field("has_on_complete", &self.on_complete.is_some())
            .field("has_on_error", &self.on_error.is_some())
            .finish()
    }
}
