use crate::client::cancel::{cancel_pair, CancelHandle};
use crate::client::options::{ErrorCallback, SendOptions};
use crate::client::state::{CallState, CallStateCell};
use crate::client::GatewayClientBuilder;
use crate::config::{resolve_config, GatewayConfig};
use crate::request::StreamRequest;
use crate::stream::StreamConsumer;
use crate::transport::{HttpTransport, CALL_ID_HEADER};
use crate::{Error, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Result of [`GatewayClient::send`].
#[derive(Debug)]
pub enum SendOutcome {
    /// Streaming call started; the handle resolves to the final accumulated
    /// text once the read loop terminates. Production callers typically watch
    /// the live [`CallState`] instead of awaiting it.
    Streaming(JoinHandle<String>),
    /// Non-streaming call fully consumed; this is the assembled final text.
    Complete(String),
    /// The call failed before a response body was available. Details are in
    /// [`CallState::error`] and were reported to the error callback.
    Failed,
}

impl SendOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, SendOutcome::Failed)
    }
}

/// Per-session client for the text-generation gateway.
///
/// Owns the session's [`CallState`]; one call is expected to be in flight at
/// a time. A call started while a previous one is still running supersedes
/// it: the older call's consumer finishes silently without publishing.
#[derive(Debug)]
pub struct GatewayClient {
    config: GatewayConfig,
    transport: HttpTransport,
    state: Arc<CallStateCell>,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.endpoint)?;
        Ok(Self {
            config,
            transport,
            state: Arc::new(CallStateCell::new()),
        })
    }

    /// Build a client from the two possible configuration sources; ambient
    /// configuration wins when both are present.
    pub fn from_sources(
        ambient: Option<GatewayConfig>,
        explicit: Option<GatewayConfig>,
    ) -> Result<Self> {
        Self::new(resolve_config(ambient, explicit)?)
    }

    pub fn builder() -> GatewayClientBuilder {
        GatewayClientBuilder::new()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Snapshot of the session's lifecycle state.
    pub fn state(&self) -> CallState {
        self.state.snapshot()
    }

    pub fn is_idle(&self) -> bool {
        self.state.snapshot().idle
    }

    /// Issue one call against the gateway.
    ///
    /// Returns `Err` only for an empty prompt; every call-local failure
    /// (transport, non-2xx, sentinel) resolves to [`SendOutcome::Failed`] or
    /// is reported through the call state and callbacks, never as `Err`.
    pub async fn send(&self, mut options: SendOptions) -> Result<SendOutcome> {
        if options.prompt.trim().is_empty() {
            return Err(Error::validation("prompt must be non-empty"));
        }

        // Observable "call started" signal: state reset before the network
        // call is made.
        let call = self.state.begin_call();

        let payload = StreamRequest::from_parts(&self.config, &options);
        let on_complete = options.on_complete.take();
        let on_error = options.on_error.take();
        // Keep the handle alive for the duration of send(); a fresh pair is
        // never cancelled unless the caller took a clone beforehand.
        let (_cancel_handle, cancel_rx) = match options.cancel.take() {
            Some(handle) => {
                let rx = handle.subscribe();
                (handle, rx)
            }
            None => cancel_pair(),
        };

        let body = match serde_json::to_string(&payload) {
            Ok(body) => body,
            Err(e) => return Ok(self.fail_call(call, e.to_string(), on_error)),
        };

        tracing::debug!(
            project = %self.config.project_id,
            stream = options.stream,
            service = options.service.as_deref().unwrap_or("<load-balanced>"),
            "issuing generation request"
        );

        let response = match self.transport.post_stream(body).await {
            Ok(response) => response,
            Err(e) => return Ok(self.fail_call(call, e.to_string(), on_error)),
        };

        let status = response.status();
        if !status.is_success() {
            // Do not read the body of a failed response.
            let message = Error::Remote { status }.to_string();
            return Ok(self.fail_call(call, message, on_error));
        }

        let correlation_id = response
            .headers()
            .get(CALL_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        self.state.set_call_id(call, &correlation_id);

        let byte_stream = HttpTransport::into_byte_stream(response);
        let mut consumer = StreamConsumer::new(self.state.clone(), call, cancel_rx, options.stream);
        if let Some(callback) = on_complete {
            consumer = consumer.on_complete(callback);
        }
        if let Some(callback) = on_error {
            consumer = consumer.on_error(callback);
        }

        if options.stream {
            Ok(SendOutcome::Streaming(tokio::spawn(
                consumer.run(byte_stream),
            )))
        } else {
            Ok(SendOutcome::Complete(consumer.run(byte_stream).await))
        }
    }

    /// Trigger the handle's cancellation signal and optimistically restore
    /// idle; the read loop performs its own cleanup asynchronously.
    pub fn stop(&self, handle: &CancelHandle) {
        handle.cancel();
        self.state.force_idle();
    }

    fn fail_call(&self, call: Uuid, message: String, on_error: Option<ErrorCallback>) -> SendOutcome {
        tracing::warn!(call = %call, error = %message, "call failed before stream consumption");
        let still_current = self.state.finish(call, None, Some(&message));
        if still_current {
            if let Some(callback) = on_error {
                callback(&message);
            }
        }
        SendOutcome::Failed
    }
}
