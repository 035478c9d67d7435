use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::header::CONTENT_TYPE;
use std::env;
use std::time::Duration;

/// Response header carrying the gateway's per-call correlation id
/// (`x-callId` on the wire; header names are case-insensitive).
pub const CALL_ID_HEADER: &str = "x-callid";

#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Result<Self> {
        url::Url::parse(endpoint)
            .map_err(|e| Error::configuration(format!("invalid endpoint URL {endpoint:?}: {e}")))?;

        // Minimal production-friendly defaults (env-overridable). No overall
        // request timeout: the response body is a long-lived stream and the
        // core enforces no deadline of its own; cancellation is the caller's
        // lever against a hung read.
        let connect_timeout_secs = env::var("TEXTGATE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .pool_max_idle_per_host(
                env::var("TEXTGATE_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(
                env::var("TEXTGATE_POOL_IDLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(90),
            )))
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Issue the single POST that starts a call.
    ///
    /// The body is already-serialized JSON, but the gateway expects a
    /// `text/plain` content type (the payload is opaque to intermediaries).
    pub async fn post_stream(&self, body: String) -> Result<reqwest::Response> {
        self.client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))
    }

    /// Convert a response into the unified byte stream consumed by the read loop.
    pub fn into_byte_stream(resp: reqwest::Response) -> BoxStream<'static, Bytes> {
        let byte_stream = resp
            .bytes_stream()
            .map_err(|e| Error::Transport(TransportError::Http(e)));
        Box::pin(byte_stream)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
