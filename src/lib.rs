//! # textgate
//!
//! Streaming client runtime for a hosted text-generation gateway.
//!
//! ## Overview
//!
//! This library mediates one request/response exchange at a time with a remote
//! text-generation service: it assembles a JSON payload, issues a single POST
//! over a long-lived connection, and incrementally decodes the response body
//! into an observable, cancelable text value with well-defined error and
//! completion semantics.
//!
//! ## Core pieces
//!
//! - **[`GatewayClient`]**: the per-session entry point. [`GatewayClient::send`]
//!   builds the request and starts consumption; [`GatewayClient::stop`] triggers
//!   cooperative cancellation.
//! - **[`stream::StreamConsumer`]**: the read loop over the response body. It
//!   decodes bytes with a stateful UTF-8 decoder, accumulates the full result,
//!   republishes partial text after every chunk, detects the in-band error
//!   sentinel, and finalizes the call state exactly once.
//! - **[`CallState`]**: the only mutable entity: accumulated text, idle flag,
//!   last error, last correlation id. One per session, reset at every call start.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use textgate::{GatewayClient, SendOptions};
//!
//! #[tokio::main]
//! async fn main() -> textgate::Result<()> {
//!     let client = GatewayClient::builder()
//!         .project_id("my-project")
//!         .build()?;
//!
//!     let options = SendOptions::new("Hello, how are you?")
//!         .on_complete(|text| println!("{text}"));
//!
//!     client.send(options).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod request;
pub mod stream;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{cancel_pair, CancelHandle, CancelReceiver};
pub use client::{CallState, CallStateCell};
pub use client::{GatewayClient, GatewayClientBuilder, SendOptions, SendOutcome};
pub use config::{resolve_config, Customer, GatewayConfig, DEFAULT_ENDPOINT};
pub use types::{DataItem, Message, MessageRole};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::Error;
