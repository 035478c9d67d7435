//! Per-session gateway client.
//!
//! Developer-friendly goal: keep the public surface small and predictable.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod cancel;
pub mod core;
pub mod options;
pub mod state;

pub use builder::GatewayClientBuilder;
pub use cancel::{cancel_pair, CancelHandle, CancelReceiver};
pub use core::{GatewayClient, SendOutcome};
pub use options::{CompletionCallback, ErrorCallback, SendOptions};
pub use state::{CallState, CallStateCell};
