//! HTTP transport over reqwest.

pub mod http;

pub use http::{HttpTransport, TransportError, CALL_ID_HEADER};
