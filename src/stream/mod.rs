//! Response-body consumption: incremental UTF-8 decoding and the read-loop
//! state machine.

pub mod consumer;
pub mod decode;

pub use consumer::{StreamConsumer, ERROR_SENTINEL};
pub use decode::Utf8StreamDecoder;
