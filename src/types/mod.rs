//! Wire-level value types shared by the request payload.

pub mod message;

pub use message::{DataItem, Message, MessageRole};
