//! Core types for companion.

pub mod message;
pub mod stream;

pub use message::*;
pub use stream::*;
