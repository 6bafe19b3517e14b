//! Session state.

pub mod registry;
pub mod store;

pub use registry::SessionRegistry;
pub use store::{SessionId, SessionStore};
