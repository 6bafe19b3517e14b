//! Error classification used to route recovery.

/// Broad error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or rejected credential. Fatal at startup.
    Auth,
    /// The completion service failed for one turn. Recovered with the
    /// fallback assistant message.
    Request,
    /// A settings draft or message was rejected. Prior state is kept.
    Validation,
    /// Local configuration or I/O trouble (e.g. writing an export).
    Local,
}
