//! Error types for host surface operations

use thiserror::Error;

/// Errors a host surface may report
///
/// None of these are fatal: callers treat them as "skip this measurement".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The element is no longer attached to the document
    #[error("surface is detached")]
    Detached,

    /// The element exists but cannot be measured right now (e.g. display: none)
    #[error("surface cannot be measured: {0}")]
    Unmeasurable(String),
}

/// Result type for surface operations
pub type Result<T> = std::result::Result<T, SurfaceError>;
