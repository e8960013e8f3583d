use thiserror::Error;

/// Errors reported by the navigation engines.
///
/// Recoverable conditions that callers are expected to branch on (a trigger
/// sequence that conflicts with an existing registration, a tree insertion
/// that violates a structural invariant) are reported as boolean outcomes at
/// their call sites, not as errors. This enum covers the rest.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// An element id could not be resolved through the query engine.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// A state-machine call was made from a state that does not permit it.
    ///
    /// This indicates a bug in the caller, not a runtime failure.
    #[error("invalid state transition: {0}")]
    InvalidState(String),

    /// A caller-supplied argument was rejected (e.g. an empty hint alphabet).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Listener construction found nothing to match against.
    #[error("no trigger sequences could be registered")]
    NoSequencesRegistered,

    /// The input event source failed to enable or deliver events.
    #[error("event source error: {0}")]
    EventSource(String),

    /// A background task or runtime facility failed.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, NavigationError>;
