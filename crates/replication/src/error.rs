//! Error types for replica placement.

/// Result type alias for the replication crate.
pub type Result<T> = std::result::Result<T, ReplicationError>;

/// Errors surfaced to callers of the replica selector.
///
/// Running short of valid candidates is not an error; see
/// [`Selection::is_degraded`](crate::Selection::is_degraded).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplicationError {
    /// The candidate pool holds no endpoints at all.
    #[error("candidate pool is empty")]
    EmptyPool,
    /// Selector configuration is unusable.
    #[error("invalid selector config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Core(#[from] corelib::Error),
}
