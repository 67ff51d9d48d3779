//! Error taxonomy shared by every layer.

use thiserror::Error;

/// Errors produced while inspecting, building or executing document operations.
///
/// The core never recovers from these; they travel up to the HTTP layer,
/// which turns each variant into a status code and a short message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdminError {
    /// Malformed or empty input: empty predicate, unknown column, bad pagination.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced table does not exist in the catalog.
    #[error("not found: {0}")]
    NotFound(String),

    /// The database rejected the statement. Carries a summary, never the raw driver text.
    #[error("query failed: {0}")]
    Query(String),

    /// The database could not be reached or the pool is exhausted.
    #[error("database unavailable: {0}")]
    Unavailable(String),

    /// Caller is not authenticated as the admin.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request conflicts with existing state (e.g. a taken username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AdminError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
