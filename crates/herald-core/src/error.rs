//! Error types for herald-core.

use thiserror::Error;

/// Result type alias for herald-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while building outgoing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The event subject is neither a thread nor a registered entity type.
    #[error("cannot build message, unsupported entity type: {0}")]
    UnsupportedSubject(String),

    /// Thread dispatch produced an empty header or an empty body.
    #[error("unable to build message for {thread_type} thread on {event_type} event")]
    MessageConstructionFailed {
        thread_type: String,
        event_type: String,
    },

    /// Entity lookup returned nothing.
    #[error("{entity_type} not found: {reference}")]
    EntityNotFound {
        entity_type: String,
        reference: String,
    },

    /// Thread lookup returned nothing.
    #[error("thread not found: {0}")]
    ThreadNotFound(String),

    /// Any other failure reported by a lookup collaborator.
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// An `about` link that is not `<#E::type::fqn>` shaped.
    #[error("invalid entity link: {0}")]
    InvalidEntityLink(String),

    /// Channel name that no rendering profile exists for.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
}

impl CoreError {
    /// Whether this error means the subject could not be found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::EntityNotFound { .. } | Self::ThreadNotFound(_))
    }
}
