// ============================================================================
// spark-models - Errors
// ============================================================================

use thiserror::Error;

/// Boxed error returned by fallible listeners.
pub type BoxError = Box<dyn std::error::Error + 'static>;

/// Errors surfaced by models, collections and event dispatch.
#[derive(Debug, Error)]
pub enum Error {
    /// A constructor was handed a value of the wrong shape.
    #[error("{0}")]
    InvalidArgument(String),

    /// A listener failed while `event` was being dispatched.
    #[error("listener for `{event}` failed: {source}")]
    Listener {
        event: String,
        #[source]
        source: BoxError,
    },
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// The event whose dispatch failed, if this is a listener error.
    pub fn event(&self) -> Option<&str> {
        match self {
            Error::Listener { event, .. } => Some(event),
            Error::InvalidArgument(_) => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// =============================================================================
// TESTS
// =============================================================================
