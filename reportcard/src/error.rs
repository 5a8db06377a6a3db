//! Process-level error type

use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Process-level error
///
/// Request handlers use [`ApiError`](crate::handlers::ApiError); this type
/// covers startup (configuration, binding, store setup) and anything else
/// that has to bubble up to `main`.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Store setup or access failed
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
