//! Repository error model.

use thiserror::Error;

/// Result type used across every repository contract.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository-level error.
///
/// Callers of the public contracts only ever observe these variants. Internal
/// coordination (e.g. compare-and-swap retries in the in-memory store) never
/// surfaces as an error.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// An input was rejected before any mutation was attempted
    /// (invalid entity, invalid identity value, bad seed data).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An entity with the same identity value is already stored.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// No entity is stored under the requested identity value.
    #[error("not found: {0}")]
    NotFound(String),

    /// Opaque failure raised by a wrapped collaborator (a persistent backend,
    /// a remote mirror, ...).
    #[error("underlying failure: {0}")]
    Underlying(#[from] anyhow::Error),
}

/// Fieldless discriminant of [`RepositoryError`].
///
/// Used wherever errors are filtered by category rather than by value
/// (catch decorators, diagnostics).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    AlreadyExists,
    NotFound,
    Underlying,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Underlying => "underlying",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RepositoryError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Wrap any collaborator error as an opaque failure.
    pub fn underlying<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Underlying(anyhow::Error::new(err))
    }

    /// Build an opaque failure from a plain message.
    pub fn underlying_msg(msg: impl core::fmt::Display) -> Self {
        Self::Underlying(anyhow::anyhow!("{msg}"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            RepositoryError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            RepositoryError::NotFound(_) => ErrorKind::NotFound,
            RepositoryError::Underlying(_) => ErrorKind::Underlying,
        }
    }
}
