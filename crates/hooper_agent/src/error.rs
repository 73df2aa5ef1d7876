pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the transcript management operations.
///
/// Returned as values, never thrown across the orchestrator boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller is anonymous or does not own the transcript.
    #[error("unauthorized")]
    Unauthorized,

    #[error("chat not found")]
    NotFound,

    #[error("storage error: {0}")]
    Store(hooper_store::Error),
}

impl From<hooper_store::Error> for Error {
    fn from(error: hooper_store::Error) -> Self {
        match error {
            hooper_store::Error::Unauthorized => Self::Unauthorized,
            hooper_store::Error::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}
