pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requester does not own the transcript (or, for sharing, the
    /// transcript does not exist).
    #[error("unauthorized")]
    Unauthorized,

    /// No transcript stored under the given id.
    #[error("chat not found")]
    NotFound,

    /// A conversation without a user message cannot be persisted; there is
    /// nothing to derive a title from.
    #[error("conversation has no user message")]
    NoUserMessage,

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}
