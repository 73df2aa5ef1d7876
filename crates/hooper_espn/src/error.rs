pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network-level failure, including request timeouts.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream returned a non-success status.
    #[error("upstream error: status {status}")]
    Api { status: u16, body: String },

    /// The upstream body did not match the expected schema. The call is
    /// rejected rather than returning partial data.
    #[error("malformed upstream response: {0}")]
    Schema(#[from] serde_json::Error),
}
