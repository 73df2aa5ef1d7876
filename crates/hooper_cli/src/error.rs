pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("invalid {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error(transparent)]
    Agent(#[from] hooper_agent::Error),

    #[error(transparent)]
    Store(#[from] hooper_store::Error),

    #[error(transparent)]
    Espn(#[from] hooper_espn::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
