use thiserror::Error;

/// Errors surfaced by the chat client core.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid origin '{origin}': {source}")]
    InvalidOrigin {
        origin: String,
        #[source]
        source: url::ParseError,
    },

    #[error("origin scheme '{0}' cannot host a chat connection")]
    UnsupportedScheme(String),

    #[error("origin '{0}' has no host")]
    MissingHost(String),

    #[error("connection is not open")]
    NotOpen,

    #[error("connection task has shut down")]
    ConnectionGone,

    #[error("unknown client profile '{0}' (expected full, plain or newest-first)")]
    UnknownProfile(String),

    #[error("failed to read profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse profile: {0}")]
    Json(#[from] serde_json::Error),
}
