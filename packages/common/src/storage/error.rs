use thiserror::Error;

/// Errors that can occur while publishing assets.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Store identity or credentials are missing. Raised before any I/O.
    #[error("asset store configuration error: {0}")]
    Configuration(String),

    /// The asset path is empty, absolute, or escapes its directory.
    #[error("invalid asset path: {0}")]
    InvalidPath(String),

    /// The metadata read answered with a body that is not file metadata.
    #[error("malformed asset store response: {0}")]
    MalformedResponse(String),

    /// The write was rejected by the remote store.
    #[error("asset store responded with status {status}: {body}")]
    RemoteWrite { status: u16, body: String },

    /// The version token precondition did not hold for this path.
    #[error("version token mismatch for {path}")]
    Conflict { path: String },

    #[error("asset store transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
