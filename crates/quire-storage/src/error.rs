use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("storage API returned {status}: {message}")]
    Space { status: u16, message: String },

    #[error("storage API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected storage API response: {0}")]
    Response(String),

    #[error("storage configuration error: {0}")]
    Config(String),
}
