use thiserror::Error;

/// Errors produced by the fallible layers of the app.
///
/// The reducer never surfaces these to the view: network and decode failures
/// collapse to an empty product list, and persistence failures are logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid url `{0}`")]
    InvalidUrl(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode products: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;
