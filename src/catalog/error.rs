use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid primary TLE data: {0}")]
    InvalidPrimary(String),
}
