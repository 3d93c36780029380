use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::catalog::error::LoadError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a block of TLE text comes from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl From<String> for Source {
    fn from(location: String) -> Self {
        Source::parse(&location)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Source {
    /// `http://` and `https://` locations are fetched, anything else is a file path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::File(PathBuf::from(location))
        }
    }

    pub async fn fetch(&self, client: &reqwest::Client) -> Result<String, LoadError> {
        let fetch_error = |message: String| LoadError::Fetch {
            source_name: self.to_string(),
            message,
        };

        match self {
            Source::Url(url) => {
                let response = client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| fetch_error(e.to_string()))?;

                if !response.status().is_success() {
                    return Err(fetch_error(format!("HTTP {}", response.status())));
                }

                response.text().await.map_err(|e| fetch_error(e.to_string()))
            }
            Source::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| fetch_error(e.to_string())),
        }
    }
}

pub fn http_client() -> Result<reqwest::Client, LoadError> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    Ok(client)
}
