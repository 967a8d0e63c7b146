use reqwest::StatusCode;

/// Failures while fetching a page of photos.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Request(reqwest::Error),
    #[error("unexpected response status: {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

// The request URL carries the access key.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
