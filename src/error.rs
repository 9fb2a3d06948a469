use std::path::PathBuf;

/// All errors that can occur while talking to the backend or touching local storage.
#[derive(thiserror::Error, Debug)]
pub enum GuideError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The response body was not the JSON we expected.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    /// A record could not be serialized for a request or for storage.
    #[error("failed to encode json: {0}")]
    Encode(#[from] serde_json::Error),

    /// The underlying HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    ClientBuild(reqwest::Error),

    /// Reading or writing the local storage file failed.
    #[error("storage io failed for {path}: {source}")]
    Storage {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A configuration value was missing or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GuideError>;
