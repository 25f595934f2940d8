use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("could not decode response of {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{method} was rejected: {description}")]
    Rejected { method: String, description: String },
}

impl ApiError {
    pub fn transport(url: &str, source: reqwest::Error) -> Self {
        ApiError::Transport {
            url: url.to_string(),
            source,
        }
    }

    pub fn decode(url: &str, source: serde_json::Error) -> Self {
        ApiError::Decode {
            url: url.to_string(),
            source,
        }
    }
}
