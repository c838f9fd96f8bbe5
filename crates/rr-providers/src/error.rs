//! Provider error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request timed out")]
    Timeout { provider: &'static str },

    #[error("{provider} returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{provider} returned status {status}: {message}")]
    Upstream {
        provider: &'static str,
        status:   String,
        message:  String,
    },

    #[error("could not decode {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Classify a transport-level failure from `reqwest`.
    pub(crate) fn http(provider: &'static str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ProviderError::Timeout { provider }
        } else {
            ProviderError::Http { provider, source }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout { .. })
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
