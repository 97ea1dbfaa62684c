// src/error.rs
use thiserror::Error;

use crate::powerdns::types::ApiError;

pub type Result<T, E = PdnsError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PdnsError {
    /// The request could not be built or sent, or its body could not be read.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("can't decode response body from {url} (HTTP {status}): {source}")]
    Decode {
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// PowerDNS reported an error with a well-formed error body.
    #[error("PowerDNS API error (HTTP {status}): {}", .error.error)]
    Api { status: u16, error: ApiError },

    #[error("requested URL {url} was not found")]
    NotFound { url: String },

    #[error("unsupported HTTP code returned from {url}: {status}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("zone has no SOA record")]
    NoSoaRecord,

    #[error("zone has {count} SOA records, expected exactly one")]
    MultipleSoaRecords { count: usize },
}

impl PdnsError {
    pub(crate) fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        PdnsError::Transport {
            url: url.into(),
            source,
        }
    }

    /// HTTP status that produced this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            PdnsError::Decode { status, .. }
            | PdnsError::Api { status, .. }
            | PdnsError::UnexpectedStatus { status, .. } => Some(*status),
            PdnsError::NotFound { .. } => Some(404),
            PdnsError::Transport { .. }
            | PdnsError::NoSoaRecord
            | PdnsError::MultipleSoaRecords { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PdnsError::NotFound { .. })
    }
}
