use reqwest::StatusCode;
use thiserror::Error;

use super::routes::ApiVariant;

/// Why a response body could not be turned into the expected shape.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("expected a JSON array")]
    NotArray,

    #[error("item {index} is not {expected}")]
    BadItem { index: usize, expected: &'static str },
}

/// Errors surfaced by [`super::ChannelSubscriptionClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failures, timeouts from the transport default, body read errors.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("can't parse {endpoint} response: {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: ParseError,
    },

    /// The registration identifier is empty so no request was built.
    #[error("no registration identifier set")]
    Unregistered,

    #[error("{operation} is not available with the {variant} API")]
    Unsupported {
        operation: &'static str,
        variant: ApiVariant,
    },

    /// A path segment would be dropped or collapsed by URL normalisation.
    #[error("{value:?} can't be used as a path segment")]
    InvalidSegment { value: String },

    #[error("invalid base URL {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// True for errors reported by the server or the network, as opposed
    /// to errors raised before a request was sent or while decoding.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}
