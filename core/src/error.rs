//! Error types for downstream invocations.
//!
//! # Design
//! `Downstream` carries the text the remote service produced (the raw body or
//! a field of its structured error payload) and displays it verbatim, so the
//! message a caller sees is exactly what the service sent. Transport failures
//! are kept apart from it: they never reached the remote application.

use thiserror::Error;

use crate::http::HttpMethod;

/// Errors raised by a `Transport` before any HTTP response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, client-side timeout and friends.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The request URL could not be resolved into an absolute URL.
    #[error("invalid request url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Errors returned by `EndpointClient` and `EndpointInvoker`.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The call failed at the transport layer.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The remote service answered with a non-success status.
    #[error("{message}")]
    Downstream { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request content could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A POST or PUT was built from a descriptor without content.
    #[error("{method} request requires content")]
    MissingContent { method: HttpMethod },

    /// The call context's timeout elapsed before the response arrived.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The call context was cancelled before the response arrived.
    #[error("call cancelled")]
    Cancelled,
}

impl InvokeError {
    /// HTTP status of a downstream failure, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            InvokeError::Downstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
