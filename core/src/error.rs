//! Error types for the Communication API client.
//!
//! # Design
//! The probe prints bodies whatever the status, so these errors only surface
//! when a caller asks for a typed parse. Every parse error names the route it
//! came from: the same `true`/`false` body means different things on
//! `verifystock` and `processpurchase`.

use std::fmt;

/// Errors returned by `CommunicationClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The route answered outside 2xx. `body` is decoded lossily.
    UnexpectedStatus {
        route: &'static str,
        status: u16,
        body: String,
    },

    /// The route answered 2xx with a body that is not the expected shape.
    MalformedBody { route: &'static str, reason: String },

    /// The cart could not be encoded as a JSON array.
    InvalidCart(String),
}

impl ApiError {
    pub fn route(&self) -> Option<&'static str> {
        match self {
            ApiError::UnexpectedStatus { route, .. } | ApiError::MalformedBody { route, .. } => {
                Some(route)
            }
            ApiError::InvalidCart(_) => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::UnexpectedStatus { route, status, body } => {
                write!(f, "{route} answered HTTP {status}: {body}")
            }
            ApiError::MalformedBody { route, reason } => {
                write!(f, "{route} answered an unreadable body: {reason}")
            }
            ApiError::InvalidCart(msg) => write!(f, "cart could not be encoded: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
