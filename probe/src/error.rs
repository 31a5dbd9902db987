//! Error types for the probe binary.
//!
//! # Design
//! `TransportError` is what a failed round-trip looks like: nothing came back
//! from the server. An HTTP error status is not a transport error; it comes
//! back as an ordinary `HttpResponse`. `UnitError` is the per-unit result of a
//! batch and is reported, never propagated.

use std::fmt;
use std::io;

use probe_core::ApiError;

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Header name or value rejected before sending.
    InvalidRequest(String),

    /// Connect, send, receive or timeout failure.
    Io(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            TransportError::Io(msg) => write!(f, "transport failed: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Why a single batch unit produced no response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    Transport(TransportError),

    /// The OS refused to start the thread.
    Spawn(String),

    /// The unit's thread panicked; the payload message if it had one.
    Panicked(String),
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::Transport(e) => write!(f, "{e}"),
            UnitError::Spawn(msg) => write!(f, "could not spawn unit: {msg}"),
            UnitError::Panicked(msg) => write!(f, "unit panicked: {msg}"),
        }
    }
}

impl std::error::Error for UnitError {}

impl From<TransportError> for UnitError {
    fn from(e: TransportError) -> Self {
        UnitError::Transport(e)
    }
}

/// Errors that end a probe command.
#[derive(Debug)]
pub enum ProbeError {
    Transport(TransportError),
    Api(ApiError),

    /// The cart file could not be read or parsed.
    Cart { path: String, reason: String },

    /// Writing to the output sink failed.
    Output(io::Error),

    /// Logger could not be installed.
    Logger(String),

    /// Batch count must be at least one.
    EmptyBatch,
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Transport(e) => write!(f, "{e}"),
            ProbeError::Api(e) => write!(f, "{e}"),
            ProbeError::Cart { path, reason } => write!(f, "cart file {path}: {reason}"),
            ProbeError::Output(e) => write!(f, "writing output failed: {e}"),
            ProbeError::Logger(msg) => write!(f, "logger init failed: {msg}"),
            ProbeError::EmptyBatch => write!(f, "batch count must be at least 1"),
        }
    }
}

impl std::error::Error for ProbeError {}

impl From<TransportError> for ProbeError {
    fn from(e: TransportError) -> Self {
        ProbeError::Transport(e)
    }
}

impl From<ApiError> for ProbeError {
    fn from(e: ApiError) -> Self {
        ProbeError::Api(e)
    }
}

impl From<io::Error> for ProbeError {
    fn from(e: io::Error) -> Self {
        ProbeError::Output(e)
    }
}
