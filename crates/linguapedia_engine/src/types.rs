use std::fmt;

use linguapedia_core::{StatusView, StopReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// The status view changed.
    View(StatusView),
    /// The chain ended; no further events follow.
    Finished(StopReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// The body could not be decoded (for the status endpoint: not JSON).
    InvalidPayload,
    /// A redirect-style answer without a usable `Location` header.
    MissingLocation,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidPayload => write!(f, "invalid payload"),
            FailureKind::MissingLocation => write!(f, "missing redirect location"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
