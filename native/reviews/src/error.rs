use std::time::Duration;

use derive_more::{Display, Error, From};

/// The fetch collaborator failed to produce page bytes.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
#[display("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(format!("Fetch timed out after {after:?}"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(format!("HTTP request failed: {e}"))
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        Self::new(format!("I/O error: {e}"))
    }
}

/// Page bytes did not match the expected payload shape.
#[derive(Debug, Display, Error, From)]
#[display("malformed reviews payload: {_0}")]
pub struct DecodeError(serde_json::Error);

/// Why a single page fetch attempt did not commit any progress.
#[derive(Debug, Display, Error, From)]
pub enum FetchError {
    #[display("transport error: {_0}")]
    Transport(TransportError),
    #[display("decode error: {_0}")]
    Decode(DecodeError),
}
