use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A single review as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub first_name: String,
    pub last_name: String,
    /// Expected to be 1..=5, not enforced
    pub rating: i32,
    pub text: String,
    /// Display string, never parsed as a date
    pub created: String,
}

/// One page of reviews plus the server-reported total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewsPage {
    #[serde(default)]
    pub items: Vec<ReviewRecord>,
    pub count: u32,
}

impl ReviewsPage {
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
