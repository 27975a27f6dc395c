use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the orders backend on non-success responses.
/// Every field is optional; only `message` is surfaced to users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ApiErrorBody {
    /// Server message, ignoring blank strings.
    pub fn user_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),
    #[error("invalid payment status: {0:?} (expected PENDIENTE, PAGADO or CANCELADO)")]
    InvalidStatus(String),
}
