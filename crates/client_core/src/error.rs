use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to reach orders service during {context}: {source}")]
    Network {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{context} failed with HTTP {status}{}", detail(.message))]
    Api {
        context: &'static str,
        status: u16,
        message: Option<String>,
    },
    #[error("unexpected response body for {context}: {source}")]
    Parse {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Validation(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

impl ClientError {
    /// Message the server attached to a non-success response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text to show a user: the server's message verbatim, the validation
    /// reason, or `fallback` for everything else.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::Validation(reason) => reason.clone(),
            _ => fallback.to_string(),
        }
    }
}
