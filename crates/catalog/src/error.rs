//! Error types for catalog load and update operations.

/// Message shown when a rejection carries no `msg` of its own.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Failed to update game";

/// Message shown for transport-level update failures.
pub const GENERIC_SUBMIT_MESSAGE: &str = "Error updating game";

/// Errors produced while fetching a game record.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned status {status}{}", status_suffix(.message))]
    Status { status: u16, message: Option<String> },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn status_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Errors produced while submitting an update.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The catalog answered with a non-success status.
    #[error("catalog rejected update ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bearer token is not a valid header value")]
    InvalidToken,

    /// A non-success response whose body is not JSON, typically from a proxy.
    #[error("catalog returned status {status} with an unreadable body: {source}")]
    MalformedBody {
        status: u16,
        source: serde_json::Error,
    },
}

impl SubmitError {
    /// Text to show the user for this failure.
    ///
    /// Rejections surface the service's message verbatim; everything else
    /// collapses to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Http(_) | Self::InvalidToken | Self::MalformedBody { .. } => {
                GENERIC_SUBMIT_MESSAGE.to_string()
            }
        }
    }
}

/// Price text that is not a non-negative amount with at most two decimals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("price is empty")]
    Empty,

    #[error("price cannot be negative: {0}")]
    Negative(String),

    #[error("price has more than two decimal places: {0}")]
    TooPrecise(String),

    #[error("price is not a number: {0}")]
    NotANumber(String),

    #[error("price is too large: {0}")]
    Overflow(String),
}

/// Genre text outside the fixed genre set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown genre: {0}")]
pub struct GenreError(pub String);
