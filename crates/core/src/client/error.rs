use crate::validate::ValidationError;

pub const ANALYSIS_UNAVAILABLE: &str = "Analysis unavailable";

/// Every way a fetch or delete can fail. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request never produced an HTTP status.
    #[error("Network error: {0}")]
    Transport(String),

    #[error("HTTP error! Status: {status}")]
    Http { status: u16 },

    #[error("Invalid API response format")]
    Format,

    #[error("{message}")]
    Analysis { message: String },

    #[error("Failed to delete analysis (HTTP status {status})")]
    Delete { status: u16 },
}

impl FetchError {
    pub(crate) fn transport(err: anyhow::Error) -> Self {
        FetchError::Transport(format!("{err:#}"))
    }
}
