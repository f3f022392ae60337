use thiserror::Error;

use super::Dataset;

/// covidash error types
#[derive(Error, Debug)]
pub enum CovidashError {
    /// Source unreachable or answered with a non-success status
    #[error("failed to fetch {dataset} data: {reason}")]
    Fetch { dataset: Dataset, reason: String },

    /// Source was fetched but does not have the expected layout
    #[error("malformed {dataset} data: {reason}")]
    Format { dataset: Dataset, reason: String },

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl CovidashError {
    pub fn fetch(dataset: Dataset, reason: impl Into<String>) -> Self {
        Self::Fetch {
            dataset,
            reason: reason.into(),
        }
    }

    pub fn format(dataset: Dataset, reason: impl Into<String>) -> Self {
        Self::Format {
            dataset,
            reason: reason.into(),
        }
    }

    /// Dataset the error originated from, if any
    pub fn dataset(&self) -> Option<Dataset> {
        match self {
            Self::Fetch { dataset, .. } | Self::Format { dataset, .. } => Some(*dataset),
            Self::Io(_) | Self::Config(_) => None,
        }
    }
}

/// Result type alias for covidash
pub type Result<T> = std::result::Result<T, CovidashError>;
