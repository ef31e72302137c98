#![forbid(unsafe_code)]

use std::path::PathBuf;

use popmenu_widgets::menu::StyleError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid panel style: {0}")]
    Style(#[from] StyleError),

    #[error("invalid scenario: {message}")]
    InvalidScenario { message: String },

    #[error("failed to read scenario {path}: {source}")]
    ScenarioRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scenario `{scenario}` step {step}: {message}")]
    ExpectationFailed {
        scenario: String,
        step: usize,
        message: String,
    },

    #[error("scenario `{scenario}` diverged from golden checksums at frame {frame}")]
    GoldenMismatch { scenario: String, frame: usize },

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl HarnessError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidScenario {
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ExpectationFailed { .. } | Self::GoldenMismatch { .. } => 1,
            Self::InvalidScenario { .. } | Self::Style(_) | Self::Json(_) => 2,
            Self::Io(_) | Self::ScenarioRead { .. } | Self::Logging(_) => 3,
        }
    }
}
