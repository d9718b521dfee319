use std::path::PathBuf;

use thiserror::Error;

use crate::suite::Expectation;

pub type Result<T, E = HarnessError> = std::result::Result<T, E>;

/// Everything that can end a scenario other than a pass. All variants are
/// scenario-scoped except `Config`, which only setup produces.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("artifact for `{variant}` not found at {}", path.display())]
    ArtifactNotFound { variant: String, path: PathBuf },

    #[error("cannot decode {}: {source}", path.display())]
    ArtifactDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no verifier implementation for `{reference}`: {reason}")]
    ImplementationNotFound { reference: String, reason: String },

    #[error("verifier deployment failed: {0}")]
    Deployment(String),

    /// The call reverted or its arguments did not fit the entry point.
    /// Never conflated with a `false` answer.
    #[error("malformed verification call: {0}")]
    Malformed(String),

    #[error("expected verifier to {expected}, but it returned {actual}")]
    AssertionMismatch { expected: Expectation, actual: bool },

    #[error("scenario timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("scenario aborted: {0}")]
    Aborted(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HarnessError {
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::ArtifactNotFound { .. } => "ARTIFACT_NOT_FOUND",
            HarnessError::ArtifactDecode { .. } => "ARTIFACT_DECODE",
            HarnessError::ImplementationNotFound { .. } => "IMPLEMENTATION_NOT_FOUND",
            HarnessError::Deployment(_) => "DEPLOYMENT",
            HarnessError::Malformed(_) => "MALFORMED",
            HarnessError::AssertionMismatch { .. } => "ASSERTION_MISMATCH",
            HarnessError::Timeout { .. } => "TIMEOUT",
            HarnessError::Aborted(_) => "ABORTED",
            HarnessError::Io { .. } => "IO",
            HarnessError::Config(_) => "CONFIG",
        }
    }
}
