//! Error types for JSON recovery.

/// Result type alias for recovery operations.
pub type Result<T> = std::result::Result<T, SalvageError>;

/// Errors that can occur while recovering JSON from generation text.
///
/// Validation failures are deliberately *not* represented here: the
/// validator reports them as structured [`Diagnostic`](crate::validate::Diagnostic)
/// values so a caller can keep collecting past individual failures.
#[derive(Debug, thiserror::Error)]
pub enum SalvageError {
    /// Neither fenced-block nor balanced-suffix extraction produced a
    /// parseable value. Recoverable: the caller may re-request generation.
    #[error("no JSON candidate found in generation text")]
    NoCandidate,

    /// The retry budget was exhausted without recovering a value.
    #[error("no JSON recovered after {attempts} generation attempts")]
    RetriesExhausted {
        /// Number of attempts that were made.
        attempts: usize,
    },

    /// JSON parsing error from serde_json.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
