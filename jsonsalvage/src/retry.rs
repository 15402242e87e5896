//! Bounded retry driving for the recovery pipeline.
//!
//! The generation service itself is a collaborator supplied by the caller
//! as a closure; this module only owns the attempt budget. A missing
//! response and a response no extractor can salvage are treated the same
//! way - both consume one attempt - matching how generation loops in
//! practice re-prompt on any unusable turn.

use serde_json::Value;

use crate::{
    error::{Result, SalvageError},
    extract::RecoveryPipeline,
};

/// Default attempt budget for a recovery loop.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Injectable attempt budget for [`recover_with_policy`].
///
/// # Examples
///
/// ```
/// use jsonsalvage::retry::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 5);
///
/// let strict = RetryPolicy::new(1);
/// assert_eq!(strict.max_attempts, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of generation attempts before giving up.
    pub max_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget.
    #[inline]
    pub const fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }
}

/// Repeatedly requests generation text and attempts recovery, up to the
/// policy's attempt budget.
///
/// `generate` is called with the zero-based attempt index and returns the
/// raw generation text, or `None` when the upstream call produced nothing.
/// `None`, empty text, and unrecoverable text all consume one attempt.
///
/// # Errors
///
/// Returns [`SalvageError::RetriesExhausted`] when the budget runs out,
/// including a zero-attempt budget.
///
/// # Examples
///
/// ```
/// use jsonsalvage::extract::RecoveryPipeline;
/// use jsonsalvage::retry::{recover_with_policy, RetryPolicy};
/// use serde_json::json;
///
/// let pipeline = RecoveryPipeline::new();
/// let responses = ["not json at all", "```json\n{\"ok\": true}\n```"];
/// let value = recover_with_policy(&pipeline, RetryPolicy::new(5), |attempt| {
///     responses.get(attempt).map(|s| s.to_string())
/// })
/// .unwrap();
/// assert_eq!(value, json!({"ok": true}));
/// ```
pub fn recover_with_policy<F>(
    pipeline: &RecoveryPipeline,
    policy: RetryPolicy,
    mut generate: F,
) -> Result<Value>
where
    F: FnMut(usize) -> Option<String>,
{
    for attempt in 0..policy.max_attempts {
        let Some(text) = generate(attempt) else {
            continue;
        };
        if let Some(value) = pipeline.recover(&text) {
            return Ok(value);
        }
    }
    Err(SalvageError::RetriesExhausted {
        attempts: policy.max_attempts,
    })
}
