//! # jsonsalvage
//!
//! Recovers reliable structured data from unreliable generation text.
//!
//! A text-generation service rarely answers with clean JSON: the value is
//! buried in prose, wrapped in markdown fences, or preceded by abandoned
//! earlier attempts. This library turns that output back into
//! [`serde_json::Value`] trees:
//!
//! - **Fenced-block extraction**: code-fenced JSON, most recent fence first
//! - **Balanced-suffix extraction**: a string/escape-aware backward scan
//!   that recovers a trailing balanced-brace object from raw text
//! - **Nested-JSON validation**: path-qualified diagnostics for documents
//!   whose string leaves are themselves serialized JSON, to arbitrary depth
//! - **Skeleton reconciliation**: a template/target merge that produces a
//!   content-free shape template
//!
//! Everything here is a pure, synchronous function of its inputs: no I/O,
//! no shared mutable state, safe to call from parallel workers without
//! coordination.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//!
//! let fence = "\u{60}\u{60}\u{60}";
//! let response = format!(
//!     "Sure! Here is the corrected object:\n{fence}json\n{{\"name\": \"Alice\", \"score\": 30}}\n{fence}\n"
//! );
//!
//! let value = jsonsalvage::recover(&response).unwrap();
//! assert_eq!(value, json!({"name": "Alice", "score": 30}));
//! ```
//!
//! Without a fence, the balanced-suffix scan still finds a trailing object:
//!
//! ```rust
//! use serde_json::json;
//!
//! let response = r#"Let me think step by step... {"answer": 42}"#;
//! let value = jsonsalvage::recover(response).unwrap();
//! assert_eq!(value, json!({"answer": 42}));
//! ```
//!
//! ## Advanced Usage
//!
//! For control over the extraction chain or the retry budget:
//!
//! ```rust
//! use jsonsalvage::extract::RecoveryPipeline;
//! use jsonsalvage::retry::{recover_with_policy, RetryPolicy};
//!
//! let pipeline = RecoveryPipeline::new();
//! let result = recover_with_policy(&pipeline, RetryPolicy::new(3), |_attempt| {
//!     // In production this calls the generation service.
//!     Some("{\"ok\": true}".to_string())
//! });
//! assert!(result.is_ok());
//! ```

pub mod error;
pub mod extract;
pub mod reconcile;
pub mod retry;
pub mod validate;

pub use error::{Result, SalvageError};
pub use extract::RecoveryPipeline;
pub use reconcile::{placeholder_of, reconcile, PLACEHOLDER};
pub use retry::RetryPolicy;
pub use validate::{parse_document, validate, Diagnostic, DocumentError, ValidatorOptions};

use serde_json::Value;

/// Recovers a JSON value from generation text using the default pipeline.
///
/// This is the main entry point for one-shot recovery. It tries fenced
/// blocks first, then the balanced-suffix scan.
///
/// # Errors
///
/// Returns [`SalvageError::NoCandidate`] if neither extractor produced a
/// parseable value; callers with a retry budget should treat that as a
/// signal to re-request generation.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let value = jsonsalvage::recover("the result: {\"a\": 1}").unwrap();
/// assert_eq!(value, json!({"a": 1}));
///
/// assert!(jsonsalvage::recover("no json here").is_err());
/// ```
pub fn recover(input: &str) -> Result<Value> {
    RecoveryPipeline::new()
        .recover(input)
        .ok_or(SalvageError::NoCandidate)
}
