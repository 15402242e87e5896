//! Extraction of JSON values from free-form generation text.
//!
//! Generation services wrap their answers in prose, markdown fences, and
//! half-finished earlier attempts. The extractors in this module locate a
//! syntactically valid JSON value inside that noise; they make no claim
//! about *semantic* correctness.

mod balanced;
mod fenced;

pub use balanced::{balanced_suffix_starts, BalancedSuffixExtractor};
pub use fenced::FencedBlockExtractor;

use serde_json::Value;

/// Trait for strategies that extract a JSON value from raw text.
///
/// Extractors are pure: same input, same output, no side effects. A `None`
/// return means the strategy found nothing usable, which is an expected
/// outcome rather than an error.
pub trait Extractor: Send + Sync + std::fmt::Debug {
    /// Returns the name of this extractor for debugging.
    fn name(&self) -> &'static str;

    /// Attempts to extract a JSON value from the input.
    fn extract(&self, input: &str) -> Option<Value>;

    /// Returns the priority of this extractor.
    ///
    /// Lower values are tried first. Fenced blocks are an explicit signal
    /// from the generator and outrank the raw-text suffix scan.
    fn priority(&self) -> u8;
}

/// Ordered fallback chain of extractors.
///
/// Tries each extractor in priority order and returns the first success.
/// This is the single entry point a request/retry loop should call.
///
/// # Examples
///
/// ```
/// use jsonsalvage::extract::RecoveryPipeline;
/// use serde_json::json;
///
/// let pipeline = RecoveryPipeline::new();
/// let text = "Sure! Here it is:\n```json\n{\"answer\": 42}\n```\n";
/// assert_eq!(pipeline.recover(text), Some(json!({"answer": 42})));
/// ```
#[derive(Debug)]
pub struct RecoveryPipeline {
    /// Extractors in priority order.
    extractors: Vec<Box<dyn Extractor>>,
}

impl Default for RecoveryPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoveryPipeline {
    /// Creates a pipeline with the default extractors.
    ///
    /// Default chain (in priority order):
    /// 1. [`FencedBlockExtractor`] - code-fenced JSON, most recent fence first
    /// 2. [`BalancedSuffixExtractor`] - trailing balanced-brace object in raw text
    pub fn new() -> Self {
        let extractors: Vec<Box<dyn Extractor>> = vec![
            Box::new(FencedBlockExtractor::default()),
            Box::new(BalancedSuffixExtractor),
        ];
        Self::with_extractors(extractors)
    }

    /// Creates a pipeline with custom extractors.
    ///
    /// Extractors will be sorted by priority automatically.
    pub fn with_extractors(mut extractors: Vec<Box<dyn Extractor>>) -> Self {
        extractors.sort_by_key(|e| e.priority());
        Self { extractors }
    }

    /// Recovers a JSON value from generation text, if any extractor succeeds.
    ///
    /// Empty input, prose with no JSON, and unbalanced fragments all yield
    /// `None`; the caller decides whether to retry.
    pub fn recover(&self, input: &str) -> Option<Value> {
        if input.is_empty() {
            return None;
        }
        self.extractors.iter().find_map(|e| e.extract(input))
    }

    /// Returns the number of extractors registered.
    #[inline]
    pub fn extractor_count(&self) -> usize {
        self.extractors.len()
    }

    /// Returns the names of all registered extractors in priority order.
    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }
}
