//! Fenced code-block extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::Extractor;

/// Matches triple-backtick fences with an optional language tag.
/// Captures: (language tag, fence body).
static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(\w*)[ \t]*\r?\n?(.*?)```").unwrap());

/// Extracts JSON from code-fenced regions of generated text.
///
/// Fences are discovered in a single linear scan and tried in **reverse
/// document order**: generative retries typically append a corrected block
/// after earlier flawed ones, so the last fence is the most likely to be
/// authoritative. Each fence body gets one strict JSON parse; the first
/// body that parses wins.
///
/// # Examples
///
/// ```
/// use jsonsalvage::extract::{Extractor, FencedBlockExtractor};
/// use serde_json::json;
///
/// let extractor = FencedBlockExtractor::default();
/// let input = "First try:\n```json\n{broken\n```\nCorrected:\n```json\n{\"ok\": true}\n```\n";
/// assert_eq!(extractor.extract(input), Some(json!({"ok": true})));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FencedBlockExtractor;

impl FencedBlockExtractor {
    /// Collects fence bodies in document order, skipping fences tagged with
    /// a non-JSON language.
    fn fence_bodies<'a>(&self, input: &'a str) -> Vec<&'a str> {
        FENCE_RE
            .captures_iter(input)
            .filter_map(|cap| {
                let lang = cap.get(1).map(|m| m.as_str()).unwrap_or("");
                if Self::is_json_lang(lang) {
                    Some(cap.get(2)?.as_str().trim())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Checks whether a fence language tag permits a JSON parse attempt.
    ///
    /// An absent tag counts: generators frequently emit bare ``` fences
    /// around JSON.
    #[inline]
    fn is_json_lang(lang: &str) -> bool {
        let lower = lang.to_lowercase();
        lower.is_empty() || lower == "json" || lower == "jsonc" || lower == "json5"
    }
}

impl Extractor for FencedBlockExtractor {
    #[inline]
    fn name(&self) -> &'static str {
        "fenced_block"
    }

    fn extract(&self, input: &str) -> Option<Value> {
        self.fence_bodies(input)
            .into_iter()
            .rev()
            .find_map(|body| serde_json::from_str(body).ok())
    }

    #[inline]
    fn priority(&self) -> u8 {
        1
    }
}
