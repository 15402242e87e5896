//! Backward balanced-delimiter scanning.

use serde_json::Value;

use super::Extractor;

/// Scans `text` right-to-left and returns the byte offsets of every `{`
/// at which the running brace depth returns to exactly zero.
///
/// The sign convention is backwards on purpose: walking from the end,
/// `}` increments depth and `{` decrements it, so depth zero at a `{`
/// means the suffix starting there is brace-balanced. Quote and escape
/// state is tracked so braces inside string literals never affect depth.
///
/// Offsets are reported in discovery order (rightmost candidate first).
/// Unicode is walked per scalar character, not per byte.
pub fn balanced_suffix_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_string = false;
    let mut escape = false;
    let mut depth: i64 = 0;

    for (idx, ch) in text.char_indices().rev() {
        if in_string {
            // An escaped backslash followed by a quote must still end the
            // string, hence the toggle rather than a plain assignment.
            escape = ch == '\\' && !escape;
            if ch == '"' && !escape {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '}' => depth += 1,
            '{' => {
                depth -= 1;
                if depth == 0 {
                    starts.push(idx);
                }
            }
            _ => {}
        }
    }

    starts
}

/// Parses the first complete JSON value at the start of `input`, ignoring
/// anything after it (the `raw_decode` behavior of other JSON stacks).
fn parse_leading_value(input: &str) -> Option<Value> {
    let mut stream = serde_json::Deserializer::from_str(input).into_iter::<Value>();
    stream.next()?.ok()
}

/// Recovers a trailing balanced-brace JSON object from raw text.
///
/// Used when no fenced block parses, on the guarantee that *some* suffix of
/// the text is valid JSON. Candidate starts come from
/// [`balanced_suffix_starts`]; each candidate gets a leading-value parse,
/// so commentary trailing the real object is tolerated. A candidate that
/// fails to parse does not abort the scan - a larger balanced span further
/// left may still be the intended top-level object.
///
/// # Examples
///
/// ```
/// use jsonsalvage::extract::{BalancedSuffixExtractor, Extractor};
/// use serde_json::json;
///
/// let extractor = BalancedSuffixExtractor;
/// let input = "Let me explain first... the result is {\"answer\": 42}";
/// assert_eq!(extractor.extract(input), Some(json!({"answer": 42})));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BalancedSuffixExtractor;

impl Extractor for BalancedSuffixExtractor {
    #[inline]
    fn name(&self) -> &'static str {
        "balanced_suffix"
    }

    fn extract(&self, input: &str) -> Option<Value> {
        balanced_suffix_starts(input)
            .into_iter()
            .find_map(|start| parse_leading_value(&input[start..]))
    }

    #[inline]
    fn priority(&self) -> u8 {
        2
    }
}
