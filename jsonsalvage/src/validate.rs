//! Recursive validation of nested JSON.
//!
//! Generation pipelines routinely persist JSON documents whose string
//! fields are themselves serialized JSON, to arbitrary depth. This module
//! walks such a document and reports every string leaf that looks like
//! embedded JSON but fails to parse, with a path locating the failure.
//!
//! Failures are collected as [`Diagnostic`] values rather than raised as
//! errors, so a single bad leaf never hides the others.

use std::fmt;

use serde_json::Value;

/// Default cap on the displayed length of an offending string. Longer
/// snippets are ellipsis-folded.
pub const DEFAULT_SNIPPET_LEN: usize = 200;

/// Default ceiling on collected diagnostics. The walk stops early once the
/// ceiling is reached, which bounds output on pathological input.
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 50;

/// Number of characters shown on each side of a top-level parse failure.
const CONTEXT_WINDOW: usize = 40;

/// Options controlling the nested-JSON walk.
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Maximum displayed length of an offending string snippet.
    pub max_snippet_len: usize,
    /// When `true`, a string must both start *and* end with a matching
    /// `{}`/`[]` pair to be treated as embedded JSON. The lenient default
    /// only requires a `{` or `[` prefix.
    pub strict_delimiters: bool,
    /// Ceiling on the number of diagnostics collected before the walk
    /// stops.
    pub max_diagnostics: usize,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_snippet_len: DEFAULT_SNIPPET_LEN,
            strict_delimiters: false,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
        }
    }
}

impl ValidatorOptions {
    /// Creates options with the defaults.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

/// A single path-qualified validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Dot/bracket locator of the failing leaf, rooted at `$`. Each
    /// embedded scope appends `(embedded)` to the path of its host string.
    pub path: String,
    /// Human-readable cause, carrying the decoder's message and the
    /// character offset of the failure within the string.
    pub message: String,
    /// Truncated excerpt of the offending string.
    pub snippet: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nested JSON parse failure at path: {}", self.path)?;
        writeln!(f, "string snippet: \"{}\"", self.snippet)?;
        write!(f, "cause: {}", self.message)
    }
}

/// A top-level parse failure for an entire document.
///
/// Distinct from nested [`Diagnostic`]s: when the whole input is not valid
/// JSON there is no value tree to walk, so the report carries position and
/// context instead of a path.
#[derive(Debug, Clone)]
pub struct DocumentError {
    /// 1-based line of the failure.
    pub line: usize,
    /// 1-based column of the failure.
    pub column: usize,
    /// The decoder's message.
    pub message: String,
    /// Excerpt of the input around the failure, newlines escaped.
    pub excerpt: String,
    /// Character position of the failure within `excerpt`.
    pub caret_column: usize,
    /// Best-effort natural-language hint for common causes.
    pub hint: Option<&'static str>,
}

/// Prefix of the context line; the caret line pads past it so the caret
/// lands under the excerpt character at `caret_column`.
const CONTEXT_LABEL: &str = "context: \"";

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "top-level JSON parse failure: {}", self.message)?;
        writeln!(f, "position: line {}, column {}", self.line, self.column)?;
        writeln!(f, "{CONTEXT_LABEL}{}\"", self.excerpt)?;
        let pad = CONTEXT_LABEL.chars().count() + self.caret_column;
        write!(f, "{}^", " ".repeat(pad))?;
        if let Some(hint) = self.hint {
            write!(f, "\nhint: {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DocumentError {}

/// Parses an entire document, classifying failure separately from nested
/// validation.
///
/// # Examples
///
/// ```
/// use jsonsalvage::validate::parse_document;
///
/// assert!(parse_document(r#"{"a": 1}"#).is_ok());
///
/// let err = parse_document(r#"{"a": 1,}"#).unwrap_err();
/// assert_eq!(err.line, 1);
/// assert!(err.hint.is_some());
/// ```
pub fn parse_document(text: &str) -> Result<Value, DocumentError> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) => Err(document_error(text, &err)),
    }
}

/// Walks a parsed value and collects diagnostics for every string leaf
/// that looks like embedded JSON but fails to parse.
///
/// Successfully parsed embedded JSON is walked recursively as a new scope,
/// so a JSON string containing another JSON string several levels deep is
/// fully covered. The returned list holds at most
/// `options.max_diagnostics` entries; hitting the ceiling is a partial
/// result, not an error.
///
/// # Examples
///
/// ```
/// use jsonsalvage::validate::{validate, ValidatorOptions};
/// use serde_json::json;
///
/// let doc = json!({"payload": "{\"a\":1,}"});
/// let diagnostics = validate(&doc, &ValidatorOptions::default());
/// assert_eq!(diagnostics.len(), 1);
/// assert_eq!(diagnostics[0].path, "$.payload");
/// ```
pub fn validate(value: &Value, options: &ValidatorOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    walk(value, "$", options, &mut diagnostics);
    diagnostics
}

fn walk(value: &Value, path: &str, options: &ValidatorOptions, out: &mut Vec<Diagnostic>) {
    if out.len() >= options.max_diagnostics {
        return;
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                walk(child, &format!("{path}.{key}"), options, out);
                if out.len() >= options.max_diagnostics {
                    break;
                }
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, &format!("{path}[{index}]"), options, out);
                if out.len() >= options.max_diagnostics {
                    break;
                }
            }
        }
        Value::String(s) => {
            if looks_like_embedded_json(s, options.strict_delimiters) {
                match serde_json::from_str::<Value>(s) {
                    Ok(inner) => {
                        walk(&inner, &format!("{path}(embedded)"), options, out);
                    }
                    Err(err) => {
                        let cleaned = s.trim().replace('\n', " ");
                        out.push(Diagnostic {
                            path: path.to_string(),
                            message: format!(
                                "{err} (character offset {} within the string)",
                                error_offset(s, &err)
                            ),
                            snippet: snippet(&cleaned, options.max_snippet_len),
                        });
                    }
                }
            }
        }
        // Scalars without embedded structure require no action.
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Decides whether a string leaf should get a nested parse attempt.
fn looks_like_embedded_json(s: &str, strict: bool) -> bool {
    let t = s.trim();
    if t.is_empty() {
        return false;
    }
    if strict {
        (t.starts_with('{') && t.ends_with('}')) || (t.starts_with('[') && t.ends_with(']'))
    } else {
        t.starts_with('{') || t.starts_with('[')
    }
}

/// Ellipsis-folds `s` to at most roughly `limit` characters, keeping the
/// head and the tail.
pub fn snippet(s: &str, limit: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= limit {
        return s.to_string();
    }
    let half = (limit.saturating_sub(5) / 2).max(1);
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head} ... {tail}")
}

/// Converts a decoder's line/column position into a character offset.
///
/// The decoder reports the column as a byte position within the failing
/// line, so that column is re-counted in characters before being added to
/// the preceding lines.
fn error_offset(text: &str, err: &serde_json::Error) -> usize {
    let line = err.line();
    if line == 0 {
        return 0;
    }
    let mut offset = 0;
    let mut lines = text.split('\n');
    for _ in 0..line - 1 {
        match lines.next() {
            Some(l) => offset += l.chars().count() + 1,
            None => return offset,
        }
    }
    let failing = lines.next().unwrap_or("");
    let mut col = err.column().saturating_sub(1).min(failing.len());
    while col > 0 && !failing.is_char_boundary(col) {
        col -= 1;
    }
    offset + failing[..col].chars().count()
}

fn document_error(text: &str, err: &serde_json::Error) -> DocumentError {
    let chars: Vec<char> = text.chars().collect();
    let offset = error_offset(text, err).min(chars.len());
    let start = offset.saturating_sub(CONTEXT_WINDOW);
    let end = (offset + CONTEXT_WINDOW).min(chars.len());

    let mut excerpt = String::new();
    let mut caret_column = 0;
    for (i, ch) in chars[start..end].iter().enumerate() {
        if start + i == offset {
            caret_column = excerpt.chars().count();
        }
        if *ch == '\n' {
            excerpt.push_str("\\n");
        } else {
            excerpt.push(*ch);
        }
    }
    if offset >= end {
        // Failure at end of input.
        caret_column = excerpt.chars().count();
    }

    DocumentError {
        line: err.line(),
        column: err.column(),
        message: err.to_string(),
        excerpt,
        caret_column,
        hint: hint_for(&err.to_string()),
    }
}

/// Fixed table of common decode-failure causes, matched against the
/// decoder's message.
fn hint_for(message: &str) -> Option<&'static str> {
    let m = message.to_lowercase();
    if m.contains("key must be a string") {
        return Some(
            "object keys must be double-quoted strings (bare identifiers and single quotes are not valid JSON)",
        );
    }
    if m.contains("trailing comma") {
        return Some("JSON does not allow a comma after the last element");
    }
    if m.contains("eof while parsing a string") {
        return Some("a string is missing its closing double-quote, or an escape sequence is broken");
    }
    if m.contains("control character") {
        return Some("strings may not contain raw control characters; encode newlines as \\n");
    }
    if m.contains("trailing characters") {
        return Some("extra data follows the top-level value (multiple values must be wrapped in an array)");
    }
    if m.contains("expected value") || m.contains("eof while parsing a value") {
        return Some(
            "the document may be empty, start with an illegal character, or use single-quoted strings",
        );
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_valid_document_no_diagnostics() {
        let doc = json!({"a": 1, "b": [true, null], "c": "plain text"});
        assert!(validate(&doc, &ValidatorOptions::default()).is_empty());
    }

    #[test]
    fn test_nested_failure_path() {
        let doc = json!({"payload": "{\"a\":1,}"});
        let diagnostics = validate(&doc, &ValidatorOptions::default());

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, "$.payload");
        assert!(diagnostics[0].message.contains("trailing comma"));
    }

    #[test]
    fn test_nested_failure_in_array() {
        let doc = json!(["fine", "{bad"]);
        let diagnostics = validate(&doc, &ValidatorOptions::default());

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, "$[1]");
    }

    #[test]
    fn test_two_levels_of_embedding() {
        let doc = json!({"p": "{\"q\": \"[1,2,]\"}"});
        let diagnostics = validate(&doc, &ValidatorOptions::default());

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, "$.p(embedded).q");
        assert!(diagnostics[0].message.contains("trailing comma"));
    }

    #[test]
    fn test_valid_embedding_walked_fully() {
        // Three levels, all valid: no diagnostics.
        let doc = json!({"a": "{\"b\": \"{\\\"c\\\": 1}\"}"});
        assert!(validate(&doc, &ValidatorOptions::default()).is_empty());
    }

    #[test]
    fn test_diagnostic_cap() {
        let bad: Vec<Value> = (0..60).map(|_| json!("{broken")).collect();
        let doc = Value::Array(bad);
        let options = ValidatorOptions::default();
        let diagnostics = validate(&doc, &options);

        assert_eq!(diagnostics.len(), options.max_diagnostics);
    }

    #[test]
    fn test_strict_delimiters() {
        // Starts with '{' but does not end with '}': skipped in strict
        // mode, attempted (and failing) in lenient mode.
        let doc = json!({"a": "{\"x\": 1"});

        let lenient = ValidatorOptions::default();
        assert_eq!(validate(&doc, &lenient).len(), 1);

        let strict = ValidatorOptions {
            strict_delimiters: true,
            ..ValidatorOptions::default()
        };
        assert!(validate(&doc, &strict).is_empty());
    }

    #[test]
    fn test_plain_strings_not_probed() {
        let doc = json!({"note": "curly brace } in prose, but no opening"});
        assert!(validate(&doc, &ValidatorOptions::default()).is_empty());
    }

    #[test]
    fn test_snippet_short_string_unchanged() {
        assert_eq!(snippet("short", 200), "short");
    }

    #[test]
    fn test_snippet_folds_long_string() {
        let long: String = "x".repeat(500);
        let folded = snippet(&long, 21);
        assert_eq!(folded, format!("{} ... {}", "x".repeat(8), "x".repeat(8)));
    }

    #[test]
    fn test_snippet_char_boundary_safe() {
        let long: String = "中".repeat(300);
        let folded = snippet(&long, 20);
        assert!(folded.contains(" ... "));
    }

    #[test]
    fn test_snippet_respects_custom_len() {
        let doc = json!({"payload": format!("{{{}", "y".repeat(400))});
        let options = ValidatorOptions {
            max_snippet_len: 20,
            ..ValidatorOptions::default()
        };
        let diagnostics = validate(&doc, &options);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].snippet.chars().count() <= 25);
    }

    #[test]
    fn test_parse_document_ok() {
        let value = parse_document(r#"{"a": [1, 2]}"#).unwrap();
        assert_eq!(value, json!({"a": [1, 2]}));
    }

    #[test]
    fn test_parse_document_reports_position() {
        let err = parse_document("{\n  \"a\": 1,\n}").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("trailing comma"));
        assert_eq!(err.hint, Some("JSON does not allow a comma after the last element"));
    }

    #[test]
    fn test_parse_document_caret_alignment() {
        let err = parse_document(r#"{"a": 1,}"#).unwrap_err();
        // Caret points at the character the decoder stopped on.
        assert!(err.caret_column <= err.excerpt.chars().count());
        let rendered = err.to_string();
        assert!(rendered.contains('^'));
        assert!(rendered.contains("line 1"));
    }

    #[test]
    fn test_parse_document_caret_multibyte_context() {
        // Multibyte characters before the failure on the failing line must
        // not shift the caret: the decoder's column is bytes, the excerpt
        // is characters.
        let err = parse_document("{\"键名\": 1,}").unwrap_err();
        assert_eq!(err.excerpt.chars().nth(err.caret_column), Some('}'));
    }

    #[test]
    fn test_caret_line_aligns_under_context() {
        let err = parse_document(r#"{"a": 1,}"#).unwrap_err();
        let rendered = err.to_string();
        let context = rendered
            .lines()
            .find(|l| l.starts_with("context: "))
            .unwrap();
        let caret = rendered.lines().find(|l| l.ends_with('^')).unwrap();
        let caret_at = caret.chars().count() - 1;
        // The character directly above the caret is the one the decoder
        // stopped on.
        assert_eq!(context.chars().nth(caret_at), Some('}'));
    }

    #[test]
    fn test_parse_document_empty_input_hint() {
        let err = parse_document("").unwrap_err();
        assert!(err.hint.unwrap().contains("empty"));
    }

    #[test]
    fn test_hint_table() {
        assert!(hint_for("key must be a string at line 1 column 2").is_some());
        assert!(hint_for("trailing comma at line 1 column 8").is_some());
        assert!(hint_for("EOF while parsing a string at line 1 column 9").is_some());
        assert!(hint_for("control character (\\u0000-\\u001F) found").is_some());
        assert!(hint_for("trailing characters at line 1 column 10").is_some());
        assert!(hint_for("expected value at line 1 column 1").is_some());
        assert!(hint_for("recursion limit exceeded").is_none());
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic {
            path: "$.payload".to_string(),
            message: "trailing comma at line 1 column 8".to_string(),
            snippet: "{\"a\":1,}".to_string(),
        };
        let rendered = diag.to_string();
        assert!(rendered.contains("$.payload"));
        assert!(rendered.contains("trailing comma"));
    }

    #[test]
    fn test_error_offset_multiline() {
        let text = "{\n\"a\": nope\n}";
        let err = serde_json::from_str::<Value>(text).unwrap_err();
        let offset = error_offset(text, &err);
        assert!(text.chars().nth(offset.saturating_sub(1)).is_some());
    }

    #[test]
    fn test_error_offset_multibyte_line() {
        let text = "{\"键名\": 1,}";
        let err = serde_json::from_str::<Value>(text).unwrap_err();
        let offset = error_offset(text, &err);
        assert_eq!(text.chars().nth(offset), Some('}'));
    }

    #[test]
    fn test_error_offset_multibyte_preceding_lines() {
        let text = "{\n\"键\": \"值\",\n\"a\": 1,\n}";
        let err = serde_json::from_str::<Value>(text).unwrap_err();
        let offset = error_offset(text, &err);
        assert_eq!(text.chars().nth(offset), Some('}'));
    }
}
