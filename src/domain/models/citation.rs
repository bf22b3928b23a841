//! Citation records and the inline markers that must survive rewriting.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;

/// One cited source, kept exactly as the caller supplied it.
///
/// The record is opaque JSON: no field is added, dropped or retyped on its
/// way to the rewriter. The accessors only read well-known string fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Citation(Value);

impl Citation {
    /// Wrap a record as-is.
    pub const fn new(record: Value) -> Self {
        Self(record)
    }

    /// The record as supplied.
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// `id`, when it is a string.
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// `title`, when it is a string.
    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// `doi`, when it is a string.
    pub fn doi(&self) -> Option<&str> {
        self.str_field("doi")
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for Citation {
    fn from(record: Value) -> Self {
        Self(record)
    }
}

/// Ordered citations protected during humanization.
///
/// The loop never looks inside; it only forwards the set to the rewriter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CitationSet(Vec<Citation>);

impl CitationSet {
    /// Set over the given records, in order.
    pub const fn new(citations: Vec<Citation>) -> Self {
        Self(citations)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no records.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Citation> {
        self.0.iter()
    }

    /// Serialize the set as JSON for inclusion in a prompt. Empty sets render as `[]`.
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl From<Vec<Citation>> for CitationSet {
    fn from(citations: Vec<Citation>) -> Self {
        Self(citations)
    }
}

impl FromIterator<Value> for CitationSet {
    fn from_iter<I: IntoIterator<Item = Value>>(records: I) -> Self {
        Self(records.into_iter().map(Citation::new).collect())
    }
}

impl<'a> IntoIterator for &'a CitationSet {
    type Item = &'a Citation;
    type IntoIter = std::slice::Iter<'a, Citation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Footnote definitions first so `[^1]` is not split into `^1`.
    PATTERN.get_or_init(|| {
        Regex::new(r"\[\^\d+\]|\^\d+|\([^()]*\p{Lu}[^()]*,\s*\d{4}[a-z]?[^()]*\)")
            .expect("citation marker pattern is valid")
    })
}

/// Citation markers in `text`, in order of first appearance, without duplicates.
///
/// Recognizes caret footnotes (`^1`), footnote definitions (`[^1]`) and
/// parenthetical author-year citations (`(Müller, 2020, S. 45)`).
pub fn extract_citation_markers(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    marker_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|marker| seen.insert(marker.clone()))
        .collect()
}

/// Markers present in `before` that no longer appear in `after`.
pub fn missing_markers(before: &str, after: &str) -> Vec<String> {
    let kept: HashSet<String> = extract_citation_markers(after).into_iter().collect();
    extract_citation_markers(before)
        .into_iter()
        .filter(|marker| !kept.contains(marker))
        .collect()
}
