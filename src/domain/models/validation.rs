//! Thesis validation inputs and report.

use serde::{Deserialize, Serialize};

use super::citation::CitationSet;

/// Words assumed per page when the length is given in pages.
pub const WORDS_PER_PAGE: f64 = 300.0;

/// Length requirements of a thesis. Unknown keys are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThesisSpecifications {
    #[serde(default)]
    pub target_length: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_unit: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ThesisSpecifications {
    /// Target length in words, converting pages when needed.
    pub fn target_words(&self) -> f64 {
        match self.length_unit.as_deref() {
            Some("pages") => self.target_length * WORDS_PER_PAGE,
            _ => self.target_length,
        }
    }
}

/// A validation request as received from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Thesis body
    pub thesis_text: String,
    #[serde(default)]
    pub specifications: ThesisSpecifications,
    #[serde(default)]
    pub mandatory_sources: Vec<String>,
    #[serde(default)]
    pub citations: CitationSet,
}

/// Outcome of a thesis validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when `errors` is empty
    pub valid: bool,
    /// Whitespace-separated words
    pub word_count: usize,
    /// False when the upper length bound is exceeded
    pub word_count_within_limit: bool,
    /// Mandatory sources neither cited nor mentioned
    pub missing_mandatory_sources: Vec<String>,
    /// Human-readable findings
    pub errors: Vec<String>,
}
