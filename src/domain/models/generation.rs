//! Thesis generation and citation extraction requests and results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::citation::CitationSet;
use super::validation::{ThesisSpecifications, ValidationReport};

/// Citation style assumed when the specifications name none.
pub const DEFAULT_CITATION_STYLE: &str = "apa";

/// Target length used when the specifications give none, in words.
pub const DEFAULT_TARGET_WORDS: f64 = 5000.0;

/// Everything the writer needs to draft a thesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Chapter structure, passed to the model as JSON
    pub outline: Value,
    /// Question the thesis answers
    pub research_question: String,
    /// Length, style and language requirements
    #[serde(default)]
    pub specifications: ThesisSpecifications,
    /// Sources the thesis must cite
    #[serde(default)]
    pub mandatory_sources: Vec<String>,
    /// Researched source records; the only sources the writer may cite
    #[serde(default)]
    pub available_sources: Vec<Value>,
}

/// A request to extract the citations used in a finished thesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Finished thesis text
    pub thesis_text: String,
    /// Defaults to `apa`
    #[serde(default)]
    pub citation_style: Option<String>,
}

impl ExtractionRequest {
    /// Requested citation style, `apa` when absent.
    pub fn citation_style(&self) -> &str {
        self.citation_style
            .as_deref()
            .unwrap_or(DEFAULT_CITATION_STYLE)
    }
}

/// Output of a full generate, extract and validate run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated thesis in Markdown
    pub thesis_text: String,
    /// Citations found in the generated text
    pub citations: CitationSet,
    /// Quality check of the generated text
    pub validation: ValidationReport,
    /// Same as `validation.word_count`
    pub word_count: usize,
}

impl ThesisSpecifications {
    /// Citation style named in the specifications, `apa` when absent.
    pub fn citation_style(&self) -> &str {
        self.extra
            .get("citationStyle")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_CITATION_STYLE)
    }

    /// Target words for drafting; falls back to [`DEFAULT_TARGET_WORDS`].
    pub fn drafting_target_words(&self) -> f64 {
        let target = self.target_words();
        if target.is_finite() && target > 0.0 {
            target
        } else {
            DEFAULT_TARGET_WORDS
        }
    }

    /// A string entry from the extra keys, e.g. `title` or `language`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_request_defaults() {
        let request: GenerationRequest = serde_json::from_str(
            r#"{"outline": [{"chapter": "1. Introduction"}], "research_question": "Why?"}"#,
        )
        .unwrap();
        assert!(request.mandatory_sources.is_empty());
        assert!(request.available_sources.is_empty());
        assert_eq!(request.specifications.citation_style(), "apa");
        assert!((request.specifications.drafting_target_words() - 5000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_specifications_read_style_and_pages() {
        let specs: ThesisSpecifications = serde_json::from_str(
            r#"{"targetLength": 20, "lengthUnit": "pages", "citationStyle": "harvard", "title": "Simulation"}"#,
        )
        .unwrap();
        assert_eq!(specs.citation_style(), "harvard");
        assert_eq!(specs.text("title"), Some("Simulation"));
        assert!((specs.drafting_target_words() - 6000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_extraction_style_defaults_to_apa() {
        let request: ExtractionRequest =
            serde_json::from_str(r#"{"thesis_text": "Text (Smith, 2020)."}"#).unwrap();
        assert_eq!(request.citation_style(), "apa");

        let request: ExtractionRequest = serde_json::from_str(
            r#"{"thesis_text": "Text.^1", "citation_style": "deutsche-zitierweise"}"#,
        )
        .unwrap();
        assert_eq!(request.citation_style(), "deutsche-zitierweise");
    }
}
