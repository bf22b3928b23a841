//! Thesis quality validation.
//!
//! Checks the word count against the requested length, verifies that
//! mandatory sources are cited, and rejects artifacts a text-only thesis
//! must not contain (images, tables, assistant boilerplate).

use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, instrument};

use crate::domain::models::{CitationSet, QualityConfig, ThesisSpecifications, ValidationReport};

/// Patterns that must not appear anywhere in the thesis.
pub const FORBIDDEN_PATTERNS: &[&str] = &[
    r"!\[.*?\]\(.*?\)",
    r"\|.*\|.*\|",
    r"<table>",
    r"Here is a table",
    r"As an AI",
    r"I cannot create",
];

fn forbidden_regexes() -> &'static [(&'static str, Regex)] {
    static REGEXES: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    REGEXES.get_or_init(|| {
        FORBIDDEN_PATTERNS
            .iter()
            .map(|pattern| {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .expect("forbidden patterns are valid");
                (*pattern, regex)
            })
            .collect()
    })
}

/// Validates generated theses against their specifications.
#[derive(Debug, Clone)]
pub struct QualityChecker {
    word_count_tolerance: f64,
}

impl Default for QualityChecker {
    fn default() -> Self {
        Self::from_config(&QualityConfig::default())
    }
}

impl QualityChecker {
    /// Checker accepting up to `word_count_tolerance` above the target length
    pub const fn new(word_count_tolerance: f64) -> Self {
        Self {
            word_count_tolerance,
        }
    }

    /// Checker from the `quality` config section
    pub const fn from_config(config: &QualityConfig) -> Self {
        Self::new(config.word_count_tolerance)
    }

    /// Highest accepted word count for the given specifications.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn max_words(&self, specs: &ThesisSpecifications) -> usize {
        let limit = specs.target_words() * (1.0 + self.word_count_tolerance);
        if limit.is_finite() && limit > 0.0 {
            limit.floor() as usize
        } else {
            0
        }
    }

    /// Validate `text`. Only exceeding the maximum length counts as an error;
    /// shorter texts pass.
    #[instrument(skip_all, fields(mandatory = mandatory_sources.len(), citations = citations.len()))]
    pub fn validate(
        &self,
        text: &str,
        specs: &ThesisSpecifications,
        mandatory_sources: &[String],
        citations: &CitationSet,
    ) -> ValidationReport {
        let mut errors = Vec::new();

        for (pattern, regex) in forbidden_regexes() {
            if regex.is_match(text) {
                errors.push(format!("Found forbidden pattern: {pattern}"));
            }
        }

        let word_count = text.split_whitespace().count();
        let max_length = self.max_words(specs);
        let word_count_within_limit = word_count <= max_length;
        if !word_count_within_limit {
            errors.push(format!("Word count {word_count} exceeds limit {max_length}"));
        }

        let missing = missing_mandatory_sources(text, mandatory_sources, citations);
        if !missing.is_empty() {
            errors.push(format!("Missing mandatory sources: {}", missing.join(", ")));
        }

        debug!(word_count, max_length, errors = errors.len(), "Thesis validated");

        ValidationReport {
            valid: errors.is_empty(),
            word_count,
            word_count_within_limit,
            missing_mandatory_sources: missing,
            errors,
        }
    }
}

/// Sources not matched by any citation title/DOI nor mentioned in the text.
///
/// A match is a case-insensitive substring in either direction.
fn missing_mandatory_sources(
    text: &str,
    mandatory_sources: &[String],
    citations: &CitationSet,
) -> Vec<String> {
    let cited: HashSet<String> = citations
        .iter()
        .flat_map(|citation| [citation.title(), citation.doi()])
        .flatten()
        .filter(|value| !value.trim().is_empty())
        .map(str::to_lowercase)
        .collect();
    let text_lower = text.to_lowercase();

    mandatory_sources
        .iter()
        .filter(|source| {
            let source_lower = source.to_lowercase();
            let cited_match = cited
                .iter()
                .any(|c| c.contains(&source_lower) || source_lower.contains(c.as_str()));
            !cited_match && !text_lower.contains(&source_lower)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Citation;

    fn specs(target: f64, unit: &str) -> ThesisSpecifications {
        ThesisSpecifications {
            target_length: target,
            length_unit: Some(unit.to_string()),
            ..Default::default()
        }
    }

    fn words(n: usize) -> String {
        vec!["wort"; n].join(" ")
    }

    #[test]
    fn test_clean_text_is_valid() {
        let report = QualityChecker::default().validate(
            &words(100),
            &specs(100.0, "words"),
            &[],
            &CitationSet::default(),
        );
        assert!(report.valid);
        assert_eq!(report.word_count, 100);
        assert!(report.word_count_within_limit);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_word_count_upper_bound_is_strict() {
        let checker = QualityChecker::default();
        let specs = specs(100.0, "words");

        let at_limit = checker.validate(&words(110), &specs, &[], &CitationSet::default());
        assert!(at_limit.word_count_within_limit);

        let over = checker.validate(&words(111), &specs, &[], &CitationSet::default());
        assert!(!over.word_count_within_limit);
        assert!(!over.valid);
        assert_eq!(over.errors, vec!["Word count 111 exceeds limit 110"]);
    }

    #[test]
    fn test_short_text_passes() {
        let report = QualityChecker::default().validate(
            &words(10),
            &specs(1000.0, "words"),
            &[],
            &CitationSet::default(),
        );
        assert!(report.word_count_within_limit);
    }

    #[test]
    fn test_pages_limit() {
        let checker = QualityChecker::default();
        assert_eq!(checker.max_words(&specs(2.0, "pages")), 660);
    }

    #[test]
    fn test_forbidden_patterns_case_insensitive() {
        let text = format!("{} as an ai language model I refuse. ![fig](img.png)", words(5));
        let report = QualityChecker::default().validate(
            &text,
            &specs(1000.0, "words"),
            &[],
            &CitationSet::default(),
        );
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("As an AI")));
        assert!(report.errors.iter().any(|e| e.contains(r"!\[.*?\]\(.*?\)")));
    }

    #[test]
    fn test_markdown_table_detected() {
        let report = QualityChecker::default().validate(
            "| a | b |\n|---|---|",
            &specs(1000.0, "words"),
            &[],
            &CitationSet::default(),
        );
        assert!(report.errors.iter().any(|e| e.contains(r"\|.*\|.*\|")));
    }

    #[test]
    fn test_mandatory_source_matched_by_title_substring() {
        let citations = CitationSet::new(vec![Citation::new(serde_json::json!({
            "title": "Superintelligence: Paths, Dangers, Strategies",
            "year": "2014"
        }))]);
        let report = QualityChecker::default().validate(
            &words(10),
            &specs(1000.0, "words"),
            &["superintelligence".to_string()],
            &citations,
        );
        assert!(report.missing_mandatory_sources.is_empty());
        assert!(report.valid);
    }

    #[test]
    fn test_mandatory_source_matched_by_doi_and_text() {
        let citations = CitationSet::new(vec![Citation::new(serde_json::json!({
            "doi": "10.1234/ABC"
        }))]);
        let report = QualityChecker::default().validate(
            "Discussed in Are You Living in a Computer Simulation at length.",
            &specs(1000.0, "words"),
            &[
                "https://doi.org/10.1234/abc".to_string(),
                "are you living in a computer simulation".to_string(),
            ],
            &citations,
        );
        assert!(report.missing_mandatory_sources.is_empty());
    }

    #[test]
    fn test_missing_mandatory_source_reported() {
        let citations = CitationSet::new(vec![Citation::new(serde_json::json!({
            "title": "",
            "doi": null
        }))]);
        let report = QualityChecker::default().validate(
            &words(10),
            &specs(1000.0, "words"),
            &["Bostrom 2003".to_string()],
            &citations,
        );
        assert_eq!(report.missing_mandatory_sources, vec!["Bostrom 2003"]);
        assert!(!report.valid);
        assert!(report
            .errors
            .contains(&"Missing mandatory sources: Bostrom 2003".to_string()));
    }
}
