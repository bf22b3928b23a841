//! Humanization loop inputs, per-iteration records and the final result.

use serde::{Deserialize, Serialize};

use super::citation::CitationSet;
use super::config::HumanizationConfig;
use super::detection::DetectionReport;
use crate::domain::errors::HumanizeError;

/// Default number of rewrite attempts.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Default human-likeness target, in percent.
pub const DEFAULT_TARGET_SCORE: f64 = 70.0;

/// A text together with the score the detector gave it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    text: String,
    score: f64,
    degraded: bool,
}

impl Candidate {
    /// Candidate scored by `report`
    pub fn new(text: impl Into<String>, report: &DetectionReport) -> Self {
        Self {
            text: text.into(),
            score: report.human_percentage,
            degraded: report.is_degraded(),
        }
    }

    /// Candidate text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Human percentage of the candidate
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// True when the score is the detector's fail-open fallback.
    pub const fn degraded(&self) -> bool {
        self.degraded
    }

    /// Take the text
    pub fn into_text(self) -> String {
        self.text
    }
}

/// One detector evaluation recorded for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 0 for the initial check, then 1-based
    pub iteration: u32,
    /// Human percentage at this step
    pub score: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

/// Validated loop parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumanizationParams {
    max_iterations: u32,
    target_score: f64,
}

impl HumanizationParams {
    /// Validate raw arguments. Rejects negative budgets and targets outside [0, 100].
    pub fn new(max_iterations: i64, target_score: f64) -> Result<Self, HumanizeError> {
        if max_iterations < 0 {
            return Err(HumanizeError::InvalidArguments(format!(
                "max_iterations must be >= 0, got {max_iterations}"
            )));
        }
        let max_iterations = u32::try_from(max_iterations).map_err(|_| {
            HumanizeError::InvalidArguments(format!(
                "max_iterations too large: {max_iterations}"
            ))
        })?;
        if !target_score.is_finite() || !(0.0..=100.0).contains(&target_score) {
            return Err(HumanizeError::InvalidArguments(format!(
                "target_score must be within [0, 100], got {target_score}"
            )));
        }
        Ok(Self {
            max_iterations,
            target_score,
        })
    }

    /// Rewrite budget
    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Human percentage to reach
    pub const fn target_score(&self) -> f64 {
        self.target_score
    }
}

impl Default for HumanizationParams {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            target_score: DEFAULT_TARGET_SCORE,
        }
    }
}

/// A humanization request as received from the command line.
///
/// Omitted limits fall back to the configured defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanizationRequest {
    /// Text to humanize
    pub thesis_text: String,
    #[serde(default)]
    pub citations: CitationSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_score: Option<f64>,
}

impl HumanizationRequest {
    /// Validated parameters, using the built-in defaults for omitted values.
    pub fn params(&self) -> Result<HumanizationParams, HumanizeError> {
        self.params_or(&HumanizationConfig::default())
    }

    /// Validated parameters, using `defaults` for omitted values.
    pub fn params_or(
        &self,
        defaults: &HumanizationConfig,
    ) -> Result<HumanizationParams, HumanizeError> {
        HumanizationParams::new(
            self.max_iterations
                .unwrap_or_else(|| i64::from(defaults.max_iterations)),
            self.target_score.unwrap_or(defaults.target_score),
        )
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The input already met the target; nothing was rewritten.
    AlreadyAboveTarget,
    /// A rewrite met the target.
    TargetReached,
    /// The iteration budget ran out.
    BudgetExhausted,
    /// Too many consecutive iterations without improving on the best score.
    Stagnated,
}

/// Score of the returned text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScore {
    /// Human percentage of the returned text
    pub human_percentage: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

/// Outcome of one humanization invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanizationResult {
    /// Returned text
    pub humanized_text: String,
    /// Score of the returned text
    pub final_score: FinalScore,
    /// Rewrites performed
    pub iterations: u32,
    /// Initial check followed by one entry per rewrite
    pub history: Vec<HistoryEntry>,
    /// Why the loop stopped
    pub stop_reason: StopReason,
}

impl HumanizationResult {
    /// True if any evaluation fell back to the fail-open score.
    pub fn used_fallback_detection(&self) -> bool {
        self.history.iter().any(|entry| entry.degraded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params = HumanizationParams::default();
        assert_eq!(params.max_iterations(), 5);
        assert!((params.target_score() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_params_reject_negative_iterations() {
        let err = HumanizationParams::new(-1, 70.0).unwrap_err();
        assert!(matches!(err, HumanizeError::InvalidArguments(_)));
    }

    #[test]
    fn test_params_reject_out_of_range_target() {
        assert!(HumanizationParams::new(3, 100.5).is_err());
        assert!(HumanizationParams::new(3, -0.1).is_err());
        assert!(HumanizationParams::new(3, f64::NAN).is_err());
    }

    #[test]
    fn test_params_accept_bounds() {
        assert!(HumanizationParams::new(0, 0.0).is_ok());
        assert!(HumanizationParams::new(0, 100.0).is_ok());
    }

    #[test]
    fn test_request_defaults() {
        let request: HumanizationRequest =
            serde_json::from_str(r#"{"thesis_text": "Text", "citations": []}"#).unwrap();
        assert!(request.citations.is_empty());

        let params = request.params().unwrap();
        assert_eq!(params.max_iterations(), 5);
        assert!((params.target_score() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_request_accepts_loosely_typed_citations() {
        let request: HumanizationRequest = serde_json::from_str(
            r#"{"thesis_text": "Text", "citations": [
                {"id": "c1", "title": "X", "year": "2020"},
                {"id": 1, "authors": "Schmidt, A.", "year": "o.J."}
            ]}"#,
        )
        .unwrap();
        assert_eq!(request.citations.len(), 2);

        let first = request.citations.iter().next().unwrap();
        assert_eq!(first.as_value()["year"], "2020");
    }

    #[test]
    fn test_request_uses_configured_defaults() {
        let request: HumanizationRequest =
            serde_json::from_str(r#"{"thesis_text": "Text", "target_score": 90}"#).unwrap();
        let defaults = HumanizationConfig {
            max_iterations: 2,
            target_score: 60.0,
            ..Default::default()
        };

        let params = request.params_or(&defaults).unwrap();
        assert_eq!(params.max_iterations(), 2);
        assert!((params.target_score() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_request_rejects_negative_budget() {
        let request: HumanizationRequest =
            serde_json::from_str(r#"{"thesis_text": "Text", "max_iterations": -2}"#).unwrap();
        assert!(matches!(
            request.params(),
            Err(HumanizeError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_history_entry_omits_degraded_when_false() {
        let entry = HistoryEntry {
            iteration: 0,
            score: 42.0,
            degraded: false,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"iteration": 0, "score": 42.0}));
    }
}
