//! Detector scores and the degraded (fail-open) outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score assumed when the detector cannot be reached.
pub const FAIL_OPEN_HUMAN_PERCENTAGE: f64 = 100.0;

/// Why a detection could not be measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DegradedReason {
    /// No API key was configured, so no request was made.
    MissingCredentials,
    /// The request could not be sent or the connection failed.
    Transport(String),
    /// The service answered with a non-success status.
    HttpStatus(u16),
    /// The body could not be decoded.
    MalformedResponse(String),
}

/// Whether a detection score was actually measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetectionStatus {
    /// The service returned a usable score.
    Measured,
    /// The fail-open score was used.
    Degraded {
        /// What went wrong
        reason: DegradedReason,
    },
}

/// Result of one detector call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Human-likeness in [0, 100].
    pub human_percentage: f64,
    /// Machine-likeness in [0, 100]. Not guaranteed to sum to 100 with the above.
    pub fake_percentage: f64,
    /// Diagnostic payload returned by the service, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
    /// Measured or fail-open
    pub status: DetectionStatus,
    /// When the check finished
    pub checked_at: DateTime<Utc>,
}

impl DetectionReport {
    /// A measured score. Values outside [0, 100] are clamped.
    pub fn measured(
        human_percentage: f64,
        fake_percentage: f64,
        raw: Option<serde_json::Value>,
    ) -> Self {
        Self {
            human_percentage: clamp_percentage(human_percentage),
            fake_percentage: clamp_percentage(fake_percentage),
            raw,
            status: DetectionStatus::Measured,
            checked_at: Utc::now(),
        }
    }

    /// The fallback score used when detection is unavailable.
    pub fn fail_open(reason: DegradedReason) -> Self {
        Self {
            human_percentage: FAIL_OPEN_HUMAN_PERCENTAGE,
            fake_percentage: 0.0,
            raw: None,
            status: DetectionStatus::Degraded { reason },
            checked_at: Utc::now(),
        }
    }

    /// True for fail-open reports
    pub const fn is_degraded(&self) -> bool {
        matches!(self.status, DetectionStatus::Degraded { .. })
    }
}

fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
