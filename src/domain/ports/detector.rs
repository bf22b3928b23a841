use async_trait::async_trait;

use crate::domain::models::DetectionReport;

/// Scores how human a text reads.
///
/// `check` never fails: when the underlying service is unavailable the
/// implementation returns [`DetectionReport::fail_open`] with the reason.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn check(&self, text: &str) -> DetectionReport;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "detector"
    }
}
