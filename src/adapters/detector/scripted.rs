//! Scripted detector for tests and offline runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::models::DetectionReport;
use crate::domain::ports::Detector;

/// Detector that replays a fixed list of reports.
///
/// After the script runs out the last report handed out is repeated.
#[derive(Debug, Clone)]
pub struct ScriptedDetector {
    script: Arc<Mutex<VecDeque<DetectionReport>>>,
    last: Arc<Mutex<DetectionReport>>,
    checked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedDetector {
    /// Detector returning `reports` in order, then repeating the last
    pub fn new(reports: Vec<DetectionReport>) -> Self {
        let mut script: VecDeque<DetectionReport> = reports.into();
        let first = script
            .front()
            .cloned()
            .unwrap_or_else(|| DetectionReport::measured(0.0, 100.0, None));
        if script.len() == 1 {
            script.clear();
        }
        Self {
            script: Arc::new(Mutex::new(script)),
            last: Arc::new(Mutex::new(first)),
            checked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Measured human percentages, in call order.
    pub fn from_scores(scores: &[f64]) -> Self {
        Self::new(
            scores
                .iter()
                .map(|&human| DetectionReport::measured(human, 100.0 - human, None))
                .collect(),
        )
    }

    /// Always reports the same measured score.
    pub fn fixed(human_percentage: f64) -> Self {
        Self::from_scores(&[human_percentage])
    }

    /// Texts submitted for detection, in call order.
    pub async fn checked(&self) -> Vec<String> {
        self.checked.lock().await.clone()
    }
}

#[async_trait]
impl Detector for ScriptedDetector {
    async fn check(&self, text: &str) -> DetectionReport {
        self.checked.lock().await.push(text.to_string());

        let mut last = self.last.lock().await;
        if let Some(next) = self.script.lock().await.pop_front() {
            *last = next;
        }
        last.clone()
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::DegradedReason;

    #[tokio::test]
    async fn test_scores_in_order_then_repeat_last() {
        let detector = ScriptedDetector::from_scores(&[10.0, 20.0]);

        assert!((detector.check("a").await.human_percentage - 10.0).abs() < f64::EPSILON);
        assert!((detector.check("b").await.human_percentage - 20.0).abs() < f64::EPSILON);
        assert!((detector.check("c").await.human_percentage - 20.0).abs() < f64::EPSILON);
        assert_eq!(detector.checked().await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_fixed_score() {
        let detector = ScriptedDetector::fixed(55.0);
        for _ in 0..3 {
            let report = detector.check("text").await;
            assert!((report.human_percentage - 55.0).abs() < f64::EPSILON);
            assert!(!report.is_degraded());
        }
    }

    #[tokio::test]
    async fn test_replays_degraded_reports() {
        let detector = ScriptedDetector::new(vec![
            DetectionReport::measured(30.0, 70.0, None),
            DetectionReport::fail_open(DegradedReason::HttpStatus(503)),
        ]);
        assert!(!detector.check("a").await.is_degraded());
        assert!(detector.check("b").await.is_degraded());
    }
}
