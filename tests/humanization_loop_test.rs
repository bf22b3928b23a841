//! Behaviour of the humanization loop against scripted collaborators.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::{assert_close, numbered_rewriter, scripted_loop, scripted_loop_with};
use thesis_humanizer::domain::models::{DegradedReason, DetectionReport};
use thesis_humanizer::{
    Citation, CitationSet, Detector, HumanizationLoop, HumanizationParams, HumanizeError,
    LoopSettings, RewriteError, Rewriter, ScriptedDetector, ScriptedRewriter, StopReason,
};

const INPUT: &str = "Original thesis paragraph.^1";

fn params(max_iterations: i64, target: f64) -> HumanizationParams {
    HumanizationParams::new(max_iterations, target).unwrap()
}

#[tokio::test]
async fn test_target_reached_mid_loop() {
    // Initial 40, rewrites score 55, 72, 68; stops at the second rewrite.
    let rewriter = numbered_rewriter(3);
    let detector = ScriptedDetector::from_scores(&[40.0, 55.0, 72.0, 68.0]);
    let humanizer = scripted_loop(&rewriter, &detector);

    let result = humanizer
        .run(INPUT, &CitationSet::default(), params(3, 70.0))
        .await
        .unwrap();

    assert_eq!(result.iterations, 2);
    assert_close(result.final_score.human_percentage, 72.0);
    assert_eq!(result.humanized_text, "draft 2");
    assert_eq!(result.history.len(), 3);
    let iterations: Vec<u32> = result.history.iter().map(|h| h.iteration).collect();
    assert_eq!(iterations, vec![0, 1, 2]);
    assert_eq!(result.stop_reason, StopReason::TargetReached);
    assert_eq!(rewriter.calls().await.len(), 2);
}

#[tokio::test]
async fn test_already_above_target_skips_rewriting() {
    let rewriter = numbered_rewriter(3);
    let detector = ScriptedDetector::from_scores(&[80.0]);
    let humanizer = scripted_loop(&rewriter, &detector);

    let result = humanizer
        .run(INPUT, &CitationSet::default(), params(5, 70.0))
        .await
        .unwrap();

    assert_eq!(result.iterations, 0);
    assert_eq!(result.humanized_text, INPUT);
    assert_eq!(result.history.len(), 1);
    assert_eq!(result.stop_reason, StopReason::AlreadyAboveTarget);
    assert!(rewriter.calls().await.is_empty());
}

#[tokio::test]
async fn test_exact_target_counts_as_success() {
    let rewriter = numbered_rewriter(1);
    let detector = ScriptedDetector::from_scores(&[70.0]);
    let humanizer = scripted_loop(&rewriter, &detector);

    let result = humanizer
        .run(INPUT, &CitationSet::default(), params(3, 70.0))
        .await
        .unwrap();

    assert_eq!(result.iterations, 0);
    assert_eq!(result.stop_reason, StopReason::AlreadyAboveTarget);
}

#[tokio::test]
async fn test_budget_exhausted_returns_best() {
    // Initial 20, rewrites 30 then 25: the 30-scoring draft wins.
    let rewriter = numbered_rewriter(2);
    let detector = ScriptedDetector::from_scores(&[20.0, 30.0, 25.0]);
    let humanizer = scripted_loop(&rewriter, &detector);

    let result = humanizer
        .run(INPUT, &CitationSet::default(), params(2, 70.0))
        .await
        .unwrap();

    assert_eq!(result.iterations, 2);
    assert_eq!(result.humanized_text, "draft 1");
    assert_close(result.final_score.human_percentage, 30.0);
    assert_eq!(result.stop_reason, StopReason::BudgetExhausted);
}

#[tokio::test]
async fn test_detector_outage_fails_open_and_stops() {
    let rewriter = numbered_rewriter(3);
    let detector = ScriptedDetector::new(vec![
        DetectionReport::measured(30.0, 70.0, None),
        DetectionReport::measured(45.0, 55.0, None),
        DetectionReport::fail_open(DegradedReason::Transport("connection reset".to_string())),
        DetectionReport::measured(50.0, 50.0, None),
    ]);
    let humanizer = scripted_loop(&rewriter, &detector);

    let result = humanizer
        .run(INPUT, &CitationSet::default(), params(3, 70.0))
        .await
        .unwrap();

    assert_eq!(result.iterations, 2);
    assert_eq!(result.humanized_text, "draft 2");
    assert_close(result.final_score.human_percentage, 100.0);
    assert!(result.final_score.degraded);
    assert!(result.history[2].degraded);
    assert!(result.used_fallback_detection());
    assert_eq!(result.stop_reason, StopReason::TargetReached);
}

#[tokio::test]
async fn test_zero_budget_only_checks_once() {
    let rewriter = numbered_rewriter(1);
    let detector = ScriptedDetector::from_scores(&[10.0]);
    let humanizer = scripted_loop(&rewriter, &detector);

    let result = humanizer
        .run(INPUT, &CitationSet::default(), params(0, 70.0))
        .await
        .unwrap();

    assert_eq!(result.iterations, 0);
    assert_eq!(result.humanized_text, INPUT);
    assert_eq!(result.history.len(), 1);
    assert_eq!(result.stop_reason, StopReason::BudgetExhausted);
    assert_eq!(detector.checked().await.len(), 1);
    assert!(rewriter.calls().await.is_empty());
}

#[tokio::test]
async fn test_decreasing_scores_return_original_text() {
    let rewriter = numbered_rewriter(3);
    let detector = ScriptedDetector::from_scores(&[50.0, 40.0, 30.0, 20.0]);
    let humanizer = scripted_loop(&rewriter, &detector);

    let result = humanizer
        .run(INPUT, &CitationSet::default(), params(3, 70.0))
        .await
        .unwrap();

    assert_eq!(result.humanized_text, INPUT);
    assert_close(result.final_score.human_percentage, 50.0);
    assert_eq!(result.iterations, 3);
}

#[tokio::test]
async fn test_each_rewrite_starts_from_latest_text() {
    let rewriter = numbered_rewriter(3);
    // draft 1 is best, but draft 2 must still be rewritten from draft 2.
    let detector = ScriptedDetector::from_scores(&[10.0, 60.0, 20.0, 30.0]);
    let humanizer = scripted_loop(&rewriter, &detector);

    humanizer
        .run(INPUT, &CitationSet::default(), params(3, 70.0))
        .await
        .unwrap();

    assert_eq!(rewriter.calls().await, vec![INPUT, "draft 1", "draft 2"]);
    assert_eq!(
        detector.checked().await,
        vec![INPUT, "draft 1", "draft 2", "draft 3"]
    );
}

#[tokio::test]
async fn test_identity_rewriter_exhausts_budget() {
    let rewriter = ScriptedRewriter::identity();
    let detector = ScriptedDetector::fixed(35.0);
    let humanizer = scripted_loop(&rewriter, &detector);

    let result = humanizer
        .run(INPUT, &CitationSet::default(), params(4, 70.0))
        .await
        .unwrap();

    assert_eq!(result.iterations, 4);
    assert_eq!(result.humanized_text, INPUT);
    assert_eq!(result.history.len(), 5);
}

#[tokio::test]
async fn test_rewrite_failure_is_propagated() {
    let rewriter = ScriptedRewriter::new(vec![
        Ok("draft 1".to_string()),
        Err(RewriteError::Api("quota exhausted".to_string())),
    ]);
    let detector = ScriptedDetector::from_scores(&[10.0, 20.0]);
    let humanizer = scripted_loop(&rewriter, &detector);

    let err = humanizer
        .run(INPUT, &CitationSet::default(), params(5, 70.0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HumanizeError::RewriteFailure(RewriteError::Api(ref message)) if message == "quota exhausted"
    ));
    assert_eq!(err.kind(), "RewriteFailure");
    // No detection is attempted for the failed rewrite.
    assert_eq!(detector.checked().await.len(), 2);
}

#[tokio::test]
async fn test_invalid_arguments_make_no_calls() {
    let rewriter = numbered_rewriter(1);
    let detector = ScriptedDetector::fixed(10.0);
    let humanizer = scripted_loop(&rewriter, &detector);

    for (max_iterations, target) in [(-1, 70.0), (3, 101.0), (3, -5.0), (3, f64::INFINITY)] {
        let err = humanizer
            .humanize(INPUT, &CitationSet::default(), max_iterations, target)
            .await
            .unwrap_err();
        assert!(matches!(err, HumanizeError::InvalidArguments(_)));
    }

    assert!(detector.checked().await.is_empty());
    assert!(rewriter.calls().await.is_empty());
}

#[tokio::test]
async fn test_humanize_with_valid_arguments() {
    let rewriter = numbered_rewriter(1);
    let detector = ScriptedDetector::from_scores(&[10.0, 90.0]);
    let humanizer = scripted_loop(&rewriter, &detector);

    let result = humanizer
        .humanize(INPUT, &CitationSet::default(), 5, 70.0)
        .await
        .unwrap();

    assert_eq!(result.iterations, 1);
    assert_eq!(result.humanized_text, "draft 1");
}

#[tokio::test]
async fn test_early_exit_is_idempotent() {
    let first = {
        let detector = ScriptedDetector::fixed(90.0);
        scripted_loop(&numbered_rewriter(2), &detector)
            .run(INPUT, &CitationSet::default(), params(2, 70.0))
            .await
            .unwrap()
    };
    let second = {
        let detector = ScriptedDetector::fixed(90.0);
        scripted_loop(&numbered_rewriter(2), &detector)
            .run(INPUT, &CitationSet::default(), params(2, 70.0))
            .await
            .unwrap()
    };

    assert_eq!(first.iterations, second.iterations);
    assert_eq!(first.humanized_text, second.humanized_text);
}

#[tokio::test]
async fn test_stagnation_limit_stops_early() {
    let rewriter = numbered_rewriter(5);
    let detector = ScriptedDetector::from_scores(&[40.0, 50.0, 45.0, 48.0, 60.0, 65.0]);
    let settings = LoopSettings::immediate().with_stagnation_limit(2);
    let humanizer = scripted_loop_with(&rewriter, &detector, settings);

    let result = humanizer
        .run(INPUT, &CitationSet::default(), params(5, 70.0))
        .await
        .unwrap();

    assert_eq!(result.iterations, 3);
    assert_eq!(result.stop_reason, StopReason::Stagnated);
    assert_eq!(result.humanized_text, "draft 1");
    assert_close(result.final_score.human_percentage, 50.0);
}

#[tokio::test]
async fn test_without_stagnation_limit_all_iterations_run() {
    let rewriter = numbered_rewriter(5);
    let detector = ScriptedDetector::from_scores(&[40.0, 50.0, 45.0, 48.0, 47.0, 46.0]);
    let humanizer = scripted_loop(&rewriter, &detector);

    let result = humanizer
        .run(INPUT, &CitationSet::default(), params(5, 70.0))
        .await
        .unwrap();

    assert_eq!(result.iterations, 5);
    assert_eq!(result.stop_reason, StopReason::BudgetExhausted);
}

#[tokio::test(start_paused = true)]
async fn test_delay_between_iterations_but_not_after_last() {
    let rewriter = numbered_rewriter(3);
    let detector = ScriptedDetector::from_scores(&[10.0, 20.0, 30.0, 40.0]);
    let settings = LoopSettings::immediate().with_inter_iteration_delay(Duration::from_secs(1));
    let humanizer = scripted_loop_with(&rewriter, &detector, settings);

    let start = tokio::time::Instant::now();
    let result = humanizer
        .run(INPUT, &CitationSet::default(), params(3, 70.0))
        .await
        .unwrap();

    assert_eq!(result.iterations, 3);
    // Two pauses between three iterations.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "elapsed {elapsed:?}");
}

#[tokio::test]
async fn test_immediate_settings_do_not_sleep() {
    let rewriter = numbered_rewriter(5);
    let detector = ScriptedDetector::fixed(10.0);
    let humanizer = scripted_loop(&rewriter, &detector);

    let start = Instant::now();
    humanizer
        .run(INPUT, &CitationSet::default(), params(5, 70.0))
        .await
        .unwrap();

    assert!(start.elapsed() < Duration::from_millis(500));
}

/// Rewriter that never answers.
struct HangingRewriter;

#[async_trait]
impl Rewriter for HangingRewriter {
    async fn rewrite(&self, _text: &str, _citations: &CitationSet) -> Result<String, RewriteError> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn test_run_timeout_returns_timeout_error() {
    let detector = ScriptedDetector::fixed(10.0);
    let humanizer = HumanizationLoop::new(
        Arc::new(HangingRewriter),
        Arc::new(detector),
        LoopSettings::immediate().with_run_timeout(Duration::from_secs(30)),
    );

    let err = humanizer
        .run(INPUT, &CitationSet::default(), params(3, 70.0))
        .await
        .unwrap_err();

    assert!(matches!(err, HumanizeError::Timeout(limit) if limit == Duration::from_secs(30)));
    assert_eq!(err.kind(), "Timeout");
}

/// Rewriter that records the citations it was handed.
#[derive(Default)]
struct CitationRecorder {
    seen: tokio::sync::Mutex<Vec<CitationSet>>,
}

#[async_trait]
impl Rewriter for CitationRecorder {
    async fn rewrite(&self, text: &str, citations: &CitationSet) -> Result<String, RewriteError> {
        self.seen.lock().await.push(citations.clone());
        Ok(format!("{text} again"))
    }
}

#[tokio::test]
async fn test_citations_forwarded_unchanged_on_every_call() {
    let citations = CitationSet::new(vec![Citation::new(serde_json::json!({
        "id": "cite1",
        "authors": ["Bostrom, N."],
        "year": "2003",
        "title": "Are You Living in a Computer Simulation?",
        "pages": 243
    }))]);
    let recorder = Arc::new(CitationRecorder::default());
    let detector = ScriptedDetector::fixed(10.0);
    let humanizer = HumanizationLoop::new(
        recorder.clone(),
        Arc::new(detector),
        LoopSettings::immediate(),
    );

    humanizer
        .run(INPUT, &citations, params(3, 70.0))
        .await
        .unwrap();

    let seen = recorder.seen.lock().await;
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|set| *set == citations));
}

/// Detector with some latency that rates drafts as human.
struct SlowDetector;

#[async_trait]
impl Detector for SlowDetector {
    async fn check(&self, text: &str) -> DetectionReport {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let score = if text.contains("draft") { 90.0 } else { 10.0 };
        DetectionReport::measured(score, 100.0 - score, None)
    }
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let humanizer = Arc::new(HumanizationLoop::new(
        Arc::new(ScriptedRewriter::new(
            (0..4).map(|i| Ok(format!("draft {i}"))).collect(),
        )),
        Arc::new(SlowDetector),
        LoopSettings::immediate(),
    ));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let humanizer = Arc::clone(&humanizer);
            tokio::spawn(async move {
                humanizer
                    .run(&format!("text {i}"), &CitationSet::default(), params(2, 70.0))
                    .await
            })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.iterations, 1);
        assert_eq!(result.history.len(), 2);
        assert!(result.humanized_text.starts_with("draft"));
    }
}
