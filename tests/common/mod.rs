//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use thesis_humanizer::{
    HumanizationLoop, LoopSettings, ScriptedDetector, ScriptedRewriter,
};

/// Rewriter producing "draft 1", "draft 2", ... for `count` calls.
pub fn numbered_rewriter(count: usize) -> ScriptedRewriter {
    ScriptedRewriter::with_outputs((1..=count).map(|i| format!("draft {i}")))
}

/// Loop over scripted collaborators with no pacing delay.
pub fn scripted_loop(
    rewriter: &ScriptedRewriter,
    detector: &ScriptedDetector,
) -> HumanizationLoop {
    scripted_loop_with(rewriter, detector, LoopSettings::immediate())
}

pub fn scripted_loop_with(
    rewriter: &ScriptedRewriter,
    detector: &ScriptedDetector,
    settings: LoopSettings,
) -> HumanizationLoop {
    HumanizationLoop::new(
        Arc::new(rewriter.clone()),
        Arc::new(detector.clone()),
        settings,
    )
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
