//! Humanization loop
//!
//! Repeatedly rewrites a text and scores the result until the detector
//! reports a human-likeness at or above the target, or the iteration budget
//! runs out. The best-scoring candidate seen is never lost:
//! - each rewrite starts from the most recent text, not the best one
//! - the returned text is the last rewrite if it met the target, else the best
//! - detector outages yield a degraded fail-open score, never an error
//! - rewriter failures abort the invocation

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::errors::{HumanizeError, HumanizeResult};
use crate::domain::models::{
    Candidate, CitationSet, FinalScore, HistoryEntry, HumanizationConfig, HumanizationParams,
    HumanizationResult, StopReason,
};
use crate::domain::ports::{Detector, Rewriter};

/// Pacing and early-stop settings for the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSettings {
    /// Pause between iterations; zero disables it
    pub inter_iteration_delay: Duration,
    /// Stop after this many consecutive iterations that do not improve on the best score
    pub stagnation_limit: Option<u32>,
    /// Wall-clock limit for one invocation
    pub run_timeout: Option<Duration>,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            inter_iteration_delay: Duration::from_secs(1),
            stagnation_limit: None,
            run_timeout: None,
        }
    }
}

impl LoopSettings {
    /// No delay, no stagnation stop, no timeout.
    pub const fn immediate() -> Self {
        Self {
            inter_iteration_delay: Duration::ZERO,
            stagnation_limit: None,
            run_timeout: None,
        }
    }

    /// Settings from the `humanization` config section
    pub fn from_config(config: &HumanizationConfig) -> Self {
        Self {
            inter_iteration_delay: config.inter_iteration_delay(),
            stagnation_limit: config.stagnation_limit,
            run_timeout: config.run_timeout(),
        }
    }

    /// Stop after `limit` consecutive non-improving iterations
    pub const fn with_stagnation_limit(mut self, limit: u32) -> Self {
        self.stagnation_limit = Some(limit);
        self
    }

    /// Abort the whole invocation after `limit`
    pub const fn with_run_timeout(mut self, limit: Duration) -> Self {
        self.run_timeout = Some(limit);
        self
    }

    /// Pause between iterations
    pub const fn with_inter_iteration_delay(mut self, delay: Duration) -> Self {
        self.inter_iteration_delay = delay;
        self
    }
}

/// Where an invocation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Scoring the input text.
    InitialCheck,
    /// Running rewrite attempt `iteration` (1-based).
    Looping { iteration: u32 },
    /// Finished.
    Done(StopReason),
}

/// Per-invocation state. Never shared between invocations.
#[derive(Debug)]
struct LoopState {
    phase: LoopPhase,
    current: Candidate,
    best: Candidate,
    iteration: u32,
    history: Vec<HistoryEntry>,
    /// Consecutive iterations without a new best
    non_improving: u32,
}

impl LoopState {
    fn new(initial: Candidate) -> Self {
        let history = vec![HistoryEntry {
            iteration: 0,
            score: initial.score(),
            degraded: initial.degraded(),
        }];
        Self {
            phase: LoopPhase::InitialCheck,
            best: initial.clone(),
            current: initial,
            iteration: 0,
            history,
            non_improving: 0,
        }
    }

    fn enter(&mut self, phase: LoopPhase) {
        debug!(from = ?self.phase, to = ?phase, "Loop phase change");
        self.phase = phase;
    }

    /// Record a completed rewrite. Returns true if it became the new best.
    fn advance(&mut self, candidate: Candidate) -> bool {
        self.iteration += 1;
        self.history.push(HistoryEntry {
            iteration: self.iteration,
            score: candidate.score(),
            degraded: candidate.degraded(),
        });

        let improved = candidate.score() > self.best.score();
        self.current = candidate;
        if improved {
            self.best = self.current.clone();
            self.non_improving = 0;
        } else {
            self.non_improving += 1;
        }
        improved
    }

    fn finish(mut self, reason: StopReason, target_score: f64) -> HumanizationResult {
        self.enter(LoopPhase::Done(reason));

        let chosen = if self.current.score() >= target_score {
            self.current
        } else {
            self.best
        };

        HumanizationResult {
            final_score: FinalScore {
                human_percentage: chosen.score(),
                degraded: chosen.degraded(),
            },
            humanized_text: chosen.into_text(),
            iterations: self.iteration,
            history: self.history,
            stop_reason: reason,
        }
    }
}

/// Orchestrates rewrite/score cycles between a [`Rewriter`] and a [`Detector`].
///
/// Invocations are independent; one loop can serve concurrent calls as long
/// as the collaborators are thread-safe.
pub struct HumanizationLoop {
    rewriter: Arc<dyn Rewriter>,
    detector: Arc<dyn Detector>,
    settings: LoopSettings,
}

impl HumanizationLoop {
    /// Loop over the given collaborators
    pub fn new(
        rewriter: Arc<dyn Rewriter>,
        detector: Arc<dyn Detector>,
        settings: LoopSettings,
    ) -> Self {
        Self {
            rewriter,
            detector,
            settings,
        }
    }

    /// Active settings
    pub const fn settings(&self) -> &LoopSettings {
        &self.settings
    }

    /// Validate raw arguments, then [`run`](Self::run).
    ///
    /// Invalid arguments are rejected before any collaborator is called.
    pub async fn humanize(
        &self,
        text: &str,
        citations: &CitationSet,
        max_iterations: i64,
        target_score: f64,
    ) -> HumanizeResult<HumanizationResult> {
        let params = HumanizationParams::new(max_iterations, target_score)?;
        self.run(text, citations, params).await
    }

    /// Humanize `text`.
    ///
    /// With a run timeout configured, expiry abandons any in-flight call and
    /// returns [`HumanizeError::Timeout`] without a partial result.
    pub async fn run(
        &self,
        text: &str,
        citations: &CitationSet,
        params: HumanizationParams,
    ) -> HumanizeResult<HumanizationResult> {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "humanize",
            %run_id,
            rewriter = self.rewriter.name(),
            detector = self.detector.name(),
            max_iterations = params.max_iterations(),
            target_score = params.target_score(),
        );
        let run = self.execute(text, citations, params).instrument(span);

        match self.settings.run_timeout {
            Some(limit) => timeout(limit, run).await.map_err(|_| {
                warn!(%run_id, ?limit, "Humanization timed out");
                HumanizeError::Timeout(limit)
            })?,
            None => run.await,
        }
    }

    async fn execute(
        &self,
        text: &str,
        citations: &CitationSet,
        params: HumanizationParams,
    ) -> HumanizeResult<HumanizationResult> {
        let target = params.target_score();
        let max_iterations = params.max_iterations();

        let report = self.detector.check(text).await;
        let mut state = LoopState::new(Candidate::new(text, &report));
        info!(
            score = state.current.score(),
            degraded = state.current.degraded(),
            "Initial detection score"
        );

        if state.current.score() >= target {
            info!("Text already meets target, skipping rewrites");
            return Ok(state.finish(StopReason::AlreadyAboveTarget, target));
        }

        let mut reason = StopReason::BudgetExhausted;
        for iteration in 1..=max_iterations {
            state.enter(LoopPhase::Looping { iteration });

            let rewritten = self
                .rewriter
                .rewrite(state.current.text(), citations)
                .await
                .map_err(|err| {
                    warn!(iteration, error = %err, "Rewrite failed, aborting");
                    HumanizeError::RewriteFailure(err)
                })?;

            let report = self.detector.check(&rewritten).await;
            let improved = state.advance(Candidate::new(rewritten, &report));
            info!(
                iteration,
                score = state.current.score(),
                best = state.best.score(),
                degraded = state.current.degraded(),
                improved,
                "Iteration scored"
            );

            if state.current.score() >= target {
                reason = StopReason::TargetReached;
                break;
            }

            if let Some(limit) = self.settings.stagnation_limit {
                if state.non_improving >= limit {
                    info!(limit, "No improvement, stopping early");
                    reason = StopReason::Stagnated;
                    break;
                }
            }

            if iteration < max_iterations && !self.settings.inter_iteration_delay.is_zero() {
                sleep(self.settings.inter_iteration_delay).await;
            }
        }

        let result = state.finish(reason, target);
        info!(
            iterations = result.iterations,
            final_score = result.final_score.human_percentage,
            stop_reason = ?result.stop_reason,
            "Humanization complete"
        );
        Ok(result)
    }
}
