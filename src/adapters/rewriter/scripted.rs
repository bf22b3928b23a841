//! Scripted rewriter for tests and offline runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::errors::RewriteError;
use crate::domain::models::CitationSet;
use crate::domain::ports::Rewriter;

/// Rewriter that replays a fixed list of outcomes.
///
/// Once the script is exhausted it returns its input unchanged, so an
/// empty script behaves as an identity rewriter.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRewriter {
    script: Arc<Mutex<VecDeque<Result<String, RewriteError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRewriter {
    /// Rewriter replaying `script`, then echoing its input
    pub fn new(script: Vec<Result<String, RewriteError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns every input unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Succeeds with each of `outputs` in turn.
    pub fn with_outputs<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(outputs.into_iter().map(|o| Ok(o.into())).collect())
    }

    /// Texts this rewriter was asked to rewrite, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Rewriter for ScriptedRewriter {
    async fn rewrite(&self, text: &str, _citations: &CitationSet) -> Result<String, RewriteError> {
        self.calls.lock().await.push(text.to_string());
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(text.to_string()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
