use async_trait::async_trait;

use crate::domain::errors::RewriteError;
use crate::domain::models::CitationSet;

/// Paraphrases text while keeping every citation marker intact.
///
/// Implementations own their retry policy; an `Err` is final for the
/// current humanization invocation.
#[async_trait]
pub trait Rewriter: Send + Sync {
    /// Rewrite `text`, passing `citations` through as protection context.
    async fn rewrite(&self, text: &str, citations: &CitationSet) -> Result<String, RewriteError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "rewriter"
    }
}
