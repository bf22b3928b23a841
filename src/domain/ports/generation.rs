use async_trait::async_trait;

use crate::domain::errors::GenerationError;
use crate::domain::models::{CitationSet, GenerationRequest};

/// Drafts a full thesis from an outline and researched sources.
#[async_trait]
pub trait ThesisWriter: Send + Sync {
    /// Return the thesis as Markdown.
    async fn write(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "writer"
    }
}

/// Lists the sources a thesis actually cites.
///
/// An answer that cannot be read as a citation list yields an empty set;
/// only collaborator failures are errors.
#[async_trait]
pub trait CitationExtractor: Send + Sync {
    /// Citation records found in `thesis_text`.
    async fn extract(
        &self,
        thesis_text: &str,
        citation_style: &str,
    ) -> Result<CitationSet, GenerationError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "extractor"
    }
}
