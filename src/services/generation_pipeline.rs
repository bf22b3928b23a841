//! Generation pipeline
//!
//! Drafts a thesis, extracts the citations the draft actually uses, then
//! validates the draft against its specifications and mandatory sources.

use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use super::quality_checker::QualityChecker;
use crate::domain::errors::GenerationError;
use crate::domain::models::{GenerationRequest, GenerationResult};
use crate::domain::ports::{CitationExtractor, ThesisWriter};

/// Chains writer, extractor and quality checker.
pub struct GenerationPipeline {
    writer: Arc<dyn ThesisWriter>,
    extractor: Arc<dyn CitationExtractor>,
    checker: QualityChecker,
}

impl GenerationPipeline {
    /// Pipeline over the given collaborators
    pub fn new(
        writer: Arc<dyn ThesisWriter>,
        extractor: Arc<dyn CitationExtractor>,
        checker: QualityChecker,
    ) -> Self {
        Self {
            writer,
            extractor,
            checker,
        }
    }

    /// Generate, extract and validate. A failed validation is reported in
    /// the result, not as an error.
    pub async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerationError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("generate", %run_id, writer = self.writer.name());

        async {
            info!(
                sources = request.available_sources.len(),
                mandatory = request.mandatory_sources.len(),
                "Starting thesis generation"
            );
            let thesis_text = self.writer.write(request).await?;

            let style = request.specifications.citation_style();
            let citations = self.extractor.extract(&thesis_text, style).await?;

            let validation = self.checker.validate(
                &thesis_text,
                &request.specifications,
                &request.mandatory_sources,
                &citations,
            );
            info!(
                words = validation.word_count,
                citations = citations.len(),
                valid = validation.valid,
                "Generation complete"
            );

            Ok(GenerationResult {
                word_count: validation.word_count,
                thesis_text,
                citations,
                validation,
            })
        }
        .instrument(span)
        .await
    }
}
