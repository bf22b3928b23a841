//! Gemini-backed thesis writer and citation extractor.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::prompt::{build_extract_request, build_write_request, parse_citation_array};
use crate::adapters::rewriter::prompt::strip_code_fence;
use crate::domain::errors::GenerationError;
use crate::domain::models::{CitationSet, Config, GenerationRequest};
use crate::domain::ports::{CitationExtractor, ThesisWriter};
use crate::infrastructure::gemini::{
    GeminiApiError, GeminiClient, GeminiClientConfig, GenerateContentRequest, GenerationConfig,
};

/// Drafts theses and extracts their citations with Gemini.
///
/// Shares the `rewriter` config section for model, credentials and sampling.
#[derive(Debug)]
pub struct GeminiGenerator {
    /// `None` when no API key is configured
    client: Option<GeminiClient>,
    generation: GenerationConfig,
}

impl GeminiGenerator {
    /// Generator over a configured client
    pub const fn new(client: GeminiClient, generation: GenerationConfig) -> Self {
        Self {
            client: Some(client),
            generation,
        }
    }

    /// A generator without credentials; every call fails with `MissingCredentials`.
    pub const fn unconfigured(generation: GenerationConfig) -> Self {
        Self {
            client: None,
            generation,
        }
    }

    /// Build from loaded configuration. Credentials must already be resolved.
    pub fn from_config(config: &Config) -> Result<Self> {
        let generation = GenerationConfig {
            temperature: config.rewriter.temperature,
            max_output_tokens: config.rewriter.max_output_tokens,
        };

        match config.rewriter.api_key.clone() {
            Some(api_key) => {
                let client = GeminiClient::with_config(GeminiClientConfig::from_sections(
                    api_key,
                    &config.rewriter,
                    &config.retry,
                    &config.rate_limit,
                ))?;
                Ok(Self::new(client, generation))
            }
            None => {
                warn!("No Gemini API key configured; generation will fail");
                Ok(Self::unconfigured(generation))
            }
        }
    }

    async fn complete(&self, request: GenerateContentRequest) -> Result<String, GenerationError> {
        let client = self
            .client
            .as_ref()
            .ok_or(GenerationError::MissingCredentials)?;
        let raw = client
            .generate(&request.with_generation_config(self.generation.clone()))
            .await?;
        Ok(raw)
    }
}

impl From<GeminiApiError> for GenerationError {
    fn from(err: GeminiApiError) -> Self {
        match err {
            GeminiApiError::EmptyResponse(_) => Self::EmptyOutput,
            other => Self::Api(other.to_string()),
        }
    }
}

#[async_trait]
impl ThesisWriter for GeminiGenerator {
    #[instrument(skip_all, fields(sources = request.available_sources.len(), style = request.specifications.citation_style()))]
    async fn write(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let raw = self.complete(build_write_request(request)).await?;

        let thesis = strip_code_fence(&raw);
        if thesis.is_empty() {
            return Err(GenerationError::EmptyOutput);
        }
        info!(words = thesis.split_whitespace().count(), "Thesis drafted");

        Ok(thesis.to_string())
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[async_trait]
impl CitationExtractor for GeminiGenerator {
    #[instrument(skip_all, fields(words = thesis_text.split_whitespace().count(), style = citation_style))]
    async fn extract(
        &self,
        thesis_text: &str,
        citation_style: &str,
    ) -> Result<CitationSet, GenerationError> {
        let raw = self
            .complete(build_extract_request(thesis_text, citation_style))
            .await?;

        match parse_citation_array(&raw) {
            Ok(records) => {
                debug!(count = records.len(), "Citations extracted");
                Ok(records.into_iter().collect())
            }
            Err(err) => {
                warn!(error = %err, "Citation list unreadable; returning no citations");
                Ok(CitationSet::default())
            }
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
