//! Gemini-backed rewriter.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::prompt::{build_request, strip_code_fence};
use crate::domain::errors::RewriteError;
use crate::domain::models::{missing_markers, CitationSet, Config};
use crate::domain::ports::Rewriter;
use crate::infrastructure::gemini::{
    GeminiApiError, GeminiClient, GeminiClientConfig, GenerationConfig,
};

/// Rewriter that asks Gemini to humanize text while keeping citations.
#[derive(Debug)]
pub struct GeminiRewriter {
    /// `None` when no API key is configured
    client: Option<GeminiClient>,
    generation: GenerationConfig,
}

impl GeminiRewriter {
    /// Rewriter over a configured client
    pub const fn new(client: GeminiClient, generation: GenerationConfig) -> Self {
        Self {
            client: Some(client),
            generation,
        }
    }

    /// A rewriter without credentials; every call fails with `MissingCredentials`.
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
                warn!("No Gemini API key configured; rewrites will fail");
                Ok(Self::unconfigured(generation))
            }
        }
    }
}

impl From<GeminiApiError> for RewriteError {
    fn from(err: GeminiApiError) -> Self {
        match err {
            GeminiApiError::EmptyResponse(_) => Self::EmptyOutput,
            other => Self::Api(other.to_string()),
        }
    }
}

#[async_trait]
impl Rewriter for GeminiRewriter {
    #[instrument(skip_all, fields(words = text.split_whitespace().count(), citations = citations.len()))]
    async fn rewrite(&self, text: &str, citations: &CitationSet) -> Result<String, RewriteError> {
        let client = self.client.as_ref().ok_or(RewriteError::MissingCredentials)?;

        let request = build_request(text, citations).with_generation_config(self.generation.clone());
        let raw = client.generate(&request).await?;

        let output = strip_code_fence(&raw);
        if output.is_empty() {
            return Err(RewriteError::EmptyOutput);
        }

        let missing = missing_markers(text, output);
        if !missing.is_empty() {
            warn!(missing = ?missing, "Rewrite dropped citation markers");
        }
        debug!(output_words = output.split_whitespace().count(), "Rewrite complete");

        Ok(output.to_string())
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_fails_with_missing_credentials() {
        let rewriter = GeminiRewriter::unconfigured(GenerationConfig {
            temperature: 0.7,
            max_output_tokens: 128,
        });
        let err = rewriter
            .rewrite("text", &CitationSet::default())
            .await
            .unwrap_err();
        assert_eq!(err, RewriteError::MissingCredentials);
    }

    #[test]
    fn test_from_config_without_key_is_unconfigured() {
        let rewriter = GeminiRewriter::from_config(&Config::default()).unwrap();
        assert!(rewriter.client.is_none());
    }

    #[test]
    fn test_empty_response_maps_to_empty_output() {
        let err = RewriteError::from(GeminiApiError::EmptyResponse("STOP".to_string()));
        assert_eq!(err, RewriteError::EmptyOutput);
        let err = RewriteError::from(GeminiApiError::RateLimitExceeded);
        assert!(matches!(err, RewriteError::Api(_)));
    }
}
