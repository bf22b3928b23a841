use anyhow::{Context, Result};
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, instrument};

use super::errors::GeminiApiError;
use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::domain::models::config::{RateLimitConfig, RetryConfig, RewriterConfig};
use crate::infrastructure::http::{RetryPolicy, TokenBucketRateLimiter};

/// Configuration for the Gemini HTTP client
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// Gemini API key
    pub api_key: String,
    /// API root, without trailing slash
    pub base_url: String,
    /// Model name, e.g. `gemini-2.5-pro`
    pub model: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Requests per second allowed by the limiter
    pub rate_limit_rps: f64,
    /// Backoff for transient failures
    pub retry: RetryConfig,
}

impl GeminiClientConfig {
    /// Assemble client settings from the loaded configuration sections
    pub fn from_sections(
        api_key: String,
        rewriter: &RewriterConfig,
        retry: &RetryConfig,
        rate_limit: &RateLimitConfig,
    ) -> Self {
        Self {
            api_key,
            base_url: rewriter.base_url.trim_end_matches('/').to_string(),
            model: rewriter.model.clone(),
            timeout_secs: rewriter.timeout_secs,
            rate_limit_rps: rate_limit.requests_per_second,
            retry: retry.clone(),
        }
    }
}

/// HTTP client for the Gemini `generateContent` API
///
/// Requests are throttled by a token bucket and transient failures
/// (429, 5xx, timeouts, network) are retried with exponential backoff.
pub struct GeminiClient {
    http_client: ReqwestClient,
    api_key: String,
    base_url: String,
    model: String,
    rate_limiter: TokenBucketRateLimiter,
    retry_policy: RetryPolicy,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build the client; fails only if the HTTP client cannot be constructed
    pub fn with_config(config: GeminiClientConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            api_key: config.api_key,
            base_url: config.base_url,
            model: config.model,
            rate_limiter: TokenBucketRateLimiter::new(config.rate_limit_rps),
            retry_policy: RetryPolicy::from_config(&config.retry),
        })
    }

    /// Model this client talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Send a single request and classify the outcome
    async fn send_request(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(GeminiApiError::from_status(status, &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeminiApiError::Decode(e.to_string()))
    }

    /// Generate content, returning the response text
    ///
    /// Blocked prompts and responses without text are reported as errors
    /// rather than as empty strings.
    #[instrument(skip(self, request), fields(model = %self.model))]
    pub async fn generate(&self, request: &GenerateContentRequest) -> Result<String, GeminiApiError> {
        self.rate_limiter.acquire().await;

        let response = self
            .retry_policy
            .execute(|| self.send_request(request))
            .await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini usage"
            );
        }

        if let Some(reason) = response.block_reason() {
            return Err(GeminiApiError::Blocked(reason.to_string()));
        }

        response.text().ok_or_else(|| {
            GeminiApiError::EmptyResponse(
                response
                    .finish_reason()
                    .unwrap_or("UNKNOWN")
                    .to_string(),
            )
        })
    }
}
