//! ZeroGPT-backed detector with the fail-open policy.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::domain::models::{Config, DegradedReason, DetectionReport};
use crate::domain::ports::Detector;
use crate::infrastructure::logging::scrub;
use crate::infrastructure::zerogpt::{
    response_message, DetectionScores, ZeroGptClient, ZeroGptClientConfig,
};

/// Detector backed by the ZeroGPT API.
///
/// Never fails: missing credentials or an unreachable service yield a
/// degraded report scoring the text as fully human.
#[derive(Debug)]
pub struct ZeroGptDetector {
    /// `None` when no API key is configured
    client: Option<ZeroGptClient>,
}

impl ZeroGptDetector {
    /// Detector over a configured client
    pub const fn new(client: ZeroGptClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A detector without credentials; every check fails open without a request.
    pub const fn unconfigured() -> Self {
        Self { client: None }
    }

    /// Build from loaded configuration. Credentials must already be resolved.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.detector.api_key.clone() {
            Some(api_key) => {
                let client = ZeroGptClient::with_config(ZeroGptClientConfig::from_sections(
                    api_key,
                    &config.detector,
                    &config.retry,
                    &config.rate_limit,
                ))?;
                Ok(Self::new(client))
            }
            None => {
                warn!("No ZeroGPT API key configured; detection will assume human text");
                Ok(Self::unconfigured())
            }
        }
    }
}

fn out_of_range(value: f64) -> bool {
    !(0.0..=100.0).contains(&value)
}

#[async_trait]
impl Detector for ZeroGptDetector {
    #[instrument(skip_all, fields(words = text.split_whitespace().count()))]
    async fn check(&self, text: &str) -> DetectionReport {
        let Some(client) = &self.client else {
            warn!("ZeroGPT API key missing, using fail-open score");
            return DetectionReport::fail_open(DegradedReason::MissingCredentials);
        };

        match client.detect_text(text).await {
            Ok(body) => {
                let Some(scores) = DetectionScores::from_body(&body) else {
                    let detail = response_message(&body)
                        .map_or_else(|| "no detection score in response".to_string(), scrub);
                    warn!(detail = %detail, "ZeroGPT response unusable, using fail-open score");
                    return DetectionReport::fail_open(DegradedReason::MalformedResponse(detail));
                };
                if out_of_range(scores.human_percentage) || out_of_range(scores.fake_percentage) {
                    warn!(
                        human = scores.human_percentage,
                        fake = scores.fake_percentage,
                        "ZeroGPT score out of range, clamping"
                    );
                }
                debug!(human = scores.human_percentage, "ZeroGPT check complete");
                DetectionReport::measured(scores.human_percentage, scores.fake_percentage, Some(body))
            }
            Err(err) => {
                warn!(error = %err, "ZeroGPT unavailable, using fail-open score");
                DetectionReport::fail_open(err.degraded_reason())
            }
        }
    }

    fn name(&self) -> &'static str {
        "zerogpt"
    }
}
