//! Implementation of the `thesis-humanizer config` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

const REDACTED: &str = "***";

#[derive(Args, Debug)]
pub struct ConfigArgs {}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    /// Effective configuration with keys redacted
    pub config: Config,
    /// Whether a rewriter key was configured
    pub rewriter_key_configured: bool,
    /// Whether a detector key was configured
    pub detector_key_configured: bool,
}

impl ConfigOutput {
    /// Snapshot of `config` with API keys redacted
    pub fn redacted(config: &Config) -> Self {
        let mut config = config.clone();
        let rewriter_key_configured = config.rewriter.api_key.is_some();
        let detector_key_configured = config.detector.api_key.is_some();
        if rewriter_key_configured {
            config.rewriter.api_key = Some(REDACTED.to_string());
        }
        if detector_key_configured {
            config.detector.api_key = Some(REDACTED.to_string());
        }
        Self {
            config,
            rewriter_key_configured,
            detector_key_configured,
        }
    }
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config)
            .context("Failed to render configuration")
            .unwrap_or_else(|e| format!("{e:#}"))
    }
}

/// Run the `config` command
pub fn execute(_args: &ConfigArgs, json_mode: bool, config: &Config) -> Result<()> {
    output(&ConfigOutput::redacted(config), json_mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_redacted() {
        let mut config = Config::default();
        config.rewriter.api_key = Some("AIza-secret".to_string());

        let out = ConfigOutput::redacted(&config);
        assert!(out.rewriter_key_configured);
        assert!(!out.detector_key_configured);
        assert!(!out.to_human().contains("AIza-secret"));
        assert_eq!(out.config.rewriter.api_key.as_deref(), Some(REDACTED));
        assert!(out.config.detector.api_key.is_none());
    }
}
