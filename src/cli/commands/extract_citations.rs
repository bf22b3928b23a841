//! Implementation of the `thesis-humanizer extract-citations` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::adapters::GeminiGenerator;
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::RequestArgs;
use crate::domain::models::{CitationSet, Config, ExtractionRequest};
use crate::domain::ports::CitationExtractor;

#[derive(Args, Debug)]
pub struct ExtractCitationsArgs {
    #[command(flatten)]
    pub source: RequestArgs,
}

#[derive(Debug, Serialize)]
pub struct ExtractCitationsOutput {
    /// Extracted citation records
    pub citations: CitationSet,
}

impl CommandOutput for ExtractCitationsOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Extracted {} citations", self.citations.len())];
        for (index, citation) in self.citations.iter().enumerate() {
            let label = citation.id().map_or_else(|| format!("#{}", index + 1), str::to_string);
            lines.push(format!(
                "  {label}: {}",
                citation.title().unwrap_or("(untitled)")
            ));
        }
        lines.join("\n")
    }
}

/// Run the `extract-citations` command
pub async fn execute(args: ExtractCitationsArgs, json_mode: bool, config: &Config) -> Result<()> {
    let request: ExtractionRequest = args.source.read().await?;

    let extractor = GeminiGenerator::from_config(config)?;
    let citations = extractor
        .extract(&request.thesis_text, request.citation_style())
        .await?;

    output(&ExtractCitationsOutput { citations }, json_mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_human_output_lists_citations() {
        let out = ExtractCitationsOutput {
            citations: vec![json!({"id": "cite1", "title": "Simulation"}), json!({"year": 2003})]
                .into_iter()
                .collect(),
        };
        let text = out.to_human();
        assert!(text.starts_with("Extracted 2 citations"));
        assert!(text.contains("cite1: Simulation"));
        assert!(text.contains("#2: (untitled)"));
    }
}
