//! Output formatting utilities for the CLI.

use anyhow::{Context, Result};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

use crate::domain::models::HistoryEntry;

/// A command result printable for humans or as JSON.
pub trait CommandOutput: Serialize {
    /// Human-readable rendering
    fn to_human(&self) -> String;

    /// JSON document printed with `--json`
    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Print `result` to stdout in the selected format
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) -> Result<()> {
    if json_mode {
        let document = result
            .to_json()
            .context("Failed to serialize command output")?;
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!("{}", result.to_human());
    }
    Ok(())
}

/// Error document printed in JSON mode
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    /// Scrubbed error message
    pub error: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl CommandOutput for ErrorOutput {
    fn to_human(&self) -> String {
        format!("Error ({}): {}", self.kind, self.error)
    }
}

/// Score history as a table
pub fn history_table(history: &[HistoryEntry]) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Iteration").add_attribute(Attribute::Bold),
            Cell::new("Human %").add_attribute(Attribute::Bold),
            Cell::new("Note").add_attribute(Attribute::Bold),
        ]);

    for entry in history {
        let note = if entry.degraded {
            "detector unavailable (fallback)"
        } else if entry.iteration == 0 {
            "initial"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(entry.iteration),
            Cell::new(format!("{:.1}", entry.score)),
            Cell::new(note),
        ]);
    }

    table.to_string()
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
