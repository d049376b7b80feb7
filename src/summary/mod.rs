//! Run summary (generation_summary.json)
//!
//! One machine-readable summary per run, written next to the generated
//! documents, plus a human one-liner for the terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Schema version for generation_summary.json
pub const SUMMARY_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for generation_summary.json
pub const SUMMARY_SCHEMA_ID: &str = "variantgen/generation_summary@1";

/// Summary of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When the summary was created
    pub created_at: DateTime<Utc>,

    /// Product the documents were generated for
    pub product_name: String,

    /// Type designator the run was invoked with
    pub type_designator: String,

    /// Count of variant documents written
    pub variants_written: usize,

    /// Count of config-set documents written
    pub config_sets_written: usize,

    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,

    /// Human-readable summary
    pub human_summary: String,
}

impl GenerationSummary {
    pub fn new(
        product_name: String,
        type_designator: String,
        variants_written: usize,
        config_sets_written: usize,
        duration_ms: u64,
    ) -> Self {
        let human_summary = format!(
            "{product_name}: {variants_written} variant, {config_sets_written} config-set documents generated in {duration_ms} ms"
        );
        GenerationSummary {
            schema_version: SUMMARY_SCHEMA_VERSION,
            schema_id: SUMMARY_SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            product_name,
            type_designator,
            variants_written,
            config_sets_written,
            duration_ms,
            human_summary,
        }
    }

    /// Write the summary as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), io::Error> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n")
    }
}
