//! Country / mcc lookup table
//!
//! Loads the static country table from `cfg/country_mcc.txt`. Each line is a
//! colon-delimited record `LONGNAME:SHORTCODE:MCC[,MCC...]`. Besides plain
//! countries the table carries aggregate records such as `EURO COMMON`, whose
//! mcc field is a comma-separated list covering the whole region.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Error types for country table operations
#[derive(Debug, thiserror::Error)]
pub enum CountryError {
    #[error("failed to read country table: {0}")]
    Io(#[from] io::Error),

    #[error("malformed country record at line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },

    #[error("unknown country: {0:?}")]
    UnknownCountry(String),
}

/// A single row of the country table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    /// Full country name as written in descriptors (e.g. "GREECE")
    pub long_name: String,
    /// Two-letter short code (e.g. "GR"); unique across the table
    pub short_code: String,
    /// Mobile country code; a comma-separated list for aggregate records
    pub mcc: String,
}

/// Country-name <-> short-code <-> mcc lookup table.
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    by_long_name: HashMap<String, CountryRecord>,
    by_short_code: HashMap<String, CountryRecord>,
}

impl CountryTable {
    /// Load the table from a `LONGNAME:SHORTCODE:MCC` file.
    pub fn load(path: &Path) -> Result<Self, CountryError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse table contents from a string.
    pub fn parse(contents: &str) -> Result<Self, CountryError> {
        let mut table = CountryTable::default();

        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.splitn(3, ':');
            let record = match (fields.next(), fields.next(), fields.next()) {
                (Some(long_name), Some(short_code), Some(mcc))
                    if !long_name.is_empty() && !short_code.is_empty() && !mcc.is_empty() =>
                {
                    CountryRecord {
                        long_name: long_name.to_string(),
                        short_code: short_code.to_string(),
                        mcc: mcc.to_string(),
                    }
                }
                _ => {
                    return Err(CountryError::MalformedRecord {
                        line: idx + 1,
                        content: line.to_string(),
                    })
                }
            };

            table
                .by_short_code
                .insert(record.short_code.clone(), record.clone());
            table.by_long_name.insert(record.long_name.clone(), record);
        }

        Ok(table)
    }

    /// Resolve a country name to its short code.
    ///
    /// Accepts a long name or an already-short code transparently, and the
    /// literal `COMMON` (returned unchanged; callers resolve aggregate mcc
    /// lists separately via [`CountryTable::aggregate_mccs`]).
    pub fn short_code_of<'a>(&'a self, name: &str) -> Result<&'a str, CountryError> {
        if name == "COMMON" {
            return Ok("COMMON");
        }
        if let Some(record) = self.by_short_code.get(name) {
            return Ok(&record.short_code);
        }
        if let Some(record) = self.by_long_name.get(name) {
            return Ok(&record.short_code);
        }
        Err(CountryError::UnknownCountry(name.to_string()))
    }

    /// Resolve a long name or short code to its mcc.
    pub fn mcc_of(&self, name_or_short: &str) -> Result<&str, CountryError> {
        if let Some(record) = self.by_short_code.get(name_or_short) {
            return Ok(&record.mcc);
        }
        if let Some(record) = self.by_long_name.get(name_or_short) {
            return Ok(&record.mcc);
        }
        Err(CountryError::UnknownCountry(name_or_short.to_string()))
    }

    /// Resolve the aggregate mcc list for a region's COMMON record.
    ///
    /// Aggregates live in long-name space under `"{TAG} COMMON"` and carry a
    /// comma-separated list of every mcc the region covers.
    pub fn aggregate_mccs(&self, region_tag: &str) -> Result<Vec<String>, CountryError> {
        let key = format!("{region_tag} COMMON");
        let record = self
            .by_long_name
            .get(&key)
            .ok_or(CountryError::UnknownCountry(key))?;
        Ok(record.mcc.split(',').map(str::to_string).collect())
    }

    /// Iterate over all records in the table.
    pub fn records(&self) -> impl Iterator<Item = &CountryRecord> {
        self.by_long_name.values()
    }
}
