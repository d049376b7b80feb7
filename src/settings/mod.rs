//! Settings override cascade
//!
//! Settings merge by replacement, not accumulation. Up to eight layer files
//! under the settings directory are evaluated lowest-precedence first:
//!
//! ```text
//! Settings_PRODUCT.xml
//! Settings_PRODUCT_{product}.xml
//! Settings_{DS|SS}.xml
//! Settings_{DS|SS}_{product}.xml
//! Settings_MV_{region}.xml
//! Settings_MV_{region}_{product}.xml
//! Settings_SV_{subregion}.xml
//! Settings_SV_{subregion}_{product}.xml
//! ```
//!
//! A later layer's record replaces an accumulated record with the same
//! settingId (packageId is carried but is not part of the identity).
//! Absent files are skipped; malformed lines inside present files are
//! skipped with a warning. The merged output keeps last-write order so
//! rendered documents are deterministic.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use regex_lite::Regex;
use sha2::{Digest, Sha256};

use crate::subregion::SubRegionKey;

/// Error types for settings resolution
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings layer {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One `<VariantSetting>` record. Identity for override purposes is
/// `setting_id` alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRecord {
    pub package_id: String,
    pub setting_id: String,
    pub value: String,
}

/// Tagged result of matching one settings line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsLine {
    Record(SettingsRecord),
    /// Blank, comment, or otherwise unrecognized line; not an error.
    Skip,
}

/// Compiled matcher for `<VariantSetting />` record lines.
fn setting_pattern() -> Regex {
    Regex::new(
        r#"<VariantSetting\s+packageId="([^"]+)"\s+settingId="([^"]+)"\s+value="([^"]*)"\s*/>"#,
    )
    .unwrap()
}

/// Match a single `<VariantSetting packageId=".." settingId=".." value=".." />`
/// line. Anything else is tagged [`SettingsLine::Skip`].
pub fn parse_line(line: &str) -> SettingsLine {
    match_line(&setting_pattern(), line)
}

fn match_line(pattern: &Regex, line: &str) -> SettingsLine {
    match pattern.captures(line.trim()) {
        Some(captures) => SettingsLine::Record(SettingsRecord {
            package_id: captures[1].to_string(),
            setting_id: captures[2].to_string(),
            value: captures[3].to_string(),
        }),
        None => SettingsLine::Skip,
    }
}

/// Provenance of one contributing layer file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LayerSource {
    /// Layer name, e.g. `SV_EURO_CY_GR`
    pub name: String,
    /// Path the layer was read from
    pub path: PathBuf,
    /// SHA-256 digest of the raw file bytes
    pub digest: String,
}

/// Merged settings for one sub-region, with layer provenance.
#[derive(Debug, Default)]
pub struct ResolvedSettings {
    /// Records unique by settingId, in last-write order
    pub records: Vec<SettingsRecord>,
    /// Contributing layers in precedence order
    pub sources: Vec<LayerSource>,
}

/// Resolves the settings cascade for a product.
pub struct SettingsCascade<'a> {
    settings_dir: &'a Path,
    product_name: &'a str,
    product_nick_name: &'a str,
}

impl<'a> SettingsCascade<'a> {
    pub fn new(settings_dir: &'a Path, product_name: &'a str, product_nick_name: &'a str) -> Self {
        SettingsCascade {
            settings_dir,
            product_name,
            product_nick_name,
        }
    }

    /// Layer names for a target sub-region, lowest precedence first.
    ///
    /// The `LTA` region keeps its tag in keys and rendered output but its
    /// layer files were renamed to `LATAM` long ago; the rename applies to
    /// file-name lookup only.
    pub fn layer_names(&self, subregion: &SubRegionKey) -> Vec<String> {
        let product = self.product_name;
        let mut names = vec!["PRODUCT".to_string(), format!("PRODUCT_{product}")];

        let sim = if self.product_nick_name.contains("_ds") {
            Some("DS")
        } else if self.product_nick_name.contains("_ss") {
            Some("SS")
        } else {
            None
        };
        if let Some(sim) = sim {
            names.push(sim.to_string());
            names.push(format!("{sim}_{product}"));
        } else {
            debug!(
                "product nickname {:?} has no SIM marker; SIM layers skipped",
                self.product_nick_name
            );
        }

        let region = file_region(subregion.region_tag());
        names.push(format!("MV_{region}"));
        names.push(format!("MV_{region}_{product}"));

        let file_key = file_subregion(subregion);
        names.push(format!("SV_{file_key}"));
        names.push(format!("SV_{file_key}_{product}"));

        names
    }

    /// Merge every present layer for a sub-region, replace-by-settingId.
    pub fn resolve(&self, subregion: &SubRegionKey) -> Result<ResolvedSettings, SettingsError> {
        let mut resolved = ResolvedSettings::default();
        let pattern = setting_pattern();

        for name in self.layer_names(subregion) {
            let path = self.settings_dir.join(format!("Settings_{name}.xml"));
            if !path.exists() {
                continue;
            }

            let contents = fs::read(&path).map_err(|source| SettingsError::Io {
                path: path.clone(),
                source,
            })?;
            resolved.sources.push(LayerSource {
                name: name.clone(),
                path: path.clone(),
                digest: hex::encode(Sha256::digest(&contents)),
            });

            let text = String::from_utf8_lossy(&contents);
            for line in text.lines() {
                match match_line(&pattern, line) {
                    SettingsLine::Record(record) => {
                        resolved
                            .records
                            .retain(|existing| existing.setting_id != record.setting_id);
                        resolved.records.push(record);
                    }
                    SettingsLine::Skip => {
                        if !line.trim().is_empty() {
                            warn!("unrecognized settings line in {name} layer skipped: {line:?}");
                        }
                    }
                }
            }
        }

        Ok(resolved)
    }
}

/// Region tag as used in layer file names.
fn file_region(tag: &str) -> &str {
    if tag == "LTA" {
        "LATAM"
    } else {
        tag
    }
}

/// Sub-region key as used in layer file names (leading tag renamed).
fn file_subregion(key: &SubRegionKey) -> String {
    match key.as_str().strip_prefix("LTA") {
        Some(rest) => format!("LATAM{rest}"),
        None => key.as_str().to_string(),
    }
}
