//! Tool path layout
//!
//! The tool historically ran from inside the product tree with every path
//! fixed relative to its own directory. Those relative locations are the
//! built-in defaults; an optional `variantgen.toml` at the tool root
//! overrides individual paths, and the CLI output flag overrides the output
//! root last.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Layout file name at the tool root.
pub const LAYOUT_FILE: &str = "variantgen.toml";

/// Error types for layout loading
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("failed to read {LAYOUT_FILE}: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse {LAYOUT_FILE}: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Optional `[paths]` overrides from `variantgen.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
struct LayoutFile {
    #[serde(default)]
    paths: LayoutPaths,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LayoutPaths {
    output: Option<PathBuf>,
    storage: Option<PathBuf>,
    country_table: Option<PathBuf>,
    settings: Option<PathBuf>,
}

/// Resolved tool paths, all absolute-ish (joined onto the tool root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLayout {
    /// Product tree root the documents are written under
    pub output: PathBuf,
    /// Media storage tree
    pub storage: PathBuf,
    /// Country / mcc table
    pub country_table: PathBuf,
    /// Settings layer directory
    pub settings: PathBuf,
}

impl ToolLayout {
    /// Load the layout for a tool root, applying `variantgen.toml` overrides
    /// when the file is present.
    pub fn load(tool_root: &Path) -> Result<Self, LayoutError> {
        let overrides = match fs::read_to_string(tool_root.join(LAYOUT_FILE)) {
            Ok(contents) => toml::from_str::<LayoutFile>(&contents)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => LayoutFile::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self::resolve(tool_root, overrides))
    }

    fn resolve(tool_root: &Path, overrides: LayoutFile) -> Self {
        let join = |override_path: Option<PathBuf>, default: &str| {
            tool_root.join(override_path.unwrap_or_else(|| PathBuf::from(default)))
        };
        ToolLayout {
            output: join(overrides.paths.output, "../.."),
            storage: join(overrides.paths.storage, "../../storage"),
            country_table: join(overrides.paths.country_table, "cfg/country_mcc.txt"),
            settings: join(overrides.paths.settings, "cfg/Settings"),
        }
    }
}
