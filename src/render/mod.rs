//! Output document rendering
//!
//! Two document families are rendered per run, both written fresh under the
//! product output tree:
//! - `config-sets/{SubRegion}-config-data.xml` — resolved content and
//!   settings for one sub-region
//! - `variants/{Product}_{CTR}.xml` — per-market variant metadata plus its
//!   config-set references and network tables
//!
//! Documents are emitted with a streaming XML writer; rendering starts only
//! after all parsing and merging has completed.

mod config_data;
mod variants;

pub use config_data::{render_config_data, write_config_data, ConfigDataDoc};
pub use variants::{render_variant, write_variant, VariantDoc};

use std::fs;
use std::io;
use std::path::Path;

use crate::country::CountryError;
use crate::subregion::SubRegionKey;

/// Error types for document rendering
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write document: {0}")]
    Io(#[from] io::Error),

    #[error("XML emit failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Country(#[from] CountryError),

    #[error("sub-region {0} has no id in the codelist")]
    UnknownSubRegion(SubRegionKey),
}

/// Write rendered bytes, creating parent directories as needed.
fn write_document(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}
