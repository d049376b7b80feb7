//! Descriptor file discovery
//!
//! Descriptors live somewhere under the tool root and encode product
//! identity in their file names:
//!
//! ```text
//! rm1057_athena_ds_codelist.txt
//! rm1057_athena_ds_content_configure_data.txt
//! ```
//!
//! Discovery walks the tree for the type designator's codelist, derives the
//! product name and nickname from the file name, and locates the sibling
//! content descriptor.

use std::path::{Path, PathBuf};

use log::info;
use walkdir::WalkDir;

const CODELIST_SUFFIX: &str = "_codelist.txt";
const CONTENT_STEM: &str = "content_configure_data";

/// Error types for descriptor discovery
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("failed to walk tool root: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("no codelist found for type designator {0:?}")]
    MissingCodelist(String),

    #[error("codelist name {0:?} does not encode a product name")]
    MalformedDescriptorName(String),

    #[error("content descriptor {} not found", .0.display())]
    MissingContentFile(PathBuf),
}

/// Product identity derived from descriptor file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductIdentity {
    /// e.g. `athena`
    pub product_name: String,
    /// Product name plus SIM marker, e.g. `athena_ds`
    pub product_nick_name: String,
    pub codelist_path: PathBuf,
    pub content_path: PathBuf,
}

/// Locate the descriptors for a type designator under the tool root.
pub fn discover(tool_root: &Path, type_designator: &str) -> Result<ProductIdentity, DiscoveryError> {
    let mut codelist_path = None;

    for entry in WalkDir::new(tool_root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with(type_designator) && name.ends_with(CODELIST_SUFFIX) {
            codelist_path = Some(entry.into_path());
        }
    }

    let codelist_path =
        codelist_path.ok_or_else(|| DiscoveryError::MissingCodelist(type_designator.to_string()))?;
    let file_name = codelist_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let product_name = file_name
        .split('_')
        .nth(1)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| DiscoveryError::MalformedDescriptorName(file_name.clone()))?
        .to_string();
    let product_nick_name = file_name
        .trim_start_matches(&format!("{type_designator}_"))
        .trim_end_matches(CODELIST_SUFFIX)
        .to_string();

    let content_path =
        codelist_path.with_file_name(file_name.replace("codelist", CONTENT_STEM));
    if !content_path.is_file() {
        return Err(DiscoveryError::MissingContentFile(content_path));
    }

    info!(
        "discovered product {product_name} (nickname {product_nick_name}) from {}",
        codelist_path.display()
    );

    Ok(ProductIdentity {
        product_name,
        product_nick_name,
        codelist_path,
        content_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_derives_identity() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("abc_regionphone");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("rm1057_athena_ds_codelist.txt"), "").unwrap();
        fs::write(
            nested.join("rm1057_athena_ds_content_configure_data.txt"),
            "",
        )
        .unwrap();

        let identity = discover(dir.path(), "rm1057").unwrap();
        assert_eq!(identity.product_name, "athena");
        assert_eq!(identity.product_nick_name, "athena_ds");
        assert!(identity.codelist_path.ends_with("rm1057_athena_ds_codelist.txt"));
        assert!(identity
            .content_path
            .ends_with("rm1057_athena_ds_content_configure_data.txt"));
    }

    #[test]
    fn test_discover_missing_codelist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            discover(dir.path(), "rm9999"),
            Err(DiscoveryError::MissingCodelist(_))
        ));
    }

    #[test]
    fn test_discover_missing_content_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("rm1057_athena_ds_codelist.txt"), "").unwrap();
        assert!(matches!(
            discover(dir.path(), "rm1057"),
            Err(DiscoveryError::MissingContentFile(_))
        ));
    }
}
