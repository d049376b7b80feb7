//! Generated variant-application registry
//!
//! The platform build drops a generated document under the product's
//! `cached-config-base` directory listing every application a variant may
//! reference, with its default background color:
//!
//! ```xml
//! <VariantApplication appName="AppA" BGColor="#FF0000" />
//! ```
//!
//! The registry is loaded once at startup and passed by reference into
//! content resolution; it is never mutated afterwards.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Error types for registry loading
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read application registry: {0}")]
    Io(#[from] io::Error),

    #[error("expected exactly one generated document in {}, found {found}", dir.display())]
    RegistryDocumentNotFound { dir: PathBuf, found: usize },

    #[error("malformed registry document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed registry attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
}

/// Read-only appName -> default BGColor lookup.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    apps: HashMap<String, Option<String>>,
}

impl AppRegistry {
    /// Load the registry from a product's `cached-config-base` directory,
    /// which must contain exactly one generated document.
    pub fn load(dir: &Path) -> Result<Self, RegistryError> {
        let mut documents = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                documents.push(path);
            }
        }
        let [document] = documents.as_slice() else {
            return Err(RegistryError::RegistryDocumentNotFound {
                dir: dir.to_path_buf(),
                found: documents.len(),
            });
        };

        debug!("loading application registry from {}", document.display());
        let contents = fs::read_to_string(document)?;
        Self::parse(&contents)
    }

    /// Parse registry contents, collecting every `VariantApplication`
    /// element's `appName` and `BGColor` attributes.
    pub fn parse(contents: &str) -> Result<Self, RegistryError> {
        let mut reader = Reader::from_str(contents);

        let mut apps = HashMap::new();
        loop {
            let event = reader.read_event()?;
            let element = match &event {
                Event::Start(e) | Event::Empty(e)
                    if e.name().as_ref() == b"VariantApplication" =>
                {
                    e
                }
                Event::Eof => break,
                _ => continue,
            };

            let Some(name) = element.try_get_attribute("appName")? else {
                warn!("VariantApplication element without appName attribute; skipped");
                continue;
            };
            let name = name.unescape_value()?.into_owned();

            let color = element
                .try_get_attribute("BGColor")?
                .map(|attr| attr.unescape_value().map(|value| value.into_owned()))
                .transpose()?;

            apps.insert(name, color);
        }

        Ok(AppRegistry { apps })
    }

    pub fn contains(&self, app_name: &str) -> bool {
        self.apps.contains_key(app_name)
    }

    /// Default background color registered for an application, if any.
    pub fn bg_color(&self, app_name: &str) -> Option<&str> {
        self.apps.get(app_name)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}
