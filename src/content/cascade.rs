//! Additive content cascade
//!
//! Unlike settings, content lists accumulate: the `PRODUCT` scope seeds the
//! list, matching `MV>` region scopes append, and the exact `SV>` sub-region
//! scope appends last, all in descriptor file order. Media items are then
//! filtered against storage availability (missing items are warnings, not
//! errors); application items are validated against the generated registry
//! (an unknown application is fatal).

use log::warn;

use crate::content::{ContentCategory, ContentDescriptor, ContentScope};
use crate::registry::AppRegistry;
use crate::storage::MediaStore;
use crate::subregion::SubRegionKey;

/// Error types for cascade resolution
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    #[error("{category} references application {app:?} not in the generated application list")]
    UnregisteredApplication { category: &'static str, app: String },

    #[error("{category} item {item:?} has a malformed attribute group")]
    MalformedItem { category: &'static str, item: String },

    #[error("no default color registered for menu application {app:?}")]
    MissingDefaultColor { app: String },
}

/// A resolved menu entry: application plus effective background color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub app_name: String,
    pub bg_color: String,
}

/// A resolved home-screen placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomePlacement {
    pub app_name: String,
    pub collection: String,
    pub row: String,
    pub column: String,
    pub width: String,
    pub height: String,
}

/// Resolves per-sub-region content through the additive cascade.
pub struct ContentCascade<'a> {
    descriptor: &'a ContentDescriptor,
    store: &'a dyn MediaStore,
    registry: &'a AppRegistry,
}

impl<'a> ContentCascade<'a> {
    pub fn new(
        descriptor: &'a ContentDescriptor,
        store: &'a dyn MediaStore,
        registry: &'a AppRegistry,
    ) -> Self {
        ContentCascade {
            descriptor,
            store,
            registry,
        }
    }

    /// Accumulate a category's raw items for a target sub-region:
    /// `PRODUCT` first, then matching scopes in file order.
    fn accumulate(&self, category: ContentCategory, target: &SubRegionKey) -> Vec<&'a str> {
        let mut items = Vec::new();

        for (scope, value) in self.descriptor.entries(category) {
            if *scope == ContentScope::Product {
                items.extend(value.split('/'));
            }
        }
        for (scope, value) in self.descriptor.entries(category) {
            let matches = match scope {
                ContentScope::Product => false,
                ContentScope::Region(tag) => target.as_str().contains(tag.as_str()),
                ContentScope::SubRegion(key) => key == target,
            };
            if matches {
                items.extend(value.split('/'));
            }
        }

        items.retain(|item| !item.is_empty());
        items
    }

    /// Resolve a media category's item list, dropping items missing from
    /// storage with a warning.
    pub fn media_items(&self, category: ContentCategory, target: &SubRegionKey) -> Vec<String> {
        debug_assert!(category.is_media());

        let mut available = Vec::new();
        for item in self.accumulate(category, target) {
            if self.store.exists(category, item) {
                available.push(item.to_string());
            } else {
                warn!("no {} file named {:?}; dropped", category.name(), item);
            }
        }
        available
    }

    /// Resolve the preloaded-application list; every entry must be in the
    /// generated registry.
    pub fn preloaded_apps(&self, target: &SubRegionKey) -> Result<Vec<String>, CascadeError> {
        let mut apps = Vec::new();
        for item in self.accumulate(ContentCategory::PreloadedApps, target) {
            self.require_registered("PreloadedApps", item)?;
            apps.push(item.to_string());
        }
        Ok(apps)
    }

    /// Resolve menu entries. An item without an explicit `(color)` group
    /// falls back to the application's registered default color.
    pub fn menu_entries(&self, target: &SubRegionKey) -> Result<Vec<MenuEntry>, CascadeError> {
        let mut entries = Vec::new();
        for item in self.accumulate(ContentCategory::Menu, target) {
            let (app_name, attrs) = split_attrs("Menu", item)?;
            self.require_registered("Menu", app_name)?;

            let bg_color = match attrs {
                Some(color) if !color.is_empty() => color.to_string(),
                _ => self
                    .registry
                    .bg_color(app_name)
                    .ok_or_else(|| CascadeError::MissingDefaultColor {
                        app: app_name.to_string(),
                    })?
                    .to_string(),
            };

            entries.push(MenuEntry {
                app_name: app_name.to_string(),
                bg_color,
            });
        }
        Ok(entries)
    }

    /// Resolve home-screen placements. The five-field placement group is
    /// required.
    pub fn home_placements(&self, target: &SubRegionKey) -> Result<Vec<HomePlacement>, CascadeError> {
        let mut placements = Vec::new();
        for item in self.accumulate(ContentCategory::Home, target) {
            let (app_name, attrs) = split_attrs("Home", item)?;
            self.require_registered("Home", app_name)?;

            let attrs = attrs.ok_or_else(|| CascadeError::MalformedItem {
                category: "Home",
                item: item.to_string(),
            })?;
            let fields: Vec<&str> = attrs.split(',').map(str::trim).collect();
            let [collection, row, column, width, height] = fields.as_slice() else {
                return Err(CascadeError::MalformedItem {
                    category: "Home",
                    item: item.to_string(),
                });
            };

            placements.push(HomePlacement {
                app_name: app_name.to_string(),
                collection: collection.to_string(),
                row: row.to_string(),
                column: column.to_string(),
                width: width.to_string(),
                height: height.to_string(),
            });
        }
        Ok(placements)
    }

    fn require_registered(&self, category: &'static str, app: &str) -> Result<(), CascadeError> {
        if self.registry.contains(app) {
            Ok(())
        } else {
            Err(CascadeError::UnregisteredApplication {
                category,
                app: app.to_string(),
            })
        }
    }
}

/// Split `App(attr,attr)` into the name and the optional attribute group.
fn split_attrs<'b>(
    category: &'static str,
    item: &'b str,
) -> Result<(&'b str, Option<&'b str>), CascadeError> {
    match item.split_once('(') {
        None => Ok((item, None)),
        Some((name, rest)) => {
            let attrs = rest.strip_suffix(')').ok_or_else(|| CascadeError::MalformedItem {
                category,
                item: item.to_string(),
            })?;
            Ok((name, Some(attrs)))
        }
    }
}
