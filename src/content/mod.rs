//! Content descriptor parser
//!
//! The content descriptor lists per-category content at three scopes:
//!
//! ```text
//! #Videos-PRODUCT-intro.mp4/tour.mp4
//! #Music-MV>EURO-anthem.mp3
//! #PreloadedApps-SV>EURO:GREECE,CYPRUS-AppA/AppB
//! $ comment lines start with a dollar sign
//! ```
//!
//! `SV>` scope expressions are canonicalized through the sub-region resolver
//! so the resulting keys are byte-identical to the ones the codelist parser
//! produces; that identity is the join key of the cascade. Scope entries are
//! kept in file order per category so cascade output is deterministic.

pub mod cascade;

use std::fs;
use std::io;
use std::path::Path;

use crate::country::CountryError;
use crate::subregion::{SubRegionKey, SubRegionResolver};

/// Error types for content descriptor parsing
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read content descriptor: {0}")]
    Io(#[from] io::Error),

    #[error("malformed content line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("unknown content category {category:?} at line {line}")]
    UnknownCategory { line: usize, category: String },

    #[error(transparent)]
    Country(#[from] CountryError),
}

/// The closed set of content categories a descriptor may configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    Videos,
    Music,
    Menu,
    Home,
    PreloadedApps,
    LockscreenWallpaper,
    RingingTones,
}

impl ContentCategory {
    pub const ALL: [ContentCategory; 7] = [
        ContentCategory::Videos,
        ContentCategory::Music,
        ContentCategory::Menu,
        ContentCategory::Home,
        ContentCategory::PreloadedApps,
        ContentCategory::LockscreenWallpaper,
        ContentCategory::RingingTones,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContentCategory::Videos => "Videos",
            ContentCategory::Music => "Music",
            ContentCategory::Menu => "Menu",
            ContentCategory::Home => "Home",
            ContentCategory::PreloadedApps => "PreloadedApps",
            ContentCategory::LockscreenWallpaper => "LockscreenWallpaper",
            ContentCategory::RingingTones => "RingingTones",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.name() == name)
    }

    /// Categories whose items are storage files rather than applications.
    pub fn is_media(self) -> bool {
        matches!(
            self,
            ContentCategory::Videos
                | ContentCategory::Music
                | ContentCategory::LockscreenWallpaper
                | ContentCategory::RingingTones
        )
    }
}

/// Canonicalized scope of a content line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentScope {
    /// Applies to the whole product
    Product,
    /// Applies to every sub-region of a region (`MV>REGIONTAG`)
    Region(String),
    /// Applies to exactly one sub-region (`SV>`, canonicalized)
    SubRegion(SubRegionKey),
}

/// Parsed content descriptor: per-category scope entries in file order, plus
/// the authoritative list of sub-regions that require a rendered document.
#[derive(Debug, Default)]
pub struct ContentDescriptor {
    entries: Vec<(ContentCategory, ContentScope, String)>,
    emitted: Vec<SubRegionKey>,
}

impl ContentDescriptor {
    /// Load and parse a content descriptor file.
    pub fn load(path: &Path, resolver: &SubRegionResolver<'_>) -> Result<Self, ContentError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents, resolver)
    }

    /// Parse descriptor contents.
    pub fn parse(contents: &str, resolver: &SubRegionResolver<'_>) -> Result<Self, ContentError> {
        let mut descriptor = ContentDescriptor::default();

        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('$') {
                continue;
            }

            let line_no = idx + 1;
            let malformed = || ContentError::MalformedLine {
                line: line_no,
                content: line.to_string(),
            };

            // Only the first two dashes separate fields; value lists may
            // themselves contain dashes.
            let mut fields = line.splitn(3, '-');
            let category_token = fields.next().unwrap_or_default().trim();
            let scope_expr = fields.next().ok_or_else(&malformed)?.trim();
            let value = fields.next().ok_or_else(&malformed)?.trim();

            let category_name = category_token.strip_prefix('#').ok_or_else(&malformed)?;
            let category = ContentCategory::from_name(category_name).ok_or_else(|| {
                ContentError::UnknownCategory {
                    line: line_no,
                    category: category_name.to_string(),
                }
            })?;

            let scope = Self::parse_scope(scope_expr, resolver, &malformed)?;

            if category == ContentCategory::PreloadedApps {
                if let ContentScope::SubRegion(key) = &scope {
                    descriptor.emitted.push(key.clone());
                }
            }

            descriptor.entries.push((category, scope, value.to_string()));
        }

        descriptor.emitted.sort_unstable();
        descriptor.emitted.dedup();
        Ok(descriptor)
    }

    fn parse_scope(
        expr: &str,
        resolver: &SubRegionResolver<'_>,
        malformed: &dyn Fn() -> ContentError,
    ) -> Result<ContentScope, ContentError> {
        if expr == "PRODUCT" {
            return Ok(ContentScope::Product);
        }
        if let Some(tag) = expr.strip_prefix("MV>") {
            if tag.is_empty() {
                return Err(malformed());
            }
            return Ok(ContentScope::Region(tag.to_string()));
        }
        if let Some(rest) = expr.strip_prefix("SV>") {
            let (tag, countries) = rest.split_once(':').ok_or_else(malformed)?;
            if tag.is_empty() || countries.is_empty() {
                return Err(malformed());
            }
            let key = resolver.resolve(tag, countries)?;
            return Ok(ContentScope::SubRegion(key));
        }
        Err(malformed())
    }

    /// Scope entries for one category, in file order.
    pub fn entries(
        &self,
        category: ContentCategory,
    ) -> impl Iterator<Item = (&ContentScope, &str)> {
        self.entries
            .iter()
            .filter(move |(c, _, _)| *c == category)
            .map(|(_, scope, value)| (scope, value.as_str()))
    }

    /// Sub-regions that require a rendered configuration document (sorted,
    /// de-duplicated). Registered by `PreloadedApps` lines only: a sub-region
    /// with media overrides but no preloaded-apps entry is not emitted.
    pub fn emitted_subregions(&self) -> &[SubRegionKey] {
        &self.emitted
    }
}
