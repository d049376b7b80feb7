//! Media storage availability
//!
//! Content cascades reference media items by bare file name; whether an item
//! actually exists is answered against the storage tree:
//!
//! ```text
//! storage/common/{videos,audio,images}/...
//! storage/{product}/{videos,audio,images}/...   (optional overlay)
//! ```
//!
//! The lookup sits behind a trait so cascade resolution is testable without a
//! disk tree.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use crate::content::ContentCategory;

/// Storage pool a media category draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Videos,
    Audio,
    Images,
}

impl ContentCategory {
    /// Storage pool for this category; `None` for application categories.
    pub fn media_kind(self) -> Option<MediaKind> {
        match self {
            ContentCategory::Videos => Some(MediaKind::Videos),
            ContentCategory::Music | ContentCategory::RingingTones => Some(MediaKind::Audio),
            ContentCategory::LockscreenWallpaper => Some(MediaKind::Images),
            ContentCategory::Menu | ContentCategory::Home | ContentCategory::PreloadedApps => None,
        }
    }
}

/// Answers whether a referenced media item is present in storage.
pub trait MediaStore {
    fn exists(&self, category: ContentCategory, item: &str) -> bool;
}

/// Media availability backed by a scanned storage tree.
#[derive(Debug, Default)]
pub struct FsMediaStore {
    videos: HashSet<String>,
    audio: HashSet<String>,
    images: HashSet<String>,
}

impl FsMediaStore {
    /// Scan the storage tree for a product.
    ///
    /// The `common` pools must exist; the per-product overlays are optional.
    pub fn scan(storage_root: &Path, product_name: &str) -> io::Result<Self> {
        let mut store = FsMediaStore::default();

        for (kind, pool) in [
            ("videos", &mut store.videos),
            ("audio", &mut store.audio),
            ("images", &mut store.images),
        ] {
            list_into(&storage_root.join("common").join(kind), pool)?;

            let overlay = storage_root.join(product_name).join(kind);
            if overlay.is_dir() {
                list_into(&overlay, pool)?;
            }
        }

        Ok(store)
    }
}

fn list_into(dir: &Path, pool: &mut HashSet<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        pool.insert(entry?.file_name().to_string_lossy().into_owned());
    }
    Ok(())
}

impl MediaStore for FsMediaStore {
    fn exists(&self, category: ContentCategory, item: &str) -> bool {
        let pool = match category.media_kind() {
            Some(MediaKind::Videos) => &self.videos,
            Some(MediaKind::Audio) => &self.audio,
            Some(MediaKind::Images) => &self.images,
            None => return false,
        };
        pool.contains(item)
    }
}
