//! The photo catalog: the ordered list of records the viewer pages through.
//!
//! The catalog is external input. It is usually a JSON manifest emitted by the
//! gallery build:
//!
//! ```json
//! { "photos": [
//!     { "filename": "001-dawn.avif", "slug": "dawn", "caption": "First light" },
//!     { "filename": "002-harbour.avif", "camera": "X100V", "settings": "f/8 1/250s" }
//! ] }
//! ```
//!
//! For quick previews it can also be built by scanning a single directory of
//! images, using the `NNN-name` ordering convention of the content tree:
//!
//! ```text
//! photos/
//! ├── 001-dawn.jpg        # first
//! ├── 001-dawn.txt        # sidecar → caption of 001-dawn.jpg
//! ├── 010-harbour.jpg     # non-contiguous numbering OK
//! └── snapshot.jpg        # unnumbered → sorted to the end
//! ```
//!
//! ## Slugs
//!
//! Each record's slug is derived on demand by [`slug_for`] and never stored
//! back. Uniqueness is not enforced here; [`Catalog::duplicate_slugs`] lets the
//! `check` command report collisions, and lookups resolve to the first match.

use crate::slug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Photo {0} has no filename")]
    MissingFilename(usize),
    #[error("No images found in {0}")]
    NoImages(PathBuf),
}

/// A single photo as supplied by the gallery. Only `filename` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhotoRecord {
    /// Asset filename, joined with the configured asset base to form the image URL.
    pub filename: String,
    /// Explicit slug; wins over the filename-derived one when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,
    /// Gallery thumbnail, loaded once it nears the viewport. Defaults to `filename`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Exposure settings as free text, e.g. `"f/8 1/250s ISO 200"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl PhotoRecord {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Derive the slug of a record.
///
/// The explicit `slug` field is returned exactly as written. Otherwise the
/// filename stem (extension removed) is normalized with [`slug::normalize`].
pub fn slug_for(record: &PhotoRecord) -> String {
    if let Some(explicit) = record.slug.as_deref().filter(|s| !s.is_empty()) {
        return explicit.to_string();
    }
    let stem = Path::new(&record.filename)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    slug::normalize(&stem)
}

/// Ordered, read-only sequence of photo records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    pub photos: Vec<PhotoRecord>,
}

impl Catalog {
    pub fn new(photos: Vec<PhotoRecord>) -> Self {
        Self { photos }
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PhotoRecord> {
        self.photos.get(index)
    }

    pub fn slug_for(&self, index: usize) -> Option<String> {
        self.get(index).map(slug_for)
    }

    /// Index of the first record whose slug equals `slug`.
    pub fn position(&self, slug: &str) -> Option<usize> {
        self.photos.iter().position(|p| slug_for(p) == slug)
    }

    /// Image URL of a record: `base` joined with its filename.
    pub fn asset_url(&self, index: usize, base: &str) -> Option<String> {
        self.get(index).map(|p| join_url(base, &p.filename))
    }

    /// Thumbnail URL of a record: `base` joined with its thumbnail, or with
    /// its filename when it has none.
    pub fn thumbnail_url(&self, index: usize, base: &str) -> Option<String> {
        self.get(index).map(|p| {
            let name = p
                .thumbnail
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(&p.filename);
            join_url(base, name)
        })
    }

    /// Whether the slug of record `index` survives a trip through the
    /// address bar. Out-of-range indices have no deep link.
    pub fn has_deep_link(&self, index: usize) -> bool {
        self.slug_for(index)
            .is_some_and(|slug| slug::is_linkable(&slug))
    }

    /// Slugs shared by more than one record, with the indices that share them.
    pub fn duplicate_slugs(&self) -> Vec<(String, Vec<usize>)> {
        let mut by_slug: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, photo) in self.photos.iter().enumerate() {
            by_slug.entry(slug_for(photo)).or_default().push(i);
        }
        by_slug
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .collect()
    }

    /// Parse a JSON manifest and check that every record names an asset.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON manifest file, or scan it if `path` is a directory.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if path.is_dir() {
            return scan_dir(path);
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        match self.photos.iter().position(|p| p.filename.trim().is_empty()) {
            Some(i) => Err(CatalogError::MissingFilename(i)),
            None => Ok(()),
        }
    }
}

fn join_url(base: &str, filename: &str) -> String {
    if base.is_empty() || base.ends_with('/') {
        format!("{base}{filename}")
    } else {
        format!("{base}/{filename}")
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif"];

/// Build a catalog from the images directly inside `dir`.
///
/// Images are ordered by their numeric `NNN-` prefix; files without one
/// follow in filename order. A sidecar `<stem>.txt` becomes the caption.
pub fn scan_dir(dir: &Path) -> Result<Catalog, CatalogError> {
    let mut images: Vec<(u32, PathBuf)> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_image(path) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let number = parse_number_prefix(&name).unwrap_or(u32::MAX);
        images.push((number, path.to_path_buf()));
    }

    if images.is_empty() {
        return Err(CatalogError::NoImages(dir.to_path_buf()));
    }

    // Stable sort keeps filename order among equal (or missing) prefixes
    images.sort_by_key(|(number, _)| *number);

    let photos = images
        .into_iter()
        .map(|(_, path)| PhotoRecord {
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            caption: read_sidecar(&path),
            ..PhotoRecord::default()
        })
        .collect();

    Ok(Catalog::new(photos))
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Leading digits of a name followed by a dash, e.g. `7` from `007-dawn.jpg`.
fn parse_number_prefix(name: &str) -> Option<u32> {
    let (prefix, _) = name.split_once('-')?;
    prefix.parse().ok()
}

/// Trimmed contents of `<stem>.txt` next to an image, if present and non-empty.
fn read_sidecar(image_path: &Path) -> Option<String> {
    fs::read_to_string(image_path.with_extension("txt"))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
