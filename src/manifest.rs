//! `icons` block for a browser extension manifest
//!
//! Browser extension manifests reference their icons as a map from edge size
//! to a path relative to the extension root:
//!
//! ```json
//! { "icons": { "16": "icons/icon16.png", "48": "icons/icon48.png" } }
//! ```
//!
//! This module builds that fragment from the generated icons so it can be
//! pasted into (or merged with) `manifest.json`.

use crate::icon_gen::GeneratedIcon;
use anyhow::{Context, Result};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// File name of the fragment written next to the icons
pub const MANIFEST_FILE_NAME: &str = "icons.json";

/// Root of the manifest fragment
#[derive(Serialize, Debug, Clone, Default)]
pub struct IconManifest {
    /// Size to path entries, serialized in insertion order
    pub icons: IconMap,
}

/// Ordered `size -> path` map.
///
/// Kept as a list so the JSON lists icons in generation order rather than
/// sorting `"128"` before `"16"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconMap(Vec<(u32, String)>);

impl Serialize for IconMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(size, path)| (size.to_string(), path)))
    }
}

impl IconMap {
    pub fn entries(&self) -> &[(u32, String)] {
        &self.0
    }
}

impl IconManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an icon entry, replacing any earlier entry of the same size
    pub fn add_icon(&mut self, size: u32, path: &Path) {
        let path = to_manifest_path(path);
        match self.icons.0.iter_mut().find(|(existing, _)| *existing == size) {
            Some(entry) => entry.1 = path,
            None => self.icons.0.push((size, path)),
        }
    }

    pub fn from_icons(icons: &[GeneratedIcon]) -> Self {
        let mut manifest = Self::new();
        for icon in icons {
            manifest.add_icon(icon.size, &icon.path);
        }
        manifest
    }
}

/// Manifest paths always use forward slashes
fn to_manifest_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Writes `icons.json` into `dir` and returns its path.
pub fn write_manifest(dir: &Path, manifest: &IconManifest) -> Result<PathBuf> {
    let manifest_path = dir.join(MANIFEST_FILE_NAME);
    let json =
        serde_json::to_string_pretty(manifest).context("Failed to serialize icons.json")?;

    std::fs::write(&manifest_path, json).context("Failed to write icons.json file")?;

    println!("✓ Created {}", manifest_path.display());
    Ok(manifest_path)
}
