// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::region::Region;

#[derive(Error, Debug)]
pub enum AreaStoreError {
    #[error("Failed to read the area catalog directory '{0}': {1}")]
    CatalogDirUnreadable(PathBuf, #[source] std::io::Error),
    #[error("Area catalog directory '{0}' contains no area documents")]
    CatalogEmpty(PathBuf),
}

/// Explicit price range override carried by an area document,
/// used when the feed-derived range is insufficient or absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

/// A curated, hand-authored geographic page.
///
/// Areas are independent of any single feed snapshot;
/// they are *never* linked to properties by a stored key.
/// The association is recomputed on every ingestion pass
/// by [`crate::geo::matcher::match_areas`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Area {
    /// Stable page key; falls back to the document's file stem.
    #[serde(default)]
    pub slug: String,
    pub name: String,
    /// Known alternative spellings of the area's town
    /// ("Xàbia" for "Javea", ...), lowercase.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Authored region override; when absent,
    /// the region is resolved from the static town lists.
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub property_types: Vec<String>,
    /// Pre-authored fallback image for when no unused
    /// feed image can be assigned.
    #[serde(default)]
    pub card_image: Option<String>,
}

/// Per-ingestion-pass enrichment of an [`Area`].
///
/// Derived, not authoritative: callers must not cache this
/// separately from the snapshot that produced it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AreaSummary {
    pub area: Area,
    /// Number of properties matching this area in the current snapshot.
    /// Zero is a valid state, not an error;
    /// the page renders with a "no properties" state.
    pub property_count: usize,
    /// First image not already assigned to another area in this pass,
    /// else the authored card image, else `None`.
    pub representative_image: Option<String>,
    pub region: Region,
}

/// Loads all `*.json` area documents from a directory, sorted by slug.
///
/// A malformed document is logged and skipped;
/// a single bad file never hides the whole catalog.
pub fn load_areas(dir: impl AsRef<Path>) -> Result<Vec<Area>, AreaStoreError> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir)
        .map_err(|err| AreaStoreError::CatalogDirUnreadable(dir.to_path_buf(), err))?;

    let mut areas = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping unreadable directory entry in '{dir:?}': {err}");
                continue;
            }
        };
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        match load_area_document(&path) {
            Ok(area) => areas.push(area),
            Err(err) => {
                tracing::warn!("Skipping malformed area document '{path:?}': {err}");
            }
        }
    }

    if areas.is_empty() {
        return Err(AreaStoreError::CatalogEmpty(dir.to_path_buf()));
    }
    areas.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(areas)
}

fn load_area_document(path: &Path) -> Result<Area, Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(path)?;
    let mut area: Area = serde_json::from_str(&raw)?;
    if area.slug.is_empty() {
        // Documents are keyed by file name; an explicit slug wins.
        area.slug = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
    }
    Ok(area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_doc(dir: &Path, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn loads_documents_and_skips_malformed_ones() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "javea.json",
            r#"{ "slug": "javea", "name": "Javea", "aliases": ["xabia", "xàbia"] }"#,
        );
        write_doc(dir.path(), "broken.json", "{ not json");
        write_doc(dir.path(), "notes.txt", "ignored");

        let areas = load_areas(dir.path()).unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].name, "Javea");
        assert_eq!(areas[0].aliases.len(), 2);
    }

    #[test]
    fn slug_falls_back_to_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "torrevieja.json", r#"{ "slug": "", "name": "Torrevieja" }"#);

        let areas = load_areas(dir.path()).unwrap();
        assert_eq!(areas[0].slug, "torrevieja");
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_areas(dir.path()),
            Err(AreaStoreError::CatalogEmpty(_))
        ));
    }
}
