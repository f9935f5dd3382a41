// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Fuzzy association of canonical properties with curated areas.
//!
//! There is no stored Property<->Area relation;
//! this projection is recomputed from every snapshot
//! and may legitimately change between refreshes.

use std::collections::HashSet;

use crate::model::{
    area::{Area, AreaSummary},
    property::Property,
    region::Region,
};

use super::normalize::normalize;

/// Whether a property's location matches an area,
/// testing raw and normalized forms of town and zone.
///
/// A match is whole-string containment in either direction,
/// or token-level containment after splitting on whitespace/hyphen.
/// An empty town *and* empty zone never match.
#[must_use]
pub fn location_matches(property: &Property, area: &Area) -> bool {
    if property.town.trim().is_empty() && property.zone.trim().is_empty() {
        return false;
    }

    let mut locations = Vec::with_capacity(4);
    for raw in [&property.town, &property.zone] {
        if raw.trim().is_empty() {
            continue;
        }
        locations.push(raw.trim().to_lowercase());
        locations.push(normalize(raw));
    }

    let mut names = vec![area.name.to_lowercase(), normalize(&area.name)];
    for alias in &area.aliases {
        names.push(normalize(alias));
    }

    for location in &locations {
        for name in &names {
            if name.is_empty() {
                continue;
            }
            if location.contains(name.as_str()) || name.contains(location.as_str()) {
                return true;
            }
            if location
                .split(|chr: char| chr.is_whitespace() || chr == '-')
                .filter(|token| !token.is_empty())
                .any(|token| token.contains(name.as_str()) || name.contains(token))
            {
                return true;
            }
        }
    }
    false
}

/// Enriches every area with its per-snapshot property count,
/// resolved region, and a representative image.
///
/// Image assignment is first-unused in feed order across a
/// pass-scoped used-image set, so no two areas come out of one
/// call with the same representative image. The set lives and
/// dies inside this function; repeated calls do not leak state.
#[must_use]
pub fn match_areas(properties: &[Property], areas: &[Area]) -> Vec<AreaSummary> {
    let mut used_images: HashSet<String> = HashSet::new();

    areas
        .iter()
        .map(|area| {
            let matching: Vec<&Property> = properties
                .iter()
                .filter(|property| location_matches(property, area))
                .collect();

            let representative_image = pick_unused_image(&matching, &mut used_images)
                .or_else(|| area.card_image.clone());

            let region = area.region.unwrap_or_else(|| {
                Region::from_aliases(
                    std::iter::once(area.name.as_str())
                        .chain(area.aliases.iter().map(String::as_str)),
                )
            });

            if matching.is_empty() {
                tracing::debug!("Area '{}' has no matching properties this pass", area.slug);
            }

            AreaSummary {
                area: area.clone(),
                property_count: matching.len(),
                representative_image,
                region,
            }
        })
        .collect()
}

/// First image URL, in feed order (primary first, then gallery),
/// not yet claimed by an earlier area in this pass.
fn pick_unused_image(matching: &[&Property], used: &mut HashSet<String>) -> Option<String> {
    for property in matching {
        for image in &property.images {
            if !used.contains(image) {
                used.insert(image.clone());
                return Some(image.clone());
            }
        }
    }
    None
}
