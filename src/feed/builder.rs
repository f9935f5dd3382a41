// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Mapping of raw feed records into typed, canonical properties.
//!
//! The project-name cascade and the slug function are the two
//! pieces downstream URLs depend on; both are deterministic and
//! must stay stable across regenerations.

use std::sync::LazyLock;

use regex::Regex;

use crate::classify;
use crate::model::property::Property;

use super::parser::RawRecord;

/// A capitalized word run: "Villa Aurora", "Residencial Sol y Mar".
/// Lowercase connective particles are allowed mid-name.
const NAME: &str = "[A-Z][A-Za-z0-9\u{c0}-\u{ff}'-]*\
(?:\\s+(?:de|del|la|los|el|y)\\s+[A-Z][A-Za-z0-9\u{c0}-\u{ff}'-]*\
|\\s+[A-Z0-9][A-Za-z0-9\u{c0}-\u{ff}'-]*)*";

struct NamePattern {
    /// Identifies the pattern in logs and tests.
    tag: &'static str,
    regex: Regex,
}

/// The ordered extraction cascade. Order is load-bearing:
/// the first matching pattern's capture wins, and reordering
/// changes derived slugs for live listings.
static NAME_PATTERNS: LazyLock<Vec<NamePattern>> = LazyLock::new(|| {
    [
        ("present", format!(r"[Pp]resent(?:s|ing)?\s+(?:to\s+you\s+)?({NAME})")),
        ("is", format!(r"({NAME})\s+is\b")),
        ("welcome-to", format!(r"[Ww]elcome\s+to\s+({NAME})")),
    ]
    .into_iter()
    .map(|(tag, pattern)| NamePattern {
        tag,
        regex: Regex::new(&pattern).unwrap(),
    })
    .collect()
});

/// Accented Latin characters the feed is known to ship,
/// transliterated for slugs. Deliberately a fixed table —
/// slugs must never change because a Unicode library updated.
const ACCENT_TABLE: &[(char, char)] = &[
    ('\u{e1}', 'a'), // á
    ('\u{e0}', 'a'), // à
    ('\u{e2}', 'a'), // â
    ('\u{e4}', 'a'), // ä
    ('\u{e9}', 'e'), // é
    ('\u{e8}', 'e'), // è
    ('\u{ea}', 'e'), // ê
    ('\u{eb}', 'e'), // ë
    ('\u{ed}', 'i'), // í
    ('\u{ec}', 'i'), // ì
    ('\u{ee}', 'i'), // î
    ('\u{ef}', 'i'), // ï
    ('\u{f3}', 'o'), // ó
    ('\u{f2}', 'o'), // ò
    ('\u{f4}', 'o'), // ô
    ('\u{f6}', 'o'), // ö
    ('\u{fa}', 'u'), // ú
    ('\u{f9}', 'u'), // ù
    ('\u{fb}', 'u'), // û
    ('\u{fc}', 'u'), // ü
    ('\u{f1}', 'n'), // ñ
    ('\u{e7}', 'c'), // ç
];

/// Builds the canonical [`Property`] from one raw record.
/// Never fails: missing numerics become `None`,
/// the name cascade always terminates in its fallback.
#[must_use]
pub fn build(raw: &RawRecord, developer: &str) -> Property {
    let id = raw
        .id
        .clone()
        .or_else(|| raw.reference.clone())
        .unwrap_or_default();
    let reference = raw.reference.clone().unwrap_or_else(|| id.clone());
    let property_type = raw.property_type.clone().unwrap_or_default();
    let description = raw.description.clone();

    let project_name = extract_project_name(&description)
        .unwrap_or_else(|| format!("{property_type} {reference}").trim().to_string());
    let slug = slugify(&project_name);

    Property {
        id,
        reference,
        price: parse_num(raw.price.as_deref()),
        bedrooms: parse_num(raw.beds.as_deref()),
        bathrooms: parse_num(raw.baths.as_deref()),
        built_area: parse_num(raw.built.as_deref()),
        plot_area: parse_num(raw.plot.as_deref()),
        town: raw.town.clone().unwrap_or_default(),
        zone: raw.zone.clone().unwrap_or_default(),
        province: raw.province.clone().unwrap_or_default(),
        property_type,
        readiness: classify::readiness(&description, raw.status.as_deref()),
        description,
        images: raw.images.clone(),
        developer: developer.to_string(),
        project_name,
        slug,
    }
}

/// Defensive numeric parsing: unparseable or absent is `None`,
/// never `0`, never a panic.
fn parse_num<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|raw| raw.trim().parse().ok())
}

/// Runs the name cascade over the description.
/// Returns `None` when no pattern matches; the caller applies
/// the `"{property_type} {reference}"` fallback.
#[must_use]
pub fn extract_project_name(description: &str) -> Option<String> {
    for pattern in NAME_PATTERNS.iter() {
        if let Some(caps) = pattern.regex.captures(description) {
            let name = caps.get(1)?.as_str().trim().to_string();
            tracing::trace!("Name pattern '{}' matched: '{name}'", pattern.tag);
            return Some(name);
        }
    }
    None
}

/// Derives a URL slug: lowercase, table-based transliteration,
/// non-alphanumeric runs collapsed to single hyphens, trimmed.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for chr in name.to_lowercase().chars() {
        let chr = ACCENT_TABLE
            .iter()
            .find(|(accented, _)| *accented == chr)
            .map_or(chr, |(_, base)| *base);
        if chr.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(chr);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
