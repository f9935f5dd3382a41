// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Keyword-derived facts about a listing.
//!
//! Matching is case-insensitive *substring* matching without word
//! boundaries, inherited from the system this engine replaces.
//! It can false-positive ("whirlpool" contains "pool"); that is a
//! documented limitation, kept deliberately so derived facts do
//! not shift under existing listings.

use crate::model::property::{Property, Readiness};

/// "Has a pool" keywords across the feed's description languages.
const POOL_KEYWORDS: &[&str] = &[
    "pool",
    "piscina",    // es
    "piscine",    // fr
    "schwimmbad", // de
    "zwembad",    // nl
    "basen",      // pl
    "uima-allas", // fi
    "\u{431}\u{430}\u{441}\u{441}\u{435}\u{439}\u{43d}", // ru: бассейн
];

/// Phrases marking a listing as immediately occupiable.
const KEY_READY_PHRASES: &[&str] = &[
    "key ready",
    "key-ready",
    "ready to move",
    "immediate delivery",
    "llave en mano",      // es
    "entrega inmediata",  // es
    "schl\u{fc}sselfertig", // de
    "instapklaar",        // nl
    "pod klucz",          // pl
];

const UNDER_CONSTRUCTION_MARKERS: &[&str] = &["construction", "en obra", "en construcci"];

/// Facts derived from a property's free text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub has_pool: bool,
    pub readiness: Readiness,
}

/// Derives boolean/enum facts from a canonical property.
#[must_use]
pub fn classify(property: &Property) -> Classification {
    let description = property.description.to_lowercase();
    let readiness = if contains_any(&description, KEY_READY_PHRASES) {
        Readiness::KeyReady
    } else {
        property.readiness
    };
    Classification {
        has_pool: contains_any(&description, POOL_KEYWORDS),
        readiness,
    }
}

/// Maps description + feed status to a readiness state.
/// Key-ready phrases win over any feed-provided status;
/// otherwise the status decides, defaulting to off-plan.
#[must_use]
pub fn readiness(description: &str, status: Option<&str>) -> Readiness {
    let description = description.to_lowercase();
    let status = status.map(str::to_lowercase).unwrap_or_default();
    if contains_any(&description, KEY_READY_PHRASES) || contains_any(&status, KEY_READY_PHRASES) {
        return Readiness::KeyReady;
    }
    if contains_any(&status, UNDER_CONSTRUCTION_MARKERS) {
        return Readiness::UnderConstruction;
    }
    Readiness::OffPlan
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
