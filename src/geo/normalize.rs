// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Canonicalization of free-text town/zone strings.
//!
//! Area names arrive in many languages and spellings
//! ("Jávea", "Xàbia", "javea_xabia", "L'Alfàs del Pi"),
//! so accent folding uses Unicode canonical decomposition,
//! not a transliteration table.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Canonicalizes a free-text location string:
/// lowercase, trimmed, underscores as spaces,
/// accented letters decomposed to their base letter.
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace('_', " ")
        .nfd()
        .filter(|chr| !is_combining_mark(*chr))
        .collect()
}

/// Known alternative spellings mapped to the canonical town name.
/// Applied on top of [`normalize`]; both sides are pre-normalized.
const TOWN_ALIASES: &[(&str, &str)] = &[
    ("xabia", "javea"),
    ("javea xabia", "javea"),
    ("javea/xabia", "javea"),
    ("calp", "calpe"),
    ("teulada-moraira", "moraira"),
    ("teulada moraira", "moraira"),
    ("moraira teulada", "moraira"),
    ("alfas del pi", "alfaz del pi"),
    ("l'alfas del pi", "alfaz del pi"),
    ("guardamar", "guardamar del segura"),
    ("orihuela-costa", "orihuela costa"),
    ("san miguel", "san miguel de salinas"),
    ("montesinos", "los montesinos"),
    ("quesada", "ciudad quesada"),
];

/// Normalizes a town string and folds known aliases
/// onto one canonical spelling.
#[must_use]
pub fn canonical_town(raw: &str) -> String {
    let normalized = normalize(raw);
    for (alias, canonical) in TOWN_ALIASES {
        if normalized == *alias {
            return (*canonical).to_string();
        }
    }
    normalized
}
