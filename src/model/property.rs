// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Build/delivery state of a listing.
///
/// The feed only ever distinguishes "off plan" from "under construction";
/// `KeyReady` is derived by the classifier from description and status
/// phrases (see [`crate::classify`]).
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Readiness {
    KeyReady,
    UnderConstruction,
    #[default]
    OffPlan,
}

impl Readiness {
    #[must_use]
    pub const fn is_key_ready(self) -> bool {
        matches!(self, Self::KeyReady)
    }
}

/// The canonical listing unit,
/// derived from one raw feed block by [`crate::feed::builder`].
///
/// Numeric fields are `Option`s on purpose:
/// `None` means the feed did not provide a usable value,
/// which is distinct from `0`
/// (a `None` price renders as "price on request").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    /// Natural key; the feed's `ref` when present, else `id`.
    pub reference: String,
    /// Sale price in whole EUR; `None` = price on request.
    pub price: Option<u64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    /// Built surface in m².
    pub built_area: Option<u32>,
    /// Plot surface in m².
    pub plot_area: Option<u32>,
    /// Location fields as received, un-normalized.
    pub town: String,
    pub zone: String,
    pub province: String,
    pub property_type: String,
    /// Single chosen language variant, internal `#ref:` codes stripped.
    pub description: String,
    /// Ordered image URLs; only trusted media hosts survive parsing.
    pub images: Vec<String>,
    pub readiness: Readiness,
    /// Feed-level agent/developer name, shared by all records of one pass.
    pub developer: String,
    /// Best-effort marketing name extracted from the description,
    /// or the `"{property_type} {reference}"` fallback.
    pub project_name: String,
    /// Pure function of `project_name`; collisions collide by design.
    pub slug: String,
}

impl Property {
    /// The primary (card) image, if any survived the host allowlist.
    #[must_use]
    pub fn main_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Human-readable price, "Price on request" for `None`.
    #[must_use]
    pub fn price_display(&self) -> String {
        self.price.map_or_else(
            || "Price on request".to_string(),
            |eur| format!("\u{20ac}{}", group_thousands(eur)),
        )
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, chr) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(chr);
    }
    grouped
}
