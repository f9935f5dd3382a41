// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::geo::normalize::normalize;

/// Coast-half classification of a curated [`super::area::Area`].
///
/// Resolved per ingestion pass from the static town lists below;
/// an area matching neither list lands in the residual `Other`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    CostaBlancaNorth,
    CostaBlancaSouth,
    Other,
}

/// Towns that mark an area as Costa Blanca South.
/// Lowercase, matched as substrings against normalized town aliases.
pub const SOUTH_TOWNS: &[&str] = &[
    "torrevieja",
    "orihuela",
    "guardamar",
    "pilar de la horadada",
    "villamartin",
    "la zenia",
    "playa flamenca",
    "punta prima",
    "cabo roig",
    "campoamor",
    "mil palmeras",
    "los alcazares",
    "san miguel",
    "algorfa",
    "rojales",
    "quesada",
    "los montesinos",
    "benijofar",
    "dolores",
    "san fulgencio",
    "la marina",
];

/// Towns that mark an area as Costa Blanca North.
pub const NORTH_TOWNS: &[&str] = &[
    "javea",
    "xabia",
    "denia",
    "moraira",
    "teulada",
    "benissa",
    "calpe",
    "altea",
    "albir",
    "alfaz del pi",
    "benidorm",
    "villajoyosa",
    "benitachell",
    "cumbre del sol",
    "finestrat",
    "polop",
    "la nucia",
    "pedreguer",
    "ondara",
    "pego",
    "oliva",
    "gandia",
];

impl Region {
    /// Resolves a region from an area's known town aliases.
    /// First list hit wins; south is checked first
    /// because the feed is predominantly south-coast inventory.
    #[must_use]
    pub fn from_aliases<'a>(aliases: impl IntoIterator<Item = &'a str>) -> Self {
        for alias in aliases {
            let alias = normalize(alias);
            if SOUTH_TOWNS.iter().any(|town| alias.contains(town)) {
                return Self::CostaBlancaSouth;
            }
            if NORTH_TOWNS.iter().any(|town| alias.contains(town)) {
                return Self::CostaBlancaNorth;
            }
        }
        Self::Other
    }
}

/// A static, keyword-defined grouping used for filtering,
/// distinct from a curated Area.
///
/// `Golf` matches on town *or* description keyword,
/// so it is non-exclusive with the other buckets by design.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum RegionBucket {
    South,
    North,
    Golf,
    Inland,
}

const GOLF_TOWNS: &[&str] = &[
    "algorfa",
    "orihuela costa",
    "campoamor",
    "ciudad quesada",
    "villamartin",
    "vistabella",
    "las colinas",
    "lo romero",
];

const INLAND_TOWNS: &[&str] = &[
    "algorfa",
    "rojales",
    "quesada",
    "los montesinos",
    "benijofar",
    "formentera del segura",
    "catral",
    "almoradi",
    "dolores",
    "jalon",
    "parcent",
    "pinoso",
    "hondon",
];

impl RegionBucket {
    /// Town keyword list defining this bucket.
    #[must_use]
    pub const fn towns(self) -> &'static [&'static str] {
        match self {
            Self::South => SOUTH_TOWNS,
            Self::North => NORTH_TOWNS,
            Self::Golf => GOLF_TOWNS,
            Self::Inland => INLAND_TOWNS,
        }
    }

    /// Whether a property with the given raw town and description
    /// falls into this bucket.
    #[must_use]
    pub fn matches(self, town: &str, description: &str) -> bool {
        let town = normalize(town);
        if self.towns().iter().any(|keyword| town.contains(keyword)) {
            return true;
        }
        // Golf inventory is frequently marketed by course, not by town.
        matches!(self, Self::Golf) && description.to_lowercase().contains("golf")
    }
}
