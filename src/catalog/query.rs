// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Filtering, sorting and facet extraction over a snapshot.
//!
//! Filters are independent predicates that commute: a property is
//! kept exactly when every set predicate accepts it, so applying
//! them in any order yields the same result set. Sorting is stable,
//! with feed order as the universal tie-breaker.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use strum::{Display, EnumString};
use typed_builder::TypedBuilder;

use crate::geo::normalize::{canonical_town, normalize};
use crate::model::property::Property;
use crate::model::region::RegionBucket;

/// A conjunction of optional predicates; unset fields accept everything.
#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct Filter {
    /// Canonicalized town match against the property's town or zone.
    #[builder(default, setter(strip_option, into))]
    pub town: Option<String>,
    #[builder(default, setter(strip_option))]
    pub bedrooms: Option<u32>,
    /// Case-insensitive exact property type.
    #[builder(default, setter(strip_option, into))]
    pub property_type: Option<String>,
    /// Inclusive price ceiling; unpriced properties never pass it.
    #[builder(default, setter(strip_option))]
    pub max_price: Option<u64>,
    #[builder(default, setter(strip_option))]
    pub region: Option<RegionBucket>,
}

impl Filter {
    #[must_use]
    pub fn matches(&self, property: &Property) -> bool {
        if let Some(town) = &self.town {
            let wanted = canonical_town(town);
            if canonical_town(&property.town) != wanted && normalize(&property.zone) != wanted {
                return false;
            }
        }
        if let Some(bedrooms) = self.bedrooms {
            if property.bedrooms != Some(bedrooms) {
                return false;
            }
        }
        if let Some(property_type) = &self.property_type {
            if !property
                .property_type
                .trim()
                .eq_ignore_ascii_case(property_type.trim())
            {
                return false;
            }
        }
        if let Some(ceiling) = self.max_price {
            if !property.price.is_some_and(|price| price <= ceiling) {
                return false;
            }
        }
        if let Some(region) = self.region {
            if !region.matches(&property.town, &property.description) {
                return false;
            }
        }
        true
    }
}

/// Total order over one key; ties keep feed order (stable sort).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    BedroomsDesc,
    SizeDesc,
}

impl SortKey {
    fn compare(self, a: &Property, b: &Property) -> Ordering {
        match self {
            Self::PriceAsc => cmp_asc_none_last(a.price, b.price),
            Self::PriceDesc => cmp_desc_none_last(a.price, b.price),
            Self::BedroomsDesc => cmp_desc_none_last(a.bedrooms, b.bedrooms),
            Self::SizeDesc => cmp_desc_none_last(size(a), size(b)),
        }
    }
}

/// Ascending, with `None` always last.
fn cmp_asc_none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending, with `None` still last rather than first.
fn cmp_desc_none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Built surface, falling back to the plot when unbuilt.
fn size(property: &Property) -> Option<u32> {
    property.built_area.or(property.plot_area)
}

/// Filters and (optionally) sorts a snapshot's properties.
#[must_use]
pub fn query(properties: &[Property], filter: &Filter, sort: Option<SortKey>) -> Vec<Property> {
    let mut selected: Vec<Property> = properties
        .iter()
        .filter(|property| filter.matches(property))
        .cloned()
        .collect();
    if let Some(key) = sort {
        selected.sort_by(|a, b| key.compare(a, b));
    }
    selected
}

/// Distinct filter values present in a snapshot, for building filter UIs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Facets {
    /// Canonicalized town names, sorted.
    pub towns: Vec<String>,
    /// Property types as listed, lowercased and sorted.
    pub property_types: Vec<String>,
    /// Distinct bedroom counts, ascending.
    pub bedrooms: Vec<u32>,
}

#[must_use]
pub fn facets(properties: &[Property]) -> Facets {
    let mut towns = BTreeSet::new();
    let mut property_types = BTreeSet::new();
    let mut bedrooms = BTreeSet::new();
    for property in properties {
        let town = canonical_town(&property.town);
        if !town.is_empty() {
            towns.insert(town);
        }
        let property_type = property.property_type.trim().to_lowercase();
        if !property_type.is_empty() {
            property_types.insert(property_type);
        }
        if let Some(count) = property.bedrooms {
            bedrooms.insert(count);
        }
    }
    Facets {
        towns: towns.into_iter().collect(),
        property_types: property_types.into_iter().collect(),
        bedrooms: bedrooms.into_iter().collect(),
    }
}
