// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Deterministic featured slate for the home page.
//!
//! Key-ready stock sells the site, so it anchors the first row;
//! the rest of the slate fills from the remaining catalog. No
//! randomness: the same snapshot always yields the same slate.

use crate::classify;
use crate::model::property::Property;

/// Key-ready slots in the slate: half of `n`, rounded up, capped
/// at one first row of three cards.
const MAX_KEY_READY_SLOTS: usize = 3;

/// Selects up to `n` properties for the featured slate.
///
/// Partitions the catalog into key-ready and other properties,
/// takes up to `min(ceil(n / 2), 3)` key-ready first, then fills
/// the remainder from the others followed by any leftover
/// key-ready. Each partition keeps its feed order.
#[must_use]
pub fn select_featured(properties: &[Property], n: usize) -> Vec<Property> {
    let (key_ready, other): (Vec<&Property>, Vec<&Property>) = properties
        .iter()
        .partition(|property| classify::classify(property).readiness.is_key_ready());

    let lead_slots = n.div_ceil(2).min(MAX_KEY_READY_SLOTS);
    let lead = key_ready.len().min(lead_slots);

    key_ready
        .iter()
        .take(lead)
        .chain(other.iter())
        .chain(key_ready.iter().skip(lead))
        .take(n)
        .map(|property| (*property).clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::property::Readiness;

    fn property(reference: &str, readiness: Readiness) -> Property {
        Property {
            id: reference.to_string(),
            reference: reference.to_string(),
            price: Some(300_000),
            bedrooms: Some(3),
            bathrooms: Some(2),
            built_area: Some(110),
            plot_area: None,
            town: "Torrevieja".to_string(),
            zone: String::new(),
            province: "Alicante".to_string(),
            property_type: "Villa".to_string(),
            description: String::new(),
            images: Vec::new(),
            readiness,
            developer: "Sol Homes".to_string(),
            project_name: format!("Villa {reference}"),
            slug: format!("villa-{}", reference.to_lowercase()),
        }
    }

    fn catalog(key_ready: usize, other: usize) -> Vec<Property> {
        let mut properties = Vec::new();
        // Interleave so feed order and partition order differ.
        for i in 0..key_ready.max(other) {
            if i < other {
                properties.push(property(&format!("O{i}"), Readiness::OffPlan));
            }
            if i < key_ready {
                properties.push(property(&format!("K{i}"), Readiness::KeyReady));
            }
        }
        properties
    }

    fn refs(slate: &[Property]) -> Vec<&str> {
        slate.iter().map(|p| p.reference.as_str()).collect()
    }

    #[test]
    fn six_slots_lead_with_exactly_three_key_ready() {
        let slate = select_featured(&catalog(4, 4), 6);
        assert_eq!(refs(&slate), ["K0", "K1", "K2", "O0", "O1", "O2"]);
    }

    #[test]
    fn leftover_key_ready_fill_after_others_run_out() {
        let slate = select_featured(&catalog(5, 1), 6);
        assert_eq!(refs(&slate), ["K0", "K1", "K2", "O0", "K3", "K4"]);
    }

    #[test]
    fn scarce_key_ready_is_not_padded() {
        let slate = select_featured(&catalog(1, 5), 6);
        assert_eq!(refs(&slate), ["K0", "O0", "O1", "O2", "O3", "O4"]);
    }

    #[test]
    fn small_slates_halve_the_lead() {
        // ceil(2 / 2) = 1 key-ready slot.
        let slate = select_featured(&catalog(3, 3), 2);
        assert_eq!(refs(&slate), ["K0", "O0"]);
    }

    #[test]
    fn large_slates_cap_the_lead_at_three() {
        let slate = select_featured(&catalog(6, 6), 12);
        assert_eq!(
            refs(&slate),
            ["K0", "K1", "K2", "O0", "O1", "O2", "O3", "O4", "O5", "K3", "K4", "K5"]
        );
    }

    #[test]
    fn empty_catalog_yields_an_empty_slate() {
        assert!(select_featured(&[], 6).is_empty());
    }

    #[test]
    fn same_snapshot_same_slate() {
        let properties = catalog(4, 4);
        assert_eq!(
            refs(&select_featured(&properties, 6)),
            refs(&select_featured(&properties, 6))
        );
    }
}
