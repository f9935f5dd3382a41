// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end ingestion pass over a realistic feed document:
//! parse, build, match against curated areas, then query and
//! feature the resulting catalog.

use costa_feed::catalog::{featured, query};
use costa_feed::feed::{builder, parser};
use costa_feed::geo::matcher;
use costa_feed::model::area::Area;
use costa_feed::model::property::{Property, Readiness};
use costa_feed::model::region::{Region, RegionBucket};

const FEED: &str = r#"<root>
<kyero><feed_version>3</feed_version></kyero>
<agent>
  <name><![CDATA[Sol Homes SL]]></name>
</agent>
<property>
  <id>101</id>
  <ref>N2041</ref>
  <new_build>1</new_build>
  <price>325000</price>
  <type><![CDATA[Villa]]></type>
  <town>Ciudad Quesada</town>
  <province>Alicante</province>
  <location_detail><![CDATA[Doña Pepa]]></location_detail>
  <beds>3</beds>
  <baths>2</baths>
  <surface_area>
    <built>120</built>
    <plot>400</plot>
  </surface_area>
  <desc>
    <en><![CDATA[We present Villa Aurora, a stunning key ready home with private pool. #ref:N2041]]></en>
    <es><![CDATA[Presentamos Villa Aurora.]]></es>
  </desc>
  <images>
    <image><url><![CDATA[https://cdn.example.com/n2041/1.jpg]]></url></image>
    <image><url>https://evil.example.org/tracker.jpg</url></image>
    <image><url>https://cdn.example.com/n2041/2.jpg</url></image>
  </images>
</property>
<property>
  <id>102</id>
  <ref>N2042</ref>
  <new_build>1</new_build>
  <price>560000</price>
  <type>Apartment</type>
  <town>Jávea</town>
  <province>Alicante</province>
  <beds>2</beds>
  <baths>2</baths>
  <desc>
    <es><![CDATA[Apartamento moderno cerca del Arenal.]]></es>
  </desc>
  <images>
    <image><url>https://cdn.example.com/n2042/1.jpg</url></image>
  </images>
</property>
<property>
  <new_build>1</new_build>
  <price>200000</price>
  <town>Orphan</town>
</property>
<property>
  <id>103</id>
  <ref>R9001</ref>
  <price>90000</price>
  <type>Apartment</type>
  <town>Torrevieja</town>
</property>
</root>"#;

fn options() -> parser::ParseOptions {
    parser::ParseOptions {
        description_language: "en".to_string(),
        trusted_image_hosts: vec!["cdn.example.com".to_string()],
    }
}

fn ingest() -> (Vec<Property>, parser::ParseReport) {
    let report = parser::parse(FEED, &options()).unwrap();
    let properties = report
        .records
        .iter()
        .map(|record| builder::build(record, &report.developer))
        .collect();
    (properties, report)
}

fn area(slug: &str, name: &str, aliases: &[&str]) -> Area {
    Area {
        slug: slug.to_string(),
        name: name.to_string(),
        aliases: aliases.iter().map(ToString::to_string).collect(),
        region: None,
        price_range: None,
        property_types: Vec::new(),
        card_image: Some(format!("https://cdn.example.com/areas/{slug}.jpg")),
    }
}

#[test]
fn feed_parses_into_two_new_build_properties() {
    let (properties, report) = ingest();
    assert_eq!(properties.len(), 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.resale_excluded, 1);
    assert_eq!(report.developer, "Sol Homes SL");
}

#[test]
fn canonical_fields_are_derived_end_to_end() {
    let (properties, _) = ingest();
    let villa = &properties[0];

    assert_eq!(villa.reference, "N2041");
    assert_eq!(villa.project_name, "Villa Aurora");
    assert_eq!(villa.slug, "villa-aurora");
    assert_eq!(villa.readiness, Readiness::KeyReady);
    assert_eq!(villa.developer, "Sol Homes SL");
    assert!(!villa.description.contains("#ref:"));
    // The untrusted host is gone, order otherwise preserved.
    assert_eq!(
        villa.images,
        [
            "https://cdn.example.com/n2041/1.jpg",
            "https://cdn.example.com/n2041/2.jpg",
        ]
    );

    let apartment = &properties[1];
    // No English variant; the Spanish one is the fallback.
    assert!(apartment.description.contains("Arenal"));
    assert_eq!(apartment.project_name, "Apartment N2042");
}

#[test]
fn areas_match_accent_insensitively_with_distinct_images() {
    let (properties, _) = ingest();
    let areas = vec![
        area("javea", "Javea", &["xabia"]),
        area("ciudad-quesada", "Ciudad Quesada", &["quesada", "dona pepa"]),
        area("moraira", "Moraira", &[]),
    ];

    let summaries = matcher::match_areas(&properties, &areas);
    assert_eq!(summaries.len(), 3);

    let by_slug = |slug: &str| {
        summaries
            .iter()
            .find(|summary| summary.area.slug == slug)
            .unwrap()
    };
    assert_eq!(by_slug("javea").property_count, 1);
    assert_eq!(by_slug("javea").region, Region::CostaBlancaNorth);
    assert_eq!(by_slug("ciudad-quesada").property_count, 1);
    assert_eq!(by_slug("ciudad-quesada").region, Region::CostaBlancaSouth);
    // Zero matches is a valid, rendered state.
    assert_eq!(by_slug("moraira").property_count, 0);
    assert_eq!(
        by_slug("moraira").representative_image.as_deref(),
        Some("https://cdn.example.com/areas/moraira.jpg"),
    );

    let mut images: Vec<&str> = summaries
        .iter()
        .filter_map(|summary| summary.representative_image.as_deref())
        .collect();
    images.sort_unstable();
    images.dedup();
    assert_eq!(images.len(), 3);
}

#[test]
fn queries_and_featured_run_over_the_built_catalog() {
    let (properties, _) = ingest();

    let south = query::query(
        &properties,
        &query::Filter::builder().region(RegionBucket::South).build(),
        None,
    );
    assert_eq!(south.len(), 1);
    assert_eq!(south[0].reference, "N2041");

    let sorted = query::query(
        &properties,
        &query::Filter::default(),
        Some(query::SortKey::PriceDesc),
    );
    assert_eq!(sorted[0].reference, "N2042");

    let facets = query::facets(&properties);
    assert_eq!(facets.towns, ["ciudad quesada", "javea"]);
    assert_eq!(facets.bedrooms, [2, 3]);

    let slate = featured::select_featured(&properties, 2);
    // The key-ready villa anchors the slate.
    assert_eq!(slate[0].reference, "N2041");
}
