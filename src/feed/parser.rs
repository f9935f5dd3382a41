// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Extraction of raw property records from the vendor's
//! tag-based feed document.
//!
//! The document is not trusted to be well-formed XML:
//! blocks are delimited structurally, scalar values are pulled
//! per tag (CDATA-escaped form first, plain inline form second),
//! and one bad block never aborts the pass.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::FeedError;

/// Language variants the vendor ships per description block,
/// in fallback priority order after the configured preference.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "en", "es", "de", "fr", "nl", "sv", "no", "da", "fi", "pl", "ru",
];

static PROPERTY_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<property>.*?</property>").unwrap());

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<url[^>]*>\s*(?:<!\[CDATA\[)?\s*(https?://[^<\]\s]+)").unwrap()
});

/// Internal reference codes embedded in descriptions, e.g. `#ref:N2041-B`.
static REF_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#ref:\S+").unwrap());

/// One property block with scalar fields extracted but not yet typed.
/// Typing, defaulting and derivation happen in [`super::builder`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub id: Option<String>,
    pub reference: Option<String>,
    pub price: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub built: Option<String>,
    pub plot: Option<String>,
    pub town: Option<String>,
    pub zone: Option<String>,
    pub province: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub description: String,
    pub images: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Preferred language of the chosen description variant.
    pub description_language: String,
    /// Media hosts whose image URLs are retained;
    /// URLs from any other host are silently dropped.
    /// An empty list accepts all hosts.
    pub trusted_image_hosts: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            description_language: "en".to_string(),
            trusted_image_hosts: vec![],
        }
    }
}

/// Outcome of one full parse pass over a feed document.
#[derive(Debug)]
pub struct ParseReport {
    pub records: Vec<RawRecord>,
    /// Malformed blocks dropped (missing identity).
    pub skipped: usize,
    /// Well-formed blocks excluded for lacking the new-build flag;
    /// this feed serves new-build inventory only.
    pub resale_excluded: usize,
    /// Feed-level agent/developer name, shared by every record.
    pub developer: String,
}

/// Splits the document into property blocks and extracts raw records.
///
/// # Errors
///
/// Only a document with no property blocks at all is an error;
/// individual bad blocks are counted and skipped.
pub fn parse(document: &str, options: &ParseOptions) -> Result<ParseReport, FeedError> {
    let blocks: Vec<&str> = PROPERTY_BLOCK
        .find_iter(document)
        .map(|found| found.as_str())
        .collect();
    if blocks.is_empty() {
        return Err(FeedError::EmptyDocument);
    }

    let developer = extract_developer(document);
    let mut records = Vec::with_capacity(blocks.len());
    let mut skipped = 0_usize;
    let mut resale_excluded = 0_usize;

    for block in blocks {
        let Some(record) = parse_block(block, options) else {
            skipped += 1;
            continue;
        };
        if !is_new_build(block) {
            resale_excluded += 1;
            continue;
        }
        records.push(record);
    }

    tracing::info!(
        "Parsed {} records ({} malformed skipped, {} non-new-build excluded)",
        records.len(),
        skipped,
        resale_excluded,
    );
    Ok(ParseReport {
        records,
        skipped,
        resale_excluded,
        developer,
    })
}

/// The feed carries one agent/developer block for the whole document.
fn extract_developer(document: &str) -> String {
    tag_region(document, "agent")
        .and_then(|agent| {
            tag_value(agent, "name").or_else(|| {
                let plain = unescape(agent);
                (!plain.contains('<') && !plain.is_empty()).then(|| plain.to_string())
            })
        })
        .unwrap_or_default()
}

fn is_new_build(block: &str) -> bool {
    matches!(
        tag_value(block, "new_build").as_deref(),
        Some("1") | Some("true")
    )
}

fn parse_block(block: &str, options: &ParseOptions) -> Option<RawRecord> {
    let id = tag_value(block, "id");
    let reference = tag_value(block, "ref");
    if id.is_none() && reference.is_none() {
        return None;
    }

    // Surface areas live in a nested block; extract within its bounds
    // only, so a sibling block's values can never leak in.
    let surface = tag_region(block, "surface_area");
    let built = surface.and_then(|region| tag_value(region, "built"));
    let plot = surface.and_then(|region| tag_value(region, "plot"));

    Some(RawRecord {
        id,
        reference,
        price: tag_value(block, "price"),
        beds: tag_value(block, "beds"),
        baths: tag_value(block, "baths"),
        built,
        plot,
        town: tag_value(block, "town"),
        zone: tag_value(block, "location_detail"),
        province: tag_value(block, "province"),
        property_type: tag_value(block, "type"),
        status: tag_value(block, "status"),
        description: extract_description(block, &options.description_language),
        images: extract_images(block, &options.trusted_image_hosts),
    })
}

/// Selects one language variant from the multi-language description
/// block and strips embedded internal reference codes.
fn extract_description(block: &str, preferred: &str) -> String {
    let Some(desc) = tag_region(block, "desc") else {
        return String::new();
    };
    let chosen = tag_value(desc, preferred).or_else(|| {
        SUPPORTED_LANGUAGES
            .iter()
            .filter(|lang| **lang != preferred)
            .find_map(|lang| tag_value(desc, lang))
    });
    chosen.map_or_else(String::new, |text| {
        REF_CODE.replace_all(&text, "").trim().to_string()
    })
}

/// Collects all URL-bearing leaves and filters them to the
/// trusted media-host allowlist. Untrusted URLs are dropped
/// silently; they are a routine occurrence, not an anomaly.
fn extract_images(block: &str, trusted_hosts: &[String]) -> Vec<String> {
    IMAGE_URL
        .captures_iter(block)
        .filter_map(|caps| caps.get(1).map(|value| value.as_str().to_string()))
        .filter(|image| is_trusted(image, trusted_hosts))
        .collect()
}

fn is_trusted(image: &str, trusted_hosts: &[String]) -> bool {
    // An empty allowlist means the deployment trusts the feed's
    // media hosts wholesale; only a configured list restricts.
    if trusted_hosts.is_empty() {
        return true;
    }
    let Ok(parsed) = Url::parse(image) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    trusted_hosts
        .iter()
        .any(|trusted| host == trusted || host.ends_with(&format!(".{trusted}")))
}

/// Finds the content region of the first `<tag>...</tag>` pair.
/// Tag-name matching is exact: `<town>` will not match `<townhouse>`.
fn tag_region<'a>(region: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut from = 0;
    while let Some(rel) = region.get(from..)?.find(&open) {
        let after_name = from + rel + open.len();
        let next = region.get(after_name..)?.chars().next()?;
        if next == '>' || next.is_whitespace() {
            let content_start = region.get(after_name..)?.find('>')? + after_name + 1;
            let content_end = region.get(content_start..)?.find(&close)? + content_start;
            return region.get(content_start..content_end);
        }
        from = after_name;
    }
    None
}

/// Extracts a scalar tag value: the CDATA-escaped form is tried
/// first, then the plain inline form; first success wins.
fn tag_value(region: &str, tag: &str) -> Option<String> {
    let inner = tag_region(region, tag)?.trim();
    // A '<' in plain inline text means this is a container tag,
    // not a scalar. CDATA content is literal and fully trusted;
    // descriptions routinely carry markup like `<br>`.
    let cdata = inner.starts_with("<![CDATA[") && inner.ends_with("]]>");
    if !cdata && inner.contains('<') {
        return None;
    }
    let text = unescape(inner).trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

/// Unwraps a `<![CDATA[...]]>` envelope, if present.
fn unescape(value: &str) -> &str {
    value
        .strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
        .map_or(value, str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<root>
  <agent><name><![CDATA[Sol Homes SL]]></name></agent>
  <property>
    <id>1001</id>
    <ref><![CDATA[N1001]]></ref>
    <new_build>1</new_build>
    <price>274900</price>
    <beds>2</beds>
    <baths>2</baths>
    <type>Apartment</type>
    <town>Torrevieja</town>
    <province>Alicante</province>
    <location_detail><![CDATA[Playa del Cura]]></location_detail>
    <surface_area><built>85</built><plot>0</plot></surface_area>
    <desc>
      <en><![CDATA[We present Villa Aurora, a stunning new build. #ref:N1001-A]]></en>
      <es><![CDATA[Presentamos Villa Aurora.]]></es>
    </desc>
    <images>
      <image><url>https://media.example-feed.com/p/1001/main.jpg</url></image>
      <image><url><![CDATA[https://cdn.elsewhere.net/stolen.jpg]]></url></image>
      <image><url>https://media.example-feed.com/p/1001/pool.jpg</url></image>
    </images>
  </property>
  <property>
    <new_build>1</new_build>
    <price>not-even-close</price>
    <town>Nowhere</town>
  </property>
  <property>
    <id>1003</id>
    <new_build>1</new_build>
    <type>Villa</type>
    <town>Ciudad Quesada</town>
    <desc><en>Key ready villa with private pool.</en></desc>
  </property>
  <property>
    <id>2001</id>
    <ref>R2001</ref>
    <type>Apartment</type>
    <town>Torrevieja</town>
  </property>
</root>"#;

    fn options() -> ParseOptions {
        ParseOptions {
            description_language: "en".into(),
            trusted_image_hosts: vec!["example-feed.com".into()],
        }
    }

    #[test]
    fn one_malformed_block_yields_skip_count_one() {
        let report = parse(FEED, &options()).unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn resale_records_are_excluded_entirely() {
        let report = parse(FEED, &options()).unwrap();
        assert_eq!(report.resale_excluded, 1);
        assert!(report.records.iter().all(|rec| rec.id.as_deref() != Some("2001")));
    }

    #[test]
    fn feed_level_developer_applies_to_the_pass() {
        let report = parse(FEED, &options()).unwrap();
        assert_eq!(report.developer, "Sol Homes SL");
    }

    #[test]
    fn cdata_form_wins_over_plain_form() {
        let report = parse(FEED, &options()).unwrap();
        let first = &report.records[0];
        assert_eq!(first.reference.as_deref(), Some("N1001"));
        assert_eq!(first.zone.as_deref(), Some("Playa del Cura"));
    }

    #[test]
    fn nested_surface_area_does_not_leak_across_blocks() {
        let report = parse(FEED, &options()).unwrap();
        assert_eq!(report.records[0].built.as_deref(), Some("85"));
        // The second valid record has no surface block at all.
        assert_eq!(report.records[1].built, None);
    }

    #[test]
    fn description_picks_language_and_strips_ref_codes() {
        let report = parse(FEED, &options()).unwrap();
        let desc = &report.records[0].description;
        assert!(desc.starts_with("We present Villa Aurora"));
        assert!(!desc.contains("#ref:"));
    }

    #[test]
    fn description_falls_back_across_languages() {
        let mut opts = options();
        opts.description_language = "pl".into();
        let report = parse(FEED, &opts).unwrap();
        // No Polish variant; English is the first fallback.
        assert!(report.records[0].description.contains("Villa Aurora"));
    }

    #[test]
    fn untrusted_image_hosts_are_dropped_silently() {
        let report = parse(FEED, &options()).unwrap();
        let images = &report.records[0].images;
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|url| url.contains("media.example-feed.com")));
    }

    #[test]
    fn cdata_descriptions_may_carry_markup() {
        let document = "<root><property><id>1</id><new_build>1</new_build>\
            <desc><en><![CDATA[Stunning villa.<br>Walk to the beach.]]></en></desc>\
            </property></root>";
        let report = parse(document, &options()).unwrap();
        assert_eq!(
            report.records[0].description,
            "Stunning villa.<br>Walk to the beach."
        );
    }

    #[test]
    fn empty_host_allowlist_accepts_every_image() {
        let report = parse(FEED, &ParseOptions::default()).unwrap();
        // Both trusted and previously-dropped hosts survive.
        assert_eq!(report.records[0].images.len(), 3);
    }

    #[test]
    fn empty_document_is_a_hard_error() {
        assert!(matches!(
            parse("<root></root>", &options()),
            Err(FeedError::EmptyDocument)
        ));
    }

    #[test]
    fn tag_names_do_not_match_prefixes() {
        let block = "<townhouse>yes</townhouse><town>Calpe</town>";
        assert_eq!(tag_value(block, "town").as_deref(), Some("Calpe"));
    }
}
