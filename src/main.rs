// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

mod cli;

use clap::crate_name;
use cli_utils::BoxResult;
use costa_feed::catalog::{featured, query};
use costa_feed::feed::cache::Catalog;
use costa_feed::feed::parser::ParseOptions;
use costa_feed::feed::HttpFeedSource;
use costa_feed::geo::matcher;
use costa_feed::model::area;
use costa_feed::settings;

use cli_utils::logging;
use tracing::instrument;
use tracing_subscriber::filter::LevelFilter;

#[allow(clippy::print_stdout)]
fn print_version_and_exit(quiet: bool) {
    if !quiet {
        print!("{} ", clap::crate_name!());
    }
    println!("{}", costa_feed::VERSION);
    std::process::exit(0);
}

#[tokio::main]
#[instrument]
#[allow(clippy::print_stdout)]
async fn main() -> BoxResult<()> {
    let log_reload_handle = logging::setup(crate_name!())?;
    let args = cli::args_matcher().get_matches();

    let quiet = args.get_flag(cli::A_L_QUIET);
    let version = args.get_flag(cli::A_L_VERSION);
    if version {
        print_version_and_exit(quiet);
    }

    let verbose = args.get_flag(cli::A_L_VERBOSE);

    let log_level = if verbose {
        LevelFilter::TRACE
    } else if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    logging::set_log_level_tracing(&log_reload_handle, log_level)?;

    let config_file = args
        .get_one::<String>(cli::A_L_CONFIG)
        .cloned()
        .unwrap_or_else(|| "config.yml".to_string());
    let mut run_settings = settings::load(&config_file)?;
    if let Some(feed_url) = args.get_one::<String>(cli::A_L_FEED_URL) {
        run_settings.feed_url = url::Url::parse(feed_url)?;
    }
    if let Some(areas_dir) = args.get_one::<String>(cli::A_L_AREAS_DIR) {
        run_settings.areas_dir = areas_dir.into();
    }
    let featured_slots = args
        .get_one::<usize>(cli::A_L_FEATURED)
        .copied()
        .unwrap_or(6);
    let stale_ok = args.get_flag(cli::A_L_STALE_OK);

    tracing::info!("Fetching feed from '{}' ...", run_settings.feed_url);
    let source = HttpFeedSource::new(
        run_settings.feed_url.as_str(),
        run_settings.retries,
        run_settings.timeout_ms,
    );
    let options = ParseOptions {
        description_language: run_settings.description_language.clone(),
        trusted_image_hosts: run_settings.trusted_image_hosts.clone(),
    };
    let catalog = Catalog::new(source, options, run_settings.max_age);
    let snapshot = catalog.get().await?;

    println!(
        "Catalog: {} properties from '{}' (fetched {}, {} malformed blocks skipped){}",
        snapshot.properties.len(),
        snapshot.developer,
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
        snapshot.skipped,
        if snapshot.stale { " [STALE]" } else { "" },
    );

    let facets = query::facets(&snapshot.properties);
    println!(
        "Facets: {} towns, {} property types, bedroom counts {:?}",
        facets.towns.len(),
        facets.property_types.len(),
        facets.bedrooms,
    );

    let areas = area::load_areas(&run_settings.areas_dir)?;
    tracing::info!(
        "Matching {} properties against {} areas ...",
        snapshot.properties.len(),
        areas.len(),
    );
    for summary in matcher::match_areas(&snapshot.properties, &areas) {
        println!(
            "Area '{}': {} properties, image {}",
            summary.area.name,
            summary.property_count,
            summary.representative_image.as_deref().unwrap_or("-"),
        );
    }

    println!("Featured slate ({featured_slots} slots):");
    for property in featured::select_featured(&snapshot.properties, featured_slots) {
        println!(
            "- {} ({}, {}, {})",
            property.project_name,
            property.town,
            property.price_display(),
            property.readiness,
        );
    }

    if snapshot.stale && !stale_ok {
        return Err(
            "The feed refresh failed; the catalog above is the last-known-good snapshot. \
Pass --stale-ok to treat this as success."
                .into(),
        );
    }

    Ok(())
}
