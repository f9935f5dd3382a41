// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use clap::{command, Arg, ArgAction, Command, ValueHint};
use const_format::formatcp;

pub const A_L_VERSION: &str = "version";
pub const A_S_VERSION: char = 'V';

pub const A_L_QUIET: &str = "quiet";
pub const A_S_QUIET: char = 'q';

pub const A_L_VERBOSE: &str = "verbose";
pub const A_S_VERBOSE: char = 'v';

pub const A_L_CONFIG: &str = "config";
pub const A_S_CONFIG: char = 'c';

pub const A_L_FEED_URL: &str = "feed-url";
pub const A_S_FEED_URL: char = 'f';

pub const A_L_AREAS_DIR: &str = "areas-dir";
pub const A_S_AREAS_DIR: char = 'a';

pub const A_L_FEATURED: &str = "featured";

pub const A_L_STALE_OK: &str = "stale-ok";

fn arg_version() -> Arg {
    Arg::new(A_L_VERSION)
        .help(formatcp!(
            "Print version information and exit. \
May be combined with -{A_S_QUIET},--{A_L_QUIET}, \
to really only output the version string."
        ))
        .short(A_S_VERSION)
        .long(A_L_VERSION)
        .action(ArgAction::SetTrue)
}

fn arg_quiet() -> Arg {
    Arg::new(A_L_QUIET)
        .help("Minimize or suppress output to stdlog")
        .short(A_S_QUIET)
        .long(A_L_QUIET)
        .action(ArgAction::SetTrue)
        .conflicts_with(A_L_VERBOSE)
}

fn arg_verbose() -> Arg {
    Arg::new(A_L_VERBOSE)
        .help("More verbose log output")
        .short(A_S_VERBOSE)
        .long(A_L_VERBOSE)
        .action(ArgAction::SetTrue)
}

fn arg_config() -> Arg {
    Arg::new(A_L_CONFIG)
        .help("The configuration file to load")
        .short(A_S_CONFIG)
        .long(A_L_CONFIG)
        .value_hint(ValueHint::FilePath)
        .value_name("FILE")
        .default_value("config.yml")
        .action(ArgAction::Set)
}

fn arg_feed_url() -> Arg {
    Arg::new(A_L_FEED_URL)
        .help("Fetch the feed from this URL instead of the configured one")
        .short(A_S_FEED_URL)
        .long(A_L_FEED_URL)
        .value_hint(ValueHint::Url)
        .value_name("URL")
        .action(ArgAction::Set)
}

fn arg_areas_dir() -> Arg {
    Arg::new(A_L_AREAS_DIR)
        .help("Directory containing the curated area JSON documents")
        .short(A_S_AREAS_DIR)
        .long(A_L_AREAS_DIR)
        .value_hint(ValueHint::DirPath)
        .value_name("DIR")
        .action(ArgAction::Set)
}

fn arg_featured() -> Arg {
    Arg::new(A_L_FEATURED)
        .help("How many properties to select for the featured slate")
        .long(A_L_FEATURED)
        .value_name("N")
        .default_value("6")
        .value_parser(clap::value_parser!(usize))
        .action(ArgAction::Set)
}

fn arg_stale_ok() -> Arg {
    Arg::new(A_L_STALE_OK)
        .help(
            "Treat a stale catalog as success. \
Without this flag, a failed refresh that falls back \
to the last-known-good snapshot exits with an error.",
        )
        .long(A_L_STALE_OK)
        .action(ArgAction::SetTrue)
}

#[must_use]
pub fn args_matcher() -> Command {
    command!()
        .about(
            "Ingests a raw property feed into a canonical catalog, \
matches it against the curated area pages, \
and prints an ingestion summary.",
        )
        .bin_name(clap::crate_name!())
        .help_expected(true)
        .disable_version_flag(true)
        .arg(arg_version())
        .arg(arg_quiet())
        .arg(arg_verbose())
        .arg(arg_config())
        .arg(arg_feed_url())
        .arg(arg_areas_dir())
        .arg(arg_featured())
        .arg(arg_stale_ok())
}
