// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Runtime configuration, layered from `config.yml`
//! and `COSTA_FEED_*` environment variables.
//!
//! Raw file values deserialize into [`IntermediateSettings`];
//! [`IntermediateSettings::finalize`] validates them into the
//! typed [`Settings`] the rest of the engine consumes.

use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use typed_builder::TypedBuilder;
use url::Url;

use crate::feed::{DEFAULT_RETRIES, DEFAULT_TIMEOUT};

/// Snapshot max age before a refresh, in seconds.
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

pub const DEFAULT_DESCRIPTION_LANGUAGE: &str = "en";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load the basic/low-level configuration data: {0}")]
    Config(#[from] ConfigError),
    #[error("The configured feed URL '{url}' does not parse: {source}")]
    InvalidFeedUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Settings as they deserialize from file + environment,
/// before validation.
#[derive(Serialize, Deserialize, Debug)]
pub struct IntermediateSettings {
    /// Upstream feed document URL.
    pub feed_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
    /// Preferred description language (ISO 639-1).
    #[serde(default = "default_description_language")]
    pub description_language: String,
    /// Image hosts the parser accepts; empty means accept all.
    #[serde(default)]
    pub trusted_image_hosts: Vec<String>,
    /// Directory of curated area JSON documents.
    pub areas_dir: PathBuf,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_max_age_secs() -> u64 {
    DEFAULT_MAX_AGE_SECS
}

fn default_description_language() -> String {
    DEFAULT_DESCRIPTION_LANGUAGE.to_string()
}

#[derive(TypedBuilder, Debug)]
pub struct Settings {
    pub feed_url: Url,
    pub timeout_ms: u64,
    pub retries: u32,
    pub max_age: Duration,
    pub description_language: String,
    pub trusted_image_hosts: Vec<String>,
    pub areas_dir: PathBuf,
}

impl IntermediateSettings {
    pub fn finalize(self) -> Result<Settings, SettingsError> {
        let feed_url = Url::parse(&self.feed_url).map_err(|source| {
            SettingsError::InvalidFeedUrl {
                url: self.feed_url.clone(),
                source,
            }
        })?;
        Ok(Settings {
            feed_url,
            timeout_ms: self.timeout_ms,
            retries: self.retries,
            max_age: Duration::from_secs(self.max_age_secs),
            description_language: self.description_language,
            trusted_image_hosts: self.trusted_image_hosts,
            areas_dir: self.areas_dir,
        })
    }
}

/// # Errors
///
/// - the config loader fails to build
/// - settings failed to load and deserialize into intermediate settings
/// - the intermediate settings fail to finalize into the final settings
pub fn load(config_file: &str) -> Result<Settings, SettingsError> {
    let settings_loader = Config::builder()
        .add_source(config::File::with_name(config_file))
        .add_source(config::Environment::with_prefix("COSTA_FEED"))
        .build()?;

    let intermediate_settings = settings_loader.try_deserialize::<IntermediateSettings>()?;

    tracing::debug!("{intermediate_settings:#?}");

    intermediate_settings.finalize()
}
