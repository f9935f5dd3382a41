// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Retrieval of the vendor feed document over HTTP.
//!
//! The parser and builder below it are pure;
//! everything network-shaped lives here,
//! behind the [`FeedSource`] seam so the cache
//! can be exercised without a network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use thiserror::Error;

pub mod builder;
pub mod cache;
pub mod parser;

pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT: u64 = 10_000;

/// Everything that can go wrong between "refresh wanted"
/// and "fresh snapshot installed".
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Network/Internet download failed: '{0}'")]
    Download(#[from] reqwest::Error),
    #[error("Network/Internet download failed: '{0}'")]
    DownloadMiddleware(#[from] reqwest_middleware::Error),
    #[error("Feed endpoint answered with HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("Feed document contains no property blocks")]
    EmptyDocument,
    #[error("The feed is unreachable and no snapshot has ever succeeded")]
    Unavailable,
}

impl FeedError {
    /// Whether serving the last-known-good snapshot (marked stale)
    /// is an acceptable recovery for this error.
    /// Only [`Self::Unavailable`] is a hard, caller-facing failure,
    /// and only because there is nothing left to serve.
    #[must_use]
    pub const fn recoverable(&self) -> bool {
        match self {
            Self::Download(_)
            | Self::DownloadMiddleware(_)
            | Self::HttpStatus(_)
            | Self::EmptyDocument => true,
            Self::Unavailable => false,
        }
    }
}

/// Source of the raw feed document.
///
/// The production implementation is [`HttpFeedSource`];
/// tests substitute an in-memory one.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FeedError>;
}

/// Fetches the feed document from a fixed URL with
/// bounded timeout and exponential-backoff retries.
pub struct HttpFeedSource {
    url: String,
    downloader: ClientWithMiddleware,
}

impl HttpFeedSource {
    #[must_use]
    pub fn new(url: impl Into<String>, retries: u32, timeout_ms: u64) -> Self {
        Self {
            url: url.into(),
            downloader: create_downloader(retries, timeout_ms),
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<String, FeedError> {
        tracing::debug!("Fetching feed document from '{}' ...", self.url);
        let response = self.downloader.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus(status));
        }
        // The feed declares UTF-8; decode lossily rather than
        // failing a whole pass over one mangled byte.
        let body = response.bytes().await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Creates a new [`reqwest::Client`] with the supplied retry and timeout settings.
fn create_downloader(retries: u32, timeout_ms: u64) -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(retries);
    let client = Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .unwrap();
    ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}
