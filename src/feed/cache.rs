// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The one piece of shared mutable state in the engine:
//! a cached catalog snapshot plus its fetch timestamp,
//! refreshed single-flight when it ages out.
//!
//! Every refresh produces a fresh immutable snapshot that
//! atomically replaces the previous one; nothing downstream
//! ever mutates it. Two requests served from two different
//! snapshots around a refresh is an accepted inconsistency
//! window.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::model::property::Property;

use super::{
    builder,
    parser::{self, ParseOptions},
    FeedError, FeedSource,
};

/// An immutable view of one ingestion pass.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub properties: Arc<Vec<Property>>,
    /// Feed-level developer name of this pass.
    pub developer: String,
    pub fetched_at: DateTime<Utc>,
    /// Malformed blocks dropped during this pass.
    pub skipped: usize,
    /// Set when this snapshot outlived its window because the
    /// refresh behind it failed. Never a user-facing error.
    pub stale: bool,
}

#[derive(Debug)]
struct Stored {
    properties: Arc<Vec<Property>>,
    developer: String,
    fetched_at: DateTime<Utc>,
    skipped: usize,
}

impl Stored {
    fn view(&self, stale: bool) -> Snapshot {
        Snapshot {
            properties: Arc::clone(&self.properties),
            developer: self.developer.clone(),
            fetched_at: self.fetched_at,
            skipped: self.skipped,
            stale,
        }
    }
}

/// Snapshot cache over a [`FeedSource`].
///
/// Concurrency contract: concurrent callers observing an expired
/// snapshot agree on exactly one in-flight fetch (the refresh
/// gate); all of them either wait for it or are served the
/// previous snapshot, and a refresh runs to completion regardless
/// of any single caller's lifetime.
pub struct Catalog<S: FeedSource> {
    source: S,
    options: ParseOptions,
    max_age: Duration,
    snapshot: RwLock<Option<Stored>>,
    refresh_gate: Mutex<()>,
}

impl<S: FeedSource> Catalog<S> {
    #[must_use]
    pub fn new(source: S, options: ParseOptions, max_age: Duration) -> Self {
        Self {
            source,
            options,
            max_age,
            snapshot: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Returns the current catalog snapshot,
    /// refreshing it first when it has aged out.
    ///
    /// # Errors
    ///
    /// [`FeedError::Unavailable`] only when the refresh failed
    /// *and* no snapshot has ever succeeded. Any later failure
    /// degrades to the last-known-good snapshot, marked stale.
    pub async fn get(&self) -> Result<Snapshot, FeedError> {
        if let Some(fresh) = self.fresh_view().await {
            return Ok(fresh);
        }

        let _refresh = self.refresh_gate.lock().await;
        // Another caller may have finished the refresh while
        // we waited on the gate; re-check before fetching.
        if let Some(fresh) = self.fresh_view().await {
            return Ok(fresh);
        }

        match self.refresh().await {
            Ok(stored) => {
                let view = stored.view(false);
                *self.snapshot.write().await = Some(stored);
                Ok(view)
            }
            Err(err) if err.recoverable() => {
                let guard = self.snapshot.read().await;
                guard.as_ref().map_or(Err(FeedError::Unavailable), |prev| {
                    tracing::warn!("Feed refresh failed ({err}); serving stale snapshot");
                    Ok(prev.view(true))
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn fresh_view(&self) -> Option<Snapshot> {
        let guard = self.snapshot.read().await;
        let stored = guard.as_ref()?;
        let age = Utc::now()
            .signed_duration_since(stored.fetched_at)
            .to_std()
            .ok()?;
        (age < self.max_age).then(|| stored.view(false))
    }

    /// One full fetch-and-rebuild pass.
    /// The snapshot is only replaced on full success.
    async fn refresh(&self) -> Result<Stored, FeedError> {
        let document = self.source.fetch().await?;
        let report = parser::parse(&document, &self.options)?;
        let properties: Vec<Property> = report
            .records
            .iter()
            .map(|record| builder::build(record, &report.developer))
            .collect();
        tracing::info!(
            "Installed new snapshot: {} properties, developer '{}'",
            properties.len(),
            report.developer,
        );
        Ok(Stored {
            properties: Arc::new(properties),
            developer: report.developer,
            fetched_at: Utc::now(),
            skipped: report.skipped,
        })
    }
}
