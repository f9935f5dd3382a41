// SPDX-FileCopyrightText: 2026 costa-feed developers
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Pure read-side operations over a catalog snapshot:
//! filtering, sorting, facet extraction and the featured slate.
//! Nothing in here mutates or caches anything; every function is
//! a projection of the `Vec<Property>` it is handed.

pub mod featured;
pub mod query;
