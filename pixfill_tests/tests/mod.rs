// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration tests for `pixfill_cpu`.
//! - The `util` module contains collaborators that count their calls and a helper that
//!   runs a fill through any of the entry points.
//! - Tests are grouped by topic: `dispatch` for the choice between direct writes and
//!   rasterization, `entry_points` for agreement between the ways of running a fill,
//!   `cancel` for cancellation and progress, and `errors` for validation, error
//!   propagation and handle misuse.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod util;
