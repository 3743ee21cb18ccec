// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate only holds the integration tests of `pixfill_cpu`, see `tests/mod.rs`.
