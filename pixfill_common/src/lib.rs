// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate includes the data structures shared by the pixfill renderers: geometry,
//! paints, drawing options, the [`Path`][crate::path::Path] container, the bitmap and
//! the fast-path selection logic.
//!
//! # Usage
//!
//! This crate should not be used on its own, and you should instead use [`pixfill_cpu`],
//! which executes fills against a [`Bitmap`][crate::pixmap::Bitmap].
//!
//! # Contents
//!
//! - [`strategy`]: the single decision function that picks between writing pixels
//!   directly and running the general vector pipeline.
//! - [`path`] and [`shape`]: building paths for primitive shapes and preparing them
//!   for filling.
//! - [`options`] and [`paint`]: what to fill with and how.
//! - [`flatten`] and [`mask`]: the intermediate representations used by rasterizers.
//!
//! [`pixfill_cpu`]: https://docs.rs/pixfill_cpu
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![expect(
    clippy::cast_possible_truncation,
    reason = "Coordinates are range-checked before being narrowed to integers."
)]

pub mod error;
pub mod flatten;
pub mod geometry;
pub mod mask;
pub mod options;
pub mod paint;
pub mod path;
pub mod pixmap;
pub mod shape;
pub mod strategy;

pub use peniko;
pub use peniko::color;
pub use peniko::kurbo;
