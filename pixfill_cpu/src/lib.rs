// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate fills shapes into CPU bitmaps.
//!
//! A [`Filler`] takes a shape, a paint and optional [`DrawingOptions`]. Axis-aligned
//! rectangles painted with an opaque flat color (or with alpha blending disabled) are
//! written directly into the bitmap. Everything else is turned into a path and
//! rasterized.
//!
//! Fills can be run in several ways, all producing the same pixels:
//!
//! - [`Filler::fill`] blocks the calling thread, using the default context.
//! - [`Filler::fill_with`] blocks the calling thread, with cancellation, progress
//!   reporting and a parallelism budget taken from a [`FillConfig`].
//! - [`Filler::fill_in`] blocks the calling thread, running in an
//!   [`OperationContext`] that belongs to a larger operation.
//! - [`Filler::begin_fill`] and [`Filler::end_fill`] run the fill on a worker and
//!   wait for it later.
//! - [`Filler::fill_async`] runs the fill on a worker and returns a future.
//!
//! ```
//! use pixfill_cpu::{Bitmap, Filler};
//! use pixfill_cpu::color::palette::css::WHITE;
//! use pixfill_cpu::geometry::IntRect;
//!
//! let bitmap = Bitmap::new(16, 16);
//! Filler::new()
//!     .fill_rectangle(&bitmap, WHITE, IntRect::new(2, 2, 4, 4), None)
//!     .unwrap();
//! assert_eq!(bitmap.pixel(3, 3).a, 255);
//! ```
//!
//! [`DrawingOptions`]: pixfill_common::options::DrawingOptions
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![forbid(unsafe_code)]
#![expect(
    clippy::cast_possible_truncation,
    reason = "Row indices and sample positions are bounded by the bitmap size."
)]

pub mod context;
pub mod execute;
mod fill;
pub mod raster;
pub mod writer;

pub use context::{
    CancelToken, DrawingOperation, FillConfig, OperationContext, Parallelism, ProgressSink,
};
pub use execute::{AsyncHandle, FillFuture};
pub use fill::{FillHandle, Filler};
pub use pixfill_common::{color, error, geometry, kurbo, options, paint, path, peniko, shape};
pub use pixfill_common::pixmap::Bitmap;
