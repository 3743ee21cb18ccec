// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utilities shared across different tests.

use pixfill_common::geometry::IntRect;
use pixfill_common::options::DrawingOptions;
use pixfill_common::paint::{Brush, Paint};
use pixfill_common::path::Path;
use pixfill_common::peniko::Color;
use pixfill_common::pixmap::Bitmap;
use pixfill_common::shape::FillShape;
use pixfill_cpu::error::Result;
use pixfill_cpu::raster::{Rasterizer, ScanlineRasterizer};
use pixfill_cpu::writer::{DirectWriter, PixelWriter};
use pixfill_cpu::{FillConfig, Filler, OperationContext};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// The ways of running a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryPoint {
    Blocking,
    BlockingWithConfig,
    InContext,
    BeginEnd,
    Future,
}

impl EntryPoint {
    pub(crate) const ALL: [Self; 5] = [
        Self::Blocking,
        Self::BlockingWithConfig,
        Self::InContext,
        Self::BeginEnd,
        Self::Future,
    ];
}

/// Run a fill through `entry`, with `config` for the entry points that take one.
pub(crate) fn fill_via(
    entry: EntryPoint,
    filler: &Filler,
    config: &FillConfig,
    bitmap: &Bitmap,
    paint: impl Into<Paint>,
    shape: impl Into<FillShape>,
    options: Option<&DrawingOptions>,
) -> Result<bool> {
    let shape = shape.into();
    match entry {
        EntryPoint::Blocking => filler.fill(bitmap, paint, shape, options).map(|()| true),
        EntryPoint::BlockingWithConfig => filler.fill_with(config, bitmap, paint, shape, options),
        EntryPoint::InContext => {
            let ctx = OperationContext::from_config(config);
            filler.fill_in(&ctx, bitmap, paint, shape, options)
        }
        EntryPoint::BeginEnd => {
            let kind = shape.kind();
            let handle = filler.begin_fill(config, bitmap, paint, shape, options)?;
            filler.end_fill(handle, kind)
        }
        EntryPoint::Future => {
            let future = filler.fill_async(config, bitmap, paint, shape, options)?;
            pollster::block_on(future)
        }
    }
}

/// What a counting rasterizer saw for one call.
#[derive(Debug, Clone)]
pub(crate) struct RasterCall {
    pub(crate) figures: usize,
    pub(crate) prefer_caching: bool,
    pub(crate) brush: Brush,
}

/// A [`PixelWriter`] that counts its calls and forwards them to [`DirectWriter`].
#[derive(Debug, Default)]
pub(crate) struct CountingWriter {
    pub(crate) calls: AtomicUsize,
    pub(crate) rects: Mutex<Vec<(IntRect, Color)>>,
}

impl PixelWriter for CountingWriter {
    fn write(
        &self,
        ctx: &OperationContext,
        bitmap: &Bitmap,
        rect: IntRect,
        color: Color,
    ) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rects.lock().unwrap().push((rect, color));
        DirectWriter.write(ctx, bitmap, rect, color)
    }
}

/// A [`Rasterizer`] that records its calls and forwards them to [`ScanlineRasterizer`].
#[derive(Debug, Default)]
pub(crate) struct CountingRasterizer {
    pub(crate) calls: Mutex<Vec<RasterCall>>,
}

impl CountingRasterizer {
    pub(crate) fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Rasterizer for CountingRasterizer {
    fn fill(
        &self,
        ctx: &OperationContext,
        bitmap: &Bitmap,
        path: &Path,
        brush: &Brush,
        options: &DrawingOptions,
    ) -> Result<bool> {
        self.calls.lock().unwrap().push(RasterCall {
            figures: path.figure_count(),
            prefer_caching: path.prefer_caching(),
            brush: brush.clone(),
        });
        ScanlineRasterizer.fill(ctx, bitmap, path, brush, options)
    }
}

/// A filler wired to counting collaborators, which are returned alongside it.
pub(crate) fn counting_filler() -> (Filler, Arc<CountingWriter>, Arc<CountingRasterizer>) {
    let writer = Arc::new(CountingWriter::default());
    let rasterizer = Arc::new(CountingRasterizer::default());
    let filler = Filler::with_collaborators(writer.clone(), rasterizer.clone());
    (filler, writer, rasterizer)
}
