// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rasterizing paths into a bitmap.
//!
//! The scanline rasterizer works in two passes. The first computes a coverage mask of
//! the path, clipped to the bitmap. Without anti-aliasing each pixel is sampled once at
//! its center, with anti-aliasing on a regular 4x4 grid. The second pass paints every
//! covered pixel with the brush. Both passes process rows in parallel.

use crate::context::{DrawingOperation, OperationContext};
use core::fmt::Debug;
use log::trace;
use pixfill_common::error::{FillError, Result};
use pixfill_common::flatten::{self, Line};
use pixfill_common::geometry::PixelBounds;
use pixfill_common::kurbo::Point;
use pixfill_common::mask::{CoverageMask, MaskKey};
use pixfill_common::options::DrawingOptions;
use pixfill_common::paint::{Brush, premultiplied};
use pixfill_common::path::Path;
use pixfill_common::peniko::Fill;
use pixfill_common::peniko::color::PremulRgba8;
use pixfill_common::pixmap::{Bitmap, pack, unpack};
use std::sync::Arc;
use std::sync::atomic::Ordering;

/// Fills paths with a brush.
pub trait Rasterizer: Debug + Send + Sync {
    /// Fill `path` into `bitmap` with `brush`.
    ///
    /// The path is expected to be transformed already. Returns `Ok(false)` if the
    /// operation was canceled.
    fn fill(
        &self,
        ctx: &OperationContext,
        bitmap: &Bitmap,
        path: &Path,
        brush: &Brush,
        options: &DrawingOptions,
    ) -> Result<bool>;
}

/// The built-in [`Rasterizer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineRasterizer;

impl Rasterizer for ScanlineRasterizer {
    fn fill(
        &self,
        ctx: &OperationContext,
        bitmap: &Bitmap,
        path: &Path,
        brush: &Brush,
        options: &DrawingOptions,
    ) -> Result<bool> {
        let key = MaskKey {
            antialiasing: options.antialiasing(),
            fill_rule: options.fill_rule(),
            width: bitmap.width(),
            height: bitmap.height(),
        };

        let mask = match path.cached_mask(&key) {
            Some(mask) => mask,
            None => {
                let Some(mask) = coverage(ctx, path, &key)? else {
                    return Ok(false);
                };
                let mask = Arc::new(mask);
                path.store_mask(key, mask.clone());
                mask
            }
        };

        Ok(paint(ctx, bitmap, &mask, brush, options))
    }
}

/// Compute the coverage mask of `path`, or `None` if canceled.
fn coverage(ctx: &OperationContext, path: &Path, key: &MaskKey) -> Result<Option<CoverageMask>> {
    let mut lines = vec![];
    flatten::fill(path.elements().iter().copied(), &mut lines);

    let Some(bounds) = line_bounds(&lines, key.width, key.height)? else {
        return Ok(Some(CoverageMask::empty()));
    };
    trace!("rasterizing {} lines in {bounds:?}", lines.len());

    let samples: i64 = if key.antialiasing { 4 } else { 1 };
    let width = usize::from(bounds.width());
    let mut buf = vec![0_u8; width * usize::from(bounds.height())];

    let completed = ctx.for_each_chunk(
        DrawingOperation::GeneratingRegion,
        &mut buf,
        width,
        |row, out| {
            let y = f64::from(bounds.y0) + row as f64;
            coverage_row(&lines, y, key.fill_rule, samples, bounds, out);
        },
    );

    Ok(completed.then(|| CoverageMask::new(bounds, buf)))
}

/// The pixels touched by `lines`, clipped to a `width` × `height` bitmap.
fn line_bounds(lines: &[Line], width: u16, height: u16) -> Result<Option<PixelBounds>> {
    let Some(first) = lines.first() else {
        return Ok(None);
    };

    let (mut x0, mut y0, mut x1, mut y1) = (first.p0.x, first.p0.y, first.p0.x, first.p0.y);
    for p in lines.iter().flat_map(|l| [l.p0, l.p1]) {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }

    let in_range = |v: f64| v.is_finite() && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX);
    if ![x0, y0, x1, y1].into_iter().all(in_range) {
        return Err(FillError::CoordinateOverflow);
    }

    let clamp = |v: f64, max: u16| v.clamp(0.0, f64::from(max)) as u16;
    let bounds = PixelBounds {
        x0: clamp(x0.floor(), width),
        y0: clamp(y0.floor(), height),
        x1: clamp(x1.ceil(), width),
        y1: clamp(y1.ceil(), height),
    };

    Ok((bounds.x0 < bounds.x1 && bounds.y0 < bounds.y1).then_some(bounds))
}

/// Compute the coverage of the pixel row starting at `y` into `out`.
fn coverage_row(
    lines: &[Line],
    y: f64,
    fill_rule: Fill,
    samples: i64,
    bounds: PixelBounds,
    out: &mut [u8],
) {
    let mut counts = vec![0_u32; out.len()];
    let mut crossings: Vec<(f64, i32)> = vec![];

    for i in 0..samples {
        let sy = y + (i as f64 + 0.5) / samples as f64;

        crossings.clear();
        for line in lines {
            let (top, bottom, dir) = if line.p0.y < line.p1.y {
                (line.p0, line.p1, 1)
            } else {
                (line.p1, line.p0, -1)
            };
            if top.y <= sy && sy < bottom.y {
                let x = top.x + (sy - top.y) * (bottom.x - top.x) / (bottom.y - top.y);
                crossings.push((x, dir));
            }
        }
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut winding = 0;
        for (k, &(x, dir)) in crossings.iter().enumerate() {
            winding += dir;
            let inside = match fill_rule {
                Fill::NonZero => winding != 0,
                Fill::EvenOdd => winding % 2 != 0,
            };
            if !inside {
                continue;
            }
            if let Some(&(next, _)) = crossings.get(k + 1) {
                accumulate_span(&mut counts, x, next, samples, bounds);
            }
        }
    }

    let max = samples as u32 * samples as u32;
    for (out, count) in out.iter_mut().zip(counts) {
        *out = (count * 255 / max) as u8;
    }
}

/// Count the horizontal samples of one sub-scanline that fall within `[xa, xb)`.
fn accumulate_span(counts: &mut [u32], xa: f64, xb: f64, samples: i64, bounds: PixelBounds) {
    let n = samples as f64;
    let min = i64::from(bounds.x0) * samples;
    let max = i64::from(bounds.x1) * samples;
    // Sample `s` lies at `(s + 0.5) / samples`.
    let lo = ((xa * n - 0.5).ceil() as i64).max(min);
    let hi = ((xb * n - 0.5).ceil() as i64).min(max);

    for s in lo..hi {
        let pixel = s.div_euclid(samples) - i64::from(bounds.x0);
        counts[pixel as usize] += 1;
    }
}

/// Paint the pixels covered by `mask` with `brush`. Returns `false` if canceled.
fn paint(
    ctx: &OperationContext,
    bitmap: &Bitmap,
    mask: &CoverageMask,
    brush: &Brush,
    options: &DrawingOptions,
) -> bool {
    let Some(bounds) = mask.bounds() else {
        return true;
    };

    let rows = usize::from(bounds.y0)..usize::from(bounds.y1);
    ctx.for_each_row(DrawingOperation::PaintingRegion, rows, |y| {
        let y = y as u16;
        let row = bitmap.row(y);

        for (x, &cov) in (bounds.x0..bounds.x1).zip(mask.row(y)) {
            if cov == 0 {
                continue;
            }

            let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let mut color = brush.color_at(center);
            if let Some(quantizer) = options.quantizer() {
                if let Some(ditherer) = options.ditherer() {
                    color = ditherer.dither(color, x, y);
                }
                color = quantizer.quantize(color);
            }
            if cov < u8::MAX {
                color = color.multiply_alpha(f32::from(cov) / 255.0);
            }

            let src = premultiplied(color);
            let pixel = &row[usize::from(x)];
            let out = if options.alpha_blending() {
                source_over(src, unpack(pixel.load(Ordering::Relaxed)))
            } else {
                src
            };
            pixel.store(pack(out), Ordering::Relaxed);
        }
    })
}

fn source_over(src: PremulRgba8, dst: PremulRgba8) -> PremulRgba8 {
    let inv = 255 - u16::from(src.a);
    let blend = |s: u8, d: u8| s.saturating_add(div_255(u16::from(d) * inv));

    PremulRgba8 {
        r: blend(src.r, dst.r),
        g: blend(src.g, dst.g),
        b: blend(src.b, dst.b),
        a: blend(src.a, dst.a),
    }
}

/// Divide by 255, rounding to the nearest integer.
#[inline(always)]
fn div_255(val: u16) -> u8 {
    let val = val + 128;
    ((val + (val >> 8)) >> 8) as u8
}
