// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing a flat color directly into a rectangle of pixels.

use crate::context::{DrawingOperation, OperationContext};
use core::fmt::Debug;
use pixfill_common::error::Result;
use pixfill_common::geometry::IntRect;
use pixfill_common::paint::premultiplied;
use pixfill_common::peniko::Color;
use pixfill_common::pixmap::{Bitmap, pack};
use std::sync::atomic::Ordering;

/// Writes a color into an axis-aligned rectangle of a bitmap, replacing what was there.
pub trait PixelWriter: Debug + Send + Sync {
    /// Write `color` into the part of `rect` that lies inside `bitmap`.
    ///
    /// Returns `Ok(false)` if the operation was canceled.
    fn write(
        &self,
        ctx: &OperationContext,
        bitmap: &Bitmap,
        rect: IntRect,
        color: Color,
    ) -> Result<bool>;
}

/// The built-in [`PixelWriter`], which fills rows in parallel.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectWriter;

impl PixelWriter for DirectWriter {
    fn write(
        &self,
        ctx: &OperationContext,
        bitmap: &Bitmap,
        rect: IntRect,
        color: Color,
    ) -> Result<bool> {
        let Some(bounds) = rect.clip_to(bitmap.width(), bitmap.height()) else {
            return Ok(true);
        };

        let packed = pack(premultiplied(color));
        let columns = usize::from(bounds.x0)..usize::from(bounds.x1);
        let rows = usize::from(bounds.y0)..usize::from(bounds.y1);

        Ok(ctx.for_each_row(DrawingOperation::WritingPixels, rows, |y| {
            for pixel in &bitmap.row(y as u16)[columns.clone()] {
                pixel.store(packed, Ordering::Relaxed);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::{DirectWriter, PixelWriter};
    use crate::context::{CancelToken, FillConfig, OperationContext};
    use pixfill_common::geometry::IntRect;
    use pixfill_common::peniko::Color;
    use pixfill_common::peniko::color::PremulRgba8;
    use pixfill_common::peniko::color::palette::css::WHITE;
    use pixfill_common::pixmap::Bitmap;

    const TRANSPARENT: PremulRgba8 = PremulRgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    #[test]
    fn writes_the_clipped_rectangle() {
        let bitmap = Bitmap::new(4, 4);
        let ctx = OperationContext::default_context();

        assert!(DirectWriter.write(ctx, &bitmap, IntRect::new(-1, 2, 3, 5), WHITE).unwrap());

        for y in 0..4 {
            for x in 0..4 {
                let expected = if x < 2 && y >= 2 {
                    WHITE.premultiply().to_rgba8()
                } else {
                    TRANSPARENT
                };
                assert_eq!(bitmap.pixel(x, y), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn replaces_translucent_pixels() {
        let bitmap = Bitmap::new(2, 2);
        bitmap.clear(WHITE.premultiply().to_rgba8());
        let color = Color::from_rgba8(255, 0, 0, 128);

        DirectWriter
            .write(
                OperationContext::single_threaded(),
                &bitmap,
                IntRect::new(0, 0, 2, 2),
                color,
            )
            .unwrap();

        assert_eq!(bitmap.pixel(1, 1), color.premultiply().to_rgba8());
    }

    #[test]
    fn empty_rectangle_completes() {
        let bitmap = Bitmap::new(2, 2);
        let ctx = OperationContext::default_context();
        assert!(DirectWriter.write(ctx, &bitmap, IntRect::new(5, 5, 2, 2), WHITE).unwrap());
        assert!(DirectWriter.write(ctx, &bitmap, IntRect::new(0, 0, 0, 2), WHITE).unwrap());
        assert!(bitmap.snapshot().iter().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn canceled_write_leaves_the_bitmap() {
        let token = CancelToken::new();
        token.cancel();
        let ctx = OperationContext::from_config(&FillConfig::new().with_cancel_token(token));
        let bitmap = Bitmap::new(2, 2);

        assert!(!DirectWriter.write(&ctx, &bitmap, IntRect::new(0, 0, 2, 2), WHITE).unwrap());
        assert!(bitmap.snapshot().iter().all(|p| *p == TRANSPARENT));
    }
}
