// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles.

use crate::kurbo::Rect;

/// An axis-aligned rectangle with integer coordinates.
///
/// A rectangle with a non-positive width or height covers no pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntRect {
    /// The x coordinate of the left edge.
    pub x: i32,
    /// The y coordinate of the top edge.
    pub y: i32,
    /// The width in pixels.
    pub width: i32,
    /// The height in pixels.
    pub height: i32,
}

impl IntRect {
    /// Create a new rectangle from its origin and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Truncate a floating rectangle towards zero.
    ///
    /// The origin and the size are truncated independently. Returns `None` if any of
    /// them is not finite or does not fit into an `i32`.
    pub fn truncate(rect: Rect) -> Option<Self> {
        Some(Self::new(
            truncate_coord(rect.x0)?,
            truncate_coord(rect.y0)?,
            truncate_coord(rect.x1 - rect.x0)?,
            truncate_coord(rect.y1 - rect.y0)?,
        ))
    }

    /// Return the integer rectangle equal to `rect`, if `rect` has no fractional
    /// component on any edge.
    pub fn from_integral(rect: Rect) -> Option<Self> {
        let truncated = Self::truncate(rect)?;
        (truncated.to_rect() == rect).then_some(truncated)
    }

    /// Convert to a floating rectangle.
    pub fn to_rect(self) -> Rect {
        let x0 = f64::from(self.x);
        let y0 = f64::from(self.y);
        Rect::new(
            x0,
            y0,
            x0 + f64::from(self.width),
            y0 + f64::from(self.height),
        )
    }

    /// Clip the rectangle to a `width` × `height` pixel grid anchored at the origin.
    ///
    /// Returns the pixel column and row ranges, or `None` if nothing is left.
    pub fn clip_to(&self, width: u16, height: u16) -> Option<PixelBounds> {
        if self.is_empty() {
            return None;
        }

        let clamp = |v: i64, max: u16| v.clamp(0, i64::from(max)) as u16;
        let x0 = clamp(i64::from(self.x), width);
        let y0 = clamp(i64::from(self.y), height);
        let x1 = clamp(i64::from(self.x) + i64::from(self.width), width);
        let y1 = clamp(i64::from(self.y) + i64::from(self.height), height);

        (x0 < x1 && y0 < y1).then_some(PixelBounds { x0, y0, x1, y1 })
    }
}

impl From<IntRect> for Rect {
    fn from(value: IntRect) -> Self {
        value.to_rect()
    }
}

/// A non-empty, half-open range of pixels inside a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelBounds {
    /// The first column.
    pub x0: u16,
    /// The first row.
    pub y0: u16,
    /// One past the last column.
    pub x1: u16,
    /// One past the last row.
    pub y1: u16,
}

impl PixelBounds {
    /// The number of columns.
    pub fn width(&self) -> u16 {
        self.x1 - self.x0
    }

    /// The number of rows.
    pub fn height(&self) -> u16 {
        self.y1 - self.y0
    }
}

fn truncate_coord(v: f64) -> Option<i32> {
    let t = v.trunc();
    (t.is_finite() && t >= f64::from(i32::MIN) && t <= f64::from(i32::MAX)).then_some(t as i32)
}
