// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Types for paints.

use crate::kurbo::Point;
use crate::peniko::Color;
use crate::peniko::color::PremulRgba8;

/// Return whether `color` is fully opaque at 8-bit precision.
pub fn is_opaque(color: Color) -> bool {
    color.to_rgba8().a == u8::MAX
}

/// Convert `color` to the premultiplied 8-bit representation stored in bitmaps.
pub fn premultiplied(color: Color) -> PremulRgba8 {
    color.premultiply().to_rgba8()
}

/// A brush painting a single flat color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidBrush {
    color: Color,
    has_alpha: bool,
}

impl SolidBrush {
    /// Create a new solid brush.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            has_alpha: !is_opaque(color),
        }
    }

    /// The color of the brush.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Whether the brush color is translucent.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }
}

/// A brush interpolating linearly between two colors along a line.
///
/// Points before `start` get `start_color`, points after `end` get `end_color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradientBrush {
    start: Point,
    end: Point,
    start_color: Color,
    end_color: Color,
}

impl LinearGradientBrush {
    /// Create a new linear gradient brush.
    pub fn new(
        start: impl Into<Point>,
        end: impl Into<Point>,
        start_color: Color,
        end_color: Color,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            start_color,
            end_color,
        }
    }

    /// The color at `point`.
    pub fn color_at(&self, point: Point) -> Color {
        let axis = self.end - self.start;
        let len2 = axis.hypot2();
        let t = if len2 == 0.0 {
            0.0
        } else {
            ((point - self.start).dot(axis) / len2).clamp(0.0, 1.0) as f32
        };

        let a = self.start_color.components;
        let b = self.end_color.components;
        Color::new([
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
            a[3] + (b[3] - a[3]) * t,
        ])
    }

    /// Whether any part of the gradient is translucent.
    pub fn has_alpha(&self) -> bool {
        !is_opaque(self.start_color) || !is_opaque(self.end_color)
    }
}

/// A paint strategy for filling shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    /// A single flat color.
    Solid(SolidBrush),
    /// A two-color linear gradient.
    LinearGradient(LinearGradientBrush),
}

impl Brush {
    /// Create a solid brush.
    pub fn solid(color: Color) -> Self {
        Self::Solid(SolidBrush::new(color))
    }

    /// The color painted at `point`.
    pub fn color_at(&self, point: Point) -> Color {
        match self {
            Self::Solid(s) => s.color(),
            Self::LinearGradient(g) => g.color_at(point),
        }
    }

    /// Whether the brush may paint translucent colors.
    pub fn has_alpha(&self) -> bool {
        match self {
            Self::Solid(s) => s.has_alpha(),
            Self::LinearGradient(g) => g.has_alpha(),
        }
    }
}

impl From<SolidBrush> for Brush {
    fn from(value: SolidBrush) -> Self {
        Self::Solid(value)
    }
}

impl From<LinearGradientBrush> for Brush {
    fn from(value: LinearGradientBrush) -> Self {
        Self::LinearGradient(value)
    }
}

/// What a shape is filled with: either a plain color or a brush.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// A plain color.
    Color(Color),
    /// A brush.
    Brush(Brush),
}

impl Paint {
    /// The flat color of this paint, if it has one.
    pub fn solid_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            Self::Brush(Brush::Solid(s)) => Some(s.color()),
            Self::Brush(_) => None,
        }
    }

    /// Convert to a brush, wrapping plain colors into a [`SolidBrush`].
    pub fn to_brush(&self) -> Brush {
        match self {
            Self::Color(c) => Brush::solid(*c),
            Self::Brush(b) => b.clone(),
        }
    }
}

impl From<Color> for Paint {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<Brush> for Paint {
    fn from(value: Brush) -> Self {
        Self::Brush(value)
    }
}

impl From<SolidBrush> for Paint {
    fn from(value: SolidBrush) -> Self {
        Self::Brush(value.into())
    }
}

impl From<LinearGradientBrush> for Paint {
    fn from(value: LinearGradientBrush) -> Self {
        Self::Brush(value.into())
    }
}
