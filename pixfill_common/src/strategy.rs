// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choosing between writing pixels directly and the general vector pipeline.
//!
//! Every entry point consults [`select_strategy`] and nothing else to make this choice,
//! so a fill produces the same pixels regardless of how it was invoked.

use crate::geometry::IntRect;
use crate::options::DrawingOptions;
use crate::paint::{Brush, Paint, is_opaque};
use crate::shape::FillShape;

/// How a fill is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStrategy {
    /// Write the paint's color into exactly this rectangle, without building a path.
    DirectWrite(IntRect),
    /// Build a path and rasterize it.
    GeneralPath,
}

/// Select the strategy for filling `shape` with `paint`.
///
/// Only axis-aligned rectangles filled with a flat color can be written directly.
/// This requires options that neither anti-alias, transform, quantize nor dither
/// (passing `None` qualifies), and either an opaque color or disabled alpha blending.
/// A floating-point rectangle additionally needs integral edges.
pub fn select_strategy(
    paint: &Paint,
    options: Option<&DrawingOptions>,
    shape: &FillShape,
) -> FillStrategy {
    let rect = match shape {
        FillShape::Rectangle(rect) => *rect,
        FillShape::RectangleF(rect) => match IntRect::from_integral(*rect) {
            Some(rect) => rect,
            None => return FillStrategy::GeneralPath,
        },
        _ => return FillStrategy::GeneralPath,
    };

    let opaque = match paint {
        Paint::Color(color) => is_opaque(*color),
        Paint::Brush(Brush::Solid(brush)) => !brush.has_alpha(),
        Paint::Brush(_) => return FillStrategy::GeneralPath,
    };

    let eligible = match options {
        None => opaque,
        Some(options) => {
            let benign = !options.antialiasing()
                && options.is_identity_transform()
                && options.quantizer().is_none()
                && options.ditherer().is_none();
            benign && (opaque || !options.alpha_blending())
        }
    };

    if eligible {
        FillStrategy::DirectWrite(rect)
    } else {
        FillStrategy::GeneralPath
    }
}
