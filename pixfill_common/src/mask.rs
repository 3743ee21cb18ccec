// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coverage masks produced by rasterizing a path.

use crate::geometry::PixelBounds;
use crate::peniko::Fill;

/// The parameters a coverage mask depends on, besides the path itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskKey {
    /// Whether the mask was computed with anti-aliasing.
    pub antialiasing: bool,
    /// The fill rule used.
    pub fill_rule: Fill,
    /// The width of the bitmap the mask was clipped to.
    pub width: u16,
    /// The height of the bitmap the mask was clipped to.
    pub height: u16,
}

/// Per-pixel coverage of a path, clipped to a bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMask {
    bounds: Option<PixelBounds>,
    coverage: Vec<u8>,
}

impl CoverageMask {
    /// A mask covering nothing.
    pub fn empty() -> Self {
        Self {
            bounds: None,
            coverage: vec![],
        }
    }

    /// Create a mask from coverage values in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `coverage` does not hold exactly one value per pixel of `bounds`.
    pub fn new(bounds: PixelBounds, coverage: Vec<u8>) -> Self {
        assert_eq!(
            coverage.len(),
            usize::from(bounds.width()) * usize::from(bounds.height()),
            "Expected one coverage value per pixel"
        );
        Self {
            bounds: Some(bounds),
            coverage,
        }
    }

    /// The pixels the mask spans, or `None` for an empty mask.
    pub fn bounds(&self) -> Option<PixelBounds> {
        self.bounds
    }

    /// The coverage values of row `y`, given in bitmap coordinates.
    ///
    /// Returns an empty slice for rows outside the mask.
    pub fn row(&self, y: u16) -> &[u8] {
        match self.bounds {
            Some(b) if (b.y0..b.y1).contains(&y) => {
                let width = usize::from(b.width());
                let start = usize::from(y - b.y0) * width;
                &self.coverage[start..start + width]
            }
            _ => &[],
        }
    }

    /// Whether no pixel is covered.
    pub fn is_empty(&self) -> bool {
        self.coverage.iter().all(|c| *c == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::CoverageMask;
    use crate::geometry::PixelBounds;

    #[test]
    fn rows_are_addressed_in_bitmap_coordinates() {
        let bounds = PixelBounds {
            x0: 2,
            y0: 3,
            x1: 4,
            y1: 5,
        };
        let mask = CoverageMask::new(bounds, vec![1, 2, 3, 4]);

        assert_eq!(mask.row(3), &[1, 2]);
        assert_eq!(mask.row(4), &[3, 4]);
        assert!(mask.row(5).is_empty());
        assert!(mask.row(0).is_empty());
    }

    #[test]
    fn empty_mask() {
        assert!(CoverageMask::empty().is_empty());
        assert!(CoverageMask::empty().bounds().is_none());
    }
}
