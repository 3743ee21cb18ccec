// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A container of figures to fill, with an opt-in cache of its rasterized coverage.

use crate::flatten::TOLERANCE;
use crate::kurbo::{
    self, Affine, BezPath, Ellipse, PathEl, Point, Rect, RoundedRect, RoundedRectRadii, Shape,
    Vec2,
};
use crate::mask::{CoverageMask, MaskKey};
use crate::options::DrawingOptions;
use log::debug;
use std::borrow::Cow;
use std::sync::{Arc, Mutex, PoisonError};

/// An ordered sequence of figures.
///
/// A path can keep the coverage mask it was last rasterized to, so filling the same
/// path repeatedly with the same settings skips rasterization. This is only done
/// when [`prefer_caching`](Self::prefer_caching) is set; paths built for a single
/// fill are created with caching disabled. Modifying the path discards the cache,
/// and clones start with an empty cache.
#[derive(Debug)]
pub struct Path {
    path: BezPath,
    prefer_caching: bool,
    cached: Mutex<Option<(MaskKey, Arc<CoverageMask>)>>,
}

impl Path {
    /// Create an empty path.
    pub fn new(prefer_caching: bool) -> Self {
        Self {
            path: BezPath::new(),
            prefer_caching,
            cached: Mutex::new(None),
        }
    }

    /// Create a path from existing figures.
    pub fn from_bez_path(path: BezPath, prefer_caching: bool) -> Self {
        Self {
            path,
            prefer_caching,
            cached: Mutex::new(None),
        }
    }

    /// Whether the rasterized coverage of this path should be kept for reuse.
    pub fn prefer_caching(&self) -> bool {
        self.prefer_caching
    }

    /// Set whether the rasterized coverage of this path should be kept for reuse.
    pub fn set_prefer_caching(&mut self, prefer_caching: bool) {
        self.prefer_caching = prefer_caching;
        if !prefer_caching {
            self.invalidate();
        }
    }

    /// The figures of the path.
    pub fn bez_path(&self) -> &BezPath {
        &self.path
    }

    /// The path elements.
    pub fn elements(&self) -> &[PathEl] {
        self.path.elements()
    }

    /// Whether the path has no figures.
    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    /// The number of figures in the path.
    pub fn figure_count(&self) -> usize {
        self.path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count()
    }

    /// The bounding box of the path, or `None` if it is empty.
    pub fn bounds(&self) -> Option<Rect> {
        (!self.is_empty()).then(|| self.path.bounding_box())
    }

    /// Append a rectangle as a new figure.
    pub fn add_rectangle(&mut self, rect: Rect) -> &mut Self {
        self.append_shape(&rect)
    }

    /// Append the ellipse inscribed in `bounds` as a new figure.
    pub fn add_ellipse(&mut self, bounds: Rect) -> &mut Self {
        self.append_shape(&Ellipse::from_rect(bounds))
    }

    /// Append a pie slice of the ellipse inscribed in `bounds` as a new figure.
    ///
    /// Angles are in degrees, measured clockwise from the positive x axis.
    pub fn add_pie(&mut self, bounds: Rect, start_angle: f64, sweep_angle: f64) -> &mut Self {
        let center = bounds.center();
        let radii = Vec2::new(bounds.width() / 2.0, bounds.height() / 2.0);
        let start = start_angle.to_radians();
        let arc = kurbo::Arc {
            center,
            radii,
            start_angle: start,
            sweep_angle: sweep_angle.to_radians(),
            x_rotation: 0.0,
        };
        let first = center + Vec2::new(radii.x * start.cos(), radii.y * start.sin());

        self.invalidate();
        self.path.move_to(center);
        self.path.line_to(first);
        for el in arc.append_iter(TOLERANCE) {
            self.path.push(el);
        }
        self.path.close_path();
        self
    }

    /// Append a closed polygon as a new figure. Nothing is added for an empty slice.
    pub fn add_polygon(&mut self, points: &[Point]) -> &mut Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };

        self.invalidate();
        self.path.move_to(*first);
        for p in rest {
            self.path.line_to(*p);
        }
        self.path.close_path();
        self
    }

    /// Append a rectangle with rounded corners as a new figure.
    pub fn add_rounded_rectangle(
        &mut self,
        bounds: Rect,
        radii: impl Into<RoundedRectRadii>,
    ) -> &mut Self {
        self.append_shape(&RoundedRect::from_rect(bounds, radii))
    }

    /// Append all figures of `other`.
    pub fn add_path(&mut self, other: &Self) -> &mut Self {
        self.invalidate();
        self.path.extend(other.path.elements().iter().copied());
        self
    }

    /// Close the last figure, if it is open.
    pub fn close_figure(&mut self) -> &mut Self {
        if !matches!(
            self.path.elements().last(),
            None | Some(PathEl::ClosePath)
        ) {
            self.invalidate();
            self.path.close_path();
        }
        self
    }

    /// Return a copy of the path with `transform` applied to all figures.
    ///
    /// The copy keeps the caching preference of `self`.
    pub fn transformed(&self, transform: Affine) -> Self {
        Self::from_bez_path(transform * self.path.clone(), self.prefer_caching)
    }

    /// Return the cached coverage mask, if one was stored for `key`.
    pub fn cached_mask(&self, key: &MaskKey) -> Option<Arc<CoverageMask>> {
        if !self.prefer_caching {
            return None;
        }

        let cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        match cached.as_ref() {
            Some((k, mask)) if k == key => {
                debug!("reusing cached coverage mask");
                Some(mask.clone())
            }
            _ => None,
        }
    }

    /// Store the coverage mask for `key`, replacing any previous one.
    ///
    /// Does nothing unless the path prefers caching.
    pub fn store_mask(&self, key: MaskKey, mask: Arc<CoverageMask>) {
        if !self.prefer_caching {
            return;
        }

        debug!("caching coverage mask");
        *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = Some((key, mask));
    }

    fn append_shape(&mut self, shape: &impl Shape) -> &mut Self {
        self.invalidate();
        self.path.extend(shape.path_elements(TOLERANCE));
        self
    }

    fn invalidate(&mut self) {
        *self
            .cached
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Clone for Path {
    fn clone(&self) -> Self {
        Self::from_bez_path(self.path.clone(), self.prefer_caching)
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Prepare `path` for filling with `options`.
///
/// With a non-identity transformation, returns a transformed copy whose caching is
/// disabled, since a transformation typically changes on every call. Otherwise
/// returns `path` itself, keeping its caching preference.
pub fn prepare_for_fill<'a>(path: &'a Path, options: &DrawingOptions) -> Cow<'a, Path> {
    if options.is_identity_transform() {
        return Cow::Borrowed(path);
    }

    let mut transformed = path.transformed(options.transformation());
    transformed.set_prefer_caching(false);
    Cow::Owned(transformed)
}
