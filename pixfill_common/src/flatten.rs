// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening filled paths into line segments.

use crate::kurbo::{self, PathEl, Point};
use log::warn;

/// The flattening tolerance, in pixels.
pub const TOLERANCE: f64 = 0.1;

/// A line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    /// The start point of the line.
    pub p0: Point,
    /// The end point of the line.
    pub p1: Point,
}

impl Line {
    /// Create a new line.
    pub fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }
}

/// Flatten a filled bezier path into line segments.
///
/// Every figure is closed, whether or not it ends with a [`PathEl::ClosePath`].
/// Horizontal lines are dropped, as they never contribute to the winding number.
pub fn fill(path: impl IntoIterator<Item = PathEl>, line_buf: &mut Vec<Line>) {
    line_buf.clear();

    let mut lb = FlattenerCallback {
        line_buf,
        start: Point::ZERO,
        p0: Point::ZERO,
        is_nan: false,
    };

    kurbo::flatten(path, TOLERANCE, |el| lb.callback(el));
    lb.close();

    // A path that contains NaN is ill-defined, so ignore it.
    if lb.is_nan {
        warn!("A path contains NaN, ignoring it.");

        line_buf.clear();
    }
}

struct FlattenerCallback<'a> {
    line_buf: &'a mut Vec<Line>,
    start: Point,
    p0: Point,
    is_nan: bool,
}

impl FlattenerCallback<'_> {
    fn callback(&mut self, el: PathEl) {
        match el {
            PathEl::MoveTo(p) => {
                self.close();
                self.is_nan |= p.is_nan();

                self.start = p;
                self.p0 = p;
            }
            PathEl::LineTo(p) => {
                self.is_nan |= p.is_nan();

                self.push(p);
            }
            PathEl::ClosePath => self.close(),
            // `kurbo::flatten` only emits lines.
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
        }
    }

    fn close(&mut self) {
        if self.p0 != self.start {
            self.push(self.start);
        }
    }

    fn push(&mut self, p: Point) {
        if p.y != self.p0.y {
            self.line_buf.push(Line::new(self.p0, p));
        }
        self.p0 = p;
    }
}
