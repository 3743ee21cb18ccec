// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shapes that can be filled.

use crate::error::{FillError, Result};
use crate::geometry::IntRect;
use crate::kurbo::{Point, Rect, RoundedRectRadii};
use crate::path::Path;
use std::borrow::Cow;
use std::sync::Arc;

/// The kind of a [`FillShape`], used to tag asynchronous fill handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// [`FillShape::Rectangle`] and [`FillShape::RectangleF`].
    Rectangle,
    /// [`FillShape::Ellipse`].
    Ellipse,
    /// [`FillShape::Pie`].
    Pie,
    /// [`FillShape::Polygon`].
    Polygon,
    /// [`FillShape::RoundedRectangle`].
    RoundedRectangle,
    /// [`FillShape::Path`].
    Path,
}

impl ShapeKind {
    /// The name of the fill operation for this kind of shape.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rectangle => "fill_rectangle",
            Self::Ellipse => "fill_ellipse",
            Self::Pie => "fill_pie",
            Self::Polygon => "fill_polygon",
            Self::RoundedRectangle => "fill_rounded_rectangle",
            Self::Path => "fill_path",
        }
    }
}

/// A shape to fill.
#[derive(Debug, Clone)]
pub enum FillShape {
    /// A rectangle with integer coordinates.
    Rectangle(IntRect),
    /// A rectangle with floating-point coordinates.
    RectangleF(Rect),
    /// The ellipse inscribed in a rectangle.
    Ellipse(Rect),
    /// A pie slice of the ellipse inscribed in `bounds`.
    Pie {
        /// The bounds of the full ellipse.
        bounds: Rect,
        /// The start angle in degrees, clockwise from the positive x axis.
        start_angle: f64,
        /// The sweep angle in degrees.
        sweep_angle: f64,
    },
    /// A closed polygon.
    Polygon(Vec<Point>),
    /// A rectangle with rounded corners.
    RoundedRectangle {
        /// The outer bounds.
        bounds: Rect,
        /// The corner radii.
        radii: RoundedRectRadii,
    },
    /// A caller-supplied path.
    ///
    /// It is shared so that its cached coverage survives across fills.
    Path(Arc<Path>),
}

impl FillShape {
    /// The kind of the shape.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle(_) | Self::RectangleF(_) => ShapeKind::Rectangle,
            Self::Ellipse(_) => ShapeKind::Ellipse,
            Self::Pie { .. } => ShapeKind::Pie,
            Self::Polygon(_) => ShapeKind::Polygon,
            Self::RoundedRectangle { .. } => ShapeKind::RoundedRectangle,
            Self::Path(_) => ShapeKind::Path,
        }
    }

    /// Check the shape's parameters.
    ///
    /// Coordinates and angles must be finite, and corner radii must not be negative.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Rectangle(_) | Self::Path(_) => Ok(()),
            Self::RectangleF(rect) => check_rect("rect", *rect),
            Self::Ellipse(bounds) => check_rect("bounds", *bounds),
            Self::Pie {
                bounds,
                start_angle,
                sweep_angle,
            } => {
                check_rect("bounds", *bounds)?;
                if !start_angle.is_finite() || !sweep_angle.is_finite() {
                    return Err(FillError::invalid("angle", "angles must be finite"));
                }
                Ok(())
            }
            Self::Polygon(points) => {
                if points.iter().all(|p| p.is_finite()) {
                    Ok(())
                } else {
                    Err(FillError::invalid("points", "coordinates must be finite"))
                }
            }
            Self::RoundedRectangle { bounds, radii } => {
                check_rect("bounds", *bounds)?;
                let r = [
                    radii.top_left,
                    radii.top_right,
                    radii.bottom_right,
                    radii.bottom_left,
                ];
                if r.iter().all(|r| r.is_finite() && *r >= 0.0) {
                    Ok(())
                } else {
                    Err(FillError::invalid(
                        "radii",
                        "corner radii must be finite and non-negative",
                    ))
                }
            }
        }
    }

    /// Return the path to rasterize for this shape.
    ///
    /// Caller-supplied paths are borrowed. Primitive shapes get a freshly built path with
    /// caching disabled, as it is used exactly once.
    pub fn to_path(&self) -> Cow<'_, Path> {
        let mut path = Path::new(false);
        match self {
            Self::Path(p) => return Cow::Borrowed(p),
            Self::Rectangle(rect) => {
                if !rect.is_empty() {
                    path.add_rectangle(rect.to_rect());
                }
            }
            Self::RectangleF(rect) => {
                if rect.width() > 0.0 && rect.height() > 0.0 {
                    path.add_rectangle(*rect);
                }
            }
            Self::Ellipse(bounds) => {
                path.add_ellipse(*bounds);
            }
            Self::Pie {
                bounds,
                start_angle,
                sweep_angle,
            } => {
                path.add_pie(*bounds, *start_angle, *sweep_angle);
            }
            Self::Polygon(points) => {
                path.add_polygon(points);
            }
            Self::RoundedRectangle { bounds, radii } => {
                path.add_rounded_rectangle(*bounds, *radii);
            }
        }
        Cow::Owned(path)
    }
}

fn check_rect(name: &'static str, rect: Rect) -> Result<()> {
    if [rect.x0, rect.y0, rect.x1, rect.y1]
        .iter()
        .all(|v| v.is_finite())
    {
        Ok(())
    } else {
        Err(FillError::invalid(name, "coordinates must be finite"))
    }
}

impl From<IntRect> for FillShape {
    fn from(value: IntRect) -> Self {
        Self::Rectangle(value)
    }
}

impl From<Rect> for FillShape {
    fn from(value: Rect) -> Self {
        Self::RectangleF(value)
    }
}

impl From<Vec<Point>> for FillShape {
    fn from(value: Vec<Point>) -> Self {
        Self::Polygon(value)
    }
}

impl From<Path> for FillShape {
    fn from(value: Path) -> Self {
        Self::Path(Arc::new(value))
    }
}

impl From<Arc<Path>> for FillShape {
    fn from(value: Arc<Path>) -> Self {
        Self::Path(value)
    }
}
