// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The entry points for filling shapes.

use crate::context::{FillConfig, OperationContext};
use crate::execute::{self, AsyncHandle, FillFuture, OperationTag};
use crate::raster::{Rasterizer, ScanlineRasterizer};
use crate::writer::{DirectWriter, PixelWriter};
use log::trace;
use pixfill_common::error::Result;
use pixfill_common::geometry::IntRect;
use pixfill_common::kurbo::{Point, Rect, RoundedRectRadii};
use pixfill_common::options::DrawingOptions;
use pixfill_common::paint::Paint;
use pixfill_common::path::{Path, prepare_for_fill};
use pixfill_common::pixmap::Bitmap;
use pixfill_common::shape::{FillShape, ShapeKind};
use pixfill_common::strategy::{FillStrategy, select_strategy};
use std::sync::Arc;

/// A fill started by [`Filler::begin_fill`].
pub type FillHandle = AsyncHandle<ShapeKind>;

impl OperationTag for ShapeKind {
    fn name(self) -> &'static str {
        Self::name(self)
    }
}

/// Fills shapes into bitmaps.
///
/// Every entry point validates its arguments before anything is scheduled, then picks
/// between writing pixels directly and rasterizing a path with
/// [`select_strategy`], so the same fill produces the same pixels whichever entry
/// point is used.
///
/// Fills issued concurrently against the same bitmap are not ordered with respect
/// to each other.
#[derive(Debug, Clone)]
pub struct Filler {
    writer: Arc<dyn PixelWriter>,
    rasterizer: Arc<dyn Rasterizer>,
}

impl Default for Filler {
    fn default() -> Self {
        Self::with_collaborators(Arc::new(DirectWriter), Arc::new(ScanlineRasterizer))
    }
}

impl Filler {
    /// Create a filler using the built-in [`DirectWriter`] and [`ScanlineRasterizer`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filler that writes pixels with `writer` and rasterizes paths with
    /// `rasterizer`.
    pub fn with_collaborators(
        writer: Arc<dyn PixelWriter>,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> Self {
        Self { writer, rasterizer }
    }

    /// Fill `shape` on the calling thread with the default context.
    pub fn fill(
        &self,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        shape: impl Into<FillShape>,
        options: Option<&DrawingOptions>,
    ) -> Result<()> {
        let request = self.request(bitmap, paint, shape, options)?;
        trace!("{}: blocking", request.kind().name());
        execute::run(|ctx| request.execute(ctx)).map(|_| ())
    }

    /// Fill `shape` on the calling thread with a context derived from `config`.
    ///
    /// Returns `Ok(false)` if the fill was canceled and `config` does not ask for
    /// an error instead.
    pub fn fill_with(
        &self,
        config: &FillConfig,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        shape: impl Into<FillShape>,
        options: Option<&DrawingOptions>,
    ) -> Result<bool> {
        let request = self.request(bitmap, paint, shape, options)?;
        trace!("{}: blocking with {config:?}", request.kind().name());
        execute::run_with(config, |ctx| request.execute(ctx))
    }

    /// Fill `shape` on the calling thread in `ctx`.
    ///
    /// This is meant for fills that are part of a larger operation: they share its
    /// cancellation signal and parallelism budget.
    pub fn fill_in(
        &self,
        ctx: &OperationContext,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        shape: impl Into<FillShape>,
        options: Option<&DrawingOptions>,
    ) -> Result<bool> {
        let request = self.request(bitmap, paint, shape, options)?;
        trace!("{}: in {ctx:?}", request.kind().name());
        execute::run_in(ctx, |ctx| request.execute(ctx))
    }

    /// Schedule a fill of `shape` on a worker.
    ///
    /// Collect the result with [`end_fill`](Self::end_fill), passing the kind of
    /// `shape`. Invalid arguments are reported here, not by `end_fill`.
    pub fn begin_fill(
        &self,
        config: &FillConfig,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        shape: impl Into<FillShape>,
        options: Option<&DrawingOptions>,
    ) -> Result<FillHandle> {
        let request = self.request(bitmap, paint, shape, options)?;
        let kind = request.kind();
        trace!("{}: begin", kind.name());
        Ok(execute::begin(kind, config, move |ctx| request.execute(ctx)))
    }

    /// Wait for a fill started with [`begin_fill`](Self::begin_fill).
    ///
    /// Blocks the calling thread. Must not be called from a rayon worker thread,
    /// such as inside [`OperationContext::install`] or a parallel iterator.
    ///
    /// Fails with [`FillError::HandleMismatch`] if `handle` was created for a
    /// different kind of shape.
    ///
    /// [`FillError::HandleMismatch`]: pixfill_common::error::FillError::HandleMismatch
    pub fn end_fill(&self, handle: FillHandle, kind: ShapeKind) -> Result<bool> {
        trace!("{}: end", kind.name());
        execute::end(handle, kind)
    }

    /// Schedule a fill of `shape` on a worker, returning a future that resolves to
    /// its result.
    ///
    /// Invalid arguments are reported here, not by the future.
    pub fn fill_async(
        &self,
        config: &FillConfig,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        shape: impl Into<FillShape>,
        options: Option<&DrawingOptions>,
    ) -> Result<FillFuture> {
        let request = self.request(bitmap, paint, shape, options)?;
        trace!("{}: async", request.kind().name());
        Ok(execute::spawn(config, move |ctx| request.execute(ctx)))
    }

    /// Fill a rectangle with integer coordinates.
    pub fn fill_rectangle(
        &self,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        rect: IntRect,
        options: Option<&DrawingOptions>,
    ) -> Result<()> {
        self.fill(bitmap, paint, FillShape::Rectangle(rect), options)
    }

    /// Fill a rectangle with floating-point coordinates.
    pub fn fill_rectangle_f(
        &self,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        rect: Rect,
        options: Option<&DrawingOptions>,
    ) -> Result<()> {
        self.fill(bitmap, paint, FillShape::RectangleF(rect), options)
    }

    /// Fill the ellipse inscribed in `bounds`.
    pub fn fill_ellipse(
        &self,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        bounds: Rect,
        options: Option<&DrawingOptions>,
    ) -> Result<()> {
        self.fill(bitmap, paint, FillShape::Ellipse(bounds), options)
    }

    /// Fill a pie slice of the ellipse inscribed in `bounds`.
    ///
    /// Angles are in degrees, clockwise from the positive x axis.
    pub fn fill_pie(
        &self,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        bounds: Rect,
        start_angle: f64,
        sweep_angle: f64,
        options: Option<&DrawingOptions>,
    ) -> Result<()> {
        let shape = FillShape::Pie {
            bounds,
            start_angle,
            sweep_angle,
        };
        self.fill(bitmap, paint, shape, options)
    }

    /// Fill a closed polygon.
    pub fn fill_polygon(
        &self,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        points: &[Point],
        options: Option<&DrawingOptions>,
    ) -> Result<()> {
        self.fill(bitmap, paint, FillShape::Polygon(points.to_vec()), options)
    }

    /// Fill a rectangle with rounded corners.
    pub fn fill_rounded_rectangle(
        &self,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        bounds: Rect,
        radii: impl Into<RoundedRectRadii>,
        options: Option<&DrawingOptions>,
    ) -> Result<()> {
        let shape = FillShape::RoundedRectangle {
            bounds,
            radii: radii.into(),
        };
        self.fill(bitmap, paint, shape, options)
    }

    /// Fill a path.
    ///
    /// Filling the same shared path repeatedly reuses its cached coverage if the path
    /// prefers caching.
    pub fn fill_path(
        &self,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        path: impl Into<Arc<Path>>,
        options: Option<&DrawingOptions>,
    ) -> Result<()> {
        self.fill(bitmap, paint, FillShape::Path(path.into()), options)
    }

    fn request(
        &self,
        bitmap: &Bitmap,
        paint: impl Into<Paint>,
        shape: impl Into<FillShape>,
        options: Option<&DrawingOptions>,
    ) -> Result<FillRequest> {
        let shape = shape.into();
        shape.validate()?;
        if let Some(options) = options {
            options.validate()?;
        }

        Ok(FillRequest {
            writer: self.writer.clone(),
            rasterizer: self.rasterizer.clone(),
            bitmap: bitmap.clone(),
            paint: paint.into(),
            shape,
            options: options.cloned(),
        })
    }
}

/// A validated fill, owning everything it needs to run on a worker.
struct FillRequest {
    writer: Arc<dyn PixelWriter>,
    rasterizer: Arc<dyn Rasterizer>,
    bitmap: Bitmap,
    paint: Paint,
    shape: FillShape,
    options: Option<DrawingOptions>,
}

impl FillRequest {
    fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    fn execute(&self, ctx: &OperationContext) -> Result<bool> {
        let strategy = select_strategy(&self.paint, self.options.as_ref(), &self.shape);
        trace!("{}: {strategy:?}", self.kind().name());

        if let (FillStrategy::DirectWrite(rect), Some(color)) =
            (strategy, self.paint.solid_color())
        {
            return self.writer.write(ctx, &self.bitmap, rect, color);
        }

        let options = self.options.as_ref().unwrap_or(DrawingOptions::canonical());
        let path = self.shape.to_path();
        let path = prepare_for_fill(&path, options);
        self.rasterizer
            .fill(ctx, &self.bitmap, &path, &self.paint.to_brush(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::Filler;
    use crate::context::{CancelToken, FillConfig};
    use pixfill_common::error::FillError;
    use pixfill_common::geometry::IntRect;
    use pixfill_common::kurbo::{Affine, Point, Rect};
    use pixfill_common::options::DrawingOptions;
    use pixfill_common::paint::SolidBrush;
    use pixfill_common::path::Path;
    use pixfill_common::peniko::Color;
    use pixfill_common::peniko::color::palette::css::{RED, WHITE};
    use pixfill_common::pixmap::Bitmap;
    use pixfill_common::shape::{FillShape, ShapeKind};
    use std::sync::Arc;

    #[test]
    fn rectangle_is_written() {
        let bitmap = Bitmap::new(4, 4);
        Filler::new()
            .fill_rectangle(&bitmap, WHITE, IntRect::new(1, 1, 2, 2), None)
            .unwrap();

        assert_eq!(bitmap.pixel(1, 1), WHITE.premultiply().to_rgba8());
        assert_eq!(bitmap.pixel(0, 0).a, 0);
        assert_eq!(bitmap.pixel(3, 3).a, 0);
    }

    #[test]
    fn fractional_and_integral_rectangles_match() {
        let filler = Filler::new();
        let direct = Bitmap::new(4, 4);
        filler
            .fill_rectangle(&direct, RED, IntRect::new(1, 0, 2, 3), None)
            .unwrap();

        let rasterized = Bitmap::new(4, 4);
        let options = DrawingOptions::default().with_transformation(Affine::translate((1.0, 0.0)));
        filler
            .fill_rectangle_f(
                &rasterized,
                SolidBrush::new(RED),
                Rect::new(0.0, 0.0, 2.0, 3.0),
                Some(&options),
            )
            .unwrap();

        assert_eq!(direct.snapshot(), rasterized.snapshot());
    }

    #[test]
    fn every_shape_fills_something() {
        let filler = Filler::new();
        let bounds = Rect::new(1.0, 1.0, 15.0, 15.0);
        let mut path = Path::new(true);
        path.add_ellipse(bounds);

        let shapes: [Box<dyn Fn(&Bitmap)>; 5] = [
            Box::new(|b: &Bitmap| filler.fill_ellipse(b, RED, bounds, None).unwrap()),
            Box::new(|b: &Bitmap| {
                filler
                    .fill_pie(b, RED, bounds, 0.0, 90.0, None)
                    .unwrap();
            }),
            Box::new(|b: &Bitmap| {
                let points = [Point::new(1.0, 1.0), Point::new(15.0, 1.0), Point::new(1.0, 15.0)];
                filler.fill_polygon(b, RED, &points, None).unwrap();
            }),
            Box::new(|b: &Bitmap| {
                filler
                    .fill_rounded_rectangle(b, RED, bounds, 4.0, None)
                    .unwrap();
            }),
            Box::new(|b: &Bitmap| filler.fill_path(b, RED, path.clone(), None).unwrap()),
        ];

        for fill in &shapes {
            let bitmap = Bitmap::new(16, 16);
            fill(&bitmap);
            assert!(bitmap.snapshot().iter().any(|p| p.a != 0));
            assert_eq!(bitmap.pixel(0, 0).a, 0);
        }
    }

    #[test]
    fn empty_polygon_completes() {
        let bitmap = Bitmap::new(4, 4);
        let completed = Filler::new()
            .fill_with(&FillConfig::new(), &bitmap, RED, Vec::<Point>::new(), None)
            .unwrap();
        assert!(completed);
        assert!(bitmap.snapshot().iter().all(|p| p.a == 0));
    }

    #[test]
    fn invalid_arguments_are_reported_before_scheduling() {
        let filler = Filler::new();
        let bitmap = Bitmap::new(4, 4);
        let shape = FillShape::Ellipse(Rect::new(0.0, 0.0, f64::NAN, 1.0));

        assert!(matches!(
            filler.begin_fill(&FillConfig::new(), &bitmap, RED, shape.clone(), None),
            Err(FillError::InvalidArgument { .. })
        ));
        assert!(matches!(
            filler.fill_async(&FillConfig::new(), &bitmap, RED, shape, None),
            Err(FillError::InvalidArgument { .. })
        ));

        let non_finite =
            DrawingOptions::default().with_transformation(Affine::scale(f64::INFINITY));
        assert!(matches!(
            filler.fill_rectangle(&bitmap, RED, IntRect::new(0, 0, 1, 1), Some(&non_finite)),
            Err(FillError::InvalidArgument { name: "options", .. })
        ));
    }

    #[test]
    fn singular_transform_draws_nothing() {
        let filler = Filler::new();
        let bitmap = Bitmap::new(8, 8);

        for transform in [Affine::scale(0.0), Affine::scale_non_uniform(1.0, 0.0)] {
            let options = DrawingOptions::default().with_transformation(transform);
            filler
                .fill_rectangle(&bitmap, RED, IntRect::new(0, 0, 8, 8), Some(&options))
                .unwrap();
            filler
                .fill_ellipse(&bitmap, RED, Rect::new(1.0, 1.0, 7.0, 7.0), Some(&options))
                .unwrap();
        }

        assert!(bitmap.snapshot().iter().all(|p| p.a == 0));
    }

    #[test]
    fn begin_and_end_must_match() {
        let filler = Filler::new();
        let bitmap = Bitmap::new(4, 4);
        let handle = filler
            .begin_fill(
                &FillConfig::new(),
                &bitmap,
                RED,
                Rect::new(0.0, 0.0, 2.0, 2.0),
                None,
            )
            .unwrap();
        assert_eq!(handle.tag(), ShapeKind::Rectangle);

        assert!(matches!(
            filler.end_fill(handle, ShapeKind::Ellipse),
            Err(FillError::HandleMismatch {
                expected: "fill_ellipse",
                found: "fill_rectangle",
            })
        ));
    }

    #[test]
    fn cancellation() {
        let token = CancelToken::new();
        token.cancel();
        let filler = Filler::new();
        let bitmap = Bitmap::new(4, 4);
        let translucent = Color::from_rgba8(255, 0, 0, 128);
        let rect = IntRect::new(0, 0, 4, 4);

        let config = FillConfig::new()
            .with_cancel_token(token)
            .with_throw_on_cancel(false);
        assert!(!filler.fill_with(&config, &bitmap, translucent, rect, None).unwrap());

        let config = config.with_throw_on_cancel(true);
        assert!(matches!(
            filler.fill_with(&config, &bitmap, WHITE, rect, None),
            Err(FillError::Canceled)
        ));
        assert!(bitmap.snapshot().iter().all(|p| p.a == 0));
    }

    #[test]
    fn shared_path_is_released_after_filling() {
        let mut path = Path::new(true);
        path.add_rectangle(Rect::new(0.0, 0.0, 2.0, 2.0));
        let path = Arc::new(path);
        let bitmap = Bitmap::new(4, 4);

        Filler::new()
            .fill_path(&bitmap, RED, path.clone(), None)
            .unwrap();
        assert_eq!(Arc::strong_count(&path), 1);
        assert_eq!(bitmap.pixel(1, 1), RED.premultiply().to_rgba8());
    }
}
