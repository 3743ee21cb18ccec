// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Options controlling how shapes are filled.

use crate::error::{FillError, Result};
use crate::kurbo::Affine;
use crate::peniko::{Color, Fill};
use core::fmt::Debug;
use std::sync::{Arc, OnceLock};

/// Maps colors to a restricted set of colors, e.g. a palette.
pub trait Quantizer: Debug + Send + Sync {
    /// Return the color that should be written instead of `color`.
    fn quantize(&self, color: Color) -> Color;
}

/// Adjusts colors based on their position before they are quantized.
pub trait Ditherer: Debug + Send + Sync {
    /// Return the dithered color for the pixel at `(x, y)`.
    fn dither(&self, color: Color, x: u16, y: u16) -> Color;
}

/// Options for a single fill operation.
///
/// Immutable once constructed; use the `with_*` methods to derive new options.
/// Passing no options to a fill is equivalent to passing [`DrawingOptions::default`].
#[derive(Debug, Clone)]
pub struct DrawingOptions {
    antialiasing: bool,
    alpha_blending: bool,
    transformation: Affine,
    fill_rule: Fill,
    quantizer: Option<Arc<dyn Quantizer>>,
    ditherer: Option<Arc<dyn Ditherer>>,
}

impl Default for DrawingOptions {
    fn default() -> Self {
        Self {
            antialiasing: false,
            alpha_blending: true,
            transformation: Affine::IDENTITY,
            fill_rule: Fill::NonZero,
            quantizer: None,
            ditherer: None,
        }
    }
}

impl DrawingOptions {
    /// The canonical default instance, used wherever options are omitted.
    pub fn canonical() -> &'static Self {
        static DEFAULT: OnceLock<DrawingOptions> = OnceLock::new();
        DEFAULT.get_or_init(Self::default)
    }

    /// Enable or disable anti-aliasing.
    #[must_use]
    pub fn with_antialiasing(mut self, antialiasing: bool) -> Self {
        self.antialiasing = antialiasing;
        self
    }

    /// Enable or disable blending with the existing pixels.
    ///
    /// When disabled, pixels covered by the shape are replaced.
    #[must_use]
    pub fn with_alpha_blending(mut self, alpha_blending: bool) -> Self {
        self.alpha_blending = alpha_blending;
        self
    }

    /// Set the transformation applied to shapes before they are filled.
    #[must_use]
    pub fn with_transformation(mut self, transformation: Affine) -> Self {
        self.transformation = transformation;
        self
    }

    /// Set the fill rule.
    #[must_use]
    pub fn with_fill_rule(mut self, fill_rule: Fill) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Set the quantizer.
    #[must_use]
    pub fn with_quantizer(mut self, quantizer: Option<Arc<dyn Quantizer>>) -> Self {
        self.quantizer = quantizer;
        self
    }

    /// Set the ditherer. It only has an effect together with a quantizer.
    #[must_use]
    pub fn with_ditherer(mut self, ditherer: Option<Arc<dyn Ditherer>>) -> Self {
        self.ditherer = ditherer;
        self
    }

    /// Whether anti-aliasing is enabled.
    pub fn antialiasing(&self) -> bool {
        self.antialiasing
    }

    /// Whether alpha blending is enabled.
    pub fn alpha_blending(&self) -> bool {
        self.alpha_blending
    }

    /// The transformation.
    pub fn transformation(&self) -> Affine {
        self.transformation
    }

    /// Whether the transformation is the identity.
    pub fn is_identity_transform(&self) -> bool {
        self.transformation == Affine::IDENTITY
    }

    /// The fill rule.
    pub fn fill_rule(&self) -> Fill {
        self.fill_rule
    }

    /// The quantizer, if any.
    pub fn quantizer(&self) -> Option<&dyn Quantizer> {
        self.quantizer.as_deref()
    }

    /// The ditherer, if any.
    pub fn ditherer(&self) -> Option<&dyn Ditherer> {
        self.ditherer.as_deref()
    }

    /// Check that the options describe a drawable configuration.
    pub fn validate(&self) -> Result<()> {
        let coeffs = self.transformation.as_coeffs();
        if !coeffs.iter().all(|c| c.is_finite()) {
            return Err(FillError::invalid(
                "options",
                "the transformation has non-finite coefficients",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::DrawingOptions;
    use crate::error::FillError;
    use crate::kurbo::Affine;

    #[test]
    fn default_options() {
        let options = DrawingOptions::default();
        assert!(!options.antialiasing());
        assert!(options.alpha_blending());
        assert!(options.is_identity_transform());
        assert!(options.quantizer().is_none());
        assert!(options.ditherer().is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn rotation_is_not_identity() {
        let options = DrawingOptions::default().with_transformation(Affine::rotate(0.5));
        assert!(!options.is_identity_transform());
    }

    #[test]
    fn non_finite_transform_is_rejected() {
        let options =
            DrawingOptions::default().with_transformation(Affine::translate((f64::NAN, 0.0)));
        assert!(matches!(
            options.validate(),
            Err(FillError::InvalidArgument { name: "options", .. })
        ));
    }

    #[test]
    fn singular_transform_is_valid() {
        for transform in [Affine::scale(0.0), Affine::scale_non_uniform(1.0, 0.0)] {
            let options = DrawingOptions::default().with_transformation(transform);
            assert!(options.validate().is_ok(), "{transform:?}");
        }
    }
}
