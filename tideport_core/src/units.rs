// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulation of the renderer's pixel ↔ app-unit conversions.
//!
//! The renderer does not work in floating-point CSS pixels internally; it
//! snaps layout values to *app units*, a fixed-point subdivision of a CSS
//! pixel. Every conversion here must match the renderer's rounding
//! **bit-for-bit** — round-to-nearest via floor of the half-adjusted value,
//! not round-half-even — because the corrector's guarantee rests on the
//! simulation agreeing with what the real pipeline will do.
//!
//! The model is a strategy trait ([`Quantizer`]) rather than free functions
//! so the corrector can be pointed at a different renderer's quantization
//! grid, and so tests can substitute degenerate models. [`AppUnitScale`] is
//! the default implementation; its two constants are *calibration
//! parameters* tuned to one renderer's grid, not universal truths.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// App units per CSS pixel in the default quantization grid.
pub const APP_UNITS_PER_CSS_PIXEL: f64 = 60.0;

/// Safety margin added to measured rounding errors before back-converting.
///
/// Guards against float noise pushing a compensated value back across the
/// rounding boundary it was nudged over.
pub const FUDGE: f64 = 0.04;

/// Pure conversions between CSS pixels, app units, and device pixels,
/// reproducing one renderer's rounding behavior.
///
/// `resolution` throughout is the CSS-pixel-to-device-pixel scale the region
/// is rasterized at.
pub trait Quantizer {
    /// Snaps a CSS-pixel value to app units: round-to-nearest via
    /// `floor(v * scale + 0.5)`.
    fn css_to_app_units(&self, v: f64) -> f64;

    /// Converts an app-unit value to (fractional) device pixels.
    fn app_units_to_device(&self, v: f64, resolution: f64) -> f64;

    /// Converts a device-pixel value to app units.
    ///
    /// Defined as `css_to_app_units(v / resolution)`; this composition is
    /// what the renderer applies, so the default body is normative.
    fn device_to_app_units(&self, v: f64, resolution: f64) -> f64 {
        self.css_to_app_units(v / resolution)
    }

    /// The safety margin used when back-converting measured errors.
    fn fudge(&self) -> f64;
}

/// The default app-unit quantization model.
///
/// Both fields are empirically tuned to a specific renderer. Targeting a
/// renderer with a different fixed-point granularity means re-deriving them,
/// not reusing these values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppUnitScale {
    /// Fixed-point granularity: app units per CSS pixel.
    pub app_units_per_css_pixel: f64,
    /// Safety margin against float noise.
    pub fudge: f64,
}

impl AppUnitScale {
    /// The calibrated default grid (60 app units per CSS pixel, 0.04 fudge).
    pub const DEFAULT: Self = Self {
        app_units_per_css_pixel: APP_UNITS_PER_CSS_PIXEL,
        fudge: FUDGE,
    };

    /// Creates a model with explicit calibration parameters.
    #[inline]
    #[must_use]
    pub const fn new(app_units_per_css_pixel: f64, fudge: f64) -> Self {
        Self {
            app_units_per_css_pixel,
            fudge,
        }
    }
}

impl Default for AppUnitScale {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Quantizer for AppUnitScale {
    #[inline]
    fn css_to_app_units(&self, v: f64) -> f64 {
        (v * self.app_units_per_css_pixel + 0.5).floor()
    }

    #[inline]
    fn app_units_to_device(&self, v: f64, resolution: f64) -> f64 {
        v / self.app_units_per_css_pixel * resolution
    }

    #[inline]
    fn fudge(&self) -> f64 {
        self.fudge
    }
}
