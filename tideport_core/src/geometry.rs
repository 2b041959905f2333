// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate-space wrappers over [`kurbo`] types.
//!
//! Pan/zoom code constantly moves values between two coordinate spaces:
//!
//! - **Device pixels** — physical screen pixels; the chrome process thinks in
//!   these. Displayport requests arrive as page-relative device-pixel rects.
//! - **CSS pixels** — layout pixels; the renderer's scroll position and
//!   displayport primitive take these. `device = css * resolution`.
//!
//! Mixing the two silently is the classic bug in this domain, so each space
//! gets its own newtype. The wrappers are deliberately thin — the inner
//! [`kurbo`] value is public and arithmetic happens on it directly.

use core::fmt;

use kurbo::{Point, Rect, Size, Vec2};

/// Screen dimensions in device pixels.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct ScreenSize(pub Size);

impl ScreenSize {
    /// Creates a screen size from device-pixel dimensions.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self(Size::new(width, height))
    }

    /// Width in device pixels.
    #[inline]
    #[must_use]
    pub const fn width(self) -> f64 {
        self.0.width
    }

    /// Height in device pixels.
    #[inline]
    #[must_use]
    pub const fn height(self) -> f64 {
        self.0.height
    }
}

impl fmt::Debug for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScreenSize({}x{}dev)", self.0.width, self.0.height)
    }
}

/// Dimensions in CSS pixels (e.g. the scroll-clamping viewport size).
#[derive(Clone, Copy, PartialEq, Default)]
pub struct CssSize(pub Size);

impl CssSize {
    /// Creates a size from CSS-pixel dimensions.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self(Size::new(width, height))
    }

    /// Width in CSS pixels.
    #[inline]
    #[must_use]
    pub const fn width(self) -> f64 {
        self.0.width
    }

    /// Height in CSS pixels.
    #[inline]
    #[must_use]
    pub const fn height(self) -> f64 {
        self.0.height
    }
}

impl fmt::Debug for CssSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CssSize({}x{}css)", self.0.width, self.0.height)
    }
}

/// A position in CSS pixels, page-relative.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct CssPoint(pub Point);

impl CssPoint {
    /// Creates a point from CSS-pixel coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self(Point::new(x, y))
    }

    /// Horizontal coordinate in CSS pixels.
    #[inline]
    #[must_use]
    pub const fn x(self) -> f64 {
        self.0.x
    }

    /// Vertical coordinate in CSS pixels.
    #[inline]
    #[must_use]
    pub const fn y(self) -> f64 {
        self.0.y
    }
}

impl fmt::Debug for CssPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CssPoint({}, {})", self.0.x, self.0.y)
    }
}

/// The renderer's current scroll position in CSS pixels, page-relative.
///
/// This is the *clamped* position the renderer reports after a scroll, not
/// the position the chrome asked for — short documents clamp the offset, and
/// the corrector must use the value the renderer will actually transform by.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset(pub Vec2);

impl ScrollOffset {
    /// A zero scroll offset.
    pub const ZERO: Self = Self(Vec2::new(0.0, 0.0));

    /// Creates a scroll offset from CSS-pixel components.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Horizontal offset in CSS pixels.
    #[inline]
    #[must_use]
    pub const fn x(self) -> f64 {
        self.0.x
    }

    /// Vertical offset in CSS pixels.
    #[inline]
    #[must_use]
    pub const fn y(self) -> f64 {
        self.0.y
    }
}

impl fmt::Debug for ScrollOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScrollOffset({}, {})", self.0.x, self.0.y)
    }
}

impl From<CssPoint> for ScrollOffset {
    #[inline]
    fn from(point: CssPoint) -> Self {
        Self(point.0.to_vec2())
    }
}

/// An axis-aligned rectangle in page-relative device pixels.
///
/// Edges map onto the inner [`Rect`] as `left = x0`, `top = y0`,
/// `right = x1`, `bottom = y1`. A well-formed rect has `right >= left` and
/// `bottom >= top`; the corrector preserves this.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct DeviceRect(pub Rect);

impl DeviceRect {
    /// Creates a rect from device-pixel edges.
    #[inline]
    #[must_use]
    pub const fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self(Rect::new(left, top, right, bottom))
    }

    /// Left edge.
    #[inline]
    #[must_use]
    pub const fn left(self) -> f64 {
        self.0.x0
    }

    /// Top edge.
    #[inline]
    #[must_use]
    pub const fn top(self) -> f64 {
        self.0.y0
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub const fn right(self) -> f64 {
        self.0.x1
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> f64 {
        self.0.y1
    }

    /// Width in device pixels (`right - left`).
    #[inline]
    #[must_use]
    pub fn width(self) -> f64 {
        self.0.width()
    }

    /// Height in device pixels (`bottom - top`).
    #[inline]
    #[must_use]
    pub fn height(self) -> f64 {
        self.0.height()
    }

    /// Whether `right >= left` and `bottom >= top`.
    #[inline]
    #[must_use]
    pub fn is_well_formed(self) -> bool {
        self.0.x1 >= self.0.x0 && self.0.y1 >= self.0.y0
    }
}

impl fmt::Debug for DeviceRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DeviceRect({}, {}, {}, {})",
            self.0.x0, self.0.y0, self.0.x1, self.0.y1
        )
    }
}

/// An axis-aligned rectangle in viewport-relative CSS pixels.
///
/// This is the coordinate space the renderer's displayport primitive accepts;
/// [`ViewportState::set_display_port`](crate::viewport::ViewportState::set_display_port)
/// produces one from a corrected [`DeviceRect`].
#[derive(Clone, Copy, PartialEq, Default)]
pub struct CssRect(pub Rect);

impl CssRect {
    /// Creates a rect from a CSS-pixel origin and size.
    #[inline]
    #[must_use]
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self(Rect::from_origin_size(Point::new(x, y), Size::new(width, height)))
    }

    /// Origin (top-left corner) in CSS pixels.
    #[inline]
    #[must_use]
    pub fn origin(self) -> Point {
        self.0.origin()
    }

    /// Width in CSS pixels.
    #[inline]
    #[must_use]
    pub fn width(self) -> f64 {
        self.0.width()
    }

    /// Height in CSS pixels.
    #[inline]
    #[must_use]
    pub fn height(self) -> f64 {
        self.0.height()
    }
}

impl fmt::Debug for CssRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CssRect({}, {}, {}x{})",
            self.0.x0,
            self.0.y0,
            self.0.width(),
            self.0.height()
        )
    }
}

/// A displayport request: the rect to keep rasterized, and the resolution to
/// rasterize it at.
///
/// `resolution` is the CSS-pixel-to-device-pixel scale for this region. It
/// usually equals the user-visible zoom, but diverges during fast panning
/// when the chrome asks for a larger area at lower resolution to bound
/// rendering cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayPortRequest {
    /// The region to keep rasterized, in page-relative device pixels.
    pub rect: DeviceRect,
    /// Target rasterization scale. Actionable only when positive.
    pub resolution: f64,
}

impl DisplayPortRequest {
    /// Creates a request from a rect and resolution.
    #[inline]
    #[must_use]
    pub const fn new(rect: DeviceRect, resolution: f64) -> Self {
        Self { rect, resolution }
    }

    /// Whether this request can be acted on (`resolution > 0`).
    #[inline]
    #[must_use]
    pub fn is_actionable(self) -> bool {
        self.resolution > 0.0
    }
}

/// The integer device-pixel rect the renderer derives after its round trip.
///
/// Produced by [`simulate`](crate::compensate::simulate): the position is
/// floored and the extent is `ceil(far) - floor(near)` per axis, matching the
/// renderer's scale-to-outside-pixels step.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct QuantizedRect {
    /// Floored left edge, page-relative device pixels.
    pub x: i64,
    /// Floored top edge, page-relative device pixels.
    pub y: i64,
    /// Outward-rounded width in device pixels.
    pub w: i64,
    /// Outward-rounded height in device pixels.
    pub h: i64,
}

impl fmt::Debug for QuantizedRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QuantizedRect({}, {}, {}x{})",
            self.x, self.y, self.w, self.h
        )
    }
}
