// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The displayport rounding corrector.
//!
//! A displayport request starts life as page-relative device pixels, but the
//! renderer converts it to viewport-relative app units and eventually back to
//! page-relative integer device pixels. The forward half of that trip is only
//! slightly lossy, but lossy enough: when the renderer scales the rect back
//! out to whole pixels (`floor` on the near edge, `ceil` on the far edge),
//! the accumulated error can expand the rect one pixel beyond what was
//! requested. On a tiled rasterizer that single line of pixels touches the
//! next tile and forces a whole-tile upload.
//!
//! [`compensate`] neutralizes this by running the renderer's conversions in
//! simulation, measuring how much rounding error each edge will pick up, and
//! pre-adjusting the requested edges so the real pipeline's `floor`/`ceil`
//! land where intended. [`simulate`] exposes the forward half on its own so
//! callers can verify the result against the quantization grid.
//!
//! The corrector is stateless: each call is independent, and the only shared
//! values are the [`Quantizer`](crate::units::Quantizer) calibration
//! constants.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::geometry::{DeviceRect, DisplayPortRequest, QuantizedRect, ScrollOffset};
use crate::units::Quantizer;

/// A displayport rect mid-conversion, in viewport-relative app units.
///
/// Exists only inside the simulation; never leaves this module.
#[derive(Clone, Copy, Debug)]
struct AppUnitRect {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl AppUnitRect {
    fn of<Q: Quantizer + ?Sized>(
        quantizer: &Q,
        request: &DisplayPortRequest,
        scroll: ScrollOffset,
    ) -> Self {
        let rect = request.rect;
        let res = request.resolution;
        Self {
            x: quantizer.css_to_app_units(rect.left() / res - scroll.x()),
            y: quantizer.css_to_app_units(rect.top() / res - scroll.y()),
            w: quantizer.css_to_app_units(rect.width() / res),
            h: quantizer.css_to_app_units(rect.height() / res),
        }
    }
}

/// The translation the renderer applies when converting a viewport-relative
/// offset back to a page-relative one: `-floor(-scroll * resolution + 0.5)`
/// per axis.
#[inline]
fn host_transform(scroll_component: f64, resolution: f64) -> f64 {
    -(-scroll_component * resolution + 0.5).floor()
}

/// The result of a compensation pass.
///
/// Carries the corrected request plus the per-edge rounding errors that were
/// measured, which instrumentation and tests inspect. An error of zero on an
/// edge means the quantization grid already lined up and that edge was left
/// untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correction {
    /// The adjusted request; `resolution` is unchanged from the input.
    pub request: DisplayPortRequest,
    /// Near-edge error on the x axis (negative means the renderer's `floor`
    /// would have under-rounded).
    pub error_left: f64,
    /// Near-edge error on the y axis.
    pub error_top: f64,
    /// Far-edge error on the x axis (positive means the renderer's `ceil`
    /// would have over-rounded).
    pub error_right: f64,
    /// Far-edge error on the y axis.
    pub error_bottom: f64,
}

/// Adjusts a displayport request so the renderer's quantization round trip
/// reproduces it.
///
/// The two edge passes are independent:
///
/// 1. **Near edges (left/top).** The renderer derives the final position as
///    `host_transform + floor(app_units_to_device(pos))`. If the simulated
///    value has drifted below the requested edge (say 3.9 where 4 was asked
///    for), the `floor` drops a pixel. The measured error, padded by the
///    fudge margin and pushed back through the conversion, is added to the
///    requested edge so the floored result comes out at the requested value.
///    The app-unit position and size are then re-derived from the moved edge.
/// 2. **Far edges (right/bottom).** The renderer derives the extent as
///    `ceil(far) - floor(near)`. If that exceeds the originally requested
///    extent, the `ceil` is about to over-round; the far edge is pulled in by
///    the back-converted error plus fudge.
///
/// Callers must not invoke this with a non-positive resolution; the
/// [`ViewportState`](crate::viewport::ViewportState) guard short-circuits
/// those requests before they reach here.
#[must_use]
pub fn compensate<Q: Quantizer + ?Sized>(
    quantizer: &Q,
    request: DisplayPortRequest,
    scroll: ScrollOffset,
) -> Correction {
    let res = request.resolution;
    let fudge = quantizer.fudge();

    let mut left = request.rect.left();
    let mut top = request.rect.top();
    let mut right = request.rect.right();
    let mut bottom = request.rect.bottom();

    // The requested extent is the ground truth the corrected rect must
    // reproduce; the edges may move underneath it.
    let original_width = right - left;
    let original_height = bottom - top;

    let mut app = AppUnitRect::of(quantizer, &request, scroll);

    let transform_x = host_transform(scroll.x(), res);
    let transform_y = host_transform(scroll.y(), res);

    let error_left = transform_x + quantizer.app_units_to_device(app.x, res) - left;
    let error_top = transform_y + quantizer.app_units_to_device(app.y, res) - top;

    if error_left < 0.0 {
        left += quantizer.app_units_to_device(quantizer.device_to_app_units(fudge - error_left, res), res);
        app.x = quantizer.css_to_app_units(left / res - scroll.x());
        app.w = quantizer.css_to_app_units((right - left) / res);
    }
    if error_top < 0.0 {
        top += quantizer.app_units_to_device(quantizer.device_to_app_units(fudge - error_top, res), res);
        app.y = quantizer.css_to_app_units(top / res - scroll.y());
        app.h = quantizer.css_to_app_units((bottom - top) / res);
    }

    // The extent the renderer will derive is ceil(far) - floor(near); measure
    // how far the exact far edge sits past the floored near edge, relative to
    // the requested extent.
    let floor_x = quantizer.app_units_to_device(app.x, res).floor();
    let floor_y = quantizer.app_units_to_device(app.y, res).floor();
    let error_right =
        quantizer.app_units_to_device(app.x + app.w, res) - floor_x - original_width;
    let error_bottom =
        quantizer.app_units_to_device(app.y + app.h, res) - floor_y - original_height;

    if error_right > 0.0 {
        right -= quantizer.app_units_to_device(quantizer.device_to_app_units(error_right + fudge, res), res);
    }
    if error_bottom > 0.0 {
        bottom -= quantizer.app_units_to_device(quantizer.device_to_app_units(error_bottom + fudge, res), res);
    }

    // On an empty request the far-edge shrink can cross the near edge; the
    // returned rect must stay well formed.
    right = right.max(left);
    bottom = bottom.max(top);

    Correction {
        request: DisplayPortRequest::new(DeviceRect::from_edges(left, top, right, bottom), res),
        error_left,
        error_top,
        error_right,
        error_bottom,
    }
}

/// Runs the forward half of the renderer's round trip on a request and
/// returns the integer device-pixel rect it would derive.
///
/// This is the renderer's scale-to-outside-pixels step: position is
/// `host_transform + floor(near)`, extent is `ceil(far) - floor(near)`.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "edges are already floored/ceiled whole numbers within pixel range"
)]
pub fn simulate<Q: Quantizer + ?Sized>(
    quantizer: &Q,
    request: &DisplayPortRequest,
    scroll: ScrollOffset,
) -> QuantizedRect {
    let res = request.resolution;
    let app = AppUnitRect::of(quantizer, request, scroll);

    let near_x = quantizer.app_units_to_device(app.x, res);
    let near_y = quantizer.app_units_to_device(app.y, res);
    let far_x = quantizer.app_units_to_device(app.x + app.w, res);
    let far_y = quantizer.app_units_to_device(app.y + app.h, res);

    QuantizedRect {
        x: (host_transform(scroll.x(), res) + near_x.floor()) as i64,
        y: (host_transform(scroll.y(), res) + near_y.floor()) as i64,
        w: (far_x.ceil() - near_x.floor()) as i64,
        h: (far_y.ceil() - near_y.floor()) as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::AppUnitScale;

    const SCALE: AppUnitScale = AppUnitScale::DEFAULT;

    fn request(left: f64, top: f64, right: f64, bottom: f64, resolution: f64) -> DisplayPortRequest {
        DisplayPortRequest::new(DeviceRect::from_edges(left, top, right, bottom), resolution)
    }

    #[test]
    fn aligned_rect_passes_through_exactly() {
        // Edges already on the quantization grid at 2x: no correction, no
        // expansion.
        let req = request(10.0, 10.0, 110.0, 110.0, 2.0);
        let corrected = compensate(&SCALE, req, ScrollOffset::ZERO);
        assert_eq!(corrected.error_left, 0.0);
        assert_eq!(corrected.error_top, 0.0);
        assert_eq!(corrected.error_right, 0.0);
        assert_eq!(corrected.error_bottom, 0.0);

        let out = simulate(&SCALE, &corrected.request, ScrollOffset::ZERO);
        assert_eq!(out.x, 10);
        assert_eq!(out.y, 10);
        assert_eq!(out.w, 100);
        assert_eq!(out.h, 100);
    }

    #[test]
    fn fractional_scroll_keeps_floored_left_at_request() {
        // At 1.333x with a 3.7 css px scroll the transformed left edge must
        // still floor to >= 4, never 3.
        let req = request(4.0, 0.0, 100.0, 50.0, 1.333);
        let scroll = ScrollOffset::new(3.7, 0.0);
        let corrected = compensate(&SCALE, req, scroll);
        let out = simulate(&SCALE, &corrected.request, scroll);
        assert!(out.x >= 4, "left floored to {} below request", out.x);
    }

    #[test]
    fn near_edge_under_round_is_bumped() {
        // scroll 0.5 css px at 1x puts the app-unit position half a pixel
        // short; without compensation floor(0.5) loses the edge.
        let req = request(1.0, 0.0, 101.0, 50.0, 1.0);
        let scroll = ScrollOffset::new(0.5, 0.0);
        let corrected = compensate(&SCALE, req, scroll);
        assert!(corrected.error_left < 0.0);
        assert!(corrected.request.rect.left() > 1.0);

        let out = simulate(&SCALE, &corrected.request, scroll);
        assert_eq!(out.x, 1);
        assert!(out.w >= 100 && out.w <= 101, "width {} out of band", out.w);
    }

    #[test]
    fn resolution_is_never_modified() {
        let req = request(7.0, 3.0, 97.0, 53.0, 1.5);
        let corrected = compensate(&SCALE, req, ScrollOffset::new(2.3, 1.1));
        assert_eq!(corrected.request.resolution, 1.5);
    }

    #[test]
    fn corrected_rect_stays_well_formed() {
        let req = request(7.0, 3.0, 97.0, 53.0, 1.5);
        let corrected = compensate(&SCALE, req, ScrollOffset::new(2.3, 1.1));
        assert!(corrected.request.rect.is_well_formed());
    }

    #[test]
    fn round_trip_extent_stays_within_one_pixel() {
        // Round-trip fidelity across a grid of resolutions, scrolls, and
        // integer-edged rects: the simulated extent of the corrected rect is
        // never below the request and never more than one pixel above it.
        let resolutions = [0.5, 1.0, 1.333, 1.5, 2.0, 3.0];
        let scrolls = [
            ScrollOffset::ZERO,
            ScrollOffset::new(3.7, 0.0),
            ScrollOffset::new(1.3, 2.9),
            ScrollOffset::new(100.25, 50.5),
        ];
        let rects = [
            (0.0, 0.0, 100.0, 50.0),
            (4.0, 0.0, 100.0, 50.0),
            (10.0, 10.0, 110.0, 110.0),
            (1.0, 7.0, 513.0, 260.0),
            (3.0, 5.0, 3.0, 5.0), // empty rect
        ];

        for &res in &resolutions {
            for &scroll in &scrolls {
                for &(l, t, r, b) in &rects {
                    let req = request(l, t, r, b, res);
                    let corrected = compensate(&SCALE, req, scroll).request;
                    let out = simulate(&SCALE, &corrected, scroll);
                    #[expect(
                        clippy::cast_possible_truncation,
                        reason = "grid rects have small integer extents"
                    )]
                    let (req_w, req_h) = ((r - l) as i64, (b - t) as i64);
                    assert!(
                        out.w >= req_w && out.w <= req_w + 1,
                        "width {} for request {}..{} at res {res} scroll {scroll:?}",
                        out.w,
                        l,
                        r,
                    );
                    assert!(
                        out.h >= req_h && out.h <= req_h + 1,
                        "height {} for request {}..{} at res {res} scroll {scroll:?}",
                        out.h,
                        t,
                        b,
                    );
                }
            }
        }
    }

    #[test]
    fn empty_request_stays_well_formed_at_awkward_scroll() {
        // Low resolution plus a fractional scroll makes the far-edge pass
        // shrink an empty rect; the shrink must not push right below left.
        let req = request(0.0, 3.0, 0.0, 3.0, 0.25);
        let scroll = ScrollOffset::new(3.7, 0.0);
        let corrected = compensate(&SCALE, req, scroll);
        assert!(
            corrected.error_right > 0.0,
            "expected a far-edge shrink, got {}",
            corrected.error_right
        );
        assert!(
            corrected.request.rect.is_well_formed(),
            "corrected rect inverted: {:?}",
            corrected.request.rect
        );

        let out = simulate(&SCALE, &corrected.request, scroll);
        assert_eq!(out.x, 0);
        assert!(out.w >= 0 && out.w <= 1, "width {} out of band", out.w);
    }

    #[test]
    fn statelessness_repeated_calls_agree() {
        let req = request(4.0, 0.0, 100.0, 50.0, 1.333);
        let scroll = ScrollOffset::new(3.7, 0.0);
        assert_eq!(
            compensate(&SCALE, req, scroll),
            compensate(&SCALE, req, scroll)
        );
    }

    #[test]
    fn alternative_quantizer_is_respected() {
        // A coarse 10-units-per-pixel grid produces different app-unit
        // values; the corrector must consult the injected model, not the
        // default constants.
        struct Coarse;
        impl crate::units::Quantizer for Coarse {
            fn css_to_app_units(&self, v: f64) -> f64 {
                (v * 10.0 + 0.5).floor()
            }
            fn app_units_to_device(&self, v: f64, resolution: f64) -> f64 {
                v / 10.0 * resolution
            }
            fn fudge(&self) -> f64 {
                0.04
            }
        }

        let req = request(0.0, 0.0, 100.0, 50.0, 1.0);
        let out = simulate(&Coarse, &req, ScrollOffset::ZERO);
        assert_eq!(out.w, 100);
        let corrected = compensate(&Coarse, req, ScrollOffset::ZERO).request;
        assert_eq!(corrected.resolution, 1.0);
    }
}
