// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tab zoom and draw-resolution state.
//!
//! [`ViewportState`] tracks two scales that usually agree and transiently
//! diverge:
//!
//! - **zoom** — the user-visible scale of the tab.
//! - **draw resolution** — the scale the renderer is currently asked to
//!   rasterize at. During fast panning the chrome requests a *lower*
//!   resolution over a *larger* displayport to bound rendering cost, so the
//!   draw resolution follows the displayport request rather than the zoom.
//!
//! Zoom changes arrive on every scroll tick, most of them float noise, so
//! [`set_zoom`](ViewportState::set_zoom) debounces through
//! [`zoom_differs`] — an explicit comparison-with-epsilon policy, not an
//! implicit side effect of assignment.
//!
//! The state is exclusively owned by the event-dispatch path: one logical
//! thread, run-to-completion per event, no interior mutability. A host that
//! delivers events from multiple threads must serialize them upstream.

use crate::compensate::compensate;
use crate::geometry::{CssRect, DisplayPortRequest, ScrollOffset};
use crate::renderer::{RenderError, Renderer};
use crate::trace::{
    DisplayPortEvent, ResolutionEvent, SkipEvent, SkipReason, Tracer, ZoomEvent,
};
use crate::units::Quantizer;

/// Zoom deltas below this are treated as float noise and ignored.
pub const ZOOM_EPSILON: f64 = 1e-6;

/// Whether two zoom values differ materially (by at least [`ZOOM_EPSILON`]).
#[inline]
#[must_use]
pub fn zoom_differs(a: f64, b: f64) -> bool {
    (a - b).abs() >= ZOOM_EPSILON
}

/// Zoom and draw-resolution state for one tab/document context.
///
/// Lives for the lifetime of the tab; a new document gets a fresh state. The
/// state starts unzoomed (`zoom = 0`), which keeps the displayport guard
/// closed until the first real viewport change initializes the zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    zoom: f64,
    draw_resolution: f64,
    active: bool,
}

impl Default for ViewportState {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportState {
    /// Creates an unzoomed state for a foreground tab.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            zoom: 0.0,
            draw_resolution: 0.0,
            active: true,
        }
    }

    /// The user-visible zoom.
    #[inline]
    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// The resolution the renderer was last asked to rasterize at.
    #[inline]
    #[must_use]
    pub const fn draw_resolution(&self) -> f64 {
        self.draw_resolution
    }

    /// Whether this tab is the currently visible one.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Marks this tab as visible or backgrounded.
    ///
    /// Background tabs keep tracking zoom but never push resolution changes
    /// to the renderer; drawing a background tab at anything other than its
    /// user-visible zoom would be wasted work.
    #[inline]
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Applies a zoom change, debounced by [`ZOOM_EPSILON`] unless `force`.
    ///
    /// When the change is material (or forced) and the tab is active, the
    /// draw resolution follows the zoom and the renderer is instructed to
    /// re-render at it.
    pub fn set_zoom(
        &mut self,
        renderer: &mut dyn Renderer,
        tracer: &mut Tracer<'_>,
        zoom: f64,
        force: bool,
    ) -> Result<(), RenderError> {
        let applied = force || zoom_differs(zoom, self.zoom);
        tracer.zoom(&ZoomEvent {
            requested: zoom,
            previous: self.zoom,
            applied,
            forced: force,
        });
        if !applied {
            return Ok(());
        }

        self.zoom = zoom;
        if self.active {
            self.draw_resolution = zoom;
            renderer.set_resolution(zoom, zoom)?;
            tracer.resolution(&ResolutionEvent { resolution: zoom });
        }
        Ok(())
    }

    /// Corrects and applies a displayport request.
    ///
    /// No-op (traced skip) when the current zoom or the request's resolution
    /// is not positive, or when the renderer has no content attached. When
    /// the request's resolution differs from the current draw resolution the
    /// renderer is re-targeted *before* the displayport instruction, so the
    /// rect is never interpreted under a stale scale.
    ///
    /// The corrected rect is handed to the renderer in viewport-relative CSS
    /// pixels, which is what its displayport primitive accepts.
    pub fn set_display_port<Q: Quantizer + ?Sized>(
        &mut self,
        renderer: &mut dyn Renderer,
        tracer: &mut Tracer<'_>,
        quantizer: &Q,
        request: DisplayPortRequest,
        scroll: ScrollOffset,
    ) -> Result<(), RenderError> {
        if self.zoom <= 0.0 {
            tracer.skip(&SkipEvent {
                reason: SkipReason::NonPositiveZoom,
            });
            return Ok(());
        }
        if !request.is_actionable() {
            tracer.skip(&SkipEvent {
                reason: SkipReason::NonPositiveResolution,
            });
            return Ok(());
        }
        if !renderer.has_content() {
            tracer.skip(&SkipEvent {
                reason: SkipReason::NoContent,
            });
            return Ok(());
        }

        let resolution = request.resolution;
        if resolution != self.draw_resolution {
            self.draw_resolution = resolution;
            renderer.set_resolution(resolution, resolution)?;
            tracer.resolution(&ResolutionEvent { resolution });
        }

        let correction = compensate(quantizer, request, scroll);
        let corrected = correction.request.rect;

        #[cfg(feature = "trace-rich")]
        tracer.correction_errors(&crate::trace::CorrectionErrorsEvent {
            left: correction.error_left,
            top: correction.error_top,
            right: correction.error_right,
            bottom: correction.error_bottom,
        });

        let css = CssRect::from_origin_size(
            corrected.left() / resolution - scroll.x(),
            corrected.top() / resolution - scroll.y(),
            corrected.width() / resolution,
            corrected.height() / resolution,
        );
        renderer.set_display_port(css)?;
        tracer.display_port(&DisplayPortEvent {
            resolution,
            requested_width: request.rect.width(),
            requested_height: request.rect.height(),
            left: corrected.left(),
            top: corrected.top(),
            right: corrected.right(),
            bottom: corrected.bottom(),
        });
        Ok(())
    }
}
