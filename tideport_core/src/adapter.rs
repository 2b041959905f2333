// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inbound event types and the dispatch entry point.
//!
//! The browser chrome drives this crate with two kinds of plain-data events:
//! viewport changes (screen size, scroll, zoom, optional displayport) and
//! gestures. [`PanZoomAdapter`] owns the [`ViewportState`] and the quantizer,
//! handles each event to completion, and is the catch point for the error
//! policy: a renderer dispatch failure is traced and swallowed so the next
//! event is still processed — one bad update must never stall the pan/zoom
//! loop.
//!
//! Events are expected on a single logical thread. There is no queueing or
//! cancellation here; a later viewport change supersedes an earlier one by
//! re-running the full update.

use crate::geometry::{CssPoint, CssSize, DisplayPortRequest, ScreenSize, ScrollOffset};
use crate::renderer::{RenderError, Renderer};
use crate::trace::{DispatchErrorEvent, Tracer, ViewportChangeEvent};
use crate::units::{AppUnitScale, Quantizer};
use crate::viewport::ViewportState;

/// A viewport-change notification from the browser chrome.
///
/// Scroll coordinates arrive pre-multiplied by zoom (device-pixel-like); the
/// adapter divides them back into CSS pixels before instructing the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportChange {
    /// Screen dimensions in device pixels.
    pub screen_size: ScreenSize,
    /// Horizontal scroll position, zoom-multiplied.
    pub x: f64,
    /// Vertical scroll position, zoom-multiplied.
    pub y: f64,
    /// Target user-visible zoom.
    pub zoom: f64,
    /// The displayport to rasterize, if the chrome computed one.
    pub display_port: Option<DisplayPortRequest>,
}

/// A gesture notification from the browser chrome.
///
/// Gestures pass through to the renderer untouched; hit-testing and event
/// synthesis live on the other side of the [`Renderer`] boundary, and a
/// gesture never mutates the zoom state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// A single tap at the given device-pixel position.
    SingleTap {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// The current touch sequence was cancelled.
    CancelTouch,
}

/// Owns the pan/zoom state and dispatches inbound chrome events.
///
/// Generic over the [`Quantizer`] so a host targeting a renderer with a
/// different quantization grid can swap the model without touching the
/// dispatch logic.
#[derive(Debug)]
pub struct PanZoomAdapter<Q = AppUnitScale> {
    state: ViewportState,
    quantizer: Q,
    scroll: ScrollOffset,
}

impl Default for PanZoomAdapter {
    #[inline]
    fn default() -> Self {
        Self::new(AppUnitScale::DEFAULT)
    }
}

impl<Q: Quantizer> PanZoomAdapter<Q> {
    /// Creates an adapter with the given quantization model.
    #[must_use]
    pub fn new(quantizer: Q) -> Self {
        Self {
            state: ViewportState::new(),
            quantizer,
            scroll: ScrollOffset::ZERO,
        }
    }

    /// The current viewport state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Mutable access to the viewport state (e.g. to background the tab).
    #[inline]
    pub fn state_mut(&mut self) -> &mut ViewportState {
        &mut self.state
    }

    /// The clamped scroll position last reported by the renderer.
    #[inline]
    #[must_use]
    pub const fn scroll(&self) -> ScrollOffset {
        self.scroll
    }

    /// Handles one viewport-change event to completion.
    ///
    /// Applies the screen size, scroll position, and zoom, then — if the
    /// event carries a displayport — corrects and applies it using the
    /// scroll position the renderer actually landed on. A dispatch failure
    /// aborts the remainder of this event (traced, swallowed); the adapter
    /// stays usable for the next one.
    pub fn handle_viewport_change(
        &mut self,
        renderer: &mut dyn Renderer,
        tracer: &mut Tracer<'_>,
        change: &ViewportChange,
    ) {
        tracer.viewport_change(&ViewportChangeEvent {
            screen_width: change.screen_size.width(),
            screen_height: change.screen_size.height(),
            x: change.x,
            y: change.y,
            zoom: change.zoom,
            has_display_port: change.display_port.is_some(),
        });
        if let Err(error) = self.apply_viewport_change(renderer, tracer, change) {
            tracer.dispatch_error(&DispatchErrorEvent { error });
        }
    }

    fn apply_viewport_change(
        &mut self,
        renderer: &mut dyn Renderer,
        tracer: &mut Tracer<'_>,
        change: &ViewportChange,
    ) -> Result<(), RenderError> {
        let zoom = change.zoom;
        renderer.set_css_viewport(change.screen_size)?;

        if zoom > 0.0 {
            renderer.set_scroll_clamping_size(CssSize::new(
                change.screen_size.width() / zoom,
                change.screen_size.height() / zoom,
            ))?;
            // The renderer clamps against the actual content size; everything
            // downstream must use the position it reports, not the request.
            let clamped = renderer.scroll_to(CssPoint::new(change.x / zoom, change.y / zoom))?;
            self.scroll = ScrollOffset::from(clamped);
        }

        self.state.set_zoom(renderer, tracer, zoom, false)?;

        if let Some(request) = change.display_port {
            self.state.set_display_port(
                renderer,
                tracer,
                &self.quantizer,
                request,
                self.scroll,
            )?;
        }
        Ok(())
    }

    /// Forwards a gesture to the renderer.
    ///
    /// Never touches the viewport state; a dispatch failure is traced and
    /// swallowed.
    pub fn handle_gesture(
        &mut self,
        renderer: &mut dyn Renderer,
        tracer: &mut Tracer<'_>,
        event: &GestureEvent,
    ) {
        if let Err(error) = renderer.forward_input(event) {
            tracer.dispatch_error(&DispatchErrorEvent { error });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{CssRect, DeviceRect};

    /// Double that reports a clamped scroll and can fail on demand.
    struct ScriptedRenderer {
        max_scroll: CssPoint,
        scrolls: u32,
        display_ports: u32,
        fail_display_port: bool,
    }

    impl ScriptedRenderer {
        fn new(max_x: f64, max_y: f64) -> Self {
            Self {
                max_scroll: CssPoint::new(max_x, max_y),
                scrolls: 0,
                display_ports: 0,
                fail_display_port: false,
            }
        }
    }

    impl Renderer for ScriptedRenderer {
        fn set_css_viewport(&mut self, _size: ScreenSize) -> Result<(), RenderError> {
            Ok(())
        }
        fn set_scroll_clamping_size(&mut self, _size: CssSize) -> Result<(), RenderError> {
            Ok(())
        }
        fn scroll_to(&mut self, position: CssPoint) -> Result<CssPoint, RenderError> {
            self.scrolls += 1;
            Ok(CssPoint::new(
                position.x().min(self.max_scroll.x()),
                position.y().min(self.max_scroll.y()),
            ))
        }
        fn set_resolution(&mut self, _x_scale: f64, _y_scale: f64) -> Result<(), RenderError> {
            Ok(())
        }
        fn set_display_port(&mut self, _rect: CssRect) -> Result<(), RenderError> {
            if self.fail_display_port {
                return Err(RenderError::Rejected);
            }
            self.display_ports += 1;
            Ok(())
        }
        fn forward_input(&mut self, _event: &GestureEvent) -> Result<(), RenderError> {
            Ok(())
        }
    }

    fn change(zoom: f64) -> ViewportChange {
        ViewportChange {
            screen_size: ScreenSize::new(360.0, 640.0),
            x: 0.0,
            y: 0.0,
            zoom,
            display_port: None,
        }
    }

    #[test]
    fn scroll_is_divided_by_zoom_and_clamped() {
        let mut adapter = PanZoomAdapter::default();
        let mut renderer = ScriptedRenderer::new(100.0, 50.0);
        let mut tracer = Tracer::none();

        let mut event = change(2.0);
        event.x = 300.0; // 150 css px, clamps to 100
        event.y = 80.0; // 40 css px, within range
        adapter.handle_viewport_change(&mut renderer, &mut tracer, &event);

        assert_eq!(adapter.scroll(), ScrollOffset::new(100.0, 40.0));
        assert_eq!(adapter.state().zoom(), 2.0);
    }

    #[test]
    fn zero_zoom_skips_scroll_application() {
        let mut adapter = PanZoomAdapter::default();
        let mut renderer = ScriptedRenderer::new(100.0, 100.0);
        let mut tracer = Tracer::none();

        adapter.handle_viewport_change(&mut renderer, &mut tracer, &change(0.0));
        assert_eq!(renderer.scrolls, 0);
        assert_eq!(adapter.scroll(), ScrollOffset::ZERO);
    }

    #[test]
    fn dispatch_failure_does_not_poison_the_adapter() {
        let mut adapter = PanZoomAdapter::default();
        let mut renderer = ScriptedRenderer::new(1000.0, 1000.0);
        let mut tracer = Tracer::none();

        let mut event = change(1.0);
        event.display_port = Some(DisplayPortRequest::new(
            DeviceRect::from_edges(0.0, 0.0, 100.0, 100.0),
            1.0,
        ));

        renderer.fail_display_port = true;
        adapter.handle_viewport_change(&mut renderer, &mut tracer, &event);
        assert_eq!(renderer.display_ports, 0);

        // Next event proceeds normally.
        renderer.fail_display_port = false;
        adapter.handle_viewport_change(&mut renderer, &mut tracer, &event);
        assert_eq!(renderer.display_ports, 1);
    }

    #[test]
    fn gestures_leave_viewport_state_untouched() {
        let mut adapter = PanZoomAdapter::default();
        let mut renderer = ScriptedRenderer::new(100.0, 100.0);
        let mut tracer = Tracer::none();

        adapter.handle_viewport_change(&mut renderer, &mut tracer, &change(1.5));
        let before = *adapter.state();
        let scroll_before = adapter.scroll();

        adapter.handle_gesture(
            &mut renderer,
            &mut tracer,
            &GestureEvent::SingleTap { x: 12.0, y: 34.0 },
        );
        adapter.handle_gesture(&mut renderer, &mut tracer, &GestureEvent::CancelTouch);

        assert_eq!(*adapter.state(), before);
        assert_eq!(adapter.scroll(), scroll_before);
    }
}
