// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the pan/zoom loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! adapter and state machine call as each viewport update flows through. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates the per-edge
//!   [`CorrectionErrorsEvent`] and the corresponding `TraceSink` method.

use crate::renderer::RenderError;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a displayport update was skipped without touching the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The current zoom is not positive; the tab has never been zoomed or is
    /// in a degenerate state.
    NonPositiveZoom,
    /// The request's target resolution is not positive.
    NonPositiveResolution,
    /// The rendering engine has no content attached.
    NoContent,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the chrome delivers a viewport-change event.
#[derive(Clone, Copy, Debug)]
pub struct ViewportChangeEvent {
    /// Screen width in device pixels.
    pub screen_width: f64,
    /// Screen height in device pixels.
    pub screen_height: f64,
    /// Requested horizontal scroll, pre-zoom-division.
    pub x: f64,
    /// Requested vertical scroll, pre-zoom-division.
    pub y: f64,
    /// Target user-visible zoom.
    pub zoom: f64,
    /// Whether the event carried a displayport request.
    pub has_display_port: bool,
}

/// Emitted on every zoom-change attempt, applied or debounced.
#[derive(Clone, Copy, Debug)]
pub struct ZoomEvent {
    /// The zoom the chrome asked for.
    pub requested: f64,
    /// The zoom held before this call.
    pub previous: f64,
    /// `false` when the delta was below the epsilon threshold and ignored.
    pub applied: bool,
    /// Whether the caller bypassed the threshold.
    pub forced: bool,
}

/// Emitted when the renderer is instructed to rasterize at a new resolution.
#[derive(Clone, Copy, Debug)]
pub struct ResolutionEvent {
    /// The new draw resolution (both axes).
    pub resolution: f64,
}

/// Emitted after a displayport rect has been corrected and dispatched.
#[derive(Clone, Copy, Debug)]
pub struct DisplayPortEvent {
    /// Target rasterization resolution.
    pub resolution: f64,
    /// Requested width in device pixels (the corrector's ground truth).
    pub requested_width: f64,
    /// Requested height in device pixels.
    pub requested_height: f64,
    /// Corrected left edge, page-relative device pixels.
    pub left: f64,
    /// Corrected top edge.
    pub top: f64,
    /// Corrected right edge.
    pub right: f64,
    /// Corrected bottom edge.
    pub bottom: f64,
}

/// Per-edge rounding errors measured by the corrector (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct CorrectionErrorsEvent {
    /// Near-edge error on the x axis.
    pub left: f64,
    /// Near-edge error on the y axis.
    pub top: f64,
    /// Far-edge error on the x axis.
    pub right: f64,
    /// Far-edge error on the y axis.
    pub bottom: f64,
}

/// Emitted when a displayport update is skipped by a guard.
#[derive(Clone, Copy, Debug)]
pub struct SkipEvent {
    /// Which guard fired.
    pub reason: SkipReason,
}

/// Emitted when a renderer instruction fails to dispatch.
///
/// The failure is swallowed after this event; the next inbound event is
/// processed normally.
#[derive(Clone, Copy, Debug)]
pub struct DispatchErrorEvent {
    /// The error the renderer reported.
    pub error: RenderError,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the pan/zoom loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a viewport-change event arrives.
    fn on_viewport_change(&mut self, e: &ViewportChangeEvent) {
        _ = e;
    }

    /// Called on every zoom-change attempt.
    fn on_zoom(&mut self, e: &ZoomEvent) {
        _ = e;
    }

    /// Called when the draw resolution is applied to the renderer.
    fn on_resolution(&mut self, e: &ResolutionEvent) {
        _ = e;
    }

    /// Called after a corrected displayport is dispatched.
    fn on_display_port(&mut self, e: &DisplayPortEvent) {
        _ = e;
    }

    /// Called with per-edge correction errors (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_correction_errors(&mut self, e: &CorrectionErrorsEvent) {
        _ = e;
    }

    /// Called when a guard skips a displayport update.
    fn on_skip(&mut self, e: &SkipEvent) {
        _ = e;
    }

    /// Called when a renderer instruction fails to dispatch.
    fn on_dispatch_error(&mut self, e: &DispatchErrorEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`ViewportChangeEvent`].
    #[inline]
    pub fn viewport_change(&mut self, e: &ViewportChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_viewport_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ZoomEvent`].
    #[inline]
    pub fn zoom(&mut self, e: &ZoomEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_zoom(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ResolutionEvent`].
    #[inline]
    pub fn resolution(&mut self, e: &ResolutionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_resolution(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DisplayPortEvent`].
    #[inline]
    pub fn display_port(&mut self, e: &DisplayPortEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_display_port(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CorrectionErrorsEvent`] (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn correction_errors(&mut self, e: &CorrectionErrorsEvent) {
        if let Some(s) = &mut self.sink {
            s.on_correction_errors(e);
        }
    }

    /// Emits a [`SkipEvent`].
    #[inline]
    pub fn skip(&mut self, e: &SkipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_skip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DispatchErrorEvent`].
    #[inline]
    pub fn dispatch_error(&mut self, e: &DispatchErrorEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dispatch_error(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
