// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer contract for rendering-engine integrations.
//!
//! Tideport does not talk to a real rendering engine; it issues a small set
//! of fire-and-forget instructions through the [`Renderer`] trait and the
//! host integration translates them into whatever the engine's viewport
//! primitives are. The harness crate provides a recording implementation for
//! tests and demos.
//!
//! Instructions are synchronous and unacknowledged: the pan/zoom loop never
//! waits on the renderer, and a later viewport update supersedes an earlier
//! one by simply re-issuing the full set. The one ordering requirement is
//! honored by the caller, not the trait: a resolution change is always
//! dispatched *before* the displayport rect that was computed assuming that
//! resolution.
//!
//! # Crate boundaries
//!
//! `tideport_core` owns the data model, the corrector, the state machine,
//! and this contract module. Host integrations implement [`Renderer`] and
//! feed [`PanZoomAdapter`](crate::adapter::PanZoomAdapter) with inbound
//! events; they also own everything deliberately excluded from core —
//! hit-testing, mouse-event synthesis, iframe offset accumulation — behind
//! the opaque [`forward_input`](Renderer::forward_input) capability.

use core::fmt;

use crate::adapter::GestureEvent;
use crate::geometry::{CssPoint, CssRect, CssSize, ScreenSize};

/// Why a renderer instruction could not be delivered.
///
/// Dispatch failures are traced and swallowed by the adapter — a single bad
/// viewport update must not stall the pan/zoom loop — so this type exists
/// for diagnostics, not control flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RenderError {
    /// The rendering engine is gone (e.g. the content process exited).
    Disconnected,
    /// The engine refused the instruction.
    Rejected,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("rendering engine disconnected"),
            Self::Rejected => f.write_str("rendering engine rejected instruction"),
        }
    }
}

impl core::error::Error for RenderError {}

/// Applies viewport instructions to a rendering engine.
///
/// Implementations translate each call into the engine's native viewport
/// primitive. All methods are fire-and-forget apart from [`scroll_to`],
/// which reports the position the engine actually landed on.
///
/// [`scroll_to`]: Renderer::scroll_to
pub trait Renderer {
    /// Whether the engine currently has renderable content attached.
    ///
    /// When this is `false` the state machine skips displayport updates
    /// entirely (a documented no-op, not an error).
    fn has_content(&self) -> bool {
        true
    }

    /// Sets the CSS viewport to the given screen size.
    fn set_css_viewport(&mut self, size: ScreenSize) -> Result<(), RenderError>;

    /// Sets the scroll-clamping viewport size, in CSS pixels.
    fn set_scroll_clamping_size(&mut self, size: CssSize) -> Result<(), RenderError>;

    /// Scrolls to an absolute CSS-pixel position and returns the clamped
    /// position the engine actually reached.
    fn scroll_to(&mut self, position: CssPoint) -> Result<CssPoint, RenderError>;

    /// Sets the rasterization resolution (the two scale factors are always
    /// equal in this pipeline, but the engine primitive takes both).
    fn set_resolution(&mut self, x_scale: f64, y_scale: f64) -> Result<(), RenderError>;

    /// Sets the displayport rect, in viewport-relative CSS pixels.
    fn set_display_port(&mut self, rect: CssRect) -> Result<(), RenderError>;

    /// Forwards an input event for the engine to hit-test and synthesize.
    ///
    /// Core passes gestures straight through; it never inspects the DOM and
    /// never lets a gesture touch the zoom state.
    fn forward_input(&mut self, event: &GestureEvent) -> Result<(), RenderError>;
}
