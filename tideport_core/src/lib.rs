// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Displayport rounding compensation and viewport/zoom state for mobile
//! pan/zoom.
//!
//! `tideport_core` sits between a browser's chrome process (which decides
//! where the user has panned and zoomed) and its rendering engine (which
//! rasterizes a *displayport* — a pre-rendered margin around the visible
//! viewport). The renderer internally round-trips displayport coordinates
//! through fixed-point *app units*, and that quantization can expand the
//! requested rect by a pixel. On a tiled rasterizer one stray line of pixels
//! forces an upload of the whole tile, so the expansion is worth correcting.
//! This crate pre-adjusts the requested rect so the renderer's own rounding
//! reproduces the request exactly, or within the one-pixel grid limit.
//!
//! It is `no_std` compatible and allocation-free; all types are `Copy`.
//!
//! # Architecture
//!
//! A viewport-change event flows through the crate like this:
//!
//! ```text
//!   Browser chrome (event source)
//!       │
//!       ▼
//!   ViewportChange ──► PanZoomAdapter::handle_viewport_change()
//!                          │
//!                          ├──► ViewportState::set_zoom()
//!                          │        └──► Renderer::set_resolution()
//!                          │
//!                          └──► ViewportState::set_display_port()
//!                                   ├──► compensate::compensate()
//!                                   └──► Renderer::set_display_port()
//! ```
//!
//! **[`geometry`]** — Coordinate-space wrappers over [`kurbo`] types: device
//! pixels, CSS pixels, and the displayport request that pairs a rect with a
//! target rasterization resolution.
//!
//! **[`units`]** — The [`Quantizer`](units::Quantizer) strategy simulating
//! the renderer's pixel ↔ app-unit conversions, with
//! [`AppUnitScale`](units::AppUnitScale) as the calibrated default.
//!
//! **[`compensate`]** — The rounding corrector: adjusts a requested rect so
//! the simulated round trip through the renderer's quantization grid lands on
//! the requested edges, plus the forward simulation used to verify it.
//!
//! **[`viewport`]** — The per-tab zoom and draw-resolution state machine,
//! including the epsilon debounce that suppresses redundant re-render
//! requests.
//!
//! **[`adapter`]** — Inbound event types and the [`PanZoomAdapter`]
//! dispatcher that owns the state and swallows dispatch failures so one bad
//! update cannot stall the pan/zoom loop.
//!
//! **[`renderer`]** — The [`Renderer`](renderer::Renderer) trait that the
//! rendering-engine collaborator implements; instructions are fire-and-forget.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! pan/zoom instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-edge
//!   correction-error events.
//!
//! [`PanZoomAdapter`]: adapter::PanZoomAdapter

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod adapter;
pub mod compensate;
pub mod geometry;
pub mod renderer;
pub mod trace;
pub mod units;
pub mod viewport;
