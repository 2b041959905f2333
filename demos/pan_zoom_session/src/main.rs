// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted mobile browsing session that exercises the pan/zoom pipeline.
//!
//! Drives a [`PanZoomAdapter`] through a page load, a pinch zoom, and a
//! low-resolution fling against a [`RecordingRenderer`], tracing every event
//! to both a [`PrettyPrintSink`](tideport_debug::pretty::PrettyPrintSink) and
//! a [`CollectingSink`](tideport_debug::collect::CollectingSink), then
//! exports a Chrome trace JSON file and prints an over-fetch grade.

use std::fs::File;
use std::io::BufWriter;

use tideport_core::adapter::{GestureEvent, PanZoomAdapter, ViewportChange};
use tideport_core::compensate::{compensate, simulate};
use tideport_core::geometry::{DeviceRect, DisplayPortRequest, ScreenSize};
use tideport_core::trace::{
    CorrectionErrorsEvent, DispatchErrorEvent, DisplayPortEvent, ResolutionEvent, SkipEvent,
    TraceSink, Tracer, ViewportChangeEvent, ZoomEvent,
};
use tideport_core::units::AppUnitScale;

use tideport_debug::collect::CollectingSink;
use tideport_debug::pretty::PrettyPrintSink;
use tideport_harness::{ExpansionSample, ExpansionTracker, RecordingRenderer};

const SCREEN_WIDTH: f64 = 360.0;
const SCREEN_HEIGHT: f64 = 640.0;
/// Displayport margin around the visible rect, in device pixels.
const MARGIN: f64 = 128.0;

/// Forwards every event to a pretty-printer and a collector.
struct TeeSink {
    pretty: PrettyPrintSink,
    collect: CollectingSink,
}

impl TraceSink for TeeSink {
    fn on_viewport_change(&mut self, e: &ViewportChangeEvent) {
        self.pretty.on_viewport_change(e);
        self.collect.on_viewport_change(e);
    }
    fn on_zoom(&mut self, e: &ZoomEvent) {
        self.pretty.on_zoom(e);
        self.collect.on_zoom(e);
    }
    fn on_resolution(&mut self, e: &ResolutionEvent) {
        self.pretty.on_resolution(e);
        self.collect.on_resolution(e);
    }
    fn on_display_port(&mut self, e: &DisplayPortEvent) {
        self.pretty.on_display_port(e);
        self.collect.on_display_port(e);
    }
    fn on_correction_errors(&mut self, e: &CorrectionErrorsEvent) {
        self.pretty.on_correction_errors(e);
        self.collect.on_correction_errors(e);
    }
    fn on_skip(&mut self, e: &SkipEvent) {
        self.pretty.on_skip(e);
        self.collect.on_skip(e);
    }
    fn on_dispatch_error(&mut self, e: &DispatchErrorEvent) {
        self.pretty.on_dispatch_error(e);
        self.collect.on_dispatch_error(e);
    }
}

/// A displayport covering the visible rect plus [`MARGIN`] on every side,
/// in page-relative device pixels at the given resolution.
fn port_around(scroll_x: f64, scroll_y: f64, resolution: f64) -> DisplayPortRequest {
    let left = (scroll_x * resolution - MARGIN).max(0.0);
    let top = (scroll_y * resolution - MARGIN).max(0.0);
    DisplayPortRequest::new(
        DeviceRect::from_edges(
            left,
            top,
            left + SCREEN_WIDTH + 2.0 * MARGIN,
            top + SCREEN_HEIGHT + 2.0 * MARGIN,
        ),
        resolution,
    )
}

fn main() {
    let scale = AppUnitScale::DEFAULT;
    let mut adapter = PanZoomAdapter::default();
    let mut renderer = RecordingRenderer::with_max_scroll(1640.0, 5360.0);
    let mut sink = TeeSink {
        pretty: PrettyPrintSink::stderr(),
        collect: CollectingSink::new(),
    };
    let mut tracker = ExpansionTracker::<64>::new();

    // -- scripted session ----------------------------------------------------
    // Zoom-multiplied scroll coordinates, target zoom, displayport resolution.
    let mut steps: Vec<(f64, f64, f64, f64)> = Vec::new();
    // 1. Page load at zoom 1.
    steps.push((0.0, 0.0, 1.0, 1.0));
    // 2. Pinch zoom in.
    for &zoom in &[1.2, 1.6, 2.0] {
        steps.push((0.0, 0.0, zoom, zoom));
    }
    // 3. Fling downward at zoom 2; rasterize low-res while moving fast.
    for i in 1..=8 {
        let y = f64::from(i) * 137.3;
        steps.push((40.0, y, 2.0, 1.0));
    }
    // 4. Settle; re-rasterize at full resolution.
    steps.push((40.0, 8.0 * 137.3, 2.0, 2.0));

    let mut last_report = None;
    for &(x, y, zoom, resolution) in &steps {
        let request = port_around(x / zoom, y / zoom, resolution);
        let change = ViewportChange {
            screen_size: ScreenSize::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            x,
            y,
            zoom,
            display_port: Some(request),
        };

        let mut tracer = Tracer::new(&mut sink);
        adapter.handle_viewport_change(&mut renderer, &mut tracer, &change);

        // Grade the correction the way the renderer's quantizer would see it.
        let corrected = compensate(&scale, request, adapter.scroll()).request;
        last_report = Some(tracker.observe(ExpansionSample {
            requested_width: request.rect.width(),
            requested_height: request.rect.height(),
            simulated: simulate(&scale, &corrected, adapter.scroll()),
        }));
    }

    // 5. A tap once the fling has settled.
    let mut tracer = Tracer::new(&mut sink);
    adapter.handle_gesture(
        &mut renderer,
        &mut tracer,
        &GestureEvent::SingleTap { x: 180.0, y: 320.0 },
    );
    drop(tracer);

    // -- report --------------------------------------------------------------
    let report = last_report.expect("session dispatched no displayports");
    println!(
        "over-fetch grade {} ({} displayports, {} expanded, {} shrunk)",
        report.grade.as_str(),
        report.total_ports,
        report.expanded_ports,
        report.shrunk_ports,
    );
    println!("{} renderer instructions recorded", renderer.log.len());

    // -- export Chrome trace -------------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    tideport_debug::chrome::export(sink.collect.events(), &mut writer)
        .expect("failed to write Chrome trace");
    println!("Wrote {path} ({} events)", sink.collect.events().len());
}
