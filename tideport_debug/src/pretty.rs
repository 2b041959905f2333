// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use tideport_core::trace::{
    CorrectionErrorsEvent, DispatchErrorEvent, DisplayPortEvent, ResolutionEvent, SkipEvent,
    SkipReason, TraceSink, ViewportChangeEvent, ZoomEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn skip_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NonPositiveZoom => "zoom<=0",
        SkipReason::NonPositiveResolution => "resolution<=0",
        SkipReason::NoContent => "no-content",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_viewport_change(&mut self, e: &ViewportChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[viewport] screen={}x{} scroll=({}, {}) zoom={:.4} displayport={}",
            e.screen_width,
            e.screen_height,
            e.x,
            e.y,
            e.zoom,
            if e.has_display_port { "yes" } else { "no" },
        );
    }

    fn on_zoom(&mut self, e: &ZoomEvent) {
        let _ = writeln!(
            self.writer,
            "[zoom] {:.6} -> {:.6} {}{}",
            e.previous,
            e.requested,
            if e.applied { "applied" } else { "debounced" },
            if e.forced { " (forced)" } else { "" },
        );
    }

    fn on_resolution(&mut self, e: &ResolutionEvent) {
        let _ = writeln!(self.writer, "[res] draw at {:.4}x", e.resolution);
    }

    fn on_display_port(&mut self, e: &DisplayPortEvent) {
        let _ = writeln!(
            self.writer,
            "[dp] res={:.4} request={}x{} corrected=({:.4}, {:.4})..({:.4}, {:.4})",
            e.resolution,
            e.requested_width,
            e.requested_height,
            e.left,
            e.top,
            e.right,
            e.bottom,
        );
    }

    fn on_correction_errors(&mut self, e: &CorrectionErrorsEvent) {
        let _ = writeln!(
            self.writer,
            "[dp-err] left={:+.5} top={:+.5} right={:+.5} bottom={:+.5}",
            e.left, e.top, e.right, e.bottom,
        );
    }

    fn on_skip(&mut self, e: &SkipEvent) {
        let _ = writeln!(self.writer, "[skip] {}", skip_name(e.reason));
    }

    fn on_dispatch_error(&mut self, e: &DispatchErrorEvent) {
        let _ = writeln!(self.writer, "[err] {}", e.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_event() {
        let mut out: Vec<u8> = Vec::new();
        {
            let mut sink = PrettyPrintSink::with_writer(&mut out);
            sink.on_zoom(&ZoomEvent {
                requested: 2.0,
                previous: 1.0,
                applied: true,
                forced: false,
            });
            sink.on_skip(&SkipEvent {
                reason: SkipReason::NoContent,
            });
        }
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[zoom]"), "got {:?}", lines[0]);
        assert!(lines[1].contains("no-content"), "got {:?}", lines[1]);
    }
}
