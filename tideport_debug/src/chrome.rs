// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events collected by a
//! [`CollectingSink`](super::collect::CollectingSink) and writes
//! [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::collect::RecordedEvent;

/// Exports collected events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// The pan/zoom loop has no clock, so the event's position in the log is used
/// as its timestamp (one microsecond per event). Relative order is preserved;
/// durations are not meaningful.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::new();

    for (ts, recorded) in events.iter().enumerate() {
        match recorded {
            RecordedEvent::ViewportChange(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "ViewportChange",
                    "cat": "Viewport",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "screen_width": e.screen_width,
                        "screen_height": e.screen_height,
                        "x": e.x,
                        "y": e.y,
                        "zoom": e.zoom,
                        "has_display_port": e.has_display_port,
                    }
                }));
            }
            RecordedEvent::Zoom(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Zoom",
                    "cat": "Viewport",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "requested": e.requested,
                        "previous": e.previous,
                        "applied": e.applied,
                        "forced": e.forced,
                    }
                }));
            }
            RecordedEvent::Resolution(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Resolution",
                    "cat": "DisplayPort",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "resolution": e.resolution,
                    }
                }));
            }
            RecordedEvent::DisplayPort(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "DisplayPort",
                    "cat": "DisplayPort",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "resolution": e.resolution,
                        "requested_width": e.requested_width,
                        "requested_height": e.requested_height,
                        "left": e.left,
                        "top": e.top,
                        "right": e.right,
                        "bottom": e.bottom,
                    }
                }));
            }
            RecordedEvent::CorrectionErrors(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "CorrectionErrors",
                    "cat": "Rich",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "left": e.left,
                        "top": e.top,
                        "right": e.right,
                        "bottom": e.bottom,
                    }
                }));
            }
            RecordedEvent::Skip(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Skip",
                    "cat": "DisplayPort",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "reason": format!("{:?}", e.reason),
                    }
                }));
            }
            RecordedEvent::DispatchError(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "DispatchError",
                    "cat": "Error",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "error": format!("{}", e.error),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::CollectingSink;
    use tideport_core::trace::{
        DisplayPortEvent, ResolutionEvent, SkipEvent, SkipReason, TraceSink, ZoomEvent,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut sink = CollectingSink::new();
        sink.on_zoom(&ZoomEvent {
            requested: 2.0,
            previous: 1.0,
            applied: true,
            forced: false,
        });
        sink.on_resolution(&ResolutionEvent { resolution: 2.0 });
        sink.on_display_port(&DisplayPortEvent {
            resolution: 2.0,
            requested_width: 200.0,
            requested_height: 200.0,
            left: 10.0,
            top: 10.0,
            right: 210.0,
            bottom: 210.0,
        });
        sink.on_skip(&SkipEvent {
            reason: SkipReason::NoContent,
        });

        let mut out = Vec::new();
        export(sink.events(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        // Timestamps follow log order.
        assert_eq!(parsed[0]["name"], "Zoom");
        assert_eq!(parsed[0]["ts"], 0);
        assert_eq!(parsed[1]["name"], "Resolution");
        assert_eq!(parsed[1]["ts"], 1);
        assert_eq!(parsed[2]["name"], "DisplayPort");
        assert_eq!(parsed[3]["name"], "Skip");
        assert_eq!(parsed[3]["args"]["reason"], "NoContent");
    }

    #[test]
    fn export_empty_collection() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
