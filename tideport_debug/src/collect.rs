// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned event recording.
//!
//! [`CollectingSink`] implements [`TraceSink`] and stores each event as an
//! owned [`RecordedEvent`] in arrival order. The pan/zoom loop has no clock
//! of its own, so the position in the log doubles as the event's logical
//! timestamp (one viewport-change event and its downstream zoom/resolution/
//! displayport events form a contiguous run).

use tideport_core::trace::{
    CorrectionErrorsEvent, DispatchErrorEvent, DisplayPortEvent, ResolutionEvent, SkipEvent,
    TraceSink, ViewportChangeEvent, ZoomEvent,
};

/// One recorded pan/zoom event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A viewport-change arrival.
    ViewportChange(ViewportChangeEvent),
    /// A zoom attempt.
    Zoom(ZoomEvent),
    /// A draw-resolution change.
    Resolution(ResolutionEvent),
    /// A dispatched displayport.
    DisplayPort(DisplayPortEvent),
    /// Per-edge correction errors.
    CorrectionErrors(CorrectionErrorsEvent),
    /// A guard skip.
    Skip(SkipEvent),
    /// A dispatch failure.
    DispatchError(DispatchErrorEvent),
}

/// A [`TraceSink`] that stores owned events in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Vec<RecordedEvent>,
}

impl CollectingSink {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the collector and returns the events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }
}

impl TraceSink for CollectingSink {
    fn on_viewport_change(&mut self, e: &ViewportChangeEvent) {
        self.events.push(RecordedEvent::ViewportChange(*e));
    }

    fn on_zoom(&mut self, e: &ZoomEvent) {
        self.events.push(RecordedEvent::Zoom(*e));
    }

    fn on_resolution(&mut self, e: &ResolutionEvent) {
        self.events.push(RecordedEvent::Resolution(*e));
    }

    fn on_display_port(&mut self, e: &DisplayPortEvent) {
        self.events.push(RecordedEvent::DisplayPort(*e));
    }

    fn on_correction_errors(&mut self, e: &CorrectionErrorsEvent) {
        self.events.push(RecordedEvent::CorrectionErrors(*e));
    }

    fn on_skip(&mut self, e: &SkipEvent) {
        self.events.push(RecordedEvent::Skip(*e));
    }

    fn on_dispatch_error(&mut self, e: &DispatchErrorEvent) {
        self.events.push(RecordedEvent::DispatchError(*e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tideport_core::trace::{SkipReason, Tracer};

    #[test]
    fn records_in_arrival_order() {
        let mut sink = CollectingSink::new();
        let mut tracer = Tracer::new(&mut sink);
        tracer.zoom(&ZoomEvent {
            requested: 2.0,
            previous: 1.0,
            applied: true,
            forced: false,
        });
        tracer.resolution(&ResolutionEvent { resolution: 2.0 });
        tracer.skip(&SkipEvent {
            reason: SkipReason::NoContent,
        });
        drop(tracer);

        let events = sink.into_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], RecordedEvent::Zoom(_)));
        assert!(matches!(events[1], RecordedEvent::Resolution(_)));
        assert!(matches!(events[2], RecordedEvent::Skip(_)));
    }
}
