// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording renderer double and over-fetch metrics for tests and demos.
//!
//! [`RecordingRenderer`] implements
//! [`Renderer`](tideport_core::renderer::Renderer) by appending every
//! instruction to an ordered log, so tests can assert not just *what* was
//! dispatched but *in which order* — the resolution-before-displayport
//! guarantee is an ordering property. [`FaultToggles`] injects dispatch
//! failures and a detached-content state for exercising the error policy.
//!
//! [`ExpansionTracker`] grades displayport over-fetch quality over a rolling
//! window: each corrected displayport is compared against its request, and
//! any quantization expansion beyond the one-pixel grid limit (or any
//! shrinkage below the request) is a correctness violation.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use tideport_core::adapter::GestureEvent;
use tideport_core::geometry::{CssPoint, CssRect, CssSize, QuantizedRect, ScreenSize};
use tideport_core::renderer::{RenderError, Renderer};

// ---------------------------------------------------------------------------
// Instruction log
// ---------------------------------------------------------------------------

/// One outbound renderer instruction, as recorded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Instruction {
    /// `set_css_viewport` with device-pixel dimensions.
    CssViewport {
        /// Width in device pixels.
        width: f64,
        /// Height in device pixels.
        height: f64,
    },
    /// `set_scroll_clamping_size` with CSS-pixel dimensions.
    ScrollClampingSize {
        /// Width in CSS pixels.
        width: f64,
        /// Height in CSS pixels.
        height: f64,
    },
    /// `scroll_to` with the requested (pre-clamp) CSS position.
    ScrollTo {
        /// Horizontal position in CSS pixels.
        x: f64,
        /// Vertical position in CSS pixels.
        y: f64,
    },
    /// `set_resolution`.
    Resolution {
        /// Horizontal scale.
        x_scale: f64,
        /// Vertical scale.
        y_scale: f64,
    },
    /// `set_display_port` with viewport-relative CSS pixels.
    DisplayPort {
        /// Origin x in CSS pixels.
        x: f64,
        /// Origin y in CSS pixels.
        y: f64,
        /// Width in CSS pixels.
        width: f64,
        /// Height in CSS pixels.
        height: f64,
    },
    /// `forward_input`.
    ForwardInput(GestureEvent),
}

/// Discriminant for log queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionKind {
    /// A `set_css_viewport` call.
    CssViewport,
    /// A `set_scroll_clamping_size` call.
    ScrollClampingSize,
    /// A `scroll_to` call.
    ScrollTo,
    /// A `set_resolution` call.
    Resolution,
    /// A `set_display_port` call.
    DisplayPort,
    /// A `forward_input` call.
    ForwardInput,
}

impl Instruction {
    /// The discriminant of this instruction.
    #[must_use]
    pub const fn kind(&self) -> InstructionKind {
        match self {
            Self::CssViewport { .. } => InstructionKind::CssViewport,
            Self::ScrollClampingSize { .. } => InstructionKind::ScrollClampingSize,
            Self::ScrollTo { .. } => InstructionKind::ScrollTo,
            Self::Resolution { .. } => InstructionKind::Resolution,
            Self::DisplayPort { .. } => InstructionKind::DisplayPort,
            Self::ForwardInput(_) => InstructionKind::ForwardInput,
        }
    }
}

// ---------------------------------------------------------------------------
// Fault injection
// ---------------------------------------------------------------------------

/// Runtime fault toggles for error-policy tests.
///
/// A toggled instruction fails with [`RenderError::Rejected`] and is *not*
/// recorded, matching a renderer that refused the call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaultToggles {
    /// `scroll_to` fails.
    pub fail_scroll: bool,
    /// `set_resolution` fails.
    pub fail_resolution: bool,
    /// `set_display_port` fails.
    pub fail_display_port: bool,
    /// `has_content` reports `false`.
    pub detach_content: bool,
}

// ---------------------------------------------------------------------------
// RecordingRenderer
// ---------------------------------------------------------------------------

/// A [`Renderer`] that records every instruction in dispatch order.
#[derive(Debug)]
pub struct RecordingRenderer {
    /// The ordered instruction log.
    pub log: Vec<Instruction>,
    /// Active fault injection.
    pub faults: FaultToggles,
    max_scroll: CssPoint,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRenderer {
    /// Creates a renderer with unbounded scroll range.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            faults: FaultToggles::default(),
            max_scroll: CssPoint::new(f64::INFINITY, f64::INFINITY),
        }
    }

    /// Creates a renderer whose content clamps scrolling to the given
    /// CSS-pixel maximum per axis.
    #[must_use]
    pub fn with_max_scroll(x: f64, y: f64) -> Self {
        Self {
            max_scroll: CssPoint::new(x, y),
            ..Self::new()
        }
    }

    /// Position of the first instruction of `kind` in the log.
    #[must_use]
    pub fn index_of(&self, kind: InstructionKind) -> Option<usize> {
        self.log.iter().position(|i| i.kind() == kind)
    }

    /// Number of instructions of `kind` in the log.
    #[must_use]
    pub fn count(&self, kind: InstructionKind) -> usize {
        self.log.iter().filter(|i| i.kind() == kind).count()
    }

    /// Clears the log, keeping faults and scroll range.
    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn has_content(&self) -> bool {
        !self.faults.detach_content
    }

    fn set_css_viewport(&mut self, size: ScreenSize) -> Result<(), RenderError> {
        self.log.push(Instruction::CssViewport {
            width: size.width(),
            height: size.height(),
        });
        Ok(())
    }

    fn set_scroll_clamping_size(&mut self, size: CssSize) -> Result<(), RenderError> {
        self.log.push(Instruction::ScrollClampingSize {
            width: size.width(),
            height: size.height(),
        });
        Ok(())
    }

    fn scroll_to(&mut self, position: CssPoint) -> Result<CssPoint, RenderError> {
        if self.faults.fail_scroll {
            return Err(RenderError::Rejected);
        }
        self.log.push(Instruction::ScrollTo {
            x: position.x(),
            y: position.y(),
        });
        Ok(CssPoint::new(
            position.x().min(self.max_scroll.x()).max(0.0),
            position.y().min(self.max_scroll.y()).max(0.0),
        ))
    }

    fn set_resolution(&mut self, x_scale: f64, y_scale: f64) -> Result<(), RenderError> {
        if self.faults.fail_resolution {
            return Err(RenderError::Rejected);
        }
        self.log.push(Instruction::Resolution { x_scale, y_scale });
        Ok(())
    }

    fn set_display_port(&mut self, rect: CssRect) -> Result<(), RenderError> {
        if self.faults.fail_display_port {
            return Err(RenderError::Rejected);
        }
        self.log.push(Instruction::DisplayPort {
            x: rect.origin().x,
            y: rect.origin().y,
            width: rect.width(),
            height: rect.height(),
        });
        Ok(())
    }

    fn forward_input(&mut self, event: &GestureEvent) -> Result<(), RenderError> {
        self.log.push(Instruction::ForwardInput(*event));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Expansion metrics
// ---------------------------------------------------------------------------

/// One displayport outcome fed into [`ExpansionTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct ExpansionSample {
    /// Requested width in device pixels.
    pub requested_width: f64,
    /// Requested height in device pixels.
    pub requested_height: f64,
    /// The rect the renderer's quantization would derive from the corrected
    /// request (from [`simulate`](tideport_core::compensate::simulate)).
    pub simulated: QuantizedRect,
}

/// Letter grade for displayport over-fetch quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpansionGrade {
    /// No expansion in the window.
    A,
    /// Occasional one-pixel expansion.
    B,
    /// Frequent expansion; tiles are being over-fetched.
    C,
    /// Pervasive expansion, or a rect shrank below its request.
    D,
}

impl ExpansionGrade {
    /// Returns a short label for HUD rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Aggregated report returned by [`ExpansionTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct ExpansionReport {
    /// Current grade.
    pub grade: ExpansionGrade,
    /// Expansions per 1000 observed displayports.
    pub expansion_rate_per_1000: f64,
    /// Total displayports observed.
    pub total_ports: u64,
    /// Ports whose simulated extent exceeded the request on either axis.
    pub expanded_ports: u64,
    /// Ports whose simulated extent fell below the request — a correctness
    /// violation that pins the grade at D.
    pub shrunk_ports: u64,
}

/// Rolling over-fetch tracker with a fixed-size recent-outcome window.
#[derive(Debug)]
pub struct ExpansionTracker<const N: usize> {
    expanded: [bool; N],
    cursor: usize,
    total_ports: u64,
    expanded_ports: u64,
    shrunk_ports: u64,
}

impl<const N: usize> Default for ExpansionTracker<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ExpansionTracker<N> {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            expanded: [false; N],
            cursor: 0,
            total_ports: 0,
            expanded_ports: 0,
            shrunk_ports: 0,
        }
    }

    /// Observes one displayport outcome and returns an updated report.
    #[must_use]
    pub fn observe(&mut self, sample: ExpansionSample) -> ExpansionReport {
        let sim_w = sample.simulated.w as f64;
        let sim_h = sample.simulated.h as f64;
        let expanded = sim_w > sample.requested_width || sim_h > sample.requested_height;
        let shrunk = sim_w < sample.requested_width || sim_h < sample.requested_height;

        self.total_ports = self.total_ports.saturating_add(1);
        self.expanded[self.cursor % N] = expanded;
        self.cursor = (self.cursor + 1) % N;
        if expanded {
            self.expanded_ports = self.expanded_ports.saturating_add(1);
        }
        if shrunk {
            self.shrunk_ports = self.shrunk_ports.saturating_add(1);
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "total is below N on this branch, which fits in usize"
        )]
        let window = if self.total_ports < N as u64 {
            self.total_ports as usize
        } else {
            N
        };
        let window_expanded = self.expanded[..window.max(1)]
            .iter()
            .filter(|&&e| e)
            .count();
        let window_rate = window_expanded as f64 / window.max(1) as f64;

        let grade = if self.shrunk_ports > 0 {
            ExpansionGrade::D
        } else if window_expanded == 0 {
            ExpansionGrade::A
        } else if window_rate < 0.05 {
            ExpansionGrade::B
        } else if window_rate < 0.25 {
            ExpansionGrade::C
        } else {
            ExpansionGrade::D
        };

        ExpansionReport {
            grade,
            expansion_rate_per_1000: self.expanded_ports as f64 * 1000.0
                / self.total_ports as f64,
            total_ports: self.total_ports,
            expanded_ports: self.expanded_ports,
            shrunk_ports: self.shrunk_ports,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tideport_core::adapter::{PanZoomAdapter, ViewportChange};
    use tideport_core::compensate::{compensate, simulate};
    use tideport_core::geometry::{DeviceRect, DisplayPortRequest, ScrollOffset};
    use tideport_core::trace::Tracer;
    use tideport_core::units::AppUnitScale;
    use tideport_core::viewport::ViewportState;

    fn port(left: f64, top: f64, right: f64, bottom: f64, resolution: f64) -> DisplayPortRequest {
        DisplayPortRequest::new(DeviceRect::from_edges(left, top, right, bottom), resolution)
    }

    fn change(zoom: f64, display_port: Option<DisplayPortRequest>) -> ViewportChange {
        ViewportChange {
            screen_size: tideport_core::geometry::ScreenSize::new(360.0, 640.0),
            x: 0.0,
            y: 0.0,
            zoom,
            display_port,
        }
    }

    #[test]
    fn viewport_change_instruction_sequence() {
        let mut adapter = PanZoomAdapter::default();
        let mut renderer = RecordingRenderer::new();
        let mut tracer = Tracer::none();

        adapter.handle_viewport_change(
            &mut renderer,
            &mut tracer,
            &change(2.0, Some(port(0.0, 0.0, 720.0, 1280.0, 2.0))),
        );

        let kinds: Vec<InstructionKind> = renderer.log.iter().map(Instruction::kind).collect();
        assert_eq!(
            kinds,
            [
                InstructionKind::CssViewport,
                InstructionKind::ScrollClampingSize,
                InstructionKind::ScrollTo,
                InstructionKind::Resolution,
                InstructionKind::DisplayPort,
            ],
            "unexpected instruction order: {kinds:?}"
        );
    }

    #[test]
    fn resolution_precedes_display_port_when_diverging() {
        let mut state = ViewportState::new();
        let mut renderer = RecordingRenderer::new();
        let mut tracer = Tracer::none();
        let scale = AppUnitScale::DEFAULT;

        state
            .set_zoom(&mut renderer, &mut tracer, 2.0, false)
            .unwrap();
        renderer.clear();

        // Fast-panning request at half the zoom's resolution.
        state
            .set_display_port(
                &mut renderer,
                &mut tracer,
                &scale,
                port(0.0, 0.0, 1440.0, 2560.0, 1.0),
                ScrollOffset::ZERO,
            )
            .unwrap();

        let res = renderer.index_of(InstructionKind::Resolution);
        let dp = renderer.index_of(InstructionKind::DisplayPort);
        assert!(res.is_some(), "no resolution instruction recorded");
        assert!(dp.is_some(), "no displayport instruction recorded");
        assert!(res < dp, "resolution must precede displayport: {:?}", renderer.log);
    }

    #[test]
    fn guarded_display_port_issues_zero_instructions() {
        let mut state = ViewportState::new();
        let mut renderer = RecordingRenderer::new();
        let mut tracer = Tracer::none();
        let scale = AppUnitScale::DEFAULT;

        // zoom = 0
        state
            .set_display_port(
                &mut renderer,
                &mut tracer,
                &scale,
                port(0.0, 0.0, 100.0, 100.0, 1.0),
                ScrollOffset::ZERO,
            )
            .unwrap();
        assert!(renderer.log.is_empty(), "guard leaked: {:?}", renderer.log);

        // resolution = 0
        state
            .set_zoom(&mut renderer, &mut tracer, 1.0, false)
            .unwrap();
        renderer.clear();
        state
            .set_display_port(
                &mut renderer,
                &mut tracer,
                &scale,
                port(0.0, 0.0, 100.0, 100.0, 0.0),
                ScrollOffset::ZERO,
            )
            .unwrap();
        assert!(renderer.log.is_empty(), "guard leaked: {:?}", renderer.log);
    }

    #[test]
    fn detached_content_skips_display_port() {
        let mut state = ViewportState::new();
        let mut renderer = RecordingRenderer::new();
        let mut tracer = Tracer::none();
        let scale = AppUnitScale::DEFAULT;

        state
            .set_zoom(&mut renderer, &mut tracer, 1.0, false)
            .unwrap();
        renderer.clear();
        renderer.faults.detach_content = true;

        state
            .set_display_port(
                &mut renderer,
                &mut tracer,
                &scale,
                port(0.0, 0.0, 100.0, 100.0, 2.0),
                ScrollOffset::ZERO,
            )
            .unwrap();
        assert!(renderer.log.is_empty());
        // A skipped update leaves the draw resolution alone.
        assert_eq!(state.draw_resolution(), 1.0);
    }

    #[test]
    fn injected_resolution_fault_surfaces_as_error() {
        let mut state = ViewportState::new();
        let mut renderer = RecordingRenderer::new();
        let mut tracer = Tracer::none();

        renderer.faults.fail_resolution = true;
        let result = state.set_zoom(&mut renderer, &mut tracer, 1.0, false);
        assert_eq!(result, Err(tideport_core::renderer::RenderError::Rejected));
        assert!(renderer.log.is_empty());
    }

    #[test]
    fn adapter_swallows_faults_and_recovers() {
        let mut adapter = PanZoomAdapter::default();
        let mut renderer = RecordingRenderer::new();
        let mut tracer = Tracer::none();
        let event = change(1.0, Some(port(0.0, 0.0, 360.0, 640.0, 1.0)));

        renderer.faults.fail_resolution = true;
        adapter.handle_viewport_change(&mut renderer, &mut tracer, &event);
        assert_eq!(renderer.count(InstructionKind::DisplayPort), 0);

        renderer.faults.fail_resolution = false;
        renderer.clear();
        adapter.handle_viewport_change(&mut renderer, &mut tracer, &event);
        assert_eq!(renderer.count(InstructionKind::DisplayPort), 1);
    }

    #[test]
    fn backgrounded_tab_tracks_zoom_without_resolution() {
        let mut adapter = PanZoomAdapter::default();
        let mut renderer = RecordingRenderer::new();
        let mut tracer = Tracer::none();

        adapter.state_mut().set_active(false);
        adapter.handle_viewport_change(&mut renderer, &mut tracer, &change(2.0, None));
        assert_eq!(adapter.state().zoom(), 2.0);
        assert_eq!(renderer.count(InstructionKind::Resolution), 0);

        // Foregrounding the tab lets the next material zoom change through.
        adapter.state_mut().set_active(true);
        renderer.clear();
        adapter.handle_viewport_change(&mut renderer, &mut tracer, &change(2.5, None));
        assert_eq!(renderer.count(InstructionKind::Resolution), 1);
    }

    #[test]
    fn gesture_forwarding_is_recorded_verbatim() {
        let mut adapter = PanZoomAdapter::default();
        let mut renderer = RecordingRenderer::new();
        let mut tracer = Tracer::none();

        adapter.handle_gesture(
            &mut renderer,
            &mut tracer,
            &tideport_core::adapter::GestureEvent::SingleTap { x: 5.0, y: 9.0 },
        );
        assert_eq!(
            renderer.log,
            [Instruction::ForwardInput(
                tideport_core::adapter::GestureEvent::SingleTap { x: 5.0, y: 9.0 }
            )]
        );
    }

    #[test]
    fn tracker_grades_clean_corrections_a() {
        let scale = AppUnitScale::DEFAULT;
        let mut tracker = ExpansionTracker::<64>::new();
        let scrolls = [
            ScrollOffset::ZERO,
            ScrollOffset::new(3.7, 0.0),
            ScrollOffset::new(1.3, 2.9),
        ];

        let mut last = None;
        for step in 0_u32..30 {
            let scroll = scrolls[step as usize % scrolls.len()];
            let req = port(f64::from(step), 0.0, f64::from(step) + 256.0, 256.0, 1.5);
            let corrected = compensate(&scale, req, scroll).request;
            last = Some(tracker.observe(ExpansionSample {
                requested_width: req.rect.width(),
                requested_height: req.rect.height(),
                simulated: simulate(&scale, &corrected, scroll),
            }));
        }
        let report = last.unwrap();
        assert_eq!(report.total_ports, 30);
        assert_eq!(report.shrunk_ports, 0, "corrector shrank a displayport");
        assert!(
            matches!(report.grade, ExpansionGrade::A | ExpansionGrade::B),
            "grade {} with {} expansions",
            report.grade.as_str(),
            report.expanded_ports,
        );
    }

    #[test]
    fn tracker_pins_shrinkage_at_d() {
        let mut tracker = ExpansionTracker::<8>::new();
        let report = tracker.observe(ExpansionSample {
            requested_width: 100.0,
            requested_height: 100.0,
            simulated: QuantizedRect {
                x: 0,
                y: 0,
                w: 99,
                h: 100,
            },
        });
        assert_eq!(report.grade, ExpansionGrade::D);
        assert_eq!(report.shrunk_ports, 1);
    }

    #[test]
    fn tracker_flags_uncorrected_expansion() {
        // Feed raw (uncompensated) simulations at an awkward scroll; at least
        // some must expand, which is exactly the over-fetch the corrector
        // exists to prevent.
        let scale = AppUnitScale::DEFAULT;
        let mut tracker = ExpansionTracker::<64>::new();
        let scroll = ScrollOffset::new(0.5, 0.0);

        let mut expanded = 0_u64;
        for step in 0_u32..20 {
            let req = port(f64::from(step) + 1.0, 0.0, f64::from(step) + 101.0, 50.0, 1.0);
            let report = tracker.observe(ExpansionSample {
                requested_width: req.rect.width(),
                requested_height: req.rect.height(),
                simulated: simulate(&scale, &req, scroll),
            });
            expanded = report.expanded_ports;
        }
        assert!(expanded > 0, "expected raw requests to over-expand");
    }
}
