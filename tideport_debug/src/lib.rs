// Copyright 2026 the Tideport Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event collection, pretty-printing, and Chrome trace export for tideport
//! diagnostics.
//!
//! This crate provides [`TraceSink`](tideport_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`collect::CollectingSink`] — records events as owned values for
//!   inspection and export.
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`chrome::export`] — writes Chrome Trace Event Format JSON from
//!   collected events.

pub mod chrome;
pub mod collect;
pub mod pretty;
