//! Host-facing callbacks
//!
//! The pipeline never touches UI state. It reports through two independent
//! sinks, called synchronously on the analysing thread; forwarding to a UI
//! thread is up to the host.

use crate::models::{DiagnosticReport, Symbol};

/// Receives the plane-size report of every analysed frame
pub trait DiagnosticSink {
    /// Called once per frame, before any decode attempt
    fn on_diagnostic(&self, report: &DiagnosticReport);
}

/// Receives decoded symbols
pub trait ResultSink {
    /// Called at most once per frame, only on a successful decode
    fn on_barcode_detected(&self, symbol: &Symbol);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&DiagnosticReport),
{
    fn on_diagnostic(&self, report: &DiagnosticReport) {
        self(report)
    }
}

impl<F> ResultSink for F
where
    F: Fn(&Symbol),
{
    fn on_barcode_detected(&self, symbol: &Symbol) {
        self(symbol)
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl DiagnosticSink for Discard {
    fn on_diagnostic(&self, _report: &DiagnosticReport) {}
}

impl ResultSink for Discard {
    fn on_barcode_detected(&self, _symbol: &Symbol) {}
}
