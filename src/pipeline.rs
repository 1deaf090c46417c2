//! Per-frame analysis: diagnostics, conversion, rotation-retry decode

use tracing::{debug, trace_span};

use crate::config::ScanConfig;
use crate::convert::FrameConverter;
use crate::decoder::SymbolDecoder;
use crate::decoder::multi::MultiFormatDecoder;
use crate::decoder::qr::QrDecoder;
use crate::decoder::rotation_retry::{RetryReport, RotationRetryDecoder};
use crate::error::FormatError;
use crate::models::{RawFrame, Symbol};
use crate::sink::{DiagnosticSink, ResultSink};

/// What happened to one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame carried no image; nothing was reported
    Skipped,
    /// Conversion failed; no decode was attempted
    Rejected(FormatError),
    /// Every orientation missed
    Missed(RetryReport),
    /// A symbol was decoded and delivered to the result sink
    Detected(RetryReport),
}

impl FrameOutcome {
    /// Decoded symbol, if any
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            FrameOutcome::Detected(report) => report.symbol.as_ref(),
            _ => None,
        }
    }

    /// Retry details, if decoding ran
    pub fn retry_report(&self) -> Option<&RetryReport> {
        match self {
            FrameOutcome::Missed(report) | FrameOutcome::Detected(report) => Some(report),
            _ => None,
        }
    }
}

/// Stateless frame analyzer
///
/// Holds only immutable configuration. Each call to
/// [`FrameAnalyzer::analyze`] consumes one frame, reports its plane sizes,
/// converts it, and reports at most one symbol.
pub struct FrameAnalyzer<D, S, R> {
    converter: FrameConverter,
    decoder: RotationRetryDecoder<D>,
    diagnostics: S,
    results: R,
}

impl<S, R> FrameAnalyzer<QrDecoder, S, R>
where
    S: DiagnosticSink,
    R: ResultSink,
{
    /// Analyzer using the built-in QR decoder
    pub fn qr(config: &ScanConfig, diagnostics: S, results: R) -> Self {
        Self::new(config, QrDecoder::new(), diagnostics, results)
    }
}

impl<S, R> FrameAnalyzer<MultiFormatDecoder, S, R>
where
    S: DiagnosticSink,
    R: ResultSink,
{
    /// Analyzer reading every symbology `rxing` supports, 1D included
    pub fn multi_format(config: &ScanConfig, diagnostics: S, results: R) -> Self {
        Self::new(config, MultiFormatDecoder::new(), diagnostics, results)
    }
}

impl<D, S, R> FrameAnalyzer<D, S, R>
where
    D: SymbolDecoder,
    S: DiagnosticSink,
    R: ResultSink,
{
    /// Build an analyzer from its parts
    pub fn new(config: &ScanConfig, decoder: D, diagnostics: S, results: R) -> Self {
        Self {
            converter: FrameConverter::new(config),
            decoder: RotationRetryDecoder::from_config(decoder, config),
            diagnostics,
            results,
        }
    }

    /// Analyze one frame
    ///
    /// The frame is consumed; its release hook runs when this call returns,
    /// whatever the outcome.
    pub fn analyze(&self, frame: RawFrame) -> FrameOutcome {
        let _span =
            trace_span!("analyze", width = frame.width(), height = frame.height()).entered();

        let Some(planes) = frame.planes() else {
            debug!("frame without image, skipping");
            return FrameOutcome::Skipped;
        };

        let raster =
            match self
                .converter
                .convert(planes, frame.width(), frame.height(), &self.diagnostics)
            {
                Ok(raster) => raster,
                Err(err) => return FrameOutcome::Rejected(err),
            };

        let report = self.decoder.decode(&raster);
        match &report.symbol {
            Some(symbol) => {
                self.results.on_barcode_detected(symbol);
                FrameOutcome::Detected(report)
            }
            None => FrameOutcome::Missed(report),
        }
    }

    /// Rotations tried per frame
    pub fn rotations(&self) -> &[crate::models::Rotation] {
        self.decoder.rotations()
    }
}
