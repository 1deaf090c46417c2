//! frame_scan - camera frame to barcode pipeline
//!
//! Takes planar YUV 4:2:0 camera frames one at a time, converts each into an
//! RGB raster, and tries to decode a barcode from a fixed, ordered list of
//! rotated copies. The host gets the plane sizes of every frame and at most
//! one decoded symbol per frame, through two independent callbacks.
//!
//! ```
//! use frame_scan::{FrameAnalyzer, RawFrame, ScanConfig, Symbol, DiagnosticReport};
//! use frame_scan::utils::yuv::planes_from_rgb;
//!
//! let analyzer = FrameAnalyzer::qr(
//!     &ScanConfig::default(),
//!     |report: &DiagnosticReport| println!("{report}"),
//!     |symbol: &Symbol| println!("Barcode detected: {}", symbol.text),
//! );
//! let planes = planes_from_rgb(&image::RgbImage::new(64, 48));
//! let outcome = analyzer.analyze(RawFrame::new(64, 48, planes));
//! assert!(outcome.symbol().is_none());
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Scan configuration (rotations, conversion path, threading)
pub mod config;
/// Frame conversion (planar YUV to raster)
pub mod convert;
/// Decode capability, barcode backends and the rotation-retry loop
pub mod decoder;
/// Error types
pub mod error;
/// Core data structures (frames, rasters, symbols, reports)
pub mod models;
/// Per-frame analysis
pub mod pipeline;
/// Worker thread with keep-only-latest backpressure
pub mod session;
/// Host callbacks
pub mod sink;
/// Image loading helpers for the CLI, benches and tests
pub mod tools;
/// Utility functions (YUV, JPEG, luminance, rotation)
pub mod utils;

pub use config::{ConversionPath, ScanConfig};
pub use convert::FrameConverter;
pub use decoder::multi::MultiFormatDecoder;
pub use decoder::qr::QrDecoder;
pub use decoder::rotation_retry::{
    AttemptOutcome, DecodeAttempt, RetryReport, RotationRetryDecoder,
};
pub use decoder::{LuminanceSource, SymbolDecoder};
pub use error::{DecodeError, FormatError};
pub use models::{
    DiagnosticReport, FramePlanes, Plane, PlaneKind, RasterImage, RawFrame, Rotation, Symbol,
    SymbolFormat, SymbolMetadata,
};
pub use pipeline::{FrameAnalyzer, FrameOutcome};
pub use session::{CameraPermission, ScanSession, SessionStats, SubmitStatus, detection_label};
pub use sink::{DiagnosticSink, ResultSink};

/// Analyze a single frame with the multi-format decoder and default settings
///
/// Convenience wrapper for one-off use; keep a [`FrameAnalyzer`] around when
/// processing a stream.
pub fn scan_frame<S, R>(frame: RawFrame, diagnostics: S, results: R) -> FrameOutcome
where
    S: DiagnosticSink,
    R: ResultSink,
{
    FrameAnalyzer::multi_format(&ScanConfig::default(), diagnostics, results).analyze(frame)
}
