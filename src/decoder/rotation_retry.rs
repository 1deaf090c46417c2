//! Multi-orientation decode loop
//!
//! A handheld camera sees the symbol at an arbitrary orientation. The raster
//! is rotated through a configured list of angles and the decoder runs once
//! per angle; the first hit ends the loop. Misses and decoder faults are
//! both treated as "try the next angle" and never reach the host as errors,
//! but every attempt is recorded in the [`RetryReport`].

use tracing::{debug, debug_span};

use super::{LuminanceSource, SymbolDecoder};
use crate::config::{DEFAULT_ROTATIONS, ScanConfig, parallel_enabled};
use crate::error::DecodeError;
use crate::models::{RasterImage, Rotation, Symbol};
use crate::utils::rotate;

/// Result of one decode attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A symbol was decoded
    Found,
    /// The decoder saw nothing
    NotFound,
    /// The decoder failed for another reason
    Fault(String),
}

/// One orientation tried for a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeAttempt {
    /// Rotation applied before decoding
    pub rotation: Rotation,
    /// What the decoder returned
    pub outcome: AttemptOutcome,
}

/// Everything the retry loop did for one image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryReport {
    /// First decoded symbol, if any
    pub symbol: Option<Symbol>,
    /// Attempts in the order they ran
    pub attempts: Vec<DecodeAttempt>,
}

impl RetryReport {
    /// True if a symbol was decoded
    pub fn is_hit(&self) -> bool {
        self.symbol.is_some()
    }

    /// Rotation that produced the symbol
    pub fn winning_rotation(&self) -> Option<Rotation> {
        self.attempts
            .iter()
            .find(|a| a.outcome == AttemptOutcome::Found)
            .map(|a| a.rotation)
    }

    /// Number of attempts that ended in a decoder fault
    pub fn fault_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, AttemptOutcome::Fault(_)))
            .count()
    }
}

/// Runs a [`SymbolDecoder`] over a fixed, ordered list of rotations
#[derive(Debug, Clone)]
pub struct RotationRetryDecoder<D> {
    decoder: D,
    rotations: Vec<Rotation>,
    parallel_min_pixels: Option<usize>,
}

impl<D: SymbolDecoder> RotationRetryDecoder<D> {
    /// Use the default rotation list (90°, then 180°)
    pub fn new(decoder: D) -> Self {
        Self::with_rotations(decoder, DEFAULT_ROTATIONS)
    }

    /// Use the rotations and threading settings of `config`
    pub fn from_config(decoder: D, config: &ScanConfig) -> Self {
        Self {
            decoder,
            rotations: config.rotations.clone(),
            parallel_min_pixels: config.parallel_min_pixels,
        }
    }

    /// Use an explicit rotation list
    pub fn with_rotations(decoder: D, rotations: impl Into<Vec<Rotation>>) -> Self {
        Self {
            decoder,
            rotations: rotations.into(),
            parallel_min_pixels: None,
        }
    }

    /// Rotations tried, in order
    pub fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }

    /// The wrapped decoder
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Try each rotation until one decodes
    pub fn decode(&self, image: &RasterImage) -> RetryReport {
        let mut report = RetryReport::default();

        for &rotation in &self.rotations {
            let _span = debug_span!("decode_attempt", degrees = rotation.degrees()).entered();

            let candidate = rotate::candidate(image, rotation);
            let source = if parallel_enabled(self.parallel_min_pixels, candidate.image.len()) {
                LuminanceSource::from_raster_parallel(&candidate.image)
            } else {
                LuminanceSource::from_raster(&candidate.image)
            };

            let outcome = match self.decoder.decode(&source) {
                Ok(symbol) => {
                    debug!(text = %symbol.text, format = %symbol.format, "symbol decoded");
                    report.symbol = Some(symbol);
                    AttemptOutcome::Found
                }
                Err(DecodeError::NotFound) => AttemptOutcome::NotFound,
                Err(DecodeError::Fault(reason)) => {
                    debug!(%reason, "decoder fault treated as miss");
                    AttemptOutcome::Fault(reason)
                }
            };
            report.attempts.push(DecodeAttempt { rotation, outcome });

            if report.symbol.is_some() {
                break;
            }
        }

        report
    }
}
