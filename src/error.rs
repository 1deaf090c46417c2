//! Error types for frame conversion and symbol decoding

use thiserror::Error;

use crate::models::PlaneKind;

/// Conversion failure for a single frame
///
/// The frame is abandoned; the stream of later frames is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Width or height is zero
    #[error("frame has empty dimensions {width}x{height}")]
    EmptyFrame {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
    },
    /// A single plane holds fewer bytes than the declared size needs
    #[error("{plane} plane too small: need {required} bytes, got {actual}")]
    PlaneTooSmall {
        /// Which plane
        plane: PlaneKind,
        /// Bytes needed for the declared dimensions
        required: usize,
        /// Bytes actually present
        actual: usize,
    },
    /// The two chroma planes together cannot cover the subsampled grid
    #[error("chroma planes too small: need {required} bytes, got {actual}")]
    ChromaTooSmall {
        /// Bytes needed for the interleaved chroma block
        required: usize,
        /// Sum of U and V plane bytes
        actual: usize,
    },
    /// The compressed intermediate could not be encoded or decoded
    #[error("intermediate image codec failed: {0}")]
    Intermediate(String),
}

impl From<image::ImageError> for FormatError {
    fn from(err: image::ImageError) -> Self {
        FormatError::Intermediate(err.to_string())
    }
}

/// Failure reported by a decode capability for one orientation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No symbol is visible in the image
    #[error("no symbol found")]
    NotFound,
    /// A symbol-like region was found but could not be decoded
    #[error("decoder fault: {0}")]
    Fault(String),
}

impl DecodeError {
    /// True for the expected "nothing here" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, DecodeError::NotFound)
    }
}
