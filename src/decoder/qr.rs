//! QR decoding backed by `rqrr`

use rqrr::PreparedImage;
use tracing::trace;

use super::{LuminanceSource, SymbolDecoder};
use crate::error::DecodeError;
use crate::models::{Symbol, SymbolFormat, SymbolMetadata};

/// Decodes the first readable QR code in an image
#[derive(Debug, Clone, Copy, Default)]
pub struct QrDecoder;

impl QrDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }
}

impl SymbolDecoder for QrDecoder {
    fn decode(&self, source: &LuminanceSource) -> Result<Symbol, DecodeError> {
        if source.width() == 0 || source.height() == 0 {
            return Err(DecodeError::NotFound);
        }

        let mut prepared =
            PreparedImage::prepare_from_greyscale(source.width(), source.height(), |x, y| {
                source.get(x, y)
            });
        let grids = prepared.detect_grids();
        trace!(grids = grids.len(), "qr grid detection");

        if grids.is_empty() {
            return Err(DecodeError::NotFound);
        }

        // A grid can be a false positive; only fail if none of them decode
        let mut last_fault = None;
        for grid in &grids {
            match grid.decode() {
                Ok((meta, content)) => {
                    let metadata = SymbolMetadata {
                        version: u8::try_from(meta.version.0).ok(),
                        ecc_level: u8::try_from(meta.ecc_level).ok(),
                        mask: u8::try_from(meta.mask).ok(),
                    };
                    return Ok(Symbol::new(content, SymbolFormat::QrCode).with_metadata(metadata));
                }
                Err(err) => last_fault = Some(err.to_string()),
            }
        }

        Err(DecodeError::Fault(
            last_fault.unwrap_or_else(|| "grid decode failed".to_string()),
        ))
    }
}
