//! Multi-format decoding (1D and 2D) backed by `rxing`
//!
//! Binarizes with the hybrid (local block) binarizer and lets the
//! multi-format reader try every symbology it knows, the way a ZXing
//! `MultiFormatReader` does without hints.

use rxing::common::HybridBinarizer;
use rxing::{
    BarcodeFormat, BinaryBitmap, Exceptions, Luma8LuminanceSource, MultiFormatReader, Reader,
};
use tracing::trace;

use super::{LuminanceSource, SymbolDecoder};
use crate::error::DecodeError;
use crate::models::{Symbol, SymbolFormat};

/// Decodes the first barcode of any supported symbology
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiFormatDecoder;

impl MultiFormatDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }
}

impl SymbolDecoder for MultiFormatDecoder {
    fn decode(&self, source: &LuminanceSource) -> Result<Symbol, DecodeError> {
        if source.width() == 0 || source.height() == 0 {
            return Err(DecodeError::NotFound);
        }

        let luma = Luma8LuminanceSource::new(
            source.as_bytes().to_vec(),
            source.width() as u32,
            source.height() as u32,
        );
        let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(luma));

        // The reader keeps per-call state, so one is built per image
        let mut reader = MultiFormatReader::default();
        match reader.decode(&mut bitmap) {
            Ok(result) => {
                let format = symbol_format(result.getBarcodeFormat());
                trace!(%format, "multi-format decode");
                Ok(Symbol::new(result.getText(), format))
            }
            Err(Exceptions::NotFoundException(_)) => Err(DecodeError::NotFound),
            Err(err) => Err(DecodeError::Fault(err.to_string())),
        }
    }
}

/// Map a reader symbology onto [`SymbolFormat`]
pub fn symbol_format(format: &BarcodeFormat) -> SymbolFormat {
    match format {
        BarcodeFormat::AZTEC => SymbolFormat::Aztec,
        BarcodeFormat::CODABAR => SymbolFormat::Codabar,
        BarcodeFormat::CODE_39 => SymbolFormat::Code39,
        BarcodeFormat::CODE_93 => SymbolFormat::Code93,
        BarcodeFormat::CODE_128 => SymbolFormat::Code128,
        BarcodeFormat::DATA_MATRIX => SymbolFormat::DataMatrix,
        BarcodeFormat::EAN_8 => SymbolFormat::Ean8,
        BarcodeFormat::EAN_13 => SymbolFormat::Ean13,
        BarcodeFormat::ITF => SymbolFormat::Itf,
        BarcodeFormat::MAXICODE => SymbolFormat::MaxiCode,
        BarcodeFormat::PDF_417 => SymbolFormat::Pdf417,
        BarcodeFormat::QR_CODE => SymbolFormat::QrCode,
        BarcodeFormat::RSS_14 => SymbolFormat::Rss14,
        BarcodeFormat::RSS_EXPANDED => SymbolFormat::RssExpanded,
        BarcodeFormat::UPC_A => SymbolFormat::UpcA,
        BarcodeFormat::UPC_E => SymbolFormat::UpcE,
        _ => SymbolFormat::Unknown,
    }
}
