use std::fmt;

/// Barcode symbology of a decoded symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolFormat {
    /// Aztec 2D
    Aztec,
    /// Codabar 1D
    Codabar,
    /// Code 39 1D
    Code39,
    /// Code 93 1D
    Code93,
    /// Code 128 1D
    Code128,
    /// Data Matrix 2D
    DataMatrix,
    /// EAN-8 1D
    Ean8,
    /// EAN-13 1D
    Ean13,
    /// Interleaved 2 of 5 1D
    Itf,
    /// MaxiCode 2D
    MaxiCode,
    /// PDF417 stacked
    Pdf417,
    /// QR Code (Model 2)
    QrCode,
    /// GS1 DataBar (RSS-14)
    Rss14,
    /// GS1 DataBar Expanded
    RssExpanded,
    /// UPC-A 1D
    UpcA,
    /// UPC-E 1D
    UpcE,
    /// Produced by a decoder that does not report its symbology
    Unknown,
}

impl SymbolFormat {
    /// True for linear (1D) symbologies
    pub fn is_linear(&self) -> bool {
        matches!(
            self,
            SymbolFormat::Codabar
                | SymbolFormat::Code39
                | SymbolFormat::Code93
                | SymbolFormat::Code128
                | SymbolFormat::Ean8
                | SymbolFormat::Ean13
                | SymbolFormat::Itf
                | SymbolFormat::Rss14
                | SymbolFormat::RssExpanded
                | SymbolFormat::UpcA
                | SymbolFormat::UpcE
        )
    }
}

impl fmt::Display for SymbolFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolFormat::Aztec => "AZTEC",
            SymbolFormat::Codabar => "CODABAR",
            SymbolFormat::Code39 => "CODE_39",
            SymbolFormat::Code93 => "CODE_93",
            SymbolFormat::Code128 => "CODE_128",
            SymbolFormat::DataMatrix => "DATA_MATRIX",
            SymbolFormat::Ean8 => "EAN_8",
            SymbolFormat::Ean13 => "EAN_13",
            SymbolFormat::Itf => "ITF",
            SymbolFormat::MaxiCode => "MAXICODE",
            SymbolFormat::Pdf417 => "PDF_417",
            SymbolFormat::QrCode => "QR_CODE",
            SymbolFormat::Rss14 => "RSS_14",
            SymbolFormat::RssExpanded => "RSS_EXPANDED",
            SymbolFormat::UpcA => "UPC_A",
            SymbolFormat::UpcE => "UPC_E",
            SymbolFormat::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Optional details a decoder may attach to a symbol
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMetadata {
    /// Symbol version (QR: 1-40)
    pub version: Option<u8>,
    /// Error correction level as reported by the decoder
    pub ecc_level: Option<u8>,
    /// Mask pattern (QR: 0-7)
    pub mask: Option<u8>,
}

/// Decoded barcode payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Decoded text
    pub text: String,
    /// Symbology
    pub format: SymbolFormat,
    /// Decoder-specific details
    pub metadata: SymbolMetadata,
}

impl Symbol {
    /// Create a symbol with no metadata
    pub fn new(text: impl Into<String>, format: SymbolFormat) -> Self {
        Self {
            text: text.into(),
            format,
            metadata: SymbolMetadata::default(),
        }
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: SymbolMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!(SymbolFormat::Ean13.to_string(), "EAN_13");
        assert_eq!(SymbolFormat::QrCode.to_string(), "QR_CODE");
        assert!(SymbolFormat::Ean13.is_linear());
        assert!(!SymbolFormat::QrCode.is_linear());
    }
}
