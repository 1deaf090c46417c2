//! Scan configuration
//!
//! Defaults reproduce the camera app this pipeline was built for: try 90°
//! then 180°, convert directly, single-threaded. Every knob can be
//! overridden from the environment; unparsable values fall back to the
//! default.

use std::str::FromStr;

use crate::models::Rotation;
use crate::utils::jpeg::MAX_QUALITY;

/// Rotations tried by default, in order
pub const DEFAULT_ROTATIONS: [Rotation; 2] = [Rotation::Deg90, Rotation::Deg180];

/// How a planar frame becomes a raster image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConversionPath {
    /// Fixed-point YUV to RGB
    #[default]
    Direct,
    /// Direct conversion followed by a JPEG encode/decode at `quality`
    JpegRoundTrip {
        /// JPEG quality, 1-100
        quality: u8,
    },
}

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Orientations tried per frame, in order; the first hit wins
    pub rotations: Vec<Rotation>,
    /// Frame conversion path
    pub conversion: ConversionPath,
    /// Use Rayon for conversion and luminance when a frame has at least this
    /// many pixels; `None` keeps everything on the calling thread
    pub parallel_min_pixels: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            rotations: DEFAULT_ROTATIONS.to_vec(),
            conversion: ConversionPath::default(),
            parallel_min_pixels: None,
        }
    }
}

impl ScanConfig {
    /// Build from `SCAN_*` environment variables over the defaults
    ///
    /// - `SCAN_ROTATIONS`: comma separated angles, e.g. `90,180,0,270`
    /// - `SCAN_CONVERSION`: `direct` or `jpeg`
    /// - `SCAN_JPEG_QUALITY`: 1-100, used with `jpeg` (default 100)
    /// - `SCAN_PARALLEL_MIN_PIXELS`: pixel count threshold for Rayon
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ScanConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let rotations = lookup("SCAN_ROTATIONS")
            .and_then(|v| parse_rotations(&v))
            .unwrap_or(defaults.rotations);

        let quality = parse_or("SCAN_JPEG_QUALITY", &lookup, MAX_QUALITY).clamp(1, MAX_QUALITY);
        let conversion = match lookup("SCAN_CONVERSION").as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("jpeg") => ConversionPath::JpegRoundTrip { quality },
            Some(v) if v.eq_ignore_ascii_case("direct") => ConversionPath::Direct,
            _ => defaults.conversion,
        };

        let parallel_min_pixels = lookup("SCAN_PARALLEL_MIN_PIXELS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .or(defaults.parallel_min_pixels);

        Self {
            rotations,
            conversion,
            parallel_min_pixels,
        }
    }

    /// Replace the rotation list
    pub fn with_rotations(mut self, rotations: impl Into<Vec<Rotation>>) -> Self {
        self.rotations = rotations.into();
        self
    }

    /// Replace the conversion path
    pub fn with_conversion(mut self, conversion: ConversionPath) -> Self {
        self.conversion = conversion;
        self
    }

    /// Enable Rayon above `min_pixels`
    pub fn with_parallel_min_pixels(mut self, min_pixels: usize) -> Self {
        self.parallel_min_pixels = Some(min_pixels);
        self
    }

    /// Whether a frame of `pixels` pixels should be processed in parallel
    pub fn use_parallel(&self, pixels: usize) -> bool {
        parallel_enabled(self.parallel_min_pixels, pixels)
    }
}

/// Whether `pixels` reaches an optional Rayon threshold
pub(crate) fn parallel_enabled(min_pixels: Option<usize>, pixels: usize) -> bool {
    min_pixels.is_some_and(|min| pixels >= min)
}

fn parse_or<T, F>(name: &str, lookup: &F, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Parse a comma separated angle list; `None` if any entry is invalid or the
/// list is empty
pub fn parse_rotations(value: &str) -> Option<Vec<Rotation>> {
    let rotations = value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Rotation>().ok())
        .collect::<Option<Vec<_>>>()?;
    if rotations.is_empty() {
        None
    } else {
        Some(rotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ScanConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ScanConfig::default());
        assert_eq!(config.rotations, vec![Rotation::Deg90, Rotation::Deg180]);
        assert_eq!(config.conversion, ConversionPath::Direct);
        assert!(!config.use_parallel(usize::MAX));
    }

    #[test]
    fn test_env_overrides() {
        let config = ScanConfig::from_lookup(lookup(&[
            ("SCAN_ROTATIONS", "0, 90,180 ,270"),
            ("SCAN_CONVERSION", "JPEG"),
            ("SCAN_JPEG_QUALITY", "85"),
            ("SCAN_PARALLEL_MIN_PIXELS", "1000"),
        ]));
        assert_eq!(config.rotations, Rotation::ALL.to_vec());
        assert_eq!(config.conversion, ConversionPath::JpegRoundTrip { quality: 85 });
        assert!(config.use_parallel(1000));
        assert!(!config.use_parallel(999));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = ScanConfig::from_lookup(lookup(&[
            ("SCAN_ROTATIONS", "90,45"),
            ("SCAN_CONVERSION", "magic"),
            ("SCAN_PARALLEL_MIN_PIXELS", "lots"),
        ]));
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn test_quality_clamped() {
        let config = ScanConfig::from_lookup(lookup(&[
            ("SCAN_CONVERSION", "jpeg"),
            ("SCAN_JPEG_QUALITY", "0"),
        ]));
        assert_eq!(config.conversion, ConversionPath::JpegRoundTrip { quality: 1 });
    }

    #[test]
    fn test_parallel_threshold() {
        assert!(!parallel_enabled(None, usize::MAX));
        assert!(parallel_enabled(Some(0), 0));
        assert!(parallel_enabled(Some(10), 10));
        assert!(!parallel_enabled(Some(10), 9));
    }

    #[test]
    fn test_parse_rotations_empty() {
        assert_eq!(parse_rotations(""), None);
        assert_eq!(parse_rotations(" , "), None);
    }
}
