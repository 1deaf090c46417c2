//! Utility functions for image processing
//!
//! This module provides the pixel-level helpers used by the scan pipeline:
//! - YUV 4:2:0 assembly and colour conversion
//! - JPEG round trip for the compressed-intermediate conversion path
//! - Luminance extraction (ARGB to 8-bit grey)
//! - Quarter-turn rotation

pub mod jpeg;
pub mod luminance;
pub mod rotate;
pub mod yuv;
