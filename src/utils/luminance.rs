//! Convert ARGB pixels to 8-bit luminance for binarization
//!
//! Grey pixels (R == G == B) pass through unchanged; everything else uses the
//! cheap green-weighted average Y = (R + 2G + B) / 4.
//!
//! - Scalar path: manual 8x loop unrolling
//! - Parallel path: rows processed with Rayon

use rayon::prelude::*;

#[inline(always)]
fn argb_luma(pixel: u32) -> u8 {
    let r = (pixel >> 16) & 0xFF;
    let g = (pixel >> 8) & 0xFF;
    let b = pixel & 0xFF;
    if r == g && g == b {
        r as u8
    } else {
        ((r + 2 * g + b) / 4) as u8
    }
}

/// Convert ARGB pixels to luminance
pub fn argb_to_luminance(argb: &[u32], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut luma = vec![0u8; pixel_count];
    argb_to_luminance_into(&argb[..pixel_count], &mut luma);
    luma
}

/// Convert ARGB pixels into a caller-provided buffer of the same length
pub fn argb_to_luminance_into(argb: &[u32], luma: &mut [u8]) {
    let pixel_count = argb.len().min(luma.len());
    let mut i = 0;

    // Process 8 pixels at a time
    while i + 8 <= pixel_count {
        luma[i] = argb_luma(argb[i]);
        luma[i + 1] = argb_luma(argb[i + 1]);
        luma[i + 2] = argb_luma(argb[i + 2]);
        luma[i + 3] = argb_luma(argb[i + 3]);
        luma[i + 4] = argb_luma(argb[i + 4]);
        luma[i + 5] = argb_luma(argb[i + 5]);
        luma[i + 6] = argb_luma(argb[i + 6]);
        luma[i + 7] = argb_luma(argb[i + 7]);
        i += 8;
    }

    // Process remaining pixels
    for j in i..pixel_count {
        luma[j] = argb_luma(argb[j]);
    }
}

/// Convert ARGB to luminance using parallel processing
/// Processes rows in parallel for multi-core speedup
pub fn argb_to_luminance_parallel(argb: &[u32], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut luma = vec![0u8; pixel_count];
    if width == 0 {
        return luma;
    }

    luma.par_chunks_mut(width)
        .zip(argb[..pixel_count].par_chunks(width))
        .for_each(|(out, row)| argb_to_luminance_into(row, out));

    luma
}
