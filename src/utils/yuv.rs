//! YUV 4:2:0 handling: NV21 assembly and full-range BT.601 colour conversion
//!
//! Coefficients follow JFIF (full range, no headroom), the same mapping a
//! JPEG codec applies, so converting directly gives the pixels a
//! compress-then-decode detour would give, minus quantisation.
//!
//! All arithmetic is 16.16 fixed point:
//! - R = Y + 1.402 (V - 128)
//! - G = Y - 0.344136 (U - 128) - 0.714136 (V - 128)
//! - B = Y + 1.772 (U - 128)

use bytes::Bytes;
use image::RgbImage;
use rayon::prelude::*;

use crate::models::{FramePlanes, Plane};

const SHIFT: i32 = 16;
const HALF: i32 = 1 << (SHIFT - 1);

// YUV -> RGB
const V_TO_R: i32 = 91_881;
const U_TO_G: i32 = 22_554;
const V_TO_G: i32 = 46_802;
const U_TO_B: i32 = 116_130;

// RGB -> YUV (the three luma weights sum to 1 << SHIFT)
const R_TO_Y: i32 = 19_595;
const G_TO_Y: i32 = 38_470;
const B_TO_Y: i32 = 7_471;
const R_TO_U: i32 = -11_059;
const G_TO_U: i32 = -21_709;
const B_TO_U: i32 = 32_768;
const R_TO_V: i32 = 32_768;
const G_TO_V: i32 = -27_439;
const B_TO_V: i32 = -5_329;

/// Geometry of an NV21 buffer for given pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nv21Layout {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl Nv21Layout {
    /// Layout for `width` x `height`
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Chroma samples per row
    pub fn chroma_width(&self) -> usize {
        self.width.div_ceil(2)
    }

    /// Chroma rows
    pub fn chroma_height(&self) -> usize {
        self.height.div_ceil(2)
    }

    /// Bytes of the luma block
    pub fn luma_len(&self) -> usize {
        self.width * self.height
    }

    /// Bytes between two chroma rows (V and U interleaved)
    pub fn chroma_stride(&self) -> usize {
        self.chroma_width() * 2
    }

    /// Bytes of the interleaved VU block
    pub fn chroma_len(&self) -> usize {
        self.chroma_stride() * self.chroma_height()
    }

    /// Minimum bytes of a complete NV21 buffer
    pub fn total_len(&self) -> usize {
        self.luma_len() + self.chroma_len()
    }
}

/// Concatenate the planes as Y, then V, then U
///
/// Only the bytes each plane actually holds are copied; strides are ignored.
/// With a camera's semi-planar output (pixel stride 2) the V plane already
/// carries the interleaved VU samples, so this yields NV21.
///
/// Row padding is not removed. A luma plane whose row stride exceeds the
/// width still passes size validation, but its rows land shifted in the
/// assembled buffer and the picture comes out sheared, which in practice
/// means a decode miss rather than an error.
pub fn assemble_nv21(planes: &FramePlanes) -> Vec<u8> {
    let y = planes.y.as_bytes();
    let v = planes.v.as_bytes();
    let u = planes.u.as_bytes();

    let mut nv21 = Vec::with_capacity(y.len() + v.len() + u.len());
    nv21.extend_from_slice(y);
    nv21.extend_from_slice(v);
    nv21.extend_from_slice(u);
    nv21
}

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[inline]
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = y + ((V_TO_R * v + HALF) >> SHIFT);
    let g = y - ((U_TO_G * u + V_TO_G * v + HALF) >> SHIFT);
    let b = y + ((U_TO_B * u + HALF) >> SHIFT);
    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

fn convert_row(nv21: &[u8], layout: Nv21Layout, y: usize, row: &mut [u8]) {
    let luma_row = &nv21[y * layout.width..(y + 1) * layout.width];
    let chroma_start = layout.luma_len() + (y / 2) * layout.chroma_stride();
    let chroma_row = &nv21[chroma_start..chroma_start + layout.chroma_stride()];

    for (x, (out, &luma)) in row.chunks_exact_mut(3).zip(luma_row).enumerate() {
        let c = (x / 2) * 2;
        let rgb = yuv_to_rgb(luma, chroma_row[c + 1], chroma_row[c]);
        out.copy_from_slice(&rgb);
    }
}

/// Convert an NV21 buffer to packed RGB
///
/// # Panics
/// If `nv21` is shorter than [`Nv21Layout::total_len`]. Callers validate
/// plane sizes before getting here.
pub fn nv21_to_rgb(nv21: &[u8], width: usize, height: usize) -> Vec<u8> {
    let layout = Nv21Layout::new(width, height);
    assert!(nv21.len() >= layout.total_len(), "NV21 buffer too short");

    let mut rgb = vec![0u8; width * height * 3];
    for (y, row) in rgb.chunks_exact_mut(width * 3).enumerate() {
        convert_row(nv21, layout, y, row);
    }
    rgb
}

/// Row-parallel variant of [`nv21_to_rgb`]; output is identical
pub fn nv21_to_rgb_parallel(nv21: &[u8], width: usize, height: usize) -> Vec<u8> {
    let layout = Nv21Layout::new(width, height);
    assert!(nv21.len() >= layout.total_len(), "NV21 buffer too short");

    let mut rgb = vec![0u8; width * height * 3];
    rgb.par_chunks_exact_mut(width * 3)
        .enumerate()
        .for_each(|(y, row)| convert_row(nv21, layout, y, row));
    rgb
}

#[inline]
fn rgb_to_luma(p: &[u8]) -> u8 {
    let (r, g, b) = (p[0] as i32, p[1] as i32, p[2] as i32);
    clamp_u8((R_TO_Y * r + G_TO_Y * g + B_TO_Y * b + HALF) >> SHIFT)
}

/// Encode an RGB image as camera-style semi-planar 4:2:0 planes
///
/// Chroma is averaged over each 2x2 block. Like a camera HAL exposing NV21
/// memory, the V and U planes alias one interleaved VU buffer (pixel stride
/// 2): the V plane starts at the first V sample and the U plane one byte
/// later, so reassembling Y, V, U reproduces the NV21 buffer.
pub fn planes_from_rgb(image: &RgbImage) -> FramePlanes {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let layout = Nv21Layout::new(width, height);
    let rgb = image.as_raw();

    let luma: Vec<u8> = rgb.chunks_exact(3).map(rgb_to_luma).collect();

    let mut vu = vec![128u8; layout.chroma_len()];
    for cy in 0..layout.chroma_height() {
        for cx in 0..layout.chroma_width() {
            let (mut sr, mut sg, mut sb, mut n) = (0i32, 0i32, 0i32, 0i32);
            for y in (cy * 2)..(cy * 2 + 2).min(height) {
                for x in (cx * 2)..(cx * 2 + 2).min(width) {
                    let idx = (y * width + x) * 3;
                    sr += rgb[idx] as i32;
                    sg += rgb[idx + 1] as i32;
                    sb += rgb[idx + 2] as i32;
                    n += 1;
                }
            }
            let (r, g, b) = (sr / n, sg / n, sb / n);
            let u = 128 + ((R_TO_U * r + G_TO_U * g + B_TO_U * b + HALF) >> SHIFT);
            let v = 128 + ((R_TO_V * r + G_TO_V * g + B_TO_V * b + HALF) >> SHIFT);
            let idx = cy * layout.chroma_stride() + cx * 2;
            vu[idx] = clamp_u8(v);
            vu[idx + 1] = clamp_u8(u);
        }
    }

    let vu = Bytes::from(vu);
    let u_plane = vu.slice(1..);
    FramePlanes::new(
        Plane::packed(luma, width),
        Plane::new(u_plane, layout.chroma_stride(), 2),
        Plane::new(vu, layout.chroma_stride(), 2),
    )
}
