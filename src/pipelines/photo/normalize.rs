// SPDX-License-Identifier: GPL-3.0-only

//! Frame orientation normalization
//!
//! Re-renders a captured frame so that stride padding is stripped and the
//! sensor rotation is baked into pixel order. Normalization is idempotent:
//! a frame that is already upright and tightly packed comes out byte
//! identical.

use crate::backends::camera::types::{Orientation, RawFrame};
use crate::constants::RGBA_BYTES_PER_PIXEL;
use image::RgbaImage;
use std::sync::Arc;
use tracing::warn;

/// An upright, tightly packed RGBA pixel buffer
#[derive(Clone, PartialEq, Eq)]
pub struct NormalizedFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
}

impl std::fmt::Debug for NormalizedFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NormalizedFrame({}x{}, {} bytes)",
            self.width,
            self.height,
            self.data.len()
        )
    }
}

/// Resolves orientation metadata into upright pixel order
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameNormalizer;

impl FrameNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a raw frame at its original resolution.
    ///
    /// There is no error path: if the pixel buffer cannot be re-rendered
    /// (dimensions do not match the data), the packed buffer is passed
    /// through unrotated.
    pub fn normalize(&self, frame: &RawFrame) -> NormalizedFrame {
        let packed = copy_rgba_without_stride(frame);

        if frame.orientation == Orientation::Upright {
            return NormalizedFrame {
                width: frame.width,
                height: frame.height,
                data: packed.into(),
            };
        }

        let Some(img) = RgbaImage::from_raw(frame.width, frame.height, packed.clone()) else {
            warn!(
                width = frame.width,
                height = frame.height,
                len = packed.len(),
                "Frame data does not match dimensions; passing through unrotated"
            );
            return NormalizedFrame {
                width: frame.width,
                height: frame.height,
                data: packed.into(),
            };
        };

        let rotated = match frame.orientation {
            Orientation::Upright => img,
            Orientation::Rotate90 => image::imageops::rotate90(&img),
            Orientation::Rotate180 => image::imageops::rotate180(&img),
            Orientation::Rotate270 => image::imageops::rotate270(&img),
        };

        NormalizedFrame {
            width: rotated.width(),
            height: rotated.height(),
            data: rotated.into_raw().into(),
        }
    }
}

/// Copy RGBA frame data without stride padding
fn copy_rgba_without_stride(frame: &RawFrame) -> Vec<u8> {
    let width = frame.width as usize;
    let height = frame.height as usize;
    let stride = frame.stride as usize;
    let row_bytes = width * RGBA_BYTES_PER_PIXEL;

    if stride == row_bytes && frame.data.len() == row_bytes * height {
        return frame.data.to_vec();
    }

    let mut result = Vec::with_capacity(row_bytes * height);
    for y in 0..height {
        let row_start = y * stride;
        let row_end = row_start + row_bytes;
        if row_end <= frame.data.len() {
            result.extend_from_slice(&frame.data[row_start..row_end]);
        }
    }
    result
}
