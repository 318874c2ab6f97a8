// SPDX-License-Identifier: GPL-3.0-only

//! Mask compositing
//!
//! Blends a normalized frame with a segmentation mask so everything outside
//! the mask becomes transparent. All failure modes fall back to returning the
//! frame unchanged, so a consumer cannot distinguish "no foreground" from
//! "blend failed" by looking at the output.

use crate::constants::RGBA_BYTES_PER_PIXEL;
use crate::pipelines::photo::normalize::NormalizedFrame;
use crate::pipelines::photo::segmentation::SegmentationMask;
use std::sync::Arc;
use tracing::{debug, warn};

/// Final RGBA image published by the pipeline
#[derive(Clone, PartialEq, Eq)]
pub struct CompositedImage {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
}

impl std::fmt::Debug for CompositedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CompositedImage({}x{}, {} bytes)",
            self.width,
            self.height,
            self.data.len()
        )
    }
}

/// Applies a segmentation mask as the frame's alpha channel
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositingEngine;

impl CompositingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Composite the frame over a transparent background.
    ///
    /// An empty mask is the explicit fallback: the frame is returned
    /// unchanged. For an alpha mask, each output pixel keeps the source
    /// colour with its alpha scaled by the mask, so masked-out regions are
    /// fully transparent and fully-covered regions are untouched.
    pub fn composite(&self, frame: &NormalizedFrame, mask: &SegmentationMask) -> CompositedImage {
        let (mask_width, mask_height, mask_data) = match mask {
            SegmentationMask::Empty => {
                debug!("Empty mask; returning frame unchanged");
                return Self::passthrough(frame);
            }
            SegmentationMask::Alpha { width, height, data } => (*width, *height, data),
        };

        if mask_width != frame.width || mask_height != frame.height {
            warn!(
                mask_width,
                mask_height,
                frame_width = frame.width,
                frame_height = frame.height,
                "Mask does not match frame; returning frame unchanged"
            );
            return Self::passthrough(frame);
        }

        let pixel_count = frame.width as usize * frame.height as usize;
        if frame.data.len() < pixel_count * RGBA_BYTES_PER_PIXEL || mask_data.len() < pixel_count {
            warn!("Cannot materialize output buffer; returning frame unchanged");
            return Self::passthrough(frame);
        }

        let mut out = frame.data.to_vec();
        for (i, coverage) in mask_data.iter().enumerate() {
            let alpha = &mut out[i * RGBA_BYTES_PER_PIXEL + 3];
            *alpha = ((*alpha as u16 * *coverage as u16) / 255) as u8;
        }

        CompositedImage {
            width: frame.width,
            height: frame.height,
            data: out.into(),
        }
    }

    fn passthrough(frame: &NormalizedFrame) -> CompositedImage {
        CompositedImage {
            width: frame.width,
            height: frame.height,
            data: Arc::clone(&frame.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32, data: Vec<u8>) -> NormalizedFrame {
        NormalizedFrame {
            width,
            height,
            data: Arc::from(data.as_slice()),
        }
    }

    #[test]
    fn test_empty_mask_identity() {
        let f = frame(2, 1, vec![10, 20, 30, 255, 40, 50, 60, 255]);
        let out = CompositingEngine::new().composite(&f, &SegmentationMask::Empty);

        assert_eq!(out.width, 2);
        assert_eq!(out.height, 1);
        assert_eq!(out.data, f.data);
    }

    #[test]
    fn test_background_becomes_transparent() {
        let f = frame(2, 1, vec![10, 20, 30, 255, 40, 50, 60, 255]);
        let mask = SegmentationMask::Alpha {
            width: 2,
            height: 1,
            data: Arc::from(vec![255u8, 0].as_slice()),
        };
        let out = CompositingEngine::new().composite(&f, &mask);

        // Foreground pixel equals the input
        assert_eq!(&out.data[0..4], &[10, 20, 30, 255]);
        // Background pixel is fully transparent
        assert_eq!(out.data[7], 0);
    }

    #[test]
    fn test_partial_coverage_scales_alpha() {
        let f = frame(1, 1, vec![100, 100, 100, 255]);
        let mask = SegmentationMask::Alpha {
            width: 1,
            height: 1,
            data: Arc::from(vec![128u8].as_slice()),
        };
        let out = CompositingEngine::new().composite(&f, &mask);
        assert_eq!(out.data[3], 128);
    }

    #[test]
    fn test_mismatched_mask_falls_back_to_frame() {
        let f = frame(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let mask = SegmentationMask::Alpha {
            width: 3,
            height: 3,
            data: Arc::from(vec![255u8; 9].as_slice()),
        };
        let out = CompositingEngine::new().composite(&f, &mask);
        assert_eq!(out.data, f.data);
    }

    #[test]
    fn test_short_buffer_falls_back_to_frame() {
        // Frame claims 2x1 but carries one pixel; blend cannot materialize
        let f = frame(2, 1, vec![1, 2, 3, 4]);
        let mask = SegmentationMask::Alpha {
            width: 2,
            height: 1,
            data: Arc::from(vec![255u8, 255].as_slice()),
        };
        let out = CompositingEngine::new().composite(&f, &mask);
        assert_eq!(out.data, f.data);
    }
}
