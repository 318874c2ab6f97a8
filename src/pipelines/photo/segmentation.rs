// SPDX-License-Identifier: GPL-3.0-only

//! Foreground segmentation
//!
//! Wraps the opaque segmentation capability behind [`ForegroundSegmenter`]
//! and merges its per-instance masks into a single union mask. The engine
//! never fails: zero instances and capability errors both collapse to
//! [`SegmentationMask::Empty`], which downstream compositing treats as
//! "leave the frame untouched".

use crate::errors::SegmentationError;
use crate::pipelines::photo::normalize::NormalizedFrame;
use std::sync::Arc;
use tracing::{debug, warn};

/// Opaque foreground instance segmentation capability
///
/// Implemented by the platform model integration, not by this crate. Returns
/// one alpha mask per detected foreground instance; an empty list means no
/// foreground was found and is not an error.
pub trait ForegroundSegmenter: Send + Sync {
    fn instance_masks(&self, frame: &NormalizedFrame) -> Result<Vec<InstanceMask>, SegmentationError>;
}

/// Alpha mask for one foreground instance, one byte per pixel (0 = background)
#[derive(Debug, Clone)]
pub struct InstanceMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Union mask over all detected instances, aligned to the source frame
#[derive(Clone, PartialEq, Eq)]
pub enum SegmentationMask {
    /// No usable foreground: nothing detected, or the capability failed
    Empty,
    /// Alpha coverage, one byte per pixel (0 = background, 255 = foreground)
    Alpha {
        width: u32,
        height: u32,
        data: Arc<[u8]>,
    },
}

impl SegmentationMask {
    pub fn is_empty(&self) -> bool {
        matches!(self, SegmentationMask::Empty)
    }
}

impl std::fmt::Debug for SegmentationMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentationMask::Empty => write!(f, "SegmentationMask::Empty"),
            SegmentationMask::Alpha { width, height, data } => {
                write!(f, "SegmentationMask::Alpha({}x{}, {} bytes)", width, height, data.len())
            }
        }
    }
}

/// Turns a normalized frame into a single union mask
#[derive(Clone)]
pub struct SegmentationEngine {
    segmenter: Arc<dyn ForegroundSegmenter>,
}

impl SegmentationEngine {
    pub fn new(segmenter: Arc<dyn ForegroundSegmenter>) -> Self {
        Self { segmenter }
    }

    /// Segment the frame into a union foreground mask.
    ///
    /// A pixel is foreground if any instance covers it. Capability failures
    /// are absorbed here and observed only as an absence of a mask.
    pub fn segment(&self, frame: &NormalizedFrame) -> SegmentationMask {
        let masks = match self.segmenter.instance_masks(frame) {
            Ok(masks) => masks,
            Err(e) => {
                warn!(error = %e, "Segmentation capability failed; treating as no foreground");
                return SegmentationMask::Empty;
            }
        };

        if masks.is_empty() {
            debug!("No foreground instances found");
            return SegmentationMask::Empty;
        }

        let pixel_count = frame.width as usize * frame.height as usize;
        let mut union: Option<Vec<u8>> = None;

        for mask in masks {
            if mask.width != frame.width
                || mask.height != frame.height
                || mask.data.len() != pixel_count
            {
                warn!(
                    mask_width = mask.width,
                    mask_height = mask.height,
                    frame_width = frame.width,
                    frame_height = frame.height,
                    "Skipping instance mask not aligned to frame"
                );
                continue;
            }

            match union.as_mut() {
                None => union = Some(mask.data),
                Some(acc) => {
                    for (dst, src) in acc.iter_mut().zip(mask.data.iter()) {
                        *dst = (*dst).max(*src);
                    }
                }
            }
        }

        match union {
            Some(data) => SegmentationMask::Alpha {
                width: frame.width,
                height: frame.height,
                data: data.into(),
            },
            None => SegmentationMask::Empty,
        }
    }
}
