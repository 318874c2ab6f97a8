// SPDX-License-Identifier: GPL-3.0-only
// Shared types for the camera backend abstraction

//! Shared types for the camera backend

use crate::constants::RGBA_BYTES_PER_PIXEL;
use crate::errors::CaptureError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Sensor rotation in degrees (clockwise)
///
/// Camera sensors on mobile devices are often mounted rotated relative to the
/// display. The value is the clockwise rotation that must be applied to the
/// delivered pixel buffer so the image appears upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Pixel order already matches display orientation
    #[default]
    Upright,
    /// Rotate 90 degrees clockwise to display upright
    Rotate90,
    /// Rotate 180 degrees to display upright
    Rotate180,
    /// Rotate 270 degrees clockwise to display upright
    Rotate270,
}

impl Orientation {
    /// Create an orientation from an integer degree value (normalised to 0-360).
    pub fn from_degrees_int(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => Orientation::Rotate90,
            180 => Orientation::Rotate180,
            270 => Orientation::Rotate270,
            _ => Orientation::Upright,
        }
    }

    /// Parse an orientation from a string degree value, as reported by
    /// device-tree style metadata.
    pub fn from_degrees(degrees: &str) -> Self {
        match degrees.trim() {
            "90" => Orientation::Rotate90,
            "180" => Orientation::Rotate180,
            "270" => Orientation::Rotate270,
            "0" | "" => Orientation::Upright,
            other => {
                if let Ok(deg) = other.parse::<i32>() {
                    Self::from_degrees_int(deg)
                } else {
                    Orientation::Upright
                }
            }
        }
    }

    /// Get the rotation in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            Orientation::Upright => 0,
            Orientation::Rotate90 => 90,
            Orientation::Rotate180 => 180,
            Orientation::Rotate270 => 270,
        }
    }

    /// Check if the rotation swaps width and height
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Orientation::Rotate90 | Orientation::Rotate270)
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Session preset selecting the capture configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SessionPreset {
    /// Full-resolution still photo capture
    #[default]
    Photo,
    /// Lower-latency preview-quality capture
    Preview,
}

impl std::fmt::Display for SessionPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPreset::Photo => write!(f, "Photo"),
            SessionPreset::Preview => write!(f, "Preview"),
        }
    }
}

/// Represents a camera device
#[derive(Debug, Clone)]
pub struct CameraDevice {
    /// Human-readable device name
    pub name: String,
    /// Backend-specific device path or node identifier
    pub path: String,
    /// Sensor mounting rotation reported by the platform
    pub rotation: Orientation,
}

/// A single frame delivered by the hardware for one capture request
///
/// The buffer is RGBA with `stride` bytes per row (rows may carry padding).
/// Frames are immutable after creation and shared by reference counting.
#[derive(Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, including any padding past `width * 4`
    pub stride: u32,
    pub data: Arc<[u8]>,
    /// Rotation to apply for the frame to display upright
    pub orientation: Orientation,
    pub captured_at: Instant,
}

impl RawFrame {
    /// Create a tightly packed upright frame.
    ///
    /// Convenient for sources that already deliver padded-free buffers.
    pub fn upright(width: u32, height: u32, data: Arc<[u8]>) -> Self {
        Self {
            width,
            height,
            stride: width * RGBA_BYTES_PER_PIXEL as u32,
            data,
            orientation: Orientation::Upright,
            captured_at: Instant::now(),
        }
    }
}

impl std::fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RawFrame({}x{}, stride {}, {} bytes, {})",
            self.width,
            self.height,
            self.stride,
            self.data.len(),
            self.orientation
        )
    }
}

/// Outcome of one capture request, delivered once over a oneshot channel
///
/// This is the crate's rendition of the hardware delegate callback: the
/// request either produces a frame or a capture error. A dropped sender means
/// the hardware went away without answering.
pub type CaptureDelivery = Result<RawFrame, CaptureError>;
