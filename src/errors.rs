// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture core
//!
//! These errors are internal to the pipeline: the consumer-facing contract is
//! "no new image appears" or "the unmodified frame appears", so every variant
//! below is absorbed before it reaches a [`PipelineSnapshot`] and is only
//! visible through logging.
//!
//! [`PipelineSnapshot`]: crate::pipelines::photo::PipelineSnapshot

use std::fmt;

/// Camera session errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No video device could be enumerated
    NoDeviceFound,
    /// Input or output could not be attached to the session
    AttachFailed(String),
    /// Operation requires a configured session
    NotConfigured,
    /// Operation requires a running session
    NotRunning,
    /// The hardware failed to start or stop
    TransitionFailed(String),
    /// The capture request could not be issued
    RequestFailed(String),
}

/// Errors reported by the hardware when a capture request completes
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// The delegate callback fired but carried no usable frame data
    NoData,
    /// The hardware reported a failure for this request
    Hardware(String),
}

/// Errors reported by the foreground segmentation capability
#[derive(Debug, Clone)]
pub enum SegmentationError {
    /// The model failed internally
    Internal(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoDeviceFound => write!(f, "No video device found"),
            CameraError::AttachFailed(msg) => write!(f, "Failed to attach input/output: {}", msg),
            CameraError::NotConfigured => write!(f, "Session is not configured"),
            CameraError::NotRunning => write!(f, "Session is not running"),
            CameraError::TransitionFailed(msg) => write!(f, "Session transition failed: {}", msg),
            CameraError::RequestFailed(msg) => write!(f, "Capture request failed: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoData => write!(f, "Capture completed without frame data"),
            CaptureError::Hardware(msg) => write!(f, "Hardware capture error: {}", msg),
        }
    }
}

impl fmt::Display for SegmentationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentationError::Internal(msg) => write!(f, "Segmentation failed: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for SegmentationError {}

impl From<String> for SegmentationError {
    fn from(msg: String) -> Self {
        SegmentationError::Internal(msg)
    }
}

impl From<&str> for SegmentationError {
    fn from(msg: &str) -> Self {
        SegmentationError::Internal(msg.to_string())
    }
}
