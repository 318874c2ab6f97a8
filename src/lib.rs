// SPDX-License-Identifier: GPL-3.0-only

//! LeafCam capture core - photo capture and background removal for a plant
//! cataloguing application
//!
//! This library implements the capture pipeline that sits behind the camera
//! screen of the LeafCam app: it acquires a frame from the camera session,
//! corrects its orientation, runs foreground instance segmentation and
//! composites the foreground over a transparent background before publishing
//! the result to the UI.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │               UI (external consumer)              │
//! │          observes PipelineSnapshot events         │
//! └─────────────────────────┬─────────────────────────┘
//!                           │
//! ┌─────────────────────────┴─────────────────────────┐
//! │                  CapturePipeline                   │
//! │   state machine + watchdog + single-in-flight     │
//! │                                                   │
//! │  RawFrame → FrameNormalizer → SegmentationEngine  │
//! │                 → CompositingEngine               │
//! └─────────────────────────┬─────────────────────────┘
//!                           │
//! ┌─────────────────────────┴─────────────────────────┐
//! │               CaptureSessionManager                │
//! │     configure / start / stop / request_capture    │
//! └─────────────────────────┬─────────────────────────┘
//!                           │
//! ┌─────────────────────────┴─────────────────────────┐
//! │       CameraCapability (hardware, external)        │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! Category management, persistence and all UI chrome live in the application
//! layer, not in this crate. The segmentation model is consumed through the
//! [`ForegroundSegmenter`] trait and never implemented here.

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;

// Re-export commonly used types
pub use backends::camera::{
    CameraCapability, CameraDevice, CaptureDelivery, CaptureSessionManager, Orientation,
    RawFrame, SessionPreset,
};
pub use config::Config;
pub use errors::{CameraError, CaptureError, SegmentationError};
pub use pipelines::photo::{
    CapturePipeline, CompositedImage, CompositingEngine, ForegroundSegmenter, FrameNormalizer,
    InstanceMask, NormalizedFrame, PipelineSnapshot, PipelineState, SegmentationEngine,
    SegmentationMask,
};
