// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for camera hardware
//!
//! The backend layer separates the capture pipeline from the platform camera
//! stack. Hardware access goes through the [`camera::CameraCapability`]
//! trait, so the pipeline can be driven by a real device on the target
//! platform or by a test double.
//!
//! # Modules
//!
//! - [`camera`]: session management, frame types and the hardware trait

pub mod camera;
