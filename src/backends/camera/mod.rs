// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend: hardware trait, session management and frame types
//!
//! The hardware itself is an external collaborator. Platform crates implement
//! [`CameraCapability`]; this module owns the session lifecycle around it.

pub mod session;
pub mod types;

pub use session::CaptureSessionManager;
pub use types::{CameraDevice, CaptureDelivery, Orientation, RawFrame, SessionPreset};

use crate::errors::CameraError;
use tokio::sync::oneshot;

/// Interface to the platform camera stack
///
/// One capture request yields exactly one [`CaptureDelivery`] on the returned
/// channel. Implementations are expected to be cheap to call from any thread;
/// only [`start`](CameraCapability::start) and [`stop`](CameraCapability::stop)
/// may block, and the session manager always invokes them off the caller's
/// thread.
pub trait CameraCapability: Send + Sync {
    /// Enumerate the default video device, if any is present.
    fn default_device(&self) -> Option<CameraDevice>;

    /// Attach the device input and a photo output to the session.
    ///
    /// Must fail if either attachment is not possible, leaving the hardware
    /// untouched.
    fn attach(&self, device: &CameraDevice, preset: SessionPreset) -> Result<(), CameraError>;

    /// Begin delivering frames. May block until the hardware is streaming.
    fn start(&self) -> Result<(), CameraError>;

    /// Stop delivering frames. May block until the hardware is released.
    fn stop(&self);

    /// Issue a single capture request.
    ///
    /// The delivery arrives asynchronously on the returned channel; a dropped
    /// sender counts as a failed capture.
    fn request_capture(&self) -> Result<oneshot::Receiver<CaptureDelivery>, CameraError>;
}
