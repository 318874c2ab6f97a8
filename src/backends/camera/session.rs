// SPDX-License-Identifier: GPL-3.0-only

//! Capture session lifecycle
//!
//! [`CaptureSessionManager`] exclusively owns the camera session: it acquires
//! the device at configuration time and drives start/stop transitions on a
//! blocking background context so callers never wait on the hardware.
//!
//! A session that fails to configure is left permanently unconfigured and
//! every later operation becomes a silent no-op; the UI simply never sees
//! `running` turn true.

use crate::backends::camera::types::{CaptureDelivery, SessionPreset};
use crate::backends::camera::CameraCapability;
use crate::errors::CameraError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Owner of the camera session
///
/// `running` reflects the last completed start/stop transition, never the
/// in-flight one: readers may briefly observe a stale value while the
/// background context is still talking to the hardware.
pub struct CaptureSessionManager {
    camera: Arc<dyn CameraCapability>,
    configured: bool,
    running: Arc<AtomicBool>,
    /// Serialises start/stop so overlapping calls cannot double-start the
    /// hardware. Held only inside the blocking tasks.
    transition: Arc<Mutex<()>>,
}

impl CaptureSessionManager {
    /// Configure a session against the given camera capability.
    ///
    /// Acquires the default video device and attaches input and output. On
    /// any failure the session is returned unconfigured and all later
    /// operations no-op; no error propagates to the caller.
    pub fn configure(camera: Arc<dyn CameraCapability>, preset: SessionPreset) -> Self {
        let configured = match camera.default_device() {
            Some(device) => match camera.attach(&device, preset) {
                Ok(()) => {
                    info!(device = %device.name, %preset, "Camera session configured");
                    true
                }
                Err(e) => {
                    warn!(device = %device.name, error = %e, "Session configuration failed");
                    false
                }
            },
            None => {
                warn!("No video device available; session left unconfigured");
                false
            }
        };

        Self {
            camera,
            configured,
            running: Arc::new(AtomicBool::new(false)),
            transition: Arc::new(Mutex::new(())),
        }
    }

    /// Whether configuration succeeded.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Whether the session is running, as of the last completed transition.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start the session off the calling thread. Idempotent.
    ///
    /// Must be called from within a tokio runtime. `running` becomes true
    /// only once the hardware reports it is streaming.
    pub fn start(&self) {
        if !self.configured {
            debug!("start() on unconfigured session; ignoring");
            return;
        }

        let camera = Arc::clone(&self.camera);
        let running = Arc::clone(&self.running);
        let transition = Arc::clone(&self.transition);
        tokio::task::spawn_blocking(move || {
            let _guard = transition.lock().unwrap_or_else(|e| e.into_inner());
            if running.load(Ordering::Acquire) {
                debug!("Session already running");
                return;
            }
            match camera.start() {
                Ok(()) => {
                    running.store(true, Ordering::Release);
                    info!("Camera session running");
                }
                Err(e) => warn!(error = %e, "Camera session failed to start"),
            }
        });
    }

    /// Stop the session off the calling thread. Idempotent.
    ///
    /// Does not cancel downstream processing of an already-delivered frame;
    /// an in-flight capture may still publish after the camera is released.
    pub fn stop(&self) {
        if !self.configured {
            return;
        }

        let camera = Arc::clone(&self.camera);
        let running = Arc::clone(&self.running);
        let transition = Arc::clone(&self.transition);
        tokio::task::spawn_blocking(move || {
            let _guard = transition.lock().unwrap_or_else(|e| e.into_inner());
            if !running.load(Ordering::Acquire) {
                debug!("Session already stopped");
                return;
            }
            camera.stop();
            running.store(false, Ordering::Release);
            info!("Camera session stopped");
        });
    }

    /// Issue one capture request to the session's photo output.
    pub fn request_capture(&self) -> Result<oneshot::Receiver<CaptureDelivery>, CameraError> {
        if !self.configured {
            return Err(CameraError::NotConfigured);
        }
        if !self.is_running() {
            return Err(CameraError::NotRunning);
        }
        self.camera.request_capture()
    }
}
