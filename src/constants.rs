// SPDX-License-Identifier: GPL-3.0-only

//! Crate-wide constants

use std::time::Duration;

/// How long the pipeline waits for a capture to complete before forcing
/// itself back to idle. Covers both the hardware callback and the
/// normalize/segment/composite stages.
pub const DEFAULT_WATCHDOG: Duration = Duration::from_secs(5);

/// Capacity of the pipeline event channel. Snapshots are small and a capture
/// cycle emits at most four transitions, so a slow consumer has ample slack
/// before it starts lagging.
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Bytes per pixel for the RGBA buffers used throughout the pipeline.
pub const RGBA_BYTES_PER_PIXEL: usize = 4;
