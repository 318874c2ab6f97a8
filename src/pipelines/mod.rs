// SPDX-License-Identifier: GPL-3.0-only

//! Capture pipelines
//!
//! Currently a single pipeline: still-photo capture with background removal.

pub mod photo;
