// SPDX-License-Identifier: GPL-3.0-only

//! Async photo capture pipeline with background removal
//!
//! One capture runs through the stages:
//!
//! ```text
//! Camera session → RawFrame → Normalize → Segment → Composite → publish
//! ```
//!
//! # State machine
//!
//! ```text
//! Idle → Capturing → Processing → Ready → Idle
//!          │             │
//!          └──────┬──────┘
//!                 ▼ (watchdog elapses)
//!             TimedOut → Idle
//! ```
//!
//! A failed delivery skips `Ready` and returns straight to `Idle`. The
//! pipeline is the single writer of its state; consumers observe transitions
//! in order through [`CapturePipeline::subscribe`].
//!
//! # Single in flight
//!
//! At most one capture cycle is active at any time. The `Idle → Capturing`
//! transition is guarded by an atomic compare-and-set, so overlapping
//! `capture_photo` calls collapse to exactly one hardware request.
//!
//! # Watchdog
//!
//! Each accepted capture arms a watchdog covering both the hardware callback
//! and the processing stages. When it elapses the pipeline forces itself back
//! to `Idle` and the late result of that capture generation is discarded.

pub mod compositing;
pub mod normalize;
pub mod segmentation;

pub use compositing::{CompositedImage, CompositingEngine};
pub use normalize::{FrameNormalizer, NormalizedFrame};
pub use segmentation::{ForegroundSegmenter, InstanceMask, SegmentationEngine, SegmentationMask};

use crate::backends::camera::types::CaptureDelivery;
use crate::backends::camera::CaptureSessionManager;
use crate::config::Config;
use crate::constants::{DEFAULT_WATCHDOG, EVENT_CHANNEL_CAPACITY};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, warn};

/// Pipeline state, written only by the pipeline itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    /// A capture request is outstanding at the hardware
    Capturing,
    /// A frame arrived and is being normalized/segmented/composited
    Processing,
    /// A composited image has been published
    Ready,
    /// The watchdog fired before the capture completed
    TimedOut,
}

/// What consumers observe: state, latest image and session liveness
///
/// The image survives the `Ready → Idle` reset and is only cleared by
/// [`CapturePipeline::reset`], matching a retake flow where the result stays
/// on screen after the pipeline has settled.
#[derive(Debug, Clone)]
pub struct PipelineSnapshot {
    pub state: PipelineState,
    pub image: Option<Arc<CompositedImage>>,
    pub session_running: bool,
}

/// Everything guarded by the state lock
struct Inner {
    state: PipelineState,
    image: Option<Arc<CompositedImage>>,
    /// Capture generation. Bumped when a capture is accepted and when
    /// `reset()` invalidates in-flight work; publications from a stale
    /// generation are dropped.
    generation: u64,
}

struct PipelineShared {
    session: Arc<CaptureSessionManager>,
    inner: Mutex<Inner>,
    /// Single-in-flight slot, claimed by compare-and-set
    in_flight: AtomicBool,
    events: broadcast::Sender<PipelineSnapshot>,
}

impl PipelineShared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn snapshot(&self, inner: &Inner) -> PipelineSnapshot {
        PipelineSnapshot {
            state: inner.state,
            image: inner.image.clone(),
            session_running: self.session.is_running(),
        }
    }

    /// Transition to `state` if `generation` is still current.
    ///
    /// Returns false when the generation went stale (watchdog or reset got
    /// there first), in which case nothing is published.
    fn publish(&self, generation: u64, state: PipelineState) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(?state, "Dropping publication from stale capture generation");
            return false;
        }
        inner.state = state;
        let snapshot = self.snapshot(&inner);
        drop(inner);
        // Send failures just mean nobody is subscribed
        let _ = self.events.send(snapshot);
        true
    }

    /// Publish `Ready` with a freshly composited image.
    fn publish_ready(&self, generation: u64, image: Arc<CompositedImage>) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!("Dropping late image from stale capture generation");
            return false;
        }
        inner.state = PipelineState::Ready;
        inner.image = Some(image);
        let snapshot = self.snapshot(&inner);
        drop(inner);
        let _ = self.events.send(snapshot);
        true
    }

    /// Release the single-in-flight slot, unless the generation was already
    /// invalidated (then `reset()` released it on our behalf).
    fn release(&self, generation: u64) {
        let inner = self.lock();
        if inner.generation == generation {
            self.in_flight.store(false, Ordering::Release);
        }
    }
}

/// Orchestrates one photo capture at a time
///
/// Failure semantics follow the session: configuration problems degrade to
/// no-ops, capture and processing problems degrade to "no new image" or "the
/// unmodified frame", and nothing surfaces to the consumer as an error value.
pub struct CapturePipeline {
    shared: Arc<PipelineShared>,
    normalizer: FrameNormalizer,
    segmentation: SegmentationEngine,
    compositing: CompositingEngine,
    watchdog: Duration,
}

impl CapturePipeline {
    /// Create a pipeline with default watchdog and channel capacity.
    pub fn new(
        session: Arc<CaptureSessionManager>,
        segmenter: Arc<dyn ForegroundSegmenter>,
    ) -> Self {
        Self::with_watchdog(session, segmenter, DEFAULT_WATCHDOG, EVENT_CHANNEL_CAPACITY)
    }

    /// Create a pipeline from a [`Config`].
    pub fn with_config(
        session: Arc<CaptureSessionManager>,
        segmenter: Arc<dyn ForegroundSegmenter>,
        config: &Config,
    ) -> Self {
        Self::with_watchdog(session, segmenter, config.watchdog, config.event_capacity)
    }

    fn with_watchdog(
        session: Arc<CaptureSessionManager>,
        segmenter: Arc<dyn ForegroundSegmenter>,
        watchdog: Duration,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity);
        Self {
            shared: Arc::new(PipelineShared {
                session,
                inner: Mutex::new(Inner {
                    state: PipelineState::Idle,
                    image: None,
                    generation: 0,
                }),
                in_flight: AtomicBool::new(false),
                events,
            }),
            normalizer: FrameNormalizer::new(),
            segmentation: SegmentationEngine::new(segmenter),
            compositing: CompositingEngine::new(),
            watchdog,
        }
    }

    /// Subscribe to state transitions, delivered in order.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineSnapshot> {
        self.shared.events.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.shared.lock().state
    }

    /// Most recently published image, if any.
    pub fn latest_image(&self) -> Option<Arc<CompositedImage>> {
        self.shared.lock().image.clone()
    }

    /// Whether the underlying session is running.
    pub fn is_session_running(&self) -> bool {
        self.shared.session.is_running()
    }

    /// The armed watchdog duration.
    pub fn watchdog(&self) -> Duration {
        self.watchdog
    }

    /// Start one capture cycle.
    ///
    /// No-op unless the session is running and no capture is in flight, so
    /// back-to-back calls issue exactly one hardware request. Must be called
    /// from within a tokio runtime.
    pub fn capture_photo(&self) {
        if !self.shared.session.is_running() {
            debug!("capture_photo() while session not running; ignoring");
            return;
        }

        // Claim the single-in-flight slot
        if self
            .shared
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("capture_photo() while capture in flight; ignoring");
            return;
        }

        let generation = {
            let mut inner = self.shared.lock();
            inner.generation += 1;
            inner.generation
        };

        let delivery = match self.shared.session.request_capture() {
            Ok(rx) => rx,
            Err(e) => {
                // Never left Idle; just give the slot back
                warn!(error = %e, "Capture request rejected");
                self.shared.in_flight.store(false, Ordering::Release);
                return;
            }
        };

        info!(generation, "Capture accepted");
        self.shared.publish(generation, PipelineState::Capturing);

        let shared = Arc::clone(&self.shared);
        let normalizer = self.normalizer;
        let segmentation = self.segmentation.clone();
        let compositing = self.compositing;
        let watchdog = self.watchdog;
        tokio::spawn(async move {
            drive_capture(
                shared,
                normalizer,
                segmentation,
                compositing,
                delivery,
                watchdog,
                generation,
            )
            .await;
        });
    }

    /// Discard the published image and force the pipeline back to `Idle`.
    ///
    /// Invalidates any in-flight capture (its result will be dropped) and
    /// restarts the session if it is not running. Used when the consumer
    /// discards a result, e.g. a retake.
    pub fn reset(&self) {
        let snapshot = {
            let mut inner = self.shared.lock();
            inner.generation += 1;
            inner.image = None;
            inner.state = PipelineState::Idle;
            self.shared.snapshot(&inner)
        };
        self.shared.in_flight.store(false, Ordering::Release);
        let _ = self.shared.events.send(snapshot);
        debug!("Pipeline reset");

        if !self.shared.session.is_running() {
            self.shared.session.start();
        }
    }
}

/// Drive one accepted capture to completion under the watchdog.
async fn drive_capture(
    shared: Arc<PipelineShared>,
    normalizer: FrameNormalizer,
    segmentation: SegmentationEngine,
    compositing: CompositingEngine,
    delivery: oneshot::Receiver<CaptureDelivery>,
    watchdog: Duration,
    generation: u64,
) {
    let outcome = tokio::time::timeout(watchdog, async {
        let frame = match delivery.await {
            Ok(Ok(frame)) => frame,
            Ok(Err(e)) => {
                debug!(error = %e, "Capture delivered no data");
                return None;
            }
            Err(_) => {
                debug!("Capture channel closed without a delivery");
                return None;
            }
        };

        shared.publish(generation, PipelineState::Processing);

        let processed = tokio::task::spawn_blocking(move || {
            let normalized = normalizer.normalize(&frame);
            let mask = segmentation.segment(&normalized);
            compositing.composite(&normalized, &mask)
        })
        .await;

        match processed {
            Ok(image) => Some(Arc::new(image)),
            Err(e) => {
                warn!(error = %e, "Processing task failed");
                None
            }
        }
    })
    .await;

    match outcome {
        Ok(Some(image)) => {
            if shared.publish_ready(generation, image) {
                info!(generation, "Capture complete, image published");
                // Settle back to Idle once the consumer has been notified;
                // the image stays available until reset()
                shared.publish(generation, PipelineState::Idle);
            }
        }
        Ok(None) => {
            shared.publish(generation, PipelineState::Idle);
        }
        Err(_) => {
            warn!(
                generation,
                watchdog_ms = watchdog.as_millis() as u64,
                "Watchdog elapsed; forcing pipeline back to idle"
            );
            if shared.publish(generation, PipelineState::TimedOut) {
                shared.publish(generation, PipelineState::Idle);
            }
        }
    }

    shared.release(generation);
}
