// Tracking loop - one detection per frame, classified, mapped and published

use crate::core::config::Config;
use crate::core::frame_scheduler::FrameScheduler;
use crate::core::gesture_classifier::GestureClassifier;
use crate::core::transform_mapper::TransformMapper;
use crate::models::gesture::{find_gesture, GestureKind};
use crate::models::tracking::{
    HandObservation, TrackingError, TrackingEvent, TrackingResult, TrackingStatistics,
    TrackingStatus,
};
use crate::models::transform::TransformState;
use crate::platform::hand::{FrameSource, HandDetector};
use std::sync::{Arc, Weak};
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

// ==============================================================================
// Consumers
// ==============================================================================

/// Receives the published transform stream.
///
/// Callbacks run while the loop holds its state lock, so they must return
/// quickly and must not call back into the `TrackingLoop`.
pub trait TransformConsumer: Send + Sync {
    /// Once per completed tick, including ticks whose detection failed
    fn on_transform(&self, state: TransformState);

    /// The loop stopped itself because of an unrecoverable error
    fn on_terminated(&self, error: &TrackingError);
}

/// Forwards loop notifications into a channel
pub struct ChannelConsumer {
    tx: mpsc::UnboundedSender<TrackingEvent>,
}

impl ChannelConsumer {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TrackingEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl TransformConsumer for ChannelConsumer {
    fn on_transform(&self, state: TransformState) {
        let _ = self.tx.send(TrackingEvent::Transform(state));
    }

    fn on_terminated(&self, error: &TrackingError) {
        let _ = self.tx.send(TrackingEvent::Terminated(error.clone()));
    }
}

// ==============================================================================
// Tracking Loop
// ==============================================================================

struct LoopState {
    status: TrackingStatus,
    generation: u64, // Bumped on every start/stop; stale ticks compare against it
    config: Config,
    transform: TransformState,
    observation: HandObservation,
    statistics: Option<TrackingStatistics>,
    task: Option<JoinHandle<()>>,
}

/// Everything a running session's task needs. Holds the shared state weakly
/// so dropping every `TrackingLoop` handle ends the task.
struct Session {
    state: Weak<Mutex<LoopState>>,
    detector: Arc<dyn HandDetector>,
    consumer: Arc<dyn TransformConsumer>,
    scheduler: Arc<dyn FrameScheduler>,
    generation: u64,
    classifier: GestureClassifier,
    mapper: TransformMapper,
}

#[derive(Clone)]
pub struct TrackingLoop {
    detector: Arc<dyn HandDetector>,
    source: Arc<dyn FrameSource>,
    consumer: Arc<dyn TransformConsumer>,
    scheduler: Arc<dyn FrameScheduler>,
    state: Arc<Mutex<LoopState>>,
}

impl TrackingLoop {
    pub fn new(
        detector: Arc<dyn HandDetector>,
        source: Arc<dyn FrameSource>,
        consumer: Arc<dyn TransformConsumer>,
        scheduler: Arc<dyn FrameScheduler>,
        config: Config,
    ) -> Self {
        Self {
            detector,
            source,
            consumer,
            scheduler,
            state: Arc::new(Mutex::new(LoopState {
                status: TrackingStatus::Stopped,
                generation: 0,
                config,
                transform: TransformState::identity(),
                observation: HandObservation::default(),
                statistics: None,
                task: None,
            })),
        }
    }

    /// Start tracking. No-op when already running.
    pub async fn start(&self) -> TrackingResult<()> {
        let mut state = self.state.lock().await;
        if state.status == TrackingStatus::Running {
            return Ok(());
        }

        if !self.source.is_ready() {
            tracing::warn!("Cannot start hand tracking: frame source not ready");
            return Err(TrackingError::SourceUnavailable);
        }

        state
            .config
            .validate()
            .map_err(|e| TrackingError::InvalidConfig(e.to_string()))?;

        state.generation += 1;
        state.status = TrackingStatus::Running;
        state.transform = TransformState::identity();
        state.observation = HandObservation::default();

        let session_id = Uuid::new_v4().to_string();
        state.statistics = Some(TrackingStatistics::new(
            session_id.clone(),
            chrono::Utc::now().timestamp_millis(),
        ));

        let session = Session {
            state: Arc::downgrade(&self.state),
            detector: self.detector.clone(),
            consumer: self.consumer.clone(),
            scheduler: self.scheduler.clone(),
            generation: state.generation,
            classifier: GestureClassifier::new(state.config.gesture.clone()),
            mapper: TransformMapper::new(state.config.mapping.clone()),
        };

        if let Some(previous) = state.task.replace(tokio::spawn(session.run())) {
            previous.abort();
        }

        tracing::info!(
            "Started hand tracking session {} ({})",
            session_id,
            self.detector.get_model_info()
        );
        Ok(())
    }

    /// Stop tracking. No-op when already stopped. Once this returns no
    /// further consumer callbacks fire, even if a detection was in flight.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if state.status == TrackingStatus::Stopped {
            return;
        }

        state.status = TrackingStatus::Stopped;
        state.generation += 1;
        if let Some(task) = state.task.take() {
            task.abort();
        }

        let session_id = state
            .statistics
            .as_ref()
            .map(|s| s.session_id.clone())
            .unwrap_or_default();
        tracing::info!("Stopped hand tracking session {}", session_id);
    }

    pub async fn status(&self) -> TrackingStatus {
        self.state.lock().await.status
    }

    /// Most recently published transform
    pub async fn current_transform(&self) -> TransformState {
        self.state.lock().await.transform
    }

    /// Landmarks and gestures from the latest successful detection
    pub async fn last_observation(&self) -> HandObservation {
        self.state.lock().await.observation.clone()
    }

    /// Counters for the current session, or the last one after it stopped
    pub async fn statistics(&self) -> Option<TrackingStatistics> {
        self.state.lock().await.statistics.clone()
    }

    pub async fn config(&self) -> Config {
        self.state.lock().await.config.clone()
    }

    /// Replace the configuration. A running session keeps its settings; the
    /// new values apply from the next `start()`.
    pub async fn update_config(&self, config: Config) -> TrackingResult<()> {
        config
            .validate()
            .map_err(|e| TrackingError::InvalidConfig(e.to_string()))?;
        self.state.lock().await.config = config;
        Ok(())
    }

    pub fn is_source_ready(&self) -> bool {
        self.source.is_ready()
    }

    pub fn model_info(&self) -> String {
        self.detector.get_model_info()
    }
}

impl Session {
    async fn run(self) {
        // Owned by this task alone; the shared copy is only a published snapshot
        let mut transform = TransformState::identity();
        let mut last_tick: Option<Instant> = None;

        loop {
            let started = Instant::now();
            let result = self.detector.detect().await;
            let elapsed_ms = started.elapsed().as_secs_f32() * 1000.0;
            let dt = last_tick.map(|t| started.duration_since(t));
            last_tick = Some(started);

            let shared = match self.state.upgrade() {
                Some(shared) => shared,
                None => return,
            };
            let mut state = shared.lock().await;
            if state.generation != self.generation || state.status != TrackingStatus::Running {
                // Stopped while the detection was in flight; drop the result
                return;
            }

            let (observation, stats_update) = match result {
                Ok(frame) => {
                    let gestures = self.classifier.classify(frame.as_ref());
                    transform = self.mapper.map(frame.as_ref(), &gestures, &transform, dt);

                    let has_hand = frame.is_some();
                    let has_pinch = find_gesture(&gestures, GestureKind::Pinch).is_some();
                    tracing::trace!(
                        "Tick: hand={} pinch={} scale={:.3}",
                        has_hand,
                        has_pinch,
                        transform.scale
                    );
                    (
                        Some(HandObservation {
                            landmarks: frame,
                            gestures,
                        }),
                        (has_hand, has_pinch, false),
                    )
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Hand detection failed, keeping last transform: {}", e);
                    (None, (false, false, true))
                }
                Err(e) => {
                    tracing::error!("Hand tracking stopped: {}", e);
                    state.status = TrackingStatus::Stopped;
                    state.generation += 1;
                    state.task = None;
                    self.consumer.on_terminated(&e);
                    return;
                }
            };

            if let Some(observation) = observation {
                state.observation = observation;
            }
            if let Some(stats) = state.statistics.as_mut() {
                let (has_hand, has_pinch, failed) = stats_update;
                stats.record_detection_time(elapsed_ms);
                stats.ticks += 1;
                stats.frames_with_hand += has_hand as u64;
                stats.pinch_frames += has_pinch as u64;
                stats.recoverable_errors += failed as u64;
            }

            state.transform = transform;
            self.consumer.on_transform(transform);
            drop(state);
            // Only the weak handle survives the wait for the next frame
            drop(shared);

            self.scheduler.next_frame().await;
        }
    }
}
