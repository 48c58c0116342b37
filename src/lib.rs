pub mod core;
pub mod models;
pub mod platform;

use crate::core::config::Config;
use crate::core::frame_scheduler::{
    FixedRateScheduler, FrameCadence, FrameScheduler, FrameSignal, HostFrameScheduler,
};
use crate::core::tracking_loop::{TrackingLoop, TransformConsumer};
use crate::models::tracking::{TrackingStatistics, TrackingStatus};
use crate::models::transform::TransformState;
use crate::platform::hand::{HandDetector, ReadinessFlag};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gesture3d_lib=info"));

    // A host may already have installed its own subscriber
    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init();
}

// Application state
pub struct AppState {
    pub frame_signal: Arc<FrameSignal>, // Host raises this once per rendered frame
    pub camera: Arc<ReadinessFlag>,     // Host flips this once video is streaming
    pub tracker: TrackingLoop,
}

impl AppState {
    /// The tick cadence is fixed here; other settings apply on each start.
    pub fn new(
        config: Config,
        detector: Arc<dyn HandDetector>,
        consumer: Arc<dyn TransformConsumer>,
    ) -> Self {
        let frame_signal = FrameSignal::new();
        let camera = Arc::new(ReadinessFlag::new(false));

        let scheduler: Arc<dyn FrameScheduler> = match config.tracking.cadence {
            FrameCadence::HostFrame => Arc::new(HostFrameScheduler::new(frame_signal.clone())),
            FrameCadence::FixedRate => {
                Arc::new(FixedRateScheduler::new(config.tracking.target_fps))
            }
        };

        let tracker = TrackingLoop::new(
            detector,
            camera.clone(),
            consumer,
            scheduler,
            config,
        );

        Self {
            frame_signal,
            camera,
            tracker,
        }
    }
}

/// Snapshot returned to the host UI
#[derive(Debug, Clone, Serialize)]
pub struct TrackingStatusReport {
    pub status: TrackingStatus,
    pub source_ready: bool,
    pub model_info: String,
    pub transform: TransformState,
    pub statistics: Option<TrackingStatistics>,
}

// Configuration commands. The tracker owns the only copy of the config.
pub async fn get_config(state: &AppState) -> Result<Config, String> {
    Ok(state.tracker.config().await)
}

pub async fn update_config(config: Config, state: &AppState) -> Result<(), String> {
    state
        .tracker
        .update_config(config)
        .await
        .map_err(|e| format!("Failed to update config: {}", e))
}

pub async fn reset_config(state: &AppState) -> Result<Config, String> {
    let default_config = Config::default();
    update_config(default_config.clone(), state).await?;
    Ok(default_config)
}

// Hand tracking commands
pub async fn start_hand_tracking(state: &AppState) -> Result<(), String> {
    state
        .tracker
        .start()
        .await
        .map_err(|e| format!("Failed to start hand tracking: {}", e))
}

pub async fn stop_hand_tracking(state: &AppState) -> Result<(), String> {
    state.tracker.stop().await;
    Ok(())
}

/// The UI's tracking toggle
pub async fn set_tracking_enabled(enabled: bool, state: &AppState) -> Result<(), String> {
    if enabled {
        start_hand_tracking(state).await
    } else {
        stop_hand_tracking(state).await
    }
}

pub async fn get_tracking_status(state: &AppState) -> Result<TrackingStatusReport, String> {
    Ok(TrackingStatusReport {
        status: state.tracker.status().await,
        source_ready: state.tracker.is_source_ready(),
        model_info: state.tracker.model_info(),
        transform: state.tracker.current_transform().await,
        statistics: state.tracker.statistics().await,
    })
}

/// Latest landmarks and gestures as pretty JSON, for a debug overlay
pub async fn get_debug_snapshot(state: &AppState) -> Result<String, String> {
    let observation = state.tracker.last_observation().await;
    serde_json::to_string_pretty(&observation)
        .map_err(|e| format!("Failed to serialize observation: {}", e))
}
