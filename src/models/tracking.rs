// Tracking loop status, session statistics, events and errors

use crate::models::gesture::Gesture;
use crate::models::hand::LandmarkFrame;
use crate::models::transform::TransformState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    Stopped,
    Running,
}

impl TrackingStatus {
    pub fn to_string(&self) -> &'static str {
        match self {
            TrackingStatus::Stopped => "stopped",
            TrackingStatus::Running => "running",
        }
    }
}

/// What the detector saw on the most recent successful tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandObservation {
    pub landmarks: Option<LandmarkFrame>,
    pub gestures: Vec<Gesture>,
}

/// Notifications delivered to channel-based consumers
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingEvent {
    Transform(TransformState),
    Terminated(TrackingError),
}

// ==============================================================================
// Session Statistics
// ==============================================================================

/// In-memory counters for one start..stop session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingStatistics {
    pub session_id: String,
    pub started_at: i64,                // Unix millis
    pub ticks: u64,                     // Published updates, including recoverable failures
    pub frames_with_hand: u64,
    pub pinch_frames: u64,
    pub recoverable_errors: u64,
    pub average_detection_ms: f32,      // Mean latency of detection calls
}

impl TrackingStatistics {
    pub fn new(session_id: String, started_at: i64) -> Self {
        Self {
            session_id,
            started_at,
            ticks: 0,
            frames_with_hand: 0,
            pinch_frames: 0,
            recoverable_errors: 0,
            average_detection_ms: 0.0,
        }
    }

    /// Fold one completed detection into the running latency average
    pub fn record_detection_time(&mut self, elapsed_ms: f32) {
        let completed = self.ticks as f32;
        self.average_detection_ms =
            (self.average_detection_ms * completed + elapsed_ms) / (completed + 1.0);
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackingError {
    #[error("Frame source is not ready")]
    SourceUnavailable,

    #[error("Hand detection failed: {0}")]
    DetectionFailed(String),

    #[error("Hand detector unavailable: {0}")]
    DetectorUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TrackingError {
    /// Recoverable errors skip one tick; everything else stops the loop
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TrackingError::DetectionFailed(_))
    }
}

pub type TrackingResult<T> = Result<T, TrackingError>;
