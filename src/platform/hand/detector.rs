// Hand detector bridge
// Abstraction over the external pose-estimation model and the video source it reads

use crate::models::hand::LandmarkFrame;
use crate::models::tracking::TrackingResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// External hand landmark model.
///
/// `detect` runs one inference against whatever frame the source currently
/// shows and returns at most one hand. It may be slow; the tracking loop never
/// calls it again before the previous call resolves.
///
/// Errors: `TrackingError::DetectionFailed` for a transient failure (the loop
/// skips the tick), `TrackingError::DetectorUnavailable` when retrying is
/// pointless (the loop stops).
#[async_trait]
pub trait HandDetector: Send + Sync {
    async fn detect(&self) -> TrackingResult<Option<LandmarkFrame>>;

    /// Check if the model is loaded
    fn is_initialized(&self) -> bool;

    /// Get model info
    fn get_model_info(&self) -> String;
}

/// External video source, consulted once when tracking starts
pub trait FrameSource: Send + Sync {
    fn is_ready(&self) -> bool;
}

// ==============================================================================
// Readiness flag
// ==============================================================================

/// Frame source readiness the host flips once the camera is streaming
#[derive(Debug, Default)]
pub struct ReadinessFlag {
    ready: AtomicBool,
}

impl ReadinessFlag {
    pub fn new(ready: bool) -> Self {
        Self {
            ready: AtomicBool::new(ready),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }
}

impl FrameSource for ReadinessFlag {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

// ==============================================================================
// Null detector (no inference backend wired in)
// ==============================================================================

/// Never sees a hand. Lets the loop run end to end without a model.
#[derive(Debug, Default)]
pub struct NullHandDetector;

#[async_trait]
impl HandDetector for NullHandDetector {
    async fn detect(&self) -> TrackingResult<Option<LandmarkFrame>> {
        Ok(None)
    }

    fn is_initialized(&self) -> bool {
        false
    }

    fn get_model_info(&self) -> String {
        "Null hand detector (no inference backend)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_flag() {
        let flag = ReadinessFlag::new(false);
        assert!(!flag.is_ready());
        flag.set_ready(true);
        assert!(flag.is_ready());
    }

    #[tokio::test]
    async fn test_null_detector_sees_nothing() {
        let detector = NullHandDetector;
        assert_eq!(detector.detect().await, Ok(None));
        assert!(!detector.is_initialized());
    }
}
