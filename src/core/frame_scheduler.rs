// Frame scheduling - decides when the tracking loop may issue its next detection

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Waits for the next tick. Called only after the previous tick has been
/// fully processed, so implementations never cause overlapping detections.
#[async_trait]
pub trait FrameScheduler: Send + Sync {
    async fn next_frame(&self);
}

/// How the default tracking setup paces its ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameCadence {
    HostFrame, // One tick per frame the host renderer reports
    FixedRate, // Sleep one frame period between ticks
}

// ==============================================================================
// Host frame callback
// ==============================================================================

/// Raised by the host once per rendered frame
#[derive(Debug, Default)]
pub struct FrameSignal {
    notify: Notify,
}

impl FrameSignal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Called from the host's per-frame callback. Frames raised while a
    /// detection is in flight collapse into a single pending wakeup.
    pub fn frame_rendered(&self) {
        self.notify.notify_one();
    }
}

/// Ticks once per host frame, like an animation-frame callback
pub struct HostFrameScheduler {
    signal: Arc<FrameSignal>,
}

impl HostFrameScheduler {
    pub fn new(signal: Arc<FrameSignal>) -> Self {
        Self { signal }
    }
}

#[async_trait]
impl FrameScheduler for HostFrameScheduler {
    async fn next_frame(&self) {
        self.signal.notify.notified().await;
    }
}

// ==============================================================================
// Fixed rate
// ==============================================================================

/// Waits one frame period after each completed tick
pub struct FixedRateScheduler {
    period: Duration,
}

impl FixedRateScheduler {
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl FrameScheduler for FixedRateScheduler {
    async fn next_frame(&self) {
        tokio::time::sleep(self.period).await;
    }
}

/// Only yields to the runtime; for offline replay and tests
pub struct ImmediateScheduler;

#[async_trait]
impl FrameScheduler for ImmediateScheduler {
    async fn next_frame(&self) {
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_rate_period() {
        assert_eq!(FixedRateScheduler::new(50).period(), Duration::from_millis(20));
        // Zero fps is treated as 1 fps rather than dividing by zero
        assert_eq!(FixedRateScheduler::new(0).period(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_host_frame_waits_for_signal() {
        let signal = FrameSignal::new();
        let scheduler = HostFrameScheduler::new(signal.clone());

        let waiting = tokio::time::timeout(Duration::from_millis(20), scheduler.next_frame()).await;
        assert!(waiting.is_err());

        signal.frame_rendered();
        let ready = tokio::time::timeout(Duration::from_millis(200), scheduler.next_frame()).await;
        assert!(ready.is_ok());
    }

    #[tokio::test]
    async fn test_host_frames_coalesce() {
        let signal = FrameSignal::new();
        let scheduler = HostFrameScheduler::new(signal.clone());

        signal.frame_rendered();
        signal.frame_rendered();
        signal.frame_rendered();

        scheduler.next_frame().await;
        let second = tokio::time::timeout(Duration::from_millis(20), scheduler.next_frame()).await;
        assert!(second.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_rate_sleeps() {
        let scheduler = FixedRateScheduler::new(10);
        let start = tokio::time::Instant::now();
        scheduler.next_frame().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
