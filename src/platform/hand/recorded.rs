// Recorded-session hand detector
// Replays landmark detections captured from a real model, one per detect() call

use crate::models::hand::{Landmark, LandmarkFrame};
use crate::models::tracking::{TrackingError, TrackingResult};
use crate::platform::hand::detector::HandDetector;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Coordinate space of recorded landmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    #[default]
    Normalized,
    Pixels,
}

#[derive(Debug, Deserialize)]
struct RecordingFile {
    #[serde(default)]
    frame_width: u32,
    #[serde(default)]
    frame_height: u32,
    #[serde(default)]
    space: CoordinateSpace,
    #[serde(default)]
    looping: bool,
    frames: Vec<RecordedEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordedEntry {
    Error { error: String },
    Hand { hand: Option<Vec<[f32; 3]>> },
}

#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    #[error("Failed to read recording: {0}")]
    Read(String),

    #[error("Failed to parse recording: {0}")]
    Parse(String),

    #[error("Pixel-space recording needs frame dimensions, got {width}x{height}")]
    MissingDimensions { width: u32, height: u32 },
}

pub struct RecordedHandDetector {
    detections: Vec<TrackingResult<Option<LandmarkFrame>>>,
    cursor: AtomicUsize,
    looping: bool,
}

impl RecordedHandDetector {
    pub fn new(detections: Vec<TrackingResult<Option<LandmarkFrame>>>, looping: bool) -> Self {
        Self {
            detections,
            cursor: AtomicUsize::new(0),
            looping,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordingError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| RecordingError::Read(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordingError> {
        let RecordingFile {
            frame_width,
            frame_height,
            space,
            looping,
            frames,
        } = serde_json::from_str(json).map_err(|e| RecordingError::Parse(e.to_string()))?;

        if space == CoordinateSpace::Pixels && (frame_width == 0 || frame_height == 0) {
            return Err(RecordingError::MissingDimensions {
                width: frame_width,
                height: frame_height,
            });
        }

        let detections = frames
            .into_iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                RecordedEntry::Error { error } => Err(TrackingError::DetectionFailed(error)),
                RecordedEntry::Hand { hand: None } => Ok(None),
                RecordedEntry::Hand { hand: Some(points) } => {
                    Ok(Self::to_frame(&points, space, (frame_width, frame_height), i))
                }
            })
            .collect();

        Ok(Self::new(detections, looping))
    }

    // Malformed entries become "no hand" rather than failing the whole recording
    fn to_frame(
        points: &[[f32; 3]],
        space: CoordinateSpace,
        (width, height): (u32, u32),
        index: usize,
    ) -> Option<LandmarkFrame> {
        let frame = match space {
            CoordinateSpace::Pixels => LandmarkFrame::from_pixels(points, width, height),
            CoordinateSpace::Normalized => LandmarkFrame::try_from(
                points
                    .iter()
                    .map(|p| Landmark::new(p[0], p[1], p[2]))
                    .collect::<Vec<_>>(),
            ),
        };

        match frame {
            Ok(frame) => Some(frame),
            Err(e) => {
                tracing::warn!("Recorded frame {} dropped: {}", index, e);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn rewind(&self) {
        self.cursor.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl HandDetector for RecordedHandDetector {
    async fn detect(&self) -> TrackingResult<Option<LandmarkFrame>> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let len = self.detections.len();

        let index = if index < len {
            index
        } else if self.looping && len > 0 {
            index % len
        } else {
            return Err(TrackingError::DetectorUnavailable(format!(
                "recording exhausted after {} frames",
                len
            )));
        };

        self.detections[index].clone()
    }

    fn is_initialized(&self) -> bool {
        true
    }

    fn get_model_info(&self) -> String {
        format!(
            "Recorded hand detector ({} frames, looping: {})",
            self.detections.len(),
            self.looping
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points_json(x: f32, y: f32) -> String {
        let points: Vec<[f32; 3]> = vec![[x, y, 0.0]; 21];
        serde_json::to_string(&points).unwrap()
    }

    #[tokio::test]
    async fn test_replays_entries_in_order() {
        let json = format!(
            r#"{{"frames": [{{"hand": {}}}, {{"hand": null}}, {{"error": "model busy"}}]}}"#,
            points_json(0.25, 0.75)
        );
        let detector = RecordedHandDetector::from_json(&json).unwrap();
        assert_eq!(detector.len(), 3);

        let first = detector.detect().await.unwrap().unwrap();
        assert_eq!(first.palm().x, 0.25);
        assert_eq!(detector.detect().await, Ok(None));
        assert_eq!(
            detector.detect().await,
            Err(TrackingError::DetectionFailed("model busy".to_string()))
        );
        assert!(matches!(
            detector.detect().await,
            Err(TrackingError::DetectorUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_looping_wraps_around() {
        let json = format!(
            r#"{{"looping": true, "frames": [{{"hand": {}}}, {{"hand": null}}]}}"#,
            points_json(0.1, 0.1)
        );
        let detector = RecordedHandDetector::from_json(&json).unwrap();
        for _ in 0..3 {
            assert!(detector.detect().await.unwrap().is_some());
            assert!(detector.detect().await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_pixel_space_is_normalized() {
        let json = format!(
            r#"{{"frame_width": 640, "frame_height": 480, "space": "pixels", "frames": [{{"hand": {}}}]}}"#,
            points_json(160.0, 120.0)
        );
        let detector = RecordedHandDetector::from_json(&json).unwrap();
        let frame = detector.detect().await.unwrap().unwrap();
        assert!((frame.palm().x - 0.25).abs() < 1e-6);
        assert!((frame.palm().y - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_space_requires_dimensions() {
        let json = r#"{"space": "pixels", "frames": []}"#;
        assert!(matches!(
            RecordedHandDetector::from_json(json),
            Err(RecordingError::MissingDimensions { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_hand_becomes_absent() {
        let json = r#"{"frames": [{"hand": [[0.1, 0.2, 0.0], [0.3, 0.4, 0.0]]}]}"#;
        let detector = RecordedHandDetector::from_json(json).unwrap();
        assert_eq!(detector.detect().await, Ok(None));
    }

    #[tokio::test]
    async fn test_rewind() {
        let detector = RecordedHandDetector::new(vec![Ok(None)], false);
        assert!(detector.detect().await.is_ok());
        assert!(detector.detect().await.is_err());
        detector.rewind();
        assert!(detector.detect().await.is_ok());
    }
}
