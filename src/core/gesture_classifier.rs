// Gesture classification - turns one landmark frame into a set of gestures

use crate::models::gesture::Gesture;
use crate::models::hand::LandmarkFrame;
use serde::{Deserialize, Serialize};

/// Thresholds for gesture recognition (normalized image coordinates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Thumb-to-index distance below which a pinch is reported
    pub pinch_threshold: f32,
    /// Distance at which pinch confidence reaches zero
    pub pinch_falloff: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.2,
            pinch_falloff: 0.2,
        }
    }
}

/// Stateless classifier. Each gesture check runs independently over the same
/// frame and contributes at most one entry.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Classify the gestures present in `frame`. No frame means no gestures.
    pub fn classify(&self, frame: Option<&LandmarkFrame>) -> Vec<Gesture> {
        let frame = match frame {
            Some(f) => f,
            None => return Vec::new(),
        };

        let mut gestures = Vec::new();
        if let Some(pinch) = self.detect_pinch(frame) {
            gestures.push(pinch);
        }
        gestures
    }

    fn detect_pinch(&self, frame: &LandmarkFrame) -> Option<Gesture> {
        let distance = pinch_distance(frame);
        // NaN compares false and falls through to "no pinch"
        if !(distance < self.config.pinch_threshold) {
            return None;
        }

        let confidence = (1.0 - distance / self.config.pinch_falloff).clamp(0.0, 1.0);
        Some(Gesture::pinch(confidence))
    }
}

/// Image-plane distance between thumb tip and index fingertip
pub fn pinch_distance(frame: &LandmarkFrame) -> f32 {
    frame.thumb_tip().planar_distance(frame.index_tip())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::gesture::GestureKind;
    use crate::models::hand::{HandLandmark, Landmark, HAND_LANDMARK_COUNT};

    fn hand(thumb: (f32, f32), index: (f32, f32)) -> LandmarkFrame {
        LandmarkFrame::new([Landmark::new(0.5, 0.5, 0.0); HAND_LANDMARK_COUNT])
            .with_landmark(HandLandmark::ThumbTip, Landmark::new(thumb.0, thumb.1, 0.0))
            .with_landmark(HandLandmark::IndexFingerTip, Landmark::new(index.0, index.1, 0.0))
    }

    fn pinch_confidence(classifier: &GestureClassifier, frame: &LandmarkFrame) -> Option<f32> {
        classifier
            .classify(Some(frame))
            .iter()
            .find(|g| g.kind == GestureKind::Pinch)
            .map(|g| g.confidence)
    }

    #[test]
    fn test_no_frame_no_gestures() {
        let classifier = GestureClassifier::default();
        assert!(classifier.classify(None).is_empty());
    }

    #[test]
    fn test_touching_fingers_full_confidence() {
        let classifier = GestureClassifier::default();
        let frame = hand((0.1, 0.5), (0.1, 0.5));
        assert_eq!(pinch_confidence(&classifier, &frame), Some(1.0));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let frame = hand((0.1, 0.5), (0.3, 0.5));
        let distance = pinch_distance(&frame);
        assert!((distance - 0.2).abs() < 1e-6);

        let classifier = GestureClassifier::new(GestureConfig {
            pinch_threshold: distance,
            pinch_falloff: distance,
        });
        assert!(classifier.classify(Some(&frame)).is_empty());

        let just_inside = hand((0.1, 0.5), (0.299, 0.5));
        let confidence = pinch_confidence(&classifier, &just_inside).unwrap();
        assert!(confidence > 0.0 && confidence < 0.01);
    }

    #[test]
    fn test_confidence_falls_off_with_distance() {
        let classifier = GestureClassifier::default();
        let mut last = f32::INFINITY;
        for step in 0..20 {
            let d = step as f32 * 0.01;
            let frame = hand((0.2, 0.4), (0.2 + d, 0.4));
            let confidence = pinch_confidence(&classifier, &frame).unwrap_or(0.0);
            assert!(confidence <= last, "confidence rose at d={}", d);
            last = confidence;
        }
        let half = hand((0.2, 0.4), (0.3, 0.4));
        let confidence = pinch_confidence(&classifier, &half).unwrap();
        assert!((confidence - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = hand((0.12, 0.33), (0.27, 0.41));
        let b = hand((0.27, 0.41), (0.12, 0.33));
        assert_eq!(pinch_distance(&a), pinch_distance(&b));

        let classifier = GestureClassifier::default();
        assert_eq!(classifier.classify(Some(&a)), classifier.classify(Some(&b)));
    }

    #[test]
    fn test_depth_is_ignored() {
        let classifier = GestureClassifier::default();
        let frame = hand((0.4, 0.4), (0.4, 0.4))
            .with_landmark(HandLandmark::IndexFingerTip, Landmark::new(0.4, 0.4, 5.0));
        assert_eq!(pinch_confidence(&classifier, &frame), Some(1.0));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = GestureClassifier::default();
        let frame = hand((0.31, 0.62), (0.35, 0.6));
        assert_eq!(classifier.classify(Some(&frame)), classifier.classify(Some(&frame)));
    }

    #[test]
    fn test_custom_falloff() {
        let classifier = GestureClassifier::new(GestureConfig {
            pinch_threshold: 0.2,
            pinch_falloff: 0.4,
        });
        let frame = hand((0.0, 0.0), (0.1, 0.0));
        let confidence = pinch_confidence(&classifier, &frame).unwrap();
        assert!((confidence - 0.75).abs() < 1e-4);
    }
}
