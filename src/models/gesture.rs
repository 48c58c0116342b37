// Classified hand gestures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Pinch, // Thumb tip and index fingertip close together
}

impl GestureKind {
    pub fn to_string(&self) -> &'static str {
        match self {
            GestureKind::Pinch => "pinch",
        }
    }
}

/// A gesture detected in one frame, with a continuous confidence in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    pub kind: GestureKind,
    pub confidence: f32,
}

impl Gesture {
    pub fn new(kind: GestureKind, confidence: f32) -> Self {
        Self {
            kind,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn pinch(confidence: f32) -> Self {
        Self::new(GestureKind::Pinch, confidence)
    }
}

/// First gesture of the given kind, if any
pub fn find_gesture(gestures: &[Gesture], kind: GestureKind) -> Option<&Gesture> {
    gestures.iter().find(|g| g.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Gesture::pinch(1.7).confidence, 1.0);
        assert_eq!(Gesture::pinch(-0.2).confidence, 0.0);
    }

    #[test]
    fn test_serialized_kind() {
        let json = serde_json::to_string(&Gesture::pinch(0.5)).unwrap();
        assert_eq!(json, r#"{"kind":"pinch","confidence":0.5}"#);
        assert_eq!(GestureKind::Pinch.to_string(), "pinch");
    }
}
