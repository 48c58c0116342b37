// Data models for single-hand landmark detections

use serde::{Deserialize, Serialize};

/// Number of landmarks in a hand detection
pub const HAND_LANDMARK_COUNT: usize = 21;

// ==============================================================================
// Landmark
// ==============================================================================

/// A single detected hand keypoint
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32, // Normalized [0, 1] across frame width
    pub y: f32, // Normalized [0, 1] down the frame height
    pub z: f32, // Relative depth, no fixed scale
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in the image plane (z ignored)
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Hand landmark indices (21 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0, // Palm base
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

// ==============================================================================
// Landmark Frame
// ==============================================================================

/// One hand detection: exactly 21 landmarks in fixed index order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkFrame {
    points: [Landmark; HAND_LANDMARK_COUNT],
}

impl LandmarkFrame {
    pub fn new(points: [Landmark; HAND_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build a frame from pixel-space coordinates, normalizing x/y by the
    /// frame dimensions. z is passed through untouched.
    pub fn from_pixels(points: &[[f32; 3]], width: u32, height: u32) -> Result<Self, LandmarkError> {
        if width == 0 || height == 0 {
            return Err(LandmarkError::InvalidDimensions { width, height });
        }

        let landmarks: Vec<Landmark> = points
            .iter()
            .map(|p| Landmark::new(p[0] / width as f32, p[1] / height as f32, p[2]))
            .collect();

        Self::try_from(landmarks)
    }

    pub fn get(&self, landmark: HandLandmark) -> &Landmark {
        &self.points[landmark.index()]
    }

    pub fn palm(&self) -> &Landmark {
        self.get(HandLandmark::Wrist)
    }

    pub fn thumb_tip(&self) -> &Landmark {
        self.get(HandLandmark::ThumbTip)
    }

    pub fn index_tip(&self) -> &Landmark {
        self.get(HandLandmark::IndexFingerTip)
    }

    pub fn points(&self) -> &[Landmark; HAND_LANDMARK_COUNT] {
        &self.points
    }

    /// False if any coordinate is NaN or infinite. Frames built with `new`
    /// skip the check `try_from` performs.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Landmark::is_finite)
    }

    /// Copy of this frame with one landmark replaced
    pub fn with_landmark(mut self, landmark: HandLandmark, point: Landmark) -> Self {
        self.points[landmark.index()] = point;
        self
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkFrame {
    type Error = LandmarkError;

    fn try_from(landmarks: Vec<Landmark>) -> Result<Self, Self::Error> {
        let count = landmarks.len();
        if let Some(index) = landmarks.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite(index));
        }
        let points: [Landmark; HAND_LANDMARK_COUNT] = landmarks
            .try_into()
            .map_err(|_| LandmarkError::WrongCount(count))?;
        Ok(Self { points })
    }
}

impl From<LandmarkFrame> for Vec<Landmark> {
    fn from(frame: LandmarkFrame) -> Self {
        frame.points.to_vec()
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LandmarkError {
    #[error("Expected 21 hand landmarks, got {0}")]
    WrongCount(usize),

    #[error("Landmark {0} has a non-finite coordinate")]
    NonFinite(usize),

    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_points(count: usize) -> Vec<Landmark> {
        (0..count)
            .map(|i| Landmark::new(i as f32 / 40.0, 0.5, 0.0))
            .collect()
    }

    #[test]
    fn test_frame_requires_21_points() {
        assert!(LandmarkFrame::try_from(flat_points(21)).is_ok());
        assert_eq!(
            LandmarkFrame::try_from(flat_points(20)),
            Err(LandmarkError::WrongCount(20))
        );
        assert_eq!(
            LandmarkFrame::try_from(flat_points(22)),
            Err(LandmarkError::WrongCount(22))
        );
    }

    #[test]
    fn test_frame_rejects_nan() {
        let mut points = flat_points(21);
        points[7].y = f32::NAN;
        assert_eq!(LandmarkFrame::try_from(points), Err(LandmarkError::NonFinite(7)));
    }

    #[test]
    fn test_unchecked_frame_reports_non_finite() {
        let frame = LandmarkFrame::try_from(flat_points(21)).unwrap();
        assert!(frame.is_finite());
        let bad = frame.with_landmark(HandLandmark::PinkyTip, Landmark::new(0.5, f32::INFINITY, 0.0));
        assert!(!bad.is_finite());
    }

    #[test]
    fn test_named_indices() {
        let frame = LandmarkFrame::try_from(flat_points(21)).unwrap();
        assert_eq!(frame.palm().x, 0.0);
        assert_eq!(frame.thumb_tip().x, 4.0 / 40.0);
        assert_eq!(frame.index_tip().x, 8.0 / 40.0);
        assert_eq!(HandLandmark::PinkyTip.index(), 20);
    }

    #[test]
    fn test_from_pixels_normalizes() {
        let points = vec![[320.0, 240.0, -12.0]; 21];
        let frame = LandmarkFrame::from_pixels(&points, 640, 480).unwrap();
        assert!((frame.palm().x - 0.5).abs() < 1e-6);
        assert!((frame.palm().y - 0.5).abs() < 1e-6);
        assert_eq!(frame.palm().z, -12.0);

        assert!(matches!(
            LandmarkFrame::from_pixels(&points, 0, 480),
            Err(LandmarkError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_planar_distance_ignores_depth() {
        let a = Landmark::new(0.1, 0.1, 0.0);
        let b = Landmark::new(0.4, 0.5, 9.0);
        assert!((a.planar_distance(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_frame_deserialization_checks_count() {
        let json = serde_json::to_string(&flat_points(21)).unwrap();
        let frame: LandmarkFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame.points().len(), HAND_LANDMARK_COUNT);

        let short = serde_json::to_string(&flat_points(3)).unwrap();
        assert!(serde_json::from_str::<LandmarkFrame>(&short).is_err());
    }
}
