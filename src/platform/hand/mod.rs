// Hand landmark platform integration
// External model and frame-source seams, plus a replay backend

pub mod detector;
pub mod recorded;

pub use detector::{FrameSource, HandDetector, NullHandDetector, ReadinessFlag};
pub use recorded::{CoordinateSpace, RecordedHandDetector, RecordingError};
