// Data models for hand landmarks, gestures, transforms and tracking sessions

pub mod hand;
pub mod gesture;
pub mod transform;
pub mod tracking;
