pub mod config;

// Gesture interpretation
pub mod gesture_classifier;
pub mod transform_mapper;

// Per-frame update loop
pub mod frame_scheduler;
pub mod tracking_loop;
