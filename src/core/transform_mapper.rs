// Transform mapping - converts landmarks and gestures into a smoothed object transform

use crate::models::gesture::{find_gesture, Gesture, GestureKind};
use crate::models::hand::LandmarkFrame;
use crate::models::transform::{approach, TransformState, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::time::Duration;

/// What to publish when a tick has no hand in view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LostHandPolicy {
    Hold,  // Keep the last smoothed transform
    Reset, // Snap back to identity
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub smoothing_factor: f32,        // EMA weight per tick, in (0, 1)
    pub vertical_gain: f32,           // Tilt about x per unit of palm y offset (times pi)
    pub horizontal_gain: f32,         // Turn about y per unit of palm x offset (times pi)
    pub thumb_roll: bool,             // Drive z rotation from the palm->thumb angle
    pub track_position: bool,         // Drive position from the palm; otherwise pinned at origin
    pub position_range: f32,          // Half-extent of the working volume
    pub min_scale: f32,
    pub max_scale: f32,
    pub lost_hand: LostHandPolicy,
    pub reference_fps: Option<u32>,   // Frame rate the smoothing factor is tuned for
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.1,
            vertical_gain: 4.0,
            horizontal_gain: 4.0,
            thumb_roll: false,
            track_position: true,
            position_range: 1.0,
            min_scale: 0.5,
            max_scale: 2.5,
            lost_hand: LostHandPolicy::Hold,
            reference_fps: None,
        }
    }
}

/// Pure mapper from one tick's detections to the next published transform.
#[derive(Debug, Clone, Default)]
pub struct TransformMapper {
    config: MappingConfig,
}

impl TransformMapper {
    pub fn new(config: MappingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Compute the next smoothed transform.
    ///
    /// With no usable frame the previous transform is held (or reset to identity
    /// under `LostHandPolicy::Reset`). Otherwise the target derived from this
    /// frame alone is blended into `previous` by the smoothing factor.
    pub fn map(
        &self,
        frame: Option<&LandmarkFrame>,
        gestures: &[Gesture],
        previous: &TransformState,
        dt_hint: Option<Duration>,
    ) -> TransformState {
        // A frame with NaN or infinite coordinates counts as no hand; once in
        // the moving average a NaN would never decay out
        let frame = match frame {
            Some(f) if f.is_finite() => f,
            _ => {
                return match self.config.lost_hand {
                    LostHandPolicy::Hold => *previous,
                    LostHandPolicy::Reset => TransformState::identity(),
                }
            }
        };

        let target = self.target(frame, gestures, previous);
        let alpha = self.effective_alpha(dt_hint);

        let scale = approach(previous.scale, target.scale, alpha)
            .clamp(self.config.min_scale, self.config.max_scale);

        TransformState {
            position: previous.position.approach(target.position, alpha),
            rotation: previous.rotation.approach(target.rotation, alpha),
            scale,
        }
    }

    /// Unsmoothed transform implied by a single frame
    pub fn target(
        &self,
        frame: &LandmarkFrame,
        gestures: &[Gesture],
        previous: &TransformState,
    ) -> TransformState {
        let palm = frame.palm();

        let roll = if self.config.thumb_roll {
            let thumb = frame.thumb_tip();
            (thumb.y - palm.y).atan2(thumb.x - palm.x)
        } else {
            0.0
        };

        let rotation = Vec3::new(
            (palm.y - 0.5) * PI * self.config.vertical_gain,
            (palm.x - 0.5) * PI * self.config.horizontal_gain,
            roll,
        );

        let position = if self.config.track_position {
            let range = self.config.position_range;
            Vec3::new(
                ((palm.x - 0.5) * 2.0 * range).clamp(-range, range),
                (-(palm.y - 0.5) * 2.0 * range).clamp(-range, range), // Image y grows downwards
                0.0,
            )
        } else {
            Vec3::ZERO
        };

        // Scale only moves under an active pinch
        let scale = match find_gesture(gestures, GestureKind::Pinch) {
            Some(pinch) => {
                self.config.min_scale + pinch.confidence * (self.config.max_scale - self.config.min_scale)
            }
            None => previous.scale,
        };

        TransformState {
            position,
            rotation,
            scale,
        }
    }

    fn effective_alpha(&self, dt_hint: Option<Duration>) -> f32 {
        let alpha = self.config.smoothing_factor;
        match (self.config.reference_fps, dt_hint) {
            (Some(fps), Some(dt)) => {
                let frames = dt.as_secs_f32() * fps as f32;
                (1.0 - (1.0 - alpha).powf(frames)).clamp(0.0, 1.0)
            }
            _ => alpha,
        }
    }
}
