// Smoothed object transform published to the renderer

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Move `alpha` of the way from `self` towards `target`, per component
    pub fn approach(self, target: Vec3, alpha: f32) -> Vec3 {
        Vec3 {
            x: approach(self.x, target.x, alpha),
            y: approach(self.y, target.y, alpha),
            z: approach(self.z, target.z, alpha),
        }
    }
}

/// Exponential moving average step: `current + (target - current) * alpha`
pub fn approach(current: f32, target: f32, alpha: f32) -> f32 {
    current + (target - current) * alpha
}

/// Position, per-axis rotation (radians) and uniform scale of the driven object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl TransformState {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}
