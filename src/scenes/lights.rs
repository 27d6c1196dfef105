use glam::Vec3;

use crate::scene::DirectionalLight;

pub const OVERHEAD_LIGHT_POSITION: Vec3 = Vec3::new(0.0, 10.0, 0.0);

/// White directional light straight above the table
pub fn overhead_light(intensity: f32) -> DirectionalLight {
    DirectionalLight {
        position: OVERHEAD_LIGHT_POSITION,
        color: [1.0, 1.0, 1.0],
        intensity,
    }
}
