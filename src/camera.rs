use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use winit::event::KeyEvent;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::scene::DirectionalLight;
use crate::types::CameraUniform;

pub const CAMERA_ROTATION_SPEED: f32 = 0.02;

/// Wheel zoom factor per notch before `zoom_speed` is applied
const ZOOM_BASE: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_azimuth: f32,
    pub max_azimuth: f32,
    pub max_polar: f32,
    /// Fraction of orbit velocity lost per frame
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-9.354, 10.364, -2.8],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 50.0,
            near: 0.1,
            far: 2000.0,
            min_distance: 10.0,
            max_distance: 20.0,
            min_azimuth: -2.66,
            max_azimuth: -1.06,
            max_polar: 1.5,
            damping: 0.1,
            rotate_speed: 0.85,
            zoom_speed: 0.66,
        }
    }
}

#[derive(Default, Clone, Copy)]
pub struct MovementState {
    pub orbit_left: bool,
    pub orbit_right: bool,
    pub orbit_up: bool,
    pub orbit_down: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
}

impl MovementState {
    const fn to_direction(&self, positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// (azimuth, polar, zoom) input directions
    const fn velocity(&self) -> (f32, f32, f32) {
        (
            self.to_direction(self.orbit_right, self.orbit_left),
            self.to_direction(self.orbit_down, self.orbit_up),
            self.to_direction(self.zoom_in, self.zoom_out),
        )
    }
}

/// Damped orbit around a fixed target with clamped angles and distance
pub struct Camera {
    pub target: Vec3,
    pub radius: f32,
    /// Angle about +Y, measured from +Z toward +X
    pub azimuth: f32,
    /// Angle down from +Y
    pub polar: f32,
    pub movement: MovementState,
    azimuth_velocity: f32,
    polar_velocity: f32,
    config: CameraConfig,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let target = Vec3::from_array(config.target);
        let offset = Vec3::from_array(config.position) - target;
        let radius = offset.length().max(f32::EPSILON);

        let mut camera = Self {
            target,
            radius,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            movement: MovementState::default(),
            azimuth_velocity: 0.0,
            polar_velocity: 0.0,
            config,
        };
        camera.clamp();
        camera
    }

    pub fn position(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.target
            + self.radius * Vec3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth)
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.config.fov_degrees.to_radians(),
            aspect.max(f32::EPSILON),
            self.config.near,
            self.config.far,
        )
    }

    /// Advance one frame of keyboard orbit and damping
    pub fn update(&mut self) {
        let (azimuth_dir, polar_dir, zoom_dir) = self.movement.velocity();
        let step = CAMERA_ROTATION_SPEED * self.config.rotate_speed;

        self.azimuth_velocity += azimuth_dir * step;
        self.polar_velocity += polar_dir * step;

        self.azimuth += self.azimuth_velocity;
        self.polar += self.polar_velocity;

        let damping = self.config.damping.clamp(0.0, 1.0);
        self.azimuth_velocity *= 1.0 - damping;
        self.polar_velocity *= 1.0 - damping;

        if zoom_dir != 0.0 {
            self.zoom(zoom_dir * 0.25);
        }
        self.clamp();
    }

    /// Positive `notches` move closer
    pub fn zoom(&mut self, notches: f32) {
        let scale = ZOOM_BASE.powf(self.config.zoom_speed * notches);
        self.radius *= scale;
        self.clamp();
    }

    fn clamp(&mut self) {
        let c = &self.config;
        self.radius = self.radius.clamp(c.min_distance, c.max_distance.max(c.min_distance));
        self.azimuth = self.azimuth.clamp(c.min_azimuth, c.max_azimuth.max(c.min_azimuth));
        self.polar = self.polar.clamp(1e-3, c.max_polar.min(std::f32::consts::PI - 1e-3));
    }

    pub fn to_uniform(&self, aspect: f32, light: &DirectionalLight, ambient: f32) -> CameraUniform {
        let view_proj = self.projection_matrix(aspect) * self.view_matrix();

        CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
            eye: self.position().to_array(),
            ambient,
            light_dir: light.direction().to_array(),
            light_intensity: light.intensity,
            light_color: light.color,
            _pad: 0.0,
        }
    }

    pub fn process_keyboard(&mut self, event: &KeyEvent) {
        let is_pressed = event.state.is_pressed();
        if let PhysicalKey::Code(keycode) = event.physical_key {
            match keycode {
                KeyCode::KeyA | KeyCode::ArrowLeft => self.movement.orbit_left = is_pressed,
                KeyCode::KeyD | KeyCode::ArrowRight => self.movement.orbit_right = is_pressed,
                KeyCode::KeyW | KeyCode::ArrowUp => self.movement.orbit_up = is_pressed,
                KeyCode::KeyS | KeyCode::ArrowDown => self.movement.orbit_down = is_pressed,
                KeyCode::KeyE => self.movement.zoom_in = is_pressed,
                KeyCode::KeyQ => self.movement.zoom_out = is_pressed,
                _ => {}
            }
        }
    }
}
