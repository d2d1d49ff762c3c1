//! First-person camera state used as the collision probe.

use gloom_math::{Mat4, Sphere, Vec3};

/// Default camera "fatness": radius of the collision sphere.
pub const DEFAULT_CAMERA_RADIUS: f32 = 0.5;

/// Pitch is clamped just short of straight up/down to keep the view basis valid.
const MAX_PITCH: f32 = 89.0_f32 * std::f32::consts::PI / 180.0;

/// Camera position, collision radius and look direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,

    /// Fixed collision radius
    pub radius: f32,

    /// Heading around +Y in radians; 0 looks down -Z
    pub yaw: f32,

    /// Elevation in radians
    pub pitch: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Vec3::ZERO, DEFAULT_CAMERA_RADIUS)
    }
}

impl CameraState {
    /// Create a camera looking down -Z.
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            radius,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// The collision sphere at the current position.
    pub fn sphere(&self) -> Sphere {
        Sphere::new(self.position, self.radius)
    }

    /// Unit look direction.
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    /// Unit right vector, always horizontal.
    pub fn right(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_yaw, 0.0, -sin_yaw)
    }

    /// Turn by yaw/pitch deltas in radians.
    pub fn look(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// World-space displacement for walk input.
    ///
    /// `forward`, `right` and `up` are axis amounts (typically -1, 0 or 1);
    /// forward movement stays on the horizontal plane.
    pub fn walk_delta(&self, forward: f32, right: f32, up: f32, speed: f32, dt: f32) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let flat_forward = Vec3::new(-sin_yaw, 0.0, -cos_yaw);
        let direction = flat_forward * forward + self.right() * right + Vec3::Y * up;
        direction.normalize_or_zero() * speed * dt
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }
}
