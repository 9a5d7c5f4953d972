//! User-orbitable perspective camera.

use girder_math::{Mat4, Point3, Vec3};

/// Minimum/maximum orbit distance in metres.
const DISTANCE_RANGE: (f64, f64) = (0.2, 20.0);

/// Pitch is kept just short of the poles so the up vector never
/// degenerates.
const PITCH_LIMIT: f64 = std::f64::consts::FRAC_PI_2 - 0.01;

/// Maps OpenGL clip depth (-1..1) onto wgpu's 0..1 range.
#[rustfmt::skip]
const DEPTH_CORRECTION: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
];

/// Perspective orbit camera: a target point plus spherical eye
/// coordinates (yaw around +Y, pitch above the horizon, distance).
///
/// Pan, zoom, and rotate are all enabled; input only ever mutates camera
/// state, never the scene geometry.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Look-at target.
    pub target: Point3,
    /// Distance from target to eye in metres.
    pub distance: f64,
    /// Rotation around +Y in radians.
    pub yaw: f64,
    /// Elevation above the horizontal plane in radians.
    pub pitch: f64,
    /// Vertical field of view in radians.
    pub fov_y: f64,
}

impl OrbitCamera {
    /// Camera at the section viewer's fixed initial position: eye at
    /// (2, 2, 2) metres looking at the origin.
    pub fn new() -> Self {
        let eye = Vec3::new(2.0, 2.0, 2.0);
        Self {
            target: Point3::origin(),
            distance: eye.norm(),
            yaw: eye.z.atan2(eye.x),
            pitch: (eye.y / eye.norm()).asin(),
            fov_y: 50.0_f64.to_radians(),
        }
    }

    /// Current eye position.
    pub fn eye(&self) -> Point3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.target
            + self.distance
                * Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw)
    }

    /// Rotate the eye around the target.
    pub fn orbit(&mut self, delta_yaw: f64, delta_pitch: f64) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Scale the orbit distance (`factor < 1` zooms in).
    pub fn zoom(&mut self, factor: f64) {
        self.distance = (self.distance * factor).clamp(DISTANCE_RANGE.0, DISTANCE_RANGE.1);
    }

    /// Slide the target in the view plane. Deltas are fractions of the
    /// current distance, so panning feels uniform at any zoom level.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let forward = (self.target - self.eye()).normalize();
        let right = forward.cross(&Vec3::y()).normalize();
        let up = right.cross(&forward);
        self.target += self.distance * (dx * right + dy * up);
    }

    /// Combined view-projection matrix for the given aspect ratio,
    /// mapped to wgpu's depth range.
    pub fn view_proj(&self, aspect: f64) -> Mat4 {
        let view = Mat4::look_at_rh(&self.eye(), &self.target, &Vec3::y());
        let proj = Mat4::new_perspective(aspect, self.fov_y, 0.01, 100.0);
        Mat4::from_row_slice(&DEPTH_CORRECTION) * proj * view
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_eye_position() {
        let camera = OrbitCamera::new();
        let eye = camera.eye();
        assert!((eye.x - 2.0).abs() < 1e-9);
        assert!((eye.y - 2.0).abs() < 1e-9);
        assert!((eye.z - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_orbit_clamps_pitch() {
        let mut camera = OrbitCamera::new();
        camera.orbit(0.0, 10.0);
        assert!(camera.pitch <= PITCH_LIMIT);
        camera.orbit(0.0, -20.0);
        assert!(camera.pitch >= -PITCH_LIMIT);
        // Eye must stay finite at the clamp.
        assert!(camera.eye().coords.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut camera = OrbitCamera::new();
        camera.zoom(1e-6);
        assert!((camera.distance - DISTANCE_RANGE.0).abs() < 1e-12);
        camera.zoom(1e9);
        assert!((camera.distance - DISTANCE_RANGE.1).abs() < 1e-12);
    }

    #[test]
    fn test_orbit_preserves_distance() {
        let mut camera = OrbitCamera::new();
        camera.orbit(1.3, -0.4);
        let eye = camera.eye();
        assert!(((eye - camera.target).norm() - camera.distance).abs() < 1e-9);
    }

    #[test]
    fn test_pan_moves_target_not_distance() {
        let mut camera = OrbitCamera::new();
        let before = camera.target;
        camera.pan(0.1, -0.05);
        assert!((camera.target - before).norm() > 0.0);
        let eye = camera.eye();
        assert!(((eye - camera.target).norm() - camera.distance).abs() < 1e-9);
    }

    #[test]
    fn test_view_proj_finite() {
        let mut camera = OrbitCamera::new();
        camera.orbit(2.0, 1.5);
        camera.zoom(0.1);
        camera.pan(0.5, 0.5);
        let m = camera.view_proj(16.0 / 9.0);
        assert!(m.iter().all(|v| v.is_finite()));
    }
}
