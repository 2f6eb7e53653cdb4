use crate::constants::*;
use crate::picking::Ray;
use crate::scene::euler_xyz;
use glam::{Mat4, Vec3, Vec4};

/// Perspective camera posed by a position and an XYZ Euler rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Camera {
    /// The scene camera at its pre-intro pose.
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            aspect,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: Vec3::from(CAMERA_START_POSITION),
            rotation: Vec3::from(CAMERA_START_ROTATION),
        }
    }

    pub fn with_pose(mut self, position: Vec3, rotation: Vec3) -> Self {
        self.position = position;
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.aspect = width / height.max(1.0);
    }

    /// Camera-to-world transform.
    #[inline]
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(euler_xyz(self.rotation), self.position)
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The camera looks down its local -Z.
    pub fn forward(&self) -> Vec3 {
        euler_xyz(self.rotation) * Vec3::NEG_Z
    }

    /// World-space ray through normalized device coordinates (`x`, `y` in -1..1, +y up).
    pub fn ray_from_ndc(&self, x: f32, y: f32) -> Ray {
        let inv = self.view_projection().inverse();
        let far = inv * Vec4::new(x, y, 1.0, 1.0);
        let far = far.truncate() / far.w;
        Ray::new(self.position, far - self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_matches_forward() {
        let cam = Camera::new(16.0 / 9.0).with_pose(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.2, -0.4, 0.1));
        let ray = cam.ray_from_ndc(0.0, 0.0);
        assert!((ray.dir - cam.forward()).length() < 1e-4);
        assert_eq!(ray.origin, cam.position);
    }

    #[test]
    fn identity_pose_looks_down_negative_z() {
        let cam = Camera::new(1.0).with_pose(Vec3::ZERO, Vec3::ZERO);
        let p = cam.view_projection() * Vec4::new(0.0, 0.0, -10.0, 1.0);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!(p.w > 0.0);
    }
}
