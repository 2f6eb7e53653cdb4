use glam::{Mat4, Quat, Vec3};

/// Rotation from XYZ-ordered Euler angles (radians), i.e. `Rx * Ry * Rz`.
#[inline]
pub fn euler_xyz(r: Vec3) -> Quat {
    Quat::from_rotation_x(r.x) * Quat::from_rotation_y(r.y) * Quat::from_rotation_z(r.z)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_position_euler(translation: Vec3, euler: Vec3) -> Self {
        Self {
            translation,
            rotation: euler_xyz(euler),
            scale: Vec3::ONE,
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    #[inline]
    pub fn set_euler(&mut self, euler: Vec3) {
        self.rotation = euler_xyz(euler);
    }

    #[inline]
    pub fn set_uniform_scale(&mut self, s: f32) {
        self.scale = Vec3::splat(s);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn euler_applies_z_first() {
        // Rx(90) * Rz(90) sends +X to +Z: Rz turns X into Y, then Rx turns Y into Z.
        let q = euler_xyz(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        let v = q * Vec3::X;
        assert!((v - Vec3::Z).length() < 1e-5, "{v:?}");
    }
}
