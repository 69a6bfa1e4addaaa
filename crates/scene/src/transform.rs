use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Euler rotation in radians using XYZ order: X is applied first, then Y,
/// then Z, so the rotation matrix is `Rz * Ry * Rx`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Euler {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn from_degrees(x: f32, y: f32, z: f32) -> Self {
        Self::new(x.to_radians(), y.to_radians(), z.to_radians())
    }

    pub fn from_quat(rotation: Quat) -> Self {
        let (z, y, x) = rotation.to_euler(EulerRot::ZYX);
        Self { x, y, z }
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::ZYX, self.z, self.y, self.x)
    }

    pub fn to_degrees(self) -> [f32; 3] {
        [self.x.to_degrees(), self.y.to_degrees(), self.z.to_degrees()]
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub location: Vec3,
    pub rotation_euler: Euler,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation_euler: Euler::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_location(location: Vec3) -> Self {
        Self {
            location,
            ..Self::default()
        }
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, location) = matrix.to_scale_rotation_translation();
        Self {
            location,
            rotation_euler: Euler::from_quat(rotation),
            scale,
        }
    }

    pub fn rotation(&self) -> Quat {
        self.rotation_euler.to_quat()
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation(), self.location)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1.0e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn euler_applies_x_before_z() {
        let rotation = Euler::new(FRAC_PI_2, 0.0, FRAC_PI_2).to_quat();
        // X turns +Y into +Z, then Z leaves +Z alone.
        assert_vec_close(rotation * Vec3::Y, Vec3::Z);
        // X leaves +X alone, then Z turns it into +Y.
        assert_vec_close(rotation * Vec3::X, Vec3::Y);
    }

    #[test]
    fn euler_quat_conversion_is_stable() {
        let euler = Euler::new(0.3, -0.7, 1.1);
        let back = Euler::from_quat(euler.to_quat());
        assert!((back.x - euler.x).abs() < 1.0e-5);
        assert!((back.y - euler.y).abs() < 1.0e-5);
        assert!((back.z - euler.z).abs() < 1.0e-5);
    }

    #[test]
    fn transform_matrix_round_trips() {
        let transform = Transform {
            location: Vec3::new(1.0, 2.0, 3.0),
            rotation_euler: Euler::from_degrees(10.0, 20.0, 30.0),
            scale: Vec3::splat(2.0),
        };
        let back = Transform::from_matrix(transform.matrix());
        assert_vec_close(back.location, transform.location);
        assert_vec_close(back.scale, transform.scale);
        assert!(back.rotation().angle_between(transform.rotation()) < 1.0e-4);
    }
}
