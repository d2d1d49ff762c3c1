// Transform utilities for Mat4
//
// Extends glam::Mat4 with bounding-volume helpers for scene propagation.
// Note: glam::Mat4 already provides transform_point3() and inverse()

use glam::Mat4;

use crate::Aabb;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    ///
    /// Computes the bounding box of all 8 transformed corners. An empty box
    /// stays empty.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        Aabb::from_positions(
            aabb.corners()
                .into_iter()
                .map(|corner| self.transform_point3(corner)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::ONE);
        let transformed = Mat4::IDENTITY.transform_aabb(&aabb);

        assert_eq!(transformed, aabb);
    }

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::new(5.0, 5.0, 5.0));
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = mat.transform_aabb(&aabb);

        assert!((transformed.min() - Vec3::new(5.0, 5.0, 5.0)).length() < 0.001);
        assert!((transformed.max() - Vec3::new(6.0, 6.0, 6.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_rotation_expands() {
        use std::f32::consts::FRAC_PI_4;

        // A unit cube rotated 45 degrees about Y spans sqrt(2) on X and Z
        let mat = Mat4::from_quat(Quat::from_rotation_y(FRAC_PI_4));
        let aabb = Aabb::from_points(Vec3::splat(-0.5), Vec3::splat(0.5));
        let transformed = mat.transform_aabb(&aabb);

        let half_diag = 0.5 * std::f32::consts::SQRT_2;
        assert!((transformed.x.max - half_diag).abs() < 0.001);
        assert!((transformed.z.min + half_diag).abs() < 0.001);
        assert!((transformed.y.max - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_transform_aabb_empty_stays_empty() {
        let mat = Mat4::from_translation(Vec3::ONE);
        assert!(mat.transform_aabb(&Aabb::EMPTY).is_empty());
    }

    #[test]
    fn test_transform_aabb_negative_scale_keeps_order() {
        let mat = Mat4::from_scale(Vec3::new(-2.0, 1.0, 1.0));
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = mat.transform_aabb(&aabb);

        assert_eq!(transformed.x.min, -2.0);
        assert_eq!(transformed.x.max, 0.0);
    }
}
