// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rigid and affine 3D transforms.
//!
//! Graph transforms are plain [`nalgebra`] affine transforms. Composition reads
//! right to left: `parent * child` maps child-local coordinates into the
//! parent frame.

use nalgebra::{Affine3, Matrix4, Rotation3, Translation3, Vector3};

/// Affine transform in 3D.
pub type Transform3D = Affine3<f64>;

/// Point in 3D.
pub type Point3D = nalgebra::Point3<f64>;

/// Identity transform.
pub fn identity() -> Transform3D {
    Transform3D::identity()
}

/// Translation by `(x, y, z)`.
pub fn translate(x: f64, y: f64, z: f64) -> Transform3D {
    Transform3D::from_matrix_unchecked(Translation3::new(x, y, z).to_homogeneous())
}

/// Rotation about the `x` axis by `angle` radians.
pub fn rotate_x(angle: f64) -> Transform3D {
    Transform3D::from_matrix_unchecked(
        Rotation3::from_axis_angle(&Vector3::x_axis(), angle).to_homogeneous(),
    )
}

/// Rotation about the `y` axis by `angle` radians.
pub fn rotate_y(angle: f64) -> Transform3D {
    Transform3D::from_matrix_unchecked(
        Rotation3::from_axis_angle(&Vector3::y_axis(), angle).to_homogeneous(),
    )
}

/// Rotation about the `z` axis by `angle` radians.
pub fn rotate_z(angle: f64) -> Transform3D {
    Transform3D::from_matrix_unchecked(
        Rotation3::from_axis_angle(&Vector3::z_axis(), angle).to_homogeneous(),
    )
}

/// Non-uniform scaling.
pub fn scale(x: f64, y: f64, z: f64) -> Transform3D {
    Transform3D::from_matrix_unchecked(Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z)))
}

/// Translation part of a transform.
pub fn translation_of(t: &Transform3D) -> Vector3<f64> {
    t.matrix().fixed_view::<3, 1>(0, 3).into_owned()
}

/// Element-wise comparison of two transforms.
pub fn approx_eq(a: &Transform3D, b: &Transform3D, epsilon: f64) -> bool {
    (a.matrix() - b.matrix()).amax() <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn composition_applies_right_operand_first() {
        let t = translate(1.0, 0.0, 0.0) * rotate_z(FRAC_PI_2);
        let p = t.transform_point(&Point3D::new(1.0, 0.0, 0.0));
        assert!((p - Point3D::new(1.0, 1.0, 0.0)).norm() < 1e-12, "got {p}");
    }

    #[test]
    fn inverse_point_mapping() {
        let t = translate(0.0, 0.0, 5.0) * rotate_x(0.3);
        let p = Point3D::new(1.0, 2.0, 3.0);
        let back = t.inverse_transform_point(&t.transform_point(&p));
        assert!((back - p).norm() < 1e-12, "got {back}");
    }

    #[test]
    fn translation_extraction() {
        let t = rotate_y(0.7) * translate(1.0, 2.0, 3.0);
        let moved = t.transform_point(&Point3D::origin());
        assert!((translation_of(&t) - moved.coords).norm() < 1e-12);
        assert!(approx_eq(&scale(1.0, 1.0, 1.0), &identity(), 0.0));
    }
}
