//! Rigid-transform helpers for oriented boxes.
//!
//! Rotations are Euler angles in degrees, applied in Rz * Ry * Rx order,
//! matching the order in which label files store them.

use nalgebra::{Point3, Rotation3, Vector3};

use crate::model::Point3D;

/// Build the world rotation for a box from its Euler angles in degrees.
pub fn rotation_from_degrees(rx: f64, ry: f64, rz: f64) -> Rotation3<f64> {
    Rotation3::from_euler_angles(rx.to_radians(), ry.to_radians(), rz.to_radians())
}

/// Transform a world point into a box's local frame.
pub fn world_to_local(
    point: &Point3D,
    center: &Point3D,
    rotation: &Rotation3<f64>,
) -> Vector3<f64> {
    let translated = Vector3::new(
        point.x - center.x,
        point.y - center.y,
        point.z - center.z,
    );
    rotation.inverse() * translated
}

/// Transform a box-local offset into world coordinates.
pub fn local_to_world(
    offset: &Vector3<f64>,
    center: &Point3D,
    rotation: &Rotation3<f64>,
) -> Point3D {
    let rotated = rotation * offset;
    Point3D::new(
        center.x + rotated.x,
        center.y + rotated.y,
        center.z + rotated.z,
    )
}

/// Normalize an angle in degrees to the [0, 360) range.
pub fn normalize_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// View-aligned movement frame derived from the point cloud's pose.
///
/// Keyboard translation moves the box relative to how the user currently
/// sees the scene, not along raw world axes: the heading is snapped via
/// coarse-rounded cos/sin of the cloud's z-rotation, and `up_sign` flips
/// the forward direction when the scene is viewed bird's-eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub cos_z: f64,
    pub sin_z: f64,
    pub up_sign: f64,
}

impl Perspective {
    /// Identity frame: world axes, right-side up.
    pub fn identity() -> Self {
        Self {
            cos_z: 1.0,
            sin_z: 0.0,
            up_sign: 1.0,
        }
    }

    /// Derive the frame from the cloud's x/z rotation in degrees.
    pub fn from_pose(rot_x: f64, rot_z: f64) -> Self {
        let rad = rot_z.to_radians();
        Self {
            cos_z: (rad.cos() * 10.0).round() / 10.0,
            sin_z: (rad.sin() * 10.0).round() / 10.0,
            up_sign: if rot_x.abs() < 90.0 { -1.0 } else { 1.0 },
        }
    }
}

/// Rotate a point around a pivot by the given rotation.
pub fn rotate_around(point: &Point3D, pivot: &Point3D, rotation: &Rotation3<f64>) -> Point3D {
    let offset = Vector3::new(point.x - pivot.x, point.y - pivot.y, point.z - pivot.z);
    let rotated: Point3<f64> = Point3::from(rotation * offset);
    Point3D::new(
        pivot.x + rotated.x,
        pivot.y + rotated.y,
        pivot.z + rotated.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-30.0), 330.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
    }

    #[test]
    fn test_world_local_roundtrip() {
        let center = Point3D::new(1.0, 2.0, 3.0);
        let rotation = rotation_from_degrees(10.0, 20.0, 30.0);
        let p = Point3D::new(4.0, -1.0, 2.5);

        let local = world_to_local(&p, &center, &rotation);
        let back = local_to_world(&local, &center, &rotation);

        assert!(p.distance_to(&back) < 1e-10);
    }

    #[test]
    fn test_z_rotation_only() {
        let rotation = rotation_from_degrees(0.0, 0.0, 90.0);
        let rotated = rotate_around(
            &Point3D::new(1.0, 0.0, 0.0),
            &Point3D::new(0.0, 0.0, 0.0),
            &rotation,
        );
        assert!(rotated.distance_to(&Point3D::new(0.0, 1.0, 0.0)) < 1e-10);
    }
}
