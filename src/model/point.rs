//! Geometric value types shared by both labeling modes.

use serde::{Deserialize, Serialize};

/// A point in 3D world coordinates (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point3D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<Point3D> for nalgebra::Point3<f64> {
    fn from(p: Point3D) -> Self {
        nalgebra::Point3::new(p.x, p.y, p.z)
    }
}

impl From<nalgebra::Point3<f64>> for Point3D {
    fn from(p: nalgebra::Point3<f64>) -> Self {
        Point3D::new(p.x, p.y, p.z)
    }
}

impl From<(f64, f64, f64)> for Point3D {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Point3D::new(x, y, z)
    }
}

/// A point in the pixel coordinates of one camera's image plane.
///
/// Stored at the image's native resolution; display zoom is applied by
/// [`Point2D::scale`] and is always invertible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Uniformly scale both coordinates.
    pub fn scale(&self, factor: f64) -> Point2D {
        Point2D::new(self.x * factor, self.y * factor)
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Point2D::new(x, y)
    }
}

/// Which camera of the fixed rig a 2D point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Camera {
    Left = 0,
    Middle = 1,
    Right = 2,
}

impl Camera {
    /// All cameras in rig order.
    pub fn all() -> &'static [Camera] {
        &[Camera::Left, Camera::Middle, Camera::Right]
    }

    /// Numeric index used in label files.
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Display name for readouts.
    pub fn name(&self) -> &'static str {
        match self {
            Camera::Left => "Left",
            Camera::Middle => "Middle",
            Camera::Right => "Right",
        }
    }

    /// Filename suffix of this camera's image for a given frame.
    pub fn image_suffix(&self) -> &'static str {
        match self {
            Camera::Left => "_top_left_dd.png",
            Camera::Middle => "_top_mid_dd.png",
            Camera::Right => "_top_right_dd.png",
        }
    }
}

impl TryFrom<u8> for Camera {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Camera::Left),
            1 => Ok(Camera::Middle),
            2 => Ok(Camera::Right),
            other => Err(other),
        }
    }
}

/// An RGB color with components in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color3f {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3f {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Append an alpha channel.
    pub fn to_rgba(&self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// Convert from 0-255 byte components.
    pub fn from_bytes(rgb: [u8; 3]) -> Self {
        Self::new(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point3d_distance() {
        let a = Point3D::new(0.0, 0.0, 0.0);
        let b = Point3D::new(2.0, 3.0, 6.0);
        assert!((a.distance_to(&b) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_point2d_scale_invertible() {
        let p = Point2D::new(512.0, 384.0);
        let zoomed = p.scale(0.5);
        let back = zoomed.scale(2.0);
        assert_eq!(p, back);
    }

    #[test]
    fn test_camera_roundtrip() {
        for cam in Camera::all() {
            assert_eq!(Camera::try_from(cam.index()), Ok(*cam));
        }
        assert_eq!(Camera::try_from(3), Err(3));
    }
}
