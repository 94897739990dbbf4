//! 3D-to-2D point correspondence for projection correction.

use crate::model::{Camera, Point2D, Point3D};

/// A correspondence between a world point and a pixel in one camera image.
///
/// `p2d` is the working point as picked (possibly display-transformed);
/// `p2d_true` is the detransformed point at the image's native resolution,
/// kept so export stays lossless regardless of the current zoom. A pair may
/// temporarily lack `p2d_true` (e.g. after importing a legacy file); the
/// codec then writes sentinel values instead.
#[derive(Debug, Clone, PartialEq)]
pub struct PointPairCamera {
    p3d: Point3D,
    p2d: Point2D,
    cam: Camera,
    p2d_true: Option<Point2D>,
}

impl PointPairCamera {
    pub fn new(p3d: Point3D, p2d: Point2D, cam: Camera) -> Self {
        Self {
            p3d,
            p2d,
            cam,
            p2d_true: None,
        }
    }

    /// Attach the detransformed pixel location.
    pub fn with_true_point(mut self, p2d_true: Point2D) -> Self {
        self.p2d_true = Some(p2d_true);
        self
    }

    pub fn p3d(&self) -> Point3D {
        self.p3d
    }

    pub fn p2d(&self) -> Point2D {
        self.p2d
    }

    pub fn cam(&self) -> Camera {
        self.cam
    }

    pub fn p2d_true(&self) -> Option<Point2D> {
        self.p2d_true
    }

    /// Replace the 3D side, leaving the 2D pick untouched.
    pub fn set_p3d(&mut self, p3d: Point3D) {
        self.p3d = p3d;
    }

    /// Replace the 2D side (point and camera together), leaving the 3D
    /// pick untouched. Clears the stale detransformed point.
    pub fn set_p2d(&mut self, p2d: Point2D, cam: Camera) {
        self.p2d = p2d;
        self.cam = cam;
        self.p2d_true = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_side_updates() {
        let mut pair = PointPairCamera::new(
            Point3D::new(1.0, 2.0, 3.0),
            Point2D::new(100.0, 200.0),
            Camera::Left,
        )
        .with_true_point(Point2D::new(200.0, 400.0));

        pair.set_p3d(Point3D::new(4.0, 5.0, 6.0));
        assert_eq!(pair.p2d(), Point2D::new(100.0, 200.0));
        assert_eq!(pair.cam(), Camera::Left);
        assert!(pair.p2d_true().is_some());

        pair.set_p2d(Point2D::new(50.0, 60.0), Camera::Right);
        assert_eq!(pair.p3d(), Point3D::new(4.0, 5.0, 6.0));
        assert_eq!(pair.cam(), Camera::Right);
        // A replaced 2D pick invalidates the old detransformed point.
        assert!(pair.p2d_true().is_none());
    }
}
