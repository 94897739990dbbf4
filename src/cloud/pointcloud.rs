//! In-memory point cloud and its viewing pose.

use ndarray::{Array2, Axis};

use crate::geometry::transform::Perspective;
use crate::model::{BBox, Point3D};

/// Viewing pose of the displayed cloud: Euler rotation in degrees plus a
/// translation. The perspective for view-aligned box movement derives
/// from it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CloudPose {
    pub rot_x: f64,
    pub rot_y: f64,
    pub rot_z: f64,
    pub trans_x: f64,
    pub trans_y: f64,
    pub trans_z: f64,
}

impl CloudPose {
    pub fn rotate_around_x(&mut self, dangle: f64) {
        self.rot_x = (self.rot_x + dangle).rem_euclid(360.0);
    }

    pub fn rotate_around_y(&mut self, dangle: f64) {
        self.rot_y = (self.rot_y + dangle).rem_euclid(360.0);
    }

    pub fn rotate_around_z(&mut self, dangle: f64) {
        self.rot_z = (self.rot_z + dangle).rem_euclid(360.0);
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.trans_x += dx;
        self.trans_y += dy;
        self.trans_z += dz;
    }

    pub fn reset(&mut self) {
        *self = CloudPose::default();
    }

    /// View-aligned movement frame for keyboard translation.
    pub fn perspective(&self) -> Perspective {
        Perspective::from_pose(self.rot_x, self.rot_z)
    }
}

/// A frame's points: an (N, >=3) array whose first three columns are
/// x, y, z in world coordinates. Extra columns (intensity etc.) ride
/// along untouched so crops stay lossless.
#[derive(Debug, Clone)]
pub struct PointCloud {
    points: Array2<f32>,
    pub pose: CloudPose,
}

impl PointCloud {
    /// Wrap a raw array. The caller validates the column count (see the
    /// npy reader); clouds with zero points are legal.
    pub fn new(points: Array2<f32>) -> Self {
        Self {
            points,
            pose: CloudPose::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    pub fn points(&self) -> &Array2<f32> {
        &self.points
    }

    /// The i-th point's world position.
    pub fn point(&self, index: usize) -> Point3D {
        let row = self.points.row(index);
        Point3D::new(row[0] as f64, row[1] as f64, row[2] as f64)
    }

    /// Per-point containment mask for a box.
    pub fn inside_mask(&self, bbox: &BBox) -> Vec<bool> {
        (0..self.len())
            .map(|i| bbox.is_inside(&self.point(i)))
            .collect()
    }

    /// A new cloud keeping only the masked rows. Returns `None` when the
    /// mask selects nothing, so callers can warn instead of saving an
    /// empty crop.
    pub fn filtered(&self, mask: &[bool]) -> Option<PointCloud> {
        let rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();
        if rows.is_empty() {
            return None;
        }
        Some(PointCloud::new(self.points.select(Axis(0), &rows)))
    }

    /// Snap a picked position to the nearest cloud point; used by the
    /// correction strategy so every 3D pick lies on real geometry.
    pub fn nearest_point(&self, target: &Point3D) -> Option<Point3D> {
        (0..self.len())
            .map(|i| self.point(i))
            .min_by(|a, b| a.distance_to(target).total_cmp(&b.distance_to(target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn cloud() -> PointCloud {
        PointCloud::new(array![
            [0.0f32, 0.0, 0.0],
            [0.5, 0.5, 0.5],
            [5.0, 5.0, 5.0],
        ])
    }

    #[test]
    fn test_inside_mask_and_filter() {
        let cloud = cloud();
        let bbox = BBox::new(Point3D::new(0.0, 0.0, 0.0), 2.0, 2.0, 2.0);

        let mask = cloud.inside_mask(&bbox);
        assert_eq!(mask, vec![true, true, false]);

        let cropped = cloud.filtered(&mask).unwrap();
        assert_eq!(cropped.len(), 2);
    }

    #[test]
    fn test_filter_empty_mask() {
        let cloud = cloud();
        assert!(cloud.filtered(&[false, false, false]).is_none());
    }

    #[test]
    fn test_nearest_point() {
        let cloud = cloud();
        let snapped = cloud.nearest_point(&Point3D::new(0.4, 0.4, 0.6)).unwrap();
        assert_eq!(snapped, Point3D::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_nearest_point_empty_cloud() {
        let cloud = PointCloud::new(Array2::zeros((0, 3)));
        assert!(cloud.nearest_point(&Point3D::new(0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_pose_perspective_identity() {
        let pose = CloudPose::default();
        let perspective = pose.perspective();
        assert_eq!(perspective.cos_z, 1.0);
        assert_eq!(perspective.sin_z, 0.0);
    }
}
