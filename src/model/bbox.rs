//! Oriented 3D bounding box model.
//!
//! A box owns its center, dimensions, Euler rotation (degrees) and class
//! name. Vertices and sides are derived on demand; the vertex order is fixed
//! so side indices stay stable for hit-testing.

use nalgebra::Vector3;

use crate::constants::MIN_BBOX_DIMENSION;
use crate::geometry::transform::{normalize_degrees, rotation_from_degrees, world_to_local};
use crate::model::Point3D;

/// One of the six rectangular faces of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Right,
    Back,
    Left,
    Front,
}

impl Side {
    /// All sides, in the order they are scanned for hover tests.
    pub fn all() -> &'static [Side] {
        &[
            Side::Top,
            Side::Bottom,
            Side::Right,
            Side::Back,
            Side::Left,
            Side::Front,
        ]
    }

    /// Indices into [`BBox::vertices`] forming this side's quad.
    ///
    /// Vertex order: bottom ring counter-clockwise (0-3), then the top ring
    /// above it (4-7), starting at (-x, -y).
    pub fn vertex_indices(&self) -> [usize; 4] {
        match self {
            Side::Top => [4, 5, 6, 7],
            Side::Bottom => [0, 1, 2, 3],
            Side::Right => [2, 3, 7, 6],
            Side::Back => [0, 3, 7, 4],
            Side::Left => [0, 1, 5, 4],
            Side::Front => [1, 2, 6, 5],
        }
    }

    /// The local axis this side moves along (0 = length, 1 = width,
    /// 2 = height) and the direction of its outward normal.
    fn axis_and_sign(&self) -> (usize, f64) {
        match self {
            Side::Right => (0, 1.0),
            Side::Left => (0, -1.0),
            Side::Front => (1, 1.0),
            Side::Back => (1, -1.0),
            Side::Top => (2, 1.0),
            Side::Bottom => (2, -1.0),
        }
    }
}

/// An oriented 3D bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct BBox {
    center: Point3D,
    length: f64,
    width: f64,
    height: f64,
    x_rotation: f64,
    y_rotation: f64,
    z_rotation: f64,
    classname: String,
}

impl BBox {
    /// Create a box at `center` with the given dimensions and no rotation.
    /// Dimensions are clamped to the minimum box size.
    pub fn new(center: Point3D, length: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            length: length.max(MIN_BBOX_DIMENSION),
            width: width.max(MIN_BBOX_DIMENSION),
            height: height.max(MIN_BBOX_DIMENSION),
            x_rotation: 0.0,
            y_rotation: 0.0,
            z_rotation: 0.0,
            classname: String::new(),
        }
    }

    pub fn center(&self) -> Point3D {
        self.center
    }

    pub fn set_center(&mut self, x: f64, y: f64, z: f64) {
        self.center = Point3D::new(x, y, z);
    }

    pub fn set_x_translation(&mut self, x: f64) {
        self.center.x = x;
    }

    pub fn set_y_translation(&mut self, y: f64) {
        self.center.y = y;
    }

    pub fn set_z_translation(&mut self, z: f64) {
        self.center.z = z;
    }

    /// Dimensions as (length, width, height).
    pub fn dimensions(&self) -> (f64, f64, f64) {
        (self.length, self.width, self.height)
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_dimensions(&mut self, length: f64, width: f64, height: f64) {
        self.set_length(length);
        self.set_width(width);
        self.set_height(height);
    }

    pub fn set_length(&mut self, length: f64) {
        if length > 0.0 {
            self.length = length.max(MIN_BBOX_DIMENSION);
        } else {
            log::warn!("Ignoring non-positive length {}.", length);
        }
    }

    pub fn set_width(&mut self, width: f64) {
        if width > 0.0 {
            self.width = width.max(MIN_BBOX_DIMENSION);
        } else {
            log::warn!("Ignoring non-positive width {}.", width);
        }
    }

    pub fn set_height(&mut self, height: f64) {
        if height > 0.0 {
            self.height = height.max(MIN_BBOX_DIMENSION);
        } else {
            log::warn!("Ignoring non-positive height {}.", height);
        }
    }

    /// Rotations as (rx, ry, rz) in degrees.
    pub fn rotations(&self) -> (f64, f64, f64) {
        (self.x_rotation, self.y_rotation, self.z_rotation)
    }

    pub fn x_rotation(&self) -> f64 {
        self.x_rotation
    }

    pub fn y_rotation(&self) -> f64 {
        self.y_rotation
    }

    pub fn z_rotation(&self) -> f64 {
        self.z_rotation
    }

    pub fn set_rotations(&mut self, rx: f64, ry: f64, rz: f64) {
        self.set_x_rotation(rx);
        self.set_y_rotation(ry);
        self.set_z_rotation(rz);
    }

    pub fn set_x_rotation(&mut self, angle: f64) {
        self.x_rotation = normalize_degrees(angle);
    }

    pub fn set_y_rotation(&mut self, angle: f64) {
        self.y_rotation = normalize_degrees(angle);
    }

    pub fn set_z_rotation(&mut self, angle: f64) {
        self.z_rotation = normalize_degrees(angle);
    }

    pub fn classname(&self) -> &str {
        &self.classname
    }

    pub fn set_classname(&mut self, classname: impl Into<String>) {
        let classname = classname.into();
        if classname.is_empty() {
            log::warn!("Ignoring empty classname.");
            return;
        }
        self.classname = classname;
    }

    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// The 8 corner vertices in world space.
    ///
    /// Order is fixed: bottom ring counter-clockwise starting at
    /// (-x, -y, -z), then the top ring directly above.
    pub fn vertices(&self) -> [Point3D; 8] {
        let (hl, hw, hh) = (self.length / 2.0, self.width / 2.0, self.height / 2.0);
        let corners = [
            Vector3::new(-hl, -hw, -hh),
            Vector3::new(-hl, hw, -hh),
            Vector3::new(hl, hw, -hh),
            Vector3::new(hl, -hw, -hh),
            Vector3::new(-hl, -hw, hh),
            Vector3::new(-hl, hw, hh),
            Vector3::new(hl, hw, hh),
            Vector3::new(hl, -hw, hh),
        ];

        let rotation = self.rotation_matrix();
        corners.map(|c| {
            let world = rotation * c;
            Point3D::new(
                self.center.x + world.x,
                self.center.y + world.y,
                self.center.z + world.z,
            )
        })
    }

    /// World-space vertices of one side's quad.
    pub fn side_vertices(&self, side: Side) -> [Point3D; 4] {
        let vertices = self.vertices();
        side.vertex_indices().map(|i| vertices[i])
    }

    /// Whether a world point lies inside the box.
    ///
    /// The point is moved into the box's local frame (undoing translation
    /// and rotation); it is inside iff each local coordinate's magnitude is
    /// at most half the corresponding dimension.
    pub fn is_inside(&self, point: &Point3D) -> bool {
        let local = world_to_local(point, &self.center, &self.rotation_matrix());
        local.x.abs() <= self.length / 2.0
            && local.y.abs() <= self.width / 2.0
            && local.z.abs() <= self.height / 2.0
    }

    /// Grow or shrink the box by pulling one side outward (positive delta)
    /// or inward, keeping the opposite side fixed.
    ///
    /// No-op if the change would push the dimension below the minimum.
    pub fn change_side(&mut self, side: Side, delta: f64) {
        let (axis, sign) = side.axis_and_sign();
        let dims = [self.length, self.width, self.height];
        let new_dim = dims[axis] + delta;
        if new_dim < MIN_BBOX_DIMENSION {
            log::warn!(
                "Side change rejected: {:?} would shrink below the minimum dimension.",
                side
            );
            return;
        }

        match axis {
            0 => self.length = new_dim,
            1 => self.width = new_dim,
            _ => self.height = new_dim,
        }

        // Shift the center by half the delta along the side's world-space
        // normal so the opposite side stays put.
        let mut local = Vector3::zeros();
        local[axis] = sign * delta / 2.0;
        let world = self.rotation_matrix() * local;
        self.center.x += world.x;
        self.center.y += world.y;
        self.center.z += world.z;
    }

    fn rotation_matrix(&self) -> nalgebra::Rotation3<f64> {
        rotation_from_degrees(self.x_rotation, self.y_rotation, self.z_rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BBox {
        BBox::new(Point3D::new(0.0, 0.0, 0.0), 2.0, 2.0, 2.0)
    }

    #[test]
    fn test_containment_axis_aligned() {
        let bbox = unit_box();
        assert!(bbox.is_inside(&Point3D::new(0.0, 0.0, 0.0)));
        assert!(bbox.is_inside(&Point3D::new(0.99, 0.0, 0.0)));
        assert!(!bbox.is_inside(&Point3D::new(1.01, 0.0, 0.0)));
    }

    #[test]
    fn test_containment_rotated() {
        let mut bbox = BBox::new(Point3D::new(0.0, 0.0, 0.0), 4.0, 2.0, 2.0);
        bbox.set_z_rotation(90.0);
        // After rotating 90 degrees the long axis points along y.
        assert!(bbox.is_inside(&Point3D::new(0.0, 1.9, 0.0)));
        assert!(!bbox.is_inside(&Point3D::new(1.9, 0.0, 0.0)));
    }

    #[test]
    fn test_vertex_order_stable() {
        let bbox = unit_box();
        let vertices = bbox.vertices();
        assert!(vertices[0].distance_to(&Point3D::new(-1.0, -1.0, -1.0)) < 1e-12);
        assert!(vertices[6].distance_to(&Point3D::new(1.0, 1.0, 1.0)) < 1e-12);
        // All bottom vertices share the bottom z, all top vertices the top z.
        for v in &vertices[..4] {
            assert!((v.z + 1.0).abs() < 1e-12);
        }
        for v in &vertices[4..] {
            assert!((v.z - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_volume() {
        let bbox = BBox::new(Point3D::new(0.0, 0.0, 0.0), 2.0, 3.0, 4.0);
        assert!((bbox.volume() - 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_clamp() {
        let mut bbox = unit_box();
        bbox.set_length(-1.0);
        assert_eq!(bbox.length(), 2.0);
        bbox.set_length(1e-6);
        assert_eq!(bbox.length(), MIN_BBOX_DIMENSION);
    }

    #[test]
    fn test_rotation_normalized() {
        let mut bbox = unit_box();
        bbox.set_z_rotation(450.0);
        assert_eq!(bbox.z_rotation(), 90.0);
        bbox.set_z_rotation(-90.0);
        assert_eq!(bbox.z_rotation(), 270.0);
    }

    #[test]
    fn test_change_side_keeps_opposite_fixed() {
        let mut bbox = unit_box();
        let fixed_x = bbox.vertices()[0].x; // left side at x = -1

        bbox.change_side(Side::Right, 1.0);

        assert!((bbox.length() - 3.0).abs() < 1e-12);
        assert!((bbox.center().x - 0.5).abs() < 1e-12);
        assert!((bbox.vertices()[0].x - fixed_x).abs() < 1e-12);
    }

    #[test]
    fn test_change_side_rejects_collapse() {
        let mut bbox = unit_box();
        bbox.change_side(Side::Right, -2.5);
        assert_eq!(bbox.length(), 2.0);
        assert_eq!(bbox.center(), Point3D::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_side_indices_cover_all_vertices() {
        let mut seen = [0usize; 8];
        for side in Side::all() {
            for i in side.vertex_indices() {
                seen[i] += 1;
            }
        }
        // Each vertex belongs to exactly three sides.
        assert!(seen.iter().all(|&count| count == 3));
    }
}
