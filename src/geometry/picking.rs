//! Screen-space hit-testing for boxes and their sides.
//!
//! The renderer supplies its modelview/projection matrices and viewport;
//! picking projects box vertices through them and tests the click point
//! against the projected side quads. Click coordinates follow the GL
//! convention (origin bottom-left).

use nalgebra::{Matrix4, Vector4};

use crate::model::{BBox, Point3D, Side};

/// Matrices and viewport of the current 3D view, polled from the renderer.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    pub modelview: Matrix4<f64>,
    pub projection: Matrix4<f64>,
    /// x, y, width, height in window pixels.
    pub viewport: [f64; 4],
}

/// A point projected onto the screen, with its depth in clip space.
#[derive(Debug, Clone, Copy)]
struct Projected {
    x: f64,
    y: f64,
    depth: f64,
}

/// Project a world point to window coordinates.
///
/// Returns `None` for points behind the eye (non-positive w), which cannot
/// be hit by a click.
fn project(point: &Point3D, view: &ViewTransform) -> Option<Projected> {
    let clip = view.projection
        * view.modelview
        * Vector4::new(point.x, point.y, point.z, 1.0);
    if clip.w <= 0.0 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let ndc_z = clip.z / clip.w;

    Some(Projected {
        x: view.viewport[0] + view.viewport[2] * (ndc_x + 1.0) / 2.0,
        y: view.viewport[1] + view.viewport[3] * (ndc_y + 1.0) / 2.0,
        depth: (ndc_z + 1.0) / 2.0,
    })
}

/// Ray-casting point-in-polygon test in screen space.
fn point_in_polygon(x: f64, y: f64, polygon: &[(f64, f64)]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Project one side's quad; `None` if any vertex is unprojectable.
fn project_side(bbox: &BBox, side: Side, view: &ViewTransform) -> Option<[Projected; 4]> {
    let vertices = bbox.side_vertices(side);
    let mut projected = [Projected {
        x: 0.0,
        y: 0.0,
        depth: 0.0,
    }; 4];
    for (slot, vertex) in projected.iter_mut().zip(vertices.iter()) {
        *slot = project(vertex, view)?;
    }
    Some(projected)
}

/// Depth of a click on a side, or `None` if the click misses the quad.
fn side_hit_depth(bbox: &BBox, side: Side, x: f64, y: f64, view: &ViewTransform) -> Option<f64> {
    let quad = project_side(bbox, side, view)?;
    let polygon: Vec<(f64, f64)> = quad.iter().map(|p| (p.x, p.y)).collect();
    if point_in_polygon(x, y, &polygon) {
        let mean_depth = quad.iter().map(|p| p.depth).sum::<f64>() / 4.0;
        Some(mean_depth)
    } else {
        None
    }
}

/// Find the box whose screen-space footprint contains the click, choosing
/// the one nearest the camera. Ties keep the first-encountered box.
///
/// Returns `None` when no box footprint contains the point.
pub fn pick_bbox(x: f64, y: f64, bboxes: &[BBox], view: &ViewTransform) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, bbox) in bboxes.iter().enumerate() {
        let hit = Side::all()
            .iter()
            .filter_map(|&side| side_hit_depth(bbox, side, x, y, view))
            .fold(None::<f64>, |acc, depth| {
                Some(acc.map_or(depth, |d| d.min(depth)))
            });
        if let Some(depth) = hit {
            match best {
                Some((_, best_depth)) if depth >= best_depth => {}
                _ => best = Some((index, depth)),
            }
        }
    }
    best.map(|(index, _)| index)
}

/// Find the side of a single box under the cursor, nearest-first.
/// Used for hover highlighting and side-drag resizing.
pub fn hover_side(x: f64, y: f64, bbox: &BBox, view: &ViewTransform) -> Option<Side> {
    Side::all()
        .iter()
        .filter_map(|&side| side_hit_depth(bbox, side, x, y, view).map(|depth| (side, depth)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(side, _)| side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point3D;

    /// Orthographic view straight down the negative y axis onto the
    /// x/z plane, mapping [-10, 10] to a 200x200 viewport.
    fn test_view() -> ViewTransform {
        // Look along -y: x stays, world z maps to screen y, y becomes depth.
        let modelview = Matrix4::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        );
        let projection = Matrix4::new(
            0.1, 0.0, 0.0, 0.0, //
            0.0, 0.1, 0.0, 0.0, //
            0.0, 0.0, 0.1, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        );
        ViewTransform {
            modelview,
            projection,
            viewport: [0.0, 0.0, 200.0, 200.0],
        }
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        assert!(point_in_polygon(5.0, 5.0, &square));
        assert!(!point_in_polygon(15.0, 5.0, &square));
    }

    #[test]
    fn test_pick_bbox_hit_and_miss() {
        let boxes = vec![BBox::new(Point3D::new(0.0, 0.0, 0.0), 2.0, 2.0, 2.0)];
        let view = test_view();

        // The box center projects to the middle of the 200x200 viewport.
        assert_eq!(pick_bbox(100.0, 100.0, &boxes, &view), Some(0));
        // A click far outside the footprint misses.
        assert_eq!(pick_bbox(5.0, 5.0, &boxes, &view), None);
    }

    #[test]
    fn test_pick_prefers_nearer_box() {
        // Two overlapping boxes; the second sits closer to the eye
        // (smaller y in this view looks "in front" after projection).
        let near = BBox::new(Point3D::new(0.0, -4.0, 0.0), 2.0, 2.0, 2.0);
        let far = BBox::new(Point3D::new(0.0, 4.0, 0.0), 2.0, 2.0, 2.0);
        let boxes = vec![far, near];
        let view = test_view();

        assert_eq!(pick_bbox(100.0, 100.0, &boxes, &view), Some(1));
    }

    #[test]
    fn test_hover_side_top() {
        let bbox = BBox::new(Point3D::new(0.0, 0.0, 0.0), 2.0, 2.0, 2.0);
        let view = test_view();

        // In this view world +z is up on screen; a click inside the upper
        // half of the footprint hits at least one projected side quad.
        let side = hover_side(100.0, 105.0, &bbox, &view);
        assert!(side.is_some());
    }
}
