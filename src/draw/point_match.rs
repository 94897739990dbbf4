//! Correspondence drawing for projection correction.
//!
//! Assembles one 3D pick and one camera-tagged 2D pick into a point pair.
//! The sides may arrive in either order; once the 3D side is locked,
//! further 3D picks are ignored until the pair is finalized. Finishing is
//! explicit (driven by the session), not automatic on the last commit.

use crate::draw::{DrawParams, DrawingStrategy, PreviewShape, StrategyId};
use crate::model::{Camera, Element, Point2D, Point3D, PointPairCamera};

pub struct PointMatchStrategy {
    params: DrawParams,
    point_3d: Option<Point3D>,
    point_2d: Option<(Point2D, Camera)>,
    tmp_3d: Option<Point3D>,
    tmp_2d: Option<(Point2D, Camera)>,
}

impl PointMatchStrategy {
    pub fn new(params: DrawParams) -> Self {
        log::info!("Enabled projection correction mode.");
        Self {
            params,
            point_3d: None,
            point_2d: None,
            tmp_3d: None,
            tmp_2d: None,
        }
    }
}

impl DrawingStrategy for PointMatchStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::PointMatch
    }

    fn points_needed(&self) -> usize {
        2
    }

    fn shows_preview(&self) -> bool {
        true
    }

    fn register_point(&mut self, point: Point3D) {
        if self.point_3d.is_some() {
            // Locked until the pair is finalized.
            log::debug!("Ignoring 3D pick: one is already registered.");
            return;
        }
        self.point_3d = Some(point);
    }

    fn register_tmp_point(&mut self, point: Point3D) {
        self.tmp_3d = Some(point);
    }

    fn register_point_2d(&mut self, point: Point2D, cam: Camera) {
        self.point_2d = Some((point, cam));
    }

    fn register_tmp_point_2d(&mut self, point: Point2D, cam: Camera) {
        self.tmp_2d = Some((point, cam));
    }

    fn holds_3d(&self) -> bool {
        self.point_3d.is_some()
    }

    fn auto_finish(&self) -> bool {
        false
    }

    fn is_finished(&self) -> bool {
        self.point_3d.is_some() && self.point_2d.is_some()
    }

    fn result(&self) -> Option<Element> {
        let p3d = self.point_3d?;
        let (p2d, cam) = self.point_2d?;

        // The pick is in display pixels; detransform to native resolution
        // so export is independent of the current zoom.
        let p2d_true = p2d.scale(1.0 / self.params.display_scale);
        Some(Element::from(
            PointPairCamera::new(p3d, p2d, cam).with_true_point(p2d_true),
        ))
    }

    fn reset(&mut self) {
        self.point_3d = None;
        self.point_2d = None;
        self.tmp_3d = None;
        self.tmp_2d = None;
    }

    fn preview(&self) -> Option<PreviewShape> {
        let p3d = self.point_3d.or(self.tmp_3d);
        let p2d = self.point_2d.or(self.tmp_2d);
        if p3d.is_none() && p2d.is_none() {
            return None;
        }
        Some(PreviewShape::Pair { p3d, p2d })
    }
}
