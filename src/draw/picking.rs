//! Single-click box placement.
//!
//! One committed point places a box with the active class's default
//! dimensions. Until the commit, the preview box follows the cursor;
//! scrolling turns it around z, and translate/scale modifiers accumulate
//! on top of the eventual pick.

use nalgebra::Vector3;

use crate::constants::MIN_BBOX_DIMENSION;
use crate::draw::{DrawParams, DrawingStrategy, PreviewShape, StrategyId};
use crate::geometry::transform::Perspective;
use crate::model::{BBox, Element, Point3D};

pub struct PickingStrategy {
    params: DrawParams,
    point: Option<Point3D>,
    tmp_point: Option<Point3D>,
    z_rotation: f64,
    translate_offset: Vector3<f64>,
    length_offset: f64,
}

impl PickingStrategy {
    pub fn new(params: DrawParams) -> Self {
        log::info!("Enabled box picking mode.");
        Self {
            params,
            point: None,
            tmp_point: None,
            z_rotation: 0.0,
            translate_offset: Vector3::zeros(),
            length_offset: 0.0,
        }
    }

    fn step(&self, reverse: bool, boost: bool) -> f64 {
        let mut step = self.params.std_translation;
        if reverse {
            step = -step;
        }
        if boost {
            step *= self.params.boost_multiplier;
        }
        step
    }

    /// Box the strategy would produce if anchored at `base`.
    fn build_box(&self, base: Point3D) -> BBox {
        let (length, width, height) = self.params.dimensions;
        let new_length = (length + self.length_offset).max(MIN_BBOX_DIMENSION);
        let factor = new_length / length;

        let center = Point3D::new(
            base.x + self.translate_offset.x,
            base.y + self.translate_offset.y,
            base.z + self.translate_offset.z,
        );
        let mut bbox = BBox::new(center, new_length, width * factor, height * factor);
        bbox.set_classname(&self.params.classname);
        bbox.set_z_rotation(self.z_rotation);
        bbox
    }
}

impl DrawingStrategy for PickingStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::Picking
    }

    fn points_needed(&self) -> usize {
        1
    }

    fn shows_preview(&self) -> bool {
        true
    }

    fn register_point(&mut self, point: Point3D) {
        self.point = Some(point);
    }

    fn register_tmp_point(&mut self, point: Point3D) {
        self.tmp_point = Some(point);
    }

    fn register_scroll(&mut self, delta: f64) {
        self.z_rotation += delta / self.params.scroll_rotation_divisor;
    }

    fn register_scale(&mut self, delta: f64) {
        self.length_offset += delta / self.params.scroll_rotation_divisor * self.params.std_scaling;
    }

    fn register_translate_x(&mut self, perspective: &Perspective, left: bool, boost: bool) {
        let step = self.step(left, boost);
        self.translate_offset.x += step * perspective.cos_z;
        self.translate_offset.y += step * perspective.sin_z;
    }

    fn register_translate_y(&mut self, perspective: &Perspective, forward: bool, boost: bool) {
        let step = self.step(forward, boost);
        self.translate_offset.x += step * perspective.up_sign * -perspective.sin_z;
        self.translate_offset.y += step * perspective.up_sign * perspective.cos_z;
    }

    fn register_translate_z(&mut self, down: bool, boost: bool) {
        self.translate_offset.z += self.step(down, boost);
    }

    fn is_finished(&self) -> bool {
        self.point.is_some()
    }

    fn result(&self) -> Option<Element> {
        self.point.map(|p| Element::from(self.build_box(p)))
    }

    fn reset(&mut self) {
        self.point = None;
        self.tmp_point = None;
        self.z_rotation = 0.0;
        self.translate_offset = Vector3::zeros();
        self.length_offset = 0.0;
    }

    fn preview(&self) -> Option<PreviewShape> {
        self.tmp_point
            .map(|p| PreviewShape::Box(self.build_box(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn strategy() -> PickingStrategy {
        let config = AppConfig::new();
        let class = config.default_classname();
        PickingStrategy::new(DrawParams::from_config(&config, &class))
    }

    #[test]
    fn test_single_commit_finishes() {
        let mut strategy = strategy();
        assert!(!strategy.is_finished());

        strategy.register_point(Point3D::new(1.0, 2.0, 3.0));
        assert!(strategy.is_finished());

        let element = strategy.result().unwrap();
        let bbox = element.as_bbox().unwrap();
        assert_eq!(bbox.center(), Point3D::new(1.0, 2.0, 3.0));
        assert_eq!(bbox.classname(), "cart");
        assert_eq!(bbox.z_rotation(), 0.0);
        assert_eq!(bbox.dimensions(), (0.8, 0.6, 1.0));
    }

    #[test]
    fn test_tmp_point_does_not_advance() {
        let mut strategy = strategy();
        strategy.register_tmp_point(Point3D::new(1.0, 1.0, 1.0));
        assert!(!strategy.is_finished());
        assert!(strategy.result().is_none());
        assert!(strategy.preview().is_some());
    }

    #[test]
    fn test_scroll_accumulates_rotation() {
        let mut strategy = strategy();
        strategy.register_scroll(30.0);
        strategy.register_scroll(30.0);
        strategy.register_point(Point3D::new(0.0, 0.0, 0.0));

        let element = strategy.result().unwrap();
        assert_eq!(element.as_bbox().unwrap().z_rotation(), 2.0);
    }

    #[test]
    fn test_translate_offsets_apply_to_result() {
        let mut strategy = strategy();
        strategy.register_translate_z(false, false);
        strategy.register_point(Point3D::new(0.0, 0.0, 0.0));

        let element = strategy.result().unwrap();
        let center = element.as_bbox().unwrap().center();
        assert!((center.z - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_reset_idempotent() {
        let mut strategy = strategy();
        strategy.register_point(Point3D::new(1.0, 1.0, 1.0));
        strategy.register_tmp_point(Point3D::new(2.0, 2.0, 2.0));
        strategy.register_scroll(60.0);

        strategy.reset();
        assert!(!strategy.is_finished());
        assert!(strategy.preview().is_none());

        strategy.reset();
        assert!(!strategy.is_finished());
        assert!(strategy.preview().is_none());
    }

    #[test]
    fn test_scale_keeps_aspect_ratio() {
        let mut strategy = strategy();
        // One wheel notch worth of scaling.
        strategy.register_scale(30.0);
        strategy.register_point(Point3D::new(0.0, 0.0, 0.0));

        let element = strategy.result().unwrap();
        let (l, w, h) = element.as_bbox().unwrap().dimensions();
        assert!((l - 0.83).abs() < 1e-12);
        assert!((w / l - 0.6 / 0.8).abs() < 1e-12);
        assert!((h / l - 1.0 / 0.8).abs() < 1e-12);
    }
}
