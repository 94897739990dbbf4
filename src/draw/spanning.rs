//! Two-corner box spanning.
//!
//! The first commit anchors one corner; the box spans to the opposite
//! corner, previewed from the cursor until the second commit. Scrolling
//! still turns the span around z.

use crate::constants::MIN_BBOX_DIMENSION;
use crate::draw::{DrawParams, DrawingStrategy, PreviewShape, StrategyId};
use crate::model::{BBox, Element, Point3D};

pub struct SpanningStrategy {
    params: DrawParams,
    first: Option<Point3D>,
    second: Option<Point3D>,
    tmp_point: Option<Point3D>,
    z_rotation: f64,
}

impl SpanningStrategy {
    pub fn new(params: DrawParams) -> Self {
        log::info!("Enabled box spanning mode.");
        Self {
            params,
            first: None,
            second: None,
            tmp_point: None,
            z_rotation: 0.0,
        }
    }

    /// Box spanned between two opposite corners.
    fn span_box(&self, a: &Point3D, b: &Point3D) -> BBox {
        let center = Point3D::new(
            (a.x + b.x) / 2.0,
            (a.y + b.y) / 2.0,
            (a.z + b.z) / 2.0,
        );
        let mut bbox = BBox::new(
            center,
            (a.x - b.x).abs().max(MIN_BBOX_DIMENSION),
            (a.y - b.y).abs().max(MIN_BBOX_DIMENSION),
            (a.z - b.z).abs().max(MIN_BBOX_DIMENSION),
        );
        bbox.set_classname(&self.params.classname);
        bbox.set_z_rotation(self.z_rotation);
        bbox
    }
}

impl DrawingStrategy for SpanningStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::Spanning
    }

    fn points_needed(&self) -> usize {
        2
    }

    fn shows_preview(&self) -> bool {
        true
    }

    fn register_point(&mut self, point: Point3D) {
        if self.first.is_none() {
            self.first = Some(point);
        } else {
            self.second = Some(point);
        }
    }

    fn register_tmp_point(&mut self, point: Point3D) {
        self.tmp_point = Some(point);
    }

    fn register_scroll(&mut self, delta: f64) {
        self.z_rotation += delta / self.params.scroll_rotation_divisor;
    }

    fn is_finished(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    fn result(&self) -> Option<Element> {
        match (&self.first, &self.second) {
            (Some(a), Some(b)) => Some(Element::from(self.span_box(a, b))),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.first = None;
        self.second = None;
        self.tmp_point = None;
        self.z_rotation = 0.0;
    }

    fn preview(&self) -> Option<PreviewShape> {
        let first = self.first.as_ref()?;
        let opposite = self.second.as_ref().or(self.tmp_point.as_ref())?;
        Some(PreviewShape::Box(self.span_box(first, opposite)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn strategy() -> SpanningStrategy {
        let config = AppConfig::new();
        let class = config.default_classname();
        SpanningStrategy::new(DrawParams::from_config(&config, &class))
    }

    #[test]
    fn test_two_commits_finish() {
        let mut strategy = strategy();
        strategy.register_point(Point3D::new(0.0, 0.0, 0.0));
        assert!(!strategy.is_finished());

        strategy.register_point(Point3D::new(2.0, 4.0, 1.0));
        assert!(strategy.is_finished());

        let element = strategy.result().unwrap();
        let bbox = element.as_bbox().unwrap();
        assert_eq!(bbox.center(), Point3D::new(1.0, 2.0, 0.5));
        assert_eq!(bbox.dimensions(), (2.0, 4.0, 1.0));
    }

    #[test]
    fn test_preview_follows_cursor_after_anchor() {
        let mut strategy = strategy();
        assert!(strategy.preview().is_none());

        strategy.register_point(Point3D::new(0.0, 0.0, 0.0));
        assert!(strategy.preview().is_none());

        strategy.register_tmp_point(Point3D::new(1.0, 1.0, 1.0));
        let PreviewShape::Box(bbox) = strategy.preview().unwrap() else {
            panic!("expected a box preview");
        };
        assert_eq!(bbox.center(), Point3D::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_flat_span_clamps_dimensions() {
        let mut strategy = strategy();
        strategy.register_point(Point3D::new(0.0, 0.0, 0.0));
        strategy.register_point(Point3D::new(2.0, 3.0, 0.0));

        let element = strategy.result().unwrap();
        let (_, _, height) = element.as_bbox().unwrap().dimensions();
        assert_eq!(height, MIN_BBOX_DIMENSION);
    }

    #[test]
    fn test_reset_clears_anchor() {
        let mut strategy = strategy();
        strategy.register_point(Point3D::new(0.0, 0.0, 0.0));
        strategy.reset();
        strategy.reset();

        assert!(!strategy.is_finished());
        strategy.register_point(Point3D::new(5.0, 5.0, 5.0));
        assert!(!strategy.is_finished());
    }
}
