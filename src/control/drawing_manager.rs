//! Mediates between translated input events and the active drawing
//! strategy.
//!
//! Holds zero or one strategy, routes 3D/2D registrations into it, checks
//! for completion after every commit, and hands finished elements to the
//! element controller. Input arrives already projected to world or image
//! coordinates; the manager never touches the camera math.

use crate::control::element_controller::ElementController;
use crate::draw::{DrawingStrategy, PreviewShape, StrategyId};
use crate::model::{Camera, Point2D, Point3D};

#[derive(Default)]
pub struct DrawingManager {
    strategy: Option<Box<dyn DrawingStrategy>>,
}

impl DrawingManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a drawing strategy.
    ///
    /// Selecting the strategy that is already active toggles drawing off;
    /// selecting a different one resets the old strategy first.
    pub fn set_strategy(&mut self, strategy: Box<dyn DrawingStrategy>) {
        if let Some(active) = &mut self.strategy {
            if active.id() == strategy.id() {
                active.reset();
                self.strategy = None;
                log::info!("Deactivated drawing.");
                return;
            }
            active.reset();
            log::info!("Reset previously active drawing mode.");
        }
        self.strategy = Some(strategy);
    }

    /// Whether a strategy is installed.
    pub fn is_active(&self) -> bool {
        self.strategy.is_some()
    }

    /// The installed strategy's id, if any.
    pub fn active_id(&self) -> Option<StrategyId> {
        self.strategy.as_ref().map(|s| s.id())
    }

    /// Whether the renderer should poll [`DrawingManager::preview`].
    pub fn has_preview(&self) -> bool {
        self.strategy
            .as_ref()
            .is_some_and(|s| s.shows_preview())
    }

    /// The in-progress geometry, if the active strategy previews.
    pub fn preview(&self) -> Option<PreviewShape> {
        self.strategy
            .as_ref()
            .filter(|s| s.shows_preview())
            .and_then(|s| s.preview())
    }

    /// Cancel any in-progress drawing and uninstall the strategy.
    pub fn reset(&mut self) {
        if let Some(strategy) = &mut self.strategy {
            strategy.reset();
            self.strategy = None;
        }
    }

    /// Route a world-space point into the active strategy.
    ///
    /// Temporary points only refresh the preview. Commits advance the
    /// strategy; when a box strategy reports finished, its element moves
    /// into the controller and the strategy is cleared before any further
    /// input can reach it.
    pub fn register_point_3d(
        &mut self,
        point: Point3D,
        temporary: bool,
        controller: &mut ElementController,
    ) {
        let Some(strategy) = &mut self.strategy else {
            return;
        };

        if temporary {
            strategy.register_tmp_point(point);
            return;
        }

        if strategy.holds_3d() {
            // Correspondence already has its 3D side; drop the commit.
            log::debug!("Suppressed 3D pick: the pair already holds one.");
            return;
        }

        strategy.register_point(point);
        if strategy.is_finished() && strategy.auto_finish() {
            self.transfer_result(controller);
        }
    }

    /// Route an image-space point into the active strategy
    /// (correspondence mode only).
    pub fn register_point_2d(
        &mut self,
        point: Point2D,
        cam: Camera,
        temporary: bool,
        controller: &mut ElementController,
    ) {
        let Some(strategy) = &mut self.strategy else {
            return;
        };

        if temporary {
            strategy.register_tmp_point_2d(point, cam);
            return;
        }

        strategy.register_point_2d(point, cam);
        if strategy.is_finished() && strategy.auto_finish() {
            self.transfer_result(controller);
        }
    }

    /// Forward scroll input to the strategy.
    pub fn register_scroll(&mut self, delta: f64) {
        if let Some(strategy) = &mut self.strategy {
            strategy.register_scroll(delta);
        }
    }

    /// Forward a scale modifier to the strategy.
    pub fn register_scale(&mut self, delta: f64) {
        if let Some(strategy) = &mut self.strategy {
            strategy.register_scale(delta);
        }
    }

    /// Whether the in-progress element is complete and ready to finish.
    pub fn can_finish(&self) -> bool {
        self.strategy.as_ref().is_some_and(|s| s.is_finished())
    }

    /// Explicitly finish the in-progress element (correspondence mode's
    /// completion button; harmless for box strategies).
    pub fn finish(&mut self, controller: &mut ElementController) {
        if self.can_finish() {
            self.transfer_result(controller);
        } else {
            log::warn!("Finish requested but the drawing is incomplete.");
        }
    }

    /// Mutable access for strategy-specific modifiers (translate nudges).
    pub fn strategy_mut(&mut self) -> Option<&mut (dyn DrawingStrategy + 'static)> {
        self.strategy.as_deref_mut()
    }

    fn transfer_result(&mut self, controller: &mut ElementController) {
        let Some(strategy) = &mut self.strategy else {
            return;
        };
        match strategy.result() {
            Some(element) => controller.add(element),
            None => log::warn!("Finished strategy produced no element."),
        }
        strategy.reset();
        self.strategy = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, LabelingConfig};
    use crate::draw::{DrawParams, PickingStrategy, PointMatchStrategy};
    use crate::model::ElementKind;

    fn params() -> DrawParams {
        let config = AppConfig::new();
        let class = config.default_classname();
        DrawParams::from_config(&config, &class)
    }

    fn bbox_controller() -> ElementController {
        ElementController::new(ElementKind::BoundingBox, LabelingConfig::default())
    }

    fn pair_controller() -> ElementController {
        ElementController::new(ElementKind::PointPair, LabelingConfig::default())
    }

    #[test]
    fn test_pick_draw_scenario() {
        let mut manager = DrawingManager::new();
        let mut controller = bbox_controller();

        manager.set_strategy(Box::new(PickingStrategy::new(params())));
        assert!(manager.is_active());

        manager.register_point_3d(Point3D::new(1.0, 2.0, 3.0), false, &mut controller);

        // The finished box moved into the controller; the strategy is gone.
        assert!(!manager.is_active());
        assert_eq!(controller.len(), 1);
        assert_eq!(controller.active_index(), Some(0));
        let bbox = controller.elements()[0].as_bbox().unwrap();
        assert_eq!(bbox.center(), Point3D::new(1.0, 2.0, 3.0));
        assert_eq!(bbox.z_rotation(), 0.0);
    }

    #[test]
    fn test_toggle_off_on_same_strategy() {
        let mut manager = DrawingManager::new();

        manager.set_strategy(Box::new(PickingStrategy::new(params())));
        manager.set_strategy(Box::new(PickingStrategy::new(params())));

        assert!(!manager.is_active());
    }

    #[test]
    fn test_switching_strategies_resets_previous() {
        let mut manager = DrawingManager::new();
        let mut controller = bbox_controller();

        manager.set_strategy(Box::new(PickingStrategy::new(params())));
        manager.register_point_3d(Point3D::new(1.0, 1.0, 1.0), true, &mut controller);

        manager.set_strategy(Box::new(PointMatchStrategy::new(params())));
        assert_eq!(manager.active_id(), Some(StrategyId::PointMatch));
    }

    #[test]
    fn test_no_strategy_is_noop() {
        let mut manager = DrawingManager::new();
        let mut controller = bbox_controller();

        manager.register_point_3d(Point3D::new(1.0, 1.0, 1.0), false, &mut controller);
        assert!(controller.is_empty());
        assert!(!manager.has_preview());
    }

    #[test]
    fn test_correspondence_needs_explicit_finish() {
        let mut manager = DrawingManager::new();
        let mut controller = pair_controller();

        manager.set_strategy(Box::new(PointMatchStrategy::new(params())));
        manager.register_point_3d(Point3D::new(1.0, 2.0, 3.0), false, &mut controller);
        manager.register_point_2d(Point2D::new(10.0, 20.0), Camera::Left, false, &mut controller);

        // Complete but waiting for the explicit finish.
        assert!(controller.is_empty());
        assert!(manager.can_finish());

        manager.finish(&mut controller);
        assert_eq!(controller.len(), 1);
        assert!(!manager.is_active());
    }

    #[test]
    fn test_duplicate_3d_pick_suppressed() {
        let mut manager = DrawingManager::new();
        let mut controller = pair_controller();

        manager.set_strategy(Box::new(PointMatchStrategy::new(params())));
        manager.register_point_3d(Point3D::new(1.0, 1.0, 1.0), false, &mut controller);
        manager.register_point_3d(Point3D::new(2.0, 2.0, 2.0), false, &mut controller);
        manager.register_point_2d(Point2D::new(0.0, 0.0), Camera::Left, false, &mut controller);
        manager.finish(&mut controller);

        let pair = controller.elements()[0].as_point_pair().unwrap();
        assert_eq!(pair.p3d(), Point3D::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_preview_flag_passthrough() {
        let mut manager = DrawingManager::new();
        let mut controller = bbox_controller();

        manager.set_strategy(Box::new(PickingStrategy::new(params())));
        assert!(manager.has_preview());
        assert!(manager.preview().is_none()); // no temp point yet

        manager.register_point_3d(Point3D::new(1.0, 1.0, 1.0), true, &mut controller);
        assert!(manager.preview().is_some());
    }
}
