//! Frame/selection glue: one labeling session over a frame sequence.
//!
//! Owns the element controller, the drawing manager, the label codec and
//! the frame cursor; routes translated input events between them and
//! orchestrates per-frame label load/save, including label propagation
//! into unlabeled frames.

use std::path::Path;

use crate::cloud::{read_npy, FrameSet, PointCloud};
use crate::config::{AppConfig, LabelingMode};
use crate::control::{DrawingManager, ElementController};
use crate::draw::{
    DrawParams, DrawingStrategy, PickingStrategy, PointMatchStrategy, PreviewShape,
    SpanningStrategy,
};
use crate::format::{LabelError, LabelManager};
use crate::geometry::{hover_side, pick_bbox};
use crate::model::{BBox, Camera, Element, ElementKind, Point2D, Point3D, Side};
use crate::view::Projection;

/// One interactive labeling session.
pub struct Session {
    config: AppConfig,
    controller: ElementController,
    drawing: DrawingManager,
    labels: LabelManager,
    frames: FrameSet,
    cloud: Option<PointCloud>,
    current_class: String,
}

impl Session {
    /// Open a session over the frame folder named in the configuration.
    pub fn new(config: AppConfig) -> Result<Self, crate::cloud::CloudError> {
        let frames = FrameSet::from_folder(Path::new(&config.files.pointcloud_folder))?;
        Ok(Self::with_frames(config, frames))
    }

    /// Open a session over an explicit frame sequence.
    pub fn with_frames(config: AppConfig, frames: FrameSet) -> Self {
        let kind = match config.labeling.mode {
            LabelingMode::ObjectDetection => ElementKind::BoundingBox,
            LabelingMode::ProjectionCorrection => ElementKind::PointPair,
        };
        let labels = LabelManager::new(
            config.labeling.mode,
            &config.labeling.label_format,
            Path::new(&config.files.label_folder),
            config.labeling.export_precision,
        );
        let current_class = config.default_classname();

        let mut session = Self {
            controller: ElementController::new(kind, config.labeling.clone()),
            drawing: DrawingManager::new(),
            labels,
            frames,
            cloud: None,
            config,
            current_class,
        };
        session.load_current_frame(&[]);
        session
    }

    // ------------------------------------------------------------------
    // Accessors (render sink)
    // ------------------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn controller(&self) -> &ElementController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ElementController {
        &mut self.controller
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    pub fn cloud(&self) -> Option<&PointCloud> {
        self.cloud.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_active()
    }

    /// In-progress preview geometry for the renderer.
    pub fn preview(&self) -> Option<PreviewShape> {
        self.drawing.preview()
    }

    pub fn current_class(&self) -> &str {
        &self.current_class
    }

    // ------------------------------------------------------------------
    // Frame navigation
    // ------------------------------------------------------------------

    fn frame_stem(&self) -> Option<String> {
        self.frames.frame_stem(&self.config.files.frame_postfix)
    }

    /// Save the current frame's labels. Zero elements is a legal save.
    pub fn save(&mut self) -> Result<(), LabelError> {
        let Some(stem) = self.frame_stem() else {
            log::warn!("No current frame; nothing to save.");
            return Ok(());
        };
        self.labels.export_labels(&stem, self.controller.elements())
    }

    fn save_best_effort(&mut self) {
        if let Err(e) = self.save() {
            // Surface the failure but keep navigating.
            log::error!("Saving labels failed: {}", e);
        }
    }

    fn load_current_frame(&mut self, previous: &[Element]) {
        let Some(frame) = self.frames.current().cloned() else {
            return;
        };

        self.cloud = match read_npy(&frame) {
            Ok(cloud) => Some(cloud),
            Err(e) => {
                log::warn!("Could not load point cloud {:?}: {}", frame, e);
                None
            }
        };

        let stem = self.frame_stem().unwrap_or_default();
        let mut elements = self.labels.import_labels(&stem);

        // Propagation: an unlabeled frame inherits a deep copy of the
        // previous frame's elements.
        if elements.is_empty() && self.config.labeling.propagate_labels && !previous.is_empty() {
            log::info!("Propagating {} labels into unlabeled frame.", previous.len());
            elements = previous.to_vec();
        }

        let has_elements = !elements.is_empty();
        self.controller.set_all(elements);
        if has_elements {
            self.controller.select(0);
        }
    }

    fn transition(&mut self, moved: bool) {
        if moved {
            let previous = self.controller.elements().to_vec();
            self.reset();
            self.load_current_frame(&previous);
        }
    }

    /// Save and advance to the next frame; `false` at the end of the
    /// sequence.
    pub fn next_frame(&mut self) -> bool {
        self.save_best_effort();
        let moved = self.frames.advance();
        self.transition(moved);
        if !moved {
            log::info!("Already at the last frame.");
        }
        moved
    }

    /// Save and step back to the previous frame; `false` at the start.
    pub fn prev_frame(&mut self) -> bool {
        self.save_best_effort();
        let moved = self.frames.retreat();
        self.transition(moved);
        moved
    }

    /// Save and jump to an arbitrary frame index.
    pub fn jump_to_frame(&mut self, index: usize) -> bool {
        self.save_best_effort();
        let moved = self.frames.jump_to(index);
        self.transition(moved);
        moved
    }

    /// Clear controller and drawing state (frame transition, mode reset).
    pub fn reset(&mut self) {
        self.controller.reset();
        self.drawing.reset();
    }

    // ------------------------------------------------------------------
    // Drawing tools
    // ------------------------------------------------------------------

    fn draw_params(&self) -> DrawParams {
        DrawParams::from_config(&self.config, &self.current_class)
    }

    /// Toggle the single-click box tool.
    pub fn start_picking(&mut self) {
        if self.config.labeling.mode != LabelingMode::ObjectDetection {
            log::warn!("Box drawing is only available in object-detection mode.");
            return;
        }
        let params = self.draw_params();
        self.drawing
            .set_strategy(Box::new(PickingStrategy::new(params)));
    }

    /// Toggle the two-corner box tool.
    pub fn start_spanning(&mut self) {
        if self.config.labeling.mode != LabelingMode::ObjectDetection {
            log::warn!("Box drawing is only available in object-detection mode.");
            return;
        }
        let params = self.draw_params();
        self.drawing
            .set_strategy(Box::new(SpanningStrategy::new(params)));
    }

    /// Toggle the correspondence tool.
    pub fn start_point_match(&mut self) {
        if self.config.labeling.mode != LabelingMode::ProjectionCorrection {
            log::warn!("Point matching is only available in projection-correction mode.");
            return;
        }
        let params = self.draw_params();
        self.drawing
            .set_strategy(Box::new(PointMatchStrategy::new(params)));
    }

    /// Cancel any in-progress drawing (escape key).
    pub fn cancel_drawing(&mut self) {
        if self.drawing.is_active() {
            self.drawing.reset();
            log::info!("Reset drawn points.");
        }
    }

    /// Whether the in-progress correspondence can be completed.
    pub fn can_complete_pair(&self) -> bool {
        self.drawing.can_finish()
    }

    /// Complete the in-progress correspondence (completion button).
    pub fn complete_pair(&mut self) {
        self.drawing.finish(&mut self.controller);
    }

    // ------------------------------------------------------------------
    // Input routing
    // ------------------------------------------------------------------

    /// Route a 3D-view click (or pointer move, when `temporary`) into the
    /// active drawing strategy. In projection-correction mode the pick is
    /// snapped to the nearest cloud point first.
    pub fn register_click(
        &mut self,
        x: f64,
        y: f64,
        temporary: bool,
        projector: &dyn Projection,
    ) {
        if !self.drawing.is_active() {
            return;
        }
        let mut world = projector.world_coords(x, y, true);

        if self.config.labeling.mode == LabelingMode::ProjectionCorrection {
            if let Some(snapped) = self.cloud.as_ref().and_then(|c| c.nearest_point(&world)) {
                world = snapped;
            }
        }

        self.drawing
            .register_point_3d(world, temporary, &mut self.controller);
    }

    /// Route an image-plane click into the active correspondence
    /// strategy. The pick arrives in display pixels.
    pub fn register_image_click(&mut self, point: Point2D, cam: Camera, temporary: bool) {
        self.drawing
            .register_point_2d(point, cam, temporary, &mut self.controller);
    }

    /// Scroll input: rotates (or, with shift, scales) the in-progress
    /// shape; otherwise resizes the hovered side of the active box.
    pub fn register_scroll(&mut self, delta: f64, shift_held: bool, hovered: Option<Side>) {
        if self.drawing.is_active() {
            if shift_held {
                self.drawing.register_scale(delta);
            } else {
                self.drawing.register_scroll(delta);
            }
        } else if let Some(side) = hovered {
            let factor = self.config.labeling.side_scroll_factor;
            self.controller.resize_side(side, -delta * factor);
        }
    }

    /// Sideways nudge: moves the in-progress shape while drawing,
    /// otherwise the active box.
    pub fn nudge_x(&mut self, left: bool, boost: bool) {
        let perspective = self.perspective();
        if let Some(strategy) = self.drawing.strategy_mut() {
            strategy.register_translate_x(&perspective, left, boost);
        } else {
            self.controller
                .translate_along_x(None, left, boost, &perspective);
        }
    }

    /// Forward/backward nudge.
    pub fn nudge_y(&mut self, forward: bool, boost: bool) {
        let perspective = self.perspective();
        if let Some(strategy) = self.drawing.strategy_mut() {
            strategy.register_translate_y(&perspective, forward, boost);
        } else {
            self.controller
                .translate_along_y(None, forward, boost, &perspective);
        }
    }

    /// Vertical nudge.
    pub fn nudge_z(&mut self, down: bool, boost: bool) {
        if let Some(strategy) = self.drawing.strategy_mut() {
            strategy.register_translate_z(down, boost);
        } else {
            self.controller.translate_along_z(None, down, boost);
        }
    }

    fn perspective(&self) -> crate::geometry::transform::Perspective {
        self.cloud
            .as_ref()
            .map(|c| c.pose.perspective())
            .unwrap_or_else(crate::geometry::transform::Perspective::identity)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select the box under a double-click, if any.
    pub fn select_by_ray(&mut self, x: f64, y: f64, projector: &dyn Projection) {
        let boxes: Vec<BBox> = self
            .controller
            .elements()
            .iter()
            .filter_map(|e| e.as_bbox().cloned())
            .collect();
        if let Some(index) = pick_bbox(x, y, &boxes, &projector.view_transform()) {
            self.controller.select(index);
            log::info!("Selected bounding box {}.", index);
        }
    }

    /// The active box's side under the cursor, for hover highlighting and
    /// side-drag resizing.
    pub fn hovered_side(&self, x: f64, y: f64, projector: &dyn Projection) -> Option<Side> {
        let bbox = self.controller.active_element()?.as_bbox()?;
        hover_side(x, y, bbox, &projector.view_transform())
    }

    /// Move the selection by `step`, wrapping past either end (unlike the
    /// controller's clamped relative selection).
    pub fn select_relative_element(&mut self, step: isize) {
        if step == 0 || self.controller.is_empty() {
            return;
        }
        let max = self.controller.len() as isize - 1;
        let current = self.controller.active_index().map_or(0, |i| i as isize);
        let target = current + step;
        let wrapped = if (0..=max).contains(&target) {
            target
        } else if step > 0 {
            0
        } else {
            max
        };
        self.controller.select(wrapped as usize);
    }

    /// Cycle the active box's class by `step` through the configured
    /// class list, wrapping both ways.
    pub fn select_relative_class(&mut self, step: isize) {
        if step == 0 {
            return;
        }
        let Some(current) = self
            .controller
            .active_element()
            .and_then(Element::as_bbox)
            .map(|b| b.classname().to_string())
        else {
            log::warn!("There is currently no active bounding box.");
            return;
        };
        if let Some(next) = self.config.relative_class(&current, step) {
            self.controller.set_classname(&next);
            self.current_class = next;
        }
    }

    /// Choose the class applied to newly drawn boxes.
    pub fn set_current_class(&mut self, name: &str) {
        if self.config.class(name).is_none() {
            log::warn!("Unknown class '{}'.", name);
            return;
        }
        self.current_class = name.to_string();
    }

    /// The camera focus anchor of the active element.
    pub fn focus_point(&self) -> Option<Point3D> {
        self.controller.focus_point()
    }

    // ------------------------------------------------------------------
    // Cloud operations
    // ------------------------------------------------------------------

    /// Crop the current cloud to the points inside the active box.
    /// `None` when there is no active box, no cloud, or no points inside.
    pub fn crop_active_box(&self) -> Option<PointCloud> {
        let bbox = self.controller.active_element()?.as_bbox()?;
        let cloud = self.cloud.as_ref()?;
        let cropped = cloud.filtered(&cloud.inside_mask(bbox));
        if cropped.is_none() {
            log::warn!("No points found inside the box. Ignored.");
        }
        cropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct FixedProjection {
        world: Point3D,
    }

    impl Projection for FixedProjection {
        fn world_coords(&self, _x: f64, _y: f64, _correction: bool) -> Point3D {
            self.world
        }

        fn view_transform(&self) -> crate::geometry::ViewTransform {
            crate::geometry::ViewTransform {
                modelview: nalgebra::Matrix4::identity(),
                projection: nalgebra::Matrix4::identity(),
                viewport: [0.0, 0.0, 100.0, 100.0],
            }
        }
    }

    fn test_session(dir: &TempDir, propagate: bool) -> Session {
        let mut config = AppConfig::new();
        config.labeling.propagate_labels = propagate;
        config.files.label_folder = dir.path().join("labels").to_string_lossy().into_owned();
        config.files.frame_postfix = "_oust".to_string();

        let frames = FrameSet::new(vec![
            dir.path().join("0001_oust.npy"),
            dir.path().join("0002_oust.npy"),
            dir.path().join("0003_oust.npy"),
        ]);
        Session::with_frames(config, frames)
    }

    fn draw_box_at(session: &mut Session, point: Point3D) {
        session.start_picking();
        let projector = FixedProjection { world: point };
        session.register_click(0.0, 0.0, false, &projector);
    }

    #[test]
    fn test_pick_draw_makes_active_element() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(&dir, false);

        draw_box_at(&mut session, Point3D::new(1.0, 2.0, 3.0));

        assert_eq!(session.controller().len(), 1);
        assert_eq!(session.controller().active_index(), Some(0));
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(&dir, false);

        draw_box_at(&mut session, Point3D::new(1.0, 2.0, 3.0));
        assert!(session.next_frame());
        assert!(session.controller().is_empty());

        assert!(session.prev_frame());
        assert_eq!(session.controller().len(), 1);
        assert_eq!(session.controller().active_index(), Some(0));
        let bbox = session.controller().elements()[0].as_bbox().unwrap();
        assert_eq!(bbox.classname(), "cart");
    }

    #[test]
    fn test_label_propagation_deep_copies() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(&dir, true);

        draw_box_at(&mut session, Point3D::new(1.0, 2.0, 3.0));
        assert!(session.next_frame());

        // The unlabeled next frame inherited the previous list.
        assert_eq!(session.controller().len(), 1);
        assert_eq!(session.controller().active_index(), Some(0));

        // Mutating the copy must not touch the saved previous frame.
        session.controller_mut().translate_along_z(Some(5.0), false, false);
        session.jump_to_frame(0);
        let bbox = session.controller().elements()[0].as_bbox().unwrap();
        assert!((bbox.center().z - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_navigation_saturates() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(&dir, false);

        assert!(!session.prev_frame());
        assert!(session.next_frame());
        assert!(session.next_frame());
        assert!(!session.next_frame());
        assert_eq!(session.frames().index(), 2);
    }

    #[test]
    fn test_wraparound_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(&dir, false);

        for i in 0..3 {
            draw_box_at(&mut session, Point3D::new(i as f64, 0.0, 0.0));
        }
        assert_eq!(session.controller().active_index(), Some(2));

        session.select_relative_element(1);
        assert_eq!(session.controller().active_index(), Some(0));

        session.select_relative_element(-1);
        assert_eq!(session.controller().active_index(), Some(2));
    }

    #[test]
    fn test_relative_class_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(&dir, false);

        draw_box_at(&mut session, Point3D::new(0.0, 0.0, 0.0));
        assert_eq!(
            session.controller().elements()[0].as_bbox().unwrap().classname(),
            "cart"
        );

        session.select_relative_class(1);
        assert_eq!(
            session.controller().elements()[0].as_bbox().unwrap().classname(),
            "person"
        );
    }

    #[test]
    fn test_toggle_tool_off() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(&dir, false);

        session.start_picking();
        assert!(session.is_drawing());
        session.start_picking();
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_escape_cancels_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(&dir, false);

        session.start_spanning();
        let projector = FixedProjection {
            world: Point3D::new(1.0, 1.0, 1.0),
        };
        session.register_click(0.0, 0.0, false, &projector);
        session.cancel_drawing();

        assert!(!session.is_drawing());
        assert!(session.controller().is_empty());
    }

    #[test]
    fn test_box_tools_rejected_in_projection_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::new();
        config.labeling.mode = LabelingMode::ProjectionCorrection;
        config.files.label_folder = dir.path().join("labels").to_string_lossy().into_owned();
        let session_frames = FrameSet::new(vec![PathBuf::from("0001.npy")]);
        let mut session = Session::with_frames(config, session_frames);

        session.start_picking();
        assert!(!session.is_drawing());

        session.start_point_match();
        assert!(session.is_drawing());
    }

    #[test]
    fn test_correspondence_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::new();
        config.labeling.mode = LabelingMode::ProjectionCorrection;
        config.files.label_folder = dir.path().join("labels").to_string_lossy().into_owned();
        let frames = FrameSet::new(vec![dir.path().join("0001.npy")]);
        let mut session = Session::with_frames(config, frames);

        session.start_point_match();
        let projector = FixedProjection {
            world: Point3D::new(1.0, 2.0, 3.0),
        };
        session.register_click(0.0, 0.0, false, &projector);
        session.register_image_click(Point2D::new(50.0, 60.0), Camera::Middle, false);

        assert!(session.can_complete_pair());
        session.complete_pair();

        assert_eq!(session.controller().len(), 1);
        let pair = session.controller().elements()[0].as_point_pair().unwrap();
        assert_eq!(pair.p3d(), Point3D::new(1.0, 2.0, 3.0));
        assert_eq!(pair.cam(), Camera::Middle);
    }

    #[test]
    fn test_side_scroll_resizes_active_box() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(&dir, false);
        draw_box_at(&mut session, Point3D::new(0.0, 0.0, 0.0));

        // One wheel notch outward on the right side.
        session.register_scroll(-120.0, false, Some(Side::Right));

        let bbox = session.controller().elements()[0].as_bbox().unwrap();
        let expected = 0.8 + 120.0 / 4000.0;
        assert!((bbox.length() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_nudge_moves_pending_shape_not_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(&dir, false);

        session.start_picking();
        session.nudge_z(false, false);
        let projector = FixedProjection {
            world: Point3D::new(0.0, 0.0, 0.0),
        };
        session.register_click(0.0, 0.0, false, &projector);

        let bbox = session.controller().elements()[0].as_bbox().unwrap();
        assert!((bbox.center().z - 0.03).abs() < 1e-9);
    }
}
