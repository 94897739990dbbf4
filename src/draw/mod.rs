//! Incremental construction of new elements from point registrations.
//!
//! A drawing strategy is a small state machine: committed points advance
//! it toward completion, a temporary point feeds the live preview, and
//! scroll/translate/scale modifiers adjust the in-progress shape without
//! committing anything. `reset` returns any strategy to idle.

mod picking;
mod point_match;
mod spanning;

pub use picking::PickingStrategy;
pub use point_match::PointMatchStrategy;
pub use spanning::SpanningStrategy;

use crate::config::AppConfig;
use crate::geometry::transform::Perspective;
use crate::model::{BBox, Camera, Element, Point2D, Point3D};

/// Identifies a concrete strategy; selecting the same id twice toggles
/// drawing off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyId {
    Picking,
    Spanning,
    PointMatch,
}

/// Geometry of the in-progress shape, polled by the renderer each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewShape {
    /// A speculative box following the cursor.
    Box(BBox),
    /// A partially assembled correspondence; either side may be missing.
    Pair {
        p3d: Option<Point3D>,
        p2d: Option<(Point2D, Camera)>,
    },
}

/// Configuration snapshot handed to a strategy at construction.
///
/// Strategies never read ambient state; the active class and step sizes
/// are fixed when drawing starts.
#[derive(Debug, Clone)]
pub struct DrawParams {
    /// Class assigned to a finished box.
    pub classname: String,
    /// Default (length, width, height) of the class.
    pub dimensions: (f64, f64, f64),
    /// Meters per translation step.
    pub std_translation: f64,
    /// Meters of length per scale step.
    pub std_scaling: f64,
    /// Step multiplier while boosting.
    pub boost_multiplier: f64,
    /// Scroll-wheel units per degree of z-rotation.
    pub scroll_rotation_divisor: f64,
    /// Native-to-display factor of the camera images.
    pub display_scale: f64,
}

impl DrawParams {
    /// Snapshot the given class from the configuration.
    pub fn from_config(config: &AppConfig, classname: &str) -> Self {
        Self {
            classname: classname.to_string(),
            dimensions: config.class_dimensions(classname),
            std_translation: config.labeling.std_translation,
            std_scaling: config.labeling.std_scaling,
            boost_multiplier: config.labeling.boost_multiplier,
            scroll_rotation_divisor: config.labeling.scroll_rotation_divisor,
            display_scale: config.images.display_scale,
        }
    }
}

/// The capability interface every drawing strategy implements.
///
/// The owning manager must check [`DrawingStrategy::is_finished`] after
/// each commit and transfer the result out before routing further input;
/// registering points into a finished strategy is a logic error.
pub trait DrawingStrategy {
    /// Which concrete strategy this is.
    fn id(&self) -> StrategyId;

    /// Minimum number of commits before the strategy can finish.
    fn points_needed(&self) -> usize;

    /// Whether the renderer should poll [`DrawingStrategy::preview`].
    fn shows_preview(&self) -> bool;

    /// Commit a 3D point, advancing construction.
    fn register_point(&mut self, point: Point3D);

    /// Update the uncommitted preview point; called on every pointer move
    /// and freely overwritten.
    fn register_tmp_point(&mut self, point: Point3D);

    /// Commit a camera-tagged 2D point (correspondence drawing only).
    fn register_point_2d(&mut self, _point: Point2D, _cam: Camera) {}

    /// Update the temporary 2D point (correspondence drawing only).
    fn register_tmp_point_2d(&mut self, _point: Point2D, _cam: Camera) {}

    /// Accumulate scroll input into the in-progress shape.
    fn register_scroll(&mut self, _delta: f64) {}

    /// Accumulate a size change into the in-progress shape.
    fn register_scale(&mut self, _delta: f64) {}

    /// Nudge the pending shape sideways in the view frame.
    fn register_translate_x(&mut self, _perspective: &Perspective, _left: bool, _boost: bool) {}

    /// Nudge the pending shape forward/backward in the view frame.
    fn register_translate_y(&mut self, _perspective: &Perspective, _forward: bool, _boost: bool) {}

    /// Nudge the pending shape along world z.
    fn register_translate_z(&mut self, _down: bool, _boost: bool) {}

    /// Whether the 3D side is already locked (correspondence drawing);
    /// the manager suppresses further 3D commits while true.
    fn holds_3d(&self) -> bool {
        false
    }

    /// Whether box-mode strategies hand their result off automatically
    /// after the finishing commit. Correspondence strategies wait for an
    /// explicit finish instead.
    fn auto_finish(&self) -> bool {
        true
    }

    /// True once enough commits have accumulated.
    fn is_finished(&self) -> bool;

    /// Assemble the finished element; `None` while unfinished.
    fn result(&self) -> Option<Element>;

    /// Return to idle, clearing commits, the temp point and modifiers.
    fn reset(&mut self);

    /// The in-progress geometry for rendering, if any.
    fn preview(&self) -> Option<PreviewShape>;
}
