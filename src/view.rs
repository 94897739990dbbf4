//! Contracts for the rendering collaborators.
//!
//! The core never draws; it consumes a projection provider for
//! screen-to-world mapping and exposes read-only snapshots (element list,
//! active index, preview geometry) that a renderer polls once per tick.

use crate::geometry::ViewTransform;
use crate::model::Point3D;

/// Maps screen pixels into the 3D scene.
///
/// Implemented by the GL widget; the core calls it once per click or drag
/// event and never performs the camera math itself.
pub trait Projection {
    /// World point under the given window pixel. With `correction` set,
    /// the depth is taken relative to the locked reference plane instead
    /// of the raw depth buffer.
    fn world_coords(&self, x: f64, y: f64, correction: bool) -> Point3D;

    /// The current modelview/projection matrices and viewport, used for
    /// box picking and side hovering.
    fn view_transform(&self) -> ViewTransform;
}
