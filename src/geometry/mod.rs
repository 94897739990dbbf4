//! Coordinate transforms and screen-space hit-testing.

pub mod picking;
pub mod transform;

pub use picking::{hover_side, pick_bbox, ViewTransform};
