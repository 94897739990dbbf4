//! Data models for the labeling core.

mod bbox;
mod element;
mod point;
mod point_pair;

pub use bbox::{BBox, Side};
pub use element::{Element, ElementKind};
pub use point::{Camera, Color3f, Point2D, Point3D};
pub use point_pair::PointPairCamera;
