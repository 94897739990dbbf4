//! Global constants for the cloudlabel core.

/// Smallest dimension (in meters) a bounding box side may shrink to.
pub const MIN_BBOX_DIMENSION: f64 = 0.01;

/// Default dimensions for a class without a configured dimension triple.
pub const DEFAULT_BBOX_DIMENSIONS: (f64, f64, f64) = (2.0, 2.0, 2.0);

/// Sentinel written for a missing detransformed 2D point on export.
pub const MISSING_P2D_TRUE: f64 = -1.0;

/// Number of cameras in the fixed multi-camera rig.
pub const CAMERA_COUNT: usize = 3;

/// Scroll delta (in wheel units) that maps to one degree of z-rotation
/// while picking.
pub const SCROLL_ROTATION_DIVISOR: f64 = 30.0;

/// Decimal places used when writing label files.
pub const DEFAULT_EXPORT_PRECISION: usize = 8;
