//! cloudlabel - interactive 3D point-cloud labeling core
//!
//! Element lifecycle and selection, drawing-strategy state machines,
//! oriented-box geometry and per-frame label persistence for a point-cloud
//! labeling tool. Rendering, windowing and camera math live behind the
//! collaborator traits in [`view`].

pub mod cloud;
pub mod config;
pub mod constants;
pub mod control;
pub mod draw;
pub mod format;
pub mod geometry;
pub mod model;
pub mod session;
pub mod view;

pub use config::AppConfig;
pub use session::Session;
