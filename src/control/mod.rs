//! Controllers: element list/selection management and drawing mediation.

mod drawing_manager;
mod element_controller;
mod events;

pub use drawing_manager::DrawingManager;
pub use element_controller::ElementController;
pub use events::{ElementEvent, EventDispatcher};
