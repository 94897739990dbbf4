//! Element list and active-selection management.
//!
//! One controller instance owns the ordered element list and selection
//! cursor for a single labeling mode, provides the manipulation verbs for
//! the active element, and announces structural changes through the typed
//! event dispatcher. External components read via accessors and mutate via
//! the verbs only; index validity is load-bearing for selection safety.

use crate::config::LabelingConfig;
use crate::constants::MIN_BBOX_DIMENSION;
use crate::control::events::{ElementEvent, EventDispatcher};
use crate::geometry::transform::Perspective;
use crate::model::{BBox, Camera, Element, ElementKind, Point2D, Point3D, PointPairCamera, Side};

/// Ordered element sequence plus a single active cursor.
///
/// The controller is configured with the element variant it accepts;
/// elements of the other variant are rejected at the boundary with a
/// warning, never an error.
pub struct ElementController {
    kind: ElementKind,
    elements: Vec<Element>,
    active: Option<usize>,
    params: LabelingConfig,
    events: EventDispatcher,
}

impl ElementController {
    pub fn new(kind: ElementKind, params: LabelingConfig) -> Self {
        log::debug!("ElementController instantiated for {}s.", kind.name());
        Self {
            kind,
            elements: Vec::new(),
            active: None,
            params,
            events: EventDispatcher::new(),
        }
    }

    /// The element variant this controller accepts.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Replace the manipulation tunables (e.g. after a settings change).
    pub fn set_params(&mut self, params: LabelingConfig) {
        self.params = params;
    }

    /// Register a listener for structural/selection events.
    pub fn subscribe(&mut self, listener: impl FnMut(&ElementEvent) + 'static) {
        self.events.subscribe(listener);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn has_active_element(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_element(&self) -> Option<&Element> {
        self.active.map(|i| &self.elements[i])
    }

    /// The active element's representative 3D anchor, if any.
    pub fn focus_point(&self) -> Option<Point3D> {
        self.active_element().map(Element::anchor)
    }

    // ------------------------------------------------------------------
    // Structural operations
    // ------------------------------------------------------------------

    /// Append an element and make it active.
    ///
    /// Rejects (warn, no-op) elements of the wrong variant.
    pub fn add(&mut self, element: Element) {
        if element.kind() != self.kind {
            log::warn!(
                "Rejected {}: this controller manages {}s.",
                element.kind().name(),
                self.kind.name()
            );
            return;
        }

        self.elements.push(element);
        let index = self.elements.len() - 1;
        self.active = Some(index);
        self.events.emit(ElementEvent::Added { index });
        self.events.emit(ElementEvent::ActiveChanged {
            index: Some(index),
        });
    }

    /// Make the element at `index` active; any out-of-range index clears
    /// the selection instead.
    pub fn select(&mut self, index: usize) {
        if index < self.elements.len() {
            self.active = Some(index);
            self.events.emit(ElementEvent::ActiveChanged {
                index: Some(index),
            });
        } else {
            self.deselect();
        }
    }

    /// Clear the selection and tell dependent UI to fall back to
    /// navigation.
    pub fn deselect(&mut self) {
        self.active = None;
        self.events.emit(ElementEvent::ActiveChanged { index: None });
        self.events.emit(ElementEvent::ModeReset);
    }

    /// Move the selection by `delta` places. Does nothing without an
    /// active element or when the target would fall outside the list;
    /// deliberately does not wrap.
    pub fn select_relative(&mut self, delta: isize) {
        let Some(active) = self.active else {
            return;
        };
        if delta == 0 {
            return;
        }
        let target = active as isize + delta;
        if target >= 0 && (target as usize) < self.elements.len() {
            self.select(target as usize);
        }
    }

    /// Remove the element at `index`. Deleting the active element
    /// re-selects the last element of the shortened list (clearing the
    /// selection when the list empties); deleting below the active index
    /// re-points the cursor at the same element.
    pub fn delete(&mut self, index: usize) {
        if index >= self.elements.len() {
            log::warn!("Delete request for out-of-range index {}.", index);
            return;
        }

        self.elements.remove(index);
        self.events.emit(ElementEvent::ListChanged);

        match self.active {
            Some(active) if active == index => {
                if self.elements.is_empty() {
                    self.deselect();
                } else {
                    self.select(self.elements.len() - 1);
                }
            }
            Some(active) if active > index => {
                self.active = Some(active - 1);
            }
            _ => {}
        }
    }

    /// Remove the active element, if any.
    pub fn delete_active(&mut self) {
        match self.active {
            Some(index) => self.delete(index),
            None => log::warn!("There is currently no active element to delete."),
        }
    }

    /// Replace the element at `index` in place. Index and variant are
    /// both checked; a failed check is a logged no-op.
    pub fn update(&mut self, index: usize, element: Element) {
        if element.kind() != self.kind {
            log::warn!(
                "Rejected update with {}: this controller manages {}s.",
                element.kind().name(),
                self.kind.name()
            );
            return;
        }
        if index >= self.elements.len() {
            log::warn!("Update request for out-of-range index {}.", index);
            return;
        }
        self.elements[index] = element;
        self.events.emit(ElementEvent::ListChanged);
    }

    /// Bulk-replace the list, e.g. when loading a frame's labels.
    ///
    /// All-or-nothing: if any element fails the variant check the whole
    /// call is rejected, so the list never holds mixed variants.
    pub fn set_all(&mut self, elements: Vec<Element>) {
        if let Some(bad) = elements.iter().find(|e| e.kind() != self.kind) {
            log::warn!(
                "Rejected bulk load: found a {} in a {} controller.",
                bad.kind().name(),
                self.kind.name()
            );
            return;
        }
        self.elements = elements;
        self.active = None;
        self.events.emit(ElementEvent::ListChanged);
    }

    /// Deselect and clear the list; used on frame transitions.
    pub fn reset(&mut self) {
        self.deselect();
        self.elements.clear();
        self.events.emit(ElementEvent::ListChanged);
    }

    // ------------------------------------------------------------------
    // Manipulation verbs (active bounding box)
    // ------------------------------------------------------------------

    fn active_bbox_mut(&mut self) -> Option<&mut BBox> {
        let Some(index) = self.active else {
            log::warn!("There is currently no active element.");
            return None;
        };
        let bbox = self.elements[index].as_bbox_mut();
        if bbox.is_none() {
            log::warn!("The active element is not a bounding box.");
        }
        bbox
    }

    fn active_pair_mut(&mut self) -> Option<&mut PointPairCamera> {
        let Some(index) = self.active else {
            log::warn!("There is currently no active element.");
            return None;
        };
        let pair = self.elements[index].as_point_pair_mut();
        if pair.is_none() {
            log::warn!("The active element is not a point pair.");
        }
        pair
    }

    fn step(base: Option<f64>, default: f64, reverse: bool, boost: bool, boost_factor: f64) -> f64 {
        let mut step = base.unwrap_or(default);
        if reverse {
            step = -step;
        }
        if boost {
            step *= boost_factor;
        }
        step
    }

    /// Set the active box's classname.
    pub fn set_classname(&mut self, classname: &str) {
        if let Some(bbox) = self.active_bbox_mut() {
            bbox.set_classname(classname);
            self.events.emit(ElementEvent::ListChanged);
        }
    }

    /// Absolute-position the active box's center.
    pub fn set_center(&mut self, x: f64, y: f64, z: f64) {
        if let Some(bbox) = self.active_bbox_mut() {
            bbox.set_center(x, y, z);
        }
    }

    /// Move the active box sideways relative to the current view heading.
    pub fn translate_along_x(
        &mut self,
        distance: Option<f64>,
        left: bool,
        boost: bool,
        perspective: &Perspective,
    ) {
        let step = Self::step(
            distance,
            self.params.std_translation,
            left,
            boost,
            self.params.boost_multiplier,
        );
        let (cos_z, sin_z) = (perspective.cos_z, perspective.sin_z);
        if let Some(bbox) = self.active_bbox_mut() {
            let center = bbox.center();
            bbox.set_x_translation(center.x + step * cos_z);
            bbox.set_y_translation(center.y + step * sin_z);
        }
    }

    /// Move the active box forward/backward relative to the view heading.
    pub fn translate_along_y(
        &mut self,
        distance: Option<f64>,
        forward: bool,
        boost: bool,
        perspective: &Perspective,
    ) {
        let step = Self::step(
            distance,
            self.params.std_translation,
            forward,
            boost,
            self.params.boost_multiplier,
        );
        let (cos_z, sin_z, up) = (perspective.cos_z, perspective.sin_z, perspective.up_sign);
        if let Some(bbox) = self.active_bbox_mut() {
            let center = bbox.center();
            bbox.set_x_translation(center.x + step * up * -sin_z);
            bbox.set_y_translation(center.y + step * up * cos_z);
        }
    }

    /// Move the active box along the world z axis.
    pub fn translate_along_z(&mut self, distance: Option<f64>, down: bool, boost: bool) {
        let step = Self::step(
            distance,
            self.params.std_translation,
            down,
            boost,
            self.params.boost_multiplier,
        );
        if let Some(bbox) = self.active_bbox_mut() {
            let center = bbox.center();
            bbox.set_z_translation(center.z + step);
        }
    }

    /// Rotate the active box around its x axis. Suppressed (with a
    /// warning) while z-only rotation is configured.
    pub fn rotate_around_x(&mut self, dangle: Option<f64>, clockwise: bool) {
        if self.params.z_rotation_only {
            log::warn!("Rotations around the x axis are not supported in this mode.");
            return;
        }
        let step = Self::step(dangle, self.params.std_rotation, clockwise, false, 1.0);
        if let Some(bbox) = self.active_bbox_mut() {
            bbox.set_x_rotation(bbox.x_rotation() + step);
        }
    }

    /// Rotate the active box around its y axis. Suppressed (with a
    /// warning) while z-only rotation is configured.
    pub fn rotate_around_y(&mut self, dangle: Option<f64>, clockwise: bool) {
        if self.params.z_rotation_only {
            log::warn!("Rotations around the y axis are not supported in this mode.");
            return;
        }
        let step = Self::step(dangle, self.params.std_rotation, clockwise, false, 1.0);
        if let Some(bbox) = self.active_bbox_mut() {
            bbox.set_y_rotation(bbox.y_rotation() + step);
        }
    }

    /// Rotate the active box around the z axis; `absolute` sets the angle
    /// instead of adding to it.
    pub fn rotate_around_z(&mut self, dangle: Option<f64>, clockwise: bool, absolute: bool) {
        let step = Self::step(dangle, self.params.std_rotation, clockwise, false, 1.0);
        if let Some(bbox) = self.active_bbox_mut() {
            if absolute {
                bbox.set_z_rotation(step);
            } else {
                bbox.set_z_rotation(bbox.z_rotation() + step);
            }
        }
    }

    /// Free rotation from mouse movement: the horizontal drag turns the
    /// box around z, the vertical drag is split between x and y according
    /// to the box's current heading in the rotated cloud.
    pub fn rotate_with_mouse(&mut self, x_angle: f64, y_angle: f64, cloud_z_rotation: f64) {
        let Some(bbox) = self.active_element().and_then(Element::as_bbox) else {
            log::warn!("There is currently no active bounding box.");
            return;
        };

        let total_z = cloud_z_rotation + bbox.z_rotation();
        let cos_z = total_z.to_radians().cos().round();
        let sin_z = -total_z.to_radians().sin().round();

        self.rotate_around_x(Some(y_angle * cos_z), false);
        self.rotate_around_y(Some(y_angle * sin_z), false);
        self.rotate_around_z(Some(x_angle), false, false);
    }

    /// Scale the active box while keeping its aspect ratio: the length
    /// grows by the step and width/height follow proportionally. Rejected
    /// when the new length would collapse the box.
    pub fn scale(&mut self, length_increase: Option<f64>, decrease: bool) {
        let step = Self::step(
            length_increase,
            self.params.std_scaling,
            decrease,
            false,
            1.0,
        );
        if let Some(bbox) = self.active_bbox_mut() {
            let (length, width, height) = bbox.dimensions();
            let new_length = length + step;
            if new_length < MIN_BBOX_DIMENSION {
                log::warn!("Scale request rejected: box would collapse.");
                return;
            }
            let factor = new_length / length;
            bbox.set_dimensions(new_length, width * factor, height * factor);
        }
    }

    /// Pull one side of the active box outward (positive delta) or
    /// inward, keeping the opposite side fixed. Drives side-drag
    /// resizing.
    pub fn resize_side(&mut self, side: Side, delta: f64) {
        if let Some(bbox) = self.active_bbox_mut() {
            bbox.change_side(side, delta);
        }
    }

    // ------------------------------------------------------------------
    // Manipulation verbs (active point pair)
    // ------------------------------------------------------------------

    /// Replace the 3D side of the active point pair.
    pub fn update_point_3d(&mut self, point: Point3D) {
        if let Some(pair) = self.active_pair_mut() {
            pair.set_p3d(point);
            self.events.emit(ElementEvent::ListChanged);
        }
    }

    /// Replace the 2D side (point and camera) of the active point pair.
    pub fn update_point_2d(&mut self, point: Point2D, camera: Camera) {
        if let Some(pair) = self.active_pair_mut() {
            pair.set_p2d(point, camera);
            self.events.emit(ElementEvent::ListChanged);
        }
    }
}
