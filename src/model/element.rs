//! The unit of annotation: a bounding box or a point correspondence.

use crate::model::{BBox, Point3D, PointPairCamera};

/// Discriminant for [`Element`] variants; also tags which variant a
/// controller instance accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    BoundingBox,
    PointPair,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::BoundingBox => "bounding box",
            ElementKind::PointPair => "point pair",
        }
    }
}

/// A single annotation. A labeling session uses exactly one variant; the
/// two are never mixed within one controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    BoundingBox(BBox),
    PointPair(PointPairCamera),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::BoundingBox(_) => ElementKind::BoundingBox,
            Element::PointPair(_) => ElementKind::PointPair,
        }
    }

    /// The element's representative 3D anchor: box center or the pair's
    /// world point. Used for focus-lock and list readouts.
    pub fn anchor(&self) -> Point3D {
        match self {
            Element::BoundingBox(bbox) => bbox.center(),
            Element::PointPair(pair) => pair.p3d(),
        }
    }

    /// Label shown in the element list.
    pub fn list_label(&self) -> String {
        match self {
            Element::BoundingBox(bbox) => bbox.classname().to_string(),
            Element::PointPair(_) => "Point".to_string(),
        }
    }

    pub fn as_bbox(&self) -> Option<&BBox> {
        match self {
            Element::BoundingBox(bbox) => Some(bbox),
            Element::PointPair(_) => None,
        }
    }

    pub fn as_bbox_mut(&mut self) -> Option<&mut BBox> {
        match self {
            Element::BoundingBox(bbox) => Some(bbox),
            Element::PointPair(_) => None,
        }
    }

    pub fn as_point_pair(&self) -> Option<&PointPairCamera> {
        match self {
            Element::PointPair(pair) => Some(pair),
            Element::BoundingBox(_) => None,
        }
    }

    pub fn as_point_pair_mut(&mut self) -> Option<&mut PointPairCamera> {
        match self {
            Element::PointPair(pair) => Some(pair),
            Element::BoundingBox(_) => None,
        }
    }
}

impl From<BBox> for Element {
    fn from(bbox: BBox) -> Self {
        Element::BoundingBox(bbox)
    }
}

impl From<PointPairCamera> for Element {
    fn from(pair: PointPairCamera) -> Self {
        Element::PointPair(pair)
    }
}
