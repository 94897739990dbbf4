//! Centroid label format: one JSON file per frame.
//!
//! Stores each box as center location, dimensions and orientation.
//! Rotations are kept in radians on disk and converted to the model's
//! degrees on import.

use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::format::error::LabelError;
use crate::format::traits::{round_to, LabelFormat};
use crate::model::{BBox, Element, Point3D};

/// Centroid JSON format for object-detection labels.
pub struct CentroidFormat {
    precision: usize,
}

impl CentroidFormat {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CentroidFile {
    name: String,
    timestamp: u64,
    index: String,
    labels: Vec<CentroidLabel>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CentroidLabel {
    id: usize,
    category: String,
    box3d: Box3d,
}

#[derive(Debug, Serialize, Deserialize)]
struct Box3d {
    dimension: Dimension,
    location: Location,
    orientation: Orientation,
}

#[derive(Debug, Serialize, Deserialize)]
struct Dimension {
    length: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Location {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Orientation {
    #[serde(default)]
    x_rotation: f64,
    #[serde(default)]
    y_rotation: f64,
    #[serde(default)]
    z_rotation: f64,
}

impl LabelFormat for CentroidFormat {
    fn id(&self) -> &'static str {
        "centroid"
    }

    fn file_ending(&self) -> &'static str {
        ".json"
    }

    fn name_suffix(&self) -> &'static str {
        "_label3d"
    }

    fn import_labels(
        &self,
        label_folder: &Path,
        frame_stem: &str,
    ) -> Result<Vec<Element>, LabelError> {
        let path = self.label_path(label_folder, frame_stem);
        if !path.is_file() {
            return Ok(Vec::new());
        }

        let json = std::fs::read_to_string(&path)?;
        let file: CentroidFile = serde_json::from_str(&json)?;

        let mut elements = Vec::with_capacity(file.labels.len());
        for label in file.labels {
            let mut bbox = BBox::new(
                Point3D::new(
                    label.box3d.location.x,
                    label.box3d.location.y,
                    label.box3d.location.z,
                ),
                label.box3d.dimension.length,
                label.box3d.dimension.width,
                label.box3d.dimension.height,
            );
            bbox.set_rotations(
                label.box3d.orientation.x_rotation / PI * 180.0,
                label.box3d.orientation.y_rotation / PI * 180.0,
                label.box3d.orientation.z_rotation / PI * 180.0,
            );
            bbox.set_classname(&label.category);
            elements.push(Element::from(bbox));
        }

        log::info!("Imported {} labels from {:?}.", elements.len(), path);
        Ok(elements)
    }

    fn export_labels(
        &self,
        label_folder: &Path,
        frame_stem: &str,
        elements: &[Element],
    ) -> Result<(), LabelError> {
        let mut labels = Vec::new();
        for (i, element) in elements.iter().enumerate() {
            let Some(bbox) = element.as_bbox() else {
                log::warn!("Skipping {}: centroid format stores bounding boxes.", element.kind().name());
                continue;
            };

            let (length, width, height) = bbox.dimensions();
            let center = bbox.center();
            let (rx, ry, rz) = bbox.rotations();
            let p = self.precision;
            labels.push(CentroidLabel {
                id: i + 1,
                category: bbox.classname().to_string(),
                box3d: Box3d {
                    dimension: Dimension {
                        length: round_to(length, p),
                        width: round_to(width, p),
                        height: round_to(height, p),
                    },
                    location: Location {
                        x: round_to(center.x, p),
                        y: round_to(center.y, p),
                        z: round_to(center.z, p),
                    },
                    orientation: Orientation {
                        x_rotation: round_to(rx / 180.0 * PI, p),
                        y_rotation: round_to(ry / 180.0 * PI, p),
                        z_rotation: round_to(rz / 180.0 * PI, p),
                    },
                },
            });
        }

        let file = CentroidFile {
            name: frame_stem.to_string(),
            timestamp: 0,
            index: frame_stem.to_string(),
            labels,
        };

        std::fs::create_dir_all(label_folder)?;
        let path = self.label_path(label_folder, frame_stem);
        std::fs::write(&path, serde_json::to_string_pretty(&file)?)?;
        log::info!(
            "Exported {} labels to {:?} in centroid formatting.",
            file.labels.len(),
            path
        );
        Ok(())
    }
}
