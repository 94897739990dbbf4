//! KITTI-style label format: one whitespace-separated text file per frame.
//!
//! Writes the standard 15-column KITTI object line. The 2D columns
//! (truncation, occlusion, alpha, image bbox) are zeroed since this tool
//! labels in 3D only; dimensions follow KITTI's height/width/length order
//! and the rotation column is the z heading in radians.

use std::f64::consts::PI;
use std::path::Path;

use crate::format::error::LabelError;
use crate::format::traits::{round_to, LabelFormat};
use crate::model::{BBox, Element, Point3D};

const KITTI_COLUMNS: usize = 15;

/// KITTI TXT format for object-detection labels.
pub struct KittiFormat {
    precision: usize,
}

impl KittiFormat {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }
}

impl LabelFormat for KittiFormat {
    fn id(&self) -> &'static str {
        "kitti"
    }

    fn file_ending(&self) -> &'static str {
        ".txt"
    }

    fn name_suffix(&self) -> &'static str {
        ""
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

        let content = std::fs::read_to_string(&path)?;
        let mut elements = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != KITTI_COLUMNS {
                log::warn!(
                    "Skipping malformed line {} in {:?}: expected {} columns, found {}.",
                    number + 1,
                    path,
                    KITTI_COLUMNS,
                    fields.len()
                );
                continue;
            }

            let parsed: Result<Vec<f64>, _> =
                fields[8..15].iter().map(|f| f.parse::<f64>()).collect();
            let Ok(values) = parsed else {
                log::warn!("Skipping line {} in {:?}: bad number.", number + 1, path);
                continue;
            };
            let (height, width, length) = (values[0], values[1], values[2]);
            let (x, y, z, rotation) = (values[3], values[4], values[5], values[6]);

            let mut bbox = BBox::new(Point3D::new(x, y, z), length, width, height);
            bbox.set_z_rotation(rotation / PI * 180.0);
            bbox.set_classname(fields[0]);
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
        let mut lines = Vec::new();
        for element in elements {
            let Some(bbox) = element.as_bbox() else {
                log::warn!("Skipping {}: KITTI format stores bounding boxes.", element.kind().name());
                continue;
            };

            let (length, width, height) = bbox.dimensions();
            let center = bbox.center();
            let p = self.precision;
            lines.push(format!(
                "{} 0 0 0 0 0 0 0 {} {} {} {} {} {} {}",
                bbox.classname(),
                round_to(height, p),
                round_to(width, p),
                round_to(length, p),
                round_to(center.x, p),
                round_to(center.y, p),
                round_to(center.z, p),
                round_to(bbox.z_rotation() / 180.0 * PI, p),
            ));
        }

        std::fs::create_dir_all(label_folder)?;
        let path = self.label_path(label_folder, frame_stem);
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        std::fs::write(&path, content)?;
        log::info!(
            "Exported {} labels to {:?} in KITTI formatting.",
            lines.len(),
            path
        );
        Ok(())
    }
}
