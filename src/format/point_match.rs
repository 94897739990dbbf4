//! Raw point-match format: one CSV text file per frame.
//!
//! Each row pairs a camera index and a 3D point with its 2D pick; rows
//! carry the detransformed pixel location when it is known, and sentinel
//! values when it is not (a tolerated lossy path, flagged with a warning).

use std::path::Path;

use crate::constants::MISSING_P2D_TRUE;
use crate::format::error::LabelError;
use crate::format::traits::{round_to, LabelFormat};
use crate::model::{Camera, Element, Point2D, Point3D, PointPairCamera};

const HEADER: &str = "camera,point3d_x_y_z,point2d_x_y,point2d_true_x_y";

/// CSV point-pair format for projection-correction labels.
pub struct PointMatchFormat {
    precision: usize,
}

impl PointMatchFormat {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    fn parse_row(&self, line: &str) -> Option<PointPairCamera> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 6 && fields.len() != 8 {
            return None;
        }

        let cam_index = fields[0].parse::<u8>().ok()?;
        let cam = Camera::try_from(cam_index).ok()?;
        let values: Vec<f64> = fields[1..]
            .iter()
            .map(|f| f.parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;

        let pair = PointPairCamera::new(
            Point3D::new(values[0], values[1], values[2]),
            Point2D::new(values[3], values[4]),
            cam,
        );

        // Sentinel columns mean the detransformed point was never known.
        if values.len() == 7 && (values[5], values[6]) != (MISSING_P2D_TRUE, MISSING_P2D_TRUE) {
            Some(pair.with_true_point(Point2D::new(values[5], values[6])))
        } else {
            Some(pair)
        }
    }
}

impl LabelFormat for PointMatchFormat {
    fn id(&self) -> &'static str {
        "point_match"
    }

    fn file_ending(&self) -> &'static str {
        ".txt"
    }

    fn name_suffix(&self) -> &'static str {
        "_points"
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
        for (number, line) in content.lines().skip(1).enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match self.parse_row(line) {
                Some(pair) => elements.push(Element::from(pair)),
                None => log::warn!(
                    "Error reading line {} of {:?}; skipping it.",
                    number + 2,
                    path
                ),
            }
        }

        log::info!("Imported {} point pairs from {:?}.", elements.len(), path);
        Ok(elements)
    }

    fn export_labels(
        &self,
        label_folder: &Path,
        frame_stem: &str,
        elements: &[Element],
    ) -> Result<(), LabelError> {
        if elements.is_empty() {
            return Ok(());
        }

        let mut lines = vec![HEADER.to_string()];
        for element in elements {
            let Some(pair) = element.as_point_pair() else {
                log::warn!("Skipping {}: point-match format stores point pairs.", element.kind().name());
                continue;
            };

            let p = self.precision;
            let p3d = pair.p3d();
            let p2d = pair.p2d();
            let (tx, ty) = match pair.p2d_true() {
                Some(true_point) => (round_to(true_point.x, p), round_to(true_point.y, p)),
                None => {
                    log::warn!(
                        "Writing a point pair without a detransformed 2D point; \
                         this may be an erroneous read/write."
                    );
                    (MISSING_P2D_TRUE, MISSING_P2D_TRUE)
                }
            };
            lines.push(format!(
                "{},{},{},{},{},{},{},{}",
                pair.cam().index(),
                round_to(p3d.x, p),
                round_to(p3d.y, p),
                round_to(p3d.z, p),
                round_to(p2d.x, p),
                round_to(p2d.y, p),
                tx,
                ty,
            ));
        }

        std::fs::create_dir_all(label_folder)?;
        let path = self.label_path(label_folder, frame_stem);
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(&path, content)?;
        log::info!(
            "Exported {} pairs to {:?} in point-match formatting.",
            lines.len() - 1,
            path
        );
        Ok(())
    }
}
