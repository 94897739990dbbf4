//! Selects the label codec for the session and guards its boundaries.
//!
//! Import failures degrade to an empty list plus a warning so frame
//! navigation never blocks on a bad file; export errors propagate so the
//! session can surface them.

use std::path::{Path, PathBuf};

use crate::config::LabelingMode;
use crate::format::centroid::CentroidFormat;
use crate::format::error::LabelError;
use crate::format::kitti::KittiFormat;
use crate::format::point_match::PointMatchFormat;
use crate::format::traits::LabelFormat;
use crate::model::Element;

/// Resolve the codec for a mode and format id. Unknown object-detection
/// ids fall back to centroid with a warning.
pub fn label_format_for(
    mode: LabelingMode,
    format_id: &str,
    precision: usize,
) -> Box<dyn LabelFormat> {
    match mode {
        LabelingMode::ObjectDetection => match format_id {
            "kitti" => Box::new(KittiFormat::new(precision)),
            "centroid" => Box::new(CentroidFormat::new(precision)),
            other => {
                log::warn!(
                    "Unknown export strategy '{}'. Proceeding with default (centroid)!",
                    other
                );
                Box::new(CentroidFormat::new(precision))
            }
        },
        LabelingMode::ProjectionCorrection => Box::new(PointMatchFormat::new(precision)),
    }
}

/// Per-frame label import/export through one selected codec.
pub struct LabelManager {
    label_folder: PathBuf,
    format: Box<dyn LabelFormat>,
}

impl LabelManager {
    pub fn new(mode: LabelingMode, format_id: &str, label_folder: &Path, precision: usize) -> Self {
        if !label_folder.is_dir() {
            if let Err(e) = std::fs::create_dir_all(label_folder) {
                log::warn!("Could not create label folder {:?}: {}", label_folder, e);
            }
        }

        Self {
            label_folder: label_folder.to_path_buf(),
            format: label_format_for(mode, format_id, precision),
        }
    }

    pub fn format_id(&self) -> &'static str {
        self.format.id()
    }

    pub fn label_folder(&self) -> &Path {
        &self.label_folder
    }

    /// Load a frame's elements. Any codec failure is downgraded to an
    /// empty list with a warning; the frame proceeds unlabeled.
    pub fn import_labels(&self, frame_stem: &str) -> Vec<Element> {
        match self.format.import_labels(&self.label_folder, frame_stem) {
            Ok(elements) => elements,
            Err(e) => {
                log::warn!("Could not import labels for '{}': {}", frame_stem, e);
                log::warn!("Please check the consistency of the label format.");
                Vec::new()
            }
        }
    }

    /// Persist a frame's elements. Errors are returned to the caller;
    /// saving must not crash navigation but the user should hear of it.
    pub fn export_labels(&self, frame_stem: &str, elements: &[Element]) -> Result<(), LabelError> {
        self.format
            .export_labels(&self.label_folder, frame_stem, elements)
    }
}
