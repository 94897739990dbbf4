//! Trait definition for label codec implementations.

use std::path::{Path, PathBuf};

use crate::format::error::LabelError;
use crate::model::Element;

/// Bidirectional conversion between the in-memory element list and one
/// on-disk label representation.
///
/// Each codec derives its own label filename from the frame stem, so
/// different formats can coexist in one label folder. Contract:
/// - importing a frame without a label file yields an empty list, not an
///   error;
/// - exporting may legally write nothing for an empty list (format's
///   choice);
/// - elements of a variant the format cannot represent are skipped with a
///   warning, never silently dropped.
pub trait LabelFormat {
    /// Unique identifier used in configuration (e.g. "centroid").
    fn id(&self) -> &'static str;

    /// Extension of the label files, including the dot.
    fn file_ending(&self) -> &'static str;

    /// Stem suffix appended before the extension (e.g. "_label3d").
    fn name_suffix(&self) -> &'static str;

    /// Full path of the label file for a frame.
    fn label_path(&self, label_folder: &Path, frame_stem: &str) -> PathBuf {
        label_folder.join(format!(
            "{}{}{}",
            frame_stem,
            self.name_suffix(),
            self.file_ending()
        ))
    }

    /// Read a frame's elements; an absent file is an empty frame.
    fn import_labels(
        &self,
        label_folder: &Path,
        frame_stem: &str,
    ) -> Result<Vec<Element>, LabelError>;

    /// Persist a frame's elements.
    fn export_labels(
        &self,
        label_folder: &Path,
        frame_stem: &str,
        elements: &[Element],
    ) -> Result<(), LabelError>;
}

/// Round a value to the codec's export precision.
pub(crate) fn round_to(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.005, 8), 1.005);
        assert_eq!(round_to(-2.71828, 3), -2.718);
    }
}
