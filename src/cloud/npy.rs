//! Reading and writing point-cloud frames as NumPy `.npy` files.
//!
//! Frames are (N, >=3) arrays of `f32` or `f64`; the first three columns
//! are x, y, z. Anything narrower is rejected as malformed.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ndarray::Array2;
use ndarray_npy::{ReadNpyError, ReadNpyExt, WriteNpyError, WriteNpyExt};
use thiserror::Error;

use crate::cloud::PointCloud;

/// Errors raised by the point-cloud codec.
#[derive(Debug, Error)]
pub enum CloudError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed npy payload
    #[error("npy read error: {0}")]
    Read(#[from] ReadNpyError),

    /// Failure while writing an npy payload
    #[error("npy write error: {0}")]
    Write(#[from] WriteNpyError),

    /// Array has too few columns to hold x, y, z
    #[error("point cloud has {columns} columns, need at least 3")]
    BadShape { columns: usize },
}

/// Load a frame's point cloud.
///
/// `f32` arrays are read directly; `f64` arrays are narrowed, matching
/// whatever precision the recording pipeline produced.
pub fn read_npy(path: &Path) -> Result<PointCloud, CloudError> {
    let file = File::open(path)?;
    let points = match Array2::<f32>::read_npy(file) {
        Ok(points) => points,
        Err(first_err) => {
            let file = File::open(path)?;
            match Array2::<f64>::read_npy(file) {
                Ok(points) => points.mapv(|v| v as f32),
                Err(_) => return Err(first_err.into()),
            }
        }
    };

    if points.ncols() < 3 {
        return Err(CloudError::BadShape {
            columns: points.ncols(),
        });
    }

    log::debug!("Read {} points from {:?}.", points.nrows(), path);
    Ok(PointCloud::new(points))
}

/// Persist a (possibly cropped) cloud back to disk.
pub fn write_npy(path: &Path, cloud: &PointCloud) -> Result<(), CloudError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    cloud.points().write_npy(writer)?;
    log::info!("Wrote {} points to {:?}.", cloud.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.npy");

        let cloud = PointCloud::new(array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        write_npy(&path, &cloud).unwrap();

        let loaded = read_npy(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.points(), cloud.points());
    }

    #[test]
    fn test_too_few_columns_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.npy");

        let flat = PointCloud::new(array![[1.0f32, 2.0], [3.0, 4.0]]);
        write_npy(&path, &flat).unwrap();

        assert!(matches!(
            read_npy(&path),
            Err(CloudError::BadShape { columns: 2 })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_npy(Path::new("/nonexistent/frame.npy"));
        assert!(matches!(result, Err(CloudError::Io(_))));
    }
}
