//! Point-cloud data, frame navigation and npy I/O.

mod frames;
mod npy;
mod pointcloud;

pub use frames::FrameSet;
pub use npy::{read_npy, write_npy, CloudError};
pub use pointcloud::{CloudPose, PointCloud};
