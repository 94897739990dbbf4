//! Configuration file support for cloudlabel.
//!
//! Serialization and deserialization of labeling settings, so sessions can
//! be reproduced and manipulation steps tuned without recompiling. The
//! controllers receive this as an explicit snapshot; nothing reads ambient
//! global state.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BBOX_DIMENSIONS, DEFAULT_EXPORT_PRECISION, SCROLL_ROTATION_DIVISOR};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Which annotation variant a session produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LabelingMode {
    /// Oriented 3D bounding boxes.
    #[default]
    ObjectDetection,
    /// 3D-to-2D point correspondences for camera calibration.
    ProjectionCorrection,
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Labeling-mode selection and manipulation tunables
    #[serde(default)]
    pub labeling: LabelingConfig,

    /// Input/output folder layout
    #[serde(default)]
    pub files: FileConfig,

    /// Camera-image display settings for projection correction
    #[serde(default)]
    pub images: ImageConfig,

    /// Known object classes with their default box dimensions
    #[serde(default = "default_classes")]
    pub classes: Vec<ClassConfig>,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Manipulation step sizes and labeling behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelingConfig {
    /// Session mode: boxes or point correspondences
    #[serde(default)]
    pub mode: LabelingMode,

    /// Label codec id ("centroid", "kitti", "point_match")
    #[serde(default = "default_label_format")]
    pub label_format: String,

    /// Distance in meters one translation step moves the active box
    #[serde(default = "default_std_translation")]
    pub std_translation: f64,

    /// Degrees one rotation step turns the active box
    #[serde(default = "default_std_rotation")]
    pub std_rotation: f64,

    /// Meters one scaling step adds to the box length
    #[serde(default = "default_std_scaling")]
    pub std_scaling: f64,

    /// Multiplier applied to steps while the boost key is held
    #[serde(default = "default_boost_multiplier")]
    pub boost_multiplier: f64,

    /// Restrict rotation to the z axis
    #[serde(default = "default_true")]
    pub z_rotation_only: bool,

    /// Carry the previous frame's labels into an unlabeled frame
    #[serde(default)]
    pub propagate_labels: bool,

    /// Meters of side growth per scroll-wheel unit while hovering a side
    #[serde(default = "default_side_scroll_factor")]
    pub side_scroll_factor: f64,

    /// Scroll-wheel units per degree of z-rotation while picking
    #[serde(default = "default_scroll_rotation_divisor")]
    pub scroll_rotation_divisor: f64,

    /// Decimal places written by label codecs
    #[serde(default = "default_export_precision")]
    pub export_precision: usize,
}

fn default_label_format() -> String {
    "centroid".to_string()
}

fn default_std_translation() -> f64 {
    0.03
}

fn default_std_rotation() -> f64 {
    0.5
}

fn default_std_scaling() -> f64 {
    0.03
}

fn default_boost_multiplier() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}

fn default_side_scroll_factor() -> f64 {
    1.0 / 4000.0
}

fn default_scroll_rotation_divisor() -> f64 {
    SCROLL_ROTATION_DIVISOR
}

fn default_export_precision() -> usize {
    DEFAULT_EXPORT_PRECISION
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            mode: LabelingMode::default(),
            label_format: default_label_format(),
            std_translation: default_std_translation(),
            std_rotation: default_std_rotation(),
            std_scaling: default_std_scaling(),
            boost_multiplier: default_boost_multiplier(),
            z_rotation_only: default_true(),
            propagate_labels: false,
            side_scroll_factor: default_side_scroll_factor(),
            scroll_rotation_divisor: default_scroll_rotation_divisor(),
            export_precision: default_export_precision(),
        }
    }
}

/// Folder layout for point clouds, labels and camera images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Folder holding per-frame point-cloud files
    #[serde(default = "default_pointcloud_folder")]
    pub pointcloud_folder: String,

    /// Folder label files are read from and written to
    #[serde(default = "default_label_folder")]
    pub label_folder: String,

    /// Filename postfix stripped from a frame stem before deriving the
    /// label filename (e.g. "_oust" for "0001_oust.npy" -> "0001")
    #[serde(default)]
    pub frame_postfix: String,
}

fn default_pointcloud_folder() -> String {
    "pointclouds".to_string()
}

fn default_label_folder() -> String {
    "labels".to_string()
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            pointcloud_folder: default_pointcloud_folder(),
            label_folder: default_label_folder(),
            frame_postfix: String::new(),
        }
    }
}

/// Display settings for the camera images used in projection correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Uniform factor from native pixels to display pixels. Picked 2D
    /// points are detransformed by its inverse before storage.
    #[serde(default = "default_display_scale")]
    pub display_scale: f64,
}

fn default_display_scale() -> f64 {
    0.5
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            display_scale: default_display_scale(),
        }
    }
}

/// One object class with its default box dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassConfig {
    /// Display name of the class
    pub name: String,
    /// Default (length, width, height) for newly drawn boxes
    #[serde(default = "default_dimensions")]
    pub dimensions: (f64, f64, f64),
    /// RGB color for rendering
    #[serde(default = "default_class_color")]
    pub color: [u8; 3],
}

fn default_dimensions() -> (f64, f64, f64) {
    DEFAULT_BBOX_DIMENSIONS
}

fn default_class_color() -> [u8; 3] {
    [255, 85, 0]
}

fn default_classes() -> Vec<ClassConfig> {
    vec![
        ClassConfig {
            name: "cart".to_string(),
            dimensions: (0.8, 0.6, 1.0),
            color: [255, 85, 0],
        },
        ClassConfig {
            name: "person".to_string(),
            dimensions: (0.6, 0.6, 1.8),
            color: [0, 170, 255],
        },
    ]
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            labeling: LabelingConfig::default(),
            files: FileConfig::default(),
            images: ImageConfig::default(),
            classes: default_classes(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "cloudlabel-config.json"
    }

    /// Get the default config file path for auto-load/save.
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("cloudlabel").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home| {
                home.join(".config")
                    .join("cloudlabel")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(&path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Look up a class by name.
    pub fn class(&self, name: &str) -> Option<&ClassConfig> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Default dimensions for a class, falling back for unknown names.
    pub fn class_dimensions(&self, name: &str) -> (f64, f64, f64) {
        self.class(name)
            .map(|c| c.dimensions)
            .unwrap_or(DEFAULT_BBOX_DIMENSIONS)
    }

    /// The first configured class, used for newly drawn boxes before the
    /// user picks one.
    pub fn default_classname(&self) -> String {
        self.classes
            .first()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "object".to_string())
    }

    /// The class `step` entries away from `current`, wrapping both ways.
    pub fn relative_class(&self, current: &str, step: isize) -> Option<String> {
        if self.classes.is_empty() {
            return None;
        }
        let len = self.classes.len() as isize;
        let index = self
            .classes
            .iter()
            .position(|c| c.name == current)
            .unwrap_or(0) as isize;
        let wrapped = (index + step).rem_euclid(len) as usize;
        Some(self.classes[wrapped].name.clone())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::new();
        let json = config.to_json().expect("serialize");
        let loaded = AppConfig::from_json(&json).expect("deserialize");
        assert_eq!(loaded.version, CONFIG_VERSION);
        assert_eq!(loaded.classes.len(), config.classes.len());
        assert_eq!(
            loaded.labeling.side_scroll_factor,
            config.labeling.side_scroll_factor
        );
    }

    #[test]
    fn test_version_too_new_rejected() {
        let json = format!("{{\"version\": {}}}", CONFIG_VERSION + 1);
        assert!(matches!(
            AppConfig::from_json(&json),
            Err(ConfigError::VersionTooNew { .. })
        ));
    }

    #[test]
    fn test_missing_sections_defaulted() {
        let config = AppConfig::from_json("{}").expect("empty object should parse");
        assert_eq!(config.labeling.boost_multiplier, 10.0);
        assert!(!config.classes.is_empty());
    }

    #[test]
    fn test_relative_class_wraps() {
        let config = AppConfig::new();
        let first = config.classes[0].name.clone();
        let last = config.classes.last().unwrap().name.clone();

        assert_eq!(config.relative_class(&first, -1), Some(last.clone()));
        assert_eq!(config.relative_class(&last, 1), Some(first));
    }

    #[test]
    fn test_unknown_class_dimensions_fall_back() {
        let config = AppConfig::new();
        assert_eq!(
            config.class_dimensions("no-such-class"),
            DEFAULT_BBOX_DIMENSIONS
        );
    }
}
