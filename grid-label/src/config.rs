//! Grid encoding and dataset configuration format.

use crate::common::*;

/// The main configuration of the grid tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    pub dataset: DatasetConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config: Self = json5::from_str(&text)?;
        config.grid.validate()?;
        Ok(config)
    }
}

/// Grid encoding options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// The width of the resized input image in pixels.
    pub image_width: NonZeroUsize,
    /// The height of the resized input image in pixels.
    pub image_height: NonZeroUsize,
    /// The number of grid cells per side.
    pub grid_size: NonZeroUsize,
    /// Cells with confidence at or above this value count as detections.
    pub confidence_threshold: f64,
    /// What to do when two boxes land in the same cell.
    pub collision: CollisionPolicy,
    /// Only boxes with this tag are encoded.
    pub target_tag: String,
}

impl GridConfig {
    pub fn validate(&self) -> Result<()> {
        let grid_size = self.grid_size.get();
        ensure!(
            (0.0..=1.0).contains(&self.confidence_threshold),
            "confidence_threshold must be within [0, 1], but get {}",
            self.confidence_threshold
        );
        ensure!(
            grid_size <= self.image_width.get() && grid_size <= self.image_height.get(),
            "grid_size ({}) must not exceed the image size {}x{}",
            grid_size,
            self.image_width,
            self.image_height
        );
        ensure!(!self.target_tag.is_empty(), "target_tag must not be empty");
        Ok(())
    }

    /// The target image size in pixels.
    pub fn image_size(&self) -> HW<f64> {
        HW::from_hw([self.image_height.get() as f64, self.image_width.get() as f64])
    }

    /// The pixel span of one cell in `[x, y]` order.
    pub fn cell_span(&self) -> [f64; 2] {
        let grid_size = self.grid_size.get() as f64;
        [
            self.image_width.get() as f64 / grid_size,
            self.image_height.get() as f64 / grid_size,
        ]
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            image_width: NonZeroUsize::new(448).unwrap(),
            image_height: NonZeroUsize::new(448).unwrap(),
            grid_size: NonZeroUsize::new(30).unwrap(),
            confidence_threshold: 0.5,
            collision: CollisionPolicy::default(),
            target_tag: "person".into(),
        }
    }
}

/// Resolution of two boxes mapped to the same grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// The later box overwrites the earlier one.
    KeepLast,
    /// The earlier box stays.
    KeepFirst,
    /// The box with the larger area stays. Ties keep the earlier box.
    KeepLarger,
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        Self::KeepLast
    }
}

/// Dataset location options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The directory containing `{ID}.{ext}` image files.
    pub image_dir: PathBuf,
    /// The `.odgt` annotation file.
    pub annotation_file: PathBuf,
    /// Image file extensions, tried in order.
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

pub(crate) fn default_image_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png"].iter().map(|ext| ext.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_grid_config() {
        let config = GridConfig::default();
        config.validate().unwrap();
        let [span_x, span_y] = config.cell_span();
        assert_abs_diff_eq!(span_x, 448.0 / 30.0);
        assert_abs_diff_eq!(span_y, 448.0 / 30.0);
        assert_eq!(config.collision, CollisionPolicy::KeepLast);
    }

    #[test]
    fn reject_bad_threshold() {
        let config = GridConfig {
            confidence_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_grid_larger_than_image() {
        let config = GridConfig {
            image_height: NonZeroUsize::new(16).unwrap(),
            grid_size: NonZeroUsize::new(17).unwrap(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_json5_config() {
        let text = r#"{
            // partial grid options fall back to defaults
            grid: { grid_size: 7, collision: "KeepLarger" },
            dataset: {
                image_dir: "data/Images",
                annotation_file: "data/annotation_train.odgt",
            },
        }"#;
        let config: Config = json5::from_str(text).unwrap();
        assert_eq!(config.grid.grid_size.get(), 7);
        assert_eq!(config.grid.image_width.get(), 448);
        assert_eq!(config.grid.collision, CollisionPolicy::KeepLarger);
        assert_eq!(config.dataset.image_extensions, ["jpg", "jpeg", "png"]);
    }
}
