//! Grid label encoding for YOLO-style person detectors.
//!
//! Bounding box annotations are rescaled onto a fixed target image size and
//! assigned to the cell of an `S × S` grid that contains the box origin. Each
//! cell stores `[offset_x, offset_y, width, height, confidence]`.

pub mod common;
pub mod config;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod grid;
pub mod metrics;

#[cfg(test)]
mod test_utils;

pub use config::{CollisionPolicy, Config, DatasetConfig, GridConfig};
pub use dataset::{Dataset, ImageDir, ImageSizeLookup};
pub use encoder::{EncodeReport, GridEncoder};
pub use error::EncodeError;
pub use grid::{GridCell, GridLabel, SparseGridLabel};
