//! The fixed-size grid label tensor.

use crate::{common::*, config::GridConfig};

/// Number of values stored per cell.
pub const NUM_CHANNELS: usize = 5;
/// Channel of the box origin's x offset within its cell.
pub const OFFSET_X: usize = 0;
/// Channel of the box origin's y offset within its cell.
pub const OFFSET_Y: usize = 1;
pub const WIDTH: usize = 2;
pub const HEIGHT: usize = 3;
pub const CONFIDENCE: usize = 4;

/// An `S × S × 5` label tensor indexed by `[s_x, s_y, channel]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLabel {
    tensor: Array3<f64>,
}

/// The values of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub s_x: usize,
    pub s_y: usize,
    pub offset_x: f64,
    pub offset_y: f64,
    pub w: f64,
    pub h: f64,
    pub confidence: f64,
}

impl GridCell {
    pub fn area(&self) -> f64 {
        self.w * self.h
    }
}

/// The grid label with only occupied cells listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseGridLabel {
    pub grid_size: usize,
    pub cells: Vec<GridCell>,
}

impl GridLabel {
    pub fn zeros(grid_size: usize) -> Self {
        Self {
            tensor: Array3::zeros([grid_size, grid_size, NUM_CHANNELS]),
        }
    }

    pub fn grid_size(&self) -> usize {
        self.tensor.shape()[0]
    }

    pub fn as_array(&self) -> &Array3<f64> {
        &self.tensor
    }

    pub fn into_array(self) -> Array3<f64> {
        self.tensor
    }

    /// Read the cell at `(s_x, s_y)`, or `None` if out of range.
    pub fn cell(&self, s_x: usize, s_y: usize) -> Option<GridCell> {
        let grid_size = self.grid_size();
        (s_x < grid_size && s_y < grid_size).then(|| {
            let values = self.tensor.slice(s![s_x, s_y, ..]);
            Self::cell_from_values(s_x, s_y, values)
        })
    }

    pub fn confidence(&self, s_x: usize, s_y: usize) -> f64 {
        self.tensor[[s_x, s_y, CONFIDENCE]]
    }

    pub fn is_occupied(&self, s_x: usize, s_y: usize) -> bool {
        self.confidence(s_x, s_y) > 0.0
    }

    /// Overwrite a cell. Panics if the index is out of range.
    pub fn set_cell(&mut self, cell: &GridCell) {
        let GridCell {
            s_x,
            s_y,
            offset_x,
            offset_y,
            w,
            h,
            confidence,
        } = *cell;
        let mut values = self.tensor.slice_mut(s![s_x, s_y, ..]);
        values[OFFSET_X] = offset_x;
        values[OFFSET_Y] = offset_y;
        values[WIDTH] = w;
        values[HEIGHT] = h;
        values[CONFIDENCE] = confidence;
    }

    /// Iterate over cells with non-zero confidence in `(s_x, s_y)` order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        let grid_size = self.grid_size();
        (0..grid_size)
            .cartesian_product(0..grid_size)
            .filter(move |&(s_x, s_y)| self.is_occupied(s_x, s_y))
            .filter_map(move |(s_x, s_y)| self.cell(s_x, s_y))
    }

    /// Count occupied cells whose confidence reaches `threshold`.
    pub fn num_objects(&self, threshold: f64) -> usize {
        self.occupied_cells()
            .filter(|cell| cell.confidence >= threshold)
            .count()
    }

    /// Recover the boxes in target image pixels from cells reaching the
    /// configured threshold.
    pub fn decode(&self, config: &GridConfig) -> Result<Vec<Label<XYWH<f64>, String>>> {
        ensure!(
            self.grid_size() == config.grid_size.get(),
            "grid size mismatch: the label has {} cells per side, but the config has {}",
            self.grid_size(),
            config.grid_size
        );
        let [span_x, span_y] = config.cell_span();

        self.occupied_cells()
            .filter(|cell| cell.confidence >= config.confidence_threshold)
            .map(|cell| -> Result<_> {
                let x = cell.s_x as f64 * span_x + cell.offset_x;
                let y = cell.s_y as f64 * span_y + cell.offset_y;
                let rect = XYWH::try_from_xywh([x, y, cell.w, cell.h])?;
                Ok(Label {
                    rect,
                    class: config.target_tag.clone(),
                })
            })
            .try_collect()
    }

    /// Like [decode](Self::decode), but map the boxes back onto the native image size.
    pub fn decode_to_native(
        &self,
        config: &GridConfig,
        native_size: HW<usize>,
    ) -> Result<Vec<Label<XYWH<f64>, String>>> {
        let native_size: HW<f64> = native_size.cast();
        let transform =
            Transform::try_from_sizes_exact(native_size, config.image_size())?.inverse()?;
        let labels = self.decode(config)?;
        Ok(labels.iter().map(|label| &transform * label).collect())
    }

    pub fn to_sparse(&self) -> SparseGridLabel {
        SparseGridLabel {
            grid_size: self.grid_size(),
            cells: self.occupied_cells().collect(),
        }
    }

    fn cell_from_values(s_x: usize, s_y: usize, values: ArrayView1<f64>) -> GridCell {
        GridCell {
            s_x,
            s_y,
            offset_x: values[OFFSET_X],
            offset_y: values[OFFSET_Y],
            w: values[WIDTH],
            h: values[HEIGHT],
            confidence: values[CONFIDENCE],
        }
    }
}

impl TryFrom<&SparseGridLabel> for GridLabel {
    type Error = Error;

    fn try_from(from: &SparseGridLabel) -> Result<Self, Self::Error> {
        let SparseGridLabel {
            grid_size,
            ref cells,
        } = *from;
        ensure!(grid_size > 0, "grid_size must be positive");

        let mut label = GridLabel::zeros(grid_size);
        for cell in cells {
            ensure!(
                cell.s_x < grid_size && cell.s_y < grid_size,
                "cell ({}, {}) is out of the {}x{} grid",
                cell.s_x,
                cell.s_y,
                grid_size,
                grid_size
            );
            ensure!(
                !label.is_occupied(cell.s_x, cell.s_y),
                "cell ({}, {}) is listed twice",
                cell.s_x,
                cell.s_y
            );
            label.set_cell(cell);
        }
        Ok(label)
    }
}
