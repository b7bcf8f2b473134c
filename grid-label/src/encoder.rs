//! Encode bounding box annotations onto the label grid.

use crate::{
    common::*,
    config::{CollisionPolicy, GridConfig},
    dataset::ImageSizeLookup,
    error::EncodeError,
    grid::{GridCell, GridLabel},
};

/// Counters collected while encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeReport {
    /// Number of images encoded.
    pub images: usize,
    /// Boxes written to a cell, including those later replaced.
    pub encoded: usize,
    /// Boxes with a tag other than the target tag.
    pub skipped_tag: usize,
    /// Target boxes marked as ignored.
    pub skipped_ignored: usize,
    /// Boxes with a negative width or height.
    pub invalid: usize,
    /// Boxes whose origin falls outside the target image.
    pub out_of_frame: usize,
    /// Boxes that landed in an occupied cell.
    pub collisions: usize,
}

impl AddAssign for EncodeReport {
    fn add_assign(&mut self, rhs: Self) {
        self.images += rhs.images;
        self.encoded += rhs.encoded;
        self.skipped_tag += rhs.skipped_tag;
        self.skipped_ignored += rhs.skipped_ignored;
        self.invalid += rhs.invalid;
        self.out_of_frame += rhs.out_of_frame;
        self.collisions += rhs.collisions;
    }
}

/// Maps annotation records onto `S × S × 5` grid labels.
#[derive(Debug, Clone)]
pub struct GridEncoder {
    config: GridConfig,
}

impl GridEncoder {
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Encode one record given the native size of its image.
    pub fn encode(&self, record: &AnnotationRecord, native_size: HW<usize>) -> Result<GridLabel> {
        let (label, _) = self.encode_with_report(record, native_size)?;
        Ok(label)
    }

    pub fn encode_with_report(
        &self,
        record: &AnnotationRecord,
        native_size: HW<usize>,
    ) -> Result<(GridLabel, EncodeReport)> {
        let GridConfig {
            grid_size,
            collision,
            ref target_tag,
            ..
        } = self.config;
        let grid_size = grid_size.get();

        if native_size.is_degenerate() {
            return Err(EncodeError::InvalidImageSize {
                id: record.id.clone(),
                width: native_size.w(),
                height: native_size.h(),
            }
            .into());
        }
        let native_size: HW<f64> = native_size.cast();
        let target_size = self.config.image_size();
        let transform = Transform::try_from_sizes_exact(native_size, target_size)?;
        let [span_x, span_y] = self.config.cell_span();

        let mut label = GridLabel::zeros(grid_size);
        let mut report = EncodeReport {
            images: 1,
            ..Default::default()
        };

        for gtbox in &record.gtboxes {
            if gtbox.tag != *target_tag {
                report.skipped_tag += 1;
                continue;
            }
            if gtbox.is_ignored() {
                report.skipped_ignored += 1;
                continue;
            }

            let orig = match gtbox.to_label() {
                Ok(orig) => orig,
                Err(_) => {
                    warn!(
                        "ignore invalid box {:?} in image '{}'",
                        gtbox.vbox, record.id
                    );
                    report.invalid += 1;
                    continue;
                }
            };

            // rescale to the target size and snap to whole pixels
            let rect = (&transform * &orig).rect.round_ties_even();
            let [x, y, w, h] = rect.xywh();

            if !(0.0..target_size.w()).contains(&x) || !(0.0..target_size.h()).contains(&y) {
                warn!(
                    "box origin ({}, {}) of image '{}' falls outside the {}x{} frame",
                    x,
                    y,
                    record.id,
                    target_size.w(),
                    target_size.h()
                );
                report.out_of_frame += 1;
                continue;
            }

            let (s_x, offset_x) = locate(x, span_x, grid_size);
            let (s_y, offset_y) = locate(y, span_y, grid_size);
            let cell = GridCell {
                s_x,
                s_y,
                offset_x,
                offset_y,
                w,
                h,
                confidence: 1.0,
            };

            if label.is_occupied(s_x, s_y) {
                report.collisions += 1;
                debug!(
                    "cell ({}, {}) of image '{}' is already occupied, resolved by {:?}",
                    s_x, s_y, record.id, collision
                );

                let replace = match collision {
                    CollisionPolicy::KeepLast => true,
                    CollisionPolicy::KeepFirst => false,
                    CollisionPolicy::KeepLarger => label
                        .cell(s_x, s_y)
                        .map(|prev| cell.area() > prev.area())
                        .unwrap_or(true),
                };
                if !replace {
                    continue;
                }
            }

            label.set_cell(&cell);
            report.encoded += 1;
        }

        Ok((label, report))
    }

    /// Encode a batch of records, preserving their order.
    pub fn encode_all<L>(
        &self,
        records: &[AnnotationRecord],
        lookup: &L,
    ) -> Result<IndexMap<String, GridLabel>>
    where
        L: ImageSizeLookup + ?Sized,
    {
        let (labels, _) = self.encode_all_with_report(records, lookup)?;
        Ok(labels)
    }

    pub fn encode_all_with_report<L>(
        &self,
        records: &[AnnotationRecord],
        lookup: &L,
    ) -> Result<(IndexMap<String, GridLabel>, EncodeReport)>
    where
        L: ImageSizeLookup + ?Sized,
    {
        let mut total = EncodeReport::default();
        let mut labels = IndexMap::with_capacity(records.len());

        for record in records {
            let native_size =
                lookup
                    .image_size(&record.id)
                    .ok_or_else(|| EncodeError::MissingImageMetadata {
                        id: record.id.clone(),
                    })?;
            let (label, report) = self.encode_with_report(record, native_size)?;
            total += report;

            if labels.insert(record.id.clone(), label).is_some() {
                warn!(
                    "duplicated record '{}', the later one takes effect",
                    record.id
                );
            }
        }

        Ok((labels, total))
    }
}

/// Split a non-negative coordinate into the cell index and the offset within
/// the cell. The offset lies in `[0, span)`.
fn locate(coord: f64, span: f64, grid_size: usize) -> (usize, f64) {
    let offset = coord % span;
    let index = ((coord - offset) / span).round() as usize;
    debug_assert!(index < grid_size);
    (index.min(grid_size - 1), offset)
}
