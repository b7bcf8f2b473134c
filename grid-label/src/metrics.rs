//! Object count metrics over grid labels.

use crate::{common::*, grid::GridLabel};

/// Count the objects in each label at the given confidence threshold.
pub fn count_objects<'a, I>(labels: I, threshold: f64) -> Vec<usize>
where
    I: IntoIterator<Item = &'a GridLabel>,
{
    labels
        .into_iter()
        .map(|label| label.num_objects(threshold))
        .collect()
}

/// Mean of `|target - prediction| / target` over items with a non-zero target.
pub fn relative_count_error(targets: &[usize], predictions: &[f64]) -> Result<f64> {
    ensure!(
        targets.len() == predictions.len(),
        "expect {} predictions, but get {}",
        targets.len(),
        predictions.len()
    );

    let errors: Vec<_> = targets
        .iter()
        .zip(predictions)
        .filter(|(&target, _)| target > 0)
        .map(|(&target, &prediction)| {
            let target = target as f64;
            (target - prediction).abs() / target
        })
        .collect();

    let skipped = targets.len() - errors.len();
    if skipped > 0 {
        debug!("{} items without objects are excluded", skipped);
    }
    ensure!(!errors.is_empty(), "no item has a non-zero object count");

    Ok(errors.iter().sum::<f64>() / errors.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridCell;
    use approx::assert_abs_diff_eq;

    #[test]
    fn count_objects_per_label() {
        let empty = GridLabel::zeros(4);
        let mut one = GridLabel::zeros(4);
        one.set_cell(&GridCell {
            s_x: 1,
            s_y: 2,
            offset_x: 0.0,
            offset_y: 0.0,
            w: 3.0,
            h: 3.0,
            confidence: 1.0,
        });
        assert_eq!(count_objects([&empty, &one], 0.5), [0, 1]);
    }

    #[test]
    fn relative_error() {
        let error = relative_count_error(&[2, 4, 0], &[1.0, 5.0, 3.0]).unwrap();
        assert_abs_diff_eq!(error, (0.5 + 0.25) / 2.0);
    }

    #[test]
    fn relative_error_rejects_bad_input() {
        assert!(relative_count_error(&[1, 2], &[1.0]).is_err());
        assert!(relative_count_error(&[0, 0], &[1.0, 2.0]).is_err());
    }
}
