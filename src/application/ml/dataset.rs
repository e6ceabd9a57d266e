use crate::domain::scoring::{FeatureRow, LabeledDataset, LabeledRow};

/// Forward-looking label for position `i`: 1 when the close `horizon` rows
/// later exceeds `close[i] * (1 + threshold)`, otherwise 0.
///
/// `None` when there is no row `horizon` positions ahead or the current close
/// is not positive.
pub fn forward_label(
    rows: &[FeatureRow],
    i: usize,
    horizon: usize,
    threshold: f64,
) -> Option<u32> {
    let current = rows.get(i)?.close;
    let future = rows.get(i.checked_add(horizon)?)?.close;
    if current <= 0.0 {
        return None;
    }
    let ratio = future / current;
    if !ratio.is_finite() {
        return None;
    }
    Some(u32::from(ratio > 1.0 + threshold))
}

/// Pair every complete feature row with its forward label.
///
/// Rows are kept in time order. The trailing `horizon` rows have no known
/// future and never enter the dataset.
pub fn build_labeled_dataset(
    rows: &[FeatureRow],
    horizon: usize,
    threshold: f64,
) -> LabeledDataset {
    let labeled = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let features = row.to_vector()?;
            let label = forward_label(rows, i, horizon, threshold)?;
            Some(LabeledRow {
                date: row.date,
                features,
                label,
            })
        })
        .collect();

    LabeledDataset::new(labeled)
}
