use crate::image_classifier::error::ClassifyError;
use crate::image_classifier::interface::{Classification, RankedResult};
use crate::image_classifier::label_table::LabelTable;
use std::cmp::Ordering;

// IEEE total order, highest first: NaN above every number, 0.0 above -0.0.
// NaN payloads are folded to one positive NaN so they all tie.
fn descending(a: f32, b: f32) -> Ordering {
    fn canonical(x: f32) -> f32 {
        if x.is_nan() {
            f32::NAN.abs()
        } else {
            x
        }
    }

    canonical(b).total_cmp(&canonical(a))
}

/// Top `min(k, N)` labels by descending score. Equal scores keep index order.
pub fn rank(labels: &LabelTable, scores: &[f32], k: usize) -> Result<RankedResult, ClassifyError> {
    if labels.len() != scores.len() {
        return Err(ClassifyError::shape_mismatch(
            "label count vs score count",
            labels.len(),
            scores.len(),
        ));
    }

    let mut pairs: Vec<(&str, f32)> = labels.iter().zip(scores.iter().copied()).collect();

    // sort_by is stable
    pairs.sort_by(|a, b| descending(a.1, b.1));

    Ok(pairs
        .into_iter()
        .take(k)
        .map(|(label, confidence)| Classification {
            label: label.to_string(),
            confidence,
        })
        .collect())
}
