use anyhow::Result;
use ndarray::{Array, Array1, Array3, Axis};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::HashMap;

use crate::detector::Detection;

/// Applies softmax to a 1D array and returns a new Array1<f32>.
pub fn softmax(slice: &Array1<f32>) -> Array1<f32> {
    let max_val = slice.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp_vals: Array1<f32> = slice.mapv(|x| (x - max_val).exp());
    let sum_exp: f32 = exp_vals.sum();
    exp_vals.mapv(|v| v / sum_exp)
}

/// Index and value of the largest score. Ties resolve to the first index.
pub fn argmax(scores: &Array1<f32>) -> (usize, f32) {
    scores
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(max_idx, max_val), (i, &val)| {
            if val > max_val { (i, val) } else { (max_idx, max_val) }
        })
}

/// One detection as the model reports it: class id, confidence, and a
/// center-format box (cx, cy, w, h) normalized to the model input frame.
#[derive(Debug, Clone)]
pub struct RawDetection {
    pub class_id: usize,
    pub confidence: f32,
    pub bbox_cxcywh: [f32; 4],
}

/// Turn the model's per-query class logits and boxes into raw detections,
/// keeping only queries whose best class clears the confidence threshold.
/// Logits are expected as (1, num_queries, num_classes), boxes as
/// (1, num_queries, 4); the label and box of each detection are read from
/// the same query index.
pub fn decode_detections(
    logits_dyn: &Array<f32, ndarray::IxDyn>,
    boxes_dyn: &Array<f32, ndarray::IxDyn>,
    threshold: f32,
) -> Result<Vec<RawDetection>> {
    let logits_fixed: Array3<f32> = logits_dyn
        .view()
        .into_dimensionality::<ndarray::Ix3>()?
        .to_owned();
    let boxes_fixed: Array3<f32> = boxes_dyn
        .view()
        .into_dimensionality::<ndarray::Ix3>()?
        .to_owned();

    let logits_2d = logits_fixed.index_axis(Axis(0), 0);
    let boxes_2d = boxes_fixed.index_axis(Axis(0), 0);

    let mut detections = Vec::new();
    for (logit_row, box_row) in logits_2d.axis_iter(Axis(0)).zip(boxes_2d.axis_iter(Axis(0))) {
        let softmaxed = softmax(&logit_row.to_owned());
        let (class_id, confidence) = argmax(&softmaxed);
        if confidence >= threshold {
            detections.push(RawDetection {
                class_id,
                confidence,
                bbox_cxcywh: [box_row[0], box_row[1], box_row[2], box_row[3]],
            });
        }
    }
    Ok(detections)
}

/// Intersection over Union of two corner-format boxes.
pub fn compute_iou(b1: &Detection, b2: &Detection) -> f32 {
    let inter_x1 = b1.bbox.x_min.max(b2.bbox.x_min);
    let inter_y1 = b1.bbox.y_min.max(b2.bbox.y_min);
    let inter_x2 = b1.bbox.x_max.min(b2.bbox.x_max);
    let inter_y2 = b1.bbox.y_max.min(b2.bbox.y_max);

    let inter_area = (inter_x2 - inter_x1).max(0.0) * (inter_y2 - inter_y1).max(0.0);
    let area1 = b1.bbox.pixel_width().max(0.0) * b1.bbox.pixel_height().max(0.0);
    let area2 = b2.bbox.pixel_width().max(0.0) * b2.bbox.pixel_height().max(0.0);
    let union_area = area1 + area2 - inter_area;
    if union_area <= 0.0 { 0.0 } else { inter_area / union_area }
}

/// Per-category non-maximum suppression. Boxes of different categories never
/// suppress each other. Survivors come back in their input order, so the
/// result is deterministic for identical input.
pub fn non_maximum_suppression(detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    let mut by_category: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, detection) in detections.iter().enumerate() {
        by_category.entry(detection.label.as_str()).or_default().push(i);
    }

    let mut keep_indices: Vec<usize> = Vec::new();
    for (_category, indices) in by_category.iter_mut() {
        indices.sort_by_key(|&i| Reverse(OrderedFloat(detections[i].confidence)));

        let mut suppressed = vec![false; indices.len()];
        for i in 0..indices.len() {
            if suppressed[i] {
                continue;
            }
            let idx_i = indices[i];
            keep_indices.push(idx_i);
            for j in (i + 1)..indices.len() {
                if suppressed[j] {
                    continue;
                }
                let idx_j = indices[j];
                if compute_iou(&detections[idx_i], &detections[idx_j]) > iou_threshold {
                    suppressed[j] = true;
                }
            }
        }
    }

    keep_indices.sort_unstable();
    keep_indices.into_iter().map(|i| detections[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::BoundingBox;
    use ndarray::array;

    fn detection(label: &str, bbox: [f32; 4], confidence: f32) -> Detection {
        Detection {
            label: label.to_string(),
            bbox: BoundingBox {
                x_min: bbox[0],
                y_min: bbox[1],
                x_max: bbox[2],
                y_max: bbox[3],
            },
            confidence,
        }
    }

    #[test]
    fn softmax_sums_to_one_and_preserves_argmax() {
        let scores = array![1.0_f32, 2.0, 3.0];
        let softmaxed = softmax(&scores);
        let sum: f32 = softmaxed.sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert_eq!(argmax(&softmaxed).0, 2);
    }

    #[test]
    fn argmax_tie_resolves_to_first_index() {
        let scores = array![0.4_f32, 0.4, 0.2];
        assert_eq!(argmax(&scores).0, 0);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = detection("120", [0.0, 0.0, 10.0, 10.0], 0.9);
        let b = detection("120", [20.0, 20.0, 30.0, 30.0], 0.9);
        assert_eq!(compute_iou(&a, &b), 0.0);
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = detection("120", [5.0, 5.0, 15.0, 25.0], 0.9);
        assert!((compute_iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn nms_suppresses_overlapping_same_category_box() {
        let detections = vec![
            detection("120", [0.0, 0.0, 10.0, 10.0], 0.9),
            detection("120", [1.0, 1.0, 11.0, 11.0], 0.6),
        ];
        let kept = non_maximum_suppression(detections, 0.5);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn nms_keeps_overlapping_boxes_of_different_categories() {
        let detections = vec![
            detection("120", [0.0, 0.0, 10.0, 10.0], 0.9),
            detection("220", [1.0, 1.0, 11.0, 11.0], 0.6),
        ];
        let kept = non_maximum_suppression(detections, 0.5);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn decode_keeps_label_and_box_from_the_same_query() -> Result<()> {
        // Two queries: the first confidently class 1, the second filtered out.
        let logits = array![[[0.0_f32, 8.0, 0.0], [1.0, 1.0, 1.0]]].into_dyn();
        let boxes = array![[[0.5_f32, 0.5, 0.2, 0.4], [0.1, 0.1, 0.1, 0.1]]].into_dyn();

        let raw = decode_detections(&logits, &boxes, 0.5)?;
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].class_id, 1);
        assert_eq!(raw[0].bbox_cxcywh, [0.5, 0.5, 0.2, 0.4]);
        Ok(())
    }
}
