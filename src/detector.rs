use anyhow::{ensure, Result};
use image::DynamicImage;
use ndarray::CowArray;

use crate::postprocess::{decode_detections, non_maximum_suppression, RawDetection};
use crate::preprocess::Processor;
use std::collections::HashMap;

/// Axis-aligned box in original-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn pixel_width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn pixel_height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// A box with non-positive width or height carries no usable geometry.
    pub fn is_degenerate(&self) -> bool {
        self.x_max <= self.x_min || self.y_max <= self.y_min
    }
}

/// One detected object: a category label paired with the bounding box it was
/// read from. Label and box always come from the same detection index.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub label: String,
    pub bbox: BoundingBox,
    pub confidence: f32,
}

/// Pluggable object-detection backend.
///
/// The returned set is unordered and may be empty. Implementations normalize
/// whatever the underlying model reports into typed detections in
/// original-image pixel coordinates; degenerate boxes must not be returned.
pub trait Detector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>>;
}

/// Map a normalized center-format box from the padded model frame back to
/// original-image corner coordinates.
pub fn map_to_original(
    bbox_cxcywh: [f32; 4],
    input_width: u32,
    input_height: u32,
    offset: (u32, u32),
    scale: f32,
) -> BoundingBox {
    // Denormalize to padded-frame pixels.
    let x_pad = bbox_cxcywh[0] * input_width as f32;
    let y_pad = bbox_cxcywh[1] * input_height as f32;
    let w_pad = bbox_cxcywh[2] * input_width as f32;
    let h_pad = bbox_cxcywh[3] * input_height as f32;

    // Remove the padding offset, then undo the resize scale.
    let x_center = (x_pad - offset.0 as f32) / scale;
    let y_center = (y_pad - offset.1 as f32) / scale;
    let width = w_pad / scale;
    let height = h_pad / scale;

    BoundingBox {
        x_min: x_center - width / 2.0,
        y_min: y_center - height / 2.0,
        x_max: x_center + width / 2.0,
        y_max: y_center + height / 2.0,
    }
}

/// Detection backend over an ONNX session. Adapts the model's native output
/// (per-query class logits plus normalized center-format boxes) into typed
/// detections, applying confidence filtering and per-category NMS.
pub struct OnnxDetector {
    session: ort::session::Session,
    processor: Processor,
    classes: HashMap<usize, String>,
    confidence_threshold: f32,
    iou_threshold: f32,
}

impl OnnxDetector {
    pub fn new(
        session: ort::session::Session,
        processor: Processor,
        classes: HashMap<usize, String>,
        confidence_threshold: f32,
        iou_threshold: f32,
    ) -> Self {
        Self {
            session,
            processor,
            classes,
            confidence_threshold,
            iou_threshold,
        }
    }

    fn category_label(&self, raw: &RawDetection) -> String {
        // Unmapped ids fall back to the numeric id; the height table decides
        // downstream whether the category is usable.
        self.classes
            .get(&raw.class_id)
            .cloned()
            .unwrap_or_else(|| raw.class_id.to_string())
    }
}

impl Detector for OnnxDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let (orig_width, orig_height) = (image.width(), image.height());
        let (xs, offsets) = self.processor.preprocess(std::slice::from_ref(image))?;
        let xs = CowArray::from(xs);
        let input_data = ort::inputs![xs.view()]?;
        let ys = self.session.run(input_data)?;

        let outputs = ys
            .iter()
            .map(|(_k, v)| Ok(v.try_extract_tensor::<f32>()?.into_owned()))
            .collect::<Result<Vec<_>>>()?;
        ensure!(
            outputs.len() >= 2,
            "detector returned {} outputs, expected boxes and class logits",
            outputs.len()
        );
        let boxes = &outputs[0];
        let logits = &outputs[1];

        let raw = decode_detections(logits, boxes, self.confidence_threshold)?;

        let scale = self.processor.scale_for(orig_width, orig_height);
        let input_width = self.processor.config.width as u32;
        let input_height = self.processor.config.height as u32;
        let mut detections = Vec::new();
        for r in raw {
            let bbox = map_to_original(r.bbox_cxcywh, input_width, input_height, offsets[0], scale);
            if bbox.is_degenerate() {
                continue;
            }
            detections.push(Detection {
                label: self.category_label(&r),
                bbox,
                confidence: r.confidence,
            });
        }

        Ok(non_maximum_suppression(detections, self.iou_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_box_has_no_usable_geometry() {
        let flat = BoundingBox {
            x_min: 10.0,
            y_min: 50.0,
            x_max: 30.0,
            y_max: 50.0,
        };
        assert!(flat.is_degenerate());
        assert!(flat.pixel_height() <= 0.0);

        let inverted = BoundingBox {
            x_min: 10.0,
            y_min: 60.0,
            x_max: 30.0,
            y_max: 40.0,
        };
        assert!(inverted.is_degenerate());
    }

    #[test]
    fn map_to_original_undoes_letterbox_geometry() {
        // A 1280x640 image letterboxed into 640x640: scale 0.5, offset (0, 160).
        // A centered box spanning the middle of the padded frame...
        let bbox = map_to_original([0.5, 0.5, 0.25, 0.25], 640, 640, (0, 160), 0.5);

        // ...lands centered in the original frame at doubled size.
        assert!((bbox.x_min - 480.0).abs() < 1e-3);
        assert!((bbox.x_max - 800.0).abs() < 1e-3);
        assert!((bbox.y_min - 160.0).abs() < 1e-3);
        assert!((bbox.y_max - 480.0).abs() < 1e-3);
        assert!((bbox.pixel_height() - 320.0).abs() < 1e-3);
    }
}
