use crate::detector::Detection;
use crate::heights::HeightTable;

/// Focal length of the capturing device class, in pixels (iPhone 12 Pro Max).
pub const DEFAULT_FOCAL_LENGTH_PX: f32 = 800.0;

/// Outcome of distance aggregation. `valid` distinguishes "no usable
/// detections" from a genuine zero-meter reading; `meters` is 0.0 whenever
/// `valid` is false.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceEstimate {
    pub meters: f32,
    pub valid: bool,
}

impl DistanceEstimate {
    pub fn invalid() -> Self {
        Self {
            meters: 0.0,
            valid: false,
        }
    }

    /// Meters rounded to two decimals, for presentation only.
    pub fn rounded_meters(&self) -> f32 {
        (self.meters * 100.0).round() / 100.0
    }
}

/// Estimates camera-to-subject distance from detections of objects with
/// known physical height, via the pinhole approximation:
///
/// ```text
/// distance_m = (focal_length_px * real_height_m) / bounding_box_pixel_height
/// ```
///
/// Per-detection samples are aggregated with an arithmetic mean, so the
/// result does not depend on detection order.
#[derive(Debug, Clone)]
pub struct DistanceEstimator {
    focal_length_px: f32,
    heights: HeightTable,
}

impl DistanceEstimator {
    pub fn new(focal_length_px: f32, heights: HeightTable) -> Self {
        Self {
            focal_length_px,
            heights,
        }
    }

    /// Aggregate one distance estimate over a detection set. Detections with
    /// no modeled height or a non-positive pixel height contribute nothing;
    /// if none survive, the estimate is the invalid sentinel, never an error.
    pub fn estimate(&self, detections: &[Detection]) -> DistanceEstimate {
        let samples: Vec<f32> = detections.iter().filter_map(|d| self.sample(d)).collect();
        if samples.is_empty() {
            return DistanceEstimate::invalid();
        }
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        DistanceEstimate {
            meters: mean,
            valid: true,
        }
    }

    fn sample(&self, detection: &Detection) -> Option<f32> {
        let real_height_m = self.heights.lookup(&detection.label)?;
        let pixel_height = detection.bbox.pixel_height();
        if pixel_height <= 0.0 {
            return None;
        }
        Some(self.focal_length_px * real_height_m / pixel_height)
    }
}
