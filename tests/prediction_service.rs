//! Integration tests for the landmark prediction pipeline.
//!
//! Tests cover:
//! - Combining the classifier label with the aggregated distance estimate
//! - Degraded (no-valid-detection) results staying non-fatal
//! - Collaborator failures being request-scoped
//! - Idempotence of repeated predictions
//!
//! Collaborators are replaced with canned trait implementations so the
//! orchestration and aggregation logic runs without model artifacts.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, Result};
use image::DynamicImage;

use campus_navigator::{
    BoundingBox, Classification, Classifier, Detection, Detector, DistanceEstimator, HeightTable,
    LandmarkPredictionService,
};

fn test_image() -> DynamicImage {
    DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        64,
        48,
        image::Rgb([128, 128, 128]),
    ))
}

fn detection(label: &str, pixel_height: f32) -> Detection {
    Detection {
        label: label.to_string(),
        bbox: BoundingBox {
            x_min: 10.0,
            y_min: 20.0,
            x_max: 60.0,
            y_max: 20.0 + pixel_height,
        },
        confidence: 0.9,
    }
}

struct FixedClassifier {
    label: String,
}

impl Classifier for FixedClassifier {
    fn classify(&self, _image: &DynamicImage) -> Result<Classification> {
        Ok(Classification {
            label: self.label.clone(),
            scores: vec![1.0],
        })
    }
}

struct CannedDetector {
    detections: Vec<Detection>,
}

impl Detector for CannedDetector {
    fn detect(&self, _image: &DynamicImage) -> Result<Vec<Detection>> {
        Ok(self.detections.clone())
    }
}

/// Fails the first call, succeeds afterwards.
struct FlakyClassifier {
    calls: AtomicUsize,
    label: String,
}

impl Classifier for FlakyClassifier {
    fn classify(&self, _image: &DynamicImage) -> Result<Classification> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(anyhow!("classifier backend unavailable"));
        }
        Ok(Classification {
            label: self.label.clone(),
            scores: vec![1.0],
        })
    }
}

struct FailingDetector;

impl Detector for FailingDetector {
    fn detect(&self, _image: &DynamicImage) -> Result<Vec<Detection>> {
        Err(anyhow!("detector backend unavailable"))
    }
}

fn service_with(
    classifier: Arc<dyn Classifier>,
    detector: Arc<dyn Detector>,
    estimator: DistanceEstimator,
) -> LandmarkPredictionService {
    LandmarkPredictionService::new(classifier, detector, estimator)
}

fn default_estimator() -> DistanceEstimator {
    DistanceEstimator::new(800.0, HeightTable::default())
}

#[test]
fn predict_combines_label_and_mean_distance() -> Result<()> {
    // 1. Two modeled detections: 9.6m and 10.4m samples
    let heights = HeightTable::from_entries([
        ("120".to_string(), 1.2),
        ("130".to_string(), 1.3),
    ])?;
    let service = service_with(
        Arc::new(FixedClassifier {
            label: "Block C".to_string(),
        }),
        Arc::new(CannedDetector {
            detections: vec![detection("120", 100.0), detection("130", 100.0)],
        }),
        DistanceEstimator::new(800.0, heights),
    );

    // 2. Predict and verify both halves of the result
    let prediction = service.predict(&test_image())?;
    assert_eq!(prediction.landmark, "Block C");
    assert!(prediction.distance.valid);
    assert!((prediction.distance.meters - 10.0).abs() < 1e-5);
    assert_eq!(prediction.distance.rounded_meters(), 10.0);

    Ok(())
}

#[test]
fn empty_detection_set_degrades_without_failing() -> Result<()> {
    let service = service_with(
        Arc::new(FixedClassifier {
            label: "Block A".to_string(),
        }),
        Arc::new(CannedDetector { detections: vec![] }),
        default_estimator(),
    );

    let prediction = service.predict(&test_image())?;
    assert_eq!(prediction.landmark, "Block A");
    assert!(!prediction.distance.valid);
    assert_eq!(prediction.distance.meters, 0.0);

    Ok(())
}

#[test]
fn unmodeled_categories_do_not_alter_the_aggregate() -> Result<()> {
    let with_unknown = service_with(
        Arc::new(FixedClassifier {
            label: "Block B".to_string(),
        }),
        Arc::new(CannedDetector {
            detections: vec![detection("120", 100.0), detection("lamppost", 40.0)],
        }),
        default_estimator(),
    );
    let without_unknown = service_with(
        Arc::new(FixedClassifier {
            label: "Block B".to_string(),
        }),
        Arc::new(CannedDetector {
            detections: vec![detection("120", 100.0)],
        }),
        default_estimator(),
    );

    let a = with_unknown.predict(&test_image())?;
    let b = without_unknown.predict(&test_image())?;
    assert_eq!(a, b);

    Ok(())
}

#[test]
fn classifier_failure_is_request_scoped() -> Result<()> {
    // 1. First request fails at the classifier boundary
    let service = service_with(
        Arc::new(FlakyClassifier {
            calls: AtomicUsize::new(0),
            label: "IEEE office".to_string(),
        }),
        Arc::new(CannedDetector {
            detections: vec![detection("120", 100.0)],
        }),
        default_estimator(),
    );
    assert!(service.predict(&test_image()).is_err());

    // 2. The same service instance serves the next request normally
    let prediction = service.predict(&test_image())?;
    assert_eq!(prediction.landmark, "IEEE office");
    assert!(prediction.distance.valid);
    assert!((prediction.distance.meters - 9.6).abs() < 1e-5);

    Ok(())
}

#[test]
fn detector_failure_propagates() {
    let service = service_with(
        Arc::new(FixedClassifier {
            label: "Block D".to_string(),
        }),
        Arc::new(FailingDetector),
        default_estimator(),
    );

    assert!(service.predict(&test_image()).is_err());
}

#[test]
fn repeated_prediction_is_bit_identical() -> Result<()> {
    let service = service_with(
        Arc::new(FixedClassifier {
            label: "Block F".to_string(),
        }),
        Arc::new(CannedDetector {
            detections: vec![
                detection("120", 97.0),
                detection("650", 333.0),
                detection("80", 41.0),
            ],
        }),
        default_estimator(),
    );

    let first = service.predict(&test_image())?;
    let second = service.predict(&test_image())?;
    assert_eq!(first.landmark, second.landmark);
    assert_eq!(
        first.distance.meters.to_bits(),
        second.distance.meters.to_bits()
    );
    assert_eq!(first.distance.valid, second.distance.valid);

    Ok(())
}
