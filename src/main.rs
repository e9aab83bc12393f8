use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tonic::transport::Server;

use campus_navigator::grpc::landmark_predictor_server::LandmarkPredictorServer;
use campus_navigator::{
    default_detector_classes, default_landmark_labels, load_class_mapping, load_labels,
    Args, Classifier, Detector, DistanceEstimator, HeightTable, LandmarkGrpcService,
    LandmarkPredictionService, OnnxClassifier, OnnxDetector, OnnxModel, PreprocessConfig,
    Processor,
};

const CLASSIFIER_INPUT_SIZE: usize = 224;
const DETECTOR_INPUT_SIZE: usize = 640;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let landmark_labels = match &args.landmark_labels {
        Some(path) => load_labels(path)?,
        None => default_landmark_labels(),
    };
    let detector_classes = match &args.detector_labels {
        Some(path) => load_class_mapping(path)?,
        None => default_detector_classes(),
    };
    let heights = match &args.heights {
        Some(path) => HeightTable::from_file(path)?,
        None => HeightTable::default(),
    };

    let loader = OnnxModel::new(args.cuda);
    let t = std::time::Instant::now();
    let classifier: Arc<dyn Classifier> = Arc::new(OnnxClassifier::new(
        loader.load_model(&args.classifier_model)?,
        Processor::new(PreprocessConfig::classifier(CLASSIFIER_INPUT_SIZE)),
        landmark_labels,
    ));
    let detector: Arc<dyn Detector> = Arc::new(OnnxDetector::new(
        loader.load_model(&args.detector_model)?,
        Processor::new(PreprocessConfig::detector(DETECTOR_INPUT_SIZE)),
        detector_classes,
        args.confidence,
        args.iou,
    ));
    if args.profile {
        println!("[model load]: {:?}", t.elapsed());
    }

    let estimator = DistanceEstimator::new(args.focal_length, heights);
    let service = Arc::new(LandmarkPredictionService::new(
        classifier,
        detector.clone(),
        estimator,
    ));

    if let Some(source) = &args.source {
        return predict_once(&service, detector.as_ref(), &args, source);
    }

    let addr = args.addr.parse().context("invalid bind address")?;
    let grpc_service = LandmarkGrpcService::new(service, Duration::from_millis(args.timeout_ms));
    println!("LandmarkPredictor server listening on {}", addr);

    Server::builder()
        .add_service(LandmarkPredictorServer::new(grpc_service))
        .serve(addr)
        .await?;

    Ok(())
}

/// One-shot CLI mode: predict a single image, print the result, optionally
/// write an annotated copy.
fn predict_once(
    service: &LandmarkPredictionService,
    detector: &dyn Detector,
    args: &Args,
    source: &str,
) -> Result<()> {
    let image = image::open(source).with_context(|| format!("failed to open image {}", source))?;

    let t = std::time::Instant::now();
    let prediction = service.predict(&image)?;
    if args.profile {
        println!("[predict]: {:?}", t.elapsed());
    }

    println!("Landmark: {}", prediction.landmark);
    if prediction.distance.valid {
        println!("Estimated distance: {:.2} m", prediction.distance.meters);
    } else {
        println!("No valid detections for distance estimation.");
    }

    if let Some(output) = &args.output {
        let detections = detector.detect(&image)?;
        println!("Detections:");
        for detection in &detections {
            println!(
                "Class: {}, Height: {:.0}px, Confidence: {:.2}%",
                detection.label,
                detection.bbox.pixel_height(),
                detection.confidence * 100.0
            );
        }
        campus_navigator::helpers::draw_detections(&image, &detections, output)?;
        println!("Annotated image written to {}", output);
    }

    Ok(())
}
