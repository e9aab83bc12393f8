pub mod grpc;
pub mod preprocess;
pub mod model;
pub mod cli;
pub mod mapping;
pub mod postprocess;
pub mod heights;
pub mod distance;
pub mod classifier;
pub mod detector;
pub mod service;
pub mod helpers;

pub use crate::model::OnnxModel;
pub use crate::grpc::{PredictRequest, PredictResponse};
pub use crate::preprocess::{Processor, PreprocessConfig};
pub use crate::cli::Args;
pub use crate::mapping::{
    default_detector_classes, default_landmark_labels, load_class_mapping, load_labels,
};
pub use crate::heights::HeightTable;
pub use crate::distance::{DistanceEstimate, DistanceEstimator, DEFAULT_FOCAL_LENGTH_PX};
pub use crate::classifier::{Classification, Classifier, OnnxClassifier};
pub use crate::detector::{BoundingBox, Detection, Detector, OnnxDetector};
pub use crate::service::{LandmarkGrpcService, LandmarkPredictionService, Prediction};
