use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use image::DynamicImage;
use tonic::{Request, Response, Status};

use crate::classifier::Classifier;
use crate::detector::Detector;
use crate::distance::{DistanceEstimate, DistanceEstimator};
use crate::grpc::landmark_predictor_server::LandmarkPredictor;
use crate::grpc::{PredictRequest, PredictResponse};

/// Combined result of one prediction: the classified building and the
/// aggregated distance estimate for the same image.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub landmark: String,
    pub distance: DistanceEstimate,
}

/// Composition root of the pipeline. Collaborators are injected once at
/// startup and shared read-only across requests; each `predict` call owns
/// all of its intermediate state, so calls are independent and stateless.
pub struct LandmarkPredictionService {
    classifier: Arc<dyn Classifier>,
    detector: Arc<dyn Detector>,
    estimator: DistanceEstimator,
}

impl LandmarkPredictionService {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        detector: Arc<dyn Detector>,
        estimator: DistanceEstimator,
    ) -> Self {
        Self {
            classifier,
            detector,
            estimator,
        }
    }

    /// Run the full pipeline over one decoded image. Classification and
    /// detection are independent reads of the same image; a failure in either
    /// collaborator fails this request and only this request.
    pub fn predict(&self, image: &DynamicImage) -> Result<Prediction> {
        let classification = self.classifier.classify(image)?;
        let detections = self.detector.detect(image)?;
        let distance = self.estimator.estimate(&detections);

        Ok(Prediction {
            landmark: classification.label,
            distance,
        })
    }
}

/// gRPC wrapper around the prediction service: decodes the uploaded bytes,
/// relays the result, and maps failures to status codes. No pipeline logic
/// lives here.
pub struct LandmarkGrpcService {
    service: Arc<LandmarkPredictionService>,
    request_timeout: Duration,
}

impl LandmarkGrpcService {
    pub fn new(service: Arc<LandmarkPredictionService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }
}

#[tonic::async_trait]
impl LandmarkPredictor for LandmarkGrpcService {
    async fn predict(
        &self,
        request: Request<PredictRequest>,
    ) -> Result<Response<PredictResponse>, Status> {
        let image_data = request.into_inner().image_data;
        let image = image::load_from_memory(&image_data)
            .map_err(|e| Status::invalid_argument(format!("invalid image: {}", e)))?;

        // Inference is CPU-bound native code; run it off the async executor
        // under the configured deadline.
        let service = self.service.clone();
        let prediction = tokio::time::timeout(
            self.request_timeout,
            tokio::task::spawn_blocking(move || service.predict(&image)),
        )
        .await
        .map_err(|_| Status::deadline_exceeded("prediction timed out"))?
        .map_err(|e| Status::internal(format!("prediction task failed: {}", e)))?
        .map_err(|e| Status::internal(format!("prediction failed: {}", e)))?;

        Ok(Response::new(PredictResponse {
            landmark: prediction.landmark,
            estimated_distance: prediction.distance.rounded_meters(),
            distance_valid: prediction.distance.valid,
        }))
    }
}
