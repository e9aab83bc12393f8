use anyhow::{ensure, Context, Result};
use image::DynamicImage;
use ndarray::{Array1, CowArray};

use crate::postprocess::{argmax, softmax};
use crate::preprocess::Processor;

/// A whole-image classification: the winning label plus the full score
/// vector in the label set's order.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub scores: Vec<f32>,
}

/// Pluggable whole-image classification backend.
///
/// Implementations pick the argmax label over a fixed, ordered label set that
/// stays stable for the process lifetime.
pub trait Classifier: Send + Sync {
    fn classify(&self, image: &DynamicImage) -> Result<Classification>;
}

/// Classification backend over an ONNX session producing one score per label.
pub struct OnnxClassifier {
    session: ort::session::Session,
    processor: Processor,
    labels: Vec<String>,
}

impl OnnxClassifier {
    pub fn new(session: ort::session::Session, processor: Processor, labels: Vec<String>) -> Self {
        Self {
            session,
            processor,
            labels,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, image: &DynamicImage) -> Result<Classification> {
        let (xs, _offsets) = self.processor.preprocess(std::slice::from_ref(image))?;
        let xs = CowArray::from(xs);
        let input_data = ort::inputs![xs.view()]?;
        let ys = self.session.run(input_data)?;

        let (_name, value) = ys.iter().next().context("classifier produced no outputs")?;
        let output = value.try_extract_tensor::<f32>()?.into_owned();
        let raw_scores = Array1::from_iter(output.iter().copied());
        ensure!(
            raw_scores.len() == self.labels.len(),
            "classifier produced {} scores for {} labels",
            raw_scores.len(),
            self.labels.len()
        );

        // The model may emit logits or probabilities; softmax preserves the
        // argmax either way.
        let scores = softmax(&raw_scores);
        let (best, _confidence) = argmax(&scores);
        Ok(Classification {
            label: self.labels[best].clone(),
            scores: scores.to_vec(),
        })
    }
}
