use anyhow::{Context, Result};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::SessionBuilder;

/// ONNX session loader with execution-provider selection. One loader can
/// build several sessions (classifier and detector share the provider choice).
pub struct OnnxModel {
    provider: [ort::execution_providers::ExecutionProviderDispatch; 1],
}

impl OnnxModel {
    pub fn new(cuda: bool) -> Self {
        let provider = if cuda {
            [CUDAExecutionProvider::default().build().error_on_failure()]
        } else {
            [CPUExecutionProvider::default().build()]
        };
        Self { provider }
    }

    pub fn load_model(&self, model_path: &str) -> Result<ort::session::Session> {
        let session = SessionBuilder::new()?
            .with_execution_providers(self.provider.clone())?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)
            .with_context(|| format!("failed to load ONNX model {}", model_path))?;
        Ok(session)
    }
}
