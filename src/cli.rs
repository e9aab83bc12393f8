use clap::Parser;

#[derive(Parser, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Landmark classification ONNX model path
    #[arg(long, required = true)]
    pub classifier_model: String,

    /// Object detection ONNX model path
    #[arg(long, required = true)]
    pub detector_model: String,

    /// Landmark label file, one building name per line (defaults to the
    /// built-in campus label set)
    #[arg(long)]
    pub landmark_labels: Option<String>,

    /// Detector class file, one category per line in model id order
    /// (defaults to the built-in window/door categories)
    #[arg(long)]
    pub detector_labels: Option<String>,

    /// Height table file, `label height_meters` per line (defaults to the
    /// built-in table)
    #[arg(long)]
    pub heights: Option<String>,

    /// Camera focal length in pixels
    #[arg(long, default_value_t = crate::distance::DEFAULT_FOCAL_LENGTH_PX)]
    pub focal_length: f32,

    /// Detection confidence threshold
    #[arg(long, default_value_t = 0.5)]
    pub confidence: f32,

    /// Detection NMS IoU threshold
    #[arg(long, default_value_t = 0.5)]
    pub iou: f32,

    /// gRPC bind address
    #[arg(long, default_value_t = String::from("[::1]:50051"))]
    pub addr: String,

    /// Per-request prediction deadline in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Use the CUDA execution provider
    #[arg(long, default_value_t = false)]
    pub cuda: bool,

    /// Predict a single image from this path and exit instead of serving
    #[arg(long)]
    pub source: Option<String>,

    /// Write an annotated copy of --source with detection boxes drawn
    #[arg(long)]
    pub output: Option<String>,

    /// Print per-stage timings
    #[arg(long, default_value_t = false)]
    pub profile: bool,
}
