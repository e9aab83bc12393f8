use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Load an ordered label list from a text file, one label per line.
/// Blank lines are skipped; order in the file is the model's output order.
pub fn load_labels(file_path: &str) -> Result<Vec<String>> {
    let file = File::open(file_path)
        .with_context(|| format!("failed to open label file {}", file_path))?;
    let reader = BufReader::new(file);

    let mut labels = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        labels.push(name.to_string());
    }
    if labels.is_empty() {
        bail!("label file {} contains no labels", file_path);
    }
    Ok(labels)
}

/// Load a class-id to label mapping from a label file. Ids are assigned by
/// line position, matching the detection model's 0-indexed class ids.
pub fn load_class_mapping(file_path: &str) -> Result<HashMap<usize, String>> {
    let labels = load_labels(file_path)?;
    Ok(labels.into_iter().enumerate().collect())
}

/// The campus buildings the classifier was trained on, in model output order.
pub fn default_landmark_labels() -> Vec<String> {
    [
        "Block A",
        "Block B",
        "Block C",
        "Block D",
        "Block E",
        "Block F",
        "IEEE office",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// The detection model's class order: window/door categories named by height
/// in centimeters, matching the default height table.
pub fn default_detector_classes() -> HashMap<usize, String> {
    ["80", "120", "140", "160", "200", "210", "220", "380", "650"]
        .into_iter()
        .enumerate()
        .map(|(id, name)| (id, name.to_string()))
        .collect()
}
