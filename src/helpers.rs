use anyhow::Result;
use image::{DynamicImage, Rgba};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};

use crate::detector::Detection;

/// Draw detection boxes onto a copy of the image and save it. Boxes are
/// already in original-image pixel coordinates.
pub fn draw_detections(
    image: &DynamicImage,
    detections: &[Detection],
    output_path: &str,
) -> Result<()> {
    let mut img = image.to_rgba8();

    for detection in detections {
        let left = detection.bbox.x_min.round() as i32;
        let top = detection.bbox.y_min.round() as i32;
        let width = detection.bbox.pixel_width().round().max(1.0) as u32;
        let height = detection.bbox.pixel_height().round().max(1.0) as u32;
        let rect = Rect::at(left, top).of_size(width, height);

        draw_hollow_rect_mut(&mut img, rect, Rgba([255, 0, 0, 255]));
    }

    img.save(output_path)?;
    Ok(())
}
