use anyhow::{anyhow, Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::DynamicImage;
use rayon::prelude::*;

/// Per-model tensor layout and normalization parameters.
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    pub mean: [f32; 3],
    pub std: [f32; 3],
    pub height: usize,
    pub width: usize,
    /// Preserve aspect ratio and pad to the model's square input. When false,
    /// the image is stretched to `width` x `height` directly.
    pub letterbox: bool,
    pub pad_rgb: [u8; 3],
}

impl PreprocessConfig {
    /// Whole-image classifier input: stretch resize, plain /255 scaling.
    pub fn classifier(size: usize) -> Self {
        Self {
            mean: [0.0, 0.0, 0.0],
            std: [1.0, 1.0, 1.0],
            height: size,
            width: size,
            letterbox: false,
            pad_rgb: [0, 0, 0],
        }
    }

    /// Detector input: letterboxed resize with gray padding, /255 scaling.
    pub fn detector(size: usize) -> Self {
        Self {
            mean: [0.0, 0.0, 0.0],
            std: [1.0, 1.0, 1.0],
            height: size,
            width: size,
            letterbox: true,
            pad_rgb: [114, 114, 114],
        }
    }
}

/// Image-to-tensor stage shared by both model adapters.
#[derive(Debug, Clone)]
pub struct Processor {
    pub config: PreprocessConfig,
}

impl Processor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Scale factor applied to an image of the given size before padding.
    pub fn scale_for(&self, orig_width: u32, orig_height: u32) -> f32 {
        if self.config.letterbox {
            (self.config.width as f32 / orig_width as f32)
                .min(self.config.height as f32 / orig_height as f32)
        } else {
            1.0
        }
    }

    fn convert_to_rgb(&self, image: Image<'static>) -> Result<image::RgbImage> {
        image::ImageBuffer::from_raw(image.width(), image.height(), image.buffer().to_vec())
            .context("resized buffer does not match its dimensions")
    }

    /// Preprocess a batch of images into one NCHW tensor.
    /// Returns the tensor and the per-image padding offsets (zero when not
    /// letterboxing), needed to map detector boxes back to the original frame.
    pub fn preprocess(
        &self,
        xs: &[DynamicImage],
    ) -> Result<(ndarray::Array<f32, ndarray::IxDyn>, Vec<(u32, u32)>)> {
        let ys_vec: Vec<(ndarray::Array3<f32>, (u32, u32))> = xs
            .par_iter()
            .map(|x| {
                let rgb = x.to_rgb8();
                let (orig_width, orig_height) = rgb.dimensions();
                let (new_width, new_height) = if self.config.letterbox {
                    let scale = self.scale_for(orig_width, orig_height);
                    (
                        ((orig_width as f32 * scale) as u32).max(1),
                        ((orig_height as f32 * scale) as u32).max(1),
                    )
                } else {
                    (self.config.width as u32, self.config.height as u32)
                };

                let src = DynamicImage::ImageRgb8(rgb);
                let mut dst_image = Image::new(new_width, new_height, PixelType::U8x3);
                let mut resizer = Resizer::new();
                let resize_options = ResizeOptions::new().resize_alg(ResizeAlg::Nearest);
                resizer
                    .resize(&src, &mut dst_image, Some(&resize_options))
                    .map_err(|e| anyhow!("resize failed: {}", e))?;
                let resized = self.convert_to_rgb(dst_image)?;

                // Center the resized image on the padded canvas.
                let mut padded = image::RgbImage::from_pixel(
                    self.config.width as u32,
                    self.config.height as u32,
                    image::Rgb(self.config.pad_rgb),
                );
                let x_offset = (self.config.width as u32 - new_width) / 2;
                let y_offset = (self.config.height as u32 - new_height) / 2;
                image::imageops::overlay(&mut padded, &resized, x_offset as i64, y_offset as i64);

                let mut img_arr = ndarray::Array3::<f32>::zeros((
                    3,
                    self.config.height,
                    self.config.width,
                ));
                for (i, rgb) in padded.pixels().enumerate() {
                    let y = i / self.config.width;
                    let x = i % self.config.width;
                    img_arr[[0, y, x]] =
                        (rgb[0] as f32 / 255.0 - self.config.mean[0]) / self.config.std[0];
                    img_arr[[1, y, x]] =
                        (rgb[1] as f32 / 255.0 - self.config.mean[1]) / self.config.std[1];
                    img_arr[[2, y, x]] =
                        (rgb[2] as f32 / 255.0 - self.config.mean[2]) / self.config.std[2];
                }
                Ok((img_arr, (x_offset, y_offset)))
            })
            .collect::<Result<Vec<_>>>()?;

        let (img_arrs, offsets): (Vec<_>, Vec<_>) = ys_vec.into_iter().unzip();
        let views: Vec<_> = img_arrs.iter().map(|arr| arr.view()).collect();
        let ys = ndarray::stack(ndarray::Axis(0), &views)?.into_dyn();

        Ok((ys, offsets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([value, value, value]),
        ))
    }

    #[test]
    fn classifier_config_stretches_without_offsets() -> Result<()> {
        let processor = Processor::new(PreprocessConfig::classifier(224));
        let (tensor, offsets) = processor.preprocess(&[solid_image(640, 480, 255)])?;
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
        assert_eq!(offsets, vec![(0, 0)]);
        // Pure white scales to 1.0 under /255 normalization.
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn detector_config_letterboxes_with_centered_offsets() -> Result<()> {
        let processor = Processor::new(PreprocessConfig::detector(640));
        let (tensor, offsets) = processor.preprocess(&[solid_image(640, 320, 0)])?;
        assert_eq!(tensor.shape(), &[1, 3, 640, 640]);
        // 640x320 scales to 640x320 inside 640x640, centered vertically.
        assert_eq!(offsets, vec![(0, 160)]);
        // Padding rows carry the gray fill value.
        assert!((tensor[[0, 0, 0, 0]] - 114.0 / 255.0).abs() < 1e-6);
        // Image rows carry the black source value.
        assert!(tensor[[0, 0, 320, 320]].abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn scale_preserves_aspect_ratio() {
        let processor = Processor::new(PreprocessConfig::detector(640));
        let scale = processor.scale_for(1280, 960);
        assert!((scale - 0.5).abs() < 1e-6);
    }
}
