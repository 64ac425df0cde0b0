//! # Image Processor Module
//!
//! Conversione in memoria di una foto nel suo derivato web.
//!
//! ## Pipeline:
//! 1. **Decode**: formato riconosciuto dal contenuto, non dall'estensione
//! 2. **Orientamento**: tag EXIF applicato, se abilitato
//! 3. **Normalizzazione**: RGB a 8 bit (alpha scartato, grayscale espanso,
//!    CMYK convertito dal decoder, campioni a 16 bit ridotti)
//! 4. **Resize**: entro il lato massimo, mai ingrandito
//! 5. **Encode**: formato di output con qualità e sforzo fissi
//!
//! Il processore è puro: bytes in ingresso, bytes in uscita. Input e versione
//! dell'encoder identici producono output identico.

use crate::config::{OptimizerConfig, OutputFormat};
use crate::error::UpkeepError;
use crate::resize::{fit_within, ResizeAlgorithm};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Converts one source image into its web derivative
pub struct ImageProcessor {
    max_dimension: u32,
    format: OutputFormat,
    filter: ResizeAlgorithm,
    auto_orient: bool,
}

impl ImageProcessor {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            max_dimension: config.max_dimension,
            format: config.format,
            filter: config.filter,
            auto_orient: config.auto_orient,
        }
    }

    /// Converts the encoded `source` image into the configured output format.
    ///
    /// `path` is only used to label errors and logs.
    pub fn process(&self, path: &Path, source: &[u8]) -> Result<Vec<u8>, UpkeepError> {
        let image = self.decode(path, source)?;
        let rgb = self.resize(image.into_rgb8());
        self.encode(path, &rgb)
    }

    fn decode(&self, path: &Path, source: &[u8]) -> Result<DynamicImage, UpkeepError> {
        let decode_err = |source| UpkeepError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let reader = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(UpkeepError::io(path))?;
        let mut decoder = reader.into_decoder().map_err(decode_err)?;
        let orientation = decoder.orientation().map_err(decode_err)?;
        let mut image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;

        if self.auto_orient {
            image.apply_orientation(orientation);
        }

        debug!(
            "Decoded {} ({}x{}, {:?})",
            path.display(),
            image.width(),
            image.height(),
            image.color()
        );
        Ok(image)
    }

    /// Downsample to fit the bounding box; images already within it are returned as is.
    pub fn resize(&self, rgb: RgbImage) -> RgbImage {
        let (width, height) = fit_within(rgb.width(), rgb.height(), self.max_dimension);
        if (width, height) == rgb.dimensions() {
            return rgb;
        }

        debug!(
            "Resizing {}x{} -> {}x{} ({:?})",
            rgb.width(),
            rgb.height(),
            width,
            height,
            self.filter
        );
        image::imageops::resize(&rgb, width, height, self.filter.to_filter_type())
    }

    fn encode(&self, path: &Path, rgb: &RgbImage) -> Result<Vec<u8>, UpkeepError> {
        let encode_err = |message: String| UpkeepError::Encode {
            path: path.to_path_buf(),
            format: self.format.name(),
            message,
        };

        match self.format {
            OutputFormat::Webp { quality, method } => {
                let mut config = libwebp_sys::WebPConfig::new()
                    .map_err(|_| encode_err("invalid encoder configuration".to_string()))?;
                config.lossless = 0;
                config.quality = quality;
                config.method = i32::from(method);

                let encoder = webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height());
                let memory = encoder
                    .encode_advanced(&config)
                    .map_err(|e| encode_err(format!("{:?}", e)))?;
                Ok(memory.to_vec())
            }
            OutputFormat::Jpeg { quality } => {
                let mut bytes = Vec::new();
                let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
                rgb.write_with_encoder(encoder)
                    .map_err(|e| encode_err(e.to_string()))?;
                Ok(bytes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use image::{GenericImageView, ImageFormat, Rgba, RgbaImage};

    fn webp_processor(max_dimension: u32) -> ImageProcessor {
        ImageProcessor::new(&OptimizerConfig {
            max_dimension,
            ..OptimizerConfig::preset(Preset::Webp)
        })
    }

    fn jpeg_processor(max_dimension: u32) -> ImageProcessor {
        ImageProcessor::new(&OptimizerConfig {
            max_dimension,
            ..OptimizerConfig::preset(Preset::Jpeg)
        })
    }

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    fn gradient_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
    }

    #[test]
    fn test_webp_output_is_bounded() {
        let output = webp_processor(200)
            .process(Path::new("wide.jpg"), &gradient_jpeg(400, 300))
            .unwrap();

        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::WebP);
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(decoded.dimensions(), (200, 150));
    }

    #[test]
    fn test_small_image_keeps_dimensions() {
        let output = webp_processor(1920)
            .process(Path::new("small.jpg"), &gradient_jpeg(64, 48))
            .unwrap();

        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
    }

    #[test]
    fn test_jpeg_output_is_bounded() {
        let output = jpeg_processor(100)
            .process(Path::new("tall.jpg"), &gradient_jpeg(150, 300))
            .unwrap();

        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(decoded.dimensions(), (50, 100));
    }

    #[test]
    fn test_alpha_is_dropped_not_composited() {
        let img = RgbaImage::from_pixel(32, 32, Rgba([200, 40, 40, 0]));
        let png = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);

        let output = jpeg_processor(1920).process(Path::new("clear.png"), &png).unwrap();
        let decoded = image::load_from_memory(&output).unwrap();
        assert!(!decoded.color().has_alpha());

        // Transparent pixels keep their color channels instead of turning black or white.
        let pixel = decoded.to_rgb8().get_pixel(16, 16).0;
        assert!(pixel[0] > 150 && pixel[1] < 90 && pixel[2] < 90, "{pixel:?}");
    }

    #[test]
    fn test_grayscale_is_expanded_to_rgb() {
        let img = image::GrayImage::from_pixel(16, 16, image::Luma([90]));
        let png = encode(DynamicImage::ImageLuma8(img), ImageFormat::Png);

        let output = webp_processor(1920).process(Path::new("gray.png"), &png).unwrap();
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
    }

    #[test]
    fn test_resize_skips_in_bounds_buffer() {
        let rgb = RgbImage::from_pixel(10, 5, image::Rgb([1, 2, 3]));
        let resized = webp_processor(10).resize(rgb.clone());
        assert_eq!(resized, rgb);
    }

    #[test]
    fn test_corrupt_source_is_a_decode_error() {
        let mut bytes = gradient_jpeg(64, 64);
        bytes.truncate(40);

        let err = webp_processor(1920)
            .process(Path::new("broken.jpg"), &bytes)
            .unwrap_err();
        assert!(matches!(err, UpkeepError::Decode { .. }), "{err}");
    }

    #[test]
    fn test_unknown_bytes_are_a_decode_error() {
        let err = webp_processor(1920)
            .process(Path::new("notes.jpg"), b"definitely not an image")
            .unwrap_err();
        assert!(matches!(err, UpkeepError::Decode { .. }), "{err}");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let source = gradient_jpeg(300, 200);
        let processor = webp_processor(128);
        let first = processor.process(Path::new("a.jpg"), &source).unwrap();
        let second = processor.process(Path::new("a.jpg"), &source).unwrap();
        assert_eq!(first, second);
    }
}
