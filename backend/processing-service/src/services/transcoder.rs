//! Image transcoder - decodes and re-encodes images at reduced quality
//!
//! The container format is preserved: a JPEG comes back as a JPEG at the
//! configured quality, a PNG as a PNG, and so on. Pure and synchronous; use
//! `transcode_async` from async code so the CPU work runs on the blocking
//! thread pool.

use crate::error::{AppError, Result};
use bytes::Bytes;
use image::{ImageFormat, ImageOutputFormat};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Configuration for transcoding
#[derive(Clone, Debug)]
pub struct TranscoderConfig {
    /// Re-encode quality for quality-bearing formats (0-100)
    pub quality: u8,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self { quality: 50 }
    }
}

pub struct Transcoder {
    config: TranscoderConfig,
}

impl Transcoder {
    /// Create a new transcoder with the given configuration
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// Create a transcoder with default configuration
    pub fn with_defaults() -> Self {
        Self::new(TranscoderConfig::default())
    }

    /// Re-encode `data` in its own format at reduced quality (blocking version)
    ///
    /// **Note:** This method performs CPU-intensive operations and should not
    /// be called directly from async code. Use `transcode_async` instead.
    pub fn transcode(&self, data: &[u8]) -> Result<Bytes> {
        let format = image::guess_format(data)
            .map_err(|e| AppError::Transcode(format!("unrecognized image container: {e}")))?;

        let img = image::load_from_memory_with_format(data, format)
            .map_err(|e| AppError::Transcode(format!("failed to decode image: {e}")))?;

        let output_format = self.output_format(format)?;

        let mut buf = Vec::new();
        let mut cursor = Cursor::new(&mut buf);
        img.write_to(&mut cursor, output_format)
            .map_err(|e| AppError::Transcode(format!("failed to re-encode image: {e}")))?;

        debug!(
            format = ?format,
            input_size = data.len(),
            output_size = buf.len(),
            "image transcoded"
        );

        Ok(Bytes::from(buf))
    }

    /// Transcode asynchronously using the blocking thread pool
    pub async fn transcode_async(self: Arc<Self>, data: Bytes) -> Result<Bytes> {
        tokio::task::spawn_blocking(move || self.transcode(&data))
            .await
            .map_err(|e| AppError::Internal(format!("Transcode task panicked: {e}")))?
    }

    /// Output encoding matching the input container. Only JPEG carries a
    /// quality knob; the rest re-encode as-is in their own format.
    fn output_format(&self, format: ImageFormat) -> Result<ImageOutputFormat> {
        match format {
            ImageFormat::Jpeg => Ok(ImageOutputFormat::Jpeg(self.config.quality)),
            ImageFormat::Png => Ok(ImageOutputFormat::Png),
            ImageFormat::Gif => Ok(ImageOutputFormat::Gif),
            ImageFormat::Bmp => Ok(ImageOutputFormat::Bmp),
            ImageFormat::Ico => Ok(ImageOutputFormat::Ico),
            ImageFormat::Tiff => Ok(ImageOutputFormat::Tiff),
            other => Err(AppError::Transcode(format!(
                "unsupported output format: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    /// High-frequency test image so JPEG quality reduction has bytes to shave
    fn test_image() -> DynamicImage {
        let img = RgbImage::from_fn(64, 64, |x, y| {
            let v = ((x * 31 + y * 17) % 256) as u8;
            image::Rgb([v, v.wrapping_add(85), v.wrapping_add(170)])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn encode(img: &DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format)
            .expect("encode test image");
        buf
    }

    #[test]
    fn test_jpeg_stays_jpeg_and_shrinks() {
        let original = encode(&test_image(), ImageOutputFormat::Jpeg(90));
        let transcoder = Transcoder::with_defaults();

        let output = transcoder.transcode(&original).unwrap();

        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
        assert!(output.len() <= original.len());
    }

    #[test]
    fn test_png_stays_png() {
        let original = encode(&test_image(), ImageOutputFormat::Png);
        let transcoder = Transcoder::with_defaults();

        let output = transcoder.transcode(&original).unwrap();

        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Png);
        image::load_from_memory(&output).expect("output decodes");
    }

    #[test]
    fn test_undecodable_bytes_are_a_transcode_error() {
        let transcoder = Transcoder::with_defaults();
        let err = transcoder.transcode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AppError::Transcode(_)));
    }

    #[test]
    fn test_truncated_image_is_a_transcode_error() {
        let original = encode(&test_image(), ImageOutputFormat::Jpeg(90));
        let transcoder = Transcoder::with_defaults();
        let err = transcoder.transcode(&original[..20]).unwrap_err();
        assert!(matches!(err, AppError::Transcode(_)));
    }

    #[test]
    fn test_default_quality() {
        assert_eq!(TranscoderConfig::default().quality, 50);
    }

    #[tokio::test]
    async fn test_transcode_async_matches_sync() {
        let original = encode(&test_image(), ImageOutputFormat::Jpeg(90));
        let transcoder = Arc::new(Transcoder::with_defaults());

        let sync_out = transcoder.transcode(&original).unwrap();
        let async_out = transcoder
            .clone()
            .transcode_async(Bytes::from(original))
            .await
            .unwrap();

        assert_eq!(sync_out, async_out);
    }
}
