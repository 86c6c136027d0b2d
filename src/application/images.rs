//! Image normalization for uploaded project artwork.
//!
//! Every stored project image is re-encoded to one canonical shape: a fixed
//! width with the aspect ratio preserved, written as a JPEG. Decoding and
//! resampling are CPU bound and run on the blocking pool.

use std::io::Cursor;

use bytes::Bytes;
use futures::future::try_join_all;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader, Limits};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TARGET_WIDTH: u32 = 1200;
pub const DEFAULT_JPEG_QUALITY: u8 = 100;

/// Largest side a baseline JPEG can carry.
pub const MAX_JPEG_DIMENSION: u32 = u16::MAX as u32;
/// Upper bound on resampled output, checked before any pixel is allocated.
pub const MAX_OUTPUT_PIXELS: u64 = 1200 * 20_000;

const MAX_SOURCE_DIMENSION: u32 = 16_384;
const MAX_DECODE_ALLOC: u64 = 512 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("unsupported or corrupt image: {0}")]
    UnsupportedFormat(#[source] image::ImageError),
    #[error("image would normalize to {width}x{height}, which exceeds the output limit")]
    TooLarge { width: u32, height: u32 },
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("image worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
}

/// The normalized logo plus gallery, in submission order.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub logo: NormalizedImage,
    pub gallery: Vec<NormalizedImage>,
}

#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    target_width: u32,
    jpeg_quality: u8,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_WIDTH, DEFAULT_JPEG_QUALITY)
    }
}

impl ImageNormalizer {
    pub fn new(target_width: u32, jpeg_quality: u8) -> Self {
        Self {
            target_width: target_width.max(1),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    /// Decode, resize and re-encode a single image on the current thread.
    pub fn normalize(&self, raw: &[u8]) -> Result<NormalizedImage, ImageError> {
        let decoded = decode_bounded(raw)?;
        let (width, height) = decoded.dimensions();
        let target_height = scaled_height(width, height, self.target_width);
        check_output_size(self.target_width, target_height)?;

        let resized = decoded
            .resize_exact(self.target_width, target_height, FilterType::Lanczos3)
            .to_rgb8();

        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), self.jpeg_quality);
        DynamicImage::ImageRgb8(resized)
            .write_with_encoder(encoder)
            .map_err(ImageError::Encode)?;

        debug!(
            target = "folio::images",
            source_width = width,
            source_height = height,
            width = self.target_width,
            height = target_height,
            input_bytes = raw.len(),
            output_bytes = buffer.len(),
            "image normalized"
        );

        Ok(NormalizedImage {
            bytes: Bytes::from(buffer),
            width: self.target_width,
            height: target_height,
        })
    }

    /// Normalize one image on the blocking pool.
    pub async fn normalize_blocking(&self, raw: Bytes) -> Result<NormalizedImage, ImageError> {
        let normalizer = *self;
        tokio::task::spawn_blocking(move || normalizer.normalize(&raw))
            .await
            .map_err(|err| ImageError::Worker(err.to_string()))?
    }

    /// Normalize the logo and every gallery image concurrently.
    ///
    /// The first failure fails the whole batch; nothing partial is returned.
    pub async fn normalize_batch(
        &self,
        logo: Bytes,
        gallery: Vec<Bytes>,
    ) -> Result<NormalizedBatch, ImageError> {
        let logo_task = self.normalize_blocking(logo);
        let gallery_tasks = try_join_all(gallery.into_iter().map(|raw| self.normalize_blocking(raw)));
        let (logo, gallery) = futures::try_join!(logo_task, gallery_tasks)?;
        Ok(NormalizedBatch { logo, gallery })
    }
}

fn decode_bounded(raw: &[u8]) -> Result<DynamicImage, ImageError> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_SOURCE_DIMENSION);
    limits.max_image_height = Some(MAX_SOURCE_DIMENSION);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);

    let mut reader = ImageReader::new(Cursor::new(raw))
        .with_guessed_format()
        .map_err(|err| ImageError::UnsupportedFormat(image::ImageError::IoError(err)))?;
    reader.limits(limits);
    reader.decode().map_err(ImageError::UnsupportedFormat)
}

fn check_output_size(width: u32, height: u32) -> Result<(), ImageError> {
    let pixels = u64::from(width) * u64::from(height);
    if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION || pixels > MAX_OUTPUT_PIXELS {
        return Err(ImageError::TooLarge { width, height });
    }
    Ok(())
}

fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return 1;
    }
    let scaled = (u64::from(height) * u64::from(target_width) + u64::from(width) / 2) / u64::from(width);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}
