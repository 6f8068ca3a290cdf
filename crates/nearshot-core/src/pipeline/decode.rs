//! Image decoding with format detection, validation, and timeout support.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Image decoder with configurable limits and timeout.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding a downloaded image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Downloaded size in bytes
    pub byte_len: u64,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode downloaded bytes with validation and timeout.
    ///
    /// `source_url` is carried for error context only; the format is
    /// detected from content, never from the URL.
    pub async fn decode(
        &self,
        bytes: Vec<u8>,
        source_url: &str,
    ) -> Result<DecodedImage, PipelineError> {
        let byte_len = bytes.len() as u64;
        let max_bytes = self.limits.max_image_bytes_mb * 1024 * 1024;
        if byte_len > max_bytes {
            return Err(PipelineError::Decode {
                url: source_url.to_string(),
                message: format!("image is {byte_len} bytes, limit is {max_bytes}"),
            });
        }

        let url_owned = source_url.to_string();
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);

        let decode_result = timeout(
            timeout_duration,
            tokio::task::spawn_blocking(move || Self::decode_sync(bytes, &url_owned)),
        )
        .await;

        match decode_result {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(PipelineError::Decode {
                url: source_url.to_string(),
                message: format!("task join error: {e}"),
            }),
            Err(_) => Err(PipelineError::Timeout {
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous decode from bytes (runs in spawn_blocking).
    fn decode_sync(bytes: Vec<u8>, url: &str) -> Result<DecodedImage, PipelineError> {
        use std::io::Cursor;

        let byte_len = bytes.len() as u64;
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                url: url.to_string(),
                message: format!("cannot detect image format: {e}"),
            })?;
        let format = reader.format().ok_or_else(|| PipelineError::Decode {
            url: url.to_string(),
            message: "unrecognized image format".to_string(),
        })?;
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image,
            format,
            width,
            height,
            byte_len,
        })
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode a tiny RGB image to PNG bytes in memory.
    pub(crate) fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::new_rgb8(2, 2);
        let mut out = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[tokio::test]
    async fn test_decode_valid_png() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let decoded = decoder
            .decode(png_bytes(), "https://example.com/a.png")
            .await
            .unwrap();
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!((decoded.width, decoded.height), (2, 2));
        assert!(decoded.byte_len > 0);
    }

    #[tokio::test]
    async fn test_decode_garbage_fails() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let err = decoder
            .decode(vec![0u8; 64], "https://example.com/a.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_decode_rejects_oversized_payload() {
        let limits = LimitsConfig {
            max_image_bytes_mb: 1,
            ..LimitsConfig::default()
        };
        let decoder = ImageDecoder::new(limits);
        let err = decoder
            .decode(vec![0u8; 2 * 1024 * 1024], "https://example.com/big.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_format_to_string() {
        assert_eq!(format_to_string(ImageFormat::Jpeg), "jpeg");
        assert_eq!(format_to_string(ImageFormat::Png), "png");
        assert_eq!(format_to_string(ImageFormat::Ico), "unknown");
    }
}
