use crate::config::CodecConfig;
use crate::image_codec::interface::{DecodeError, EncodedPayload, ImageCodec, ImageReference};
use crate::library::logger::interface::Logger;
use base64::{engine::general_purpose, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::sync::Arc;

const JPEG_QUALITY: u8 = 100;

/// Decodes any supported image file, re-encodes it as JPEG and base64s the result.
pub struct ImageCodecJpeg {
    config: CodecConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageCodecJpeg {
    pub fn new(config: CodecConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("image_codec").with_namespace("jpeg"),
        }
    }

    pub fn encode_bytes(&self, bytes: &[u8]) -> Result<EncodedPayload, DecodeError> {
        let mut decoded = image::load_from_memory(bytes)?;

        if let Some((width, height)) = self.config.resize {
            decoded = decoded.resize_exact(width, height, FilterType::Nearest);
        }

        // JPEG has no alpha channel.
        let rgb = decoded.to_rgb8();

        let mut jpeg = Vec::new();
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
            encoder.encode_image(&rgb)?;
        }

        let _ = self.logger.info(&format!(
            "Encoded {}x{} image: {} source bytes, {} jpeg bytes",
            rgb.width(),
            rgb.height(),
            bytes.len(),
            jpeg.len()
        ));

        Ok(EncodedPayload::new(general_purpose::STANDARD.encode(&jpeg)))
    }
}

impl ImageCodec for ImageCodecJpeg {
    fn encode(&self, image: &ImageReference) -> Result<EncodedPayload, DecodeError> {
        if image.is_empty() {
            return Err(DecodeError::EmptyReference);
        }

        let bytes = std::fs::read(image.path()).map_err(|source| DecodeError::Read {
            location: image.location().to_string(),
            source,
        })?;

        self.encode_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};
    use std::io::Cursor;

    fn codec(resize: Option<(u32, u32)>) -> ImageCodecJpeg {
        ImageCodecJpeg::new(
            CodecConfig { resize },
            Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap())),
        )
    }

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    fn green_square(size: u32) -> DynamicImage {
        let mut img = ImageBuffer::new(size, size);
        for pixel in img.pixels_mut() {
            *pixel = Rgb([0u8, 160, 60]);
        }
        DynamicImage::ImageRgb8(img)
    }

    fn decode_payload(payload: &EncodedPayload) -> Vec<u8> {
        general_purpose::STANDARD.decode(payload.as_str()).unwrap()
    }

    #[test]
    fn test_png_file_becomes_base64_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herb.png");
        std::fs::write(&path, png_bytes(&green_square(32))).unwrap();

        let payload = codec(None)
            .encode(&ImageReference::new(path.to_string_lossy()))
            .unwrap();
        let jpeg = decode_payload(&payload);

        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let roundtrip = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!((roundtrip.width(), roundtrip.height()), (32, 32));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let bytes = png_bytes(&green_square(16));
        let codec = codec(None);

        assert_eq!(
            codec.encode_bytes(&bytes).unwrap(),
            codec.encode_bytes(&bytes).unwrap()
        );
    }

    #[test]
    fn test_no_resize_by_default() {
        let wide = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(48, 20, Rgb([10u8, 20, 30])));

        let payload = codec(None).encode_bytes(&png_bytes(&wide)).unwrap();
        let decoded = image::load_from_memory(&decode_payload(&payload)).unwrap();

        assert_eq!((decoded.width(), decoded.height()), (48, 20));
    }

    #[test]
    fn test_resize_when_configured() {
        let payload = codec(Some((8, 4)))
            .encode_bytes(&png_bytes(&green_square(32)))
            .unwrap();
        let decoded = image::load_from_memory(&decode_payload(&payload)).unwrap();

        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }

    #[test]
    fn test_alpha_is_flattened() {
        let rgba = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(
            10,
            10,
            Rgba([200u8, 10, 10, 128]),
        ));

        assert!(codec(None).encode_bytes(&png_bytes(&rgba)).is_ok());
    }

    #[test]
    fn test_empty_reference_is_rejected() {
        assert!(matches!(
            codec(None).encode(&ImageReference::empty()),
            Err(DecodeError::EmptyReference)
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.jpg");

        let err = codec(None)
            .encode(&ImageReference::new(path.to_string_lossy()))
            .unwrap_err();

        assert!(matches!(err, DecodeError::Read { .. }));
    }

    #[test]
    fn test_non_image_bytes_are_decode_error() {
        let err = codec(None).encode_bytes(b"definitely not an image").unwrap_err();

        assert!(matches!(err, DecodeError::Image(_)));
    }
}
