//! Upload checks and decoding in front of the extractor.
//!
//! The extractor itself never sees raw bytes. These helpers reject oversized
//! or non-image payloads as caller errors and turn everything else into a
//! decoded image.

use image::{DynamicImage, RgbImage};

use crate::error::{PaletteError, Result};

/// Largest accepted upload, 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Decode an uploaded image, enforcing [`MAX_UPLOAD_BYTES`].
pub fn decode_upload(bytes: &[u8]) -> Result<DynamicImage> {
    decode_upload_with_limit(bytes, MAX_UPLOAD_BYTES)
}

/// Decode an uploaded image no larger than `limit` bytes.
///
/// Size and format are checked before the decoder runs. Bytes that look like
/// an image but fail to decode are a processing error, not a caller error.
pub fn decode_upload_with_limit(bytes: &[u8], limit: usize) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(PaletteError::invalid_input("upload is empty"));
    }
    if bytes.len() > limit {
        return Err(PaletteError::invalid_input(format!(
            "upload is {} bytes, limit is {limit}",
            bytes.len()
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| PaletteError::invalid_input("upload is not a recognized image format"))?;
    log::debug!("decoding {} byte {format:?} upload", bytes.len());

    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| PaletteError::processing(format!("unable to decode {format:?} image: {e}")))
}

/// Wrap a raw, tightly packed RGB8 buffer as an image.
pub fn decode_raw_rgb(width: u32, height: u32, bytes: Vec<u8>) -> Result<DynamicImage> {
    let len = bytes.len();
    RgbImage::from_raw(width, height, bytes)
        .filter(|_| (width as usize) * (height as usize) * 3 == len)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| {
            PaletteError::processing(format!(
                "raw buffer of {len} bytes does not match a {width}x{height} RGB image"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(image: &RgbImage) -> Vec<u8> {
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_png_uploads() {
        let image = RgbImage::from_pixel(3, 2, Rgb([1, 2, 3]));
        let decoded = decode_upload(&png_bytes(&image)).unwrap();
        assert_eq!(decoded.to_rgb8(), image);
    }

    #[test]
    fn rejects_empty_and_oversized_uploads() {
        assert!(decode_upload(&[]).unwrap_err().is_caller_error());

        let bytes = png_bytes(&RgbImage::new(8, 8));
        let err = decode_upload_with_limit(&bytes, bytes.len() - 1).unwrap_err();
        assert!(err.is_caller_error());
        assert!(decode_upload_with_limit(&bytes, bytes.len()).is_ok());
    }

    #[test]
    fn oversized_payload_is_rejected_before_decoding() {
        let garbage = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let err = decode_upload(&garbage).unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = decode_upload(b"definitely not an image").unwrap_err();
        assert!(err.is_caller_error());
    }

    #[test]
    fn truncated_image_is_a_processing_error() {
        let bytes = png_bytes(&RgbImage::from_pixel(32, 32, Rgb([9, 9, 9])));
        let err = decode_upload(&bytes[..bytes.len() / 2]).unwrap_err();
        assert_eq!(err, PaletteError::Processing);
    }

    #[test]
    fn raw_buffer_must_match_dimensions() {
        assert!(decode_raw_rgb(2, 2, vec![0; 12]).is_ok());
        assert_eq!(decode_raw_rgb(2, 2, vec![0; 7]).unwrap_err(), PaletteError::Processing);
        assert_eq!(decode_raw_rgb(2, 2, vec![0; 13]).unwrap_err(), PaletteError::Processing);
    }
}
