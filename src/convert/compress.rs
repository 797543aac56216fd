/// Client-side image compression
///
/// The backend accepts the photo as an inline payload, so we shrink it
/// before upload: decode, cap the longest edge, re-encode as JPEG.
/// Decoding and resizing are CPU-bound, so they run on a blocking thread.

use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::PathBuf;
use tokio::task;

use crate::convert::ConvertError;
use crate::state::data::EncodedImage;

/// Longest edge of the compressed upload, in pixels
pub const MAX_DIMENSION: u32 = 1024;

/// Read and compress a photo from disk.
///
/// Returns the compressed payload, or a `Compression` error when the
/// file cannot be read or is not a decodable image.
pub async fn compress_file(path: PathBuf) -> Result<EncodedImage, ConvertError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ConvertError::Compression(format!("{}: {}", path.display(), e)))?;

    // Decode + resize is CPU-intensive, keep it off the UI executor
    task::spawn_blocking(move || compress_bytes(&bytes))
        .await
        .map_err(|e| ConvertError::Compression(format!("Task join error: {}", e)))?
}

/// Compress already-loaded image bytes.
///
/// Any decodable format goes in; a JPEG no larger than
/// `MAX_DIMENSION` on its longest edge comes out. Alpha is flattened
/// because JPEG has no transparency.
pub fn compress_bytes(data: &[u8]) -> Result<EncodedImage, ConvertError> {
    let img = image::load_from_memory(data)
        .map_err(|e| ConvertError::Compression(format!("Failed to decode image: {}", e)))?;

    let (width, height) = (img.width(), img.height());

    let resized = if width.max(height) > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG cannot carry an alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| ConvertError::Compression(format!("Failed to encode JPEG: {}", e)))?;

    let encoded = buffer.into_inner();

    println!(
        "📦 Compressed {}x{} → {}x{} ({}KB)",
        width,
        height,
        rgb.width(),
        rgb.height(),
        encoded.len() / 1024
    );

    Ok(EncodedImage::new("image/jpeg", encoded))
}
