//! Page image → grayscale PNG bytes for tesseract's stdin.
//!
//! PDFium renders RGBA. Tesseract binarises internally and ignores colour,
//! so pages are flattened to 8-bit luma first; the PNG is then roughly a
//! quarter of the size. PNG rather than JPEG: ringing around thin strokes
//! and the matra hurts segmentation.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as a grayscale PNG.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let gray = match img {
        DynamicImage::ImageLuma8(_) => img.clone(),
        other => DynamicImage::ImageLuma8(other.to_luma8()),
    };

    let mut buf = Cursor::new(Vec::new());
    gray.write_to(&mut buf, ImageFormat::Png)?;
    let buf = buf.into_inner();
    debug!("Page {}x{} → {} bytes PNG", img.width(), img.height(), buf.len());
    Ok(buf)
}
