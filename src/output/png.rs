use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use crate::cli::CompressionLevel;
use crate::error::SheetError;

/// Encode an image as PNG in memory.
///
/// Alpha is preserved unless `opaque` is set, in which case the image is
/// written as RGB.
pub fn encode_png(image: &RgbaImage, path: &Path, opaque: bool) -> Result<Vec<u8>> {
    let mut png_data = Cursor::new(Vec::new());
    let encoded = if opaque {
        let rgb: RgbImage = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
        rgb.write_to(&mut png_data, ImageFormat::Png)
    } else {
        image.write_to(&mut png_data, ImageFormat::Png)
    };
    encoded.map_err(|e| SheetError::ImageSave {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(png_data.into_inner())
}

/// Save an image as PNG, optionally with oxipng compression
pub fn save_png(
    image: &RgbaImage,
    path: &Path,
    opaque: bool,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let png_data = encode_png(image, path, opaque)?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data, &opts).map_err(|e| SheetError::PngCompress {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        png_data
    };

    fs::write(path, output_data).map_err(|e| SheetError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
