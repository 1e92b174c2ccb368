use anyhow::Result;
use image::{Rgba, RgbaImage, imageops};
use log::debug;

use crate::error::SheetError;
use crate::sprite::{NamedImage, PlacementRect};

fn out_of_bounds(frame: &PlacementRect, atlas: &RgbaImage) -> SheetError {
    SheetError::FrameOutOfBounds {
        name: frame.name.clone(),
        x: frame.x,
        y: frame.y,
        width: frame.width,
        height: frame.height,
        atlas_width: atlas.width(),
        atlas_height: atlas.height(),
    }
}

/// Raster-space top row of a frame, checking it lies inside the atlas
fn frame_top(frame: &PlacementRect, atlas: &RgbaImage) -> Result<u32> {
    if !frame.fits_within(atlas.width(), atlas.height()) {
        return Err(out_of_bounds(frame, atlas).into());
    }
    frame
        .top(atlas.height())
        .ok_or_else(|| out_of_bounds(frame, atlas).into())
}

/// Cut frames out of an atlas, dropping the last `skip_last` placements.
///
/// The returned images keep the placement names, so they can be fed straight
/// back into an [`AtlasBuilder`](super::AtlasBuilder) together with new frames.
pub fn extract_frames(
    atlas: &RgbaImage,
    placements: &[PlacementRect],
    skip_last: usize,
) -> Result<Vec<NamedImage>> {
    let keep = placements.len().saturating_sub(skip_last);

    placements[..keep]
        .iter()
        .map(|frame| {
            let top = frame_top(frame, atlas)?;
            let image = imageops::crop_imm(atlas, frame.x, top, frame.width, frame.height).to_image();
            Ok(NamedImage::new(frame.name.clone(), image))
        })
        .collect()
}

/// Replace one frame of an atlas with a new image.
///
/// The frame rect is cleared to transparent and the image is drawn centered
/// inside it. An image larger than the frame spills over its edges, clipped
/// to the atlas.
pub fn replace_frame(
    atlas: &RgbaImage,
    frame: &PlacementRect,
    image: &RgbaImage,
) -> Result<RgbaImage> {
    let top = frame_top(frame, atlas)?;
    let mut output = atlas.clone();

    for y in top..top + frame.height {
        for x in frame.x..frame.x + frame.width {
            output.put_pixel(x, y, Rgba([0, 0, 0, 0]));
        }
    }

    let x = i64::from(frame.x) + (i64::from(frame.width) - i64::from(image.width())).div_euclid(2);
    let y = i64::from(top) + (i64::from(frame.height) - i64::from(image.height())).div_euclid(2);
    imageops::overlay(&mut output, image, x, y);

    debug!(
        "Replaced frame '{}' with {}x{} image at ({}, {})",
        frame.name,
        image.width(),
        image.height(),
        x,
        y
    );

    Ok(output)
}
