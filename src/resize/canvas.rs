use anyhow::Result;
use image::{Rgba, RgbaImage, imageops};
use log::debug;

use super::AnchorPolicy;
use crate::error::SheetError;
use crate::packing::{needs_resize, round_up_to_multiple_of_4};

/// Grow an image's canvas to the next multiple-of-4 dimensions.
///
/// Images that already conform are returned as an unmodified copy. The new
/// area is transparent except under [`AnchorPolicy::StretchCenter`], which
/// fills it with seam colours blended from the source.
pub fn resize_canvas(source: &RgbaImage, policy: AnchorPolicy) -> Result<RgbaImage> {
    let (width, height) = source.dimensions();

    if width == 0 || height == 0 {
        return Err(SheetError::EmptyImage {
            name: "source".to_string(),
            width,
            height,
        }
        .into());
    }

    if !needs_resize(width, height) {
        return Ok(source.clone());
    }

    let too_large = || SheetError::AtlasTooLarge {
        columns: 1,
        rows: 1,
        cell_width: width,
        cell_height: height,
    };
    let new_width = round_up_to_multiple_of_4(width).ok_or_else(too_large)?;
    let new_height = round_up_to_multiple_of_4(height).ok_or_else(too_large)?;

    let mut output = RgbaImage::new(new_width, new_height);

    if policy == AnchorPolicy::StretchCenter {
        stretch_center(source, &mut output);
    } else {
        let (dx, dy) = policy.offset(width, height, new_width, new_height);
        imageops::replace(&mut output, source, i64::from(dx), i64::from(dy));
    }

    debug!(
        "Resized {}x{} to {}x{} ({:?})",
        width, height, new_width, new_height, policy
    );

    Ok(output)
}

/// Split the source into quadrants around its center, push them into the
/// corners of `output` and fill the bands between them.
fn stretch_center(source: &RgbaImage, output: &mut RgbaImage) {
    let (width, height) = source.dimensions();
    let half_w = width / 2;
    let half_h = height / 2;
    let other_w = width - half_w;
    let other_h = height - half_h;
    let gap_x = output.width() - width;
    let gap_y = output.height() - height;

    let dest_x = |x: u32| if x < half_w { x } else { x + gap_x };
    let dest_y = |y: u32| if y < half_h { y } else { y + gap_y };

    // Indices are clamped so 1-pixel sources still have a seam to sample
    let px = |x: u32, y: u32| *source.get_pixel(x.min(width - 1), y.min(height - 1));

    for (x, y, pixel) in source.enumerate_pixels() {
        output.put_pixel(dest_x(x), dest_y(y), *pixel);
    }

    // Band between top and bottom halves
    for x in 0..width {
        let color = average(&[px(x, half_h.saturating_sub(1)), px(x, other_h)]);
        for y in half_h..half_h + gap_y {
            output.put_pixel(dest_x(x), y, color);
        }
    }

    // Band between left and right halves
    for y in 0..height {
        let color = average(&[px(half_w.saturating_sub(1), y), px(other_w, y)]);
        for x in half_w..half_w + gap_x {
            output.put_pixel(x, dest_y(y), color);
        }
    }

    // Where the two bands cross
    let color = average(&[
        px(half_w, half_h),
        px(other_w, half_h),
        px(half_w, other_h),
        px(other_w, other_h),
    ]);
    for y in half_h..half_h + gap_y {
        for x in half_w..half_w + gap_x {
            output.put_pixel(x, y, color);
        }
    }
}

/// Per-channel average, alpha included, rounded down
fn average(pixels: &[Rgba<u8>]) -> Rgba<u8> {
    let count = u32::try_from(pixels.len().max(1)).unwrap_or(u32::MAX);
    let mut sums = [0u32; 4];
    for pixel in pixels {
        for (sum, channel) in sums.iter_mut().zip(pixel.0) {
            *sum += u32::from(channel);
        }
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "average of u8 values fits in u8"
    )]
    let channels = sums.map(|sum| (sum / count) as u8);
    Rgba(channels)
}
