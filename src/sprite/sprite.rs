use clap::ValueEnum;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A source image and the name its frame will be emitted under
#[derive(Debug, Clone)]
pub struct NamedImage {
    /// File the image was decoded from, if any
    pub path: Option<PathBuf>,
    /// Key used for the placement rectangle
    pub name: String,
    pub image: RgbaImage,
}

impl NamedImage {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            path: None,
            name: name.into(),
            image,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Where one frame lives within an atlas.
///
/// Coordinates use a bottom-left origin with y increasing upward, the
/// convention sprite slicers expect. Use [`PlacementRect::top`] to get the
/// row in top-left raster space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRect {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PlacementRect {
    /// First raster row of this rect in a canvas of the given height, or
    /// `None` if the rect extends past the top of the canvas
    pub fn top(&self, canvas_height: u32) -> Option<u32> {
        canvas_height.checked_sub(self.y)?.checked_sub(self.height)
    }

    /// Returns true if the rect lies completely inside a canvas of the given size
    pub fn fits_within(&self, canvas_width: u32, canvas_height: u32) -> bool {
        self.x
            .checked_add(self.width)
            .is_some_and(|right| right <= canvas_width)
            && self.top(canvas_height).is_some()
    }
}

/// How placement rectangles are named
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameMode {
    /// Use each image's own name
    #[default]
    Image,
    /// Use the image's 0-based position in the input
    Ordinal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: u32, y: u32, width: u32, height: u32) -> PlacementRect {
        PlacementRect {
            name: "frame".to_string(),
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_top_converts_origin() {
        // 32px frame sitting on the bottom edge of a 68px canvas
        assert_eq!(rect(0, 0, 32, 32).top(68), Some(36));
        // Frame touching the top edge
        assert_eq!(rect(0, 36, 32, 32).top(68), Some(0));
        assert_eq!(rect(0, 40, 32, 32).top(68), None);
    }

    #[test]
    fn test_fits_within() {
        assert!(rect(0, 0, 32, 32).fits_within(32, 32));
        assert!(rect(34, 2, 32, 32).fits_within(68, 34));
        assert!(!rect(40, 0, 32, 32).fits_within(64, 32));
        assert!(!rect(0, 1, 32, 32).fits_within(32, 32));
        assert!(!rect(u32::MAX, 0, 1, 1).fits_within(64, 64));
    }
}
