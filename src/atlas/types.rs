use image::RgbaImage;

use crate::packing::GridLayout;
use crate::sprite::PlacementRect;

/// A composited sprite sheet and the rectangles that slice it back into frames
#[derive(Debug, Clone)]
pub struct Atlas {
    pub width: u32,
    pub height: u32,
    /// Rendered atlas image
    pub image: RgbaImage,
    /// One rect per packed frame, in input order
    pub placements: Vec<PlacementRect>,
    /// Grid the frames were laid out on
    pub layout: GridLayout,
}

impl Atlas {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            width: layout.canvas_width,
            height: layout.canvas_height,
            image: RgbaImage::new(layout.canvas_width, layout.canvas_height),
            placements: Vec::new(),
            layout,
        }
    }
}
