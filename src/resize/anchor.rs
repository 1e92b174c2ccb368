use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Where the original content goes when the canvas is enlarged
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorPolicy {
    /// Centered on both axes
    #[default]
    Center,
    /// Flush with the left edge, centered vertically
    Left,
    /// Flush with the right edge, centered vertically
    Right,
    /// Flush with the top edge, centered horizontally
    Top,
    /// Flush with the bottom edge, centered horizontally
    Bottom,
    /// Quadrants pushed to the corners, seams filled with blended pixels
    #[value(name = "stretch-center")]
    StretchCenter,
}

impl AnchorPolicy {
    /// Top-left destination of a `width`x`height` image on a larger canvas.
    ///
    /// Only meaningful for the positioning policies; `StretchCenter` falls back
    /// to centering.
    pub fn offset(self, width: u32, height: u32, new_width: u32, new_height: u32) -> (u32, u32) {
        let gap_x = new_width.saturating_sub(width);
        let gap_y = new_height.saturating_sub(height);

        let dx = match self {
            AnchorPolicy::Left => 0,
            AnchorPolicy::Right => gap_x,
            _ => gap_x / 2,
        };
        let dy = match self {
            AnchorPolicy::Top => 0,
            AnchorPolicy::Bottom => gap_y,
            _ => gap_y / 2,
        };
        (dx, dy)
    }
}
