use anyhow::Result;

use super::Rect;
use crate::error::SheetError;

/// Round up to the nearest multiple of 4 (block-compression friendly)
pub fn round_up_to_multiple_of_4(value: u32) -> Option<u32> {
    value.checked_next_multiple_of(4)
}

/// Returns true if an image of this size needs resizing to meet the
/// multiple-of-4 constraint
pub fn needs_resize(width: u32, height: u32) -> bool {
    width % 4 != 0 || height % 4 != 0
}

/// Uniform grid of frame cells, derived from the images of one packing call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Widest image, rounded up to a multiple of 4
    pub cell_width: u32,
    /// Tallest image, rounded up to a multiple of 4
    pub cell_height: u32,
    pub columns: u32,
    pub rows: u32,
    /// Gap after every cell, right and below
    pub padding: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl GridLayout {
    /// Compute the grid for images of the given sizes.
    pub fn compute(
        sizes: &[(u32, u32)],
        max_columns: u32,
        padding: u32,
        square: bool,
    ) -> Result<Self> {
        if sizes.is_empty() {
            return Err(SheetError::NoImages.into());
        }
        if max_columns < 1 {
            return Err(SheetError::InvalidColumns.into());
        }

        let max_w = sizes.iter().map(|&(w, _)| w).max().unwrap_or(0);
        let max_h = sizes.iter().map(|&(_, h)| h).max().unwrap_or(0);
        let count = u32::try_from(sizes.len()).unwrap_or(u32::MAX);

        let columns = max_columns.min(count);
        let rows = count.div_ceil(max_columns);

        let too_large = || SheetError::AtlasTooLarge {
            columns,
            rows,
            cell_width: max_w,
            cell_height: max_h,
        };

        let cell_width = round_up_to_multiple_of_4(max_w).ok_or_else(too_large)?;
        let cell_height = round_up_to_multiple_of_4(max_h).ok_or_else(too_large)?;

        let canvas_width = cell_width
            .checked_add(padding)
            .and_then(|pitch| pitch.checked_mul(columns))
            .and_then(round_up_to_multiple_of_4)
            .ok_or_else(too_large)?;
        let canvas_height = cell_height
            .checked_add(padding)
            .and_then(|pitch| pitch.checked_mul(rows))
            .and_then(round_up_to_multiple_of_4)
            .ok_or_else(too_large)?;

        let (canvas_width, canvas_height) = if square {
            let side = canvas_width.max(canvas_height);
            (side, side)
        } else {
            (canvas_width, canvas_height)
        };

        Ok(Self {
            cell_width,
            cell_height,
            columns,
            rows,
            padding,
            canvas_width,
            canvas_height,
        })
    }

    /// Row and column of the cell holding the frame at `index` (row-major)
    pub fn cell_position(&self, index: u32) -> (u32, u32) {
        (index / self.columns, index % self.columns)
    }

    /// Cell rectangle in top-left raster space
    pub fn cell_rect(&self, index: u32) -> Rect {
        let (row, col) = self.cell_position(index);
        Rect::new(
            col * (self.cell_width + self.padding),
            row * (self.cell_height + self.padding),
            self.cell_width,
            self.cell_height,
        )
    }

    /// Cell origin flipped to bottom-left space, as used by placement rects
    pub fn cell_bottom_left(&self, index: u32) -> (u32, u32) {
        let (row, col) = self.cell_position(index);
        let x = col * (self.cell_width + self.padding);
        let y = self.canvas_height - row * (self.cell_height + self.padding) - self.cell_height;
        (x, y)
    }

    /// Top-left raster position that centers an image of the given size in its cell
    pub fn centered_offset(&self, index: u32, width: u32, height: u32) -> (i64, i64) {
        let cell = self.cell_rect(index);
        let dx = (i64::from(self.cell_width) - i64::from(width)) / 2;
        let dy = (i64::from(self.cell_height) - i64::from(height)) / 2;
        (i64::from(cell.x) + dx, i64::from(cell.y) + dy)
    }
}
