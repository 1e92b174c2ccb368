use anyhow::Result;
use image::imageops;
use log::{debug, info};

use super::Atlas;
use crate::error::SheetError;
use crate::packing::GridLayout;
use crate::sprite::{NameMode, NamedImage, PlacementRect, frame_name};

/// Configuration for grid atlas building
#[derive(Debug, Clone)]
pub struct AtlasBuilder {
    pub max_columns: u32,
    pub padding: u32,
    pub square: bool,
    pub name_mode: NameMode,
    /// Prepended to every frame name as `<sheet>_<suffix>`
    pub sheet_name: Option<String>,
}

impl AtlasBuilder {
    pub fn new(max_columns: u32) -> Self {
        Self {
            max_columns,
            padding: 2,
            square: false,
            name_mode: NameMode::Image,
            sheet_name: None,
        }
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn square(mut self, square: bool) -> Self {
        self.square = square;
        self
    }

    pub fn name_mode(mut self, name_mode: NameMode) -> Self {
        self.name_mode = name_mode;
        self
    }

    pub fn sheet_name(mut self, sheet_name: Option<String>) -> Self {
        self.sheet_name = sheet_name;
        self
    }

    /// Lay the images out on a uniform grid and composite them into one atlas.
    ///
    /// Frames are placed in row-major order, each centered in its cell. Every
    /// placement rect has the full cell size so frame pitch stays constant
    /// even when source images differ in size.
    pub fn build(&self, images: &[NamedImage]) -> Result<Atlas> {
        if let Some(empty) = images.iter().find(|i| i.width() == 0 || i.height() == 0) {
            return Err(SheetError::EmptyImage {
                name: empty.name.clone(),
                width: empty.width(),
                height: empty.height(),
            }
            .into());
        }

        let sizes: Vec<(u32, u32)> = images.iter().map(|i| (i.width(), i.height())).collect();
        let layout = GridLayout::compute(&sizes, self.max_columns, self.padding, self.square)?;
        let mut atlas = Atlas::new(layout);

        for (index, sprite) in (0u32..).zip(images) {
            let (x, y) = layout.centered_offset(index, sprite.width(), sprite.height());
            imageops::overlay(&mut atlas.image, &sprite.image, x, y);

            let (rect_x, rect_y) = layout.cell_bottom_left(index);
            let suffix = match self.name_mode {
                NameMode::Image => sprite.name.clone(),
                NameMode::Ordinal => index.to_string(),
            };
            let placement = PlacementRect {
                name: frame_name(self.sheet_name.as_deref(), &suffix),
                x: rect_x,
                y: rect_y,
                width: layout.cell_width,
                height: layout.cell_height,
            };

            debug!(
                "Frame {} '{}' drawn at ({}, {}), rect ({}, {})",
                index, placement.name, x, y, placement.x, placement.y
            );
            atlas.placements.push(placement);
        }

        info!(
            "Atlas {}x{}: {} frames on a {}x{} grid of {}x{} cells",
            atlas.width,
            atlas.height,
            atlas.placements.len(),
            layout.columns,
            layout.rows,
            layout.cell_width,
            layout.cell_height,
        );

        Ok(atlas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, error_kind};
    use image::{Rgba, RgbaImage};

    fn solid(name: &str, width: u32, height: u32, color: [u8; 4]) -> NamedImage {
        NamedImage::new(name, RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    #[test]
    fn test_five_frames_three_columns() {
        let images: Vec<_> = (0..5)
            .map(|i| solid(&format!("f{}", i), 30, 30, [255, 0, 0, 255]))
            .collect();

        let atlas = AtlasBuilder::new(3).padding(2).build(&images).unwrap();

        assert_eq!((atlas.width, atlas.height), (104, 68));
        assert_eq!(atlas.placements.len(), 5);
        for p in &atlas.placements {
            assert_eq!((p.width, p.height), (32, 32));
        }

        // Last row only holds two frames
        let bottom_row: Vec<_> = atlas.placements.iter().filter(|p| p.y == 2).collect();
        assert_eq!(bottom_row.len(), 2);
        assert_eq!(atlas.placements[3].x, 0);
        assert_eq!(atlas.placements[4].x, 34);
        assert_eq!(atlas.placements[0].y, 36);
    }

    #[test]
    fn test_frames_centered_in_cells() {
        let images = vec![
            solid("big", 8, 8, [0, 0, 255, 255]),
            solid("small", 2, 2, [0, 255, 0, 255]),
        ];

        let atlas = AtlasBuilder::new(2).padding(0).build(&images).unwrap();

        assert_eq!((atlas.width, atlas.height), (16, 8));
        // Small frame sits at (8 + 3, 3) in raster space
        assert_eq!(*atlas.image.get_pixel(11, 3), Rgba([0, 255, 0, 255]));
        assert_eq!(*atlas.image.get_pixel(12, 4), Rgba([0, 255, 0, 255]));
        assert_eq!(atlas.image.get_pixel(10, 3)[3], 0);
        assert_eq!(atlas.image.get_pixel(13, 3)[3], 0);
        assert_eq!(*atlas.image.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_padding_and_unused_cells_stay_transparent() {
        let images: Vec<_> = (0..3)
            .map(|i| solid(&i.to_string(), 4, 4, [9, 9, 9, 255]))
            .collect();

        let atlas = AtlasBuilder::new(2).padding(4).build(&images).unwrap();

        assert_eq!((atlas.width, atlas.height), (16, 16));
        // Padding column between the two top cells
        assert_eq!(atlas.image.get_pixel(5, 0)[3], 0);
        // Unfilled bottom-right cell
        assert_eq!(atlas.image.get_pixel(9, 9)[3], 0);
        assert_eq!(atlas.image.get_pixel(8, 8)[3], 0);
        assert_eq!(atlas.image.get_pixel(0, 8)[3], 255);
    }

    #[test]
    fn test_name_modes() {
        let images = vec![solid("walk_a", 4, 4, [1, 1, 1, 255]), solid("walk_b", 4, 4, [2, 2, 2, 255])];

        // Image names unless ordinal naming is asked for
        let by_image = AtlasBuilder::new(4).build(&images).unwrap();
        let names: Vec<_> = by_image.placements.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["walk_a", "walk_b"]);

        let ordinal = AtlasBuilder::new(4)
            .name_mode(NameMode::Ordinal)
            .build(&images)
            .unwrap();
        let names: Vec<_> = ordinal.placements.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["0", "1"]);

        let sheet = AtlasBuilder::new(4)
            .sheet_name(Some("hero".to_string()))
            .build(&images)
            .unwrap();
        assert_eq!(sheet.placements[1].name, "hero_walk_b");

        let sheet_ordinal = AtlasBuilder::new(4)
            .name_mode(NameMode::Ordinal)
            .sheet_name(Some("hero".to_string()))
            .build(&images)
            .unwrap();
        assert_eq!(sheet_ordinal.placements[1].name, "hero_1");
    }

    #[test]
    fn test_square_canvas() {
        let images: Vec<_> = (0..4).map(|i| solid(&i.to_string(), 10, 6, [1, 2, 3, 255])).collect();

        let atlas = AtlasBuilder::new(4).padding(0).square(true).build(&images).unwrap();

        assert_eq!((atlas.width, atlas.height), (48, 48));
        // Placement rects still measure from the bottom of the square canvas
        assert_eq!(atlas.placements[0].y, 40);
    }

    #[test]
    fn test_dimensions_always_multiple_of_4() {
        for count in 1..12u32 {
            for columns in 1..6 {
                for padding in 0..4 {
                    let images: Vec<_> = (0..count)
                        .map(|i| solid(&i.to_string(), 5 + i, 3 + 2 * i, [1, 1, 1, 255]))
                        .collect();
                    let atlas = AtlasBuilder::new(columns).padding(padding).build(&images).unwrap();

                    assert_eq!(atlas.width % 4, 0);
                    assert_eq!(atlas.height % 4, 0);
                    assert_eq!(atlas.placements.len(), images.len());
                    for p in &atlas.placements {
                        assert!(p.fits_within(atlas.width, atlas.height));
                    }
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let images: Vec<_> = (0..6)
            .map(|i| {
                let mut img = RgbaImage::new(5 + i, 7);
                for (x, y, px) in img.enumerate_pixels_mut() {
                    *px = Rgba([(x * 40) as u8, (y * 30) as u8, i as u8, 128]);
                }
                NamedImage::new(i.to_string(), img)
            })
            .collect();

        let builder = AtlasBuilder::new(4).padding(1);
        let a = builder.build(&images).unwrap();
        let b = builder.build(&images).unwrap();

        assert_eq!(a.image.as_raw(), b.image.as_raw());
        assert_eq!(a.placements, b.placements);
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = AtlasBuilder::new(3).build(&[]).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_zero_columns_rejected() {
        let images = vec![solid("a", 4, 4, [0, 0, 0, 255])];
        let err = AtlasBuilder::new(0).build(&images).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        let images = vec![solid("a", 4, 4, [0, 0, 0, 255]), NamedImage::new("empty", RgbaImage::new(0, 3))];
        let err = AtlasBuilder::new(3).build(&images).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SheetError>(),
            Some(SheetError::EmptyImage { name, .. }) if name == "empty"
        ));
    }
}
