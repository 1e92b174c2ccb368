use std::fs;
use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::atlas::Atlas;
use crate::error::SheetError;
use crate::sprite::{PlacementRect, frame_name};

/// Name-to-rect mapping for one atlas image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub meta: ManifestMeta,
    pub sprites: Vec<ManifestSprite>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestMeta {
    pub app: String,
    pub version: String,
    /// Atlas file name, relative to the manifest
    pub image: String,
    pub size: Size,
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSprite {
    pub name: String,
    /// Bottom-left origin, y up
    pub frame: ManifestFrame,
    #[serde(default)]
    pub pivot: Pivot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFrame {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Normalized sprite pivot, (0, 0) being the bottom-left corner of the frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub x: f32,
    pub y: f32,
}

impl Default for Pivot {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

/// Pivot presets
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    #[default]
    Center,
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    /// Explicit pivot coordinates
    Custom,
}

impl Alignment {
    /// Pivot for a preset, `None` for [`Alignment::Custom`]
    pub fn pivot(self) -> Option<Pivot> {
        let (x, y) = match self {
            Alignment::Center => (0.5, 0.5),
            Alignment::TopLeft => (0.0, 1.0),
            Alignment::Top => (0.5, 1.0),
            Alignment::TopRight => (1.0, 1.0),
            Alignment::Left => (0.0, 0.5),
            Alignment::Right => (1.0, 0.5),
            Alignment::BottomLeft => (0.0, 0.0),
            Alignment::Bottom => (0.5, 0.0),
            Alignment::BottomRight => (1.0, 0.0),
            Alignment::Custom => return None,
        };
        Some(Pivot { x, y })
    }
}

fn default_pixels_per_unit() -> u32 {
    100
}

impl From<&PlacementRect> for ManifestFrame {
    fn from(rect: &PlacementRect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            w: rect.width,
            h: rect.height,
        }
    }
}

impl Manifest {
    pub fn from_atlas(atlas: &Atlas, image: &str, pixels_per_unit: u32, pivot: Pivot) -> Self {
        let sprites = atlas
            .placements
            .iter()
            .map(|rect| ManifestSprite {
                name: rect.name.clone(),
                frame: rect.into(),
                pivot,
            })
            .collect();

        Self {
            meta: ManifestMeta {
                app: "sheetsmith".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                image: image.to_string(),
                size: Size {
                    w: atlas.width,
                    h: atlas.height,
                },
                pixels_per_unit,
            },
            sprites,
        }
    }

    /// Placement rects in manifest order
    pub fn placements(&self) -> Vec<PlacementRect> {
        self.sprites
            .iter()
            .map(|s| PlacementRect {
                name: s.name.clone(),
                x: s.frame.x,
                y: s.frame.y,
                width: s.frame.w,
                height: s.frame.h,
            })
            .collect()
    }

    /// Rename every sprite to `<sheet>_<index>`
    pub fn rename_frames(&mut self, sheet: &str) {
        for (i, sprite) in self.sprites.iter_mut().enumerate() {
            sprite.name = frame_name(Some(sheet), &i.to_string());
        }
    }

    /// Pivot of the first sprite, which `set_pivot` keeps shared by all
    pub fn pivot(&self) -> Option<Pivot> {
        self.sprites.first().map(|s| s.pivot)
    }

    pub fn set_pivot(&mut self, pivot: Pivot) {
        for sprite in &mut self.sprites {
            sprite.pivot = pivot;
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SheetError::ManifestRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let manifest = serde_json::from_str(&content).map_err(|e| SheetError::ManifestParse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(manifest)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        fs::write(path, content).map_err(|e| SheetError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}
