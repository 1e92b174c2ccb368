use serde::{Deserialize, Serialize};

use crate::output::{Alignment, Pivot};
use crate::sprite::NameMode;

/// Highest config file version this build understands
pub const CONFIG_VERSION: u32 = 1;

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Pack configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Config file version, see [`CONFIG_VERSION`]
    pub version: u32,
    /// Input file paths, directories or glob patterns
    pub input: Vec<String>,
    /// Output directory for the atlas and manifest
    pub output_dir: String,
    /// Sheet name; defaults to the first input folder's name
    pub name: Option<String>,
    /// Maximum frames per row
    pub max_columns: u32,
    /// Padding after each cell in pixels
    pub padding: u32,
    /// Force a square atlas
    pub square: bool,
    /// Frame naming mode
    pub name_mode: NameMode,
    /// Only pack files whose name starts with this prefix
    pub prefix: Option<String>,
    /// Rename UI button state frames
    pub button: bool,
    /// Descend into subdirectories of input folders
    pub recursive: bool,
    /// Pixels per unit recorded in the manifest
    pub pixels_per_unit: u32,
    /// Pivot preset for every frame
    pub alignment: Option<Alignment>,
    /// Pivot coordinates for the custom alignment
    pub pivot: Option<Pivot>,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Output RGB instead of RGBA (opaque atlas)
    pub opaque: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            input: Vec::new(),
            output_dir: ".".to_string(),
            name: None,
            max_columns: 8,
            padding: 2,
            square: false,
            name_mode: NameMode::Ordinal,
            prefix: None,
            button: false,
            recursive: false,
            pixels_per_unit: 100,
            alignment: None,
            pivot: None,
            compress: None,
            opaque: false,
        }
    }
}
