use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::Alignment;
use crate::resize::AnchorPolicy;
use crate::sprite::NameMode;

#[derive(Parser, Debug)]
#[command(name = "sheetsmith")]
#[command(version, about = "Sprite sheet packer and multiple-of-4 PNG resizer", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Pack sprites into a grid atlas and write its JSON manifest
    Pack(PackArgs),
    /// Grow PNGs to dimensions that are multiples of 4
    Resize(ResizeArgs),
    /// List PNGs whose dimensions are not multiples of 4
    Check(CheckArgs),
    /// Cut an atlas back into one PNG per frame
    Slice(SliceArgs),
    /// Replace a single frame of an atlas
    Replace(ReplaceArgs),
    /// Rename manifest sprites to <sheet>_<index>
    Rename(RenameArgs),
    /// Set the pivot of every sprite in a manifest
    Pivot(PivotArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PackArgs {
    /// Input PNG files or directories
    #[arg(required_unless_present_any = ["config", "sheet"])]
    pub input: Vec<PathBuf>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the effective settings to a JSON config file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Output directory for the atlas and manifest [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sheet name, used for output files and frame names [default: input folder name]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Maximum frames per row [default: 8]
    #[arg(long, value_name = "N")]
    pub columns: Option<u32>,

    /// Padding after each cell in pixels [default: 2]
    #[arg(short, long)]
    pub padding: Option<u32>,

    /// Force a square atlas
    #[arg(long)]
    pub square: bool,

    /// Frame naming: by frame index or by image name [default: ordinal]
    #[arg(long, value_enum)]
    pub name_mode: Option<NameMode>,

    /// Only pack files whose name starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Treat inputs as UI button states (normal, highlighted, pressed, disabled)
    #[arg(long)]
    pub button: bool,

    /// Descend into subdirectories of input folders
    #[arg(short, long)]
    pub recursive: bool,

    /// Existing atlas whose frames are packed first
    #[arg(long, value_name = "PNG")]
    pub sheet: Option<PathBuf>,

    /// Manifest of --sheet [default: the atlas path with a .json extension]
    #[arg(long, value_name = "JSON", requires = "sheet")]
    pub sheet_manifest: Option<PathBuf>,

    /// Drop the last N frames of --sheet
    #[arg(long, value_name = "N", requires = "sheet")]
    pub skip_last: Option<usize>,

    /// Pixels per unit recorded in the manifest [default: 100]
    #[arg(long)]
    pub pixels_per_unit: Option<u32>,

    /// Pivot preset recorded for every frame [default: the existing sheet's pivot, else center]
    #[arg(long, value_enum)]
    pub alignment: Option<Alignment>,

    /// Custom pivot x (0 = left edge), required with --alignment custom
    #[arg(short, long, required_if_eq("alignment", "custom"))]
    pub x: Option<f32>,

    /// Custom pivot y (0 = bottom edge), required with --alignment custom
    #[arg(short, long, required_if_eq("alignment", "custom"))]
    pub y: Option<f32>,

    /// Output RGB instead of RGBA (opaque atlas)
    #[arg(long)]
    pub opaque: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,
}

#[derive(Args, Debug, Clone)]
pub struct ResizeArgs {
    /// Input PNG files or directories
    #[arg(required = true)]
    pub input: Vec<PathBuf>,

    /// Where the original content goes on the enlarged canvas
    #[arg(short, long, value_enum, default_value_t = AnchorPolicy::Center)]
    pub anchor: AnchorPolicy,

    /// Write results to this directory instead of overwriting the inputs
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Descend into subdirectories of input folders
    #[arg(short, long)]
    pub recursive: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Input PNG files or directories
    #[arg(required = true)]
    pub input: Vec<PathBuf>,

    /// Descend into subdirectories of input folders
    #[arg(short, long)]
    pub recursive: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SliceArgs {
    /// Atlas PNG
    pub atlas: PathBuf,

    /// Manifest describing the atlas [default: the atlas path with a .json extension]
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Output directory for the frames [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Drop the last N frames
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub skip_last: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ReplaceArgs {
    /// Atlas PNG
    pub atlas: PathBuf,

    /// Index of the frame to replace, in manifest order
    #[arg(short, long)]
    pub frame: usize,

    /// Replacement image
    #[arg(short, long)]
    pub image: PathBuf,

    /// Manifest describing the atlas [default: the atlas path with a .json extension]
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Output file [default: overwrite the atlas]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,
}

#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    /// Manifest to rewrite
    pub manifest: PathBuf,

    /// Sheet name prefix [default: the atlas file name without extension]
    #[arg(short, long)]
    pub sheet: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PivotArgs {
    /// Manifest to rewrite
    pub manifest: PathBuf,

    /// Pivot preset
    #[arg(short, long, value_enum)]
    pub alignment: Alignment,

    /// Custom pivot x (0 = left edge), required with --alignment custom
    #[arg(short, long, required_if_eq("alignment", "custom"))]
    pub x: Option<f32>,

    /// Custom pivot y (0 = bottom edge), required with --alignment custom
    #[arg(short, long, required_if_eq("alignment", "custom"))]
    pub y: Option<f32>,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}
