use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`SheetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing arguments; nothing was produced
    InvalidInput,
    /// Decode, encode, or filesystem failure
    Io,
}

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error("Image '{name}' has zero size ({width}x{height})")]
    EmptyImage {
        name: String,
        width: u32,
        height: u32,
    },

    #[error("Maximum column count must be at least 1")]
    InvalidColumns,

    #[error("Atlas dimensions overflow for {columns}x{rows} cells of {cell_width}x{cell_height}")]
    AtlasTooLarge {
        columns: u32,
        rows: u32,
        cell_width: u32,
        cell_height: u32,
    },

    #[error(
        "Frame '{name}' ({x}, {y}, {width}x{height}) lies outside the {atlas_width}x{atlas_height} atlas"
    )]
    FrameOutOfBounds {
        name: String,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        atlas_width: u32,
        atlas_height: u32,
    },

    #[error("Frame index {index} out of range (manifest has {count} sprites)")]
    FrameIndexOutOfRange { index: usize, count: usize },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read manifest '{path}': {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse manifest '{path}': {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("'{first}' and '{second}' would both be written to '{target}'")]
    DuplicateOutput {
        first: PathBuf,
        second: PathBuf,
        target: PathBuf,
    },

    #[error("Custom alignment needs pivot coordinates")]
    MissingPivot,
}

impl SheetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SheetError::NoImages
            | SheetError::EmptyImage { .. }
            | SheetError::InvalidColumns
            | SheetError::AtlasTooLarge { .. }
            | SheetError::FrameOutOfBounds { .. }
            | SheetError::FrameIndexOutOfRange { .. }
            | SheetError::InputNotFound(_)
            | SheetError::DuplicateOutput { .. }
            | SheetError::MissingPivot => ErrorKind::InvalidInput,
            SheetError::ImageLoad { .. }
            | SheetError::ImageSave { .. }
            | SheetError::OutputWrite { .. }
            | SheetError::ManifestRead { .. }
            | SheetError::ManifestParse { .. }
            | SheetError::PngCompress { .. } => ErrorKind::Io,
        }
    }
}

/// Returns the [`ErrorKind`] of an error if it originated as a [`SheetError`].
pub fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.downcast_ref::<SheetError>().map(SheetError::kind)
}
