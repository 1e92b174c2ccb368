pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod packing;
pub mod resize;
pub mod sprite;

pub use atlas::{Atlas, AtlasBuilder, extract_frames, replace_frame};
pub use error::{ErrorKind, SheetError};
pub use packing::GridLayout;
pub use resize::{AnchorPolicy, resize_canvas};
pub use sprite::{NameMode, NamedImage, PlacementRect};
