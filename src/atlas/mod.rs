mod builder;
mod frames;
mod types;

pub use builder::AtlasBuilder;
pub use frames::{extract_frames, replace_frame};
pub use types::Atlas;
