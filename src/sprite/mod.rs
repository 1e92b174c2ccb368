mod loader;
mod naming;
mod sprite;

pub use loader::{LoadOptions, collect_png_paths, load_png, load_sprites};
pub use naming::{button_state_name, frame_name, sprite_name};
pub use sprite::{NameMode, NamedImage, PlacementRect};
