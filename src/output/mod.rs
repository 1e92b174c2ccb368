mod manifest;
mod png;

pub use manifest::{Alignment, Manifest, ManifestFrame, ManifestMeta, ManifestSprite, Pivot, Size};
pub use png::{encode_png, save_png};
