mod anchor;
mod batch;
mod canvas;

pub use anchor::AnchorPolicy;
pub use batch::{ResizeOutcome, resize_files};
pub use canvas::resize_canvas;
