mod grid;
mod rect;

pub use grid::{GridLayout, needs_resize, round_up_to_multiple_of_4};
pub use rect::Rect;
