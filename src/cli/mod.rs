mod args;

pub use args::{
    CheckArgs, CliArgs, Command, CompressionLevel, PackArgs, PivotArgs, RenameArgs, ReplaceArgs,
    ResizeArgs, SliceArgs,
};
