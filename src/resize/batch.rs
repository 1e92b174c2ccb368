use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{info, warn};
use rayon::prelude::*;

use super::{AnchorPolicy, resize_canvas};
use crate::cli::CompressionLevel;
use crate::error::SheetError;
use crate::output::save_png;
use crate::packing::needs_resize;
use crate::sprite::load_png;

/// What happened to one file in a batch resize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeOutcome {
    pub source: PathBuf,
    /// Where the result was written, `None` if the file already conformed
    pub written: Option<PathBuf>,
    pub from: (u32, u32),
    pub to: (u32, u32),
}

/// Resize every PNG that is not a multiple of 4 in both dimensions.
///
/// Files are overwritten in place unless `output_dir` is given, in which case
/// results are written there under the same file name. Two inputs sharing a
/// file name would overwrite each other there, so that fails before anything
/// is written. With `dry_run` set nothing is written and non-conforming files
/// are only reported.
pub fn resize_files(
    paths: &[PathBuf],
    policy: AnchorPolicy,
    output_dir: Option<&Path>,
    compress: Option<CompressionLevel>,
    dry_run: bool,
) -> Result<Vec<ResizeOutcome>> {
    if let Some(dir) = output_dir
        && !dry_run
    {
        check_unique_targets(paths, dir)?;
    }

    let outcomes = paths
        .par_iter()
        .map(|path| -> Result<ResizeOutcome> {
            let image = load_png(path)?;
            let from = image.dimensions();

            if !needs_resize(from.0, from.1) {
                return Ok(ResizeOutcome {
                    source: path.clone(),
                    written: None,
                    from,
                    to: from,
                });
            }

            if dry_run {
                warn!(
                    "{} has incorrect size ({}x{})",
                    path.display(),
                    from.0,
                    from.1
                );
                return Ok(ResizeOutcome {
                    source: path.clone(),
                    written: None,
                    from,
                    to: from,
                });
            }

            let resized = resize_canvas(&image, policy)?;
            let target = target_path(path, output_dir);
            save_png(&resized, &target, false, compress)?;

            info!(
                "Resized {} from {}x{} to {}x{}",
                target.display(),
                from.0,
                from.1,
                resized.width(),
                resized.height()
            );

            Ok(ResizeOutcome {
                source: path.clone(),
                written: Some(target),
                from,
                to: resized.dimensions(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(outcomes)
}

fn target_path(path: &Path, output_dir: Option<&Path>) -> PathBuf {
    match (output_dir, path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

fn check_unique_targets(paths: &[PathBuf], output_dir: &Path) -> Result<()> {
    let mut seen: HashMap<PathBuf, &PathBuf> = HashMap::with_capacity(paths.len());

    for path in paths {
        let target = target_path(path, Some(output_dir));
        if let Some(first) = seen.get(&target) {
            return Err(SheetError::DuplicateOutput {
                first: (*first).clone(),
                second: path.clone(),
                target,
            }
            .into());
        }
        seen.insert(target, path);
    }

    Ok(())
}
