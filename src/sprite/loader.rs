use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageReader, RgbaImage};
use log::{debug, info};
use rayon::prelude::*;

use super::{NamedImage, button_state_name, sprite_name};
use crate::error::SheetError;

/// Options controlling which files become sprites and how they are named
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Only keep files whose name starts with this prefix
    pub prefix: Option<String>,
    /// Rename UI button frames to ordered state names (01_normal, 02_highlighted, ...)
    pub button: bool,
    /// Descend into subdirectories
    pub recursive: bool,
}

/// Load PNG sprites from input paths (files or directories).
///
/// Sprites are sorted by their final name, after the button renaming is
/// applied, so the order of frames on the sheet is stable across runs.
pub fn load_sprites(inputs: &[impl AsRef<Path>], options: &LoadOptions) -> Result<Vec<NamedImage>> {
    let paths = collect_png_paths(inputs, options.prefix.as_deref(), options.recursive)?;

    if paths.is_empty() {
        return Err(SheetError::NoImages.into());
    }

    let mut named: Vec<(PathBuf, String)> = paths
        .into_iter()
        .map(|path| {
            let name = sprite_name(&path);
            let name = if options.button {
                button_state_name(&name)
            } else {
                name
            };
            (path, name)
        })
        .collect();
    named.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    info!("Loading {} images...", named.len());

    let sprites = named
        .into_par_iter()
        .map(|(path, name)| -> Result<NamedImage> {
            let image = load_png(&path)?;
            debug!("Loaded '{}' ({}x{})", name, image.width(), image.height());
            Ok(NamedImage {
                path: Some(path),
                name,
                image,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(sprites)
}

/// Collect PNG files from the given inputs.
///
/// Directories are listed (recursively if requested) and filtered by a
/// case-insensitive `.png` extension and an optional file name prefix.
/// The result is sorted and free of duplicates.
pub fn collect_png_paths(
    inputs: &[impl AsRef<Path>],
    prefix: Option<&str>,
    recursive: bool,
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(SheetError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_png(path) && has_prefix(path, prefix) {
                paths.push(path.to_path_buf());
            }
        } else if path.is_dir() {
            collect_from_directory(path, prefix, recursive, &mut paths)?;
        }
    }

    paths.sort();
    paths.dedup();
    Ok(paths)
}

fn collect_from_directory(
    dir: &Path,
    prefix: Option<&str>,
    recursive: bool,
    paths: &mut Vec<PathBuf>,
) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();

        if path.is_file() && is_png(&path) && has_prefix(&path, prefix) {
            paths.push(path);
        } else if recursive && path.is_dir() {
            collect_from_directory(&path, prefix, recursive, paths)?;
        }
    }

    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

fn has_prefix(path: &Path, prefix: Option<&str>) -> bool {
    let Some(prefix) = prefix else {
        return true;
    };
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.starts_with(prefix))
}

/// Decode an image file into RGBA8
pub fn load_png(path: &Path) -> Result<RgbaImage> {
    let img = ImageReader::open(path)
        .map_err(|e| SheetError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| SheetError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, error_kind};
    use image::Rgba;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_collect_filters_extension_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 2, 2);
        write_png(dir.path(), "b.PNG", 2, 2);
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let paths = collect_png_paths(&[dir.path()], None, false).unwrap();
        let names: Vec<_> = paths.iter().map(|p| sprite_name(p)).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_collect_prefix_filter() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "run_0.png", 2, 2);
        write_png(dir.path(), "run_1.png", 2, 2);
        write_png(dir.path(), "idle_0.png", 2, 2);

        let paths = collect_png_paths(&[dir.path()], Some("run_"), false).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| sprite_name(p).starts_with("run_")));
    }

    #[test]
    fn test_collect_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        write_png(dir.path(), "top.png", 2, 2);
        write_png(&nested, "deep.png", 2, 2);

        assert_eq!(collect_png_paths(&[dir.path()], None, false).unwrap().len(), 1);
        assert_eq!(collect_png_paths(&[dir.path()], None, true).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_input() {
        let err = collect_png_paths(&[Path::new("/definitely/not/here")], None, false).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_load_sorts_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "walk_10.png", 3, 3);
        write_png(dir.path(), "walk_02.png", 4, 4);
        write_png(dir.path(), "walk_01.png", 5, 5);

        let sprites = load_sprites(&[dir.path()], &LoadOptions::default()).unwrap();
        let names: Vec<_> = sprites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["walk_01", "walk_02", "walk_10"]);
        assert_eq!(sprites[0].width(), 5);
        assert_eq!(sprites[2].height(), 3);
    }

    #[test]
    fn test_load_button_naming_orders_states() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "btn_disabled.png", 2, 2);
        write_png(dir.path(), "btn_hover.png", 2, 2);
        write_png(dir.path(), "btn_normal.png", 2, 2);
        write_png(dir.path(), "btn_pressed.png", 2, 2);

        let options = LoadOptions {
            button: true,
            ..LoadOptions::default()
        };
        let sprites = load_sprites(&[dir.path()], &options).unwrap();
        let names: Vec<_> = sprites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["01_normal", "02_highlighted", "03_pressed", "04_disabled"]
        );
    }

    #[test]
    fn test_load_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_sprites(&[dir.path()], &LoadOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SheetError>(),
            Some(SheetError::NoImages)
        ));
    }
}
