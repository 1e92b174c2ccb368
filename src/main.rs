use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use sheetsmith::atlas::{AtlasBuilder, extract_frames, replace_frame};
use sheetsmith::cli::{
    CheckArgs, CliArgs, Command, CompressionLevel, PackArgs, PivotArgs, RenameArgs, ReplaceArgs,
    ResizeArgs, SliceArgs,
};
use sheetsmith::config::{CompressConfig, LoadedConfig, SheetConfig, make_relative, save_config};
use sheetsmith::error::SheetError;
use sheetsmith::output::{Alignment, Manifest, Pivot, save_png};
use sheetsmith::packing::needs_resize;
use sheetsmith::resize::resize_files;
use sheetsmith::sprite::{
    LoadOptions, NameMode, NamedImage, collect_png_paths, load_png, load_sprites, sprite_name,
};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    match cli.command {
        Command::Pack(args) => pack(&args),
        Command::Resize(args) => resize(&args),
        Command::Check(args) => check(&args),
        Command::Slice(args) => slice(&args),
        Command::Replace(args) => replace(&args),
        Command::Rename(args) => rename(&args),
        Command::Pivot(args) => pivot(&args),
    }
}

fn pack(args: &PackArgs) -> Result<()> {
    info!("sheetsmith v{}", env!("CARGO_PKG_VERSION"));

    let merged = merge_config_with_args(args)?;

    if !merged.output.exists() {
        fs::create_dir_all(&merged.output)?;
    }

    let mut images: Vec<NamedImage> = Vec::new();
    let mut sheet_pivot = None;

    if let Some(sheet) = &args.sheet {
        let manifest = Manifest::load(&manifest_path_for(sheet, args.sheet_manifest.as_deref()))?;
        let frames = load_sheet_frames(sheet, &manifest, args.skip_last)?;
        info!("Taking {} frames from {}", frames.len(), sheet.display());
        images.extend(frames);
        sheet_pivot = manifest.pivot();
    }

    if !merged.input.is_empty() {
        let options = LoadOptions {
            prefix: merged.prefix.clone(),
            button: merged.button,
            recursive: merged.recursive,
        };
        let sprites = load_sprites(&merged.input, &options)?;
        info!("Loaded {} sprites", sprites.len());
        images.extend(sprites);
    }

    if images.is_empty() {
        return Err(SheetError::NoImages.into());
    }

    let atlas = AtlasBuilder::new(merged.max_columns)
        .padding(merged.padding)
        .square(merged.square)
        .name_mode(merged.name_mode)
        .sheet_name(Some(merged.name.clone()))
        .build(&images)?;

    let png_name = format!("{}.png", merged.name);
    let png_path = merged.output.join(&png_name);
    save_png(&atlas.image, &png_path, merged.opaque, merged.compress)?;
    info!("Saved {}", png_path.display());

    let manifest_path = merged.output.join(format!("{}.json", merged.name));
    // An explicit alignment wins, otherwise the pivot of the sheet being rebuilt is kept
    let pivot = merged
        .pivot
        .or(sheet_pivot)
        .or_else(|| stored_pivot(&manifest_path))
        .unwrap_or_default();
    let manifest = Manifest::from_atlas(&atlas, &png_name, merged.pixels_per_unit, pivot);
    manifest.save(&manifest_path)?;
    info!("Generated {}", manifest_path.display());

    if let Some(config_path) = &args.save_config {
        let config = merged.to_config(config_path);
        save_config(&config, config_path)?;
        info!("Saved settings to {}", config_path.display());
    }

    info!("Done!");

    Ok(())
}

/// Frames of an existing atlas, with the sheet-name prefix stripped from
/// their names so they can be renamed into the new sheet
fn load_sheet_frames(
    sheet: &Path,
    manifest: &Manifest,
    skip_last: Option<usize>,
) -> Result<Vec<NamedImage>> {
    let atlas = load_png(sheet)?;
    let mut frames = extract_frames(&atlas, &manifest.placements(), skip_last.unwrap_or(0))?;

    let prefix = format!("{}_", sprite_name(sheet));
    for frame in &mut frames {
        if let Some(stripped) = frame.name.strip_prefix(&prefix) {
            frame.name = stripped.to_string();
        }
    }

    Ok(frames)
}

/// Pivot recorded in a manifest left by an earlier run, if there is one
fn stored_pivot(path: &Path) -> Option<Pivot> {
    if !path.is_file() {
        return None;
    }
    match Manifest::load(path) {
        Ok(manifest) => manifest.pivot(),
        Err(e) => {
            warn!("Not reusing pivot of {}: {:#}", path.display(), e);
            None
        }
    }
}

fn manifest_path_for(atlas: &Path, manifest: Option<&Path>) -> PathBuf {
    manifest
        .map(Path::to_path_buf)
        .unwrap_or_else(|| atlas.with_extension("json"))
}

fn resize(args: &ResizeArgs) -> Result<()> {
    let paths = collect_png_paths(&args.input, None, args.recursive)?;

    if let Some(output) = &args.output
        && !output.exists()
    {
        fs::create_dir_all(output)?;
    }

    let outcomes = resize_files(
        &paths,
        args.anchor,
        args.output.as_deref(),
        args.compress,
        false,
    )?;
    let resized = outcomes.iter().filter(|o| o.written.is_some()).count();

    info!(
        "Resized {} of {} PNGs ({} already conformed)",
        resized,
        outcomes.len(),
        outcomes.len() - resized
    );

    Ok(())
}

fn check(args: &CheckArgs) -> Result<()> {
    let paths = collect_png_paths(&args.input, None, args.recursive)?;
    let outcomes = resize_files(&paths, Default::default(), None, None, true)?;
    let bad = outcomes
        .iter()
        .filter(|o| needs_resize(o.from.0, o.from.1))
        .count();

    if bad == 0 {
        info!("All {} PNGs have multiple-of-4 dimensions", outcomes.len());
    } else {
        warn!("{} of {} PNGs need resizing", bad, outcomes.len());
    }

    Ok(())
}

fn slice(args: &SliceArgs) -> Result<()> {
    let atlas = load_png(&args.atlas)?;
    let manifest = Manifest::load(&manifest_path_for(&args.atlas, args.manifest.as_deref()))?;
    let frames = extract_frames(&atlas, &manifest.placements(), args.skip_last)?;

    let output = args.output.clone().unwrap_or_else(|| PathBuf::from("."));
    if !output.exists() {
        fs::create_dir_all(&output)?;
    }

    for frame in &frames {
        let path = output.join(format!("{}.png", frame.name));
        save_png(&frame.image, &path, false, None)?;
    }

    info!("Wrote {} frames to {}", frames.len(), output.display());

    Ok(())
}

fn replace(args: &ReplaceArgs) -> Result<()> {
    let atlas = load_png(&args.atlas)?;
    let manifest = Manifest::load(&manifest_path_for(&args.atlas, args.manifest.as_deref()))?;
    let placements = manifest.placements();

    let frame = placements
        .get(args.frame)
        .ok_or(SheetError::FrameIndexOutOfRange {
            index: args.frame,
            count: placements.len(),
        })?;
    let image = load_png(&args.image)?;

    let output = replace_frame(&atlas, frame, &image)?;
    let path = args.output.as_ref().unwrap_or(&args.atlas);
    save_png(&output, path, false, args.compress)?;

    info!("Replaced frame {} ('{}') in {}", args.frame, frame.name, path.display());

    Ok(())
}

fn rename(args: &RenameArgs) -> Result<()> {
    let mut manifest = Manifest::load(&args.manifest)?;

    let sheet = args
        .sheet
        .clone()
        .unwrap_or_else(|| sprite_name(Path::new(&manifest.meta.image)));
    manifest.rename_frames(&sheet);
    manifest.save(&args.manifest)?;

    info!("Renamed {} sprites to {}_<index>", manifest.sprites.len(), sheet);

    Ok(())
}

fn pivot(args: &PivotArgs) -> Result<()> {
    let mut manifest = Manifest::load(&args.manifest)?;

    // clap enforces x and y for the custom alignment
    let pivot = args.alignment.pivot().unwrap_or(Pivot {
        x: args.x.unwrap_or(0.5),
        y: args.y.unwrap_or(0.5),
    });
    manifest.set_pivot(pivot);
    manifest.save(&args.manifest)?;

    info!(
        "Set pivot ({}, {}) on {} sprites",
        pivot.x,
        pivot.y,
        manifest.sprites.len()
    );

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input: Vec<PathBuf>,
    output: PathBuf,
    name: String,
    max_columns: u32,
    padding: u32,
    square: bool,
    name_mode: NameMode,
    prefix: Option<String>,
    button: bool,
    recursive: bool,
    pixels_per_unit: u32,
    alignment: Option<Alignment>,
    /// Resolved from `alignment`, `None` when no alignment was chosen
    pivot: Option<Pivot>,
    opaque: bool,
    compress: Option<CompressionLevel>,
}

impl MergedConfig {
    /// Config file equivalent of these settings, with paths relative to the
    /// directory the config is saved in
    fn to_config(&self, config_path: &Path) -> SheetConfig {
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        SheetConfig {
            input: self.input.iter().map(|p| make_relative(p, base)).collect(),
            output_dir: make_relative(&self.output, base),
            name: Some(self.name.clone()),
            max_columns: self.max_columns,
            padding: self.padding,
            square: self.square,
            name_mode: self.name_mode,
            prefix: self.prefix.clone(),
            button: self.button,
            recursive: self.recursive,
            pixels_per_unit: self.pixels_per_unit,
            alignment: self.alignment,
            pivot: self.pivot.filter(|_| self.alignment == Some(Alignment::Custom)),
            compress: self.compress.map(|c| match c {
                CompressionLevel::Level(n) => CompressConfig::Level(n),
                CompressionLevel::Max => CompressConfig::Max("max".to_string()),
            }),
            opaque: self.opaque,
            ..SheetConfig::default()
        }
    }
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &PackArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };
    let defaults = SheetConfig::default();
    let config = loaded_config
        .as_ref()
        .map(|lc| &lc.config)
        .unwrap_or(&defaults);

    // Input files: CLI args override config
    let input = if !args.input.is_empty() {
        args.input.clone()
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_inputs()
            .context("failed to resolve input files from config")?
    } else {
        Vec::new()
    };

    // Output directory: CLI > config > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    // Name: CLI > config > existing sheet > first input folder > default
    let name = args
        .name
        .clone()
        .or_else(|| config.name.clone())
        .or_else(|| args.sheet.as_deref().map(sprite_name))
        .or_else(|| {
            input
                .iter()
                .find(|p| p.is_dir())
                .and_then(|p| p.canonicalize().ok())
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "atlas".to_string());

    let alignment = args.alignment.or(config.alignment);
    let pivot = match alignment {
        Some(Alignment::Custom) => {
            let custom = match (args.x, args.y) {
                (Some(x), Some(y)) => Some(Pivot { x, y }),
                _ => config.pivot,
            };
            Some(custom.ok_or(SheetError::MissingPivot)?)
        }
        Some(preset) => preset.pivot(),
        None => None,
    };

    let compress = if args.compress.is_some() {
        args.compress
    } else {
        config.compress.as_ref().map(|c| match c {
            CompressConfig::Level(n) => CompressionLevel::Level(*n),
            CompressConfig::Max(_) => CompressionLevel::Max,
        })
    };

    Ok(MergedConfig {
        input,
        output,
        name,
        max_columns: args.columns.unwrap_or(config.max_columns),
        padding: args.padding.unwrap_or(config.padding),
        // Boolean flags: CLI presence sets them to true, otherwise use config
        square: args.square || config.square,
        name_mode: args.name_mode.unwrap_or(config.name_mode),
        prefix: args.prefix.clone().or_else(|| config.prefix.clone()),
        button: args.button || config.button,
        recursive: args.recursive || config.recursive,
        pixels_per_unit: args.pixels_per_unit.unwrap_or(config.pixels_per_unit),
        alignment,
        pivot,
        opaque: args.opaque || config.opaque,
        compress,
    })
}
