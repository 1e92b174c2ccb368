use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use super::types::{CONFIG_VERSION, SheetConfig};

/// A pack config together with the directory it was read from.
///
/// Every path in the file is interpreted relative to that directory.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SheetConfig,
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: SheetConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        if config.version > CONFIG_VERSION {
            warn!(
                "{} has version {}, newer than supported version {}; unknown settings are ignored",
                path.display(),
                config.version,
                CONFIG_VERSION
            );
        }

        let config_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        debug!("Loaded config {} ({} inputs)", path.display(), config.input.len());

        Ok(Self { config, config_dir })
    }

    /// Expand the `input` entries into paths.
    ///
    /// Plain entries are joined onto the config directory as they are. Glob
    /// entries expand to their matches in sorted order; a glob matching
    /// nothing is reported and skipped. Duplicates keep their first position.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut resolved: Vec<PathBuf> = Vec::new();

        for entry in &self.config.input {
            let joined = self.config_dir.join(entry);

            if !is_glob_pattern(entry) {
                push_unique(&mut resolved, joined);
                continue;
            }

            let mut matches = glob::glob(&joined.to_string_lossy())
                .with_context(|| format!("invalid glob pattern: {}", entry))?
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("failed to read glob entry: {}", entry))?;
            matches.sort();

            if matches.is_empty() {
                warn!("Input pattern '{}' matched no files", entry);
            }
            for path in matches {
                push_unique(&mut resolved, path);
            }
        }

        Ok(resolved)
    }

    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("sheet.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_load_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let frames = dir.path().join("frames");
        std::fs::create_dir(&frames).unwrap();
        std::fs::write(frames.join("b.png"), b"").unwrap();
        std::fs::write(frames.join("a.png"), b"").unwrap();
        std::fs::write(frames.join("notes.txt"), b"").unwrap();

        let config_path = write_config(
            dir.path(),
            r#"{ "input": ["frames/*.png", "extra"], "output_dir": "out", "max_columns": 4 }"#,
        );

        let loaded = LoadedConfig::load(&config_path).unwrap();

        assert_eq!(loaded.config.max_columns, 4);
        assert_eq!(loaded.resolve_output_dir(), dir.path().join("out"));
        assert_eq!(
            loaded.resolve_inputs().unwrap(),
            vec![frames.join("a.png"), frames.join("b.png"), dir.path().join("extra")]
        );
    }

    #[test]
    fn test_resolve_skips_empty_globs_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("walk_0.png"), b"").unwrap();

        let config_path = write_config(
            dir.path(),
            r#"{ "input": ["walk_0.png", "walk_*.png", "idle_*.png"] }"#,
        );

        let loaded = LoadedConfig::load(&config_path).unwrap();

        assert_eq!(
            loaded.resolve_inputs().unwrap(),
            vec![dir.path().join("walk_0.png")]
        );
    }

    #[test]
    fn test_newer_version_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path(), r#"{ "version": 99, "padding": 0 }"#);

        let loaded = LoadedConfig::load(&config_path).unwrap();

        assert_eq!(loaded.config.version, 99);
        assert_eq!(loaded.config.padding, 0);
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path(), "{ max_columns: 4 }");

        let err = LoadedConfig::load(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config file"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = LoadedConfig::load(Path::new("/no/such/sheet.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read config file"));
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("frames/*.png"));
        assert!(is_glob_pattern("walk_?.png"));
        assert!(is_glob_pattern("walk_[0-3].png"));
        assert!(!is_glob_pattern("frames"));
        assert!(!is_glob_pattern("frames/walk_0.png"));
    }
}
