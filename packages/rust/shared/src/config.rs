//! Application configuration for mdparts.
//!
//! User config lives at `~/.mdparts/mdparts.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MdPartsError, Result};
use crate::types::SortOrder;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "mdparts.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".mdparts";

// ---------------------------------------------------------------------------
// Config structs (matching mdparts.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Merge behavior.
    #[serde(default)]
    pub merge: MergeSection,
}

/// `[merge]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSection {
    /// Leading part of every merged file name (`part_` → `part_01.md`).
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Leave a directory's own merged file out of its inputs.
    #[serde(default = "default_true")]
    pub exclude_output: bool,

    /// Ordering applied to directories and files.
    #[serde(default)]
    pub sort: SortOrder,

    /// Record per-directory failures and continue instead of aborting.
    #[serde(default)]
    pub keep_going: bool,
}

impl Default for MergeSection {
    fn default() -> Self {
        Self {
            output_prefix: default_output_prefix(),
            exclude_output: true,
            sort: SortOrder::default(),
            keep_going: false,
        }
    }
}

fn default_output_prefix() -> String {
    "part_".into()
}
fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Merge options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime merge configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Leading part of the merged file name.
    pub output_prefix: String,
    /// Whether the merged file is excluded from its own inputs.
    pub exclude_output: bool,
    /// Name ordering.
    pub sort: SortOrder,
    /// Continue past failing directories.
    pub keep_going: bool,
    /// Report what would be written without touching the filesystem.
    pub dry_run: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for MergeOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            output_prefix: config.merge.output_prefix.clone(),
            exclude_output: config.merge.exclude_output,
            sort: config.merge.sort,
            keep_going: config.merge.keep_going,
            dry_run: false,
        }
    }
}

impl MergeOptions {
    /// Reject settings that would produce unusable output names.
    pub fn validate(&self) -> Result<()> {
        if self.output_prefix.is_empty() {
            return Err(MdPartsError::validation("output_prefix must not be empty"));
        }
        if self.output_prefix.contains(['/', '\\']) {
            return Err(MdPartsError::validation(format!(
                "output_prefix '{}' must not contain a path separator",
                self.output_prefix
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.mdparts/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| MdPartsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.mdparts/mdparts.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MdPartsError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        MdPartsError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    init_config_at(&path)?;
    Ok(path)
}

/// Write a default config file to `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| MdPartsError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| MdPartsError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| MdPartsError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_prefix"));
        assert!(toml_str.contains("part_"));
        assert!(toml_str.contains("lexical"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.merge.output_prefix, "part_");
        assert!(parsed.merge.exclude_output);
        assert!(!parsed.merge.keep_going);
    }

    #[test]
    fn partial_section_fills_defaults() {
        let toml_str = r#"
[merge]
sort = "natural"
keep_going = true
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.merge.sort, SortOrder::Natural);
        assert!(config.merge.keep_going);
        assert_eq!(config.merge.output_prefix, "part_");
        assert!(config.merge.exclude_output);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: AppConfig = toml::from_str("").expect("parse");
        assert_eq!(config.merge.sort, SortOrder::Lexical);
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let result: std::result::Result<AppConfig, _> =
            toml::from_str("[merge]\nsort = \"random\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn merge_options_from_app_config() {
        let mut app = AppConfig::default();
        app.merge.output_prefix = "chapter_".into();
        let opts = MergeOptions::from(&app);
        assert_eq!(opts.output_prefix, "chapter_");
        assert!(opts.exclude_output);
        assert!(!opts.dry_run);
    }

    #[test]
    fn options_validation() {
        let mut opts = MergeOptions::default();
        assert!(opts.validate().is_ok());

        opts.output_prefix = String::new();
        assert!(opts.validate().is_err());

        opts.output_prefix = "out/part_".into();
        let err = opts.validate().unwrap_err();
        assert!(err.to_string().contains("path separator"));
    }

    #[test]
    fn load_config_from_reports_parse_errors() {
        let dir = std::env::temp_dir().join(format!("mdparts-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("mdparts.toml");
        std::fs::write(&path, "[merge\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, MdPartsError::Config { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn init_config_at_writes_loadable_file() {
        let dir = std::env::temp_dir().join(format!("mdparts-config-test-{}", uuid::Uuid::now_v7()));
        let path = dir.join("nested").join("custom.toml");

        init_config_at(&path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.merge.output_prefix, "part_");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
