// Configuration loading and parsing (almanac.toml).

use almanac_core::SourcePaths;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "almanac.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// almanac.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub franchise: FranchiseConfig,
    pub data_paths: DataPaths,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FranchiseConfig {
    /// Team code used by the roster and stat sources (e.g. "NYA").
    pub code: String,
}

/// Input locations. Relative paths resolve against the directory the config
/// was loaded from.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub rosters: String,
    pub batting: String,
    pub pitching: String,
    pub hall_of_fame: String,
    pub awards: String,
    pub all_stars: String,
    pub teams: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

impl DataPaths {
    pub fn resolve(&self, base_dir: &Path) -> SourcePaths {
        SourcePaths {
            rosters: base_dir.join(&self.rosters),
            batting: base_dir.join(&self.batting),
            pitching: base_dir.join(&self.pitching),
            hall_of_fame: base_dir.join(&self.hall_of_fame),
            awards: base_dir.join(&self.awards),
            all_stars: base_dir.join(&self.all_stars),
            teams: base_dir.join(&self.teams),
        }
    }

    fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("data_paths.rosters", self.rosters.as_str()),
            ("data_paths.batting", self.batting.as_str()),
            ("data_paths.pitching", self.pitching.as_str()),
            ("data_paths.hall_of_fame", self.hall_of_fame.as_str()),
            ("data_paths.awards", self.awards.as_str()),
            ("data_paths.all_stars", self.all_stars.as_str()),
            ("data_paths.teams", self.teams.as_str()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/almanac.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let mut config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    config.franchise.code = config.franchise.code.trim().to_string();

    validate(&config)?;

    Ok(config)
}

/// Seed `config/almanac.toml` from `defaults/almanac.toml` when it is missing.
/// Returns the path written, or `None` when a config was already in place.
pub fn seed_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let default = base_dir.join("defaults").join(CONFIG_FILE);
    if !default.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither config/{CONFIG_FILE} nor defaults/{CONFIG_FILE} found in {}; \
                 run from the almanac-app directory",
                base_dir.display()
            ),
        });
    }

    let copy = |target: &Path| -> std::io::Result<()> {
        if let Some(dir) = target.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::copy(&default, target).map(|_| ())
    };
    copy(&target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", default.display(), target.display()),
    })?;

    Ok(Some(target))
}

/// Load config relative to the current working directory, seeding it from
/// `defaults/` first. Returns the config and the directory it was read from.
pub fn load_config() -> Result<(Config, PathBuf), ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if let Some(path) = seed_config(&cwd)? {
        tracing::info!("Seeded {} from defaults", path.display());
    }
    let config = load_config_from(&cwd)?;
    Ok((config, cwd))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.franchise.code.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "franchise.code".into(),
            message: "must not be empty".into(),
        });
    }

    for (name, value) in config.data_paths.fields() {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    if config.output.path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "output.path".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
