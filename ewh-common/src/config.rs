//! Configuration loading and path resolution
//!
//! Configuration file lookup follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `EWH_CONFIG` environment variable
//! 3. `ewh.toml` in the working directory
//! 4. `<config_dir>/ewh/config.toml`
//! 5. Compiled defaults (fallback)
//!
//! A missing file never terminates the program: the loader falls back to
//! compiled defaults. A file that exists but cannot be parsed is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "EWH_CONFIG";

/// Configuration file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "ewh.toml";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base directory for relative paths (optional, defaults to working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Named pipeline destinations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source, quarantine and storage destinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Raw delimited input file
    #[serde(default = "default_raw_file")]
    pub raw_file: PathBuf,

    /// Side file receiving quarantined rows
    #[serde(default = "default_quarantine_file")]
    pub quarantine_file: PathBuf,

    /// SQLite warehouse database
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr only if not specified)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_raw_file() -> PathBuf {
    PathBuf::from("daily_sales_raw.csv")
}

fn default_quarantine_file() -> PathBuf {
    PathBuf::from("quarantine_data.csv")
}

fn default_database() -> PathBuf {
    PathBuf::from("enterprise_warehouse.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_file: default_raw_file(),
            quarantine_file: default_quarantine_file(),
            database: default_database(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl TomlConfig {
    /// Resolve a configured path against `data_dir`
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn raw_file(&self) -> PathBuf {
        self.resolve(&self.paths.raw_file)
    }

    pub fn quarantine_file(&self) -> PathBuf {
        self.resolve(&self.paths.quarantine_file)
    }

    pub fn database(&self) -> PathBuf {
        self.resolve(&self.paths.database)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging.file.as_deref().map(|p| self.resolve(p))
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    CommandLine(PathBuf),
    Environment(PathBuf),
    WorkingDirectory(PathBuf),
    UserConfigDir(PathBuf),
    CompiledDefaults,
}

impl ConfigOrigin {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigOrigin::CommandLine(p)
            | ConfigOrigin::Environment(p)
            | ConfigOrigin::WorkingDirectory(p)
            | ConfigOrigin::UserConfigDir(p) => Some(p),
            ConfigOrigin::CompiledDefaults => None,
        }
    }
}

/// Configuration together with its origin
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub origin: ConfigOrigin,
}

/// Locate the configuration file following the priority order above
///
/// Explicit locations (command line, environment) are returned even if the
/// file does not exist so the loader can report them. Implicit locations are
/// only returned when present on disk.
pub fn locate_config_file(cli_arg: Option<&Path>) -> ConfigOrigin {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return ConfigOrigin::CommandLine(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return ConfigOrigin::Environment(PathBuf::from(path));
        }
    }

    // Priority 3: Working directory
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return ConfigOrigin::WorkingDirectory(local);
    }

    // Priority 4: Per-user configuration directory
    if let Some(user) = dirs::config_dir().map(|d| d.join("ewh").join("config.toml")) {
        if user.is_file() {
            return ConfigOrigin::UserConfigDir(user);
        }
    }

    ConfigOrigin::CompiledDefaults
}

/// Load configuration, falling back to compiled defaults
///
/// An explicitly named file (command line or environment) that does not
/// exist is a configuration error; a missing implicit file is not.
pub fn load_config(cli_arg: Option<&Path>) -> Result<LoadedConfig> {
    let origin = locate_config_file(cli_arg);

    let config = match &origin {
        ConfigOrigin::CompiledDefaults => TomlConfig::default(),
        ConfigOrigin::CommandLine(path) | ConfigOrigin::Environment(path) => {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            load_toml_config(path)?
        }
        ConfigOrigin::WorkingDirectory(path) | ConfigOrigin::UserConfigDir(path) => {
            load_toml_config(path)?
        }
    };

    Ok(LoadedConfig { config, origin })
}

/// Parse a TOML configuration file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write configuration atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = target.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;

    if let Err(e) = std::fs::rename(&temp_path, target) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(Error::Io(e));
    }

    Ok(())
}
