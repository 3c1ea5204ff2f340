//! Configuration loading for Lexis.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.lexis/config.toml`)
//! 3. User config (`~/.lexis/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The system runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::SystemClock;
use crate::error::{FailOpen, LexisError, Result};

/// Main configuration struct for Lexis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Vocabulary file location.
    pub storage: StorageConfig,
    /// Review session configuration.
    pub session: SessionConfig,
    /// Study day configuration.
    pub schedule: ScheduleConfig,
    /// Log output configuration.
    pub logging: LoggingConfig,
}

/// Vocabulary file location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the vocabulary file. Defaults to `<lexis_home>/vocabulary.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Review session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of items in a review session.
    pub size: usize,
}

/// Minimum valid session size.
pub const MIN_SESSION_SIZE: usize = 1;

impl SessionConfig {
    /// Check if a session size is valid (must be >= 1).
    pub fn is_valid_size(value: usize) -> bool {
        value >= MIN_SESSION_SIZE
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { size: 10 }
    }
}

/// Study day configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Hour (0-23) at which a new study day begins.
    pub day_start_hour: u32,
}

impl ScheduleConfig {
    /// Check if an hour of the day is valid.
    pub fn is_valid_hour(value: u32) -> bool {
        value <= 23
    }

    /// The system clock for this schedule.
    pub fn clock(&self) -> SystemClock {
        SystemClock::with_day_start_hour(self.day_start_hour)
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset.
    pub level: String,
}

/// Valid log level values.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace", "off"];

impl LoggingConfig {
    /// Check if a log level string is valid.
    pub fn is_valid_level(value: &str) -> bool {
        VALID_LOG_LEVELS.contains(&value)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`.lexis/config.toml` in cwd)
    /// 3. User config (`~/.lexis/config.toml`)
    /// 4. Defaults
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `<lexis_home>/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = lexis_home()?;
        Self::load_optional(&home.join("config.toml"))
    }

    /// Load project config from `.lexis/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        Self::load_optional(&project_config_path(cwd))
    }

    /// Load a config file that may legitimately be absent.
    ///
    /// An existing but unreadable file is logged and ignored.
    fn load_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        Self::load_from_file(path)
            .map(Some)
            .fail_open_default(&format!("loading config {}", path.display()))
    }

    /// Load config from a specific file path.
    pub(crate) fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| LexisError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| LexisError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // LEXIS_VOCABULARY_FILE
        if let Ok(val) = env::var("LEXIS_VOCABULARY_FILE") {
            if val.trim().is_empty() {
                eprintln!("Warning: LEXIS_VOCABULARY_FILE is empty. Ignoring it.");
            } else {
                self.storage.path = Some(PathBuf::from(val));
            }
        }

        // LEXIS_SESSION_SIZE
        if let Ok(val) = env::var("LEXIS_SESSION_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if SessionConfig::is_valid_size(n) => self.session.size = n,
                _ => eprintln!(
                    "Warning: Invalid LEXIS_SESSION_SIZE value '{}'. \
                    Expected an integer >= {}. Using '{}'.",
                    val, MIN_SESSION_SIZE, self.session.size
                ),
            }
        }

        // LEXIS_DAY_START_HOUR
        if let Ok(val) = env::var("LEXIS_DAY_START_HOUR") {
            match val.parse::<u32>() {
                Ok(n) if ScheduleConfig::is_valid_hour(n) => self.schedule.day_start_hour = n,
                _ => eprintln!(
                    "Warning: Invalid LEXIS_DAY_START_HOUR value '{}'. \
                    Expected an hour between 0 and 23. Using '{}'.",
                    val, self.schedule.day_start_hour
                ),
            }
        }

        // LEXIS_LOG
        if let Ok(val) = env::var("LEXIS_LOG") {
            let level = val.to_lowercase();
            if LoggingConfig::is_valid_level(&level) {
                self.logging.level = level;
            } else {
                eprintln!(
                    "Warning: Invalid LEXIS_LOG value '{}'. \
                    Valid values: {:?}. Using '{}'.",
                    val, VALID_LOG_LEVELS, self.logging.level
                );
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Values from `other` take precedence when they differ from the default.
    /// A higher-precedence layer cannot reset a value back to its default.
    fn merge(mut self, other: Config) -> Self {
        if other.storage.path.is_some() {
            self.storage.path = other.storage.path;
        }

        if other.session.size != SessionConfig::default().size {
            self.session.size = other.session.size;
        }

        if other.schedule.day_start_hour != ScheduleConfig::default().day_start_hour {
            self.schedule.day_start_hour = other.schedule.day_start_hour;
        }

        if other.logging.level != LoggingConfig::default().level {
            self.logging.level = other.logging.level;
        }

        self
    }

    /// Check the loaded values and report the first invalid one.
    ///
    /// Environment values are checked as they are read; this covers values
    /// that came from config files.
    pub fn validate(&self) -> Result<()> {
        if !SessionConfig::is_valid_size(self.session.size) {
            return Err(LexisError::config(format!(
                "session.size must be >= {}, got {}",
                MIN_SESSION_SIZE, self.session.size
            )));
        }
        if !ScheduleConfig::is_valid_hour(self.schedule.day_start_hour) {
            return Err(LexisError::config(format!(
                "schedule.day_start_hour must be between 0 and 23, got {}",
                self.schedule.day_start_hour
            )));
        }
        if !LoggingConfig::is_valid_level(&self.logging.level) {
            return Err(LexisError::config(format!(
                "logging.level must be one of {:?}, got '{}'",
                VALID_LOG_LEVELS, self.logging.level
            )));
        }
        Ok(())
    }

    /// The vocabulary file to use.
    ///
    /// Returns `None` only when no home directory can be determined and no
    /// explicit path is configured.
    pub fn vocabulary_path(&self) -> Option<PathBuf> {
        self.storage.path.clone().or_else(default_vocabulary_path)
    }

    /// Save configuration to the project config file.
    ///
    /// Writes to `.lexis/config.toml` in the given directory, creating the
    /// directory if needed. Uses atomic write (temp file, then rename).
    pub fn save_project(&self, cwd: &Path) -> Result<()> {
        let lexis_dir = cwd.join(".lexis");

        if !lexis_dir.exists() {
            fs::create_dir_all(&lexis_dir).map_err(|e| LexisError::storage(&lexis_dir, e))?;
        }

        let config_path = lexis_dir.join("config.toml");
        let content =
            toml::to_string_pretty(self).map_err(|e| LexisError::config(e.to_string()))?;

        let temp_path = lexis_dir.join(".config.toml.tmp");
        let written = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })();
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(LexisError::storage(&temp_path, e));
        }

        fs::rename(&temp_path, &config_path).map_err(|e| LexisError::storage(&config_path, e))?;

        Ok(())
    }

    /// Generate a diff of changed values between two configs.
    ///
    /// Returns a list of (key, old_value, new_value) tuples for changed fields.
    pub fn diff(&self, other: &Config) -> Vec<(String, String, String)> {
        let mut changes = Vec::new();

        if self.storage.path != other.storage.path {
            let show = |p: &Option<PathBuf>| {
                p.as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(default)".to_string())
            };
            changes.push((
                "storage.path".to_string(),
                show(&self.storage.path),
                show(&other.storage.path),
            ));
        }

        if self.session.size != other.session.size {
            changes.push((
                "session.size".to_string(),
                self.session.size.to_string(),
                other.session.size.to_string(),
            ));
        }

        if self.schedule.day_start_hour != other.schedule.day_start_hour {
            changes.push((
                "schedule.day_start_hour".to_string(),
                self.schedule.day_start_hour.to_string(),
                other.schedule.day_start_hour.to_string(),
            ));
        }

        if self.logging.level != other.logging.level {
            changes.push((
                "logging.level".to_string(),
                self.logging.level.clone(),
                other.logging.level.clone(),
            ));
        }

        changes
    }
}

/// Get the Lexis home directory.
///
/// Checks `LEXIS_HOME` first, then falls back to `~/.lexis`. An empty
/// `LEXIS_HOME` is ignored; a relative one is canonicalized when it exists.
pub fn lexis_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("LEXIS_HOME") {
        if home.is_empty() {
            tracing::warn!("LEXIS_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("LEXIS_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".lexis"));
    }

    // Containerized or minimal environments without HOME
    let fallback_path = fallback_lexis_home();
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

#[cfg(unix)]
fn fallback_lexis_home() -> PathBuf {
    use std::os::unix::fs::MetadataExt;
    let uid = std::fs::metadata("/").map(|m| m.uid()).unwrap_or(0);
    PathBuf::from(format!("/tmp/lexis-{}", uid))
}

#[cfg(not(unix))]
fn fallback_lexis_home() -> PathBuf {
    std::env::temp_dir().join("lexis")
}

/// Default vocabulary file: `<lexis_home>/vocabulary.json`.
pub fn default_vocabulary_path() -> Option<PathBuf> {
    lexis_home().map(|h| h.join("vocabulary.json"))
}

/// Project config file: `<cwd>/.lexis/config.toml`.
pub fn project_config_path(cwd: &Path) -> PathBuf {
    cwd.join(".lexis").join("config.toml")
}
