//! Init command for Lexis.
//!
//! Writes a project config (`.lexis/config.toml`) with the default settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{project_config_path, Config};
use crate::error::FailOpen;

/// Options for the init command.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Overwrite an existing project config.
    pub force: bool,
}

/// Output format for the init command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitOutput {
    /// Whether initialization was successful.
    pub success: bool,
    /// The project config file.
    pub path: String,
    /// Whether the file was written (false when it already existed).
    pub written: bool,
    /// Settings reset to defaults by a forced overwrite: (key, old, new).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<(String, String, String)>,
    /// Error message if initialization failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InitOutput {
    /// Create a successful output.
    pub fn success(path: &Path, written: bool, changes: Vec<(String, String, String)>) -> Self {
        Self {
            success: true,
            path: path.display().to_string(),
            written,
            changes,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(path: &Path, error: impl Into<String>) -> Self {
        Self {
            success: false,
            path: path.display().to_string(),
            written: false,
            changes: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The init command implementation.
pub struct InitCommand {
    cwd: PathBuf,
}

impl InitCommand {
    /// Create a new init command.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Run the init command.
    pub fn run(&self, options: &InitOptions) -> InitOutput {
        let config_path = project_config_path(&self.cwd);
        let defaults = Config::default();

        let changes = if config_path.exists() {
            if !options.force {
                return InitOutput::success(&config_path, false, Vec::new());
            }
            // An unreadable existing file is replaced without a diff
            Config::load_from_file(&config_path)
                .map(|existing| existing.diff(&defaults))
                .fail_open_default("reading existing project config")
        } else {
            Vec::new()
        };

        match defaults.save_project(&self.cwd) {
            Ok(()) => InitOutput::success(&config_path, true, changes),
            Err(e) => InitOutput::failure(&config_path, e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &InitOutput, options: &InitOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Init failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if !output.written {
            return format!(
                "{} already exists (use --force to overwrite).",
                output.path
            );
        }

        let mut lines = vec![format!("Wrote {}", output.path)];
        for (key, old, new) in &output.changes {
            lines.push(format!("  {}: {} -> {}", key, old, new));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_config() {
        let dir = TempDir::new().unwrap();
        let cmd = InitCommand::new(dir.path());
        let options = InitOptions::default();

        let output = cmd.run(&options);

        assert!(output.success);
        assert!(output.written);
        let config_path = dir.path().join(".lexis").join("config.toml");
        let parsed: Config = toml::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(cmd.format_output(&output, &options).starts_with("Wrote "));
    }

    #[test]
    fn test_init_keeps_existing_without_force() {
        let dir = TempDir::new().unwrap();
        let custom = Config {
            session: SessionConfig { size: 3 },
            ..Config::default()
        };
        custom.save_project(dir.path()).unwrap();
        let cmd = InitCommand::new(dir.path());
        let options = InitOptions::default();

        let output = cmd.run(&options);

        assert!(output.success);
        assert!(!output.written);
        let content = fs::read_to_string(dir.path().join(".lexis").join("config.toml")).unwrap();
        assert!(content.contains("size = 3"));
        assert!(cmd.format_output(&output, &options).contains("--force"));
    }

    #[test]
    fn test_init_force_replaces_unreadable_config() {
        let dir = TempDir::new().unwrap();
        let lexis_dir = dir.path().join(".lexis");
        fs::create_dir_all(&lexis_dir).unwrap();
        fs::write(lexis_dir.join("config.toml"), "[session\nsize = ").unwrap();
        let options = InitOptions {
            force: true,
            ..Default::default()
        };

        let output = InitCommand::new(dir.path()).run(&options);

        assert!(output.success);
        assert!(output.written);
        assert!(output.changes.is_empty());
        let parsed: Config =
            toml::from_str(&fs::read_to_string(lexis_dir.join("config.toml")).unwrap()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_init_force_reports_reset_values() {
        let dir = TempDir::new().unwrap();
        let custom = Config {
            session: SessionConfig { size: 3 },
            ..Config::default()
        };
        custom.save_project(dir.path()).unwrap();
        let options = InitOptions {
            force: true,
            ..Default::default()
        };

        let output = InitCommand::new(dir.path()).run(&options);

        assert!(output.written);
        assert_eq!(
            output.changes,
            vec![("session.size".to_string(), "3".to_string(), "10".to_string())]
        );
    }
}
