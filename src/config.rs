//! Configuration Management
//!
//! Optional settings file for tfinventory, overridden by environment and CLI.

use crate::state::{StateCommand, StateLoader, DEFAULT_STATE_FILE};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment toggle selecting private addresses; only `"1"` enables it
pub const PRIVATE_IP_ENV: &str = "ANSIBLE_INVENTORY_PRIVATE_IP";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Local state snapshot to read before falling back to the command
    #[serde(default)]
    pub state_file: Option<PathBuf>,
    /// Command (argv) printing the state as JSON
    #[serde(default)]
    pub state_command: Option<Vec<String>>,
    /// Use private addresses instead of public ones
    #[serde(default)]
    pub use_private_ip: bool,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tfinventory").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Get effective state file (CLI > config > default)
    pub fn effective_state_file(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.state_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
    }

    /// Get effective state command (config > default)
    pub fn effective_state_command(&self) -> Result<StateCommand> {
        match &self.state_command {
            Some(argv) => StateCommand::from_argv(argv),
            None => Ok(StateCommand::default()),
        }
    }

    /// Get effective address mode (CLI flag or env toggle or config)
    pub fn effective_use_private_ip(&self, cli: bool, env: Option<&str>) -> bool {
        cli || env.map(private_ip_enabled).unwrap_or(self.use_private_ip)
    }

    /// Build the state loader from the effective settings
    pub fn state_loader(&self, cli_state_file: Option<PathBuf>) -> Result<StateLoader> {
        let file = self.effective_state_file(cli_state_file);
        let command = self.effective_state_command()?;
        tracing::debug!("State file {:?}, fallback {:?}", file, command);
        Ok(StateLoader::new(&file, command))
    }
}

/// Interpret the private-IP environment value
pub fn private_ip_enabled(value: &str) -> bool {
    value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_literal_one_enables_private_ip() {
        assert!(private_ip_enabled("1"));
        for value in ["0", "", "true", "yes", " 1", "01"] {
            assert!(!private_ip_enabled(value), "{:?} should be false", value);
        }
    }

    #[test]
    fn test_private_ip_precedence() {
        let config = Config::default();
        assert!(!config.effective_use_private_ip(false, None));
        assert!(config.effective_use_private_ip(false, Some("1")));
        assert!(config.effective_use_private_ip(true, Some("0")));

        let config = Config {
            use_private_ip: true,
            ..Config::default()
        };
        assert!(config.effective_use_private_ip(false, None));
        assert!(!config.effective_use_private_ip(false, Some("0")));
    }

    #[test]
    fn test_state_file_precedence() {
        let config = Config::default();
        assert_eq!(config.effective_state_file(None), PathBuf::from("terraform.tfstate"));

        let config = Config {
            state_file: Some(PathBuf::from("infra/prod.tfstate")),
            ..Config::default()
        };
        assert_eq!(config.effective_state_file(None), PathBuf::from("infra/prod.tfstate"));
        assert_eq!(
            config.effective_state_file(Some(PathBuf::from("cli.tfstate"))),
            PathBuf::from("cli.tfstate")
        );
    }

    #[test]
    fn test_config_parses_partial_json() {
        let config: Config =
            serde_json::from_str(r#"{"state_command": ["tofu", "state", "pull"]}"#).unwrap();
        let command = config.effective_state_command().unwrap();
        assert_eq!(command.program, "tofu");
        assert_eq!(command.args, vec!["state", "pull"]);
        assert!(!config.use_private_ip);
    }
}
