use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::rules::{DEFAULT_TIME_WINDOW, DEFAULT_VALIDITY_PERIOD, XmlOptions};
use crate::workflow::WorkflowType;
use crate::workflow::document::{DEFAULT_BOT_EMAIL, DEFAULT_WORKFLOW_NAME};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub workflow: WorkflowSettings,
    #[serde(default)]
    pub rules: RuleSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSettings {
    #[serde(default = "default_workflow_name")]
    pub default_name: String,
    #[serde(default = "default_bot_email")]
    pub bot_email: String,
    #[serde(default)]
    pub default_type: WorkflowType,
}

fn default_workflow_name() -> String {
    DEFAULT_WORKFLOW_NAME.to_string()
}

fn default_bot_email() -> String {
    DEFAULT_BOT_EMAIL.to_string()
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            default_name: default_workflow_name(),
            bot_email: default_bot_email(),
            default_type: WorkflowType::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSettings {
    #[serde(default = "default_time_window")]
    pub time_window: u32,
    #[serde(default = "default_validity_period")]
    pub validity_period: String,
    #[serde(default = "default_true")]
    pub escape_xml: bool,
    #[serde(default = "default_true")]
    pub enforce_unique_ids: bool,
}

fn default_time_window() -> u32 {
    DEFAULT_TIME_WINDOW
}

fn default_validity_period() -> String {
    DEFAULT_VALIDITY_PERIOD.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            time_window: default_time_window(),
            validity_period: default_validity_period(),
            escape_xml: true,
            enforce_unique_ids: true,
        }
    }
}

impl RuleSettings {
    pub fn xml_options(&self) -> XmlOptions {
        XmlOptions {
            escape: self.escape_xml,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    /// Where exports land when no explicit path is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl OutputSettings {
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        match &self.directory {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// Keys accepted by `config set`, in display order
pub const KEYS: &[&str] = &[
    "workflow.default_name",
    "workflow.bot_email",
    "workflow.default_type",
    "rules.time_window",
    "rules.validity_period",
    "rules.escape_xml",
    "rules.enforce_unique_ids",
    "output.directory",
];

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => anyhow::bail!("Invalid value for {}: '{}' (expected true or false)", key, value),
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("cxgen")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".cxgen")
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml(&config_content).with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config TOML")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        debug!("Saving config to: {:?}", config_path);

        fs::write(&config_path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        Ok(match key {
            "workflow.default_name" => self.workflow.default_name.clone(),
            "workflow.bot_email" => self.workflow.bot_email.clone(),
            "workflow.default_type" => self.workflow.default_type.to_string(),
            "rules.time_window" => self.rules.time_window.to_string(),
            "rules.validity_period" => self.rules.validity_period.clone(),
            "rules.escape_xml" => self.rules.escape_xml.to_string(),
            "rules.enforce_unique_ids" => self.rules.enforce_unique_ids.to_string(),
            "output.directory" => self
                .output
                .directory
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
            _ => anyhow::bail!("Unknown config key '{}'. Valid keys: {}", key, KEYS.join(", ")),
        })
    }

    /// Update one key in memory; call [`Config::save`] to persist
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "workflow.default_name" => {
                if value.trim().is_empty() {
                    anyhow::bail!("workflow.default_name cannot be empty");
                }
                self.workflow.default_name = value.trim().to_string();
            }
            "workflow.bot_email" => self.workflow.bot_email = value.trim().to_string(),
            "workflow.default_type" => self.workflow.default_type = value.parse()?,
            "rules.time_window" => {
                self.rules.time_window = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid time window '{}'", value))?;
            }
            "rules.validity_period" => self.rules.validity_period = value.trim().to_string(),
            "rules.escape_xml" => self.rules.escape_xml = parse_bool(key, value)?,
            "rules.enforce_unique_ids" => self.rules.enforce_unique_ids = parse_bool(key, value)?,
            "output.directory" => {
                self.output.directory = match value.trim() {
                    "" => None,
                    dir => Some(PathBuf::from(dir)),
                };
            }
            _ => anyhow::bail!("Unknown config key '{}'. Valid keys: {}", key, KEYS.join(", ")),
        }
        info!("Set {} = {}", key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_toml("[rules]\nescape_xml = false\n").unwrap();
        assert!(!config.rules.escape_xml);
        assert_eq!(config.rules.time_window, 5);
        assert_eq!(config.workflow, WorkflowSettings::default());
        assert_eq!(config.output.directory, None);
    }

    #[test]
    fn test_round_trip() {
        let mut config = Config::default();
        config.set("workflow.default_type", "combined").unwrap();
        config.set("output.directory", "/tmp/out").unwrap();

        let text = config.to_toml().unwrap();
        assert!(text.contains("default_type = \"combined\""));
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_set_validates() {
        let mut config = Config::default();
        assert!(config.set("rules.time_window", "soon").is_err());
        assert!(config.set("rules.escape_xml", "maybe").is_err());
        assert!(config.set("workflow.default_type", "crm").is_err());
        assert!(config.set("nope", "1").is_err());
        assert_eq!(config, Config::default());

        config.set("rules.enforce_unique_ids", "off").unwrap();
        assert_eq!(config.get("rules.enforce_unique_ids").unwrap(), "false");
    }

    #[test]
    fn test_every_key_is_readable() {
        let config = Config::default();
        for key in KEYS {
            assert!(config.get(key).is_ok(), "{}", key);
        }
    }

    #[test]
    fn test_output_resolve() {
        let mut output = OutputSettings::default();
        assert_eq!(output.resolve("a.json"), PathBuf::from("a.json"));
        output.directory = Some(PathBuf::from("exports"));
        assert_eq!(output.resolve("a.json"), PathBuf::from("exports").join("a.json"));
    }
}
