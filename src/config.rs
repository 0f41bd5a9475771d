//! Configuration management for the schema validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-validator.toml)
//! - Environment variables (SCHEMA_VALIDATOR__*)
//!
//! ## Example config file (schema-validator.toml):
//! ```toml
//! [validation]
//! suggest_similar = true
//!
//! [repair]
//! enabled = true
//! strategies = ["identifier_slot", "name_slot"]
//!
//! [output]
//! format = "pretty"
//!
//! [input]
//! extensions = ["yaml", "yml", "json"]
//! skip_dirs = ["target", ".git"]
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::repair::{AutoRepairer, StrategyRegistry};
use crate::validate::Validator;

/// Main configuration for the validator and repairer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub repair: RepairConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub input: InputConfig,
}

/// Validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Add "did you mean" hints to undefined slot messages
    #[serde(default = "default_true")]
    pub suggest_similar: bool,
}

/// Repair settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairConfig {
    /// When false no strategy is ever applied
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Enabled strategy names; priority order is fixed regardless of order here
    #[serde(default = "default_strategies")]
    pub strategies: Vec<String>,
}

/// Report output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl OutputFormat {
    /// Render a value as JSON in this format
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let text = match self {
            Self::Pretty => serde_json::to_string_pretty(value)?,
            Self::Compact => serde_json::to_string(value)?,
        };
        Ok(text)
    }
}

/// Schema file discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// File extensions treated as schemas when walking directories
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names never descended into
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_strategies() -> Vec<String> {
    StrategyRegistry::builtin_names()
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_extensions() -> Vec<String> {
    vec!["yaml".to_string(), "yml".to_string(), "json".to_string()]
}

fn default_skip_dirs() -> Vec<String> {
    vec![
        "target".to_string(),
        ".git".to_string(),
        "node_modules".to_string(),
    ]
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            suggest_similar: true,
        }
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strategies: default_strategies(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            skip_dirs: default_skip_dirs(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from default locations
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-validator.toml",
            ".schema-validator.toml",
            "config/schema-validator.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "linkml", "schema-validator") {
            let xdg_config = config_dir.config_dir().join("schema-validator.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEMA_VALIDATOR__REPAIR__ENABLED=false etc.
        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_VALIDATOR")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Validator built from the `[validation]` table
    pub fn validator(&self) -> Validator {
        Validator::new().with_suggestions(self.validation.suggest_similar)
    }

    /// Repairer built from the `[repair]` and `[validation]` tables
    pub fn auto_repairer(&self) -> Result<AutoRepairer> {
        let registry = if self.repair.enabled {
            StrategyRegistry::select(self.repair.strategies.as_slice())?
        } else {
            StrategyRegistry::none()
        };
        Ok(AutoRepairer::new()
            .with_registry(registry)
            .with_validator(self.validator()))
    }

    /// Whether a file extension is treated as a schema
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.input
            .extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}
