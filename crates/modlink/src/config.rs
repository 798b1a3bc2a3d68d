//! Workspace configuration (modlink.toml)
//!
//! The root-level file naming the source root, the prebuilt module
//! set, and the default target context.

use crate::descriptor::is_valid_module_name;
use crate::target::{BuildConfiguration, TargetContext, TargetPlatform};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Name of the workspace configuration file
pub const CONFIG_FILE_NAME: &str = "modlink.toml";

/// Errors that can occur during config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Workspace configuration (modlink.toml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceConfig {
    /// Workspace settings
    pub workspace: WorkspaceSection,

    /// Default target, overridable per invocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetSection>,
}

/// `[workspace]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceSection {
    /// Directory containing module manifests, relative to the workspace root
    #[serde(default = "default_source_root")]
    pub source_root: String,

    /// Engine-provided modules that resolve without a manifest
    #[serde(default)]
    pub prebuilt: Vec<String>,
}

/// `[target]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetSection {
    /// Default platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<TargetPlatform>,

    /// Default configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<BuildConfiguration>,
}

fn default_source_root() -> String {
    "Source".to_string()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            workspace: WorkspaceSection {
                source_root: default_source_root(),
                prebuilt: Vec::new(),
            },
            target: None,
        }
    }
}

impl WorkspaceConfig {
    /// Parse a config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a config from a string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: WorkspaceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workspace.source_root.is_empty() {
            return Err(ConfigError::ValidationError(
                "source_root cannot be empty".to_string(),
            ));
        }
        for (index, name) in self.workspace.prebuilt.iter().enumerate() {
            if !is_valid_module_name(name) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid prebuilt module name: '{}'",
                    name
                )));
            }
            if self.workspace.prebuilt[..index].contains(name) {
                return Err(ConfigError::ValidationError(format!(
                    "Prebuilt module '{}' listed twice",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Write config to a file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default target context: configured values over built-in defaults
    pub fn default_target(&self) -> TargetContext {
        let fallback = TargetContext::default();
        match &self.target {
            Some(section) => TargetContext::new(
                section.platform.unwrap_or(fallback.platform),
                section.configuration.unwrap_or(fallback.configuration),
            ),
            None => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[workspace]
"#;
        let config = WorkspaceConfig::from_str(toml).unwrap();
        assert_eq!(config.workspace.source_root, "Source");
        assert!(config.workspace.prebuilt.is_empty());
        assert_eq!(config.default_target(), TargetContext::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[workspace]
source_root = "Modules"
prebuilt = ["Core", "CoreUObject", "Engine", "Http", "Json"]

[target]
platform = "linux"
configuration = "shipping"
"#;
        let config = WorkspaceConfig::from_str(toml).unwrap();
        assert_eq!(config.workspace.source_root, "Modules");
        assert_eq!(config.workspace.prebuilt.len(), 5);

        let target = config.default_target();
        assert_eq!(target.platform, TargetPlatform::Linux);
        assert_eq!(target.configuration, BuildConfiguration::Shipping);
    }

    #[test]
    fn test_partial_target_section() {
        let toml = r#"
[workspace]

[target]
configuration = "debug"
"#;
        let config = WorkspaceConfig::from_str(toml).unwrap();
        let target = config.default_target();
        assert_eq!(target.platform, TargetPlatform::Win64);
        assert_eq!(target.configuration, BuildConfiguration::Debug);
    }

    #[test]
    fn test_invalid_prebuilt_name() {
        let toml = r#"
[workspace]
prebuilt = ["Core UObject"]
"#;
        assert!(WorkspaceConfig::from_str(toml).is_err());
    }

    #[test]
    fn test_duplicate_prebuilt_rejected() {
        let toml = r#"
[workspace]
prebuilt = ["Core", "Core"]
"#;
        assert!(WorkspaceConfig::from_str(toml).is_err());
    }

    #[test]
    fn test_round_trip() {
        let toml = r#"
[workspace]
source_root = "Source"
prebuilt = ["Core", "Engine"]

[target]
platform = "mac"
"#;
        let config = WorkspaceConfig::from_str(toml).unwrap();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let reparsed = WorkspaceConfig::from_str(&serialized).unwrap();
        assert_eq!(config, reparsed);
    }
}
