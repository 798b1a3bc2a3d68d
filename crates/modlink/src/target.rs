//! Build-target context
//!
//! Descriptors are constructed once per (platform, configuration) pair.
//! Rules may branch on the context the orchestrator hands them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing target components
#[derive(Debug, Error)]
pub enum TargetError {
    /// Unknown platform name
    #[error("Unknown target platform: {0}")]
    UnknownPlatform(String),

    /// Unknown configuration name
    #[error("Unknown build configuration: {0}")]
    UnknownConfiguration(String),
}

/// Platform a module is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetPlatform {
    Win64,
    Linux,
    LinuxArm64,
    Mac,
    Android,
    Ios,
}

/// Build configuration a module is compiled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildConfiguration {
    Debug,
    DebugGame,
    Development,
    Test,
    Shipping,
}

impl TargetPlatform {
    /// All supported platforms, in declaration order.
    pub const ALL: [TargetPlatform; 6] = [
        TargetPlatform::Win64,
        TargetPlatform::Linux,
        TargetPlatform::LinuxArm64,
        TargetPlatform::Mac,
        TargetPlatform::Android,
        TargetPlatform::Ios,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Win64 => "win64",
            TargetPlatform::Linux => "linux",
            TargetPlatform::LinuxArm64 => "linux-arm64",
            TargetPlatform::Mac => "mac",
            TargetPlatform::Android => "android",
            TargetPlatform::Ios => "ios",
        }
    }

    /// Whether this is a desktop platform (relevant for dynamic loading).
    pub fn is_desktop(&self) -> bool {
        matches!(
            self,
            TargetPlatform::Win64
                | TargetPlatform::Linux
                | TargetPlatform::LinuxArm64
                | TargetPlatform::Mac
        )
    }
}

impl BuildConfiguration {
    /// All supported configurations, in declaration order.
    pub const ALL: [BuildConfiguration; 5] = [
        BuildConfiguration::Debug,
        BuildConfiguration::DebugGame,
        BuildConfiguration::Development,
        BuildConfiguration::Test,
        BuildConfiguration::Shipping,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "debug",
            BuildConfiguration::DebugGame => "debug-game",
            BuildConfiguration::Development => "development",
            BuildConfiguration::Test => "test",
            BuildConfiguration::Shipping => "shipping",
        }
    }

    /// Whether this configuration carries debug information.
    pub fn is_debug(&self) -> bool {
        matches!(self, BuildConfiguration::Debug | BuildConfiguration::DebugGame)
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win64" => Ok(TargetPlatform::Win64),
            "linux" => Ok(TargetPlatform::Linux),
            "linux-arm64" | "linuxarm64" => Ok(TargetPlatform::LinuxArm64),
            "mac" => Ok(TargetPlatform::Mac),
            "android" => Ok(TargetPlatform::Android),
            "ios" => Ok(TargetPlatform::Ios),
            _ => Err(TargetError::UnknownPlatform(s.to_string())),
        }
    }
}

impl FromStr for BuildConfiguration {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildConfiguration::Debug),
            "debug-game" | "debuggame" => Ok(BuildConfiguration::DebugGame),
            "development" => Ok(BuildConfiguration::Development),
            "test" => Ok(BuildConfiguration::Test),
            "shipping" => Ok(BuildConfiguration::Shipping),
            _ => Err(TargetError::UnknownConfiguration(s.to_string())),
        }
    }
}

/// Target-configuration record supplied to descriptor construction
///
/// Construction is one-shot and side-effect-free: the same context must
/// always yield the same descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetContext {
    /// Platform compiled for
    pub platform: TargetPlatform,

    /// Build configuration compiled in
    pub configuration: BuildConfiguration,
}

impl TargetContext {
    /// Create a new target context
    pub fn new(platform: TargetPlatform, configuration: BuildConfiguration) -> Self {
        Self {
            platform,
            configuration,
        }
    }
}

impl Default for TargetContext {
    fn default() -> Self {
        Self {
            platform: TargetPlatform::Win64,
            configuration: BuildConfiguration::Development,
        }
    }
}

impl fmt::Display for TargetContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.platform, self.configuration)
    }
}
