//! Module manifest parsing (module.toml)
//!
//! One manifest declares one module's descriptor. Optional `[[overlay]]`
//! sections add target-conditional include paths and dependencies,
//! merged in declaration order when their platform/configuration
//! filters match. Parsing validates file-local constraints only;
//! cross-module checks belong to graph resolution.

use crate::descriptor::{is_valid_module_name, DependencyKind, ModuleDescriptor, PchUsage};
use crate::rules::ModuleRules;
use crate::target::{BuildConfiguration, TargetContext, TargetPlatform};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during manifest parsing
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("Failed to read manifest file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid manifest: {0}")]
    ValidationError(String),
}

/// Module manifest (module.toml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleManifest {
    /// Module metadata
    pub module: ModuleInfo,

    /// Include-path declarations
    #[serde(default, skip_serializing_if = "IncludeSection::is_empty")]
    pub include: IncludeSection,

    /// Dependency declarations
    #[serde(default, skip_serializing_if = "DependencySection::is_empty")]
    pub dependencies: DependencySection,

    /// Target-conditional overlays, applied in declaration order
    #[serde(default, rename = "overlay", skip_serializing_if = "Vec::is_empty")]
    pub overlays: Vec<Overlay>,
}

/// Module metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleInfo {
    /// Module name (must be unique within the workspace)
    pub name: String,

    /// Precompiled-header strategy (defaults to explicit-or-shared)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pch: Option<PchUsage>,
}

/// Include-path lists, relative to the module root
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IncludeSection {
    /// Paths exposed to public dependents
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub public: Vec<String>,

    /// Paths visible only to this module
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private: Vec<String>,
}

impl IncludeSection {
    fn is_empty(&self) -> bool {
        self.public.is_empty() && self.private.is_empty()
    }
}

/// Dependency-module name lists
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DependencySection {
    /// Statically linked, interface propagates to consumers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub public: Vec<String>,

    /// Statically linked, hidden from consumers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private: Vec<String>,

    /// Loaded at runtime rather than link time
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic: Vec<String>,
}

impl DependencySection {
    fn is_empty(&self) -> bool {
        self.public.is_empty() && self.private.is_empty() && self.dynamic.is_empty()
    }
}

/// Target-conditional overlay
///
/// Empty filter lists match every target of that axis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Overlay {
    /// Platforms this overlay applies to (empty = all)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<TargetPlatform>,

    /// Configurations this overlay applies to (empty = all)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<BuildConfiguration>,

    /// Additional include paths
    #[serde(default, skip_serializing_if = "IncludeSection::is_empty")]
    pub include: IncludeSection,

    /// Additional dependencies
    #[serde(default, skip_serializing_if = "DependencySection::is_empty")]
    pub dependencies: DependencySection,
}

impl Overlay {
    /// Whether this overlay applies to the given target
    pub fn matches(&self, target: &TargetContext) -> bool {
        let platform_ok = self.platforms.is_empty() || self.platforms.contains(&target.platform);
        let configuration_ok = self.configurations.is_empty()
            || self.configurations.contains(&target.configuration);
        platform_ok && configuration_ok
    }
}

impl ModuleManifest {
    /// Parse a manifest from a file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a manifest from a string
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let manifest: ModuleManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate file-local constraints
    pub fn validate(&self) -> Result<(), ManifestError> {
        if !is_valid_module_name(&self.module.name) {
            return Err(ManifestError::ValidationError(format!(
                "Invalid module name: '{}'. Must be non-empty, contain only alphanumeric characters, hyphens, and underscores, and not start with a digit",
                self.module.name
            )));
        }

        self.validate_section(&self.include, &self.dependencies)?;
        for overlay in &self.overlays {
            self.validate_section(&overlay.include, &overlay.dependencies)?;
        }

        Ok(())
    }

    fn validate_section(
        &self,
        include: &IncludeSection,
        dependencies: &DependencySection,
    ) -> Result<(), ManifestError> {
        for path in include.public.iter().chain(include.private.iter()) {
            validate_include_path(&self.module.name, path)?;
        }
        validate_name_list(&self.module.name, "public", &dependencies.public)?;
        validate_name_list(&self.module.name, "private", &dependencies.private)?;
        validate_name_list(&self.module.name, "dynamic", &dependencies.dynamic)?;

        for dep in dependencies
            .public
            .iter()
            .chain(dependencies.private.iter())
            .chain(dependencies.dynamic.iter())
        {
            if *dep == self.module.name {
                return Err(ManifestError::ValidationError(format!(
                    "Module '{}' lists itself as a dependency",
                    self.module.name
                )));
            }
        }

        Ok(())
    }

    /// Write manifest to a file
    pub fn to_file(&self, path: &Path) -> Result<(), ManifestError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ManifestError::ValidationError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Construct the descriptor for the given target
    ///
    /// Base sections first, then matching overlays in declaration
    /// order. Insertion is first-wins, so an overlay repeating a base
    /// entry is a no-op.
    pub fn describe(&self, target: &TargetContext) -> ModuleDescriptor {
        let mut desc = ModuleDescriptor::new(self.module.name.clone())
            .with_pch_usage(self.module.pch.unwrap_or_default());

        apply_sections(&mut desc, &self.include, &self.dependencies);
        for overlay in &self.overlays {
            if overlay.matches(target) {
                apply_sections(&mut desc, &overlay.include, &overlay.dependencies);
            }
        }

        desc
    }

    /// Convert into rules usable by a module registry
    pub fn into_rules(self) -> ManifestRules {
        ManifestRules { manifest: self }
    }
}

fn apply_sections(
    desc: &mut ModuleDescriptor,
    include: &IncludeSection,
    dependencies: &DependencySection,
) {
    for path in &include.public {
        desc.add_public_include_path(path.clone());
    }
    for path in &include.private {
        desc.add_private_include_path(path.clone());
    }
    for name in &dependencies.public {
        desc.add_dependency(DependencyKind::Public, name.clone());
    }
    for name in &dependencies.private {
        desc.add_dependency(DependencyKind::Private, name.clone());
    }
    for name in &dependencies.dynamic {
        desc.add_dependency(DependencyKind::Dynamic, name.clone());
    }
}

fn validate_include_path(module: &str, path: &str) -> Result<(), ManifestError> {
    if path.is_empty() {
        return Err(ManifestError::ValidationError(format!(
            "Module '{}' declares an empty include path",
            module
        )));
    }
    if path.contains('\\') {
        return Err(ManifestError::ValidationError(format!(
            "Module '{}' include path '{}' must use forward slashes",
            module, path
        )));
    }
    if path.starts_with('/') || path.split('/').any(|part| part == "..") {
        return Err(ManifestError::ValidationError(format!(
            "Module '{}' include path '{}' must stay within the module root",
            module, path
        )));
    }
    Ok(())
}

fn validate_name_list(module: &str, kind: &str, names: &[String]) -> Result<(), ManifestError> {
    for (index, name) in names.iter().enumerate() {
        if !is_valid_module_name(name) {
            return Err(ManifestError::ValidationError(format!(
                "Module '{}' has invalid {} dependency name: '{}'",
                module, kind, name
            )));
        }
        if names[..index].contains(name) {
            return Err(ManifestError::ValidationError(format!(
                "Module '{}' lists {} dependency '{}' twice",
                module, kind, name
            )));
        }
    }
    Ok(())
}

/// Manifest-backed module rules
pub struct ManifestRules {
    manifest: ModuleManifest,
}

impl ManifestRules {
    /// The underlying manifest
    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }
}

impl ModuleRules for ManifestRules {
    fn name(&self) -> &str {
        &self.manifest.module.name
    }

    fn describe(&self, target: &TargetContext) -> ModuleDescriptor {
        self.manifest.describe(target)
    }
}
