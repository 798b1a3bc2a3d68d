//! Module descriptors
//!
//! A descriptor declares, for the build orchestrator, which include-path
//! roots a module exposes or consumes, which modules it links against
//! (public vs private), and which modules it loads dynamically at
//! runtime. Construction is infallible; all cross-module validation
//! happens at graph resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing a PCH usage mode
#[derive(Debug, Error)]
pub enum PchUsageError {
    /// Unknown PCH usage name
    #[error("Unknown PCH usage mode: {0}")]
    Unknown(String),
}

/// Precompiled-header strategy for a module
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PchUsage {
    /// No precompiled headers
    NoPchs,

    /// Use a shared PCH provided by the build environment
    UseSharedPchs,

    /// Use an explicit PCH if declared, otherwise a shared one
    ///
    /// The plugin-module template default.
    #[default]
    UseExplicitOrSharedPchs,

    /// Generate a private PCH for this module alone
    UsePrivatePchs,
}

impl PchUsage {
    /// Canonical kebab-case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PchUsage::NoPchs => "no-pchs",
            PchUsage::UseSharedPchs => "use-shared-pchs",
            PchUsage::UseExplicitOrSharedPchs => "use-explicit-or-shared-pchs",
            PchUsage::UsePrivatePchs => "use-private-pchs",
        }
    }
}

impl fmt::Display for PchUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PchUsage {
    type Err = PchUsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no-pchs" | "none" => Ok(PchUsage::NoPchs),
            "use-shared-pchs" | "shared" => Ok(PchUsage::UseSharedPchs),
            "use-explicit-or-shared-pchs" | "explicit" => Ok(PchUsage::UseExplicitOrSharedPchs),
            "use-private-pchs" | "private" => Ok(PchUsage::UsePrivatePchs),
            _ => Err(PchUsageError::Unknown(s.to_string())),
        }
    }
}

/// Category a dependency name is declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Statically linked; public include paths propagate to consumers
    Public,

    /// Statically linked; hidden from consumers
    Private,

    /// Loaded at runtime rather than link time
    Dynamic,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyKind::Public => "public",
            DependencyKind::Private => "private",
            DependencyKind::Dynamic => "dynamic",
        };
        f.write_str(s)
    }
}

/// Build descriptor for one module
///
/// Path and dependency lists are ordered and duplicate-free per list;
/// insertion keeps the first occurrence and drops later repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Module name (registry key)
    pub name: String,

    /// Precompiled-header strategy
    #[serde(default)]
    pub pch_usage: PchUsage,

    /// Include-path roots exposed to modules that depend on this one publicly
    #[serde(default)]
    pub public_include_paths: Vec<String>,

    /// Include-path roots visible only while compiling this module
    #[serde(default)]
    pub private_include_paths: Vec<String>,

    /// Statically linked modules whose interface propagates to consumers
    #[serde(default)]
    pub public_dependencies: Vec<String>,

    /// Statically linked modules hidden from consumers
    #[serde(default)]
    pub private_dependencies: Vec<String>,

    /// Modules loaded at runtime rather than link time
    #[serde(default)]
    pub dynamically_loaded: Vec<String>,
}

impl ModuleDescriptor {
    /// Create an empty descriptor with the default PCH mode
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pch_usage: PchUsage::default(),
            public_include_paths: Vec::new(),
            private_include_paths: Vec::new(),
            public_dependencies: Vec::new(),
            private_dependencies: Vec::new(),
            dynamically_loaded: Vec::new(),
        }
    }

    /// Set the PCH strategy
    pub fn with_pch_usage(mut self, pch_usage: PchUsage) -> Self {
        self.pch_usage = pch_usage;
        self
    }

    /// Add a public include path (first occurrence wins)
    pub fn add_public_include_path(&mut self, path: impl Into<String>) {
        push_unique(&mut self.public_include_paths, path.into());
    }

    /// Add a private include path (first occurrence wins)
    pub fn add_private_include_path(&mut self, path: impl Into<String>) {
        push_unique(&mut self.private_include_paths, path.into());
    }

    /// Add a dependency under the given category (first occurrence wins within the list)
    pub fn add_dependency(&mut self, kind: DependencyKind, name: impl Into<String>) {
        let list = match kind {
            DependencyKind::Public => &mut self.public_dependencies,
            DependencyKind::Private => &mut self.private_dependencies,
            DependencyKind::Dynamic => &mut self.dynamically_loaded,
        };
        push_unique(list, name.into());
    }

    /// Statically linked dependencies, public first, declaration order preserved
    pub fn static_dependencies(&self) -> impl Iterator<Item = &str> {
        self.public_dependencies
            .iter()
            .chain(self.private_dependencies.iter())
            .map(String::as_str)
    }

    /// Every declared dependency name with its category
    pub fn all_dependencies(&self) -> impl Iterator<Item = (&str, DependencyKind)> {
        let public = self
            .public_dependencies
            .iter()
            .map(|n| (n.as_str(), DependencyKind::Public));
        let private = self
            .private_dependencies
            .iter()
            .map(|n| (n.as_str(), DependencyKind::Private));
        let dynamic = self
            .dynamically_loaded
            .iter()
            .map(|n| (n.as_str(), DependencyKind::Dynamic));
        public.chain(private).chain(dynamic)
    }

    /// First dependency name declared in more than one category, if any
    pub fn duplicate_dependency(&self) -> Option<(&str, DependencyKind, DependencyKind)> {
        let mut seen: Vec<(&str, DependencyKind)> = Vec::new();
        for (name, kind) in self.all_dependencies() {
            if let Some((_, first)) = seen.iter().find(|(n, _)| *n == name) {
                return Some((name, *first, kind));
            }
            seen.push((name, kind));
        }
        None
    }

    /// Whether the module lists itself as a direct dependency
    pub fn depends_on_self(&self) -> bool {
        self.all_dependencies().any(|(name, _)| name == self.name)
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Validate a module name: non-empty, `[A-Za-z0-9_-]`, no leading digit
pub fn is_valid_module_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
