//! Module descriptor and build-graph library
//!
//! This crate provides the module-declaration layer of a plugin-style
//! module tree, including:
//! - Module descriptors (PCH mode, include paths, dependency categories)
//! - Target contexts (platform, build configuration)
//! - Module rules (per-target descriptor construction)
//! - Module manifest parsing (module.toml, with target overlays)
//! - Workspace configuration (modlink.toml) and manifest discovery
//! - Build-graph resolution (name resolution, cycle rejection,
//!   include-path visibility, deterministic build order)

pub mod config;
pub mod descriptor;
pub mod graph;
pub mod manifest;
pub mod paths;
pub mod registry;
pub mod rules;
pub mod target;
pub mod workspace;

pub use config::{ConfigError, TargetSection, WorkspaceConfig, WorkspaceSection, CONFIG_FILE_NAME};
pub use descriptor::{
    is_valid_module_name, DependencyKind, ModuleDescriptor, PchUsage, PchUsageError,
};
pub use graph::{resolve, GraphError, ResolvedGraph, ResolvedModule};
pub use manifest::{
    DependencySection, IncludeSection, ManifestError, ManifestRules, ModuleInfo, ModuleManifest,
    Overlay,
};
pub use paths::{
    discover_manifests, find_workspace_root, IncludePathChecker, PathError, MANIFEST_FILE_NAME,
};
pub use registry::{ModuleRegistry, RegistryError};
pub use rules::{ModuleRules, RulesFn};
pub use target::{BuildConfiguration, TargetContext, TargetError, TargetPlatform};
pub use workspace::{Workspace, WorkspaceError};
