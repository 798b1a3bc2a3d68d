//! Workspace loading
//!
//! Ties config, discovery, and registry population together: read
//! modlink.toml, discover module.toml files under the source root,
//! register every manifest plus the prebuilt set, and resolve the
//! graph for a target.

use crate::config::{WorkspaceConfig, CONFIG_FILE_NAME};
use crate::graph::{self, ResolvedGraph};
use crate::manifest::ModuleManifest;
use crate::paths::{discover_manifests, IncludePathChecker};
use crate::registry::ModuleRegistry;
use crate::target::TargetContext;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading or checking a workspace
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// Config loading failed
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// A manifest failed to parse
    #[error("Failed to load manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        source: crate::manifest::ManifestError,
    },

    /// Registry population failed
    #[error(transparent)]
    Registry(#[from] crate::registry::RegistryError),

    /// Graph resolution failed
    #[error(transparent)]
    Graph(#[from] crate::graph::GraphError),

    /// Discovery or include-path checking failed
    #[error(transparent)]
    Path(#[from] crate::paths::PathError),
}

/// A loaded workspace: config, registry, and per-module root directories
pub struct Workspace {
    root: PathBuf,
    config: WorkspaceConfig,
    registry: ModuleRegistry,
    module_roots: BTreeMap<String, PathBuf>,
}

impl Workspace {
    /// Load the workspace rooted at `root`
    ///
    /// Expects `modlink.toml` directly under `root`. Module manifests
    /// are discovered and registered in lexicographic path order, so
    /// loading is deterministic.
    pub fn load(root: &Path) -> Result<Self, WorkspaceError> {
        let config = WorkspaceConfig::from_file(&root.join(CONFIG_FILE_NAME))?;

        let mut registry = ModuleRegistry::new();
        for name in &config.workspace.prebuilt {
            registry.register_prebuilt(name.clone())?;
        }

        let source_root = root.join(&config.workspace.source_root);
        let mut module_roots = BTreeMap::new();
        for manifest_path in discover_manifests(&source_root)? {
            let manifest =
                ModuleManifest::from_file(&manifest_path).map_err(|source| {
                    WorkspaceError::Manifest {
                        path: manifest_path.clone(),
                        source,
                    }
                })?;
            let module_root = manifest_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| source_root.clone());
            module_roots.insert(manifest.module.name.clone(), module_root);
            registry.register(manifest.into_rules())?;
        }

        Ok(Self {
            root: root.to_path_buf(),
            config,
            registry,
            module_roots,
        })
    }

    /// Workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Workspace configuration
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Populated module registry
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Root directory of a declared module
    pub fn module_root(&self, name: &str) -> Option<&Path> {
        self.module_roots.get(name).map(PathBuf::as_path)
    }

    /// Default target: config `[target]` over built-in defaults
    pub fn default_target(&self) -> TargetContext {
        self.config.default_target()
    }

    /// Resolve the build graph for a target
    pub fn resolve(&self, target: &TargetContext) -> Result<ResolvedGraph, WorkspaceError> {
        Ok(graph::resolve(&self.registry, target)?)
    }

    /// Verify every resolved module's include paths on disk
    pub fn check_include_paths(&self, graph: &ResolvedGraph) -> Result<(), WorkspaceError> {
        for (name, module) in &graph.modules {
            if let Some(module_root) = self.module_root(name) {
                IncludePathChecker::new(module_root).check(&module.descriptor)?;
            }
        }
        Ok(())
    }
}
