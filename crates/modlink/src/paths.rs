//! Workspace discovery and on-disk path checks
//!
//! Upward search for the workspace config, glob discovery of module
//! manifests under the source root, and verification that declared
//! include paths exist as directories under each module's root.

use crate::config::CONFIG_FILE_NAME;
use crate::descriptor::ModuleDescriptor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of a module manifest file
pub const MANIFEST_FILE_NAME: &str = "module.toml";

/// Errors that can occur during discovery and path checking
#[derive(Debug, Error)]
pub enum PathError {
    /// Path does not exist
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Path is not a directory
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A declared include path with no directory behind it
    #[error("Module '{module}' declares include path '{path}' but {resolved} is missing")]
    MissingIncludePath {
        module: String,
        path: String,
        resolved: PathBuf,
    },

    /// A declared include path resolving to a non-directory
    #[error("Module '{module}' include path '{path}' is not a directory: {resolved}")]
    IncludePathNotADirectory {
        module: String,
        path: String,
        resolved: PathBuf,
    },

    /// Invalid glob pattern while discovering manifests
    #[error("Invalid discovery pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Find the workspace root by walking up to the nearest modlink.toml
pub fn find_workspace_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Discover module manifests under a source root
///
/// Returns `module.toml` paths in lexicographic order so downstream
/// registration is deterministic.
pub fn discover_manifests(source_root: &Path) -> Result<Vec<PathBuf>, PathError> {
    if !source_root.exists() {
        return Err(PathError::PathNotFound(source_root.to_path_buf()));
    }
    if !source_root.is_dir() {
        return Err(PathError::NotADirectory(source_root.to_path_buf()));
    }

    let pattern = source_root.join("**").join(MANIFEST_FILE_NAME);
    let pattern = pattern.to_string_lossy().into_owned();

    let mut manifests: Vec<PathBuf> = glob::glob(&pattern)?.flatten().collect();
    manifests.sort();
    Ok(manifests)
}

/// Verifies declared include paths against the on-disk module tree
pub struct IncludePathChecker {
    module_root: PathBuf,
}

impl IncludePathChecker {
    /// Create a checker for one module's root directory
    pub fn new(module_root: impl AsRef<Path>) -> Self {
        Self {
            module_root: module_root.as_ref().to_path_buf(),
        }
    }

    /// Check every include path the descriptor declares
    ///
    /// Stops at the first missing or non-directory path.
    pub fn check(&self, descriptor: &ModuleDescriptor) -> Result<(), PathError> {
        for path in descriptor
            .public_include_paths
            .iter()
            .chain(descriptor.private_include_paths.iter())
        {
            let resolved = self.module_root.join(path);
            if !resolved.exists() {
                return Err(PathError::MissingIncludePath {
                    module: descriptor.name.clone(),
                    path: path.clone(),
                    resolved,
                });
            }
            if !resolved.is_dir() {
                return Err(PathError::IncludePathNotADirectory {
                    module: descriptor.name.clone(),
                    path: path.clone(),
                    resolved,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn create_temp_workspace() -> (tempfile::TempDir, PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().to_path_buf();
        fs::write(root.join(CONFIG_FILE_NAME), "[workspace]\n").unwrap();
        (temp, root)
    }

    #[test]
    fn test_find_workspace_root() {
        let (_temp, root) = create_temp_workspace();

        let nested = root.join("Source").join("GameCore").join("Private");
        fs::create_dir_all(&nested).unwrap();

        let found = find_workspace_root(&nested).unwrap();
        assert_eq!(found, root);
    }

    #[test]
    fn test_find_workspace_root_missing() {
        let temp = tempfile::tempdir().unwrap();
        // No modlink.toml anywhere under the temp dir; the search may
        // still find one in an enclosing directory, so only assert it
        // is not the temp dir itself.
        let found = find_workspace_root(temp.path());
        assert_ne!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn test_discover_manifests_sorted() {
        let (_temp, root) = create_temp_workspace();
        let source = root.join("Source");

        for module in ["Zeta", "Alpha", "Mid/Nested"] {
            let dir = source.join(module);
            fs::create_dir_all(&dir).unwrap();
            fs::write(
                dir.join(MANIFEST_FILE_NAME),
                "[module]\nname = \"placeholder\"\n",
            )
            .unwrap();
        }

        let manifests = discover_manifests(&source).unwrap();
        assert_eq!(manifests.len(), 3);
        assert!(manifests[0].ends_with("Alpha/module.toml"));
        assert!(manifests[1].ends_with("Mid/Nested/module.toml"));
        assert!(manifests[2].ends_with("Zeta/module.toml"));
    }

    #[test]
    fn test_discover_missing_source_root() {
        let (_temp, root) = create_temp_workspace();
        let result = discover_manifests(&root.join("Source"));
        assert!(matches!(result, Err(PathError::PathNotFound(_))));
    }

    #[test]
    fn test_include_path_checker() {
        let (_temp, root) = create_temp_workspace();
        let module_root = root.join("Source").join("GameCore");
        fs::create_dir_all(module_root.join("Public")).unwrap();

        let mut desc = ModuleDescriptor::new("GameCore");
        desc.add_public_include_path("Public");

        let checker = IncludePathChecker::new(&module_root);
        assert!(checker.check(&desc).is_ok());

        desc.add_private_include_path("Private");
        let result = checker.check(&desc);
        match result {
            Err(PathError::MissingIncludePath { module, path, .. }) => {
                assert_eq!(module, "GameCore");
                assert_eq!(path, "Private");
            }
            other => panic!("Expected MissingIncludePath, got {:?}", other),
        }
    }

    #[test]
    fn test_include_path_not_a_directory() {
        let (_temp, root) = create_temp_workspace();
        let module_root = root.join("Source").join("GameCore");
        fs::create_dir_all(&module_root).unwrap();
        fs::write(module_root.join("Public"), "not a directory").unwrap();

        let mut desc = ModuleDescriptor::new("GameCore");
        desc.add_public_include_path("Public");

        let checker = IncludePathChecker::new(&module_root);
        assert!(matches!(
            checker.check(&desc),
            Err(PathError::IncludePathNotADirectory { .. })
        ));
    }
}
