//! CLI command implementations.

pub mod check;
pub mod export;
pub mod includes;
pub mod list;

use anyhow::Context;
use modlink::{find_workspace_root, TargetContext, Workspace};
use std::path::PathBuf;

/// Load the workspace from `--root` or by searching upward from the
/// current directory.
pub fn load_workspace(root: Option<PathBuf>) -> anyhow::Result<Workspace> {
    let root = match root {
        Some(root) => root,
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            find_workspace_root(&cwd).context(
                "No modlink.toml found in this directory or any parent; pass --root",
            )?
        }
    };
    Workspace::load(&root).with_context(|| format!("Failed to load workspace at {}", root.display()))
}

/// Target context: CLI flags over config defaults.
pub fn select_target(
    workspace: &Workspace,
    platform: Option<&str>,
    configuration: Option<&str>,
) -> anyhow::Result<TargetContext> {
    let mut target = workspace.default_target();
    if let Some(platform) = platform {
        target.platform = platform.parse()?;
    }
    if let Some(configuration) = configuration {
        target.configuration = configuration.parse()?;
    }
    Ok(target)
}
