//! `modlink export` — Emit the resolved graph as JSON.

use crate::commands::{load_workspace, select_target};
use anyhow::Context;
use std::path::PathBuf;

pub fn execute(
    root: Option<PathBuf>,
    platform: Option<&str>,
    configuration: Option<&str>,
    output: Option<PathBuf>,
    pretty: bool,
) -> anyhow::Result<()> {
    let workspace = load_workspace(root)?;
    let target = select_target(&workspace, platform, configuration)?;
    let graph = workspace.resolve(&target)?;

    let json = if pretty {
        graph.to_json_pretty()?
    } else {
        graph.to_json()?
    };

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => println!("{}", json),
    }
    Ok(())
}
