//! `modlink check` — Resolve the workspace graph and report problems.

use crate::commands::{load_workspace, select_target};
use crate::output::StyledOutput;
use std::path::PathBuf;
use termcolor::ColorChoice;

pub fn execute(
    root: Option<PathBuf>,
    platform: Option<&str>,
    configuration: Option<&str>,
    paths: bool,
    color: ColorChoice,
) -> anyhow::Result<()> {
    let mut out = StyledOutput::new(color);

    let workspace = load_workspace(root)?;
    let target = select_target(&workspace, platform, configuration)?;

    let graph = match workspace.resolve(&target) {
        Ok(graph) => graph,
        Err(err) => {
            out.error_line(&err);
            std::process::exit(1);
        }
    };

    if paths {
        if let Err(err) = workspace.check_include_paths(&graph) {
            out.error_line(&err);
            std::process::exit(1);
        }
    }

    out.success("ok");
    out.plain(&format!(
        ": {} module(s) resolved for {}",
        graph.modules.len(),
        target
    ));
    if !graph.prebuilt.is_empty() {
        out.plain(&format!(" ({} prebuilt referenced)", graph.prebuilt.len()));
    }
    out.newline();
    out.flush();
    Ok(())
}
