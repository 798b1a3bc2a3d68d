//! `modlink includes` — Print the compile-visible include closure of a module.

use crate::commands::{load_workspace, select_target};
use crate::output::StyledOutput;
use anyhow::bail;
use std::path::PathBuf;
use termcolor::ColorChoice;

pub fn execute(
    root: Option<PathBuf>,
    platform: Option<&str>,
    configuration: Option<&str>,
    module: &str,
    exported: bool,
    color: ColorChoice,
) -> anyhow::Result<()> {
    let mut out = StyledOutput::new(color);

    let workspace = load_workspace(root)?;
    let target = select_target(&workspace, platform, configuration)?;
    let graph = workspace.resolve(&target)?;

    let Some(resolved) = graph.get(module) else {
        bail!("Unknown module '{}'", module);
    };

    let paths = if exported {
        &resolved.exported_includes
    } else {
        &resolved.compile_includes
    };

    out.bold(&format!(
        "{} include paths for {} ({}):",
        if exported { "Exported" } else { "Compile-visible" },
        module,
        target
    ));
    out.newline();
    for path in paths {
        out.plain(&format!("  {}", path));
        out.newline();
    }
    out.flush();
    Ok(())
}
