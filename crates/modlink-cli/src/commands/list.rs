//! `modlink list` — Print declared modules and their dependency counts.

use crate::commands::{load_workspace, select_target};
use crate::output::StyledOutput;
use std::path::PathBuf;
use termcolor::ColorChoice;

pub fn execute(
    root: Option<PathBuf>,
    platform: Option<&str>,
    configuration: Option<&str>,
    color: ColorChoice,
) -> anyhow::Result<()> {
    let mut out = StyledOutput::new(color);

    let workspace = load_workspace(root)?;
    let target = select_target(&workspace, platform, configuration)?;
    let graph = workspace.resolve(&target)?;

    out.bold(&format!("Modules for {}:", target));
    out.newline();
    for name in &graph.build_order {
        let module = &graph.modules[name];
        let desc = &module.descriptor;
        out.info(&format!("  {}", name));
        out.plain(&format!(
            "  public: {}, private: {}, dynamic: {}",
            desc.public_dependencies.len(),
            desc.private_dependencies.len(),
            desc.dynamically_loaded.len()
        ));
        out.newline();
    }

    if !graph.prebuilt.is_empty() {
        out.bold("Prebuilt:");
        out.newline();
        for name in &graph.prebuilt {
            out.plain(&format!("  {}", name));
            out.newline();
        }
    }

    out.flush();
    Ok(())
}
