//! Tool availability checks run before any side effect

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use modship_core::{BuildError, Config};

use crate::runner::ToolCommand;

/// Resolve an executable the way the runner will invoke it
pub fn resolve_tool(program: &str, cwd: &Path) -> Result<PathBuf, BuildError> {
    let command = ToolCommand::new(program, cwd);
    let path = command.program_path();

    if path.components().count() > 1 {
        if path.is_file() {
            return Ok(path);
        }
        return Err(BuildError::ToolNotFound {
            tool: program.to_string(),
            reason: format!("{} does not exist", path.display()),
        });
    }

    which::which(program).map_err(|e| BuildError::ToolNotFound {
        tool: program.to_string(),
        reason: e.to_string(),
    })
}

/// Check that git and the build tool can be found
#[instrument(skip(config), fields(project = %config.project.path.display()))]
pub fn check_prerequisites(config: &Config) -> Result<(), BuildError> {
    let git = resolve_tool(&config.build.git, &config.project.path)?;
    debug!(git = %git.display(), "found git");

    if let Some(program) = config.build.command.first() {
        let tool = resolve_tool(program, &config.project.path)?;
        debug!(tool = %tool.display(), "found build tool");
    }

    Ok(())
}
