//! Git branch switching through the git executable

use std::path::PathBuf;

use tracing::info;

use modship_core::BuildError;

use crate::runner::{CommandRunner, ToolCommand};

/// A working tree operated on by the git CLI
#[derive(Debug, Clone)]
pub struct Git {
    executable: String,
    workdir: PathBuf,
}

impl Git {
    /// Create a handle for the working tree at `workdir`
    pub fn new(executable: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            workdir: workdir.into(),
        }
    }

    /// Command that checks out `branch`
    pub fn checkout_command(&self, branch: &str) -> ToolCommand {
        ToolCommand::new(&self.executable, &self.workdir).args(["checkout", branch])
    }

    /// Switch the working tree to `branch`
    pub fn checkout(&self, runner: &dyn CommandRunner, branch: &str) -> Result<(), BuildError> {
        info!(branch, workdir = %self.workdir.display(), "checking out branch");
        runner.run(&self.checkout_command(branch))
    }
}
