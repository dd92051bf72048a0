//! External process invocation

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, instrument};

use modship_core::BuildError;

/// A program invocation: executable, arguments, working directory and extra environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Executable name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
    /// Extra environment variables
    pub env: Vec<(String, OsString)>,
}

impl ToolCommand {
    /// Create a command running in `cwd`
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Executable path
    ///
    /// Relative paths such as `./gradlew` are taken from `cwd`. A bare name such as
    /// `gradlew.bat` is taken from `cwd` when that file exists there, and otherwise
    /// left for a `PATH` lookup.
    pub fn program_path(&self) -> PathBuf {
        let program = Path::new(&self.program);
        if program.is_relative()
            && (program.components().count() > 1 || self.cwd.join(program).is_file())
        {
            self.cwd.join(program)
        } else {
            program.to_path_buf()
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs external tools to completion
pub trait CommandRunner: Send + Sync {
    /// Run the command; a non-zero exit is an error
    fn run(&self, command: &ToolCommand) -> Result<(), BuildError>;
}

/// Runs commands as child processes sharing this process's stdio
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    #[instrument(skip(self), fields(command = %command, cwd = %command.cwd.display()))]
    fn run(&self, command: &ToolCommand) -> Result<(), BuildError> {
        debug!("spawning process");
        let status = Command::new(command.program_path())
            .args(&command.args)
            .current_dir(&command.cwd)
            .envs(command.env.iter().map(|(k, v)| (k, v)))
            .status()
            .map_err(|source| BuildError::SpawnFailed {
                command: command.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(BuildError::CommandFailed {
                command: command.to_string(),
                status: status.to_string(),
            });
        }

        debug!("process exited successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let cmd = ToolCommand::new("git", "/work").args(["checkout", "main"]);
        assert_eq!(cmd.to_string(), "git checkout main");
    }

    #[test]
    fn test_program_path() {
        let wrapper = ToolCommand::new("./gradlew", "/work/mod");
        assert_eq!(wrapper.program_path(), PathBuf::from("/work/mod/./gradlew"));

        let on_path = ToolCommand::new("git", "/work/mod");
        assert_eq!(on_path.program_path(), PathBuf::from("git"));
    }

    #[test]
    fn test_env() {
        let cmd = ToolCommand::new("gradle", "/work").env("JAVA_HOME", "/opt/jdk17");
        assert_eq!(cmd.env, vec![("JAVA_HOME".to_string(), OsString::from("/opt/jdk17"))]);
    }
}
