//! Build orchestration across release branches

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use modship_core::{
    ArtifactIndex, BuildTarget, Config, EffectiveMatrix, MatrixCell, Release, Result,
    StagedArtifact,
};

use crate::git::Git;
use crate::output::{clear_output_dir, move_file, select_build_output};
use crate::prerequisites::check_prerequisites;
use crate::runner::{CommandRunner, SystemRunner, ToolCommand};

/// Produces staged artifacts for every cell of a matrix
pub trait ArtifactBuilder {
    /// Check that every external tool the build needs is available
    fn check_prerequisites(&self) -> Result<()> {
        Ok(())
    }

    /// Build everything and return the index of staged files
    fn build_all(&self, matrix: &EffectiveMatrix<'_>, staging: &Path) -> Result<ArtifactIndex>;
}

/// Checks out each release branch, builds it and stages the jars
pub struct BuildOrchestrator<'a> {
    config: &'a Config,
    runner: Arc<dyn CommandRunner>,
    git: Git,
}

impl<'a> BuildOrchestrator<'a> {
    /// Create an orchestrator running real processes
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            runner: Arc::new(SystemRunner),
            git: Git::new(&config.build.git, &config.project.path),
        }
    }

    /// Use a different command runner
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Build tool invocation for a release
    pub fn build_command(&self, release: &Release) -> ToolCommand {
        let mut parts = self.config.build.command.iter();
        let program = parts.next().map(String::as_str).unwrap_or_default();
        let mut command = ToolCommand::new(program, &self.config.project.path).args(parts.cloned());

        if let Some(toolchain) = &release.toolchain {
            command = command.env(&self.config.build.toolchain_env, toolchain.as_os_str());
        }

        command
    }

    #[instrument(skip(self, release, targets, staging, index), fields(branch = %release.branch, version = %release.version))]
    fn build_release(
        &self,
        release: &Release,
        targets: &[&BuildTarget],
        staging: &Path,
        index: &mut ArtifactIndex,
    ) -> Result<()> {
        let start = Instant::now();

        self.git.checkout(self.runner.as_ref(), &release.branch)?;

        for target in targets {
            clear_output_dir(&self.config.output_dir(target))?;
        }

        self.runner.run(&self.build_command(release))?;

        for &target in targets {
            let cell = MatrixCell { release, target };
            let artifact = self.stage(&cell, staging)?;
            info!(
                target = %target.folder,
                file = %artifact.file_name,
                size = artifact.size,
                sha256 = %artifact.sha256,
                "staged artifact"
            );
            index.insert(cell.key(), artifact)?;
        }

        info!(
            targets = targets.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "release built"
        );
        Ok(())
    }

    fn stage(&self, cell: &MatrixCell<'_>, staging: &Path) -> Result<StagedArtifact> {
        let output_dir = self.config.output_dir(cell.target);
        let built = select_build_output(&output_dir, &self.config.build.exclude, &cell.key())?;
        let staged = staging.join(self.config.file_name(cell.release, cell.target));
        move_file(&built, &staged)?;
        Ok(StagedArtifact::from_path(staged)?)
    }
}

impl ArtifactBuilder for BuildOrchestrator<'_> {
    fn check_prerequisites(&self) -> Result<()> {
        check_prerequisites(self.config)?;
        Ok(())
    }

    #[instrument(skip(self, matrix, staging), fields(releases = matrix.groups().len(), cells = matrix.len(), staging = %staging.display()))]
    fn build_all(&self, matrix: &EffectiveMatrix<'_>, staging: &Path) -> Result<ArtifactIndex> {
        let mut index = ArtifactIndex::new();

        for group in matrix.groups() {
            info!(release = %group.release, "building release");
            self.build_release(group.release, &group.targets, staging, &mut index)?;
        }

        info!(artifacts = index.len(), "all releases built");
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modship_core::{ArtifactError, ArtifactKey, BuildError, ModshipError};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records commands; a build writes the given files into each target output directory
    struct FakeRunner {
        commands: Mutex<Vec<ToolCommand>>,
        outputs: Vec<(PathBuf, Vec<&'static str>)>,
        failing_branch: Option<&'static str>,
    }

    impl FakeRunner {
        fn new(outputs: Vec<(PathBuf, Vec<&'static str>)>) -> Self {
            Self {
                commands: Mutex::new(Vec::new()),
                outputs,
                failing_branch: None,
            }
        }

        fn recorded(&self) -> Vec<String> {
            self.commands
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.to_string())
                .collect()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, command: &ToolCommand) -> std::result::Result<(), BuildError> {
            self.commands.lock().unwrap().push(command.clone());

            if command.program == "git" {
                if Some(command.args[1].as_str()) == self.failing_branch {
                    return Err(BuildError::CommandFailed {
                        command: command.to_string(),
                        status: "exit status: 1".to_string(),
                    });
                }
                return Ok(());
            }

            for (dir, files) in &self.outputs {
                std::fs::create_dir_all(dir).unwrap();
                for file in files {
                    std::fs::write(dir.join(file), command.cwd.to_string_lossy().as_bytes())
                        .unwrap();
                }
            }
            Ok(())
        }
    }

    struct Fixture {
        project: TempDir,
        staging: TempDir,
        config: Config,
    }

    fn fixture() -> Fixture {
        let project = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();

        let mut config = Config::default();
        config.project.version = "3.0.10".to_string();
        config.project.path = project.path().to_path_buf();
        config.project.file_name_format = "mymod-{mod_version}-{mc_version}-{loader}.jar".to_string();
        config.build.command = vec!["./gradlew".to_string(), "build".to_string()];
        config.targets = vec![
            BuildTarget::new("fabric", vec!["fabric".to_string()]),
            BuildTarget::new("forge", vec!["forge".to_string()])
                .with_versions(vec!["1.19.2".to_string()]),
        ];
        config.releases = vec![
            Release::new("1.19.x", "1.19.2"),
            Release::new("main", "1.20.4"),
        ];

        Fixture {
            project,
            staging,
            config,
        }
    }

    fn libs(project: &TempDir, folder: &str) -> PathBuf {
        project.path().join(folder).join("build").join("libs")
    }

    #[test]
    fn test_builds_every_release_in_order() {
        let fx = fixture();
        let runner = Arc::new(FakeRunner::new(vec![
            (libs(&fx.project, "fabric"), vec!["fabric-out.jar", "fabric-out-sources.jar"]),
            (libs(&fx.project, "forge"), vec!["forge-out.jar", "forge-out-dev-shadow.jar"]),
        ]));
        let orchestrator = BuildOrchestrator::new(&fx.config).with_runner(runner.clone());
        let matrix = EffectiveMatrix::from_config(&fx.config);

        let index = orchestrator.build_all(&matrix, fx.staging.path()).unwrap();

        assert_eq!(
            runner.recorded(),
            vec![
                "git checkout 1.19.x",
                "./gradlew build",
                "git checkout main",
                "./gradlew build",
            ]
        );
        assert_eq!(index.len(), 3);
        assert_eq!(
            index.get(&ArtifactKey::new("1.19.2", "forge")).unwrap().file_name,
            "mymod-3.0.10-1.19.2-forge.jar"
        );
        assert_eq!(
            index.get(&ArtifactKey::new("1.20.4", "fabric")).unwrap().path,
            fx.staging.path().join("mymod-3.0.10-1.20.4-fabric.jar")
        );
        assert!(index.get(&ArtifactKey::new("1.20.4", "forge")).is_err());
        assert!(!fx.staging.path().join("mymod-3.0.10-1.20.4-forge.jar").exists());
    }

    #[test]
    fn test_checkout_failure_stops_everything() {
        let fx = fixture();
        let mut fake = FakeRunner::new(vec![(libs(&fx.project, "fabric"), vec!["fabric.jar"])]);
        fake.failing_branch = Some("1.19.x");
        let runner = Arc::new(fake);
        let orchestrator = BuildOrchestrator::new(&fx.config).with_runner(runner.clone());
        let matrix = EffectiveMatrix::from_config(&fx.config);

        let err = orchestrator.build_all(&matrix, fx.staging.path()).unwrap_err();

        assert!(matches!(err, ModshipError::Build(BuildError::CommandFailed { .. })));
        assert_eq!(runner.recorded(), vec!["git checkout 1.19.x"]);
        assert_eq!(std::fs::read_dir(fx.staging.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_jar_aborts_run() {
        let fx = fixture();
        let runner = Arc::new(FakeRunner::new(vec![
            (libs(&fx.project, "fabric"), vec!["fabric-sources.jar"]),
            (libs(&fx.project, "forge"), vec!["forge.jar"]),
        ]));
        let orchestrator = BuildOrchestrator::new(&fx.config).with_runner(runner.clone());
        let matrix = EffectiveMatrix::from_config(&fx.config);

        let err = orchestrator.build_all(&matrix, fx.staging.path()).unwrap_err();

        assert!(matches!(err, ModshipError::Artifact(ArtifactError::Missing { .. })));
        assert_eq!(runner.recorded().len(), 2);
    }

    #[test]
    fn test_multiple_jars_are_ambiguous() {
        let fx = fixture();
        let runner = Arc::new(FakeRunner::new(vec![
            (libs(&fx.project, "fabric"), vec!["a.jar", "b.jar"]),
            (libs(&fx.project, "forge"), vec!["forge.jar"]),
        ]));
        let orchestrator = BuildOrchestrator::new(&fx.config).with_runner(runner);
        let matrix = EffectiveMatrix::from_config(&fx.config);

        let err = orchestrator.build_all(&matrix, fx.staging.path()).unwrap_err();
        assert!(matches!(err, ModshipError::Artifact(ArtifactError::Ambiguous { .. })));
    }

    #[test]
    fn test_stale_output_is_cleared() {
        let fx = fixture();
        let stale_dir = libs(&fx.project, "fabric");
        std::fs::create_dir_all(&stale_dir).unwrap();
        std::fs::write(stale_dir.join("fabric-old.jar"), b"stale").unwrap();

        let runner = Arc::new(FakeRunner::new(vec![
            (libs(&fx.project, "fabric"), vec!["fabric-new.jar"]),
            (libs(&fx.project, "forge"), vec!["forge.jar"]),
        ]));
        let orchestrator = BuildOrchestrator::new(&fx.config).with_runner(runner);
        let matrix = EffectiveMatrix::from_config(&fx.config);

        let index = orchestrator.build_all(&matrix, fx.staging.path()).unwrap();
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_toolchain_override() {
        let mut fx = fixture();
        fx.config.releases[0] = Release::new("1.19.x", "1.19.2").with_toolchain("/opt/jdk17");
        let orchestrator = BuildOrchestrator::new(&fx.config);

        let with_override = orchestrator.build_command(&fx.config.releases[0]);
        assert_eq!(
            with_override.env,
            vec![("JAVA_HOME".to_string(), std::ffi::OsString::from("/opt/jdk17"))]
        );
        assert!(orchestrator.build_command(&fx.config.releases[1]).env.is_empty());
    }
}
