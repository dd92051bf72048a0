//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::{BuildTarget, Release, ReleaseChannel};

use super::defaults::{
    default_build_command, DEFAULT_CURSEFORGE_API_URL, DEFAULT_DISPLAY_NAME_FORMAT,
    DEFAULT_FILE_NAME_FORMAT, DEFAULT_MODRINTH_API_URL,
};

/// Main configuration for modship
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project metadata and naming
    pub project: ProjectConfig,

    /// Build tool and git settings
    pub build: BuildConfig,

    /// Build targets, in build and upload order
    pub targets: Vec<BuildTarget>,

    /// Release branches, in build and upload order
    pub releases: Vec<Release>,

    /// Modrinth publishing
    pub modrinth: ModrinthConfig,

    /// CurseForge publishing
    pub curseforge: CurseForgeConfig,
}

impl Config {
    /// Whether any publishing platform is enabled
    pub fn publishes(&self) -> bool {
        self.modrinth.enabled || self.curseforge.enabled
    }

    /// User agent sent with every API request
    pub fn user_agent(&self) -> String {
        self.project
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("modship/{}", env!("CARGO_PKG_VERSION")))
    }

    /// File name a built jar is staged under
    pub fn file_name(&self, release: &Release, target: &BuildTarget) -> String {
        render_template(
            &self.project.file_name_format,
            &self.project.version,
            &release.version,
            &target.folder,
        )
    }

    /// Version display name on both platforms; the loader is uppercased
    pub fn display_name(&self, release: &Release, target: &BuildTarget) -> String {
        render_template(
            &self.project.display_name_format,
            &self.project.version,
            &release.version,
            &target.folder.to_uppercase(),
        )
    }

    /// Output directory of a target inside the project
    pub fn output_dir(&self, target: &BuildTarget) -> PathBuf {
        self.project
            .path
            .join(&target.folder)
            .join(&self.build.output_dir)
    }
}

/// Substitute `{mod_version}`, `{mc_version}` and `{loader}`
pub fn render_template(template: &str, mod_version: &str, mc_version: &str, loader: &str) -> String {
    template
        .replace("{mod_version}", mod_version)
        .replace("{mc_version}", mc_version)
        .replace("{loader}", loader)
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Mod version being released (e.g. `3.0.10`)
    pub version: String,

    /// Release channel
    pub channel: ReleaseChannel,

    /// Project root containing the build tool wrapper
    pub path: PathBuf,

    /// Markdown changelog sent with every upload
    pub changelog: PathBuf,

    /// Staged jar name; must contain `{loader}` and `{mc_version}`, each bounded by separators
    pub file_name_format: String,

    /// Version display name
    pub display_name_format: String,

    /// User agent override
    pub user_agent: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            version: String::new(),
            channel: ReleaseChannel::Release,
            path: PathBuf::from("."),
            changelog: PathBuf::from("changelog.md"),
            file_name_format: DEFAULT_FILE_NAME_FORMAT.to_string(),
            display_name_format: DEFAULT_DISPLAY_NAME_FORMAT.to_string(),
            user_agent: None,
        }
    }
}

/// Build tool and version control settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build command, run once per release from the project root
    pub command: Vec<String>,

    /// Git executable
    pub git: String,

    /// Output directory relative to each target folder
    pub output_dir: PathBuf,

    /// Substrings marking files that are not the distributable jar
    pub exclude: Vec<String>,

    /// Environment variable receiving a release's toolchain override
    pub toolchain_env: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: default_build_command(),
            git: "git".to_string(),
            output_dir: PathBuf::from("build").join("libs"),
            exclude: vec!["dev-shadow".to_string(), "sources".to_string()],
            toolchain_env: "JAVA_HOME".to_string(),
        }
    }
}

/// Modrinth settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModrinthConfig {
    /// Whether to publish
    pub enabled: bool,

    /// Project ID
    pub project_id: String,

    /// Mark uploaded versions as featured
    pub featured: bool,

    /// API base URL
    pub api_url: String,
}

impl Default for ModrinthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            project_id: String::new(),
            featured: false,
            api_url: DEFAULT_MODRINTH_API_URL.to_string(),
        }
    }
}

/// CurseForge settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurseForgeConfig {
    /// Whether to publish
    pub enabled: bool,

    /// Numeric project ID
    pub project_id: String,

    /// API base URL
    pub api_url: String,
}

impl Default for CurseForgeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            project_id: String::new(),
            api_url: DEFAULT_CURSEFORGE_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Resolve `~`, `$VAR` and relative paths against the config file's directory
    pub fn resolve_paths(&mut self, base: &Path) -> crate::error::Result<()> {
        self.project.path = expand_path(&self.project.path, base, "project.path")?;
        self.project.changelog = expand_path(&self.project.changelog, base, "project.changelog")?;
        for (i, release) in self.releases.iter_mut().enumerate() {
            if let Some(toolchain) = &release.toolchain {
                release.toolchain = Some(expand_path(
                    toolchain,
                    base,
                    &format!("releases[{}].toolchain", i),
                )?);
            }
        }
        Ok(())
    }
}

fn expand_path(path: &Path, base: &Path, field: &str) -> crate::error::Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .map_err(|e| crate::error::ConfigError::invalid(field, e.to_string()))?;
    let expanded = PathBuf::from(expanded.as_ref());
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BuildTarget, Release};

    #[test]
    fn test_file_and_display_names() {
        let mut config = Config::default();
        config.project.version = "3.0.10".to_string();
        config.project.file_name_format = "mymod-{mod_version}-{mc_version}-{loader}.jar".to_string();
        let release = Release::new("main", "1.20.4");
        let target = BuildTarget::new("forge", vec!["forge".to_string()]);

        assert_eq!(config.file_name(&release, &target), "mymod-3.0.10-1.20.4-forge.jar");
        assert_eq!(config.display_name(&release, &target), "3.0.10 [FORGE 1.20.4]");
    }

    #[test]
    fn test_output_dir() {
        let mut config = Config::default();
        config.project.path = PathBuf::from("/work/mod");
        let target = BuildTarget::new("fabric", vec!["fabric".to_string()]);
        assert_eq!(
            config.output_dir(&target),
            PathBuf::from("/work/mod/fabric/build/libs")
        );
    }

    #[test]
    fn test_resolve_relative_paths() {
        let mut config = Config::default();
        config.project.changelog = PathBuf::from("docs/changelog.md");
        config.resolve_paths(Path::new("/work/mod")).unwrap();
        assert_eq!(config.project.path, PathBuf::from("/work/mod/."));
        assert_eq!(
            config.project.changelog,
            PathBuf::from("/work/mod/docs/changelog.md")
        );
    }

    #[test]
    fn test_default_user_agent() {
        let config = Config::default();
        assert!(config.user_agent().starts_with("modship/"));
    }
}
