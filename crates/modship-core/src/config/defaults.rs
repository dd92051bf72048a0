//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "modship.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "modship.yaml";

/// Default Modrinth API
pub const DEFAULT_MODRINTH_API_URL: &str = "https://api.modrinth.com";

/// Default CurseForge upload API
pub const DEFAULT_CURSEFORGE_API_URL: &str = "https://minecraft.curseforge.com";

/// Default staged jar name
pub const DEFAULT_FILE_NAME_FORMAT: &str = "mod-{mod_version}-{mc_version}-{loader}.jar";

/// Default version display name
pub const DEFAULT_DISPLAY_NAME_FORMAT: &str = "{mod_version} [{loader} {mc_version}]";

/// Environment variable holding the Modrinth token
pub const MODRINTH_TOKEN_ENV: &str = "MODRINTH_TOKEN";

/// Environment variable holding the CurseForge token
pub const CURSEFORGE_TOKEN_ENV: &str = "CURSEFORGE_TOKEN";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".modship.toml",
        ".modship.yaml",
    ]
}

/// Gradle wrapper invocation for the current platform
pub fn default_build_command() -> Vec<String> {
    let wrapper = if cfg!(windows) { "gradlew.bat" } else { "./gradlew" };
    vec![wrapper.to_string(), "build".to_string()]
}

/// Starter configuration written by `modship init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# modship configuration

[project]
version = "1.0.0"
# release, beta or alpha
channel = "release"
path = "."
changelog = "changelog.md"
# {loader} and {mc_version} must both appear before the extension,
# each separated from its neighbours by a character such as - or _
file_name_format = "mymod-{mod_version}-{mc_version}-{loader}.jar"
display_name_format = "{mod_version} [{loader} {mc_version}]"

[build]
git = "git"
output_dir = "build/libs"
exclude = ["dev-shadow", "sources"]
toolchain_env = "JAVA_HOME"

[[targets]]
folder = "fabric"
loaders = ["fabric", "quilt"]
dependencies = [
    { modrinth_id = "P7dR8mSH", curseforge_slug = "fabric-api", kind = "required" },
]

[[targets]]
folder = "forge"
loaders = ["forge"]
# versions = ["1.20.4"]

[[releases]]
branch = "main"
version = "1.20.4"
# toolchain = "~/.jdks/temurin-17"

[modrinth]
enabled = false
project_id = ""
featured = false

[curseforge]
enabled = false
project_id = ""
"#;
