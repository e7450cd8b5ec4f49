//! Configuration model
//!
//! Loads `shellbox.yaml` into a normalized in-memory structure. The file is
//! read fresh on every invocation and never written back. Defaults are
//! applied and invariants checked at load time so the rest of the crate can
//! rely on a well-formed [`Config`].

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::error::{Result, ShellboxError};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "shellbox.yaml";

/// Root of the project configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Project identifier; normalized into the image repository name.
    pub name: String,
    pub container: Container,
    #[serde(default)]
    pub shell: Shell,
}

/// Container image source and baked-in setup commands.
#[derive(Debug, Clone, Deserialize)]
pub struct Container {
    /// `docker` or `podman`; defaults to `docker`.
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub build: Option<ContainerBuild>,
    /// Shell commands baked into the image as `RUN` layers, in order.
    #[serde(default)]
    pub setup: Vec<String>,
}

/// Custom base-image build configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerBuild {
    #[serde(default)]
    pub dockerfile: String,
    /// Build context directory; defaults to `"."`.
    #[serde(default)]
    pub context: String,
    /// `--build-arg` key/value pairs. BTreeMap keeps argument order
    /// deterministic across invocations.
    #[serde(default)]
    pub args: BTreeMap<String, String>,
}

/// In-container shell behavior: startup hooks and named scripts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Shell {
    /// Commands run once per interactive session, before anything else.
    #[serde(default)]
    pub startup: Vec<String>,
    #[serde(default)]
    pub scripts: Vec<Script>,
}

/// A named sequence of shell commands, looked up by exact name match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Script {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Earlier schema revisions allowed a single command string here; both
    /// shapes are normalized to a list at load time.
    #[serde(default, deserialize_with = "string_or_list")]
    pub commands: Vec<String>,
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(command) => vec![command],
        OneOrMany::Many(commands) => commands,
    })
}

fn script_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[A-Za-z0-9][A-Za-z0-9_.-]*$").unwrap())
}

impl Config {
    /// Load, default, and validate a configuration file.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(ShellboxError::ConfigNotFound(path.to_path_buf()));
        }

        let data = fs::read_to_string(path)?;
        let mut config: Config =
            serde_yaml::from_str(&data).map_err(|source| ShellboxError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    fn apply_defaults(&mut self) {
        if self.container.provider.is_empty() {
            self.container.provider = "docker".to_string();
        }
        if let Some(build) = &mut self.container.build {
            if build.context.is_empty() {
                build.context = ".".to_string();
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let provider = self.container.provider.as_str();
        if provider != "docker" && provider != "podman" {
            return Err(ShellboxError::ConfigValidation(format!(
                "invalid provider: {provider}. Must be 'docker' or 'podman'"
            )));
        }

        match (&self.container.image, &self.container.build) {
            (None, None) => {
                return Err(ShellboxError::ConfigValidation(
                    "either 'container.image' or 'container.build' must be specified".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(ShellboxError::ConfigValidation(
                    "'container.image' and 'container.build' are mutually exclusive".to_string(),
                ))
            }
            _ => {}
        }

        if let Some(build) = &self.container.build {
            if build.dockerfile.is_empty() {
                return Err(ShellboxError::ConfigValidation(
                    "'container.build.dockerfile' is required when using a custom build"
                        .to_string(),
                ));
            }
        }

        let mut seen = HashSet::new();
        for script in &self.shell.scripts {
            if !script_name_pattern().is_match(&script.name) {
                return Err(ShellboxError::ConfigValidation(format!(
                    "invalid script name '{}': must match [A-Za-z0-9][A-Za-z0-9_.-]*",
                    script.name
                )));
            }
            if !seen.insert(script.name.as_str()) {
                return Err(ShellboxError::ConfigValidation(format!(
                    "duplicate script name '{}'",
                    script.name
                )));
            }
            if script.commands.is_empty() {
                return Err(ShellboxError::ConfigValidation(format!(
                    "script '{}' has no commands",
                    script.name
                )));
            }
        }

        Ok(())
    }

    /// Look up a script by exact name.
    pub fn script(&self, name: &str) -> Option<&Script> {
        self.shell.scripts.iter().find(|s| s.name == name)
    }
}
