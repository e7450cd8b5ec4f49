//! Container engine providers
//!
//! The core never talks to an engine's wire protocol; it only goes through
//! the [`ContainerProvider`] trait. The production implementation shells
//! out to the `docker` or `podman` binary with stdio passed through.

pub mod cli;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Result, ShellboxError};

pub use cli::EngineCli;

/// Narrow contract the core depends on for building and running images.
pub trait ContainerProvider {
    /// Binary name, for diagnostics.
    fn name(&self) -> &str;

    /// Whether the engine binary can be invoked at all.
    fn is_available(&self) -> bool;

    /// Build the environment image for `tag` (including the custom base
    /// image when the configuration declares one).
    fn build_image(&self, config: &Config, tag: &str) -> Result<()>;

    /// Run `command` non-interactively inside a fresh container, streaming
    /// stdio through. A non-zero command exit surfaces as
    /// [`ShellboxError::CommandExited`] with the verbatim code.
    fn run_command(&self, config: &Config, tag: &str, command: &[String]) -> Result<()>;

    /// Run a plain interactive shell.
    fn run_shell(&self, config: &Config, tag: &str) -> Result<()>;

    /// Run an interactive session that boots via the generated wrapper
    /// program (startup hooks + dispatcher).
    fn run_shell_with_startup(&self, config: &Config, tag: &str, wrapper: &str) -> Result<()>;

    fn image_exists(&self, tag: &str) -> bool;

    fn remove_image(&self, tag: &str) -> Result<()>;

    /// Images created by this tool (filtered by label).
    fn list_images(&self) -> Result<Vec<ImageRecord>>;

    /// Dangling images created by this tool; prune candidates.
    fn dangling_images(&self) -> Result<Vec<ImageRecord>>;

    fn image_info(&self, reference: &str) -> Result<ImageInfo>;
}

/// One row of `images --format '{{json .}}'` output.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRecord {
    #[serde(rename = "Repository", default)]
    pub repository: String,
    #[serde(rename = "Tag", default)]
    pub tag: String,
    #[serde(rename = "ID", alias = "Id", default)]
    pub id: String,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: String,
    #[serde(rename = "Size", default)]
    pub size: String,
}

impl ImageRecord {
    pub fn reference(&self) -> String {
        format!("{}:{}", self.repository, self.tag)
    }
}

/// Subset of `image inspect` output shown by `image info`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageInfo {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "RepoTags", default)]
    pub repo_tags: Vec<String>,
    #[serde(rename = "Created", default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "Size", default)]
    pub size: u64,
    #[serde(rename = "Architecture", default)]
    pub architecture: String,
    #[serde(rename = "Os", default)]
    pub os: String,
}

/// Instantiate the provider named in the configuration.
pub fn new_provider(provider: &str) -> Result<Box<dyn ContainerProvider>> {
    match provider {
        "docker" => Ok(Box::new(EngineCli::docker())),
        "podman" => Ok(Box::new(EngineCli::podman())),
        other => Err(ShellboxError::ConfigValidation(format!(
            "unsupported container provider: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_provider_known_names() {
        assert_eq!(new_provider("docker").unwrap().name(), "docker");
        assert_eq!(new_provider("podman").unwrap().name(), "podman");
        assert!(new_provider("lxc").is_err());
    }

    #[test]
    fn test_image_record_from_docker_json() {
        let line = r#"{"Repository":"demo","Tag":"abc123def456","ID":"f00dcafe","CreatedAt":"2024-06-01 10:00:00 +0000 UTC","Size":"12.3MB"}"#;
        let record: ImageRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.reference(), "demo:abc123def456");
        assert_eq!(record.size, "12.3MB");
    }

    #[test]
    fn test_image_info_from_inspect_json() {
        let json = r#"{
            "Id": "sha256:0123456789ab",
            "RepoTags": ["demo:abc123def456"],
            "Created": "2024-06-01T10:00:00.000000000Z",
            "Size": 7340032,
            "Architecture": "amd64",
            "Os": "linux"
        }"#;
        let info: ImageInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.repo_tags, vec!["demo:abc123def456"]);
        assert_eq!(info.size, 7_340_032);
        assert!(info.created.is_some());
        assert_eq!(info.os, "linux");
    }

    #[test]
    fn test_image_info_tolerates_missing_fields() {
        let info: ImageInfo = serde_json::from_str(r#"{"Id": "sha256:feed"}"#).unwrap();
        assert!(info.created.is_none());
        assert!(info.repo_tags.is_empty());
    }
}
