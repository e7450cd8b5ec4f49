//! Docker/podman engine implementation
//!
//! Both engines expose the same CLI surface for everything this tool
//! needs, so a single implementation parameterized by binary name covers
//! them. All interaction goes through the binary: there is no API socket
//! dependency, and stdio is inherited for interactive commands.

use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};

use crate::config::Config;
use crate::error::{Result, ShellboxError};
use crate::name::normalize_name;
use crate::provider::{ContainerProvider, ImageInfo, ImageRecord};

/// Label attached to every generated image so list/clean/prune can filter
/// down to images this tool created.
const MANAGED_LABEL: &str = "shellbox.managed=true";

pub struct EngineCli {
    binary: &'static str,
}

impl EngineCli {
    pub const fn docker() -> Self {
        Self { binary: "docker" }
    }

    pub const fn podman() -> Self {
        Self { binary: "podman" }
    }

    /// Run with stdio inherited; used for builds and container runs where
    /// the user should see the engine's own output.
    fn passthrough(&self, args: &[String]) -> Result<ExitStatus> {
        Ok(Command::new(self.binary).args(args).status()?)
    }

    /// Run silently; true on exit status zero.
    fn quiet(&self, args: &[&str]) -> bool {
        Command::new(self.binary)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Run with captured output; stderr becomes the error message on
    /// failure.
    fn capture(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(self.binary).args(args).output()?;
        if !output.status.success() {
            return Err(ShellboxError::EngineFailed(format!(
                "{} {} failed: {}",
                self.binary,
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Build the user's custom base image (`<name>:custom`) from their
    /// Dockerfile. Skipped when it already exists; `build --force` removes
    /// it beforehand to get a genuine rebuild.
    fn build_custom_image(&self, config: &Config) -> Result<()> {
        let Some(build) = &config.container.build else {
            return Ok(());
        };

        let custom_tag = custom_base_tag(config);
        if self.image_exists(&custom_tag) {
            return Ok(());
        }

        let mut args: Vec<String> = vec![
            "build".into(),
            "-t".into(),
            custom_tag.clone(),
            "-f".into(),
            build.dockerfile.clone(),
        ];
        for (key, value) in &build.args {
            args.push("--build-arg".into());
            args.push(format!("{key}={value}"));
        }
        args.push(build.context.clone());

        let status = self.passthrough(&args)?;
        if !status.success() {
            return Err(ShellboxError::BuildFailed(format!(
                "custom image build for {custom_tag} failed"
            )));
        }
        Ok(())
    }

    /// Build the environment image from the generated Dockerfile, streamed
    /// to the engine on stdin.
    fn build_runtime_image(&self, config: &Config, tag: &str) -> Result<()> {
        let dockerfile = runtime_dockerfile(config);

        let mut child = Command::new(self.binary)
            .args(["build", "-t", tag, "-f", "-", "."])
            .stdin(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dockerfile.as_bytes())?;
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(ShellboxError::BuildFailed(format!(
                "{} build for {tag} failed",
                self.binary
            )));
        }
        Ok(())
    }

    fn run_container(
        &self,
        _config: &Config,
        tag: &str,
        command: &[String],
        interactive: bool,
    ) -> Result<()> {
        let mut args: Vec<String> = vec!["run".into(), "--rm".into()];
        if interactive {
            args.push("-it".into());
        }

        if let Some((os, arch)) = host_platform() {
            args.push("-e".into());
            args.push(format!("SHELLBOX_HOST_OS={os}"));
            args.push("-e".into());
            args.push(format!("SHELLBOX_HOST_ARCH={arch}"));
        }

        // The project directory is the container's whole world.
        let working_dir = std::env::current_dir()?;
        args.push("-v".into());
        args.push(format!("{}:/workspace", working_dir.display()));
        args.push("-w".into());
        args.push("/workspace".into());

        args.push(tag.to_string());
        args.extend(command.iter().cloned());

        let status = self.passthrough(&args)?;
        if status.success() {
            Ok(())
        } else {
            Err(ShellboxError::CommandExited(status.code().unwrap_or(1)))
        }
    }

    fn list_with_filters(&self, extra_filters: &[&str]) -> Result<Vec<ImageRecord>> {
        let managed_filter = format!("label={MANAGED_LABEL}");
        let mut args = vec!["images", "--filter", managed_filter.as_str()];
        for filter in extra_filters {
            args.push("--filter");
            args.push(filter);
        }
        args.push("--format");
        args.push("{{json .}}");

        let output = self.capture(&args)?;
        let mut records = Vec::new();
        for line in output.lines().filter(|l| !l.trim().is_empty()) {
            records.push(serde_json::from_str(line)?);
        }
        Ok(records)
    }
}

impl ContainerProvider for EngineCli {
    fn name(&self) -> &str {
        self.binary
    }

    fn is_available(&self) -> bool {
        self.quiet(&["--version"])
    }

    fn build_image(&self, config: &Config, tag: &str) -> Result<()> {
        self.build_custom_image(config)?;
        self.build_runtime_image(config, tag)
    }

    fn run_command(&self, config: &Config, tag: &str, command: &[String]) -> Result<()> {
        self.run_container(config, tag, command, false)
    }

    fn run_shell(&self, config: &Config, tag: &str) -> Result<()> {
        self.run_container(config, tag, &["/bin/sh".to_string()], true)
    }

    fn run_shell_with_startup(&self, config: &Config, tag: &str, wrapper: &str) -> Result<()> {
        let command = vec!["/bin/sh".to_string(), "-c".to_string(), wrapper.to_string()];
        self.run_container(config, tag, &command, true)
    }

    fn image_exists(&self, tag: &str) -> bool {
        self.quiet(&["image", "inspect", tag])
    }

    fn remove_image(&self, tag: &str) -> Result<()> {
        self.capture(&["rmi", "-f", tag]).map(|_| ())
    }

    fn list_images(&self) -> Result<Vec<ImageRecord>> {
        self.list_with_filters(&[])
    }

    fn dangling_images(&self) -> Result<Vec<ImageRecord>> {
        self.list_with_filters(&["dangling=true"])
    }

    fn image_info(&self, reference: &str) -> Result<ImageInfo> {
        let output = self.capture(&["image", "inspect", reference])?;
        let infos: Vec<ImageInfo> = serde_json::from_str(&output)?;
        infos
            .into_iter()
            .next()
            .ok_or_else(|| ShellboxError::EngineFailed(format!("no such image: {reference}")))
    }
}

/// Tag for the user's custom base image, built from their own Dockerfile.
pub(crate) fn custom_base_tag(config: &Config) -> String {
    format!("{}:custom", normalize_name(&config.name))
}

/// Dockerfile for the environment image: the declared base, management
/// labels, the workspace directory, and one RUN layer per setup command.
pub(crate) fn runtime_dockerfile(config: &Config) -> String {
    let base = if config.container.build.is_some() {
        custom_base_tag(config)
    } else {
        config.container.image.clone().unwrap_or_default()
    };

    let mut dockerfile = format!("FROM {base}\n");
    dockerfile.push_str(&format!(
        "LABEL {MANAGED_LABEL} shellbox.project=\"{}\"\n",
        normalize_name(&config.name)
    ));
    dockerfile.push_str("WORKDIR /workspace\n");
    for command in &config.container.setup {
        dockerfile.push_str(&format!("RUN {command}\n"));
    }
    dockerfile.push_str("CMD [\"/bin/sh\"]\n");
    dockerfile
}

/// Host OS/architecture pair exported into containers, so scripts can
/// fetch host-appropriate artifacts. `None` for platforms without a
/// conventional container-ecosystem name.
fn host_platform() -> Option<(&'static str, &'static str)> {
    let os = match std::env::consts::OS {
        "linux" => "linux",
        "macos" => "darwin",
        "windows" => "windows",
        _ => return None,
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "arm" => "armv6l",
        _ => return None,
    };
    Some((os, arch))
}
