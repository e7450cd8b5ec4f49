//! High-level orchestration
//!
//! Ties the pipeline together for one invocation: load the configuration,
//! derive the tag, build or reuse the image, resolve the requested command,
//! and hand the final command to the engine. Each invocation starts from a
//! clean process; nothing is cached across runs.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::command::{bind, resolve, Invocation};
use crate::config::Config;
use crate::error::{Result, ShellboxError};
use crate::name::normalize_name;
use crate::provider::cli::custom_base_tag;
use crate::provider::{new_provider, ContainerProvider, ImageInfo, ImageRecord};
use crate::tag::derive_tag;
use crate::wrapper::WrapperGenerator;

/// What `build` did, for reporting.
#[derive(Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The image was (re)built under this tag.
    Built(String),
    /// The tag already existed and `--force` was not given; the engine was
    /// not invoked.
    UpToDate(String),
}

pub struct Client {
    config: Config,
    config_path: PathBuf,
    provider: Box<dyn ContainerProvider>,
}

impl Client {
    /// Load the configuration and connect to its declared engine.
    pub fn new(config_path: &Path) -> Result<Self> {
        let config = Config::load(config_path)?;
        let provider = new_provider(&config.container.provider)?;

        if !provider.is_available() {
            return Err(ShellboxError::ProviderUnavailable(
                config.container.provider.clone(),
            ));
        }

        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            provider,
        })
    }

    #[cfg(test)]
    fn with_provider(
        config: Config,
        config_path: PathBuf,
        provider: Box<dyn ContainerProvider>,
    ) -> Self {
        Self {
            config,
            config_path,
            provider,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The content-addressed tag for the configuration as it is on disk
    /// right now.
    pub fn image_tag(&self) -> Result<String> {
        derive_tag(&self.config_path, &normalize_name(&self.config.name))
    }

    /// Build the image for the current configuration. An existing tag is
    /// left alone unless `force` removes it first. `force` also removes
    /// the custom base image, so Dockerfile edits take effect on rebuild.
    pub fn build(&self, force: bool) -> Result<BuildOutcome> {
        let tag = self.image_tag()?;
        let exists = self.provider.image_exists(&tag);

        if exists && !force {
            return Ok(BuildOutcome::UpToDate(tag));
        }
        if exists {
            self.provider.remove_image(&tag)?;
        }
        if force {
            self.remove_custom_base()?;
        }

        self.provider.build_image(&self.config, &tag)?;
        Ok(BuildOutcome::Built(tag))
    }

    fn remove_custom_base(&self) -> Result<()> {
        if self.config.container.build.is_none() {
            return Ok(());
        }
        let custom = custom_base_tag(&self.config);
        if self.provider.image_exists(&custom) {
            self.provider.remove_image(&custom)?;
        }
        Ok(())
    }

    fn ensure_image(&self) -> Result<String> {
        let tag = self.image_tag()?;
        if !self.provider.image_exists(&tag) {
            self.provider.build_image(&self.config, &tag)?;
        }
        Ok(tag)
    }

    /// Run a script or ad-hoc command inside the container.
    ///
    /// A leading `--` forces the direct path before resolution ever sees
    /// the arguments, so commands that happen to share a script's name can
    /// still be run literally.
    pub fn run(&self, args: &[String]) -> Result<()> {
        let (forced_direct, args) = match args.split_first() {
            Some((first, rest)) if first == "--" => (true, rest),
            _ => (false, args),
        };

        if args.is_empty() {
            self.print_scripts();
            return Ok(());
        }

        let tag = self.ensure_image()?;

        if forced_direct {
            return self.provider.run_command(&self.config, &tag, args);
        }

        match resolve(&self.config, args) {
            Invocation::List => {
                self.print_scripts();
                Ok(())
            }
            Invocation::Script { script, args } => {
                let bound = bind(&script.commands, &args);
                let command = vec!["/bin/sh".to_string(), "-c".to_string(), bound];
                self.provider.run_command(&self.config, &tag, &command)
            }
            Invocation::Direct(argv) => self.provider.run_command(&self.config, &tag, &argv),
        }
    }

    /// Open an interactive session. Falls back to a plain shell when the
    /// configuration declares neither startup hooks nor scripts.
    pub fn open(&self, generator: &WrapperGenerator) -> Result<()> {
        let tag = self.ensure_image()?;

        if self.config.shell.startup.is_empty() && self.config.shell.scripts.is_empty() {
            return self.provider.run_shell(&self.config, &tag);
        }

        let wrapper = generator.generate(&self.config);
        self.provider
            .run_shell_with_startup(&self.config, &tag, &wrapper)
    }

    /// Print the declared scripts with their descriptions, in declaration
    /// order.
    pub fn print_scripts(&self) {
        if self.config.shell.scripts.is_empty() {
            println!("No scripts available in this configuration.");
            return;
        }

        println!("Available scripts:");
        println!();
        for script in &self.config.shell.scripts {
            match &script.description {
                Some(description) => println!("  {} - {}", script.name, description),
                None => println!("  {}", script.name),
            }
        }
        println!();
        println!("Usage: shellbox run <script-name> [args...]");
    }

    pub fn list_images(&self) -> Result<Vec<ImageRecord>> {
        self.provider.list_images()
    }

    /// Remove this project's images, or every managed image with `all`.
    pub fn clean_images(&self, all: bool) -> Result<Vec<String>> {
        let project = normalize_name(&self.config.name);
        let mut removed = Vec::new();

        for record in self.provider.list_images()? {
            if all || record.repository == project {
                let reference = record.reference();
                self.provider.remove_image(&reference)?;
                removed.push(reference);
            }
        }
        Ok(removed)
    }

    /// Inspect `reference`, defaulting to the current project's tag.
    pub fn image_info(&self, reference: Option<&str>) -> Result<ImageInfo> {
        match reference {
            Some(reference) => self.provider.image_info(reference),
            None => {
                let tag = self.image_tag()?;
                self.provider.image_info(&tag)
            }
        }
    }

    /// Dangling managed images that `image prune --force` would remove.
    pub fn prune_candidates(&self) -> Result<Vec<ImageRecord>> {
        self.provider.dangling_images()
    }

    pub fn prune_images(&self) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for record in self.provider.dangling_images()? {
            self.provider.remove_image(&record.id)?;
            removed.push(record.id);
        }
        Ok(removed)
    }
}

/// Create a starter configuration (and, with `use_dockerfile`, a sample
/// Dockerfile) in the current directory.
pub fn init_project(config_path: &Path, use_dockerfile: bool) -> Result<()> {
    if config_path.exists() {
        return Err(ShellboxError::AlreadyInitialized(
            config_path.display().to_string(),
        ));
    }

    let project = current_dir_name();
    let contents = if use_dockerfile {
        dockerfile_config(&project)
    } else {
        image_config(&project)
    };
    fs::write(config_path, contents)?;

    if use_dockerfile {
        fs::write("Dockerfile", SAMPLE_DOCKERFILE)?;
    }
    Ok(())
}

fn current_dir_name() -> String {
    env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .map(|n| normalize_name(&n))
        .unwrap_or_else(|| "project".to_string())
}

fn image_config(project: &str) -> String {
    format!(
        r#"name: {project}
container:
  provider: docker
  image: alpine:latest
  setup:
    - apk add --no-cache curl git
shell:
  startup:
    - echo "Welcome to your development environment!"
  scripts:
    - name: hello
      description: "Say hello and show system info"
      commands:
        - echo "Hello from shellbox!"
        - uname -a
    - name: test
      description: "Run a simple test"
      commands:
        - echo "Running tests..."
        - echo "All tests passed!"
"#
    )
}

fn dockerfile_config(project: &str) -> String {
    format!(
        r#"name: {project}
container:
  provider: docker
  build:
    dockerfile: ./Dockerfile
    context: .
shell:
  startup:
    - echo "Welcome to your development environment!"
  scripts:
    - name: hello
      description: "Say hello and show system info"
      commands:
        - echo "Hello from shellbox!"
        - uname -a
"#
    )
}

const SAMPLE_DOCKERFILE: &str = r#"FROM alpine:latest

# Basic tooling; extend to taste
RUN apk add --no-cache curl git

WORKDIR /workspace

CMD ["sh"]
"#;
