//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Re-insert a `--` separator that immediately follows the `run`
/// subcommand. clap consumes the first `--` as its own escape token, which
/// would erase the "everything after this is a literal command" marker
/// before the resolver could see it: `run -- greet` must run the command
/// `greet` even when a script of that name is declared.
fn preserve_run_separator<I>(argv: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = argv.into_iter().collect();
    if let Some(pos) = out.iter().position(|a| a == "run") {
        if out.get(pos + 1).map(String::as_str) == Some("--") {
            out.insert(pos + 1, "--".to_string());
        }
    }
    out
}

#[derive(Parser)]
#[command(name = "shellbox")]
#[command(author, version, about = "Reproducible containerized shell environments", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "shellbox.yaml")]
    pub config: PathBuf,
}

impl Args {
    /// Parse the process arguments, keeping a leading `--` in `run`'s
    /// trailing arguments.
    pub fn parse_cli() -> Self {
        Self::parse_cli_from(std::env::args())
    }

    fn parse_cli_from<I>(argv: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self::parse_from(preserve_run_separator(argv))
    }
}

#[derive(Subcommand)]
pub enum SubCommand {
    /// Create a starter configuration in the current directory
    Init {
        /// Generate a Dockerfile-based configuration and a sample Dockerfile
        #[arg(long)]
        dockerfile: bool,
    },

    /// Build the environment image for the current configuration
    Build {
        /// Rebuild even if the image already exists
        #[arg(long)]
        force: bool,
    },

    /// Run a script or ad-hoc command inside the environment
    Run {
        /// Script name and its arguments, or a command to run directly.
        /// With no arguments, lists the available scripts.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Open an interactive shell inside the environment
    Open,

    /// Manage images created by shellbox
    Image {
        #[command(subcommand)]
        command: ImageCommand,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand)]
pub enum ImageCommand {
    /// Build the environment image
    Build {
        /// Rebuild even if the image already exists
        #[arg(long)]
        force: bool,
    },

    /// List images created by shellbox
    List,

    /// Remove this project's images
    Clean {
        /// Remove every shellbox-managed image, not just this project's
        #[arg(long)]
        all: bool,
    },

    /// Show details for an image
    Info {
        /// Image reference; defaults to the current configuration's tag
        reference: Option<String>,
    },

    /// Remove dangling shellbox images
    Prune {
        /// Actually remove; without this, only shows what would be removed
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn run_args(args: Args) -> Vec<String> {
        match args.command {
            SubCommand::Run { args } => args,
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn test_run_leading_separator_survives_parsing() {
        let args = Args::parse_cli_from(argv(&["shellbox", "run", "--", "greet"]));
        assert_eq!(run_args(args), vec!["--", "greet"]);
    }

    #[test]
    fn test_run_separator_survives_after_global_flag() {
        let args = Args::parse_cli_from(argv(&[
            "shellbox", "-c", "other.yaml", "run", "--", "ls", "-la",
        ]));
        assert_eq!(args.config, PathBuf::from("other.yaml"));
        assert_eq!(run_args(args), vec!["--", "ls", "-la"]);
    }

    #[test]
    fn test_run_without_separator_is_untouched() {
        let args = Args::parse_cli_from(argv(&["shellbox", "run", "greet", "Alice"]));
        assert_eq!(run_args(args), vec!["greet", "Alice"]);
    }

    #[test]
    fn test_non_run_subcommands_are_untouched() {
        let before = argv(&["shellbox", "build", "--force"]);
        assert_eq!(preserve_run_separator(before.clone()), before);
    }

    #[test]
    fn test_run_keeps_hyphen_arguments() {
        let args = Args::parse_from(["shellbox", "run", "ls", "-la"]);
        match args.command {
            SubCommand::Run { args } => assert_eq!(args, vec!["ls", "-la"]),
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn test_config_flag_is_global() {
        let args = Args::parse_from(["shellbox", "build", "-c", "other.yaml"]);
        assert_eq!(args.config, PathBuf::from("other.yaml"));
    }

    #[test]
    fn test_config_defaults_to_conventional_name() {
        let args = Args::parse_from(["shellbox", "open"]);
        assert_eq!(args.config, PathBuf::from("shellbox.yaml"));
    }

    #[test]
    fn test_image_prune_force_flag() {
        let args = Args::parse_from(["shellbox", "image", "prune", "--force"]);
        match args.command {
            SubCommand::Image {
                command: ImageCommand::Prune { force },
            } => assert!(force),
            _ => panic!("expected image prune subcommand"),
        }
    }
}
