//! In-container shell program generation
//!
//! For interactive sessions the engine does not run the user's shell
//! directly. It runs a generated POSIX program that installs a small
//! `shellbox` dispatcher inside the container, executes the configured
//! startup hooks fail-fast, persists their environment for the login
//! shell, and finally execs an interactive shell.
//!
//! All user-controlled content (script names, descriptions, commands, the
//! version string) is either passed through [`shell_quote`] or carried
//! inside quoted heredocs; nothing is interpolated into shell text raw.

use std::fmt::Write;

use crate::command::binder::{bind, shell_quote};
use crate::config::Config;

const WRAPPER_EOF: &str = "SHELLBOX_WRAPPER_EOF";
const STARTUP_EOF: &str = "SHELLBOX_STARTUP_EOF";

/// Generates the bootstrap program executed by `/bin/sh -c` inside the
/// container for `open` sessions.
///
/// The version string is injected here rather than read from any global
/// so the generator is a pure function of its inputs.
pub struct WrapperGenerator {
    version: String,
}

impl WrapperGenerator {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Assemble the full bootstrap program: record the version, install
    /// the dispatcher, set the prompt, then exec the startup script.
    pub fn generate(&self, config: &Config) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "printf '%s\\n' {} > /tmp/shellbox-version",
            shell_quote(&self.version)
        );
        out.push('\n');

        let _ = writeln!(out, "cat > /usr/local/bin/shellbox << '{WRAPPER_EOF}'");
        out.push_str(&self.dispatcher(config));
        let _ = writeln!(out, "{WRAPPER_EOF}");
        out.push_str("chmod +x /usr/local/bin/shellbox\n\n");

        out.push_str(
            "printf '%s\\n' 'PS1=\"[shellbox] \\w \\$ \"' > /etc/profile.d/shellbox-prompt.sh\n\n",
        );

        let _ = writeln!(out, "cat > /tmp/shellbox-startup.sh << '{STARTUP_EOF}'");
        out.push_str(&self.startup_script(config));
        let _ = writeln!(out, "{STARTUP_EOF}");
        out.push_str("chmod +x /tmp/shellbox-startup.sh\n");
        out.push_str("exec /tmp/shellbox-startup.sh\n");

        out
    }

    /// The startup section: configured hooks in declared order under
    /// `set -e`, so any failure aborts before the dispatcher or the
    /// interactive shell ever runs.
    ///
    /// The interactive shell is exec'd as a fresh login shell, so the
    /// startup environment is persisted first: `export -p` emits
    /// correctly quoted POSIX source text (values containing newlines or
    /// `=` survive), and the login shell picks it up via profile.d.
    fn startup_script(&self, config: &Config) -> String {
        let mut out = String::from("#!/bin/sh\nset -e\n");

        for command in &config.shell.startup {
            out.push_str(command);
            out.push('\n');
        }

        out.push_str("export -p > /etc/profile.d/shellbox-env.sh\n");
        out.push_str("exec /bin/sh --login\n");
        out
    }

    /// The in-container `shellbox` dispatcher: help/list/run/version plus
    /// an explicit failure path for `open`. The script table is rendered
    /// from an ordered (name, command) list built once, in declaration
    /// order.
    fn dispatcher(&self, config: &Config) -> String {
        let entries: Vec<(&str, &str, String)> = config
            .shell
            .scripts
            .iter()
            .map(|s| {
                (
                    s.name.as_str(),
                    s.description.as_deref().unwrap_or(s.name.as_str()),
                    bind(&s.commands, &[]),
                )
            })
            .collect();

        let mut out = String::from("#!/bin/sh\n\n");
        out.push_str(
            "SHELLBOX_VERSION=\"$(cat /tmp/shellbox-version 2>/dev/null || echo dev)\"\n\n",
        );

        out.push_str("show_help() {\n");
        out.push_str("  echo \"shellbox - containerized development environment\"\n");
        out.push_str("  echo \"\"\n");
        out.push_str("  echo \"Usage:\"\n");
        out.push_str("  echo \"  shellbox <command> [args...]\"\n");
        out.push_str("  echo \"\"\n");
        out.push_str("  echo \"Commands:\"\n");
        out.push_str("  echo \"  help        Show this help\"\n");
        out.push_str("  echo \"  list        List available scripts\"\n");
        out.push_str("  echo \"  run         Run a script or command\"\n");
        out.push_str("  echo \"  version     Show the shellbox version\"\n");
        out.push_str("}\n\n");

        out.push_str("list_scripts() {\n");
        out.push_str("  echo \"Available scripts:\"\n");
        out.push_str("  echo \"\"\n");
        for (name, description, _) in &entries {
            let _ = writeln!(
                out,
                "  printf '  %-15s %s\\n' {} {}",
                shell_quote(name),
                shell_quote(description)
            );
        }
        out.push_str("}\n\n");

        out.push_str("run_script() {\n");
        out.push_str("  script=\"$1\"\n");
        out.push_str("  shift\n");
        out.push_str("  case \"$script\" in\n");
        for (name, _, command) in &entries {
            // Positional parameters are already the script arguments here:
            // run_script shifted the name away, so $1.. line up for the
            // command chain.
            let _ = writeln!(out, "    {name})\n      {command}\n      exit $?\n      ;;");
        }
        out.push_str("    --)\n");
        out.push_str("      \"$@\"\n");
        out.push_str("      exit $?\n");
        out.push_str("      ;;\n");
        out.push_str("    *)\n");
        out.push_str("      echo \"Error: unknown script '$script'\" >&2\n");
        out.push_str("      echo \"\" >&2\n");
        out.push_str("      list_scripts >&2\n");
        out.push_str("      exit 1\n");
        out.push_str("      ;;\n");
        out.push_str("  esac\n");
        out.push_str("}\n\n");

        out.push_str("case \"$1\" in\n");
        out.push_str("  run)\n");
        out.push_str("    shift\n");
        out.push_str("    if [ $# -eq 0 ]; then\n");
        out.push_str("      echo \"Error: missing script name or command\" >&2\n");
        out.push_str("      echo \"\" >&2\n");
        out.push_str("      list_scripts >&2\n");
        out.push_str("      exit 1\n");
        out.push_str("    fi\n");
        out.push_str("    run_script \"$@\"\n");
        out.push_str("    ;;\n");
        out.push_str("  open)\n");
        out.push_str("    echo \"Error: already inside a shellbox container\" >&2\n");
        out.push_str("    echo \"The 'open' command can only be used from the host\" >&2\n");
        out.push_str("    exit 1\n");
        out.push_str("    ;;\n");
        out.push_str("  list)\n");
        out.push_str("    list_scripts\n");
        out.push_str("    ;;\n");
        out.push_str("  version)\n");
        out.push_str("    echo \"shellbox version $SHELLBOX_VERSION\"\n");
        out.push_str("    ;;\n");
        out.push_str("  help|-h|--help|\"\")\n");
        out.push_str("    show_help\n");
        out.push_str("    ;;\n");
        out.push_str("  *)\n");
        out.push_str("    echo \"Error: unknown command '$1'\" >&2\n");
        out.push_str("    echo \"\" >&2\n");
        out.push_str("    show_help >&2\n");
        out.push_str("    exit 1\n");
        out.push_str("    ;;\n");
        out.push_str("esac\n");

        out
    }
}
