//! Classify trailing CLI arguments into an execution intent

use crate::config::{Config, Script};

/// What a `run` invocation resolved to.
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation<'a> {
    /// No arguments: the caller should list the declared scripts.
    List,
    /// First argument matched a declared script by exact name.
    Script {
        script: &'a Script,
        args: Vec<String>,
    },
    /// Anything else is an ad-hoc command passed through literally.
    /// Deliberately not an error: unknown-looking input is still a valid
    /// command inside the container.
    Direct(Vec<String>),
}

/// Resolve `args` against the scripts declared in `config`.
///
/// A leading `--` separator is the caller's concern: strip it before
/// resolution to force the direct path.
pub fn resolve<'a>(config: &'a Config, args: &[String]) -> Invocation<'a> {
    let Some((first, rest)) = args.split_first() else {
        return Invocation::List;
    };

    match config.script(first) {
        Some(script) => Invocation::Script {
            script,
            args: rest.to_vec(),
        },
        None => Invocation::Direct(args.to_vec()),
    }
}
