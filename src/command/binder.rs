//! Positional argument binding for script commands
//!
//! Scripts reference their arguments as `$1`, `$2`, … . Binding works by
//! prefixing the command chain with a `set --` clause so the target shell
//! itself assigns the positional parameters; the tool never rewrites the
//! command text.

/// Single-quote `s` for a POSIX shell.
///
/// Embedded single quotes are escaped by closing the quote, emitting an
/// escaped quote, and reopening: `'` becomes `'"'"'`. Every piece of user
/// content that ends up inside generated shell text goes through this
/// function.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\"'\"'"))
}

/// Join a script's commands into one fail-fast shell command, binding
/// `args` as positional parameters.
///
/// Contract: for every string `s` bound here, the target shell expands the
/// corresponding `$n` back to exactly `s`, whatever quotes, spaces, or
/// metacharacters it contains.
pub fn bind(commands: &[String], args: &[String]) -> String {
    let joined = commands.join(" && ");

    if args.is_empty() {
        return joined;
    }

    let quoted: Vec<String> = args.iter().map(|a| shell_quote(a)).collect();
    format!("set -- {}; {joined}", quoted.join(" "))
}
