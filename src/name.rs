//! Project name normalization
//!
//! Converts an arbitrary project or directory name into an identifier that
//! is valid as a container image repository name: lowercase ASCII letters,
//! digits, and single hyphens.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("[^a-z0-9]+").unwrap())
}

/// Normalize a raw name into a `[a-z0-9-]` identifier.
///
/// Diacritics collapse to their base letter, everything else outside
/// `[a-z0-9]` collapses to a single `-`, and leading/trailing hyphens are
/// trimmed. An input that normalizes to nothing yields `"project"`.
///
/// The function is idempotent: normalizing an already-normalized name
/// returns it unchanged.
pub fn normalize_name(raw: &str) -> String {
    // NFD-decompose so accented letters split into base letter + mark,
    // then drop the marks.
    let stripped: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let lowered = stripped.to_lowercase();

    let collapsed = non_alphanumeric().replace_all(&lowered, "-");
    let trimmed = collapsed.trim_matches('-');

    if trimmed.is_empty() {
        "project".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_simple() {
        assert_eq!(normalize_name("myproject"), "myproject");
        assert_eq!(normalize_name("MyProject"), "myproject");
    }

    #[test]
    fn test_normalize_spaces_and_symbols() {
        assert_eq!(normalize_name("My Cool Project!"), "my-cool-project");
        assert_eq!(normalize_name("a__b..c"), "a-b-c");
        assert_eq!(normalize_name("  spaced  out  "), "spaced-out");
    }

    #[test]
    fn test_normalize_diacritics() {
        assert_eq!(normalize_name("Café Münze"), "cafe-munze");
        assert_eq!(normalize_name("résumé"), "resume");
    }

    #[test]
    fn test_normalize_trims_hyphens() {
        assert_eq!(normalize_name("--edge--"), "edge");
        assert_eq!(normalize_name("-a-"), "a");
    }

    #[test]
    fn test_normalize_empty_falls_back() {
        assert_eq!(normalize_name(""), "project");
        assert_eq!(normalize_name("!!!"), "project");
        assert_eq!(normalize_name("---"), "project");
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["Café Münze", "My Project", "", "already-normal", "日本語"] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn test_normalize_output_charset() {
        for raw in ["Weird\tInput\n", "ÅÄÖ", "a$b%c", "1 2 3"] {
            let out = normalize_name(raw);
            assert!(!out.is_empty());
            assert!(out.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            assert!(!out.starts_with('-') && !out.ends_with('-'));
        }
    }
}
