//! Content-addressed image tags
//!
//! The image tag is derived from a sha256 digest of the configuration
//! file's raw bytes. Hashing the bytes rather than a canonicalized parse
//! tree is deliberate: byte-identical files always map to the same tag,
//! and any edit forces a rebuild, comments and whitespace included.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::Result;

/// Number of hex digits of the digest used as the tag suffix.
const TAG_HASH_LEN: usize = 12;

/// Derive the image tag `"{name}:{hash12}"` for a configuration file.
///
/// `name` must already be normalized (see [`crate::name::normalize_name`]).
/// The result is stable across platforms and process restarts for a fixed
/// file.
pub fn derive_tag(config_path: &Path, name: &str) -> Result<String> {
    let bytes = fs::read(config_path)?;
    let digest = Sha256::digest(&bytes);
    let hex = format!("{digest:x}");
    Ok(format!("{name}:{}", &hex[..TAG_HASH_LEN]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tag_for(contents: &[u8]) -> String {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        derive_tag(file.path(), "demo").unwrap()
    }

    #[test]
    fn test_tag_shape() {
        let tag = tag_for(b"name: demo\n");
        let (repo, hash) = tag.split_once(':').unwrap();
        assert_eq!(repo, "demo");
        assert_eq!(hash.len(), TAG_HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tag_deterministic() {
        assert_eq!(tag_for(b"name: demo\n"), tag_for(b"name: demo\n"));
    }

    #[test]
    fn test_tag_sensitive_to_any_byte() {
        // A whitespace-only edit must change the tag too.
        assert_ne!(tag_for(b"name: demo\n"), tag_for(b"name: demo \n"));
        assert_ne!(tag_for(b"name: demo\n"), tag_for(b"name: demp\n"));
    }

    #[test]
    fn test_tag_missing_file() {
        let err = derive_tag(Path::new("/nonexistent/shellbox.yaml"), "demo");
        assert!(err.is_err());
    }
}
