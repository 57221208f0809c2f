//! Deterministic project keys
//!
//! The same model always produces the same key, so re-converting a package
//! keeps devices that synced the previous output in the same project.

use sha2::{Digest, Sha256};

/// 64-character lowercase hex SHA-256 of `content`.
pub fn project_key(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_same_content_when_hashing_then_key_is_stable() {
        let a = project_key(b"<ConfigurableModel/>");
        let b = project_key(b"<ConfigurableModel/>");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn given_different_content_when_hashing_then_keys_differ() {
        assert_ne!(project_key(b"a"), project_key(b"b"));
    }

    #[test]
    fn given_empty_content_when_hashing_then_matches_known_digest() {
        assert_eq!(
            project_key(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
