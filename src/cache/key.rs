//! Cache Key Module
//!
//! Derives the on-disk storage key for a request identifier.

use std::fmt;

/// Length of a rendered key in hex characters.
pub const KEY_LENGTH: usize = 32;

/// File extension appended to every key on disk.
pub const ENTRY_EXTENSION: &str = "json";

// == Cache Key ==
/// Fixed-width hex digest of a request identifier (path + query).
///
/// The identifier is hashed verbatim: no case folding, no percent-decoding
/// and no trailing-slash collapsing. The digest is MD5, which is only used
/// as a content address here. A collision would produce a wrong cache hit,
/// never a security issue, because the key is not exposed outside the cache
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    // == Constructor ==
    /// Computes the key for an identifier.
    pub fn for_identifier(identifier: &str) -> Self {
        Self(format!("{:x}", md5::compute(identifier.as_bytes())))
    }

    /// Returns the lowercase hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the entry file name, `<hex>.json`.
    ///
    /// Always a single path component made of `[0-9a-f]` plus the
    /// extension, so joining it onto the cache root cannot escape it.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, ENTRY_EXTENSION)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for [`CacheKey::for_identifier`].
pub fn key_for(identifier: &str) -> CacheKey {
    CacheKey::for_identifier(identifier)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_known_digests() {
        assert_eq!(key_for("").as_str(), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            key_for("/items/42").as_str(),
            "8604da4c4a11b9f5d8e873f658776ae7"
        );
    }

    #[test]
    fn test_key_is_deterministic() {
        assert_eq!(key_for("/users?page=2"), key_for("/users?page=2"));
    }

    #[test]
    fn test_key_is_not_normalized() {
        assert_ne!(key_for("/Items/42"), key_for("/items/42"));
        assert_ne!(key_for("/items/42/"), key_for("/items/42"));
        assert_ne!(key_for("/a%20b"), key_for("/a b"));
    }

    #[test]
    fn test_key_file_name() {
        let key = key_for("/items/42");
        assert_eq!(key.file_name(), "8604da4c4a11b9f5d8e873f658776ae7.json");
        assert_eq!(key.to_string(), key.as_str());
    }

    #[test]
    fn test_key_traversal_input_stays_hex() {
        let key = key_for("/../../etc/passwd");
        assert_eq!(key.as_str().len(), KEY_LENGTH);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!key.file_name().contains('/'));
    }
}
