//! Content fingerprinting for version deduplication.
//!
//! Two consecutive saves of byte-identical content must never grow a
//! document's history; the comparison key is the digest computed here.

use sha2::{Digest, Sha256};

/// Compute the fingerprint of version content.
///
/// Returns the lowercase SHA-256 hex digest of the UTF-8 bytes. Deterministic
/// and infallible; collision probability is negligible for the dedup use.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        assert_eq!(fingerprint("hello"), fingerprint("hello"));
    }

    #[test]
    fn test_distinct_content_distinct_digest() {
        assert_ne!(fingerprint("hello"), fingerprint("hello "));
        assert_ne!(fingerprint(""), fingerprint("\0"));
    }

    #[test]
    fn test_known_digest() {
        // SHA-256 of the empty string.
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_shape() {
        let digest = fingerprint("draft");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, digest.to_lowercase());
    }
}
