//! Content fingerprinting for cache keys.

use md5::{Digest, Md5};

/// Computes a fingerprint of the given text for change detection.
///
/// The digest is a fixed 32-character lowercase hex string, stable across
/// calls and process restarts. It is part of the cache key format, so the
/// algorithm must not change without invalidating existing keys. Not
/// intended for any security purpose.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
