/*
 * Provides checksum helpers for in-memory source text. A compiled artifact
 * remembers the checksum of the source it was produced from, which lets the
 * store tell whether an artifact still matches the editable content without
 * keeping a second copy of the source around.
 */
use sha2::{Digest, Sha256};

/*
 * Calculates the SHA256 checksum of the given text and returns it as a
 * hex-encoded string.
 */
pub fn calculate_sha256_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let hex_checksum = format!("{:x}", hasher.finalize());
    log::trace!(
        "ChecksumUtils: Calculated checksum {} for {} bytes of content",
        hex_checksum,
        content.len()
    );
    hex_checksum
}
