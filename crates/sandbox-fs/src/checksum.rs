//! `sha256:<hex>` digests quoted in repair narratives

use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256:";

/// Digest of `bytes`, tagged with its scheme.
pub fn compute_content_checksum(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{SCHEME}{digest:x}")
}

/// Digest of the file at `path` as it is on disk now.
pub fn compute_file_checksum(path: &Path) -> io::Result<String> {
    std::fs::read(path).map(|bytes| compute_content_checksum(&bytes))
}

/// Scheme plus the first 12 hex digits, for one-line output.
pub fn short(checksum: &str) -> &str {
    checksum.get(..SCHEME.len() + 12).unwrap_or(checksum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            compute_content_checksum(b"abc"),
            "sha256:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn short_form() {
        let full = compute_content_checksum(b"abc");
        assert_eq!(short(&full), "sha256:ba7816bf8f01");
        assert_eq!(short("sha256:12"), "sha256:12");
    }

    #[test]
    fn file_digest_equals_content_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset.txt");
        std::fs::write(&path, "clue").unwrap();
        assert_eq!(compute_file_checksum(&path).unwrap(), compute_content_checksum(b"clue"));
    }
}
