use std::fmt;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::debug;

use crate::fs::FileSystem;

/// Hex-encoded BLAKE3 digest of a file's raw bytes (always 64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint an in-memory buffer.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of a single file.
pub fn compute_fingerprint(fs: &dyn FileSystem, path: &Path) -> Result<Fingerprint> {
    let mut hasher = Hasher::new();
    let mut file = fs
        .open_read(path)
        .with_context(|| format!("opening file for fingerprinting: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("reading {:?}", path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let fingerprint = Fingerprint(hasher.finalize().to_hex().to_string());
    debug!(?path, fingerprint = %fingerprint, "fingerprinted file");
    Ok(fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn identical_bytes_give_identical_fingerprints() {
        let fs = MockFileSystem::new();
        fs.add_file("a.js", b"console.log(1)".to_vec());
        fs.add_file("b.js", b"console.log(1)".to_vec());
        fs.add_file("c.js", b"console.log(2)".to_vec());

        let a = compute_fingerprint(&fs, Path::new("a.js")).unwrap();
        let b = compute_fingerprint(&fs, Path::new("b.js")).unwrap();
        let c = compute_fingerprint(&fs, Path::new("c.js")).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 64);
        assert_eq!(a, Fingerprint::of_bytes(b"console.log(1)"));
    }

    #[test]
    fn known_digest() {
        let fs = MockFileSystem::new();
        fs.add_file("test.txt", b"hello world".to_vec());

        let fingerprint = compute_fingerprint(&fs, Path::new("test.txt")).unwrap();
        // blake3 hash of "hello world"
        assert_eq!(
            fingerprint.as_str(),
            "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let fs = MockFileSystem::new();
        let err = compute_fingerprint(&fs, Path::new("gone.js")).unwrap_err();
        assert!(format!("{err:#}").contains("gone.js"));
    }
}
