use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory filesystem for driving build cycles without touching disk.
///
/// Clones share the same file table, so a test can keep one handle and
/// rewrite "emitted" files between builds while the controller reads
/// through another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite a file.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files.insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Remove a file, returning whether it existed.
    pub fn remove_file(&self, path: impl AsRef<Path>) -> bool {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files.remove(path.as_ref()).is_some()
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        let files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files.contains_key(path.as_ref())
    }
}

impl FileSystem for MockFileSystem {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        match files.get(path) {
            Some(content) => Ok(Box::new(Cursor::new(content.clone()))),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_files() {
        let fs = MockFileSystem::new();
        let view = fs.clone();

        fs.add_file("dist/main.js", "one");
        assert!(view.contains("dist/main.js"));

        let mut buf = String::new();
        view.open_read(Path::new("dist/main.js"))
            .unwrap()
            .read_to_string(&mut buf)
            .unwrap();
        assert_eq!(buf, "one");

        assert!(fs.remove_file("dist/main.js"));
        assert!(!view.contains("dist/main.js"));
        assert!(view.open_read(Path::new("dist/main.js")).is_err());
    }
}
