/// Test utilities for filesystem-backed storage.
///
/// The temporary directory is removed when the environment is dropped, even if
/// the test panics.
use tempfile::TempDir;

use super::FsBlobStore;

pub struct TestEnvironment {
    /// Root of the blob store, for inspecting files directly
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = TempDir::new()?;
        Ok(Self {
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }

    /// Open a blob store over this environment's directory
    pub fn blob_store(&self) -> FsBlobStore {
        FsBlobStore::open(&self.base_path).expect("open blob store in temp dir")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() {
        let base_path;
        {
            let env = TestEnvironment::new().unwrap();
            base_path = env.base_path.clone();
            assert!(base_path.exists());
        }
        assert!(!base_path.exists());
    }
}
