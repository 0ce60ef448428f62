use log::{info, warn};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::backend::domain::error::{PortalError, PortalResult};
use crate::backend::domain::models::upload::{BlobHandle, StoredBlob};
use crate::backend::storage::traits::BlobStore;

const TEMP_SUFFIX: &str = ".part";

/// Blob store backed by a directory tree: `{root}/{student_id}/{filename}`.
///
/// Writes go to a uniquely named temp file in the target directory and are
/// renamed into place once synced, so readers only ever see complete content.
/// Writers of the same handle are serialized by a per-handle lock; writers of
/// different handles proceed in parallel.
pub struct FsBlobStore {
    root: PathBuf,
    /// student id -> (filename, handle) in first-store order
    index: Mutex<HashMap<String, Vec<(String, BlobHandle)>>>,
    key_locks: Mutex<HashMap<BlobHandle, Arc<Mutex<()>>>>,
}

impl FsBlobStore {
    /// Open (creating if needed) a blob store rooted at `root`.
    ///
    /// Files already present under the root are indexed so content stored by a
    /// previous run stays listable and retrievable.
    pub fn open<P: AsRef<Path>>(root: P) -> PortalResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        let index = scan_existing(&root)?;
        let indexed: usize = index.values().map(Vec::len).sum();
        info!("Opened blob store at {:?} with {} existing files", root, indexed);

        Ok(Self {
            root,
            index: Mutex::new(index),
            key_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, handle: &BlobHandle) -> PathBuf {
        self.root.join(handle.student_id()).join(handle.filename())
    }

    /// Run `f` while holding the lock for `handle`.
    ///
    /// The lock entry is dropped again once no other caller holds or waits on it.
    fn with_key_lock<T>(&self, handle: &BlobHandle, f: impl FnOnce() -> PortalResult<T>) -> PortalResult<T> {
        let key_lock = lock(&self.key_locks)?.entry(handle.clone()).or_default().clone();
        let result = {
            let _guard = lock(&key_lock)?;
            f()
        };

        let mut locks = lock(&self.key_locks)?;
        drop(key_lock);
        if locks.get(handle).map_or(false, |entry| Arc::strong_count(entry) == 1) {
            locks.remove(handle);
        }
        result
    }

    #[cfg(test)]
    fn key_lock_count(&self) -> usize {
        self.key_locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }

    fn is_indexed(&self, handle: &BlobHandle) -> PortalResult<bool> {
        let index = lock(&self.index)?;
        Ok(index
            .get(handle.student_id())
            .map_or(false, |files| files.iter().any(|(_, h)| h == handle)))
    }
}

impl BlobStore for FsBlobStore {
    fn store(&self, student_id: &str, filename: &str, content: &[u8]) -> PortalResult<StoredBlob> {
        let handle = BlobHandle::new(student_id, filename)?;

        let final_path = self.with_key_lock(&handle, || {
            let dir = self.root.join(student_id);
            fs::create_dir_all(&dir)?;

            let final_path = dir.join(filename);
            let temp_path = dir.join(format!(".{}{}", Uuid::new_v4().simple(), TEMP_SUFFIX));

            if let Err(e) = write_synced(&temp_path, content).and_then(|_| fs::rename(&temp_path, &final_path)) {
                warn!("Failed to store {}: {}", handle, e);
                remove_temp_file(&temp_path);
                return Err(PortalError::StorageFailure(format!("Failed to store {}: {}", handle, e)));
            }

            let mut index = lock(&self.index)?;
            let files = index.entry(student_id.to_string()).or_default();
            if files.iter().any(|(_, h)| h == &handle) {
                info!("Replaced content of {}", handle);
            } else {
                files.push((filename.to_string(), handle.clone()));
            }
            Ok(final_path)
        })?;

        info!("Stored {} ({} bytes) at {:?}", handle, content.len(), final_path);
        Ok(StoredBlob {
            handle,
            path: final_path,
            size: content.len() as u64,
            stored_at: Utc::now(),
        })
    }

    fn list(&self, student_id: &str) -> PortalResult<Vec<(String, BlobHandle)>> {
        let index = lock(&self.index)?;
        Ok(index.get(student_id).cloned().unwrap_or_default())
    }

    fn retrieve(&self, handle: &BlobHandle) -> PortalResult<Vec<u8>> {
        if !self.is_indexed(handle)? {
            warn!("Blob not found: {}", handle);
            return Err(PortalError::NotFound(format!("blob {}", handle)));
        }

        // Wait for an in-flight write of the same handle to land
        self.with_key_lock(handle, || match fs::read(self.path_for(handle)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Blob {} is indexed but missing on disk", handle);
                Err(PortalError::NotFound(format!("blob {}", handle)))
            }
            Err(e) => Err(e.into()),
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> PortalResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| PortalError::StorageFailure("Blob store lock poisoned".to_string()))
}

fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

fn remove_temp_file(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("Could not remove temp file {:?}: {}", path, e);
        }
    }
}

fn is_temp_file(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}

/// Build the index from files left by earlier runs, ordered by filename.
fn scan_existing(root: &Path) -> PortalResult<HashMap<String, Vec<(String, BlobHandle)>>> {
    let mut index = HashMap::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(student_id) = entry.file_name().to_str().map(str::to_string) else {
            warn!("Skipping directory with non UTF-8 name: {:?}", entry.path());
            continue;
        };

        let mut files = Vec::new();
        for file in fs::read_dir(entry.path())? {
            let file = file?;
            if !file.file_type()?.is_file() {
                continue;
            }
            let Some(filename) = file.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if is_temp_file(&filename) {
                warn!("Removing abandoned temp file {:?}", file.path());
                remove_temp_file(&file.path());
                continue;
            }
            match BlobHandle::new(&student_id, &filename) {
                Ok(handle) => files.push((filename, handle)),
                Err(e) => warn!("Skipping {:?}: {}", file.path(), e),
            }
        }

        if !files.is_empty() {
            files.sort_by(|a, b| a.0.cmp(&b.0));
            index.insert(student_id, files);
        }
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::fs::test_utils::TestEnvironment;

    #[test]
    fn test_store_and_retrieve() {
        let env = TestEnvironment::new().unwrap();
        let store = env.blob_store();

        let blob = store.store("S1", "marksheet.pdf", b"%PDF-1.4 content").unwrap();
        assert_eq!(blob.handle.as_str(), "S1/marksheet.pdf");
        assert_eq!(blob.size, 16);
        assert_eq!(blob.path, env.base_path.join("S1").join("marksheet.pdf"));

        assert_eq!(store.retrieve(&blob.handle).unwrap(), b"%PDF-1.4 content");
        assert_eq!(
            store.list("S1").unwrap(),
            vec![("marksheet.pdf".to_string(), blob.handle)]
        );
    }

    #[test]
    fn test_list_keeps_first_store_order_without_duplicates() {
        let env = TestEnvironment::new().unwrap();
        let store = env.blob_store();

        store.store("S1", "tc.pdf", b"one").unwrap();
        store.store("S1", "aadhaar.jpg", b"two").unwrap();
        store.store("S1", "tc.pdf", b"three").unwrap();

        let names: Vec<String> = store.list("S1").unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["tc.pdf", "aadhaar.jpg"]);

        let handle = BlobHandle::new("S1", "tc.pdf").unwrap();
        assert_eq!(store.retrieve(&handle).unwrap(), b"three");
    }

    #[test]
    fn test_students_are_namespaced() {
        let env = TestEnvironment::new().unwrap();
        let store = env.blob_store();

        store.store("S1", "photo.jpg", b"asha").unwrap();
        store.store("S2", "photo.jpg", b"bala").unwrap();

        assert_eq!(store.retrieve(&BlobHandle::new("S1", "photo.jpg").unwrap()).unwrap(), b"asha");
        assert_eq!(store.retrieve(&BlobHandle::new("S2", "photo.jpg").unwrap()).unwrap(), b"bala");
        assert!(store.list("S3").unwrap().is_empty());
    }

    #[test]
    fn test_unsafe_filenames_are_rejected() {
        let env = TestEnvironment::new().unwrap();
        let store = env.blob_store();

        for name in ["../escape.txt", "a/b.txt", "..", ".", "", "c:\\evil.txt"] {
            let err = store.store("S1", name, b"x").unwrap_err();
            assert_eq!(err.kind(), "invalid_input", "accepted {:?}", name);
        }
        assert!(!env.base_path.join("escape.txt").exists());
        assert!(store.list("S1").unwrap().is_empty());
    }

    #[test]
    fn test_retrieve_unknown_handle() {
        let env = TestEnvironment::new().unwrap();
        let store = env.blob_store();
        let err = store.retrieve(&BlobHandle::new("S1", "missing.pdf").unwrap()).unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_empty_content_is_stored() {
        let env = TestEnvironment::new().unwrap();
        let store = env.blob_store();
        let blob = store.store("S1", "empty.txt", b"").unwrap();
        assert_eq!(blob.size, 0);
        assert!(store.retrieve(&blob.handle).unwrap().is_empty());
    }

    #[test]
    fn test_reopen_indexes_existing_files() {
        let env = TestEnvironment::new().unwrap();
        {
            let store = env.blob_store();
            store.store("S1", "b.pdf", b"bee").unwrap();
            store.store("S1", "a.pdf", b"ay").unwrap();
        }
        fs::write(env.base_path.join("S1").join(".0123abcd.part"), b"half").unwrap();

        let reopened = env.blob_store();
        let names: Vec<String> = reopened.list("S1").unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
        assert_eq!(
            reopened.retrieve(&BlobHandle::new("S1", "b.pdf").unwrap()).unwrap(),
            b"bee"
        );
        assert!(!env.base_path.join("S1").join(".0123abcd.part").exists());
    }

    #[test]
    fn test_concurrent_writes_to_one_handle_leave_whole_content() {
        let env = TestEnvironment::new().unwrap();
        let store = Arc::new(env.blob_store());

        let payloads: Vec<Vec<u8>> = (0..8u8).map(|i| vec![i; 64 * 1024]).collect();
        std::thread::scope(|scope| {
            for payload in &payloads {
                let store = store.clone();
                scope.spawn(move || store.store("S1", "report.pdf", payload).unwrap());
            }
        });

        let content = store.retrieve(&BlobHandle::new("S1", "report.pdf").unwrap()).unwrap();
        assert!(payloads.contains(&content));
        assert_eq!(store.list("S1").unwrap().len(), 1);
        assert_eq!(temp_files_in(&env.base_path.join("S1")), 0);
        assert_eq!(store.key_lock_count(), 0);
    }

    #[test]
    fn test_concurrent_writes_to_distinct_files_keep_their_own_content() {
        let env = TestEnvironment::new().unwrap();
        let store = Arc::new(env.blob_store());

        const FILES: usize = 12;
        let payload = |i: usize| vec![i as u8 + 1; 32 * 1024 + i];
        std::thread::scope(|scope| {
            for i in 0..FILES {
                let store = store.clone();
                scope.spawn(move || store.store("S1", &format!("doc_{}.pdf", i), &payload(i)).unwrap());
            }
            for student in ["S2", "S3", "S4"] {
                let store = store.clone();
                scope.spawn(move || store.store(student, "photo.jpg", student.as_bytes()).unwrap());
            }
        });

        assert_eq!(store.list("S1").unwrap().len(), FILES);
        for i in 0..FILES {
            let handle = BlobHandle::new("S1", &format!("doc_{}.pdf", i)).unwrap();
            assert_eq!(store.retrieve(&handle).unwrap(), payload(i), "content of {}", handle);
        }
        for student in ["S2", "S3", "S4"] {
            let handle = BlobHandle::new(student, "photo.jpg").unwrap();
            assert_eq!(store.retrieve(&handle).unwrap(), student.as_bytes());
            assert_eq!(store.list(student).unwrap().len(), 1);
            assert_eq!(temp_files_in(&env.base_path.join(student)), 0);
        }
        assert_eq!(temp_files_in(&env.base_path.join("S1")), 0);
    }

    #[test]
    fn test_key_locks_are_released_after_use() {
        let env = TestEnvironment::new().unwrap();
        let store = env.blob_store();

        let blob = store.store("S1", "tc.pdf", b"tc").unwrap();
        store.retrieve(&blob.handle).unwrap();
        assert!(store.retrieve(&BlobHandle::new("S1", "missing.pdf").unwrap()).is_err());
        assert!(store.store("S1", "../escape.pdf", b"x").is_err());

        assert_eq!(store.key_lock_count(), 0);
    }

    fn temp_files_in(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| is_temp_file(&e.file_name().to_string_lossy()))
            .count()
    }
}
