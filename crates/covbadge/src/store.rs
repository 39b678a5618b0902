//! Per-repository profile storage
//!
//! Each repository keeps exactly one profile: the most recent upload.
//! Saves and loads for the same repository are serialised; different
//! repositories never wait on each other.

use crate::result::{CovbadgeError, CovbadgeResult};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// File name of the stored profile inside a repository directory
pub const PROFILE_FILE_NAME: &str = "coverage.out";

/// Scratch file a save writes before renaming it over the profile
pub const TEMP_FILE_NAME: &str = "coverage.out.tmp";

/// A validated repository key
///
/// Keys are `/`-separated segments (`github.com/org/project`) and map
/// directly onto directories, so anything that could escape the storage
/// root is rejected. Segments naming the profile or its scratch file are
/// rejected too; they would turn another key's file into a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoName(String);

impl RepoName {
    /// Validate a raw repository name
    pub fn new(raw: impl Into<String>) -> CovbadgeResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(CovbadgeError::invalid_repo_name(raw, "name is empty"));
        }
        if raw.starts_with('/') {
            return Err(CovbadgeError::invalid_repo_name(raw, "name is absolute"));
        }
        if raw.contains('\\') {
            return Err(CovbadgeError::invalid_repo_name(raw, "backslashes are not allowed"));
        }
        if raw.contains('\0') {
            return Err(CovbadgeError::invalid_repo_name(raw, "NUL is not allowed"));
        }
        for segment in raw.split('/') {
            match segment {
                "" => return Err(CovbadgeError::invalid_repo_name(raw, "empty path segment")),
                "." | ".." => {
                    return Err(CovbadgeError::invalid_repo_name(raw, "relative path segment"))
                }
                PROFILE_FILE_NAME | TEMP_FILE_NAME => {
                    return Err(CovbadgeError::invalid_repo_name(raw, "reserved path segment"))
                }
                _ => {}
            }
        }
        Ok(Self(raw))
    }

    /// The key as given
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative directory path for this key
    #[must_use]
    pub fn to_relative_path(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for the latest profile of each repository
pub trait ProfileStore: Send + Sync {
    /// Replace the stored profile for `repo`
    fn save(&self, repo: &RepoName, contents: &[u8]) -> CovbadgeResult<()>;

    /// Read the stored profile for `repo`
    ///
    /// Returns [`CovbadgeError::ProfileNotFound`] when nothing was saved.
    fn load(&self, repo: &RepoName) -> CovbadgeResult<Vec<u8>>;

    /// Whether a profile has been saved for `repo`
    fn contains(&self, repo: &RepoName) -> bool;
}

/// Profiles on disk at `<root>/<repo>/coverage.out`
#[derive(Debug)]
pub struct FsProfileStore {
    root: PathBuf,
    locks: Mutex<HashMap<RepoName, Arc<RwLock<()>>>>,
}

impl FsProfileStore {
    /// Create a store rooted at `root`
    ///
    /// The directory is created lazily on the first save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Storage root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the stored profile for `repo`
    #[must_use]
    pub fn profile_path(&self, repo: &RepoName) -> PathBuf {
        self.root
            .join(repo.to_relative_path())
            .join(PROFILE_FILE_NAME)
    }

    /// Run `op` with the lock of `repo`
    ///
    /// The registry entry is dropped once no other caller holds it, so the
    /// map only ever tracks repositories with an operation in flight.
    fn with_lock<T>(
        &self,
        repo: &RepoName,
        op: impl FnOnce(&RwLock<()>) -> CovbadgeResult<T>,
    ) -> CovbadgeResult<T> {
        let lock = {
            let mut locks = self.registry(repo)?;
            Arc::clone(locks.entry(repo.clone()).or_default())
        };

        let result = op(&lock);

        // Release our handle under the registry mutex so the last caller out
        // always sees a count of two: the map's and its own
        let mut locks = self.registry(repo)?;
        if Arc::strong_count(&lock) == 2 {
            let _ = locks.remove(repo);
        }
        drop(lock);
        drop(locks);
        result
    }

    fn registry(
        &self,
        repo: &RepoName,
    ) -> CovbadgeResult<MutexGuard<'_, HashMap<RepoName, Arc<RwLock<()>>>>> {
        self.locks.lock().map_err(|_| CovbadgeError::LockPoisoned {
            repo: repo.to_string(),
        })
    }
}

impl ProfileStore for FsProfileStore {
    fn save(&self, repo: &RepoName, contents: &[u8]) -> CovbadgeResult<()> {
        self.with_lock(repo, |lock| {
            let _guard = lock.write().map_err(|_| CovbadgeError::LockPoisoned {
                repo: repo.to_string(),
            })?;

            let dir = self.root.join(repo.to_relative_path());
            if !dir.exists() {
                tracing::info!(repo = %repo, dir = %dir.display(), "creating repository directory");
            }
            std::fs::create_dir_all(&dir)?;

            // Write beside the target and rename so readers never see a partial file
            let path = dir.join(PROFILE_FILE_NAME);
            let tmp = dir.join(TEMP_FILE_NAME);
            if let Err(e) = std::fs::write(&tmp, contents).and_then(|()| std::fs::rename(&tmp, &path)) {
                if let Err(cleanup) = std::fs::remove_file(&tmp) {
                    tracing::debug!(path = %tmp.display(), error = %cleanup, "scratch file not removed");
                }
                return Err(e.into());
            }

            tracing::debug!(repo = %repo, bytes = contents.len(), path = %path.display(), "saved profile");
            Ok(())
        })
    }

    fn load(&self, repo: &RepoName) -> CovbadgeResult<Vec<u8>> {
        self.with_lock(repo, |lock| {
            let _guard = lock.read().map_err(|_| CovbadgeError::LockPoisoned {
                repo: repo.to_string(),
            })?;

            match std::fs::read(self.profile_path(repo)) {
                Ok(contents) => Ok(contents),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(CovbadgeError::ProfileNotFound {
                        repo: repo.to_string(),
                    })
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    fn contains(&self, repo: &RepoName) -> bool {
        self.profile_path(repo).is_file()
    }
}

/// In-process store, lost on restart
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<RepoName, Vec<u8>>>,
}

impl MemoryProfileStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repositories with a stored profile
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.read().map_or(0, |p| p.len())
    }

    /// Whether nothing has been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProfileStore for MemoryProfileStore {
    fn save(&self, repo: &RepoName, contents: &[u8]) -> CovbadgeResult<()> {
        let mut profiles = self.profiles.write().map_err(|_| CovbadgeError::LockPoisoned {
            repo: repo.to_string(),
        })?;
        let _ = profiles.insert(repo.clone(), contents.to_vec());
        Ok(())
    }

    fn load(&self, repo: &RepoName) -> CovbadgeResult<Vec<u8>> {
        let profiles = self.profiles.read().map_err(|_| CovbadgeError::LockPoisoned {
            repo: repo.to_string(),
        })?;
        profiles
            .get(repo)
            .cloned()
            .ok_or_else(|| CovbadgeError::ProfileNotFound {
                repo: repo.to_string(),
            })
    }

    fn contains(&self, repo: &RepoName) -> bool {
        self.profiles
            .read()
            .is_ok_and(|p| p.contains_key(repo))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo(name: &str) -> RepoName {
        RepoName::new(name).unwrap()
    }

    mod repo_name_tests {
        use super::*;

        #[test]
        fn test_accepts_plain_and_nested_names() {
            assert_eq!(repo("foo").as_str(), "foo");
            assert_eq!(repo("github.com/esell/hoptocopter").as_str(), "github.com/esell/hoptocopter");
            assert_eq!(repo("my-repo_2.0").to_string(), "my-repo_2.0");
        }

        #[test]
        fn test_rejects_escaping_names() {
            for bad in ["", "/etc", "..", "a/../b", "./a", "a//b", "a/", "a\\b", "a\0b"] {
                let err = RepoName::new(bad).unwrap_err();
                assert!(err.is_client_error(), "{bad:?} should be rejected");
            }
        }

        #[test]
        fn test_rejects_reserved_file_names() {
            for bad in ["coverage.out", "foo/coverage.out", "foo/coverage.out.tmp/bar"] {
                let err = RepoName::new(bad).unwrap_err();
                assert!(err.is_client_error(), "{bad:?} should be rejected");
            }
            assert_eq!(repo("foo/coverage.outs").as_str(), "foo/coverage.outs");
        }

        #[test]
        fn test_relative_path() {
            let path = repo("github.com/org/project").to_relative_path();
            assert_eq!(path, PathBuf::from("github.com").join("org").join("project"));
        }
    }

    mod fs_store_tests {
        use super::*;

        #[test]
        fn test_save_then_load() {
            let dir = TempDir::new().unwrap();
            let store = FsProfileStore::new(dir.path());
            let foo = repo("foo");

            assert!(!store.contains(&foo));
            store.save(&foo, b"mode: set\n").unwrap();
            assert!(store.contains(&foo));
            assert_eq!(store.load(&foo).unwrap(), b"mode: set\n");
            assert!(dir.path().join("foo").join(PROFILE_FILE_NAME).is_file());
        }

        #[test]
        fn test_save_replaces_previous_profile() {
            let dir = TempDir::new().unwrap();
            let store = FsProfileStore::new(dir.path());
            let foo = repo("foo");

            store.save(&foo, b"first").unwrap();
            store.save(&foo, b"second").unwrap();
            assert_eq!(store.load(&foo).unwrap(), b"second");
            assert!(!dir.path().join("foo").join("coverage.out.tmp").exists());
        }

        #[test]
        fn test_nested_repo_creates_directories() {
            let dir = TempDir::new().unwrap();
            let store = FsProfileStore::new(dir.path().join("data"));
            let nested = repo("github.com/org/project");

            store.save(&nested, b"x").unwrap();
            assert!(dir
                .path()
                .join("data/github.com/org/project/coverage.out")
                .is_file());
        }

        #[test]
        fn test_missing_profile_is_not_found() {
            let dir = TempDir::new().unwrap();
            let store = FsProfileStore::new(dir.path());
            let err = store.load(&repo("missing")).unwrap_err();
            assert!(matches!(err, CovbadgeError::ProfileNotFound { ref repo } if repo == "missing"));
        }

        #[test]
        fn test_repositories_are_independent() {
            let dir = TempDir::new().unwrap();
            let store = FsProfileStore::new(dir.path());
            store.save(&repo("a"), b"aaa").unwrap();
            store.save(&repo("b"), b"bbb").unwrap();
            assert_eq!(store.load(&repo("a")).unwrap(), b"aaa");
            assert_eq!(store.load(&repo("b")).unwrap(), b"bbb");
        }

        #[test]
        fn test_nested_key_does_not_shadow_parent() {
            let dir = TempDir::new().unwrap();
            let store = FsProfileStore::new(dir.path());

            store.save(&repo("foo"), b"parent").unwrap();
            store.save(&repo("foo/bar"), b"child").unwrap();
            store.save(&repo("foo"), b"parent again").unwrap();

            assert_eq!(store.load(&repo("foo")).unwrap(), b"parent again");
            assert_eq!(store.load(&repo("foo/bar")).unwrap(), b"child");
        }

        #[test]
        fn test_lock_registry_is_released() {
            let dir = TempDir::new().unwrap();
            let store = FsProfileStore::new(dir.path());

            for i in 0..1000 {
                let missing = repo(&format!("missing-{i}"));
                assert!(store.load(&missing).is_err());
            }
            store.save(&repo("foo"), b"x").unwrap();
            let _ = store.load(&repo("foo")).unwrap();

            assert_eq!(store.locks.lock().unwrap().len(), 0);
        }

        #[test]
        fn test_failed_save_removes_scratch_file() {
            let dir = TempDir::new().unwrap();
            let store = FsProfileStore::new(dir.path());
            let foo = repo("foo");
            // A non-empty directory where the profile belongs makes the rename fail
            let blocker = store.profile_path(&foo).join("occupied");
            std::fs::create_dir_all(&blocker).unwrap();

            let err = store.save(&foo, b"mode: set\n").unwrap_err();

            assert!(matches!(err, CovbadgeError::Io(_)));
            assert!(!dir.path().join("foo").join(TEMP_FILE_NAME).exists());
        }

        #[test]
        fn test_concurrent_save_and_load_never_tear() {
            let dir = TempDir::new().unwrap();
            let store = Arc::new(FsProfileStore::new(dir.path()));
            let foo = repo("foo");
            let a = vec![b'a'; 64 * 1024];
            let b = vec![b'b'; 64 * 1024];
            store.save(&foo, &a).unwrap();

            let writers: Vec<_> = [a.clone(), b.clone()]
                .into_iter()
                .map(|contents| {
                    let store = Arc::clone(&store);
                    let foo = foo.clone();
                    std::thread::spawn(move || {
                        for _ in 0..20 {
                            store.save(&foo, &contents).unwrap();
                        }
                    })
                })
                .collect();

            for _ in 0..40 {
                let loaded = store.load(&foo).unwrap();
                assert!(loaded == a || loaded == b, "read a torn profile");
            }
            for w in writers {
                w.join().unwrap();
            }
            assert_eq!(store.locks.lock().unwrap().len(), 0);
        }
    }

    mod memory_store_tests {
        use super::*;

        #[test]
        fn test_roundtrip_and_missing() {
            let store = MemoryProfileStore::new();
            assert!(store.is_empty());

            store.save(&repo("foo"), b"data").unwrap();
            assert_eq!(store.len(), 1);
            assert!(store.contains(&repo("foo")));
            assert_eq!(store.load(&repo("foo")).unwrap(), b"data");
            assert!(matches!(
                store.load(&repo("bar")),
                Err(CovbadgeError::ProfileNotFound { .. })
            ));
        }

        #[test]
        fn test_usable_as_trait_object() {
            let store: Arc<dyn ProfileStore> = Arc::new(MemoryProfileStore::new());
            store.save(&repo("x"), b"1").unwrap();
            assert!(store.contains(&repo("x")));
        }
    }
}
