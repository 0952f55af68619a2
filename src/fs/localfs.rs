//! Local filesystem backend.
//!
//! Every public operation runs its argument through the security check
//! first: the normalised absolute form must have the normalised root as a
//! prefix, otherwise the operation fails before any syscall. Metadata is
//! cached for a short TTL keyed by absolute path; every mutating operation
//! evicts the entry (moves evict both ends). Writers to the same absolute
//! path are serialised through a striped lock table.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex as StdMutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use log::{debug, error, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, MutexGuard};

use super::{basename, normalize_path, parent_path, FileInfo, FsError, FsResult};

const CACHE_TTL: Duration = Duration::from_secs(5);
const LOCK_STRIPES: usize = 64;

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

struct CacheEntry {
    info: FileInfo,
    stored: Instant,
}

pub struct LocalBackend {
    root: String,
    cache: StdMutex<HashMap<String, CacheEntry>>,
    stripes: Vec<Mutex<()>>,
}

/// In-progress streaming write. Dereferences to the open file; keeps the
/// path's stripe lock held until it is consumed by
/// [`LocalBackend::finish_write`] (or dropped).
pub struct StreamWriter<'a> {
    file: tokio::fs::File,
    _guard: MutexGuard<'a, ()>,
}

impl std::ops::Deref for StreamWriter<'_> {
    type Target = tokio::fs::File;

    fn deref(&self) -> &Self::Target {
        &self.file
    }
}

impl std::ops::DerefMut for StreamWriter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.file
    }
}

fn not_found(err: std::io::Error) -> FsError {
    if err.kind() == ErrorKind::NotFound {
        FsError::NotFound
    } else {
        FsError::Io(err)
    }
}

impl LocalBackend {
    /// Create a backend rooted at `root`. The directory is created if it
    /// does not exist yet.
    pub fn new(root: &str) -> LocalBackend {
        let root = normalize_path(root);
        if let Err(err) = std::fs::create_dir(&root) {
            if err.kind() != ErrorKind::AlreadyExists {
                error!("failed to create root directory {root}: {err}");
            }
        }
        LocalBackend {
            root,
            cache: StdMutex::new(HashMap::new()),
            stripes: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Normalised absolute path for `path`, or a security error when the
    /// result is not under the root.
    fn absolute(&self, path: &str) -> FsResult<String> {
        let abs = normalize_path(&format!("{}/{}", self.root, path));
        if !abs.as_bytes().starts_with(self.root.as_bytes()) {
            error!("security check failed for path: {path}");
            return Err(FsError::SecurityCheck);
        }
        Ok(abs)
    }

    fn stripe(&self, abs: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        abs.hash(&mut hasher);
        (hasher.finish() as usize) % LOCK_STRIPES
    }

    async fn lock_path(&self, abs: &str) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe(abs)].lock().await
    }

    /// Lock two paths without deadlocking: stripes are taken in index
    /// order, and a shared stripe is taken once.
    async fn lock_pair(
        &self,
        a: &str,
        b: &str,
    ) -> (MutexGuard<'_, ()>, Option<MutexGuard<'_, ()>>) {
        let (mut lo, mut hi) = (self.stripe(a), self.stripe(b));
        if lo == hi {
            return (self.stripes[lo].lock().await, None);
        }
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }
        let first = self.stripes[lo].lock().await;
        let second = self.stripes[hi].lock().await;
        (first, Some(second))
    }

    fn cache_lookup(&self, abs: &str) -> Option<FileInfo> {
        let mut cache = self.cache.lock().unwrap();
        match cache.get(abs) {
            Some(entry) if entry.stored.elapsed() < CACHE_TTL => Some(entry.info.clone()),
            Some(_) => {
                cache.remove(abs);
                None
            }
            None => None,
        }
    }

    fn cache_store(&self, abs: &str, info: &FileInfo) {
        self.cache.lock().unwrap().insert(
            abs.to_owned(),
            CacheEntry {
                info: info.clone(),
                stored: Instant::now(),
            },
        );
    }

    fn cache_evict(&self, abs: &str) {
        self.cache.lock().unwrap().remove(abs);
    }

    /// Create exactly one directory; the parent must already exist.
    pub async fn create_directory(&self, path: &str) -> FsResult<()> {
        let abs = self.absolute(path)?;
        let _guard = self.lock_path(&abs).await;
        tokio::fs::create_dir(&abs).await?;
        Ok(())
    }

    /// Delete a file, or a directory tree depth-first. A missing resource
    /// is a failure at the top level only; failures further down are
    /// logged and skipped (the final `rmdir` will surface them).
    pub async fn delete_resource(&self, path: &str) -> FsResult<()> {
        let abs = self.absolute(path)?;
        let _guard = self.lock_path(&abs).await;
        self.delete_unlocked(&abs).await
    }

    async fn delete_unlocked(&self, abs: &str) -> FsResult<()> {
        let meta = tokio::fs::metadata(abs).await.map_err(not_found)?;
        if meta.is_dir() {
            self.delete_tree(abs).await?;
        } else {
            tokio::fs::remove_file(abs).await?;
        }
        self.cache_evict(abs);
        Ok(())
    }

    fn delete_tree<'a>(&'a self, abs: &'a str) -> BoxFuture<'a, FsResult<()>> {
        async move {
            let mut entries = tokio::fs::read_dir(abs).await?;
            while let Some(entry) = entries.next_entry().await? {
                let child = format!("{}/{}", abs, entry.file_name().to_string_lossy());
                let is_dir = entry
                    .file_type()
                    .await
                    .map(|t| t.is_dir())
                    .unwrap_or(false);
                let result = if is_dir {
                    self.delete_tree(&child).await
                } else {
                    tokio::fs::remove_file(&child).await.map_err(FsError::from)
                };
                if let Err(err) = result {
                    debug!("failed to delete {child}: {err}");
                }
            }
            tokio::fs::remove_dir(abs).await?;
            Ok(())
        }
        .boxed()
    }

    /// Recursive copy. Directories are created with the source mode; the
    /// walk stops at the first failure, leaving whatever was copied so far
    /// in place.
    pub async fn copy_resource(&self, src: &str, dst: &str) -> FsResult<()> {
        let abs_src = self.absolute(src)?;
        let abs_dst = self.absolute(dst)?;
        let _guards = self.lock_pair(&abs_src, &abs_dst).await;
        self.copy_tree(&abs_src, &abs_dst).await
    }

    fn copy_tree<'a>(&'a self, src: &'a str, dst: &'a str) -> BoxFuture<'a, FsResult<()>> {
        async move {
            let meta = tokio::fs::metadata(src).await.map_err(not_found)?;
            if meta.is_dir() {
                let mut builder = tokio::fs::DirBuilder::new();
                builder.mode(meta.permissions().mode());
                builder.create(dst).await?;
                let mut entries = tokio::fs::read_dir(src).await?;
                while let Some(entry) = entries.next_entry().await? {
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    self.copy_tree(&format!("{src}/{name}"), &format!("{dst}/{name}"))
                        .await?;
                }
            } else {
                tokio::fs::copy(src, dst).await?;
            }
            Ok(())
        }
        .boxed()
    }

    /// Move with rename fallback. Preconditions: the source exists, the
    /// destination's parent exists, and an existing destination must match
    /// the source's kind (a directory destination must also be empty).
    /// When `rename` fails the move degrades to copy + delete; if the
    /// post-copy delete fails the fresh destination is removed again so the
    /// operation stays all-or-nothing from the client's point of view.
    pub async fn move_resource(&self, src: &str, dst: &str) -> FsResult<()> {
        let abs_src = self.absolute(src)?;
        let abs_dst = self.absolute(dst)?;
        let _guards = self.lock_pair(&abs_src, &abs_dst).await;

        info!("moving resource from {abs_src} to {abs_dst}");
        let src_meta = tokio::fs::metadata(&abs_src).await.map_err(not_found)?;

        let dest_parent = parent_path(&abs_dst);
        if tokio::fs::metadata(dest_parent).await.is_err() {
            error!("destination parent directory does not exist: {dest_parent}");
            return Err(FsError::Precondition("destination parent missing"));
        }

        if let Ok(dst_meta) = tokio::fs::metadata(&abs_dst).await {
            if src_meta.is_dir() != dst_meta.is_dir() {
                error!("cannot overwrite: source and destination kinds differ");
                return Err(FsError::Precondition(
                    "source and destination are different kinds",
                ));
            }
            if dst_meta.is_dir() {
                let mut entries = tokio::fs::read_dir(&abs_dst).await?;
                if entries.next_entry().await?.is_some() {
                    error!("destination directory is not empty: {abs_dst}");
                    return Err(FsError::Precondition("destination directory not empty"));
                }
            }
        }

        if let Err(err) = tokio::fs::rename(&abs_src, &abs_dst).await {
            debug!("rename failed ({err}), falling back to copy + delete");
            self.copy_tree(&abs_src, &abs_dst).await?;
            if let Err(err) = self.delete_unlocked(&abs_src).await {
                let _ = self.delete_unlocked(&abs_dst).await;
                error!("failed to delete source after copy: {err}");
                return Err(err);
            }
        }

        self.cache_evict(&abs_src);
        self.cache_evict(&abs_dst);
        Ok(())
    }

    async fn create_parent(&self, abs: &str) -> FsResult<()> {
        let parent = parent_path(abs);
        if parent.is_empty() {
            return Ok(());
        }
        match tokio::fs::create_dir(parent).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(err) => {
                error!("failed to create parent directory {parent}: {err}");
                Err(FsError::Io(err))
            }
        }
    }

    /// Truncating whole-buffer write. Creates the parent directory if
    /// needed (one level), fsyncs, and evicts the cache entry.
    pub async fn write_file(&self, path: &str, data: &[u8]) -> FsResult<()> {
        let abs = self.absolute(path)?;
        let _guard = self.lock_path(&abs).await;
        info!("writing file: {abs} (size: {} bytes)", data.len());

        self.create_parent(&abs).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&abs)
            .await?;
        file.write_all(data).await?;
        if let Err(err) = file.sync_all().await {
            warn!("fsync failed for {abs}: {err}");
        }
        drop(file);

        self.cache_evict(&abs);
        Ok(())
    }

    /// Stage `data` in a `.tmp_<epoch>_<rand>` file directly under the
    /// root, fsync it, then rename it onto the final path. Any failure
    /// removes the temp file.
    pub async fn write_file_atomic(&self, path: &str, data: &[u8]) -> FsResult<()> {
        let abs = self.absolute(path)?;
        let _guard = self.lock_path(&abs).await;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let tag = (now.subsec_nanos() as u64)
            ^ TMP_COUNTER
                .fetch_add(1, Ordering::Relaxed)
                .wrapping_mul(0x9e37_79b9);
        let tmp = format!("{}/.tmp_{}_{}", self.root, now.as_secs(), tag);

        let staged: FsResult<()> = async {
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp)
                .await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            Ok(())
        }
        .await;
        if let Err(err) = staged {
            let _ = tokio::fs::remove_file(&tmp).await;
            error!("failed to stage upload for {abs}: {err}");
            return Err(err);
        }

        self.create_parent(&abs).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &abs).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            error!("failed to move staged upload into place: {err}");
            return Err(FsError::Io(err));
        }

        self.cache_evict(&abs);
        Ok(())
    }

    /// Open `path` for a streaming truncating write. The caller writes to
    /// the returned handle and must finish with [`finish_write`]. The
    /// path's stripe lock travels inside the [`StreamWriter`], so the
    /// whole open-to-finish span is serialised against other writers to
    /// the same absolute path.
    ///
    /// [`finish_write`]: LocalBackend::finish_write
    pub async fn write_file_stream(&self, path: &str) -> FsResult<StreamWriter<'_>> {
        let abs = self.absolute(path)?;
        let guard = self.lock_path(&abs).await;
        info!("opening file for writing: {abs}");
        self.create_parent(&abs).await?;
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&abs)
            .await?;
        Ok(StreamWriter {
            file,
            _guard: guard,
        })
    }

    /// Complete a streaming write: fsync (tolerating failure), close,
    /// evict the cache entry, and release the path's stripe lock.
    pub async fn finish_write(&self, path: &str, writer: StreamWriter<'_>) -> FsResult<()> {
        let abs = self.absolute(path)?;
        if let Err(err) = writer.file.sync_all().await {
            warn!("fsync failed for {abs}: {err}");
        }
        self.cache_evict(&abs);
        drop(writer);
        Ok(())
    }

    pub async fn read_file(&self, path: &str) -> FsResult<Vec<u8>> {
        let abs = self.absolute(path)?;
        tokio::fs::read(&abs).await.map_err(not_found)
    }

    /// Resource metadata, served from the cache when fresh.
    pub async fn get_resource_info(&self, path: &str) -> FsResult<FileInfo> {
        let abs = self.absolute(path)?;
        if let Some(info) = self.cache_lookup(&abs) {
            return Ok(info);
        }

        let meta = tokio::fs::metadata(&abs).await.map_err(not_found)?;
        let norm = normalize_path(path);
        let info = FileInfo {
            name: basename(&norm).to_owned(),
            path: norm,
            size: meta.len(),
            created: meta.ctime(),
            modified: meta.mtime(),
            accessed: meta.atime(),
            is_directory: meta.is_dir(),
            etag: format!("\"{:x}-{:x}\"", meta.mtime(), meta.len()),
            properties: Default::default(),
        };
        self.cache_store(&abs, &info);
        Ok(info)
    }

    /// Enumerate a directory (excluding `.`/`..`), warming the metadata
    /// cache per entry. Entries whose metadata cannot be read are skipped.
    pub async fn list_directory(&self, path: &str) -> FsResult<Vec<FileInfo>> {
        let abs = self.absolute(path)?;
        let mut entries = tokio::fs::read_dir(&abs).await.map_err(not_found)?;
        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let sub = format!("{}/{}", path, entry.file_name().to_string_lossy());
            match self.get_resource_info(&sub).await {
                Ok(info) => items.push(info),
                Err(err) => debug!("skipping unreadable entry {sub}: {err}"),
            }
        }
        Ok(items)
    }

    /// Replace a resource's dead-property map. The change lives on a local
    /// copy of the metadata only; nothing is persisted.
    pub async fn set_properties(
        &self,
        path: &str,
        properties: std::collections::BTreeMap<String, String>,
    ) -> FsResult<()> {
        let mut info = self.get_resource_info(path).await?;
        info.properties = properties;
        Ok(())
    }

    pub async fn get_properties(
        &self,
        path: &str,
    ) -> FsResult<std::collections::BTreeMap<String, String>> {
        let info = self.get_resource_info(path).await?;
        Ok(info.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> (tempfile::TempDir, LocalBackend) {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new(dir.path().to_str().unwrap());
        (dir, backend)
    }

    #[tokio::test]
    async fn write_then_read_round_trip() {
        let (_dir, fs) = backend();
        fs.write_file("/hello.txt", b"hello").await.unwrap();
        assert_eq!(fs.read_file("/hello.txt").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn atomic_write_leaves_no_temp_files() {
        let (dir, fs) = backend();
        fs.write_file_atomic("/upload.bin", b"payload").await.unwrap();
        assert_eq!(fs.read_file("/upload.bin").await.unwrap(), b"payload");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp_"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn atomic_write_creates_single_parent() {
        let (_dir, fs) = backend();
        fs.write_file_atomic("/sub/file.txt", b"x").await.unwrap();
        assert_eq!(fs.read_file("/sub/file.txt").await.unwrap(), b"x");
    }

    #[tokio::test]
    async fn streaming_write_round_trip() {
        let (_dir, fs) = backend();
        let mut writer = fs.write_file_stream("/stream.txt").await.unwrap();
        writer.write_all(b"part one, ").await.unwrap();
        writer.write_all(b"part two").await.unwrap();
        fs.finish_write("/stream.txt", writer).await.unwrap();
        assert_eq!(
            fs.read_file("/stream.txt").await.unwrap(),
            b"part one, part two"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn streaming_write_excludes_other_writers() {
        let (_dir, fs) = backend();
        let fs = std::sync::Arc::new(fs);

        let mut writer = fs.write_file_stream("/contested.txt").await.unwrap();
        writer.write_all(b"streamed").await.unwrap();

        // A whole-buffer write to the same path must wait for the stripe
        // lock the writer is holding.
        let contender = {
            let fs = fs.clone();
            tokio::spawn(async move { fs.write_file("/contested.txt", b"direct").await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        fs.finish_write("/contested.txt", writer).await.unwrap();
        contender.await.unwrap().unwrap();
        assert_eq!(fs.read_file("/contested.txt").await.unwrap(), b"direct");
    }

    #[tokio::test]
    async fn create_directory_needs_existing_parent() {
        let (_dir, fs) = backend();
        assert!(fs.create_directory("/a/b").await.is_err());
        fs.create_directory("/a").await.unwrap();
        fs.create_directory("/a/b").await.unwrap();
        assert!(fs.get_resource_info("/a/b").await.unwrap().is_directory);
    }

    #[tokio::test]
    async fn delete_is_recursive_but_strict_at_top() {
        let (_dir, fs) = backend();
        fs.create_directory("/tree").await.unwrap();
        fs.create_directory("/tree/inner").await.unwrap();
        fs.write_file("/tree/inner/leaf", b"1").await.unwrap();
        fs.delete_resource("/tree").await.unwrap();
        assert!(matches!(
            fs.get_resource_info("/tree").await,
            Err(FsError::NotFound)
        ));
        assert!(matches!(
            fs.delete_resource("/tree").await,
            Err(FsError::NotFound)
        ));
    }

    #[tokio::test]
    async fn copy_directory_recursively() {
        let (_dir, fs) = backend();
        fs.create_directory("/src").await.unwrap();
        fs.write_file("/src/a", b"a").await.unwrap();
        fs.create_directory("/src/nested").await.unwrap();
        fs.write_file("/src/nested/b", b"b").await.unwrap();

        fs.copy_resource("/src", "/dst").await.unwrap();
        assert_eq!(fs.read_file("/dst/a").await.unwrap(), b"a");
        assert_eq!(fs.read_file("/dst/nested/b").await.unwrap(), b"b");
        // source untouched
        assert_eq!(fs.read_file("/src/a").await.unwrap(), b"a");
    }

    #[tokio::test]
    async fn move_renames_and_evicts() {
        let (_dir, fs) = backend();
        fs.write_file("/from.txt", b"data").await.unwrap();
        let _ = fs.get_resource_info("/from.txt").await.unwrap();

        fs.move_resource("/from.txt", "/to.txt").await.unwrap();
        assert!(matches!(
            fs.get_resource_info("/from.txt").await,
            Err(FsError::NotFound)
        ));
        assert_eq!(fs.read_file("/to.txt").await.unwrap(), b"data");
    }

    #[tokio::test]
    async fn move_rejects_kind_mismatch() {
        let (_dir, fs) = backend();
        fs.write_file("/file", b"f").await.unwrap();
        fs.create_directory("/dir").await.unwrap();
        assert!(matches!(
            fs.move_resource("/file", "/dir").await,
            Err(FsError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn move_rejects_nonempty_directory_destination() {
        let (_dir, fs) = backend();
        fs.create_directory("/a").await.unwrap();
        fs.create_directory("/b").await.unwrap();
        fs.write_file("/b/keep", b"1").await.unwrap();
        assert!(matches!(
            fs.move_resource("/a", "/b").await,
            Err(FsError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn move_requires_destination_parent() {
        let (_dir, fs) = backend();
        fs.write_file("/file", b"f").await.unwrap();
        assert!(matches!(
            fs.move_resource("/file", "/missing/file").await,
            Err(FsError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn info_fields_and_etag_shape() {
        let (_dir, fs) = backend();
        fs.write_file("/dir-less.txt", b"abcdef").await.unwrap();
        let info = fs.get_resource_info("/dir-less.txt").await.unwrap();
        assert_eq!(info.name, "dir-less.txt");
        assert_eq!(info.path, "/dir-less.txt");
        assert_eq!(info.size, 6);
        assert!(!info.is_directory);
        assert!(info.modified > 0);
        assert_eq!(info.etag, format!("\"{:x}-{:x}\"", info.modified, info.size));
    }

    #[tokio::test]
    async fn cache_serves_stale_until_evicted() {
        let (dir, fs) = backend();
        fs.write_file("/cached.txt", b"12345").await.unwrap();
        assert_eq!(fs.get_resource_info("/cached.txt").await.unwrap().size, 5);

        // Mutate behind the backend's back: the cached size survives...
        std::fs::write(dir.path().join("cached.txt"), b"123456789").unwrap();
        assert_eq!(fs.get_resource_info("/cached.txt").await.unwrap().size, 5);

        // ...until a write through the backend evicts the entry.
        fs.write_file("/cached.txt", b"ab").await.unwrap();
        assert_eq!(fs.get_resource_info("/cached.txt").await.unwrap().size, 2);
    }

    #[tokio::test]
    async fn list_directory_reports_children() {
        let (_dir, fs) = backend();
        fs.create_directory("/d").await.unwrap();
        fs.write_file("/d/one", b"1").await.unwrap();
        fs.create_directory("/d/two").await.unwrap();

        let mut names: Vec<_> = fs
            .list_directory("/d")
            .await
            .unwrap()
            .into_iter()
            .map(|i| (i.name, i.is_directory))
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![("one".to_owned(), false), ("two".to_owned(), true)]
        );
    }

    #[tokio::test]
    async fn properties_are_in_memory_only() {
        let (_dir, fs) = backend();
        fs.write_file("/p.txt", b"x").await.unwrap();
        let mut props = std::collections::BTreeMap::new();
        props.insert("Z:author".to_owned(), "someone".to_owned());
        fs.set_properties("/p.txt", props).await.unwrap();
        // nothing persisted
        assert!(fs.get_properties("/p.txt").await.unwrap().is_empty());
        assert!(fs
            .set_properties("/missing", Default::default())
            .await
            .is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_writes_to_distinct_paths() {
        let (_dir, fs) = backend();
        let fs = std::sync::Arc::new(fs);
        let mut tasks = Vec::new();
        for i in 0..8 {
            let fs = fs.clone();
            tasks.push(tokio::spawn(async move {
                let path = format!("/file-{i}.txt");
                let data = vec![b'a' + i as u8; 1024];
                fs.write_file(&path, &data).await.unwrap();
                assert_eq!(fs.read_file(&path).await.unwrap(), data);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
    }
}
