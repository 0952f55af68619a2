//! Resource backend: path discipline, metadata, and the local filesystem
//! implementation.

use std::collections::BTreeMap;

pub mod localfs;

pub use localfs::{LocalBackend, StreamWriter};

/// Metadata for one resource, as served to the verb handlers.
#[derive(Debug, Clone, Default)]
pub struct FileInfo {
    /// Display name (final path segment).
    pub name: String,
    /// Backend-relative, normalised path.
    pub path: String,
    pub size: u64,
    /// Whole seconds since the epoch.
    pub created: i64,
    pub modified: i64,
    pub accessed: i64,
    pub is_directory: bool,
    /// Quoted `"mtime-size"` in hex.
    pub etag: String,
    /// Dead properties. In-memory only; never persisted across restarts.
    pub properties: BTreeMap<String, String>,
}

pub type FsResult<T> = Result<T, FsError>;

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("resource not found")]
    NotFound,
    #[error("path escapes the configured root")]
    SecurityCheck,
    #[error("{0}")]
    Precondition(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Normalise a path: backslashes become `/`, runs of `/` collapse to one,
/// and a single trailing `/` is stripped (except on the bare root `/`).
///
/// `..` segments are NOT resolved; the security check is a plain prefix
/// comparison over this normal form.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for ch in path.chars() {
        let ch = if ch == '\\' { '/' } else { ch };
        if ch == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(ch);
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Final segment of a normalised path; empty for the root.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Everything before the final segment; empty when there is none.
pub fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}
