//! Workspace root discovery
//!
//! Walks up from a document to the nearest workspace descriptor. YAML
//! descriptors (pnpm, yarn) always take precedence over bun lock files, even
//! when a lock file sits closer to the document.

use crate::config::{ResolverConfig, WorkspaceFile};
use crate::error::{CatalogError, CatalogResult};
use crate::types::{PackageManager, WorkspaceInfo};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Finds and caches the workspace descriptor owning each document
#[derive(Debug)]
pub struct WorkspaceLocator {
    workspace_files: Vec<WorkspaceFile>,
    bun_lockfiles: Vec<String>,
    manifest_file: String,
    /// Workspace folder roots that bound the upward search
    folders: RwLock<Vec<PathBuf>>,
    /// Document path to owning workspace; never invalidated per document
    cache: DashMap<PathBuf, WorkspaceInfo>,
    walks: AtomicUsize,
    hits: AtomicUsize,
}

impl WorkspaceLocator {
    /// Create a locator for the file names in `config`
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            workspace_files: config.workspace_files.clone(),
            bun_lockfiles: config.bun_lockfiles.clone(),
            manifest_file: config.manifest_file.clone(),
            folders: RwLock::new(Vec::new()),
            cache: DashMap::new(),
            walks: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
        }
    }

    /// Replace the workspace folder roots
    pub fn set_workspace_folders(&self, folders: Vec<PathBuf>) {
        *self.folders.write() = folders;
    }

    /// First configured folder containing `path`
    pub fn stop_boundary(&self, path: &Path) -> Option<PathBuf> {
        self.folders
            .read()
            .iter()
            .find(|folder| path.starts_with(folder))
            .cloned()
    }

    /// Find the workspace descriptor owning `path`
    pub async fn locate(&self, path: &Path) -> CatalogResult<WorkspaceInfo> {
        if let Some(info) = self.cache.get(path) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(info.clone());
        }

        self.walks.fetch_add(1, Ordering::Relaxed);
        let stop_at = self.stop_boundary(path);
        let start = search_start(path).await;

        let names: Vec<&str> = self.workspace_files.iter().map(|f| f.name.as_str()).collect();
        if let Some((file, idx)) = find_up(start, &names, stop_at.as_deref()).await {
            log::debug!("Found workspace descriptor {}", file.display());
            let info = WorkspaceInfo {
                path: file,
                manager: self.workspace_files[idx].manager,
            };
            self.cache.insert(path.to_path_buf(), info.clone());
            return Ok(info);
        }

        let locks: Vec<&str> = self.bun_lockfiles.iter().map(String::as_str).collect();
        if let Some((lock, _)) = find_up(start, &locks, stop_at.as_deref()).await {
            log::debug!("Found bun lock file {}", lock.display());
            let root = lock.parent().unwrap_or(Path::new("/"));
            let info = WorkspaceInfo {
                path: root.join(&self.manifest_file),
                manager: PackageManager::Bun,
            };
            self.cache.insert(path.to_path_buf(), info.clone());
            return Ok(info);
        }

        Err(CatalogError::WorkspaceNotFound(path.to_path_buf()))
    }

    /// Number of filesystem walks and cache hits so far
    pub fn counters(&self) -> (usize, usize) {
        (
            self.walks.load(Ordering::Relaxed),
            self.hits.load(Ordering::Relaxed),
        )
    }

    /// Forget every cached lookup
    pub fn clear(&self) {
        self.cache.clear();
    }
}

/// Directory the upward walk starts from
async fn search_start(path: &Path) -> &Path {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => path,
        _ => path.parent().unwrap_or(path),
    }
}

/// Walk from `start` towards the root (or `stop_at`, inclusive) and return the
/// first existing file among `names`, with its index in `names`.
///
/// Within one directory, earlier names win.
async fn find_up(
    start: &Path,
    names: &[&str],
    stop_at: Option<&Path>,
) -> Option<(PathBuf, usize)> {
    for dir in start.ancestors() {
        for (idx, name) in names.iter().enumerate() {
            let candidate = dir.join(name);
            if is_file(&candidate).await {
                return Some((candidate, idx));
            }
        }
        if stop_at == Some(dir) {
            break;
        }
    }
    None
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
