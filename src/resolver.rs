//! Catalog resolution
//!
//! [`CatalogResolver`] ties a `catalog:` reference in a manifest to the
//! version declared at the workspace root and to the span of that version in
//! the descriptor. It owns every cache:
//!
//! - workspace lookups, keyed by document path, kept for the whole session;
//! - catalog values and catalog spans, keyed by descriptor URI, evicted when
//!   the descriptor changes.
//!
//! Nothing here reports errors to the caller. Missing workspaces, unreadable
//! files and malformed descriptors all resolve to `None`.

use crate::config::ResolverConfig;
use crate::document::DocumentSource;
use crate::error::{CatalogError, CatalogResult};
use crate::position::{DescriptorFormat, index_positions};
use crate::refresh::{RefreshScheduler, RefreshSink};
use crate::types::{ResolutionResult, WorkspaceData, WorkspaceInfo, WorkspacePositionData};
use crate::workspace::{WorkspaceLocator, load_catalogs};
use dashmap::DashMap;
use lsp_types::Location;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Counters describing cache behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Upward filesystem searches performed
    pub locator_walks: usize,
    /// Workspace lookups answered from cache
    pub locator_hits: usize,
    /// Descriptors parsed for catalog values
    pub catalog_loads: usize,
    /// Descriptors parsed for catalog spans
    pub position_builds: usize,
    /// Descriptor change notifications that evicted cached data
    pub invalidations: usize,
}

/// Descriptor text together with its identity
struct Descriptor {
    uri: Url,
    text: String,
}

/// Resolves `catalog:` references to versions and definition locations
pub struct CatalogResolver {
    documents: Arc<dyn DocumentSource>,
    locator: WorkspaceLocator,
    data: DashMap<Url, Arc<WorkspaceData>>,
    positions: DashMap<Url, Arc<WorkspacePositionData>>,
    refresh: Option<RefreshScheduler>,
    config: ResolverConfig,
    catalog_loads: AtomicUsize,
    position_builds: AtomicUsize,
    invalidations: AtomicUsize,
}

impl CatalogResolver {
    /// Create a resolver reading open documents from `documents`
    pub fn new(documents: Arc<dyn DocumentSource>, config: ResolverConfig) -> Self {
        Self {
            documents,
            locator: WorkspaceLocator::new(&config),
            data: DashMap::new(),
            positions: DashMap::new(),
            refresh: None,
            config,
            catalog_loads: AtomicUsize::new(0),
            position_builds: AtomicUsize::new(0),
            invalidations: AtomicUsize::new(0),
        }
    }

    /// Signal `sink` (debounced) whenever cached catalog data is evicted
    pub fn with_refresh_sink(mut self, sink: Arc<dyn RefreshSink>) -> Self {
        self.refresh = Some(RefreshScheduler::new(sink, self.config.refresh_debounce()));
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Bound the upward search by these workspace folders; non-file URIs are skipped
    pub fn set_workspace_folders(&self, folders: &[Url]) {
        let paths = folders
            .iter()
            .filter_map(|folder| match folder.to_file_path() {
                Ok(path) => Some(path),
                Err(()) => {
                    log::debug!("Ignoring non-file workspace folder {}", folder);
                    None
                }
            })
            .collect();
        self.locator.set_workspace_folders(paths);
    }

    /// Resolve `package_name` in catalog `catalog` for the manifest at `document_uri`
    pub async fn resolve_catalog(
        &self,
        document_uri: &Url,
        package_name: &str,
        catalog: &str,
    ) -> Option<ResolutionResult> {
        let path = match document_path(document_uri) {
            Ok(path) => path,
            Err(err) => {
                log::debug!("{}", err);
                return None;
            }
        };

        let workspace = match self.locator.locate(&path).await {
            Ok(workspace) => workspace,
            Err(err) => {
                log::warn!("{}", err);
                return None;
            }
        };
        let descriptor = match self.read_descriptor(&workspace.path).await {
            Ok(descriptor) => descriptor,
            Err(err) => {
                log::error!("Failed to read workspace file: {}", err);
                return None;
            }
        };

        let data = self.workspace_data(&descriptor, &workspace);
        let version = data.select(catalog)?.get(package_name)?.clone();

        let positions = self.workspace_positions(&descriptor, &workspace);
        let definition = positions
            .select(catalog)
            .and_then(|spans| spans.get(package_name))
            .map(|span| Location::new(descriptor.uri.clone(), span.to_range()));

        Some(ResolutionResult {
            version,
            definition,
            manager: workspace.manager,
        })
    }

    /// Evict cached catalog data for a changed descriptor.
    ///
    /// Returns whether anything was cached for `uri`. When something was, a
    /// debounced refresh is scheduled on the configured sink.
    pub fn on_descriptor_changed(&self, uri: &Url) -> bool {
        let evicted_data = self.data.remove(uri).is_some();
        let evicted_positions = self.positions.remove(uri).is_some();
        if !(evicted_data || evicted_positions) {
            return false;
        }

        log::debug!("Evicted catalog cache for {}", uri);
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        if let Some(refresh) = &self.refresh {
            refresh.schedule();
        }
        true
    }

    /// Clear every cache and drop any pending refresh
    pub fn dispose(&self) {
        self.data.clear();
        self.positions.clear();
        self.locator.clear();
        if let Some(refresh) = &self.refresh {
            refresh.cancel();
        }
    }

    pub fn stats(&self) -> ResolverStats {
        let (locator_walks, locator_hits) = self.locator.counters();
        ResolverStats {
            locator_walks,
            locator_hits,
            catalog_loads: self.catalog_loads.load(Ordering::Relaxed),
            position_builds: self.position_builds.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    /// Open buffer if the descriptor is open in the editor, disk otherwise
    async fn read_descriptor(&self, path: &Path) -> CatalogResult<Descriptor> {
        let uri = Url::from_file_path(path)
            .map_err(|()| CatalogError::InvalidUri(path.display().to_string()))?;

        if let Some(text) = self.documents.text(&uri) {
            return Ok(Descriptor { uri, text });
        }

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| CatalogError::io(path, err))?;
        Ok(Descriptor { uri, text })
    }

    fn workspace_data(
        &self,
        descriptor: &Descriptor,
        workspace: &WorkspaceInfo,
    ) -> Arc<WorkspaceData> {
        if let Some(data) = self.data.get(&descriptor.uri) {
            return Arc::clone(&data);
        }

        self.catalog_loads.fetch_add(1, Ordering::Relaxed);
        let data = Arc::new(load_catalogs(&descriptor.text, workspace.manager));
        self.data.insert(descriptor.uri.clone(), Arc::clone(&data));
        data
    }

    fn workspace_positions(
        &self,
        descriptor: &Descriptor,
        workspace: &WorkspaceInfo,
    ) -> Arc<WorkspacePositionData> {
        if let Some(positions) = self.positions.get(&descriptor.uri) {
            return Arc::clone(&positions);
        }

        self.position_builds.fetch_add(1, Ordering::Relaxed);
        let format = DescriptorFormat::for_manager(workspace.manager);
        let positions = Arc::new(index_positions(&descriptor.text, format));
        self.positions
            .insert(descriptor.uri.clone(), Arc::clone(&positions));
        positions
    }
}

fn document_path(uri: &Url) -> CatalogResult<PathBuf> {
    uri.to_file_path()
        .map_err(|()| CatalogError::InvalidUri(uri.to_string()))
}
