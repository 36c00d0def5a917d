//! Workspace catalog resolution for package manifests
//!
//! Resolves `catalog:` version references in a `package.json` to the versions
//! declared at the workspace root (`pnpm-workspace.yaml`, yarn's descriptor,
//! or a bun root `package.json`), together with the exact source span of each
//! version for go-to-definition.
//!
//! ```no_run
//! use catalog_lsp::{CatalogResolver, DocumentManager, ResolverConfig};
//! use std::sync::Arc;
//! use url::Url;
//!
//! # async fn demo() {
//! let documents = Arc::new(DocumentManager::new());
//! let resolver = CatalogResolver::new(documents, ResolverConfig::default());
//! let manifest = Url::parse("file:///repo/apps/web/package.json").unwrap();
//! if let Some(result) = resolver.resolve_catalog(&manifest, "react", "default").await {
//!     println!("react@{} ({})", result.version, result.manager);
//! }
//! # }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod lsp;
pub mod manifest;
pub mod position;
pub mod refresh;
pub mod resolver;
pub mod types;
pub mod workspace;

pub use config::{ResolverConfig, WorkspaceFile};
pub use document::{DocumentManager, DocumentSource};
pub use error::{CatalogError, CatalogResult};
pub use manifest::{CatalogReference, find_catalog_references};
pub use position::{DescriptorFormat, index_positions};
pub use refresh::RefreshSink;
pub use resolver::{CatalogResolver, ResolverStats};
pub use types::*;
pub use workspace::{WorkspaceLocator, load_catalogs};
