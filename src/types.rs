//! Core data model shared by the locator, loader, indexer and resolver

use indexmap::IndexMap;
use lsp_types::Location;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Name of the catalog selected by a bare `catalog:` reference
pub const DEFAULT_CATALOG: &str = "default";

/// Package managers whose workspace catalogs can be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Pnpm,
    Yarn,
    Bun,
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageManager::Pnpm => write!(f, "pnpm"),
            PackageManager::Yarn => write!(f, "yarn"),
            PackageManager::Bun => write!(f, "bun"),
        }
    }
}

/// Location of the descriptor that owns a document's workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceInfo {
    /// Absolute path to the workspace descriptor
    pub path: PathBuf,
    /// Package manager implied by the descriptor that was found
    pub manager: PackageManager,
}

/// Package name to pinned version, in declaration order
pub type CatalogMap = IndexMap<String, String>;

/// Catalog declarations of one workspace descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceData {
    /// The default catalog (`catalog:` key)
    pub catalog: Option<CatalogMap>,
    /// Named catalogs (`catalogs:` key)
    pub catalogs: Option<IndexMap<String, CatalogMap>>,
}

impl WorkspaceData {
    /// Select the map a catalog reference points at.
    ///
    /// `default` prefers the top-level catalog and falls back to
    /// `catalogs.default`; any other name only looks in `catalogs`.
    pub fn select(&self, catalog: &str) -> Option<&CatalogMap> {
        select_catalog(self.catalog.as_ref(), self.catalogs.as_ref(), catalog)
    }
}

/// A source coordinate: 1-based line, 0-based column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Start and end of a version literal in the descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl Span {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    /// Convert to an editor range (0-based lines)
    pub fn to_range(&self) -> lsp_types::Range {
        lsp_types::Range::new(
            lsp_types::Position::new(self.start.line.saturating_sub(1), self.start.column),
            lsp_types::Position::new(self.end.line.saturating_sub(1), self.end.column),
        )
    }
}

/// Package name to the span of its version literal
pub type PositionMap = IndexMap<String, Span>;

/// Same shape as [`WorkspaceData`], with spans in place of versions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspacePositionData {
    /// Spans of the default catalog, when the descriptor declares one
    pub catalog: Option<PositionMap>,
    /// Spans of each named catalog
    pub catalogs: IndexMap<String, PositionMap>,
}

impl WorkspacePositionData {
    /// Select spans with the same rules as [`WorkspaceData::select`]
    pub fn select(&self, catalog: &str) -> Option<&PositionMap> {
        select_catalog(self.catalog.as_ref(), Some(&self.catalogs), catalog)
    }

    /// True when no span was recorded at all
    pub fn is_empty(&self) -> bool {
        self.catalog.as_ref().is_none_or(|c| c.is_empty())
            && self.catalogs.values().all(|c| c.is_empty())
    }
}

fn select_catalog<'a, T>(
    default: Option<&'a T>,
    named: Option<&'a IndexMap<String, T>>,
    catalog: &str,
) -> Option<&'a T> {
    if catalog == DEFAULT_CATALOG {
        default.or_else(|| named.and_then(|n| n.get(DEFAULT_CATALOG)))
    } else {
        named.and_then(|n| n.get(catalog))
    }
}

/// Answer to a single catalog lookup
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionResult {
    /// The pinned version declared in the catalog
    pub version: String,
    /// Where the version literal sits in the descriptor, when it could be located
    pub definition: Option<Location>,
    /// Manager owning the workspace
    pub manager: PackageManager,
}
