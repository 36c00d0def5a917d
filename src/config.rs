//! Resolver configuration
//!
//! Holds the table of recognized file names and the refresh timing. The
//! defaults match what pnpm, yarn and bun write to disk.

use crate::types::PackageManager;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// File name that marks a workspace root for a given package manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceFile {
    /// File name searched in each ancestor directory
    pub name: String,
    /// Manager reported when this file is the one found
    pub manager: PackageManager,
}

impl WorkspaceFile {
    pub fn new(name: impl Into<String>, manager: PackageManager) -> Self {
        Self {
            name: name.into(),
            manager,
        }
    }
}

/// Configuration for the catalog resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    /// YAML workspace descriptors, searched together in one ascending walk
    pub workspace_files: Vec<WorkspaceFile>,
    /// Lock files that mark a bun workspace
    pub bun_lockfiles: Vec<String>,
    /// Manifest that carries bun catalogs, next to the lock file
    pub manifest_file: String,
    /// Delay before asking the client to refresh inlay hints, in milliseconds
    pub refresh_debounce_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            workspace_files: vec![
                WorkspaceFile::new(".yarnrc.yml", PackageManager::Yarn),
                WorkspaceFile::new("pnpm-workspace.yaml", PackageManager::Pnpm),
            ],
            bun_lockfiles: vec!["bun.lockb".to_string(), "bun.lock".to_string()],
            manifest_file: "package.json".to_string(),
            refresh_debounce_ms: 300,
        }
    }
}

impl ResolverConfig {
    /// Debounce delay as a duration
    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }

    /// Read configuration from client-supplied JSON, falling back to defaults
    pub fn from_json(value: Option<serde_json::Value>) -> Self {
        match value {
            None | Some(serde_json::Value::Null) => Self::default(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                log::warn!("Ignoring invalid resolver options: {}", err);
                Self::default()
            }),
        }
    }
}
