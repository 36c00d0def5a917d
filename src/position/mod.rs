//! Source position indexing for workspace descriptors
//!
//! Maps every catalog entry to the span of its version literal. YAML
//! descriptors and JSON manifests are structurally different, so each has its
//! own indexer behind [`index_positions`].
//!
//! Entries whose value is not a plain scalar, or whose literal cannot be found
//! on its line, are left out. A missing span means the version is known but
//! cannot be jumped to.

mod json;
mod line_index;
mod yaml;

pub use json::index_json;
pub(crate) use json::prop_name;
pub use line_index::LineIndex;
pub use yaml::index_yaml;

use crate::types::{PackageManager, WorkspacePositionData};

/// Source format of a workspace descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorFormat {
    /// `pnpm-workspace.yaml` and yarn's YAML descriptor
    Yaml,
    /// A `package.json` carrying `workspaces.catalog(s)`
    Json,
}

impl DescriptorFormat {
    /// Format of the descriptor a package manager uses
    pub fn for_manager(manager: PackageManager) -> Self {
        match manager {
            PackageManager::Pnpm | PackageManager::Yarn => DescriptorFormat::Yaml,
            PackageManager::Bun => DescriptorFormat::Json,
        }
    }
}

/// Build the span index of a descriptor
pub fn index_positions(text: &str, format: DescriptorFormat) -> WorkspacePositionData {
    match format {
        DescriptorFormat::Yaml => index_yaml(text),
        DescriptorFormat::Json => index_json(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_for_manager() {
        assert_eq!(DescriptorFormat::for_manager(PackageManager::Pnpm), DescriptorFormat::Yaml);
        assert_eq!(DescriptorFormat::for_manager(PackageManager::Yarn), DescriptorFormat::Yaml);
        assert_eq!(DescriptorFormat::for_manager(PackageManager::Bun), DescriptorFormat::Json);
    }

    #[test]
    fn test_dispatch_by_format() {
        let yaml = "catalog:\n  react: 18.2.0\n";
        assert!(index_positions(yaml, DescriptorFormat::Yaml).catalog.is_some());
        assert!(index_positions(yaml, DescriptorFormat::Json).is_empty());
    }
}
