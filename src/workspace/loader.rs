//! Catalog value loading
//!
//! Reads the plain `name -> version` maps out of a descriptor, without any
//! position tracking. Malformed descriptors load as "no catalogs".

use crate::error::CatalogResult;
use crate::types::{CatalogMap, PackageManager, WorkspaceData};
use indexmap::IndexMap;
use jsonc_parser::ParseOptions;

/// Load the catalogs declared in a descriptor
pub fn load_catalogs(text: &str, manager: PackageManager) -> WorkspaceData {
    let loaded = match manager {
        PackageManager::Pnpm | PackageManager::Yarn => load_yaml(text),
        PackageManager::Bun => load_json(text),
    };

    loaded.unwrap_or_else(|err| {
        log::warn!("Ignoring catalogs of unparsable {} descriptor: {}", manager, err);
        WorkspaceData::default()
    })
}

/// Top-level `catalog` / `catalogs` keys of a YAML descriptor
fn load_yaml(text: &str) -> CatalogResult<WorkspaceData> {
    let mut root: serde_yaml::Value = serde_yaml::from_str(text)?;
    root.apply_merge()?;

    let catalog = root.get("catalog").and_then(yaml_catalog);
    let catalogs = root
        .get("catalogs")
        .and_then(serde_yaml::Value::as_mapping)
        .map(|named| {
            named
                .iter()
                .filter_map(|(name, entries)| Some((yaml_scalar(name)?, yaml_catalog(entries)?)))
                .collect::<IndexMap<_, _>>()
        });

    Ok(WorkspaceData { catalog, catalogs })
}

fn yaml_catalog(value: &serde_yaml::Value) -> Option<CatalogMap> {
    let entries = value.as_mapping()?;
    Some(
        entries
            .iter()
            .filter_map(|(name, version)| Some((yaml_scalar(name)?, yaml_scalar(version)?)))
            .collect(),
    )
}

/// Scalars are kept in their textual form; null and collections are dropped
fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `workspaces.catalog` / `workspaces.catalogs` of a JSON manifest
fn load_json(text: &str) -> CatalogResult<WorkspaceData> {
    let root = jsonc_parser::parse_to_serde_value(text, &ParseOptions::default())?;

    let Some(workspaces) = root.as_ref().and_then(|root| root.get("workspaces")) else {
        return Ok(WorkspaceData::default());
    };

    let catalog = workspaces.get("catalog").and_then(json_catalog);
    let catalogs = workspaces
        .get("catalogs")
        .and_then(serde_json::Value::as_object)
        .map(|named| {
            named
                .iter()
                .filter_map(|(name, entries)| Some((name.clone(), json_catalog(entries)?)))
                .collect::<IndexMap<_, _>>()
        });

    Ok(WorkspaceData { catalog, catalogs })
}

/// Only string versions are kept, matching what the span index records
fn json_catalog(value: &serde_json::Value) -> Option<CatalogMap> {
    let entries = value.as_object()?;
    Some(
        entries
            .iter()
            .filter_map(|(name, version)| Some((name.clone(), version.as_str()?.to_string())))
            .collect(),
    )
}
