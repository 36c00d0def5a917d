//! Go-to-definition from a catalog reference to the catalog entry

use crate::manifest::{find_catalog_references, range_contains};
use crate::resolver::CatalogResolver;
use lsp_types::{Location, Position};
use url::Url;

/// Location of the version literal for the reference under `position`
pub async fn get_definition(
    resolver: &CatalogResolver,
    uri: &Url,
    text: &str,
    position: Position,
) -> Option<Location> {
    let reference = find_catalog_references(text)
        .into_iter()
        .find(|reference| range_contains(&reference.range, position))?;

    resolver
        .resolve_catalog(uri, &reference.package_name, &reference.catalog)
        .await?
        .definition
}
