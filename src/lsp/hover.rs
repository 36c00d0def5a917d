//! Hover over a catalog reference

use crate::manifest::{find_catalog_references, range_contains};
use crate::resolver::CatalogResolver;
use crate::types::ResolutionResult;
use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position};
use url::Url;

/// Hover for the catalog reference under `position`, if any
pub async fn get_hover(
    resolver: &CatalogResolver,
    uri: &Url,
    text: &str,
    position: Position,
) -> Option<Hover> {
    let reference = find_catalog_references(text)
        .into_iter()
        .find(|reference| range_contains(&reference.range, position))?;

    let result = resolver
        .resolve_catalog(uri, &reference.package_name, &reference.catalog)
        .await?;

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: hover_markdown(&reference.catalog, &result),
        }),
        range: Some(reference.range),
    })
}

pub fn hover_markdown(catalog: &str, result: &ResolutionResult) -> String {
    format!(
        "- {} Catalog: `{}`\n- Version: `{}`",
        result.manager, catalog, result.version
    )
}
