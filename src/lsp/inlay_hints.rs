//! Inlay hints showing the resolved version after each catalog reference

use crate::manifest::find_catalog_references;
use crate::resolver::CatalogResolver;
use lsp_types::{InlayHint, InlayHintKind, InlayHintLabel};
use serde_json::json;
use url::Url;

/// One hint per reference that resolves to a version
pub async fn get_inlay_hints(resolver: &CatalogResolver, uri: &Url, text: &str) -> Vec<InlayHint> {
    let mut hints = Vec::new();

    for reference in find_catalog_references(text) {
        let Some(result) = resolver
            .resolve_catalog(uri, &reference.package_name, &reference.catalog)
            .await
        else {
            continue;
        };

        hints.push(InlayHint {
            position: reference.range.end,
            label: InlayHintLabel::String(result.version),
            kind: Some(InlayHintKind::TYPE),
            text_edits: None,
            tooltip: None,
            padding_left: None,
            padding_right: None,
            data: Some(json!({ "catalog": reference.catalog, "manager": result.manager })),
        });
    }

    hints
}
