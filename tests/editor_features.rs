//! Inlay hints, hover and definition over a workspace on disk

use catalog_lsp::lsp::{get_definition, get_hover, get_inlay_hints};
use catalog_lsp::{CatalogResolver, DocumentManager, ResolverConfig};
use lsp_types::{HoverContents, InlayHintLabel, Position};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use url::Url;

const DESCRIPTOR: &str = "packages:\n  - packages/*\ncatalog:\n  react: 18.2.0\ncatalogs:\n  legacy:\n    lodash: 3.10.1\n";

const MANIFEST: &str = r#"{
  "name": "app",
  "dependencies": {
    "react": "catalog:",
    "lodash": "catalog:legacy",
    "left-pad": "catalog:missing",
    "zod": "^3.22.4"
  }
}
"#;

fn setup() -> (TempDir, Url, CatalogResolver) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pnpm-workspace.yaml"), DESCRIPTOR).unwrap();
    let app = dir.path().join("packages/app");
    fs::create_dir_all(&app).unwrap();
    fs::write(app.join("package.json"), MANIFEST).unwrap();

    let uri = Url::from_file_path(app.join("package.json")).unwrap();
    let documents = Arc::new(DocumentManager::new());
    let resolver = CatalogResolver::new(documents, ResolverConfig::default());
    (dir, uri, resolver)
}

fn descriptor_uri(dir: &Path) -> Url {
    Url::from_file_path(dir.join("pnpm-workspace.yaml")).unwrap()
}

#[tokio::test]
async fn test_inlay_hints_for_resolved_references() {
    let (_dir, uri, resolver) = setup();

    let hints = get_inlay_hints(&resolver, &uri, MANIFEST).await;
    let labels: Vec<_> = hints
        .iter()
        .map(|hint| match &hint.label {
            InlayHintLabel::String(label) => label.clone(),
            InlayHintLabel::LabelParts(_) => panic!("expected a plain label"),
        })
        .collect();

    assert_eq!(labels, vec!["18.2.0", "3.10.1"]);
    // After the closing quote of "catalog:"
    assert_eq!(hints[0].position, Position::new(3, 23));
}

#[tokio::test]
async fn test_hover_inside_reference() {
    let (_dir, uri, resolver) = setup();

    let hover = get_hover(&resolver, &uri, MANIFEST, Position::new(4, 20))
        .await
        .unwrap();
    let HoverContents::Markup(content) = hover.contents else {
        panic!("expected markdown hover");
    };
    assert_eq!(content.value, "- pnpm Catalog: `legacy`\n- Version: `3.10.1`");

    assert!(get_hover(&resolver, &uri, MANIFEST, Position::new(4, 2)).await.is_none());
    assert!(get_hover(&resolver, &uri, MANIFEST, Position::new(5, 20)).await.is_none());
}

#[tokio::test]
async fn test_definition_points_into_descriptor() {
    let (dir, uri, resolver) = setup();

    let location = get_definition(&resolver, &uri, MANIFEST, Position::new(3, 16))
        .await
        .unwrap();
    assert_eq!(location.uri, descriptor_uri(dir.path()));
    assert_eq!(location.range.start, Position::new(3, 9));
    assert_eq!(location.range.end, Position::new(3, 15));

    assert!(get_definition(&resolver, &uri, MANIFEST, Position::new(6, 15)).await.is_none());
}
