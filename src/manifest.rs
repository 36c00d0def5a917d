//! Catalog references in package manifests
//!
//! Finds every `"name": "catalog:<catalog>"` pair in a manifest, wherever it
//! appears (`dependencies`, `devDependencies`, overrides, ...).

use crate::position::{LineIndex, prop_name};
use crate::types::DEFAULT_CATALOG;
use jsonc_parser::ast::{ObjectProp, ObjectPropName, Value};
use jsonc_parser::{CollectOptions, ParseOptions, parse_to_ast};
use lsp_types::{Position, Range};
use url::Url;

/// Prefix that marks a catalog reference
pub const CATALOG_PREFIX: &str = "catalog:";

/// A `catalog:` reference found in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogReference {
    /// Dependency name (the property key)
    pub package_name: String,
    /// Referenced catalog, `default` for a bare `catalog:`
    pub catalog: String,
    /// Editor range of the whole string token, quotes included
    pub range: Range,
}

/// Whether a URI names a manifest file such as `package.json`
pub fn is_manifest_uri(uri: &Url, manifest_file: &str) -> bool {
    uri.path().ends_with(manifest_file)
}

/// Catalog name from a reference value, if it is one
pub fn parse_catalog_value(value: &str) -> Option<&str> {
    let name = value.strip_prefix(CATALOG_PREFIX)?.trim();
    Some(if name.is_empty() { DEFAULT_CATALOG } else { name })
}

/// Find all catalog references in a manifest. Unparsable text has none.
pub fn find_catalog_references(text: &str) -> Vec<CatalogReference> {
    let root = match parse_to_ast(text, &CollectOptions::default(), &ParseOptions::default()) {
        Ok(result) => result.value,
        Err(err) => {
            log::debug!("Skipping unparsable manifest: {}", err);
            return Vec::new();
        }
    };

    let mut references = Vec::new();
    if let Some(root) = root {
        let lines = LineIndex::new(text);
        collect(&root, &lines, &mut references);
    }
    references
}

fn collect(value: &Value<'_>, lines: &LineIndex<'_>, out: &mut Vec<CatalogReference>) {
    match value {
        Value::Object(object) => {
            for prop in &object.properties {
                if let Some(reference) = reference(prop, lines) {
                    out.push(reference);
                }
                collect(&prop.value, lines, out);
            }
        }
        Value::Array(array) => {
            for element in &array.elements {
                collect(element, lines, out);
            }
        }
        _ => {}
    }
}

/// A quoted-key property whose string value is a `catalog:` reference
fn reference(prop: &ObjectProp<'_>, lines: &LineIndex<'_>) -> Option<CatalogReference> {
    let (ObjectPropName::String(_), Value::StringLit(lit)) = (&prop.name, &prop.value) else {
        return None;
    };
    let catalog = parse_catalog_value(&lit.value)?;
    Some(CatalogReference {
        package_name: prop_name(&prop.name).to_string(),
        catalog: catalog.to_string(),
        range: editor_range(lines, lit.range.start, lit.range.end),
    })
}

fn editor_range(lines: &LineIndex<'_>, start: usize, end: usize) -> Range {
    let start = lines.position_of_byte(start);
    let end = lines.position_of_byte(end);
    Range::new(
        Position::new(start.line - 1, start.column),
        Position::new(end.line - 1, end.column),
    )
}

/// Whether `position` lies within `range`, both ends inclusive
pub fn range_contains(range: &Range, position: Position) -> bool {
    if position.line < range.start.line || position.line > range.end.line {
        return false;
    }
    if position.line == range.start.line && position.character < range.start.character {
        return false;
    }
    if position.line == range.end.line && position.character > range.end.character {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("catalog:", Some("default"))]
    #[case("catalog:   ", Some("default"))]
    #[case("catalog:legacy", Some("legacy"))]
    #[case("catalog: next ", Some("next"))]
    #[case("^18.2.0", None)]
    #[case("workspace:*", None)]
    #[case(" catalog:", None)]
    fn test_parse_catalog_value(#[case] value: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_catalog_value(value), expected);
    }

    #[test]
    fn test_find_references() {
        let text = r#"{
  "name": "app",
  "dependencies": {
    "react": "catalog:",
    "lodash": "catalog:legacy",
    "zod": "^3.22.4"
  },
  "devDependencies": { "vitest": "catalog:testing" }
}"#;
        let refs = find_catalog_references(text);

        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].package_name, "react");
        assert_eq!(refs[0].catalog, "default");
        assert_eq!(
            refs[0].range,
            Range::new(Position::new(3, 13), Position::new(3, 23))
        );
        assert_eq!(refs[1].package_name, "lodash");
        assert_eq!(refs[1].catalog, "legacy");
        assert_eq!(refs[2].package_name, "vitest");
        assert_eq!(refs[2].catalog, "testing");
    }

    #[test]
    fn test_references_inside_arrays_and_comments() {
        let text = "{\n  // overrides\n  \"x\": [{ \"react\": \"catalog:\" }],\n}";
        let refs = find_catalog_references(text);

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].range.start.line, 2);
    }

    #[test]
    fn test_reference_range_counts_utf16_units() {
        let refs = find_catalog_references(r#"{ "deps": { "🚀": "catalog:" } }"#);

        assert_eq!(refs.len(), 1);
        assert_eq!(
            refs[0].range,
            Range::new(Position::new(0, 18), Position::new(0, 28))
        );
    }

    #[test]
    fn test_malformed_manifest_has_no_references() {
        assert!(find_catalog_references(r#"{ "react": "catalog:"#).is_empty());
        assert!(find_catalog_references("").is_empty());
    }

    #[test]
    fn test_is_manifest_uri() {
        let uri = Url::parse("file:///repo/apps/web/package.json").unwrap();
        assert!(is_manifest_uri(&uri, "package.json"));

        let uri = Url::parse("file:///repo/pnpm-workspace.yaml").unwrap();
        assert!(!is_manifest_uri(&uri, "package.json"));
    }

    #[test]
    fn test_range_contains() {
        let range = Range::new(Position::new(3, 13), Position::new(3, 23));

        assert!(range_contains(&range, Position::new(3, 13)));
        assert!(range_contains(&range, Position::new(3, 23)));
        assert!(!range_contains(&range, Position::new(3, 12)));
        assert!(!range_contains(&range, Position::new(3, 24)));
        assert!(!range_contains(&range, Position::new(2, 15)));
    }
}
