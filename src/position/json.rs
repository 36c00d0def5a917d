//! Span indexing for catalogs embedded in a JSON manifest
//!
//! Manifests may contain comments and trailing commas, so they are parsed with
//! a tolerant JSONC parser that keeps byte ranges for every node.

use super::line_index::LineIndex;
use crate::types::{PositionMap, Span, WorkspacePositionData};
use jsonc_parser::ast::{Object, ObjectPropName, Value};
use jsonc_parser::{CollectOptions, ParseOptions, parse_to_ast};

/// Build the span index of `workspaces.catalog` / `workspaces.catalogs`
pub fn index_json(text: &str) -> WorkspacePositionData {
    let mut data = WorkspacePositionData::default();

    let root = match parse_to_ast(text, &CollectOptions::default(), &ParseOptions::default()) {
        Ok(result) => result.value,
        Err(err) => {
            log::warn!("Workspace manifest is not valid JSON: {}", err);
            return data;
        }
    };

    let Some(Value::Object(root)) = root else {
        return data;
    };
    let Some(Value::Object(workspaces)) = property(&root, "workspaces") else {
        return data;
    };
    let lines = LineIndex::new(text);

    if let Some(Value::Object(catalog)) = property(workspaces, "catalog") {
        data.catalog = Some(collect_spans(catalog, &lines));
    }

    if let Some(Value::Object(catalogs)) = property(workspaces, "catalogs") {
        for prop in &catalogs.properties {
            if let Value::Object(entries) = &prop.value {
                data.catalogs.insert(
                    prop_name(&prop.name).to_string(),
                    collect_spans(entries, &lines),
                );
            }
        }
    }

    data
}

/// Name of an object property, quoted or bare
pub(crate) fn prop_name<'a>(name: &'a ObjectPropName<'_>) -> &'a str {
    match name {
        ObjectPropName::String(lit) => lit.value.as_ref(),
        ObjectPropName::Word(word) => word.value,
    }
}

/// First property with the given name
fn property<'a, 'b>(object: &'a Object<'b>, name: &str) -> Option<&'a Value<'b>> {
    object
        .properties
        .iter()
        .find(|prop| prop_name(&prop.name) == name)
        .map(|prop| &prop.value)
}

fn collect_spans(object: &Object<'_>, lines: &LineIndex<'_>) -> PositionMap {
    let mut spans = PositionMap::new();
    for prop in &object.properties {
        let ObjectPropName::String(key) = &prop.name else {
            continue;
        };
        let Value::StringLit(value) = &prop.value else {
            continue;
        };
        // Inside the quotes
        let start = lines.position_of_byte(value.range.start + 1);
        let end = lines.position_of_byte(value.range.end.saturating_sub(1));
        spans.insert(key.value.to_string(), Span::new(start, end));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourcePosition;

    const MANIFEST: &str = r#"{
  "name": "root",
  "workspaces": {
    "packages": ["packages/*"],
    "catalog": {
      "react": "^18.2.0",
      "local": { "path": "./x" }
    },
    "catalogs": {
      "testing": {
        "vitest": "1.2.0"
      }
    }
  }
}
"#;

    fn slice<'a>(text: &'a str, span: &Span) -> &'a str {
        let line = LineIndex::new(text)
            .line_text(span.start.line)
            .unwrap();
        &line[span.start.column as usize..span.end.column as usize]
    }

    #[test]
    fn test_default_catalog_span() {
        let data = index_json(MANIFEST);
        let catalog = data.catalog.unwrap();

        let span = catalog["react"];
        assert_eq!(span.start, SourcePosition::new(6, 16));
        assert_eq!(span.end, SourcePosition::new(6, 23));
        assert_eq!(slice(MANIFEST, &span), "^18.2.0");
    }

    #[test]
    fn test_non_string_values_are_omitted() {
        let data = index_json(MANIFEST);
        assert!(!data.catalog.unwrap().contains_key("local"));
    }

    #[test]
    fn test_named_catalog_span() {
        let data = index_json(MANIFEST);
        let span = data.catalogs["testing"]["vitest"];
        assert_eq!(slice(MANIFEST, &span), "1.2.0");
    }

    #[test]
    fn test_comments_and_trailing_commas() {
        let text = "{\n  // bun workspace\n  \"workspaces\": {\n    \"catalog\": { \"zod\": \"3.22.4\", },\n  },\n}\n";
        let data = index_json(text);

        let span = data.catalog.unwrap()["zod"];
        assert_eq!(span.start.line, 4);
        assert_eq!(slice(text, &span), "3.22.4");
    }

    #[test]
    fn test_missing_workspaces() {
        assert!(index_json(r#"{ "name": "app" }"#).is_empty());
        assert!(index_json(r#"{ "workspaces": ["packages/*"] }"#).is_empty());
        assert!(index_json("[]").is_empty());
    }

    #[test]
    fn test_malformed_json_is_empty() {
        let data = index_json(r#"{ "workspaces": { "catalog": { "react": "#);
        assert!(data.is_empty());
        assert!(data.catalog.is_none());
    }
}
