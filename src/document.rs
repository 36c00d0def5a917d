//! Open document tracking
//!
//! Keeps the editor's in-memory text for open documents so that an unsaved
//! workspace descriptor wins over its copy on disk.

use dashmap::DashMap;
use lsp_types::{Position, TextDocumentContentChangeEvent};
use url::Url;

/// Source of in-memory text for documents open in the editor
pub trait DocumentSource: Send + Sync {
    /// Current text of the document, if it is open
    fn text(&self, uri: &Url) -> Option<String>;
}

/// Represents a document open in the editor
#[derive(Debug, Clone)]
pub struct Document {
    /// Document URI
    pub uri: Url,
    /// Document text content
    pub text: String,
    /// Document version
    pub version: i32,
}

impl Document {
    /// Create a new document
    pub fn new(uri: Url, text: String, version: i32) -> Self {
        Self { uri, text, version }
    }

    /// Apply a content change to the document.
    ///
    /// A range that does not fit the current text replaces the whole text.
    pub fn apply_change(&mut self, change: TextDocumentContentChangeEvent, new_version: i32) {
        self.version = new_version;

        let Some(range) = change.range else {
            self.text = change.text;
            return;
        };

        let start = self.position_to_offset(range.start);
        let end = self.position_to_offset(range.end);
        match (start, end) {
            (Some(start), Some(end)) if start <= end => {
                self.text.replace_range(start..end, &change.text);
            }
            _ => {
                log::warn!("Invalid edit range for {}, replacing whole text", self.uri);
                self.text = change.text;
            }
        }
    }

    /// Convert an editor position (UTF-16 column) to a byte offset.
    ///
    /// Returns `None` when the line does not exist; columns past the end of
    /// the line clamp to the line end.
    fn position_to_offset(&self, position: Position) -> Option<usize> {
        let mut line_start = 0;
        for _ in 0..position.line {
            line_start += self.text[line_start..].find('\n')? + 1;
        }

        let line = &self.text[line_start..];
        let line = &line[..line.find('\n').unwrap_or(line.len())];

        let mut units = 0;
        for (idx, ch) in line.char_indices() {
            if units >= position.character as usize {
                return Some(line_start + idx);
            }
            units += ch.len_utf16();
        }
        Some(line_start + line.len())
    }
}

/// Manages documents open in the editor
#[derive(Debug, Default)]
pub struct DocumentManager {
    documents: DashMap<Url, Document>,
}

impl DocumentManager {
    /// Create a new document manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document
    pub fn open(&self, uri: Url, text: String, version: i32) {
        self.documents
            .insert(uri.clone(), Document::new(uri, text, version));
    }

    /// Apply changes to an open document; unknown documents are ignored
    pub fn apply_changes(
        &self,
        uri: &Url,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) {
        if let Some(mut document) = self.documents.get_mut(uri) {
            for change in changes {
                document.apply_change(change, version);
            }
        }
    }

    /// Close a document
    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    /// Get a snapshot of a document
    pub fn get(&self, uri: &Url) -> Option<Document> {
        self.documents.get(uri).map(|doc| doc.clone())
    }

    /// Check if a document is open
    pub fn is_open(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    /// Number of open documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for DocumentManager {
    fn text(&self, uri: &Url) -> Option<String> {
        self.documents.get(uri).map(|doc| doc.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::Range;

    fn uri() -> Url {
        Url::parse("file:///repo/pnpm-workspace.yaml").unwrap()
    }

    fn edit(range: Range, text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: Some(range),
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_position_to_offset() {
        let document = Document::new(uri(), "line1\nline2\nline3".to_string(), 1);

        assert_eq!(document.position_to_offset(Position::new(0, 0)), Some(0));
        assert_eq!(document.position_to_offset(Position::new(0, 5)), Some(5));
        assert_eq!(document.position_to_offset(Position::new(1, 0)), Some(6));
        assert_eq!(document.position_to_offset(Position::new(1, 5)), Some(11));
        assert_eq!(document.position_to_offset(Position::new(2, 0)), Some(12));
        assert_eq!(document.position_to_offset(Position::new(1, 99)), Some(11));
        assert_eq!(document.position_to_offset(Position::new(9, 0)), None);
    }

    #[test]
    fn test_position_to_offset_counts_utf16_units() {
        let document = Document::new(uri(), "# 🚀 a c\nx".to_string(), 1);

        // '🚀' is two units and four bytes
        assert_eq!(document.position_to_offset(Position::new(0, 4)), Some(6));
        assert_eq!(document.position_to_offset(Position::new(0, 6)), Some(8));
        assert_eq!(document.position_to_offset(Position::new(1, 1)), Some(12));
    }

    #[test]
    fn test_edit_after_astral_character() {
        let mut document = Document::new(uri(), "# 🚀 a c\nx".to_string(), 1);

        let change = edit(Range::new(Position::new(0, 6), Position::new(0, 6)), "b");
        document.apply_change(change, 2);
        assert_eq!(document.text, "# 🚀 ab c\nx");
    }

    #[test]
    fn test_out_of_range_edit_replaces_text() {
        let mut document = Document::new(uri(), "abc".to_string(), 1);

        let change = edit(Range::new(Position::new(5, 0), Position::new(5, 0)), "X");
        document.apply_change(change, 2);
        assert_eq!(document.text, "X");
    }

    #[test]
    fn test_reversed_range_replaces_text() {
        let mut document = Document::new(uri(), "abc\ndef".to_string(), 1);

        let change = edit(Range::new(Position::new(1, 2), Position::new(0, 1)), "X");
        document.apply_change(change, 2);
        assert_eq!(document.text, "X");
        assert_eq!(document.version, 2);
    }

    #[test]
    fn test_document_changes() {
        let mut document = Document::new(uri(), "catalog:\n  react: 18.2.0\n".to_string(), 1);

        let incremental = TextDocumentContentChangeEvent {
            range: Some(Range::new(Position::new(1, 9), Position::new(1, 15))),
            range_length: Some(6),
            text: "18.3.1".to_string(),
        };
        document.apply_change(incremental, 2);
        assert_eq!(document.text, "catalog:\n  react: 18.3.1\n");
        assert_eq!(document.version, 2);

        let full = TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "catalog: {}\n".to_string(),
        };
        document.apply_change(full, 3);
        assert_eq!(document.text, "catalog: {}\n");
        assert_eq!(document.version, 3);
    }

    #[test]
    fn test_document_manager() {
        let manager = DocumentManager::new();
        let uri = uri();

        manager.open(uri.clone(), "catalog:\n".to_string(), 1);
        assert!(manager.is_open(&uri));
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.text(&uri).as_deref(), Some("catalog:\n"));

        manager.apply_changes(
            &uri,
            vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "catalogs:\n".to_string(),
            }],
            2,
        );
        assert_eq!(manager.get(&uri).unwrap().version, 2);
        assert_eq!(manager.text(&uri).as_deref(), Some("catalogs:\n"));

        manager.close(&uri);
        assert!(!manager.is_open(&uri));
        assert!(manager.is_empty());
        assert!(manager.text(&uri).is_none());
    }
}
