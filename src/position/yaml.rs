//! Span indexing for YAML workspace descriptors
//!
//! The descriptor is parsed into a small location-preserving tree built from
//! the parser's marked event stream. Event marks only carry the start of a
//! scalar, so the end is found by scanning the scalar's source line for the
//! literal value, which also steps over any opening quote.

use super::line_index::{LineIndex, utf16_len};
use crate::types::{PositionMap, SourcePosition, Span, WorkspacePositionData};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

/// Node of the location-preserving YAML tree
#[derive(Debug)]
enum YamlNode {
    Scalar { value: String, mark: Marker },
    Mapping(Vec<(YamlNode, YamlNode)>),
    Sequence(Vec<YamlNode>),
    Alias,
}

impl YamlNode {
    fn as_scalar(&self) -> Option<&str> {
        match self {
            YamlNode::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    fn as_mapping(&self) -> Option<&[(YamlNode, YamlNode)]> {
        match self {
            YamlNode::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// First value whose key is the given scalar
    fn get(&self, key: &str) -> Option<&YamlNode> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k.as_scalar() == Some(key))
            .map(|(_, v)| v)
    }
}

/// Collection under construction
enum Frame {
    Mapping {
        pairs: Vec<(YamlNode, YamlNode)>,
        key: Option<YamlNode>,
    },
    Sequence(Vec<YamlNode>),
}

impl Frame {
    fn finish(self) -> YamlNode {
        match self {
            Frame::Mapping { pairs, .. } => YamlNode::Mapping(pairs),
            Frame::Sequence(items) => YamlNode::Sequence(items),
        }
    }
}

/// Assembles events into [`YamlNode`] documents
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    documents: Vec<YamlNode>,
}

impl TreeBuilder {
    fn push(&mut self, node: YamlNode) {
        match self.stack.last_mut() {
            None => self.documents.push(node),
            Some(Frame::Sequence(items)) => items.push(node),
            Some(Frame::Mapping { pairs, key }) => match key.take() {
                None => *key = Some(node),
                Some(k) => pairs.push((k, node)),
            },
        }
    }

    /// Close every open collection so a failed parse still yields a tree
    fn into_root(mut self) -> Option<YamlNode> {
        while let Some(frame) = self.stack.pop() {
            self.push(frame.finish());
        }
        self.documents.into_iter().next()
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        match ev {
            Event::Scalar(value, ..) => self.push(YamlNode::Scalar { value, mark }),
            Event::Alias(..) => self.push(YamlNode::Alias),
            Event::MappingStart(..) => self.stack.push(Frame::Mapping {
                pairs: Vec::new(),
                key: None,
            }),
            Event::SequenceStart(..) => self.stack.push(Frame::Sequence(Vec::new())),
            Event::MappingEnd | Event::SequenceEnd => {
                if let Some(frame) = self.stack.pop() {
                    self.push(frame.finish());
                }
            }
            _ => {}
        }
    }
}

/// Build the span index of a YAML descriptor.
///
/// Parse failures are logged and whatever was read before the failure is
/// still indexed.
pub fn index_yaml(text: &str) -> WorkspacePositionData {
    let mut data = WorkspacePositionData::default();

    let mut builder = TreeBuilder::default();
    let mut parser = Parser::new_from_str(text);
    if let Err(err) = parser.load(&mut builder, false) {
        log::warn!("Workspace descriptor is not valid YAML: {}", err);
    }

    let Some(root) = builder.into_root() else {
        return data;
    };
    let lines = LineIndex::new(text);

    if let Some(catalog) = root.get("catalog").and_then(YamlNode::as_mapping) {
        data.catalog = Some(collect_spans(catalog, &lines));
    }

    if let Some(catalogs) = root.get("catalogs").and_then(YamlNode::as_mapping) {
        for (key, value) in catalogs {
            if let (Some(name), Some(pairs)) = (key.as_scalar(), value.as_mapping()) {
                data.catalogs
                    .insert(name.to_string(), collect_spans(pairs, &lines));
            }
        }
    }

    data
}

fn collect_spans(pairs: &[(YamlNode, YamlNode)], lines: &LineIndex<'_>) -> PositionMap {
    let mut spans = PositionMap::new();
    for (key, value) in pairs {
        let (Some(name), YamlNode::Scalar { value, mark }) = (key.as_scalar(), value) else {
            continue;
        };
        match scalar_span(value, mark, lines) {
            Some(span) => {
                spans.insert(name.to_string(), span);
            }
            None => log::debug!("No source span for catalog entry {}", name),
        }
    }
    spans
}

/// Locate a scalar's literal text on the line where the scalar starts.
///
/// Marker lines are 1-based and marker columns count characters.
fn scalar_span(value: &str, mark: &Marker, lines: &LineIndex<'_>) -> Option<Span> {
    let line_number = u32::try_from(mark.line()).ok()?;
    let line = lines.line_text(line_number)?;

    let from = line
        .char_indices()
        .nth(mark.col())
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    let found = from + line[from..].find(value)?;

    let column = utf16_len(&line[..found]) as u32;
    let end_column = column + utf16_len(value) as u32;
    Some(Span::new(
        SourcePosition::new(line_number, column),
        SourcePosition::new(line_number, end_column),
    ))
}
