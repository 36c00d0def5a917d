//! Editor features built on the catalog resolver
//!
//! The hover, definition and inlay-hint providers only need the resolver and
//! the manifest text. The tower-lsp server that wires them to a client is
//! behind the `lsp` feature.

pub mod hover;
pub mod inlay_hints;
pub mod navigation;

#[cfg(feature = "lsp")]
pub mod server;

pub use hover::get_hover;
pub use inlay_hints::get_inlay_hints;
pub use navigation::get_definition;

#[cfg(feature = "lsp")]
pub use server::{CatalogLanguageServer, start_server};
