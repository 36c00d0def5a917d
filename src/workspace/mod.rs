//! Workspace discovery and catalog loading

mod loader;
mod locator;

pub use loader::load_catalogs;
pub use locator::WorkspaceLocator;
