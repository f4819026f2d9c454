//! Content modules.
//!
//! - [`types`] - manifest and module types
//! - [`search`] - discovering modules on disk

pub mod search;
mod types;

pub use search::{ModuleSearch, ResolveError, SearchResult, SkippedModule};
pub use types::*;
