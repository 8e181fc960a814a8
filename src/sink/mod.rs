// src/sink/mod.rs
// =============================================================================
// This module persists fetched documents.
//
// Submodules:
// - fs: writes each document to <output>/<path>/index.json
// =============================================================================

mod fs;

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::error::Result;
use crate::resource::ResourceIdentifier;

pub use fs::{FsSink, INDEX_FILE};

/// Somewhere to put a fetched document.
///
/// Returns the location the document was written to. A failure
/// (`Error::Persist`) is recorded by the crawl and does not stop it.
#[async_trait]
pub trait ResourceSink: Send + Sync {
    async fn save(&self, id: &ResourceIdentifier, document: &Value) -> Result<PathBuf>;
}
