// src/crawl/visited.rs
// =============================================================================
// Tracks which resources have already been fetched in one crawl.
//
// A new registry is created at the start of every crawl and dropped when it
// ends, so two crawls never share state. Entries are never removed.
// =============================================================================

use std::collections::HashSet;

use crate::resource::ResourceIdentifier;

#[derive(Debug, Default)]
pub struct VisitedRegistry {
    seen: HashSet<ResourceIdentifier>,
}

#[allow(clippy::len_without_is_empty)]
impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ResourceIdentifier) -> bool {
        self.seen.contains(id)
    }

    /// Marks `id` as visited. Returns false if it already was.
    ///
    /// Check and mark happen in one call so the caller cannot fetch twice.
    pub fn mark_visited(&mut self, id: &ResourceIdentifier) -> bool {
        self.seen.insert(id.clone())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}
