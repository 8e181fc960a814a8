// src/crawl/mod.rs
// =============================================================================
// This module walks a Redfish service and mirrors what it finds.
//
// Submodules:
// - links:   finds "@odata.id" links anywhere inside a JSON document
// - scope:   decides which links belong to the resource being expanded
// - visited: remembers what has already been fetched in this crawl
// - engine:  the depth-first traversal tying it all together
// - report:  per-resource outcomes of a crawl
// =============================================================================

mod engine;
mod links;
mod report;
mod scope;
mod visited;

pub use engine::{CrawlOptions, Crawler};
pub use report::{CrawlReport, ResourceState};
pub use scope::ScopeMode;
