// src/crawl/scope.rs
// =============================================================================
// Decides whether a discovered link belongs to the resource being expanded.
//
// Without a scope rule the crawler would follow every cross-link
// ("Links.ManagedBy", "Links.ComputerSystems", ...) and end up walking the
// whole service from any starting point.
//
// Two modes:
// - Substring (default): the candidate is in scope if the current resource's
//   own id appears anywhere inside it. Note that this admits "/Chassis/10"
//   under "/Chassis/1".
// - PathSegment: the candidate must be the current id itself or sit below it
//   on a "/" boundary. Opt-in via --scope path-segment.
// =============================================================================

use clap::ValueEnum;

use crate::resource::ResourceIdentifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScopeMode {
    /// Current id is a substring of the candidate
    #[default]
    Substring,
    /// Candidate is the current id or lies below it on a path-segment boundary
    PathSegment,
}

impl ScopeMode {
    /// Is `candidate` a child worth following while expanding `current`?
    pub fn in_scope(self, candidate: &ResourceIdentifier, current: &ResourceIdentifier) -> bool {
        let candidate = candidate.as_str();
        let current = current.as_str();

        match self {
            ScopeMode::Substring => candidate.contains(current),
            ScopeMode::PathSegment => match candidate.strip_prefix(current) {
                Some(rest) => rest.is_empty() || rest.starts_with('/') || current.ends_with('/'),
                None => false,
            },
        }
    }
}
