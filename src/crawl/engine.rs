// src/crawl/engine.rs
// =============================================================================
// The traversal engine: walks the Redfish resource graph depth-first.
//
// How it works:
// 1. Start with the start resource on a stack (the frontier)
// 2. Pop an identifier and mark it visited; skip it if it already was
// 3. Fetch it
// 4. Save the document
// 5. Capture the document's own "@odata.id", extract every link, keep the
//    ones in scope and not yet visited, push them on the stack
// 6. Repeat until the stack is empty
//
// Why this terminates:
// - An identifier is marked visited before it is fetched, and never unmarked
// - Visited identifiers are never pushed and are skipped when popped
// - So each distinct identifier is fetched at most once
//
// Failures (404, timeouts, bad JSON, write errors) are recorded in the report
// and the crawl moves on; only a 401/403 on the very first resource stops it.
// =============================================================================

use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use super::links::{extract_links, own_identifier};
use super::report::{CrawlReport, ResourceOutcome, ResourceState};
use super::scope::ScopeMode;
use super::visited::VisitedRegistry;
use crate::error::{Error, Result};
use crate::fetch::ResourceFetcher;
use crate::resource::{ResourceIdentifier, ServiceRoot};
use crate::sink::ResourceSink;

/// Knobs that shape a crawl.
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    pub scope: ScopeMode,
    /// Maximum link hops from the start resource (None = unlimited)
    pub max_depth: Option<usize>,
    /// Stop the whole crawl after this long
    pub deadline: Option<Duration>,
}

// An identifier waiting in the frontier
#[derive(Debug)]
struct FrontierEntry {
    id: ResourceIdentifier,
    depth: usize,
}

pub struct Crawler<F, S> {
    root: ServiceRoot,
    fetcher: F,
    sink: S,
    options: CrawlOptions,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<F: ResourceFetcher, S: ResourceSink> Crawler<F, S> {
    pub fn new(root: ServiceRoot, fetcher: F, sink: S, options: CrawlOptions) -> Self {
        Self {
            root,
            fetcher,
            sink,
            options,
            shutdown: None,
        }
    }

    /// Stops the crawl (between fetches) once `true` is sent on the channel.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Crawls everything reachable (and in scope) from `start`.
    ///
    /// Per-resource failures end up in the report. The only error returned
    /// is `Error::Authentication` when the start resource answers 401/403.
    pub async fn crawl(&self, start: &ResourceIdentifier) -> Result<CrawlReport> {
        let started = Instant::now();
        let deadline = self.options.deadline.map(|d| started + d);

        // Fresh registry per crawl; nothing carries over between runs
        let mut visited = VisitedRegistry::new();
        let mut frontier = vec![FrontierEntry {
            id: start.clone(),
            depth: 0,
        }];
        let mut report = CrawlReport::new(start.clone());

        info!("Crawling {} (scope: {:?})", self.root.url_for(start), self.options.scope);

        while let Some(entry) = frontier.pop() {
            if self.shutdown_requested() || deadline.is_some_and(|d| Instant::now() >= d) {
                frontier.push(entry);
                report.interrupted = true;
                break;
            }

            // Already fetched (pushed by two parents before either was expanded)
            if !visited.mark_visited(&entry.id) {
                continue;
            }
            let url = self.root.url_for(&entry.id).to_string();

            let fetched = match deadline {
                Some(d) => match tokio::time::timeout_at(d, self.fetcher.fetch(&entry.id)).await {
                    Ok(result) => result,
                    Err(_) => {
                        debug!("Crawl deadline reached while fetching {}", url);
                        // Marked visited but never finished; still pending
                        report.pending += 1;
                        report.interrupted = true;
                        break;
                    }
                },
                None => self.fetcher.fetch(&entry.id).await,
            };

            let document = match fetched {
                Ok(document) => document,
                Err(Error::Status { status, url })
                    if entry.id == *start && matches!(status, 401 | 403) =>
                {
                    return Err(Error::Authentication { url, status });
                }
                Err(err) => {
                    debug!("{}", err);
                    report.record(ResourceOutcome {
                        id: entry.id,
                        url,
                        depth: entry.depth,
                        state: ResourceState::from_error(&err),
                    });
                    continue;
                }
            };

            let state = match self.sink.save(&entry.id, &document).await {
                Ok(path) => {
                    debug!("Saved {} to {}", url, path.display());
                    ResourceState::Saved { path }
                }
                Err(err) => {
                    debug!("{}", err);
                    ResourceState::from_error(&err)
                }
            };
            report.record(ResourceOutcome {
                id: entry.id.clone(),
                url: url.clone(),
                depth: entry.depth,
                state,
            });

            if self.options.max_depth.is_some_and(|max| entry.depth >= max) {
                continue;
            }

            // Scope is judged against this document's own id, captured now
            let Some(current) = own_identifier(&document).and_then(|raw| self.root.resolve(raw))
            else {
                debug!("{} has no @odata.id; not expanding its links", url);
                continue;
            };

            let children: Vec<ResourceIdentifier> = extract_links(&document)
                .filter_map(|link| {
                    let candidate = self.root.resolve(link.target)?;
                    trace!("{} {} -> {}", url, link.pointer, candidate);
                    Some(candidate)
                })
                .filter(|candidate| self.options.scope.in_scope(candidate, &current))
                .filter(|candidate| !visited.contains(candidate))
                .collect();

            // Reversed so the first link in the document is expanded first
            frontier.extend(children.into_iter().rev().map(|id| FrontierEntry {
                id,
                depth: entry.depth + 1,
            }));
        }

        // The frontier can hold one identifier several times, or ones already fetched
        let waiting: HashSet<&ResourceIdentifier> = frontier
            .iter()
            .map(|entry| &entry.id)
            .filter(|id| !visited.contains(id))
            .collect();
        report.pending += waiting.len();
        report.elapsed_ms = started.elapsed().as_millis();

        info!(
            "Crawl finished: {} saved, {} failed, {} visited{}",
            report.saved_count(),
            report.failed_count(),
            visited.len(),
            if report.interrupted { " (interrupted)" } else { "" }
        );

        Ok(report)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is Crawler generic over F and S?
//    - F is anything implementing ResourceFetcher, S anything implementing
//      ResourceSink
//    - main.rs plugs in HttpFetcher + FsSink; the tests below plug in an
//      in-memory service and sink
//
// 2. What is `let ... else`?
//    - `let Some(x) = expr else { ... };` binds x or runs the else block
//    - The else block must leave the current scope (here: `continue`)
//
// 3. What does tokio::time::timeout_at do?
//    - Races a future against a deadline
//    - Err(_) means the deadline came first and the future was dropped
// -----------------------------------------------------------------------------
