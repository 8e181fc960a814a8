// src/crawl/report.rs
// =============================================================================
// What happened to every resource the crawl touched.
//
// Each fetched identifier ends in exactly one terminal state:
// - saved:          fetched, parsed and written to the mirror
// - fetch_failed:   network error or non-2xx status
// - parse_failed:   body was not JSON
// - persist_failed: fetched and parsed, but the write failed
//
// The report serializes to JSON (for --json) the same way the results of a
// link check do: the state is a "state" tag flattened into the entry.
// =============================================================================

use serde::Serialize;
use std::path::PathBuf;

use crate::error::{Error, TransportFailure};
use crate::resource::ResourceIdentifier;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResourceState {
    Saved {
        path: PathBuf,
    },
    FetchFailed {
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        transport: Option<TransportFailure>,
        reason: String,
    },
    ParseFailed {
        reason: String,
    },
    PersistFailed {
        reason: String,
    },
}

impl ResourceState {
    /// Maps a per-resource error to its terminal state.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Status { status, .. } | Error::Authentication { status, .. } => {
                ResourceState::FetchFailed {
                    status: Some(*status),
                    transport: None,
                    reason: err.to_string(),
                }
            }
            Error::Transport { kind, .. } => ResourceState::FetchFailed {
                status: None,
                transport: Some(*kind),
                reason: err.to_string(),
            },
            Error::Parse { .. } => ResourceState::ParseFailed {
                reason: err.to_string(),
            },
            // The request could not even be built
            Error::Config(_) => ResourceState::FetchFailed {
                status: None,
                transport: None,
                reason: err.to_string(),
            },
            Error::Persist { .. } | Error::Json(_) => ResourceState::PersistFailed {
                reason: err.to_string(),
            },
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, ResourceState::Saved { .. })
    }

    /// Short label for the summary table.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceState::Saved { .. } => "SAVED",
            ResourceState::FetchFailed { .. } => "FETCH FAILED",
            ResourceState::ParseFailed { .. } => "PARSE FAILED",
            ResourceState::PersistFailed { .. } => "WRITE FAILED",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceOutcome {
    pub id: ResourceIdentifier,
    /// Full URL that was requested
    pub url: String,
    /// Link hops from the start resource
    pub depth: usize,
    #[serde(flatten)]
    pub state: ResourceState,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub start: ResourceIdentifier,
    /// In fetch order
    pub resources: Vec<ResourceOutcome>,
    /// True if the crawl stopped on a deadline or shutdown signal
    pub interrupted: bool,
    /// Identifiers still waiting in the frontier when the crawl stopped
    pub pending: usize,
    pub elapsed_ms: u128,
}

impl CrawlReport {
    pub fn new(start: ResourceIdentifier) -> Self {
        Self {
            start,
            resources: Vec::new(),
            interrupted: false,
            pending: 0,
            elapsed_ms: 0,
        }
    }

    pub fn record(&mut self, outcome: ResourceOutcome) {
        self.resources.push(outcome);
    }

    pub fn saved_count(&self) -> usize {
        self.resources.iter().filter(|r| r.state.is_saved()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.resources.len() - self.saved_count()
    }

    /// Every reachable resource was fetched and saved.
    pub fn is_complete(&self) -> bool {
        !self.interrupted && self.failed_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ServiceRoot;

    fn outcome(path: &str, state: ResourceState) -> ResourceOutcome {
        let id = ServiceRoot::new("bmc").unwrap().resolve(path).unwrap();
        ResourceOutcome {
            url: format!("https://bmc{}", id),
            id,
            depth: 0,
            state,
        }
    }

    #[test]
    fn test_state_from_errors() {
        let status = Error::Status {
            url: "u".to_string(),
            status: 404,
        };
        assert!(matches!(
            ResourceState::from_error(&status),
            ResourceState::FetchFailed {
                status: Some(404),
                ..
            }
        ));

        let parse = Error::Parse {
            url: "u".to_string(),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        assert!(matches!(
            ResourceState::from_error(&parse),
            ResourceState::ParseFailed { .. }
        ));

        let persist = Error::Persist {
            path: "p".to_string(),
            message: "denied".to_string(),
        };
        assert_eq!(ResourceState::from_error(&persist).label(), "WRITE FAILED");
    }

    #[test]
    fn test_non_persist_errors_are_not_write_failures() {
        let auth = Error::Authentication {
            url: "u".to_string(),
            status: 403,
        };
        assert!(matches!(
            ResourceState::from_error(&auth),
            ResourceState::FetchFailed {
                status: Some(403),
                ..
            }
        ));

        let config = Error::Config("bad request".to_string());
        assert_eq!(ResourceState::from_error(&config).label(), "FETCH FAILED");

        let json = Error::Json(serde_json::from_str::<serde_json::Value>("[").unwrap_err());
        assert_eq!(ResourceState::from_error(&json).label(), "WRITE FAILED");
    }

    #[test]
    fn test_counts_and_completeness() {
        let mut report = CrawlReport::new(ServiceRoot::new("bmc").unwrap().resolve("/redfish/v1").unwrap());
        report.record(outcome(
            "/redfish/v1",
            ResourceState::Saved {
                path: PathBuf::from("out/index.json"),
            },
        ));
        assert!(report.is_complete());

        report.record(outcome(
            "/redfish/v1/Chassis/9",
            ResourceState::FetchFailed {
                status: Some(404),
                transport: None,
                reason: "HTTP 404".to_string(),
            },
        ));
        assert_eq!(report.saved_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_json_shape() {
        let entry = outcome(
            "/redfish/v1/Chassis/9",
            ResourceState::FetchFailed {
                status: Some(404),
                transport: None,
                reason: "HTTP 404".to_string(),
            },
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], "/redfish/v1/Chassis/9");
        assert_eq!(value["state"], "fetch_failed");
        assert_eq!(value["status"], 404);
        assert!(value.get("transport").is_none());
    }
}
