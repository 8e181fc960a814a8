// src/fetch/mod.rs
// =============================================================================
// This module retrieves Redfish documents.
//
// Submodules:
// - http: the real fetcher (reqwest, basic auth, TLS policy, retries)
//
// The crawl engine only sees the ResourceFetcher trait, so tests can drive
// it with an in-memory service instead of a real BMC.
// =============================================================================

mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::resource::ResourceIdentifier;

pub use http::{Credentials, HttpFetcher, HttpFetcherConfig};

/// Something that can turn an identifier into a JSON document.
///
/// Errors are per resource: `Error::Transport` / `Error::Status` for fetch
/// failures and `Error::Parse` for bodies that are not JSON.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, id: &ResourceIdentifier) -> Result<Value>;
}
