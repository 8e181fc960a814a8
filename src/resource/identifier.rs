// src/resource/identifier.rs
// =============================================================================
// Resource identifiers and the service root they are resolved against.
//
// Every link inside a Redfish document is an "@odata.id" string such as
// "/redfish/v1/Chassis/1". Before we compare, store or fetch a link we
// normalize it:
// 1. Resolve it against https://<host>/redfish/v1/ (handles relative links
//    and "." / ".." segments)
// 2. Reject links that point at a different host
// 3. Drop the query string and the "#fragment" part
// 4. Collapse repeated "/" and strip a trailing "/"
//
// Two identifiers are equal iff their normalized strings are equal.
// =============================================================================

use serde::Serialize;
use std::fmt;
use url::Url;

use crate::error::{Error, Result};

/// Path prefix every resource of the service lives under.
pub const SERVICE_ROOT_PATH: &str = "/redfish/v1";

/// JSON key carrying a resource's identity (and links to other resources).
pub const ODATA_ID: &str = "@odata.id";

/// A normalized resource path, e.g. `/redfish/v1/Chassis/1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceIdentifier(String);

impl ResourceIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part of the path below `/redfish/v1`, without a leading slash.
    ///
    /// Returns `None` for identifiers outside the service root path.
    /// The service root itself yields `Some("")`.
    pub fn relative_to_root(&self) -> Option<&str> {
        let rest = self.0.strip_prefix(SERVICE_ROOT_PATH)?;
        if rest.is_empty() {
            Some("")
        } else {
            rest.strip_prefix('/')
        }
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed base every identifier is resolved against.
#[derive(Debug, Clone)]
pub struct ServiceRoot {
    base: Url,
}

impl ServiceRoot {
    /// Builds the service root for a host.
    ///
    /// `host` is either `host[:port]` (HTTPS is assumed) or an explicit
    /// origin such as `http://127.0.0.1:8000`.
    pub fn new(host: &str) -> Result<Self> {
        let host = host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(Error::Config("service host must not be empty".to_string()));
        }

        let origin = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        let mut base = Url::parse(&origin)
            .map_err(|e| Error::Config(format!("Invalid host '{}': {}", host, e)))?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(Error::Config(format!(
                "Unsupported scheme '{}' in host '{}'",
                base.scheme(),
                host
            )));
        }
        if base.host_str().is_none() {
            return Err(Error::Config(format!("Host '{}' has no hostname", host)));
        }

        // Trailing slash so that relative references land below /redfish/v1
        base.set_path(&format!("{}/", SERVICE_ROOT_PATH));
        base.set_query(None);
        base.set_fragment(None);

        Ok(Self { base })
    }

    /// `<origin>/redfish/v1/`
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Normalizes a reference found in a document (or given on the command line).
    ///
    /// Returns `None` if the reference cannot be parsed or points at another origin.
    pub fn resolve(&self, reference: &str) -> Option<ResourceIdentifier> {
        let joined = self.base.join(reference.trim()).ok()?;

        if joined.origin() != self.base.origin() {
            return None;
        }

        // Empty segments are dropped, so "Chassis//1/" and "Chassis/1" agree
        let mut path = String::with_capacity(joined.path().len());
        for segment in joined.path().split('/').filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(segment);
        }
        if path.is_empty() {
            path.push('/');
        }

        Some(ResourceIdentifier(path))
    }

    /// Full URL used to GET a resource.
    pub fn url_for(&self, id: &ResourceIdentifier) -> Url {
        let mut url = self.base.clone();
        url.set_path(id.as_str());
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> ServiceRoot {
        ServiceRoot::new("10.0.0.5").unwrap()
    }

    #[test]
    fn test_bare_host_defaults_to_https() {
        assert_eq!(root().base_url().as_str(), "https://10.0.0.5/redfish/v1/");
    }

    #[test]
    fn test_explicit_origin_is_kept() {
        let root = ServiceRoot::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(root.base_url().as_str(), "http://127.0.0.1:8000/redfish/v1/");
    }

    #[test]
    fn test_empty_host_is_config_error() {
        assert!(matches!(ServiceRoot::new("  "), Err(Error::Config(_))));
        assert!(matches!(ServiceRoot::new("ftp://bmc"), Err(Error::Config(_))));
    }

    #[test]
    fn test_resolve_absolute_path() {
        let id = root().resolve("/redfish/v1/Chassis/1").unwrap();
        assert_eq!(id.as_str(), "/redfish/v1/Chassis/1");
    }

    #[test]
    fn test_resolve_relative_reference() {
        let id = root().resolve("Systems/1").unwrap();
        assert_eq!(id.as_str(), "/redfish/v1/Systems/1");
    }

    #[test]
    fn test_resolve_normalizes_variants_to_same_identifier() {
        let root = root();
        let plain = root.resolve("/redfish/v1/Chassis/1").unwrap();
        assert_eq!(root.resolve("/redfish/v1/Chassis/1/").unwrap(), plain);
        assert_eq!(root.resolve("/redfish/v1/Chassis/./1").unwrap(), plain);
        assert_eq!(root.resolve("/redfish/v1/Chassis/1#/Power/0").unwrap(), plain);
        assert_eq!(root.resolve("https://10.0.0.5/redfish/v1/Chassis/1?$top=2").unwrap(), plain);
    }

    #[test]
    fn test_resolve_collapses_empty_segments() {
        let root = root();
        let plain = root.resolve("/redfish/v1/Chassis/1").unwrap();
        assert_eq!(root.resolve("/redfish/v1/Chassis//1").unwrap(), plain);
        assert_eq!(root.resolve("/redfish//v1///Chassis/1//").unwrap(), plain);
        assert_eq!(root.resolve("/").unwrap().as_str(), "/");
    }

    #[test]
    fn test_resolve_rejects_other_origin() {
        assert!(root().resolve("https://evil.example/redfish/v1/Chassis").is_none());
    }

    #[test]
    fn test_relative_to_root() {
        let root = root();
        let id = root.resolve("/redfish/v1/Chassis/1").unwrap();
        assert_eq!(id.relative_to_root(), Some("Chassis/1"));
        assert_eq!(root.resolve("/redfish/v1").unwrap().relative_to_root(), Some(""));
        assert_eq!(root.resolve("/redfish/v10/x").unwrap().relative_to_root(), None);
        assert_eq!(root.resolve("/other").unwrap().relative_to_root(), None);
    }

    #[test]
    fn test_url_for() {
        let root = ServiceRoot::new("bmc.local:8443").unwrap();
        let id = root.resolve("/redfish/v1/Managers/BMC").unwrap();
        assert_eq!(
            root.url_for(&id).as_str(),
            "https://bmc.local:8443/redfish/v1/Managers/BMC"
        );
    }
}
