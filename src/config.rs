// src/config.rs
// =============================================================================
// Turns command-line arguments into a validated crawl configuration.
//
// Everything that can be wrong with the input is caught here, before a
// single request is sent:
// - empty or malformed host
// - a username without a password (or the other way round)
// - a start resource outside the service's /redfish/v1 tree
// - a zero timeout
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CrawlArgs;
use crate::crawl::CrawlOptions;
use crate::error::{Error, Result};
use crate::fetch::{Credentials, HttpFetcherConfig};
use crate::resource::{ResourceIdentifier, ServiceRoot};

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub root: ServiceRoot,
    pub start: ResourceIdentifier,
    pub output_dir: PathBuf,
    pub http: HttpFetcherConfig,
    pub options: CrawlOptions,
}

impl CrawlConfig {
    pub fn from_args(args: &CrawlArgs) -> Result<Self> {
        let root = ServiceRoot::new(&args.host)?;

        let start = root
            .resolve(&args.start)
            .filter(|id| id.relative_to_root().is_some())
            .ok_or_else(|| {
                Error::Config(format!(
                    "Start resource '{}' is not a resource of {}",
                    args.start,
                    root.base_url()
                ))
            })?;

        let credentials = match (&args.username, &args.password) {
            (Some(username), Some(password)) => Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(Error::Config("--username given without --password".to_string()))
            }
            (None, Some(_)) => {
                return Err(Error::Config("--password given without --username".to_string()))
            }
        };

        if args.timeout == 0 {
            return Err(Error::Config("--timeout must be at least 1 second".to_string()));
        }

        Ok(Self {
            root,
            start,
            output_dir: args.output_dir.clone(),
            http: HttpFetcherConfig {
                credentials,
                accept_invalid_certs: args.insecure,
                timeout: Duration::from_secs(args.timeout),
                retries: args.retries,
            },
            options: CrawlOptions {
                scope: args.scope,
                max_depth: args.max_depth,
                deadline: args.crawl_timeout.map(Duration::from_secs),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn args(extra: &[&str]) -> CrawlArgs {
        let mut argv = vec!["redfish-mirror", "crawl"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Crawl(args) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_minimal_config() {
        let config = CrawlConfig::from_args(&args(&["--host", "10.0.0.5"])).unwrap();
        assert_eq!(config.start.as_str(), "/redfish/v1");
        assert_eq!(config.root.base_url().as_str(), "https://10.0.0.5/redfish/v1/");
        assert!(config.http.credentials.is_none());
        assert!(!config.http.accept_invalid_certs);
        assert!(config.options.deadline.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = CrawlConfig::from_args(&args(&[
            "--host",
            "bmc",
            "--start",
            "/redfish/v1/Chassis/",
            "--username",
            "root",
            "--password",
            "calvin",
            "--insecure",
            "--crawl-timeout",
            "60",
        ]))
        .unwrap();
        assert_eq!(config.start.as_str(), "/redfish/v1/Chassis");
        assert_eq!(config.http.credentials.unwrap().username, "root");
        assert!(config.http.accept_invalid_certs);
        assert_eq!(config.options.deadline, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_partial_credentials_rejected() {
        let result = CrawlConfig::from_args(&args(&["--host", "bmc", "--username", "root"]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_start_outside_service_rejected() {
        let result = CrawlConfig::from_args(&args(&["--host", "bmc", "--start", "/index.html"]));
        assert!(matches!(result, Err(Error::Config(_))));

        let result = CrawlConfig::from_args(&args(&[
            "--host",
            "bmc",
            "--start",
            "https://other/redfish/v1",
        ]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = CrawlConfig::from_args(&args(&["--host", "bmc", "--timeout", "0"]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
