// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl:  mirror a Redfish service (or one subtree of it) to disk
// - locate: show where an identifier lives in a mirror, or which identifier
//           a mirror file belongs to
//
// Credentials can also come from the REDFISH_USERNAME / REDFISH_PASSWORD
// environment variables so they don't end up in shell history.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::crawl::ScopeMode;

#[derive(Parser, Debug)]
#[command(
    name = "redfish-mirror",
    version,
    about = "Crawl a Redfish service and mirror its resources to disk",
    long_about = "redfish-mirror walks the @odata.id links of a Redfish service starting from one \
                  resource and writes every document it finds to <output>/<path>/index.json. \
                  The result can be served back as mock data."
)]
pub struct Cli {
    /// Print a diagnostic line for every save and every failure
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a Redfish service
    ///
    /// Example: redfish-mirror crawl --host 10.0.0.5 --start /redfish/v1/Chassis -u root
    Crawl(CrawlArgs),

    /// Map an identifier to its mirror file (or a mirror file back to its identifier)
    ///
    /// Example: redfish-mirror locate /redfish/v1/Chassis/1
    Locate {
        /// Resource identifier, or a path to an index.json inside the mirror
        target: String,

        /// Mirror directory
        #[arg(short, long, default_value = "redfish_mock_data")]
        output_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Service address: host[:port] (HTTPS) or a full origin like http://127.0.0.1:8000
    #[arg(long)]
    pub host: String,

    /// Resource to start from
    #[arg(short, long, default_value = "/redfish/v1")]
    pub start: String,

    /// Directory the mirror is written to
    #[arg(short, long, default_value = "redfish_mock_data")]
    pub output_dir: PathBuf,

    /// Username for HTTP basic authentication
    #[arg(short, long, env = "REDFISH_USERNAME")]
    pub username: Option<String>,

    /// Password for HTTP basic authentication
    #[arg(short, long, env = "REDFISH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Accept invalid or self-signed TLS certificates
    #[arg(long)]
    pub insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Extra attempts for a request after a network error or 5xx
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Stop following links this many hops away from the start resource
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Give up on the whole crawl after this many seconds
    #[arg(long)]
    pub crawl_timeout: Option<u64>,

    /// How links are matched against the resource being expanded
    #[arg(long, value_enum, default_value_t = ScopeMode::Substring)]
    pub scope: ScopeMode,

    /// Print the crawl report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
