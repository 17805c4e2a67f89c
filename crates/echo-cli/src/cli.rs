//! Command line arguments.

use clap::{Parser, Subcommand};
use echo_client::ProxyMode;
use std::path::PathBuf;

/// Echo proxy client
#[derive(Parser, Debug)]
#[command(name = "echo")]
#[command(
    author,
    version,
    about = "Send requests through the Echo proxy and control its record/replay mode"
)]
pub struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "ECHO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Proxy base URL
    #[arg(long, env = "ECHO_PROXY_URL", global = true)]
    pub proxy_url: Option<String>,

    /// Query API base URL
    #[arg(long, env = "ECHO_QUERY_URL", global = true)]
    pub query_url: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a request through the proxy
    Send {
        /// Target URL, e.g. https://jsonplaceholder.typicode.com/posts/1
        url: String,

        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Request header, repeatable
        #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Request body
        #[arg(short = 'd', long)]
        data: Option<String>,

        /// Print response headers
        #[arg(short, long)]
        include: bool,
    },

    /// Show the proxy mode, or switch it (record | replay)
    Mode { mode: Option<ProxyMode> },

    /// Show mode, target URL and session together
    Status,

    /// Show or set the upstream URL used while recording
    Target { url: Option<String> },

    /// Show or select the active session
    Session { id: Option<String> },

    /// List recorded sessions
    Sessions,

    /// List recorded traffic for a session (defaults to the configured session)
    Traffic { session: Option<String> },

    /// Delete one traffic record
    DeleteRecord { id: i64 },

    /// Delete every traffic record of a session (defaults to the configured session)
    Clear { session: Option<String> },
}

/// Parse `Name: value`.
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in {raw:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
