//! Echo CLI - command line client for the Echo record/replay proxy
//!
//! # Usage
//!
//! ```bash
//! # Send a request through the proxy (localhost:8080 by default)
//! echo send https://jsonplaceholder.typicode.com/posts/1
//!
//! # POST with a body; Content-Type defaults to application/json
//! echo send https://jsonplaceholder.typicode.com/posts -X POST -d '{"title":"foo"}'
//!
//! # Switch to replay and inspect what was recorded
//! echo mode replay
//! echo traffic default-session
//! ```

mod cli;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;
use cli::Args;
use echo_client::{ClientConfig, EchoClient};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let echo = EchoClient::new(config)?;
    commands::run(args.command, &echo).await
}

/// Config file first, then flags and environment on top.
fn load_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(url) = &args.proxy_url {
        config.proxy_url = url.clone();
    }
    if let Some(url) = &args.query_url {
        config.query_api_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}
