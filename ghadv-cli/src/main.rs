mod cli;

use std::fs::File;
use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use futures::TryStreamExt;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ghadv::advisory::{Advisory, AdvisoryFilter};
use ghadv::config::{self, ConfigError};
use ghadv::{ClientConfig, GitHubClient, output};

use crate::cli::{Cli, Command, FetchArgs};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.verbosity.tracing_level_filter().into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let result = match args.command {
        Command::FetchAdvisories(fetch) => fetch_advisories(fetch).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            if e.downcast_ref::<ConfigError>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn fetch_advisories(args: FetchArgs) -> anyhow::Result<()> {
    // Resolve the environment before anything touches the network so bad
    // values fail fast.
    let client_config = ClientConfig::from_env()?;
    let delay = config::inter_page_delay_from_env()?;

    let client = GitHubClient::new(client_config)?;
    if !client.has_token() {
        warn!("no GitHub token configured; anonymous requests are rate-limited more aggressively");
    }

    let filter = AdvisoryFilter {
        ecosystem: args.ecosystem,
        severity: args.severity,
        advisory_type: args.advisory_type,
        per_page: args.per_page,
    };

    let advisories: Vec<Advisory> = client
        .stream_advisories(filter, Some(args.max_pages), delay)
        .try_collect()
        .await?;

    match &args.out {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            output::write_json(&advisories, &mut file)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} advisories to {}", advisories.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            output::write_json(&advisories, &mut stdout.lock())?;
        }
    }

    Ok(())
}
