//! sumcheck CLI

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sumcheck_cli::cmd;
use sumcheck_cli::{Cli, Commands};
use sumcheck_core::DownloadConfig;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let quiet = cli.quiet;

    match cli.command {
        Commands::Download {
            url,
            dest,
            sha256,
            user_agent,
            timeout,
            connect_timeout,
        } => {
            let config = DownloadConfig {
                user_agent,
                timeout: Duration::from_secs(timeout),
                connect_timeout: Duration::from_secs(connect_timeout),
            };
            cmd::download::download(&config, &url, &dest, &sha256, quiet).await
        }
        Commands::Check {
            archive,
            manifest,
            json,
        } => cmd::check::check(&archive, &manifest, json, quiet),
        Commands::Hash { files } => cmd::hash::hash(&files).map(|()| ExitCode::SUCCESS),
        Commands::Manifest { archive } => {
            cmd::manifest::manifest(&archive).map(|()| ExitCode::SUCCESS)
        }
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(ExitCode::SUCCESS)
        }
    }
}
