mod bench;
mod cli;
mod client;
mod config;
mod counters;
mod dispatch;
mod dns;
mod error;
mod limiter;
mod output;
mod stats;
mod worker;

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::client::UdpResolverClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	// Diagnostics on stderr, the report on stdout
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();

	// Invalid settings end the run here, before any worker exists
	let config = cli.to_config().await?;

	output::print_config_summary(&config);

	// Ctrl-C ends the test window early; the report still covers finished work
	let cancel = CancellationToken::new();
	tokio::spawn({
		let cancel = cancel.clone();
		async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				warn!("Interrupted, draining workers");
				cancel.cancel();
			}
		}
	});

	let client = Arc::new(UdpResolverClient::new(config.timeout));
	let report = bench::run_load_test(&config, client, cancel).await?;

	output::print_report(&report);

	if let Some(path) = &cli.output {
		output::write_csv(path, &config, &report)?;
	}

	Ok(())
}
