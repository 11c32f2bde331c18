use clap::Parser;

use crate::config::{resolve_server, LoadTestConfig};
use crate::error::ConfigError;

/// DNS resolver load test tool
#[derive(Parser, Debug)]
#[command(name = "dns-load-test")]
#[command(about = "Send DNS queries to a resolver at a controlled rate and count the outcomes")]
pub struct Cli {
	/// DNS server address (e.g. 192.168.88.1:53, 1.1.1.1 or [::1]:53)
	#[arg(short = 's', long = "server", default_value = "192.168.88.1:53")]
	pub server: String,

	/// Domain to query (trailing dot appended if missing)
	#[arg(short = 'd', long = "domain", default_value = "example.com.")]
	pub domain: String,

	/// Number of concurrent workers
	#[arg(short = 'c', long = "concurrency", alias = "concurrent", default_value = "100")]
	pub concurrency: usize,

	/// Target queries per second across all workers
	#[arg(short = 'r', long = "rate", default_value = "50")]
	pub rate: f64,

	/// Queries the rate limiter may release back-to-back
	#[arg(short = 'b', long = "burst", default_value = "1")]
	pub burst: u32,

	/// Test duration in seconds
	#[arg(short = 'D', long = "duration", default_value = "60")]
	pub duration: u64,

	/// Query timeout in milliseconds
	#[arg(short = 't', long = "timeout", default_value = "2000")]
	pub timeout: u64,

	/// Also write the report to this CSV file
	#[arg(short = 'o', long = "output")]
	pub output: Option<String>,
}

impl Cli {
	/// Validate the parsed flags into a run configuration.
	pub async fn to_config(&self) -> Result<LoadTestConfig, ConfigError> {
		let server = resolve_server(&self.server).await?;
		LoadTestConfig::new(
			server,
			&self.domain,
			self.concurrency,
			self.rate,
			self.burst,
			self.duration,
			self.timeout,
		)
	}
}
