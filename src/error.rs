use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Invalid startup parameters. Fatal: the run never starts.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
	#[error("concurrency must be at least 1")]
	ZeroConcurrency,

	#[error("rate must be a positive number of queries per second, got {0}")]
	InvalidRate(f64),

	#[error("burst must be at least 1")]
	ZeroBurst,

	#[error("duration must be at least 1 second")]
	ZeroDuration,

	#[error("query timeout must be at least 1 ms")]
	ZeroTimeout,

	#[error("invalid server address '{input}': {reason}")]
	InvalidServer { input: String, reason: String },

	#[error("invalid domain name '{domain}': {reason}")]
	InvalidDomain { domain: String, reason: String },
}

/// A single resolution attempt failed.
///
/// The load test only counts these; the variants exist for log messages.
#[derive(Debug, Error)]
pub enum ResolveError {
	#[error("failed to build query for '{domain}': {reason}")]
	Encode { domain: String, reason: String },

	#[error("socket error talking to {server}: {source}")]
	Io {
		server: SocketAddr,
		#[source]
		source: std::io::Error,
	},

	#[error("no response from {server} within {} ms", timeout.as_millis())]
	Timeout { server: SocketAddr, timeout: Duration },

	#[error("malformed response from {server}: {reason}")]
	Malformed { server: SocketAddr, reason: String },

	#[error("txid mismatch from {server}: expected {expected}, got {got}")]
	IdMismatch { server: SocketAddr, expected: u16, got: u16 },

	#[error("received a query instead of a response from {server}")]
	NotResponse { server: SocketAddr },
}

/// The surrounding run was cancelled before a rate limiter permit was granted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("rate limiter wait cancelled")]
pub struct Cancelled;
