use std::net::SocketAddr;
use std::time::Duration;

use hickory_proto::rr::Name;
use tokio::net::lookup_host;

use crate::error::ConfigError;

/// Load test configuration, fixed before any worker starts
#[derive(Debug, Clone)]
pub struct LoadTestConfig {
	pub server: SocketAddr,
	/// Fully-qualified query name, always ending in '.'
	pub domain: String,
	pub concurrency: usize,
	pub rate: f64,
	pub burst: u32,
	pub duration: Duration,
	pub timeout: Duration,
}

impl LoadTestConfig {
	/// Validate raw settings and build the immutable configuration.
	///
	/// Fails on the first invalid field, before anything is spawned.
	pub fn new(
		server: SocketAddr,
		domain: &str,
		concurrency: usize,
		rate: f64,
		burst: u32,
		duration_secs: u64,
		timeout_ms: u64,
	) -> Result<Self, ConfigError> {
		if concurrency == 0 {
			return Err(ConfigError::ZeroConcurrency);
		}
		if !rate.is_finite() || rate <= 0.0 {
			return Err(ConfigError::InvalidRate(rate));
		}
		if burst == 0 {
			return Err(ConfigError::ZeroBurst);
		}
		if duration_secs == 0 {
			return Err(ConfigError::ZeroDuration);
		}
		if timeout_ms == 0 {
			return Err(ConfigError::ZeroTimeout);
		}

		Ok(LoadTestConfig {
			server,
			domain: normalize_domain(domain)?,
			concurrency,
			rate,
			burst,
			duration: Duration::from_secs(duration_secs),
			timeout: Duration::from_millis(timeout_ms),
		})
	}
}

/// Turn a resolver address string into a socket address.
///
/// Supports formats:
///   "1.1.1.1"              -- IPv4, default port 53
///   "1.1.1.1:53"           -- IPv4 with explicit port
///   "2606:4700::1111"      -- bare IPv6, default port 53
///   "[2606:4700::1111]:53" -- bracketed IPv6 with port
///   "dns.example.net:53"   -- hostname, looked up once at startup
pub async fn resolve_server(input: &str) -> Result<SocketAddr, ConfigError> {
	let trimmed = input.trim();
	let invalid = |reason: String| ConfigError::InvalidServer {
		input: trimmed.to_string(),
		reason,
	};
	if trimmed.is_empty() {
		return Err(invalid("empty address".to_string()));
	}

	if trimmed.starts_with('[') {
		return trimmed.parse().map_err(|e| invalid(format!("{}", e)));
	}
	if trimmed.contains("::") || trimmed.matches(':').count() > 1 {
		let ip = trimmed.parse().map_err(|e| invalid(format!("{}", e)))?;
		return Ok(SocketAddr::new(ip, 53));
	}
	if let Ok(addr) = trimmed.parse::<SocketAddr>() {
		return Ok(addr);
	}
	if let Ok(ip) = trimmed.parse() {
		return Ok(SocketAddr::new(ip, 53));
	}

	// Hostname, with or without a port
	let with_port = if trimmed.contains(':') {
		trimmed.to_string()
	} else {
		format!("{}:53", trimmed)
	};
	let resolved = lookup_host(with_port.as_str())
		.await
		.map_err(|e| invalid(format!("{}", e)))?
		.next()
		.ok_or_else(|| invalid("hostname resolved to no addresses".to_string()));
	resolved
}

/// Check the query name and return it in fully-qualified form.
pub fn normalize_domain(domain: &str) -> Result<String, ConfigError> {
	let trimmed = domain.trim();
	let invalid = |reason: String| ConfigError::InvalidDomain {
		domain: trimmed.to_string(),
		reason,
	};
	if trimmed.is_empty() {
		return Err(invalid("empty name".to_string()));
	}

	let fqdn = if trimmed.ends_with('.') {
		trimmed.to_string()
	} else {
		format!("{}.", trimmed)
	};
	Name::from_ascii(&fqdn).map_err(|e| invalid(format!("{}", e)))?;
	Ok(fqdn)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn local() -> SocketAddr {
		"127.0.0.1:53".parse().unwrap()
	}

	fn build(concurrency: usize, rate: f64, duration_secs: u64) -> Result<LoadTestConfig, ConfigError> {
		LoadTestConfig::new(local(), "example.com.", concurrency, rate, 1, duration_secs, 2000)
	}

	#[test]
	fn test_valid_config() {
		let config = build(100, 50.0, 60).unwrap();
		assert_eq!(config.concurrency, 100);
		assert_eq!(config.duration, Duration::from_secs(60));
		assert_eq!(config.timeout, Duration::from_millis(2000));
		assert_eq!(config.server.port(), 53);
	}

	#[test]
	fn test_zero_concurrency_rejected() {
		assert_eq!(build(0, 50.0, 60).unwrap_err(), ConfigError::ZeroConcurrency);
	}

	#[test]
	fn test_bad_rate_rejected() {
		assert!(matches!(build(1, 0.0, 60), Err(ConfigError::InvalidRate(_))));
		assert!(matches!(build(1, -5.0, 60), Err(ConfigError::InvalidRate(_))));
		assert!(matches!(build(1, f64::NAN, 60), Err(ConfigError::InvalidRate(_))));
		assert!(matches!(build(1, f64::INFINITY, 60), Err(ConfigError::InvalidRate(_))));
	}

	#[test]
	fn test_zero_duration_rejected() {
		assert_eq!(build(1, 50.0, 0).unwrap_err(), ConfigError::ZeroDuration);
	}

	#[test]
	fn test_zero_burst_and_timeout_rejected() {
		let burst = LoadTestConfig::new(local(), "example.com", 1, 1.0, 0, 1, 2000);
		assert_eq!(burst.unwrap_err(), ConfigError::ZeroBurst);
		let timeout = LoadTestConfig::new(local(), "example.com", 1, 1.0, 1, 1, 0);
		assert_eq!(timeout.unwrap_err(), ConfigError::ZeroTimeout);
	}

	#[tokio::test]
	async fn test_ipv4_no_port() {
		let addr = resolve_server("1.1.1.1").await.unwrap();
		assert_eq!(addr.port(), 53);
		assert_eq!(addr.ip().to_string(), "1.1.1.1");
	}

	#[tokio::test]
	async fn test_ipv4_with_port() {
		let addr = resolve_server("192.168.88.1:5353").await.unwrap();
		assert_eq!(addr.port(), 5353);
		assert_eq!(addr.ip().to_string(), "192.168.88.1");
	}

	#[tokio::test]
	async fn test_ipv6_bare() {
		let addr = resolve_server("2606:4700::1111").await.unwrap();
		assert_eq!(addr.port(), 53);
		assert!(addr.is_ipv6());
	}

	#[tokio::test]
	async fn test_ipv6_bracketed() {
		let addr = resolve_server("[2606:4700::1111]:853").await.unwrap();
		assert_eq!(addr.port(), 853);
	}

	#[tokio::test]
	async fn test_localhost_hostname() {
		let addr = resolve_server("localhost:5300").await.unwrap();
		assert_eq!(addr.port(), 5300);
		assert!(addr.ip().is_loopback());
	}

	#[tokio::test]
	async fn test_hostname_without_port_uses_53() {
		let addr = resolve_server("localhost").await.unwrap();
		assert_eq!(addr.port(), 53);
		assert!(addr.ip().is_loopback());
	}

	#[tokio::test]
	async fn test_empty_server_rejected() {
		assert!(matches!(resolve_server("  ").await, Err(ConfigError::InvalidServer { .. })));
	}

	#[test]
	fn test_domain_gets_trailing_dot() {
		assert_eq!(normalize_domain("example.com").unwrap(), "example.com.");
		assert_eq!(normalize_domain("example.com.").unwrap(), "example.com.");
	}

	#[test]
	fn test_invalid_domain_rejected() {
		assert!(matches!(normalize_domain(""), Err(ConfigError::InvalidDomain { .. })));
		let long_label = format!("{}.com", "a".repeat(64));
		assert!(matches!(normalize_domain(&long_label), Err(ConfigError::InvalidDomain { .. })));
	}
}
