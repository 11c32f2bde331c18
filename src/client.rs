use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;

use crate::dns::{build_query, parse_response};
use crate::error::ResolveError;

/// Issues one DNS query and reports whether the exchange succeeded.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait ResolverClient: Send + Sync {
	async fn resolve(&self, domain: &str, server: SocketAddr) -> Result<(), ResolveError>;
}

/// Sends A queries over plain UDP.
#[derive(Debug, Clone)]
pub struct UdpResolverClient {
	timeout: Duration,
}

impl UdpResolverClient {
	pub fn new(timeout: Duration) -> Self {
		UdpResolverClient { timeout }
	}
}

#[async_trait]
impl ResolverClient for UdpResolverClient {
	/// Creates a dedicated socket per query so concurrent workers never read
	/// each other's responses.
	async fn resolve(&self, domain: &str, server: SocketAddr) -> Result<(), ResolveError> {
		let txid: u16 = rand::random();
		let query_bytes = build_query(domain, txid).map_err(|e| ResolveError::Encode {
			domain: domain.to_string(),
			reason: e.to_string(),
		})?;

		let io_err = |source| ResolveError::Io { server, source };

		let bind_addr = if server.is_ipv4() {
			"0.0.0.0:0"
		} else {
			"[::]:0"
		};
		let socket = UdpSocket::bind(bind_addr).await.map_err(io_err)?;
		// Connected sockets drop datagrams from any other peer
		socket.connect(server).await.map_err(io_err)?;
		socket.send(&query_bytes).await.map_err(io_err)?;

		// 4096 bytes covers EDNS-extended responses
		let mut buf = vec![0u8; 4096];
		let len = match tokio::time::timeout(self.timeout, socket.recv(&mut buf)).await {
			Ok(received) => received.map_err(io_err)?,
			Err(_) => return Err(ResolveError::Timeout { server, timeout: self.timeout }),
		};

		parse_response(&buf[..len], txid, server)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hickory_proto::op::{Message, MessageType};

	/// Bind a loopback responder that answers `count` queries.
	///
	/// When `corrupt_id` is set the answer carries a different transaction ID.
	async fn spawn_responder(count: usize, corrupt_id: bool) -> SocketAddr {
		let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
		let addr = socket.local_addr().unwrap();
		tokio::spawn(async move {
			let mut buf = vec![0u8; 512];
			for _ in 0..count {
				let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
				let mut response = Message::from_vec(&buf[..len]).unwrap();
				response.set_message_type(MessageType::Response);
				if corrupt_id {
					response.set_id(response.id().wrapping_add(1));
				}
				socket.send_to(&response.to_vec().unwrap(), peer).await.unwrap();
			}
		});
		addr
	}

	#[tokio::test]
	async fn test_resolve_against_responder() {
		let server = spawn_responder(3, false).await;
		let client = UdpResolverClient::new(Duration::from_secs(2));
		for _ in 0..3 {
			client.resolve("example.com.", server).await.unwrap();
		}
	}

	#[tokio::test]
	async fn test_silent_server_times_out() {
		// Bound but never read from, so the query is swallowed
		let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
		let server = silent.local_addr().unwrap();
		let client = UdpResolverClient::new(Duration::from_millis(100));

		let result = client.resolve("example.com.", server).await;
		assert!(matches!(result, Err(ResolveError::Timeout { .. })));
	}

	#[tokio::test]
	async fn test_mismatched_id_is_an_error() {
		let server = spawn_responder(1, true).await;
		let client = UdpResolverClient::new(Duration::from_secs(2));
		let result = client.resolve("example.com.", server).await;
		assert!(matches!(result, Err(ResolveError::IdMismatch { .. })));
	}

	#[tokio::test]
	async fn test_bad_domain_never_reaches_the_wire() {
		let client = UdpResolverClient::new(Duration::from_millis(100));
		let server: SocketAddr = "127.0.0.1:9".parse().unwrap();
		let long_label = format!("{}.com.", "x".repeat(64));
		let result = client.resolve(&long_label, server).await;
		assert!(matches!(result, Err(ResolveError::Encode { .. })));
	}
}
