use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::ResolverClient;
use crate::counters::OutcomeCounters;
use crate::dispatch::SignalReceiver;
use crate::limiter::RateLimiter;

/// What every worker queries
#[derive(Debug, Clone)]
pub struct QueryTarget {
	pub domain: String,
	pub server: SocketAddr,
}

/// One slot of the worker pool.
pub struct Worker {
	pub id: usize,
	pub signals: SignalReceiver,
	pub limiter: Arc<RateLimiter>,
	pub client: Arc<dyn ResolverClient>,
	pub counters: Arc<OutcomeCounters>,
	pub target: Arc<QueryTarget>,
	pub cancel: CancellationToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
	pub id: usize,
	pub attempts: u64,
}

impl Worker {
	/// Run until the signal source closes or the limiter is cancelled.
	///
	/// A query already running when the source closes runs to completion and
	/// is counted. A signal still waiting for a rate limiter token is dropped
	/// once `cancel` fires.
	pub async fn run(self) -> WorkerSummary {
		let mut attempts = 0u64;

		while self.signals.recv().await.is_some() {
			if let Err(e) = self.limiter.acquire(&self.cancel).await {
				// Normal at shutdown: the window closed while this signal waited for a token
				debug!(worker = self.id, "Stopping: {}", e);
				break;
			}

			attempts += 1;
			match self.client.resolve(&self.target.domain, self.target.server).await {
				Ok(()) => self.counters.record_success(),
				Err(e) => {
					self.counters.record_error();
					debug!(worker = self.id, "Query failed: {}", e);
				}
			}
		}

		debug!(worker = self.id, attempts, "Worker stopped");
		WorkerSummary { id: self.id, attempts }
	}
}
