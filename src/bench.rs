use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::client::ResolverClient;
use crate::config::LoadTestConfig;
use crate::counters::OutcomeCounters;
use crate::dispatch::{self, run_dispatcher};
use crate::limiter::RateLimiter;
use crate::stats::LoadTestReport;
use crate::worker::{QueryTarget, Worker};

/// Run the load test and report once every worker has stopped.
///
/// Spawns `config.concurrency` workers and one dispatcher sharing a single
/// rate limiter and one set of outcome counters. The dispatcher stops at
/// `start + config.duration` (or on `cancel`); workers finish a query that
/// is already running and exit, and no new query starts after that point.
pub async fn run_load_test(
	config: &LoadTestConfig,
	client: Arc<dyn ResolverClient>,
	cancel: CancellationToken,
) -> Result<LoadTestReport> {
	let start = Instant::now();
	let deadline = start + config.duration;

	let limiter = Arc::new(RateLimiter::new(config.rate, config.burst));
	let counters = Arc::new(OutcomeCounters::default());
	let target = Arc::new(QueryTarget {
		domain: config.domain.clone(),
		server: config.server,
	});
	let (source, signals) = dispatch::channel();
	// Cancelled by the dispatcher when it closes, or by the caller
	let run = cancel.child_token();

	let mut workers = JoinSet::new();
	for id in 0..config.concurrency {
		let worker = Worker {
			id,
			signals: signals.clone(),
			limiter: limiter.clone(),
			client: client.clone(),
			counters: counters.clone(),
			target: target.clone(),
			cancel: run.clone(),
		};
		workers.spawn(worker.run());
	}
	// Workers hold the only receivers, so the dispatcher notices if they all exit
	drop(signals);

	info!(
		workers = config.concurrency,
		rate = config.rate,
		duration_secs = config.duration.as_secs(),
		"Load test started"
	);
	let dispatcher = tokio::spawn(run_dispatcher(source, deadline, run.clone()));

	while let Some(joined) = workers.join_next().await {
		match joined {
			Ok(summary) => {
				debug!(worker = summary.id, attempts = summary.attempts, "Worker joined");
			}
			Err(e) => {
				// Stops the dispatcher; dropping the set aborts the other workers
				run.cancel();
				return Err(anyhow::Error::new(e).context("worker task failed"));
			}
		}
	}
	let elapsed = start.elapsed();

	let dispatched = dispatcher.await.context("dispatcher task failed")?;
	let totals = Arc::into_inner(counters)
		.ok_or_else(|| anyhow!("outcome counters still shared after all workers stopped"))?
		.into_totals();

	info!(
		elapsed_ms = elapsed.as_millis() as u64,
		success = totals.success,
		errors = totals.errors,
		"Load test finished"
	);

	Ok(LoadTestReport {
		elapsed,
		totals,
		dispatched,
	})
}
