//! Synchronous hand-off of dispatch signals from the dispatcher to workers.
//!
//! A worker asking for work registers a one-shot waiter with the source and
//! parks on it. The dispatcher completes one registered waiter per offer, so
//! a signal only ever exists while a worker is waiting for it and nothing
//! queues up behind a busy pool.

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Permission to attempt one resolution. Only the dispatcher can create one.
#[derive(Debug)]
pub struct DispatchSignal(());

type Waiter = oneshot::Sender<DispatchSignal>;

/// Dispatcher side of the hand-off.
#[derive(Debug)]
pub struct SignalSource {
	waiters: mpsc::UnboundedReceiver<Waiter>,
}

/// Worker side of the hand-off. Clone one per worker.
#[derive(Debug, Clone)]
pub struct SignalReceiver {
	waiters: mpsc::UnboundedSender<Waiter>,
}

/// Create a connected source/receiver pair.
pub fn channel() -> (SignalSource, SignalReceiver) {
	// Unbounded in type only: each worker has at most one waiter registered
	let (tx, rx) = mpsc::unbounded_channel();
	(SignalSource { waiters: rx }, SignalReceiver { waiters: tx })
}

impl SignalReceiver {
	/// Wait for the next signal. `None` once the source is closed.
	pub async fn recv(&self) -> Option<DispatchSignal> {
		let (tx, rx) = oneshot::channel();
		self.waiters.send(tx).ok()?;
		rx.await.ok()
	}
}

impl SignalSource {
	/// Hand one signal to the next waiting worker.
	///
	/// Returns false when every receiver is gone. Cancel-safe: the only await
	/// is for a waiter to register, and completing it is synchronous.
	pub async fn offer(&mut self) -> bool {
		while let Some(waiter) = self.waiters.recv().await {
			// A waiter whose worker was dropped mid-wait is skipped
			if waiter.send(DispatchSignal(())).is_ok() {
				return true;
			}
		}
		false
	}

	/// Close the source. Registered and future waiters all see `None`.
	pub fn close(mut self) {
		self.waiters.close();
		// Dropping the receiver drops every queued waiter
	}
}

/// Offer signals until `deadline` or cancellation, then close the source.
///
/// `run` is cancelled together with the close, so a worker still waiting
/// in the rate limiter for a signal it already holds gives up instead of
/// starting a query after the window. Returns the number of signals handed
/// off.
pub async fn run_dispatcher(
	mut source: SignalSource,
	deadline: Instant,
	run: CancellationToken,
) -> u64 {
	let window = tokio::time::sleep_until(deadline);
	tokio::pin!(window);

	let mut dispatched = 0u64;
	loop {
		tokio::select! {
			biased;
			_ = &mut window => {
				info!(dispatched, "Test window elapsed, stopping dispatch");
				break;
			}
			_ = run.cancelled() => {
				warn!(dispatched, "Run cancelled, stopping dispatch");
				break;
			}
			offered = source.offer() => {
				if !offered {
					warn!(dispatched, "All workers exited before the test window closed");
					break;
				}
				dispatched += 1;
			}
		}
	}

	source.close();
	run.cancel();
	dispatched
}
