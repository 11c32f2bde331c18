use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::Cancelled;

/// Token bucket shared by every worker.
///
/// Tokens accumulate continuously at `rate` per second up to `burst`. Each
/// `acquire` takes one token; when the bucket is empty the caller reserves
/// the next token (the balance goes negative) and sleeps until it is due.
/// Reservations are handed out in lock order with non-decreasing wake times,
/// so callers are released first come, first served.
#[derive(Debug)]
pub struct RateLimiter {
	rate: f64,
	burst: f64,
	bucket: Mutex<Bucket>,
}

#[derive(Debug)]
struct Bucket {
	tokens: f64,
	last: Instant,
}

impl RateLimiter {
	/// Create a limiter with a full bucket.
	pub fn new(rate: f64, burst: u32) -> Self {
		let burst = f64::from(burst.max(1));
		RateLimiter {
			rate,
			burst,
			bucket: Mutex::new(Bucket {
				tokens: burst,
				last: Instant::now(),
			}),
		}
	}

	/// Wait for one token.
	///
	/// Fails with `Cancelled` if `cancel` fires before the token is due; the
	/// reserved token is then returned to the bucket.
	pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), Cancelled> {
		if cancel.is_cancelled() {
			return Err(Cancelled);
		}

		let wait = self.reserve(Instant::now());
		if wait.is_zero() {
			return Ok(());
		}

		tokio::select! {
			biased;
			_ = cancel.cancelled() => {
				self.release();
				Err(Cancelled)
			}
			_ = tokio::time::sleep(wait) => Ok(()),
		}
	}

	/// Take one token and return how long until it may be used.
	fn reserve(&self, now: Instant) -> Duration {
		let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);

		let elapsed = now.saturating_duration_since(bucket.last).as_secs_f64();
		bucket.tokens = (bucket.tokens + elapsed * self.rate).min(self.burst);
		bucket.last = now;
		bucket.tokens -= 1.0;

		if bucket.tokens >= 0.0 {
			Duration::ZERO
		} else {
			Duration::try_from_secs_f64(-bucket.tokens / self.rate).unwrap_or(Duration::MAX)
		}
	}

	fn release(&self) {
		let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
		bucket.tokens = (bucket.tokens + 1.0).min(self.burst);
	}
}
