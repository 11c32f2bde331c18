use std::sync::atomic::{AtomicU64, Ordering};

/// Success and error tallies updated concurrently by workers.
///
/// Workers can only increment. The totals become readable once every other
/// handle is gone, via `into_totals`, so a report never sees a count that is
/// still moving.
#[derive(Debug, Default)]
pub struct OutcomeCounters {
	success: AtomicU64,
	errors: AtomicU64,
}

/// Final counts of completed resolution attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTotals {
	pub success: u64,
	pub errors: u64,
}

impl OutcomeCounters {
	pub fn record_success(&self) {
		// Relaxed: joining the worker tasks orders these before the final read
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub fn record_error(&self) {
		self.errors.fetch_add(1, Ordering::Relaxed);
	}

	pub fn into_totals(self) -> OutcomeTotals {
		OutcomeTotals {
			success: self.success.into_inner(),
			errors: self.errors.into_inner(),
		}
	}
}

impl OutcomeTotals {
	pub fn total(&self) -> u64 {
		self.success + self.errors
	}
}
