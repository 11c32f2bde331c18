use std::time::Duration;

use crate::counters::OutcomeTotals;

/// Outcome of a complete load test run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadTestReport {
	/// Wall-clock time from start until the last worker stopped
	pub elapsed: Duration,
	pub totals: OutcomeTotals,
	/// Signals handed to workers by the dispatcher
	pub dispatched: u64,
}

impl LoadTestReport {
	pub fn success(&self) -> u64 {
		self.totals.success
	}

	pub fn errors(&self) -> u64 {
		self.totals.errors
	}

	pub fn total(&self) -> u64 {
		self.totals.total()
	}

	/// Percentage of completed attempts that succeeded, 0.0 when none ran.
	pub fn success_rate(&self) -> f64 {
		let total = self.total();
		if total > 0 {
			(self.success() as f64 / total as f64) * 100.0
		} else {
			0.0
		}
	}

	/// Completed attempts per second over the whole run.
	pub fn achieved_rate(&self) -> f64 {
		let secs = self.elapsed.as_secs_f64();
		if secs > 0.0 {
			self.total() as f64 / secs
		} else {
			0.0
		}
	}
}
