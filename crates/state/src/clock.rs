//! Time source for unlock timestamps.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use trophy_primitives::RtcTick;

/// Source of platform ticks recorded when a trophy unlocks.
pub trait Clock: Send + Sync {
	fn now(&self) -> RtcTick;
}

/// Wall clock in platform ticks.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> RtcTick {
		RtcTick::from_datetime(Utc::now())
	}
}

/// Deterministic clock advancing by a fixed step on every read.
#[derive(Debug)]
pub struct ManualClock {
	next: AtomicU64,
	step: u64,
}

impl ManualClock {
	/// Starts at `start` and advances by `step` after each read.
	pub fn new(start: u64, step: u64) -> Self {
		Self {
			next: AtomicU64::new(start),
			step,
		}
	}

	/// Returns the tick the next read will produce.
	pub fn peek(&self) -> RtcTick {
		RtcTick(self.next.load(Ordering::Acquire))
	}
}

impl Clock for ManualClock {
	fn now(&self) -> RtcTick {
		RtcTick(self.next.fetch_add(self.step, Ordering::AcqRel))
	}
}
