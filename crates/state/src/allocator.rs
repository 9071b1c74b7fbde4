//! Smallest-free-first identifier allocation.

use std::collections::BTreeSet;

use tracing::warn;

use crate::{Error, Result};

/// Issues small non-negative ids, always handing out the lowest free one.
///
/// Ids stay below `i32::MAX` so they never collide with negative sentinels.
/// The allocator is not synchronized; owners keep it behind their table lock.
#[derive(Debug)]
pub struct IdAllocator {
	kind: &'static str,
	limit: u32,
	/// Ids below this mark have been handed out at least once.
	high_water: u32,
	/// Released ids below `high_water`.
	free: BTreeSet<u32>,
}

impl IdAllocator {
	/// Creates an allocator for the `kind` namespace, optionally capped at `limit` live ids.
	pub fn new(kind: &'static str, limit: Option<u32>) -> Self {
		Self {
			kind,
			limit: limit.unwrap_or(i32::MAX as u32).min(i32::MAX as u32),
			high_water: 0,
			free: BTreeSet::new(),
		}
	}

	/// Returns the smallest id not currently allocated.
	pub fn allocate(&mut self) -> Result<u32> {
		if let Some(id) = self.free.pop_first() {
			return Ok(id);
		}
		if self.high_water >= self.limit {
			return Err(Error::AllocatorExhausted {
				kind: self.kind,
				limit: self.limit,
			});
		}
		let id = self.high_water;
		self.high_water += 1;
		Ok(id)
	}

	/// Frees `id` for reuse.
	///
	/// Releasing an id that is not allocated changes nothing and reports
	/// [`Error::NotAllocated`].
	pub fn release(&mut self, id: u32) -> Result<()> {
		if id >= self.high_water || self.free.contains(&id) {
			warn!(kind = self.kind, id, "release of unallocated id");
			return Err(Error::NotAllocated { kind: self.kind, id });
		}
		if id + 1 == self.high_water {
			self.high_water = id;
			// Fold trailing free ids back into the high-water mark.
			while let Some(&last) = self.free.last() {
				if last + 1 != self.high_water {
					break;
				}
				self.free.pop_last();
				self.high_water = last;
			}
		} else {
			self.free.insert(id);
		}
		Ok(())
	}

	/// Returns true if `id` is currently allocated.
	pub fn is_allocated(&self, id: u32) -> bool {
		id < self.high_water && !self.free.contains(&id)
	}

	/// Number of live ids.
	pub fn live(&self) -> usize {
		self.high_water as usize - self.free.len()
	}

	/// Frees every id.
	pub fn reset(&mut self) {
		self.high_water = 0;
		self.free.clear();
	}
}
