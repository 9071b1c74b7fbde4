//! Trophy grades and per-grade tallies.

use serde::{Deserialize, Serialize};

/// Trophy grade, numbered as on the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum Grade {
	#[default]
	Unknown = 0,
	Platinum = 1,
	Gold = 2,
	Silver = 3,
	Bronze = 4,
}

impl Grade {
	/// Returns the raw platform value.
	pub const fn raw(self) -> i32 {
		self as i32
	}

	pub const fn is_platinum(self) -> bool {
		matches!(self, Self::Platinum)
	}
}

/// Trophy counts broken down by grade.
///
/// `total` includes every grade, [`Grade::Unknown`] too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GradeCounts {
	pub total: u32,
	pub platinum: u32,
	pub gold: u32,
	pub silver: u32,
	pub bronze: u32,
}

impl GradeCounts {
	/// Counts one trophy of `grade`.
	pub fn add(&mut self, grade: Grade) {
		self.total += 1;
		if let Some(slot) = self.slot_mut(grade) {
			*slot += 1;
		}
	}

	/// Uncounts one trophy of `grade`.
	///
	/// Saturates at zero so a double removal cannot wrap.
	pub fn remove(&mut self, grade: Grade) {
		debug_assert!(self.total > 0, "removing from an empty tally");
		self.total = self.total.saturating_sub(1);
		if let Some(slot) = self.slot_mut(grade) {
			*slot = slot.saturating_sub(1);
		}
	}

	/// Number of counted trophies that are not platinum.
	pub const fn non_platinum(&self) -> u32 {
		self.total - self.platinum
	}

	fn slot_mut(&mut self, grade: Grade) -> Option<&mut u32> {
		match grade {
			Grade::Unknown => None,
			Grade::Platinum => Some(&mut self.platinum),
			Grade::Gold => Some(&mut self.gold),
			Grade::Silver => Some(&mut self.silver),
			Grade::Bronze => Some(&mut self.bronze),
		}
	}
}

impl FromIterator<Grade> for GradeCounts {
	fn from_iter<I: IntoIterator<Item = Grade>>(iter: I) -> Self {
		let mut counts = Self::default();
		for grade in iter {
			counts.add(grade);
		}
		counts
	}
}

/// Percentage of non-platinum trophies unlocked, rounded down.
///
/// A scope without non-platinum trophies reports zero.
pub fn progress_percentage(unlocked: &GradeCounts, defined: &GradeCounts) -> u32 {
	let total = defined.non_platinum();
	if total == 0 {
		return 0;
	}
	(u64::from(unlocked.non_platinum()) * 100 / u64::from(total)) as u32
}
