//! Trophy list enumeration for display front ends.

use trophy_primitives::{Grade, GroupId, RtcTick, TrophyId, TrophyName};

/// One row of a trophy list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrophyListEntry {
	pub id: TrophyId,
	pub grade: Grade,
	pub group: GroupId,
	pub hidden: bool,
	pub name: TrophyName,
	pub unlocked: bool,
	pub timestamp: Option<RtcTick>,
}

/// Receives list rows; presentation is up to the implementor.
pub trait TrophyListSink {
	fn entry(&mut self, entry: &TrophyListEntry);
}

impl TrophyListSink for Vec<TrophyListEntry> {
	fn entry(&mut self, entry: &TrophyListEntry) {
		self.push(entry.clone());
	}
}
