//! Unlock state and its transitions.
//!
//! [`UnlockState`] holds a context's unlock flags, per-trophy unlock ticks and
//! the unlocked grade counts at game and group scope. The counts are
//! maintained incrementally by every transition here; [`UnlockState::recount`]
//! rebuilds them from the flags for verification.
//!
//! The platinum trophy is never unlocked on request. After each successful
//! unlock the post-transition flags are compared against the cascade mask,
//! and the platinum is unlocked in the same transition once the mask is
//! covered.

use std::collections::BTreeMap;

use tracing::debug;
use trophy_primitives::{FlagArray, GradeCounts, GroupId, RtcTick, TROPHY_NUM_MAX, TrophyId};

use crate::Result;
use crate::clock::Clock;
use crate::error::Error;
use crate::metadata::{TrophyRecord, TrophySet};

/// Result of an unlock request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnlockOutcome {
	/// The trophy was unlocked before this request; nothing changed.
	pub already_unlocked: bool,
	/// The platinum trophy unlocked as a consequence of this request.
	pub platinum: Option<TrophyId>,
}

/// Raw unlock flags plus the number of trophies the title defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockSnapshot {
	pub flags: FlagArray,
	pub count: u32,
}

/// Per-context unlock state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockState {
	flags: FlagArray,
	timestamps: [Option<RtcTick>; TROPHY_NUM_MAX],
	game: GradeCounts,
	groups: BTreeMap<GroupId, GradeCounts>,
}

impl UnlockState {
	/// Fresh state with nothing unlocked.
	pub fn new(set: &TrophySet) -> Self {
		Self {
			flags: FlagArray::new(),
			timestamps: [None; TROPHY_NUM_MAX],
			game: GradeCounts::default(),
			groups: set.groups().map(|g| (g.id, GradeCounts::default())).collect(),
		}
	}

	pub fn flags(&self) -> &FlagArray {
		&self.flags
	}

	pub fn is_unlocked(&self, id: TrophyId) -> bool {
		self.flags.is_set(id)
	}

	/// Tick recorded when `id` unlocked.
	pub fn timestamp(&self, id: TrophyId) -> Option<RtcTick> {
		id.index().and_then(|i| self.timestamps[i])
	}

	/// Unlocked trophies across the title, by grade.
	pub fn game_counts(&self) -> &GradeCounts {
		&self.game
	}

	/// Unlocked trophies in `group`, by grade.
	pub fn group_counts(&self, group: GroupId) -> Option<&GradeCounts> {
		self.groups.get(&group)
	}

	/// Recomputes the game and group counts from the flags alone.
	pub fn recount(&self, set: &TrophySet) -> (GradeCounts, BTreeMap<GroupId, GradeCounts>) {
		let mut game = GradeCounts::default();
		let mut groups: BTreeMap<_, _> = set.groups().map(|g| (g.id, GradeCounts::default())).collect();
		for record in set.trophies().filter(|t| self.flags.is_set(t.id)) {
			game.add(record.grade);
			groups.entry(record.group).or_default().add(record.grade);
		}
		(game, groups)
	}

	/// Returns true if the maintained counts match [`Self::recount`] and no
	/// undefined id is flagged.
	pub fn is_consistent(&self, set: &TrophySet) -> bool {
		let (game, groups) = self.recount(set);
		game == self.game && groups == self.groups && set.defined().contains_all(&self.flags)
	}

	pub fn snapshot(&self, set: &TrophySet) -> UnlockSnapshot {
		UnlockSnapshot {
			flags: self.flags,
			count: set.len(),
		}
	}

	/// Unlocked trophies with their ticks, in id order.
	pub fn timestamps(&self) -> impl Iterator<Item = (TrophyId, RtcTick)> + '_ {
		self.flags.iter().filter_map(|id| self.timestamp(id).map(|at| (id, at)))
	}

	fn mark_unlocked(&mut self, record: &TrophyRecord, at: RtcTick) -> Result<()> {
		self.flags.set(record.id)?;
		if let Some(i) = record.id.index() {
			self.timestamps[i] = Some(at);
		}
		self.game.add(record.grade);
		self.groups.entry(record.group).or_default().add(record.grade);
		Ok(())
	}

	fn mark_locked(&mut self, record: &TrophyRecord) -> Result<()> {
		self.flags.clear(record.id)?;
		if let Some(i) = record.id.index() {
			self.timestamps[i] = None;
		}
		self.game.remove(record.grade);
		if let Some(counts) = self.groups.get_mut(&record.group) {
			counts.remove(record.grade);
		}
		Ok(())
	}
}

/// Unlocks `id` and cascades the platinum when `mask` becomes fully unlocked.
///
/// Validation happens before any mutation, so an error leaves `state` as it was.
pub(crate) fn unlock(
	state: &mut UnlockState,
	set: &TrophySet,
	mask: &FlagArray,
	id: TrophyId,
	clock: &dyn Clock,
) -> Result<UnlockOutcome> {
	let record = set.trophy(id)?;
	if record.grade.is_platinum() {
		return Err(Error::PlatinumCannotUnlock(id));
	}
	if state.flags.is_set(id) {
		return Ok(UnlockOutcome {
			already_unlocked: true,
			platinum: None,
		});
	}

	let at = clock.now();
	state.mark_unlocked(record, at)?;
	debug!(trophy = id.get(), grade = ?record.grade, tick = at.get(), "trophy unlocked");

	let platinum = cascade(state, set, mask, at)?;
	Ok(UnlockOutcome {
		already_unlocked: false,
		platinum,
	})
}

/// Unlocks the platinum if every masked trophy is unlocked and it is still locked.
fn cascade(state: &mut UnlockState, set: &TrophySet, mask: &FlagArray, at: RtcTick) -> Result<Option<TrophyId>> {
	let Some(platinum) = set.platinum() else {
		return Ok(None);
	};
	if mask.is_empty() || state.flags.is_set(platinum) || !state.flags.contains_all(mask) {
		return Ok(None);
	}
	let record = set.trophy(platinum)?;
	state.mark_unlocked(record, at)?;
	debug!(trophy = platinum.get(), tick = at.get(), "platinum cascaded");
	Ok(Some(platinum))
}

/// Re-locks one trophy. Returns false if it was already locked.
pub(crate) fn relock(state: &mut UnlockState, set: &TrophySet, id: TrophyId) -> Result<bool> {
	let record = set.trophy(id)?;
	if !state.flags.is_set(id) {
		return Ok(false);
	}
	state.mark_locked(record)?;
	debug!(trophy = id.get(), "trophy re-locked");
	Ok(true)
}

/// Unlocks every trophy the title defines, platinum included. Returns how
/// many changed state.
pub(crate) fn unlock_all(state: &mut UnlockState, set: &TrophySet, clock: &dyn Clock) -> Result<u32> {
	let mut everything = FlagArray::new();
	everything.set_all();
	let pending: Vec<TrophyId> = everything
		.intersection(set.defined())
		.iter()
		.filter(|&id| !state.flags.is_set(id))
		.collect();
	let at = clock.now();
	for &id in &pending {
		state.mark_unlocked(set.trophy(id)?, at)?;
	}
	let changed = pending.len() as u32;
	debug!(changed, "all trophies unlocked");
	Ok(changed)
}
