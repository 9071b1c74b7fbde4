//! Read-only queries against a context.

use tracing::warn;
use trophy_primitives::{
	ContextId, FlagArray, GroupId, HandleId, RtcTick, TitleId, TrophyId, UserId, progress_percentage,
};

use super::TrophyService;
use crate::icons::{self, IconTarget};
use crate::layout::{
	GameData, GameDetails, GroupData, GroupDetails, InfoReply, InfoRequest, Negotiated, TrophyData, TrophyDetails,
};
use crate::list::{TrophyListEntry, TrophyListSink};
use crate::unlock::UnlockSnapshot;
use crate::{Error, Result};

/// Full unlock state of one context, for synchronization with a remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSnapshot {
	pub title: TitleId,
	pub user: UserId,
	pub flags: FlagArray,
	/// Unlocked trophies with their unlock ticks, in id order.
	pub timestamps: Vec<(TrophyId, RtcTick)>,
}

impl TrophyService {
	/// Title details and title-wide progress.
	pub fn game_info(
		&self,
		context: ContextId,
		handle: HandleId,
		request: InfoRequest,
	) -> Result<InfoReply<GameDetails, GameData>> {
		let entry = self.contexts.get(context)?;
		let op = self.handles.begin(handle)?;
		op.checkpoint()?;

		let game = entry.set.game();
		let defined = game.counts();
		let unlocked = *entry.state.read().game_counts();
		let details = GameDetails {
			num_groups: game.num_groups(),
			num_trophies: defined.total,
			num_platinum: defined.platinum,
			num_gold: defined.gold,
			num_silver: defined.silver,
			num_bronze: defined.bronze,
			title: game.title.clone(),
			description: game.description.clone(),
		};
		let data = GameData::from_counts(&unlocked, progress_percentage(&unlocked, defined));
		Ok(InfoReply {
			details: Negotiated::new(details, request.details_size),
			data: Negotiated::new(data, request.data_size),
		})
	}

	/// Group details and progress within the group.
	pub fn group_info(
		&self,
		context: ContextId,
		handle: HandleId,
		group: GroupId,
		request: InfoRequest,
	) -> Result<InfoReply<GroupDetails, GroupData>> {
		let entry = self.contexts.get(context)?;
		let op = self.handles.begin(handle)?;
		op.checkpoint()?;

		let record = entry.set.group(group)?;
		let defined = record.counts();
		let unlocked = entry.state.read().group_counts(group).copied().unwrap_or_default();
		let details = GroupDetails {
			group_id: group,
			num_trophies: defined.total,
			num_platinum: defined.platinum,
			num_gold: defined.gold,
			num_silver: defined.silver,
			num_bronze: defined.bronze,
			title: record.title.clone(),
			description: record.description.clone(),
		};
		let data = GroupData {
			group_id: group,
			unlocked_trophies: unlocked.total,
			unlocked_platinum: unlocked.platinum,
			unlocked_gold: unlocked.gold,
			unlocked_silver: unlocked.silver,
			unlocked_bronze: unlocked.bronze,
			progress_percentage: progress_percentage(&unlocked, defined),
		};
		Ok(InfoReply {
			details: Negotiated::new(details, request.details_size),
			data: Negotiated::new(data, request.data_size),
		})
	}

	/// Trophy details and its unlock state.
	pub fn trophy_info(
		&self,
		context: ContextId,
		handle: HandleId,
		trophy: TrophyId,
		request: InfoRequest,
	) -> Result<InfoReply<TrophyDetails, TrophyData>> {
		let entry = self.contexts.get(context)?;
		let op = self.handles.begin(handle)?;
		op.checkpoint()?;

		let record = entry.set.trophy(trophy)?;
		let (unlocked, timestamp) = {
			let state = entry.state.read();
			(state.is_unlocked(trophy), state.timestamp(trophy).unwrap_or_default())
		};
		let details = TrophyDetails {
			trophy_id: trophy,
			grade: record.grade,
			group_id: record.group,
			hidden: record.hidden,
			name: record.name.clone(),
			description: record.description.clone(),
		};
		let data = TrophyData {
			trophy_id: trophy,
			unlocked,
			timestamp,
		};
		Ok(InfoReply {
			details: Negotiated::new(details, request.details_size),
			data: Negotiated::new(data, request.data_size),
		})
	}

	/// Raw unlock flags and the number of trophies the title defines.
	pub fn unlock_state(&self, context: ContextId, handle: HandleId) -> Result<UnlockSnapshot> {
		let entry = self.contexts.get(context)?;
		let op = self.handles.begin(handle)?;
		op.checkpoint()?;
		Ok(entry.state.read().snapshot(&entry.set))
	}

	/// Full state for an external synchronizer. Not scoped by a handle.
	pub fn sync_snapshot(&self, context: ContextId) -> Result<SyncSnapshot> {
		let entry = self.contexts.get(context)?;
		let state = entry.state.read();
		Ok(SyncSnapshot {
			title: entry.set.title_id().clone(),
			user: entry.user,
			flags: *state.flags(),
			timestamps: state.timestamps().collect(),
		})
	}

	/// Title icon, two-phase: `None` reports the size, `Some` fills the buffer.
	pub fn game_icon(&self, context: ContextId, handle: HandleId, buffer: Option<&mut [u8]>) -> Result<usize> {
		self.icon(context, handle, IconTarget::Game, buffer)
	}

	/// Group icon, two-phase.
	pub fn group_icon(
		&self,
		context: ContextId,
		handle: HandleId,
		group: GroupId,
		buffer: Option<&mut [u8]>,
	) -> Result<usize> {
		self.icon(context, handle, IconTarget::Group(group), buffer)
	}

	/// Trophy icon, two-phase.
	pub fn trophy_icon(
		&self,
		context: ContextId,
		handle: HandleId,
		trophy: TrophyId,
		buffer: Option<&mut [u8]>,
	) -> Result<usize> {
		self.icon(context, handle, IconTarget::Trophy(trophy), buffer)
	}

	fn icon(
		&self,
		context: ContextId,
		handle: HandleId,
		target: IconTarget,
		buffer: Option<&mut [u8]>,
	) -> Result<usize> {
		let entry = self.contexts.get(context)?;
		let op = self.handles.begin(handle)?;
		op.checkpoint()?;

		match target {
			IconTarget::Game => {}
			IconTarget::Group(group) => {
				entry.set.group(group)?;
			}
			IconTarget::Trophy(trophy) => {
				entry.set.trophy(trophy)?;
			}
		}
		let provider = self.icons.as_ref().ok_or(Error::IconUnavailable)?;
		let bytes = provider.icon(entry.set.title_id(), target).ok_or(Error::IconUnavailable)?;
		op.checkpoint()?;
		Ok(icons::fill(&bytes, buffer))
	}

	/// Streams the context's trophy list to `sink`, one row per trophy in id order.
	///
	/// The handle must be registered with the context. Rows come from a
	/// snapshot taken up front, so the sink may call back into the service.
	/// An abort is observed between rows. Returns the number of rows emitted.
	pub fn show_trophy_list(
		&self,
		context: ContextId,
		handle: HandleId,
		sink: &mut dyn TrophyListSink,
	) -> Result<usize> {
		let entry = self.contexts.get(context)?;
		if !entry.is_registered(handle) {
			return Err(Error::HandleNotRegistered { context, handle });
		}
		let op = self.handles.begin(handle)?;
		op.checkpoint()?;

		let rows: Vec<TrophyListEntry> = {
			let state = entry.state.read();
			entry
				.set
				.trophies()
				.map(|record| TrophyListEntry {
					id: record.id,
					grade: record.grade,
					group: record.group,
					hidden: record.hidden,
					name: record.name.clone(),
					unlocked: state.is_unlocked(record.id),
					timestamp: state.timestamp(record.id),
				})
				.collect()
		};
		for (shown, row) in rows.iter().enumerate() {
			if let Err(err) = op.checkpoint() {
				warn!(context = context.get(), handle = handle.get(), shown, "trophy list aborted");
				return Err(err);
			}
			sink.entry(row);
		}
		Ok(rows.len())
	}
}
