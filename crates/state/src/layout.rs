//! Query result structures and their platform byte layout.
//!
//! Platform callers declare how many bytes they can receive for each result
//! structure. A smaller declaration is not an error: the result is truncated
//! to the declared size. [`Negotiated`] carries the result together with the
//! agreed byte count; [`Negotiated::encode_into`] produces the platform bytes
//! (little-endian, C field order, leading `size` field echoing the caller's
//! declaration).

use bytes::{BufMut, BytesMut};
use trophy_primitives::{
	GameDescription, GameTitle, Grade, GradeCounts, GroupDescription, GroupId, GroupTitle, RtcTick, TrophyDescription,
	TrophyId, TrophyName,
};

use crate::{Error, Result};

/// A structure with a fixed platform layout.
pub trait PlatformLayout {
	/// Size of the full structure in bytes.
	const SIZE: usize;

	/// Appends exactly [`Self::SIZE`] bytes, writing `size` into the size field.
	fn encode(&self, size: usize, buf: &mut BytesMut);
}

/// Caller-declared capacities for the two structures an info query fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoRequest {
	pub details_size: usize,
	pub data_size: usize,
}

impl InfoRequest {
	/// Accepts the full structures, whatever their size.
	pub const FULL: Self = Self {
		details_size: usize::MAX,
		data_size: usize::MAX,
	};

	pub const fn new(details_size: usize, data_size: usize) -> Self {
		Self { details_size, data_size }
	}
}

impl Default for InfoRequest {
	fn default() -> Self {
		Self::FULL
	}
}

/// A query result paired with the byte count agreed with the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated<T> {
	value: T,
	declared: usize,
}

impl<T: PlatformLayout> Negotiated<T> {
	pub fn new(value: T, declared: usize) -> Self {
		Self { value, declared }
	}

	pub fn value(&self) -> &T {
		&self.value
	}

	pub fn into_inner(self) -> T {
		self.value
	}

	/// Bytes of the structure the caller receives.
	pub fn written(&self) -> usize {
		self.declared.min(T::SIZE)
	}

	/// Bytes of the full structure.
	pub fn required(&self) -> usize {
		T::SIZE
	}

	pub fn is_truncated(&self) -> bool {
		self.written() < T::SIZE
	}

	/// Rejects truncated results for callers that need the whole structure.
	pub fn require_complete(&self) -> Result<&T> {
		if self.is_truncated() {
			return Err(Error::BufferTooSmall {
				declared: self.declared,
				required: T::SIZE,
			});
		}
		Ok(&self.value)
	}

	/// Writes the platform bytes, at most [`Self::written`] of them and never
	/// past the end of `out`. Returns the number of bytes written.
	pub fn encode_into(&self, out: &mut [u8]) -> usize {
		let mut buf = BytesMut::with_capacity(T::SIZE);
		self.value.encode(self.written(), &mut buf);
		debug_assert_eq!(buf.len(), T::SIZE);
		let n = self.written().min(out.len());
		out[..n].copy_from_slice(&buf[..n]);
		n
	}
}

/// Both structures returned by an info query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoReply<D, S> {
	pub details: Negotiated<D>,
	pub data: Negotiated<S>,
}

/// Static description of the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDetails {
	pub num_groups: u32,
	pub num_trophies: u32,
	pub num_platinum: u32,
	pub num_gold: u32,
	pub num_silver: u32,
	pub num_bronze: u32,
	pub title: GameTitle,
	pub description: GameDescription,
}

/// Unlock progress across the whole title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameData {
	pub unlocked_trophies: u32,
	pub unlocked_platinum: u32,
	pub unlocked_gold: u32,
	pub unlocked_silver: u32,
	pub unlocked_bronze: u32,
	pub progress_percentage: u32,
}

/// Static description of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDetails {
	pub group_id: GroupId,
	pub num_trophies: u32,
	pub num_platinum: u32,
	pub num_gold: u32,
	pub num_silver: u32,
	pub num_bronze: u32,
	pub title: GroupTitle,
	pub description: GroupDescription,
}

/// Unlock progress within one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupData {
	pub group_id: GroupId,
	pub unlocked_trophies: u32,
	pub unlocked_platinum: u32,
	pub unlocked_gold: u32,
	pub unlocked_silver: u32,
	pub unlocked_bronze: u32,
	pub progress_percentage: u32,
}

/// Static description of one trophy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrophyDetails {
	pub trophy_id: TrophyId,
	pub grade: Grade,
	pub group_id: GroupId,
	pub hidden: bool,
	pub name: TrophyName,
	pub description: TrophyDescription,
}

/// Unlock state of one trophy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrophyData {
	pub trophy_id: TrophyId,
	pub unlocked: bool,
	/// Tick recorded at unlock; zero while locked.
	pub timestamp: RtcTick,
}

impl GameData {
	pub(crate) fn from_counts(unlocked: &GradeCounts, progress_percentage: u32) -> Self {
		Self {
			unlocked_trophies: unlocked.total,
			unlocked_platinum: unlocked.platinum,
			unlocked_gold: unlocked.gold,
			unlocked_silver: unlocked.silver,
			unlocked_bronze: unlocked.bronze,
			progress_percentage,
		}
	}
}

fn put_counts(buf: &mut BytesMut, counts: [u32; 5]) {
	for count in counts {
		buf.put_u32_le(count);
	}
}

impl PlatformLayout for GameDetails {
	const SIZE: usize = 8 + 6 * 4 + trophy_primitives::text::GAME_TITLE_MAX + trophy_primitives::text::GAME_DESCR_MAX;

	fn encode(&self, size: usize, buf: &mut BytesMut) {
		buf.put_u64_le(size as u64);
		buf.put_u32_le(self.num_groups);
		put_counts(buf, [self.num_trophies, self.num_platinum, self.num_gold, self.num_silver, self.num_bronze]);
		buf.put_slice(&self.title.to_field());
		buf.put_slice(&self.description.to_field());
	}
}

impl PlatformLayout for GameData {
	const SIZE: usize = 8 + 6 * 4;

	fn encode(&self, size: usize, buf: &mut BytesMut) {
		buf.put_u64_le(size as u64);
		put_counts(
			buf,
			[
				self.unlocked_trophies,
				self.unlocked_platinum,
				self.unlocked_gold,
				self.unlocked_silver,
				self.unlocked_bronze,
			],
		);
		buf.put_u32_le(self.progress_percentage);
	}
}

impl PlatformLayout for GroupDetails {
	const SIZE: usize = 8 + 4 + 5 * 4 + trophy_primitives::text::GROUP_TITLE_MAX + trophy_primitives::text::GROUP_DESCR_MAX;

	fn encode(&self, size: usize, buf: &mut BytesMut) {
		buf.put_u64_le(size as u64);
		buf.put_i32_le(self.group_id.get());
		put_counts(buf, [self.num_trophies, self.num_platinum, self.num_gold, self.num_silver, self.num_bronze]);
		buf.put_slice(&self.title.to_field());
		buf.put_slice(&self.description.to_field());
	}
}

impl PlatformLayout for GroupData {
	const SIZE: usize = 8 + 4 + 6 * 4 + 4;

	fn encode(&self, size: usize, buf: &mut BytesMut) {
		buf.put_u64_le(size as u64);
		buf.put_i32_le(self.group_id.get());
		put_counts(
			buf,
			[
				self.unlocked_trophies,
				self.unlocked_platinum,
				self.unlocked_gold,
				self.unlocked_silver,
				self.unlocked_bronze,
			],
		);
		buf.put_u32_le(self.progress_percentage);
		buf.put_bytes(0, 4);
	}
}

impl PlatformLayout for TrophyDetails {
	const SIZE: usize = 8 + 3 * 4 + 4 + trophy_primitives::text::TROPHY_NAME_MAX + trophy_primitives::text::TROPHY_DESCR_MAX;

	fn encode(&self, size: usize, buf: &mut BytesMut) {
		buf.put_u64_le(size as u64);
		buf.put_i32_le(self.trophy_id.get());
		buf.put_i32_le(self.grade.raw());
		buf.put_i32_le(self.group_id.get());
		buf.put_u8(u8::from(self.hidden));
		buf.put_bytes(0, 3);
		buf.put_slice(&self.name.to_field());
		buf.put_slice(&self.description.to_field());
	}
}

impl PlatformLayout for TrophyData {
	const SIZE: usize = 8 + 4 + 4 + 8;

	fn encode(&self, size: usize, buf: &mut BytesMut) {
		buf.put_u64_le(size as u64);
		buf.put_i32_le(self.trophy_id.get());
		buf.put_u8(u8::from(self.unlocked));
		buf.put_bytes(0, 3);
		buf.put_u64_le(self.timestamp.get());
	}
}
