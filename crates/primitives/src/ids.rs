//! Numeric identifiers shared between the platform surface and the state core.
//!
//! Every identifier is a transparent `i32` so it round-trips through the
//! platform layout unchanged. Negative values are reserved for sentinels and
//! are never produced by allocation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of trophy ids a title may define.
pub const TROPHY_NUM_MAX: usize = 128;

/// Identifier of one trophy within a title.
///
/// Valid ids lie in `[0, TROPHY_NUM_MAX)`. Construction is unchecked; range
/// validation happens where ids meet a [`FlagArray`](crate::FlagArray) or a
/// loaded trophy set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrophyId(pub i32);

impl TrophyId {
	/// Sentinel for "no trophy".
	pub const INVALID: Self = Self(-1);

	/// Returns the raw platform value.
	#[inline]
	pub const fn get(self) -> i32 {
		self.0
	}

	/// Returns the id as a bit index, or `None` when it lies outside the flag range.
	#[inline]
	pub const fn index(self) -> Option<usize> {
		if self.0 >= 0 && (self.0 as usize) < TROPHY_NUM_MAX {
			Some(self.0 as usize)
		} else {
			None
		}
	}
}

/// Identifier of a trophy group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i32);

impl GroupId {
	/// The base game's ungrouped trophies.
	pub const BASE_GAME: Self = Self(-1);
	/// Sentinel for "no group".
	pub const INVALID: Self = Self(-2);

	#[inline]
	pub const fn get(self) -> i32 {
		self.0
	}

	/// Returns true for downloadable-content groups.
	#[inline]
	pub const fn is_dlc(self) -> bool {
		self.0 >= 0
	}
}

impl Default for GroupId {
	fn default() -> Self {
		Self::BASE_GAME
	}
}

macro_rules! live_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		pub struct $name(pub i32);

		impl $name {
			/// Sentinel for an absent or invalid id.
			pub const INVALID: Self = Self(-1);

			/// Returns the raw platform value.
			#[inline]
			pub const fn get(self) -> i32 {
				self.0
			}

			/// Returns false for sentinel values.
			#[inline]
			pub const fn is_valid(self) -> bool {
				self.0 >= 0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}
	};
}

live_id!(
	/// Identifier of a live trophy context.
	ContextId
);
live_id!(
	/// Identifier of a live operation handle.
	HandleId
);

impl fmt::Display for TrophyId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl fmt::Display for GroupId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::BASE_GAME => f.write_str("base"),
			Self::INVALID => f.write_str("invalid"),
			Self(id) => write!(f, "{id}"),
		}
	}
}

/// Platform user the context acts for.
pub type UserId = i32;

/// Service label selecting which trophy set of a title a context binds to.
pub type ServiceLabel = u32;

/// Title identifier as assigned by the platform (for example `NPWR00001_00`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleId(pub String);

impl TitleId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for TitleId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
