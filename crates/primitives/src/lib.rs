//! Core value types for trophy state: identifiers, grades, bounded text and
//! the packed unlock flag array.

/// Packed 128-bit unlock flags.
pub mod flags;
/// Trophy grades and per-grade tallies.
pub mod grade;
/// Identifier types and sentinels.
pub mod ids;
/// Length-bounded text fields.
pub mod text;
/// Platform clock ticks.
pub mod tick;

pub use flags::{FLAG_BITS_SHIFT, FLAG_WORDS, FlagArray, FlagError};
pub use grade::{Grade, GradeCounts, progress_percentage};
pub use ids::{ContextId, GroupId, HandleId, ServiceLabel, TROPHY_NUM_MAX, TitleId, TrophyId, UserId};
pub use text::{
	BoundedText, GameDescription, GameTitle, GroupDescription, GroupTitle, TrophyDescription, TrophyName,
};
pub use tick::RtcTick;
