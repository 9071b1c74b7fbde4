//! In-process trophy state.
//!
//! Tracks which trophies a title defines and which each context has
//! unlocked, and serves queries and unlock requests from concurrent callers
//! through numeric context and handle ids. Everything lives in one owned
//! [`TrophyService`]:
//!
//! - [`metadata`]: immutable per-title trophy, group and game records.
//! - [`context`]: live contexts, each with its own locked [`UnlockState`].
//! - [`handle`]: operation handles and abort.
//! - [`unlock`]: the unlock transition and platinum cascade.
//! - [`layout`]: size-negotiated query results and their platform layout.

pub mod allocator;
pub mod clock;
pub mod config;
pub mod context;
mod error;
pub mod handle;
pub mod icons;
pub mod layout;
pub mod list;
pub mod metadata;
mod service;
pub mod unlock;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CascadePolicy, Limits, TrophyConfig};
pub use context::ContextInfo;
pub use error::{Error, Result};
pub use handle::HandleStatus;
pub use icons::{IconProvider, IconTarget};
pub use layout::{
	GameData, GameDetails, GroupData, GroupDetails, InfoReply, InfoRequest, Negotiated, PlatformLayout, TrophyData,
	TrophyDetails,
};
pub use list::{TrophyListEntry, TrophyListSink};
pub use metadata::{GameRecord, GroupRecord, TitleDefinition, TrophyRecord, TrophySet, TrophySetBuilder};
pub use service::{SyncSnapshot, TrophyService};
pub use trophy_primitives as primitives;
pub use unlock::{UnlockOutcome, UnlockSnapshot, UnlockState};
