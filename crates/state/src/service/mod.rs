//! The trophy service: one owned registry of titles, contexts and handles.
//!
//! Nothing here is process-global. A [`TrophyService`] starts empty, every
//! operation goes through it, and [`TrophyService::teardown`] releases
//! everything, so independent instances can coexist.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};
use trophy_primitives::{ContextId, HandleId, ServiceLabel, TitleId, TrophyId, UserId};

use crate::clock::{Clock, SystemClock};
use crate::config::TrophyConfig;
use crate::context::{ContextInfo, ContextManager};
use crate::handle::{HandleManager, HandleStatus};
use crate::icons::IconProvider;
use crate::metadata::TrophySet;
use crate::unlock::{self, UnlockOutcome};
use crate::{Error, Result};

mod queries;

pub use queries::SyncSnapshot;

#[derive(Debug, Default)]
struct TitleTable {
	loaded: HashMap<TitleId, Arc<TrophySet>>,
	active: Option<Arc<TrophySet>>,
}

/// Owned registry and entry point for every trophy operation.
pub struct TrophyService {
	config: TrophyConfig,
	clock: Arc<dyn Clock>,
	icons: Option<Arc<dyn IconProvider>>,
	titles: RwLock<TitleTable>,
	contexts: ContextManager,
	handles: HandleManager,
}

impl std::fmt::Debug for TrophyService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TrophyService")
			.field("config", &self.config)
			.field("contexts", &self.contexts.len())
			.field("handles", &self.handles.len())
			.finish_non_exhaustive()
	}
}

impl Default for TrophyService {
	fn default() -> Self {
		Self::new(TrophyConfig::default())
	}
}

impl TrophyService {
	/// Creates an empty service using the wall clock and no icon provider.
	pub fn new(config: TrophyConfig) -> Self {
		Self {
			contexts: ContextManager::new(config.limits.max_contexts),
			handles: HandleManager::new(config.limits.max_handles),
			config,
			clock: Arc::new(SystemClock),
			icons: None,
			titles: RwLock::new(TitleTable::default()),
		}
	}

	/// Replaces the clock used for unlock timestamps.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	/// Installs the icon provider queried by icon retrieval.
	pub fn with_icon_provider(mut self, icons: Arc<dyn IconProvider>) -> Self {
		self.icons = Some(icons);
		self
	}

	pub fn config(&self) -> &TrophyConfig {
		&self.config
	}

	/// Installs a title's trophy set and makes it the active title.
	///
	/// Each title is loaded once; contexts created afterwards bind to it.
	pub fn load_title(&self, set: TrophySet) -> Result<()> {
		let mut titles = self.titles.write();
		if titles.loaded.contains_key(set.title_id()) {
			return Err(Error::TitleAlreadyLoaded(set.title_id().clone()));
		}
		info!(
			title = %set.title_id(),
			trophies = set.len(),
			groups = set.game().num_groups(),
			platinum = ?set.platinum().map(TrophyId::get),
			"title loaded"
		);
		let set = Arc::new(set);
		titles.loaded.insert(set.title_id().clone(), Arc::clone(&set));
		titles.active = Some(set);
		Ok(())
	}

	/// Makes an already loaded title the one new contexts bind to.
	pub fn activate_title(&self, id: &TitleId) -> Result<()> {
		let mut titles = self.titles.write();
		let set = titles.loaded.get(id).cloned().ok_or_else(|| Error::UnknownTitle(id.clone()))?;
		titles.active = Some(set);
		debug!(title = %id, "title activated");
		Ok(())
	}

	/// The trophy set new contexts bind to.
	pub fn active_title(&self) -> Option<Arc<TrophySet>> {
		self.titles.read().active.clone()
	}

	/// Creates a context for `user` bound to the active title.
	pub fn create_context(&self, user: UserId, service_label: ServiceLabel, options: u64) -> Result<ContextId> {
		let set = self.active_title().ok_or(Error::NoActiveTitle)?;
		self.contexts.create(user, service_label, options, set, &self.config.cascade)
	}

	pub fn destroy_context(&self, context: ContextId) -> Result<()> {
		self.contexts.destroy(context)
	}

	/// Permits `handle` to drive display calls against `context`.
	pub fn register_context(&self, context: ContextId, handle: HandleId, options: u64) -> Result<()> {
		self.handles.with_live(handle, |live| {
			if !live {
				return Err(Error::InvalidHandle(handle));
			}
			self.contexts.register(context, handle, options)
		})?;
		debug!(context = context.get(), handle = handle.get(), options, "context registered");
		Ok(())
	}

	pub fn context_info(&self, context: ContextId) -> Result<ContextInfo> {
		self.contexts.info(context)
	}

	pub fn create_handle(&self) -> Result<HandleId> {
		self.handles.create()
	}

	/// Destroys a handle, aborting its outstanding operation and dropping its
	/// context registrations.
	pub fn destroy_handle(&self, handle: HandleId) -> Result<()> {
		self.handles.destroy_with(handle, |handle| self.contexts.forget_handle(handle))
	}

	/// Requests that every operation outstanding on the handle stop at its next
	/// safe point. Returns true if any operation was outstanding.
	pub fn abort_handle(&self, handle: HandleId) -> Result<bool> {
		self.handles.abort(handle)
	}

	pub fn handle_status(&self, handle: HandleId) -> Result<HandleStatus> {
		self.handles.status(handle)
	}

	/// Unlocks `trophy` in `context`, cascading the platinum when it completes
	/// the title.
	///
	/// The whole transition happens under the context's write lock: readers see
	/// the state before it or after it, never in between.
	///
	/// # Errors
	///
	/// [`Error::InvalidContext`], [`Error::InvalidHandle`], [`Error::InvalidTrophyId`],
	/// [`Error::PlatinumCannotUnlock`], or [`Error::Aborted`] if the handle was
	/// aborted before the transition began. No state changes on error.
	pub fn unlock_trophy(&self, context: ContextId, handle: HandleId, trophy: TrophyId) -> Result<UnlockOutcome> {
		let entry = self.contexts.get(context)?;
		let op = self.handles.begin(handle)?;
		op.checkpoint()?;

		let mut state = entry.state.write();
		op.checkpoint()?;
		let outcome = unlock::unlock(&mut state, &entry.set, &entry.cascade_mask, trophy, self.clock.as_ref())?;
		drop(state);

		if let Some(platinum) = outcome.platinum {
			info!(context = context.get(), trophy = trophy.get(), platinum = platinum.get(), "platinum unlocked");
		}
		Ok(outcome)
	}

	/// Re-locks one trophy. Administrative path; the platinum may be re-locked too.
	pub fn debug_lock_trophy(&self, context: ContextId, trophy: TrophyId) -> Result<bool> {
		let entry = self.contexts.get(context)?;
		let mut state = entry.state.write();
		unlock::relock(&mut state, &entry.set, trophy)
	}

	/// Unlocks every defined trophy. Administrative path; returns how many changed.
	pub fn debug_unlock_all(&self, context: ContextId) -> Result<u32> {
		let entry = self.contexts.get(context)?;
		let mut state = entry.state.write();
		unlock::unlock_all(&mut state, &entry.set, self.clock.as_ref())
	}

	/// Destroys every handle and context and unloads every title.
	pub fn teardown(&self) {
		let handles = self.handles.clear();
		let contexts = self.contexts.clear();
		*self.titles.write() = TitleTable::default();
		info!(handles, contexts, "trophy service torn down");
	}
}
