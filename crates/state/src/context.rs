//! Trophy contexts.
//!
//! A context binds a user to one title's [`TrophySet`] and owns an
//! independent [`UnlockState`] behind its own read-write lock. The table lock
//! is only held to look up, insert or remove entries; callers clone the
//! entry out and lock its state afterwards, so unrelated contexts never
//! contend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::info;
use trophy_primitives::{ContextId, FlagArray, HandleId, ServiceLabel, TitleId, UserId};

use crate::allocator::IdAllocator;
use crate::config::CascadePolicy;
use crate::metadata::TrophySet;
use crate::unlock::UnlockState;
use crate::{Error, Result};

/// Public description of a live context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
	pub id: ContextId,
	pub user: UserId,
	pub service_label: ServiceLabel,
	pub options: u64,
	pub title: TitleId,
}

/// A live context.
#[derive(Debug)]
pub(crate) struct ContextEntry {
	pub id: ContextId,
	pub user: UserId,
	pub service_label: ServiceLabel,
	pub options: u64,
	pub set: Arc<TrophySet>,
	/// Trophies whose completion cascades the platinum, fixed at creation.
	pub cascade_mask: FlagArray,
	pub state: RwLock<UnlockState>,
	/// Handles registered for display calls, with their registration options.
	registered: Mutex<HashMap<HandleId, u64>>,
}

impl ContextEntry {
	pub fn is_registered(&self, handle: HandleId) -> bool {
		self.registered.lock().contains_key(&handle)
	}

	pub fn info(&self) -> ContextInfo {
		ContextInfo {
			id: self.id,
			user: self.user,
			service_label: self.service_label,
			options: self.options,
			title: self.set.title_id().clone(),
		}
	}
}

#[derive(Debug)]
struct ContextTable {
	ids: IdAllocator,
	live: HashMap<ContextId, Arc<ContextEntry>>,
}

/// Table of live contexts.
#[derive(Debug)]
pub struct ContextManager {
	table: Mutex<ContextTable>,
}

impl ContextManager {
	/// Creates an empty table, optionally capped at `limit` live contexts.
	pub fn new(limit: Option<u32>) -> Self {
		Self {
			table: Mutex::new(ContextTable {
				ids: IdAllocator::new("context", limit),
				live: HashMap::new(),
			}),
		}
	}

	/// Creates a context bound to `set` with nothing unlocked.
	pub fn create(
		&self,
		user: UserId,
		service_label: ServiceLabel,
		options: u64,
		set: Arc<TrophySet>,
		policy: &CascadePolicy,
	) -> Result<ContextId> {
		let state = RwLock::new(UnlockState::new(&set));
		let cascade_mask = set.cascade_mask(policy);
		let mut table = self.table.lock();
		let id = ContextId(table.ids.allocate()? as i32);
		info!(context = id.get(), user, service_label, title = %set.title_id(), "context created");
		table.live.insert(
			id,
			Arc::new(ContextEntry {
				id,
				user,
				service_label,
				options,
				set,
				cascade_mask,
				state,
				registered: Mutex::new(HashMap::new()),
			}),
		);
		Ok(id)
	}

	/// Destroys a context and frees its id.
	pub fn destroy(&self, id: ContextId) -> Result<()> {
		let mut table = self.table.lock();
		table.live.remove(&id).ok_or(Error::InvalidContext(id))?;
		table.ids.release(id.get() as u32)?;
		info!(context = id.get(), "context destroyed");
		Ok(())
	}

	/// Records that `handle` may drive display calls against context `id`.
	pub fn register(&self, id: ContextId, handle: HandleId, options: u64) -> Result<()> {
		let entry = self.get(id)?;
		entry.registered.lock().insert(handle, options);
		Ok(())
	}

	/// Drops `handle` from every context's registrations.
	pub fn forget_handle(&self, handle: HandleId) {
		let entries: Vec<_> = self.table.lock().live.values().cloned().collect();
		for entry in entries {
			entry.registered.lock().remove(&handle);
		}
	}

	pub fn info(&self, id: ContextId) -> Result<ContextInfo> {
		Ok(self.get(id)?.info())
	}

	pub fn is_live(&self, id: ContextId) -> bool {
		self.table.lock().live.contains_key(&id)
	}

	/// Number of live contexts.
	pub fn len(&self) -> usize {
		self.table.lock().live.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Destroys every context.
	pub fn clear(&self) -> usize {
		let mut table = self.table.lock();
		table.ids.reset();
		let count = table.live.len();
		table.live.clear();
		count
	}

	pub(crate) fn get(&self, id: ContextId) -> Result<Arc<ContextEntry>> {
		self.table.lock().live.get(&id).cloned().ok_or(Error::InvalidContext(id))
	}
}
