//! Operation handles.
//!
//! A handle scopes any number of concurrent operations. Each handle owns one
//! generation-tagged cancellation token and every [`Operation`] started on it
//! holds a child of that token. [`HandleManager::abort`] cancels the current
//! generation without touching any context lock and installs a fresh token,
//! so operations begun afterwards are unaffected. Aborted operations observe
//! the cancellation at their next [`Operation::checkpoint`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use trophy_primitives::HandleId;

use crate::allocator::IdAllocator;
use crate::{Error, Result};

/// Lifecycle status of a live handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleStatus {
	/// No outstanding operation.
	Idle,
	/// At least one operation is outstanding.
	Busy,
}

/// Cancellation token for one generation of operations.
#[derive(Debug, Clone, Default)]
struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	/// Cancels this generation and returns its successor.
	fn advance(&self) -> Self {
		self.cancel.cancel();
		Self {
			generation: self.generation.wrapping_add(1),
			cancel: CancellationToken::new(),
		}
	}
}

#[derive(Debug, Default)]
struct HandleSlot {
	token: GenerationToken,
	outstanding: usize,
}

#[derive(Debug, Default)]
struct HandleEntry {
	slot: Mutex<HandleSlot>,
}

impl HandleEntry {
	fn cancel_all(&self) {
		let mut slot = self.slot.lock();
		slot.token = slot.token.advance();
	}
}

#[derive(Debug)]
struct HandleTable {
	ids: IdAllocator,
	live: HashMap<HandleId, Arc<HandleEntry>>,
}

/// Table of live handles.
#[derive(Debug)]
pub struct HandleManager {
	table: Mutex<HandleTable>,
}

impl HandleManager {
	/// Creates an empty table, optionally capped at `limit` live handles.
	pub fn new(limit: Option<u32>) -> Self {
		Self {
			table: Mutex::new(HandleTable {
				ids: IdAllocator::new("handle", limit),
				live: HashMap::new(),
			}),
		}
	}

	pub fn create(&self) -> Result<HandleId> {
		let mut table = self.table.lock();
		let id = HandleId(table.ids.allocate()? as i32);
		table.live.insert(id, Arc::default());
		debug!(handle = id.get(), "handle created");
		Ok(id)
	}

	/// Destroys a handle, cancelling its outstanding operations.
	pub fn destroy(&self, id: HandleId) -> Result<()> {
		self.destroy_with(id, |_| ())
	}

	/// Destroys a handle and runs `then` while the handle table is still
	/// locked, so no other caller observes the id as live or reuses it before
	/// `then` returns.
	pub(crate) fn destroy_with(&self, id: HandleId, then: impl FnOnce(HandleId)) -> Result<()> {
		let entry = {
			let mut table = self.table.lock();
			let entry = table.live.remove(&id).ok_or(Error::InvalidHandle(id))?;
			table.ids.release(id.get() as u32)?;
			then(id);
			entry
		};
		entry.cancel_all();
		debug!(handle = id.get(), "handle destroyed");
		Ok(())
	}

	/// Requests cancellation of every operation outstanding on the handle.
	///
	/// Returns true if any operation was outstanding. Aborting an idle handle
	/// changes nothing. Operations begun after the abort are not cancelled.
	pub fn abort(&self, id: HandleId) -> Result<bool> {
		let entry = self.entry(id)?;
		let mut slot = entry.slot.lock();
		if slot.outstanding == 0 {
			return Ok(false);
		}
		debug!(
			handle = id.get(),
			generation = slot.token.generation,
			outstanding = slot.outstanding,
			"operation abort requested"
		);
		slot.token = slot.token.advance();
		Ok(true)
	}

	pub fn status(&self, id: HandleId) -> Result<HandleStatus> {
		let entry = self.entry(id)?;
		let busy = entry.slot.lock().outstanding > 0;
		Ok(if busy { HandleStatus::Busy } else { HandleStatus::Idle })
	}

	pub fn is_live(&self, id: HandleId) -> bool {
		self.table.lock().live.contains_key(&id)
	}

	/// Runs `f` while the handle table is locked, passing whether `id` is live.
	pub(crate) fn with_live<R>(&self, id: HandleId, f: impl FnOnce(bool) -> R) -> R {
		let table = self.table.lock();
		f(table.live.contains_key(&id))
	}

	/// Number of live handles.
	pub fn len(&self) -> usize {
		self.table.lock().live.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Starts an operation scoped by `id`.
	///
	/// Any number of operations may share a handle.
	///
	/// # Errors
	///
	/// [`Error::InvalidHandle`] if the handle is not live.
	pub fn begin(&self, id: HandleId) -> Result<Operation> {
		let entry = self.entry(id)?;
		let token = {
			let mut slot = entry.slot.lock();
			slot.outstanding += 1;
			GenerationToken {
				generation: slot.token.generation,
				cancel: slot.token.cancel.child_token(),
			}
		};
		Ok(Operation { handle: id, entry, token })
	}

	/// Destroys every handle, cancelling outstanding operations.
	pub fn clear(&self) -> usize {
		let entries: Vec<_> = {
			let mut table = self.table.lock();
			table.ids.reset();
			table.live.drain().map(|(_, entry)| entry).collect()
		};
		for entry in &entries {
			entry.cancel_all();
		}
		entries.len()
	}

	fn entry(&self, id: HandleId) -> Result<Arc<HandleEntry>> {
		self.table.lock().live.get(&id).cloned().ok_or(Error::InvalidHandle(id))
	}
}

/// One outstanding operation. Dropping it releases its hold on the handle.
#[derive(Debug)]
pub struct Operation {
	handle: HandleId,
	entry: Arc<HandleEntry>,
	token: GenerationToken,
}

impl Operation {
	pub fn handle(&self) -> HandleId {
		self.handle
	}

	pub fn is_aborted(&self) -> bool {
		self.token.cancel.is_cancelled()
	}

	/// Safe point: fails with [`Error::Aborted`] once abort was requested.
	pub fn checkpoint(&self) -> Result<()> {
		if self.is_aborted() {
			debug!(handle = self.handle.get(), generation = self.token.generation, "operation aborted");
			return Err(Error::Aborted(self.handle));
		}
		Ok(())
	}
}

impl Drop for Operation {
	fn drop(&mut self) {
		let mut slot = self.entry.slot.lock();
		slot.outstanding = slot.outstanding.saturating_sub(1);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_are_reused_after_destroy() {
		let handles = HandleManager::new(None);
		let a = handles.create().unwrap();
		let b = handles.create().unwrap();
		assert_eq!((a, b), (HandleId(0), HandleId(1)));
		handles.destroy(a).unwrap();
		assert_eq!(handles.create().unwrap(), HandleId(0));
	}

	#[test]
	fn unknown_handles_are_rejected() {
		let handles = HandleManager::new(None);
		assert!(matches!(handles.destroy(HandleId(3)), Err(Error::InvalidHandle(HandleId(3)))));
		assert!(matches!(handles.abort(HandleId::INVALID), Err(Error::InvalidHandle(_))));
		assert!(matches!(handles.begin(HandleId(0)), Err(Error::InvalidHandle(_))));
	}

	#[test]
	fn abort_idle_handle_is_noop() {
		let handles = HandleManager::new(None);
		let id = handles.create().unwrap();
		assert!(!handles.abort(id).unwrap());
		assert_eq!(handles.status(id).unwrap(), HandleStatus::Idle);
		let op = handles.begin(id).unwrap();
		assert!(op.checkpoint().is_ok());
	}

	#[test]
	fn abort_cancels_outstanding_operation() {
		let handles = HandleManager::new(None);
		let id = handles.create().unwrap();
		let op = handles.begin(id).unwrap();
		assert_eq!(handles.status(id).unwrap(), HandleStatus::Busy);
		assert!(handles.abort(id).unwrap());
		assert!(matches!(op.checkpoint(), Err(Error::Aborted(h)) if h == id));
		drop(op);
		assert_eq!(handles.status(id).unwrap(), HandleStatus::Idle);

		let next = handles.begin(id).unwrap();
		assert!(!next.is_aborted());
	}

	#[test]
	fn operations_share_a_handle() {
		let handles = HandleManager::new(None);
		let id = handles.create().unwrap();
		let first = handles.begin(id).unwrap();
		let second = handles.begin(id).unwrap();
		assert_eq!(handles.status(id).unwrap(), HandleStatus::Busy);

		drop(first);
		assert_eq!(handles.status(id).unwrap(), HandleStatus::Busy);
		drop(second);
		assert_eq!(handles.status(id).unwrap(), HandleStatus::Idle);
	}

	#[test]
	fn abort_cancels_every_outstanding_operation() {
		let handles = HandleManager::new(None);
		let id = handles.create().unwrap();
		let a = handles.begin(id).unwrap();
		let b = handles.begin(id).unwrap();
		assert!(handles.abort(id).unwrap());
		assert!(a.is_aborted());
		assert!(b.is_aborted());

		let later = handles.begin(id).unwrap();
		assert!(later.checkpoint().is_ok());
		drop((a, b));
		assert!(handles.abort(id).unwrap());
		assert!(later.is_aborted());
	}

	#[test]
	fn destroy_cancels_outstanding_operation() {
		let handles = HandleManager::new(None);
		let id = handles.create().unwrap();
		let op = handles.begin(id).unwrap();
		handles.destroy(id).unwrap();
		assert!(op.is_aborted());
		assert!(!handles.is_live(id));
	}

	#[test]
	fn limit_applies_to_live_handles() {
		let handles = HandleManager::new(Some(1));
		let id = handles.create().unwrap();
		assert!(matches!(handles.create(), Err(Error::AllocatorExhausted { kind: "handle", .. })));
		handles.destroy(id).unwrap();
		assert!(handles.create().is_ok());
	}

	#[test]
	fn clear_releases_everything() {
		let handles = HandleManager::new(None);
		handles.create().unwrap();
		let id = handles.create().unwrap();
		let op = handles.begin(id).unwrap();
		assert_eq!(handles.clear(), 2);
		assert!(op.is_aborted());
		assert!(handles.is_empty());
		assert_eq!(handles.create().unwrap(), HandleId(0));
	}
}
