//! Error types for trophy state operations.

use trophy_primitives::{ContextId, FlagError, GroupId, HandleId, TitleId, TrophyId};

/// Result type for trophy state operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures reported to the immediate caller.
///
/// No variant implies a partial mutation: operations that fail leave every
/// context, handle and title untouched.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The context id does not name a live context.
	#[error("invalid context {0}")]
	InvalidContext(ContextId),
	/// The handle id does not name a live handle.
	#[error("invalid handle {0}")]
	InvalidHandle(HandleId),
	/// The trophy id is out of range or not defined by the bound title.
	#[error("invalid trophy id {0}")]
	InvalidTrophyId(TrophyId),
	/// The group id is not defined by the bound title.
	#[error("invalid group id {0}")]
	InvalidGroupId(GroupId),
	/// A caller-declared capacity is smaller than the structure it receives.
	#[error("buffer too small: {declared} of {required} bytes")]
	BufferTooSmall { declared: usize, required: usize },
	/// The configured limit of live ids is reached.
	#[error("no free {kind} ids (limit {limit})")]
	AllocatorExhausted { kind: &'static str, limit: u32 },
	/// Released an id that was not allocated.
	#[error("{kind} id {id} is not allocated")]
	NotAllocated { kind: &'static str, id: u32 },
	/// The platinum trophy is only unlocked by completing the others.
	#[error("platinum trophy {0} cannot be unlocked directly")]
	PlatinumCannotUnlock(TrophyId),
	/// The handle was not registered with the context for display calls.
	#[error("handle {handle} is not registered with context {context}")]
	HandleNotRegistered { context: ContextId, handle: HandleId },
	/// The operation was aborted through its handle.
	#[error("operation on handle {0} was aborted")]
	Aborted(HandleId),
	/// No title is loaded and active.
	#[error("no active title")]
	NoActiveTitle,
	/// The title id is not loaded.
	#[error("unknown title {0}")]
	UnknownTitle(TitleId),
	/// The title was already loaded; trophy sets are installed once.
	#[error("title {0} is already loaded")]
	TitleAlreadyLoaded(TitleId),
	/// The trophy set definition is internally inconsistent.
	#[error("invalid trophy set: {0}")]
	InvalidTitle(String),
	/// The icon provider has no image for the request.
	#[error("icon unavailable")]
	IconUnavailable,
	/// Configuration could not be parsed.
	#[error("config parse error: {0}")]
	Config(#[from] toml::de::Error),
}

impl From<FlagError> for Error {
	fn from(err: FlagError) -> Self {
		match err {
			FlagError::OutOfRange(id) => Self::InvalidTrophyId(id),
		}
	}
}
