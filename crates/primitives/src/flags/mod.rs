//! Packed unlock flags.
//!
//! A [`FlagArray`] is the platform's 128-bit trophy set: four 32-bit words,
//! word index `id >> 5`, bit index `id & 31`. The words are public because
//! callers receive the array as a raw snapshot.

use serde::{Deserialize, Serialize};

use crate::ids::{TROPHY_NUM_MAX, TrophyId};

/// Bits per flag word, as a shift.
pub const FLAG_BITS_SHIFT: u32 = 5;
/// Number of 32-bit words in a [`FlagArray`].
pub const FLAG_WORDS: usize = TROPHY_NUM_MAX >> FLAG_BITS_SHIFT;

/// Failure of a bit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
	/// The trophy id lies outside `[0, 128)`.
	#[error("trophy id {0} is outside the flag range")]
	OutOfRange(TrophyId),
}

/// Fixed-capacity bit set of trophy ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct FlagArray {
	pub flag_bits: [u32; FLAG_WORDS],
}

#[inline]
fn locate(id: TrophyId) -> Result<(usize, u32), FlagError> {
	let index = id.index().ok_or(FlagError::OutOfRange(id))?;
	Ok((index >> FLAG_BITS_SHIFT, 1 << (index & 31)))
}

impl FlagArray {
	/// An array with every bit clear.
	pub const EMPTY: Self = Self { flag_bits: [0; FLAG_WORDS] };

	/// Creates an empty array.
	pub const fn new() -> Self {
		Self::EMPTY
	}

	/// Clears every bit.
	pub fn zero(&mut self) {
		self.flag_bits = [0; FLAG_WORDS];
	}

	/// Sets every bit, including ids a title may not define.
	pub fn set_all(&mut self) {
		self.flag_bits = [u32::MAX; FLAG_WORDS];
	}

	/// Sets the bit for `id`.
	///
	/// # Errors
	///
	/// Returns [`FlagError::OutOfRange`] and leaves the array untouched if `id`
	/// is not a valid flag index.
	pub fn set(&mut self, id: TrophyId) -> Result<(), FlagError> {
		let (word, mask) = locate(id)?;
		self.flag_bits[word] |= mask;
		Ok(())
	}

	/// Clears the bit for `id`.
	///
	/// # Errors
	///
	/// Returns [`FlagError::OutOfRange`] and leaves the array untouched if `id`
	/// is not a valid flag index.
	pub fn clear(&mut self, id: TrophyId) -> Result<(), FlagError> {
		let (word, mask) = locate(id)?;
		self.flag_bits[word] &= !mask;
		Ok(())
	}

	/// Returns true if the bit for `id` is set. Out-of-range ids are never set.
	#[inline]
	pub fn is_set(&self, id: TrophyId) -> bool {
		match locate(id) {
			Ok((word, mask)) => self.flag_bits[word] & mask != 0,
			Err(_) => false,
		}
	}

	/// Number of set bits.
	pub fn count(&self) -> u32 {
		self.flag_bits.iter().map(|w| w.count_ones()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.flag_bits.iter().all(|&w| w == 0)
	}

	/// Bits set in both arrays.
	#[must_use]
	pub fn intersection(&self, other: &Self) -> Self {
		let mut out = *self;
		for (a, b) in out.flag_bits.iter_mut().zip(other.flag_bits) {
			*a &= b;
		}
		out
	}

	/// Returns true if every bit set in `other` is also set in `self`.
	pub fn contains_all(&self, other: &Self) -> bool {
		self.flag_bits.iter().zip(other.flag_bits).all(|(a, b)| a & b == b)
	}

	/// Builds a set from `ids`, failing on the first id outside the range.
	pub fn try_from_ids(ids: impl IntoIterator<Item = TrophyId>) -> Result<Self, FlagError> {
		let mut flags = Self::new();
		for id in ids {
			flags.set(id)?;
		}
		Ok(flags)
	}

	/// Iterates set ids in ascending order.
	pub fn iter(&self) -> impl Iterator<Item = TrophyId> + '_ {
		(0..TROPHY_NUM_MAX as i32).map(TrophyId).filter(|&id| self.is_set(id))
	}
}
