//! Length-bounded text for fixed-size platform string fields.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Byte capacity of a trophy name, including the terminator.
pub const TROPHY_NAME_MAX: usize = 128;
/// Byte capacity of a trophy description, including the terminator.
pub const TROPHY_DESCR_MAX: usize = 1024;
/// Byte capacity of a game title, including the terminator.
pub const GAME_TITLE_MAX: usize = 128;
/// Byte capacity of a game description, including the terminator.
pub const GAME_DESCR_MAX: usize = 1024;
/// Byte capacity of a group title, including the terminator.
pub const GROUP_TITLE_MAX: usize = 128;
/// Byte capacity of a group description, including the terminator.
pub const GROUP_DESCR_MAX: usize = 1024;

/// UTF-8 text that fits a `MAX`-byte NUL-terminated field.
///
/// At most `MAX - 1` bytes are kept. Longer input is cut at the last char
/// boundary that fits; interior NULs end the text as they would on the platform.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BoundedText<const MAX: usize>(String);

impl<const MAX: usize> BoundedText<MAX> {
	/// Largest number of content bytes kept.
	pub const CAPACITY: usize = MAX - 1;

	/// Builds bounded text, truncating if needed.
	pub fn new(text: impl Into<String>) -> Self {
		let mut text = text.into();
		if let Some(nul) = text.find('\0') {
			text.truncate(nul);
		}
		if text.len() > Self::CAPACITY {
			let mut cut = Self::CAPACITY;
			while !text.is_char_boundary(cut) {
				cut -= 1;
			}
			text.truncate(cut);
		}
		Self(text)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Writes the text as a zero-padded `MAX`-byte field.
	pub fn to_field(&self) -> [u8; MAX] {
		let mut field = [0u8; MAX];
		field[..self.0.len()].copy_from_slice(self.0.as_bytes());
		field
	}
}

impl<const MAX: usize> Deref for BoundedText<MAX> {
	type Target = str;

	fn deref(&self) -> &str {
		&self.0
	}
}

impl<const MAX: usize> From<String> for BoundedText<MAX> {
	fn from(text: String) -> Self {
		Self::new(text)
	}
}

impl<const MAX: usize> From<&str> for BoundedText<MAX> {
	fn from(text: &str) -> Self {
		Self::new(text)
	}
}

impl<const MAX: usize> From<BoundedText<MAX>> for String {
	fn from(text: BoundedText<MAX>) -> Self {
		text.0
	}
}

impl<const MAX: usize> fmt::Debug for BoundedText<MAX> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.0, f)
	}
}

impl<const MAX: usize> fmt::Display for BoundedText<MAX> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

pub type TrophyName = BoundedText<TROPHY_NAME_MAX>;
pub type TrophyDescription = BoundedText<TROPHY_DESCR_MAX>;
pub type GameTitle = BoundedText<GAME_TITLE_MAX>;
pub type GameDescription = BoundedText<GAME_DESCR_MAX>;
pub type GroupTitle = BoundedText<GROUP_TITLE_MAX>;
pub type GroupDescription = BoundedText<GROUP_DESCR_MAX>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_text_is_kept() {
		let name = TrophyName::new("First Blood");
		assert_eq!(name.as_str(), "First Blood");
	}

	#[test]
	fn long_text_is_truncated_to_capacity() {
		let name = TrophyName::new("x".repeat(500));
		assert_eq!(name.len(), TROPHY_NAME_MAX - 1);
		assert_eq!(name.to_field()[TROPHY_NAME_MAX - 1], 0);
	}

	#[test]
	fn truncation_respects_char_boundaries() {
		let text = BoundedText::<5>::new("aéé");
		assert_eq!(text.as_str(), "aé");
	}

	#[test]
	fn interior_nul_terminates() {
		let text = TrophyName::new("abc\0def");
		assert_eq!(text.as_str(), "abc");
	}

	#[test]
	fn deserialize_truncates() {
		#[derive(Deserialize)]
		struct Holder {
			name: BoundedText<4>,
		}
		let holder: Holder = toml::from_str("name = \"abcdef\"").unwrap();
		assert_eq!(holder.name.as_str(), "abc");
	}
}
