//! Icon forwarding.
//!
//! Icon bytes come from an external [`IconProvider`]; this crate neither
//! decodes nor caches them. Retrieval follows the platform's two-phase
//! protocol: without an output buffer only the required size is reported;
//! with one, as many bytes as fit are copied and the copied count returned.

use bytes::Bytes;
use trophy_primitives::{GroupId, TitleId, TrophyId};

/// Which image is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconTarget {
	Game,
	Group(GroupId),
	Trophy(TrophyId),
}

/// Supplies raw icon bytes for a loaded title.
pub trait IconProvider: Send + Sync {
	/// Returns the encoded image, or `None` if the title has no such icon.
	fn icon(&self, title: &TitleId, target: IconTarget) -> Option<Bytes>;
}

/// Applies the two-phase protocol to `icon`.
pub(crate) fn fill(icon: &[u8], buffer: Option<&mut [u8]>) -> usize {
	match buffer {
		None => icon.len(),
		Some(out) => {
			let n = icon.len().min(out.len());
			out[..n].copy_from_slice(&icon[..n]);
			n
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn size_query_reports_full_length() {
		assert_eq!(fill(&[1, 2, 3, 4], None), 4);
	}

	#[test]
	fn fill_copies_what_fits() {
		let mut small = [0u8; 2];
		assert_eq!(fill(&[1, 2, 3, 4], Some(&mut small)), 2);
		assert_eq!(small, [1, 2]);

		let mut large = [0u8; 6];
		assert_eq!(fill(&[1, 2, 3, 4], Some(&mut large)), 4);
		assert_eq!(large, [1, 2, 3, 4, 0, 0]);
	}
}
