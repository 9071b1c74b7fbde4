//! Platform clock ticks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Microseconds between 0001-01-01 and the Unix epoch.
const UNIX_EPOCH_TICKS: u64 = 62_135_596_800_000_000;

/// Platform RTC tick: microseconds since 0001-01-01 00:00:00 UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RtcTick(pub u64);

impl RtcTick {
	/// Converts a UTC timestamp. Instants before year 1 clamp to zero.
	pub fn from_datetime(at: DateTime<Utc>) -> Self {
		let micros = i128::from(at.timestamp_micros()) + i128::from(UNIX_EPOCH_TICKS);
		Self(u64::try_from(micros.max(0)).unwrap_or(u64::MAX))
	}

	/// Converts back to a UTC timestamp, if representable.
	pub fn to_datetime(self) -> Option<DateTime<Utc>> {
		let since_unix = i64::try_from(i128::from(self.0) - i128::from(UNIX_EPOCH_TICKS)).ok()?;
		DateTime::from_timestamp_micros(since_unix)
	}

	pub const fn get(self) -> u64 {
		self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unix_epoch_maps_to_offset() {
		let epoch = DateTime::from_timestamp(0, 0).unwrap();
		assert_eq!(RtcTick::from_datetime(epoch), RtcTick(UNIX_EPOCH_TICKS));
		assert_eq!(RtcTick(UNIX_EPOCH_TICKS).to_datetime(), Some(epoch));
	}

	#[test]
	fn ticks_are_microseconds() {
		let a = DateTime::from_timestamp(10, 0).unwrap();
		let b = DateTime::from_timestamp(11, 500_000).unwrap();
		assert_eq!(RtcTick::from_datetime(b).get() - RtcTick::from_datetime(a).get(), 1_500_000);
	}
}
