//! Service configuration.
//!
//! Every field has a default, so an empty document is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level configuration for a [`TrophyService`](crate::TrophyService).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrophyConfig {
	/// Caps on concurrently live ids.
	pub limits: Limits,
	/// Which trophies must be unlocked before the platinum cascades.
	pub cascade: CascadePolicy,
}

impl TrophyConfig {
	/// Parses a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}
}

/// Upper bounds on live contexts and handles. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
	pub max_contexts: Option<u32>,
	pub max_handles: Option<u32>,
}

/// Eligibility rule for the platinum cascade.
///
/// A non-platinum trophy counts toward the platinum unless the policy
/// excludes it. If nothing is eligible the platinum never cascades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CascadePolicy {
	/// Hidden trophies count toward the platinum.
	pub include_hidden: bool,
	/// Trophies in downloadable-content groups count toward the platinum.
	pub include_dlc_groups: bool,
}

impl Default for CascadePolicy {
	fn default() -> Self {
		Self {
			include_hidden: true,
			include_dlc_groups: true,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_document_uses_defaults() {
		let config = TrophyConfig::from_toml_str("").unwrap();
		assert_eq!(config, TrophyConfig::default());
		assert!(config.cascade.include_hidden);
		assert_eq!(config.limits.max_contexts, None);
	}

	#[test]
	fn parses_all_sections() {
		let config = TrophyConfig::from_toml_str(
			r#"
			[limits]
			max_contexts = 4
			max_handles = 2

			[cascade]
			include_hidden = false
			include_dlc_groups = false
			"#,
		)
		.unwrap();
		assert_eq!(
			config,
			TrophyConfig {
				limits: Limits {
					max_contexts: Some(4),
					max_handles: Some(2),
				},
				cascade: CascadePolicy {
					include_hidden: false,
					include_dlc_groups: false,
				},
			}
		);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = TrophyConfig::from_toml_str("[limits]\nmax_windows = 3").unwrap_err();
		assert!(matches!(err, crate::Error::Config(_)));
	}
}
