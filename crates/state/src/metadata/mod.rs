//! Per-title trophy metadata.
//!
//! A [`TrophySet`] is built once by whatever loads the title's trophy
//! definitions and is shared read-only afterwards. Per-group and per-game
//! grade counts are derived from the trophy records while building, so they
//! always agree with them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trophy_primitives::{
	FlagArray, GameDescription, GameTitle, Grade, GradeCounts, GroupDescription, GroupId, GroupTitle, TitleId,
	TrophyDescription, TrophyId, TrophyName,
};

use crate::config::CascadePolicy;
use crate::{Error, Result};

/// One trophy as defined by the title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrophyRecord {
	pub id: TrophyId,
	pub grade: Grade,
	#[serde(default)]
	pub group: GroupId,
	#[serde(default)]
	pub hidden: bool,
	pub name: TrophyName,
	#[serde(default)]
	pub description: TrophyDescription,
}

impl TrophyRecord {
	pub fn new(id: i32, grade: Grade, name: impl Into<String>) -> Self {
		Self {
			id: TrophyId(id),
			grade,
			group: GroupId::BASE_GAME,
			hidden: false,
			name: TrophyName::new(name),
			description: TrophyDescription::default(),
		}
	}

	pub fn in_group(mut self, group: GroupId) -> Self {
		self.group = group;
		self
	}

	pub fn hidden(mut self) -> Self {
		self.hidden = true;
		self
	}

	pub fn describe(mut self, description: impl Into<String>) -> Self {
		self.description = TrophyDescription::new(description);
		self
	}
}

/// A trophy group with counts derived from its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
	pub id: GroupId,
	pub title: GroupTitle,
	pub description: GroupDescription,
	counts: GradeCounts,
	members: FlagArray,
}

impl GroupRecord {
	/// Trophies in this group, by grade.
	pub fn counts(&self) -> &GradeCounts {
		&self.counts
	}

	/// Flag set of this group's trophy ids.
	pub fn members(&self) -> &FlagArray {
		&self.members
	}
}

/// Title-wide metadata with counts derived from every trophy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
	pub title: GameTitle,
	pub description: GameDescription,
	counts: GradeCounts,
	num_groups: u32,
}

impl GameRecord {
	pub fn counts(&self) -> &GradeCounts {
		&self.counts
	}

	/// Number of downloadable-content groups; the base game set is not counted.
	pub fn num_groups(&self) -> u32 {
		self.num_groups
	}
}

/// Immutable trophy metadata for one title.
#[derive(Debug, Clone)]
pub struct TrophySet {
	title_id: TitleId,
	game: GameRecord,
	groups: BTreeMap<GroupId, GroupRecord>,
	trophies: BTreeMap<TrophyId, TrophyRecord>,
	defined: FlagArray,
	platinum: Option<TrophyId>,
}

impl TrophySet {
	/// Starts building the set for `title_id`.
	pub fn builder(
		title_id: impl Into<String>,
		title: impl Into<String>,
		description: impl Into<String>,
	) -> TrophySetBuilder {
		TrophySetBuilder {
			title_id: TitleId::new(title_id),
			title: GameTitle::new(title),
			description: GameDescription::new(description),
			groups: Vec::new(),
			trophies: Vec::new(),
		}
	}

	/// Builds a set from a deserialized definition.
	pub fn from_definition(def: TitleDefinition) -> Result<Self> {
		let mut builder = Self::builder(def.id.0, String::from(def.title), String::from(def.description));
		builder.groups = def.groups;
		builder.trophies = def.trophies;
		builder.build()
	}

	pub fn title_id(&self) -> &TitleId {
		&self.title_id
	}

	pub fn game(&self) -> &GameRecord {
		&self.game
	}

	/// Looks up a group; [`GroupId::BASE_GAME`] is always present.
	pub fn group(&self, id: GroupId) -> Result<&GroupRecord> {
		self.groups.get(&id).ok_or(Error::InvalidGroupId(id))
	}

	/// Groups in id order, base game first.
	pub fn groups(&self) -> impl Iterator<Item = &GroupRecord> {
		self.groups.values()
	}

	/// Looks up a trophy defined by this title.
	pub fn trophy(&self, id: TrophyId) -> Result<&TrophyRecord> {
		self.trophies.get(&id).ok_or(Error::InvalidTrophyId(id))
	}

	/// Trophies in id order.
	pub fn trophies(&self) -> impl Iterator<Item = &TrophyRecord> {
		self.trophies.values()
	}

	/// Flag set of every defined trophy id.
	pub fn defined(&self) -> &FlagArray {
		&self.defined
	}

	/// Number of defined trophies.
	pub fn len(&self) -> u32 {
		self.trophies.len() as u32
	}

	pub fn is_empty(&self) -> bool {
		self.trophies.is_empty()
	}

	/// The title's platinum trophy, if it has one.
	pub fn platinum(&self) -> Option<TrophyId> {
		self.platinum
	}

	/// Trophies that must all be unlocked for the platinum to cascade.
	pub fn cascade_mask(&self, policy: &CascadePolicy) -> FlagArray {
		FlagArray::try_from_ids(
			self.trophies
				.values()
				.filter(|t| !t.grade.is_platinum())
				.filter(|t| policy.include_hidden || !t.hidden)
				.filter(|t| policy.include_dlc_groups || !t.group.is_dlc())
				.map(|t| t.id),
		)
		.expect("trophy ids are range-checked by TrophySetBuilder::build")
	}
}

/// Serializable description of a title's trophies, as produced by a loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleDefinition {
	pub id: TitleId,
	pub title: GameTitle,
	#[serde(default)]
	pub description: GameDescription,
	#[serde(default)]
	pub groups: Vec<GroupDefinition>,
	pub trophies: Vec<TrophyRecord>,
}

/// Declared downloadable-content group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
	pub id: GroupId,
	pub title: GroupTitle,
	#[serde(default)]
	pub description: GroupDescription,
}

/// Validating builder for [`TrophySet`].
#[derive(Debug)]
pub struct TrophySetBuilder {
	title_id: TitleId,
	title: GameTitle,
	description: GameDescription,
	groups: Vec<GroupDefinition>,
	trophies: Vec<TrophyRecord>,
}

impl TrophySetBuilder {
	/// Declares a downloadable-content group.
	pub fn group(mut self, id: i32, title: impl Into<String>, description: impl Into<String>) -> Self {
		self.groups.push(GroupDefinition {
			id: GroupId(id),
			title: GroupTitle::new(title),
			description: GroupDescription::new(description),
		});
		self
	}

	pub fn trophy(mut self, record: TrophyRecord) -> Self {
		self.trophies.push(record);
		self
	}

	/// Validates the definitions and derives the aggregate counts.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidTitle`] for out-of-range or duplicate trophy ids,
	/// duplicate or reserved group ids, trophies in undeclared groups, or more
	/// than one platinum trophy.
	pub fn build(self) -> Result<TrophySet> {
		let mut groups = BTreeMap::new();
		groups.insert(
			GroupId::BASE_GAME,
			GroupRecord {
				id: GroupId::BASE_GAME,
				title: GroupTitle::new(self.title.as_str()),
				description: GroupDescription::new(self.description.as_str()),
				counts: GradeCounts::default(),
				members: FlagArray::new(),
			},
		);
		for def in self.groups {
			if !def.id.is_dlc() {
				return Err(Error::InvalidTitle(format!("reserved group id {}", def.id.get())));
			}
			let record = GroupRecord {
				id: def.id,
				title: def.title,
				description: def.description,
				counts: GradeCounts::default(),
				members: FlagArray::new(),
			};
			if groups.insert(def.id, record).is_some() {
				return Err(Error::InvalidTitle(format!("duplicate group {}", def.id)));
			}
		}

		let mut trophies = BTreeMap::new();
		let mut defined = FlagArray::new();
		let mut counts = GradeCounts::default();
		let mut platinum = None;
		for record in self.trophies {
			let id = record.id;
			if id.index().is_none() {
				return Err(Error::InvalidTitle(format!("trophy id {id} out of range")));
			}
			let group = groups
				.get_mut(&record.group)
				.ok_or_else(|| Error::InvalidTitle(format!("trophy {id} references undeclared group {}", record.group)))?;
			if record.grade.is_platinum() {
				if let Some(existing) = platinum {
					return Err(Error::InvalidTitle(format!("second platinum trophy {id} (first {existing})")));
				}
				platinum = Some(id);
			}
			defined.set(id)?;
			group.members.set(id)?;
			group.counts.add(record.grade);
			counts.add(record.grade);
			if trophies.insert(id, record).is_some() {
				return Err(Error::InvalidTitle(format!("duplicate trophy id {id}")));
			}
		}

		let num_groups = groups.keys().filter(|id| id.is_dlc()).count() as u32;
		Ok(TrophySet {
			title_id: self.title_id,
			game: GameRecord {
				title: self.title,
				description: self.description,
				counts,
				num_groups,
			},
			groups,
			trophies,
			defined,
			platinum,
		})
	}
}

#[cfg(test)]
mod tests;
