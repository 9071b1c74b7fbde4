use pretty_assertions::assert_eq;

use super::*;

fn sample() -> TrophySet {
	TrophySet::builder("NPWR00001_00", "Sample", "A sample title")
		.group(0, "Expansion", "Extra content")
		.trophy(TrophyRecord::new(0, Grade::Platinum, "All Done"))
		.trophy(TrophyRecord::new(1, Grade::Gold, "Boss"))
		.trophy(TrophyRecord::new(2, Grade::Bronze, "Start").hidden())
		.trophy(TrophyRecord::new(5, Grade::Silver, "Explorer").in_group(GroupId(0)))
		.build()
		.unwrap()
}

#[test]
fn game_counts_derive_from_trophies() {
	let set = sample();
	assert_eq!(
		*set.game().counts(),
		GradeCounts {
			total: 4,
			platinum: 1,
			gold: 1,
			silver: 1,
			bronze: 1,
		}
	);
	assert_eq!(set.game().num_groups(), 1);
	assert_eq!(set.len(), 4);
	assert_eq!(set.platinum(), Some(TrophyId(0)));
}

#[test]
fn group_counts_partition_the_game() {
	let set = sample();
	let base = set.group(GroupId::BASE_GAME).unwrap();
	let dlc = set.group(GroupId(0)).unwrap();
	assert_eq!(base.counts().total, 3);
	assert_eq!(dlc.counts().total, 1);
	assert_eq!(dlc.counts().silver, 1);
	assert!(dlc.members().is_set(TrophyId(5)));
	assert_eq!(base.title.as_str(), "Sample");

	let summed: u32 = set.groups().map(|g| g.counts().total).sum();
	assert_eq!(summed, set.game().counts().total);
}

#[test]
fn unknown_lookups_fail() {
	let set = sample();
	assert!(matches!(set.group(GroupId(7)), Err(Error::InvalidGroupId(GroupId(7)))));
	assert!(matches!(set.trophy(TrophyId(3)), Err(Error::InvalidTrophyId(TrophyId(3)))));
	assert!(matches!(set.trophy(TrophyId(200)), Err(Error::InvalidTrophyId(_))));
}

#[test]
fn cascade_mask_follows_policy() {
	let set = sample();
	let all = set.cascade_mask(&CascadePolicy::default());
	assert_eq!(all.iter().map(TrophyId::get).collect::<Vec<_>>(), vec![1, 2, 5]);

	let visible_base = set.cascade_mask(&CascadePolicy {
		include_hidden: false,
		include_dlc_groups: false,
	});
	assert_eq!(visible_base.iter().map(TrophyId::get).collect::<Vec<_>>(), vec![1]);
}

#[test]
fn rejects_second_platinum() {
	let err = TrophySet::builder("T", "t", "")
		.trophy(TrophyRecord::new(0, Grade::Platinum, "a"))
		.trophy(TrophyRecord::new(1, Grade::Platinum, "b"))
		.build()
		.unwrap_err();
	assert!(matches!(err, Error::InvalidTitle(_)));
}

#[test]
fn rejects_duplicate_and_out_of_range_ids() {
	let dup = TrophySet::builder("T", "t", "")
		.trophy(TrophyRecord::new(3, Grade::Gold, "a"))
		.trophy(TrophyRecord::new(3, Grade::Bronze, "b"))
		.build();
	assert!(matches!(dup, Err(Error::InvalidTitle(_))));

	let range = TrophySet::builder("T", "t", "")
		.trophy(TrophyRecord::new(128, Grade::Gold, "a"))
		.build();
	assert!(matches!(range, Err(Error::InvalidTitle(_))));
}

#[test]
fn rejects_undeclared_and_reserved_groups() {
	let undeclared = TrophySet::builder("T", "t", "")
		.trophy(TrophyRecord::new(0, Grade::Gold, "a").in_group(GroupId(4)))
		.build();
	assert!(matches!(undeclared, Err(Error::InvalidTitle(_))));

	let reserved = TrophySet::builder("T", "t", "").group(-2, "bad", "").build();
	assert!(matches!(reserved, Err(Error::InvalidTitle(_))));

	let duplicate = TrophySet::builder("T", "t", "").group(1, "a", "").group(1, "b", "").build();
	assert!(matches!(duplicate, Err(Error::InvalidTitle(_))));
}

#[test]
fn builds_from_toml_definition() {
	let def: TitleDefinition = toml::from_str(
		r#"
		id = "NPWR12345_00"
		title = "Toml Title"

		[[groups]]
		id = 0
		title = "DLC"

		[[trophies]]
		id = 0
		grade = "platinum"
		name = "Platinum"

		[[trophies]]
		id = 1
		grade = "bronze"
		name = "First"
		hidden = true

		[[trophies]]
		id = 2
		grade = "gold"
		group = 0
		name = "Extra"
		"#,
	)
	.unwrap();
	let set = TrophySet::from_definition(def).unwrap();
	assert_eq!(set.title_id().as_str(), "NPWR12345_00");
	assert_eq!(set.game().title.as_str(), "Toml Title");
	assert!(set.trophy(TrophyId(1)).unwrap().hidden);
	assert_eq!(set.trophy(TrophyId(2)).unwrap().group, GroupId(0));
	assert_eq!(set.group(GroupId(0)).unwrap().counts().gold, 1);
}
