#![allow(dead_code)]

use std::sync::Arc;

use trophy_state::primitives::{Grade, GroupId};
use trophy_state::{ManualClock, TrophyConfig, TrophyRecord, TrophyService, TrophySet};

pub const TITLE: &str = "NPWR55555_00";

/// Platinum 0, base-game trophies 1..=60, DLC group 0 with trophies 61..=80.
pub fn large_title() -> TrophySet {
	let mut builder = TrophySet::builder(TITLE, "Integration", "Shared fixture")
		.group(0, "Season Pass", "")
		.trophy(TrophyRecord::new(0, Grade::Platinum, "Platinum"));
	for id in 1..=80 {
		let grade = match id % 10 {
			0 => Grade::Gold,
			1..=3 => Grade::Silver,
			_ => Grade::Bronze,
		};
		let mut record = TrophyRecord::new(id, grade, format!("Trophy {id}"));
		if id > 60 {
			record = record.in_group(GroupId(0));
		}
		if id % 13 == 0 {
			record = record.hidden();
		}
		builder = builder.trophy(record);
	}
	builder.build().expect("fixture title is valid")
}

pub fn service_with(config: TrophyConfig) -> TrophyService {
	let _ = tracing_subscriber::fmt::try_init();
	let service = TrophyService::new(config).with_clock(Arc::new(ManualClock::new(1, 1)));
	service.load_title(large_title()).expect("title loads");
	service
}

pub fn service() -> TrophyService {
	service_with(TrophyConfig::default())
}
