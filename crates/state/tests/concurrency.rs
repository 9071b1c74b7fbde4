mod common;

use std::sync::Barrier;
use std::thread;

use trophy_state::primitives::{HandleId, TrophyId};
use trophy_state::{Error, InfoRequest, TrophyListEntry, TrophyService};

const THREADS: i32 = 8;

#[test]
fn concurrent_unlocks_in_one_context_lose_nothing() {
	let service = common::service();
	let ctx = service.create_context(1, 0, 0).unwrap();
	let barrier = Barrier::new(THREADS as usize);

	thread::scope(|scope| {
		for worker in 0..THREADS {
			let service = &service;
			let barrier = &barrier;
			scope.spawn(move || {
				let handle = service.create_handle().unwrap();
				barrier.wait();
				for id in (1..=80).filter(|id| id % THREADS == worker) {
					let outcome = service.unlock_trophy(ctx, handle, TrophyId(id)).unwrap();
					assert!(!outcome.already_unlocked);
				}
				service.destroy_handle(handle).unwrap();
			});
		}
	});

	let handle = service.create_handle().unwrap();
	let state = service.unlock_state(ctx, handle).unwrap();
	assert_eq!(state.flags.count(), 81);
	let game = service.game_info(ctx, handle, InfoRequest::FULL).unwrap();
	assert_eq!(game.data.value().unlocked_trophies, 81);
	assert_eq!(game.data.value().unlocked_platinum, 1);
	assert_eq!(game.data.value().progress_percentage, 100);
}

#[test]
fn platinum_cascades_exactly_once_under_contention() {
	let service = common::service();
	let ctx = service.create_context(1, 0, 0).unwrap();
	let handle = service.create_handle().unwrap();
	for id in 1..=78 {
		service.unlock_trophy(ctx, handle, TrophyId(id)).unwrap();
	}

	let cascades: usize = thread::scope(|scope| {
		let workers: Vec<_> = [79, 80, 79, 80]
			.into_iter()
			.map(|id| {
				let service = &service;
				scope.spawn(move || {
					let handle = service.create_handle().unwrap();
					let outcome = service.unlock_trophy(ctx, handle, TrophyId(id)).unwrap();
					usize::from(outcome.platinum.is_some())
				})
			})
			.collect();
		workers.into_iter().map(|w| w.join().unwrap()).sum()
	});
	assert_eq!(cascades, 1);
}

#[test]
fn readers_never_see_half_cascade() {
	let service = common::service();
	let ctx = service.create_context(1, 0, 0).unwrap();
	let setup = service.create_handle().unwrap();
	for id in 1..=79 {
		service.unlock_trophy(ctx, setup, TrophyId(id)).unwrap();
	}

	thread::scope(|scope| {
		let service: &TrophyService = &service;
		let reader = scope.spawn(move || {
			let handle = service.create_handle().unwrap();
			for _ in 0..2_000 {
				let state = service.unlock_state(ctx, handle).unwrap();
				let all_others = (1..=80).all(|id| state.flags.is_set(TrophyId(id)));
				assert_eq!(state.flags.is_set(TrophyId(0)), all_others);
			}
		});
		scope.spawn(move || {
			let handle = service.create_handle().unwrap();
			service.unlock_trophy(ctx, handle, TrophyId(80)).unwrap();
		});
		reader.join().unwrap();
	});
}

#[test]
fn concurrent_context_churn_keeps_ids_unique() {
	let service = common::service();
	thread::scope(|scope| {
		for user in 0..THREADS {
			let service = &service;
			scope.spawn(move || {
				for _ in 0..50 {
					let ctx = service.create_context(user, 0, 0).unwrap();
					assert_eq!(service.context_info(ctx).unwrap().user, user);
					service.destroy_context(ctx).unwrap();
				}
			});
		}
	});
	assert_eq!(service.create_context(0, 0, 0).unwrap().get(), 0);
}

#[test]
fn threads_sharing_one_handle_all_succeed() {
	let service = common::service();
	let ctx = service.create_context(1, 0, 0).unwrap();
	let handle = service.create_handle().unwrap();
	let barrier = Barrier::new(THREADS as usize);

	thread::scope(|scope| {
		for worker in 0..THREADS {
			let service = &service;
			let barrier = &barrier;
			scope.spawn(move || {
				barrier.wait();
				for id in (1..=80).filter(|id| id % THREADS == worker) {
					service.unlock_trophy(ctx, handle, TrophyId(id)).unwrap();
					service.game_info(ctx, handle, InfoRequest::FULL).unwrap();
				}
			});
		}
	});

	assert_eq!(service.unlock_state(ctx, handle).unwrap().flags.count(), 81);
}

#[test]
fn registration_never_outlives_its_handle() {
	let service = common::service();
	let ctx = service.create_context(1, 0, 0).unwrap();

	thread::scope(|scope| {
		let service = &service;
		scope.spawn(move || {
			for _ in 0..500 {
				let handle = service.create_handle().unwrap();
				service.destroy_handle(handle).unwrap();
			}
		});
		scope.spawn(move || {
			for _ in 0..500 {
				let _ = service.register_context(ctx, HandleId(0), 0);
			}
		});
	});

	let reused = service.create_handle().unwrap();
	assert_eq!(reused, HandleId(0));
	let mut rows: Vec<TrophyListEntry> = Vec::new();
	assert!(matches!(
		service.show_trophy_list(ctx, reused, &mut rows),
		Err(Error::HandleNotRegistered { .. })
	));
}
