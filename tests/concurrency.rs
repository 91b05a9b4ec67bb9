//=========================================================================
// Concurrency Property Tests
//=========================================================================
//
// Hammers the lock partitions and the obstacle pool from many threads.
//
//=========================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use aetheric_platformer::config::{EngineConfig, TickIntervals};
use aetheric_platformer::core::sync::{Semaphore, StopSignal, SyncFacade};
use aetheric_platformer::core::world::WorldState;
use aetheric_platformer::prelude::*;

//=== Helpers =============================================================

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn running_facade(lives: u32) -> Arc<SyncFacade> {
    let world = WorldState::from_config(&EngineConfig::default());
    let facade = Arc::new(SyncFacade::new(world, lives));
    facade.begin().unwrap();
    facade
}

fn hammer<F>(threads: usize, job: F)
where
    F: Fn(usize) + Send + Sync + 'static,
{
    let job = Arc::new(job);
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let job = Arc::clone(&job);
            thread::spawn(move || job(t))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

//=== Score Partition =====================================================

#[test]
fn no_score_update_is_lost() {
    init_logging();
    let facade = running_facade(3);

    let shared = Arc::clone(&facade);
    hammer(8, move |_| {
        for _ in 0..1000 {
            shared.add_score(10);
        }
    });

    assert_eq!(facade.score(), 8 * 1000 * 10);
}

#[test]
fn each_collectible_is_taken_exactly_once() {
    init_logging();
    let facade = running_facade(3);
    let wins = Arc::new(AtomicUsize::new(0));

    let (shared, counter) = (Arc::clone(&facade), Arc::clone(&wins));
    hammer(16, move |_| {
        for id in 0..8 {
            if shared.collect(id) {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }
    });

    assert_eq!(wins.load(Ordering::Relaxed), 8);
}

//=== Vitals Partition ====================================================

#[test]
fn concurrent_hits_never_underflow_lives() {
    init_logging();
    let facade = running_facade(5);
    let registered = Arc::new(AtomicUsize::new(0));

    let (shared, counter) = (Arc::clone(&facade), Arc::clone(&registered));
    hammer(8, move |_| {
        for _ in 0..10 {
            if shared.register_hit().registered {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }
    });

    assert_eq!(registered.load(Ordering::Relaxed), 5);
    assert_eq!(facade.lives(), 0);
    assert_eq!(facade.phase(), Phase::Over);
    assert!(facade.stop_signal().is_triggered());
}

#[test]
fn snapshots_stay_consistent_under_writes() {
    init_logging();
    let facade = running_facade(3);

    let writer = {
        let facade = Arc::clone(&facade);
        thread::spawn(move || {
            for id in 0..8 {
                if facade.collect(id) {
                    facade.add_score(10);
                }
                thread::yield_now();
            }
        })
    };

    for _ in 0..200 {
        let snapshot = facade.snapshot(Default::default());
        assert_eq!(snapshot.score % 10, 0);
        assert!(snapshot.score <= 80);
        assert!(snapshot.collectibles.len() <= 8);
    }
    writer.join().unwrap();

    let snapshot = facade.snapshot(Default::default());
    assert_eq!(snapshot.score, 80);
    assert!(snapshot.collectibles.is_empty());
}

//=== Obstacle Pool =======================================================

#[test]
fn semaphore_caps_concurrent_holders() {
    init_logging();
    let permits = Arc::new(Semaphore::new(3));
    let stop = Arc::new(StopSignal::new());

    let (sem, signal) = (Arc::clone(&permits), Arc::clone(&stop));
    hammer(12, move |_| {
        for _ in 0..20 {
            let permit = sem.acquire(&signal).unwrap();
            assert!(sem.in_use() <= 3);
            thread::sleep(Duration::from_micros(200));
            drop(permit);
        }
    });

    assert!(permits.peak() <= 3);
    assert_eq!(permits.in_use(), 0);
    assert_eq!(permits.available(), 3);
}

#[test]
fn engine_pool_never_exceeds_limit() {
    init_logging();
    let mut engine = EngineBuilder::new()
        .with_pool_limit(2)
        .with_ticks(TickIntervals {
            physics_ms: 2,
            obstacle_ms: 2,
            interaction_ms: 2,
            cosmetic_ms: 5,
        })
        .build()
        .unwrap();

    engine.start().unwrap();

    let deadline = Instant::now() + Duration::from_millis(300);
    while Instant::now() < deadline {
        let snapshot = engine.snapshot();
        assert!(snapshot.permits_in_use <= 2);
        assert_eq!(snapshot.obstacles.len(), 5);
        thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(engine.peak_permits(), 2);
    assert_eq!(engine.snapshot().active_worker_count, 8);

    let report = engine.stop();
    assert!(report.is_clean());
    assert_eq!(engine.snapshot().permits_in_use, 0);
    assert_eq!(engine.snapshot().active_worker_count, 0);
}
