//=========================================================================
// Engine Lifecycle Tests
//=========================================================================
//
// Drives a real engine through start, play and shutdown with fast ticks.
//
//=========================================================================

use std::time::{Duration, Instant};

use aetheric_platformer::config::TickIntervals;
use aetheric_platformer::prelude::*;

//=== Helpers =============================================================

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fast_ticks() -> TickIntervals {
    TickIntervals {
        physics_ms: 2,
        obstacle_ms: 2,
        interaction_ms: 2,
        cosmetic_ms: 5,
    }
}

/// Polls `condition` until it holds or two seconds pass.
fn eventually<F: FnMut() -> bool>(mut condition: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}

fn flat_engine() -> Engine {
    EngineBuilder::new()
        .with_layout(LevelLayout::flat(800.0, 550.0, 50.0))
        .with_ticks(fast_ticks())
        .build()
        .unwrap()
}

//=== Transitions =========================================================

#[test]
fn start_twice_is_rejected() {
    init_logging();
    let mut engine = flat_engine();

    engine.start().unwrap();
    let before = engine.snapshot().active_worker_count;
    let err = engine.start().unwrap_err();

    assert!(matches!(
        err,
        EngineError::InvalidTransition {
            from: Phase::Running,
            action: "start"
        }
    ));
    assert_eq!(engine.phase(), Phase::Running);
    assert_eq!(engine.snapshot().active_worker_count, before);
    assert_eq!(before, 3);
    assert!(engine.stop().is_clean());
}

#[test]
fn stop_leaves_idle_engine_with_no_workers() {
    init_logging();
    let mut engine = EngineBuilder::new().with_ticks(fast_ticks()).build().unwrap();

    engine.start().unwrap();
    assert_eq!(engine.phase(), Phase::Running);
    assert!(eventually(|| engine.snapshot().sparkle_phase > 0));

    let report = engine.stop();
    assert!(report.is_clean());
    assert_eq!(report.joined, 8);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, Phase::Idle);
    assert_eq!(snapshot.active_worker_count, 0);
    assert_eq!(snapshot.permits_in_use, 0);
}

#[test]
fn stopped_engine_cannot_restart() {
    init_logging();
    let mut engine = flat_engine();

    engine.start().unwrap();
    engine.stop();

    assert!(matches!(
        engine.start(),
        Err(EngineError::InvalidTransition {
            from: Phase::Idle,
            ..
        })
    ));
    assert_eq!(engine.stop(), ShutdownReport::default());
}

//=== Gameplay ============================================================

#[test]
fn actor_settles_on_the_floor() {
    init_logging();
    let mut engine = flat_engine();
    engine.start().unwrap();

    assert!(eventually(|| engine.snapshot().actor.y == 520.0));
    std::thread::sleep(Duration::from_millis(30));

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.actor.y, 520.0);
    assert_eq!(snapshot.actor.lives, 3);
    engine.stop();
}

#[test]
fn moving_on_the_floor_shifts_the_actor() {
    init_logging();
    let mut engine = flat_engine();
    engine.start().unwrap();
    assert!(eventually(|| engine.snapshot().actor.y == 520.0));

    engine.move_actor(Direction::Right);
    assert!(eventually(|| engine.snapshot().actor.x > 100.0));
    engine.stop_actor_move();

    engine.stop();
}

#[test]
fn racing_control_input_keeps_invariants() {
    init_logging();
    let mut engine = EngineBuilder::new().with_ticks(fast_ticks()).build().unwrap();
    engine.start().unwrap();

    std::thread::scope(|scope| {
        for t in 0..4 {
            let engine = &engine;
            scope.spawn(move || {
                let direction = if t % 2 == 0 { Direction::Left } else { Direction::Right };
                for i in 0..200 {
                    match i % 4 {
                        0 => engine.move_actor(direction),
                        1 => {
                            engine.jump();
                        }
                        2 => engine.stop_actor_move(),
                        _ => {
                            engine.move_and_jump(direction.reversed());
                        }
                    }
                    std::thread::sleep(Duration::from_micros(500));
                }
            });
        }

        for _ in 0..50 {
            let snapshot = engine.snapshot();
            assert!(snapshot.actor.lives <= 3);
            assert_eq!(snapshot.score % 10, 0);
            assert!(matches!(snapshot.phase, Phase::Running | Phase::Over));
            std::thread::sleep(Duration::from_millis(2));
        }
    });

    let snapshot = engine.snapshot();
    assert!(snapshot.actor.lives <= 3);
    assert_eq!(snapshot.score % 10, 0);
    assert_eq!(snapshot.is_over(), snapshot.actor.lives == 0);

    let report = engine.stop();
    assert!(report.is_clean());
    assert_eq!(engine.snapshot().active_worker_count, 0);
}

#[test]
fn falling_out_every_life_ends_the_game() {
    init_logging();
    let layout = LevelLayout {
        surfaces: Vec::new(),
        ..LevelLayout::flat(800.0, 550.0, 50.0)
    };
    let mut engine = EngineBuilder::new()
        .with_layout(layout)
        .with_ticks(fast_ticks())
        .build()
        .unwrap();
    let feed = engine.events();

    engine.start().unwrap();
    assert!(eventually(|| engine.phase() == Phase::Over));
    assert!(eventually(|| engine.snapshot().active_worker_count == 0));

    let snapshot = engine.snapshot();
    assert!(snapshot.is_over());
    assert_eq!(snapshot.actor.lives, 0);

    let report = engine.stop();
    assert!(report.timed_out.is_empty());
    assert_eq!(engine.phase(), Phase::Over);

    let events: Vec<_> = feed.try_iter().collect();
    let lost = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                EngineEvent::LifeLost {
                    cause: HitCause::Fall,
                    ..
                }
            )
        })
        .count();
    assert_eq!(lost, 3);
    assert!(events.contains(&EngineEvent::GameOver { score: 0 }));
}

#[test]
fn obstacle_on_spawn_costs_exactly_one_life() {
    init_logging();
    let layout = LevelLayout {
        obstacles: vec![ObstaclePlacement::new(30.0, 300.0, 80.0, 250.0)],
        ..LevelLayout::flat(800.0, 550.0, 50.0)
    };
    let mut engine = EngineBuilder::new()
        .with_layout(layout)
        .with_ticks(fast_ticks())
        .build()
        .unwrap();

    engine.start().unwrap();
    assert!(eventually(|| engine.snapshot().actor.lives == 2));
    std::thread::sleep(Duration::from_millis(100));

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.actor.lives, 2);
    assert!(snapshot.obstacles.is_empty());
    assert_eq!(snapshot.phase, Phase::Running);
    engine.stop();
}
