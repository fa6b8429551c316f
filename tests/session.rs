//! Whole-session behavior driven through the frame tick

use astro_blaster::Tuning;
use astro_blaster::consts::*;
use astro_blaster::sim::factory::{self, Side};
use astro_blaster::sim::{lifecycle, spawner};
use astro_blaster::sim::{
    Category, Entity, GameEvent, GamePhase, GameState, HealthTier, Shape, TickInput, Tint, Visual,
    tick,
};
use glam::Vec2;
use proptest::prelude::*;

const DT: f64 = 1.0 / 60.0;

/// A session with no timed spawns, so tests place every entity themselves
fn quiet_session(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    spawner::disarm(&mut state);
    state.drain_events();
    state
}

fn harmless_tuning() -> Tuning {
    Tuning {
        enemy_bullet_damage: 0,
        enemy_ram_damage: 0,
        asteroid_damage_divisor: 1.0e9,
        // No player shots, so no fragments
        fire_period: 1.0e9,
        ..Tuning::default()
    }
}

fn place_enemy(state: &mut GameState, pos: Vec2) -> u32 {
    state.insert(Entity::new(
        Category::Enemy,
        pos,
        Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
        Visual {
            shape: Shape::Fighter,
            tint: Tint::Red,
        },
    ))
}

/// Run frames from `start` for `seconds`, returning every event and the end time
fn run(state: &mut GameState, input: &TickInput, start: f64, seconds: f64) -> (Vec<GameEvent>, f64) {
    let mut events = Vec::new();
    let frames = (seconds / DT).round() as u64;
    let mut now = start;
    for frame in 0..frames {
        now = start + frame as f64 * DT;
        tick(state, input, now);
        events.extend(state.drain_events());
    }
    (events, now)
}

fn spawned(events: &[GameEvent], category: Category) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::Spawned { category: c, .. } if *c == category))
        .count()
}

#[test]
fn test_spawn_cadence_over_ten_seconds() {
    let mut state = GameState::with_tuning(5, harmless_tuning()).expect("valid tuning");
    let (events, _) = run(&mut state, &TickInput::default(), 0.0, 10.0);

    // Enemies at 0, 1.5, ... 9.0 and asteroids at 0, 3, 6, 9
    assert_eq!(spawned(&events, Category::Enemy), 7);
    assert_eq!(spawned(&events, Category::Asteroid), 4);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn test_auto_fire_destroys_enemy_overhead() {
    let mut state = quiet_session(11);
    let ship_x = state.player_entity().expect("player").pos.x;
    let enemy = place_enemy(&mut state, Vec2::new(ship_x, 400.0));

    let (events, _) = run(&mut state, &TickInput::default(), 0.0, 2.0);

    assert!(state.entity(enemy).is_none());
    assert_eq!(state.score, ENEMY_SCORE);
    assert!(events.contains(&GameEvent::Removed { id: enemy }));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Explosion {
            tint: Tint::Orange,
            ..
        }
    )));
}

#[test]
fn test_one_kill_per_enemy_per_frame() {
    let mut state = quiet_session(12);
    let pos = Vec2::new(100.0, 500.0);
    let enemy = place_enemy(&mut state, pos);
    for _ in 0..2 {
        let spawn = factory::create_bullet(&state.tuning, pos, Side::Player);
        state.insert_spawn(spawn, 0.0);
    }

    tick(&mut state, &TickInput::default(), 0.0);

    assert!(state.entity(enemy).is_none());
    assert_eq!(state.score, ENEMY_SCORE);
    // The second bullet found nothing left to hit
    assert_eq!(state.count(Category::PlayerBullet), 1);
}

#[test]
fn test_enemy_bullet_reaches_ship() {
    let mut state = quiet_session(13);
    let ship = state.player_entity().expect("player").pos;
    let spawn = factory::create_bullet(&state.tuning, ship + Vec2::new(0.0, 200.0), Side::Enemy);
    let bullet = state.insert_spawn(spawn, 0.0);

    let (events, _) = run(&mut state, &TickInput::default(), 0.0, 1.0);

    assert!(state.entity(bullet).is_none());
    assert_eq!(state.health, MAX_HEALTH - ENEMY_BULLET_DAMAGE);
    assert!(events.contains(&GameEvent::HealthChanged {
        health: MAX_HEALTH - ENEMY_BULLET_DAMAGE,
        tier: HealthTier::Healthy,
    }));
    assert!(events.iter().any(|e| matches!(e, GameEvent::Impact { .. })));
}

#[test]
fn test_dodging_by_steering() {
    let mut state = quiet_session(14);
    let ship = state.player_entity().expect("player").pos;
    let spawn = factory::create_bullet(&state.tuning, ship + Vec2::new(0.0, 300.0), Side::Enemy);
    state.insert_spawn(spawn, 0.0);

    let input = TickInput {
        target_x: Some(40.0),
        tap: false,
    };
    run(&mut state, &input, 0.0, 1.5);

    assert_eq!(state.health, MAX_HEALTH);
    assert!(state.player_entity().expect("player").pos.x < 60.0);
}

#[test]
fn test_game_over_then_tap_restarts() {
    let mut state = quiet_session(15);
    state.health = ENEMY_BULLET_DAMAGE;
    let ship = state.player_entity().expect("player").pos;
    let spawn = factory::create_bullet(&state.tuning, ship + Vec2::new(0.0, 100.0), Side::Enemy);
    state.insert_spawn(spawn, 0.0);
    state.score = 300;

    let (events, now) = run(&mut state, &TickInput::default(), 0.0, 1.0);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.health, 0);
    assert!(events.contains(&GameEvent::GameOver { final_score: 300 }));
    assert_eq!(
        state.snapshot().final_score_text().as_deref(),
        Some("Final Score: 300")
    );

    // In-flight shots run out while the ship stays gone
    let (events, now) = run(&mut state, &TickInput::default(), now + DT, 3.0);
    assert_eq!(spawned(&events, Category::PlayerBullet), 0);
    assert_eq!(state.count(Category::PlayerBullet), 0);
    assert_eq!(state.count(Category::Player), 0);
    assert_eq!((state.score, state.health), (300, 0));

    let tap = TickInput {
        target_x: None,
        tap: true,
    };
    tick(&mut state, &tap, now + DT);
    let events = state.drain_events();

    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert_eq!(state.health, MAX_HEALTH);
    assert!(events.contains(&GameEvent::Restarted));
    assert_eq!(state.count(Category::Player), 1);
    // Both spawn schedules come back immediately
    assert_eq!(state.count(Category::Enemy), 1);
    assert_eq!(state.count(Category::Asteroid), 1);
    assert_eq!(state.snapshot().score_text(), "Score: 0");
}

#[test]
fn test_enemy_leaves_field_after_game_over() {
    let mut state = quiet_session(17);
    let enemy = spawner::spawn_enemy(&mut state, 0.0);
    let (_, now) = run(&mut state, &TickInput::default(), 0.0, 0.5);
    let y_at_game_over = state.entity(enemy).expect("enemy descending").pos.y;
    lifecycle::game_over(&mut state);
    let (score, health) = (state.score, state.health);

    let (_, now) = run(&mut state, &TickInput::default(), now + DT, 1.0);
    let y = state.entity(enemy).expect("still descending").pos.y;
    assert!(y < y_at_game_over);

    let (events, _) = run(&mut state, &TickInput::default(), now + DT, 20.0);
    assert!(state.entity(enemy).is_none());
    assert!(events.contains(&GameEvent::Removed { id: enemy }));
    assert_eq!(state.count(Category::Enemy), 0);
    assert_eq!((state.score, state.health), (score, health));
    assert_eq!(state.phase, GamePhase::GameOver);
}

#[test]
fn test_snapshot_serializes() {
    let mut state = GameState::new(16);
    run(&mut state, &TickInput::default(), 0.0, 1.0);
    let json = serde_json::to_string(&state.snapshot()).expect("serialize");
    assert!(json.contains("\"phase\":\"Playing\""));
    assert!(json.contains("\"score\":"));
}

#[test]
fn test_same_seed_same_session() {
    let play = |seed: u64| {
        let mut state = GameState::new(seed);
        let input = TickInput {
            target_x: Some(120.0),
            tap: true,
        };
        let (events, _) = run(&mut state, &input, 0.0, 30.0);
        (events, state.score, state.health)
    };
    assert_eq!(play(77), play(77));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_health_bounded_and_score_monotonic(
        seed in any::<u64>(),
        targets in proptest::collection::vec(proptest::option::of(0.0f32..390.0), 1..40),
    ) {
        let mut state = GameState::new(seed);
        let mut now = 0.0;
        let mut last_score = 0;

        for target in targets {
            let input = TickInput { target_x: target, tap: false };
            // Hold each target for a quarter second
            for _ in 0..15 {
                tick(&mut state, &input, now);
                now += DT;

                prop_assert!(state.health <= MAX_HEALTH);
                prop_assert!(state.score >= last_score);
                prop_assert_eq!(state.health == 0, state.phase == GamePhase::GameOver);
                last_score = state.score;
            }
        }
    }
}
