//! Timed spawning and delayed-action servicing
//!
//! Enemy and asteroid spawns run on two independent keyed schedules. The same
//! pass also services per-entity timers (enemy fire, lifetime expiry, fades).

use glam::Vec2;

use super::factory::{self, Side};
use super::schedule::{Action, ScheduleKey};
use super::state::{EntityId, GameEvent, GameState};

/// Arm both spawn schedules; each spawns at the current clock, then periodically
pub fn arm(state: &mut GameState) {
    let now = state.clock;
    let enemy_period = state.tuning.enemy_spawn_period;
    let asteroid_period = state.tuning.asteroid_spawn_period;

    state.scheduler.cancel(ScheduleKey::EnemySpawns);
    state.scheduler.cancel(ScheduleKey::AsteroidSpawns);
    state
        .scheduler
        .repeating(ScheduleKey::EnemySpawns, Action::SpawnEnemy, now, enemy_period);
    state
        .scheduler
        .repeating(ScheduleKey::AsteroidSpawns, Action::SpawnAsteroid, now, asteroid_period);
}

/// Cancel both spawn schedules (safe to call repeatedly)
pub fn disarm(state: &mut GameState) {
    state.scheduler.cancel(ScheduleKey::EnemySpawns);
    state.scheduler.cancel(ScheduleKey::AsteroidSpawns);
}

/// Run every scheduled action due at or before `now`
///
/// After game over only per-entity timers run: in-flight entities still
/// fire, fade and expire, but nothing new spawns.
pub fn tick(state: &mut GameState, now: f64) {
    state.clock = state.clock.max(now);

    while let Some(action) = state.scheduler.pop_due(now) {
        run_action(state, action, now);
    }
}

fn run_action(state: &mut GameState, action: Action, now: f64) {
    match action {
        Action::SpawnEnemy | Action::SpawnAsteroid if state.is_game_over() => {}
        Action::SpawnEnemy => {
            spawn_enemy(state, now);
        }
        Action::SpawnAsteroid => {
            spawn_asteroid(state, now);
        }
        Action::EnemyFire(id) => enemy_fire(state, id, now),
        Action::BeginFade(id) => begin_fade(state, id, now),
        Action::Expire(id) => {
            state.consume(id);
        }
    }
}

pub fn spawn_enemy(state: &mut GameState, now: f64) -> EntityId {
    let spawn = factory::create_enemy(&state.tuning, &mut state.rng);
    let fires = spawn.entity.fires;
    let id = state.insert_spawn(spawn, now);
    log::debug!("Spawned enemy {} (fires: {})", id, fires);
    id
}

pub fn spawn_asteroid(state: &mut GameState, now: f64) -> EntityId {
    let spawn = factory::create_asteroid(&state.tuning, &mut state.rng);
    let tier = spawn.entity.tier;
    let id = state.insert_spawn(spawn, now);
    log::debug!("Spawned asteroid {} ({:?})", id, tier);
    id
}

/// Fire one bullet from the enemy's nose; skipped if the enemy is gone
fn enemy_fire(state: &mut GameState, id: EntityId, now: f64) {
    let Some(enemy) = state.entity(id) else {
        return;
    };
    let origin = enemy.pos - Vec2::new(0.0, enemy.size.y / 2.0);
    let spawn = factory::create_bullet(&state.tuning, origin, Side::Enemy);
    state.insert_spawn(spawn, now);
}

/// Stop a drifting fragment and schedule its removal after the fade
fn begin_fade(state: &mut GameState, id: EntityId, now: f64) {
    let fade = state.tuning.fragment_fade;
    let Some(entity) = state.entity_mut(id) else {
        return;
    };
    entity.vel = Vec2::ZERO;
    entity.fading = true;
    state.events.push(GameEvent::FadeOut { id, duration: fade });
    state
        .scheduler
        .once(ScheduleKey::Entity(id), Action::Expire(id), now + fade);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Category, GamePhase};

    #[test]
    fn test_first_tick_spawns_one_of_each() {
        let mut state = GameState::new(21);
        tick(&mut state, 0.0);
        assert_eq!(state.count(Category::Enemy), 1);
        assert_eq!(state.count(Category::Asteroid), 1);

        // Nothing new until a period elapses
        tick(&mut state, 1.0);
        assert_eq!(state.count(Category::Enemy), 1);
    }

    #[test]
    fn test_independent_cadences() {
        let mut state = GameState::new(21);
        let mut t = 0.0;
        while t <= 3.0 + 1e-9 {
            tick(&mut state, t);
            t += 0.5;
        }
        // Enemies at 0, 1.5, 3.0; asteroids at 0, 3.0
        assert_eq!(state.count(Category::Enemy), 3);
        assert_eq!(state.count(Category::Asteroid), 2);
    }

    #[test]
    fn test_game_over_suspends_spawning() {
        let mut state = GameState::new(21);
        state.phase = GamePhase::GameOver;
        tick(&mut state, 0.0);
        tick(&mut state, 10.0);
        assert_eq!(state.count(Category::Enemy), 0);
        assert_eq!(state.count(Category::Asteroid), 0);
    }

    #[test]
    fn test_entity_timers_run_after_game_over() {
        let mut state = GameState::new(33);
        disarm(&mut state);
        let id = spawn_asteroid(&mut state, 0.0);
        crate::sim::lifecycle::game_over(&mut state);

        tick(&mut state, ASTEROID_MAX_DESCENT + 0.1);
        assert!(state.entity(id).is_none());
        assert_eq!(state.count(Category::Asteroid), 0);
    }

    #[test]
    fn test_disarm_is_idempotent() {
        let mut state = GameState::new(21);
        disarm(&mut state);
        disarm(&mut state);
        assert!(!state.scheduler.is_armed(ScheduleKey::EnemySpawns));
        tick(&mut state, 5.0);
        assert_eq!(state.count(Category::Enemy), 0);

        arm(&mut state);
        tick(&mut state, 5.0);
        assert_eq!(state.count(Category::Enemy), 1);
    }

    #[test]
    fn test_entities_expire_after_descent() {
        let mut state = GameState::new(33);
        disarm(&mut state);
        let id = spawn_asteroid(&mut state, 0.0);

        tick(&mut state, ASTEROID_MIN_DESCENT - 0.1);
        assert!(state.entity(id).is_some());
        tick(&mut state, ASTEROID_MAX_DESCENT + 0.1);
        assert!(state.entity(id).is_none());
    }

    #[test]
    fn test_firing_enemy_shoots_while_alive() {
        let mut state = GameState::new(9);
        disarm(&mut state);

        // Draw enemies until one carries a fire plan
        let spawn = std::iter::repeat_with(|| factory::create_enemy(&state.tuning, &mut state.rng))
            .take(64)
            .find(|spawn| spawn.fire.is_some())
            .expect("half of all enemies fire");
        let plan = spawn.fire.expect("checked above");
        let id = state.insert_spawn(spawn, 0.0);
        state.drain_events();

        let mut t = 0.0;
        while state.entity(id).is_some() {
            t += 0.25;
            tick(&mut state, t);
        }
        let shots = state
            .drain_events()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::Spawned {
                        category: Category::EnemyBullet,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(shots as u32, plan.count);
        // All enemy timers are gone with the enemy
        assert!(!state.scheduler.is_armed(ScheduleKey::Entity(id)));
    }

    #[test]
    fn test_fragment_fades_then_expires() {
        let mut state = GameState::new(2);
        disarm(&mut state);
        let mut parent = factory::create_asteroid(&state.tuning, &mut state.rng).entity;
        parent.size = Vec2::splat(60.0);
        let spawn = factory::create_fragments(&state.tuning, &parent, &mut state.rng).remove(0);
        let id = state.insert_spawn(spawn, 0.0);
        state.drain_events();

        tick(&mut state, FRAGMENT_LIFETIME);
        let piece = state.entity(id).expect("still fading");
        assert!(piece.fading);
        assert_eq!(piece.vel, Vec2::ZERO);
        assert!(state
            .drain_events()
            .contains(&GameEvent::FadeOut { id, duration: FRAGMENT_FADE }));

        tick(&mut state, FRAGMENT_LIFETIME + FRAGMENT_FADE);
        assert!(state.entity(id).is_none());
    }
}
