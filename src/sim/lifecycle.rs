//! Playing / GameOver transitions

use super::spawner;
use super::state::{GameEvent, GamePhase, GameState, Tint};

/// Enter GameOver; returns false if already there
///
/// Cancels both spawn schedules and blows up the ship.
pub fn game_over(state: &mut GameState) -> bool {
    if state.is_game_over() {
        return false;
    }
    state.phase = GamePhase::GameOver;
    spawner::disarm(state);

    if let Some((id, pos, size)) = state.player_entity().map(|p| (p.id, p.pos, p.size)) {
        state.events.push(GameEvent::Explosion {
            pos,
            size: size * 2.0,
            tint: Tint::Cyan,
        });
        state.consume(id);
    }
    state.events.push(GameEvent::GameOver {
        final_score: state.score,
    });
    log::info!("Game over, final score {}", state.score);
    true
}

/// Leave GameOver and start a fresh session; returns false while playing
///
/// Clears every entity and timer, resets the counters, recreates the ship
/// and re-arms both spawn schedules.
pub fn restart(state: &mut GameState) -> bool {
    if !state.is_game_over() {
        return false;
    }

    state.clear_entities();
    state.scheduler.clear();

    state.score = 0;
    state.health = state.tuning.max_health;
    state.phase = GamePhase::Playing;
    state.last_update_time = None;
    state.last_fire_time = 0.0;
    state.delta_time = 0.0;
    state.target_x = None;

    state.spawn_player();
    let health = state.health;
    let tier = state.health_tier();
    state.events.push(GameEvent::Restarted);
    state.events.push(GameEvent::ScoreChanged { score: 0 });
    state.events.push(GameEvent::HealthChanged { health, tier });
    spawner::arm(state);

    log::info!("Restarted");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::schedule::ScheduleKey;
    use crate::sim::state::{Category, HealthTier};

    #[test]
    fn test_game_over_once() {
        let mut state = GameState::new(10);
        state.drain_events();

        assert!(game_over(&mut state));
        assert!(!game_over(&mut state));

        assert!(state.is_game_over());
        assert!(state.player_entity().is_none());
        assert!(!state.scheduler.is_armed(ScheduleKey::EnemySpawns));
        assert!(!state.scheduler.is_armed(ScheduleKey::AsteroidSpawns));

        let events = state.drain_events();
        let overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Explosion {
                tint: Tint::Cyan,
                ..
            }
        )));
    }

    #[test]
    fn test_restart_requires_game_over() {
        let mut state = GameState::new(10);
        state.score = 400;
        assert!(!restart(&mut state));
        assert_eq!(state.score, 400);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = GameState::new(10);
        crate::sim::spawner::tick(&mut state, 0.0);
        state.score = 1250;
        state.health = 0;
        state.last_fire_time = 12.0;
        state.last_update_time = Some(12.5);
        state.target_x = Some(50.0);
        game_over(&mut state);

        assert!(restart(&mut state));
        assert_eq!(state.score, 0);
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.health_tier(), HealthTier::Healthy);
        assert!(!state.is_game_over());
        assert_eq!(state.last_update_time, None);
        assert_eq!(state.last_fire_time, 0.0);
        assert_eq!(state.target_x, None);

        // Only the fresh ship survives the clear
        assert_eq!(state.live().count(), 1);
        assert_eq!(state.count(Category::Player), 1);
        assert!(state.scheduler.is_armed(ScheduleKey::EnemySpawns));
        assert!(state.scheduler.is_armed(ScheduleKey::AsteroidSpawns));

        // Re-armed schedules produce entities again
        let now = state.clock;
        crate::sim::spawner::tick(&mut state, now);
        assert_eq!(state.count(Category::Enemy), 1);
        assert_eq!(state.count(Category::Asteroid), 1);
    }
}
