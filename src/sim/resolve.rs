//! Contact resolution handlers
//!
//! Each handler assumes its entities are live; the dispatcher checks that.
//! All of them are inert once the game is over.

use glam::Vec2;

use super::collision::Resolution;
use super::factory;
use super::lifecycle;
use super::state::{EntityId, GameEvent, GameState, Tint};

/// Run the handler for a canonicalized pair (`first` has the lower category)
pub fn apply(state: &mut GameState, resolution: Resolution, first: EntityId, second: EntityId) {
    match resolution {
        Resolution::BulletHitsEnemy => bullet_hits_enemy(state, first, second),
        Resolution::BulletHitsAsteroid => bullet_hits_asteroid(state, first, second),
        Resolution::EnemyBulletHitsPlayer => enemy_bullet_hits_player(state, first, second),
        Resolution::EnemyRamsPlayer => enemy_rams_player(state, first, second),
        Resolution::AsteroidHitsPlayer => asteroid_hits_player(state, first, second),
    }
}

fn pos_and_size(state: &GameState, id: EntityId) -> Option<(Vec2, Vec2)> {
    state.entity(id).map(|e| (e.pos, e.size))
}

fn explode(state: &mut GameState, pos: Vec2, size: Vec2, tint: Tint) {
    state.events.push(GameEvent::Explosion { pos, size, tint });
}

pub fn bullet_hits_enemy(state: &mut GameState, bullet: EntityId, enemy: EntityId) {
    if state.is_game_over() {
        return;
    }
    let Some((pos, size)) = pos_and_size(state, enemy) else {
        return;
    };
    explode(state, pos, size, Tint::Orange);
    state.consume(bullet);
    state.consume(enemy);
    let points = state.tuning.enemy_score;
    award(state, points);
}

pub fn bullet_hits_asteroid(state: &mut GameState, bullet: EntityId, asteroid: EntityId) {
    if state.is_game_over() {
        return;
    }
    let Some(rock) = state.entity(asteroid).cloned() else {
        return;
    };
    explode(state, rock.pos, rock.size, Tint::Gray);
    state.consume(bullet);
    let points = state.tuning.asteroid_score;
    award(state, points);

    let fragments = factory::create_fragments(&state.tuning, &rock, &mut state.rng);
    if !fragments.is_empty() {
        log::debug!("Asteroid {} split into {}", asteroid, fragments.len());
    }
    let now = state.clock;
    for spawn in fragments {
        state.insert_spawn(spawn, now);
    }
    state.consume(asteroid);
}

pub fn enemy_bullet_hits_player(state: &mut GameState, player: EntityId, bullet: EntityId) {
    if state.is_game_over() {
        return;
    }
    let Some((pos, _)) = pos_and_size(state, player) else {
        return;
    };
    state.consume(bullet);
    state.events.push(GameEvent::Impact {
        pos,
        tint: Tint::Red,
    });
    let damage = state.tuning.enemy_bullet_damage;
    damage_player(state, damage);
}

pub fn enemy_rams_player(state: &mut GameState, _player: EntityId, enemy: EntityId) {
    if state.is_game_over() {
        return;
    }
    let Some((pos, size)) = pos_and_size(state, enemy) else {
        return;
    };
    explode(state, pos, size, Tint::Orange);
    state.consume(enemy);
    let damage = state.tuning.enemy_ram_damage;
    damage_player(state, damage);
}

pub fn asteroid_hits_player(state: &mut GameState, _player: EntityId, asteroid: EntityId) {
    if state.is_game_over() {
        return;
    }
    let Some((pos, size, width)) = state
        .entity(asteroid)
        .map(|e| (e.pos, e.size, e.width()))
    else {
        return;
    };
    explode(state, pos, size, Tint::Gray);
    state.consume(asteroid);
    let damage = asteroid_damage(width, state.tuning.asteroid_damage_divisor);
    damage_player(state, damage);
}

/// Ramming damage for an asteroid of the given width
pub fn asteroid_damage(width: f32, divisor: f32) -> u32 {
    (width / divisor).floor().max(0.0) as u32
}

/// Add points to the score
pub fn award(state: &mut GameState, points: u64) {
    if state.is_game_over() {
        return;
    }
    state.score = state.score.saturating_add(points);
    state.events.push(GameEvent::ScoreChanged { score: state.score });
}

/// Subtract health, flash the ship and end the game at zero
///
/// The flash is cosmetic: further hits during it still land.
pub fn damage_player(state: &mut GameState, amount: u32) {
    if state.is_game_over() {
        return;
    }
    state.health = state
        .health
        .saturating_sub(amount)
        .min(state.tuning.max_health);
    let tier = state.health_tier();
    state.events.push(GameEvent::HealthChanged {
        health: state.health,
        tier,
    });
    if let Some(id) = state.player {
        let duration = state.tuning.damage_flash_duration;
        state.events.push(GameEvent::DamageFlash { id, duration });
    }

    if state.health == 0 {
        lifecycle::game_over(state);
    }
}
