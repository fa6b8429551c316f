//! Per-frame simulation tick
//!
//! Core game loop: move everything, steer the ship, auto-fire, service
//! timers, then discover and resolve contacts.

use glam::Vec2;

use super::collision;
use super::contact;
use super::factory::{self, Side};
use super::lifecycle;
use super::spawner;
use super::state::GameState;
use crate::clamp_symmetric;

/// Input collected for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch x position (pointer down or move)
    pub target_x: Option<f32>,
    /// Tap; restarts while the game is over
    pub tap: bool,
}

/// Steer the ship toward `x`; ignored while the game is over
pub fn set_horizontal_target(state: &mut GameState, x: f32) {
    if state.is_game_over() {
        return;
    }
    state.target_x = Some(x);
}

/// Restart request from the input layer; returns true if a new session began
pub fn signal_restart(state: &mut GameState) -> bool {
    lifecycle::restart(state)
}

/// Update driver: delta-time bookkeeping, steering and the auto-fire gate
pub fn on_frame(state: &mut GameState, now: f64) {
    if state.is_game_over() {
        return;
    }
    advance_clock(state, now);
    drive_player(state, now);
}

/// Record the frame time; returns seconds since the previous frame
fn advance_clock(state: &mut GameState, now: f64) -> f64 {
    state.delta_time = match state.last_update_time {
        Some(last) => (now - last).max(0.0),
        None => 0.0,
    };
    state.last_update_time = Some(now);
    state.clock = state.clock.max(now);
    state.delta_time
}

fn drive_player(state: &mut GameState, now: f64) {
    steer_player(state);

    if now - state.last_fire_time > state.tuning.fire_period {
        state.last_fire_time = now;
        fire_player_bullet(state, now);
    }
}

/// Exponential approach toward the target with a clamped bank angle
fn steer_player(state: &mut GameState) {
    let target = state.target_x;
    let factor = state.tuning.approach_factor;
    let dead_zone = state.tuning.approach_dead_zone;
    let tilt_scale = state.tuning.tilt_scale;
    let max_tilt = state.tuning.max_tilt;
    let Some(ship) = state.player_entity_mut() else {
        return;
    };

    match target {
        Some(target) => {
            let dx = target - ship.pos.x;
            if dx.abs() > dead_zone {
                ship.pos.x += dx * factor;
                ship.rotation = clamp_symmetric(dx * tilt_scale, max_tilt);
            }
        }
        None => ship.rotation = 0.0,
    }
}

fn fire_player_bullet(state: &mut GameState, now: f64) {
    let Some(ship) = state.player_entity() else {
        return;
    };
    let origin = ship.pos + Vec2::new(0.0, ship.size.y / 2.0);
    let spawn = factory::create_bullet(&state.tuning, origin, Side::Player);
    state.insert_spawn(spawn, now);
}

/// Advance positions and spins by `dt` seconds
///
/// Keeps running after game over so in-flight entities leave the field.
pub fn integrate(state: &mut GameState, dt: f32) {
    for entity in state.entities.iter_mut().filter(|e| !e.is_consumed()) {
        entity.pos += entity.vel * dt;
        entity.rotation += entity.spin * dt;
    }
}

/// Advance the game by one frame at time `now` (seconds)
///
/// Entities already on the field move first, so anything created this
/// frame appears at its spawn point. Contacts are resolved in order and
/// removals are applied only after every contact has been dispatched.
///
/// After game over the ship, spawning and contacts stay idle while in-flight
/// entities keep moving and expiring until a tap restarts.
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) {
    if input.tap && state.is_game_over() {
        signal_restart(state);
    }

    let dt = advance_clock(state, now) as f32;
    integrate(state, dt);

    if !state.is_game_over() {
        if let Some(x) = input.target_x {
            set_horizontal_target(state, x);
        }
        drive_player(state, now);
    }
    spawner::tick(state, now);

    if !state.is_game_over() {
        let contacts = contact::detect(state);
        collision::dispatch_all(state, &contacts);
    }
    state.flush_removals();
}
