//! Astro Blaster - A single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, contacts, game state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input devices and windowing live outside this crate. They feed
//! the simulation through [`sim::TickInput`] (or the finer-grained entry
//! points in [`sim`]) and consume the [`sim::GameEvent`] queue.

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Play field size (portrait phone screen, points)
    pub const FIELD_WIDTH: f32 = 390.0;
    pub const FIELD_HEIGHT: f32 = 844.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    /// Ship rides at a fixed height above the bottom edge
    pub const PLAYER_Y: f32 = 100.0;
    pub const MAX_HEALTH: u32 = 100;

    /// Fraction of the remaining horizontal distance covered per frame
    pub const APPROACH_FACTOR: f32 = 0.1;
    /// Dead zone (points) inside which the ship stops chasing the target
    pub const APPROACH_DEAD_ZONE: f32 = 1.0;
    /// Bank angle per point of horizontal distance (radians)
    pub const TILT_SCALE: f32 = -0.0003;
    pub const MAX_TILT: f32 = 0.3;

    /// Seconds between automatic player shots
    pub const FIRE_PERIOD: f64 = 0.3;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 16.0;
    /// Player bullet speed (points/s); traversal takes `FIELD_HEIGHT / BULLET_SPEED`
    pub const BULLET_SPEED: f32 = 500.0;
    /// Enemy bullets always cross the field in this many seconds
    pub const ENEMY_BULLET_TRAVERSAL: f64 = 2.0;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 50.0;
    pub const ENEMY_MIN_DESCENT: f64 = 4.0;
    pub const ENEMY_MAX_DESCENT: f64 = 7.0;
    pub const ENEMY_FIRE_CHANCE: f64 = 0.5;
    pub const ENEMY_FIRE_PERIOD: f64 = 1.0;

    /// Asteroids
    pub const ASTEROID_MIN_DESCENT: f64 = 4.0;
    pub const ASTEROID_MAX_DESCENT: f64 = 8.0;
    pub const ASTEROID_MAX_DRIFT: f32 = 100.0;
    pub const ASTEROID_MIN_SPIN_PERIOD: f64 = 3.0;
    pub const ASTEROID_MAX_SPIN_PERIOD: f64 = 6.0;

    /// Fragments
    pub const FRAGMENT_COUNT: usize = 2;
    /// Only asteroids wider than this split when shot
    pub const FRAGMENT_MIN_PARENT_WIDTH: f32 = 30.0;
    pub const FRAGMENT_SCATTER: f32 = 20.0;
    pub const FRAGMENT_MAX_DRIFT_X: f32 = 100.0;
    pub const FRAGMENT_MIN_DROP: f32 = 100.0;
    pub const FRAGMENT_MAX_DROP: f32 = 300.0;
    pub const FRAGMENT_LIFETIME: f64 = 3.0;
    pub const FRAGMENT_FADE: f64 = 0.5;
    pub const FRAGMENT_MIN_SPIN_PERIOD: f64 = 2.0;
    pub const FRAGMENT_MAX_SPIN_PERIOD: f64 = 4.0;

    /// Spawn cadence (seconds)
    pub const ENEMY_SPAWN_PERIOD: f64 = 1.5;
    pub const ASTEROID_SPAWN_PERIOD: f64 = 3.0;

    /// Scoring
    pub const ENEMY_SCORE: u64 = 100;
    pub const ASTEROID_SCORE: u64 = 50;

    /// Damage
    pub const ENEMY_BULLET_DAMAGE: u32 = 10;
    pub const ENEMY_RAM_DAMAGE: u32 = 25;
    /// Asteroid ramming damage is `width / ASTEROID_DAMAGE_DIVISOR`, floored
    pub const ASTEROID_DAMAGE_DIVISOR: f32 = 3.0;

    /// Physics bodies are shrunk relative to the sprite
    pub const BODY_SCALE: f32 = 0.8;

    /// Health bar thresholds (fraction of max health)
    pub const HEALTHY_ABOVE: f32 = 0.6;
    pub const WARNING_ABOVE: f32 = 0.3;

    /// Damage flash: two fades of 0.2 s each
    pub const DAMAGE_FLASH_DURATION: f64 = 0.4;
}

/// Clamp a value to the symmetric range [-limit, limit]
#[inline]
pub fn clamp_symmetric(value: f32, limit: f32) -> f32 {
    value.clamp(-limit, limit)
}

/// Axis-aligned overlap test between two centered rectangles
#[inline]
pub fn rects_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    let d = (a_pos - b_pos).abs();
    let reach = (a_size + b_size) * 0.5;
    d.x < reach.x && d.y < reach.y
}

/// Overlap test between a circle and a centered rectangle
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_pos: Vec2, rect_size: Vec2) -> bool {
    let half = rect_size * 0.5;
    let closest = center.clamp(rect_pos - half, rect_pos + half);
    center.distance_squared(closest) < radius * radius
}
