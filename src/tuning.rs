//! Data-driven game balance
//!
//! Every field defaults to the matching constant in [`crate::consts`]. A JSON
//! document only needs the keys it wants to override.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tuning value `{name}` = {value} is out of range ({expected})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("tuning range `{name}` is inverted: {min} > {max}")]
    InvertedRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
}

/// Runtime gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Field
    pub field_width: f32,
    pub field_height: f32,

    // Player
    pub player_y: f32,
    pub max_health: u32,
    pub approach_factor: f32,
    /// Steering ignores targets closer than this
    pub approach_dead_zone: f32,
    pub tilt_scale: f32,
    pub max_tilt: f32,
    pub fire_period: f64,

    // Bullets
    pub bullet_speed: f32,
    pub enemy_bullet_traversal: f64,

    // Spawning
    pub enemy_spawn_period: f64,
    pub asteroid_spawn_period: f64,
    pub enemy_min_descent: f64,
    pub enemy_max_descent: f64,
    pub enemy_fire_chance: f64,
    pub enemy_fire_period: f64,
    pub asteroid_min_descent: f64,
    pub asteroid_max_descent: f64,
    pub asteroid_max_drift: f32,
    pub asteroid_min_spin_period: f64,
    pub asteroid_max_spin_period: f64,

    // Fragments
    pub fragment_lifetime: f64,
    pub fragment_fade: f64,
    pub fragment_scatter: f32,
    pub fragment_max_drift_x: f32,
    pub fragment_min_drop: f32,
    pub fragment_max_drop: f32,
    pub fragment_min_spin_period: f64,
    pub fragment_max_spin_period: f64,

    // Contacts
    /// Ship and asteroid bodies relative to their sprites
    pub body_scale: f32,
    pub damage_flash_duration: f64,

    // Scoring and damage
    pub enemy_score: u64,
    pub asteroid_score: u64,
    pub enemy_bullet_damage: u32,
    pub enemy_ram_damage: u32,
    pub asteroid_damage_divisor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            player_y: PLAYER_Y,
            max_health: MAX_HEALTH,
            approach_factor: APPROACH_FACTOR,
            approach_dead_zone: APPROACH_DEAD_ZONE,
            tilt_scale: TILT_SCALE,
            max_tilt: MAX_TILT,
            fire_period: FIRE_PERIOD,

            bullet_speed: BULLET_SPEED,
            enemy_bullet_traversal: ENEMY_BULLET_TRAVERSAL,

            enemy_spawn_period: ENEMY_SPAWN_PERIOD,
            asteroid_spawn_period: ASTEROID_SPAWN_PERIOD,
            enemy_min_descent: ENEMY_MIN_DESCENT,
            enemy_max_descent: ENEMY_MAX_DESCENT,
            enemy_fire_chance: ENEMY_FIRE_CHANCE,
            enemy_fire_period: ENEMY_FIRE_PERIOD,
            asteroid_min_descent: ASTEROID_MIN_DESCENT,
            asteroid_max_descent: ASTEROID_MAX_DESCENT,
            asteroid_max_drift: ASTEROID_MAX_DRIFT,
            asteroid_min_spin_period: ASTEROID_MIN_SPIN_PERIOD,
            asteroid_max_spin_period: ASTEROID_MAX_SPIN_PERIOD,

            fragment_lifetime: FRAGMENT_LIFETIME,
            fragment_fade: FRAGMENT_FADE,
            fragment_scatter: FRAGMENT_SCATTER,
            fragment_max_drift_x: FRAGMENT_MAX_DRIFT_X,
            fragment_min_drop: FRAGMENT_MIN_DROP,
            fragment_max_drop: FRAGMENT_MAX_DROP,
            fragment_min_spin_period: FRAGMENT_MIN_SPIN_PERIOD,
            fragment_max_spin_period: FRAGMENT_MAX_SPIN_PERIOD,

            body_scale: BODY_SCALE,
            damage_flash_duration: DAMAGE_FLASH_DURATION,

            enemy_score: ENEMY_SCORE,
            asteroid_score: ASTEROID_SCORE,
            enemy_bullet_damage: ENEMY_BULLET_DAMAGE,
            enemy_ram_damage: ENEMY_RAM_DAMAGE,
            asteroid_damage_divisor: ASTEROID_DAMAGE_DIVISOR,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Player bullet traversal time (seconds) for the current field
    pub fn bullet_traversal(&self) -> f64 {
        f64::from(self.field_height / self.bullet_speed)
    }

    /// Check every value is inside its usable range
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("field_width", f64::from(self.field_width))?;
        positive("field_height", f64::from(self.field_height))?;
        positive("bullet_speed", f64::from(self.bullet_speed))?;
        positive("fire_period", self.fire_period)?;
        positive("enemy_bullet_traversal", self.enemy_bullet_traversal)?;
        positive("enemy_spawn_period", self.enemy_spawn_period)?;
        positive("asteroid_spawn_period", self.asteroid_spawn_period)?;
        positive("enemy_min_descent", self.enemy_min_descent)?;
        positive("asteroid_min_descent", self.asteroid_min_descent)?;
        positive("enemy_fire_period", self.enemy_fire_period)?;
        positive("fragment_lifetime", self.fragment_lifetime)?;
        positive("asteroid_damage_divisor", f64::from(self.asteroid_damage_divisor))?;
        positive("asteroid_min_spin_period", self.asteroid_min_spin_period)?;
        positive("fragment_min_spin_period", self.fragment_min_spin_period)?;
        finite("enemy_max_descent", self.enemy_max_descent)?;
        finite("asteroid_max_descent", self.asteroid_max_descent)?;
        finite("asteroid_max_spin_period", self.asteroid_max_spin_period)?;
        finite("fragment_max_spin_period", self.fragment_max_spin_period)?;
        finite("player_y", f64::from(self.player_y))?;
        finite("tilt_scale", f64::from(self.tilt_scale))?;
        ordered("enemy_descent", self.enemy_min_descent, self.enemy_max_descent)?;
        ordered(
            "asteroid_descent",
            self.asteroid_min_descent,
            self.asteroid_max_descent,
        )?;
        ordered(
            "asteroid_spin_period",
            self.asteroid_min_spin_period,
            self.asteroid_max_spin_period,
        )?;
        ordered(
            "fragment_spin_period",
            self.fragment_min_spin_period,
            self.fragment_max_spin_period,
        )?;
        ordered(
            "fragment_drop",
            f64::from(self.fragment_min_drop),
            f64::from(self.fragment_max_drop),
        )?;

        for (name, value) in [
            ("max_tilt", f64::from(self.max_tilt)),
            ("approach_dead_zone", f64::from(self.approach_dead_zone)),
            ("asteroid_max_drift", f64::from(self.asteroid_max_drift)),
            ("fragment_fade", self.fragment_fade),
            ("fragment_scatter", f64::from(self.fragment_scatter)),
            ("fragment_max_drift_x", f64::from(self.fragment_max_drift_x)),
            ("fragment_min_drop", f64::from(self.fragment_min_drop)),
            ("damage_flash_duration", self.damage_flash_duration),
        ] {
            non_negative(name, value)?;
        }

        if self.max_health == 0 {
            return Err(TuningError::OutOfRange {
                name: "max_health",
                value: 0.0,
                expected: "> 0",
            });
        }
        if !(0.0..=1.0).contains(&self.approach_factor) {
            return Err(TuningError::OutOfRange {
                name: "approach_factor",
                value: f64::from(self.approach_factor),
                expected: "0.0..=1.0",
            });
        }
        if !(0.0..=1.0).contains(&self.enemy_fire_chance) {
            return Err(TuningError::OutOfRange {
                name: "enemy_fire_chance",
                value: self.enemy_fire_chance,
                expected: "0.0..=1.0",
            });
        }
        if !(self.body_scale > 0.0 && self.body_scale <= 1.0) {
            return Err(TuningError::OutOfRange {
                name: "body_scale",
                value: f64::from(self.body_scale),
                expected: "0.0 < scale <= 1.0",
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            expected: "> 0",
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), TuningError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            expected: ">= 0",
        })
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), TuningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            expected: "a finite number",
        })
    }
}

fn ordered(name: &'static str, min: f64, max: f64) -> Result<(), TuningError> {
    if min > max {
        Err(TuningError::InvertedRange { name, min, max })
    } else {
        Ok(())
    }
}
