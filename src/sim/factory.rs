//! Entity construction
//!
//! Every constructor returns a fully configured [`Spawn`]: the entity plus the
//! timed behavior it needs. Nothing here touches the live set; callers insert
//! the result with [`GameState::insert_spawn`](super::GameState::insert_spawn).

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::distr::uniform::SampleUniform;

use super::state::{AsteroidTier, Category, Entity, Shape, Tint, Visual};
use crate::consts::*;
use crate::tuning::Tuning;

/// Periodic fire behavior for an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirePlan {
    pub count: u32,
    pub period: f64,
}

/// A configured entity and its timers
#[derive(Debug, Clone)]
pub struct Spawn {
    pub entity: Entity,
    /// Seconds until the entity leaves the field (or starts fading)
    pub lifetime: Option<f64>,
    /// Fade duration after `lifetime`, then removal
    pub fade: Option<f64>,
    pub fire: Option<FirePlan>,
}

impl Spawn {
    fn new(entity: Entity) -> Self {
        Self {
            entity,
            lifetime: None,
            fade: None,
            fire: None,
        }
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn bullet_category(self) -> Category {
        match self {
            Side::Player => Category::PlayerBullet,
            Side::Enemy => Category::EnemyBullet,
        }
    }
}

/// Uniform sample in `[lo, hi]`; collapses to `lo` when the range is empty
fn uniform<T, R>(rng: &mut R, lo: T, hi: T) -> T
where
    T: SampleUniform + PartialOrd + Copy,
    R: Rng,
{
    if hi <= lo { lo } else { rng.random_range(lo..=hi) }
}

/// Spin rate for one full turn every `period` seconds
fn spin_for_period(period: f64) -> f32 {
    TAU / period as f32
}

pub fn create_player(tuning: &Tuning) -> Spawn {
    let entity = Entity::new(
        Category::Player,
        Vec2::new(tuning.field_width / 2.0, tuning.player_y),
        Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        Visual {
            shape: Shape::Ship,
            tint: Tint::Cyan,
        },
    );
    Spawn::new(entity)
}

/// A bullet centered on `origin`, heading away from its shooter
pub fn create_bullet(tuning: &Tuning, origin: Vec2, side: Side) -> Spawn {
    let size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
    let travel = tuning.field_height + size.y;
    let (tint, traversal, direction) = match side {
        Side::Player => (Tint::Cyan, tuning.bullet_traversal(), 1.0),
        Side::Enemy => (Tint::Red, tuning.enemy_bullet_traversal, -1.0),
    };

    let mut entity = Entity::new(
        side.bullet_category(),
        origin,
        size,
        Visual {
            shape: Shape::Bolt,
            tint,
        },
    );
    entity.vel = Vec2::new(0.0, direction * travel / traversal as f32);

    Spawn {
        lifetime: Some(traversal),
        ..Spawn::new(entity)
    }
}

/// An enemy just above the top edge, descending across the whole field
pub fn create_enemy<R: Rng>(tuning: &Tuning, rng: &mut R) -> Spawn {
    let size = Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT);
    let tint = if rng.random_bool(0.5) { Tint::Red } else { Tint::Orange };
    let x = uniform(rng, size.x / 2.0, tuning.field_width - size.x / 2.0);
    let pos = Vec2::new(x, tuning.field_height + size.y / 2.0);
    let descent = uniform(rng, tuning.enemy_min_descent, tuning.enemy_max_descent);

    let mut entity = Entity::new(
        Category::Enemy,
        pos,
        size,
        Visual {
            shape: Shape::Fighter,
            tint,
        },
    );
    entity.vel = Vec2::new(0.0, -(tuning.field_height + size.y) / descent as f32);

    let fire = rng.random_bool(tuning.enemy_fire_chance).then(|| FirePlan {
        count: descent.floor() as u32,
        period: tuning.enemy_fire_period,
    });
    entity.fires = fire.is_some();

    Spawn {
        lifetime: Some(descent),
        fire,
        ..Spawn::new(entity)
    }
}

/// A spinning asteroid of random tier drifting down and sideways
pub fn create_asteroid<R: Rng>(tuning: &Tuning, rng: &mut R) -> Spawn {
    let tier = AsteroidTier::ALL[rng.random_range(0..AsteroidTier::ALL.len())];
    let width = tier.width();
    let size = Vec2::splat(width);
    let x = uniform(rng, width / 2.0, tuning.field_width - width / 2.0);
    let pos = Vec2::new(x, tuning.field_height + width / 2.0);
    let spin_period = uniform(
        rng,
        tuning.asteroid_min_spin_period,
        tuning.asteroid_max_spin_period,
    );
    let descent = uniform(rng, tuning.asteroid_min_descent, tuning.asteroid_max_descent);
    let drift = uniform(rng, -tuning.asteroid_max_drift, tuning.asteroid_max_drift);

    let mut entity = Entity::new(
        Category::Asteroid,
        pos,
        size,
        Visual {
            shape: Shape::Rock,
            tint: Tint::Gray,
        },
    );
    entity.tier = Some(tier);
    entity.spin = spin_for_period(spin_period);
    entity.vel = Vec2::new(drift, -(tuning.field_height + width)) / descent as f32;

    Spawn {
        lifetime: Some(descent),
        ..Spawn::new(entity)
    }
}

/// Split a destroyed asteroid; empty unless the parent is wide enough
pub fn create_fragments<R: Rng>(tuning: &Tuning, parent: &Entity, rng: &mut R) -> Vec<Spawn> {
    if !parent.can_fragment() {
        return Vec::new();
    }

    let size = parent.size / 2.0;
    let scatter = tuning.fragment_scatter;
    (0..FRAGMENT_COUNT)
        .map(|_| {
            let offset = Vec2::new(
                uniform(rng, -scatter, scatter),
                uniform(rng, -scatter, scatter),
            );
            let spin_period = uniform(
                rng,
                tuning.fragment_min_spin_period,
                tuning.fragment_max_spin_period,
            );
            let drift = Vec2::new(
                uniform(rng, -tuning.fragment_max_drift_x, tuning.fragment_max_drift_x),
                -uniform(rng, tuning.fragment_min_drop, tuning.fragment_max_drop),
            );

            let mut entity = Entity::new(Category::Asteroid, parent.pos + offset, size, parent.visual);
            entity.fragment = true;
            entity.spin = spin_for_period(spin_period);
            entity.vel = drift / tuning.fragment_lifetime as f32;

            Spawn {
                lifetime: Some(tuning.fragment_lifetime),
                fade: Some(tuning.fragment_fade),
                ..Spawn::new(entity)
            }
        })
        .collect()
}
