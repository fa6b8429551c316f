//! Contact dispatch
//!
//! A contact arrives as two bodies in whatever order the physics collaborator
//! found them. The pair is canonicalized by category value, looked up in a
//! fixed resolution table and handed to the matching handler.

use serde::{Deserialize, Serialize};

use super::resolve;
use super::state::{Category, EntityId, GameState};

/// Physics body metadata delivered with a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub category: Category,
    pub entity: EntityId,
}

impl Body {
    pub fn new(category: Category, entity: EntityId) -> Self {
        Self { category, entity }
    }
}

/// Unordered category pair, stored lower category first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryPair {
    pub first: Category,
    pub second: Category,
}

impl CategoryPair {
    pub fn new(a: Category, b: Category) -> Self {
        if a.bits() <= b.bits() {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }
}

/// Handler selected for a recognized pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    BulletHitsEnemy,
    BulletHitsAsteroid,
    EnemyBulletHitsPlayer,
    EnemyRamsPlayer,
    AsteroidHitsPlayer,
}

/// Every recognized contact, keyed by canonical pair
pub const RESOLUTIONS: [(CategoryPair, Resolution); 5] = [
    (
        CategoryPair {
            first: Category::PlayerBullet,
            second: Category::Enemy,
        },
        Resolution::BulletHitsEnemy,
    ),
    (
        CategoryPair {
            first: Category::PlayerBullet,
            second: Category::Asteroid,
        },
        Resolution::BulletHitsAsteroid,
    ),
    (
        CategoryPair {
            first: Category::Player,
            second: Category::EnemyBullet,
        },
        Resolution::EnemyBulletHitsPlayer,
    ),
    (
        CategoryPair {
            first: Category::Player,
            second: Category::Enemy,
        },
        Resolution::EnemyRamsPlayer,
    ),
    (
        CategoryPair {
            first: Category::Player,
            second: Category::Asteroid,
        },
        Resolution::AsteroidHitsPlayer,
    ),
];

pub fn resolution_for(pair: CategoryPair) -> Option<Resolution> {
    RESOLUTIONS
        .iter()
        .find(|(key, _)| *key == pair)
        .map(|&(_, resolution)| resolution)
}

/// Resolve one contact immediately
///
/// Unrecognized pairs, stale bodies (already consumed this frame or whose
/// category no longer matches) and contacts after game over are dropped.
pub fn on_contact(state: &mut GameState, a: Body, b: Body) {
    if state.is_game_over() {
        return;
    }

    let (first, second) = if a.category.bits() <= b.category.bits() {
        (a, b)
    } else {
        (b, a)
    };
    let Some(resolution) = resolution_for(CategoryPair::new(first.category, second.category))
    else {
        log::trace!(
            "Ignoring contact {:?} x {:?}",
            first.category,
            second.category
        );
        return;
    };

    let live = |body: Body| {
        state
            .entity(body.entity)
            .is_some_and(|e| e.category() == body.category)
    };
    if !live(first) || !live(second) {
        log::trace!(
            "Ignoring stale contact {} x {}",
            first.entity,
            second.entity
        );
        return;
    }

    log::debug!(
        "Contact {:?}: {} x {}",
        resolution,
        first.entity,
        second.entity
    );
    resolve::apply(state, resolution, first.entity, second.entity);
}

/// Resolve a batch of contacts in delivery order
pub fn dispatch_all(state: &mut GameState, contacts: &[(Body, Body)]) {
    for &(a, b) in contacts {
        on_contact(state, a, b);
    }
}
