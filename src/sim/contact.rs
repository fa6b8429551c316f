//! Headless contact discovery
//!
//! Stands in for an engine's physics world when none is attached: finds
//! overlapping bodies whose masks are interested in each other and reports
//! each overlap once, on the frame it begins.

use std::collections::BTreeSet;

use glam::Vec2;

use super::collision::Body;
use super::state::{Category, Entity, EntityId, GameState};
use crate::{circle_rect_overlap, rects_overlap};

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    /// Centered rectangle of the given full size
    Rect(Vec2),
    Circle(f32),
}

impl BodyShape {
    /// Body shape for an entity: ships shrink by `body_scale`, rocks are circles
    pub fn of(entity: &Entity, body_scale: f32) -> Self {
        match entity.category() {
            Category::Player | Category::Enemy => BodyShape::Rect(entity.size * body_scale),
            Category::PlayerBullet | Category::EnemyBullet => BodyShape::Rect(entity.size),
            Category::Asteroid => BodyShape::Circle(entity.width() / 2.0 * body_scale),
        }
    }
}

/// Whether either body wants to hear about the other
pub fn interested(a: Category, b: Category) -> bool {
    a.contact_mask().contains(b.as_mask()) || b.contact_mask().contains(a.as_mask())
}

pub fn overlapping(a: &Entity, b: &Entity, body_scale: f32) -> bool {
    match (BodyShape::of(a, body_scale), BodyShape::of(b, body_scale)) {
        (BodyShape::Rect(sa), BodyShape::Rect(sb)) => rects_overlap(a.pos, sa, b.pos, sb),
        (BodyShape::Circle(r), BodyShape::Rect(s)) => circle_rect_overlap(a.pos, r, b.pos, s),
        (BodyShape::Rect(s), BodyShape::Circle(r)) => circle_rect_overlap(b.pos, r, a.pos, s),
        (BodyShape::Circle(ra), BodyShape::Circle(rb)) => {
            a.pos.distance_squared(b.pos) < (ra + rb) * (ra + rb)
        }
    }
}

/// Find contacts that began since the last call
///
/// Pairs come out ordered by entity id. Pairs that stop overlapping are
/// forgotten, so a later overlap reports again.
pub fn detect(state: &mut GameState) -> Vec<(Body, Body)> {
    let body_scale = state.tuning.body_scale;
    let live: Vec<&Entity> = state.live().collect();
    let mut current: BTreeSet<(EntityId, EntityId)> = BTreeSet::new();
    let mut began = Vec::new();

    for (i, a) in live.iter().enumerate() {
        for b in &live[i + 1..] {
            if !interested(a.category(), b.category()) || !overlapping(a, b, body_scale) {
                continue;
            }
            let key = (a.id.min(b.id), a.id.max(b.id));
            current.insert(key);
            if !state.touching.contains(&key) {
                began.push((
                    Body::new(a.category(), a.id),
                    Body::new(b.category(), b.id),
                ));
            }
        }
    }

    state.touching = current;
    began
}
