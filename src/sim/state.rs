//! Game state and core simulation types
//!
//! Session counters, the live entity set, the delayed-action queue and the
//! outbound event queue all live in [`GameState`].

use std::collections::BTreeSet;

use bitflags::bitflags;
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::factory::{self, Spawn};
use super::schedule::{Action, ScheduleKey, Scheduler};
use super::spawner;
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};

/// Stable handle to a spawned entity (never reused within a session)
pub type EntityId = u32;

/// Collision role of an entity
///
/// Discriminants are the physics category bits. Their numeric order is the
/// canonical order used to key contact pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Category {
    Player = 0b1,
    PlayerBullet = 0b10,
    Enemy = 0b100,
    EnemyBullet = 0b1000,
    Asteroid = 0b10000,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Player,
        Category::PlayerBullet,
        Category::Enemy,
        Category::EnemyBullet,
        Category::Asteroid,
    ];

    /// Raw category bit
    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// This category as a single-bit mask
    #[inline]
    pub fn as_mask(self) -> ContactMask {
        ContactMask::from_bits_truncate(self.bits())
    }

    /// Categories this one wants contact notifications for
    pub fn contact_mask(self) -> ContactMask {
        match self {
            Category::Player => ContactMask::ENEMY | ContactMask::ENEMY_BULLET | ContactMask::ASTEROID,
            Category::PlayerBullet => ContactMask::ENEMY | ContactMask::ASTEROID,
            Category::Enemy => ContactMask::PLAYER | ContactMask::PLAYER_BULLET,
            Category::EnemyBullet => ContactMask::PLAYER,
            Category::Asteroid => ContactMask::PLAYER | ContactMask::PLAYER_BULLET,
        }
    }
}

bitflags! {
    /// Set of categories a body is notified about touching
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ContactMask: u32 {
        const PLAYER = 0b1;
        const PLAYER_BULLET = 0b10;
        const ENEMY = 0b100;
        const ENEMY_BULLET = 0b1000;
        const ASTEROID = 0b10000;
    }
}

/// Spawn size tiers for asteroids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidTier {
    Small,
    Medium,
    Large,
}

impl AsteroidTier {
    pub const ALL: [AsteroidTier; 3] = [AsteroidTier::Small, AsteroidTier::Medium, AsteroidTier::Large];

    /// Side length of a square asteroid of this tier
    pub fn width(self) -> f32 {
        match self {
            AsteroidTier::Small => 30.0,
            AsteroidTier::Medium => 60.0,
            AsteroidTier::Large => 90.0,
        }
    }
}

/// Tint hints for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Cyan,
    Red,
    Orange,
    Gray,
}

/// Shape hints for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Ship,
    Bolt,
    Fighter,
    Rock,
}

/// What presentation should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visual {
    pub shape: Shape,
    pub tint: Tint,
}

/// A live game object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    category: Category,
    pub pos: Vec2,
    pub size: Vec2,
    /// Linear velocity (points/s)
    pub vel: Vec2,
    /// Current rotation (radians); bank angle for the player
    pub rotation: f32,
    /// Continuous spin (radians/s)
    pub spin: f32,
    pub visual: Visual,
    /// Spawn tier (asteroids from the spawner only)
    pub tier: Option<AsteroidTier>,
    /// Split off a destroyed asteroid
    pub fragment: bool,
    /// Enemy with periodic fire behavior
    pub fires: bool,
    /// Fading out before removal
    pub fading: bool,
    /// Resolved in a contact or expired; removed at the next flush
    #[serde(skip)]
    consumed: bool,
}

impl Entity {
    /// Create an unregistered entity; the id is assigned on insertion
    pub fn new(category: Category, pos: Vec2, size: Vec2, visual: Visual) -> Self {
        Self {
            id: 0,
            category,
            pos,
            size,
            vel: Vec2::ZERO,
            rotation: 0.0,
            spin: 0.0,
            visual,
            tier: None,
            fragment: false,
            fires: false,
            fading: false,
            consumed: false,
        }
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Derived from the category, never stored
    #[inline]
    pub fn contact_mask(&self) -> ContactMask {
        self.category.contact_mask()
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    /// Whether destroying this asteroid splits it into fragments
    pub fn can_fragment(&self) -> bool {
        self.category == Category::Asteroid && self.width() > FRAGMENT_MIN_PARENT_WIDTH
    }

    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, waiting for a restart tap
    GameOver,
}

/// Health bar bucket shown by presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthTier {
    /// Above 60%
    Healthy,
    /// Above 30% up to 60%
    Warning,
    /// 30% and below
    Critical,
}

impl HealthTier {
    pub fn from_health(health: u32, max_health: u32) -> Self {
        let fraction = health as f32 / max_health.max(1) as f32;
        if fraction > HEALTHY_ABOVE {
            HealthTier::Healthy
        } else if fraction > WARNING_ABOVE {
            HealthTier::Warning
        } else {
            HealthTier::Critical
        }
    }
}

/// Outbound commands for the rendering collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Register a renderable
    Spawned {
        id: EntityId,
        category: Category,
        pos: Vec2,
        size: Vec2,
        visual: Visual,
    },
    /// Remove a renderable
    Removed { id: EntityId },
    /// Fade an entity out over `duration` seconds (removal follows)
    FadeOut { id: EntityId, duration: f64 },
    Explosion { pos: Vec2, size: Vec2, tint: Tint },
    Impact { pos: Vec2, tint: Tint },
    /// Cosmetic blink on the damaged ship; contacts stay active
    DamageFlash { id: EntityId, duration: f64 },
    ScoreChanged { score: u64 },
    HealthChanged { health: u32, tier: HealthTier },
    GameOver { final_score: u64 },
    /// Session reset; presentation rebuilds the HUD
    Restarted,
}

/// Serializable view of a session for HUD and host code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u64,
    pub health: u32,
    pub health_tier: HealthTier,
    pub phase: GamePhase,
    pub entities: Vec<Entity>,
}

impl Snapshot {
    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// Final score line, only while the game is over
    pub fn final_score_text(&self) -> Option<String> {
        (self.phase == GamePhase::GameOver).then(|| format!("Final Score: {}", self.score))
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub health: u32,
    /// Time of the last automatic shot
    pub last_fire_time: f64,
    /// Time of the last frame; `None` right after a reset
    pub last_update_time: Option<f64>,
    /// Seconds elapsed between the last two frames
    pub delta_time: f64,
    /// Latest time observed by the simulation
    pub clock: f64,
    /// Horizontal position the ship is steering toward
    pub target_x: Option<f32>,
    pub player: Option<EntityId>,
    /// Live entities, ordered by id
    pub entities: Vec<Entity>,
    pub scheduler: Scheduler,
    pub events: Vec<GameEvent>,
    /// Entity pairs overlapping as of the last contact pass
    pub(crate) touching: BTreeSet<(EntityId, EntityId)>,
    next_id: EntityId,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::start(seed, Tuning::default())
    }

    /// Create a session with custom balance; rejects tuning that fails validation
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::start(seed, tuning))
    }

    /// Spawn the player and arm both spawn schedules
    fn start(seed: u64, tuning: Tuning) -> Self {
        let health = tuning.max_health;
        let mut state = Self {
            seed,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            score: 0,
            health,
            last_fire_time: 0.0,
            last_update_time: None,
            delta_time: 0.0,
            clock: 0.0,
            target_x: None,
            player: None,
            entities: Vec::new(),
            scheduler: Scheduler::default(),
            events: Vec::new(),
            touching: BTreeSet::new(),
            next_id: 1,
        };

        state.spawn_player();
        spawner::arm(&mut state);
        log::info!("Scene started with seed {}", seed);

        state
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn health_tier(&self) -> HealthTier {
        HealthTier::from_health(self.health, self.tuning.max_health)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Look up a live entity (consumed entities are invisible)
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id && !e.consumed)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id && !e.consumed)
    }

    /// Iterate live entities in id order
    pub fn live(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.consumed)
    }

    /// Count live entities of one category
    pub fn count(&self, category: Category) -> usize {
        self.live().filter(|e| e.category == category).count()
    }

    pub fn player_entity(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.entity(id))
    }

    pub fn player_entity_mut(&mut self) -> Option<&mut Entity> {
        let id = self.player?;
        self.entity_mut(id)
    }

    /// Add an entity to the live set and announce it
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        entity.id = self.next_entity_id();
        entity.consumed = false;
        self.events.push(GameEvent::Spawned {
            id: entity.id,
            category: entity.category,
            pos: entity.pos,
            size: entity.size,
            visual: entity.visual,
        });
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Insert a factory product and schedule its timed behavior
    pub fn insert_spawn(&mut self, spawn: Spawn, now: f64) -> EntityId {
        let Spawn {
            entity,
            lifetime,
            fade,
            fire,
        } = spawn;
        let id = self.insert(entity);
        let key = ScheduleKey::Entity(id);

        if let Some(lifetime) = lifetime {
            let action = if fade.is_some() {
                Action::BeginFade(id)
            } else {
                Action::Expire(id)
            };
            self.scheduler.once(key, action, now + lifetime);
        }
        if let Some(plan) = fire.filter(|plan| plan.count > 0) {
            self.scheduler
                .repeat_n(key, Action::EnemyFire(id), now + plan.period, plan.period, plan.count);
        }
        id
    }

    /// Mark an entity for removal and drop its pending timers
    ///
    /// Returns false if the entity was already gone.
    pub fn consume(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        entity.consumed = true;
        self.scheduler.cancel(ScheduleKey::Entity(id));
        if self.player == Some(id) {
            self.player = None;
        }
        true
    }

    /// Drop consumed entities from the live set
    pub fn flush_removals(&mut self) {
        let events = &mut self.events;
        self.entities.retain(|e| {
            if e.consumed {
                events.push(GameEvent::Removed { id: e.id });
                false
            } else {
                true
            }
        });
    }

    /// Remove every entity, announcing each removal
    pub fn clear_entities(&mut self) {
        for entity in self.entities.drain(..) {
            self.events.push(GameEvent::Removed { id: entity.id });
        }
        self.touching.clear();
        self.player = None;
    }

    /// Create the player ship at its start position
    pub fn spawn_player(&mut self) -> EntityId {
        let spawn = factory::create_player(&self.tuning);
        let id = self.insert_spawn(spawn, self.clock);
        self.player = Some(id);
        id
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            health: self.health,
            health_tier: self.health_tier(),
            phase: self.phase,
            entities: self.live().cloned().collect(),
        }
    }
}
