//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied time only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies
//!
//! Hosts with their own physics engine can skip [`tick`] and drive
//! [`on_frame`], [`spawner::tick`], [`on_contact`] and
//! [`GameState::flush_removals`] directly.

pub mod collision;
pub mod contact;
pub mod factory;
pub mod lifecycle;
pub mod resolve;
pub mod schedule;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Body, CategoryPair, Resolution, dispatch_all, on_contact};
pub use factory::{FirePlan, Side, Spawn};
pub use lifecycle::{game_over, restart};
pub use resolve::damage_player;
pub use schedule::{Action, ScheduleKey, Scheduler};
pub use state::{
    AsteroidTier, Category, ContactMask, Entity, EntityId, GameEvent, GamePhase, GameState,
    HealthTier, Shape, Snapshot, Tint, Visual,
};
pub use tick::{TickInput, integrate, on_frame, set_horizontal_target, signal_restart, tick};
