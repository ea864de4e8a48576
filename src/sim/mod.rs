//! Arena simulation
//!
//! All gameplay logic lives here. This module is free of rendering and
//! platform code:
//! - Variable timestep, clamped by the frame driver
//! - Seeded RNG only
//! - Entities addressed by id, destroyed entities pruned at end of frame

pub mod collision;
pub mod combat;
pub mod effects;
pub mod enemy;
pub mod entity;
pub mod orb;
pub mod player;
pub mod progression;
pub mod projectile;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod vector;

pub use effects::{BoltKind, Effects};
pub use enemy::{Enemy, EnemyKind, EnemyType};
pub use entity::{Body, Entity, EntityId};
pub use orb::{Orb, OrbKind};
pub use player::{DamageOutcome, Player};
pub use progression::{ChoiceView, LegendaryKind, PowerUpKind, Selection};
pub use projectile::Projectile;
pub use spawn::Director;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use vector::VectorExt;
