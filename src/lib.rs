//! Dracula Survivors - a top-down arena survival game
//!
//! Core modules:
//! - `sim`: Simulation (entities, combat, spawning, progression, game state)
//! - `game`: Frame driver that wires the simulation to its collaborators
//! - `renderer`: Pure draw-list generation and the renderer seam
//! - `ui`: Notification seam for HUD and menu screens
//! - `persistence`: High score storage backends
//! - `platform`: Logging and input helpers
//! - `tuning`: Data-driven game balance
//! - `web`: Browser entry point (wasm32)

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;
pub mod ui;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{FrameOutcome, Game};
pub use highscores::HighScores;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Largest frame step fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Slack when comparing the run clock against whole difficulty periods
    pub const CLOCK_EPSILON: f64 = 1e-6;

    /// Concurrently active legendary power-ups
    pub const MAX_LEGENDARY_SLOTS: usize = 2;
    /// Power-ups offered per level-up
    pub const POWER_UP_CHOICES: usize = 3;
    /// A boss shows up every Nth player level
    pub const BOSS_LEVEL_INTERVAL: u32 = 10;

    /// Spawn distances outside the arena edge
    pub const ENEMY_SPAWN_MARGIN: f32 = 30.0;
    pub const BOSS_SPAWN_MARGIN: f32 = 50.0;
    /// Boss placement keeps at least this far from the player (best effort)
    pub const BOSS_MIN_PLAYER_DISTANCE: f32 = 200.0;
    pub const BOSS_SPAWN_ATTEMPTS: u32 = 10;
    /// Health orbs scattered by a defeated boss
    pub const BOSS_HEALTH_DROPS: u32 = 3;

    /// Score awarded per XP point of a kill
    pub const SCORE_PER_XP: u64 = 10;
    /// Chain lightning deals this fraction of the primary strike
    pub const CHAIN_DAMAGE_FACTOR: f32 = 0.7;

    /// Orb defaults
    pub const XP_ORB_RADIUS: f32 = 5.0;
    pub const XP_ORB_SPEED: f32 = 300.0;
    pub const HEALTH_ORB_RADIUS: f32 = 8.0;
    pub const HEALTH_ORB_HEAL: f32 = 25.0;

    /// Fire trail zone geometry
    pub const FIRE_ZONE_RADIUS: f32 = 25.0;
    pub const FIRE_ZONE_LIFETIME: f32 = 2.0;

    /// Effect lifetimes (seconds)
    pub const EXPLOSION_LIFETIME: f32 = 0.3;
    pub const STRIKE_LIFETIME: f32 = 0.3;
    pub const CHAIN_LIFETIME: f32 = 0.2;
}
