//! Game state and run lifecycle
//!
//! `GameState` owns every collection in the arena. Entities refer to each
//! other by id only; everything else reaches them through `&mut GameState`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::effects::Effects;
use super::enemy::Enemy;
use super::entity::{EntityId, prune};
use super::orb::Orb;
use super::player::Player;
use super::progression::{self, ChoiceView, Progression};
use super::projectile::Projectile;
use super::spawn::{self, Director};
use crate::consts::BOSS_LEVEL_INTERVAL;
use crate::tuning::Tuning;

/// Top-level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Waiting for a run to start
    MainMenu,
    Playing,
    Paused,
    /// Simulation suspended while a power-up is picked
    LevelUp,
    GameOver,
}

/// Notifications for the presentation layer, drained by the frame driver
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Message { text: String, seconds: f32 },
    ScoreChanged(u64),
    LevelChanged(u32),
    LivesChanged(u32),
    XpChanged { xp: u32, needed: u32 },
    HealthChanged { health: f32, max: f32 },
    PowerUpChoices(Vec<ChoiceView>),
    /// All legendary slots are full; pick one to drop
    ReplaceLegendary(Vec<ChoiceView>),
    Paused { score: u64 },
    Resumed,
    GameOver { score: u64 },
    BossSpawned { level: u32 },
}

/// Complete state of one run
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    pub tuning: Tuning,
    /// Arena size in pixels
    pub arena: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    /// Seconds of simulated play, summed in f64 so period boundaries land on time
    pub elapsed: f64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub xp_orbs: Vec<Orb>,
    pub health_orbs: Vec<Orb>,
    pub effects: Effects,
    pub director: Director,
    pub progression: Progression,
    /// Homing radius given to newly spawned XP orbs
    pub orb_collection_radius: f32,
    /// Lightning strikes earned but not yet resolved this frame
    pub pending_strikes: u32,
    #[serde(skip)]
    events: Vec<GameEvent>,
    #[serde(skip)]
    rng: Pcg32,
    next_id: EntityId,
}

impl GameState {
    /// Create a fresh state on the main menu with default balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let arena = Vec2::new(tuning.arena_width, tuning.arena_height);
        let player = Player::new(1, arena / 2.0, &tuning);
        Self {
            seed,
            arena,
            phase: GamePhase::MainMenu,
            score: 0,
            elapsed: 0.0,
            player,
            enemies: Vec::new(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            xp_orbs: Vec::new(),
            health_orbs: Vec::new(),
            effects: Effects::default(),
            director: Director::new(&tuning),
            progression: Progression::default(),
            orb_collection_radius: tuning.xp_collection_radius,
            pending_strikes: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 2,
            tuning,
        }
    }

    /// Begin a run from the main menu.
    ///
    /// The first run uses the construction seed; later ones draw a new one.
    pub fn start(&mut self) {
        let seed = if self.elapsed > 0.0 {
            self.rng.random()
        } else {
            self.seed
        };
        self.reset(seed);
    }

    /// Throw away the current run and begin a new one with a fresh seed
    pub fn restart(&mut self) {
        let seed = self.rng.random();
        self.reset(seed);
    }

    fn reset(&mut self, seed: u64) {
        let tuning = self.tuning.clone();
        *self = Self::with_tuning(seed, tuning);
        self.phase = GamePhase::Playing;
        log::info!("Run started (seed {seed})");

        self.emit_hud();
        self.message("Survive the night!", 3.0);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn message(&mut self, text: impl Into<String>, seconds: f32) {
        self.emit(GameEvent::Message {
            text: text.into(),
            seconds,
        });
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Push the full HUD so a fresh screen shows current values
    pub fn emit_hud(&mut self) {
        self.emit(GameEvent::ScoreChanged(self.score));
        self.emit(GameEvent::LevelChanged(self.player.level));
        self.emit(GameEvent::LivesChanged(self.player.lives));
        self.emit_xp();
        self.emit_health();
    }

    pub fn emit_xp(&mut self) {
        self.emit(GameEvent::XpChanged {
            xp: self.player.xp,
            needed: self.player.xp_to_next_level,
        });
    }

    pub fn emit_health(&mut self) {
        self.emit(GameEvent::HealthChanged {
            health: self.player.health,
            max: self.player.max_health,
        });
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.emit(GameEvent::ScoreChanged(self.score));
    }

    /// Give the player XP and react to a level-up
    pub fn grant_xp(&mut self, amount: u32) {
        let leveled = self.player.add_xp(amount);
        self.emit_xp();
        if !leveled {
            return;
        }

        let level = self.player.level;
        log::info!("Player reached level {level}");
        self.emit(GameEvent::LevelChanged(level));
        self.message(format!("Level {level}!"), 2.0);

        if level % BOSS_LEVEL_INTERVAL == 0 {
            spawn::spawn_boss(self);
        }
        progression::begin_level_up(self);
    }

    pub fn spawn_xp_orb(&mut self, pos: Vec2, value: u32) {
        let id = self.next_entity_id();
        let orb = Orb::experience(id, pos, value, self.orb_collection_radius);
        self.xp_orbs.push(orb);
    }

    pub fn spawn_health_orb(&mut self, pos: Vec2) {
        let id = self.next_entity_id();
        self.health_orbs.push(Orb::health(id, pos));
    }

    /// Playing -> Paused
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        self.emit(GameEvent::Paused { score: self.score });
        true
    }

    /// Paused -> Playing
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.emit(GameEvent::Resumed);
        true
    }

    /// Give up the current run
    pub fn end_run(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing | GamePhase::Paused => {
                self.game_over();
                true
            }
            _ => false,
        }
    }

    pub fn game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over: score {}, level {}, survived {:.0}s",
            self.score,
            self.player.level,
            self.elapsed
        );
        self.emit(GameEvent::GameOver { score: self.score });
    }

    /// GameOver -> MainMenu
    pub fn return_to_menu(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::MainMenu;
        true
    }

    /// Drop every entity destroyed during the frame
    pub fn prune_inactive(&mut self) {
        prune(&mut self.enemies);
        prune(&mut self.player_projectiles);
        prune(&mut self.enemy_projectiles);
        prune(&mut self.xp_orbs);
        prune(&mut self.health_orbs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::combat::hurt_player;
    use crate::sim::entity::Entity;

    fn playing() -> GameState {
        let mut state = GameState::new(7);
        state.start();
        state.drain_events();
        state
    }

    #[test]
    fn test_start_enters_playing() {
        let mut state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::MainMenu);
        state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos(), state.arena / 2.0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LivesChanged(3)));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_last_life_ends_run() {
        let mut state = playing();
        state.player.lives = 1;
        hurt_player(&mut state, 1000.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_pause_resume_and_end_run() {
        let mut state = playing();
        assert!(state.pause());
        assert!(!state.pause());
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.resume());
        assert_eq!(state.phase, GamePhase::Playing);

        assert!(state.pause());
        assert!(state.end_run());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.return_to_menu());
        assert_eq!(state.phase, GamePhase::MainMenu);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = playing();
        state.score = 500;
        state.player.level = 4;
        state.spawn_xp_orb(Vec2::new(10.0, 10.0), 20);
        state.game_over();

        let old_seed = state.seed;
        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.level, 1);
        assert!(state.xp_orbs.is_empty());
        assert_ne!(state.seed, old_seed);
    }

    #[test]
    fn test_tenth_level_summons_boss() {
        let mut state = playing();
        state.player.level = 9;
        state.player.xp_to_next_level = 10;
        state.grant_xp(10);
        assert_eq!(state.player.level, 10);
        assert_eq!(state.enemies.iter().filter(|e| e.is_boss()).count(), 1);
        assert_eq!(state.phase, GamePhase::LevelUp);
    }

    #[test]
    fn test_orb_radius_applies_to_new_orbs() {
        let mut state = playing();
        state.orb_collection_radius = 120.0;
        state.spawn_xp_orb(Vec2::ZERO, 5);
        assert_eq!(state.xp_orbs[0].collection_radius, 120.0);
    }
}
