//! Enemy spawning and difficulty escalation

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::state::{GameEvent, GameState};
use super::vector::VectorExt;
use crate::consts::{
    BOSS_MIN_PLAYER_DISTANCE, BOSS_SPAWN_ATTEMPTS, BOSS_SPAWN_MARGIN, CLOCK_EPSILON, ENEMY_SPAWN_MARGIN,
};
use crate::tuning::Tuning;

/// Spawn cadence and difficulty multiplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Director {
    /// Scales health, damage and XP of new spawns
    pub multiplier: f32,
    /// Seconds between spawn waves
    pub spawn_interval: f32,
    pub spawn_timer: f32,
    /// Escalations applied so far
    pub escalations: u32,
}

/// What the director decided this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectorStep {
    pub escalations: u32,
    pub spawn_count: u32,
}

impl Director {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            multiplier: 1.0,
            spawn_interval: tuning.spawn_interval,
            spawn_timer: 0.0,
            escalations: 0,
        }
    }

    /// Advance timers; `elapsed` already includes this frame
    pub fn advance(&mut self, elapsed: f64, dt: f32, tuning: &Tuning) -> DirectorStep {
        let mut step = DirectorStep::default();

        let due = whole_periods(elapsed, tuning.difficulty_period_secs);
        while self.escalations < due {
            self.escalations += 1;
            self.multiplier += tuning.difficulty_step;
            self.spawn_interval =
                (self.spawn_interval * tuning.spawn_interval_decay).max(tuning.min_spawn_interval);
            step.escalations += 1;
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= self.spawn_interval {
            self.spawn_timer = 0.0;
            step.spawn_count = 1 + whole_periods(elapsed, tuning.spawn_ramp_secs);
        }
        step
    }
}

/// Completed `period`s in `elapsed`, forgiving accumulated rounding
fn whole_periods(elapsed: f64, period: f32) -> u32 {
    ((elapsed + CLOCK_EPSILON) / f64::from(period)).floor() as u32
}

/// Uniform point on a random side, `margin` pixels outside the arena
pub fn edge_position(rng: &mut impl Rng, arena: Vec2, margin: f32) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random_range(0.0..=arena.x), -margin),
        1 => Vec2::new(arena.x + margin, rng.random_range(0.0..=arena.y)),
        2 => Vec2::new(rng.random_range(0.0..=arena.x), arena.y + margin),
        _ => Vec2::new(-margin, rng.random_range(0.0..=arena.y)),
    }
}

/// Run the director for one frame and spawn whatever it asks for
pub fn run_director(state: &mut GameState, dt: f32) {
    let step = state.director.advance(state.elapsed, dt, &state.tuning);
    if step.escalations > 0 {
        log::info!(
            "Difficulty x{:.1}, spawn interval {:.2}s",
            state.director.multiplier,
            state.director.spawn_interval
        );
    }
    for _ in 0..step.spawn_count {
        spawn_enemy(state);
    }
}

pub fn spawn_enemy(state: &mut GameState) {
    let arena = state.arena;
    let chaser_weight = state.tuning.chaser_weight.clamp(0.0, 1.0);
    let rng = state.rng();
    let pos = edge_position(rng, arena, ENEMY_SPAWN_MARGIN);
    let is_chaser = rng.random_bool(chaser_weight);

    let id = state.next_entity_id();
    let mut enemy = if is_chaser {
        Enemy::chaser(id, pos)
    } else {
        Enemy::shooter(id, pos)
    };
    enemy.scale_for_difficulty(state.director.multiplier, state.tuning.melee_damage_bonus);
    log::debug!("Spawned {:?} #{id} at ({:.0}, {:.0})", enemy.kind.tag(), pos.x, pos.y);
    state.enemies.push(enemy);
}

/// Summon a boss for the player's current level, away from the player
pub fn spawn_boss(state: &mut GameState) {
    let arena = state.arena;
    let player_pos = state.player.body.pos;
    let level = state.player.level;

    let rng = state.rng();
    let mut pos = edge_position(rng, arena, BOSS_SPAWN_MARGIN);
    for _ in 1..BOSS_SPAWN_ATTEMPTS {
        if pos.distance_to(player_pos) >= BOSS_MIN_PLAYER_DISTANCE {
            break;
        }
        pos = edge_position(rng, arena, BOSS_SPAWN_MARGIN);
    }

    let id = state.next_entity_id();
    let mut boss = Enemy::boss(id, pos, level);
    boss.scale_for_difficulty(state.director.multiplier, 1.0);
    log::info!("Boss spawned for level {level} ({} hp)", boss.health);
    state.enemies.push(boss);

    state.emit(GameEvent::BossSpawned { level });
    state.message(format!("Level {level} boss has appeared!"), 4.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_escalation_after_thirty_seconds() {
        let tuning = Tuning::default();
        let mut director = Director::new(&tuning);

        let step = director.advance(29.9, 0.1, &tuning);
        assert_eq!(step.escalations, 0);
        assert_eq!(director.multiplier, 1.0);

        let step = director.advance(30.0, 0.1, &tuning);
        assert_eq!(step.escalations, 1);
        assert!((director.multiplier - 1.2).abs() < 1e-6);
        assert!((director.spawn_interval - 3.0 * 0.92).abs() < 1e-6);

        // Same second again does not escalate twice
        assert_eq!(director.advance(30.05, 0.05, &tuning).escalations, 0);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let tuning = Tuning::default();
        let mut director = Director::new(&tuning);
        director.advance(30.0 * 40.0, 0.0, &tuning);
        assert_eq!(director.escalations, 40);
        assert_eq!(director.spawn_interval, tuning.min_spawn_interval);
    }

    #[test]
    fn test_spawn_count_ramps() {
        let tuning = Tuning::default();
        let mut director = Director::new(&tuning);
        assert_eq!(director.advance(3.0, 3.0, &tuning).spawn_count, 1);
        assert_eq!(director.spawn_timer, 0.0);
        assert_eq!(director.advance(26.0, 1.0, &tuning).spawn_count, 0);
        assert_eq!(director.advance(28.0, 2.0, &tuning).spawn_count, 2);
    }

    #[test]
    fn test_edge_position_is_outside() {
        let mut rng = Pcg32::seed_from_u64(3);
        let arena = Vec2::new(1200.0, 800.0);
        for _ in 0..200 {
            let p = edge_position(&mut rng, arena, 30.0);
            let on_band = p.x == -30.0 || p.x == 1230.0 || p.y == -30.0 || p.y == 830.0;
            assert!(on_band, "{p:?}");
        }
    }

    #[test]
    fn test_spawned_enemies_are_scaled() {
        let mut state = GameState::new(11);
        state.start();
        state.director.multiplier = 2.0;
        for _ in 0..20 {
            spawn_enemy(&mut state);
        }
        for enemy in &state.enemies {
            assert_eq!(enemy.health, enemy.max_health);
            assert!(enemy.health == 100.0 || enemy.health == 160.0);
        }
    }

    #[test]
    fn test_spawned_chaser_deals_scaled_melee_damage() {
        let tuning = Tuning {
            chaser_weight: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(11, tuning);
        state.start();
        state.director.multiplier = 2.0;
        spawn_enemy(&mut state);

        let chaser = &state.enemies[0];
        assert!(matches!(chaser.kind, EnemyKind::Chaser));
        assert_eq!(chaser.health, 100.0);
        assert_eq!(chaser.damage, 24.0);
    }

    #[test]
    fn test_whole_periods_forgives_rounding() {
        assert_eq!(whole_periods(29.999_999_5, 30.0), 1);
        assert_eq!(whole_periods(29.99, 30.0), 0);
        assert_eq!(whole_periods(60.0, 30.0), 2);
    }

    #[test]
    fn test_boss_keeps_distance_when_possible() {
        let mut state = GameState::new(5);
        state.start();
        state.player.level = 10;
        spawn_boss(&mut state);
        let boss = &state.enemies[0];
        assert!(boss.is_boss());
        assert!(boss.body.pos.distance_to(state.player.body.pos) >= BOSS_MIN_PLAYER_DISTANCE);
        assert!(state.drain_events().contains(&GameEvent::BossSpawned { level: 10 }));
    }
}
