//! The player character: movement, auto-fire, damage intake, XP and the
//! flag-gated abilities granted by legendary power-ups.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::collision::clamp_to_arena;
use super::entity::{Body, Entity, EntityId};
use super::projectile::{FanShape, Volley};
use super::vector::VectorExt;
use crate::tuning::Tuning;

/// Result of [`Player::take_damage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Invulnerable, nothing happened
    Ignored,
    Hit,
    /// Health ran out but lives remain; health was refilled
    LifeLost { lives_left: u32 },
    /// Last life spent
    GameOver,
}

impl DamageOutcome {
    /// Whether the hit actually landed
    pub fn applied(self) -> bool {
        self != DamageOutcome::Ignored
    }
}

/// Weapon profile, mutated by stat power-ups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub shoot_cooldown: f32,
    pub shoot_timer: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_size: f32,
    pub projectile_pierce: u32,
    pub num_projectiles: u32,
    /// Angle between neighbouring shots of one volley
    pub projectile_spread: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplosiveShots {
    pub enabled: bool,
    pub radius: f32,
    pub damage: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vampirism {
    pub enabled: bool,
    /// Fraction of dealt damage returned as health (floored)
    pub rate: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightningStorm {
    pub enabled: bool,
    pub kill_count: u32,
    /// Kills needed per strike
    pub threshold: u32,
    pub damage: f32,
    pub chain_range: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireTrail {
    pub enabled: bool,
    pub timer: f32,
    pub interval: f32,
    /// Damage per second inside a zone
    pub damage: f32,
}

impl Default for FireTrail {
    fn default() -> Self {
        Self {
            enabled: false,
            timer: 0.0,
            interval: 0.1,
            damage: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cyclone {
    pub enabled: bool,
    /// Visual rotation only; damage covers the full radius
    pub angle: f32,
    pub speed: f32,
    pub radius: f32,
    /// Damage per second to every enemy in range
    pub damage: f32,
}

impl Default for Cyclone {
    fn default() -> Self {
        Self {
            enabled: false,
            angle: 0.0,
            speed: TAU,
            radius: 30.0,
            damage: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralOverload {
    pub enabled: bool,
    pub active: bool,
    pub timer: f32,
    /// Idle time before each activation
    pub cooldown: f32,
    pub duration: f32,
}

impl Default for NeuralOverload {
    fn default() -> Self {
        Self {
            enabled: false,
            active: false,
            timer: 0.0,
            cooldown: 5.0,
            duration: 3.0,
        }
    }
}

/// Optional subsystems toggled by legendary power-ups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Abilities {
    pub explosive: ExplosiveShots,
    pub vampirism: Vampirism,
    pub lightning: LightningStorm,
    pub fire_trail: FireTrail,
    pub cyclone: Cyclone,
    pub overload: NeuralOverload,
}

/// Side effects of one player update the world has to act on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerSignals {
    pub overload_started: bool,
    /// Drop a fire zone at this position
    pub fire_trail_at: Option<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub lives: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub xp_growth: f32,
    pub invulnerable_time: f32,
    pub invulnerable_timer: f32,
    pub weapon: Weapon,
    pub abilities: Abilities,
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            body: Body::new(id, pos, tuning.player_radius),
            speed: tuning.player_speed,
            health: tuning.player_max_health,
            max_health: tuning.player_max_health,
            lives: tuning.player_lives,
            level: 1,
            xp: 0,
            xp_to_next_level: tuning.first_level_xp,
            xp_growth: tuning.xp_growth,
            invulnerable_time: tuning.invulnerable_time,
            invulnerable_timer: 0.0,
            weapon: Weapon {
                shoot_cooldown: tuning.shoot_cooldown,
                shoot_timer: 0.0,
                projectile_speed: tuning.projectile_speed,
                projectile_damage: tuning.projectile_damage,
                projectile_size: tuning.projectile_size,
                projectile_pierce: 0,
                num_projectiles: 1,
                projectile_spread: tuning.projectile_spread,
            },
            abilities: Abilities::default(),
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }

    /// Set velocity from raw axis input (diagonals normalized)
    pub fn steer(&mut self, axis: Vec2) {
        self.body.vel = axis.normalized() * self.speed;
    }

    /// Move, clamp to the arena and run the self-contained timers
    pub fn update(&mut self, dt: f32, arena: Vec2) -> PlayerSignals {
        let mut signals = PlayerSignals::default();

        self.body.integrate(dt);
        self.body.pos = clamp_to_arena(self.body.pos, self.body.radius, arena);

        if self.weapon.shoot_timer > 0.0 {
            self.weapon.shoot_timer -= dt;
        }
        if self.invulnerable_timer > 0.0 {
            self.invulnerable_timer -= dt;
        }

        let overload = &mut self.abilities.overload;
        if overload.enabled {
            overload.timer += dt;
            if !overload.active && overload.timer >= overload.cooldown {
                overload.active = true;
                overload.timer = 0.0;
                signals.overload_started = true;
            } else if overload.active && overload.timer >= overload.duration {
                overload.active = false;
                overload.timer = 0.0;
            }
        }

        let trail = &mut self.abilities.fire_trail;
        if trail.enabled {
            trail.timer += dt;
            if trail.timer >= trail.interval {
                trail.timer = 0.0;
                signals.fire_trail_at = Some(self.body.pos);
            }
        }

        let cyclone = &mut self.abilities.cyclone;
        if cyclone.enabled {
            cyclone.angle += cyclone.speed * dt;
            if cyclone.angle >= TAU {
                cyclone.angle = 0.0;
            }
        }

        signals
    }

    /// Shots per volley, doubled while neural overload is active
    pub fn shots_per_volley(&self) -> u32 {
        if self.abilities.overload.active {
            self.weapon.num_projectiles * 2
        } else {
            self.weapon.num_projectiles
        }
    }

    /// Fire at `target` if the weapon is ready
    pub fn try_fire(&mut self, target: Vec2) -> Option<Volley> {
        if self.weapon.shoot_timer > 0.0 {
            return None;
        }
        let aim = (target - self.body.pos).heading();
        let shape = FanShape {
            count: self.shots_per_volley(),
            step: self.weapon.projectile_spread,
            speed: self.weapon.projectile_speed,
        };
        self.weapon.shoot_timer = self.weapon.shoot_cooldown;
        Some(Volley::fan(
            self.body.pos,
            aim,
            shape,
            self.weapon.projectile_size,
            self.weapon.projectile_damage,
            self.weapon.projectile_pierce,
        ))
    }

    /// Apply incoming damage unless invulnerable
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }

        self.health -= amount;
        self.invulnerable_timer = self.invulnerable_time;
        if self.health > 0.0 {
            return DamageOutcome::Hit;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.health = 0.0;
            DamageOutcome::GameOver
        } else {
            self.health = self.max_health;
            DamageOutcome::LifeLost {
                lives_left: self.lives,
            }
        }
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Accumulate XP; returns true if this crossed the level threshold
    pub fn add_xp(&mut self, amount: u32) -> bool {
        self.xp = self.xp.saturating_add(amount);
        if self.xp >= self.xp_to_next_level {
            self.level_up();
            true
        } else {
            false
        }
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.xp = 0;
        self.xp_to_next_level = (self.xp_to_next_level as f64 * self.xp_growth as f64).floor() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(1, Vec2::new(600.0, 400.0), &Tuning::default())
    }

    fn arena() -> Vec2 {
        Vec2::new(1200.0, 800.0)
    }

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let mut p = player();
        p.steer(Vec2::new(1.0, 1.0));
        assert!((p.body.vel.magnitude() - p.speed).abs() < 1e-3);
        p.steer(Vec2::ZERO);
        assert_eq!(p.body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_movement_clamped_to_arena() {
        let mut p = player();
        p.steer(Vec2::new(-1.0, 0.0));
        for _ in 0..100 {
            p.update(0.1, arena());
        }
        assert_eq!(p.body.pos.x, p.body.radius);
    }

    #[test]
    fn test_invulnerable_damage_is_ignored() {
        let mut p = player();
        assert_eq!(p.take_damage(10.0), DamageOutcome::Hit);
        assert_eq!(p.health, 90.0);

        let outcome = p.take_damage(10.0);
        assert!(!outcome.applied());
        assert_eq!(p.health, 90.0);
    }

    #[test]
    fn test_life_lost_refills_health() {
        let mut p = player();
        let outcome = p.take_damage(150.0);
        assert_eq!(outcome, DamageOutcome::LifeLost { lives_left: 2 });
        assert_eq!(p.health, p.max_health);
    }

    #[test]
    fn test_last_life_is_game_over() {
        let mut p = player();
        p.lives = 1;
        assert_eq!(p.take_damage(500.0), DamageOutcome::GameOver);
        assert_eq!(p.lives, 0);
        assert_eq!(p.health, 0.0);
    }

    #[test]
    fn test_level_up_threshold_growth() {
        let mut p = player();
        assert_eq!(p.xp_to_next_level, 100);
        assert!(p.add_xp(100));
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 0);
        assert_eq!(p.xp_to_next_level, 150);

        assert!(!p.add_xp(149));
        assert!(p.add_xp(1));
        assert_eq!(p.xp_to_next_level, 225);
        assert!(p.add_xp(225));
        // 225 * 1.5 = 337.5, floored
        assert_eq!(p.xp_to_next_level, 337);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut p = player();
        let volley = p.try_fire(Vec2::new(700.0, 400.0)).unwrap();
        assert_eq!(volley.velocities.len(), 1);
        assert!(p.try_fire(Vec2::new(700.0, 400.0)).is_none());

        // Cooldown elapses through updates
        p.update(0.3, arena());
        assert!(p.try_fire(Vec2::new(700.0, 400.0)).is_none());
        p.update(0.3, arena());
        assert!(p.try_fire(Vec2::new(700.0, 400.0)).is_some());
    }

    #[test]
    fn test_overload_cycle_doubles_shots() {
        let mut p = player();
        p.weapon.num_projectiles = 2;
        p.abilities.overload.enabled = true;

        let signals = p.update(5.0, arena());
        assert!(signals.overload_started);
        assert_eq!(p.shots_per_volley(), 4);

        let signals = p.update(3.0, arena());
        assert!(!signals.overload_started);
        assert!(!p.abilities.overload.active);
        assert_eq!(p.shots_per_volley(), 2);
    }

    #[test]
    fn test_fire_trail_interval() {
        let mut p = player();
        p.abilities.fire_trail.enabled = true;
        assert!(p.update(0.06, arena()).fire_trail_at.is_none());
        assert_eq!(p.update(0.06, arena()).fire_trail_at, Some(p.body.pos));
    }

    #[test]
    fn test_heal_clamps() {
        let mut p = player();
        p.health = 90.0;
        p.heal(25.0);
        assert_eq!(p.health, 100.0);
    }
}
