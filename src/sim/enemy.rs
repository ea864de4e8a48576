//! Enemies: one record, behaviour selected by [`EnemyKind`]
//!
//! All enemies walk straight at the player. Shooters and bosses carry a
//! [`RangedAttack`]; bosses add a charge attack and health-keyed phases.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::entity::{Body, Entity, EntityId};
use super::projectile::{FanShape, Volley};
use super::vector::VectorExt;

/// Plain type tag, used for spawn tables and presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyType {
    Chaser,
    Shooter,
    Boss,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChargeState {
    Approaching,
    /// Locked direction, does not re-aim while charging
    Charging { direction: Vec2, time_left: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossState {
    /// Player level the boss was spawned for
    pub level: u32,
    pub charge: ChargeState,
    pub charge_timer: f32,
    pub charge_cooldown: f32,
    pub charge_duration: f32,
    pub charge_speed: f32,
    /// Aggression phase, 1..=max_phases, never decreases
    pub phase: u32,
    pub max_phases: u32,
    /// Health represented by one phase
    pub phase_health: f32,
}

impl BossState {
    /// Phase implied by the current health
    pub fn phase_for_health(&self, health: f32) -> u32 {
        let remaining = (health / self.phase_health).ceil().max(0.0) as u32;
        (self.max_phases + 1)
            .saturating_sub(remaining)
            .clamp(1, self.max_phases)
    }

    pub fn is_charging(&self) -> bool {
        matches!(self.charge, ChargeState::Charging { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyKind {
    Chaser,
    Shooter,
    Boss(BossState),
}

impl EnemyKind {
    pub fn tag(&self) -> EnemyType {
        match self {
            EnemyKind::Chaser => EnemyType::Chaser,
            EnemyKind::Shooter => EnemyType::Shooter,
            EnemyKind::Boss(_) => EnemyType::Boss,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangedAttack {
    pub cooldown: f32,
    pub timer: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_size: f32,
    /// Total fan width of one volley
    pub spread: f32,
}

/// Side effects of one enemy update
#[derive(Debug, Clone, Default)]
pub struct EnemySignals {
    pub volley: Option<Volley>,
    pub charge_started: bool,
    /// Boss entered this aggression phase
    pub phase_changed: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Contact damage
    pub damage: f32,
    pub xp_value: u32,
    pub ranged: Option<RangedAttack>,
}

impl Entity for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

const ENEMY_PROJECTILE_SIZE: f32 = 4.8;

impl Enemy {
    pub fn chaser(id: EntityId, pos: Vec2) -> Self {
        Self {
            body: Body::new(id, pos, 14.4),
            kind: EnemyKind::Chaser,
            speed: 100.0,
            health: 50.0,
            max_health: 50.0,
            damage: 10.0,
            xp_value: 20,
            ranged: None,
        }
    }

    pub fn shooter(id: EntityId, pos: Vec2) -> Self {
        Self {
            body: Body::new(id, pos, 18.0),
            kind: EnemyKind::Shooter,
            speed: 60.0,
            health: 80.0,
            max_health: 80.0,
            damage: 8.0,
            xp_value: 30,
            ranged: Some(RangedAttack {
                cooldown: 2.5,
                timer: 0.0,
                projectile_speed: 200.0,
                projectile_damage: 10.0,
                projectile_size: ENEMY_PROJECTILE_SIZE,
                spread: PI / 8.0,
            }),
        }
    }

    /// Boss stats grow with the player level it was summoned at
    pub fn boss(id: EntityId, pos: Vec2, level: u32) -> Self {
        let radius = (30 + (level / 10) * 5) as f32 * 1.2;
        let health = (500 + level * 50) as f32;
        let speed = 80.0;
        let max_phases = (level / 10 + 1).min(3);
        Self {
            body: Body::new(id, pos, radius),
            kind: EnemyKind::Boss(BossState {
                level,
                charge: ChargeState::Approaching,
                charge_timer: 0.0,
                charge_cooldown: 5.0,
                charge_duration: 1.5,
                charge_speed: speed * 2.5,
                phase: 1,
                max_phases,
                phase_health: health / max_phases as f32,
            }),
            speed,
            health,
            max_health: health,
            damage: (25 + (level / 5) * 5) as f32,
            xp_value: 200 + level * 20,
            ranged: Some(RangedAttack {
                cooldown: 1.0,
                timer: 0.0,
                projectile_speed: 250.0,
                projectile_damage: (20 + (level / 5) * 5) as f32,
                projectile_size: 9.6,
                spread: PI / 6.0,
            }),
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    /// Scale freshly spawned stats by the difficulty multiplier.
    ///
    /// Melee-only enemies get `melee_bonus` on top for contact damage.
    pub fn scale_for_difficulty(&mut self, multiplier: f32, melee_bonus: f32) {
        self.health = (self.health * multiplier).floor();
        self.max_health = self.health;
        let contact_scale = match self.kind {
            EnemyKind::Chaser => multiplier * melee_bonus,
            EnemyKind::Shooter | EnemyKind::Boss(_) => multiplier,
        };
        self.damage = (self.damage * contact_scale).floor();
        if let Some(ranged) = &mut self.ranged {
            ranged.projectile_damage = (ranged.projectile_damage * multiplier).floor();
        }
        self.xp_value = (self.xp_value as f32 * multiplier).floor() as u32;
        if let EnemyKind::Boss(boss) = &mut self.kind {
            boss.phase_health = self.health / boss.max_phases as f32;
        }
    }

    /// Steer toward the player, move and run attack timers
    pub fn update(&mut self, dt: f32, player_pos: Vec2) -> EnemySignals {
        let mut signals = EnemySignals::default();
        if !self.body.active {
            return signals;
        }

        let to_player = (player_pos - self.body.pos).normalized();
        let mut shot_count = 3;
        let mut cooldown_scale = 1.0;

        match &mut self.kind {
            EnemyKind::Chaser | EnemyKind::Shooter => {
                self.body.vel = to_player * self.speed;
            }
            EnemyKind::Boss(boss) => {
                boss.charge_timer += dt;

                let phase = boss.phase_for_health(self.health);
                if phase > boss.phase {
                    boss.phase = phase;
                    boss.charge_cooldown *= 0.9;
                    if let Some(ranged) = &mut self.ranged {
                        ranged.cooldown *= 0.8;
                    }
                    signals.phase_changed = Some(phase);
                }

                match boss.charge {
                    ChargeState::Charging { direction, time_left } => {
                        let time_left = time_left - dt;
                        self.body.vel = direction * boss.charge_speed;
                        if time_left <= 0.0 {
                            boss.charge = ChargeState::Approaching;
                            boss.charge_timer = 0.0;
                        } else {
                            boss.charge = ChargeState::Charging { direction, time_left };
                        }
                    }
                    ChargeState::Approaching if boss.charge_timer >= boss.charge_cooldown => {
                        boss.charge = ChargeState::Charging {
                            direction: to_player,
                            time_left: boss.charge_duration,
                        };
                        self.body.vel = to_player * boss.charge_speed;
                        signals.charge_started = true;
                    }
                    ChargeState::Approaching => {
                        self.body.vel = to_player * self.speed * 0.7;
                    }
                }

                shot_count = 3 + boss.phase;
                cooldown_scale = 1.0 / boss.phase as f32;
            }
        }

        self.body.integrate(dt);

        if let Some(ranged) = &mut self.ranged {
            if ranged.timer <= 0.0 {
                let aim = (player_pos - self.body.pos).heading();
                let shape = FanShape {
                    count: shot_count,
                    step: ranged.spread / (shot_count - 1) as f32,
                    speed: ranged.projectile_speed,
                };
                signals.volley = Some(Volley::fan(
                    self.body.pos,
                    aim,
                    shape,
                    ranged.projectile_size,
                    ranged.projectile_damage,
                    0,
                ));
                ranged.timer = ranged.cooldown * cooldown_scale;
            } else {
                ranged.timer -= dt;
            }
        }

        signals
    }
}
