//! Draw-list generation
//!
//! Turns a [`GameState`] into plain [`DrawCommand`]s. Nothing here touches a
//! graphics API, so the output can be inspected in tests and replayed into
//! any [`Renderer`](super::Renderer).

use glam::Vec2;
use std::f32::consts::PI;

use crate::consts::{EXPLOSION_LIFETIME, FIRE_ZONE_LIFETIME};
use crate::sim::effects::{BoltKind, fade};
use crate::sim::enemy::{Enemy, EnemyKind};
use crate::sim::entity::Entity;
use crate::sim::orb::{Orb, OrbKind};
use crate::sim::player::Player;
use crate::sim::projectile::Projectile;
use crate::sim::state::GameState;
use crate::sim::vector::from_angle;

/// RGBA, each channel 0..=1
pub type Color = [f32; 4];

pub mod palette {
    use super::Color;

    pub const PLAYER: Color = [0.85, 0.85, 0.95, 1.0];
    pub const CHASER: Color = [0.8, 0.15, 0.2, 1.0];
    pub const SHOOTER: Color = [0.6, 0.2, 0.8, 1.0];
    pub const BOSS: Color = [0.45, 0.0, 0.1, 1.0];
    pub const PLAYER_SHOT: Color = [1.0, 0.95, 0.5, 1.0];
    pub const ENEMY_SHOT: Color = [1.0, 0.35, 0.2, 1.0];
    pub const XP_ORB: Color = [0.3, 0.6, 1.0, 1.0];
    pub const HEALTH_ORB: Color = [0.2, 0.9, 0.3, 1.0];
    pub const BAR_BACK: Color = [0.2, 0.2, 0.2, 0.8];
    pub const BAR_FILL: Color = [0.9, 0.1, 0.1, 1.0];
    pub const EXPLOSION: Color = [1.0, 0.55, 0.1, 1.0];
    pub const FIRE: Color = [1.0, 0.3, 0.0, 0.5];
    pub const LIGHTNING: Color = [0.7, 0.85, 1.0, 1.0];
    pub const CYCLONE: Color = [0.75, 0.75, 0.8, 0.9];
    pub const OVERLOAD: Color = [0.2, 0.8, 1.0, 0.25];
}

/// Sprites the presentation layer may have loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Player,
    Chaser,
    Shooter,
    Boss,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    /// Progress bar; `pos` is the top-left corner
    Bar {
        pos: Vec2,
        size: Vec2,
        fraction: f32,
        back: Color,
        fill: Color,
    },
    /// Sprite if loaded, else a circle in `fallback`
    Sprite {
        sprite: Sprite,
        center: Vec2,
        radius: f32,
        fallback: Color,
    },
    /// Full-screen tint
    Overlay { color: Color },
}

/// Something that knows how to describe itself as draw commands
pub trait Drawable {
    /// Append commands; emits nothing for inactive entities
    fn draw(&self, out: &mut Vec<DrawCommand>);
}

fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha]
}

fn health_bar(center: Vec2, radius: f32, fraction: f32, out: &mut Vec<DrawCommand>) {
    let width = radius * 2.0;
    out.push(DrawCommand::Bar {
        pos: Vec2::new(center.x - radius, center.y - radius - 10.0),
        size: Vec2::new(width, 4.0),
        fraction: fraction.clamp(0.0, 1.0),
        back: palette::BAR_BACK,
        fill: palette::BAR_FILL,
    });
}

impl Drawable for Player {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        if !self.is_active() {
            return;
        }
        // Blink while invulnerable
        if self.is_invulnerable() && (self.invulnerable_timer * 10.0) as i32 % 2 == 1 {
            return;
        }
        out.push(DrawCommand::Sprite {
            sprite: Sprite::Player,
            center: self.pos(),
            radius: self.body.radius,
            fallback: palette::PLAYER,
        });

        let cyclone = &self.abilities.cyclone;
        if cyclone.enabled {
            out.push(DrawCommand::Ring {
                center: self.pos(),
                radius: cyclone.radius,
                width: 2.0,
                color: with_alpha(palette::CYCLONE, 0.4),
            });
            for blade in 0..2 {
                let angle = cyclone.angle + blade as f32 * PI;
                out.push(DrawCommand::Line {
                    from: self.pos(),
                    to: self.pos() + from_angle(angle, cyclone.radius),
                    width: 4.0,
                    color: palette::CYCLONE,
                });
            }
        }
    }
}

impl Drawable for Enemy {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        if !self.is_active() {
            return;
        }
        let (sprite, fallback) = match self.kind {
            EnemyKind::Chaser => (Sprite::Chaser, palette::CHASER),
            EnemyKind::Shooter => (Sprite::Shooter, palette::SHOOTER),
            EnemyKind::Boss(_) => (Sprite::Boss, palette::BOSS),
        };
        out.push(DrawCommand::Sprite {
            sprite,
            center: self.pos(),
            radius: self.body.radius,
            fallback,
        });
        if self.is_boss() || self.health < self.max_health {
            health_bar(self.pos(), self.body.radius, self.health / self.max_health, out);
        }
    }
}

/// Projectiles are drawn in the color of their side
pub struct Shot<'a> {
    pub projectile: &'a Projectile,
    pub color: Color,
}

impl Drawable for Shot<'_> {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        if !self.projectile.is_active() {
            return;
        }
        out.push(DrawCommand::Circle {
            center: self.projectile.pos(),
            radius: self.projectile.body.radius,
            color: self.color,
        });
    }
}

impl Drawable for Orb {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        if !self.is_active() {
            return;
        }
        let color = match self.kind {
            OrbKind::Experience { .. } => palette::XP_ORB,
            OrbKind::Health { .. } => palette::HEALTH_ORB,
        };
        out.push(DrawCommand::Circle {
            center: self.pos(),
            radius: self.body.radius,
            color,
        });
    }
}

/// Everything visible this frame, back to front
pub fn draw_list(state: &GameState) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    let effects = &state.effects;

    for zone in &effects.fire_zones {
        out.push(DrawCommand::Circle {
            center: zone.pos,
            radius: zone.radius,
            color: with_alpha(palette::FIRE, fade(zone.time_left, FIRE_ZONE_LIFETIME)),
        });
    }

    state.xp_orbs.iter().for_each(|o| o.draw(&mut out));
    state.health_orbs.iter().for_each(|o| o.draw(&mut out));
    state.enemies.iter().for_each(|e| e.draw(&mut out));
    state.player.draw(&mut out);

    for projectile in &state.player_projectiles {
        Shot {
            projectile,
            color: palette::PLAYER_SHOT,
        }
        .draw(&mut out);
    }
    for projectile in &state.enemy_projectiles {
        Shot {
            projectile,
            color: palette::ENEMY_SHOT,
        }
        .draw(&mut out);
    }

    for explosion in &effects.explosions {
        let alpha = fade(explosion.time_left, EXPLOSION_LIFETIME);
        // Expands from half to full radius as it fades
        let radius = explosion.radius * (0.5 + 0.5 * (1.0 - alpha));
        out.push(DrawCommand::Circle {
            center: explosion.pos,
            radius,
            color: with_alpha(palette::EXPLOSION, alpha),
        });
    }

    for bolt in &effects.bolts {
        let width = match bolt.kind {
            BoltKind::Strike => 4.0,
            BoltKind::Chain => 2.0,
        };
        out.push(DrawCommand::Line {
            from: bolt.from,
            to: bolt.to,
            width,
            color: with_alpha(palette::LIGHTNING, fade(bolt.time_left, bolt.lifetime())),
        });
    }

    for pulse in &effects.overloads {
        out.push(DrawCommand::Overlay {
            color: with_alpha(palette::OVERLOAD, fade(pulse.time_left, pulse.duration)),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{TickInput, tick};

    fn sprite_count(commands: &[DrawCommand], wanted: Sprite) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { sprite, .. } if *sprite == wanted))
            .count()
    }

    #[test]
    fn test_inactive_entities_draw_nothing() {
        let mut enemy = Enemy::chaser(1, Vec2::new(10.0, 10.0));
        let mut out = Vec::new();
        enemy.draw(&mut out);
        assert_eq!(out.len(), 1);

        enemy.destroy();
        out.clear();
        enemy.draw(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_destroyed_enemy_leaves_draw_list() {
        let mut state = GameState::new(9);
        state.start();
        let id = state.next_entity_id();
        state.enemies.push(Enemy::chaser(id, Vec2::new(30.0, 30.0)));
        assert_eq!(sprite_count(&draw_list(&state), Sprite::Chaser), 1);

        state.enemies[0].destroy();
        assert_eq!(sprite_count(&draw_list(&state), Sprite::Chaser), 0);
        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(sprite_count(&draw_list(&state), Sprite::Chaser), 0);
    }

    #[test]
    fn test_damaged_enemy_gets_health_bar() {
        let mut enemy = Enemy::shooter(1, Vec2::ZERO);
        enemy.health = 40.0;
        let mut out = Vec::new();
        enemy.draw(&mut out);
        assert!(matches!(out[1], DrawCommand::Bar { fraction, .. } if (fraction - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_cyclone_draws_blades() {
        let mut state = GameState::new(9);
        state.start();
        state.player.abilities.cyclone.enabled = true;
        let lines = draw_list(&state)
            .into_iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 2);
    }
}
