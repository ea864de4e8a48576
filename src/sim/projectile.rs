//! Straight-line projectiles fired by the player and by ranged enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::out_of_bounds;
use super::entity::{Body, Entity, EntityId};
use super::vector::{fan_offset, from_angle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub damage: f32,
    /// Enemies this projectile may still pass through
    pub pierce: u32,
    /// Enemies already damaged (never damaged twice)
    pub hit: Vec<EntityId>,
}

impl Entity for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Projectile {
    pub fn new(id: EntityId, pos: Vec2, vel: Vec2, radius: f32, damage: f32, pierce: u32) -> Self {
        let mut body = Body::new(id, pos, radius);
        body.vel = vel;
        Self {
            body,
            damage,
            pierce,
            hit: Vec::new(),
        }
    }

    /// Move and despawn once outside the arena
    pub fn update(&mut self, dt: f32, arena: Vec2) {
        if !self.body.active {
            return;
        }
        self.body.integrate(dt);
        if out_of_bounds(self.body.pos, arena) {
            self.destroy();
        }
    }

    /// Register a hit on `enemy`.
    ///
    /// Returns false (and does nothing) if that enemy was already hit;
    /// otherwise spends one pierce, or deactivates when none is left.
    pub fn on_hit_enemy(&mut self, enemy: EntityId) -> bool {
        if self.hit.contains(&enemy) {
            return false;
        }
        self.hit.push(enemy);
        if self.pierce == 0 {
            self.destroy();
        } else {
            self.pierce -= 1;
        }
        true
    }
}

/// A burst of shots leaving one origin, before ids are assigned
#[derive(Debug, Clone)]
pub struct Volley {
    pub origin: Vec2,
    pub velocities: Vec<Vec2>,
    pub radius: f32,
    pub damage: f32,
    pub pierce: u32,
}

/// Shot geometry shared by every shooter
#[derive(Debug, Clone, Copy)]
pub struct FanShape {
    pub count: u32,
    /// Angle between neighbouring shots
    pub step: f32,
    pub speed: f32,
}

impl Volley {
    /// Fan `shape.count` shots centered on `aim_angle`
    pub fn fan(origin: Vec2, aim_angle: f32, shape: FanShape, radius: f32, damage: f32, pierce: u32) -> Self {
        let velocities = (0..shape.count)
            .map(|i| from_angle(aim_angle + fan_offset(i, shape.count, shape.step), shape.speed))
            .collect();
        Self {
            origin,
            velocities,
            radius,
            damage,
            pierce,
        }
    }

    /// Materialize the volley, drawing ids from `next_id`
    pub fn into_projectiles(self, mut next_id: impl FnMut() -> EntityId) -> Vec<Projectile> {
        self.velocities
            .into_iter()
            .map(|vel| Projectile::new(next_id(), self.origin, vel, self.radius, self.damage, self.pierce))
            .collect()
    }
}
