//! Passive pickups dropped by enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, EntityId};
use super::vector::VectorExt;
use crate::consts::{HEALTH_ORB_HEAL, HEALTH_ORB_RADIUS, XP_ORB_RADIUS, XP_ORB_SPEED};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrbKind {
    Experience { value: u32 },
    Health { heal: f32 },
}

/// What the player receives when an orb is collected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbPickup {
    Experience(u32),
    Health(f32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub body: Body,
    pub kind: OrbKind,
    /// Homing starts inside this distance (XP orbs only)
    pub collection_radius: f32,
    pub collection_speed: f32,
}

impl Entity for Orb {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Orb {
    pub fn experience(id: EntityId, pos: Vec2, value: u32, collection_radius: f32) -> Self {
        Self {
            body: Body::new(id, pos, XP_ORB_RADIUS),
            kind: OrbKind::Experience { value },
            collection_radius,
            collection_speed: XP_ORB_SPEED,
        }
    }

    pub fn health(id: EntityId, pos: Vec2) -> Self {
        Self {
            body: Body::new(id, pos, HEALTH_ORB_RADIUS),
            kind: OrbKind::Health {
                heal: HEALTH_ORB_HEAL,
            },
            collection_radius: 0.0,
            collection_speed: 0.0,
        }
    }

    /// Home toward the player and report a pickup on contact.
    ///
    /// A collected orb deactivates itself; the caller applies the pickup.
    pub fn update(&mut self, dt: f32, player: &Body) -> Option<OrbPickup> {
        if !self.body.active {
            return None;
        }

        if self.collide(player) {
            self.destroy();
            return Some(match self.kind {
                OrbKind::Experience { value } => OrbPickup::Experience(value),
                OrbKind::Health { heal } => OrbPickup::Health(heal),
            });
        }

        if let OrbKind::Experience { .. } = self.kind {
            let offset = player.pos - self.body.pos;
            self.body.vel = if offset.magnitude() < self.collection_radius {
                offset.normalized() * self.collection_speed
            } else {
                Vec2::ZERO
            };
            self.body.integrate(dt);
        }
        None
    }
}
