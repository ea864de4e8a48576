//! Short-lived visual effects and damage zones
//!
//! Everything here counts down and is dropped at zero. Only fire zones
//! affect gameplay; the rest are presentation data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CHAIN_LIFETIME, EXPLOSION_LIFETIME, FIRE_ZONE_LIFETIME, FIRE_ZONE_RADIUS, STRIKE_LIFETIME};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub time_left: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireZone {
    pub pos: Vec2,
    pub radius: f32,
    /// Damage per second to enemies inside
    pub damage: f32,
    pub time_left: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoltKind {
    /// Sky strike onto the primary target
    Strike,
    /// Arc from the primary target to a neighbour
    Chain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightningBolt {
    pub kind: BoltKind,
    pub from: Vec2,
    pub to: Vec2,
    pub time_left: f32,
}

impl LightningBolt {
    pub fn lifetime(&self) -> f32 {
        match self.kind {
            BoltKind::Strike => STRIKE_LIFETIME,
            BoltKind::Chain => CHAIN_LIFETIME,
        }
    }
}

/// Screen overlay while neural overload is running
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverloadPulse {
    pub duration: f32,
    pub time_left: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub explosions: Vec<Explosion>,
    pub fire_zones: Vec<FireZone>,
    pub bolts: Vec<LightningBolt>,
    pub overloads: Vec<OverloadPulse>,
}

impl Effects {
    pub fn add_explosion(&mut self, pos: Vec2, radius: f32) {
        self.explosions.push(Explosion {
            pos,
            radius,
            time_left: EXPLOSION_LIFETIME,
        });
    }

    pub fn add_fire_zone(&mut self, pos: Vec2, damage: f32) {
        self.fire_zones.push(FireZone {
            pos,
            radius: FIRE_ZONE_RADIUS,
            damage,
            time_left: FIRE_ZONE_LIFETIME,
        });
    }

    pub fn add_bolt(&mut self, kind: BoltKind, from: Vec2, to: Vec2) {
        let mut bolt = LightningBolt {
            kind,
            from,
            to,
            time_left: 0.0,
        };
        bolt.time_left = bolt.lifetime();
        self.bolts.push(bolt);
    }

    pub fn add_overload(&mut self, duration: f32) {
        self.overloads.push(OverloadPulse {
            duration,
            time_left: duration,
        });
    }

    /// Count every timer down and drop the expired ones
    pub fn advance(&mut self, dt: f32) {
        self.explosions.iter_mut().for_each(|e| e.time_left -= dt);
        self.fire_zones.iter_mut().for_each(|z| z.time_left -= dt);
        self.bolts.iter_mut().for_each(|b| b.time_left -= dt);
        self.overloads.iter_mut().for_each(|o| o.time_left -= dt);

        self.explosions.retain(|e| e.time_left > 0.0);
        self.fire_zones.retain(|z| z.time_left > 0.0);
        self.bolts.retain(|b| b.time_left > 0.0);
        self.overloads.retain(|o| o.time_left > 0.0);
    }
}

/// Fade factor for a countdown: 1 when fresh, 0 when expired
pub fn fade(time_left: f32, lifetime: f32) -> f32 {
    if lifetime <= 0.0 {
        return 0.0;
    }
    (time_left / lifetime).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effects_expire() {
        let mut effects = Effects::default();
        effects.add_explosion(Vec2::ZERO, 60.0);
        effects.add_bolt(BoltKind::Chain, Vec2::ZERO, Vec2::X);
        effects.add_fire_zone(Vec2::ZERO, 15.0);
        effects.add_overload(3.0);

        effects.advance(0.25);
        assert_eq!(effects.explosions.len(), 1);
        assert!(effects.bolts.is_empty());

        effects.advance(0.1);
        assert!(effects.explosions.is_empty());
        assert_eq!(effects.fire_zones.len(), 1);

        effects.advance(2.0);
        assert_eq!(effects.overloads.len(), 1);
        effects.advance(1.0);
        assert!(effects.overloads.is_empty() && effects.fire_zones.is_empty());
    }

    #[test]
    fn test_fade() {
        assert_eq!(fade(0.3, 0.3), 1.0);
        assert!((fade(0.15, 0.3) - 0.5).abs() < 1e-6);
        assert_eq!(fade(-1.0, 0.3), 0.0);
    }
}
