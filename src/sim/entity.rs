//! Shared actor model
//!
//! Every actor embeds a [`Body`] (position, velocity, radius, active flag) and
//! exposes it through the [`Entity`] trait. Deactivation is one-way: a
//! destroyed entity is skipped for the rest of the frame and pruned at the
//! end of it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::circles_overlap;

/// Stable identity of an entity within one run
pub type EntityId = u32;

/// Kinematic circle shared by all actors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub active: bool,
}

impl Body {
    pub fn new(id: EntityId, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            active: true,
        }
    }

    /// Advance position by velocity
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn id(&self) -> EntityId {
        self.body().id
    }

    fn pos(&self) -> Vec2 {
        self.body().pos
    }

    fn is_active(&self) -> bool {
        self.body().active
    }

    /// Strict circle-circle overlap
    fn collide<E: Entity>(&self, other: &E) -> bool {
        let (a, b) = (self.body(), other.body());
        circles_overlap(a.pos, a.radius, b.pos, b.radius)
    }

    fn destroy(&mut self) {
        self.body_mut().active = false;
    }
}

impl Entity for Body {
    fn body(&self) -> &Body {
        self
    }

    fn body_mut(&mut self) -> &mut Body {
        self
    }
}

/// Drop inactive entities from a collection (end of frame)
pub fn prune<E: Entity>(entities: &mut Vec<E>) {
    entities.retain(|e| e.is_active());
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_integrate() {
        let mut body = Body::new(1, Vec2::new(10.0, 10.0), 5.0);
        body.vel = Vec2::new(100.0, -50.0);
        body.integrate(0.5);
        assert_eq!(body.pos, Vec2::new(60.0, -15.0));
    }

    #[test]
    fn test_destroy_and_prune() {
        let mut bodies = vec![
            Body::new(1, Vec2::ZERO, 1.0),
            Body::new(2, Vec2::ZERO, 1.0),
        ];
        bodies[0].destroy();
        assert!(!bodies[0].is_active());
        prune(&mut bodies);
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].id(), 2);
    }

    #[test]
    fn test_touching_is_not_overlap() {
        let a = Body::new(1, Vec2::ZERO, 5.0);
        let b = Body::new(2, Vec2::new(10.0, 0.0), 5.0);
        assert!(!a.collide(&b));
        let c = Body::new(3, Vec2::new(9.9, 0.0), 5.0);
        assert!(a.collide(&c));
    }

    proptest! {
        #[test]
        fn collide_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, ar in 0.1f32..60.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, br in 0.1f32..60.0,
        ) {
            let a = Body::new(1, Vec2::new(ax, ay), ar);
            let b = Body::new(2, Vec2::new(bx, by), br);
            prop_assert_eq!(a.collide(&b), b.collide(&a));
        }
    }
}
