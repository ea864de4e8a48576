//! Circle and arena geometry used by movement and combat
//!
//! Everything in the arena is a circle, so contact is a distance test. Area
//! effects (explosions, cyclone, fire zones, chain lightning) use an
//! inclusive radius check on entity centers.

use glam::Vec2;

use super::entity::Entity;
use super::vector::VectorExt;

/// Strict circle-circle overlap (touching circles do not collide)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance_to(b) < a_radius + b_radius
}

/// Inclusive area check on a point
#[inline]
pub fn within_radius(center: Vec2, point: Vec2, radius: f32) -> bool {
    center.distance_to(point) <= radius
}

/// True once a point has left the `[0, size]` rectangle
#[inline]
pub fn out_of_bounds(pos: Vec2, arena: Vec2) -> bool {
    pos.x < 0.0 || pos.x > arena.x || pos.y < 0.0 || pos.y > arena.y
}

/// Keep a circle fully inside the arena
#[inline]
pub fn clamp_to_arena(pos: Vec2, radius: f32, arena: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.max(radius).min(arena.x - radius),
        pos.y.max(radius).min(arena.y - radius),
    )
}

/// Nearest active entity to `from`; ties go to the earliest in the slice
pub fn nearest_active<E: Entity>(from: Vec2, entities: &[E]) -> Option<&E> {
    let mut best: Option<(&E, f32)> = None;
    for entity in entities.iter().filter(|e| e.is_active()) {
        let distance = from.distance_to(entity.pos());
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((entity, distance)),
        }
    }
    best.map(|(entity, _)| entity)
}
