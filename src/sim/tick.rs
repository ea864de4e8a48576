//! One simulation frame
//!
//! Order: pause toggle, director, movement and timers, auto-fire, orbs,
//! collisions, area damage, lightning, effect timers, pruning. Everything
//! moves before anything collides, and nothing is removed until the end.

use glam::Vec2;

use super::collision::nearest_active;
use super::combat::{apply_cyclone, burn_fire_zones, resolve_collisions, resolve_lightning};
use super::entity::Entity;
use super::orb::OrbPickup;
use super::spawn::run_director;
use super::state::{GamePhase, GameState};

/// Input sampled for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Raw movement axis, each component in -1..=1
    pub movement: Vec2,
    /// Pause toggle (edge triggered)
    pub pause: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.pause();
                return;
            }
            GamePhase::Paused => {
                state.resume();
            }
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.elapsed += f64::from(dt);
    run_director(state, dt);

    update_player(state, input.movement, dt);
    apply_cyclone(state, dt);

    let arena = state.arena;
    for projectile in &mut state.player_projectiles {
        projectile.update(dt, arena);
    }
    auto_fire(state);

    update_enemies(state, dt);
    for projectile in &mut state.enemy_projectiles {
        projectile.update(dt, arena);
    }
    update_orbs(state, dt);

    resolve_collisions(state);
    burn_fire_zones(state, dt);
    resolve_lightning(state);

    state.effects.advance(dt);
    state.prune_inactive();
}

fn update_player(state: &mut GameState, movement: Vec2, dt: f32) {
    state.player.steer(movement);
    let signals = state.player.update(dt, state.arena);

    if signals.overload_started {
        let duration = state.player.abilities.overload.duration;
        state.effects.add_overload(duration);
        state.message("Neural overload!", 1.5);
    }
    if let Some(pos) = signals.fire_trail_at {
        let damage = state.player.abilities.fire_trail.damage;
        state.effects.add_fire_zone(pos, damage);
    }
}

/// Fire at the nearest active enemy when the weapon is ready
fn auto_fire(state: &mut GameState) {
    let Some(target) = nearest_active(state.player.pos(), &state.enemies).map(|e| e.pos()) else {
        return;
    };
    if let Some(volley) = state.player.try_fire(target) {
        let shots = volley.into_projectiles(|| state.next_entity_id());
        state.player_projectiles.extend(shots);
    }
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos();
    for index in 0..state.enemies.len() {
        let signals = state.enemies[index].update(dt, player_pos);

        if let Some(volley) = signals.volley {
            let shots = volley.into_projectiles(|| state.next_entity_id());
            state.enemy_projectiles.extend(shots);
        }
        if signals.charge_started {
            log::debug!("Boss #{} charging", state.enemies[index].id());
        }
        if let Some(phase) = signals.phase_changed {
            log::info!("Boss entered phase {phase}");
            state.message(format!("The boss grows furious! (phase {phase})"), 2.0);
        }
    }
}

fn update_orbs(state: &mut GameState, dt: f32) {
    let player = state.player.body.clone();
    let pickups: Vec<OrbPickup> = state
        .xp_orbs
        .iter_mut()
        .chain(state.health_orbs.iter_mut())
        .filter_map(|orb| orb.update(dt, &player))
        .collect();

    for pickup in pickups {
        match pickup {
            OrbPickup::Experience(value) => state.grant_xp(value),
            OrbPickup::Health(heal) => {
                state.player.heal(heal);
                state.emit_health();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Enemy;
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn playing() -> GameState {
        let tuning = Tuning {
            health_orb_chance: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(42, tuning);
        state.start();
        state
    }

    #[test]
    fn test_menu_does_not_simulate() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.phase, GamePhase::MainMenu);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let frozen = state.elapsed;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.elapsed, frozen);

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.elapsed > frozen);
    }

    #[test]
    fn test_destroyed_enemy_is_gone_next_frame() {
        let mut state = playing();
        let id = state.next_entity_id();
        state.enemies.push(Enemy::chaser(id, Vec2::new(50.0, 50.0)));
        state.enemies[0].destroy();

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.enemies.iter().all(|e| e.id() != id));
    }

    #[test]
    fn test_auto_fire_aims_at_nearest() {
        let mut state = playing();
        let center = state.player.pos();
        for offset in [Vec2::new(300.0, 0.0), Vec2::new(0.0, -100.0)] {
            let id = state.next_entity_id();
            state.enemies.push(Enemy::chaser(id, center + offset));
        }

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player_projectiles.len(), 1);
        let vel = state.player_projectiles[0].body.vel;
        assert!(vel.x.abs() < 1e-3 && vel.y < 0.0);
    }

    #[test]
    fn test_no_target_no_fire() {
        let mut state = playing();
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.player_projectiles.is_empty());
    }

    #[test]
    fn test_player_moves_with_input() {
        let mut state = playing();
        let start = state.player.pos();
        let input = TickInput {
            movement: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        tick(&mut state, &input, 0.1);
        assert!((state.player.pos().x - (start.x + 25.0)).abs() < 1e-3);
    }

    #[test]
    fn test_xp_orb_pickup_levels_up() {
        let mut state = playing();
        let pos = state.player.pos();
        state.spawn_xp_orb(pos, 100);

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.xp_orbs.is_empty());
        assert_eq!(state.player.level, 2);
        assert_eq!(state.phase, GamePhase::LevelUp);

        // Suspended while choosing
        let elapsed = state.elapsed;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.elapsed, elapsed);
    }

    #[test]
    fn test_enemies_spawn_over_time() {
        let mut state = playing();
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(!state.enemies.is_empty());
    }

    #[test]
    fn test_difficulty_escalates_on_the_thirty_second_frame() {
        let mut state = playing();
        for _ in 0..1799 {
            tick(&mut state, &TickInput::default(), DT);
            // Keep the player alive; only the clock matters here
            state.enemies.clear();
            state.enemy_projectiles.clear();
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.director.escalations, 0);
        assert_eq!(state.director.multiplier, 1.0);

        tick(&mut state, &TickInput::default(), DT);
        assert!((state.elapsed - 30.0).abs() < 1e-4);
        assert_eq!(state.director.escalations, 1);
        assert!((state.director.multiplier - 1.2).abs() < 1e-6);
        assert!((state.director.spawn_interval - 2.76).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = playing();
        let mut b = playing();
        let input = TickInput {
            movement: Vec2::new(0.3, -1.0),
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.pos(), b.player.pos());
    }
}
