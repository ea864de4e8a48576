//! Damage, kills and area effects
//!
//! Every enemy damage event goes through [`damage_enemy`], which handles
//! vampirism, kill rewards and drops. Lightning strikes earned by kills are
//! queued on the state and resolved by [`resolve_lightning`], never from
//! inside another damage call.

use glam::Vec2;
use rand::Rng;

use super::collision::within_radius;
use super::effects::BoltKind;
use super::entity::Entity;
use super::player::DamageOutcome;
use super::state::{GameEvent, GameState};
use crate::consts::{BOSS_HEALTH_DROPS, CHAIN_DAMAGE_FACTOR, SCORE_PER_XP};

/// Scatter of boss health drops around the corpse
const BOSS_DROP_SCATTER: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Projectile,
    Explosion,
    Lightning,
    Cyclone,
    FireZone,
}

impl DamageSource {
    /// Kills from these sources also leave an XP orb behind
    fn drops_xp_orb(self) -> bool {
        matches!(self, DamageSource::Projectile | DamageSource::Explosion)
    }
}

/// Damage the enemy at `index`; returns true if this killed it
pub fn damage_enemy(state: &mut GameState, index: usize, amount: f32, source: DamageSource) -> bool {
    let Some(enemy) = state.enemies.get_mut(index) else {
        return false;
    };
    if !enemy.is_active() {
        return false;
    }

    enemy.health -= amount;
    let killed = enemy.health <= 0.0;
    if killed {
        enemy.destroy();
    }
    let (pos, xp, is_boss) = (enemy.pos(), enemy.xp_value, enemy.is_boss());

    let vampirism = &state.player.abilities.vampirism;
    if vampirism.enabled {
        let heal = (amount * vampirism.rate).floor();
        if heal > 0.0 {
            state.player.heal(heal);
            state.emit_health();
        }
    }

    if killed {
        on_enemy_killed(state, pos, xp, is_boss, source);
    }
    killed
}

fn on_enemy_killed(state: &mut GameState, pos: Vec2, xp: u32, is_boss: bool, source: DamageSource) {
    let lightning = &mut state.player.abilities.lightning;
    if lightning.enabled {
        lightning.kill_count += 1;
        if lightning.kill_count >= lightning.threshold {
            lightning.kill_count = 0;
            state.pending_strikes += 1;
        }
    }

    state.grant_xp(xp);
    state.add_score(xp as u64 * SCORE_PER_XP);

    if is_boss {
        for _ in 0..BOSS_HEALTH_DROPS {
            let rng = state.rng();
            let offset = Vec2::new(
                rng.random_range(-BOSS_DROP_SCATTER..=BOSS_DROP_SCATTER),
                rng.random_range(-BOSS_DROP_SCATTER..=BOSS_DROP_SCATTER),
            );
            state.spawn_health_orb(pos + offset);
        }
        log::info!("Boss defeated (+{xp} xp)");
        state.message("Boss defeated!", 3.0);
    } else {
        let chance = state.tuning.health_orb_chance.clamp(0.0, 1.0);
        if state.rng().random_bool(chance) {
            state.spawn_health_orb(pos);
        }
    }

    if source.drops_xp_orb() {
        state.spawn_xp_orb(pos, xp);
    }
}

/// Apply damage to the player and announce the consequences
pub fn hurt_player(state: &mut GameState, amount: f32) -> DamageOutcome {
    let outcome = state.player.take_damage(amount);
    match outcome {
        DamageOutcome::Ignored => {}
        DamageOutcome::Hit => state.emit_health(),
        DamageOutcome::LifeLost { lives_left } => {
            log::info!("Life lost, {lives_left} left");
            state.emit(GameEvent::LivesChanged(lives_left));
            state.emit_health();
            state.message("Life lost!", 2.0);
        }
        DamageOutcome::GameOver => {
            state.emit(GameEvent::LivesChanged(0));
            state.emit_health();
            state.game_over();
        }
    }
    outcome
}

/// Area blast from an explosive projectile hit
pub fn explode(state: &mut GameState, center: Vec2) {
    let (radius, damage) = {
        let explosive = &state.player.abilities.explosive;
        (explosive.radius, explosive.damage)
    };
    state.effects.add_explosion(center, radius);

    for index in 0..state.enemies.len() {
        let enemy = &state.enemies[index];
        if enemy.is_active() && within_radius(center, enemy.pos(), radius) {
            damage_enemy(state, index, damage, DamageSource::Explosion);
        }
    }
}

/// Resolve every queued lightning strike, including ones earned meanwhile
pub fn resolve_lightning(state: &mut GameState) {
    while state.pending_strikes > 0 {
        state.pending_strikes -= 1;
        trigger_lightning_storm(state);
    }
}

/// Strike a random active enemy and chain to its neighbours
pub fn trigger_lightning_storm(state: &mut GameState) {
    let candidates: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_active())
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        return;
    }

    let pick = state.rng().random_range(0..candidates.len());
    let target = candidates[pick];
    let target_pos = state.enemies[target].pos();
    let (damage, range) = {
        let lightning = &state.player.abilities.lightning;
        (lightning.damage, lightning.chain_range)
    };

    state
        .effects
        .add_bolt(BoltKind::Strike, Vec2::new(target_pos.x, 0.0), target_pos);
    damage_enemy(state, target, damage, DamageSource::Lightning);

    for index in candidates.into_iter().filter(|&i| i != target) {
        let enemy = &state.enemies[index];
        if !enemy.is_active() || !within_radius(target_pos, enemy.pos(), range) {
            continue;
        }
        let to = enemy.pos();
        state.effects.add_bolt(BoltKind::Chain, target_pos, to);
        damage_enemy(state, index, damage * CHAIN_DAMAGE_FACTOR, DamageSource::Lightning);
    }

    state.message("Lightning storm!", 2.0);
}

/// Continuous damage to every enemy inside the cyclone
pub fn apply_cyclone(state: &mut GameState, dt: f32) {
    let cyclone = &state.player.abilities.cyclone;
    if !cyclone.enabled {
        return;
    }
    let (center, radius, damage) = (state.player.pos(), cyclone.radius, cyclone.damage * dt);

    for index in 0..state.enemies.len() {
        let enemy = &state.enemies[index];
        if enemy.is_active() && within_radius(center, enemy.pos(), radius) {
            damage_enemy(state, index, damage, DamageSource::Cyclone);
        }
    }
}

/// Damage enemies standing in fire trail zones
pub fn burn_fire_zones(state: &mut GameState, dt: f32) {
    let zones: Vec<(Vec2, f32, f32)> = state
        .effects
        .fire_zones
        .iter()
        .map(|z| (z.pos, z.radius, z.damage * dt))
        .collect();

    for (center, radius, damage) in zones {
        for index in 0..state.enemies.len() {
            let enemy = &state.enemies[index];
            if enemy.is_active() && within_radius(center, enemy.pos(), radius) {
                damage_enemy(state, index, damage, DamageSource::FireZone);
            }
        }
    }
}

/// Projectile hits and contact damage for this frame
pub fn resolve_collisions(state: &mut GameState) {
    for p in 0..state.player_projectiles.len() {
        for e in 0..state.enemies.len() {
            let projectile = &state.player_projectiles[p];
            if !projectile.is_active() {
                break;
            }
            let enemy = &state.enemies[e];
            if !enemy.is_active() || !projectile.collide(enemy) {
                continue;
            }
            let enemy_id = enemy.id();

            let projectile = &mut state.player_projectiles[p];
            if !projectile.on_hit_enemy(enemy_id) {
                continue;
            }
            let (pos, damage) = (projectile.pos(), projectile.damage);
            if state.player.abilities.explosive.enabled {
                explode(state, pos);
            }
            damage_enemy(state, e, damage, DamageSource::Projectile);
        }
    }

    for p in 0..state.enemy_projectiles.len() {
        let projectile = &state.enemy_projectiles[p];
        if !projectile.is_active() || !projectile.collide(&state.player) {
            continue;
        }
        let damage = projectile.damage;
        if hurt_player(state, damage).applied() {
            state.enemy_projectiles[p].destroy();
        }
    }

    for e in 0..state.enemies.len() {
        let enemy = &state.enemies[e];
        if enemy.is_active() && enemy.collide(&state.player) {
            let damage = enemy.damage;
            hurt_player(state, damage);
        }
    }
}
