//! Data-driven game balance
//!
//! Every knob has a default matching the shipped balance; a JSON document only
//! needs to name the values it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading a tuning table
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance table read by the simulation at spawn/reset time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_speed: f32,
    pub player_max_health: f32,
    pub player_lives: u32,
    pub invulnerable_time: f32,
    pub shoot_cooldown: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_size: f32,
    pub projectile_spread: f32,

    // === Progression ===
    pub first_level_xp: u32,
    /// Threshold growth per level (floored)
    pub xp_growth: f32,
    pub xp_collection_radius: f32,
    /// Chance that a level-up offer contains a legendary
    pub legendary_offer_chance: f64,
    /// Visual feedback delay between picking a power-up and applying it
    pub selection_delay: f32,

    // === Spawning & difficulty ===
    pub spawn_interval: f32,
    pub min_spawn_interval: f32,
    pub spawn_interval_decay: f32,
    pub difficulty_step: f32,
    pub difficulty_period_secs: f32,
    /// One extra enemy per spawn wave every this many seconds
    pub spawn_ramp_secs: f32,
    /// Probability that a spawned enemy is a Chaser (else Shooter)
    pub chaser_weight: f64,
    /// Extra contact-damage multiplier for melee enemies
    pub melee_damage_bonus: f32,
    pub health_orb_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 1200.0,
            arena_height: 800.0,

            player_radius: 18.0,
            player_speed: 250.0,
            player_max_health: 100.0,
            player_lives: 3,
            invulnerable_time: 1.5,
            shoot_cooldown: 0.5,
            projectile_speed: 400.0,
            projectile_damage: 10.0,
            projectile_size: 6.0,
            projectile_spread: 0.1,

            first_level_xp: 100,
            xp_growth: 1.5,
            xp_collection_radius: 80.0,
            legendary_offer_chance: 0.15,
            selection_delay: 0.4,

            spawn_interval: 3.0,
            min_spawn_interval: 0.5,
            spawn_interval_decay: 0.92,
            difficulty_step: 0.2,
            difficulty_period_secs: 30.0,
            spawn_ramp_secs: 25.0,
            chaser_weight: 0.6,
            melee_damage_bonus: 1.2,
            health_orb_chance: 0.05,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }
        fn probability(field: &'static str, value: f64) -> Result<(), TuningError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be within 0..=1",
                })
            }
        }

        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("player_radius", self.player_radius)?;
        positive("player_max_health", self.player_max_health)?;
        positive("shoot_cooldown", self.shoot_cooldown)?;
        positive("spawn_interval", self.spawn_interval)?;
        positive("min_spawn_interval", self.min_spawn_interval)?;
        positive("difficulty_period_secs", self.difficulty_period_secs)?;
        positive("spawn_ramp_secs", self.spawn_ramp_secs)?;
        if self.xp_growth < 1.0 {
            return Err(TuningError::Invalid {
                field: "xp_growth",
                reason: "must be at least 1.0",
            });
        }
        if self.player_lives == 0 {
            return Err(TuningError::Invalid {
                field: "player_lives",
                reason: "must be at least 1",
            });
        }
        if self.first_level_xp == 0 {
            return Err(TuningError::Invalid {
                field: "first_level_xp",
                reason: "must be at least 1",
            });
        }
        if !(self.spawn_interval_decay > 0.0 && self.spawn_interval_decay <= 1.0) {
            return Err(TuningError::Invalid {
                field: "spawn_interval_decay",
                reason: "must be within (0, 1]",
            });
        }
        probability("legendary_offer_chance", self.legendary_offer_chance)?;
        probability("chaser_weight", self.chaser_weight)?;
        probability("health_orb_chance", self.health_orb_chance)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_lives": 5, "spawn_interval": 2.0 }"#).unwrap();
        assert_eq!(tuning.player_lives, 5);
        assert_eq!(tuning.spawn_interval, 2.0);
        assert_eq!(tuning.arena_width, Tuning::default().arena_width);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "chaser_weight": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "chaser_weight",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "player_lives": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { .. }));

        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
