//! Level-up offers, power-ups and legendary slots
//!
//! A level-up suspends play with an offer of [`POWER_UP_CHOICES`] upgrades.
//! Picking one schedules it; the driver applies it after the feedback delay
//! via [`advance_commit`], which also opens any queued level-up or resumes
//! play. Legendaries occupy one of [`MAX_LEGENDARY_SLOTS`] slots; picking a
//! legendary with every slot full asks which one to drop first.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::player::{
    Cyclone, ExplosiveShots, FireTrail, LightningStorm, NeuralOverload, Player, Vampirism,
};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::{MAX_LEGENDARY_SLOTS, POWER_UP_CHOICES};

/// Stat upgrades, always available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    FireRate,
    Damage,
    MoveSpeed,
    MaxHealth,
    ExtraProjectile,
    Pierce,
    Heal,
    CollectionRadius,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 8] = [
        PowerUpKind::FireRate,
        PowerUpKind::Damage,
        PowerUpKind::MoveSpeed,
        PowerUpKind::MaxHealth,
        PowerUpKind::ExtraProjectile,
        PowerUpKind::Pierce,
        PowerUpKind::Heal,
        PowerUpKind::CollectionRadius,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::FireRate => "Fire Rate +",
            PowerUpKind::Damage => "Projectile Damage +",
            PowerUpKind::MoveSpeed => "Move Speed +",
            PowerUpKind::MaxHealth => "Max Health +",
            PowerUpKind::ExtraProjectile => "Extra Projectile",
            PowerUpKind::Pierce => "Projectile Pierce +",
            PowerUpKind::Heal => "Recover Health",
            PowerUpKind::CollectionRadius => "XP Magnet +",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PowerUpKind::FireRate => "Shoot more often.",
            PowerUpKind::Damage => "Your projectiles hit harder.",
            PowerUpKind::MoveSpeed => "Move faster.",
            PowerUpKind::MaxHealth => "Raise your maximum health.",
            PowerUpKind::ExtraProjectile => "Fire one more projectile per volley.",
            PowerUpKind::Pierce => "Projectiles pass through one more enemy.",
            PowerUpKind::Heal => "Recover half of your maximum health.",
            PowerUpKind::CollectionRadius => "XP orbs are pulled in from farther away.",
        }
    }

    pub fn apply(self, state: &mut GameState) {
        let player = &mut state.player;
        match self {
            PowerUpKind::FireRate => {
                player.weapon.shoot_cooldown = (player.weapon.shoot_cooldown * 0.85).max(0.1);
            }
            PowerUpKind::Damage => player.weapon.projectile_damage += 5.0,
            PowerUpKind::MoveSpeed => player.speed += 30.0,
            PowerUpKind::MaxHealth => player.max_health += 20.0,
            PowerUpKind::ExtraProjectile => player.weapon.num_projectiles += 1,
            PowerUpKind::Pierce => player.weapon.projectile_pierce += 1,
            PowerUpKind::Heal => {
                let amount = player.max_health * 0.5;
                player.heal(amount);
            }
            PowerUpKind::CollectionRadius => {
                state.orb_collection_radius *= 1.2;
                for orb in &mut state.xp_orbs {
                    orb.collection_radius *= 1.2;
                }
            }
        }
    }
}

/// Rare upgrades that switch on a player ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendaryKind {
    ExplosiveShots,
    Vampirism,
    LightningStorm,
    FireTrail,
    CycloneAxe,
    NeuralOverload,
}

impl LegendaryKind {
    pub const ALL: [LegendaryKind; 6] = [
        LegendaryKind::ExplosiveShots,
        LegendaryKind::Vampirism,
        LegendaryKind::LightningStorm,
        LegendaryKind::FireTrail,
        LegendaryKind::CycloneAxe,
        LegendaryKind::NeuralOverload,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LegendaryKind::ExplosiveShots => "Explosive Shots",
            LegendaryKind::Vampirism => "Vampirism",
            LegendaryKind::LightningStorm => "Lightning Storm",
            LegendaryKind::FireTrail => "Fire Trail",
            LegendaryKind::CycloneAxe => "Cyclone Axe",
            LegendaryKind::NeuralOverload => "Neural Overload",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LegendaryKind::ExplosiveShots => "Hits explode, damaging nearby enemies.",
            LegendaryKind::Vampirism => "Heal for a share of the damage you deal.",
            LegendaryKind::LightningStorm => "Every few kills, lightning strikes and chains.",
            LegendaryKind::FireTrail => "Leave burning ground behind you.",
            LegendaryKind::CycloneAxe => "A spinning blade shreds enemies close to you.",
            LegendaryKind::NeuralOverload => "Periodically double your projectiles.",
        }
    }

    pub fn apply(self, player: &mut Player) {
        let abilities = &mut player.abilities;
        match self {
            LegendaryKind::ExplosiveShots => {
                abilities.explosive = ExplosiveShots {
                    enabled: true,
                    radius: 60.0,
                    damage: 20.0,
                };
            }
            LegendaryKind::Vampirism => {
                abilities.vampirism = Vampirism {
                    enabled: true,
                    rate: 0.2,
                };
            }
            LegendaryKind::LightningStorm => {
                abilities.lightning = LightningStorm {
                    enabled: true,
                    kill_count: 0,
                    threshold: 10,
                    damage: 50.0,
                    chain_range: 150.0,
                };
            }
            LegendaryKind::FireTrail => {
                abilities.fire_trail = FireTrail {
                    enabled: true,
                    damage: 15.0,
                    ..FireTrail::default()
                };
            }
            LegendaryKind::CycloneAxe => {
                abilities.cyclone = Cyclone {
                    enabled: true,
                    ..Cyclone::default()
                };
            }
            LegendaryKind::NeuralOverload => {
                abilities.overload = NeuralOverload {
                    enabled: true,
                    ..NeuralOverload::default()
                };
            }
        }
    }

    /// Switch the ability off and forget its transient state
    pub fn remove(self, player: &mut Player) {
        let abilities = &mut player.abilities;
        match self {
            LegendaryKind::ExplosiveShots => abilities.explosive = ExplosiveShots::default(),
            LegendaryKind::Vampirism => abilities.vampirism = Vampirism::default(),
            LegendaryKind::LightningStorm => abilities.lightning = LightningStorm::default(),
            LegendaryKind::FireTrail => abilities.fire_trail = FireTrail::default(),
            LegendaryKind::CycloneAxe => abilities.cyclone = Cyclone::default(),
            LegendaryKind::NeuralOverload => abilities.overload = NeuralOverload::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    Stat(PowerUpKind),
    Legendary(LegendaryKind),
}

impl Choice {
    pub fn view(self) -> ChoiceView {
        match self {
            Choice::Stat(kind) => ChoiceView {
                name: kind.name(),
                description: kind.description(),
                legendary: false,
            },
            Choice::Legendary(kind) => kind.into(),
        }
    }
}

/// What the UI shows for one option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub name: &'static str,
    pub description: &'static str,
    pub legendary: bool,
}

impl From<LegendaryKind> for ChoiceView {
    fn from(kind: LegendaryKind) -> Self {
        Self {
            name: kind.name(),
            description: kind.description(),
            legendary: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferStage {
    Choosing,
    /// A legendary was picked with every slot taken
    AwaitingReplace { incoming: LegendaryKind },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub choices: Vec<Choice>,
    pub stage: OfferStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Commit {
    Apply(Choice),
    Replace { slot: usize, incoming: LegendaryKind },
}

/// A decided choice waiting out the feedback delay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingCommit {
    pub commit: Commit,
    pub remaining: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progression {
    pub offer: Option<Offer>,
    pub active_legendaries: Vec<LegendaryKind>,
    /// Every upgrade taken this run, in order
    pub chosen: Vec<Choice>,
    /// Level-ups earned while another offer was open
    pub pending_level_ups: u32,
    pub pending_commit: Option<PendingCommit>,
}

impl Progression {
    /// Whether a choice may be made right now
    pub fn accepts_input(&self) -> bool {
        self.offer.is_some() && self.pending_commit.is_none()
    }

    pub fn active_views(&self) -> Vec<ChoiceView> {
        self.active_legendaries.iter().map(|&k| k.into()).collect()
    }
}

/// Result of [`select_power_up`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Scheduled; applies after the feedback delay
    Committed,
    /// Every legendary slot is full; a replace prompt was emitted
    NeedsReplace,
    Rejected,
}

/// React to a level-up: open an offer, or queue it behind the open one
pub fn begin_level_up(state: &mut GameState) {
    match state.phase {
        GamePhase::LevelUp => state.progression.pending_level_ups += 1,
        GamePhase::Playing => open_offer(state, true),
        _ => {}
    }
}

/// Draw three distinct stat upgrades, maybe swapping one for a legendary
pub fn roll_choices(
    rng: &mut impl Rng,
    active: &[LegendaryKind],
    legendary_chance: f64,
) -> Vec<Choice> {
    let mut pool = PowerUpKind::ALL;
    pool.shuffle(rng);
    let mut choices: Vec<Choice> = pool
        .iter()
        .take(POWER_UP_CHOICES)
        .map(|&kind| Choice::Stat(kind))
        .collect();

    if rng.random_bool(legendary_chance.clamp(0.0, 1.0)) {
        let available: Vec<LegendaryKind> = LegendaryKind::ALL
            .into_iter()
            .filter(|kind| !active.contains(kind))
            .collect();
        if !available.is_empty() {
            let legendary = available[rng.random_range(0..available.len())];
            let slot = rng.random_range(0..choices.len());
            choices[slot] = Choice::Legendary(legendary);
        }
    }
    choices
}

fn open_offer(state: &mut GameState, allow_legendary: bool) {
    let chance = if allow_legendary {
        state.tuning.legendary_offer_chance
    } else {
        0.0
    };
    let active = state.progression.active_legendaries.clone();
    let choices = roll_choices(state.rng(), &active, chance);
    let views = choices.iter().map(|c| c.view()).collect();

    state.progression.offer = Some(Offer {
        choices,
        stage: OfferStage::Choosing,
    });
    state.phase = GamePhase::LevelUp;
    state.emit(GameEvent::PowerUpChoices(views));
}

fn schedule(state: &mut GameState, commit: Commit) {
    state.progression.pending_commit = Some(PendingCommit {
        commit,
        remaining: state.tuning.selection_delay,
    });
}

/// Pick option `index` of the open offer
pub fn select_power_up(state: &mut GameState, index: usize) -> Selection {
    if state.phase != GamePhase::LevelUp || !state.progression.accepts_input() {
        return Selection::Rejected;
    }
    let Some(offer) = &mut state.progression.offer else {
        return Selection::Rejected;
    };
    if offer.stage != OfferStage::Choosing {
        return Selection::Rejected;
    }
    debug_assert!(index < offer.choices.len(), "power-up choice {index} out of range");
    let Some(&choice) = offer.choices.get(index) else {
        return Selection::Rejected;
    };

    match choice {
        Choice::Legendary(incoming)
            if state.progression.active_legendaries.len() >= MAX_LEGENDARY_SLOTS =>
        {
            offer.stage = OfferStage::AwaitingReplace { incoming };
            let views = state.progression.active_views();
            state.emit(GameEvent::ReplaceLegendary(views));
            Selection::NeedsReplace
        }
        _ => {
            schedule(state, Commit::Apply(choice));
            Selection::Committed
        }
    }
}

/// Drop the legendary in `slot` for the one awaiting a slot
pub fn replace_legendary(state: &mut GameState, slot: usize) -> bool {
    if !state.progression.accepts_input() {
        return false;
    }
    let Some(Offer {
        stage: OfferStage::AwaitingReplace { incoming },
        ..
    }) = state.progression.offer
    else {
        return false;
    };
    debug_assert!(
        slot < state.progression.active_legendaries.len(),
        "legendary slot {slot} out of range"
    );
    if slot >= state.progression.active_legendaries.len() {
        return false;
    }
    schedule(state, Commit::Replace { slot, incoming });
    true
}

/// Back out of a replace prompt; a fresh stat-only offer takes its place
pub fn cancel_replace(state: &mut GameState) -> bool {
    if !state.progression.accepts_input() {
        return false;
    }
    match state.progression.offer {
        Some(Offer {
            stage: OfferStage::AwaitingReplace { .. },
            ..
        }) => {
            open_offer(state, false);
            true
        }
        _ => false,
    }
}

/// Count down a scheduled choice and apply it once due.
///
/// Returns true on the frame the choice was applied.
pub fn advance_commit(state: &mut GameState, dt: f32) -> bool {
    let Some(pending) = &mut state.progression.pending_commit else {
        return false;
    };
    pending.remaining -= dt;
    if pending.remaining > 0.0 {
        return false;
    }
    let commit = pending.commit;
    state.progression.pending_commit = None;
    state.progression.offer = None;

    apply_commit(state, commit);

    if state.progression.pending_level_ups > 0 {
        state.progression.pending_level_ups -= 1;
        open_offer(state, true);
    } else if state.phase == GamePhase::LevelUp {
        state.phase = GamePhase::Playing;
        state.emit(GameEvent::Resumed);
    }
    true
}

fn apply_commit(state: &mut GameState, commit: Commit) {
    match commit {
        Commit::Apply(Choice::Stat(kind)) => {
            kind.apply(state);
            state.progression.chosen.push(Choice::Stat(kind));
            log::info!("Power-up taken: {}", kind.name());
            state.message(format!("{} acquired!", kind.name()), 2.0);
        }
        Commit::Apply(Choice::Legendary(kind)) => {
            kind.apply(&mut state.player);
            state.progression.active_legendaries.push(kind);
            state.progression.chosen.push(Choice::Legendary(kind));
            log::info!("Legendary taken: {}", kind.name());
            state.message(format!("{} unlocked!", kind.name()), 2.0);
        }
        Commit::Replace { slot, incoming } => {
            let outgoing = state.progression.active_legendaries[slot];
            outgoing.remove(&mut state.player);
            incoming.apply(&mut state.player);
            state.progression.active_legendaries[slot] = incoming;
            state.progression.chosen.push(Choice::Legendary(incoming));
            log::info!("Legendary {} replaced by {}", outgoing.name(), incoming.name());
            state.message(format!("{} replaced {}", incoming.name(), outgoing.name()), 2.0);
        }
    }
    state.emit_health();
}
