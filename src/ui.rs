//! HUD and menu notification seam
//!
//! The simulation queues [`GameEvent`]s; the frame driver hands them to a
//! [`UiNotifier`] through [`dispatch`]. Every method defaults to a no-op so a
//! front end only implements what it displays.

use crate::sim::progression::ChoiceView;
use crate::sim::state::GameEvent;

pub trait UiNotifier {
    fn show_message(&mut self, _text: &str, _seconds: f32) {}
    fn update_score(&mut self, _score: u64) {}
    fn update_level(&mut self, _level: u32) {}
    fn update_lives(&mut self, _lives: u32) {}
    fn update_xp_bar(&mut self, _xp: u32, _needed: u32) {}
    fn update_health(&mut self, _health: f32, _max: f32) {}
    fn show_power_up_choices(&mut self, _choices: &[ChoiceView]) {}
    /// Every legendary slot is taken; `active` lists them by slot
    fn show_replace_prompt(&mut self, _active: &[ChoiceView]) {}
    fn show_game_over(&mut self, _score: u64, _high_score: u64) {}
    fn show_pause(&mut self, _score: u64) {}
    fn hide_overlays(&mut self) {}
}

/// Route one event to the matching notifier call
pub fn dispatch<U: UiNotifier + ?Sized>(ui: &mut U, event: &GameEvent, high_score: u64) {
    match event {
        GameEvent::Message { text, seconds } => ui.show_message(text, *seconds),
        GameEvent::ScoreChanged(score) => ui.update_score(*score),
        GameEvent::LevelChanged(level) => ui.update_level(*level),
        GameEvent::LivesChanged(lives) => ui.update_lives(*lives),
        GameEvent::XpChanged { xp, needed } => ui.update_xp_bar(*xp, *needed),
        GameEvent::HealthChanged { health, max } => ui.update_health(*health, *max),
        GameEvent::PowerUpChoices(choices) => ui.show_power_up_choices(choices),
        GameEvent::ReplaceLegendary(active) => ui.show_replace_prompt(active),
        GameEvent::Paused { score } => ui.show_pause(*score),
        GameEvent::Resumed => ui.hide_overlays(),
        GameEvent::GameOver { score } => ui.show_game_over(*score, high_score),
        GameEvent::BossSpawned { level } => log::debug!("Boss for level {level} announced"),
    }
}

/// Ignores every notification
#[derive(Debug, Default)]
pub struct NullUi;

impl UiNotifier for NullUi {}

/// Writes notable notifications to the log; for headless runs
#[derive(Debug, Default)]
pub struct LogUi;

impl UiNotifier for LogUi {
    fn show_message(&mut self, text: &str, _seconds: f32) {
        log::info!("{text}");
    }

    fn show_power_up_choices(&mut self, choices: &[ChoiceView]) {
        let names: Vec<&str> = choices.iter().map(|c| c.name).collect();
        log::info!("Power-up choices: {}", names.join(", "));
    }

    fn show_replace_prompt(&mut self, active: &[ChoiceView]) {
        let names: Vec<&str> = active.iter().map(|c| c.name).collect();
        log::info!("Replace a legendary: {}", names.join(", "));
    }

    fn show_game_over(&mut self, score: u64, high_score: u64) {
        log::info!("Game over! Score {score} (best {high_score})");
    }

    fn show_pause(&mut self, score: u64) {
        log::info!("Paused at score {score}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Hud {
        score: u64,
        lives: u32,
        game_over: Option<(u64, u64)>,
        overlays_hidden: bool,
    }

    impl UiNotifier for Hud {
        fn update_score(&mut self, score: u64) {
            self.score = score;
        }
        fn update_lives(&mut self, lives: u32) {
            self.lives = lives;
        }
        fn show_game_over(&mut self, score: u64, high_score: u64) {
            self.game_over = Some((score, high_score));
        }
        fn hide_overlays(&mut self) {
            self.overlays_hidden = true;
        }
    }

    #[test]
    fn test_dispatch_routes_events() {
        let mut hud = Hud::default();
        let events = [
            GameEvent::ScoreChanged(120),
            GameEvent::LivesChanged(2),
            GameEvent::Resumed,
            GameEvent::GameOver { score: 120 },
        ];
        for event in &events {
            dispatch(&mut hud, event, 900);
        }
        assert_eq!(hud.score, 120);
        assert_eq!(hud.lives, 2);
        assert!(hud.overlays_hidden);
        assert_eq!(hud.game_over, Some((120, 900)));
    }
}
