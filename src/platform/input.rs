//! Keyboard to movement mapping

use glam::Vec2;
use std::collections::HashSet;

use crate::sim::state::GamePhase;

/// Where the frame driver reads player input from
pub trait InputSource {
    /// Raw movement axis; diagonals need not be normalized
    fn movement(&self) -> Vec2;
    /// True once per pause key press
    fn take_pause_toggle(&mut self) -> bool;
}

/// Keys currently held, fed from key down/up events (DOM `key` names)
#[derive(Debug, Default, Clone)]
pub struct HeldKeys {
    held: HashSet<String>,
    pause_pressed: bool,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        let key = key.to_ascii_lowercase();
        if key == "escape" || key == "p" {
            // Auto-repeat sends more downs while held; toggle only once
            if !self.held.contains(&key) {
                self.pause_pressed = true;
            }
        }
        self.held.insert(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key.to_ascii_lowercase());
    }

    /// Drop everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.held.clear();
        self.pause_pressed = false;
    }

    fn any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }
}

impl InputSource for HeldKeys {
    fn movement(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.any(&["w", "arrowup"]) {
            axis.y -= 1.0;
        }
        if self.any(&["s", "arrowdown"]) {
            axis.y += 1.0;
        }
        if self.any(&["a", "arrowleft"]) {
            axis.x -= 1.0;
        }
        if self.any(&["d", "arrowright"]) {
            axis.x += 1.0;
        }
        axis
    }

    fn take_pause_toggle(&mut self) -> bool {
        std::mem::take(&mut self.pause_pressed)
    }
}

/// Screen actions bound to single key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Start,
    Restart,
    ReturnToMenu,
    /// Give up from the pause screen
    Quit,
    Choose(usize),
    /// Slot to free for the incoming legendary
    Replace(usize),
    CancelReplace,
}

/// Map a key press to a screen action; `None` means it is gameplay input.
/// `replacing` is true while the level-up screen asks for a legendary slot.
pub fn menu_command(phase: GamePhase, replacing: bool, key: &str) -> Option<MenuCommand> {
    let key = key.to_ascii_lowercase();
    let digit = key
        .parse::<usize>()
        .ok()
        .filter(|d| (1..=9).contains(d))
        .map(|d| d - 1);
    match phase {
        GamePhase::MainMenu if key == "enter" || key == " " => Some(MenuCommand::Start),
        GamePhase::GameOver if key == "enter" => Some(MenuCommand::Restart),
        GamePhase::GameOver if key == "m" => Some(MenuCommand::ReturnToMenu),
        GamePhase::Paused if key == "r" => Some(MenuCommand::Restart),
        GamePhase::Paused if key == "q" => Some(MenuCommand::Quit),
        GamePhase::LevelUp if replacing && (key == "backspace" || key == "x") => {
            Some(MenuCommand::CancelReplace)
        }
        GamePhase::LevelUp => digit.map(|d| {
            if replacing {
                MenuCommand::Replace(d)
            } else {
                MenuCommand::Choose(d)
            }
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasd_and_arrows() {
        let mut keys = HeldKeys::new();
        keys.key_down("W");
        keys.key_down("ArrowRight");
        assert_eq!(keys.movement(), Vec2::new(1.0, -1.0));

        keys.key_down("s");
        assert_eq!(keys.movement(), Vec2::new(1.0, 0.0));

        keys.key_up("w");
        keys.key_up("ArrowRight");
        assert_eq!(keys.movement(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_pause_is_edge_triggered() {
        let mut keys = HeldKeys::new();
        keys.key_down("Escape");
        keys.key_down("Escape");
        assert!(keys.take_pause_toggle());
        assert!(!keys.take_pause_toggle());

        keys.key_up("Escape");
        keys.key_down("Escape");
        assert!(keys.take_pause_toggle());
    }

    #[test]
    fn test_blur_releases_keys() {
        let mut keys = HeldKeys::new();
        keys.key_down("d");
        keys.key_down("p");
        keys.clear();
        assert_eq!(keys.movement(), Vec2::ZERO);
        assert!(!keys.take_pause_toggle());
    }

    #[test]
    fn test_menu_keys_follow_the_screen() {
        assert_eq!(menu_command(GamePhase::MainMenu, false, "Enter"), Some(MenuCommand::Start));
        assert_eq!(menu_command(GamePhase::Playing, false, "Enter"), None);
        assert_eq!(menu_command(GamePhase::Playing, false, "2"), None);
        assert_eq!(menu_command(GamePhase::Paused, false, "R"), Some(MenuCommand::Restart));
        assert_eq!(menu_command(GamePhase::GameOver, false, "m"), Some(MenuCommand::ReturnToMenu));
        assert_eq!(menu_command(GamePhase::LevelUp, false, "2"), Some(MenuCommand::Choose(1)));
        assert_eq!(menu_command(GamePhase::LevelUp, true, "1"), Some(MenuCommand::Replace(0)));
        assert_eq!(menu_command(GamePhase::LevelUp, true, "Backspace"), Some(MenuCommand::CancelReplace));
        assert_eq!(menu_command(GamePhase::LevelUp, false, "0"), None);
    }
}
