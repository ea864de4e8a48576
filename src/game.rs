//! Frame driver
//!
//! Owns the [`GameState`] and its collaborators. Each call to
//! [`Game::frame`] clamps the real elapsed time, resolves a pending power-up
//! choice, ticks the simulation, forwards queued events to the UI, records
//! finished runs and draws.

use crate::consts::MAX_FRAME_DT;
use crate::highscores::{HighScoreEntry, HighScores};
use crate::persistence::HighScoreStore;
use crate::platform::{InputSource, unix_millis};
use crate::renderer::{Renderer, draw_list, replay};
use crate::sim::progression::{self, Selection};
use crate::sim::state::{GameEvent, GamePhase, GameState};
use crate::sim::tick::{TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::{UiNotifier, dispatch};

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// The run is over; wait for restart or menu input
    Stop,
}

pub struct Game<R: Renderer, U: UiNotifier, S: HighScoreStore> {
    state: GameState,
    renderer: R,
    ui: U,
    store: S,
    high_scores: HighScores,
    /// Timestamp of the previous frame (ms)
    last_time: Option<f64>,
}

impl<R: Renderer, U: UiNotifier, S: HighScoreStore> Game<R, U, S> {
    pub fn new(seed: u64, renderer: R, ui: U, store: S) -> Self {
        Self::with_tuning(seed, Tuning::default(), renderer, ui, store)
    }

    pub fn with_tuning(seed: u64, tuning: Tuning, renderer: R, ui: U, mut store: S) -> Self {
        let mut high_scores = store.load().unwrap_or_else(|e| {
            log::warn!("Could not load high scores: {e}");
            HighScores::default()
        });
        high_scores.normalize();
        Self {
            state: GameState::with_tuning(seed, tuning),
            renderer,
            ui,
            store,
            high_scores,
            last_time: None,
        }
    }

    /// Advance one display frame; `now` is a monotonic timestamp in ms
    pub fn frame(&mut self, now: f64, input: &mut impl InputSource) -> FrameOutcome {
        let dt = match self.last_time {
            Some(last) => (((now - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_time = Some(now);

        progression::advance_commit(&mut self.state, dt);

        let tick_input = TickInput {
            movement: input.movement(),
            pause: input.take_pause_toggle(),
        };
        tick(&mut self.state, &tick_input, dt);
        self.flush_events();

        self.renderer.begin_frame(self.state.arena);
        replay(&draw_list(&self.state), &mut self.renderer);

        match self.state.phase {
            GamePhase::GameOver => FrameOutcome::Stop,
            _ => FrameOutcome::Continue,
        }
    }

    /// MainMenu -> Playing
    pub fn start(&mut self) {
        if self.state.phase == GamePhase::MainMenu {
            self.state.start();
            self.flush_events();
        }
    }

    /// Start over with a new seed from the game-over or pause screen
    pub fn restart(&mut self) -> bool {
        if !matches!(self.state.phase, GamePhase::GameOver | GamePhase::Paused) {
            log::debug!("Ignoring restart during {:?}", self.state.phase);
            return false;
        }
        self.state.restart();
        self.flush_events();
        true
    }

    pub fn select_power_up(&mut self, index: usize) -> Selection {
        let selection = progression::select_power_up(&mut self.state, index);
        self.flush_events();
        selection
    }

    pub fn replace_legendary(&mut self, slot: usize) -> bool {
        let replaced = progression::replace_legendary(&mut self.state, slot);
        self.flush_events();
        replaced
    }

    pub fn cancel_replace(&mut self) -> bool {
        let cancelled = progression::cancel_replace(&mut self.state);
        self.flush_events();
        cancelled
    }

    pub fn pause(&mut self) -> bool {
        let paused = self.state.pause();
        self.flush_events();
        paused
    }

    pub fn resume(&mut self) -> bool {
        let resumed = self.state.resume();
        self.flush_events();
        resumed
    }

    /// Give up; the score is recorded as for any game over
    pub fn end_run(&mut self) -> bool {
        let ended = self.state.end_run();
        self.flush_events();
        ended
    }

    /// Give up from the pause menu and land on the main menu
    pub fn end_run_to_menu(&mut self) -> bool {
        if !self.end_run() {
            return false;
        }
        self.state.return_to_menu()
    }

    pub fn return_to_menu(&mut self) -> bool {
        self.state.return_to_menu()
    }

    pub fn high_score(&self) -> u64 {
        self.high_scores.high_score()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    fn flush_events(&mut self) {
        for event in self.state.drain_events() {
            if let GameEvent::GameOver { score } = event {
                self.record_score(score);
            }
            let high_score = self.high_score();
            dispatch(&mut self.ui, &event, high_score);
        }
    }

    fn record_score(&mut self, score: u64) {
        let entry = HighScoreEntry {
            score,
            level: self.state.player.level,
            survived_secs: self.state.elapsed,
            timestamp: unix_millis(),
        };
        let Some(rank) = self.high_scores.record(entry) else {
            return;
        };
        log::info!("New leaderboard entry #{rank}: {score}");
        if let Err(e) = self.store.save(&self.high_scores) {
            log::warn!("Could not save high scores: {e}");
        }
    }
}
