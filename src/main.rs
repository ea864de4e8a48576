//! Dracula Survivors entry point
//!
//! Native: runs a headless autoplay session and logs a summary. Usage:
//! `dracula-survivors [tuning.json] [max_seconds]`.
//! The browser build starts in `web::start` (library) instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use std::process::ExitCode;
    use std::time::{SystemTime, UNIX_EPOCH};

    use dracula_survivors::highscores::format_survived;
    use dracula_survivors::persistence::JsonFileStore;
    use dracula_survivors::platform::{InputSource, init_logging};
    use dracula_survivors::renderer::NullRenderer;
    use dracula_survivors::sim::{Entity, GamePhase, GameState, VectorExt};
    use dracula_survivors::ui::LogUi;
    use dracula_survivors::{FrameOutcome, Game, Tuning};

    /// Simulated display rate
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const DEFAULT_MAX_SECONDS: f64 = 300.0;

    /// Walks away from the closest threat, drifting toward the center
    #[derive(Default)]
    struct AutoPilot {
        movement: Vec2,
    }

    impl AutoPilot {
        fn steer(&mut self, state: &GameState) {
            let me = state.player.pos();
            let center = state.arena / 2.0;
            let mut away = Vec2::ZERO;
            for enemy in state.enemies.iter().filter(|e| e.is_active()) {
                let offset = me - enemy.pos();
                let distance = offset.magnitude().max(1.0);
                if distance < 250.0 {
                    away += offset.normalized() / distance;
                }
            }
            self.movement = (away.normalized() * 2.0 + (center - me).normalized() * 0.5).normalized();
        }
    }

    impl InputSource for AutoPilot {
        fn movement(&self) -> Vec2 {
            self.movement
        }

        fn take_pause_toggle(&mut self) -> bool {
            false
        }
    }

    fn load_tuning(path: Option<&str>) -> Result<Tuning, String> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        Tuning::from_json(&json).map_err(|e| format!("{path}: {e}"))
    }

    pub fn run() -> ExitCode {
        init_logging();
        log::info!("Dracula Survivors (headless) starting...");

        let args: Vec<String> = std::env::args().skip(1).collect();
        let tuning = match load_tuning(args.first().map(String::as_str)) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Invalid tuning: {e}");
                return ExitCode::FAILURE;
            }
        };
        let max_seconds = args
            .get(1)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(DEFAULT_MAX_SECONDS);

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let store = JsonFileStore::new(std::env::temp_dir().join("dracula-survivors").join("highscores.json"));
        log::info!("High scores kept in {}", store.path().display());
        let mut game = Game::with_tuning(seed, tuning, NullRenderer::default(), LogUi, store);
        log::info!("Best score so far: {}", game.high_score());

        game.start();
        let mut pilot = AutoPilot::default();
        let mut now = 0.0;
        while now < max_seconds * 1000.0 {
            if game.state().phase == GamePhase::LevelUp && game.state().progression.accepts_input() {
                game.select_power_up(0);
                game.cancel_replace();
            }
            pilot.steer(game.state());
            if game.frame(now, &mut pilot) == FrameOutcome::Stop {
                break;
            }
            now += FRAME_MS;
        }
        game.end_run();

        let state = game.state();
        log::info!(
            "Run finished: score {}, level {}, survived {}, {} draw calls",
            state.score,
            state.player.level,
            format_survived(state.elapsed),
            game.renderer().calls
        );
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds start from `dracula_survivors::web::start`
}
