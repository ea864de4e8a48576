//! Browser front end (wasm32 only)
//!
//! Draws on `#game-canvas` through the 2D context, mirrors HUD events into
//! DOM elements, keeps high scores in LocalStorage and drives [`Game`] from
//! `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent};

use crate::game::{FrameOutcome, Game};
use crate::persistence::LocalStorageStore;
use crate::platform::{HeldKeys, MenuCommand, init_logging, menu_command, unix_millis};
use crate::renderer::{Color, Renderer, css_rgba};
use crate::sim::progression::{ChoiceView, OfferStage};
use crate::ui::UiNotifier;

type WebGame = Game<CanvasRenderer, DomUi, LocalStorageStore>;

struct App {
    game: WebGame,
    keys: HeldKeys,
    /// A frame callback is scheduled
    looping: bool,
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    arena: Vec2,
}

impl CanvasRenderer {
    fn stroke(&self, color: Color, width: f32) {
        self.ctx.set_stroke_style_str(&css_rgba(color));
        self.ctx.set_line_width(f64::from(width));
        self.ctx.stroke();
    }
}

impl Renderer for CanvasRenderer {
    fn begin_frame(&mut self, arena: Vec2) {
        self.arena = arena;
        self.ctx.set_fill_style_str("#0b0710");
        self.ctx.fill_rect(0.0, 0.0, f64::from(arena.x), f64::from(arena.y));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius.max(0.0)),
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.set_fill_style_str(&css_rgba(color));
        self.ctx.fill();
    }

    fn draw_ring(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius.max(0.0)),
            0.0,
            std::f64::consts::TAU,
        );
        self.stroke(color, width);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(from.x), f64::from(from.y));
        self.ctx.line_to(f64::from(to.x), f64::from(to.y));
        self.stroke(color, width);
    }

    fn draw_bar(&mut self, pos: Vec2, size: Vec2, fraction: f32, back: Color, fill: Color) {
        let (x, y) = (f64::from(pos.x), f64::from(pos.y));
        let (w, h) = (f64::from(size.x), f64::from(size.y));
        self.ctx.set_fill_style_str(&css_rgba(back));
        self.ctx.fill_rect(x, y, w, h);
        self.ctx.set_fill_style_str(&css_rgba(fill));
        self.ctx.fill_rect(x, y, w * f64::from(fraction.clamp(0.0, 1.0)), h);
    }

    fn draw_overlay(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&css_rgba(color));
        self.ctx.fill_rect(0.0, 0.0, f64::from(self.arena.x), f64::from(self.arena.y));
    }
}

/// HUD and menu screens as DOM elements, looked up by id
pub struct DomUi {
    document: Document,
    /// Unix ms when the banner message should disappear
    message_until: Option<f64>,
}

impl DomUi {
    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(&self, id: &str, visible: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn list_choices(&self, title: &str, choices: &[ChoiceView]) {
        let lines: Vec<String> = choices
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let tag = if c.legendary { " [legendary]" } else { "" };
                format!("{}) {}{tag} - {}", i + 1, c.name, c.description)
            })
            .collect();
        self.set_text("power-up-title", title);
        self.set_text("power-up-choices", &lines.join("\n"));
        self.set_visible("power-up-menu", true);
    }

    fn expire_message(&mut self, now: f64) {
        if self.message_until.is_some_and(|until| now >= until) {
            self.message_until = None;
            self.set_visible("message", false);
        }
    }
}

impl UiNotifier for DomUi {
    fn show_message(&mut self, text: &str, seconds: f32) {
        self.set_text("message", text);
        self.set_visible("message", true);
        self.message_until = Some(unix_millis() + f64::from(seconds) * 1000.0);
    }

    fn update_score(&mut self, score: u64) {
        self.set_text("score", &score.to_string());
    }

    fn update_level(&mut self, level: u32) {
        self.set_text("level", &level.to_string());
    }

    fn update_lives(&mut self, lives: u32) {
        self.set_text("lives", &lives.to_string());
    }

    fn update_xp_bar(&mut self, xp: u32, needed: u32) {
        let percent = if needed == 0 { 0.0 } else { 100.0 * xp as f32 / needed as f32 };
        if let Some(el) = self.document.get_element_by_id("xp-fill") {
            let _ = el.set_attribute("style", &format!("width: {percent:.1}%"));
        }
    }

    fn update_health(&mut self, health: f32, max: f32) {
        self.set_text("health", &format!("{:.0} / {:.0}", health.max(0.0), max));
    }

    fn show_power_up_choices(&mut self, choices: &[ChoiceView]) {
        self.list_choices("Choose a power-up", choices);
    }

    fn show_replace_prompt(&mut self, active: &[ChoiceView]) {
        self.list_choices("Replace a legendary (Backspace to cancel)", active);
    }

    fn show_game_over(&mut self, score: u64, high_score: u64) {
        self.set_text("final-score", &score.to_string());
        self.set_text("high-score", &high_score.to_string());
        self.set_visible("power-up-menu", false);
        self.set_visible("game-over", true);
    }

    fn show_pause(&mut self, score: u64) {
        self.set_text("pause-score", &score.to_string());
        self.set_visible("pause-menu", true);
    }

    fn hide_overlays(&mut self) {
        for id in ["power-up-menu", "pause-menu", "game-over", "main-menu"] {
            self.set_visible(id, false);
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    init_logging();
    log::info!("Dracula Survivors starting...");

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id("game-canvas")
        .ok_or("missing #game-canvas")?
        .dyn_into()?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or("2d context unavailable")?
        .dyn_into()?;

    let seed = unix_millis() as u64;
    let renderer = CanvasRenderer { ctx, arena: Vec2::ZERO };
    let ui = DomUi {
        document: document.clone(),
        message_until: None,
    };
    let game = Game::new(seed, renderer, ui, LocalStorageStore);
    canvas.set_width(game.state().arena.x as u32);
    canvas.set_height(game.state().arena.y as u32);
    let high_score = game.high_score();
    game.ui().set_text("high-score", &high_score.to_string());

    let app = Rc::new(RefCell::new(App {
        game,
        keys: HeldKeys::new(),
        looping: false,
    }));
    setup_input_handlers(&window, &document, app.clone())?;
    ensure_loop(&app);
    log::info!("Dracula Survivors running!");
    Ok(())
}

fn setup_input_handlers(
    window: &web_sys::Window,
    document: &Document,
    app: Rc<RefCell<App>>,
) -> Result<(), JsValue> {
    // Keyboard
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            let command = {
                let a = app.borrow();
                let state = a.game.state();
                let replacing = matches!(
                    state.progression.offer.as_ref().map(|o| &o.stage),
                    Some(OfferStage::AwaitingReplace { .. })
                );
                menu_command(state.phase, replacing, &key)
            };
            match command {
                Some(command) => {
                    event.prevent_default();
                    run_command(&app, command);
                }
                None => app.borrow_mut().keys.key_down(&key),
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            app.borrow_mut().keys.key_up(&event.key());
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Auto-pause when the tab is hidden or the window loses focus
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut a = app.borrow_mut();
            a.keys.clear();
            if a.game.pause() {
                log::info!("Auto-paused: window lost focus");
            }
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut a = app.borrow_mut();
                a.keys.clear();
                if a.game.pause() {
                    log::info!("Auto-paused: tab hidden");
                }
            }
        });
        document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Menu buttons
    for (id, command) in [
        ("start-btn", MenuCommand::Start),
        ("restart-btn", MenuCommand::Restart),
        ("menu-btn", MenuCommand::ReturnToMenu),
        ("quit-btn", MenuCommand::Quit),
    ] {
        let Some(btn) = document.get_element_by_id(id) else {
            continue;
        };
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            run_command(&app, command);
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(btn) = document.get_element_by_id("resume-btn") {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            app.borrow_mut().game.resume();
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn run_command(app: &Rc<RefCell<App>>, command: MenuCommand) {
    {
        let mut a = app.borrow_mut();
        let game = &mut a.game;
        let accepted = match command {
            MenuCommand::Start => {
                game.start();
                true
            }
            MenuCommand::Restart => game.restart(),
            MenuCommand::ReturnToMenu => game.return_to_menu(),
            MenuCommand::Quit => game.end_run_to_menu(),
            MenuCommand::Choose(index) => {
                game.select_power_up(index);
                true
            }
            MenuCommand::Replace(slot) => game.replace_legendary(slot),
            MenuCommand::CancelReplace => game.cancel_replace(),
        };
        if !accepted {
            log::debug!("{command:?} ignored");
        }
        let on_menu = game.state().phase == crate::sim::state::GamePhase::MainMenu;
        game.ui().set_visible("main-menu", on_menu);
        if matches!(command, MenuCommand::ReturnToMenu | MenuCommand::Quit) {
            game.ui().set_visible("game-over", false);
            game.ui().set_visible("pause-menu", false);
        }
    }
    ensure_loop(app);
}

/// Restart the frame loop if it stopped at game over
fn ensure_loop(app: &Rc<RefCell<App>>) {
    {
        let mut a = app.borrow_mut();
        if a.looping {
            return;
        }
        a.looping = true;
    }
    request_animation_frame(app.clone());
}

fn request_animation_frame(app: Rc<RefCell<App>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        game_loop(app, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(app: Rc<RefCell<App>>, time: f64) {
    let outcome = {
        let mut a = app.borrow_mut();
        let App { game, keys, .. } = &mut *a;
        let outcome = game.frame(time, keys);
        game.ui_mut().expire_message(unix_millis());
        if outcome == FrameOutcome::Stop {
            a.looping = false;
        }
        outcome
    };
    if outcome == FrameOutcome::Continue {
        request_animation_frame(app);
    }
}
