//! Rendering seam
//!
//! The simulation produces a list of [`DrawCommand`]s; a platform backend
//! implements [`Renderer`] and receives them through [`replay`].

pub mod shapes;

use glam::Vec2;

pub use shapes::{Color, DrawCommand, Drawable, Sprite, draw_list};

/// Drawing backend (canvas, GPU, terminal, ...)
pub trait Renderer {
    /// Called once per frame before any draw call
    fn begin_frame(&mut self, _arena: Vec2) {}

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn draw_ring(&mut self, center: Vec2, radius: f32, width: f32, color: Color);
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    fn draw_bar(&mut self, pos: Vec2, size: Vec2, fraction: f32, back: Color, fill: Color);

    /// Draw `sprite` if available, otherwise a plain circle
    fn draw_sprite_or_fallback(&mut self, sprite: Sprite, center: Vec2, radius: f32, fallback: Color) {
        let _ = sprite;
        self.draw_circle(center, radius, fallback);
    }

    fn draw_overlay(&mut self, color: Color);
}

/// Feed a draw list into a backend
pub fn replay<R: Renderer + ?Sized>(commands: &[DrawCommand], renderer: &mut R) {
    for command in commands {
        match *command {
            DrawCommand::Circle { center, radius, color } => renderer.draw_circle(center, radius, color),
            DrawCommand::Ring {
                center,
                radius,
                width,
                color,
            } => renderer.draw_ring(center, radius, width, color),
            DrawCommand::Line { from, to, width, color } => renderer.draw_line(from, to, width, color),
            DrawCommand::Bar {
                pos,
                size,
                fraction,
                back,
                fill,
            } => renderer.draw_bar(pos, size, fraction, back, fill),
            DrawCommand::Sprite {
                sprite,
                center,
                radius,
                fallback,
            } => renderer.draw_sprite_or_fallback(sprite, center, radius, fallback),
            DrawCommand::Overlay { color } => renderer.draw_overlay(color),
        }
    }
}

/// CSS `rgba()` string for a canvas fill or stroke
pub fn css_rgba(color: Color) -> String {
    let [r, g, b, a] = color.map(|c| c.clamp(0.0, 1.0));
    format!(
        "rgba({}, {}, {}, {:.3})",
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
        a
    )
}

/// Discards everything; used for headless runs
#[derive(Debug, Default)]
pub struct NullRenderer {
    /// Draw calls received since creation
    pub calls: u64,
}

impl Renderer for NullRenderer {
    fn draw_circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {
        self.calls += 1;
    }

    fn draw_ring(&mut self, _center: Vec2, _radius: f32, _width: f32, _color: Color) {
        self.calls += 1;
    }

    fn draw_line(&mut self, _from: Vec2, _to: Vec2, _width: f32, _color: Color) {
        self.calls += 1;
    }

    fn draw_bar(&mut self, _pos: Vec2, _size: Vec2, _fraction: f32, _back: Color, _fill: Color) {
        self.calls += 1;
    }

    fn draw_overlay(&mut self, _color: Color) {
        self.calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        circles: Vec<(Vec2, f32)>,
        bars: usize,
    }

    impl Renderer for Recorder {
        fn draw_circle(&mut self, center: Vec2, radius: f32, _color: Color) {
            self.circles.push((center, radius));
        }
        fn draw_ring(&mut self, _: Vec2, _: f32, _: f32, _: Color) {}
        fn draw_line(&mut self, _: Vec2, _: Vec2, _: f32, _: Color) {}
        fn draw_bar(&mut self, _: Vec2, _: Vec2, _: f32, _: Color, _: Color) {
            self.bars += 1;
        }
        fn draw_overlay(&mut self, _: Color) {}
    }

    #[test]
    fn test_sprite_falls_back_to_circle() {
        let commands = vec![
            DrawCommand::Sprite {
                sprite: Sprite::Boss,
                center: Vec2::new(5.0, 6.0),
                radius: 36.0,
                fallback: [1.0; 4],
            },
            DrawCommand::Bar {
                pos: Vec2::ZERO,
                size: Vec2::new(10.0, 2.0),
                fraction: 0.5,
                back: [0.0; 4],
                fill: [1.0; 4],
            },
        ];
        let mut recorder = Recorder::default();
        replay(&commands, &mut recorder);
        assert_eq!(recorder.circles, vec![(Vec2::new(5.0, 6.0), 36.0)]);
        assert_eq!(recorder.bars, 1);
    }

    #[test]
    fn test_css_rgba() {
        assert_eq!(css_rgba([1.0, 0.5, 0.0, 0.25]), "rgba(255, 128, 0, 0.250)");
        assert_eq!(css_rgba([2.0, -1.0, 0.0, 1.0]), "rgba(255, 0, 0, 1.000)");
    }
}
