//! Drawing surface abstraction
//!
//! The engine describes a frame as a handful of primitives. A real renderer
//! implements [`Canvas`]; [`DrawList`] records the calls for headless runs
//! and tests.

use glam::Vec2;

/// Linear RGBA
pub type Color = [f32; 4];

pub const BACKGROUND: Color = [0.043, 0.067, 0.125, 1.0];
pub const PLAYER: Color = [0.176, 0.831, 0.749, 1.0];
pub const BULLET: Color = [0.486, 0.906, 1.0, 1.0];
pub const METEOR: Color = [0.6, 0.4, 0.25, 1.0];
pub const KRAKEN: Color = [0.3, 0.85, 0.45, 1.0];
pub const SHOCKWAVE: Color = [0.486, 0.906, 1.0, 0.6];
pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];

/// Unpack a 0xRRGGBB tint with the given alpha
pub fn tint_color(tint: u32, alpha: u8) -> Color {
    let channel = |shift: u32| ((tint >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha as f32 / 255.0]
}

/// Something a frame can be drawn onto
pub trait Canvas {
    fn clear(&mut self, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);
    fn fill_rect(&mut self, min: Vec2, max: Vec2, color: Color);
    fn text(&mut self, pos: Vec2, text: &str, color: Color);
}

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, width: f32, color: Color },
    FillRect { min: Vec2, max: Vec2, color: Color },
    Text { pos: Vec2, text: String, color: Color },
}

/// Canvas that just remembers what was drawn
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            color,
        });
    }

    fn fill_rect(&mut self, min: Vec2, max: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect { min, max, color });
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_unpacks_channels() {
        let c = tint_color(0xff8000, 255);
        assert_eq!(c[0], 1.0);
        assert!((c[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[2], 0.0);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut list = DrawList::new();
        list.fill_circle(Vec2::ZERO, 1.0, TEXT);
        list.clear(BACKGROUND);
        assert_eq!(list.commands, vec![DrawCommand::Clear(BACKGROUND)]);
    }
}
