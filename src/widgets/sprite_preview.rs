//! Scaled, optionally tiled preview of a sprite.

use super::panel::{LIGHT_TINT, SHADE_TINT};
use crate::surface::{Blend, Surface};
use crate::tree::{ControlCx, DragMode, DragMotion, DrawCx, Widget};

const BORDER: i32 = 1;
/// Copies per tiled axis.
const SLIDES: i32 = 2;

/// How a [`SpritePreview`] repeats its sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileMode {
    /// One copy.
    #[default]
    None,
    /// Copies side by side.
    Horizontal,
    /// Copies stacked.
    Vertical,
    /// A square of copies.
    Both,
}

impl TileMode {
    const fn slides(self) -> (i32, i32) {
        match self {
            Self::None => (1, 1),
            Self::Horizontal => (SLIDES, 1),
            Self::Vertical => (1, SLIDES),
            Self::Both => (SLIDES, SLIDES),
        }
    }
}

/// Shows a sprite magnified by an integer zoom inside a thin sunken frame.
///
/// Tiling repeats the sprite to check how it joins its neighbours. The
/// control is sized to the frame and can be dragged anywhere by its body.
#[derive(Debug, Clone)]
pub struct SpritePreview {
    sprite: Surface,
    zoom: i32,
    tile_mode: TileMode,
    scaled: Option<Surface>,
}

impl SpritePreview {
    /// Preview `sprite` at `zoom` (at least 1).
    pub fn new(sprite: Surface, zoom: i32) -> Self {
        Self {
            sprite,
            zoom: zoom.max(1),
            tile_mode: TileMode::None,
            scaled: None,
        }
    }

    /// Start in `mode`.
    #[must_use]
    pub const fn with_tile_mode(mut self, mode: TileMode) -> Self {
        self.tile_mode = mode;
        self
    }

    /// The sprite shown.
    pub const fn sprite(&self) -> &Surface {
        &self.sprite
    }

    /// Current tiling.
    pub const fn tile_mode(&self) -> TileMode {
        self.tile_mode
    }

    /// Replace the sprite, resizing the control if its size differs.
    pub fn set_sprite(&mut self, cx: &mut ControlCx<'_>, sprite: Surface) {
        self.sprite = sprite;
        self.scaled = None;
        self.fit(cx);
    }

    /// Change the tiling.
    pub fn set_tile_mode(&mut self, cx: &mut ControlCx<'_>, mode: TileMode) {
        self.tile_mode = mode;
        self.fit(cx);
    }

    fn preview_size(&self) -> (i32, i32) {
        (self.sprite.width() * self.zoom, self.sprite.height() * self.zoom)
    }

    fn fit(&self, cx: &mut ControlCx<'_>) {
        let (w, h) = self.size_hint();
        cx.set_size(w, h);
        cx.mark_dirty();
    }
}

impl Widget for SpritePreview {
    fn size_hint(&self) -> (i32, i32) {
        let (w, h) = self.preview_size();
        let (across, down) = self.tile_mode.slides();
        (w * across + 2 * BORDER, h * down + 2 * BORDER)
    }

    fn drag_move(&mut self, cx: &mut ControlCx<'_>, mode: DragMode, motion: DragMotion) {
        if mode != DragMode::BODY {
            return;
        }
        let b = cx.bounds();
        cx.set_pos(b.x + motion.rel_x, b.y + motion.rel_y);
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        let (w, h) = self.preview_size();
        if cx.state.is_dirty() || self.scaled.is_none() {
            self.scaled = Some(self.sprite.scaled(w, h));
        }
        let b = cx.bounds;
        let (across, down) = self.tile_mode.slides();
        if let Some(scaled) = &self.scaled {
            for j in 0..down {
                for i in 0..across {
                    target.blit(scaled, b.x + BORDER + i * w, b.y + BORDER + j * h, Blend::Copy);
                }
            }
        }
        let color = cx.state.color();
        target.draw_bevel(b, color.darker(SHADE_TINT), color.brighter(LIGHT_TINT), false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Dispatcher;
    use crate::event::{InputEvent, Motion, MouseButton, MouseEvent};
    use crate::geometry::Rect;
    use crate::surface::Rgb;
    use crate::tree::Ui;
    use std::time::Duration;

    fn sprite() -> Surface {
        let mut s = Surface::filled(4, 3, Rgb::GRID);
        s.set(0, 0, Rgb::WHITE);
        s
    }

    #[test]
    fn test_size_follows_tile_mode() {
        let mut ui = Ui::new(200, 200);
        let id = ui.spawn_at(5, 5, SpritePreview::new(sprite(), 2));
        assert_eq!(ui.bounds(id), Some(Rect::new(5, 5, 10, 8)));

        for (mode, size) in [
            (TileMode::Horizontal, (18, 8)),
            (TileMode::Vertical, (10, 14)),
            (TileMode::Both, (18, 14)),
            (TileMode::None, (10, 8)),
        ] {
            ui.with_widget::<SpritePreview, _>(id, |p, cx| p.set_tile_mode(cx, mode));
            let b = ui.bounds(id).unwrap();
            assert_eq!((b.width, b.height), size, "{mode:?}");
        }
    }

    #[test]
    fn test_body_drag_pans() {
        let mut ui = Ui::new(200, 200);
        let id = ui.spawn_at(5, 5, SpritePreview::new(sprite(), 2));
        ui.register(id, None, None).unwrap();

        let mut dispatcher = Dispatcher::default();
        for event in [
            InputEvent::MouseDown(MouseEvent::new(7, 7, MouseButton::Right)),
            InputEvent::MouseMove(Motion::new(17, 11, 10, 4)),
            InputEvent::MouseMove(Motion::new(18, 11, 1, 0)),
            InputEvent::MouseUp(MouseEvent::new(18, 11, MouseButton::Right)),
        ] {
            dispatcher.handle(&mut ui, &event, Duration::ZERO);
        }
        assert_eq!(ui.bounds(id), Some(Rect::new(16, 9, 10, 8)));
    }

    #[test]
    fn test_draws_tiled_copies() {
        let mut ui = Ui::new(40, 40);
        let id = ui.spawn_at(0, 0, SpritePreview::new(sprite(), 2).with_tile_mode(TileMode::Both));
        ui.register(id, None, None).unwrap();

        let mut target = Surface::filled(40, 40, Rgb::BLACK);
        ui.draw(&mut target);
        // top-left zoomed pixel of each copy
        for (x, y) in [(1, 1), (9, 1), (1, 7), (9, 7)] {
            assert_eq!(target.get(x, y), Some(Rgb::WHITE), "copy at {x},{y}");
            assert_eq!(target.get(x + 1, y + 1), Some(Rgb::WHITE));
        }
        assert_eq!(target.get(3, 1), Some(Rgb::GRID));
    }

    #[test]
    fn test_new_sprite_resizes() {
        let mut ui = Ui::new(200, 200);
        let id = ui.spawn_at(0, 0, SpritePreview::new(sprite(), 3));
        ui.with_widget::<SpritePreview, _>(id, |p, cx| p.set_sprite(cx, Surface::new(8, 8)));
        assert_eq!(ui.bounds(id), Some(Rect::new(0, 0, 26, 26)));
    }
}
