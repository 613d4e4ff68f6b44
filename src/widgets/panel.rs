//! Beveled panels and the plain color cell.

use crate::geometry::Rect;
use crate::surface::{Rgb, Surface};
use crate::tree::{ControlCx, DrawCx, Widget};
use bitflags::bitflags;

/// How much darker the shaded edge of a panel is than its face.
pub const SHADE_TINT: f32 = 0.3;
/// How much lighter the lit edge of a panel is than its face.
pub const LIGHT_TINT: f32 = 0.2;

bitflags! {
    /// Panel drawing style.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PanelStyle: u8 {
        /// Light from the bottom right, so the panel looks pressed in.
        const SUNKEN = 0b01;
        /// Darken the face.
        const DARK = 0b10;
    }
}

/// Fill `rect` with `color` and frame it with a bevel derived from it.
pub fn draw_panel(target: &mut Surface, rect: Rect, color: Rgb, style: PanelStyle) {
    let face = if style.contains(PanelStyle::DARK) {
        color.darker(0.5)
    } else {
        color
    };
    target.fill_rect(rect, face);
    target.draw_bevel(
        rect,
        color.darker(SHADE_TINT),
        color.brighter(LIGHT_TINT),
        !style.contains(PanelStyle::SUNKEN),
    );
}

/// A solid swatch with a light border, as used by palettes.
#[derive(Debug, Clone)]
pub struct ColorCell {
    size: (i32, i32),
    initial: Rgb,
    border: Rgb,
}

impl ColorCell {
    /// A `width` x `height` swatch of `color`.
    ///
    /// The swatch color is the control color afterwards; change it with
    /// [`Ui::set_color`](crate::tree::Ui::set_color).
    pub const fn new(width: i32, height: i32, color: Rgb) -> Self {
        Self {
            size: (width, height),
            initial: color,
            border: Rgb::BORDER,
        }
    }

    /// Use a different border color.
    #[must_use]
    pub const fn with_border(mut self, border: Rgb) -> Self {
        self.border = border;
        self
    }
}

impl Widget for ColorCell {
    fn size_hint(&self) -> (i32, i32) {
        self.size
    }

    fn mount(&mut self, cx: &mut ControlCx<'_>) {
        cx.ui.set_color(cx.id, self.initial);
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        target.fill_rect(cx.bounds, cx.state.color());
        target.draw_rect(cx.bounds, self.border);
    }
}
