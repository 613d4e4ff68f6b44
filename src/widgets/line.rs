//! Horizontal and vertical separator lines.

use super::panel::{draw_panel, PanelStyle};
use crate::surface::Surface;
use crate::tree::{ControlCx, DrawCx, Widget};

/// Direction a [`Line`] runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

/// A beveled bar used as a separator or a drag handle.
#[derive(Debug, Clone, Copy)]
pub struct Line {
    orientation: Orientation,
    length: i32,
    thickness: i32,
    style: PanelStyle,
}

impl Line {
    /// Default thickness in pixels.
    pub const THICKNESS: i32 = 3;

    /// A horizontal line `length` pixels wide.
    pub const fn horizontal(length: i32) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            length,
            thickness: Self::THICKNESS,
            style: PanelStyle::empty(),
        }
    }

    /// A vertical line `length` pixels tall.
    pub const fn vertical(length: i32) -> Self {
        Self {
            orientation: Orientation::Vertical,
            length,
            thickness: Self::THICKNESS,
            style: PanelStyle::empty(),
        }
    }

    /// Change the thickness.
    #[must_use]
    pub const fn with_thickness(mut self, thickness: i32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Change the panel style.
    #[must_use]
    pub const fn with_style(mut self, style: PanelStyle) -> Self {
        self.style = style;
        self
    }

    /// Direction of the line.
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl Widget for Line {
    fn size_hint(&self) -> (i32, i32) {
        match self.orientation {
            Orientation::Horizontal => (self.length, self.thickness),
            Orientation::Vertical => (self.thickness, self.length),
        }
    }

    fn mount(&mut self, cx: &mut ControlCx<'_>) {
        cx.set_drop_shadow(false);
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        draw_panel(target, cx.bounds, cx.state.color(), self.style);
    }
}
