//! Glyph rendering boundary used by text-bearing controls.
//!
//! Real font rasterization lives outside this crate; controls only need to
//! know how large a glyph cell is and how to stamp one onto a surface.

use super::{Rgb, Surface};
use crate::geometry::Rect;

/// A fixed-cell font.
pub trait Glyphs {
    /// Size of one glyph cell in pixels, before scaling.
    fn cell_size(&self) -> (i32, i32);

    /// Draw `ch` with its cell's top-left corner at (x, y).
    fn draw_glyph(&self, target: &mut Surface, ch: char, x: i32, y: i32, color: Rgb);
}

/// A placeholder font that renders each visible character as a solid block.
#[derive(Debug, Clone, Copy)]
pub struct BlockFont {
    /// Glyph cell width.
    pub width: i32,
    /// Glyph cell height.
    pub height: i32,
}

impl BlockFont {
    /// The 8x8 cell size used by the built-in sprite font.
    pub const DEFAULT: Self = Self { width: 8, height: 8 };
}

impl Default for BlockFont {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Glyphs for BlockFont {
    fn cell_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn draw_glyph(&self, target: &mut Surface, ch: char, x: i32, y: i32, color: Rgb) {
        if ch.is_whitespace() {
            return;
        }
        // Leave a one pixel gutter so neighbouring glyphs stay distinct.
        target.fill_rect(Rect::new(x, y + 1, self.width - 1, self.height - 2), color);
    }
}
