//! Surface: a grid of pixels that controls draw into.
//!
//! The surface uses contiguous memory allocation in row-major order:
//! `index = y * width + x`. All drawing operations clip silently; only
//! sub-surface extraction reports out-of-range requests, because a caller
//! asking for a region that does not exist has mismatched geometry.

use super::color::Rgb;
use crate::geometry::Rect;
use std::collections::VecDeque;
use thiserror::Error;

/// Errors raised by surface operations that cannot clip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The requested rectangle is not fully inside the surface.
    #[error("rectangle {rect:?} lies outside a {width}x{height} surface")]
    OutOfBounds {
        /// The offending rectangle.
        rect: Rect,
        /// Surface width.
        width: i32,
        /// Surface height.
        height: i32,
    },
}

/// How source pixels combine with destination pixels in [`Surface::blit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    /// Overwrite the destination.
    #[default]
    Copy,
    /// Overwrite, except where the source equals the key color.
    ColorKey(Rgb),
    /// Saturating per-channel addition.
    Add,
    /// Saturating per-channel subtraction.
    Sub,
}

/// A grid of pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    /// Contiguous pixel storage (row-major order).
    pixels: Vec<Rgb>,
    /// Width in pixels.
    width: i32,
    /// Height in pixels.
    height: i32,
}

impl Surface {
    /// Create a new surface filled with black.
    ///
    /// Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, Rgb::BLACK)
    }

    /// Create a new surface filled with `color`.
    #[allow(clippy::cast_sign_loss)]
    pub fn filled(width: i32, height: i32, color: Rgb) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            pixels: vec![color; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Get the surface width.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Get the surface height.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// The rectangle covered by this surface, anchored at the origin.
    #[inline]
    pub const fn rect(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Get a reference to the underlying pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    #[allow(clippy::cast_sign_loss)]
    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get the pixel at (x, y).
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Rgb) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.pixels[idx] = color;
            true
        } else {
            false
        }
    }

    /// Fill the whole surface.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Reallocate to a new size; contents are cleared to black.
    pub fn resize(&mut self, width: i32, height: i32) {
        *self = Self::new(width, height);
    }

    /// Clip `rect` against the surface bounds.
    fn clip(&self, rect: Rect) -> Option<(i32, i32, i32, i32)> {
        let x1 = rect.x.max(0);
        let y1 = rect.y.max(0);
        let x2 = rect.right().min(self.width);
        let y2 = rect.bottom().min(self.height);
        (x1 < x2 && y1 < y2).then_some((x1, y1, x2, y2))
    }

    /// Fill a rectangle, clipped to the surface.
    #[allow(clippy::cast_sign_loss)]
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let Some((x1, y1, x2, y2)) = self.clip(rect) else {
            return;
        };
        let w = self.width as usize;
        for y in y1..y2 {
            let row = (y as usize) * w;
            self.pixels[row + x1 as usize..row + x2 as usize].fill(color);
        }
    }

    /// Draw a one pixel outline of `rect`.
    pub fn draw_rect(&mut self, rect: Rect, color: Rgb) {
        if rect.is_empty() {
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - 1, rect.width, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.height), color);
        self.fill_rect(Rect::new(rect.right() - 1, rect.y, 1, rect.height), color);
    }

    /// Draw a two-tone bevel frame around `rect`.
    ///
    /// `raised` puts the light color on the top-left edges; a sunken frame
    /// swaps the two.
    pub fn draw_bevel(&mut self, rect: Rect, shade: Rgb, light: Rgb, raised: bool) {
        if rect.is_empty() {
            return;
        }
        let (top_left, bottom_right) = if raised { (light, shade) } else { (shade, light) };
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, 1), top_left);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.height), top_left);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - 1, rect.width, 1), bottom_right);
        self.fill_rect(Rect::new(rect.right() - 1, rect.y, 1, rect.height), bottom_right);
    }

    /// Draw a line between two points (Bresenham).
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb) {
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);
        loop {
            self.set(x, y, color);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Replace the 4-connected area of the color at (x, y) with `color`.
    pub fn flood_fill(&mut self, x: i32, y: i32, color: Rgb) {
        let Some(target) = self.get(x, y) else {
            return;
        };
        if target == color {
            return;
        }
        let mut queue = VecDeque::from([(x, y)]);
        while let Some((cx, cy)) = queue.pop_front() {
            if self.get(cx, cy) != Some(target) {
                continue;
            }
            self.set(cx, cy, color);
            queue.extend([(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)]);
        }
    }

    /// Copy `src` onto this surface with its top-left at (x, y).
    pub fn blit(&mut self, src: &Self, x: i32, y: i32, blend: Blend) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                let Some(idx) = self.index_of(x + sx, y + sy) else {
                    continue;
                };
                let Some(s) = src.get(sx, sy) else {
                    continue;
                };
                let d = &mut self.pixels[idx];
                *d = match blend {
                    Blend::Copy => s,
                    Blend::ColorKey(key) if s == key => continue,
                    Blend::ColorKey(_) => s,
                    Blend::Add => d.saturating_add(s),
                    Blend::Sub => d.saturating_sub(s),
                };
            }
        }
    }

    /// Nearest-neighbour scale of this surface to `width` x `height`.
    #[must_use]
    pub fn scaled(&self, width: i32, height: i32) -> Self {
        let mut out = Self::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..out.height {
            let sy = y * self.height / out.height;
            for x in 0..out.width {
                let sx = x * self.width / out.width;
                if let Some(c) = self.get(sx, sy) {
                    out.set(x, y, c);
                }
            }
        }
        out
    }

    /// Copy out the pixels under `rect`.
    ///
    /// Unlike drawing, extraction does not clip: the whole rectangle must lie
    /// inside the surface.
    pub fn sub_surface(&self, rect: Rect) -> Result<Self, SurfaceError> {
        if rect.x < 0
            || rect.y < 0
            || rect.width < 0
            || rect.height < 0
            || rect.right() > self.width
            || rect.bottom() > self.height
        {
            return Err(SurfaceError::OutOfBounds {
                rect,
                width: self.width,
                height: self.height,
            });
        }
        let mut out = Self::new(rect.width, rect.height);
        out.blit(self, -rect.x, -rect.y, Blend::Copy);
        Ok(out)
    }

    /// Iterate over rows of pixels.
    #[allow(clippy::cast_sign_loss)]
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Surface({}x{})", self.width, self.height)
    }
}
