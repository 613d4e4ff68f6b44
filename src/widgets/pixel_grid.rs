//! Zoomable pixel canvas for sprite editing.
//!
//! The grid keeps a small image, one pixel per cell, and draws it scaled up
//! by the zoom factor. Positions handed to the cell operations are screen
//! coordinates; they are mapped onto cells through the control's bounds.

use super::undo::UndoStack;
use crate::error::{Result, UiError};
use crate::geometry::Rect;
use crate::surface::{Blend, Rgb, Surface};
use crate::tree::{ControlCx, DrawCx, Widget};

/// Largest zoom factor.
pub const MAX_ZOOM: u32 = 32;

/// Grid lines are drawn above this zoom.
const GRID_LINES_ABOVE: u32 = 5;

/// Subtracted from cells along the dotted grid lines.
const GRID_LINE: Rgb = Rgb::new(33, 32, 29);

type PaintedFn = dyn FnMut(&Surface);

/// An editable `cols` x `rows` image shown `zoom` times enlarged.
///
/// Edits do not record history by themselves: call
/// [`checkpoint`](Self::checkpoint) before a stroke to make it undoable.
/// The history keeps the last [`UndoStack::DEFAULT_CAPACITY`] states.
pub struct PixelGrid {
    image: Surface,
    zoom: u32,
    history: UndoStack<Surface>,
    cache: Option<Surface>,
    on_painted: Option<Box<PaintedFn>>,
}

fn check_zoom(zoom: u32) -> Result<()> {
    if (1..=MAX_ZOOM).contains(&zoom) {
        Ok(())
    } else {
        Err(UiError::ZoomOutOfRange(zoom))
    }
}

fn blank(cols: i32, rows: i32) -> Result<Surface> {
    if cols <= 0 || rows <= 0 {
        return Err(UiError::InvalidArgument(format!("pixel grid must not be empty, got {cols}x{rows}")));
    }
    Ok(Surface::filled(cols, rows, Rgb::GRID))
}

/// Cell under `(x, y)` for a grid at `bounds` with `cell`-sized cells.
fn cell_in(bounds: Rect, cell: i32, cols: i32, rows: i32, x: i32, y: i32) -> Option<(i32, i32)> {
    let col = (x - bounds.x).div_euclid(cell);
    let row = (y - bounds.y).div_euclid(cell);
    ((0..cols).contains(&col) && (0..rows).contains(&row)).then_some((col, row))
}

impl PixelGrid {
    /// A `cols` x `rows` grid at `zoom`.
    pub fn new(cols: i32, rows: i32, zoom: u32) -> Result<Self> {
        check_zoom(zoom)?;
        Ok(Self {
            image: blank(cols, rows)?,
            zoom,
            history: UndoStack::default(),
            cache: None,
            on_painted: None,
        })
    }

    /// A grid with the smallest zoom that makes it at least `max_width`
    /// pixels wide, or [`MAX_ZOOM`] if none does.
    pub fn fit_width(cols: i32, rows: i32, max_width: i32) -> Result<Self> {
        let zoom = (1..=MAX_ZOOM)
            .find(|&z| i64::from(z) * i64::from(cols) >= i64::from(max_width))
            .unwrap_or(MAX_ZOOM);
        Self::new(cols, rows, zoom)
    }

    /// Call `f` with the unscaled image whenever the grid is redrawn after
    /// a change, for example to refresh a preview.
    #[must_use]
    pub fn on_painted(mut self, f: impl FnMut(&Surface) + 'static) -> Self {
        self.on_painted = Some(Box::new(f));
        self
    }

    /// Columns.
    pub const fn cols(&self) -> i32 {
        self.image.width()
    }

    /// Rows.
    pub const fn rows(&self) -> i32 {
        self.image.height()
    }

    /// Zoom factor: the on-screen size of one cell.
    pub const fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Change the zoom factor and resize the control to match.
    pub fn set_zoom(&mut self, cx: &mut ControlCx<'_>, zoom: u32) -> Result<()> {
        check_zoom(zoom)?;
        self.zoom = zoom;
        self.fit(cx);
        Ok(())
    }

    /// The unscaled image.
    pub const fn image(&self) -> &Surface {
        &self.image
    }

    /// Replace the image, adopting its size.
    pub fn set_image(&mut self, cx: &mut ControlCx<'_>, image: Surface) -> Result<()> {
        if image.width() <= 0 || image.height() <= 0 {
            return Err(UiError::InvalidArgument("pixel grid image is empty".into()));
        }
        self.image = image;
        self.fit(cx);
        Ok(())
    }

    /// Copy `src` into the image with its top-left at cell `(col, row)`.
    pub fn paste(&mut self, cx: &mut ControlCx<'_>, src: &Surface, col: i32, row: i32) {
        self.image.blit(src, col, row, Blend::Copy);
        cx.mark_dirty();
    }

    /// Copy out the cells under `rect`, which must lie inside the image.
    pub fn region(&self, rect: Rect) -> Result<Surface> {
        self.image
            .sub_surface(rect)
            .map_err(|e| UiError::surface("can't extract pixel grid region", e))
    }

    /// Cell under the screen position `(x, y)`.
    pub fn cell_at(&self, cx: &ControlCx<'_>, x: i32, y: i32) -> Option<(i32, i32)> {
        cell_in(cx.bounds(), self.cell_size(), self.cols(), self.rows(), x, y)
    }

    /// Color of the cell under `(x, y)`.
    pub fn color_at(&self, cx: &ControlCx<'_>, x: i32, y: i32) -> Option<Rgb> {
        let (col, row) = self.cell_at(cx, x, y)?;
        self.image.get(col, row)
    }

    /// Paint the cell under `(x, y)`. Returns `false` off the grid.
    pub fn set_color_at(&mut self, cx: &mut ControlCx<'_>, x: i32, y: i32, color: Rgb) -> bool {
        let Some((col, row)) = self.cell_at(cx, x, y) else {
            return false;
        };
        self.image.set(col, row, color);
        cx.mark_dirty();
        true
    }

    /// Draw a line between the cells under two screen positions. Nothing is
    /// drawn unless both ends are on the grid.
    pub fn line(&mut self, cx: &mut ControlCx<'_>, from: (i32, i32), to: (i32, i32), color: Rgb) -> bool {
        let (Some(a), Some(b)) = (self.cell_at(cx, from.0, from.1), self.cell_at(cx, to.0, to.1)) else {
            return false;
        };
        self.image.line(a.0, a.1, b.0, b.1, color);
        cx.mark_dirty();
        true
    }

    /// Flood fill from the cell under `(x, y)`.
    pub fn flood_fill_at(&mut self, cx: &mut ControlCx<'_>, x: i32, y: i32, color: Rgb) -> bool {
        let Some((col, row)) = self.cell_at(cx, x, y) else {
            return false;
        };
        self.image.flood_fill(col, row, color);
        cx.mark_dirty();
        true
    }

    /// Remember the current image so the next edits can be undone.
    pub fn checkpoint(&mut self) {
        self.history.push(self.image.clone());
    }

    /// Go back to the last checkpoint. Returns `false` with nothing to undo.
    pub fn undo(&mut self, cx: &mut ControlCx<'_>) -> bool {
        let Some(image) = self.history.pop() else {
            return false;
        };
        self.image = image;
        self.fit(cx);
        true
    }

    /// Forget all checkpoints.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Checkpoints available to undo.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[allow(clippy::cast_possible_wrap)]
    const fn cell_size(&self) -> i32 {
        self.zoom as i32
    }

    fn fit(&self, cx: &mut ControlCx<'_>) {
        let (w, h) = self.size_hint();
        cx.set_size(w, h);
        cx.mark_dirty();
    }

    fn render(&self, width: i32, height: i32) -> Surface {
        let mut out = self.image.scaled(width, height);
        if self.zoom > GRID_LINES_ABOVE {
            let step = self.zoom as usize;
            let mut lines = Surface::new(width, height);
            for x in (0..width).step_by(step) {
                for y in (1..height).step_by(2) {
                    lines.set(x, y, GRID_LINE);
                }
            }
            for y in (0..height).step_by(step) {
                for x in (1..width).step_by(2) {
                    lines.set(x, y, GRID_LINE);
                }
            }
            out.blit(&lines, 0, 0, Blend::Sub);
        }
        out.draw_rect(Rect::from_size(width, height), Rgb::GRID_CELL);
        out
    }
}

impl Widget for PixelGrid {
    fn size_hint(&self) -> (i32, i32) {
        let cell = self.cell_size();
        (self.cols() * cell, self.rows() * cell)
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        let b = cx.bounds;
        if cx.state.is_dirty() || self.cache.is_none() {
            self.cache = Some(self.render(b.width, b.height));
            if let Some(f) = self.on_painted.as_mut() {
                f(&self.image);
            }
        }
        if let Some(cache) = &self.cache {
            target.blit(cache, b.x, b.y, Blend::Copy);
        }
    }
}

impl std::fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelGrid")
            .field("cols", &self.cols())
            .field("rows", &self.rows())
            .field("zoom", &self.zoom)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}
