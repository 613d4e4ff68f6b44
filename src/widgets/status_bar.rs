//! Status bar docked to the bottom of the canvas.

use super::panel::{draw_panel, PanelStyle};
use crate::error::{Result, UiError};
use crate::geometry::Rect;
use crate::surface::Surface;
use crate::tree::{ControlCx, DrawCx, LayoutKind, NodeId, Widget};

/// Horizontal padding between an item and its sunken cell.
const CELL_PAD_X: i32 = 4;
/// Vertical padding between an item and its sunken cell.
const CELL_PAD_Y: i32 = 2;

/// A full-width bar along the bottom edge of the canvas.
///
/// Items sit in sunken cells, left to right, separated by spacers. The bar
/// is as tall as its tallest item plus `margin` above and below, spans the
/// whole canvas width and follows the canvas when it is resized.
#[derive(Debug, Clone)]
pub struct StatusBar {
    margin: i32,
    spacing: i32,
}

impl StatusBar {
    /// Default margin.
    pub const MARGIN: i32 = 5;

    /// An empty bar.
    pub const fn new() -> Self {
        Self {
            margin: Self::MARGIN,
            spacing: 0,
        }
    }

    /// Change the margin around the items.
    #[must_use]
    pub const fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    /// Extra spacing between layout items, on top of the cell separators.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Append an item in a new cell.
    pub fn add_item(&mut self, cx: &mut ControlCx<'_>, item: NodeId) -> Result<()> {
        let layout = Self::contents(cx)?;
        let gap = if cx.ui.items(layout).is_empty() {
            self.margin + CELL_PAD_X
        } else {
            self.margin * 2 + CELL_PAD_X * 2
        };
        let spacer = cx.ui.spacer(gap);
        cx.ui.add(layout, spacer)?;
        cx.ui.add(layout, item)?;
        self.dock(cx);
        Ok(())
    }

    /// Take an item out. Its separator stays.
    pub fn remove_item(&mut self, cx: &mut ControlCx<'_>, item: NodeId) -> Result<()> {
        let layout = Self::contents(cx)?;
        cx.ui.remove(layout, item)?;
        self.dock(cx);
        Ok(())
    }

    fn contents(cx: &ControlCx<'_>) -> Result<NodeId> {
        cx.children()
            .ok_or_else(|| UiError::InvalidArgument(format!("status bar {:?} has no contents", cx.id)))
    }

    /// Stretch across the canvas and sit on its bottom edge.
    fn dock(&self, cx: &mut ControlCx<'_>) {
        let (width, canvas_height) = cx.ui.canvas_size();
        let layout = cx.children();
        let content = layout.and_then(|l| cx.ui.bounds(l)).map_or(0, |r| r.height);
        let height = content + 2 * self.margin;
        let y = canvas_height - height;

        cx.set_size(width, height);
        cx.set_pos(0, y);
        if let Some(layout) = layout {
            cx.ui.set_pos(layout, 0, y + self.margin);
        }
    }

    fn build(&mut self, cx: &mut ControlCx<'_>) -> Result<()> {
        let layout = cx.ui.layout_with_spacing(LayoutKind::Horizontal, self.spacing);
        cx.attach_children(layout)?;
        self.dock(cx);
        Ok(())
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar {
    fn mount(&mut self, cx: &mut ControlCx<'_>) {
        cx.set_drop_shadow(false);
        if let Err(e) = self.build(cx) {
            tracing::warn!(id = ?cx.id, "can't build status bar: {e}");
        }
    }

    fn canvas_resized(&mut self, cx: &mut ControlCx<'_>, _width: i32, _height: i32) {
        self.dock(cx);
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        let color = cx.state.color();
        draw_panel(target, cx.bounds, color, PanelStyle::empty());

        let Some(layout) = cx.ui.children(cx.id) else {
            return;
        };
        for &item in cx.ui.items(layout) {
            if !cx.ui.is_control(item) {
                continue;
            }
            let Some(r) = cx.ui.bounds(item) else {
                continue;
            };
            let cell = Rect::new(
                r.x - CELL_PAD_X,
                r.y - CELL_PAD_Y,
                r.width + 2 * CELL_PAD_X,
                r.height + 2 * CELL_PAD_Y,
            );
            draw_panel(target, cell, color.darker(0.1), PanelStyle::SUNKEN);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Rgb;
    use crate::tree::Ui;
    use crate::widgets::ColorCell;

    fn bar_with_cells(ui: &mut Ui) -> (NodeId, NodeId, NodeId) {
        let bar = ui.spawn(StatusBar::new());
        ui.register(bar, Some("status"), None).unwrap();
        let a = ui.spawn(ColorCell::new(10, 8, Rgb::WHITE));
        let b = ui.spawn(ColorCell::new(12, 8, Rgb::WHITE));
        for item in [a, b] {
            ui.with_widget::<StatusBar, _>(bar, |s, cx| s.add_item(cx, item))
                .unwrap()
                .unwrap();
        }
        (bar, a, b)
    }

    #[test]
    fn test_empty_bar_docks_to_bottom() {
        let mut ui = Ui::new(200, 100);
        let bar = ui.spawn(StatusBar::new());
        assert_eq!(ui.bounds(bar), Some(Rect::new(0, 90, 200, 10)));
        assert!(!ui.state(bar).unwrap().drop_shadow());
    }

    #[test]
    fn test_items_are_spaced_into_cells() {
        let mut ui = Ui::new(200, 100);
        let (bar, a, b) = bar_with_cells(&mut ui);

        assert_eq!(ui.bounds(bar), Some(Rect::new(0, 82, 200, 18)));
        assert_eq!(ui.bounds(a), Some(Rect::new(9, 87, 10, 8)));
        assert_eq!(ui.bounds(b), Some(Rect::new(37, 87, 12, 8)));
    }

    #[test]
    fn test_bar_follows_canvas_resize() {
        let mut ui = Ui::new(200, 100);
        let (bar, a, _) = bar_with_cells(&mut ui);

        ui.set_canvas_size(300, 150);
        assert_eq!(ui.bounds(bar), Some(Rect::new(0, 132, 300, 18)));
        assert_eq!(ui.bounds(a), Some(Rect::new(9, 137, 10, 8)));
    }

    #[test]
    fn test_cells_are_drawn_sunken() {
        let mut ui = Ui::new(200, 100);
        bar_with_cells(&mut ui);

        let mut target = Surface::new(200, 100);
        ui.draw(&mut target);
        assert_eq!(target.get(2, 85), Some(Rgb::FOREGROUND));
        assert_eq!(target.get(7, 88), Some(Rgb::FOREGROUND.darker(0.1)));
        assert_eq!(target.get(12, 90), Some(Rgb::WHITE));
    }
}
