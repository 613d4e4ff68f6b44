//! Movable tool panel.

use super::line::Line;
use super::panel::{draw_panel, PanelStyle};
use crate::error::{Result, UiError};
use crate::event::MouseButton;
use crate::surface::Surface;
use crate::tree::{ControlCx, DragMode, DrawCx, LayoutKind, NodeId, Widget};

const HANDLE_LENGTH: i32 = 24;
const HANDLE_THICKNESS: i32 = 6;

/// A raised panel holding a row of tools behind a grab handle.
///
/// The panel owns a horizontal sub-layout whose first item is the handle.
/// Dragging the handle with the left button moves the whole panel, and the
/// panel keeps itself `margin` pixels larger than its contents on every side.
#[derive(Debug, Clone)]
pub struct ToolPanel {
    spacing: i32,
    margin: i32,
    handle: Option<NodeId>,
}

impl ToolPanel {
    /// Default margin around the contents.
    pub const MARGIN: i32 = 2;

    /// A panel whose tools are `spacing` pixels apart.
    pub const fn new(spacing: i32) -> Self {
        Self {
            spacing,
            margin: Self::MARGIN,
            handle: None,
        }
    }

    /// Change the margin around the contents.
    #[must_use]
    pub const fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    /// The grab handle.
    pub const fn handle(&self) -> Option<NodeId> {
        self.handle
    }

    /// Append a tool.
    pub fn add_item(&mut self, cx: &mut ControlCx<'_>, item: NodeId) -> Result<()> {
        let layout = Self::contents(cx)?;
        cx.ui.add(layout, item)
    }

    /// Take a tool out again.
    pub fn remove_item(&mut self, cx: &mut ControlCx<'_>, item: NodeId) -> Result<()> {
        let layout = Self::contents(cx)?;
        cx.ui.remove(layout, item)
    }

    fn contents(cx: &ControlCx<'_>) -> Result<NodeId> {
        cx.children()
            .ok_or_else(|| UiError::InvalidArgument(format!("tool panel {:?} has no contents", cx.id)))
    }

    fn build(&mut self, cx: &mut ControlCx<'_>) -> Result<()> {
        let b = cx.bounds();
        let layout = cx.ui.layout_with_spacing(LayoutKind::Horizontal, self.spacing);
        let handle = cx.ui.spawn_at(
            b.x + self.margin,
            b.y + self.margin,
            Line::vertical(HANDLE_LENGTH)
                .with_thickness(HANDLE_THICKNESS)
                .with_style(PanelStyle::SUNKEN | PanelStyle::DARK),
        );
        cx.ui.add(layout, handle)?;

        let panel = cx.id;
        cx.ui.on_drag_move(handle, move |ui, _, mode, motion| {
            if mode != DragMode::BODY || motion.button != MouseButton::Left {
                return;
            }
            if let Some(r) = ui.bounds(panel) {
                ui.set_pos(panel, r.x + motion.rel_x, r.y + motion.rel_y);
            }
        })?;

        cx.attach_children(layout)?;
        cx.ui.fit_children(panel, Some(self.margin));
        self.handle = Some(handle);
        Ok(())
    }
}

impl Default for ToolPanel {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Widget for ToolPanel {
    fn size_hint(&self) -> (i32, i32) {
        (2 * self.margin, 2 * self.margin)
    }

    fn mount(&mut self, cx: &mut ControlCx<'_>) {
        if let Err(e) = self.build(cx) {
            tracing::warn!(id = ?cx.id, "can't build tool panel: {e}");
        }
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        draw_panel(target, cx.bounds, cx.state.color(), PanelStyle::empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Dispatcher;
    use crate::event::{InputEvent, Motion, MouseEvent};
    use crate::geometry::Rect;
    use crate::tree::Ui;
    use crate::widgets::Button;
    use std::time::Duration;

    fn panel_with_button(ui: &mut Ui) -> (NodeId, NodeId) {
        let panel = ui.spawn_at(10, 10, ToolPanel::new(2));
        ui.register(panel, Some("tools"), None).unwrap();
        let button = ui.spawn(Button::new("", 20, 20));
        ui.with_widget::<ToolPanel, _>(panel, |p, cx| p.add_item(cx, button))
            .unwrap()
            .unwrap();
        (panel, button)
    }

    #[test]
    fn test_panel_fits_handle() {
        let mut ui = Ui::new(200, 200);
        let panel = ui.spawn_at(10, 10, ToolPanel::new(2));
        assert_eq!(ui.bounds(panel), Some(Rect::new(10, 10, 10, 28)));

        let handle = ui.widget::<ToolPanel>(panel).unwrap().handle().unwrap();
        assert_eq!(ui.bounds(handle), Some(Rect::new(12, 12, 6, 24)));
    }

    #[test]
    fn test_panel_grows_with_items() {
        let mut ui = Ui::new(200, 200);
        let (panel, button) = panel_with_button(&mut ui);
        assert_eq!(ui.bounds(button), Some(Rect::new(20, 12, 20, 20)));
        assert_eq!(ui.bounds(panel), Some(Rect::new(10, 10, 32, 28)));

        ui.with_widget::<ToolPanel, _>(panel, |p, cx| p.remove_item(cx, button))
            .unwrap()
            .unwrap();
        assert_eq!(ui.bounds(panel), Some(Rect::new(10, 10, 10, 28)));
    }

    #[test]
    fn test_dragging_handle_moves_panel() {
        let mut ui = Ui::new(200, 200);
        let (panel, button) = panel_with_button(&mut ui);

        let mut dispatcher = Dispatcher::default();
        let events = [
            InputEvent::MouseDown(MouseEvent::new(14, 20, MouseButton::Left)),
            InputEvent::MouseMove(Motion::new(19, 23, 5, 3)),
            InputEvent::MouseUp(MouseEvent::new(19, 23, MouseButton::Left)),
        ];
        for event in &events {
            dispatcher.handle(&mut ui, event, Duration::ZERO);
        }

        assert_eq!(ui.bounds(panel), Some(Rect::new(15, 13, 32, 28)));
        assert_eq!(ui.bounds(button), Some(Rect::new(25, 15, 20, 20)));
    }

    #[test]
    fn test_right_drag_leaves_panel() {
        let mut ui = Ui::new(200, 200);
        let (panel, _) = panel_with_button(&mut ui);

        let mut dispatcher = Dispatcher::default();
        dispatcher.handle(&mut ui, &InputEvent::MouseDown(MouseEvent::new(14, 20, MouseButton::Right)), Duration::ZERO);
        dispatcher.handle(&mut ui, &InputEvent::MouseMove(Motion::new(19, 23, 5, 3)), Duration::ZERO);
        assert_eq!(ui.bounds(panel), Some(Rect::new(10, 10, 32, 28)));
    }
}
