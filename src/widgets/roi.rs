//! Region of interest: a dashed rectangle resized by its corners and moved
//! by its edges.

use super::text::{self, TextStyle};
use crate::event::MouseButton;
use crate::geometry::{pick_point, Rect};
use crate::surface::{Blend, Rgb, Surface};
use crate::tree::{ControlCx, DragMode, DragMotion, DrawCx, Widget};

/// How close to a corner or edge the pointer must be to grab it.
const GRAB: i32 = 3;
const DASH: i32 = 2;
const DASH_STEP: usize = 4;
const OUTLINE: Rgb = Rgb::new(245, 233, 246);
const KNOB: Rgb = Rgb::new(245, 234, 255);

/// A selection rectangle on the canvas.
///
/// Dragging a corner resizes the rectangle from that corner; dragging an
/// edge moves it. Width and height never go below one pixel. Geometry is
/// persisted as `{name}_x`, `{name}_y`, `{name}_width` and `{name}_height`
/// once the control is registered with a name.
#[derive(Debug, Clone)]
pub struct Roi {
    size: (i32, i32),
    caption: Option<String>,
    outline: Option<Surface>,
}

impl Roi {
    /// Top-left corner.
    pub const V1: DragMode = DragMode(1);
    /// Top-right corner.
    pub const V2: DragMode = DragMode(2);
    /// Bottom-right corner.
    pub const V3: DragMode = DragMode(3);
    /// Bottom-left corner.
    pub const V4: DragMode = DragMode(4);
    /// Top edge.
    pub const E1: DragMode = DragMode(5);
    /// Right edge.
    pub const E2: DragMode = DragMode(6);
    /// Bottom edge.
    pub const E3: DragMode = DragMode(7);
    /// Left edge.
    pub const E4: DragMode = DragMode(8);

    /// A `width` x `height` region.
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            size: (width, height),
            caption: None,
            outline: None,
        }
    }

    /// Text drawn inside the top-left corner. Defaults to the control name.
    pub fn set_caption(&mut self, cx: &mut ControlCx<'_>, caption: impl Into<String>) {
        self.caption = Some(caption.into());
        cx.mark_dirty();
    }
}

/// The rectangle after dragging `mode` by `motion`, clamped to at least one
/// pixel in each direction.
fn dragged(r: Rect, mode: DragMode, m: DragMotion) -> Rect {
    let (mut x, mut y, mut w, mut h) = (r.x, r.y, r.width, r.height);
    match mode {
        Roi::V1 => {
            x = m.x;
            y = m.y;
            w -= m.rel_x;
            h -= m.rel_y;
        }
        Roi::V2 => {
            w += m.rel_x;
            y = m.y;
            h -= m.rel_y;
        }
        Roi::V3 => {
            w += m.rel_x;
            h += m.rel_y;
        }
        Roi::V4 => {
            x = m.x;
            w -= m.rel_x;
            h += m.rel_y;
        }
        Roi::E1 | Roi::E2 | Roi::E3 | Roi::E4 => {
            x += m.rel_x;
            y += m.rel_y;
        }
        _ => {}
    }
    if w <= 0 {
        x += w;
        w = 1;
    }
    if h <= 0 {
        y += h;
        h = 1;
    }
    Rect::new(x, y, w, h)
}

fn on_horizontal_edge(x: i32, y: i32, length: i32, px: i32, py: i32) -> bool {
    let dx = px - x;
    (0..=length).contains(&dx) && (py - y).abs() <= GRAB
}

fn on_vertical_edge(x: i32, y: i32, length: i32, px: i32, py: i32) -> bool {
    let dy = py - y;
    (0..=length).contains(&dy) && (px - x).abs() <= GRAB
}

impl Widget for Roi {
    fn size_hint(&self) -> (i32, i32) {
        self.size
    }

    fn mount(&mut self, cx: &mut ControlCx<'_>) {
        cx.set_drop_shadow(false);
        cx.ui.set_persist_geometry(cx.id, true);
    }

    fn registered(&mut self, cx: &mut ControlCx<'_>) {
        cx.mark_dirty();
    }

    fn drag_test(&self, b: Rect, x: i32, y: i32) -> Option<DragMode> {
        let corners = [
            (b.x, b.y, Self::V1),
            (b.right(), b.y, Self::V2),
            (b.right(), b.bottom(), Self::V3),
            (b.x, b.bottom(), Self::V4),
        ];
        if let Some(&(_, _, mode)) = corners.iter().find(|(px, py, _)| pick_point(*px, *py, x, y, GRAB)) {
            return Some(mode);
        }
        if on_horizontal_edge(b.x, b.y, b.width, x, y) {
            Some(Self::E1)
        } else if on_horizontal_edge(b.x, b.bottom(), b.width, x, y) {
            Some(Self::E3)
        } else if on_vertical_edge(b.x, b.y, b.height, x, y) {
            Some(Self::E4)
        } else if on_vertical_edge(b.right(), b.y, b.height, x, y) {
            Some(Self::E2)
        } else {
            None
        }
    }

    fn drag_move(&mut self, cx: &mut ControlCx<'_>, mode: DragMode, motion: DragMotion) {
        if motion.button != MouseButton::Left {
            return;
        }
        let next = dragged(cx.bounds(), mode, motion);
        cx.set_pos(next.x, next.y);
        cx.set_size(next.width, next.height);
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        let b = cx.bounds;
        if cx.state.is_dirty() || self.outline.is_none() {
            let mut outline = Surface::new(b.width, b.height);
            let (w, h) = (b.width - 1, b.height - 1);
            for x in (0..b.width).step_by(DASH_STEP) {
                outline.line(x, 0, x + DASH, 0, OUTLINE);
                outline.line(x, h, x + DASH, h, OUTLINE);
            }
            for y in (0..b.height).step_by(DASH_STEP) {
                outline.line(0, y, 0, y + DASH, OUTLINE);
                outline.line(w, y, w, y + DASH, OUTLINE);
            }
            let caption = self.caption.as_deref().or_else(|| cx.state.name());
            if let Some(caption) = caption {
                let image = text::render(cx.font, caption, Rgb::WHITE, TextStyle::default());
                outline.blit(&image, 5, 5, Blend::ColorKey(Rgb::BLACK));
            }
            self.outline = Some(outline);
        }
        if let Some(outline) = &self.outline {
            target.blit(outline, b.x, b.y, Blend::Add);
        }
        for (x, y) in [
            (b.x - 1, b.y - 1),
            (b.right() - 2, b.y - 1),
            (b.right() - 2, b.bottom() - 2),
            (b.x - 1, b.bottom() - 2),
        ] {
            target.draw_rect(Rect::new(x, y, 4, 4), KNOB);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigStore, MemoryConfig};
    use crate::tree::Ui;
    use serde_json::json;

    fn motion(x: i32, y: i32, rel_x: i32, rel_y: i32) -> DragMotion {
        DragMotion {
            x,
            y,
            rel_x,
            rel_y,
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_drag_test_corners_then_edges() {
        let roi = Roi::new(40, 30);
        let b = Rect::new(10, 10, 40, 30);
        assert_eq!(roi.drag_test(b, 11, 9), Some(Roi::V1));
        assert_eq!(roi.drag_test(b, 50, 10), Some(Roi::V2));
        assert_eq!(roi.drag_test(b, 49, 41), Some(Roi::V3));
        assert_eq!(roi.drag_test(b, 10, 40), Some(Roi::V4));
        assert_eq!(roi.drag_test(b, 25, 12), Some(Roi::E1));
        assert_eq!(roi.drag_test(b, 25, 40), Some(Roi::E3));
        assert_eq!(roi.drag_test(b, 9, 25), Some(Roi::E4));
        assert_eq!(roi.drag_test(b, 51, 25), Some(Roi::E2));
        assert_eq!(roi.drag_test(b, 25, 25), None);
    }

    #[test]
    fn test_corner_drag_resizes() {
        let r = Rect::new(10, 10, 40, 30);
        assert_eq!(dragged(r, Roi::V3, motion(55, 45, 5, 5)), Rect::new(10, 10, 45, 35));
        assert_eq!(dragged(r, Roi::V1, motion(12, 14, 2, 4)), Rect::new(12, 14, 38, 26));
        assert_eq!(dragged(r, Roi::V2, motion(52, 8, 2, -2)), Rect::new(10, 8, 42, 32));
        assert_eq!(dragged(r, Roi::V4, motion(7, 42, -3, 2)), Rect::new(7, 10, 43, 32));
    }

    #[test]
    fn test_edge_drag_moves() {
        let r = Rect::new(10, 10, 40, 30);
        assert_eq!(dragged(r, Roi::E2, motion(0, 0, -4, 6)), Rect::new(6, 16, 40, 30));
    }

    #[test]
    fn test_collapse_clamps_to_one_pixel() {
        let r = Rect::new(10, 10, 4, 4);
        let out = dragged(r, Roi::V3, motion(0, 0, -10, -6));
        assert_eq!(out, Rect::new(4, 8, 1, 1));
    }

    #[test]
    fn test_geometry_persisted() {
        let mut ui = Ui::new(200, 200);
        let mut store = MemoryConfig::new();
        store.set("crop_x", json!(20));
        store.set("crop_width", json!(64));
        ui.set_config_store(store);

        let id = ui.spawn(Roi::new(32, 32));
        ui.register(id, Some("crop"), None).unwrap();
        assert_eq!(ui.bounds(id), Some(Rect::new(20, 0, 64, 32)));

        ui.fire_drag_move(id, Roi::V3, motion(0, 0, 6, 2));
        assert_eq!(ui.bounds(id), Some(Rect::new(20, 0, 70, 34)));
        assert_eq!(ui.stored_value(id, "width"), Some(json!(70)));
        assert_eq!(ui.stored_value(id, "height"), Some(json!(34)));
    }

    #[test]
    fn test_right_button_ignored() {
        let mut ui = Ui::new(200, 200);
        let id = ui.spawn_at(5, 5, Roi::new(10, 10));
        let mut m = motion(0, 0, 5, 5);
        m.button = MouseButton::Right;
        ui.fire_drag_move(id, Roi::V3, m);
        assert_eq!(ui.bounds(id), Some(Rect::new(5, 5, 10, 10)));
    }
}
