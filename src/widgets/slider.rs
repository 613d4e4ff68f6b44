//! Slider with a draggable handle.

use super::panel::{LIGHT_TINT, SHADE_TINT};
use crate::config::{Property, PERSIST};
use crate::error::{Result, UiError};
use crate::event::MouseButton;
use crate::geometry::{pick_box, Rect};
use crate::surface::Surface;
use crate::tree::{ControlCx, DragMode, DragMotion, DrawCx, Ui, Widget};

/// Width of the handle in pixels.
const HANDLE_WIDTH: i32 = 5;

type ChangeFn = dyn FnMut(&mut Ui, i32, i32);

/// A horizontal slider mapping its handle position onto a value range.
///
/// The track length is read from the control's bounds, so resizing the
/// control rescales the value under the handle. The handle position is persisted under `{name}_pos` for named
/// controls. [`Slider::on_change`] is told the new position and how far it
/// moved each time the handle is dragged.
pub struct Slider {
    pos: Property<i32>,
    range: (f64, f64),
    hint: (i32, i32),
    on_change: Option<Box<ChangeFn>>,
}

impl Slider {
    /// Dragging the handle.
    pub const HANDLE: DragMode = DragMode(1);

    /// A `width` x `height` slider over `min..=max`.
    pub fn new(width: i32, height: i32, min: f64, max: f64) -> Result<Self> {
        check_range(min, max)?;
        Ok(Self {
            pos: Property::new("pos", 0, PERSIST),
            range: (min, max),
            hint: (width, height),
            on_change: None,
        })
    }

    /// Call `f(ui, pos, delta)` whenever the handle is dragged.
    #[must_use]
    pub fn on_change(mut self, f: impl FnMut(&mut Ui, i32, i32) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Change the value range.
    pub fn set_range(&mut self, min: f64, max: f64) -> Result<()> {
        check_range(min, max)?;
        self.range = (min, max);
        Ok(())
    }

    /// Handle offset from the left end of the track.
    pub const fn pos(&self) -> i32 {
        *self.pos.peek()
    }

    /// Move the handle, clamped to the track.
    pub fn set_pos(&mut self, cx: &mut ControlCx<'_>, pos: i32) {
        let travel = travel(cx.bounds().width);
        self.pos.set(cx, pos.clamp(0, travel));
        cx.mark_dirty();
    }

    /// Value under the handle for the control's current width.
    pub fn value(&self, cx: &ControlCx<'_>) -> f64 {
        let (min, max) = self.range;
        let travel = travel(cx.bounds().width);
        if travel == 0 {
            return min;
        }
        (max - min) * f64::from(self.pos()) / f64::from(travel) + min
    }

    fn handle_rect(&self, bounds: Rect) -> Rect {
        Rect::new(bounds.x + 1 + self.pos(), bounds.y + 1, HANDLE_WIDTH, bounds.height - 2)
    }
}

const fn travel(width: i32) -> i32 {
    let t = width - HANDLE_WIDTH;
    if t > 0 {
        t
    } else {
        0
    }
}

fn check_range(min: f64, max: f64) -> Result<()> {
    if min > max {
        return Err(UiError::InvalidArgument(format!(
            "slider range {min}..{max} is inverted"
        )));
    }
    Ok(())
}

impl Widget for Slider {
    fn size_hint(&self) -> (i32, i32) {
        self.hint
    }

    fn registered(&mut self, cx: &mut ControlCx<'_>) {
        self.pos.load(cx);
    }

    fn drag_test(&self, bounds: Rect, x: i32, y: i32) -> Option<DragMode> {
        let h = self.handle_rect(bounds);
        pick_box(h.x, h.y, h.right(), h.bottom(), x, y).then_some(Self::HANDLE)
    }

    fn drag_move(&mut self, cx: &mut ControlCx<'_>, mode: DragMode, motion: DragMotion) {
        if mode != Self::HANDLE || motion.button != MouseButton::Left {
            return;
        }
        let old = self.pos();
        self.set_pos(cx, old + motion.rel_x);
        let new = self.pos();
        if let Some(f) = self.on_change.as_mut() {
            f(cx.ui, new, new - old);
        }
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        let b = cx.bounds;
        let color = cx.state.color();
        let (shade, light) = (color.darker(SHADE_TINT), color.brighter(LIGHT_TINT));

        target.fill_rect(b, color);
        target.draw_bevel(b, shade, light, true);
        target.draw_bevel(Rect::new(b.x + 3, b.y + 2, b.width - 6, 5), shade, light, false);

        let handle = self.handle_rect(b);
        target.fill_rect(handle, color);
        target.draw_bevel(handle, shade, light, true);
    }
}

impl std::fmt::Debug for Slider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slider")
            .field("pos", self.pos.peek())
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}
