//! The widget contract and the contexts widgets are called with.

use super::control::ControlState;
use super::{NodeId, Ui};
use crate::event::{Key, MouseButton};
use crate::geometry::Rect;
use crate::surface::{Glyphs, Surface};
use std::any::Any;

/// Identifies which affordance of a widget is being dragged.
///
/// Widgets define their own modes as associated constants; the engine only
/// stores and hands them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DragMode(pub u16);

impl DragMode {
    /// Dragging the control's whole body.
    pub const BODY: Self = Self(999);
}

/// A qualifying mouse-down, or the release of a pushed button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    /// Pointer X.
    pub x: i32,
    /// Pointer Y.
    pub y: i32,
    /// Button involved.
    pub button: MouseButton,
}

/// Pointer motion delivered to a control being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragMotion {
    /// Absolute pointer X.
    pub x: i32,
    /// Absolute pointer Y.
    pub y: i32,
    /// X delta since the previous motion event.
    pub rel_x: i32,
    /// Y delta since the previous motion event.
    pub rel_y: i32,
    /// Button that started the drag.
    pub button: MouseButton,
}

/// Downcasting support for boxed widgets.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Borrow as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A control's behavior: hit-testing, input handling and drawing.
///
/// Geometry, visibility, selection and the dirty flag live in the engine and
/// are reached through the context argument. Every input method has a
/// default, so a widget only overrides what it reacts to.
pub trait Widget: AsAny {
    /// Initial size when spawned.
    fn size_hint(&self) -> (i32, i32) {
        (8, 8)
    }

    /// Called once, right after the control is created.
    fn mount(&mut self, _cx: &mut ControlCx<'_>) {}

    /// Called after the control was registered, once its name is known.
    ///
    /// Persisted properties pick up their stored values here.
    fn registered(&mut self, _cx: &mut ControlCx<'_>) {}

    /// Button-like widgets get pushed on mouse-down and clicked on release.
    fn is_button(&self) -> bool {
        false
    }

    /// Whether a click at `(x, y)` hits the control.
    fn click_test(&self, bounds: Rect, x: i32, y: i32) -> bool {
        bounds.contains(x, y)
    }

    /// Which drag affordance, if any, is under `(x, y)`.
    fn drag_test(&self, bounds: Rect, x: i32, y: i32) -> Option<DragMode> {
        bounds.contains(x, y).then_some(DragMode::BODY)
    }

    /// A click landed on the control. Returning `false` vetoes selection.
    fn clicked(&mut self, _cx: &mut ControlCx<'_>, _click: Click) -> bool {
        true
    }

    /// A double-click landed on the control. Returning `false` vetoes selection.
    fn double_clicked(&mut self, _cx: &mut ControlCx<'_>, _click: Click) -> bool {
        true
    }

    /// The pointer moved while this control is dragged in `mode`.
    fn drag_move(&mut self, _cx: &mut ControlCx<'_>, _mode: DragMode, _motion: DragMotion) {}

    /// A key was pressed while this control is selected.
    fn key_pressed(&mut self, _cx: &mut ControlCx<'_>, _key: Key) {}

    /// Pressed-state feedback for button-like widgets.
    fn set_pushed(&mut self, _cx: &mut ControlCx<'_>, _pushed: bool) {}

    /// The control gained or lost the selection.
    fn selection_changed(&mut self, _cx: &mut ControlCx<'_>, _selected: bool) {}

    /// The canvas changed size.
    fn canvas_resized(&mut self, _cx: &mut ControlCx<'_>, _width: i32, _height: i32) {}

    /// Draw onto `target`. Rebuild any cached image first when `cx.state.is_dirty()`.
    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface);
}

/// Mutable access to the engine on behalf of one control.
pub struct ControlCx<'a> {
    /// The engine.
    pub ui: &'a mut Ui,
    /// The control being called.
    pub id: NodeId,
}

impl ControlCx<'_> {
    /// The control's bounds.
    pub fn bounds(&self) -> Rect {
        self.ui.bounds(self.id).unwrap_or(Rect::ZERO)
    }

    /// The control's shared state.
    pub fn state(&self) -> Option<&ControlState> {
        self.ui.state(self.id)
    }

    /// Mark the cached visual representation stale.
    pub fn mark_dirty(&mut self) {
        self.ui.mark_dirty(self.id);
    }

    /// Move the control.
    pub fn set_pos(&mut self, x: i32, y: i32) {
        self.ui.set_pos(self.id, x, y);
    }

    /// Resize the control.
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.ui.set_size(self.id, width, height);
    }

    /// Allow or forbid selection by clicking.
    pub fn set_selectable(&mut self, selectable: bool) {
        self.ui.set_selectable(self.id, selectable);
    }

    /// Enable or disable the drop shadow.
    pub fn set_drop_shadow(&mut self, drop: bool) {
        self.ui.set_drop_shadow(self.id, drop);
    }

    /// Attach `layout` as this control's sub-layout.
    pub fn attach_children(&mut self, layout: NodeId) -> crate::error::Result<()> {
        self.ui.attach_children(self.id, layout)
    }

    /// The attached sub-layout.
    pub fn children(&self) -> Option<NodeId> {
        self.ui.children(self.id)
    }
}

/// What a widget sees while drawing.
///
/// The widget being drawn is out of the tree for the duration of the call,
/// so `ui` can be used to look at other nodes, such as the controls of the
/// widget's own sub-layout.
pub struct DrawCx<'a> {
    /// The engine, read-only.
    pub ui: &'a Ui,
    /// The control being drawn.
    pub id: NodeId,
    /// Current bounds.
    pub bounds: Rect,
    /// Shared state, including the dirty flag.
    pub state: &'a ControlState,
    /// Font used for text.
    pub font: &'a dyn Glyphs,
    /// Animation heartbeat counter.
    pub anim: u64,
}
