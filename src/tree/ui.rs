use super::control::{Callbacks, ClickFn, Control, ControlFlags, ControlState, Slot};
use super::iter::Controls;
use super::layout::{self, GridPos, ItemInfo, LayoutKind, LayoutNode};
use super::widget::{AsAny, Click, ControlCx, DragMode, DragMotion, DrawCx, Widget};
use super::{Body, Node, NodeId};
use crate::config::{config_key, ConfigStore};
use crate::error::{Result, UiError};
use crate::event::{Key, Timers};
use crate::geometry::Rect;
use crate::surface::{BlockFont, Glyphs, Rgb, Surface};
use serde::Serialize;
use serde_json::Value;
use slotmap::SlotMap;

const GEOMETRY_KEYS: [&str; 4] = ["x", "y", "width", "height"];

/// The engine: node arena, selection, timers and configuration binding.
///
/// All structural and geometric mutation goes through `Ui`, which re-flows
/// the affected layouts eagerly. Geometry setters called with a handle that
/// no longer resolves are silent no-ops.
pub struct Ui {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    selection: Option<NodeId>,
    timers: Timers,
    store: Option<Box<dyn ConfigStore>>,
    font: Box<dyn Glyphs>,
    canvas: (i32, i32),
    gui_hidden: bool,
    quit_requested: bool,
    anim_timer: u64,
}

impl Ui {
    /// Create an engine for a canvas of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root_layout = LayoutNode::new(LayoutKind::Free, 0);
        root_layout.placed = true;
        let root = nodes.insert(Node {
            rect: Rect::ZERO,
            owner: None,
            body: Body::Layout(root_layout),
        });
        Self {
            nodes,
            root,
            selection: None,
            timers: Timers::new(),
            store: None,
            font: Box::new(BlockFont::DEFAULT),
            canvas: (width, height),
            gui_hidden: false,
            quit_requested: false,
            anim_timer: 0,
        }
    }

    /// The layout controls are registered into by default.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, including the root layout.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root layout exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Whether `id` still resolves.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether `id` is a live layout.
    pub fn is_layout(&self, id: NodeId) -> bool {
        self.layout_node(id).is_some()
    }

    /// Whether `id` is a live control.
    pub fn is_control(&self, id: NodeId) -> bool {
        self.control(id).is_some()
    }

    // ----- creation -------------------------------------------------------

    /// Create a control driven by `widget`, sized by its size hint.
    ///
    /// The control is not part of any layout until it is added or registered.
    pub fn spawn<W: Widget>(&mut self, widget: W) -> NodeId {
        let (width, height) = widget.size_hint();
        let id = self.nodes.insert(Node {
            rect: Rect::new(0, 0, width, height),
            owner: None,
            body: Body::Control(Control::new(Box::new(widget))),
        });
        self.call_widget(id, |widget, cx| widget.mount(cx));
        tracing::debug!(?id, "control spawned");
        id
    }

    /// Create a control and move it to `(x, y)`.
    pub fn spawn_at<W: Widget>(&mut self, x: i32, y: i32, widget: W) -> NodeId {
        let id = self.spawn(widget);
        self.set_pos(id, x, y);
        id
    }

    /// Create an empty layout with the kind's default spacing.
    ///
    /// Its position is undefined until it gets its first item or is moved.
    pub fn layout(&mut self, kind: LayoutKind) -> NodeId {
        self.layout_with_spacing(kind, kind.default_spacing())
    }

    /// Create an empty layout with explicit spacing.
    pub fn layout_with_spacing(&mut self, kind: LayoutKind, spacing: i32) -> NodeId {
        let id = self.nodes.insert(Node {
            rect: Rect::ZERO,
            owner: None,
            body: Body::Layout(LayoutNode::new(kind, spacing)),
        });
        tracing::debug!(?id, ?kind, spacing, "layout created");
        id
    }

    /// Create a spacer reserving `size` pixels in its container.
    pub fn spacer(&mut self, size: i32) -> NodeId {
        self.layout_with_spacing(LayoutKind::Spacer, size)
    }

    /// Name a node and put it into a layout.
    ///
    /// Without an explicit layout, a node that has no owner yet is added to
    /// the root layout. The name is stamped onto controls and is what their
    /// configuration keys are derived from; persisted geometry is loaded here.
    pub fn register(&mut self, id: NodeId, name: Option<&str>, layout: Option<NodeId>) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(UiError::StaleNode(id))?;
        if let (Some(name), Body::Control(control)) = (name, &mut node.body) {
            control.state.name = Some(name.to_string());
        }
        let is_sub_layout = matches!(&node.body, Body::Layout(l) if l.parent.is_some());

        match layout {
            Some(layout) if self.owner(id) != Some(layout) => self.add(layout, id)?,
            None if self.owner(id).is_none() && !is_sub_layout => self.add(self.root, id)?,
            _ => {}
        }
        self.load_geometry(id);
        self.call_widget(id, |widget, cx| widget.registered(cx));
        tracing::debug!(?id, name, "registered");
        Ok(())
    }

    /// Find a control by its registered name.
    pub fn named(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find_map(|(id, node)| match &node.body {
            Body::Control(control) if control.state.name() == Some(name) => Some(id),
            _ => None,
        })
    }

    // ----- structure ------------------------------------------------------

    /// Append `child` to `layout`.
    ///
    /// A child owned by another layout is removed from it first. An unplaced
    /// layout snaps to the position of the first child that has one, and so
    /// do the unplaced layouts above it. Adding to a grid fills
    /// the first free cell in row-major order.
    pub fn add(&mut self, layout: NodeId, child: NodeId) -> Result<()> {
        self.check_insert(layout, child)?;
        let target = self.require_layout(layout)?;
        let cell = match target.kind {
            LayoutKind::Grid { .. } => {
                let index = target.cells.iter().position(Option::is_none);
                Some(index.ok_or_else(|| UiError::InvalidArgument(format!("grid {layout:?} has no free cell")))?)
            }
            _ => None,
        };
        self.insert(layout, child, cell);
        Ok(())
    }

    /// Put `child` into a specific cell of a grid layout.
    pub fn add_to_grid(&mut self, grid: NodeId, child: NodeId, pos: GridPos) -> Result<()> {
        self.check_insert(grid, child)?;
        let target = self.require_layout(grid)?;
        let LayoutKind::Grid { cols, rows, .. } = target.kind else {
            return Err(UiError::InvalidArgument(format!("{grid:?} is not a grid layout")));
        };
        let index = target.cell_index(pos).ok_or(UiError::CellOutOfBounds {
            col: pos.col,
            row: pos.row,
            cols,
            rows,
        })?;
        if target.cells[index].is_some() {
            return Err(UiError::CellOccupied {
                col: pos.col,
                row: pos.row,
            });
        }
        self.insert(grid, child, Some(index));
        Ok(())
    }

    /// Take `child` out of `layout`. The child stays alive, unowned.
    pub fn remove(&mut self, layout: NodeId, child: NodeId) -> Result<()> {
        if !self.require_layout(layout)?.items.contains(&child) {
            return Err(UiError::NotPresent { layout, child });
        }
        self.detach(layout, child);
        Ok(())
    }

    /// Destroy a node together with everything it owns.
    ///
    /// Clears the selection if it was part of the destroyed subtree. Handles
    /// to destroyed nodes stop resolving.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(UiError::InvalidArgument("the root layout can't be destroyed".into()));
        }
        if !self.contains(id) {
            return Err(UiError::StaleNode(id));
        }
        if let Some(owner) = self.owner(id) {
            self.detach(owner, id);
        }
        if let Some(parent) = self.layout_node(id).and_then(|l| l.parent) {
            if let Some(control) = self.control_mut(parent) {
                control.children = None;
            }
        }

        let mut doomed = vec![id];
        while let Some(next) = doomed.pop() {
            let Some(node) = self.nodes.remove(next) else {
                continue;
            };
            if self.selection == Some(next) {
                self.selection = None;
            }
            match node.body {
                Body::Layout(l) => doomed.extend(l.items),
                Body::Control(c) => doomed.extend(c.children),
            }
        }
        tracing::debug!(?id, "destroyed");
        Ok(())
    }

    /// The layout `id` is an item of.
    pub fn owner(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.owner
    }

    /// Items of a layout, in insertion order.
    pub fn items(&self, layout: NodeId) -> &[NodeId] {
        self.layout_node(layout).map_or(&[], |l| l.items.as_slice())
    }

    /// The item in a grid cell.
    pub fn grid_item(&self, grid: NodeId, pos: GridPos) -> Option<NodeId> {
        let l = self.layout_node(grid)?;
        l.cells.get(l.cell_index(pos)?).copied().flatten()
    }

    /// Spacing of a layout.
    pub fn spacing(&self, layout: NodeId) -> Option<i32> {
        self.layout_node(layout).map(|l| l.spacing)
    }

    /// Make `layout` the sub-layout of `control`.
    ///
    /// Its controls are iterated right after the control while the control
    /// is visible, and move with it.
    pub fn attach_children(&mut self, control: NodeId, layout: NodeId) -> Result<()> {
        self.require_control(control)?;
        let sub = self.require_layout(layout)?;
        if sub.parent.is_some() || self.owner(layout).is_some() {
            return Err(UiError::InvalidArgument(format!("{layout:?} already has an owner")));
        }
        let mut cursor = Some(control);
        while let Some(id) = cursor {
            if id == layout {
                return Err(UiError::Cycle { layout, child: control });
            }
            cursor = self.container(id);
        }

        let previous = self.control_mut(control).and_then(|c| c.children.replace(layout));
        if let Some(previous) = previous.and_then(|id| self.layout_node_mut(id)) {
            previous.parent = None;
        }
        if let Some(sub) = self.layout_node_mut(layout) {
            sub.parent = Some(control);
        }
        tracing::debug!(?control, ?layout, "sub-layout attached");
        Ok(())
    }

    /// Sub-layout of a control.
    pub fn children(&self, control: NodeId) -> Option<NodeId> {
        self.control(control)?.children
    }

    /// Make a control's size follow its sub-layout, plus `margin` on every
    /// side, or stop doing so with `None`.
    pub fn fit_children(&mut self, control: NodeId, margin: Option<i32>) {
        let Some(c) = self.control_mut(control) else {
            return;
        };
        c.fit_margin = margin;
        if let (Some(margin), Some(sub)) = (margin, c.children) {
            if let Some(rect) = self.bounds(sub) {
                self.set_size(control, rect.width + 2 * margin, rect.height + 2 * margin);
            }
        }
    }

    /// Iterate the controls reachable from `layout`; see [`Controls`].
    pub fn controls(&self, layout: NodeId) -> Controls<'_> {
        Controls::new(&self.nodes, layout)
    }

    // ----- geometry -------------------------------------------------------

    /// Bounds of a node. An unplaced layout reports a zero origin.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).map(|node| node.rect)
    }

    /// Position of a node, or `None` for a layout that hasn't been placed.
    pub fn origin(&self, id: NodeId) -> Option<(i32, i32)> {
        let node = self.nodes.get(id)?;
        match &node.body {
            Body::Layout(l) if !l.placed => None,
            _ => Some((node.rect.x, node.rect.y)),
        }
    }

    /// Move a node. Layouts carry their items along; spacers ignore this.
    pub fn set_pos(&mut self, id: NodeId, x: i32, y: i32) {
        if !self.contains(id) {
            tracing::trace!(?id, "set_pos on stale node");
            return;
        }
        self.move_raw(id, x, y);
        let top = match self.origin(id) {
            Some(_) => self.place_owners(id, x, y),
            None => id,
        };
        self.geometry_changed(id);
        if top != id {
            self.reflow(top);
        }
    }

    /// Set the left edge.
    pub fn set_x(&mut self, id: NodeId, x: i32) {
        if let Some(rect) = self.bounds(id) {
            self.set_pos(id, x, rect.y);
        }
    }

    /// Set the top edge.
    pub fn set_y(&mut self, id: NodeId, y: i32) {
        if let Some(rect) = self.bounds(id) {
            self.set_pos(id, rect.x, y);
        }
    }

    /// Move so that the right edge lands on `right`, keeping the width.
    pub fn set_right(&mut self, id: NodeId, right: i32) {
        if let Some(rect) = self.bounds(id) {
            self.set_pos(id, right - rect.width, rect.y);
        }
    }

    /// Move so that the bottom edge lands on `bottom`, keeping the height.
    pub fn set_bottom(&mut self, id: NodeId, bottom: i32) {
        if let Some(rect) = self.bounds(id) {
            self.set_pos(id, rect.x, bottom - rect.height);
        }
    }

    /// Resize a control and re-flow its owner.
    ///
    /// Layout sizes are derived from their items, so this is ignored for
    /// layouts.
    pub fn set_size(&mut self, id: NodeId, width: i32, height: i32) {
        if self.control(id).is_none() {
            tracing::trace!(?id, "set_size on a layout or stale node");
            return;
        }
        if self.resize_raw(id, width, height) {
            self.geometry_changed(id);
        }
    }

    /// Set a control's width.
    pub fn set_width(&mut self, id: NodeId, width: i32) {
        if let Some(rect) = self.bounds(id) {
            self.set_size(id, width, rect.height);
        }
    }

    /// Set a control's height.
    pub fn set_height(&mut self, id: NodeId, height: i32) {
        if let Some(rect) = self.bounds(id) {
            self.set_size(id, rect.width, height);
        }
    }

    /// Re-flow a layout, then its containers for as long as sizes change.
    pub fn reflow(&mut self, layout: NodeId) {
        let mut cursor = Some(layout);
        while let Some(id) = cursor {
            if !self.reflow_one(id) {
                break;
            }
            cursor = self.propagate_from(id);
        }
    }

    // ----- control state --------------------------------------------------

    /// Shared state of a control.
    pub fn state(&self, id: NodeId) -> Option<&ControlState> {
        self.control(id).map(|c| &c.state)
    }

    /// Set a control's primary color.
    pub fn set_color(&mut self, id: NodeId, color: Rgb) {
        if let Some(c) = self.control_mut(id) {
            c.state.color = color;
            c.state.flags.insert(ControlFlags::DIRTY);
        }
    }

    /// Show or hide a control.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.set_flag(id, ControlFlags::VISIBLE, visible);
    }

    /// Allow or forbid selecting a control by clicking it.
    pub fn set_selectable(&mut self, id: NodeId, selectable: bool) {
        self.set_flag(id, ControlFlags::SELECTABLE, selectable);
    }

    /// Enable or disable a control's drop shadow.
    pub fn set_drop_shadow(&mut self, id: NodeId, drop: bool) {
        self.set_flag(id, ControlFlags::DROP_SHADOW, drop);
    }

    /// Mark a control's cached visual representation stale.
    pub fn mark_dirty(&mut self, id: NodeId) {
        self.set_flag(id, ControlFlags::DIRTY, true);
    }

    fn set_flag(&mut self, id: NodeId, flag: ControlFlags, on: bool) {
        if let Some(c) = self.control_mut(id) {
            c.state.flags.set(flag, on);
        }
    }

    /// The selected control.
    pub const fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    /// Move the selection.
    ///
    /// The previous control is deselected and notified before the new one
    /// is selected and notified, so two controls are never selected at once.
    pub fn select(&mut self, id: Option<NodeId>) {
        let id = id.filter(|&id| self.is_control(id));
        if id == self.selection {
            return;
        }
        if let Some(old) = self.selection.take() {
            self.set_flag(old, ControlFlags::SELECTED, false);
            self.call_widget(old, |widget, cx| widget.selection_changed(cx, false));
        }
        if let Some(new) = id {
            self.set_flag(new, ControlFlags::SELECTED, true);
            self.selection = Some(new);
            self.call_widget(new, |widget, cx| widget.selection_changed(cx, true));
        }
        tracing::trace!(selection = ?self.selection, "selection changed");
    }

    // ----- callbacks ------------------------------------------------------

    /// Register the click callback. Returning `false` vetoes selection.
    pub fn on_click(&mut self, id: NodeId, f: impl FnMut(&mut Self, NodeId, Click) -> bool + 'static) -> Result<()> {
        self.require_control_mut(id)?.callbacks.click = Slot::Set(Box::new(f));
        Ok(())
    }

    /// Register the double-click callback.
    pub fn on_double_click(
        &mut self,
        id: NodeId,
        f: impl FnMut(&mut Self, NodeId, Click) -> bool + 'static,
    ) -> Result<()> {
        self.require_control_mut(id)?.callbacks.double_click = Slot::Set(Box::new(f));
        Ok(())
    }

    /// Register the drag-move callback.
    pub fn on_drag_move(
        &mut self,
        id: NodeId,
        f: impl FnMut(&mut Self, NodeId, DragMode, DragMotion) + 'static,
    ) -> Result<()> {
        self.require_control_mut(id)?.callbacks.drag_move = Slot::Set(Box::new(f));
        Ok(())
    }

    /// Register the key-press callback.
    pub fn on_key_press(&mut self, id: NodeId, f: impl FnMut(&mut Self, NodeId, Key) + 'static) -> Result<()> {
        self.require_control_mut(id)?.callbacks.key_press = Slot::Set(Box::new(f));
        Ok(())
    }

    /// Drop every callback of a control.
    pub fn clear_callbacks(&mut self, id: NodeId) {
        if let Some(c) = self.control_mut(id) {
            c.callbacks = Callbacks::default();
        }
    }

    // ----- widgets --------------------------------------------------------

    /// Borrow a control's widget as its concrete type.
    pub fn widget<W: Widget>(&self, id: NodeId) -> Option<&W> {
        let widget = self.control(id)?.widget.as_deref()?;
        <dyn Widget as AsAny>::as_any(widget).downcast_ref::<W>()
    }

    /// Run `f` with a control's widget as its concrete type.
    ///
    /// Returns `None` if the handle is stale, the type doesn't match, or the
    /// widget is already being called further up the stack.
    pub fn with_widget<W: Widget, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut W, &mut ControlCx<'_>) -> R,
    ) -> Option<R> {
        self.call_widget(id, |widget, cx| {
            <dyn Widget as AsAny>::as_any_mut(widget).downcast_mut::<W>().map(|w| f(w, cx))
        })
        .flatten()
    }

    /// Take the widget out for one call and put it back afterwards, unless
    /// the control was destroyed meanwhile.
    pub(crate) fn call_widget<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut ControlCx<'_>) -> R,
    ) -> Option<R> {
        let mut widget = self.control_mut(id)?.widget.take()?;
        let result = f(widget.as_mut(), &mut ControlCx { ui: self, id });
        if let Some(control) = self.control_mut(id) {
            control.widget = Some(widget);
        }
        Some(result)
    }

    pub(crate) fn is_button(&self, id: NodeId) -> bool {
        self.control(id).and_then(|c| c.widget.as_deref()).is_some_and(|w| w.is_button())
    }

    pub(crate) fn click_test(&self, id: NodeId, x: i32, y: i32) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        match &node.body {
            Body::Control(Control { widget: Some(w), .. }) => w.click_test(node.rect, x, y),
            _ => false,
        }
    }

    pub(crate) fn drag_test(&self, id: NodeId, x: i32, y: i32) -> Option<DragMode> {
        let node = self.nodes.get(id)?;
        match &node.body {
            Body::Control(Control { widget: Some(w), .. }) => w.drag_test(node.rect, x, y),
            _ => None,
        }
    }

    /// Deliver a click; `true` when both the widget and the callback accept it.
    pub(crate) fn fire_click(&mut self, id: NodeId, click: Click, double: bool) -> bool {
        let widget_ok = self
            .call_widget(id, |w, cx| if double { w.double_clicked(cx, click) } else { w.clicked(cx, click) })
            .unwrap_or(false);
        if !self.contains(id) {
            return false;
        }
        let Some(mut f) = self.control_mut(id).and_then(|c| click_slot(c, double).take()) else {
            return widget_ok;
        };
        let callback_ok = f(self, id, click);
        let Some(c) = self.control_mut(id) else {
            return false;
        };
        click_slot(c, double).restore(f);
        widget_ok && callback_ok
    }

    pub(crate) fn fire_drag_move(&mut self, id: NodeId, mode: DragMode, motion: DragMotion) {
        self.call_widget(id, |w, cx| w.drag_move(cx, mode, motion));
        let Some(mut f) = self.control_mut(id).and_then(|c| c.callbacks.drag_move.take()) else {
            return;
        };
        f(self, id, mode, motion);
        if let Some(c) = self.control_mut(id) {
            c.callbacks.drag_move.restore(f);
        }
    }

    pub(crate) fn fire_key(&mut self, id: NodeId, key: Key) {
        self.call_widget(id, |w, cx| w.key_pressed(cx, key));
        let Some(mut f) = self.control_mut(id).and_then(|c| c.callbacks.key_press.take()) else {
            return;
        };
        f(self, id, key);
        if let Some(c) = self.control_mut(id) {
            c.callbacks.key_press.restore(f);
        }
    }

    pub(crate) fn set_pushed(&mut self, id: NodeId, pushed: bool) {
        self.call_widget(id, |w, cx| w.set_pushed(cx, pushed));
    }

    // ----- drawing --------------------------------------------------------

    /// Draw every visible control in iteration order, clearing dirty flags.
    pub fn draw(&mut self, target: &mut Surface) {
        if self.gui_hidden {
            return;
        }
        let ids: Vec<NodeId> = self.controls(self.root).collect();
        for id in ids {
            self.draw_control(id, target);
        }
    }

    fn draw_control(&mut self, id: NodeId, target: &mut Surface) {
        let Some(control) = self.control_mut(id) else {
            return;
        };
        if !control.state.is_visible() {
            return;
        }
        let Some(mut widget) = control.widget.take() else {
            return;
        };
        if let (Some(node), Some(state)) = (self.nodes.get(id), self.state(id)) {
            let cx = DrawCx {
                ui: &*self,
                id,
                bounds: node.rect,
                state,
                font: self.font.as_ref(),
                anim: self.anim_timer,
            };
            widget.draw(&cx, target);
        }
        if let Some(control) = self.control_mut(id) {
            control.widget = Some(widget);
            control.state.flags.remove(ControlFlags::DIRTY);
        }
    }

    /// Font used by text-bearing controls.
    pub fn font(&self) -> &dyn Glyphs {
        self.font.as_ref()
    }

    /// Replace the font and mark every control dirty.
    pub fn set_font(&mut self, font: impl Glyphs + 'static) {
        self.font = Box::new(font);
        for node in self.nodes.values_mut() {
            if let Body::Control(c) = &mut node.body {
                c.state.flags.insert(ControlFlags::DIRTY);
            }
        }
    }

    // ----- application state ----------------------------------------------

    /// Canvas size in pixels.
    pub const fn canvas_size(&self) -> (i32, i32) {
        self.canvas
    }

    /// Record a new canvas size and notify every control.
    pub fn set_canvas_size(&mut self, width: i32, height: i32) {
        self.canvas = (width, height);
        let ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| matches!(node.body, Body::Control(_)))
            .map(|(id, _)| id)
            .collect();
        for id in ids {
            self.call_widget(id, |w, cx| w.canvas_resized(cx, width, height));
        }
        tracing::debug!(width, height, "canvas resized");
    }

    /// While hidden, controls are neither hit-tested nor drawn.
    pub fn set_gui_hidden(&mut self, hidden: bool) {
        self.gui_hidden = hidden;
    }

    /// Whether the GUI is hidden.
    pub const fn gui_hidden(&self) -> bool {
        self.gui_hidden
    }

    /// Ask the application loop to stop after the current frame.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Whether a quit was requested.
    pub const fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Heartbeat counter, advanced every heartbeat tick.
    pub const fn anim_timer(&self) -> u64 {
        self.anim_timer
    }

    pub(crate) fn tick_anim(&mut self) {
        self.anim_timer = self.anim_timer.wrapping_add(1);
    }

    /// Application timers.
    pub const fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Application timers, for registering, pausing and resuming.
    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    // ----- configuration --------------------------------------------------

    /// Bind a configuration store; persisted properties read and write it.
    pub fn set_config_store(&mut self, store: impl ConfigStore + 'static) {
        self.store = Some(Box::new(store));
    }

    /// The bound configuration store.
    pub fn config_store(&self) -> Option<&dyn ConfigStore> {
        self.store.as_deref()
    }

    /// Unbind and return the configuration store.
    pub fn take_config_store(&mut self) -> Option<Box<dyn ConfigStore>> {
        self.store.take()
    }

    /// Persist a named control's x, y, width and height under
    /// `{name}_x` and so on. Stored values are applied immediately if the
    /// control is already named.
    pub fn set_persist_geometry(&mut self, id: NodeId, persist: bool) {
        if let Some(c) = self.control_mut(id) {
            c.state.persist_geometry = persist;
        }
        self.load_geometry(id);
    }

    /// Stored value of a named control's property.
    pub fn stored_value(&self, id: NodeId, property: &str) -> Option<Value> {
        let name = self.state(id)?.name()?;
        self.store.as_ref()?.get(&config_key(name, property))
    }

    /// Write a named control's property to the configuration store.
    ///
    /// Does nothing for unnamed controls or without a bound store.
    pub fn persist_value<T: Serialize + ?Sized>(&mut self, id: NodeId, property: &str, value: &T) {
        let Some(name) = self.state(id).and_then(ControlState::name) else {
            return;
        };
        let key = config_key(name, property);
        let Some(store) = self.store.as_mut() else {
            return;
        };
        match serde_json::to_value(value) {
            Ok(value) => store.set(&key, value),
            Err(e) => tracing::warn!(key, "can't persist value: {e}"),
        }
    }

    fn load_geometry(&mut self, id: NodeId) {
        if !self.state(id).is_some_and(|s| s.persist_geometry) {
            return;
        }
        let Some(rect) = self.bounds(id) else {
            return;
        };
        let [x, y, width, height] = GEOMETRY_KEYS.map(|key| {
            self.stored_value(id, key)
                .and_then(|v| v.as_i64())
                .and_then(|v| i32::try_from(v).ok())
        });
        self.move_raw(id, x.unwrap_or(rect.x), y.unwrap_or(rect.y));
        self.resize_raw(id, width.unwrap_or(rect.width), height.unwrap_or(rect.height));
        if let Some(owner) = self.owner(id) {
            self.reflow(owner);
        }
    }

    fn save_geometry(&mut self, id: NodeId) {
        if !self.state(id).is_some_and(|s| s.persist_geometry) {
            return;
        }
        let Some(rect) = self.bounds(id) else {
            return;
        };
        for (key, value) in GEOMETRY_KEYS.into_iter().zip([rect.x, rect.y, rect.width, rect.height]) {
            self.persist_value(id, key, &value);
        }
    }

    // ----- internals ------------------------------------------------------

    fn control(&self, id: NodeId) -> Option<&Control> {
        match &self.nodes.get(id)?.body {
            Body::Control(c) => Some(c),
            Body::Layout(_) => None,
        }
    }

    fn control_mut(&mut self, id: NodeId) -> Option<&mut Control> {
        match &mut self.nodes.get_mut(id)?.body {
            Body::Control(c) => Some(c),
            Body::Layout(_) => None,
        }
    }

    fn layout_node(&self, id: NodeId) -> Option<&LayoutNode> {
        match &self.nodes.get(id)?.body {
            Body::Layout(l) => Some(l),
            Body::Control(_) => None,
        }
    }

    fn layout_node_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        match &mut self.nodes.get_mut(id)?.body {
            Body::Layout(l) => Some(l),
            Body::Control(_) => None,
        }
    }

    fn require_layout(&self, id: NodeId) -> Result<&LayoutNode> {
        match &self.nodes.get(id).ok_or(UiError::StaleNode(id))?.body {
            Body::Layout(l) => Ok(l),
            Body::Control(_) => Err(UiError::NotALayout(id)),
        }
    }

    fn require_control(&self, id: NodeId) -> Result<&Control> {
        match &self.nodes.get(id).ok_or(UiError::StaleNode(id))?.body {
            Body::Control(c) => Ok(c),
            Body::Layout(_) => Err(UiError::NotAControl(id)),
        }
    }

    fn require_control_mut(&mut self, id: NodeId) -> Result<&mut Control> {
        match &mut self.nodes.get_mut(id).ok_or(UiError::StaleNode(id))?.body {
            Body::Control(c) => Ok(c),
            Body::Layout(_) => Err(UiError::NotAControl(id)),
        }
    }

    /// The next node up: the owning layout, or a sub-layout's control.
    fn container(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        node.owner.or(match &node.body {
            Body::Layout(l) => l.parent,
            Body::Control(_) => None,
        })
    }

    fn check_insert(&self, layout: NodeId, child: NodeId) -> Result<()> {
        let target = self.require_layout(layout)?;
        let node = self.nodes.get(child).ok_or(UiError::StaleNode(child))?;
        if target.kind == LayoutKind::Spacer {
            return Err(UiError::SpacerChild);
        }
        if target.items.contains(&child) {
            return Err(UiError::AlreadyPresent { layout, child });
        }
        if matches!(&node.body, Body::Layout(l) if l.parent.is_some()) {
            return Err(UiError::InvalidArgument(format!("{child:?} is a sub-layout")));
        }
        let mut cursor = Some(layout);
        while let Some(id) = cursor {
            if id == child {
                return Err(UiError::Cycle { layout, child });
            }
            cursor = self.container(id);
        }
        Ok(())
    }

    fn insert(&mut self, layout: NodeId, child: NodeId, cell: Option<usize>) {
        if let Some(old) = self.owner(child) {
            self.detach(old, child);
        }
        // an unplaced child has no position to hand over
        let origin = self.origin(child);
        let mut snapped = None;
        if let Some(node) = self.nodes.get_mut(layout) {
            if let Body::Layout(l) = &mut node.body {
                l.items.push(child);
                if let Some(slot) = cell.and_then(|index| l.cells.get_mut(index)) {
                    *slot = Some(child);
                }
                if let (false, Some((x, y))) = (l.placed, origin) {
                    l.placed = true;
                    node.rect.x = x;
                    node.rect.y = y;
                    snapped = Some((x, y));
                }
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.owner = Some(layout);
        }
        tracing::debug!(?layout, ?child, "added to layout");
        self.reflow(layout);
        if let Some((x, y)) = snapped {
            let top = self.place_owners(layout, x, y);
            if top != layout {
                self.reflow(top);
            }
        }
    }

    /// Place every still-unplaced layout above `id` at `(x, y)`; returns the
    /// topmost one placed, or `id` if there was none.
    fn place_owners(&mut self, id: NodeId, x: i32, y: i32) -> NodeId {
        let mut top = id;
        while let Some(owner) = self.owner(top) {
            let Some(node) = self.nodes.get_mut(owner) else {
                break;
            };
            match &mut node.body {
                Body::Layout(l) if !l.placed => l.placed = true,
                _ => break,
            }
            node.rect.x = x;
            node.rect.y = y;
            top = owner;
        }
        top
    }

    fn detach(&mut self, layout: NodeId, child: NodeId) {
        if let Some(l) = self.layout_node_mut(layout) {
            l.detach(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            if node.owner == Some(layout) {
                node.owner = None;
            }
        }
        tracing::debug!(?layout, ?child, "removed from layout");
        self.reflow(layout);
    }

    /// Re-flow one layout; `true` when its size changed.
    fn reflow_one(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let Body::Layout(layout) = &node.body else {
            return false;
        };
        if !layout.placed {
            return false;
        }
        let items: Vec<ItemInfo> = layout.items.iter().filter_map(|&item| self.item_info(item)).collect();
        let placement = layout::plan(layout, (node.rect.x, node.rect.y), &items);
        let before = (node.rect.width, node.rect.height);

        for (item, x, y) in placement.positions {
            self.move_raw(item, x, y);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.rect.width = placement.width;
            node.rect.height = placement.height;
        }
        before != (placement.width, placement.height)
    }

    fn item_info(&self, id: NodeId) -> Option<ItemInfo> {
        let node = self.nodes.get(id)?;
        let extra = match &node.body {
            Body::Layout(l) => l.spacing,
            Body::Control(_) => 0,
        };
        Some(ItemInfo {
            id,
            rect: node.rect,
            extra,
        })
    }

    /// Where a size change of layout `id` has to be re-flowed next.
    fn propagate_from(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if node.owner.is_some() {
            return node.owner;
        }
        let Body::Layout(layout) = &node.body else {
            return None;
        };
        let parent = layout.parent?;
        let (width, height) = (node.rect.width, node.rect.height);
        let margin = self.control(parent)?.fit_margin?;
        if self.resize_raw(parent, width + 2 * margin, height + 2 * margin) {
            self.owner(parent)
        } else {
            None
        }
    }

    fn move_raw(&mut self, id: NodeId, x: i32, y: i32) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let (dx, dy) = (x - node.rect.x, y - node.rect.y);
        let follow: Vec<NodeId> = match &mut node.body {
            Body::Layout(l) if l.kind == LayoutKind::Spacer => return,
            Body::Layout(l) if !l.placed => {
                l.placed = true;
                Vec::new()
            }
            Body::Layout(l) => l.items.clone(),
            Body::Control(c) => c.children.into_iter().collect(),
        };
        node.rect.x = x;
        node.rect.y = y;
        if dx == 0 && dy == 0 {
            return;
        }
        for item in follow {
            if let Some(rect) = self.bounds(item) {
                self.move_raw(item, rect.x + dx, rect.y + dy);
            }
        }
    }

    /// `true` when the size actually changed.
    fn resize_raw(&mut self, id: NodeId, width: i32, height: i32) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if (node.rect.width, node.rect.height) == (width, height) {
            return false;
        }
        node.rect.width = width;
        node.rect.height = height;
        if let Body::Control(c) = &mut node.body {
            c.state.flags.insert(ControlFlags::DIRTY);
        }
        true
    }

    fn geometry_changed(&mut self, id: NodeId) {
        if let Some(owner) = self.owner(id) {
            self.reflow(owner);
        }
        self.save_geometry(id);
    }
}

fn click_slot(control: &mut Control, double: bool) -> &mut Slot<ClickFn> {
    if double {
        &mut control.callbacks.double_click
    } else {
        &mut control.callbacks.click
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl std::fmt::Debug for Ui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ui")
            .field("nodes", &self.nodes.len())
            .field("selection", &self.selection)
            .field("canvas", &self.canvas)
            .field("gui_hidden", &self.gui_hidden)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfig;
    use crate::event::MouseButton;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Block {
        size: (i32, i32),
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Block {
        fn new(width: i32, height: i32) -> Self {
            Self {
                size: (width, height),
                log: Rc::default(),
            }
        }
    }

    impl Widget for Block {
        fn size_hint(&self) -> (i32, i32) {
            self.size
        }

        fn selection_changed(&mut self, _cx: &mut ControlCx<'_>, selected: bool) {
            self.log.borrow_mut().push(format!("selected={selected}"));
        }

        fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
            target.fill_rect(cx.bounds, cx.state.color());
        }
    }

    fn block(ui: &mut Ui, width: i32, height: i32) -> NodeId {
        ui.spawn(Block::new(width, height))
    }

    #[test]
    fn test_vertical_layout_positions_children() {
        let mut ui = Ui::default();
        let col = ui.layout(LayoutKind::Vertical);
        ui.set_pos(col, 5, 10);
        let a = block(&mut ui, 8, 10);
        let b = block(&mut ui, 12, 20);
        let c = block(&mut ui, 4, 15);
        for id in [a, b, c] {
            ui.add(col, id).unwrap();
        }

        assert_eq!(ui.bounds(col).unwrap(), Rect::new(5, 10, 12, 49));
        assert_eq!(ui.bounds(a).unwrap().y, 10);
        assert_eq!(ui.bounds(b).unwrap().y, 22);
        assert_eq!(ui.bounds(c).unwrap().y, 44);
        assert!([a, b, c].iter().all(|&id| ui.bounds(id).unwrap().x == 5));
    }

    #[test]
    fn test_reflow_idempotent() {
        let mut ui = Ui::default();
        let row = ui.layout_with_spacing(LayoutKind::Horizontal, 3);
        let ids: Vec<NodeId> = (1..5).map(|i| block(&mut ui, i * 3, i)).collect();
        for &id in &ids {
            ui.add(row, id).unwrap();
        }
        let snapshot = |ui: &Ui| ids.iter().map(|&id| ui.bounds(id)).collect::<Vec<_>>();

        ui.reflow(row);
        let first = snapshot(&ui);
        ui.reflow(row);
        assert_eq!(first, snapshot(&ui));
    }

    #[test]
    fn test_unplaced_layout_snaps_to_first_child() {
        let mut ui = Ui::default();
        let col = ui.layout(LayoutKind::Vertical);
        assert_eq!(ui.origin(col), None);

        let a = ui.spawn_at(30, 40, Block::new(5, 5));
        ui.add(col, a).unwrap();
        assert_eq!(ui.origin(col), Some((30, 40)));
    }

    #[test]
    fn test_outer_first_nesting_snaps_to_first_control() {
        let mut ui = Ui::default();
        let outer = ui.layout(LayoutKind::Vertical);
        let inner = ui.layout(LayoutKind::Vertical);
        ui.add(outer, inner).unwrap();
        assert_eq!(ui.origin(outer), None);
        assert_eq!(ui.origin(inner), None);

        let a = ui.spawn_at(30, 40, Block::new(5, 5));
        ui.add(inner, a).unwrap();
        assert_eq!(ui.origin(inner), Some((30, 40)));
        assert_eq!(ui.origin(outer), Some((30, 40)));
        assert_eq!(ui.bounds(a).unwrap(), Rect::new(30, 40, 5, 5));
        // inner's own spacing of 2 follows it
        assert_eq!(ui.bounds(outer).unwrap(), Rect::new(30, 40, 5, 7));

        ui.reflow(outer);
        assert_eq!(ui.bounds(a).unwrap(), Rect::new(30, 40, 5, 5));
    }

    #[test]
    fn test_positioning_nested_layout_places_its_owner() {
        let mut ui = Ui::default();
        let outer = ui.layout(LayoutKind::Horizontal);
        let inner = ui.layout(LayoutKind::Horizontal);
        ui.add(outer, inner).unwrap();

        ui.set_pos(inner, 12, 8);
        assert_eq!(ui.origin(outer), Some((12, 8)));
        let b = block(&mut ui, 4, 4);
        ui.add(outer, b).unwrap();
        assert_eq!(ui.bounds(b).unwrap().x, 12);
        assert_eq!(ui.bounds(b).unwrap().y, 8);
    }

    #[test]
    fn test_remove_reflows_siblings() {
        let mut ui = Ui::default();
        let col = ui.layout(LayoutKind::Vertical);
        ui.set_pos(col, 0, 0);
        let a = block(&mut ui, 6, 10);
        let b = block(&mut ui, 9, 20);
        let c = block(&mut ui, 4, 5);
        for id in [a, b, c] {
            ui.add(col, id).unwrap();
        }
        assert_eq!(ui.bounds(c).unwrap().y, 34);
        assert_eq!(ui.bounds(col).unwrap(), Rect::new(0, 0, 9, 39));

        ui.remove(col, b).unwrap();
        assert_eq!(ui.owner(b), None);
        assert_eq!(ui.bounds(c).unwrap().y, 12);
        assert_eq!(ui.bounds(col).unwrap(), Rect::new(0, 0, 6, 17));
        assert_eq!(ui.items(col), &[a, c]);
        assert!(matches!(ui.remove(col, b), Err(UiError::NotPresent { .. })));
    }

    #[test]
    fn test_set_right_keeps_width() {
        let mut ui = Ui::default();
        let free = ui.layout(LayoutKind::Free);
        ui.set_pos(free, 0, 0);
        let a = block(&mut ui, 5, 7);
        ui.add(free, a).unwrap();
        assert_eq!(ui.bounds(free).unwrap(), Rect::new(0, 0, 5, 7));

        ui.set_right(a, 30);
        assert_eq!(ui.bounds(a).unwrap(), Rect::new(25, 0, 5, 7));
        assert_eq!(ui.bounds(free).unwrap(), Rect::new(0, 0, 30, 7));
    }

    #[test]
    fn test_set_bottom_carries_items() {
        let mut ui = Ui::default();
        let col = ui.layout(LayoutKind::Vertical);
        ui.set_pos(col, 3, 0);
        let a = block(&mut ui, 5, 5);
        let b = block(&mut ui, 5, 5);
        ui.add(col, a).unwrap();
        ui.add(col, b).unwrap();

        ui.set_bottom(col, 50);
        assert_eq!(ui.bounds(col).unwrap(), Rect::new(3, 38, 5, 12));
        assert_eq!(ui.bounds(a).unwrap().y, 38);
        assert_eq!(ui.bounds(b).unwrap().y, 45);
    }

    #[test]
    fn test_moving_layout_translates_subtree() {
        let mut ui = Ui::default();
        let outer = ui.layout(LayoutKind::Vertical);
        let inner = ui.layout(LayoutKind::Horizontal);
        ui.set_pos(outer, 0, 0);
        let a = block(&mut ui, 5, 5);
        let b = block(&mut ui, 5, 5);
        ui.add(inner, a).unwrap();
        ui.add(inner, b).unwrap();
        ui.add(outer, inner).unwrap();

        let before = ui.bounds(b).unwrap();
        ui.set_pos(outer, 7, 9);
        assert_eq!(ui.bounds(b).unwrap(), before.translated(7, 9));
    }

    #[test]
    fn test_resize_cascades_upward() {
        let mut ui = Ui::default();
        let outer = ui.layout(LayoutKind::Vertical);
        let inner = ui.layout_with_spacing(LayoutKind::Vertical, 1);
        ui.set_pos(outer, 0, 0);
        let a = block(&mut ui, 5, 5);
        let below = block(&mut ui, 5, 5);
        ui.add(inner, a).unwrap();
        ui.add(outer, inner).unwrap();
        ui.add(outer, below).unwrap();
        // inner height 5, plus its own spacing 1, plus outer spacing 2
        assert_eq!(ui.bounds(below).unwrap().y, 8);

        ui.set_height(a, 10);
        assert_eq!(ui.bounds(below).unwrap().y, 13);
    }

    #[test]
    fn test_ownership_transfer() {
        let mut ui = Ui::default();
        let first = ui.layout(LayoutKind::Vertical);
        let second = ui.layout(LayoutKind::Horizontal);
        let a = block(&mut ui, 5, 5);
        ui.add(first, a).unwrap();
        ui.add(second, a).unwrap();

        assert_eq!(ui.controls(first).count(), 0);
        assert_eq!(ui.controls(second).filter(|&id| id == a).count(), 1);
        assert_eq!(ui.owner(a), Some(second));
    }

    #[test]
    fn test_structural_errors() {
        let mut ui = Ui::default();
        let col = ui.layout(LayoutKind::Vertical);
        let spacer = ui.spacer(4);
        let a = block(&mut ui, 5, 5);

        ui.add(col, a).unwrap();
        assert!(matches!(ui.add(col, a), Err(UiError::AlreadyPresent { .. })));
        assert!(matches!(ui.add(spacer, a), Err(UiError::SpacerChild)));
        assert!(matches!(ui.add(a, col), Err(UiError::NotALayout(_))));
        assert!(matches!(ui.remove(spacer, a), Err(UiError::NotPresent { .. })));
        assert!(matches!(ui.add(col, col), Err(UiError::Cycle { .. })));

        let inner = ui.layout(LayoutKind::Free);
        ui.add(col, inner).unwrap();
        assert!(matches!(ui.add(inner, col), Err(UiError::Cycle { .. })));
    }

    #[test]
    fn test_grid_errors_and_placement() {
        let mut ui = Ui::default();
        let grid = ui.layout(LayoutKind::Grid {
            cols: 2,
            rows: 2,
            alignment: crate::tree::Alignment::Left,
        });
        ui.set_pos(grid, 0, 0);
        let narrow = block(&mut ui, 30, 5);
        let wide = block(&mut ui, 50, 5);
        let right = block(&mut ui, 10, 5);

        ui.add_to_grid(grid, narrow, GridPos::new(0, 0)).unwrap();
        ui.add_to_grid(grid, wide, GridPos::new(0, 1)).unwrap();
        ui.add_to_grid(grid, right, GridPos::new(1, 0)).unwrap();
        assert_eq!(ui.bounds(right).unwrap().x, 50 + 2);

        let extra = block(&mut ui, 1, 1);
        assert!(matches!(ui.add_to_grid(grid, extra, GridPos::new(2, 0)), Err(UiError::CellOutOfBounds { .. })));
        assert!(matches!(ui.add_to_grid(grid, extra, GridPos::new(1, 0)), Err(UiError::CellOccupied { .. })));
        ui.add(grid, extra).unwrap();
        assert_eq!(ui.grid_item(grid, GridPos::new(1, 1)), Some(extra));
    }

    #[test]
    fn test_spacer_ignores_position() {
        let mut ui = Ui::default();
        let spacer = ui.spacer(6);
        ui.set_pos(spacer, 10, 10);
        assert_eq!(ui.origin(spacer), None);

        let holder = ui.layout(LayoutKind::Vertical);
        ui.add(holder, spacer).unwrap();
        ui.set_pos(spacer, 10, 10);
        assert_eq!(ui.origin(holder), None);
        ui.remove(holder, spacer).unwrap();

        let row = ui.layout(LayoutKind::Horizontal);
        let a = ui.spawn_at(0, 0, Block::new(4, 4));
        let b = block(&mut ui, 4, 4);
        ui.add(row, a).unwrap();
        ui.add(row, spacer).unwrap();
        ui.add(row, b).unwrap();
        assert_eq!(ui.bounds(b).unwrap().x, 10);
    }

    #[test]
    fn test_iteration_descends_visible_children_only() {
        let mut ui = Ui::default();
        let panel = block(&mut ui, 20, 20);
        let sub = ui.layout(LayoutKind::Horizontal);
        let child = block(&mut ui, 2, 2);
        ui.add(sub, child).unwrap();
        ui.attach_children(panel, sub).unwrap();
        ui.register(panel, Some("panel"), None).unwrap();
        let after = block(&mut ui, 1, 1);
        ui.register(after, None, None).unwrap();

        assert_eq!(ui.controls(ui.root()).collect::<Vec<_>>(), vec![panel, child, after]);
        ui.set_visible(panel, false);
        assert_eq!(ui.controls(ui.root()).collect::<Vec<_>>(), vec![panel, after]);
        assert_eq!(ui.named("panel"), Some(panel));
    }

    #[test]
    fn test_moving_control_moves_sub_layout() {
        let mut ui = Ui::default();
        let panel = block(&mut ui, 20, 20);
        let sub = ui.layout(LayoutKind::Horizontal);
        let child = ui.spawn_at(2, 2, Block::new(3, 3));
        ui.add(sub, child).unwrap();
        ui.attach_children(panel, sub).unwrap();

        ui.set_pos(panel, 10, 0);
        assert_eq!(ui.bounds(child).unwrap().x, 12);
        assert!(matches!(ui.add(sub, panel), Err(UiError::Cycle { .. })));
    }

    #[test]
    fn test_fit_children_follows_sub_layout() {
        let mut ui = Ui::default();
        let panel = block(&mut ui, 1, 1);
        let sub = ui.layout(LayoutKind::Horizontal);
        let child = ui.spawn_at(2, 2, Block::new(3, 3));
        ui.add(sub, child).unwrap();
        ui.attach_children(panel, sub).unwrap();
        ui.fit_children(panel, Some(2));
        assert_eq!(ui.bounds(panel).unwrap().width, 7);

        let more = block(&mut ui, 5, 6);
        ui.add(sub, more).unwrap();
        assert_eq!(ui.bounds(panel).unwrap(), Rect::new(0, 0, 12, 10));
    }

    #[test]
    fn test_selection_is_exclusive_and_ordered() {
        let mut ui = Ui::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut first = Block::new(4, 4);
        first.log = Rc::clone(&log);
        let mut second = Block::new(4, 4);
        second.log = Rc::clone(&log);
        let a = ui.spawn(first);
        let b = ui.spawn(second);

        ui.select(Some(a));
        ui.select(Some(b));
        assert!(!ui.state(a).unwrap().is_selected());
        assert!(ui.state(b).unwrap().is_selected());
        assert_eq!(*log.borrow(), ["selected=true", "selected=false", "selected=true"]);
    }

    #[test]
    fn test_destroy_clears_selection_and_subtree() {
        let mut ui = Ui::default();
        let col = ui.layout(LayoutKind::Vertical);
        let a = block(&mut ui, 4, 4);
        ui.add(col, a).unwrap();
        ui.register(col, None, None).unwrap();
        ui.select(Some(a));

        ui.destroy(col).unwrap();
        assert_eq!(ui.selection(), None);
        assert!(!ui.contains(a));
        assert!(ui.items(ui.root()).is_empty());
        assert!(matches!(ui.destroy(col), Err(UiError::StaleNode(_))));
        ui.set_x(a, 5);
    }

    #[test]
    fn test_callback_may_destroy_its_control() {
        let mut ui = Ui::default();
        let a = block(&mut ui, 4, 4);
        ui.on_click(a, |ui, id, _| {
            ui.destroy(id).unwrap();
            true
        })
        .unwrap();

        let click = Click {
            x: 1,
            y: 1,
            button: MouseButton::Left,
        };
        assert!(!ui.fire_click(a, click, false));
        assert!(!ui.contains(a));
    }

    #[test]
    fn test_click_callback_vetoes() {
        let mut ui = Ui::default();
        let a = block(&mut ui, 4, 4);
        ui.on_click(a, |_, _, click| click.button == MouseButton::Left).unwrap();
        let click = |button| Click { x: 0, y: 0, button };
        assert!(ui.fire_click(a, click(MouseButton::Left), false));
        assert!(!ui.fire_click(a, click(MouseButton::Right), false));
        // no double-click callback registered: the widget default accepts
        assert!(ui.fire_click(a, click(MouseButton::Right), true));
    }

    #[test]
    fn test_persisted_geometry() {
        let mut store = MemoryConfig::new();
        store.set("roi_x", serde_json::json!(40));
        store.set("roi_width", serde_json::json!(25));
        let mut ui = Ui::default();
        ui.set_config_store(store);

        let roi = block(&mut ui, 10, 10);
        ui.set_persist_geometry(roi, true);
        ui.register(roi, Some("roi"), None).unwrap();
        assert_eq!(ui.bounds(roi).unwrap(), Rect::new(40, 0, 25, 10));

        ui.set_y(roi, 7);
        assert_eq!(ui.config_store().unwrap().get("roi_y"), Some(serde_json::json!(7)));
    }

    #[test]
    fn test_draw_clears_dirty() {
        let mut ui = Ui::new(8, 8);
        let a = ui.spawn_at(1, 1, Block::new(2, 2));
        ui.register(a, None, None).unwrap();
        ui.set_color(a, Rgb::WHITE);

        let mut screen = Surface::new(8, 8);
        ui.draw(&mut screen);
        assert_eq!(screen.get(2, 2), Some(Rgb::WHITE));
        assert!(!ui.state(a).unwrap().is_dirty());
    }
}
