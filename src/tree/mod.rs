//! The control and layout tree.
//!
//! Every control and layout is a node in one arena owned by [`Ui`]. Nodes
//! refer to each other through generational [`NodeId`] handles, so a child
//! never keeps its container alive and a handle to a destroyed node simply
//! stops resolving.
//!
//! ```text
//! root (Free) ──┬── control ── sub-layout (Horizontal) ──┬── control
//!               │                                        └── control
//!               └── layout (Vertical) ──┬── control
//!                                       └── spacer
//! ```
//!
//! Ownership always points from container to child. The reverse links (a
//! node's owning layout, a sub-layout's parent control) are plain handles
//! resolved on demand.

mod control;
mod iter;
mod layout;
mod ui;
mod widget;

use crate::geometry::Rect;

pub use control::{ClickFn, ControlFlags, ControlState, DragFn, KeyFn, Slot};
pub use iter::Controls;
pub use layout::{Alignment, GridPos, LayoutKind};
pub use ui::Ui;
pub use widget::{AsAny, Click, ControlCx, DragMode, DragMotion, DrawCx, Widget};

slotmap::new_key_type! {
    /// Handle to a control or layout.
    pub struct NodeId;
}

pub(crate) struct Node {
    pub(crate) rect: Rect,
    /// Layout this node is an item of.
    pub(crate) owner: Option<NodeId>,
    pub(crate) body: Body,
}

pub(crate) enum Body {
    Control(control::Control),
    Layout(layout::LayoutNode),
}
