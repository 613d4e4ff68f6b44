//! Per-control state shared by every widget, and the callback slots.

use super::widget::{Click, DragMode, DragMotion, Widget};
use super::{NodeId, Ui};
use crate::event::Key;
use crate::surface::Rgb;
use bitflags::bitflags;

bitflags! {
    /// Boolean control state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u8 {
        /// Drawn and hit-tested.
        const VISIBLE = 0b0000_0001;
        /// Currently receives keyboard input.
        const SELECTED = 0b0000_0010;
        /// May become the selection when clicked.
        const SELECTABLE = 0b0000_0100;
        /// Casts a drop shadow.
        const DROP_SHADOW = 0b0000_1000;
        /// Cached visual representation must be rebuilt before drawing.
        const DIRTY = 0b0001_0000;
    }
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::DROP_SHADOW | Self::DIRTY
    }
}

/// State every control carries, independent of its widget.
#[derive(Debug, Clone)]
pub struct ControlState {
    pub(crate) color: Rgb,
    pub(crate) flags: ControlFlags,
    pub(crate) name: Option<String>,
    pub(crate) persist_geometry: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            color: Rgb::FOREGROUND,
            flags: ControlFlags::default(),
            name: None,
            persist_geometry: false,
        }
    }
}

impl ControlState {
    /// Primary color.
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Raw flag set.
    pub const fn flags(&self) -> ControlFlags {
        self.flags
    }

    /// Whether the control is drawn and hit-tested.
    pub const fn is_visible(&self) -> bool {
        self.flags.contains(ControlFlags::VISIBLE)
    }

    /// Whether the control is the current selection.
    pub const fn is_selected(&self) -> bool {
        self.flags.contains(ControlFlags::SELECTED)
    }

    /// Whether a click may select the control.
    pub const fn is_selectable(&self) -> bool {
        self.flags.contains(ControlFlags::SELECTABLE)
    }

    /// Whether the control casts a drop shadow.
    pub const fn drop_shadow(&self) -> bool {
        self.flags.contains(ControlFlags::DROP_SHADOW)
    }

    /// Whether the cached visual must be rebuilt.
    pub const fn is_dirty(&self) -> bool {
        self.flags.contains(ControlFlags::DIRTY)
    }

    /// Registered name, used to derive configuration keys.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Click and double-click callback.
pub type ClickFn = dyn FnMut(&mut Ui, NodeId, Click) -> bool;
/// Drag-move callback.
pub type DragFn = dyn FnMut(&mut Ui, NodeId, DragMode, DragMotion);
/// Key-press callback.
pub type KeyFn = dyn FnMut(&mut Ui, NodeId, Key);

/// A callback slot with an explicit empty state.
pub enum Slot<F: ?Sized> {
    /// No callback registered.
    Empty,
    /// A registered callback.
    Set(Box<F>),
}

impl<F: ?Sized> Default for Slot<F> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<F: ?Sized> Slot<F> {
    /// Whether a callback is registered.
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Move the callback out, leaving the slot empty.
    pub(crate) fn take(&mut self) -> Option<Box<F>> {
        match std::mem::take(self) {
            Self::Set(f) => Some(f),
            Self::Empty => None,
        }
    }

    /// Put a callback back unless a new one was registered meanwhile.
    pub(crate) fn restore(&mut self, f: Box<F>) {
        if !self.is_set() {
            *self = Self::Set(f);
        }
    }
}

impl<F: ?Sized> std::fmt::Debug for Slot<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.is_set() { "Set" } else { "Empty" })
    }
}

#[derive(Debug, Default)]
pub(crate) struct Callbacks {
    pub(crate) click: Slot<ClickFn>,
    pub(crate) double_click: Slot<ClickFn>,
    pub(crate) drag_move: Slot<DragFn>,
    pub(crate) key_press: Slot<KeyFn>,
}

pub(crate) struct Control {
    pub(crate) state: ControlState,
    pub(crate) callbacks: Callbacks,
    /// Taken out while one of its methods runs.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Sub-layout whose controls are iterated after this one.
    pub(crate) children: Option<NodeId>,
    /// When set, the control's size follows its sub-layout plus this margin.
    pub(crate) fit_margin: Option<i32>,
}

impl Control {
    pub(crate) fn new(widget: Box<dyn Widget>) -> Self {
        Self {
            state: ControlState::default(),
            callbacks: Callbacks::default(),
            widget: Some(widget),
            children: None,
            fit_margin: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let state = ControlState::default();
        assert!(state.is_visible());
        assert!(state.drop_shadow());
        assert!(state.is_dirty());
        assert!(!state.is_selected());
        assert!(!state.is_selectable());
    }

    #[test]
    fn test_slot_restore_keeps_replacement() {
        let mut slot: Slot<dyn FnMut() -> u8> = Slot::Set(Box::new(|| 1));
        let mut old = slot.take().unwrap();
        assert!(!slot.is_set());

        slot = Slot::Set(Box::new(|| 2));
        slot.restore(Box::new(move || old()));
        match &mut slot {
            Slot::Set(f) => assert_eq!(f(), 2),
            Slot::Empty => panic!("slot emptied"),
        }
    }
}
