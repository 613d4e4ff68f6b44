//! Message types delivered from the host layer to the dispatcher.
//!
//! These enums define the protocol between whatever produces raw input
//! (a terminal, a window system, a test) and the application loop.

use super::timer::TimerId;
use bitflags::bitflags;

/// Key codes for keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Function key (F1-F12).
    F(u8),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab key.
    Tab,
    /// Backtab (Shift+Tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
}

bitflags! {
    /// Key modifiers held during a key or mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        /// Shift key held.
        const SHIFT = 0b0001;
        /// Control key held.
        const CONTROL = 0b0010;
        /// Alt/Option key held.
        const ALT = 0b0100;
        /// Super/Command/Windows key held.
        const SUPER = 0b1000;
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    /// The key code.
    pub code: KeyCode,
    /// Modifiers held during the key press.
    pub modifiers: KeyModifiers,
}

impl Key {
    /// A key press without modifiers.
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    /// A key press with modifiers.
    pub const fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
}

/// A mouse button press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// X coordinate on the canvas.
    pub x: i32,
    /// Y coordinate on the canvas.
    pub y: i32,
    /// Button involved.
    pub button: MouseButton,
}

impl MouseEvent {
    /// Create a new mouse event.
    pub const fn new(x: i32, y: i32, button: MouseButton) -> Self {
        Self { x, y, button }
    }
}

/// Pointer motion with the delta since the previous motion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    /// X coordinate on the canvas.
    pub x: i32,
    /// Y coordinate on the canvas.
    pub y: i32,
    /// Horizontal delta.
    pub rel_x: i32,
    /// Vertical delta.
    pub rel_y: i32,
}

impl Motion {
    /// Create a new motion event.
    pub const fn new(x: i32, y: i32, rel_x: i32, rel_y: i32) -> Self {
        Self { x, y, rel_x, rel_y }
    }
}

/// Events consumed by the application loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The host asked the application to close.
    Quit,

    /// A key was pressed.
    Key(Key),

    /// Mouse button pressed.
    MouseDown(MouseEvent),

    /// Mouse button released.
    MouseUp(MouseEvent),

    /// Mouse moved.
    MouseMove(Motion),

    /// The canvas was resized.
    Resize {
        /// New width in pixels.
        width: i32,
        /// New height in pixels.
        height: i32,
    },

    /// A registered timer fired.
    Timer(TimerId),

    /// Synthetic event queued by the dispatcher when a mouse-down
    /// qualifies as a double-click.
    DoubleClick(MouseEvent),
}

impl InputEvent {
    /// Keyboard and pointer events reset the idle counter.
    pub const fn is_unsettling(&self) -> bool {
        matches!(
            self,
            Self::Key(_) | Self::MouseDown(_) | Self::MouseUp(_) | Self::MouseMove(_)
        )
    }
}
