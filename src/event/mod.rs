//! Input events, event sources and timers.
//!
//! The host layer produces [`InputEvent`]s; the application loop pulls them
//! from an [`EventSource`] once per frame, together with any [`Timers`]
//! whose deadline has passed.
//!
//! ```text
//! ┌──────────────┐   InputEvent   ┌──────────────┐
//! │  Host layer  │ ─────────────▶ │              │
//! └──────────────┘                │   App loop   │ ──▶ Dispatcher ──▶ controls
//! ┌──────────────┐   TimerId      │              │
//! │    Timers    │ ─────────────▶ │              │
//! └──────────────┘                └──────────────┘
//! ```

mod messages;
mod source;
mod timer;

pub use messages::{InputEvent, Key, KeyCode, KeyModifiers, Motion, MouseButton, MouseEvent};
pub use source::{channel, ChannelSource, EventSource};
pub use timer::{TimerId, Timers};
