//! # Trellis
//!
//! A retained-mode control, layout and event-dispatch engine for a pixel
//! editor.
//!
//! Controls live in one arena owned by [`Ui`], arranged by nested layouts
//! (free, vertical, horizontal, grid, spacer). The [`App`] loop pulls input
//! from an [`EventSource`], routes it through the [`Dispatcher`] (hit-testing,
//! drag tracking, double-click detection, selection) and draws every visible
//! control into a [`Surface`] that a [`Presenter`] puts on screen.
//!
//! ## Core Concepts
//!
//! - **Handles, not pointers**: every node is addressed by a generational
//!   [`NodeId`], so callbacks may destroy controls mid-dispatch
//! - **Re-flow on mutation**: layouts recompute positions whenever an item
//!   is added, removed, moved or resized
//! - **Widgets behind a trait**: a control's behavior is a [`Widget`]; the
//!   engine owns geometry, visibility, selection and the dirty flag
//! - **Persisted properties**: named controls read and write their settings
//!   through a [`ConfigStore`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use trellis::widgets::Button;
//! use trellis::{App, AppConfig, TerminalHost};
//!
//! let mut host = TerminalHost::new()?;
//! let mut app = App::new(AppConfig::default());
//! let ok = app.ui_mut().spawn_at(10, 10, Button::new("ok", 30, 12));
//! app.ui_mut().register(ok, Some("ok"), None)?;
//! app.ui_mut().on_click(ok, |ui, _, _| {
//!     ui.request_quit();
//!     true
//! })?;
//! app.run_host(&mut host)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod surface;
pub mod tree;
pub mod widgets;

// Re-exports for convenience
pub use app::{App, Dispatcher, Presenter};
pub use config::{AppConfig, ConfigStore, MemoryConfig, Property};
pub use error::{ErrorKind, Result, UiError};
pub use event::{EventSource, InputEvent, Key, KeyCode, KeyModifiers, MouseButton, TimerId};
pub use geometry::Rect;
pub use host::TerminalHost;
pub use surface::{Blend, BlockFont, Glyphs, Rgb, Surface};
pub use tree::{ControlCx, DragMode, DrawCx, LayoutKind, NodeId, Ui, Widget};
