//! The application loop and input dispatch.
//!
//! [`App`] owns the [`Ui`](crate::tree::Ui) and a [`Dispatcher`]. Each frame
//! it drains an [`EventSource`](crate::event::EventSource), routes every
//! event through the dispatcher, draws, and hands the frame to a
//! [`Presenter`].

mod dispatch;
mod engine;

pub use dispatch::{DragEntry, Dispatcher};
pub use engine::{casts_shadow, App, Presenter};
