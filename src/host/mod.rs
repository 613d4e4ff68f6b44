//! Host layers that feed input to the application loop and show its frames.

mod terminal;

pub use terminal::TerminalHost;
