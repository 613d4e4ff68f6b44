//! Event sources: where the application loop pulls raw input from.

use super::messages::InputEvent;
use crate::error::Result;
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::collections::VecDeque;

/// A non-blocking supplier of input events.
///
/// The application loop calls [`EventSource::poll_event`] until it returns
/// `Ok(None)`, which ends the pump for the current frame.
pub trait EventSource {
    /// Return the next pending event, if any, without blocking.
    fn poll_event(&mut self) -> Result<Option<InputEvent>>;
}

impl EventSource for VecDeque<InputEvent> {
    fn poll_event(&mut self) -> Result<Option<InputEvent>> {
        Ok(self.pop_front())
    }
}

/// An event source fed through a crossbeam channel.
///
/// Any thread holding the [`Sender`] half can inject events; the loop
/// drains them on its own thread. When every sender is dropped the source
/// yields a single [`InputEvent::Quit`] and then stays empty.
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<InputEvent>,
    hung_up: bool,
}

impl ChannelSource {
    /// Wrap an existing receiver.
    pub const fn new(rx: Receiver<InputEvent>) -> Self {
        Self { rx, hung_up: false }
    }

    /// Get the underlying receiver.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<InputEvent> {
        &self.rx
    }
}

impl EventSource for ChannelSource {
    fn poll_event(&mut self) -> Result<Option<InputEvent>> {
        if self.hung_up {
            return Ok(None);
        }
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("input channel disconnected, requesting quit");
                self.hung_up = true;
                Ok(Some(InputEvent::Quit))
            }
        }
    }
}

/// Create a bounded input queue.
pub fn channel(capacity: usize) -> (Sender<InputEvent>, ChannelSource) {
    let (tx, rx) = bounded(capacity);
    (tx, ChannelSource::new(rx))
}
