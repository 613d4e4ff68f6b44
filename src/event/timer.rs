//! Timers: scheduled wake-ups injected into the input queue.
//!
//! There is no timer thread. The application loop asks [`Timers::due`] for
//! the timers whose deadline has passed and delivers an
//! [`InputEvent::Timer`](super::InputEvent::Timer) for each of them in the
//! same pump as host input.

use crate::error::{Result, UiError};
use slotmap::SlotMap;
use std::time::Duration;

slotmap::new_key_type! {
    /// Handle returned by [`Timers::register`].
    pub struct TimerId;
}

#[derive(Debug, Clone)]
struct Timer {
    interval: Duration,
    once: bool,
    /// Next deadline, measured from the application clock's origin.
    /// `None` while paused or idle.
    next: Option<Duration>,
}

/// Registry of periodic and one-shot timers.
#[derive(Debug, Default)]
pub struct Timers {
    timers: SlotMap<TimerId, Timer>,
    /// Last time observed by [`Timers::due`].
    clock: Duration,
}

impl Timers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer firing every `interval` (or once, if `once`).
    ///
    /// A zero interval registers the handle without scheduling it; it can be
    /// started later with [`Timers::resume`].
    pub fn register(&mut self, interval: Duration, once: bool) -> TimerId {
        let next = (!interval.is_zero()).then(|| self.clock + interval);
        let id = self.timers.insert(Timer { interval, once, next });
        tracing::debug!(?id, ?interval, once, "timer registered");
        id
    }

    /// Stop a timer from firing.
    pub fn pause(&mut self, id: TimerId) -> Result<()> {
        let timer = self.timers.get_mut(id).ok_or(UiError::UnknownTimer(id))?;
        timer.next = None;
        tracing::debug!(?id, "timer paused");
        Ok(())
    }

    /// Restart a timer, optionally with a new interval and one-shot flag.
    ///
    /// Fails on an unknown handle, on an explicit zero interval, and when the
    /// timer was registered idle and no interval is given now.
    pub fn resume(&mut self, id: TimerId, interval: Option<Duration>, once: Option<bool>) -> Result<()> {
        let clock = self.clock;
        let timer = self.timers.get_mut(id).ok_or(UiError::UnknownTimer(id))?;
        if let Some(interval) = interval {
            if interval.is_zero() {
                return Err(UiError::ZeroInterval);
            }
            timer.interval = interval;
        }
        if timer.interval.is_zero() {
            return Err(UiError::ZeroInterval);
        }
        if let Some(once) = once {
            timer.once = once;
        }
        timer.next = Some(clock + timer.interval);
        tracing::debug!(?id, interval = ?timer.interval, once = timer.once, "timer resumed");
        Ok(())
    }

    /// Whether `id` is currently scheduled.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.get(id).is_some_and(|t| t.next.is_some())
    }

    /// Whether `id` was registered here.
    pub fn contains(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Collect every timer whose deadline is at or before `now`.
    ///
    /// Each timer fires at most once per call; a timer that fell behind
    /// skips the missed ticks instead of queuing them.
    pub fn due(&mut self, now: Duration) -> Vec<TimerId> {
        self.clock = now;
        let mut fired: Vec<(Duration, TimerId)> = Vec::new();
        for (id, timer) in &mut self.timers {
            let Some(deadline) = timer.next else {
                continue;
            };
            if deadline > now {
                continue;
            }
            fired.push((deadline, id));
            if timer.once {
                timer.next = None;
            } else {
                let mut next = deadline + timer.interval;
                if next <= now {
                    next = now + timer.interval;
                }
                timer.next = Some(next);
            }
        }
        // stable: equal deadlines keep registration order
        fired.sort_by_key(|&(deadline, _)| deadline);
        fired.into_iter().map(|(_, id)| id).collect()
    }
}
