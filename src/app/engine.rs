//! App: the frame loop that ties the tree, the dispatcher and a host together.
//!
//! One frame pumps every pending event (timers first, then host input),
//! draws drop shadows and controls onto the screen surface, hands the
//! surface to a [`Presenter`], and then sleeps to hold the target frame
//! rate. Everything runs on the calling thread.

use super::dispatch::Dispatcher;
use crate::config::AppConfig;
use crate::error::Result;
use crate::event::{EventSource, InputEvent, TimerId};
use crate::geometry::Rect;
use crate::surface::{Blend, Rgb, Surface};
use crate::tree::{ControlState, Ui};
use std::time::{Duration, Instant};

/// Receives finished frames.
pub trait Presenter {
    /// Show `frame` to the user.
    fn present(&mut self, frame: &Surface) -> Result<()>;
}

type EventHook = Box<dyn FnMut(&mut Ui, &InputEvent)>;
type DrawHook = Box<dyn FnMut(&mut Ui, &mut Surface)>;
type QuitHook = Box<dyn FnMut(&mut Ui) -> bool>;
type InitHook = Box<dyn FnOnce(&mut Ui)>;

#[derive(Default)]
struct Hooks {
    on_event: Option<EventHook>,
    on_pre_draw: Option<DrawHook>,
    on_draw: Option<DrawHook>,
    on_quit: Option<QuitHook>,
    post_init: Option<InitHook>,
}

/// The application loop.
pub struct App {
    config: AppConfig,
    ui: Ui,
    dispatcher: Dispatcher,
    hooks: Hooks,
    /// Frame being composed.
    screen: Surface,
    /// Screen-sized scratch surface the drop shadows are collected on.
    shadow: Surface,
    heartbeat: TimerId,
    running: bool,
    frame_count: u64,
    metrics_fps: f64,
}

impl App {
    /// Create an application from its configuration.
    pub fn new(config: AppConfig) -> Self {
        let mut ui = Ui::new(config.width, config.height);
        let heartbeat = ui.timers_mut().register(config.heartbeat(), false);
        let screen = Surface::filled(config.width, config.height, config.background);
        let shadow = Surface::new(config.width, config.height);
        let dispatcher = Dispatcher::new(config.double_click_delay());
        tracing::debug!(title = ?config.title, width = config.width, height = config.height, "app created");

        Self {
            config,
            ui,
            dispatcher,
            hooks: Hooks::default(),
            screen,
            shadow,
            heartbeat,
            running: true,
            frame_count: 0,
            metrics_fps: 0.0,
        }
    }

    /// The configuration the app was created with.
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The control tree.
    pub const fn ui(&self) -> &Ui {
        &self.ui
    }

    /// The control tree, for building and mutating the interface.
    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    /// Input dispatch state.
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The most recently composed frame.
    pub const fn screen(&self) -> &Surface {
        &self.screen
    }

    /// Handle of the built-in animation heartbeat timer.
    pub const fn heartbeat(&self) -> TimerId {
        self.heartbeat
    }

    /// Whether the loop keeps going.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Stop after the current frame, bypassing the quit hook.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Frames completed so far.
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second the last frame's work time would allow.
    pub const fn metrics_fps(&self) -> f64 {
        self.metrics_fps
    }

    /// Dispatch passes since the last keyboard or pointer event.
    pub const fn idle_ticks(&self) -> u64 {
        self.dispatcher.idle_ticks()
    }

    // ----- hooks ----------------------------------------------------------

    /// Called with every event after it was dispatched, including timer
    /// and synthetic double-click events.
    pub fn on_event(&mut self, f: impl FnMut(&mut Ui, &InputEvent) + 'static) {
        self.hooks.on_event = Some(Box::new(f));
    }

    /// Called after the screen is cleared and before controls are drawn.
    pub fn on_pre_draw(&mut self, f: impl FnMut(&mut Ui, &mut Surface) + 'static) {
        self.hooks.on_pre_draw = Some(Box::new(f));
    }

    /// Called after controls are drawn.
    pub fn on_draw(&mut self, f: impl FnMut(&mut Ui, &mut Surface) + 'static) {
        self.hooks.on_draw = Some(Box::new(f));
    }

    /// Called when the host asks to quit; returning `false` postpones it.
    pub fn on_quit(&mut self, f: impl FnMut(&mut Ui) -> bool + 'static) {
        self.hooks.on_quit = Some(Box::new(f));
    }

    /// Called once when [`run`](Self::run) starts.
    pub fn post_init(&mut self, f: impl FnOnce(&mut Ui) + 'static) {
        self.hooks.post_init = Some(Box::new(f));
    }

    // ----- loop -----------------------------------------------------------

    /// Drain due timers and every pending host event.
    ///
    /// `now` is the time since the loop started.
    pub fn pump(&mut self, source: &mut dyn EventSource, now: Duration) -> Result<()> {
        for id in self.ui.timers_mut().due(now) {
            self.dispatch_at(&InputEvent::Timer(id), now);
        }
        while let Some(event) = source.poll_event()? {
            self.dispatch_at(&event, now);
        }
        self.dispatcher.end_pass();
        Ok(())
    }

    /// Dispatch one event as if it arrived at `now`.
    pub fn dispatch_at(&mut self, event: &InputEvent, now: Duration) {
        match *event {
            InputEvent::Timer(id) if id == self.heartbeat => {
                self.ui.tick_anim();
                return;
            }
            InputEvent::Quit => self.host_quit(),
            InputEvent::Resize { width, height } => {
                self.screen.resize(width, height);
                self.shadow.resize(width, height);
            }
            _ => {}
        }

        let synthetic = self.dispatcher.handle(&mut self.ui, event, now);
        self.emit(event);
        if let Some(synthetic) = synthetic {
            self.emit(&synthetic);
        }
    }

    fn emit(&mut self, event: &InputEvent) {
        if let Some(hook) = self.hooks.on_event.as_mut() {
            hook(&mut self.ui, event);
        }
    }

    fn host_quit(&mut self) {
        let confirmed = self.hooks.on_quit.as_mut().map_or(true, |hook| hook(&mut self.ui));
        if confirmed {
            tracing::debug!("quit confirmed");
            self.running = false;
        } else {
            tracing::debug!("quit postponed by hook");
        }
    }

    /// Compose one frame onto the screen surface.
    pub fn draw(&mut self) {
        if self.config.clear_screen {
            self.screen.fill(self.config.background);
        }
        if let Some(hook) = self.hooks.on_pre_draw.as_mut() {
            hook(&mut self.ui, &mut self.screen);
        }
        if !self.ui.gui_hidden() {
            self.cast_shadows();
            self.ui.draw(&mut self.screen);
        }
        if let Some(hook) = self.hooks.on_draw.as_mut() {
            hook(&mut self.ui, &mut self.screen);
        }
    }

    /// Subtract a right and a bottom band under every visible control that
    /// drops a shadow.
    fn cast_shadows(&mut self) {
        let offset = self.config.shadow_offset;
        self.shadow.fill(Rgb::BLACK);
        for id in self.ui.controls(self.ui.root()) {
            let casts = self.ui.state(id).is_some_and(casts_shadow);
            let Some(rect) = self.ui.bounds(id).filter(|_| casts) else {
                continue;
            };
            self.shadow.fill_rect(Rect::new(rect.right(), rect.y + offset, offset, rect.height), Rgb::SHADOW);
            self.shadow.fill_rect(Rect::new(rect.x + offset, rect.bottom(), rect.width, offset), Rgb::SHADOW);
        }
        self.screen.blit(&self.shadow, 0, 0, Blend::Sub);
    }

    /// Pump, draw and present one frame.
    pub fn frame(&mut self, source: &mut dyn EventSource, presenter: &mut dyn Presenter, now: Duration) -> Result<()> {
        self.pump(source, now)?;
        self.present(presenter)
    }

    fn present(&mut self, presenter: &mut dyn Presenter) -> Result<()> {
        self.draw();
        presenter.present(&self.screen)?;
        self.frame_count += 1;
        if self.ui.quit_requested() {
            tracing::debug!("quit requested by a control");
            self.running = false;
        }
        Ok(())
    }

    /// Run frames until quit, holding the configured frame rate.
    ///
    /// Errors from the event source or the presenter end the loop.
    pub fn run(&mut self, source: &mut dyn EventSource, presenter: &mut dyn Presenter) -> Result<()> {
        self.run_frames(|app, now| app.frame(source, presenter, now))
    }

    /// [`run`](Self::run) against a host that is both the event source and
    /// the presenter, such as [`TerminalHost`](crate::host::TerminalHost).
    pub fn run_host<H: EventSource + Presenter>(&mut self, host: &mut H) -> Result<()> {
        self.run_frames(|app, now| {
            app.pump(host, now)?;
            app.present(host)
        })
    }

    fn run_frames(&mut self, mut frame: impl FnMut(&mut Self, Duration) -> Result<()>) -> Result<()> {
        let started = Instant::now();
        let frame_duration = self.config.frame_duration();
        if let Some(init) = self.hooks.post_init.take() {
            init(&mut self.ui);
        }
        tracing::info!(fps = self.config.target_fps, "application loop started");

        while self.running {
            let when = Instant::now();
            frame(self, started.elapsed())?;
            let took = when.elapsed();
            self.metrics_fps = 1.0 / took.as_secs_f64().max(f64::EPSILON);
            if took < frame_duration {
                std::thread::sleep(frame_duration - took);
            }
        }

        tracing::info!(frames = self.frame_count, "application loop exited");
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("ui", &self.ui)
            .field("running", &self.running)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

/// Whether a control takes part in the drop-shadow pass.
pub fn casts_shadow(state: &ControlState) -> bool {
    state.is_visible() && state.drop_shadow()
}
