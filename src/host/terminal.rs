//! `TerminalHost`: crossterm-backed event source and presenter.
//!
//! One terminal cell stands for one canvas pixel, painted with its
//! background color. Input is read on a dedicated thread and handed to the
//! application loop through a [`ChannelSource`].

use crate::app::Presenter;
use crate::error::Result;
use crate::event::{
    channel, ChannelSource, EventSource, InputEvent, Key, KeyCode, KeyModifiers, Motion, MouseButton,
    MouseEvent,
};
use crate::surface::{Rgb, Surface};
use crossbeam_channel::Sender;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind};
use crossterm::style::{Color, SetBackgroundColor};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long the input thread waits for an event before checking shutdown.
const POLL_TIMEOUT: Duration = Duration::from_millis(10);

/// Input queue depth between the input thread and the loop.
const QUEUE_DEPTH: usize = 256;

/// A terminal acting as both input source and display.
pub struct TerminalHost {
    source: ChannelSource,
    input: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    /// Last presented frame, for sending only changed cells.
    last: Option<Surface>,
    out: Vec<u8>,
}

impl TerminalHost {
    /// Enter raw mode and the alternate screen, enable mouse capture and
    /// start the input thread.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails or the input thread can't
    /// be spawned.
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let (tx, source) = channel(QUEUE_DEPTH);
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let input = thread::Builder::new()
            .name("trellis-input".to_string())
            .spawn(move || input_loop(&tx, &flag))?;

        tracing::debug!("terminal host started");
        Ok(Self {
            source,
            input: Some(input),
            shutdown,
            last: None,
            out: Vec::with_capacity(16 * 1024),
        })
    }

    /// Current terminal size in cells, which is the canvas size in pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal can't be queried.
    pub fn size() -> Result<(i32, i32)> {
        let (w, h) = terminal::size()?;
        Ok((i32::from(w), i32::from(h)))
    }

    /// Force the next frame to be sent in full.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

impl EventSource for TerminalHost {
    fn poll_event(&mut self) -> Result<Option<InputEvent>> {
        let event = self.source.poll_event()?;
        if matches!(event, Some(InputEvent::Resize { .. })) {
            self.last = None;
        }
        Ok(event)
    }
}

impl Presenter for TerminalHost {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn present(&mut self, frame: &Surface) -> Result<()> {
        self.out.clear();
        let full = self
            .last
            .as_ref()
            .is_none_or(|last| last.width() != frame.width() || last.height() != frame.height());

        let mut current: Option<Rgb> = None;
        for (y, row) in frame.rows().enumerate() {
            let mut cursor_at: Option<usize> = None;
            for (x, &pixel) in row.iter().enumerate() {
                if !full {
                    let prev = self.last.as_ref().and_then(|l| l.get(x as i32, y as i32));
                    if prev == Some(pixel) {
                        continue;
                    }
                }
                if cursor_at != Some(x) {
                    queue!(self.out, cursor::MoveTo(to_cell(x), to_cell(y)))?;
                }
                if current != Some(pixel) {
                    queue!(self.out, SetBackgroundColor(to_color(pixel)))?;
                    current = Some(pixel);
                }
                self.out.push(b' ');
                cursor_at = Some(x + 1);
            }
        }

        if !self.out.is_empty() {
            let mut stdout = io::stdout();
            stdout.write_all(&self.out)?;
            stdout.flush()?;
        }
        match &mut self.last {
            Some(last) if !full => last.clone_from(frame),
            _ => self.last = Some(frame.clone()),
        }
        Ok(())
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.input.take() {
            let _ = handle.join();
        }

        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl std::fmt::Debug for TerminalHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalHost")
            .field("running", &self.input.is_some())
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn to_cell(n: usize) -> u16 {
    if n > u16::MAX as usize {
        u16::MAX
    } else {
        n as u16
    }
}

const fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

fn input_loop(tx: &Sender<InputEvent>, shutdown: &AtomicBool) {
    let mut pointer = Pointer::default();
    while !shutdown.load(Ordering::Relaxed) {
        match event::poll(POLL_TIMEOUT) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                tracing::warn!("terminal poll failed: {e}");
                break;
            }
        }
        let raw = match event::read() {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("terminal read failed: {e}");
                break;
            }
        };
        let Some(converted) = pointer.convert(raw) else {
            continue;
        };
        if tx.send(converted).is_err() {
            break;
        }
    }
    // Dropping `tx` here makes the source yield Quit.
}

/// Tracks the last pointer position so motion events carry a delta.
#[derive(Debug, Default)]
struct Pointer {
    last: Option<(i32, i32)>,
}

impl Pointer {
    fn convert(&mut self, raw: Event) -> Option<InputEvent> {
        match raw {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return None;
                }
                let code = convert_key_code(key.code)?;
                Some(InputEvent::Key(Key::with_modifiers(code, convert_modifiers(key.modifiers))))
            }
            Event::Mouse(mouse) => self.convert_mouse(mouse),
            Event::Resize(width, height) => Some(InputEvent::Resize {
                width: i32::from(width),
                height: i32::from(height),
            }),
            _ => None,
        }
    }

    fn convert_mouse(&mut self, mouse: event::MouseEvent) -> Option<InputEvent> {
        let (x, y) = (i32::from(mouse.column), i32::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(button) => {
                self.last = Some((x, y));
                Some(InputEvent::MouseDown(MouseEvent::new(x, y, convert_mouse_button(button))))
            }
            MouseEventKind::Up(button) => {
                self.last = Some((x, y));
                Some(InputEvent::MouseUp(MouseEvent::new(x, y, convert_mouse_button(button))))
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let (lx, ly) = self.last.unwrap_or((x, y));
                self.last = Some((x, y));
                Some(InputEvent::MouseMove(Motion::new(x, y, x - lx, y - ly)))
            }
            _ => None,
        }
    }
}

fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::F(n) => KeyCode::F(n),
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Home => KeyCode::Home,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::Tab => KeyCode::Tab,
        event::KeyCode::BackTab => KeyCode::BackTab,
        event::KeyCode::Delete => KeyCode::Delete,
        event::KeyCode::Insert => KeyCode::Insert,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => return None,
    })
}

fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    out.set(KeyModifiers::SHIFT, mods.contains(event::KeyModifiers::SHIFT));
    out.set(KeyModifiers::CONTROL, mods.contains(event::KeyModifiers::CONTROL));
    out.set(KeyModifiers::ALT, mods.contains(event::KeyModifiers::ALT));
    out.set(KeyModifiers::SUPER, mods.contains(event::KeyModifiers::SUPER));
    out
}

const fn convert_mouse_button(button: event::MouseButton) -> MouseButton {
    match button {
        event::MouseButton::Left => MouseButton::Left,
        event::MouseButton::Right => MouseButton::Right,
        event::MouseButton::Middle => MouseButton::Middle,
    }
}
